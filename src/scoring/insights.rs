//! Turns a raw score into explanations a dispatcher can act on.

use super::domain::{
    ActionTier, FactorContribution, Insight, InsightCategory, InsightSeverity, Recommendation,
};

pub(crate) fn generate(
    delay_probability: u8,
    estimated_delay_minutes: u32,
    factors: &[FactorContribution],
    hours_until_departure: f64,
) -> Vec<Insight> {
    let mut insights = Vec::with_capacity(3);

    // Primary: same 70/40 thresholds as the risk tier.
    let primary = if delay_probability >= 70 {
        Insight {
            category: InsightCategory::Risk,
            severity: InsightSeverity::Warning,
            message: format!(
                "High delay risk: {delay_probability}% probability with an estimated \
                 {estimated_delay_minutes} minute delay"
            ),
            icon: "⚠️",
        }
    } else if delay_probability >= 40 {
        Insight {
            category: InsightCategory::Risk,
            severity: InsightSeverity::Info,
            message: format!(
                "Moderate delay risk: {delay_probability}% probability; watch for schedule slips"
            ),
            icon: "ℹ️",
        }
    } else {
        Insight {
            category: InsightCategory::Risk,
            severity: InsightSeverity::Success,
            message: format!(
                "Low delay risk: {delay_probability}% probability, flight should run close to schedule"
            ),
            icon: "✅",
        }
    };
    insights.push(primary);

    // Secondary: single largest contributor by weighted impact.
    if let Some(top) = factors
        .iter()
        .max_by(|a, b| a.impact.total_cmp(&b.impact))
    {
        insights.push(Insight {
            category: InsightCategory::TopFactor,
            severity: InsightSeverity::Info,
            message: format!(
                "Largest contributor is {} at {:+.1} points",
                top.factor_label, top.impact
            ),
            icon: "📊",
        });
    }

    // Tertiary: only at the extremes of the lead-time window.
    if hours_until_departure < 2.0 {
        insights.push(Insight {
            category: InsightCategory::Timing,
            severity: InsightSeverity::Warning,
            message: "Departure is under two hours away; rely on real-time status over this forecast"
                .to_string(),
            icon: "⏱️",
        });
    } else if hours_until_departure > 24.0 {
        insights.push(Insight {
            category: InsightCategory::Timing,
            severity: InsightSeverity::Info,
            message: "Departure is more than a day out; accuracy improves as the window closes"
                .to_string(),
            icon: "📅",
        });
    }

    insights
}

pub(crate) fn recommend(delay_probability: u8, estimated_delay_minutes: u32) -> Recommendation {
    if delay_probability >= 70 {
        Recommendation {
            tier: ActionTier::Immediate,
            title: "Prepare for likely disruption",
            steps: vec![
                format!(
                    "Notify the receiving party of an expected {estimated_delay_minutes} minute delay"
                ),
                "Line up alternate routing or a later handoff window".to_string(),
                "Confirm driver and dock availability past the scheduled arrival".to_string(),
                "Enable real-time tracking alerts for this flight".to_string(),
            ],
        }
    } else if delay_probability >= 40 {
        Recommendation {
            tier: ActionTier::Monitor,
            title: "Monitor for schedule slips",
            steps: vec![
                "Re-check flight status every few hours".to_string(),
                "Flag downstream transfers that depend on this arrival".to_string(),
                "Keep a fallback carrier option warm".to_string(),
                "Review the top contributing factor before committing new loads".to_string(),
            ],
        }
    } else {
        Recommendation {
            tier: ActionTier::Standard,
            title: "Proceed as planned",
            steps: vec![
                "Track the flight through normal channels".to_string(),
                "Confirm pickup details on the day of travel".to_string(),
                "No contingency action needed at this time".to_string(),
            ],
        }
    }
}
