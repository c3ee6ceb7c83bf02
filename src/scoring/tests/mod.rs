mod common;
mod engine;
mod factors;
