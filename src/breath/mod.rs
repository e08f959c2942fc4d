pub mod config;
pub mod osc;
pub mod runtime;
