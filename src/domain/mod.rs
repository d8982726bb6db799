//! Core domain types and logic.

pub mod price;
pub mod indicator;
pub mod signal;
pub mod confirmation;
pub mod rate_limit;
pub mod position;
pub mod account;
pub mod execution;
pub mod journal;
pub mod metrics;
pub mod engine;
pub mod config_validation;
pub mod error;
