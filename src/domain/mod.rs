//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod signal;
pub mod simulator;
pub mod trade;
pub mod split;
pub mod metrics;
pub mod strategy;
pub mod backtest;
pub mod batch;
pub mod universe;
pub mod config_validation;
pub mod error;
