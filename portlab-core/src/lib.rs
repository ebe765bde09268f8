//! PortLab Core — fixed-point ledger, market series, predictor and config abstractions.
//!
//! This crate contains the heart of the portfolio backtesting engine:
//! - Exact fixed-point arithmetic for money and share counts
//! - Append-only account ledger with typed transaction variants
//! - Validated price series and an ordered asset universe
//! - The `Predictor` trait (asset selection / distributions / feedback / reset)
//! - The `PredictorConfig` trait (validation, instantiation, Gaussian perturbation)
//! - Deterministic BLAKE3 seed hierarchy for reproducible perturbation

pub mod config;
pub mod domain;
pub mod fixed;
pub mod rng;
pub mod strategy;
