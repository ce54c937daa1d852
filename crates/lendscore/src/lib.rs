//! Real-time loan risk scoring and decision engine.
//!
//! The crate is organised around one deterministic pipeline: a raw
//! application is encoded into a fixed feature vector, scored by a loaded
//! gradient-boosted model, blended with admin-weighted sub-scores into a
//! risk breakdown, and pushed through business rules into a final decision
//! with named factors. Everything around that pipeline — configuration,
//! telemetry, HTTP routing, persistence traits — is thin and replaceable.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod underwriting;
