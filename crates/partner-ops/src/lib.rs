//! Commission and pipeline rules engine for the partner portal.
//!
//! The `pipeline` module owns the pure rules engine (rate table, commission
//! calculator, stage machine, nudge generator) together with the ports and
//! service facade that embed it; `hubspot` imports existing books of
//! business from CRM exports.

pub mod config;
pub mod error;
pub mod hubspot;
pub mod pipeline;
pub mod telemetry;
