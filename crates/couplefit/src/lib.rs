//! Couples fitness core: challenge judging and date-night place ranking.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
