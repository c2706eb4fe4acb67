//! Trust score engine: transaction ingest, score derivation, loan eligibility and
//! the HTTP surface that exposes them.

pub mod config;
pub mod error;
pub mod ledger;
pub mod lending;
pub mod scoring;
pub mod telemetry;
