//! `depotiq-engine`: single entry point over the analytics crates.
//!
//! **Responsibility:** fill per-call parameters from [`EngineConfig`], validate
//! caller payloads at the boundary, and route JSON requests to the pure
//! analytical functions. Sourcing data and persisting results stay with the
//! caller.

pub mod config;
pub mod engine;
pub mod error;
pub mod request;
mod validate;

pub use config::EngineConfig;
pub use engine::{AbcXyzReport, Engine};
pub use error::EngineError;
pub use request::{Request, Response};
