//! `depotiq-core`: shared building blocks for the analytics engine.
//!
//! This crate contains **pure** primitives (no IO): identifiers, the domain
//! error model, sales-series records and the statistics every analytical
//! component is built on.

pub mod error;
pub mod id;
pub mod sales;
pub mod stats;

pub use error::{DomainError, DomainResult};
pub use id::{FacilityId, OrderId, ProductId};
pub use sales::{DailySales, ProductSalesHistory, SalesPoint};
pub use stats::GeoPoint;
