//! Storage abstractions for the rides analytics services.
//!
//! Provides:
//! - Aggregate query templates over the `rides` table
//! - The `RideStore` trait and its PostgreSQL implementation

pub mod query;
pub mod rides;

pub use query::{AggregateQuery, ColumnKind, Dimension, Grouping, StationFilter};
pub use rides::{PgRideStore, PgStoreConfig, RideStore};
