//! Common types and utilities shared across the rides analytics services.

pub mod bbox;
pub mod error;
pub mod row;
pub mod station;
pub mod transform;

pub use bbox::{BboxError, BoundingBox, Range};
pub use error::{RidesError, RidesResult};
pub use row::{AggregateRow, GroupValue, COUNT_COLUMN};
pub use station::StationTable;
