//! Common test fixtures for rides analytics tests.

use rides_common::{AggregateRow, BoundingBox, StationTable};

/// Station identifiers present in [`stations`].
pub mod station_ids {
    /// 7th & Flower
    pub const FLOWER: &str = "3005";
    /// Main & 1st
    pub const MAIN: &str = "3006";
    /// Never present in the fixture table.
    pub const UNKNOWN: &str = "zz";
}

pub fn flower_box() -> BoundingBox {
    BoundingBox::new(34.0484, 34.0486, -118.2588, -118.2586)
}

pub fn main_box() -> BoundingBox {
    BoundingBox::new(34.0455, 34.0457, -118.2568, -118.2566)
}

/// A small station table with two downtown docks.
pub fn stations() -> StationTable {
    StationTable::from_entries([
        (station_ids::FLOWER, flower_box()),
        (station_ids::MAIN, main_box()),
    ])
    .expect("fixture stations are valid")
}

/// Parse rows from a JSON array literal.
pub fn rows(value: serde_json::Value) -> Vec<AggregateRow> {
    serde_json::from_value(value).expect("fixture rows must be a JSON array of objects")
}
