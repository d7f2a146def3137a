//! Shared test utilities for the rides analytics workspace.
//!
//! This crate provides common testing infrastructure including:
//! - A station table and row fixtures
//! - An in-memory `RideStore` that records issued queries and can count
//!   rides through the station predicate
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../../crates/test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures, RecordingStore};
//! ```

pub mod fixtures;
pub mod store;

pub use store::{RecordingStore, Ride};
