//! HTTP request handlers for the rides API.

pub mod error;
pub mod health;
pub mod rides;
pub mod stations;

pub use error::{ApiError, AtEndpoint};
