//! Rides API Service Library
//!
//! This crate provides the HTTP server implementation for the read-only
//! bike-share rides analytics API.

pub mod config;
pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod state;
