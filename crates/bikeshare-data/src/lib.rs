//! Data layer for the bike-sharing dashboard.
//!
//! Reads the daily CSV, prepares validated records, computes grouped
//! aggregates and distributions, narrows records to a date range, and bundles
//! the results for the presentation layer.

pub mod aggregator;
pub mod analysis;
pub mod distribution;
pub mod filter;
pub mod preparation;
pub mod reader;

pub use bikeshare_core as core;
