//! Shared foundation for the bike-sharing dashboard.
//!
//! Holds the typed daily [`models::Record`] and its categorical labels, the
//! crate-wide error type, date parsing and month labelling helpers, number
//! formatting for reports, and the command-line settings.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{DashboardError, Result};
