//! Runtime layer for the bike-sharing dashboard.
//!
//! Resolves and fetches the configured data source, then holds the prepared
//! record set as a load-once session that serves summaries and filtered
//! views on demand.

pub mod session;
pub mod source;

pub use bikeshare_core as core;
pub use bikeshare_data as data;
