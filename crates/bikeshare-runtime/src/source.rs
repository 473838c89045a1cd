//! Data-source resolution and fetching.
//!
//! A location string is either an `http(s)://` URL, fetched with
//! [`reqwest`], or a filesystem path, read with [`tokio::fs`]. Either way the
//! whole document is read once; there is no retry.

use std::fmt;
use std::path::PathBuf;

use bikeshare_core::{DashboardError, Result};

/// Where the daily CSV lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    Path(PathBuf),
}

impl DataSource {
    /// Classify a location string; anything that is not an http(s) URL is a
    /// path.
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::Path(PathBuf::from(trimmed))
        }
    }

    pub fn location(&self) -> String {
        self.to_string()
    }

    /// Read the full document.
    ///
    /// Missing files, transport failures and non-success HTTP statuses all
    /// surface as [`DashboardError::SourceUnavailable`].
    pub async fn fetch(&self) -> Result<Vec<u8>> {
        match self {
            Self::Path(path) => {
                tracing::debug!(path = %path.display(), "reading CSV from disk");
                tokio::fs::read(path)
                    .await
                    .map_err(|e| DashboardError::source_unavailable(self.location(), e))
            }
            Self::Url(url) => {
                tracing::debug!(%url, "downloading CSV");
                let response = reqwest::get(url)
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| DashboardError::source_unavailable(url.as_str(), e))?;
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| DashboardError::source_unavailable(url.as_str(), e))?;
                Ok(bytes.to_vec())
            }
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
