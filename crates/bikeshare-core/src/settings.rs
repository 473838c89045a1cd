use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{DashboardError, Result};

/// Location of the public daily bike-sharing dataset.
pub const DEFAULT_SOURCE: &str =
    "https://raw.githubusercontent.com/spedakudashboard91/biiike/main/data/day_dataset_bike_sharing.csv";

/// Name of the per-user state directory under `$HOME`.
pub const STATE_DIR_NAME: &str = ".bikeshare-dashboard";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Summarise daily bike-sharing records
#[derive(Parser, Debug, Clone)]
#[command(
    name = "bikeshare-dashboard",
    about = "Summarise daily bike-sharing records",
    version
)]
pub struct Settings {
    /// CSV location: a local path or an http(s) URL
    #[arg(long, default_value = DEFAULT_SOURCE)]
    pub source: String,

    /// First day of the filter range (YYYY-MM-DD); defaults to the earliest record
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Last day of the filter range (YYYY-MM-DD); defaults to the latest record
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Logging level
    #[arg(
        long,
        default_value = "INFO",
        value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"]
    )]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.bikeshare-dashboard/last_used.json`.
///
/// The date range is deliberately not persisted; it is a per-run filter.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(STATE_DIR_NAME).join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    ///
    /// A missing file yields `Default`. An unreadable file is an
    /// [`DashboardError::Io`]; malformed JSON is a [`DashboardError::Config`].
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content).map_err(|e| {
            DashboardError::Config(format!("unreadable {}: {}", path.display(), e))
        })
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| {
            DashboardError::Config(format!("cannot encode last-used params: {e}"))
        })?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &Path) -> Result<()> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    ///
    /// Failures to read, clear or save `last_used.json` never stop startup;
    /// they come back alongside the settings so the caller can log them once
    /// logging is up.
    pub fn load_with_last_used() -> (Self, Vec<DashboardError>) {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Same as [`Settings::load_with_last_used`] but with an explicit argument
    /// list and config path so tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &Path,
    ) -> (Self, Vec<DashboardError>) {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);
        let mut problems = Vec::new();

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                problems.push(e);
            }
            return (Self::apply_debug_flag(settings), problems);
        }

        let last = LastUsedParams::load_from(config_path).unwrap_or_else(|e| {
            problems.push(e);
            LastUsedParams::default()
        });

        // CLI always wins over persisted values.
        if !is_arg_explicitly_set(&matches, "source") {
            if let Some(v) = last.source {
                settings.source = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "format") {
            if let Some(v) = last.format {
                settings.format = v;
            }
        }

        settings = Self::apply_debug_flag(settings);

        let params = LastUsedParams::from(&settings);
        if let Err(e) = params.save_to(config_path) {
            problems.push(e);
        }

        (settings, problems)
    }

    /// `--debug` overrides the log level.
    fn apply_debug_flag(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    pub fn wants_json(&self) -> bool {
        self.format == "json"
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            source: Some(s.source.clone()),
            format: Some(s.format.clone()),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tmp_config_path(tmp: &TempDir) -> PathBuf {
        LastUsedParams::config_path_in(tmp.path())
    }

    #[test]
    fn test_last_used_params_save_load() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        let params = LastUsedParams {
            source: Some("/data/day.csv".to_string()),
            format: Some("json".to_string()),
        };
        params.save_to(&path).expect("save");

        let loaded = LastUsedParams::load_from(&path).expect("load");
        assert_eq!(loaded.source, Some("/data/day.csv".to_string()));
        assert_eq!(loaded.format, Some("json".to_string()));
    }

    #[test]
    fn test_last_used_params_default_when_missing() {
        let tmp = TempDir::new().expect("tempdir");
        let loaded = LastUsedParams::load_from(&tmp_config_path(&tmp)).expect("load");
        assert!(loaded.source.is_none());
        assert!(loaded.format.is_none());
    }

    #[test]
    fn test_last_used_params_corrupt_is_config_error() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();

        let err = LastUsedParams::load_from(&path).unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)), "got {err:?}");
    }

    #[test]
    fn test_last_used_params_directory_is_io_error() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        std::fs::create_dir_all(&path).unwrap();

        let err = LastUsedParams::load_from(&path).unwrap_err();
        assert!(matches!(err, DashboardError::Io(_)), "got {err:?}");
    }

    #[test]
    fn test_load_with_last_used_returns_corrupt_file_problem() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        std::fs::create_dir_all(config_path.parent().unwrap()).unwrap();
        std::fs::write(&config_path, "{not json").unwrap();

        let (settings, problems) =
            Settings::load_with_last_used_impl(vec!["bikeshare-dashboard".into()], &config_path);

        assert_eq!(settings.source, DEFAULT_SOURCE);
        assert_eq!(problems.len(), 1);
        assert!(matches!(problems[0], DashboardError::Config(_)));
        // The run still rewrites a valid file.
        let reloaded = LastUsedParams::load_from(&config_path).expect("load");
        assert_eq!(reloaded.format, Some("text".to_string()));
    }

    #[test]
    fn test_load_with_last_used_returns_save_problem() {
        let tmp = TempDir::new().expect("tempdir");
        // A regular file where the state directory should be.
        std::fs::write(tmp.path().join(STATE_DIR_NAME), "").unwrap();
        let config_path = tmp_config_path(&tmp);

        let (_, problems) =
            Settings::load_with_last_used_impl(vec!["bikeshare-dashboard".into()], &config_path);

        assert!(problems.iter().any(|p| matches!(p, DashboardError::Io(_))));
    }

    #[test]
    fn test_last_used_params_clear() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        LastUsedParams::default().save_to(&path).expect("save");
        assert!(path.exists());

        LastUsedParams::clear_at(&path).expect("clear");
        assert!(!path.exists());
    }

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["bikeshare-dashboard"]);

        assert_eq!(settings.source, DEFAULT_SOURCE);
        assert!(settings.start_date.is_none());
        assert!(settings.end_date.is_none());
        assert_eq!(settings.format, "text");
        assert_eq!(settings.log_level, "INFO");
        assert!(settings.log_file.is_none());
        assert!(!settings.debug);
        assert!(!settings.clear);
        assert!(!settings.wants_json());
    }

    #[test]
    fn test_settings_cli_date_range() {
        let settings = Settings::parse_from([
            "bikeshare-dashboard",
            "--start-date",
            "2011-03-01",
            "--end-date",
            "2011-03-31",
        ]);
        assert_eq!(settings.start_date, NaiveDate::from_ymd_opt(2011, 3, 1));
        assert_eq!(settings.end_date, NaiveDate::from_ymd_opt(2011, 3, 31));
    }

    #[test]
    fn test_settings_cli_rejects_bad_date() {
        let result = Settings::try_parse_from(["bikeshare-dashboard", "--start-date", "March"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_cli_rejects_unknown_format() {
        let result = Settings::try_parse_from(["bikeshare-dashboard", "--format", "xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_with_last_used_merges_persisted_source() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            source: Some("/srv/day.csv".to_string()),
            format: Some("json".to_string()),
        }
        .save_to(&config_path)
        .expect("save");

        let (settings, problems) =
            Settings::load_with_last_used_impl(vec!["bikeshare-dashboard".into()], &config_path);
        assert!(problems.is_empty());
        assert_eq!(settings.source, "/srv/day.csv");
        assert!(settings.wants_json());
    }

    #[test]
    fn test_load_with_last_used_cli_overrides_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            source: Some("/srv/day.csv".to_string()),
            format: Some("json".to_string()),
        }
        .save_to(&config_path)
        .expect("save");

        let (settings, _) = Settings::load_with_last_used_impl(
            vec![
                "bikeshare-dashboard".into(),
                "--format".into(),
                "text".into(),
            ],
            &config_path,
        );
        assert_eq!(settings.format, "text");
        assert_eq!(settings.source, "/srv/day.csv");
    }

    #[test]
    fn test_load_with_last_used_clear_removes_file() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            source: Some("/srv/day.csv".to_string()),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let (settings, _) = Settings::load_with_last_used_impl(
            vec!["bikeshare-dashboard".into(), "--clear".into()],
            &config_path,
        );

        assert!(!config_path.exists(), "file must be gone after --clear");
        assert_eq!(settings.source, DEFAULT_SOURCE);
    }

    #[test]
    fn test_load_with_last_used_debug_overrides_log_level() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let (settings, _) = Settings::load_with_last_used_impl(
            vec!["bikeshare-dashboard".into(), "--debug".into()],
            &config_path,
        );
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_load_with_last_used_persists_after_run() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        Settings::load_with_last_used_impl(
            vec![
                "bikeshare-dashboard".into(),
                "--source".into(),
                "local.csv".into(),
            ],
            &config_path,
        );

        assert!(config_path.exists(), "config file must be persisted after run");
        let loaded = LastUsedParams::load_from(&config_path).expect("load");
        assert_eq!(loaded.source, Some("local.csv".to_string()));
        assert_eq!(loaded.format, Some("text".to_string()));
    }
}
