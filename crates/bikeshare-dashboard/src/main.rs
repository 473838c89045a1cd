mod bootstrap;
mod report;

use anyhow::Result;
use bikeshare_core::settings::Settings;
use bikeshare_runtime::session::DashboardSession;
use bikeshare_runtime::source::DataSource;

use crate::report::Report;

#[tokio::main]
async fn main() -> Result<()> {
    let (settings, config_problems) = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Bike Sharing Dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    for problem in &config_problems {
        tracing::warn!(error = %problem, "last-used params not applied");
    }

    let source = DataSource::parse(&settings.source);
    let session = DashboardSession::load(source).await?;

    let summary = session.summary();
    let filtered = session.filtered(settings.start_date, settings.end_date);
    if filtered.is_none() {
        tracing::warn!("dataset is empty; no date range to filter");
    }

    let location = session.source().location();
    let report = Report {
        source: &location,
        summary: &summary,
        filtered: filtered.as_ref(),
    };

    if settings.wants_json() {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.to_text());
    }

    Ok(())
}
