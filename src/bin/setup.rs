//! Creates the attendance database at the configured location.
//!
//! Safe to run more than once: the schema is only created where it is missing.

use anyhow::Context as _;
use attendance_tracker::db;
use attendance_tracker::settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

pub fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let settings = Settings::load().context("failed to load settings")?;

    db::establish(&settings.database_url)
        .with_context(|| format!("failed to set up {:?}", settings.database_url))?;

    tracing::info!(database_url = %settings.database_url, "database is ready");

    Ok(())
}
