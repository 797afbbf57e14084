//! Runtime settings, read from `config.toml`, the environment and `.env`.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::Result;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Path (or URL) of the SQLite database.
    pub database_url: String,
    /// Where the CLI keeps the token of the signed-in session.
    pub session_file: PathBuf,
}

impl Settings {
    /// Loads settings from an optional `config.toml` and `ATTENDANCE_*` variables.
    ///
    /// `DATABASE_URL`, from the environment or a `.env` file, overrides the
    /// configured database.
    pub fn load() -> Result<Self> {
        Self::load_from("config")
    }

    pub fn load_from(config_name: &str) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut builder = Config::builder()
            .set_default("database_url", "attendance.db")?
            .set_default("session_file", ".attendance-session")?
            .add_source(File::with_name(config_name).required(false))
            .add_source(Environment::with_prefix("ATTENDANCE"));

        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database_url", database_url)?;
        }

        Ok(builder.build()?.try_deserialize()?)
    }
}
