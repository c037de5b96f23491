use anyhow::{Context, Result};
use dotenvy::dotenv;
use serde::Deserialize;

/// Configuration for the application
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Database connection URL, not needed in demo mode
    pub database_url: Option<String>,
    /// Email of the connected employee
    #[serde(default = "default_user_email")]
    pub user_email: String,
    /// Directory receipts are written to
    #[serde(default = "default_receipts_dir")]
    pub receipts_dir: String,
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_user_email() -> String {
    "employee@test.tld".to_string()
}

fn default_receipts_dir() -> String {
    "receipts".to_string()
}

fn default_log_file() -> String {
    "billed.log".to_string()
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Variables from a `.env` file are loaded first if it exists.
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    pub fn database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .context("DATABASE_URL must be set unless running with --demo")
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    Config::load()
}
