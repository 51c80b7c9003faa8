use std::env;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use chrono::NaiveTime;
use dotenvy::dotenv;

use crate::model::column::{ColumnMode, ColumnSchema};
use crate::rekap::IngestConfig;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub api_prefix: String,
    pub log_dir: String,

    // Recap
    pub rows_per_page: usize,
    pub default_work_start: NaiveTime,
    pub default_work_end: NaiveTime,
    pub column_mode: ColumnMode,
    pub sheet_name: Option<String>,

    // Batch storage
    pub batch_ttl_secs: u64,
    pub batch_capacity: u64,
    pub max_upload_bytes: usize,

    // Rate limiting
    pub rate_upload_per_min: u32,
}

fn var_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    raw.trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("{key} has an invalid value: {raw:?}"))
}

fn time_var(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> Result<NaiveTime> {
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .with_context(|| format!("{key} must be HH:MM, got {raw:?}"))
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key/value source; `from_env` passes the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let rows_per_page: usize = var_or(&lookup, "ROWS_PER_PAGE", "50")?;
        if rows_per_page == 0 {
            bail!("ROWS_PER_PAGE must be greater than zero");
        }

        // the limiter needs at least one millisecond between requests
        let rate_upload_per_min: u32 = var_or(&lookup, "RATE_UPLOAD_PER_MIN", "30")?;
        if rate_upload_per_min > 60_000 {
            bail!("RATE_UPLOAD_PER_MIN must be at most 60000, got {rate_upload_per_min}");
        }

        Ok(Self {
            server_addr: lookup("SERVER_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            api_prefix: lookup("API_PREFIX").unwrap_or_else(|| "/api".to_string()),
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),

            rows_per_page,
            default_work_start: time_var(&lookup, "DEFAULT_WORK_START", "08:00")?,
            default_work_end: time_var(&lookup, "DEFAULT_WORK_END", "17:00")?,
            column_mode: var_or(&lookup, "COLUMN_MODE", "flexible")?,
            sheet_name: lookup("SHEET_NAME").filter(|s| !s.trim().is_empty()),

            batch_ttl_secs: var_or(&lookup, "BATCH_TTL_SECS", "3600")?, // 1h
            batch_capacity: var_or(&lookup, "BATCH_CAPACITY", "64")?,
            max_upload_bytes: var_or(&lookup, "MAX_UPLOAD_BYTES", "10485760")?, // 10 MiB

            rate_upload_per_min,
        })
    }

    pub fn ingest_config(&self) -> IngestConfig {
        IngestConfig {
            schema: ColumnSchema::for_mode(self.column_mode),
            default_start: self.default_work_start,
            default_end: self.default_work_end,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let ingest = IngestConfig::default();
        Self {
            server_addr: "127.0.0.1:8080".to_string(),
            api_prefix: "/api".to_string(),
            log_dir: "logs".to_string(),
            rows_per_page: crate::rekap::paginate::DEFAULT_PER_PAGE,
            default_work_start: ingest.default_start,
            default_work_end: ingest.default_end,
            column_mode: ColumnMode::Flexible,
            sheet_name: None,
            batch_ttl_secs: 3600,
            batch_capacity: 64,
            max_upload_bytes: 10 * 1024 * 1024,
            rate_upload_per_min: 30,
        }
    }
}
