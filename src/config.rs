use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use std::env;
use std::path::PathBuf;

use crate::civil_clock::{parse_civil_date, CivilClock};

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub metadata_path: PathBuf,
    pub max_upload_mb: u64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub host: String,
    pub data_path: String,
    pub storage: StorageConfig,
    pub utc_offset: FixedOffset,
    pub pinned_today: Option<NaiveDate>,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let data_path = env::var("DAILY_PHOTO_DATA_PATH").unwrap_or_else(|_| "./data".to_string());
        let upload_dir = env::var("DAILY_PHOTO_UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(&data_path).join("uploads"));
        let metadata_path = env::var("DAILY_PHOTO_METADATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| upload_dir.join("metadata.json"));

        let pinned_today = parse_pinned_today(&env::var("DAILY_PHOTO_TODAY").unwrap_or_default())?;

        Ok(Config {
            port: env::var("DAILY_PHOTO_PORT")
                .unwrap_or_else(|_| "18474".to_string())
                .parse()?,
            host: env::var("DAILY_PHOTO_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            data_path,
            storage: StorageConfig {
                upload_dir,
                metadata_path,
                max_upload_mb: env::var("DAILY_PHOTO_MAX_UPLOAD_MB")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()?,
            },
            utc_offset: parse_utc_offset(
                &env::var("DAILY_PHOTO_UTC_OFFSET").unwrap_or_else(|_| "-08:00".to_string()),
            )?,
            pinned_today,
        })
    }

    pub fn clock(&self) -> CivilClock {
        CivilClock::new(self.utc_offset, self.pinned_today)
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.storage.max_upload_mb * 1024 * 1024
    }
}

/// Parses offsets such as `-08:00` or `+05:30`, plus `Z`/`UTC`.
pub fn parse_utc_offset(value: &str) -> Result<FixedOffset, chrono::ParseError> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }
    value.parse()
}

/// An empty value means today follows the clock.
pub fn parse_pinned_today(value: &str) -> Result<Option<NaiveDate>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    parse_civil_date(value)
        .map(Some)
        .ok_or_else(|| format!("DAILY_PHOTO_TODAY must be YYYY-MM-DD: {}", value))
}
