use std::{env, str::FromStr};

use chrono_tz::Tz;

use crate::history::DEFAULT_HISTORY_LIMIT;

use super::env::{
    ApiConfig, AppConfig, ConfigError, DirectoryConfig, HistoryConfig, InputLimits, LoggingConfig,
};

const DEFAULT_STORE_QUOTA: u64 = 5 * 1024 * 1024;

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api = ApiConfig {
            base_url: env::var("CLASSIFIER_API_URL")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "http://127.0.0.1:8000".to_string()),
            classify_path: env::var("CLASSIFIER_API_PATH")
                .unwrap_or_else(|_| "/api/classify".to_string()),
        };
        api.endpoint()?;

        let directories = DirectoryConfig {
            logs_dir: env::var("LOGS_DIR").unwrap_or_else(|_| "logs".to_string()),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            store_filename: env::var("STORE_FILENAME")
                .unwrap_or_else(|_| "storage.json".to_string()),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        let timezone_name =
            env::var("DISPLAY_TIMEZONE").unwrap_or_else(|_| "America/Sao_Paulo".to_string());
        let timezone = Tz::from_str(&timezone_name)
            .map_err(|_| ConfigError::InvalidTimezone(timezone_name.clone()))?;

        let history = HistoryConfig {
            limit: parse_number("HISTORY_LIMIT")?.unwrap_or(DEFAULT_HISTORY_LIMIT),
            timezone,
        };

        let defaults = InputLimits::default();
        let limits = InputLimits {
            max_file_size: parse_number("MAX_FILE_SIZE")?.unwrap_or(defaults.max_file_size),
            max_chars: parse_number("MAX_CHARS")?.unwrap_or(defaults.max_chars),
            min_text_chars: parse_number("MIN_TEXT_CHARS")?.unwrap_or(defaults.min_text_chars),
        };

        // 0 disables the quota.
        let store_quota_bytes = match parse_number::<u64>("STORE_QUOTA_BYTES")? {
            Some(0) => None,
            Some(bytes) => Some(bytes),
            None => Some(DEFAULT_STORE_QUOTA),
        };

        Ok(Self {
            api,
            directories,
            logging,
            history,
            limits,
            store_quota_bytes,
        })
    }
}

fn parse_number<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
        _ => Ok(None),
    }
}
