use chrono_tz::Tz;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub directories: DirectoryConfig,
    pub logging: LoggingConfig,
    pub history: HistoryConfig,
    pub limits: InputLimits,
    pub store_quota_bytes: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub classify_path: String,
}

impl ApiConfig {
    /// Joins the base URL and the classify path into the POST target.
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let base = Url::parse(&self.base_url)
            .map_err(|err| ConfigError::InvalidUrl(format!("{}: {err}", self.base_url)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "{}: unsupported scheme {}",
                self.base_url,
                base.scheme()
            )));
        }

        let path = self.classify_path.trim_start_matches('/');
        let mut joined = base.as_str().trim_end_matches('/').to_string();
        joined.push('/');
        joined.push_str(path);
        Url::parse(&joined).map_err(|err| ConfigError::InvalidUrl(format!("{joined}: {err}")))
    }
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub logs_dir: String,
    pub data_dir: String,
    pub store_filename: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone)]
pub struct HistoryConfig {
    pub limit: usize,
    pub timezone: Tz,
}

#[derive(Debug, Clone, Copy)]
pub struct InputLimits {
    pub max_file_size: u64,
    pub max_chars: usize,
    pub min_text_chars: usize,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
            max_chars: 5_000,
            min_text_chars: 10,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid API URL {0}")]
    InvalidUrl(String),
    #[error("unknown time zone: {0}")]
    InvalidTimezone(String),
    #[error("environment variable {key} is not a valid number: {value}")]
    InvalidNumber { key: &'static str, value: String },
}
