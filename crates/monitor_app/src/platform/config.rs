use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use engine_logging::engine_info;
use monitor_core::{ClientSettings, DEFAULT_POLL_INTERVAL};
use monitor_engine::FetchSettings;
use serde::Deserialize;
use url::Url;

use super::logging::LogDestination;

pub const CONFIG_FILENAME: &str = "monitor.ron";

/// Host configuration read from `monitor.ron`. Every field is optional in the
/// file; absent fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Location of the dashboard page; status and report urls resolve against it.
    pub base_url: String,
    /// Read the page shell from disk instead of fetching `base_url`.
    pub page_file: Option<PathBuf>,
    pub poll_interval_ms: u64,
    pub output_dir: PathBuf,
    pub snapshot_filename: String,
    pub log_destination: LogDestination,
    pub request_timeout_ms: Option<u64>,
    pub max_response_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9084/".to_string(),
            page_file: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            output_dir: PathBuf::from("./output"),
            snapshot_filename: "dashboard.html".to_string(),
            log_destination: LogDestination::Terminal,
            request_timeout_ms: None,
            max_response_bytes: FetchSettings::default().max_bytes,
        }
    }
}

impl AppConfig {
    /// Loads `path`. A missing file yields the defaults; an unreadable or
    /// malformed one is an error.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read {}", path.display()))
            }
        };
        let config: Self = ron::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        engine_info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn base_url(&self) -> anyhow::Result<Url> {
        Url::parse(&self.base_url).with_context(|| format!("invalid base_url `{}`", self.base_url))
    }

    pub fn client_settings(&self) -> anyhow::Result<ClientSettings> {
        let mut settings = ClientSettings::new(self.base_url()?);
        settings.poll_interval = Duration::from_millis(self.poll_interval_ms);
        Ok(settings)
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            request_timeout: self.request_timeout_ms.map(Duration::from_millis),
            max_bytes: self.max_response_bytes,
            ..FetchSettings::default()
        }
    }
}
