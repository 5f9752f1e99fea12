use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use listfetch_engine::{FetchSettings, PageEndpoint};
use listfetch_logging::{listfetch_info, LogDestination};
use serde::{Deserialize, Serialize};

use crate::model::StatusFilter;

pub const DEFAULT_CONFIG_FILE: &str = "listfetch.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogTarget {
    File,
    #[default]
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

/// Settings for the terminal browser, stored as RON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub page_param: String,
    pub filter_param: String,
    pub results_field: Option<String>,
    pub empty_on_not_found: bool,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_bytes: u64,
    /// Filter applied on start; `None` lists everything.
    pub filter: Option<StatusFilter>,
    /// Stop after this many pages.
    pub pages: u32,
    pub log: LogTarget,
    pub verbose: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let endpoint = PageEndpoint::default();
        let settings = FetchSettings::default();
        Self {
            base_url: endpoint.base_url,
            page_param: endpoint.page_param,
            filter_param: endpoint.filter_param,
            results_field: endpoint.results_field,
            empty_on_not_found: endpoint.empty_on_not_found,
            connect_timeout_ms: duration_ms(settings.connect_timeout),
            request_timeout_ms: duration_ms(settings.request_timeout),
            max_bytes: settings.max_bytes,
            filter: None,
            pages: 1,
            log: LogTarget::default(),
            verbose: false,
        }
    }
}

impl AppConfig {
    pub fn endpoint(&self) -> PageEndpoint {
        PageEndpoint {
            base_url: self.base_url.clone(),
            page_param: self.page_param.clone(),
            filter_param: self.filter_param.clone(),
            results_field: self.results_field.clone(),
            empty_on_not_found: self.empty_on_not_found,
        }
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            max_bytes: self.max_bytes,
        }
    }
}

/// Loads the config at `path`; a missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Ok(AppConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    listfetch_info!("Loaded config from {:?}", path);
    Ok(config)
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
