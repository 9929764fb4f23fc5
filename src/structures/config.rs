use std::{fs::File, io::BufReader, path::Path, path::PathBuf, time::Duration};

use log::info;
use serde::Deserialize;

use super::errors::DashboardError;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub bind: String,
    pub port: u16,
    /// JSON file written by the monitor; example data is served when unset
    pub status_file: Option<PathBuf>,
    pub poll_interval_secs: u64,
    /// Status endpoint the dashboard polls; defaults to our own
    pub upstream: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8080,
            status_file: None,
            poll_interval_secs: 5,
            upstream: None,
        }
    }
}

impl Config {
    /// Reads the YAML config, falling back to defaults when the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, DashboardError> {
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        info!("Reading config from {}", path.display());
        Ok(serde_yaml::from_reader(BufReader::new(File::open(path)?))?)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    /// Where the poller fetches from: `upstream` if set, else this server's
    /// own endpoint on the bound address (loopback for wildcard binds).
    pub fn upstream_url(&self) -> String {
        if let Some(upstream) = &self.upstream {
            return upstream.clone();
        }
        let host = match self.bind.as_str() {
            "" | "0.0.0.0" | "::" | "[::]" => "127.0.0.1".to_string(),
            h if h.contains(':') && !h.starts_with('[') => format!("[{}]", h),
            h => h.to_string(),
        };
        format!("http://{}:{}/api/status", host, self.port)
    }
}
