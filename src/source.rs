//! Backing source for `/api/status`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use actix_web::web;
use log::{debug, warn};
use serde_json::Value;
use time::OffsetDateTime;

use crate::structures::{errors::DashboardError, model::Snapshot};

/// Where the status endpoint gets its snapshot from.
#[derive(Debug, Clone)]
pub enum StatusSource {
    /// Canned data, regenerated on every request
    Example,
    /// JSON file written by the monitor
    File(PathBuf),
}

impl StatusSource {
    pub fn new(status_file: Option<PathBuf>) -> Self {
        match status_file {
            Some(path) => Self::File(path),
            None => Self::Example,
        }
    }

    /// Returns the current snapshot as JSON.
    ///
    /// File contents are forwarded verbatim. Any failure to read or parse
    /// the file degrades to [`Snapshot::fallback`] rather than an error.
    pub async fn load(&self) -> Value {
        match self {
            Self::Example => to_value(&Snapshot::example(OffsetDateTime::now_utc())),
            Self::File(path) => {
                let path = path.clone();
                match web::block(move || read_status_file(&path)).await {
                    Ok(Ok(value)) => value,
                    Ok(Err(e)) => {
                        warn!("Failed to load status file: {}", e);
                        to_value(&Snapshot::fallback())
                    }
                    Err(e) => {
                        warn!("Failed to load status file: {}", DashboardError::from(e));
                        to_value(&Snapshot::fallback())
                    }
                }
            }
        }
    }
}

fn read_status_file(path: &Path) -> Result<Value, DashboardError> {
    debug!("reading status from {}", path.display());
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn to_value(snapshot: &Snapshot) -> Value {
    // Snapshot has only string keys and finite defaults
    serde_json::to_value(snapshot).unwrap_or(Value::Null)
}
