//! Describing an installation source in JSON.
//!
//! ```json
//! {
//!     "address": "dev:///dev/sr0",
//!     "fs_types": ["iso9660", "udf"],
//!     "mount_root": "/run/installer"
//! }
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use mediafs_core::Error;

use crate::factory::{create_accessor, AccessorOptions, AnyAccessor};

/// A serializable description of one accessor.
///
/// Unlike [`AccessorOptions`], `read_only` defaults to `true`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AccessorConfig {
    pub address: String,

    #[serde(default = "default_read_only")]
    pub read_only: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fs_types: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mount_root: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_timeout_secs: Option<u64>,
}

fn default_read_only() -> bool {
    true
}

fn config_error(error: serde_json::Error) -> Error {
    Error::Config {
        message: error.to_string(),
    }
}

impl AccessorConfig {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            read_only: default_read_only(),
            fs_types: None,
            mount_root: None,
            http_timeout_secs: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(config_error)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(config_error)
    }

    pub fn options(&self) -> AccessorOptions {
        AccessorOptions {
            read_only: self.read_only,
            fs_types: self.fs_types.clone(),
            mount_root: self.mount_root.clone(),
            http_timeout: self.http_timeout_secs.map(Duration::from_secs),
            mounter: None,
        }
    }

    pub fn build(&self) -> Result<AnyAccessor, Error> {
        create_accessor(&self.address, &self.options())
    }
}
