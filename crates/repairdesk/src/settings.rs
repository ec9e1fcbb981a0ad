//! Optional YAML settings.
//!
//! ```yaml
//! company_name: TechRepair Admin
//! default_page_size: 10
//! role: manager
//! ```
//!
//! Missing keys take their defaults. Command-line flags override the file.

use std::fs;
use std::path::{Path, PathBuf};

use repairdesk_export::DEFAULT_COMPANY;
use repairdesk_query::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::auth::Role;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("default_page_size must be at least 1")]
    ZeroPageSize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Shown in report footers.
    pub company_name: String,
    pub default_page_size: usize,
    /// Role the command line acts as.
    pub role: Role,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            company_name: DEFAULT_COMPANY.to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
            role: Role::Admin,
        }
    }
}

impl Settings {
    pub fn from_yaml(text: &str, path: &Path) -> Result<Self, SettingsError> {
        let settings: Settings =
            serde_yaml::from_str(text).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        if settings.default_page_size == 0 {
            return Err(SettingsError::ZeroPageSize);
        }
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Settings::from_yaml(&text, path)?;
        debug!(path = %path.display(), ?settings, "loaded settings");
        Ok(settings)
    }
}
