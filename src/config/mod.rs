//! # Configuration Management
//!
//! Settings for the `certwriter` binary, read from environment variables
//! (optionally seeded from a `.env` file) and overridden by CLI flags.
//!
//! | Variable                | Default     |
//! |-------------------------|-------------|
//! | `CERTWRITER_NAMESPACE`  | `default`   |
//! | `CERTWRITER_NAME`       | `webhook-server-cert` |
//! | `CERTWRITER_DNS_NAME`   | unset       |
//! | `CERTWRITER_STORE_DIR`  | `./certs`   |
//! | `CERTWRITER_DRY_RUN`    | `false`     |
//! | `CERTWRITER_LOG_JSON`   | `false`     |

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::certs::RecordIdentifier;
use crate::Result;

const DEFAULT_NAMESPACE: &str = "default";
const DEFAULT_NAME: &str = "webhook-server-cert";
const DEFAULT_STORE_DIR: &str = "./certs";

/// Settings for one provisioning target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct WriterSettings {
    #[validate(length(min = 1, message = "Namespace cannot be empty"))]
    pub namespace: String,

    #[validate(length(min = 1, message = "Record name cannot be empty"))]
    pub name: String,

    /// DNS name the serving certificate is issued for.
    pub dns_name: Option<String>,

    /// Root directory of the file-backed record store.
    pub store_dir: PathBuf,

    pub dry_run: bool,

    /// Emit logs as JSON lines.
    pub log_json: bool,
}

impl Default for WriterSettings {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            name: DEFAULT_NAME.to_string(),
            dns_name: None,
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
            dry_run: false,
            log_json: false,
        }
    }
}

impl WriterSettings {
    /// Load settings from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through `lookup`, falling back to defaults for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let value = |key: &str| {
            lookup(key).map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
        };

        let settings = Self {
            namespace: value("CERTWRITER_NAMESPACE").unwrap_or(defaults.namespace),
            name: value("CERTWRITER_NAME").unwrap_or(defaults.name),
            dns_name: value("CERTWRITER_DNS_NAME"),
            store_dir: value("CERTWRITER_STORE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_dir),
            dry_run: value("CERTWRITER_DRY_RUN").map(|v| parse_flag(&v)).unwrap_or(false),
            log_json: value("CERTWRITER_LOG_JSON").map(|v| parse_flag(&v)).unwrap_or(false),
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Validate field constraints.
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self)?;
        Ok(())
    }

    /// Identifier of the record these settings point at.
    pub fn identifier(&self) -> RecordIdentifier {
        RecordIdentifier::new(&self.namespace, &self.name)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
