//! Locale configuration
//!
//! ```toml
//! default_locale = "en_US"
//! language_fallback = true
//!
//! [[sources]]
//! locale = "en_US"
//! loader = "json"
//! source = "lang/en_US.json"
//! ```

use crate::{I18nError, Locale, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Conventional prefix for [`LocaleConfig::apply_env`].
pub const DEFAULT_ENV_PREFIX: &str = "QUARRY_I18N";

/// One resource to load at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub locale: Locale,
    /// Registered loader name, e.g. `"json"`
    pub loader: String,
    pub source: String,
}

/// Startup configuration for a [`LocaleManager`](crate::LocaleManager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    pub default_locale: Option<Locale>,
    pub language_fallback: bool,
    pub sources: Vec<SourceConfig>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            default_locale: None,
            language_fallback: true,
            sources: Vec::new(),
        }
    }
}

/// Configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "toml" => Some(ConfigFormat::Toml),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }
}

impl LocaleConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read a `.toml` or `.json` file, picking the format by extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ConfigFormat::from_extension)
            .ok_or_else(|| {
                I18nError::InvalidArgument(format!("unsupported config file: {}", path.display()))
            })?;

        let content = fs::read_to_string(path)?;
        match format {
            ConfigFormat::Toml => Self::from_toml_str(&content),
            ConfigFormat::Json => Self::from_json_str(&content),
        }
    }

    /// Override fields from `<PREFIX>_DEFAULT_LOCALE` and
    /// `<PREFIX>_LANGUAGE_FALLBACK`.
    pub fn apply_env(self, prefix: &str) -> Result<Self> {
        self.apply_vars(|name| env::var(format!("{}_{}", prefix, name)).ok())
    }

    fn apply_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(raw) = lookup("DEFAULT_LOCALE") {
            self.default_locale = Some(Locale::parse(&raw)?);
        }
        if let Some(raw) = lookup("LANGUAGE_FALLBACK") {
            self.language_fallback = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(I18nError::InvalidArgument(format!(
                        "LANGUAGE_FALLBACK must be a boolean, got {:?}",
                        other
                    )));
                }
            };
        }
        Ok(self)
    }
}
