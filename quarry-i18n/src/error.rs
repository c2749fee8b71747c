//! Error types for locale loading and translation

use thiserror::Error;

/// Errors raised by the locale manager, loaders and configuration.
#[derive(Debug, Error)]
pub enum I18nError {
    /// A caller passed something unusable (empty loader, bad descriptor,
    /// default locale before anything was loaded)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The manager is not ready for the requested operation
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// No entry for the key in the effective or default locale
    #[error("Resource not loaded: {key} for locale {locale}")]
    ResourceNotLoaded { key: String, locale: String },

    /// The manager was cleaned up and must be rebuilt
    #[error("Locale manager has been cleaned up")]
    NullState,

    /// No loader registered under the requested name
    #[error("No resource loader registered as: {0}")]
    LoaderNotFound(String),

    /// Malformed locale identifier
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),

    /// A loader could not make sense of its source
    #[error("Failed to parse resource: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl I18nError {
    /// Whether the error means the key simply has no translation.
    pub fn is_missing_resource(&self) -> bool {
        matches!(self, I18nError::ResourceNotLoaded { .. })
    }
}
