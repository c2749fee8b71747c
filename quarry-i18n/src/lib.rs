//! Locale resources and translation for Quarry plugins
//!
//! A [`LocaleManager`] keeps a table of translations per [`Locale`], filled
//! by pluggable [`ResourceLoader`]s, and resolves keys for a [`Requester`]
//! with a fallback to a mandatory default locale.
//!
//! # Quick Start
//!
//! ```rust
//! use quarry_i18n::{InMemoryResourceLoader, Locale, LocaleManager, Player};
//! use std::sync::Arc;
//!
//! let manager = LocaleManager::new();
//! manager.register_loader(Arc::new(InMemoryResourceLoader::new()))?;
//! manager.load(&Locale::en_us(), "This is a test:inmemory")?;
//! manager.load(&Locale::de_de(), "Dies ist ein Test:inmemory")?;
//! manager.set_default_locale(Locale::en_us())?;
//!
//! let mut player = Player::new("Alex", "de_DE");
//! assert_eq!(manager.translate(&player, "test")?, "Dies ist ein Test");
//!
//! // Unknown locales resolve through the default
//! player.set_locale("cy_CZ");
//! assert_eq!(manager.translate(&player, "test")?, "This is a test");
//! # Ok::<(), quarry_i18n::I18nError>(())
//! ```
//!
//! # Loading from files
//!
//! ```rust,ignore
//! use quarry_i18n::{JsonFileLoader, LocaleConfig, LocaleManager, DEFAULT_ENV_PREFIX};
//! use std::sync::Arc;
//!
//! let config = LocaleConfig::from_file("plugins/MyPlugin/locales.toml")?
//!     .apply_env(DEFAULT_ENV_PREFIX)?;
//! let manager = LocaleManager::from_config(
//!     &config,
//!     [Arc::new(JsonFileLoader::with_base_dir("plugins/MyPlugin")) as _],
//! )?;
//! ```

mod config;
mod error;
mod loader;
mod locale;
mod manager;
mod requester;
mod table;

pub use config::{ConfigFormat, DEFAULT_ENV_PREFIX, LocaleConfig, SourceConfig};
pub use error::I18nError;
pub use loader::{
    Entries, InMemoryResourceLoader, JsonFileLoader, PropertiesFileLoader, ResourceLoader,
};
pub use locale::Locale;
pub use manager::{LocaleManager, LocaleManagerBuilder};
pub use requester::{ConsoleSender, Player, Requester};
pub use table::ResourceTable;

/// Result type for i18n operations
pub type Result<T> = std::result::Result<T, I18nError>;

pub mod prelude {
    pub use crate::{
        ConsoleSender, I18nError, InMemoryResourceLoader, Locale, LocaleManager, Player,
        Requester, ResourceLoader, Result,
    };
}
