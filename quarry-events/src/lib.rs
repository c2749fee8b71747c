//! Events for Quarry plugins
//!
//! An explicit [`EventBus`] plus the [`PlayerSettingsChangeEvent`] that
//! keeps per-player locales current for translation.
//!
//! ```rust,ignore
//! use quarry_events::{EventBus, PlayerLocaleCache, PlayerSettingsChangeEvent};
//! use quarry_i18n::LocaleManager;
//!
//! let bus = EventBus::new();
//! let locales = PlayerLocaleCache::new();
//! locales.attach(&bus);
//!
//! // Network layer, on a client settings packet:
//! bus.publish(PlayerSettingsChangeEvent::from_client(id, "Alex", "de_DE", 0, 12)).await?;
//!
//! // Anywhere a message is sent:
//! let text = manager.translate(&locales.requester(id), "welcome")?;
//! ```

pub mod bus;
pub mod event;
pub mod locale_cache;
pub mod player;

pub use bus::{Delivery, EventBus, EventBusBuilder, EventBusConfig, EventBusError};
pub use event::{DynEventHandler, Event, EventHandler, EventHandlerError, EventMetadata, TypedEventHandler};
pub use locale_cache::{CachedPlayer, LocaleCacheListener, PlayerLocaleCache};
pub use player::{ChatMode, PlayerSettingsChangeEvent};
