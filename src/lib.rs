// Quarry - localization toolkit for Minecraft server plugins
//
// Re-exports the member crates so plugins depend on a single crate.

pub use quarry_i18n::*;

pub use quarry_log as log;

#[cfg(feature = "events")]
pub use quarry_events as events;

/// Set up logging for a plugin process.
///
/// Reads the `QUARRY_*` environment and routes records from the `log`
/// crate through Quarry output. With the `tracing` feature the event bus's
/// `tracing` records are filtered at the same level. Returns `false` if
/// another `log` or `tracing` backend was installed first.
pub fn init_logging() -> bool {
    quarry_log::init();
    let bridged = quarry_log::install_log_bridge().is_ok();

    #[cfg(feature = "tracing")]
    let bridged = quarry_log::tracing_compat::install().is_ok() && bridged;

    bridged
}

// Prelude for common imports
pub mod prelude {
    pub use quarry_i18n::prelude::*;

    #[cfg(feature = "events")]
    pub use quarry_events::{
        ChatMode, EventBus, PlayerLocaleCache, PlayerSettingsChangeEvent,
    };
}
