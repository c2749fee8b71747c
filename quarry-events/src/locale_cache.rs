//! Per-player locale cache driven by settings events

use crate::bus::EventBus;
use crate::event::{EventHandler, EventHandlerError};
use crate::player::PlayerSettingsChangeEvent;
use async_trait::async_trait;
use dashmap::DashMap;
use quarry_i18n::{Locale, Requester};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Last known locale of each online player.
#[derive(Debug, Clone, Default)]
pub struct PlayerLocaleCache {
    entries: Arc<DashMap<Uuid, Locale>>,
}

impl PlayerLocaleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the cache current from `bus`.
    pub fn attach(&self, bus: &EventBus) {
        bus.listen::<PlayerSettingsChangeEvent, _>(LocaleCacheListener::new(self.clone()));
    }

    pub fn get(&self, player: &Uuid) -> Option<Locale> {
        self.entries.get(player).map(|entry| entry.value().clone())
    }

    pub fn set(&self, player: Uuid, locale: Locale) {
        self.entries.insert(player, locale);
    }

    /// Forget a player, e.g. on quit.
    pub fn remove(&self, player: &Uuid) -> Option<Locale> {
        self.entries.remove(player).map(|(_, locale)| locale)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A [`Requester`] that reads this player's cached locale on every
    /// translation.
    pub fn requester(&self, player: Uuid) -> CachedPlayer {
        CachedPlayer {
            id: player,
            cache: self.clone(),
        }
    }
}

/// Requester view of one player in a [`PlayerLocaleCache`].
///
/// Players without a cached locale translate through the default locale.
#[derive(Debug, Clone)]
pub struct CachedPlayer {
    id: Uuid,
    cache: PlayerLocaleCache,
}

impl CachedPlayer {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Requester for CachedPlayer {
    fn locale(&self) -> Option<String> {
        self.cache.get(&self.id).map(|locale| locale.underscore_tag())
    }
}

/// Applies [`PlayerSettingsChangeEvent`]s to a [`PlayerLocaleCache`].
#[derive(Debug, Clone)]
pub struct LocaleCacheListener {
    cache: PlayerLocaleCache,
}

impl LocaleCacheListener {
    pub fn new(cache: PlayerLocaleCache) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl EventHandler<PlayerSettingsChangeEvent> for LocaleCacheListener {
    async fn handle(&self, event: &PlayerSettingsChangeEvent) -> Result<(), EventHandlerError> {
        match event.new_locale() {
            Some(locale) => {
                debug!(player = event.player_name(), locale = %locale, "Player locale updated");
                self.cache.set(event.player_id(), locale.clone());
            }
            None => {
                debug!(player = event.player_name(), "Unrecognised client locale, clearing cache entry");
                self.cache.remove(&event.player_id());
            }
        }
        Ok(())
    }
}
