//! Player settings events
//!
//! Clients resend their settings (language, chat visibility, render
//! distance) whenever the player changes them in the options screen.

use crate::event::{Event, EventMetadata};
use chrono::{DateTime, Utc};
use quarry_i18n::Locale;
use serde::{Deserialize, Serialize};
use std::any::Any;
use uuid::Uuid;

/// Which chat messages the client wants to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatMode {
    Enabled,
    CommandsOnly,
    Hidden,
}

impl ChatMode {
    /// Decode the client's numeric chat mode; unknown codes give `None`.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(ChatMode::Enabled),
            1 => Some(ChatMode::CommandsOnly),
            2 => Some(ChatMode::Hidden),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            ChatMode::Enabled => 0,
            ChatMode::CommandsOnly => 1,
            ChatMode::Hidden => 2,
        }
    }
}

/// Published once per settings update received from a player's client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSettingsChangeEvent {
    metadata: EventMetadata,
    player_id: Uuid,
    player_name: String,
    new_locale: Option<Locale>,
    new_chat_mode: Option<ChatMode>,
    new_view_distance: u8,
}

impl PlayerSettingsChangeEvent {
    pub const NAME: &'static str = "player_settings_change";

    pub fn new(
        player_id: Uuid,
        player_name: impl Into<String>,
        new_locale: Option<Locale>,
        new_chat_mode: Option<ChatMode>,
        new_view_distance: u8,
    ) -> Self {
        Self {
            metadata: EventMetadata::new(Self::NAME),
            player_id,
            player_name: player_name.into(),
            new_locale,
            new_chat_mode,
            new_view_distance,
        }
    }

    /// Build from raw client values. A locale string that does not parse
    /// and an unknown chat code both become `None`.
    pub fn from_client(
        player_id: Uuid,
        player_name: impl Into<String>,
        raw_locale: &str,
        chat_mode: i32,
        view_distance: u8,
    ) -> Self {
        Self::new(
            player_id,
            player_name,
            Locale::parse(raw_locale).ok(),
            ChatMode::from_code(chat_mode),
            view_distance,
        )
    }

    pub fn player_id(&self) -> Uuid {
        self.player_id
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// The locale selected in the client, `None` if it was not recognised.
    pub fn new_locale(&self) -> Option<&Locale> {
        self.new_locale.as_ref()
    }

    pub fn new_chat_mode(&self) -> Option<ChatMode> {
        self.new_chat_mode
    }

    /// Render distance in chunks.
    pub fn new_view_distance(&self) -> u8 {
        self.new_view_distance
    }
}

impl Event for PlayerSettingsChangeEvent {
    fn event_name(&self) -> &str {
        &self.metadata.name
    }

    fn event_id(&self) -> Uuid {
        self.metadata.id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.metadata.timestamp
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
