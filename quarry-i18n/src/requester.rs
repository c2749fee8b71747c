//! Who a translation is for

use crate::Locale;
use std::sync::Arc;

/// Anything a message can be translated for.
///
/// The locale is read at resolution time, so a requester whose client
/// changes language is picked up by the next translation.
pub trait Requester {
    /// Raw locale string as reported by the client, `None` if the
    /// requester has no locale of its own.
    fn locale(&self) -> Option<String>;
}

/// A connected player and the locale their client last reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    name: String,
    locale: String,
}

impl Player {
    pub fn new(name: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locale: locale.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace the client locale, e.g. after a settings packet.
    pub fn set_locale(&mut self, locale: impl Into<String>) {
        self.locale = locale.into();
    }
}

impl Requester for Player {
    fn locale(&self) -> Option<String> {
        Some(self.locale.clone())
    }
}

/// The server console or any other sender without a locale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsoleSender;

impl Requester for ConsoleSender {
    fn locale(&self) -> Option<String> {
        None
    }
}

impl Requester for Locale {
    fn locale(&self) -> Option<String> {
        Some(self.underscore_tag())
    }
}

impl<T: Requester + ?Sized> Requester for &T {
    fn locale(&self) -> Option<String> {
        (**self).locale()
    }
}

impl<T: Requester + ?Sized> Requester for Arc<T> {
    fn locale(&self) -> Option<String> {
        (**self).locale()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_locale_changes() {
        let mut player = Player::new("Notch", "de_DE");
        assert_eq!(player.locale().as_deref(), Some("de_DE"));

        player.set_locale("en_US");
        assert_eq!(player.locale().as_deref(), Some("en_US"));
        assert_eq!(player.name(), "Notch");
    }

    #[test]
    fn test_console_has_no_locale() {
        assert_eq!(ConsoleSender.locale(), None);
    }

    #[test]
    fn test_shared_requesters() {
        let player: Arc<dyn Requester> = Arc::new(Player::new("jeb_", "sv_SE"));
        assert_eq!(player.locale().as_deref(), Some("sv_SE"));
        assert_eq!((&ConsoleSender).locale(), None);
    }
}
