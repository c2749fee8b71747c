//! Locale Manager
//!
//! Owns the registered loaders, the resource table and the default locale,
//! and resolves translation keys for requesters.
//!
//! # Resolution
//!
//! 1. Without a default locale, translation fails with `IllegalState`.
//! 2. The effective locale is the requester's locale when it parses and has
//!    entries loaded (optionally through its language-only table), else the
//!    default locale.
//! 3. A key missing from the effective locale is retried in the default
//!    locale before failing with `ResourceNotLoaded`.
//!
//! # Lifecycle
//!
//! [`LocaleManager::cleanup`] drops all state. Every later operation,
//! `reload` included, fails with [`I18nError::NullState`]; build a new
//! manager instead.

use crate::loader::{Entries, ResourceLoader};
use crate::table::ResourceTable;
use crate::{I18nError, Locale, LocaleConfig, Requester, Result};
use parking_lot::RwLock;
use quarry_log::{debug, info, trace, warn};
use std::collections::HashMap;
use std::sync::Arc;

const LOG_TARGET: &str = "quarry::i18n";

/// A successful load, kept so `reload` can replay it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LoadRecord {
    locale: Locale,
    loader: String,
    source: String,
}

struct ManagerState {
    loaders: HashMap<String, Arc<dyn ResourceLoader>>,
    table: ResourceTable,
    history: Vec<LoadRecord>,
    /// Bumped whenever `history` or `loaders` change
    revision: u64,
    default_locale: Option<Locale>,
    language_fallback: bool,
}

impl ManagerState {
    fn loader(&self, name: &str) -> Result<Arc<dyn ResourceLoader>> {
        self.loaders
            .get(name)
            .cloned()
            .ok_or_else(|| I18nError::LoaderNotFound(name.to_string()))
    }

    fn effective_locale<'a, R: Requester + ?Sized>(
        &'a self,
        requester: &R,
        requested: &'a mut Option<Locale>,
        default: &'a Locale,
    ) -> &'a Locale {
        let Some(raw) = requester.locale() else {
            return default;
        };
        match Locale::parse(&raw) {
            Ok(locale) => {
                let locale: &'a Locale = requested.insert(locale);
                self.table
                    .best_match(locale, self.language_fallback)
                    .unwrap_or(default)
            }
            Err(_) => {
                trace!(target: LOG_TARGET, "Unrecognised requester locale {:?}, using default", raw);
                default
            }
        }
    }
}

/// Thread-safe registry of loaders and translations.
///
/// Clones share state. Translations take a read lock. Loads and reloads
/// read sources without holding any lock and only take the write lock to
/// install the result.
///
/// ```
/// use quarry_i18n::{ConsoleSender, InMemoryResourceLoader, Locale, LocaleManager};
/// use std::sync::Arc;
///
/// let manager = LocaleManager::new();
/// manager.register_loader(Arc::new(InMemoryResourceLoader::new()))?;
/// manager.load(&Locale::en_us(), "Hello there:inmemory")?;
/// manager.set_default_locale(Locale::en_us())?;
///
/// assert_eq!(manager.translate(&ConsoleSender, "test")?, "Hello there");
/// # Ok::<(), quarry_i18n::I18nError>(())
/// ```
#[derive(Clone)]
pub struct LocaleManager {
    state: Arc<RwLock<Option<ManagerState>>>,
}

impl std::fmt::Debug for LocaleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        match state.as_ref() {
            Some(state) => f
                .debug_struct("LocaleManager")
                .field("loaders", &state.loaders.keys().collect::<Vec<_>>())
                .field("locales", &state.table.locales())
                .field("default_locale", &state.default_locale)
                .finish_non_exhaustive(),
            None => f.write_str("LocaleManager(cleaned up)"),
        }
    }
}

impl LocaleManager {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> LocaleManagerBuilder {
        LocaleManagerBuilder::default()
    }

    /// Build a manager from configuration.
    ///
    /// Registers `loaders`, loads every configured source in order and
    /// finally applies the configured default locale.
    pub fn from_config(
        config: &LocaleConfig,
        loaders: impl IntoIterator<Item = Arc<dyn ResourceLoader>>,
    ) -> Result<Self> {
        let manager = Self::builder()
            .language_fallback(config.language_fallback)
            .build();
        for loader in loaders {
            manager.register_loader(loader)?;
        }
        for source in &config.sources {
            manager.load_with(&source.locale, &source.loader, &source.source)?;
        }
        if let Some(default) = &config.default_locale {
            manager.set_default_locale(default.clone())?;
        }
        Ok(manager)
    }

    // ========================================================================
    // Loaders
    // ========================================================================

    /// Register a loader under its name.
    ///
    /// A loader with an empty name is rejected. Registering a second loader
    /// with the same name replaces the first.
    pub fn register_loader(&self, loader: Arc<dyn ResourceLoader>) -> Result<()> {
        let name = loader.name().trim().to_string();
        if name.is_empty() {
            return Err(I18nError::InvalidArgument(
                "resource loader has no name".to_string(),
            ));
        }

        let mut guard = self.state.write();
        let state = guard.as_mut().ok_or(I18nError::NullState)?;
        state.revision += 1;
        if state.loaders.insert(name.clone(), loader).is_some() {
            warn!(target: LOG_TARGET, "Replaced resource loader '{}'", name);
        } else {
            debug!(target: LOG_TARGET, "Registered resource loader '{}'", name);
        }
        Ok(())
    }

    /// Names of the registered loaders, sorted.
    pub fn loader_names(&self) -> Result<Vec<String>> {
        let guard = self.state.read();
        let state = guard.as_ref().ok_or(I18nError::NullState)?;
        let mut names: Vec<String> = state.loaders.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Load from a `"<source>:<loader>"` descriptor.
    ///
    /// The descriptor is split at its last `:`, so sources may themselves
    /// contain colons. Returns the number of keys `locale` now holds.
    pub fn load(&self, locale: &Locale, descriptor: &str) -> Result<usize> {
        let (source, loader) = descriptor.rsplit_once(':').ok_or_else(|| {
            I18nError::InvalidArgument(format!(
                "descriptor {:?} does not name a loader",
                descriptor
            ))
        })?;
        let loader = loader.trim();
        if loader.is_empty() {
            return Err(I18nError::InvalidArgument(format!(
                "descriptor {:?} does not name a loader",
                descriptor
            )));
        }
        self.load_with(locale, loader, source)
    }

    /// Load `source` for `locale` through the loader registered as `loader`.
    pub fn load_with(&self, locale: &Locale, loader: &str, source: &str) -> Result<usize> {
        // Parse outside the write lock so translations keep flowing while
        // files are read.
        let resource_loader = {
            let guard = self.state.read();
            guard.as_ref().ok_or(I18nError::NullState)?.loader(loader)?
        };
        let entries = resource_loader.parse(locale, source)?;
        let added = entries.len();

        let mut guard = self.state.write();
        let state = guard.as_mut().ok_or(I18nError::NullState)?;
        let total = state.table.merge(locale, entries);

        // A repeated load moves to the end of the replay order.
        let record = LoadRecord {
            locale: locale.clone(),
            loader: loader.to_string(),
            source: source.to_string(),
        };
        state.history.retain(|existing| *existing != record);
        state.history.push(record);
        state.revision += 1;

        debug!(
            target: LOG_TARGET,
            "Loaded {} entries for {} via '{}' ({} total)", added, locale, loader, total
        );
        Ok(total)
    }

    /// Rebuild the table by replaying every successful load in order.
    ///
    /// Sources are read without holding the lock, so translations keep
    /// being served from the old table. The new table replaces it only if
    /// every replay succeeds. A load or loader registration that lands
    /// mid-reload causes another replay pass.
    pub fn reload(&self) -> Result<()> {
        loop {
            let (replay, revision) = {
                let guard = self.state.read();
                let state = guard.as_ref().ok_or(I18nError::NullState)?;
                let replay = state
                    .history
                    .iter()
                    .map(|record| -> Result<_> {
                        Ok((record.clone(), state.loader(&record.loader)?))
                    })
                    .collect::<Result<Vec<_>>>()?;
                (replay, state.revision)
            };

            let mut table = ResourceTable::new();
            for (record, loader) in &replay {
                let entries: Entries = loader.parse(&record.locale, &record.source)?;
                table.merge(&record.locale, entries);
            }

            let mut guard = self.state.write();
            let state = guard.as_mut().ok_or(I18nError::NullState)?;
            if state.revision != revision {
                debug!(target: LOG_TARGET, "Sources changed during reload, replaying again");
                continue;
            }

            info!(
                target: LOG_TARGET,
                "Reloaded {} sources ({} entries across {} locales)",
                replay.len(),
                table.len(),
                table.locales().len()
            );
            state.table = table;
            return Ok(());
        }
    }

    // ========================================================================
    // Default locale
    // ========================================================================

    /// Designate the fallback locale.
    ///
    /// Fails while nothing has been loaded yet.
    pub fn set_default_locale(&self, locale: Locale) -> Result<()> {
        let mut guard = self.state.write();
        let state = guard.as_mut().ok_or(I18nError::NullState)?;
        if state.table.is_empty() {
            return Err(I18nError::InvalidArgument(format!(
                "cannot use {} as default locale before any resource is loaded",
                locale
            )));
        }
        if !state.table.has_entries(&locale) {
            warn!(target: LOG_TARGET, "Default locale {} has no entries loaded", locale);
        }

        info!(target: LOG_TARGET, "Default locale set to {}", locale);
        state.default_locale = Some(locale);
        Ok(())
    }

    pub fn default_locale(&self) -> Result<Option<Locale>> {
        let guard = self.state.read();
        Ok(guard.as_ref().ok_or(I18nError::NullState)?.default_locale.clone())
    }

    // ========================================================================
    // Translation
    // ========================================================================

    /// Resolve `key` for `requester`.
    pub fn translate<R: Requester + ?Sized>(&self, requester: &R, key: &str) -> Result<String> {
        let guard = self.state.read();
        let state = guard.as_ref().ok_or(I18nError::NullState)?;
        let default = state.default_locale.as_ref().ok_or_else(|| {
            I18nError::IllegalState("no default locale has been set".to_string())
        })?;

        let mut requested = None;
        let effective = state.effective_locale(requester, &mut requested, default);

        if let Some(value) = state.table.get(effective, key) {
            return Ok(value.to_string());
        }
        if effective != default {
            if let Some(value) = state.table.get(default, key) {
                trace!(
                    target: LOG_TARGET,
                    "Key '{}' missing for {}, served from default {}", key, effective, default
                );
                return Ok(value.to_string());
            }
        }

        Err(I18nError::ResourceNotLoaded {
            key: key.to_string(),
            locale: effective.underscore_tag(),
        })
    }

    /// Resolve `key` for an explicit locale.
    pub fn translate_for(&self, locale: &Locale, key: &str) -> Result<String> {
        self.translate(locale, key)
    }

    /// Resolve `key` and replace `{name}` placeholders.
    pub fn translate_args<R: Requester + ?Sized>(
        &self,
        requester: &R,
        key: &str,
        args: &[(&str, &str)],
    ) -> Result<String> {
        let mut message = self.translate(requester, key)?;
        for (name, value) in args {
            message = message.replace(&format!("{{{}}}", name), value);
        }
        Ok(message)
    }

    /// Whether `locale` itself holds `key` (no fallback).
    pub fn has(&self, locale: &Locale, key: &str) -> Result<bool> {
        let guard = self.state.read();
        let state = guard.as_ref().ok_or(I18nError::NullState)?;
        Ok(state.table.get(locale, key).is_some())
    }

    /// Locales with loaded entries, sorted.
    pub fn loaded_locales(&self) -> Result<Vec<Locale>> {
        let guard = self.state.read();
        let state = guard.as_ref().ok_or(I18nError::NullState)?;
        Ok(state.table.locales())
    }

    // ========================================================================
    // Cleanup
    // ========================================================================

    /// Drop loaders, table, history and default locale.
    ///
    /// The manager is unusable afterwards.
    pub fn cleanup(&self) {
        if self.state.write().take().is_some() {
            info!(target: LOG_TARGET, "Locale manager cleaned up");
        }
    }

    pub fn is_cleaned_up(&self) -> bool {
        self.state.read().is_none()
    }
}

impl Default for LocaleManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Construction-time options for a [`LocaleManager`].
#[derive(Debug, Clone)]
pub struct LocaleManagerBuilder {
    language_fallback: bool,
}

impl Default for LocaleManagerBuilder {
    fn default() -> Self {
        Self {
            language_fallback: true,
        }
    }
}

impl LocaleManagerBuilder {
    /// Let `de_AT` match a loaded `de` table. Enabled by default.
    pub fn language_fallback(mut self, enabled: bool) -> Self {
        self.language_fallback = enabled;
        self
    }

    pub fn build(self) -> LocaleManager {
        quarry_log::init();
        LocaleManager {
            state: Arc::new(RwLock::new(Some(ManagerState {
                loaders: HashMap::new(),
                table: ResourceTable::new(),
                history: Vec::new(),
                revision: 0,
                default_locale: None,
                language_fallback: self.language_fallback,
            }))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConsoleSender, InMemoryResourceLoader, Player};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const EN: &str = "This is a in Memory Test";
    const DE: &str = "Dies ist ein RAM Test";

    fn manager_with_en() -> LocaleManager {
        let manager = LocaleManager::new();
        manager
            .register_loader(Arc::new(InMemoryResourceLoader::new()))
            .unwrap();
        manager
            .register_loader(Arc::new(InMemoryResourceLoader::pairs()))
            .unwrap();
        manager
            .load(&Locale::en_us(), &format!("{}:inmemory", EN))
            .unwrap();
        manager.set_default_locale(Locale::en_us()).unwrap();
        manager
    }

    fn manager_with_en_de() -> LocaleManager {
        let manager = manager_with_en();
        manager
            .load(&Locale::de_de(), &format!("{}:inmemory", DE))
            .unwrap();
        manager
    }

    struct NamelessLoader;

    impl ResourceLoader for NamelessLoader {
        fn name(&self) -> &str {
            "  "
        }

        fn parse(&self, _locale: &Locale, _source: &str) -> Result<Entries> {
            Ok(Entries::new())
        }
    }

    /// Counts parses so reload replays can be observed.
    struct CountingLoader(Arc<AtomicUsize>);

    impl ResourceLoader for CountingLoader {
        fn name(&self) -> &str {
            "counting"
        }

        fn parse(&self, _locale: &Locale, source: &str) -> Result<Entries> {
            let n = self.0.fetch_add(1, Ordering::SeqCst);
            Ok(Entries::from([(source.to_string(), format!("v{}", n))]))
        }
    }

    #[test]
    fn test_set_default_without_loading() {
        let manager = LocaleManager::new();
        assert!(matches!(
            manager.set_default_locale(Locale::en_us()),
            Err(I18nError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_register_nameless_loader() {
        let manager = LocaleManager::new();
        assert!(matches!(
            manager.register_loader(Arc::new(NamelessLoader)),
            Err(I18nError::InvalidArgument(_))
        ));
        assert!(manager.loader_names().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_loader_replaces() {
        let manager = LocaleManager::new();
        manager
            .register_loader(Arc::new(InMemoryResourceLoader::new()))
            .unwrap();
        manager
            .register_loader(Arc::new(InMemoryResourceLoader::with_key("motd")))
            .unwrap();
        assert_eq!(manager.loader_names().unwrap(), vec!["inmemory"]);

        manager.load(&Locale::en_us(), "Hi:inmemory").unwrap();
        assert!(manager.has(&Locale::en_us(), "motd").unwrap());
    }

    #[test]
    fn test_translate_for_console() {
        let manager = manager_with_en();
        assert_eq!(manager.translate(&ConsoleSender, "test").unwrap(), EN);
    }

    #[test]
    fn test_translate_missing_key() {
        let manager = manager_with_en();
        let err = manager.translate(&ConsoleSender, "test1").unwrap_err();
        assert!(err.is_missing_resource());
    }

    #[test]
    fn test_translate_without_default() {
        let manager = LocaleManager::new();
        manager
            .register_loader(Arc::new(InMemoryResourceLoader::new()))
            .unwrap();
        manager.load(&Locale::en_us(), "x:inmemory").unwrap();
        assert!(matches!(
            manager.translate(&ConsoleSender, "test"),
            Err(I18nError::IllegalState(_))
        ));
    }

    #[test]
    fn test_player_locale_and_switching() {
        let manager = manager_with_en_de();
        let mut player = Player::new("Dinnerbone", "de_DE");
        assert_eq!(manager.translate(&player, "test").unwrap(), DE);

        player.set_locale("en_US");
        assert_eq!(manager.translate(&player, "test").unwrap(), EN);

        player.set_locale("cy_CZ");
        assert_eq!(manager.translate(&player, "test").unwrap(), EN);

        player.set_locale("no locale at all");
        assert_eq!(manager.translate(&player, "test").unwrap(), EN);
    }

    #[test]
    fn test_player_missing_key() {
        let manager = manager_with_en_de();
        let player = Player::new("Grumm", "de_DE");
        assert!(matches!(
            manager.translate(&player, "test1"),
            Err(I18nError::ResourceNotLoaded { ref locale, .. }) if locale == "de_DE"
        ));
    }

    #[test]
    fn test_fallback_to_default_for_missing_key() {
        let manager = manager_with_en_de();
        manager
            .load(&Locale::en_us(), "only.english = Only English:inmemory-pairs")
            .unwrap();

        let player = Player::new("Grumm", "de_DE");
        assert_eq!(
            manager.translate(&player, "only.english").unwrap(),
            manager.translate_for(&Locale::en_us(), "only.english").unwrap()
        );
    }

    #[test]
    fn test_language_fallback() {
        let manager = manager_with_en();
        manager.load(&Locale::de(), "Sprache:inmemory").unwrap();
        let austrian = Player::new("Sepp", "de_AT");
        assert_eq!(manager.translate(&austrian, "test").unwrap(), "Sprache");

        let strict = LocaleManager::builder().language_fallback(false).build();
        strict
            .register_loader(Arc::new(InMemoryResourceLoader::new()))
            .unwrap();
        strict.load(&Locale::en_us(), &format!("{}:inmemory", EN)).unwrap();
        strict.load(&Locale::de(), "Sprache:inmemory").unwrap();
        strict.set_default_locale(Locale::en_us()).unwrap();
        assert_eq!(strict.translate(&austrian, "test").unwrap(), EN);

        // Building a strict manager leaves existing ones and their clones alone
        let clone = manager.clone();
        assert_eq!(manager.translate(&austrian, "test").unwrap(), "Sprache");
        assert_eq!(clone.translate(&austrian, "test").unwrap(), "Sprache");
    }

    #[test]
    fn test_value_containing_equals_sign() {
        let manager = LocaleManager::new();
        manager
            .register_loader(Arc::new(InMemoryResourceLoader::new()))
            .unwrap();
        assert_eq!(
            manager
                .load(&Locale::en_us(), "Set view-distance=12 in options:inmemory")
                .unwrap(),
            1
        );
        manager.load(&Locale::de_de(), "=x:inmemory").unwrap();
        manager.set_default_locale(Locale::en_us()).unwrap();

        assert_eq!(
            manager.translate(&ConsoleSender, "test").unwrap(),
            "Set view-distance=12 in options"
        );
        assert_eq!(manager.translate_for(&Locale::de_de(), "test").unwrap(), "=x");
    }

    #[test]
    fn test_load_is_idempotent() {
        let manager = manager_with_en();
        manager.load(&Locale::en_us(), &format!("{}:inmemory", EN)).unwrap();
        assert_eq!(manager.translate(&ConsoleSender, "test").unwrap(), EN);
    }

    #[test]
    fn test_load_errors() {
        let manager = manager_with_en();
        assert!(matches!(
            manager.load(&Locale::en_us(), "value:yaml"),
            Err(I18nError::LoaderNotFound(name)) if name == "yaml"
        ));
        assert!(matches!(
            manager.load(&Locale::en_us(), "no loader here"),
            Err(I18nError::InvalidArgument(_))
        ));
        assert!(matches!(
            manager.load(&Locale::en_us(), "value:"),
            Err(I18nError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_descriptor_splits_at_last_colon() {
        let manager = manager_with_en();
        manager
            .load(&Locale::fr_fr(), "Note : ceci est un test:inmemory")
            .unwrap();
        assert_eq!(
            manager.translate_for(&Locale::fr_fr(), "test").unwrap(),
            "Note : ceci est un test"
        );
    }

    #[test]
    fn test_translate_args() {
        let manager = manager_with_en();
        manager
            .load(&Locale::en_us(), "welcome = Welcome, {player}!:inmemory-pairs")
            .unwrap();
        let msg = manager
            .translate_args(&ConsoleSender, "welcome", &[("player", "Alex")])
            .unwrap();
        assert_eq!(msg, "Welcome, Alex!");
    }

    #[test]
    fn test_reload_replays_history() {
        let parses = Arc::new(AtomicUsize::new(0));
        let manager = LocaleManager::new();
        manager
            .register_loader(Arc::new(CountingLoader(parses.clone())))
            .unwrap();
        manager.load_with(&Locale::en_us(), "counting", "a").unwrap();
        manager.load_with(&Locale::de_de(), "counting", "b").unwrap();
        manager.set_default_locale(Locale::en_us()).unwrap();
        assert_eq!(manager.translate_for(&Locale::en_us(), "a").unwrap(), "v0");

        manager.reload().unwrap();
        assert_eq!(parses.load(Ordering::SeqCst), 4);
        assert_eq!(manager.translate_for(&Locale::en_us(), "a").unwrap(), "v2");
        assert_eq!(manager.translate_for(&Locale::de_de(), "b").unwrap(), "v3");
        assert_eq!(manager.default_locale().unwrap(), Some(Locale::en_us()));
    }

    #[test]
    fn test_repeated_load_replays_once() {
        let parses = Arc::new(AtomicUsize::new(0));
        let manager = LocaleManager::new();
        manager
            .register_loader(Arc::new(CountingLoader(parses.clone())))
            .unwrap();
        for _ in 0..3 {
            manager.load_with(&Locale::en_us(), "counting", "a").unwrap();
        }
        manager.set_default_locale(Locale::en_us()).unwrap();
        assert_eq!(parses.load(Ordering::SeqCst), 3);

        manager.reload().unwrap();
        assert_eq!(parses.load(Ordering::SeqCst), 4);
        manager.reload().unwrap();
        assert_eq!(parses.load(Ordering::SeqCst), 5);
        assert_eq!(manager.translate(&ConsoleSender, "a").unwrap(), "v4");
    }

    #[test]
    fn test_repeated_load_keeps_latest_order() {
        let manager = manager_with_en();
        manager
            .load(&Locale::en_us(), "test = first:inmemory-pairs")
            .unwrap();
        // Reloading the first payload again must win over the pairs load
        manager.load(&Locale::en_us(), &format!("{}:inmemory", EN)).unwrap();

        manager.reload().unwrap();
        assert_eq!(manager.translate(&ConsoleSender, "test").unwrap(), EN);
    }

    /// Translates through its own manager while parsing.
    struct TranslatingLoader {
        manager: std::sync::OnceLock<LocaleManager>,
        seen: parking_lot::Mutex<Vec<Result<String>>>,
    }

    impl ResourceLoader for TranslatingLoader {
        fn name(&self) -> &str {
            "translating"
        }

        fn parse(&self, _locale: &Locale, source: &str) -> Result<Entries> {
            if let Some(manager) = self.manager.get() {
                self.seen.lock().push(manager.translate(&ConsoleSender, "test"));
            }
            Ok(Entries::from([("test".to_string(), source.to_string())]))
        }
    }

    #[test]
    fn test_translations_served_during_reload() {
        let loader = Arc::new(TranslatingLoader {
            manager: std::sync::OnceLock::new(),
            seen: parking_lot::Mutex::new(Vec::new()),
        });
        let manager = LocaleManager::new();
        manager.register_loader(loader.clone()).unwrap();
        manager.load_with(&Locale::en_us(), "translating", "Before").unwrap();
        manager.set_default_locale(Locale::en_us()).unwrap();
        let _ = loader.manager.set(manager.clone());

        // Would deadlock if sources were read under the write lock
        manager.reload().unwrap();

        let seen = loader.seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].as_deref().unwrap(), "Before");
        drop(seen);
        manager.cleanup();
    }

    #[test]
    fn test_cleanup_then_reload() {
        let manager = manager_with_en_de();
        manager.cleanup();

        assert!(manager.is_cleaned_up());
        assert!(matches!(manager.reload(), Err(I18nError::NullState)));
        assert!(matches!(
            manager.translate(&ConsoleSender, "test"),
            Err(I18nError::NullState)
        ));
        assert!(matches!(
            manager.register_loader(Arc::new(InMemoryResourceLoader::new())),
            Err(I18nError::NullState)
        ));
        assert!(matches!(
            manager.load(&Locale::en_us(), "x:inmemory"),
            Err(I18nError::NullState)
        ));
    }

    #[test]
    fn test_clones_share_state() {
        let manager = manager_with_en();
        let other = manager.clone();
        manager.load(&Locale::de_de(), &format!("{}:inmemory", DE)).unwrap();
        assert_eq!(other.loaded_locales().unwrap(), vec![Locale::de_de(), Locale::en_us()]);

        other.cleanup();
        assert!(manager.is_cleaned_up());
    }

    #[test]
    fn test_concurrent_translation() {
        let manager = manager_with_en_de();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let manager = manager.clone();
                std::thread::spawn(move || {
                    let locale = if i % 2 == 0 { "de_DE" } else { "en_US" };
                    let player = Player::new(format!("p{}", i), locale);
                    for _ in 0..100 {
                        manager.translate(&player, "test").unwrap();
                    }
                })
            })
            .collect();

        manager
            .load(&Locale::fr_fr(), "Ceci est un test:inmemory")
            .unwrap();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(manager.has(&Locale::fr_fr(), "test").unwrap());
    }
}
