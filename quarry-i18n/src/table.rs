//! Per-locale translation tables

use crate::Locale;
use crate::loader::Entries;
use std::collections::HashMap;

/// Locale to translation entries.
///
/// Loads for a locale that is already present merge into its entries,
/// overwriting keys that appear again.
#[derive(Debug, Clone, Default)]
pub struct ResourceTable {
    locales: HashMap<Locale, Entries>,
}

impl ResourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `entries` into `locale`, returning how many keys it now holds.
    pub fn merge(&mut self, locale: &Locale, entries: Entries) -> usize {
        let table = self.locales.entry(locale.clone()).or_default();
        table.extend(entries);
        table.len()
    }

    pub fn get(&self, locale: &Locale, key: &str) -> Option<&str> {
        self.locales
            .get(locale)
            .and_then(|entries| entries.get(key))
            .map(String::as_str)
    }

    /// Whether `locale` has at least one entry.
    pub fn has_entries(&self, locale: &Locale) -> bool {
        self.locales.get(locale).is_some_and(|e| !e.is_empty())
    }

    /// Find the loaded locale that best serves `requested`.
    ///
    /// Exact match first; with `language_fallback`, a region-less table of
    /// the same language next (`de_AT` -> `de`).
    pub fn best_match<'a>(&'a self, requested: &'a Locale, language_fallback: bool) -> Option<&'a Locale> {
        if self.has_entries(requested) {
            return Some(requested);
        }
        if language_fallback && requested.region.is_some() {
            let language = requested.language_only();
            return self
                .locales
                .get_key_value(&language)
                .filter(|(_, entries)| !entries.is_empty())
                .map(|(locale, _)| locale);
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        self.locales.values().all(HashMap::is_empty)
    }

    /// Loaded locales in a stable order.
    pub fn locales(&self) -> Vec<Locale> {
        let mut locales: Vec<Locale> = self.locales.keys().cloned().collect();
        locales.sort();
        locales
    }

    /// Total number of entries across all locales.
    pub fn len(&self) -> usize {
        self.locales.values().map(HashMap::len).sum()
    }
}
