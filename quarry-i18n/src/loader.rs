//! Resource loaders
//!
//! A loader turns a source string into translation entries for one locale.
//! The manager looks loaders up by [`ResourceLoader::name`], so the same
//! manager can mix inline strings, JSON files and `.properties` files.

use crate::{I18nError, Locale, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Key to translated string.
pub type Entries = HashMap<String, String>;

/// Pluggable source of translation entries.
pub trait ResourceLoader: Send + Sync {
    /// Identifier used to select this loader, e.g. `"json"`.
    fn name(&self) -> &str;

    /// Parse `source` into entries for `locale`.
    fn parse(&self, locale: &Locale, source: &str) -> Result<Entries>;
}

// ============================================================================
// In-memory
// ============================================================================

/// Loader for inline payloads.
///
/// The whole payload is one translation stored under the loader's key
/// (`"test"` unless changed with [`InMemoryResourceLoader::with_key`]),
/// whatever characters it contains. [`InMemoryResourceLoader::pairs`]
/// builds the multi-entry variant, registered as `"inmemory-pairs"`, which
/// reads `key=value` lines instead.
#[derive(Debug, Clone)]
pub struct InMemoryResourceLoader {
    mode: InlineMode,
}

#[derive(Debug, Clone)]
enum InlineMode {
    Single { key: String },
    Pairs,
}

impl InMemoryResourceLoader {
    pub const NAME: &'static str = "inmemory";
    pub const PAIRS_NAME: &'static str = "inmemory-pairs";
    pub const DEFAULT_KEY: &'static str = "test";

    pub fn new() -> Self {
        Self::with_key(Self::DEFAULT_KEY)
    }

    /// Store payloads under `key`.
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            mode: InlineMode::Single { key: key.into() },
        }
    }

    /// Read payloads as `key=value` lines, skipping blanks and `#` comments.
    pub fn pairs() -> Self {
        Self {
            mode: InlineMode::Pairs,
        }
    }
}

impl Default for InMemoryResourceLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceLoader for InMemoryResourceLoader {
    fn name(&self) -> &str {
        match self.mode {
            InlineMode::Single { .. } => Self::NAME,
            InlineMode::Pairs => Self::PAIRS_NAME,
        }
    }

    fn parse(&self, _locale: &Locale, source: &str) -> Result<Entries> {
        match &self.mode {
            InlineMode::Single { key } => Ok(Entries::from([(key.clone(), source.to_string())])),
            InlineMode::Pairs => {
                let entries = parse_pairs(source, &['=']);
                if entries.is_empty() {
                    return Err(I18nError::ParseError(format!(
                        "no key=value entries in {:?}",
                        source
                    )));
                }
                Ok(entries)
            }
        }
    }
}

// ============================================================================
// Files
// ============================================================================

fn resolve(base_dir: Option<&Path>, source: &str) -> PathBuf {
    let path = Path::new(source);
    match base_dir {
        Some(base) if path.is_relative() => base.join(path),
        _ => path.to_path_buf(),
    }
}

/// Loader for JSON objects on disk.
///
/// Nested objects flatten into dotted keys (`{"menu": {"quit": ".."}}`
/// yields `menu.quit`). Numbers and booleans are kept as their text.
#[derive(Debug, Clone, Default)]
pub struct JsonFileLoader {
    base_dir: Option<PathBuf>,
}

impl JsonFileLoader {
    pub const NAME: &'static str = "json";

    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative sources against `dir` (typically a plugin data folder).
    pub fn with_base_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(dir.into()),
        }
    }

    /// Flatten an already read JSON document.
    pub fn parse_str(content: &str) -> Result<Entries> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        let serde_json::Value::Object(map) = value else {
            return Err(I18nError::ParseError(
                "JSON resource must be an object".to_string(),
            ));
        };

        let mut entries = Entries::new();
        flatten_json("", map, &mut entries);
        Ok(entries)
    }
}

fn flatten_json(prefix: &str, map: serde_json::Map<String, serde_json::Value>, out: &mut Entries) {
    for (key, value) in map {
        let key = if prefix.is_empty() {
            key
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            serde_json::Value::String(s) => {
                out.insert(key, s);
            }
            serde_json::Value::Object(nested) => flatten_json(&key, nested, out),
            serde_json::Value::Number(n) => {
                out.insert(key, n.to_string());
            }
            serde_json::Value::Bool(b) => {
                out.insert(key, b.to_string());
            }
            serde_json::Value::Null | serde_json::Value::Array(_) => {}
        }
    }
}

impl ResourceLoader for JsonFileLoader {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn parse(&self, _locale: &Locale, source: &str) -> Result<Entries> {
        let path = resolve(self.base_dir.as_deref(), source);
        let content = fs::read_to_string(&path)?;
        Self::parse_str(&content)
    }
}

/// Loader for Java-style `.properties` files.
///
/// Supports `key=value` and `key: value`; lines starting with `#` or `!`
/// are comments.
#[derive(Debug, Clone, Default)]
pub struct PropertiesFileLoader {
    base_dir: Option<PathBuf>,
}

impl PropertiesFileLoader {
    pub const NAME: &'static str = "properties";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(dir.into()),
        }
    }

    pub fn parse_str(content: &str) -> Entries {
        parse_pairs(content, &['=', ':'])
    }
}

impl ResourceLoader for PropertiesFileLoader {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn parse(&self, _locale: &Locale, source: &str) -> Result<Entries> {
        let path = resolve(self.base_dir.as_deref(), source);
        let content = fs::read_to_string(&path)?;
        Ok(Self::parse_str(&content))
    }
}

/// Split lines at the first of `separators`, skipping blanks and comments.
fn parse_pairs(content: &str, separators: &[char]) -> Entries {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
        .filter_map(|line| line.split_once(separators))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}
