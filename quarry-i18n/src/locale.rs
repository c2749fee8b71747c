//! Locale identifiers
//!
//! Minecraft clients report locales in the `en_us` style while most
//! resource files are named with BCP 47 tags (`en-US`). Both spellings
//! parse to the same [`Locale`], so either can be used as a table key.

use crate::{I18nError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A language with optional script and region.
///
/// Components are normalised on construction (language lowercase, script
/// title case, region uppercase), so derived equality and hashing compare
/// by value.
///
/// ```
/// use quarry_i18n::Locale;
///
/// let client: Locale = "en_us".parse().unwrap();
/// assert_eq!(client, Locale::en_us());
/// assert_eq!(client.tag(), "en-US");
/// assert_eq!(client.underscore_tag(), "en_US");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    /// ISO 639 language code ("en", "de")
    pub language: String,
    /// ISO 15924 script ("Hans")
    pub script: Option<String>,
    /// ISO 3166-1 or UN M.49 region ("US", "419")
    pub region: Option<String>,
}

impl Locale {
    /// Create a locale from a language and optional region.
    pub fn new(language: impl Into<String>, region: Option<impl Into<String>>) -> Self {
        Self {
            language: language.into().to_ascii_lowercase(),
            script: None,
            region: region.map(|r| r.into().to_ascii_uppercase()),
        }
    }

    /// Create a locale with a script subtag.
    pub fn with_script(
        language: impl Into<String>,
        script: impl Into<String>,
        region: Option<impl Into<String>>,
    ) -> Self {
        let mut locale = Self::new(language, region);
        locale.script = Some(title_case(&script.into()));
        locale
    }

    /// Parse `en_US`, `en-US`, `zh-Hans-CN` and friends.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = || I18nError::InvalidLocale(raw.to_string());
        let mut parts = raw.trim().split(['-', '_']);

        let language = parts.next().filter(|l| !l.is_empty()).ok_or_else(invalid)?;
        if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }

        let mut script = None;
        let mut region = None;
        for part in parts {
            let alpha = part.chars().all(|c| c.is_ascii_alphabetic());
            match part.len() {
                4 if alpha && script.is_none() && region.is_none() => {
                    script = Some(title_case(part));
                }
                2 if alpha && region.is_none() => region = Some(part.to_ascii_uppercase()),
                3 if region.is_none() && part.chars().all(|c| c.is_ascii_digit()) => {
                    region = Some(part.to_string());
                }
                _ => return Err(invalid()),
            }
        }

        Ok(Self {
            language: language.to_ascii_lowercase(),
            script,
            region,
        })
    }

    /// BCP 47 tag, e.g. `en-US`.
    pub fn tag(&self) -> String {
        self.join('-')
    }

    /// Client style tag, e.g. `en_US`.
    pub fn underscore_tag(&self) -> String {
        self.join('_')
    }

    fn join(&self, sep: char) -> String {
        let mut tag = self.language.clone();
        for part in [&self.script, &self.region].into_iter().flatten() {
            tag.push(sep);
            tag.push_str(part);
        }
        tag
    }

    /// The same locale without its region.
    pub fn language_only(&self) -> Self {
        Self {
            language: self.language.clone(),
            script: self.script.clone(),
            region: None,
        }
    }

    pub fn en() -> Self {
        Self::new("en", None::<&str>)
    }

    pub fn en_us() -> Self {
        Self::new("en", Some("US"))
    }

    pub fn en_gb() -> Self {
        Self::new("en", Some("GB"))
    }

    pub fn de() -> Self {
        Self::new("de", None::<&str>)
    }

    pub fn de_de() -> Self {
        Self::new("de", Some("DE"))
    }

    pub fn fr_fr() -> Self {
        Self::new("fr", Some("FR"))
    }

    pub fn es_es() -> Self {
        Self::new("es", Some("ES"))
    }

    pub fn ja_jp() -> Self {
        Self::new("ja", Some("JP"))
    }

    /// Chinese (China, Simplified)
    pub fn zh_cn() -> Self {
        Self::with_script("zh", "Hans", Some("CN"))
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

impl FromStr for Locale {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self> {
        Locale::parse(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = I18nError;

    fn try_from(s: String) -> Result<Self> {
        Locale::parse(&s)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.underscore_tag()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_both_separators() {
        assert_eq!(Locale::parse("en_US").unwrap(), Locale::en_us());
        assert_eq!(Locale::parse("en-US").unwrap(), Locale::en_us());
        assert_eq!(Locale::parse("EN_us").unwrap(), Locale::en_us());
    }

    #[test]
    fn test_parse_language_only() {
        let de = Locale::parse("de").unwrap();
        assert_eq!(de.language, "de");
        assert!(de.region.is_none());
    }

    #[test]
    fn test_parse_script_and_region() {
        let zh = Locale::parse("zh-hans-cn").unwrap();
        assert_eq!(zh.script.as_deref(), Some("Hans"));
        assert_eq!(zh.region.as_deref(), Some("CN"));
        assert_eq!(zh, Locale::zh_cn());
        assert_eq!(zh.tag(), "zh-Hans-CN");
    }

    #[test]
    fn test_parse_numeric_region() {
        let es = Locale::parse("es_419").unwrap();
        assert_eq!(es.region.as_deref(), Some("419"));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for raw in ["", "e", "english", "en_", "en_USA1", "12_US", "en_US_GB", "en US"] {
            assert!(
                matches!(Locale::parse(raw), Err(I18nError::InvalidLocale(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_unknown_but_wellformed_locale_parses() {
        let cy = Locale::parse("cy_CZ").unwrap();
        assert_eq!(cy.underscore_tag(), "cy_CZ");
    }

    #[test]
    fn test_language_only() {
        assert_eq!(Locale::de_de().language_only(), Locale::de());
    }

    #[test]
    fn test_serde_uses_string_form() {
        let json = serde_json::to_string(&Locale::de_de()).unwrap();
        assert_eq!(json, "\"de_DE\"");

        let back: Locale = serde_json::from_str("\"de-de\"").unwrap();
        assert_eq!(back, Locale::de_de());

        assert!(serde_json::from_str::<Locale>("\"not a locale\"").is_err());
    }
}
