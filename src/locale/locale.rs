//! Locale type: flexible, validated locale representation.
//!
//! `Locale` wraps a registry-validated locale code so that only supported,
//! enabled locales can flow through query functions and handlers.

use crate::locale::{LocaleConfig, LocaleRegistry};
use anyhow::{bail, Result};

/// A validated locale.
///
/// Values of this type always name an enabled entry in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locale {
    /// ISO 639-1 language code (e.g., "en", "it", "de")
    code: &'static str,
}

impl Locale {
    pub const ENGLISH: Locale = Locale { code: "en" };
    pub const ITALIAN: Locale = Locale { code: "it" };
    pub const GERMAN: Locale = Locale { code: "de" };

    /// Create a Locale from a language code string.
    ///
    /// # Returns
    /// * `Ok(Locale)` if the code is valid and the locale is enabled
    /// * `Err` if the code is not found or the locale is disabled
    pub fn from_code(code: &str) -> Result<Locale> {
        let registry = LocaleRegistry::get();

        match registry.get_by_code(code) {
            Some(config) if config.enabled => Ok(Locale {
                code: config.code, // Use the static str from the registry
            }),
            Some(_) => bail!("Locale '{}' is not enabled", code),
            None => bail!("Unknown locale code: '{}'", code),
        }
    }

    /// Get the default locale (the redirect target of last resort).
    pub fn default_locale() -> Locale {
        let config = LocaleRegistry::get().default_locale();
        Locale { code: config.code }
    }

    /// Get the ISO 639-1 language code.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the full locale configuration from the registry.
    ///
    /// # Panics
    /// Panics if the code is not found in the registry. This cannot happen
    /// for values constructed via `from_code` or the constants.
    pub fn config(&self) -> &'static LocaleConfig {
        LocaleRegistry::get()
            .get_by_code(self.code)
            .expect("Locale code should always be valid")
    }

    /// Get the English name of the locale.
    pub fn name(&self) -> &'static str {
        self.config().name
    }

    /// Get the native name of the locale.
    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    /// Check if this is the default locale.
    pub fn is_default(&self) -> bool {
        self.config().is_default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Constant Tests ====================

    #[test]
    fn test_english_constant() {
        let english = Locale::ENGLISH;
        assert_eq!(english.code(), "en");
        assert_eq!(english.name(), "English");
        assert!(english.is_default());
    }

    #[test]
    fn test_italian_constant() {
        let italian = Locale::ITALIAN;
        assert_eq!(italian.code(), "it");
        assert_eq!(italian.name(), "Italian");
        assert!(!italian.is_default());
    }

    #[test]
    fn test_german_constant() {
        let german = Locale::GERMAN;
        assert_eq!(german.code(), "de");
        assert_eq!(german.native_name(), "Deutsch");
        assert!(!german.is_default());
    }

    // ==================== from_code Tests ====================

    #[test]
    fn test_from_code_valid() {
        for code in ["en", "it", "de"] {
            let locale = Locale::from_code(code).expect("Should succeed");
            assert_eq!(locale.code(), code);
        }
    }

    #[test]
    fn test_from_code_invalid() {
        let result = Locale::from_code("fr");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Unknown"));
    }

    #[test]
    fn test_from_code_empty() {
        assert!(Locale::from_code("").is_err());
    }

    #[test]
    fn test_from_code_case_sensitive() {
        // Registry codes are lowercase; uppercase input is not recognized
        assert!(Locale::from_code("EN").is_err());
    }

    // ==================== default_locale Tests ====================

    #[test]
    fn test_default_locale_is_english() {
        let default = Locale::default_locale();
        assert_eq!(default.code(), "en");
        assert!(default.is_default());
    }

    // ==================== Trait Tests ====================

    #[test]
    fn test_locale_equality() {
        let lang1 = Locale::ENGLISH;
        let lang2 = Locale::from_code("en").unwrap();
        assert_eq!(lang1, lang2);
    }

    #[test]
    fn test_locale_inequality() {
        assert_ne!(Locale::ITALIAN, Locale::GERMAN);
    }

    #[test]
    fn test_locale_copy() {
        let locale = Locale::GERMAN;
        let copied = locale; // Copy
        assert_eq!(locale, copied); // Both still valid
    }

    #[test]
    fn test_locale_debug() {
        let debug = format!("{:?}", Locale::ITALIAN);
        assert!(debug.contains("it"));
    }

    // ==================== Config Access Tests ====================

    #[test]
    fn test_config_access() {
        let config = Locale::ITALIAN.config();
        assert_eq!(config.code, "it");
        assert_eq!(config.name, "Italian");
        assert_eq!(config.native_name, "Italiano");
    }
}
