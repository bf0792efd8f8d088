//! Language type: a feed language validated against the registry.

use crate::errors::{non_null, FeedError, FeedResult};
use crate::i18n::{LanguageConfig, LanguageRegistry};

/// A validated feed language.
///
/// Only codes present in the registry can be turned into a `Language`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// Wikipedia language code (e.g., "en", "es")
    code: &'static str,
}

impl Language {
    /// English. The baseline itself comes from the registry via `canonical()`.
    pub const ENGLISH: Language = Language { code: "en" };

    /// Spanish, handy in tests and examples.
    pub const SPANISH: Language = Language { code: "es" };

    /// Create a Language from a language code string.
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is a supported feed language
    /// * `Err(FeedError::BadRequest)` naming the supported codes otherwise
    pub fn from_code(code: &str) -> FeedResult<Language> {
        let registry = LanguageRegistry::get();

        match registry.get_by_code(code) {
            Some(config) => Ok(Language { code: config.code }),
            None => Err(FeedError::BadRequest(format!(
                "Unsupported language '{}'. Supported languages: {}",
                code,
                registry.supported_codes()
            ))),
        }
    }

    /// Get the canonical (baseline) language.
    pub fn canonical() -> Language {
        let config = LanguageRegistry::get().canonical();
        Language { code: config.code }
    }

    /// Get the language code.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the registry entry for this language.
    ///
    /// # Panics
    /// Panics if the code is not in the registry, which cannot happen for a
    /// `Language` built through `from_code` or the constants.
    pub fn config(&self) -> &'static LanguageConfig {
        non_null(
            LanguageRegistry::get().get_by_code(self.code),
            "registry entry for a validated language",
        )
    }

    /// Get the English name of the language.
    pub fn name(&self) -> &'static str {
        self.config().name
    }

    /// Check if this is the baseline language.
    pub fn is_canonical(&self) -> bool {
        self.config().is_canonical
    }

    /// Check if the translation service can translate into this language.
    pub fn is_translatable(&self) -> bool {
        LanguageRegistry::get().is_translatable(self.code)
    }
}
