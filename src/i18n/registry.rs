//! Language registry: single source of truth for the languages the feed serves
//! and the languages the translation service can produce.
//!
//! The registry is built once with `OnceLock` and never mutated afterwards.

use std::sync::OnceLock;

/// Configuration for a supported feed language (a Wikipedia edition).
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// Wikipedia language code (e.g., "en", "es", "sco")
    pub code: &'static str,

    /// English name of the language (e.g., "English", "Spanish")
    pub name: &'static str,

    /// Whether this is the baseline language fallbacks are translated from
    pub is_canonical: bool,
}

/// Language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
    translatable: Vec<&'static str>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
            translatable: default_translatable(),
        })
    }

    /// Get a language configuration by its code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// All supported feed languages, in registry order.
    pub fn list_all(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().collect()
    }

    /// Comma-separated list of supported codes, used in error messages.
    pub fn supported_codes(&self) -> String {
        self.languages
            .iter()
            .map(|lang| lang.code)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Get the canonical language configuration.
    ///
    /// # Panics
    /// Panics if the registry does not define exactly one canonical language.
    pub fn canonical(&self) -> &LanguageConfig {
        let canonical_langs: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_canonical)
            .collect();

        match canonical_langs.as_slice() {
            [only] => only,
            [] => panic!("No canonical language found in registry"),
            _ => panic!("Multiple canonical languages found in registry"),
        }
    }

    /// Check if the translation service accepts `code` as a target.
    pub fn is_translatable(&self, code: &str) -> bool {
        self.translatable.contains(&code)
    }
}

/// Wikipedia editions that publish a featured feed.
fn default_languages() -> Vec<LanguageConfig> {
    const EDITIONS: &[(&str, &str)] = &[
        ("bn", "Bengali"),
        ("de", "German"),
        ("el", "Greek"),
        ("en", "English"),
        ("he", "Hebrew"),
        ("hu", "Hungarian"),
        ("ja", "Japanese"),
        ("la", "Latin"),
        ("sd", "Sindhi"),
        ("sv", "Swedish"),
        ("ur", "Urdu"),
        ("zh", "Chinese"),
        ("bs", "Bosnian"),
        ("da", "Danish"),
        ("es", "Spanish"),
        ("fi", "Finnish"),
        ("fr", "French"),
        ("ko", "Korean"),
        ("no", "Norwegian (Bokmål)"),
        ("pl", "Polish"),
        ("pt", "Portuguese"),
        ("ru", "Russian"),
        ("sco", "Scots"),
        ("vi", "Vietnamese"),
        ("ar", "Arabic"),
    ];

    EDITIONS
        .iter()
        .map(|&(code, name)| LanguageConfig {
            code,
            name,
            is_canonical: code == "en",
        })
        .collect()
}

/// Target languages deployed on the translation server.
fn default_translatable() -> Vec<&'static str> {
    vec![
        "en", "es", "zh", "fi", "he", "ru", "ar", "az", "bg", "bn", "ca", "cs", "da",
    ]
}
