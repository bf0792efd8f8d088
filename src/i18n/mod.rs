//! Internationalization (i18n) module.
//!
//! # Architecture
//!
//! - `registry`: supported feed languages and the translation allow-list
//! - `language`: validated `Language` type built from the registry
//! - `labels`: badges and the English label text translated per request
//!
//! # Example
//!
//! ```rust,ignore
//! use featured_feed::i18n::{Language, LanguageRegistry};
//!
//! let spanish = Language::from_code("es")?;
//! assert!(spanish.is_translatable());
//!
//! let languages = LanguageRegistry::get().list_all();
//! ```

mod labels;
mod language;
mod registry;

pub use labels::{badge_label, Badge, SECTION_LABEL};
pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry};
