//! Language catalog module.
//!
//! - `language`: a single (code, display name) entry
//! - `registry`: the ordered catalog of entries offered to users
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::i18n::LanguageCatalog;
//!
//! let catalog = LanguageCatalog::default();
//! let first_five = catalog.first(5);
//! ```

mod language;
mod registry;

pub use language::LanguageEntry;
pub use registry::LanguageCatalog;
