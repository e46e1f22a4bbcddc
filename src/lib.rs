//! Localized string tables for smart-home integrations.
//!
//! A strings document maps nested keys to display text. Values may alias
//! other keys with `[%key:<path>%]`, either inside the same document, in the
//! shared `common` table, or in another component's table. This crate loads
//! those documents, resolves references with a bounded hop count, flattens
//! them for display, and lints them.
//!
//! ```
//! use hass_strings::{KeyPath, StringTable};
//!
//! let table = StringTable::from_json_str(
//!     r#"{"config": {"error": {"password_error": "Invalid password"}}}"#,
//! )
//! .unwrap();
//! let path = KeyPath::parse("config.error.password_error").unwrap();
//! assert_eq!(table.resolve(&path).unwrap(), "Invalid password");
//! ```
pub mod bundled;
pub mod catalog;
pub mod check;
pub mod config;
pub mod error;
pub mod keypath;
pub mod output;
pub mod placeholders;
pub mod resolve;
pub mod resolved;
pub mod store;
pub mod table;

pub use catalog::{Catalog, Scope};
pub use error::{BuildError, LoadError, ResolveError};
pub use keypath::KeyPath;
pub use resolve::{Resolver, TableSource, DEFAULT_MAX_DEPTH, MAX_RESOLVED_LEN};
pub use resolved::ResolvedTable;
pub use store::TranslationStore;
pub use table::{Entry, StringTable};
