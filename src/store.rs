//! Per-locale resolved tables shared across threads.
//!
//! Each locale holds an immutable [`ResolvedTable`] behind an `Arc`. A reload
//! builds the replacement first and only swaps it in when the build succeeds,
//! so readers see either the old table or the new one.
use crate::catalog::{Catalog, Scope};
use crate::error::BuildError;
use crate::resolved::ResolvedTable;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Default)]
pub struct TranslationStore {
    tables: RwLock<HashMap<String, Arc<ResolvedTable>>>,
}

impl TranslationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build `scope` from `catalog` and publish it under `locale`.
    ///
    /// On failure the previously published table, if any, stays in place.
    pub fn load(
        &self,
        locale: &str,
        catalog: &Catalog,
        scope: &Scope,
    ) -> Result<Arc<ResolvedTable>, BuildError> {
        match catalog.build(scope) {
            Ok(table) => Ok(self.replace(locale, table)),
            Err(err) => {
                tracing::warn!(
                    locale,
                    scope = %scope,
                    key = %err.key,
                    error = %err.source,
                    "translation reload failed; keeping previous table"
                );
                Err(err)
            }
        }
    }

    /// Publish an already-built table, returning it.
    pub fn replace(&self, locale: &str, table: ResolvedTable) -> Arc<ResolvedTable> {
        let table = Arc::new(table);
        let entries = table.len();
        self.tables
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(locale.to_string(), Arc::clone(&table));
        tracing::debug!(locale, entries, "published translations");
        table
    }

    pub fn get(&self, locale: &str) -> Option<Arc<ResolvedTable>> {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(locale)
            .cloned()
    }

    /// Whether `locale` has a published table; absent means not ready.
    pub fn is_ready(&self, locale: &str) -> bool {
        self.get(locale).is_some()
    }

    pub fn locales(&self) -> Vec<String> {
        let mut locales: Vec<String> = self
            .tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        locales.sort();
        locales
    }

    /// Resolved text for `key`, or the key itself when the locale or key is
    /// missing.
    pub fn lookup(&self, locale: &str, key: &str) -> String {
        match self.get(locale) {
            Some(table) => table.lookup_or_key(key),
            None => key.to_string(),
        }
    }
}
