//! Fully resolved (flattened) string tables.
//!
//! Building one resolves every leaf up front so broken references surface at
//! load time rather than when a label is first displayed.
use crate::error::BuildError;
use crate::keypath::KeyPath;
use crate::placeholders;
use crate::resolve::{Resolver, TableSource};
use crate::table::{Entry, StringTable};
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedTable {
    tree: StringTable,
    index: HashMap<String, String>,
}

impl ResolvedTable {
    pub fn build<S: TableSource + ?Sized>(
        resolver: &Resolver<'_, S>,
        table: &StringTable,
    ) -> Result<Self, BuildError> {
        let start = Instant::now();
        let mut tree = StringTable::new();
        let mut index = HashMap::new();
        for (path, _) in table.leaves() {
            let value = resolve_leaf(resolver, table, &path)?;
            tree.insert(&path, Entry::Literal(value.clone()));
            index.insert(path.dotted(), value);
        }
        tracing::info!(
            domain = table.domain().unwrap_or("-"),
            entries = index.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "resolved string table"
        );
        Ok(Self { tree, index })
    }

    /// Literal-only tree in the original document shape.
    pub fn tree(&self) -> &StringTable {
        &self.tree
    }

    /// Dotted key → value, sorted for stable output.
    pub fn flat(&self) -> BTreeMap<&str, &str> {
        self.index
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Look up a dotted or `::`-scoped key.
    pub fn get(&self, key: &str) -> Option<&str> {
        if let Some(value) = self.index.get(key) {
            return Some(value.as_str());
        }
        let path = KeyPath::parse(key).ok()?;
        self.index.get(&path.dotted()).map(String::as_str)
    }

    /// Display helper: the resolved value, or the key itself when absent.
    pub fn lookup_or_key(&self, key: &str) -> String {
        match self.get(key) {
            Some(value) => value.to_string(),
            None => {
                tracing::debug!(key, "missing translation, falling back to key");
                key.to_string()
            }
        }
    }

    /// Resolve `key` and substitute `{name}` placeholders from `args`.
    pub fn render(&self, key: &str, args: &BTreeMap<String, String>) -> Option<String> {
        self.get(key).map(|text| placeholders::render(text, args))
    }
}

fn resolve_leaf<S: TableSource + ?Sized>(
    resolver: &Resolver<'_, S>,
    table: &StringTable,
    path: &KeyPath,
) -> Result<String, BuildError> {
    resolver.resolve(table, path).map_err(|source| BuildError {
        key: path.dotted(),
        source,
    })
}
