//! Shared and per-integration tables grouped for cross-scope resolution.
use crate::error::{BuildError, ResolveError};
use crate::keypath::KeyPath;
use crate::resolve::{Resolver, TableSource, DEFAULT_MAX_DEPTH};
use crate::resolved::ResolvedTable;
use crate::table::StringTable;
use std::collections::BTreeMap;
use std::fmt;

/// Which table a lookup starts from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Scope {
    Common,
    Component(String),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Common => f.write_str("common"),
            Scope::Component(domain) => write!(f, "component::{domain}"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Catalog {
    common: Option<StringTable>,
    components: BTreeMap<String, StringTable>,
    max_depth: usize,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            common: None,
            components: BTreeMap::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_common(mut self, table: StringTable) -> Self {
        self.common = Some(table);
        self
    }

    /// Register a component table; the table's own domain is overwritten.
    pub fn with_component(mut self, domain: impl Into<String>, table: StringTable) -> Self {
        let domain = domain.into();
        let table = table.with_domain(domain.clone());
        self.components.insert(domain, table);
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    pub fn table(&self, scope: &Scope) -> Option<&StringTable> {
        match scope {
            Scope::Common => self.common.as_ref(),
            Scope::Component(domain) => self.components.get(domain),
        }
    }

    /// Every loaded table with its scope, common first.
    pub fn scopes(&self) -> Vec<(Scope, &StringTable)> {
        let mut out = Vec::new();
        if let Some(common) = &self.common {
            out.push((Scope::Common, common));
        }
        for (domain, table) in &self.components {
            out.push((Scope::Component(domain.clone()), table));
        }
        out
    }

    pub fn resolver(&self) -> Resolver<'_, Catalog> {
        Resolver::new(self).with_max_depth(self.max_depth)
    }

    pub fn resolve(&self, scope: &Scope, path: &KeyPath) -> Result<String, ResolveError> {
        let table = self.table(scope).ok_or_else(|| ResolveError::KeyNotFound {
            path: format!("{scope}::{path}"),
        })?;
        self.resolver().resolve(table, path)
    }

    /// Eagerly resolve every leaf of `scope`, failing on the first bad key.
    pub fn build(&self, scope: &Scope) -> Result<ResolvedTable, BuildError> {
        let table = self.table(scope).ok_or_else(|| BuildError {
            key: scope.to_string(),
            source: ResolveError::KeyNotFound {
                path: scope.to_string(),
            },
        })?;
        ResolvedTable::build(&self.resolver(), table)
    }
}

impl TableSource for Catalog {
    fn common(&self) -> Option<&StringTable> {
        self.common.as_ref()
    }

    fn component(&self, domain: &str) -> Option<&StringTable> {
        self.components.get(domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(raw: &str) -> KeyPath {
        KeyPath::parse(raw).expect("valid key path")
    }

    fn catalog() -> Catalog {
        let common = StringTable::from_json_str(
            r#"{"config_flow": {"data": {"password": "Password"}}}"#,
        )
        .expect("common");
        let fyta = StringTable::from_json_str(
            r#"{
              "config": {"step": {"user": {"data": {"password": "[%key:common::config_flow::data::password%]"}}}},
              "exceptions": {"auth": {"message": "[%key:component::other::msg%]"}}
            }"#,
        )
        .expect("fyta");
        let other = StringTable::from_json_str(r#"{"msg": "From other"}"#).expect("other");
        Catalog::new()
            .with_common(common)
            .with_component("fyta", fyta)
            .with_component("other", other)
    }

    #[test]
    fn resolves_common_and_cross_component_references() {
        let catalog = catalog();
        let fyta = Scope::Component("fyta".to_string());
        assert_eq!(
            catalog
                .resolve(&fyta, &path("config.step.user.data.password"))
                .as_deref(),
            Ok("Password")
        );
        assert_eq!(
            catalog
                .resolve(&fyta, &path("exceptions.auth.message"))
                .as_deref(),
            Ok("From other")
        );
        assert_eq!(
            catalog
                .resolve(&fyta, &path("common::config_flow::data::password"))
                .as_deref(),
            Ok("Password")
        );
    }

    #[test]
    fn missing_common_table_is_key_not_found() {
        let fyta = StringTable::from_json_str(r#"{"a": "[%key:common::x::y%]"}"#).expect("fyta");
        let catalog = Catalog::new().with_component("fyta", fyta);
        assert_eq!(
            catalog.resolve(&Scope::Component("fyta".into()), &path("a")),
            Err(ResolveError::KeyNotFound {
                path: "common.x.y".to_string()
            })
        );
        assert!(catalog.resolve(&Scope::Common, &path("a")).is_err());
    }

    #[test]
    fn scopes_list_common_first() {
        let catalog = catalog();
        let scopes: Vec<String> = catalog
            .scopes()
            .into_iter()
            .map(|(scope, _)| scope.to_string())
            .collect();
        assert_eq!(
            scopes,
            vec!["common", "component::fyta", "component::other"]
        );
    }
}
