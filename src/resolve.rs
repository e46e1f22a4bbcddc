//! Reference resolution with a bounded hop count.
//!
//! Paths starting with `common` resolve against the shared table, paths
//! starting with `component::<domain>` against that domain's table, and
//! everything else against the table the reference appears in.
use crate::error::ResolveError;
use crate::keypath::KeyPath;
use crate::table::{Entry, Piece, StringTable};

/// Default number of reference hops before a chain is treated as cyclic.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Upper bound on the text a single resolution may substitute, in bytes.
///
/// Every substituted piece costs at least one byte, so fan-out through empty
/// values is bounded too.
pub const MAX_RESOLVED_LEN: usize = 64 * 1024;

const COMMON_SCOPE: &str = "common";
const COMPONENT_SCOPE: &str = "component";

/// Tables reachable through scoped references.
pub trait TableSource {
    fn common(&self) -> Option<&StringTable>;
    fn component(&self, domain: &str) -> Option<&StringTable>;
}

/// A lone table only knows itself, under its own domain.
impl TableSource for StringTable {
    fn common(&self) -> Option<&StringTable> {
        None
    }

    fn component(&self, domain: &str) -> Option<&StringTable> {
        (self.domain() == Some(domain)).then_some(self)
    }
}

/// Follows references across the tables of a [`TableSource`].
pub struct Resolver<'a, S: TableSource + ?Sized> {
    source: &'a S,
    max_depth: usize,
}

impl<'a, S: TableSource + ?Sized> Resolver<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Resolve `path` as seen from `table`.
    pub fn resolve<'t>(
        &self,
        table: &'t StringTable,
        path: &KeyPath,
    ) -> Result<String, ResolveError>
    where
        'a: 't,
    {
        let mut budget = MAX_RESOLVED_LEN;
        self.resolve_at(table, path, path, 0, &mut budget)
    }

    fn resolve_at<'t>(
        &self,
        table: &'t StringTable,
        path: &KeyPath,
        origin: &KeyPath,
        depth: usize,
        budget: &mut usize,
    ) -> Result<String, ResolveError>
    where
        'a: 't,
    {
        let (table, local) = self.locate(table, path)?;
        match table.leaf(&local)? {
            Entry::Literal(text) => Ok(text.clone()),
            Entry::Reference(target) => {
                let depth = self.hop(origin, depth)?;
                self.resolve_at(table, target, origin, depth, budget)
            }
            Entry::Composite(pieces) => {
                let depth = self.hop(origin, depth)?;
                let mut out = String::new();
                for piece in pieces {
                    match piece {
                        Piece::Text(text) => {
                            self.spend(origin, budget, text.len())?;
                            out.push_str(text);
                        }
                        Piece::Ref(target) => {
                            let text = self.resolve_at(table, target, origin, depth, budget)?;
                            self.spend(origin, budget, text.len())?;
                            out.push_str(&text);
                        }
                    }
                }
                Ok(out)
            }
            Entry::Malformed { raw } => Err(ResolveError::MalformedReference {
                path: local.dotted(),
                raw: raw.clone(),
            }),
        }
    }

    fn hop(&self, origin: &KeyPath, depth: usize) -> Result<usize, ResolveError> {
        if depth >= self.max_depth {
            return Err(ResolveError::CyclicReference {
                path: origin.dotted(),
                max_depth: self.max_depth,
            });
        }
        Ok(depth + 1)
    }

    fn spend(&self, origin: &KeyPath, budget: &mut usize, len: usize) -> Result<(), ResolveError> {
        let cost = len.max(1);
        if cost > *budget {
            return Err(ResolveError::ValueTooLong {
                path: origin.dotted(),
                limit: MAX_RESOLVED_LEN,
            });
        }
        *budget -= cost;
        Ok(())
    }

    /// Pick the table a path points into and strip the scope prefix.
    fn locate<'t>(
        &self,
        table: &'t StringTable,
        path: &KeyPath,
    ) -> Result<(&'t StringTable, KeyPath), ResolveError>
    where
        'a: 't,
    {
        let not_found = || ResolveError::KeyNotFound {
            path: path.dotted(),
        };
        match path.segments() {
            [scope, _, ..] if scope == COMMON_SCOPE => {
                let common = self.source.common().ok_or_else(not_found)?;
                Ok((common, path.skip(1)))
            }
            [scope, domain, _, ..] if scope == COMPONENT_SCOPE => {
                let component = self.source.component(domain).ok_or_else(not_found)?;
                Ok((component, path.skip(2)))
            }
            _ => Ok((table, path.clone())),
        }
    }
}

impl StringTable {
    /// Resolve a path within this table alone.
    pub fn resolve(&self, path: &KeyPath) -> Result<String, ResolveError> {
        Resolver::new(self).resolve(self, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(raw: &str) -> KeyPath {
        KeyPath::parse(raw).expect("valid key path")
    }

    fn table(json: &str) -> StringTable {
        StringTable::from_json_str(json).expect("load table")
    }

    #[test]
    fn literal_resolves_unchanged() {
        let t = table(r#"{"config": {"error": {"password_error": "Invalid password"}}}"#);
        assert_eq!(
            t.resolve(&path("config.error.password_error")).as_deref(),
            Ok("Invalid password")
        );
    }

    #[test]
    fn reference_matches_target() {
        let t = table(
            r#"{"entity": {"sensor": {
                "temperature_status": {"state": {"no_data": "No data"}},
                "light_status": {"state": {"no_data": "[%key:entity.sensor.temperature_status.state.no_data%]"}}
            }}}"#,
        );
        let direct = t.resolve(&path("entity.sensor.temperature_status.state.no_data"));
        let aliased = t.resolve(&path("entity.sensor.light_status.state.no_data"));
        assert_eq!(direct, aliased);
        assert_eq!(aliased.as_deref(), Ok("No data"));
    }

    #[test]
    fn forward_and_chained_references_resolve() {
        let t = table(r#"{"a": "[%key:b%]", "b": "[%key:c%]", "c": "end"}"#);
        assert_eq!(t.resolve(&path("a")).as_deref(), Ok("end"));
    }

    #[test]
    fn missing_path_is_key_not_found() {
        let t = table(r#"{"config": {"step": {"user": {"title": "Credentials"}}}}"#);
        assert_eq!(
            t.resolve(&path("config.step.user.title.missing")),
            Err(ResolveError::KeyNotFound {
                path: "config.step.user.title.missing".to_string()
            })
        );
        assert!(matches!(
            t.resolve(&path("config.step")),
            Err(ResolveError::KeyNotFound { .. })
        ));
    }

    #[test]
    fn dangling_reference_names_the_missing_target() {
        let t = table(r#"{"a": "[%key:nowhere%]"}"#);
        assert_eq!(
            t.resolve(&path("a")),
            Err(ResolveError::KeyNotFound {
                path: "nowhere".to_string()
            })
        );
    }

    #[test]
    fn cycle_is_cyclic_reference() {
        let t = table(r#"{"a": "[%key:b%]", "b": "[%key:a%]"}"#);
        assert_eq!(
            t.resolve(&path("a")),
            Err(ResolveError::CyclicReference {
                path: "a".to_string(),
                max_depth: DEFAULT_MAX_DEPTH
            })
        );
        let self_loop = table(r#"{"a": "prefix [%key:a%]"}"#);
        assert!(matches!(
            self_loop.resolve(&path("a")),
            Err(ResolveError::CyclicReference { .. })
        ));
    }

    #[test]
    fn depth_limit_counts_hops() {
        let t = table(r#"{"a": "[%key:b%]", "b": "[%key:c%]", "c": "end"}"#);
        let resolver = Resolver::new(&t).with_max_depth(2);
        assert_eq!(resolver.resolve(&t, &path("a")).as_deref(), Ok("end"));
        let resolver = Resolver::new(&t).with_max_depth(1);
        assert!(matches!(
            resolver.resolve(&t, &path("a")),
            Err(ResolveError::CyclicReference { max_depth: 1, .. })
        ));
    }

    #[test]
    fn malformed_reference_is_reported() {
        let t = table(r#"{"config": {"abort": {"broken": "[%key:%]"}}}"#);
        assert_eq!(
            t.resolve(&path("config.abort.broken")),
            Err(ResolveError::MalformedReference {
                path: "config.abort.broken".to_string(),
                raw: "[%key:%]".to_string()
            })
        );
    }

    #[test]
    fn empty_literal_is_not_missing() {
        let t = table(r#"{"a": "", "b": "[%key:a%]"}"#);
        assert_eq!(t.resolve(&path("b")).as_deref(), Ok(""));
    }

    #[test]
    fn component_scope_resolves_against_own_domain() {
        let t = table(r#"{"x": "[%key:component::fyta::y%]", "y": "why"}"#).with_domain("fyta");
        assert_eq!(t.resolve(&path("x")).as_deref(), Ok("why"));
        let anonymous = table(r#"{"x": "[%key:component::fyta::y%]", "y": "why"}"#);
        assert!(matches!(
            anonymous.resolve(&path("x")),
            Err(ResolveError::KeyNotFound { .. })
        ));
    }

    #[test]
    fn fan_out_is_capped() {
        let mut json = String::from(r#"{"l0": "xxxxxxxxxxxxxxxx""#);
        for level in 1..=9 {
            let below = format!("[%key:l{}%]", level - 1);
            json.push_str(&format!(r#", "l{level}": "{}""#, below.repeat(6)));
        }
        json.push('}');
        let t = table(&json);
        let resolver = Resolver::new(&t).with_max_depth(64);
        assert_eq!(
            resolver.resolve(&t, &path("l9")),
            Err(ResolveError::ValueTooLong {
                path: "l9".to_string(),
                limit: MAX_RESOLVED_LEN
            })
        );
        assert_eq!(resolver.resolve(&t, &path("l2")).map(|v| v.len()), Ok(16 * 36));

        let hollow = table(&format!(r#"{{"e": "", "f": "{}"}}"#, "[%key:e%]".repeat(70_000)));
        assert!(matches!(
            hollow.resolve(&path("f")),
            Err(ResolveError::ValueTooLong { .. })
        ));
    }

    #[test]
    fn composite_substitutes_each_reference() {
        let t = table(r#"{"host": "Host", "port": "Port", "both": "[%key:host%] and [%key:port%]"}"#);
        assert_eq!(t.resolve(&path("both")).as_deref(), Ok("Host and Port"));
    }
}
