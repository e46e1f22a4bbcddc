//! Hierarchical string tables.
//!
//! A table is loaded from a JSON object whose leaves are strings. Leaves are
//! classified once at load time (see [`Entry`]) and sibling order is kept so
//! the table serializes back byte-for-byte in canonical form.
mod entry;

pub use entry::{Entry, Piece};

use crate::error::{LoadError, ResolveError};
use crate::keypath::{is_valid_segment, KeyPath};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::path::Path;

/// Interior or leaf node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Branch(Branch),
    Leaf(Entry),
}

/// Ordered children of an interior node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Branch {
    children: Vec<(String, Node)>,
}

impl Branch {
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.children
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, node)| node)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.children
            .iter_mut()
            .find(|(name, _)| name == key)
            .map(|(_, node)| node)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.children.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn upsert(&mut self, key: &str, node: Node) {
        match self.get_mut(key) {
            Some(slot) => *slot = node,
            None => self.children.push((key.to_string(), node)),
        }
    }
}

/// A loaded strings document, optionally owned by an integration domain.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StringTable {
    domain: Option<String>,
    root: Branch,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Object(map) = value else {
            return Err(LoadError::NotAnObject);
        };
        let root = branch_from_map(&map, &KeyPath::from_segments(Vec::<String>::new()))?;
        Ok(Self { domain: None, root })
    }

    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_json_str(&text)?;
        tracing::debug!(
            path = %path.display(),
            entries = table.len(),
            "loaded string table"
        );
        Ok(table)
    }

    /// Attach the domain used to resolve `component::<domain>::...` references.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn root(&self) -> &Branch {
        &self.root
    }

    /// Top-level namespaces in document order.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.root.iter().map(|(name, _)| name)
    }

    pub fn get(&self, path: &KeyPath) -> Option<&Node> {
        let (first, rest) = path.segments().split_first()?;
        let mut node = self.root.get(first)?;
        for segment in rest {
            match node {
                Node::Branch(branch) => node = branch.get(segment)?,
                Node::Leaf(_) => return None,
            }
        }
        Some(node)
    }

    /// Leaf at `path`; branches and missing keys are both `KeyNotFound`.
    pub fn leaf(&self, path: &KeyPath) -> Result<&Entry, ResolveError> {
        match self.get(path) {
            Some(Node::Leaf(entry)) => Ok(entry),
            _ => Err(ResolveError::KeyNotFound {
                path: path.dotted(),
            }),
        }
    }

    /// Insert or replace the leaf at `path`, creating branches as needed.
    ///
    /// A leaf standing where a branch is needed is replaced by the branch.
    pub fn insert(&mut self, path: &KeyPath, entry: Entry) {
        let Some((last, parents)) = path.segments().split_last() else {
            return;
        };
        let mut branch = &mut self.root;
        for segment in parents {
            if !matches!(branch.get(segment), Some(Node::Branch(_))) {
                branch.upsert(segment, Node::Branch(Branch::default()));
            }
            branch = match branch.get_mut(segment) {
                Some(Node::Branch(child)) => child,
                _ => return,
            };
        }
        branch.upsert(last, Node::Leaf(entry));
    }

    /// All leaves in document order.
    pub fn leaves(&self) -> Vec<(KeyPath, &Entry)> {
        fn walk<'t>(branch: &'t Branch, prefix: &KeyPath, out: &mut Vec<(KeyPath, &'t Entry)>) {
            for (name, node) in branch.iter() {
                let path = prefix.child(name);
                match node {
                    Node::Leaf(entry) => out.push((path, entry)),
                    Node::Branch(child) => walk(child, &path, out),
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.root, &KeyPath::from_segments(Vec::<String>::new()), &mut out);
        out
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        fn count(branch: &Branch) -> usize {
            branch
                .iter()
                .map(|(_, node)| match node {
                    Node::Leaf(_) => 1,
                    Node::Branch(child) => count(child),
                })
                .sum()
        }
        count(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Canonical document form: two-space indent, trailing newline.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        Ok(text)
    }
}

fn branch_from_map(
    map: &serde_json::Map<String, Value>,
    prefix: &KeyPath,
) -> Result<Branch, LoadError> {
    let mut branch = Branch::default();
    for (key, value) in map {
        if !is_valid_segment(key) {
            return Err(LoadError::InvalidKey {
                parent: display_prefix(prefix),
                key: key.clone(),
            });
        }
        let path = prefix.child(key);
        let node = match value {
            Value::String(raw) => Node::Leaf(Entry::parse(raw)),
            Value::Object(child) => Node::Branch(branch_from_map(child, &path)?),
            other => {
                return Err(LoadError::InvalidValue {
                    path: path.dotted(),
                    kind: json_kind(other),
                })
            }
        };
        branch.upsert(key, node);
    }
    Ok(branch)
}

fn display_prefix(prefix: &KeyPath) -> String {
    if prefix.is_empty() {
        "<root>".to_string()
    } else {
        prefix.dotted()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Serialize for Branch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.children.len()))?;
        for (name, node) in &self.children {
            map.serialize_entry(name, node)?;
        }
        map.end()
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Branch(branch) => branch.serialize(serializer),
            Node::Leaf(entry) => serializer.serialize_str(&entry.to_raw()),
        }
    }
}

impl Serialize for StringTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.root.serialize(serializer)
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
