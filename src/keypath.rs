//! Key paths locating entries inside a string table.
//!
//! Paths are written either dotted (`entity.sensor.light_status.name`) or
//! scoped the way shared references are (`common::config_flow::data::password`).
//! The separator style is remembered so references serialize back unchanged.
use std::fmt;

/// Separator used when a path was parsed, kept for round-trip output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Separator {
    Dot,
    Scope,
}

impl Separator {
    pub fn as_str(self) -> &'static str {
        match self {
            Separator::Dot => ".",
            Separator::Scope => "::",
        }
    }
}

/// Ordered, non-empty sequence of key segments.
#[derive(Clone, Debug)]
pub struct KeyPath {
    segments: Vec<String>,
    separator: Separator,
}

/// Why a textual path was rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum KeyPathError {
    #[error("key path is empty")]
    Empty,
    #[error("key path {path:?} has an empty segment")]
    EmptySegment { path: String },
    #[error("key path {path:?} has invalid character {ch:?}")]
    InvalidChar { path: String, ch: char },
}

impl KeyPath {
    /// Parse a path. `::` wins over `.` when both appear.
    pub fn parse(raw: &str) -> Result<Self, KeyPathError> {
        if raw.is_empty() {
            return Err(KeyPathError::Empty);
        }
        let separator = if raw.contains("::") {
            Separator::Scope
        } else {
            Separator::Dot
        };
        let mut segments = Vec::new();
        for segment in raw.split(separator.as_str()) {
            if segment.is_empty() {
                return Err(KeyPathError::EmptySegment {
                    path: raw.to_string(),
                });
            }
            if let Some(ch) = segment.chars().find(|ch| !is_segment_char(*ch)) {
                return Err(KeyPathError::InvalidChar {
                    path: raw.to_string(),
                    ch,
                });
            }
            segments.push(segment.to_string());
        }
        Ok(Self {
            segments,
            separator,
        })
    }

    /// Build a dotted path from already-validated segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            separator: Separator::Dot,
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn separator(&self) -> Separator {
        self.separator
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Path made of the segments after the first `count`.
    pub fn skip(&self, count: usize) -> KeyPath {
        KeyPath {
            segments: self.segments.iter().skip(count).cloned().collect(),
            separator: self.separator,
        }
    }

    pub fn child(&self, segment: &str) -> KeyPath {
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        KeyPath {
            segments,
            separator: self.separator,
        }
    }

    /// Canonical dotted rendering, used for flat indexes and reports.
    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }
}

pub(crate) fn is_segment_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}

/// Whether `segment` can appear as one key of a path.
pub fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(is_segment_char)
}

// Equality ignores the separator: `a.b` and `a::b` name the same entry.
impl PartialEq for KeyPath {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
    }
}

impl Eq for KeyPath {}

impl std::hash::Hash for KeyPath {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.segments.hash(state);
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join(self.separator.as_str()))
    }
}

impl std::str::FromStr for KeyPath {
    type Err = KeyPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyPath::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dotted_and_scoped_forms_as_equal() {
        let dotted = KeyPath::parse("entity.sensor.light_status.name").expect("dotted");
        let scoped = KeyPath::parse("entity::sensor::light_status::name").expect("scoped");
        assert_eq!(dotted, scoped);
        assert_eq!(dotted.to_string(), "entity.sensor.light_status.name");
        assert_eq!(scoped.to_string(), "entity::sensor::light_status::name");
        assert_eq!(scoped.dotted(), "entity.sensor.light_status.name");
    }

    #[test]
    fn rejects_empty_and_invalid_paths() {
        assert_eq!(KeyPath::parse(""), Err(KeyPathError::Empty));
        assert!(matches!(
            KeyPath::parse("config..error"),
            Err(KeyPathError::EmptySegment { .. })
        ));
        assert!(matches!(
            KeyPath::parse("config::"),
            Err(KeyPathError::EmptySegment { .. })
        ));
        assert!(matches!(
            KeyPath::parse("config.err or"),
            Err(KeyPathError::InvalidChar { ch: ' ', .. })
        ));
    }

    #[test]
    fn skip_keeps_separator() {
        let path = KeyPath::parse("component::fyta::config::error").expect("parse");
        let rest = path.skip(2);
        assert_eq!(rest.to_string(), "config::error");
        assert_eq!(rest.len(), 2);
        assert_eq!(rest.separator(), Separator::Scope);
        assert_eq!(rest.child("auth").separator(), Separator::Scope);
        assert_eq!(
            KeyPath::parse("config.error").expect("parse").separator(),
            Separator::Dot
        );
        assert_eq!(KeyPath::from_segments(["a", "b"]).separator(), Separator::Dot);
    }
}
