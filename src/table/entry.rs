//! Leaf values and the `[%key:...%]` reference syntax.
use crate::keypath::KeyPath;
use regex::Regex;
use std::sync::OnceLock;

const REFERENCE_OPEN: &str = "[%key:";

/// A piece of a composite value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Piece {
    Text(String),
    Ref(KeyPath),
}

/// Leaf entry of a string table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    /// Display text, possibly empty.
    Literal(String),
    /// The whole value aliases another key.
    Reference(KeyPath),
    /// Text with one or more embedded references.
    Composite(Vec<Piece>),
    /// Reference syntax whose target could not be parsed; kept verbatim.
    Malformed { raw: String },
}

fn reference_token() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"\[%key:([^%\]]*)%\]").expect("reference token regex"))
}

impl Entry {
    /// Classify a raw string value.
    pub fn parse(raw: &str) -> Entry {
        if !raw.contains(REFERENCE_OPEN) {
            return Entry::Literal(raw.to_string());
        }
        let malformed = || Entry::Malformed {
            raw: raw.to_string(),
        };

        let mut pieces = Vec::new();
        let mut cursor = 0;
        for caps in reference_token().captures_iter(raw) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let text = &raw[cursor..whole.start()];
            if text.contains(REFERENCE_OPEN) {
                return malformed();
            }
            if !text.is_empty() {
                pieces.push(Piece::Text(text.to_string()));
            }
            let target = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            match KeyPath::parse(target) {
                Ok(path) => pieces.push(Piece::Ref(path)),
                Err(_) => return malformed(),
            }
            cursor = whole.end();
        }
        let tail = &raw[cursor..];
        if tail.contains(REFERENCE_OPEN) {
            return malformed();
        }
        if !tail.is_empty() {
            pieces.push(Piece::Text(tail.to_string()));
        }

        match pieces.as_slice() {
            [Piece::Ref(path)] => Entry::Reference(path.clone()),
            _ => Entry::Composite(pieces),
        }
    }

    /// Raw document form; `Entry::parse(&entry.to_raw()) == entry`.
    pub fn to_raw(&self) -> String {
        match self {
            Entry::Literal(text) => text.clone(),
            Entry::Reference(path) => reference_raw(path),
            Entry::Composite(pieces) => pieces
                .iter()
                .map(|piece| match piece {
                    Piece::Text(text) => text.clone(),
                    Piece::Ref(path) => reference_raw(path),
                })
                .collect(),
            Entry::Malformed { raw } => raw.clone(),
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Entry::Literal(_))
    }

    /// Reference targets named by this entry, in order.
    pub fn references(&self) -> Vec<&KeyPath> {
        match self {
            Entry::Reference(path) => vec![path],
            Entry::Composite(pieces) => pieces
                .iter()
                .filter_map(|piece| match piece {
                    Piece::Ref(path) => Some(path),
                    Piece::Text(_) => None,
                })
                .collect(),
            Entry::Literal(_) | Entry::Malformed { .. } => Vec::new(),
        }
    }
}

fn reference_raw(path: &KeyPath) -> String {
    format!("{REFERENCE_OPEN}{path}%]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_literal() {
        assert_eq!(
            Entry::parse("Invalid password"),
            Entry::Literal("Invalid password".to_string())
        );
        assert_eq!(Entry::parse(""), Entry::Literal(String::new()));
    }

    #[test]
    fn whole_value_reference_keeps_separator() {
        let raw = "[%key:common::config_flow::data::password%]";
        let entry = Entry::parse(raw);
        let Entry::Reference(path) = &entry else {
            panic!("expected reference, got {entry:?}");
        };
        assert_eq!(path.dotted(), "common.config_flow.data.password");
        assert_eq!(entry.to_raw(), raw);
    }

    #[test]
    fn embedded_references_become_composite() {
        let raw = "Connect to [%key:common::config_flow::data::host%] now";
        let entry = Entry::parse(raw);
        match &entry {
            Entry::Composite(pieces) => assert_eq!(pieces.len(), 3),
            other => panic!("expected composite, got {other:?}"),
        }
        assert_eq!(entry.references().len(), 1);
        assert_eq!(entry.to_raw(), raw);
    }

    #[test]
    fn broken_reference_syntax_is_malformed() {
        for raw in [
            "[%key:%]",
            "[%key:config..error%]",
            "[%key:config.error",
            "prefix [%key:a b%] suffix",
        ] {
            assert_eq!(
                Entry::parse(raw),
                Entry::Malformed {
                    raw: raw.to_string()
                },
                "{raw}"
            );
        }
    }
}
