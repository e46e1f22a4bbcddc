//! `{name}` placeholders in message templates.
//!
//! `{{` and `}}` stand for literal braces. Unknown names are left in place so
//! a missing argument shows up in the UI instead of disappearing.
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlaceholderError {
    #[error("unclosed '{{' at byte {offset}")]
    Unclosed { offset: usize },
    #[error("unmatched '}}' at byte {offset}")]
    Unmatched { offset: usize },
    #[error("invalid placeholder name {name:?} at byte {offset}")]
    InvalidName { name: String, offset: usize },
}

#[derive(Debug, PartialEq, Eq)]
enum Token<'t> {
    Text(&'t str),
    Brace(char),
    Name(&'t str),
}

fn tokenize(text: &str) -> Result<Vec<Token<'_>>, PlaceholderError> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'{' | b'}' if bytes.get(i + 1) == Some(&bytes[i]) => {
                if start < i {
                    tokens.push(Token::Text(&text[start..i]));
                }
                tokens.push(Token::Brace(bytes[i] as char));
                i += 2;
                start = i;
            }
            b'{' => {
                if start < i {
                    tokens.push(Token::Text(&text[start..i]));
                }
                let close = text[i + 1..]
                    .find('}')
                    .map(|rel| i + 1 + rel)
                    .ok_or(PlaceholderError::Unclosed { offset: i })?;
                let name = &text[i + 1..close];
                if !is_placeholder_name(name) {
                    return Err(PlaceholderError::InvalidName {
                        name: name.to_string(),
                        offset: i,
                    });
                }
                tokens.push(Token::Name(name));
                i = close + 1;
                start = i;
            }
            b'}' => return Err(PlaceholderError::Unmatched { offset: i }),
            _ => i += 1,
        }
    }
    if start < bytes.len() {
        tokens.push(Token::Text(&text[start..]));
    }
    Ok(tokens)
}

fn is_placeholder_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(ch) if ch.is_ascii_alphabetic() || ch == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

/// Check that braces are balanced and names are identifiers.
pub fn validate(text: &str) -> Result<(), PlaceholderError> {
    tokenize(text).map(|_| ())
}

/// Placeholder names in first-appearance order, without duplicates.
pub fn placeholders(text: &str) -> Result<Vec<String>, PlaceholderError> {
    let mut names: Vec<String> = Vec::new();
    for token in tokenize(text)? {
        if let Token::Name(name) = token {
            if !names.iter().any(|seen| seen == name) {
                names.push(name.to_string());
            }
        }
    }
    Ok(names)
}

/// Substitute known placeholders.
///
/// Text that does not tokenize is returned unchanged.
pub fn render(text: &str, args: &BTreeMap<String, String>) -> String {
    let Ok(tokens) = tokenize(text) else {
        return text.to_string();
    };
    let mut out = String::with_capacity(text.len());
    for token in tokens {
        match token {
            Token::Text(chunk) => out.push_str(chunk),
            Token::Brace(ch) => out.push(ch),
            Token::Name(name) => match args.get(name) {
                Some(value) => out.push_str(value),
                None => {
                    out.push('{');
                    out.push_str(name);
                    out.push('}');
                }
            },
        }
    }
    out
}
