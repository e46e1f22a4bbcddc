//! File output that replaces its target atomically.
//!
//! Content is written to a temporary file next to the target and renamed over
//! it, so a failed write never leaves a truncated strings file behind.
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

pub fn write_text_atomic(path: &Path, text: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    let mut staged = NamedTempFile::new_in(parent)
        .with_context(|| format!("stage temp file in {}", parent.display()))?;
    staged
        .write_all(text.as_bytes())
        .with_context(|| format!("write staged {}", path.display()))?;
    staged
        .persist(path)
        .map_err(|err| anyhow!("publish {}: {}", path.display(), err.error))?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "wrote file");
    Ok(())
}

pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut text = serde_json::to_string_pretty(value).context("serialize JSON output")?;
    text.push('\n');
    write_text_atomic(path, &text)
}
