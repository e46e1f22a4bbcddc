//! Project configuration (`hstr.json`).
//!
//! The config names the shared table and the component tables to load so a
//! repository checkout can be linted without repeating paths on the command
//! line. Paths are relative to the config file.
use crate::catalog::Catalog;
use crate::keypath::is_valid_segment;
use crate::resolve::DEFAULT_MAX_DEPTH;
use crate::table::StringTable;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_SCHEMA_VERSION: u32 = 1;
pub const CONFIG_FILE_NAME: &str = "hstr.json";
pub const MAX_REFERENCE_DEPTH_LIMIT: usize = 64;

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StringsConfig {
    pub schema_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common: Option<String>,
    #[serde(default)]
    pub components: BTreeMap<String, String>,
    /// Component used when a command does not name one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default = "default_max_depth")]
    pub max_reference_depth: usize,
}

impl Default for StringsConfig {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION,
            common: None,
            components: BTreeMap::new(),
            domain: None,
            max_reference_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// A validated config plus the directory its paths are relative to.
#[derive(Clone, Debug)]
pub struct LoadedConfig {
    pub config: StringsConfig,
    pub base_dir: PathBuf,
}

impl LoadedConfig {
    /// Load every table the config names into a catalog.
    pub fn load_catalog(&self) -> Result<Catalog> {
        let mut catalog = Catalog::new().with_max_depth(self.config.max_reference_depth);
        if let Some(common) = &self.config.common {
            let path = self.base_dir.join(common);
            let table = StringTable::from_path(&path)
                .with_context(|| format!("load common strings {}", path.display()))?;
            catalog = catalog.with_common(table);
        }
        for (domain, rel) in &self.config.components {
            let path = self.base_dir.join(rel);
            let table = StringTable::from_path(&path)
                .with_context(|| format!("load {domain} strings {}", path.display()))?;
            catalog = catalog.with_component(domain.clone(), table);
        }
        Ok(catalog)
    }
}

/// Load and validate a config file.
pub fn load_config(path: &Path) -> Result<LoadedConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: StringsConfig =
        serde_json::from_slice(&bytes).context("parse hstr config JSON")?;
    validate_config(&config)?;
    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(LoadedConfig { config, base_dir })
}

/// Persist a config in stable JSON form.
pub fn write_config(path: &Path, config: &StringsConfig) -> Result<()> {
    let mut text = serde_json::to_string_pretty(config).context("serialize hstr config")?;
    text.push('\n');
    crate::output::write_text_atomic(path, &text)
}

pub fn validate_config(config: &StringsConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported hstr config schema_version {}",
            config.schema_version
        ));
    }
    if config.max_reference_depth == 0 || config.max_reference_depth > MAX_REFERENCE_DEPTH_LIMIT {
        return Err(anyhow!(
            "max_reference_depth must be between 1 and {MAX_REFERENCE_DEPTH_LIMIT} (got {})",
            config.max_reference_depth
        ));
    }
    if let Some(common) = &config.common {
        validate_relative_path(common, "common")?;
    }
    for (domain, rel) in &config.components {
        if !is_valid_segment(domain) {
            return Err(anyhow!("invalid component domain {domain:?}"));
        }
        validate_relative_path(rel, "components")?;
    }
    if let Some(domain) = &config.domain {
        if !config.components.contains_key(domain) {
            return Err(anyhow!(
                "domain {domain:?} is not listed under components"
            ));
        }
    }
    Ok(())
}

fn validate_relative_path(rel: &str, label: &str) -> Result<()> {
    let path = Path::new(rel);
    if rel.trim().is_empty() || path.is_absolute() || has_parent_components(path) {
        return Err(anyhow!(
            "{label} entries must be relative paths without '..' (got {rel:?})"
        ));
    }
    Ok(())
}

fn has_parent_components(path: &Path) -> bool {
    path.components()
        .any(|component| matches!(component, std::path::Component::ParentDir))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
