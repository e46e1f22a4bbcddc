use crate::cli::{CheckArgs, FlattenArgs, FmtArgs, KeysArgs, ResolveArgs, SourceArgs};
use anyhow::{anyhow, Context, Result};
use hass_strings::bundled::{bundled_catalog, FYTA_DOMAIN};
use hass_strings::check::{check_catalog, Severity};
use hass_strings::config::{load_config, MAX_REFERENCE_DEPTH_LIMIT};
use hass_strings::keypath::{is_valid_segment, KeyPath};
use hass_strings::output::{write_json_atomic, write_text_atomic};
use hass_strings::placeholders;
use hass_strings::{Catalog, Scope, StringTable, TranslationStore};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_LOCALE: &str = "en";

/// Tables selected by the global flags.
struct Sources {
    catalog: Catalog,
    scope: Scope,
    files: Vec<PathBuf>,
}

fn load_sources(args: &SourceArgs) -> Result<Sources> {
    let mut files = Vec::new();
    let mut config_domain = None;
    let mut config_depth = None;

    let mut catalog = if let Some(config_path) = &args.config {
        let loaded = load_config(config_path)?;
        if let Some(common) = &loaded.config.common {
            files.push(loaded.base_dir.join(common));
        }
        for rel in loaded.config.components.values() {
            files.push(loaded.base_dir.join(rel));
        }
        config_domain = loaded.config.domain.clone();
        config_depth = Some(loaded.config.max_reference_depth);
        loaded.load_catalog()?
    } else if args.strings.is_none() {
        tracing::debug!("no strings given, using bundled tables");
        config_domain = Some(FYTA_DOMAIN.to_string());
        bundled_catalog().context("load bundled strings")?
    } else {
        Catalog::new()
    };

    if let Some(common) = &args.common {
        let table = StringTable::from_path(common)
            .with_context(|| format!("load common strings {}", common.display()))?;
        catalog = catalog.with_common(table);
        files.push(common.clone());
    }

    let mut strings_domain = None;
    if let Some(strings) = &args.strings {
        let domain = match &args.domain {
            Some(domain) => domain.clone(),
            None => infer_domain(strings)?,
        };
        let table = StringTable::from_path(strings)
            .with_context(|| format!("load strings {}", strings.display()))?;
        catalog = catalog.with_component(domain.clone(), table);
        files.push(strings.clone());
        strings_domain = Some(domain);
    }

    let domain = args
        .domain
        .clone()
        .or(strings_domain)
        .or(config_domain)
        .or_else(|| single_domain(&catalog))
        .ok_or_else(|| anyhow!("several components loaded; pass --domain"))?;
    if !catalog.domains().any(|known| known == domain) {
        return Err(anyhow!("no strings loaded for domain {domain:?}"));
    }

    let max_depth = args.max_depth.or(config_depth).unwrap_or(catalog.max_depth());
    if max_depth == 0 || max_depth > MAX_REFERENCE_DEPTH_LIMIT {
        return Err(anyhow!(
            "--max-depth must be between 1 and {MAX_REFERENCE_DEPTH_LIMIT} (got {max_depth})"
        ));
    }

    Ok(Sources {
        catalog: catalog.with_max_depth(max_depth),
        scope: Scope::Component(domain),
        files,
    })
}

fn single_domain(catalog: &Catalog) -> Option<String> {
    let mut domains = catalog.domains();
    match (domains.next(), domains.next()) {
        (Some(only), None) => Some(only.to_string()),
        _ => None,
    }
}

/// `components/<domain>/strings.json` names its domain by directory;
/// anything else by file stem.
fn infer_domain(path: &Path) -> Result<String> {
    let stem = path.file_stem().and_then(|stem| stem.to_str());
    let candidate = match stem {
        Some("strings") => path
            .parent()
            .and_then(|parent| parent.file_name())
            .and_then(|name| name.to_str()),
        other => other,
    };
    candidate
        .filter(|name| is_valid_segment(name))
        .map(str::to_string)
        .ok_or_else(|| anyhow!("cannot infer domain from {}; pass --domain", path.display()))
}

fn parse_placeholder_args(raw: &[String]) -> Result<BTreeMap<String, String>> {
    let mut args = BTreeMap::new();
    for pair in raw {
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("invalid --arg {pair:?}; expected NAME=VALUE"))?;
        args.insert(name.trim().to_string(), value.to_string());
    }
    Ok(args)
}

pub fn run_resolve(source: &SourceArgs, args: ResolveArgs) -> Result<()> {
    let sources = load_sources(source)?;
    let placeholder_args = parse_placeholder_args(&args.args)?;

    let store = TranslationStore::new();
    if args.eager {
        store
            .load(DEFAULT_LOCALE, &sources.catalog, &sources.scope)
            .with_context(|| format!("resolve {}", sources.scope))?;
    }

    let mut resolved = Vec::new();
    for key in &args.keys {
        // Scoped keys live outside the flattened index, so they go through the catalog.
        let flattened = store
            .get(DEFAULT_LOCALE)
            .and_then(|table| table.get(key).map(str::to_string));
        let value = match flattened {
            Some(value) => Ok(value),
            None => KeyPath::parse(key)
                .map_err(anyhow::Error::from)
                .and_then(|path| {
                    sources
                        .catalog
                        .resolve(&sources.scope, &path)
                        .map_err(anyhow::Error::from)
                }),
        };
        let value = match value {
            Ok(value) => placeholders::render(&value, &placeholder_args),
            Err(err) if args.fallback => {
                tracing::warn!(key = %key, error = %err, "unresolved key, printing key");
                key.clone()
            }
            Err(err) => return Err(err.context(format!("resolve {key}"))),
        };
        resolved.push((key.clone(), value));
    }

    if args.json {
        let map: serde_json::Map<String, serde_json::Value> = resolved
            .into_iter()
            .map(|(key, value)| (key, serde_json::Value::String(value)))
            .collect();
        let text = serde_json::to_string_pretty(&map).context("serialize resolve output")?;
        println!("{text}");
    } else {
        for (_, value) in resolved {
            println!("{value}");
        }
    }
    Ok(())
}

pub fn run_flatten(source: &SourceArgs, args: FlattenArgs) -> Result<()> {
    let sources = load_sources(source)?;
    let resolved = sources
        .catalog
        .build(&sources.scope)
        .with_context(|| format!("flatten {}", sources.scope))?;

    match (&args.out, args.flat) {
        (Some(out), true) => {
            write_json_atomic(out, &resolved.flat())?;
            println!("wrote {}", out.display());
        }
        (Some(out), false) => {
            let text = resolved
                .tree()
                .to_json_string()
                .context("serialize resolved strings")?;
            write_text_atomic(out, &text)?;
            println!("wrote {}", out.display());
        }
        (None, true) => {
            let text = serde_json::to_string_pretty(&resolved.flat())
                .context("serialize resolved strings")?;
            println!("{text}");
        }
        (None, false) => {
            let text = resolved
                .tree()
                .to_json_string()
                .context("serialize resolved strings")?;
            print!("{text}");
        }
    }
    Ok(())
}

pub fn run_check(source: &SourceArgs, args: CheckArgs) -> Result<()> {
    let sources = load_sources(source)?;
    let report = check_catalog(&sources.catalog);

    if args.json {
        let text = serde_json::to_string_pretty(&report).context("serialize check report")?;
        println!("{text}");
    } else {
        for issue in &report.issues {
            let label = match issue.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            println!(
                "{label}[{}] {} {}: {}",
                issue.code, issue.scope, issue.key, issue.message
            );
        }
        println!(
            "checked {} tables ({} entries): {} errors, {} warnings",
            report.tables, report.entries, report.error_count, report.warning_count
        );
    }

    if !report.is_clean() {
        return Err(anyhow!("{} string table errors", report.error_count));
    }
    Ok(())
}

pub fn run_keys(source: &SourceArgs, args: KeysArgs) -> Result<()> {
    let sources = load_sources(source)?;
    let table = sources
        .catalog
        .table(&sources.scope)
        .ok_or_else(|| anyhow!("no strings loaded for {}", sources.scope))?;
    for (path, _) in table.leaves() {
        let in_namespace = match &args.namespace {
            Some(namespace) => path.segments().first() == Some(namespace),
            None => true,
        };
        if in_namespace {
            println!("{}", path.dotted());
        }
    }
    Ok(())
}

pub fn run_fmt(source: &SourceArgs, args: FmtArgs) -> Result<()> {
    let sources = load_sources(source)?;
    if sources.files.is_empty() {
        return Err(anyhow!("fmt needs --strings, --common or --config"));
    }

    let mut unformatted = Vec::new();
    for path in &sources.files {
        let text =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let table = StringTable::from_json_str(&text)
            .with_context(|| format!("parse {}", path.display()))?;
        let canonical = table
            .to_json_string()
            .with_context(|| format!("serialize {}", path.display()))?;
        if canonical == text {
            continue;
        }
        if args.check {
            println!("{} is not canonical", path.display());
        } else {
            write_text_atomic(path, &canonical)?;
            println!("formatted {}", path.display());
        }
        unformatted.push(path.clone());
    }

    if args.check && !unformatted.is_empty() {
        return Err(anyhow!("{} files need formatting", unformatted.len()));
    }
    Ok(())
}
