use super::*;
use crate::catalog::Scope;
use crate::keypath::KeyPath;
use tempfile::TempDir;

fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent directory");
    }
    std::fs::write(path, contents.as_bytes()).expect("write file");
}

fn sample_config() -> StringsConfig {
    StringsConfig {
        common: Some("strings/common.json".to_string()),
        components: BTreeMap::from([("fyta".to_string(), "strings/fyta.json".to_string())]),
        domain: Some("fyta".to_string()),
        ..StringsConfig::default()
    }
}

#[test]
fn load_config_resolves_paths_against_config_dir() {
    let root = TempDir::new().expect("temp dir");
    write_file(
        &root.path().join("strings/common.json"),
        r#"{"config_flow": {"data": {"password": "Password"}}}"#,
    );
    write_file(
        &root.path().join("strings/fyta.json"),
        r#"{"config": {"step": {"user": {"data": {"password": "[%key:common::config_flow::data::password%]"}}}}}"#,
    );
    let config_path = root.path().join(CONFIG_FILE_NAME);
    write_config(&config_path, &sample_config()).expect("write config");

    let loaded = load_config(&config_path).expect("load config");
    assert_eq!(loaded.config, sample_config());
    let catalog = loaded.load_catalog().expect("load catalog");
    assert_eq!(catalog.max_depth(), DEFAULT_MAX_DEPTH);
    let value = catalog
        .resolve(
            &Scope::Component("fyta".to_string()),
            &KeyPath::parse("config.step.user.data.password").expect("key"),
        )
        .expect("resolve");
    assert_eq!(value, "Password");
}

#[test]
fn missing_fields_take_defaults() {
    let config: StringsConfig =
        serde_json::from_str(r#"{"schema_version": 1}"#).expect("parse minimal config");
    assert_eq!(config, StringsConfig::default());
    validate_config(&config).expect("minimal config is valid");
}

#[test]
fn validate_config_rejects_bad_values() {
    let mut config = sample_config();
    config.schema_version = 2;
    assert!(validate_config(&config).is_err());

    let mut config = sample_config();
    config.max_reference_depth = 0;
    assert!(validate_config(&config).is_err());

    let mut config = sample_config();
    config.components.insert("other".into(), "../escape.json".into());
    let err = validate_config(&config).unwrap_err().to_string();
    assert!(err.contains("relative paths"), "{err}");

    let mut config = sample_config();
    config.domain = Some("unknown".into());
    assert!(validate_config(&config).is_err());
}

#[test]
fn unknown_fields_are_rejected() {
    let result: std::result::Result<StringsConfig, _> =
        serde_json::from_str(r#"{"schema_version": 1, "locale": "en"}"#);
    assert!(result.is_err());
}

#[test]
fn missing_table_reports_path() {
    let root = TempDir::new().expect("temp dir");
    let config_path = root.path().join(CONFIG_FILE_NAME);
    write_config(&config_path, &sample_config()).expect("write config");
    let loaded = load_config(&config_path).expect("load config");
    let err = loaded.load_catalog().unwrap_err();
    assert!(format!("{err:#}").contains("common.json"), "{err:#}");
}
