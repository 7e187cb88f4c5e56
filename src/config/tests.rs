//! Configuration tests
//!
//! The rendered template must parse back into the config it came from; when
//! a field is added, the round-trip tests fail until `to_toml` covers it.

use super::*;

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_roundtrip_default() {
    let config = Config::default();
    let toml_str = config.to_toml();

    let parsed = Config::from_toml_str(&toml_str);
    assert!(
        parsed.is_ok(),
        "Default config should round-trip.\nTOML:\n{}\nError: {:?}",
        toml_str,
        parsed.err()
    );
    assert_eq!(parsed.unwrap(), config);
}

#[test]
fn test_config_roundtrip_customized() {
    let mut config = Config::default();
    config.logging.level = "debug".to_string();
    config.logging.format = LogFormat::Json;
    config.page_view.refire_on_visibility = true;
    config.data_layer.flush = false;
    config.data_layer.history_limit = Some(25);

    let parsed = Config::from_toml_str(&config.to_toml()).unwrap();
    assert_eq!(parsed, config);
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_document_yields_defaults() {
    let config = Config::from_toml_str("").unwrap();
    assert_eq!(config, Config::default());
    assert!(config.data_layer.flush);
    assert!(!config.page_view.refire_on_visibility);
}

#[test]
fn test_partial_sections_keep_other_defaults() {
    let config = Config::from_toml_str(
        r#"
[data_layer]
history_limit = 10
"#,
    )
    .unwrap();

    assert_eq!(config.data_layer.history_limit, Some(10));
    assert!(config.data_layer.flush);
    assert_eq!(config.logging, LoggingConfig::default());
}

#[test]
fn test_unknown_format_falls_back_to_text() {
    let config = Config::from_toml_str("[logging]\nformat = \"xml\"\n").unwrap();
    assert_eq!(config.logging.format, LogFormat::Text);
}

#[test]
fn test_invalid_toml_is_an_error() {
    let err = Config::from_toml_str("[logging\nlevel = ").unwrap_err();
    assert!(
        format!("{:#}", err).contains("Failed to parse tracker configuration"),
        "unexpected error: {:#}",
        err
    );
}

#[test]
fn test_unknown_key_is_an_error() {
    assert!(Config::from_toml_str("[data_layer]\nflsuh = true\n").is_err());
}

#[test]
fn test_load_missing_file_names_path() {
    let path = std::env::temp_dir().join("scope-tracker-missing-config.toml");
    let err = Config::load(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("scope-tracker-missing-config.toml"));
}

#[test]
fn test_load_reads_file() {
    let path = std::env::temp_dir().join(format!(
        "scope-tracker-config-{}.toml",
        std::process::id()
    ));
    std::fs::write(&path, "[page_view]\nrefire_on_visibility = true\n").unwrap();

    let config = Config::load(&path);
    let _ = std::fs::remove_file(&path);

    assert!(config.unwrap().page_view.refire_on_visibility);
}

#[test]
fn test_page_view_options_follow_config() {
    let config = PageViewConfig {
        refire_on_visibility: true,
    };
    assert!(config.options().refire_on_visibility);
}
