//! Shipped configuration files load and resolve.

use std::path::Path;

use prompt_garden::config::{EnvOverrides, SheetsBackendKind, load_from};

#[test]
fn test_default_config_loads() {
    let cfg = load_from(Path::new("config/default.toml"), &EnvOverrides::default()).unwrap();
    assert_eq!(cfg.server.bind, "127.0.0.1:3000");
    assert_eq!(cfg.sheets.backend, SheetsBackendKind::Memory);
    assert_eq!(cfg.sheets.sheet_names.prompts, "Prompts");
    assert!(cfg.server.auto_setup);
}

#[test]
fn test_default_config_switches_to_google_with_sheet_id() {
    let overrides = EnvOverrides {
        spreadsheet_id: Some("abc123".into()),
        ..Default::default()
    };
    let cfg = load_from(Path::new("config/default.toml"), &overrides).unwrap();
    assert_eq!(cfg.sheets.backend, SheetsBackendKind::Google);
    assert_eq!(cfg.sheets.spreadsheet_id, "abc123");
}

#[test]
fn test_dev_config_inherits_default() {
    let overrides = EnvOverrides {
        spreadsheet_id: Some("ignored-by-explicit-backend".into()),
        ..Default::default()
    };
    let cfg = load_from(Path::new("config/dev.toml"), &overrides).unwrap();
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(cfg.sheets.backend, SheetsBackendKind::Memory);
    assert_eq!(cfg.sheets.timeout_seconds, 30);
}
