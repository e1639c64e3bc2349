//! Configuration loading with env-var overrides.
//!
//! Reads TOML files, supports `[meta] base = "..."` inheritance chains,
//! and applies `GARDEN_BIND`, `GARDEN_LOG_LEVEL`, `GOOGLE_SHEET_ID` and the
//! service-account env overrides.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::AppError;

use super::raw::RawConfig;
use super::types::*;

/// Values taken from the process environment.
///
/// Kept separate from the TOML so tests can pass them directly instead of
/// mutating env vars.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub bind: Option<String>,
    pub log_level: Option<String>,
    pub spreadsheet_id: Option<String>,
    pub credentials_file: Option<String>,
    pub service_account: ServiceAccountEnv,
}

impl EnvOverrides {
    /// Snapshot the relevant env vars. Empty values count as unset.
    pub fn from_env() -> Self {
        let var = |key: &str| env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            bind: var("GARDEN_BIND"),
            log_level: var("GARDEN_LOG_LEVEL"),
            spreadsheet_id: var("GOOGLE_SHEET_ID"),
            credentials_file: var("GOOGLE_APPLICATION_CREDENTIALS"),
            service_account: ServiceAccountEnv {
                client_email: var("GOOGLE_SERVICE_ACCOUNT_EMAIL"),
                private_key: var("GOOGLE_PRIVATE_KEY"),
            },
        }
    }
}

/// Deep-merge two TOML values.
/// Tables are merged recursively: the overlay only needs to specify keys that
/// differ from the base. For every other type (string, integer, array, …)
/// the overlay value replaces the base value wholesale.
fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_tbl), toml::Value::Table(overlay_tbl)) => {
            for (key, ov_val) in overlay_tbl {
                let merged = match base_tbl.remove(&key) {
                    Some(base_val) => merge_toml(base_val, ov_val),
                    None => ov_val,
                };
                base_tbl.insert(key, merged);
            }
            toml::Value::Table(base_tbl)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file, follow any `[meta] base = "..."` chain, and return the
/// fully merged `toml::Value`. `visited` carries canonicalized paths already
/// seen in this chain so circular references are caught early.
fn load_raw_merged(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<toml::Value, AppError> {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical) {
        return Err(AppError::Config(format!(
            "circular base reference detected at: {}",
            path.display()
        )));
    }

    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let overlay_val: toml::Value = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    if let Some(base_str) = overlay_val
        .get("meta")
        .and_then(|m| m.get("base"))
        .and_then(|b| b.as_str())
    {
        let base_path = if Path::new(base_str).is_absolute() {
            PathBuf::from(base_str)
        } else {
            path.parent().unwrap_or(Path::new(".")).join(base_str)
        };
        let base_val = load_raw_merged(&base_path, visited)?;
        Ok(merge_toml(base_val, overlay_val))
    } else {
        Ok(overlay_val)
    }
}

/// Load config from the given path, or `config/default.toml`, then apply env-var overrides.
/// If no path is given and `config/default.toml` does not exist, the built-in
/// defaults are used.
pub fn load(config_path: Option<&str>) -> Result<Config, AppError> {
    let overrides = EnvOverrides::from_env();

    if let Some(path) = config_path {
        return load_from(Path::new(path), &overrides);
    }

    let default_path = Path::new("config/default.toml");
    if default_path.exists() {
        load_from(default_path, &overrides)
    } else {
        resolve(RawConfig::default(), &overrides)
    }
}

/// Internal loader: accepts an explicit path and overrides.
/// Follows `[meta] base = "..."` inheritance chains before resolving.
pub fn load_from(path: &Path, overrides: &EnvOverrides) -> Result<Config, AppError> {
    let merged_val = load_raw_merged(path, &mut HashSet::new())?;

    let parsed: RawConfig = Deserialize::deserialize(merged_val).map_err(|e: toml::de::Error| {
        AppError::Config(format!("config error in {}: {e}", path.display()))
    })?;

    resolve(parsed, overrides)
}

fn resolve(parsed: RawConfig, overrides: &EnvOverrides) -> Result<Config, AppError> {
    let s = parsed.server;
    let sh = parsed.sheets;

    let spreadsheet_id = overrides
        .spreadsheet_id
        .clone()
        .or(sh.spreadsheet_id)
        .map(|id| id.trim().to_string())
        .unwrap_or_default();

    let backend = match sh.backend.as_deref().map(str::trim) {
        Some("google") => SheetsBackendKind::Google,
        Some("memory") => SheetsBackendKind::Memory,
        Some(other) => {
            return Err(AppError::Config(format!(
                "unknown sheets backend '{other}' (expected \"google\" or \"memory\")"
            )));
        }
        None if spreadsheet_id.is_empty() => SheetsBackendKind::Memory,
        None => SheetsBackendKind::Google,
    };

    if backend == SheetsBackendKind::Google && spreadsheet_id.is_empty() {
        return Err(AppError::Config(
            "sheets backend is google but no spreadsheet_id / GOOGLE_SHEET_ID is set".into(),
        ));
    }

    if sh.timeout_seconds == 0 {
        return Err(AppError::Config("sheets.timeout_seconds must be > 0".into()));
    }

    let log_level = overrides.log_level.clone().unwrap_or(s.log_level);
    crate::logger::parse_level(&log_level)
        .map_err(|e| AppError::Config(format!("server.log_level: {e}")))?;

    let credentials_file = overrides
        .credentials_file
        .as_deref()
        .or(sh.credentials_file.as_deref())
        .map(expand_home);

    Ok(Config {
        log_level,
        log_file: s.log_file.as_deref().map(expand_home),
        server: ServerConfig {
            bind: overrides.bind.clone().unwrap_or(s.bind),
            auto_setup: s.auto_setup,
        },
        ui: UiConfig {
            static_dir: parsed.ui.static_dir.as_deref().map(expand_home),
        },
        sheets: SheetsConfig {
            backend,
            spreadsheet_id,
            api_base_url: sh.api_base_url.trim_end_matches('/').to_string(),
            token_url: sh.token_url,
            timeout_seconds: sh.timeout_seconds,
            credentials_file,
            sheet_names: SheetNames {
                prompts: sh.prompts_sheet,
                tags: sh.tags_sheet,
                categories: sh.categories_sheet,
            },
        },
        service_account: overrides.service_account.clone(),
    })
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}
