//! Raw TOML deserialization types.
//!
//! These structs mirror the TOML file shape and use `serde` defaults.
//! The `load` module converts them into the public `types` structs.

use serde::Deserialize;

// ── Top-level ────────────────────────────────────────────────────────────────

/// Raw TOML shape: serde target before resolution.
#[derive(Deserialize, Default)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub server: RawServer,
    #[serde(default)]
    pub ui: RawUi,
    #[serde(default)]
    pub sheets: RawSheets,
}

// ── Server ───────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct RawServer {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_file: Option<String>,
    #[serde(default)]
    pub auto_setup: bool,
}

impl Default for RawServer {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            log_level: default_log_level(),
            log_file: None,
            auto_setup: false,
        }
    }
}

// ── UI ───────────────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub(super) struct RawUi {
    #[serde(default)]
    pub static_dir: Option<String>,
}

// ── Sheets ───────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct RawSheets {
    /// `"google"` or `"memory"`. Unset picks google when a spreadsheet id is known.
    #[serde(default)]
    pub backend: Option<String>,
    #[serde(default)]
    pub spreadsheet_id: Option<String>,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub credentials_file: Option<String>,
    #[serde(default = "default_prompts_sheet")]
    pub prompts_sheet: String,
    #[serde(default = "default_tags_sheet")]
    pub tags_sheet: String,
    #[serde(default = "default_categories_sheet")]
    pub categories_sheet: String,
}

impl Default for RawSheets {
    fn default() -> Self {
        Self {
            backend: None,
            spreadsheet_id: None,
            api_base_url: default_api_base_url(),
            token_url: default_token_url(),
            timeout_seconds: default_timeout_seconds(),
            credentials_file: None,
            prompts_sheet: default_prompts_sheet(),
            tags_sheet: default_tags_sheet(),
            categories_sheet: default_categories_sheet(),
        }
    }
}

// ── Default functions (used by serde) ────────────────────────────────────────

pub(super) fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

pub(super) fn default_log_level() -> String {
    "info".to_string()
}

pub(super) fn default_api_base_url() -> String {
    "https://sheets.googleapis.com/v4/spreadsheets".to_string()
}

pub(super) fn default_token_url() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

pub(super) fn default_timeout_seconds() -> u64 {
    30
}

fn default_prompts_sheet() -> String {
    "Prompts".to_string()
}
fn default_tags_sheet() -> String {
    "Tags".to_string()
}
fn default_categories_sheet() -> String {
    "Categories".to_string()
}
