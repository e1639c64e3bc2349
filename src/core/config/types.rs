//! Public configuration types.
//!
//! These are the resolved, ready-to-use structs the rest of the crate consumes.
//! Raw TOML deserialization types live in `raw.rs`.

use std::path::PathBuf;

// ── Server ──────────────────────────────────────────────────────────────────

/// HTTP listener configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address the axum listener binds to.
    pub bind: String,
    /// Run the idempotent sheet setup before serving.
    pub auto_setup: bool,
}

// ── UI ───────────────────────────────────────────────────────────────────────

/// Static frontend hosting.
#[derive(Debug, Clone)]
pub struct UiConfig {
    /// Directory holding the prebuilt SPA (`index.html` + assets).
    /// `None` serves the built-in landing page only.
    pub static_dir: Option<PathBuf>,
}

// ── Sheets ───────────────────────────────────────────────────────────────────

/// Which spreadsheet backend serves the prompt store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetsBackendKind {
    /// Google Sheets v4 over HTTPS.
    Google,
    /// In-process emulation; data is lost on exit.
    Memory,
}

impl SheetsBackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SheetsBackendKind::Google => "google",
            SheetsBackendKind::Memory => "memory",
        }
    }
}

impl std::fmt::Display for SheetsBackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sheet (tab) names inside the spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetNames {
    pub prompts: String,
    pub tags: String,
    pub categories: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            prompts: "Prompts".to_string(),
            tags: "Tags".to_string(),
            categories: "Categories".to_string(),
        }
    }
}

/// Spreadsheet configuration.
/// Populated from `[sheets]` in the TOML; secrets come from env only.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub backend: SheetsBackendKind,
    /// Spreadsheet ID (the long token in the sheet URL).
    pub spreadsheet_id: String,
    /// Sheets v4 spreadsheets endpoint.
    pub api_base_url: String,
    /// OAuth2 token endpoint for the service-account grant.
    pub token_url: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Optional service-account JSON key file.
    pub credentials_file: Option<PathBuf>,
    pub sheet_names: SheetNames,
}

/// Service-account credentials sourced from env (never TOML).
#[derive(Clone, Default)]
pub struct ServiceAccountEnv {
    pub client_email: Option<String>,
    pub private_key: Option<String>,
}

impl std::fmt::Debug for ServiceAccountEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountEnv")
            .field("client_email", &self.client_email)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

// ── Top-level ───────────────────────────────────────────────────────────────

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub server: ServerConfig,
    pub ui: UiConfig,
    pub sheets: SheetsConfig,
    pub service_account: ServiceAccountEnv,
}
