//! Spreadsheet backend abstraction.
//!
//! `SheetsBackend` is an enum over concrete backends: the Google Sheets v4
//! REST API and an in-process emulation used for local runs and tests.
//! Methods are `async fn` on the enum so callers need no trait objects.
//!
//! All values travel as strings. Rows read back have trailing empty cells
//! removed, matching what the Sheets API returns.

pub mod auth;
pub mod google;
pub mod memory;

use std::fmt;

use thiserror::Error;

use crate::config::{ServiceAccountEnv, SheetsBackendKind, SheetsConfig};

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("credentials: {0}")]
    Credentials(String),
    #[error("token exchange failed: {0}")]
    Auth(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("invalid range: {0}")]
    Range(String),
    #[error("sheet store lock poisoned")]
    Lock,
}

// ── Ranges ────────────────────────────────────────────────────────────────────

/// An A1-notation range over a single sheet, e.g. `Prompts!A2:G`.
///
/// Columns are letters. Rows are 1-based; `None` leaves the bound open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct A1Range {
    pub sheet: String,
    pub start_col: char,
    pub start_row: Option<u32>,
    pub end_col: char,
    pub end_row: Option<u32>,
}

impl A1Range {
    /// Whole columns `start_col:end_col`.
    pub fn columns(sheet: &str, start_col: char, end_col: char) -> Self {
        Self {
            sheet: sheet.to_string(),
            start_col,
            start_row: None,
            end_col,
            end_row: None,
        }
    }

    /// Columns from `start_row` down to the last row.
    pub fn from_row(sheet: &str, start_col: char, start_row: u32, end_col: char) -> Self {
        Self {
            sheet: sheet.to_string(),
            start_col,
            start_row: Some(start_row),
            end_col,
            end_row: None,
        }
    }

    /// A single row `start_col{row}:end_col{row}`.
    pub fn row(sheet: &str, start_col: char, row: u32, end_col: char) -> Self {
        Self {
            sheet: sheet.to_string(),
            start_col,
            start_row: Some(row),
            end_col,
            end_row: Some(row),
        }
    }

    /// Zero-based column offsets, inclusive.
    pub fn column_span(&self) -> Result<(usize, usize), SheetsError> {
        let idx = |c: char| -> Result<usize, SheetsError> {
            if c.is_ascii_uppercase() {
                Ok((c as u8 - b'A') as usize)
            } else {
                Err(SheetsError::Range(format!("unsupported column '{c}' in {self}")))
            }
        };
        let (start, end) = (idx(self.start_col)?, idx(self.end_col)?);
        if end < start {
            return Err(SheetsError::Range(format!("columns out of order in {self}")));
        }
        Ok((start, end))
    }
}

impl fmt::Display for A1Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if needs_quoting(&self.sheet) {
            write!(f, "'{}'", self.sheet.replace('\'', "''"))?;
        } else {
            f.write_str(&self.sheet)?;
        }
        write!(f, "!{}", self.start_col)?;
        if let Some(r) = self.start_row {
            write!(f, "{r}")?;
        }
        write!(f, ":{}", self.end_col)?;
        if let Some(r) = self.end_row {
            write!(f, "{r}")?;
        }
        Ok(())
    }
}

/// Sheet names outside `[A-Za-z0-9_]` must be single-quoted in A1 notation.
fn needs_quoting(sheet: &str) -> bool {
    sheet.is_empty() || !sheet.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub type Rows = Vec<Vec<String>>;

// ── Backend enum ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum SheetsBackend {
    Google(google::GoogleSheets),
    Memory(memory::MemorySheets),
}

impl SheetsBackend {
    /// Read a range. Missing trailing rows are not returned.
    pub async fn get_values(&self, range: &A1Range) -> Result<Rows, SheetsError> {
        match self {
            SheetsBackend::Google(b) => b.get_values(range).await,
            SheetsBackend::Memory(b) => b.get_values(range),
        }
    }

    /// Append rows after the last non-empty row of the range's table.
    pub async fn append_values(&self, range: &A1Range, rows: Rows) -> Result<(), SheetsError> {
        match self {
            SheetsBackend::Google(b) => b.append_values(range, rows).await,
            SheetsBackend::Memory(b) => b.append_values(range, rows),
        }
    }

    /// Overwrite cells starting at the range's top-left corner.
    pub async fn update_values(&self, range: &A1Range, rows: Rows) -> Result<(), SheetsError> {
        match self {
            SheetsBackend::Google(b) => b.update_values(range, rows).await,
            SheetsBackend::Memory(b) => b.update_values(range, rows),
        }
    }

    /// Blank every cell in the range. Row positions are kept.
    pub async fn clear_values(&self, range: &A1Range) -> Result<(), SheetsError> {
        match self {
            SheetsBackend::Google(b) => b.clear_values(range).await,
            SheetsBackend::Memory(b) => b.clear_values(range),
        }
    }

    /// Titles of the sheets (tabs) in the spreadsheet.
    pub async fn sheet_titles(&self) -> Result<Vec<String>, SheetsError> {
        match self {
            SheetsBackend::Google(b) => b.sheet_titles().await,
            SheetsBackend::Memory(b) => b.sheet_titles(),
        }
    }

    pub async fn add_sheet(&self, title: &str) -> Result<(), SheetsError> {
        match self {
            SheetsBackend::Google(b) => b.add_sheet(title).await,
            SheetsBackend::Memory(b) => b.add_sheet(title),
        }
    }

    /// Spreadsheet title; doubles as a connectivity probe.
    pub async fn spreadsheet_title(&self) -> Result<String, SheetsError> {
        match self {
            SheetsBackend::Google(b) => b.spreadsheet_title().await,
            SheetsBackend::Memory(b) => Ok(b.spreadsheet_title()),
        }
    }

    pub fn kind(&self) -> SheetsBackendKind {
        match self {
            SheetsBackend::Google(_) => SheetsBackendKind::Google,
            SheetsBackend::Memory(_) => SheetsBackendKind::Memory,
        }
    }
}

/// Construct a backend from config. Service-account secrets come from env
/// or from the configured key file.
pub fn build(config: &SheetsConfig, account: &ServiceAccountEnv) -> Result<SheetsBackend, SheetsError> {
    match config.backend {
        SheetsBackendKind::Memory => Ok(SheetsBackend::Memory(memory::MemorySheets::new())),
        SheetsBackendKind::Google => {
            let key = auth::ServiceAccountKey::resolve(account, config.credentials_file.as_deref())?;
            let tokens = auth::TokenSource::new(key, config.token_url.clone(), config.timeout_seconds)?;
            let sheets = google::GoogleSheets::new(
                config.api_base_url.clone(),
                config.spreadsheet_id.clone(),
                config.timeout_seconds,
                tokens,
            )?;
            Ok(SheetsBackend::Google(sheets))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_display() {
        assert_eq!(A1Range::columns("Prompts", 'A', 'G').to_string(), "Prompts!A:G");
        assert_eq!(A1Range::from_row("Tags", 'A', 2, 'C').to_string(), "Tags!A2:C");
        assert_eq!(A1Range::row("Prompts", 'A', 7, 'G').to_string(), "Prompts!A7:G7");
    }

    #[test]
    fn range_display_quotes_sheet_names() {
        assert_eq!(
            A1Range::from_row("My Prompts", 'A', 2, 'G').to_string(),
            "'My Prompts'!A2:G"
        );
        assert_eq!(A1Range::columns("Bob's", 'A', 'C').to_string(), "'Bob''s'!A:C");
        assert_eq!(A1Range::columns("Tags!", 'A', 'C').to_string(), "'Tags!'!A:C");
    }

    #[test]
    fn column_span_checks_bounds() {
        assert_eq!(A1Range::columns("S", 'A', 'G').column_span().unwrap(), (0, 6));
        assert!(A1Range::columns("S", 'C', 'A').column_span().is_err());
        assert!(A1Range::columns("S", 'a', 'C').column_span().is_err());
    }

    #[test]
    fn build_memory_backend() {
        let cfg = crate::config::Config::memory_default();
        let backend = build(&cfg.sheets, &cfg.service_account).unwrap();
        assert_eq!(backend.kind(), SheetsBackendKind::Memory);
    }

    #[test]
    fn build_google_without_credentials_fails() {
        let mut cfg = crate::config::Config::memory_default();
        cfg.sheets.backend = SheetsBackendKind::Google;
        cfg.sheets.spreadsheet_id = "sheet-id".into();
        let err = build(&cfg.sheets, &ServiceAccountEnv::default()).unwrap_err();
        assert!(matches!(err, SheetsError::Credentials(_)));
    }
}
