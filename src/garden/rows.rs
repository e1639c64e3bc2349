//! Mapping between prompts and `Prompts` sheet rows.
//!
//! Column order: `ID, Title, Content, Tags, Category, Created At, Updated At`.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

use super::model::Prompt;

pub const PROMPT_HEADERS: [&str; 7] = [
    "ID",
    "Title",
    "Content",
    "Tags",
    "Category",
    "Created At",
    "Updated At",
];

/// First data row; row 1 holds the headers.
pub const FIRST_DATA_ROW: u32 = 2;

pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Canonical millisecond UTC form, or now when the stored value is unusable.
fn normalize_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(ts) => ts
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        Err(e) => {
            debug!(value = raw, error = %e, "unparseable timestamp, using now");
            now_timestamp()
        }
    }
}

/// Trim, drop empties, split embedded commas, dedupe keeping first occurrence.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        for piece in tag.as_ref().split(',') {
            let piece = piece.trim();
            if !piece.is_empty() && !out.iter().any(|t| t == piece) {
                out.push(piece.to_string());
            }
        }
    }
    out
}

pub fn to_row(p: &Prompt) -> Vec<String> {
    vec![
        p.id.clone(),
        p.title.clone(),
        p.content.clone(),
        p.tags.join(", "),
        p.category.clone().unwrap_or_default(),
        p.created_at.clone(),
        p.updated_at.clone(),
    ]
}

/// `None` for blank rows and rows without an ID.
pub fn from_row(row: u32, cells: &[String]) -> Option<Prompt> {
    let cell = |i: usize| cells.get(i).map(String::as_str).unwrap_or("");

    let id = cell(0).trim();
    if id.is_empty() {
        if cells.iter().any(|c| !c.trim().is_empty()) {
            debug!(row, "skipping row without ID");
        }
        return None;
    }

    let category = cell(4).trim();
    Some(Prompt {
        id: id.to_string(),
        title: cell(1).to_string(),
        content: cell(2).to_string(),
        tags: normalize_tags([cell(3)]),
        category: (!category.is_empty()).then(|| category.to_string()),
        created_at: normalize_timestamp(cell(5)),
        updated_at: normalize_timestamp(cell(6)),
        row,
    })
}

/// Data rows of the sheet (header excluded) mapped to prompts, keeping each
/// prompt's physical row number.
pub fn parse_rows(rows: &[Vec<String>]) -> Vec<Prompt> {
    rows.iter()
        .zip(FIRST_DATA_ROW..)
        .filter_map(|(cells, row)| from_row(row, cells))
        .collect()
}
