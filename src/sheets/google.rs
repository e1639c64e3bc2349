//! Google Sheets v4 REST backend.
//!
//! Wire types are private to this module. Every request carries a bearer token
//! from [`TokenSource`]; non-2xx responses become [`SheetsError::Status`].

use std::time::Duration;

use reqwest::{Client, Method, Url};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, error, trace};

use super::auth::TokenSource;
use super::{A1Range, Rows, SheetsError};

#[derive(Debug, Clone)]
pub struct GoogleSheets {
    client: Client,
    api_base_url: String,
    spreadsheet_id: String,
    tokens: TokenSource,
}

impl GoogleSheets {
    pub fn new(
        api_base_url: String,
        spreadsheet_id: String,
        timeout_seconds: u64,
        tokens: TokenSource,
    ) -> Result<Self, SheetsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| SheetsError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, api_base_url, spreadsheet_id, tokens })
    }

    pub async fn get_values(&self, range: &A1Range) -> Result<Rows, SheetsError> {
        let url = self.url(&["values", &range.to_string()])?;
        let resp: ValueRange = self.send(Method::GET, url, None).await?;
        Ok(resp
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    pub async fn append_values(&self, range: &A1Range, rows: Rows) -> Result<(), SheetsError> {
        let mut url = self.url(&["values", &format!("{range}:append")])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");
        let body = json!({ "values": rows });
        let _: Value = self.send(Method::POST, url, Some(body)).await?;
        Ok(())
    }

    pub async fn update_values(&self, range: &A1Range, rows: Rows) -> Result<(), SheetsError> {
        let mut url = self.url(&["values", &range.to_string()])?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        let body = json!({
            "range": range.to_string(),
            "majorDimension": "ROWS",
            "values": rows,
        });
        let _: Value = self.send(Method::PUT, url, Some(body)).await?;
        Ok(())
    }

    pub async fn clear_values(&self, range: &A1Range) -> Result<(), SheetsError> {
        let url = self.url(&["values", &format!("{range}:clear")])?;
        let _: Value = self.send(Method::POST, url, Some(json!({}))).await?;
        Ok(())
    }

    pub async fn sheet_titles(&self) -> Result<Vec<String>, SheetsError> {
        let mut url = self.url(&[])?;
        url.query_pairs_mut().append_pair("fields", "sheets.properties.title");
        let meta: SpreadsheetMeta = self.send(Method::GET, url, None).await?;
        Ok(meta.sheets.into_iter().map(|s| s.properties.title).collect())
    }

    pub async fn spreadsheet_title(&self) -> Result<String, SheetsError> {
        let mut url = self.url(&[])?;
        url.query_pairs_mut().append_pair("fields", "properties.title");
        let meta: TitleOnly = self.send(Method::GET, url, None).await?;
        Ok(meta.properties.title)
    }

    pub async fn add_sheet(&self, title: &str) -> Result<(), SheetsError> {
        let url = self.batch_update_url()?;
        let body = json!({
            "requests": [{ "addSheet": { "properties": { "title": title } } }]
        });
        let _: Value = self.send(Method::POST, url, Some(body)).await?;
        Ok(())
    }

    /// `{base}/{spreadsheet_id}/{segments...}` with each segment percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url, SheetsError> {
        let mut url = Url::parse(&self.api_base_url)
            .map_err(|e| SheetsError::Request(format!("invalid api_base_url: {e}")))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| SheetsError::Request("api_base_url cannot be a base".into()))?;
            path.pop_if_empty().push(&self.spreadsheet_id);
            for s in segments {
                path.push(s);
            }
        }
        Ok(url)
    }

    fn batch_update_url(&self) -> Result<Url, SheetsError> {
        let mut url = Url::parse(&self.api_base_url)
            .map_err(|e| SheetsError::Request(format!("invalid api_base_url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| SheetsError::Request("api_base_url cannot be a base".into()))?
            .pop_if_empty()
            .push(&format!("{}:batchUpdate", self.spreadsheet_id));
        Ok(url)
    }

    async fn send<T: for<'de> Deserialize<'de>>(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> Result<T, SheetsError> {
        let token = self.tokens.access_token().await?;
        debug!(%method, path = url.path(), "sheets request");
        if let Some(b) = &body {
            trace!(body = %b, "sheets request body");
        }

        let mut req = self.client.request(method, url).bearer_auth(token);
        if let Some(b) = &body {
            req = req.json(b);
        }

        let response = req.send().await.map_err(|e| {
            error!(error = %e, "sheets HTTP request failed (transport)");
            SheetsError::Request(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read error body>".to_string());
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|env| env.error.message)
                .unwrap_or(body);
            error!(status = status.as_u16(), %message, "sheets API error");
            return Err(SheetsError::Status { status: status.as_u16(), body: message });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| SheetsError::Decode(e.to_string()))
    }
}

/// Formatted values are strings; anything else is rendered as JSON text.
fn cell_to_string(v: Value) -> String {
    match v {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ── Private wire types ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct TitleOnly {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}
