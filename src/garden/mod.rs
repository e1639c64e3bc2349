//! Prompt repository on top of a [`SheetsBackend`].
//!
//! Each prompt is one row of the `Prompts` sheet. Tag usage counts in the
//! `Tags` sheet are recomputed from scratch after every mutation. Writes
//! within this process are serialized so a row number looked up for an
//! update or delete is still valid when the write lands.

pub mod model;
pub mod rows;
pub mod tags;

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::SheetNames;
use crate::sheets::{A1Range, SheetsBackend, SheetsError};

pub use model::{ListFilter, Prompt, PromptDraft, PromptPatch, Tag};

#[derive(Debug, Error)]
pub enum GardenError {
    #[error("{0}")]
    Validation(String),
    #[error("Prompt not found")]
    NotFound,
    #[error(transparent)]
    Sheets(#[from] SheetsError),
}

#[derive(Debug, Clone)]
pub struct Garden {
    backend: SheetsBackend,
    names: SheetNames,
    write_lock: Arc<Mutex<()>>,
}

impl Garden {
    pub fn new(backend: SheetsBackend, names: SheetNames) -> Self {
        Self {
            backend,
            names,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn backend(&self) -> &SheetsBackend {
        &self.backend
    }

    // ── Reads ─────────────────────────────────────────────────────────────────

    pub async fn list(&self, filter: &ListFilter) -> Result<Vec<Prompt>, GardenError> {
        let mut prompts = self.load_all().await?;
        prompts.retain(|p| filter.matches(p));
        Ok(prompts)
    }

    pub async fn get(&self, id: &str) -> Result<Prompt, GardenError> {
        self.load_all()
            .await?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or(GardenError::NotFound)
    }

    pub async fn tags(&self) -> Result<Vec<Tag>, GardenError> {
        let range = A1Range::from_row(&self.names.tags, 'A', rows::FIRST_DATA_ROW, 'C');
        let values = self.backend.get_values(&range).await?;
        Ok(tags::from_rows(&values))
    }

    pub async fn categories(&self) -> Result<Vec<String>, GardenError> {
        Ok(self
            .tags()
            .await?
            .into_iter()
            .filter(|t| t.is_category)
            .map(|t| t.name)
            .collect())
    }

    /// The whole `Prompts` sheet, header included, exactly as stored.
    pub async fn raw_rows(&self) -> Result<Vec<Vec<String>>, GardenError> {
        let range = A1Range::columns(&self.names.prompts, 'A', 'G');
        Ok(self.backend.get_values(&range).await?)
    }

    /// A new draft seeded from an existing prompt.
    pub async fn remix(&self, id: &str) -> Result<PromptDraft, GardenError> {
        let p = self.get(id).await?;
        let base = if p.title.trim().is_empty() {
            "Untitled Prompt"
        } else {
            p.title.trim()
        };
        Ok(PromptDraft {
            title: format!("{base} (Remix)"),
            content: p.content,
            tags: p.tags,
            category: p.category,
        })
    }

    // ── Writes ────────────────────────────────────────────────────────────────

    pub async fn create(&self, draft: PromptDraft) -> Result<Prompt, GardenError> {
        if draft.content.trim().is_empty() {
            return Err(GardenError::Validation("Content is required".into()));
        }

        let _guard = self.write_lock.lock().await;
        let now = rows::now_timestamp();
        let prompt = Prompt {
            id: Uuid::new_v4().to_string(),
            title: draft.title.trim().to_string(),
            content: draft.content,
            tags: rows::normalize_tags(&draft.tags),
            category: clean_category(draft.category),
            created_at: now.clone(),
            updated_at: now,
            row: 0,
        };

        self.backend
            .append_values(&self.prompts_table(), vec![rows::to_row(&prompt)])
            .await?;
        info!(id = %prompt.id, "prompt created");

        self.recount_locked().await?;
        Ok(prompt)
    }

    pub async fn update(&self, id: &str, patch: PromptPatch) -> Result<Prompt, GardenError> {
        if patch.content.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err(GardenError::Validation("Content cannot be empty".into()));
        }

        let _guard = self.write_lock.lock().await;
        let mut prompt = self
            .load_all()
            .await?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or(GardenError::NotFound)?;

        if let Some(title) = patch.title {
            prompt.title = title.trim().to_string();
        }
        if let Some(content) = patch.content {
            prompt.content = content;
        }
        if let Some(tags) = patch.tags {
            prompt.tags = rows::normalize_tags(&tags);
        }
        if patch.category.is_some() {
            prompt.category = clean_category(patch.category);
        }
        prompt.updated_at = rows::now_timestamp();

        let range = A1Range::row(&self.names.prompts, 'A', prompt.row, 'G');
        self.backend
            .update_values(&range, vec![rows::to_row(&prompt)])
            .await?;
        info!(id, row = prompt.row, "prompt updated");

        self.recount_locked().await?;
        Ok(prompt)
    }

    /// Clears the prompt's row. The blank row stays until [`Garden::repair`].
    pub async fn delete(&self, id: &str) -> Result<(), GardenError> {
        let _guard = self.write_lock.lock().await;
        let prompt = self
            .load_all()
            .await?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or(GardenError::NotFound)?;

        let range = A1Range::row(&self.names.prompts, 'A', prompt.row, 'G');
        self.backend.clear_values(&range).await?;
        info!(id, row = prompt.row, "prompt deleted");

        self.recount_locked().await?;
        Ok(())
    }

    /// Rebuild the `Tags` sheet from the current prompts.
    pub async fn recount(&self) -> Result<Vec<Tag>, GardenError> {
        let _guard = self.write_lock.lock().await;
        self.recount_locked().await
    }

    /// Create missing sheets and write header rows. Safe to call repeatedly.
    pub async fn setup(&self) -> Result<(), GardenError> {
        let _guard = self.write_lock.lock().await;
        let existing = self.backend.sheet_titles().await?;

        let layout: [(&str, &[&str]); 3] = [
            (self.names.prompts.as_str(), &rows::PROMPT_HEADERS[..]),
            (self.names.tags.as_str(), &tags::TAG_HEADERS[..]),
            (self.names.categories.as_str(), &tags::CATEGORY_HEADERS[..]),
        ];

        for (title, headers) in layout {
            if !existing.iter().any(|t| t == title) {
                info!(sheet = title, "creating sheet");
                self.backend.add_sheet(title).await?;
            }
            let end_col = column_letter(headers.len());
            let range = A1Range::row(title, 'A', 1, end_col);
            let header_row = headers.iter().map(|h| h.to_string()).collect();
            self.backend.update_values(&range, vec![header_row]).await?;
        }
        info!("sheet setup complete");
        Ok(())
    }

    /// Rewrite the `Prompts` sheet without blank rows, normalizing every cell.
    pub async fn repair(&self) -> Result<Vec<Prompt>, GardenError> {
        let _guard = self.write_lock.lock().await;
        let mut prompts = self.load_all().await?;

        let data = A1Range::from_row(&self.names.prompts, 'A', rows::FIRST_DATA_ROW, 'G');
        self.backend.clear_values(&data).await?;
        if !prompts.is_empty() {
            let values = prompts.iter().map(rows::to_row).collect();
            self.backend.append_values(&data, values).await?;
        }
        for (p, row) in prompts.iter_mut().zip(rows::FIRST_DATA_ROW..) {
            p.row = row;
        }
        info!(count = prompts.len(), "prompts sheet repaired");

        self.recount_locked().await?;
        Ok(prompts)
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn prompts_table(&self) -> A1Range {
        A1Range::columns(&self.names.prompts, 'A', 'G')
    }

    async fn load_all(&self) -> Result<Vec<Prompt>, GardenError> {
        let range = A1Range::from_row(&self.names.prompts, 'A', rows::FIRST_DATA_ROW, 'G');
        let values = self.backend.get_values(&range).await?;
        let prompts = rows::parse_rows(&values);
        debug!(rows = values.len(), prompts = prompts.len(), "loaded prompts");
        Ok(prompts)
    }

    /// Caller must hold `write_lock`.
    async fn recount_locked(&self) -> Result<Vec<Tag>, GardenError> {
        let prompts = self.load_all().await?;
        let counted = tags::count(&prompts);

        let data = A1Range::from_row(&self.names.tags, 'A', rows::FIRST_DATA_ROW, 'C');
        self.backend.clear_values(&data).await?;
        if !counted.is_empty() {
            self.backend.append_values(&data, tags::to_rows(&counted)).await?;
        }
        debug!(tags = counted.len(), "tag counts recomputed");
        Ok(counted)
    }
}

fn clean_category(category: Option<String>) -> Option<String> {
    category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

/// `1` → `A`, `7` → `G`. Header rows never exceed a handful of columns.
fn column_letter(count: usize) -> char {
    (b'A' + count.saturating_sub(1).min(25) as u8) as char
}
