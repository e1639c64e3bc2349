//! Prompt and tag records as they cross the HTTP boundary.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A stored prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: String,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    /// 1-based sheet row this prompt was read from. 0 when not yet stored.
    #[serde(skip)]
    pub row: u32,
}

/// Fields for a new prompt. Also the shape returned by remix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A `tags` value that is not an array reads as no tags; non-string items are dropped.
fn lenient_tags<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Partial update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub name: String,
    pub count: u32,
    pub is_category: bool,
}

/// `?tag=&q=` on the list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListFilter {
    pub tag: Option<String>,
    pub q: Option<String>,
}

impl ListFilter {
    pub fn matches(&self, prompt: &Prompt) -> bool {
        let tag_ok = match non_blank(&self.tag) {
            None => true,
            Some(tag) => {
                let tag = tag.to_lowercase();
                prompt.tags.iter().any(|t| t.to_lowercase() == tag)
                    || prompt
                        .category
                        .as_deref()
                        .is_some_and(|c| c.to_lowercase() == tag)
            }
        };
        let query_ok = match non_blank(&self.q) {
            None => true,
            Some(q) => {
                let q = q.to_lowercase();
                prompt.title.to_lowercase().contains(&q) || prompt.content.to_lowercase().contains(&q)
            }
        };
        tag_ok && query_ok
    }
}

fn non_blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
