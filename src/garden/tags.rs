//! Tag usage counts stored in the `Tags` sheet (`Name, Count, Is Category`).

use super::model::{Prompt, Tag};

pub const TAG_HEADERS: [&str; 3] = ["Name", "Count", "Is Category"];
pub const CATEGORY_HEADERS: [&str; 2] = ["Name", "Description"];

/// Count every tag and category across `prompts`, in first-seen order.
///
/// A category counts once per prompt and marks the name as a category, even
/// when the same name also appears as a plain tag.
pub fn count(prompts: &[Prompt]) -> Vec<Tag> {
    let mut tags: Vec<Tag> = Vec::new();
    let mut bump = |name: &str, category: bool| {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        match tags.iter_mut().find(|t| t.name == name) {
            Some(t) => {
                t.count += 1;
                t.is_category |= category;
            }
            None => tags.push(Tag {
                name: name.to_string(),
                count: 1,
                is_category: category,
            }),
        }
    };

    for p in prompts {
        for tag in &p.tags {
            bump(tag, false);
        }
        if let Some(category) = &p.category {
            bump(category, true);
        }
    }
    tags
}

pub fn to_rows(tags: &[Tag]) -> Vec<Vec<String>> {
    tags.iter()
        .map(|t| vec![t.name.clone(), t.count.to_string(), t.is_category.to_string()])
        .collect()
}

/// Parse `Tags!A2:C`. Rows with a blank name are skipped; bad counts read as 0.
pub fn from_rows(rows: &[Vec<String>]) -> Vec<Tag> {
    rows.iter()
        .filter_map(|row| {
            let name = row.first()?.trim();
            if name.is_empty() {
                return None;
            }
            Some(Tag {
                name: name.to_string(),
                count: row.get(1).and_then(|c| c.trim().parse().ok()).unwrap_or(0),
                is_category: row
                    .get(2)
                    .is_some_and(|c| c.trim().eq_ignore_ascii_case("true")),
            })
        })
        .collect()
}
