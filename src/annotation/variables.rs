//! `[VARIABLE]` placeholders.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\[\]\n]*[^\[\]\s][^\[\]\n]*)\]").expect("variable pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PartKind {
    Text,
    Variable,
}

/// A run of display text. Variable parts carry the upper-cased name without brackets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Part {
    pub kind: PartKind,
    pub text: String,
}

impl Part {
    fn text(s: &str) -> Self {
        Self { kind: PartKind::Text, text: s.to_string() }
    }
}

fn display_name(inner: &str) -> String {
    inner.trim().to_uppercase()
}

/// Split `content` into plain and variable parts for display.
pub fn highlight(content: &str) -> Vec<Part> {
    let mut parts = Vec::new();
    let mut last = 0;
    for caps in VARIABLE.captures_iter(content) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            parts.push(Part::text(&content[last..whole.start()]));
        }
        parts.push(Part {
            kind: PartKind::Variable,
            text: display_name(inner.as_str()),
        });
        last = whole.end();
    }
    if last < content.len() {
        parts.push(Part::text(&content[last..]));
    }
    parts
}

/// Distinct variable names, upper-cased, in order of first appearance.
pub fn variables(content: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in VARIABLE.captures_iter(content) {
        if let Some(inner) = caps.get(1) {
            let name = display_name(inner.as_str());
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}
