//! Prompt content annotations.
//!
//! Prompt text may carry three kinds of markup, all line-based:
//!
//! ```text
//! Summarise [DOCUMENT] for a [AUDIENCE].      ← text with variables
//! > Works best with long-form input.          ← note (not copied)
//! 1. Now shorten it to three bullets.         ← follow-up #1
//! 2. Translate the bullets to [LANGUAGE].     ← follow-up #2
//! ```
//!
//! [`parse`] turns content into an ordered list of [`Segment`]s whose spans
//! cover the whole input. [`clean_copy`] keeps only the text segments, which is
//! what goes to the clipboard. Variables are never stripped; they are only
//! upper-cased for display by [`highlight`].
//!
//! Follow-up regions open at a numbered line and run through blank lines until
//! another numbered line, a note, a code fence or a heading. A blank gap
//! followed by unindented plain text closes the region at the gap.

mod parse;
mod variables;

use std::ops::Range;

use serde::Serialize;

pub use variables::{Part, PartKind, highlight, variables};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Text,
    Note,
    Followup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    #[serde(rename = "type")]
    pub kind: SegmentKind,
    /// Text segments hold the exact input slice; notes and follow-ups hold
    /// their body with markers removed.
    pub content: String,
    /// Follow-up number as written (`3.` → 3).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    /// Byte range of the input this segment was built from.
    #[serde(skip)]
    pub span: Range<usize>,
}

/// Split prompt content into typed segments. Empty input yields no segments.
pub fn parse(content: &str) -> Vec<Segment> {
    if content.is_empty() {
        return Vec::new();
    }
    parse::segments(content)
}

/// Content with notes and follow-ups removed, blank-line runs collapsed, trimmed.
pub fn clean_copy(content: &str) -> String {
    let text: String = parse(content)
        .into_iter()
        .filter(|s| s.kind == SegmentKind::Text)
        .map(|s| s.content)
        .collect();

    let mut out = String::with_capacity(text.len());
    let mut prev_blank = false;
    for line in text.lines() {
        let blank = line.trim().is_empty();
        if blank && prev_blank {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        if !blank {
            out.push_str(line);
        }
        prev_blank = blank;
    }
    out.trim().to_string()
}

/// A segment plus its display parts.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedSegment {
    #[serde(flatten)]
    pub segment: Segment,
    pub parts: Vec<Part>,
}

/// Everything a client needs to render and copy a prompt.
#[derive(Debug, Clone, Serialize)]
pub struct Annotation {
    pub segments: Vec<AnnotatedSegment>,
    pub variables: Vec<String>,
    pub clean: String,
}

pub fn annotate(content: &str) -> Annotation {
    let segments = parse(content)
        .into_iter()
        .map(|segment| {
            let parts = highlight(&segment.content);
            AnnotatedSegment { segment, parts }
        })
        .collect();

    Annotation {
        segments,
        variables: variables(content),
        clean: clean_copy(content),
    }
}
