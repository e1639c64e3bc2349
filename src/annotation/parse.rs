//! Line classification and segmentation.
//!
//! The input is cut into lines (terminators kept in the spans). Each line is
//! classified once, then a single forward pass groups lines into segments.

use std::ops::Range;

use super::{Segment, SegmentKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind<'a> {
    Blank,
    Fence,
    /// Any line between an opening and closing fence.
    Code,
    Heading,
    Note(&'a str),
    Numbered(u32, &'a str),
    Plain { indented: bool },
}

impl LineKind<'_> {
    /// Lines that end an open follow-up region.
    fn terminates_followup(&self) -> bool {
        matches!(
            self,
            LineKind::Numbered(..) | LineKind::Note(_) | LineKind::Fence | LineKind::Heading
        )
    }
}

struct Line<'a> {
    /// Byte range in the input, terminator included.
    span: Range<usize>,
    /// Line text without `\n` / `\r\n`.
    text: &'a str,
    kind: LineKind<'a>,
}

pub(super) fn segments(input: &str) -> Vec<Segment> {
    let lines = classify(input);
    let mut out = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        match lines[i].kind {
            LineKind::Note(_) => {
                let start = i;
                while i < lines.len() && matches!(lines[i].kind, LineKind::Note(_)) {
                    i += 1;
                }
                out.push(note_segment(&lines[start..i]));
            }
            LineKind::Numbered(index, _) => {
                let end = followup_end(&lines, i);
                out.push(followup_segment(index, &lines[i..end]));
                i = end;
            }
            _ => {
                let start = i;
                i += 1;
                while i < lines.len()
                    && !matches!(lines[i].kind, LineKind::Note(_) | LineKind::Numbered(..))
                {
                    i += 1;
                }
                let span = lines[start].span.start..lines[i - 1].span.end;
                out.push(Segment {
                    kind: SegmentKind::Text,
                    content: input[span.clone()].to_string(),
                    index: None,
                    span,
                });
            }
        }
    }

    out
}

fn classify(input: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut offset = 0;
    let mut in_code = false;

    for raw in input.split_inclusive('\n') {
        let span = offset..offset + raw.len();
        offset = span.end;

        let text = raw.strip_suffix('\n').unwrap_or(raw);
        let text = text.strip_suffix('\r').unwrap_or(text);
        let trimmed = text.trim_start();

        let kind = if trimmed.starts_with("```") {
            in_code = !in_code;
            LineKind::Fence
        } else if in_code {
            LineKind::Code
        } else if trimmed.is_empty() {
            LineKind::Blank
        } else if trimmed.starts_with('#') {
            LineKind::Heading
        } else if let Some(body) = trimmed.strip_prefix('>') {
            LineKind::Note(body.trim_start())
        } else if let Some((index, body)) = numbered(text) {
            LineKind::Numbered(index, body)
        } else {
            LineKind::Plain {
                indented: text.starts_with([' ', '\t']),
            }
        };

        lines.push(Line { span, text, kind });
    }

    lines
}

/// `N. body` at column zero: digits, a dot, at least one whitespace char.
fn numbered(text: &str) -> Option<(u32, &str)> {
    let digits_end = text.find(|c: char| !c.is_ascii_digit())?;
    if digits_end == 0 {
        return None;
    }
    let rest = text[digits_end..].strip_prefix('.')?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let index = text[..digits_end].parse::<u32>().ok()?;
    Some((index, rest.trim()))
}

/// Exclusive end line of the follow-up region opened at `start`.
fn followup_end(lines: &[Line<'_>], start: usize) -> usize {
    let mut j = start + 1;
    while j < lines.len() {
        match lines[j].kind {
            kind if kind.terminates_followup() => return j,
            LineKind::Blank => {
                let mut k = j;
                while k < lines.len() && lines[k].kind == LineKind::Blank {
                    k += 1;
                }
                if k == lines.len() {
                    return k;
                }
                match lines[k].kind {
                    kind if kind.terminates_followup() => return k,
                    LineKind::Plain { indented: true } => j = k + 1,
                    // Unindented text after a gap closes the region at the gap.
                    _ => return j,
                }
            }
            LineKind::Plain { .. } => j += 1,
            _ => return j,
        }
    }
    j
}

fn note_segment(lines: &[Line<'_>]) -> Segment {
    let content = lines
        .iter()
        .filter_map(|l| match l.kind {
            LineKind::Note(body) => Some(body),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n");
    Segment {
        kind: SegmentKind::Note,
        content,
        index: None,
        span: region_span(lines),
    }
}

fn followup_segment(index: u32, lines: &[Line<'_>]) -> Segment {
    let mut parts: Vec<&str> = Vec::with_capacity(lines.len());
    for line in lines {
        match line.kind {
            LineKind::Numbered(_, body) => parts.push(body),
            _ => parts.push(line.text.trim()),
        }
    }
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    Segment {
        kind: SegmentKind::Followup,
        content: parts.join("\n"),
        index: Some(index),
        span: region_span(lines),
    }
}

fn region_span(lines: &[Line<'_>]) -> Range<usize> {
    match (lines.first(), lines.last()) {
        (Some(first), Some(last)) => first.span.start..last.span.end,
        _ => 0..0,
    }
}
