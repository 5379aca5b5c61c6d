//! Tag syntax recognition.
//!
//! Finds `{% ... %}` markers within a line and classifies them.

use super::TagAttributes;

/// A recognised `{% ... %}` marker.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ParsedTag {
    /// `{% name attrs %}` or self-closing `{% name attrs /%}`.
    Open {
        name: String,
        attrs: TagAttributes,
        self_closing: bool,
    },
    /// `{% /name %}`.
    Close { name: String },
    /// Attribute-only annotation such as `{% #custom-id %}`.
    Annotation,
}

/// A tag located inside a line, with its byte span.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct TagMatch {
    pub(crate) tag: ParsedTag,
    pub(crate) start: usize,
    pub(crate) end: usize,
}

/// Find the first tag in `line`, ignoring markers inside inline code spans.
pub(crate) fn find_tag(line: &str) -> Option<TagMatch> {
    let mut offset = 0;
    while let Some(rel) = line[offset..].find("{%") {
        let start = offset + rel;
        let Some(close_rel) = line[start + 2..].find("%}") else {
            return None;
        };
        let end = start + 2 + close_rel + 2;

        if !inside_code_span(&line[..start])
            && let Some(tag) = parse_inner(&line[start + 2..end - 2])
        {
            return Some(TagMatch { tag, start, end });
        }
        offset = start + 2;
    }
    None
}

/// Parse a line that consists of exactly one tag (surrounding whitespace allowed).
pub(crate) fn parse_standalone(line: &str) -> Option<ParsedTag> {
    let trimmed = line.trim();
    let found = find_tag(trimmed)?;
    (found.start == 0 && found.end == trimmed.len()).then_some(found.tag)
}

fn parse_inner(inner: &str) -> Option<ParsedTag> {
    let inner = inner.trim();

    if let Some(rest) = inner.strip_prefix('/') {
        let name = rest.trim();
        return is_tag_name(name).then(|| ParsedTag::Close {
            name: name.to_owned(),
        });
    }

    if inner.starts_with('#') || inner.starts_with('.') {
        return Some(ParsedTag::Annotation);
    }

    let (body, self_closing) = match inner.strip_suffix('/') {
        Some(body) => (body.trim_end(), true),
        None => (inner, false),
    };
    let name_end = body.find(char::is_whitespace).unwrap_or(body.len());
    let name = &body[..name_end];
    if !is_tag_name(name) {
        return None;
    }

    Some(ParsedTag::Open {
        name: name.to_owned(),
        attrs: TagAttributes::parse(&body[name_end..]),
        self_closing,
    })
}

fn is_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Whether an odd number of backticks precede the position.
fn inside_code_span(before: &str) -> bool {
    before.chars().filter(|&c| c == '`').count() % 2 == 1
}
