//! HTML fragments for the content components.
//!
//! The markup mirrors what the site stylesheet targets: `.code-block`,
//! `.table` and `.callout` wrappers.

use std::fmt::Write;

use pulldown_cmark::BlockQuoteKind;

use crate::state::escape_html;

/// Visual style of a callout box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CalloutKind {
    Caution,
    Check,
    #[default]
    Note,
    Warning,
}

impl CalloutKind {
    /// All kinds accepted by the `callout` tag, in attribute order.
    pub const ALL: [Self; 4] = [Self::Caution, Self::Check, Self::Note, Self::Warning];

    /// CSS class and attribute value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Caution => "caution",
            Self::Check => "check",
            Self::Note => "note",
            Self::Warning => "warning",
        }
    }

    /// Parse an attribute value (`"warning"`), case-sensitive.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

impl From<BlockQuoteKind> for CalloutKind {
    fn from(kind: BlockQuoteKind) -> Self {
        match kind {
            BlockQuoteKind::Note => Self::Note,
            BlockQuoteKind::Tip => Self::Check,
            BlockQuoteKind::Important | BlockQuoteKind::Warning => Self::Warning,
            BlockQuoteKind::Caution => Self::Caution,
        }
    }
}

pub(crate) fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
    let lang = lang.unwrap_or("text");
    write!(
        out,
        r#"<div class="code-block"><pre class="language-{lang}"><code class="code">{}</code></pre></div>"#,
        escape_html(content),
        lang = escape_html(lang),
    )
    .unwrap();
}

/// Opening markup of a callout; the body follows until [`callout_end`].
pub(crate) fn callout_start(kind: CalloutKind, title: Option<&str>, out: &mut String) {
    let class = kind.as_str();
    write!(
        out,
        r#"<div class="callout {class}"><span class="type-name {class}">{class}</span>"#
    )
    .unwrap();
    if let Some(title) = title.filter(|t| !t.is_empty()) {
        write!(out, "<strong>{}</strong>", escape_html(title)).unwrap();
    }
    out.push_str(r#"<div class="callout-body">"#);
}

pub(crate) fn callout_end(out: &mut String) {
    out.push_str("</div></div>");
}

pub(crate) fn image(src: &str, alt: &str, title: &str, out: &mut String) {
    let title_attr = if title.is_empty() {
        String::new()
    } else {
        format!(r#" title="{}""#, escape_html(title))
    };
    write!(
        out,
        r#"<img src="{}"{title_attr} alt="{}">"#,
        escape_html(src),
        escape_html(alt)
    )
    .unwrap();
}

/// Resolve a relative `.md` link against the directory of the current page.
///
/// - `./cache.md` from `ja/install` → `/ja/cache`
/// - `../index.md` from `ja/install` → `/`
/// - `registry/index.md#oci` from `guide` → `/registry#oci`
///
/// External links, fragments and non-markdown targets are returned unchanged.
#[allow(clippy::case_sensitive_file_extension_comparisons)]
pub(crate) fn resolve_link(url: &str, page_path: &str) -> String {
    let external = ["http://", "https://", "//", "mailto:", "tel:", "#"]
        .iter()
        .any(|prefix| url.starts_with(prefix));
    if external || !(url.ends_with(".md") || url.contains(".md#")) {
        return url.to_owned();
    }

    let (path_part, fragment) = match url.find('#') {
        Some(pos) => (&url[..pos], &url[pos..]),
        None => (url, ""),
    };

    let mut segments: Vec<&str> = if path_part.starts_with('/') {
        Vec::new()
    } else {
        let mut dir: Vec<&str> = page_path.split('/').filter(|s| !s.is_empty()).collect();
        dir.pop();
        dir
    };
    for component in path_part.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(component),
        }
    }

    let joined = segments.join("/");
    let clean = joined.strip_suffix(".md").unwrap_or(&joined);
    let clean = if clean == "index" {
        ""
    } else {
        clean.strip_suffix("/index").unwrap_or(clean)
    };
    format!("/{clean}{fragment}")
}
