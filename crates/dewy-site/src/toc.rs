//! "On this page" table of contents.
//!
//! The renderer reports every heading of a page as a flat list. This module
//! keeps the ones worth linking to and nests them by level:
//!
//! ```text
//! h2 Install            Install
//! h3   Homebrew   →       ├─ Homebrew
//! h3   Binary             └─ Binary
//! h2 Configure          Configure
//! ```
//!
//! The forest is rebuilt for every render. Nothing here holds state between
//! calls, and the active anchor is always passed in by the caller.

use std::fmt::Write;

use dewy_renderer::{HeadingRecord, escape_html};
use serde::{Deserialize, Serialize};

use crate::locale::Locale;

/// Heading levels included in the table of contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TocOptions {
    pub min_level: u8,
    pub max_level: u8,
}

impl Default for TocOptions {
    fn default() -> Self {
        Self {
            min_level: 2,
            max_level: 3,
        }
    }
}

impl TocOptions {
    fn includes(&self, level: u8) -> bool {
        (self.min_level..=self.max_level).contains(&level)
    }
}

/// A heading together with the headings nested under it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TocNode {
    pub id: Option<String>,
    pub level: u8,
    pub title: String,
    /// Nested headings in document order.
    pub children: Vec<TocNode>,
}

impl TocNode {
    /// Whether `anchor` (a `#fragment`) points at this node.
    #[must_use]
    pub fn is_active(&self, anchor: Option<&str>) -> bool {
        match (self.id.as_deref(), anchor.and_then(|a| a.strip_prefix('#'))) {
            (Some(id), Some(fragment)) => id == fragment,
            _ => false,
        }
    }

    /// Number of nodes in this subtree, including `self`.
    #[must_use]
    pub fn subtree_size(&self) -> usize {
        1 + self.children.iter().map(TocNode::subtree_size).sum::<usize>()
    }
}

/// Keep headings that have a non-empty id and a level inside `options`.
///
/// Applying the filter twice gives the same result as applying it once.
#[must_use]
pub fn filter_headings(headings: &[HeadingRecord], options: &TocOptions) -> Vec<HeadingRecord> {
    headings
        .iter()
        .filter(|h| h.id.as_deref().is_some_and(|id| !id.is_empty()) && options.includes(h.level))
        .cloned()
        .collect()
}

/// Nest headings by level in a single pass.
///
/// Each heading becomes the last child of the nearest preceding heading with
/// a strictly lower level, or a root when there is none. Order within every
/// level follows the input, and every input heading appears exactly once.
///
/// ```
/// use dewy_renderer::HeadingRecord;
/// use dewy_site::build_forest;
///
/// let forest = build_forest(vec![
///     HeadingRecord::new("a", 2, "A"),
///     HeadingRecord::new("a1", 3, "A1"),
///     HeadingRecord::new("b", 2, "B"),
/// ]);
/// assert_eq!(forest.len(), 2);
/// assert_eq!(forest[0].children[0].title, "A1");
/// ```
#[must_use]
pub fn build_forest(headings: Vec<HeadingRecord>) -> Vec<TocNode> {
    let count = headings.len();
    let mut levels = Vec::with_capacity(count);
    let mut child_ids: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut roots = Vec::new();
    let mut open: Vec<usize> = Vec::new();

    for (index, heading) in headings.iter().enumerate() {
        while open.last().is_some_and(|&top| levels[top] >= heading.level) {
            open.pop();
        }
        match open.last() {
            Some(&parent) => child_ids[parent].push(index),
            None => roots.push(index),
        }
        levels.push(heading.level);
        open.push(index);
    }

    // Children always come after their parent, so assembling back to front
    // finds every subtree already built.
    let mut built: Vec<Option<TocNode>> = Vec::with_capacity(count);
    built.resize_with(count, || None);
    for (index, heading) in headings.into_iter().enumerate().rev() {
        let children = child_ids[index]
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        built[index] = Some(TocNode {
            id: heading.id,
            level: heading.level,
            title: heading.title,
            children,
        });
    }

    roots
        .into_iter()
        .filter_map(|root| built[root].take())
        .collect()
}

/// The panel is only worth showing with at least two top-level entries.
#[must_use]
pub fn should_render(forest: &[TocNode]) -> bool {
    forest.len() > 1
}

/// Filtered and nested headings of one page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableOfContents {
    forest: Vec<TocNode>,
}

impl TableOfContents {
    /// Filter `headings` with `options`, then build the forest.
    #[must_use]
    pub fn from_headings(headings: &[HeadingRecord], options: &TocOptions) -> Self {
        Self {
            forest: build_forest(filter_headings(headings, options)),
        }
    }

    #[must_use]
    pub fn forest(&self) -> &[TocNode] {
        &self.forest
    }

    #[must_use]
    pub fn into_forest(self) -> Vec<TocNode> {
        self.forest
    }

    #[must_use]
    pub fn should_render(&self) -> bool {
        should_render(&self.forest)
    }

    /// The forest with active flags for `anchor`, for JSON consumers.
    #[must_use]
    pub fn view(&self, anchor: Option<&str>) -> Vec<TocItemView> {
        self.forest
            .iter()
            .map(|node| TocItemView::new(node, anchor))
            .collect()
    }
}

/// Serializable table of contents entry with its active state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TocItemView {
    pub id: Option<String>,
    pub level: u8,
    pub title: String,
    pub active: bool,
    pub children: Vec<TocItemView>,
}

impl TocItemView {
    fn new(node: &TocNode, anchor: Option<&str>) -> Self {
        Self {
            id: node.id.clone(),
            level: node.level,
            title: node.title.clone(),
            active: node.is_active(anchor),
            children: node
                .children
                .iter()
                .map(|child| Self::new(child, anchor))
                .collect(),
        }
    }
}

/// Render the table of contents panel.
///
/// Returns `None` when the forest is suppressed by [`should_render`].
#[must_use]
pub fn render_toc(forest: &[TocNode], locale: Locale, anchor: Option<&str>) -> Option<String> {
    if !should_render(forest) {
        return None;
    }

    let mut html = String::with_capacity(512);
    write!(
        html,
        r#"<nav class="toc"><div class="toc-title">{}</div>"#,
        escape_html(locale.toc_title())
    )
    .unwrap();
    render_items(forest, anchor, &mut html);
    html.push_str("</nav>");
    Some(html)
}

fn render_items(nodes: &[TocNode], anchor: Option<&str>, html: &mut String) {
    html.push_str("<ul>");
    for node in nodes {
        if node.is_active(anchor) {
            html.push_str(r#"<li class="active">"#);
        } else {
            html.push_str("<li>");
        }
        match &node.id {
            Some(id) => write!(
                html,
                r##"<a href="#{}">{}</a>"##,
                escape_html(id),
                escape_html(&node.title)
            )
            .unwrap(),
            None => write!(html, "<a>{}</a>", escape_html(&node.title)).unwrap(),
        }
        if !node.children.is_empty() {
            render_items(&node.children, anchor, html);
        }
        html.push_str("</li>");
    }
    html.push_str("</ul>");
}
