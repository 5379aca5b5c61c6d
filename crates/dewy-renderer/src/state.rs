//! Event-processing state for the markdown renderer.
//!
//! Each struct tracks one kind of open element while pulldown-cmark events
//! stream through [`MarkdownRenderer`](crate::MarkdownRenderer).

use std::collections::HashMap;

use pulldown_cmark::Alignment;

/// State for tracking code block rendering.
#[derive(Default)]
pub(crate) struct CodeBlockState {
    active: bool,
    language: Option<String>,
    buffer: String,
}

impl CodeBlockState {
    pub(crate) fn start(&mut self, language: Option<String>) {
        self.active = true;
        self.language = language;
        self.buffer.clear();
    }

    /// End the current code block and return (language, content).
    pub(crate) fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.language.take(), std::mem::take(&mut self.buffer))
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

/// State for tracking table rendering.
#[derive(Default)]
pub(crate) struct TableState {
    in_head: bool,
    alignments: Vec<Alignment>,
    cell_index: usize,
}

impl TableState {
    pub(crate) fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
    }

    pub(crate) fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    pub(crate) fn end_head(&mut self) {
        self.in_head = false;
    }

    pub(crate) fn start_row(&mut self) {
        self.cell_index = 0;
    }

    pub(crate) fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    pub(crate) fn is_in_head(&self) -> bool {
        self.in_head
    }

    /// Inline style for the current cell's column alignment.
    pub(crate) fn current_alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// State for capturing image alt text.
#[derive(Default)]
pub(crate) struct ImageState {
    active: bool,
    alt_text: String,
}

impl ImageState {
    pub(crate) fn start(&mut self) {
        self.active = true;
        self.alt_text.clear();
    }

    pub(crate) fn end(&mut self) -> String {
        self.active = false;
        std::mem::take(&mut self.alt_text)
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.alt_text.push_str(text);
    }
}

/// One heading found while rendering a page.
///
/// Records arrive in document order and cover every level, including the H1
/// page title. The table of contents decides later which ones it keeps.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeadingRecord {
    /// Anchor id rendered on the heading, `None` when no id could be derived.
    pub id: Option<String>,
    /// Heading depth (1-6).
    pub level: u8,
    /// Plain-text heading title.
    pub title: String,
}

impl HeadingRecord {
    /// Create a record with an anchor id.
    #[must_use]
    pub fn new(id: impl Into<String>, level: u8, title: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            level,
            title: title.into(),
        }
    }

    /// Create a record without an anchor id.
    #[must_use]
    pub fn without_id(level: u8, title: impl Into<String>) -> Self {
        Self {
            id: None,
            level,
            title: title.into(),
        }
    }
}

/// What the first inline child of the open heading was.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FirstChild {
    Pending,
    Text,
    Markup,
}

/// A heading ready to be written out.
#[derive(Debug)]
pub(crate) struct CompletedHeading {
    pub(crate) level: u8,
    pub(crate) id: Option<String>,
    pub(crate) html: String,
}

/// State for heading ids, heading collection and title extraction.
pub(crate) struct HeadingState {
    extract_title: bool,
    title: Option<String>,
    current_level: Option<u8>,
    first_child: FirstChild,
    text: String,
    html: String,
    records: Vec<HeadingRecord>,
    id_counts: HashMap<String, usize>,
}

impl HeadingState {
    pub(crate) fn new(extract_title: bool) -> Self {
        Self {
            extract_title,
            title: None,
            current_level: None,
            first_child: FirstChild::Pending,
            text: String::new(),
            html: String::new(),
            records: Vec::new(),
            id_counts: HashMap::new(),
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.current_level.is_some()
    }

    pub(crate) fn start_heading(&mut self, level: u8) {
        self.current_level = Some(level);
        self.first_child = FirstChild::Pending;
        self.text.clear();
        self.html.clear();
    }

    /// Append a plain text run.
    pub(crate) fn push_text(&mut self, text: &str) {
        if self.first_child == FirstChild::Pending {
            self.first_child = FirstChild::Text;
        }
        self.text.push_str(text);
        self.html.push_str(&escape_html(text));
    }

    /// Append inline code; contributes to the slug like text does.
    pub(crate) fn push_code(&mut self, code: &str) {
        self.mark_markup();
        self.text.push_str(code);
        self.html.push_str("<code>");
        self.html.push_str(&escape_html(code));
        self.html.push_str("</code>");
    }

    /// Append inline markup such as `<em>` or `<a href>`.
    pub(crate) fn push_markup(&mut self, html: &str) {
        self.mark_markup();
        self.html.push_str(html);
    }

    /// Append closing markup; never counts as a first child.
    pub(crate) fn push_closing_markup(&mut self, html: &str) {
        self.html.push_str(html);
    }

    fn mark_markup(&mut self) {
        if self.first_child == FirstChild::Pending {
            self.first_child = FirstChild::Markup;
        }
    }

    /// Close the open heading, assign its id and collect it.
    ///
    /// Headings whose first inline child is not plain text are rendered but
    /// not collected.
    pub(crate) fn complete_heading(&mut self) -> Option<CompletedHeading> {
        let level = self.current_level.take()?;
        let mut text = std::mem::take(&mut self.text);
        let mut html = std::mem::take(&mut self.html);

        let explicit = take_id_annotation(&mut text);
        if explicit.is_some() {
            take_id_annotation(&mut html);
        }
        let title = text.trim().to_owned();

        let id = explicit.or_else(|| self.generate_id(&title));

        if self.extract_title && level == 1 && self.title.is_none() {
            self.title = Some(title.clone());
        }

        if self.first_child == FirstChild::Text {
            self.records.push(HeadingRecord {
                id: id.clone(),
                level,
                title,
            });
        }

        Some(CompletedHeading {
            level,
            id,
            html: html.trim().to_owned(),
        })
    }

    /// Slug-based id with `-1`, `-2` suffixes for repeats. Empty slugs get no id.
    fn generate_id(&mut self, text: &str) -> Option<String> {
        let base_id = slugify(text);
        if base_id.is_empty() {
            return None;
        }
        let count = self.id_counts.entry(base_id.clone()).or_default();
        let id = match *count {
            0 => base_id,
            n => format!("{base_id}-{n}"),
        };
        *count += 1;
        Some(id)
    }

    pub(crate) fn take_title(&mut self) -> Option<String> {
        self.title.take()
    }

    pub(crate) fn take_records(&mut self) -> Vec<HeadingRecord> {
        std::mem::take(&mut self.records)
    }
}

/// Strip a trailing `{% #custom-id %}` annotation, returning the id.
fn take_id_annotation(buffer: &mut String) -> Option<String> {
    let trimmed = buffer.trim_end();
    let body = trimmed.strip_suffix("%}")?;
    let start = body.rfind("{%")?;
    let id = body[start + 2..].trim().strip_prefix('#')?.trim();
    if id.is_empty() || id.contains(char::is_whitespace) {
        return None;
    }
    let id = id.to_owned();
    buffer.truncate(start);
    let kept = buffer.trim_end().len();
    buffer.truncate(kept);
    Some(id)
}

/// Convert heading text to an anchor slug.
///
/// Letters and digits from any script are kept and lowercased. Runs of
/// whitespace, dashes and underscores collapse into a single dash. Everything
/// else is dropped.
///
/// ```
/// use dewy_renderer::slugify;
///
/// assert_eq!(slugify("Getting Started"), "getting-started");
/// assert_eq!(slugify("インストール方法"), "インストール方法");
/// assert_eq!(slugify("?!"), "");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true;

    for c in text.trim().chars() {
        if c.is_alphanumeric() {
            result.extend(c.to_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("What's New?"), "whats-new");
        assert_eq!(slugify("  Spaces  "), "spaces");
        assert_eq!(slugify("snake_case"), "snake-case");
        assert_eq!(slugify("Deploy to ECS"), "deploy-to-ecs");
    }

    #[test]
    fn test_slugify_keeps_non_ascii_letters() {
        assert_eq!(slugify("キャッシュ の 設定"), "キャッシュ-の-設定");
        assert_eq!(slugify("Über Dewy"), "über-dewy");
    }

    #[test]
    fn test_slugify_punctuation_only_is_empty() {
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("   "), "");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html(r#""quoted""#), "&quot;quoted&quot;");
        assert_eq!(escape_html("it's"), "it&#x27;s");
    }

    #[test]
    fn test_code_block_state() {
        let mut state = CodeBlockState::default();
        assert!(!state.is_active());

        state.start(Some("sh".to_owned()));
        assert!(state.is_active());
        state.push_str("dewy server");

        let (lang, content) = state.end();
        assert_eq!(lang.as_deref(), Some("sh"));
        assert_eq!(content, "dewy server");
        assert!(!state.is_active());
    }

    #[test]
    fn test_table_state_alignment() {
        let mut state = TableState::default();
        state.start(vec![Alignment::None, Alignment::Right]);
        state.start_head();

        assert!(state.is_in_head());
        assert_eq!(state.current_alignment_style(), "");
        state.next_cell();
        assert_eq!(
            state.current_alignment_style(),
            r#" style="text-align:right""#
        );
        state.next_cell();
        assert_eq!(state.current_alignment_style(), "");

        state.end_head();
        assert!(!state.is_in_head());
    }

    #[test]
    fn test_image_state() {
        let mut state = ImageState::default();
        state.start();
        assert!(state.is_active());
        state.push_str("diagram");
        assert_eq!(state.end(), "diagram");
        assert!(!state.is_active());
    }

    #[test]
    fn test_heading_collected_with_slug() {
        let mut state = HeadingState::new(true);
        state.start_heading(1);
        state.push_text("Dewy");
        let heading = state.complete_heading().unwrap();
        assert_eq!(heading.id.as_deref(), Some("dewy"));

        state.start_heading(2);
        state.push_text("Registry");
        state.complete_heading();

        assert_eq!(state.take_title().as_deref(), Some("Dewy"));
        assert_eq!(
            state.take_records(),
            vec![
                HeadingRecord::new("dewy", 1, "Dewy"),
                HeadingRecord::new("registry", 2, "Registry"),
            ]
        );
    }

    #[test]
    fn test_duplicate_slugs_get_suffixes() {
        let mut state = HeadingState::new(false);
        for _ in 0..3 {
            state.start_heading(2);
            state.push_text("Usage");
            state.complete_heading();
        }

        let ids: Vec<_> = state
            .take_records()
            .into_iter()
            .map(|r| r.id.unwrap())
            .collect();
        assert_eq!(ids, vec!["usage", "usage-1", "usage-2"]);
    }

    #[test]
    fn test_explicit_annotation_wins() {
        let mut state = HeadingState::new(false);
        state.start_heading(2);
        state.push_text("Artifact registry {% #artifact %}");
        let heading = state.complete_heading().unwrap();

        assert_eq!(heading.id.as_deref(), Some("artifact"));
        assert_eq!(heading.html, "Artifact registry");
        assert_eq!(
            state.take_records(),
            vec![HeadingRecord::new("artifact", 2, "Artifact registry")]
        );
    }

    #[test]
    fn test_empty_slug_has_no_id() {
        let mut state = HeadingState::new(false);
        state.start_heading(2);
        state.push_text("???");
        let heading = state.complete_heading().unwrap();

        assert_eq!(heading.id, None);
        assert_eq!(
            state.take_records(),
            vec![HeadingRecord::without_id(2, "???")]
        );
    }

    #[test]
    fn test_markup_first_child_not_collected() {
        let mut state = HeadingState::new(false);
        state.start_heading(2);
        state.push_code("dewy");
        state.push_text(" command");
        let heading = state.complete_heading().unwrap();

        assert_eq!(heading.id.as_deref(), Some("dewy-command"));
        assert_eq!(heading.html, "<code>dewy</code> command");
        assert!(state.take_records().is_empty());
    }

    #[test]
    fn test_text_then_markup_is_collected() {
        let mut state = HeadingState::new(false);
        state.start_heading(3);
        state.push_text("Run ");
        state.push_markup("<em>");
        state.push_text("fast");
        state.push_closing_markup("</em>");
        state.complete_heading();

        assert_eq!(
            state.take_records(),
            vec![HeadingRecord::new("run-fast", 3, "Run fast")]
        );
    }

    #[test]
    fn test_annotation_parsing_edge_cases() {
        let mut plain = "Title {% callout %}".to_owned();
        assert_eq!(take_id_annotation(&mut plain), None);
        assert_eq!(plain, "Title {% callout %}");

        let mut spaced = "Title {%   #  x-y  %}  ".to_owned();
        assert_eq!(take_id_annotation(&mut spaced).as_deref(), Some("x-y"));
        assert_eq!(spaced, "Title");
    }
}
