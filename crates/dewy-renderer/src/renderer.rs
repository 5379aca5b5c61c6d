//! Markdown to HTML rendering with heading collection.

use std::fmt::Write;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::html::{self, CalloutKind};
use crate::state::{CodeBlockState, HeadingRecord, HeadingState, ImageState, TableState, escape_html};
use crate::tag::TagProcessor;

/// Result of rendering markdown.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered HTML content.
    pub html: String,
    /// Title extracted from the first H1 heading (if title extraction was enabled).
    pub title: Option<String>,
    /// Every heading in document order whose first inline child is plain text.
    pub headings: Vec<HeadingRecord>,
    /// Raw YAML frontmatter block, without the `---` delimiters.
    pub frontmatter: Option<String>,
    /// Warnings generated during conversion (e.g., unknown content tags).
    pub warnings: Vec<String>,
}

/// Markdown renderer producing the HTML fragments of a documentation page.
///
/// Beyond standard markdown it:
/// - assigns anchor ids to headings and collects them as [`HeadingRecord`]s
/// - wraps code blocks and tables for the site components
/// - turns GitHub alert blockquotes (`> [!NOTE]`) into callouts
/// - captures the YAML frontmatter block instead of rendering it
/// - expands content tags when configured with [`with_tags`](Self::with_tags)
pub struct MarkdownRenderer {
    output: String,
    code: CodeBlockState,
    table: TableState,
    image: ImageState,
    heading: HeadingState,
    extract_title: bool,
    page_path: Option<String>,
    pending_image: Option<(String, String)>,
    gfm: bool,
    tags: Option<TagProcessor>,
    frontmatter: Option<String>,
    in_metadata: bool,
    /// Whether each open blockquote is an alert (rendered as a callout).
    blockquote_stack: Vec<bool>,
}

impl MarkdownRenderer {
    /// Create a new renderer with GFM enabled by default.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: ImageState::default(),
            heading: HeadingState::new(false),
            extract_title: false,
            page_path: None,
            pending_image: None,
            gfm: true,
            tags: None,
            frontmatter: None,
            in_metadata: false,
            blockquote_stack: Vec::new(),
        }
    }

    /// Extract the first H1 as the page title. The H1 is still rendered.
    #[must_use]
    pub fn with_title_extraction(mut self) -> Self {
        self.extract_title = true;
        self.heading = HeadingState::new(true);
        self
    }

    /// URL path of the page being rendered, used to resolve relative `.md` links.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<String>) -> Self {
        self.page_path = Some(path.into());
        self
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM is enabled by default. When enabled, the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    /// - Alert blockquotes (`> [!WARNING]`)
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Expand content tags before parsing.
    #[must_use]
    pub fn with_tags(mut self, tags: TagProcessor) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Parser options; frontmatter blocks are always recognised.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        let base = Options::ENABLE_YAML_STYLE_METADATA_BLOCKS;
        if self.gfm {
            base | Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            base
        }
    }

    /// Create a configured parser for the given markdown text.
    #[must_use]
    pub fn create_parser<'a>(&self, markdown: &'a str) -> Parser<'a> {
        Parser::new_ext(markdown, self.parser_options())
    }

    /// Expand content tags (if configured), parse and render.
    pub fn render_markdown(&mut self, markdown: &str) -> RenderResult {
        let expanded;
        let source = match self.tags.as_mut() {
            Some(tags) => {
                expanded = tags.process(markdown);
                expanded.as_str()
            }
            None => markdown,
        };
        let parser = self.create_parser(source);
        self.render(parser)
    }

    /// Render markdown events and return the result.
    ///
    /// The renderer is reset afterwards and can be reused.
    pub fn render<'a, I>(&mut self, events: I) -> RenderResult
    where
        I: Iterator<Item = Event<'a>>,
    {
        for event in events {
            self.process_event(event);
        }

        let result = RenderResult {
            html: std::mem::take(&mut self.output),
            title: self.heading.take_title(),
            headings: self.heading.take_records(),
            frontmatter: self.frontmatter.take(),
            warnings: self
                .tags
                .as_mut()
                .map(TagProcessor::take_warnings)
                .unwrap_or_default(),
        };
        self.heading = HeadingState::new(self.extract_title);
        self.blockquote_stack.clear();
        result
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) => self.output.push_str(&html),
            Event::InlineHtml(html) => self.push_open_inline(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.push_close_inline("<br>"),
            Event::Rule => self.output.push_str("<hr>"),
            Event::TaskListMarker(checked) => {
                self.output.push_str(if checked {
                    r#"<input type="checkbox" checked disabled>"#
                } else {
                    r#"<input type="checkbox" disabled>"#
                });
            }
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not supported
            }
        }
    }

    /// Opening inline markup; inside a heading it counts as a non-text child.
    fn push_open_inline(&mut self, content: &str) {
        if self.heading.is_active() {
            self.heading.push_markup(content);
        } else {
            self.output.push_str(content);
        }
    }

    fn push_close_inline(&mut self, content: &str) {
        if self.heading.is_active() {
            self.heading.push_closing_markup(content);
        } else {
            self.output.push_str(content);
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading { level, .. } => {
                // Opening tag is written in end_tag once the id is known.
                self.heading.start_heading(heading_level_to_num(level));
            }
            Tag::BlockQuote(Some(kind)) => {
                self.blockquote_stack.push(true);
                html::callout_start(CalloutKind::from(kind), None, &mut self.output);
            }
            Tag::BlockQuote(None) => {
                self.blockquote_stack.push(false);
                self.output.push_str("<blockquote>");
            }
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_owned),
                    CodeBlockKind::Indented => None,
                };
                self.code.start(lang);
            }
            Tag::List(start) => match start {
                Some(1) => self.output.push_str("<ol>"),
                Some(n) => write!(self.output, r#"<ol start="{n}">"#).unwrap(),
                None => self.output.push_str("<ul>"),
            },
            Tag::Item => self.output.push_str("<li>"),
            Tag::MetadataBlock(_) => {
                self.in_metadata = true;
                self.frontmatter = Some(String::new());
            }
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock => {}
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.output.push_str(r#"<div class="table"><table>"#);
            }
            Tag::TableHead => {
                self.table.start_head();
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let align = self.table.current_alignment_style();
                let tag = if self.table.is_in_head() { "th" } else { "td" };
                write!(self.output, "<{tag}{align}>").unwrap();
            }
            Tag::Emphasis => self.push_open_inline("<em>"),
            Tag::Strong => self.push_open_inline("<strong>"),
            Tag::Strikethrough => self.push_open_inline("<s>"),
            Tag::Superscript => self.push_open_inline("<sup>"),
            Tag::Subscript => self.push_open_inline("<sub>"),
            Tag::Link { dest_url, .. } => {
                let href = match self.page_path.as_deref() {
                    Some(page) => html::resolve_link(&dest_url, page),
                    None => dest_url.to_string(),
                };
                let link_tag = format!(r#"<a href="{}">"#, escape_html(&href));
                self.push_open_inline(&link_tag);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                self.image.start();
                self.pending_image = Some((dest_url.to_string(), title.to_string()));
            }
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>"),
            TagEnd::Heading(_) => {
                if let Some(heading) = self.heading.complete_heading() {
                    let level = heading.level;
                    let id_attr = heading
                        .id
                        .map(|id| format!(r#" id="{}""#, escape_html(&id)))
                        .unwrap_or_default();
                    write!(
                        self.output,
                        "<h{level}{id_attr}>{}</h{level}>",
                        heading.html
                    )
                    .unwrap();
                }
            }
            TagEnd::BlockQuote(_) => {
                if self.blockquote_stack.pop().unwrap_or(false) {
                    html::callout_end(&mut self.output);
                } else {
                    self.output.push_str("</blockquote>");
                }
            }
            TagEnd::CodeBlock => {
                let (lang, content) = self.code.end();
                html::code_block(lang.as_deref(), &content, &mut self.output);
            }
            TagEnd::List(ordered) => {
                self.output.push_str(if ordered { "</ol>" } else { "</ul>" });
            }
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::MetadataBlock(_) => self.in_metadata = false,
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock => {}
            TagEnd::Image => {
                let alt = self.image.end();
                if let Some((src, title)) = self.pending_image.take() {
                    let mut img = String::new();
                    html::image(&src, &alt, &title, &mut img);
                    self.push_open_inline(&img);
                }
            }
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::Table => self.output.push_str("</tbody></table></div>"),
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table.end_head();
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                self.output.push_str(if self.table.is_in_head() {
                    "</th>"
                } else {
                    "</td>"
                });
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.push_close_inline("</em>"),
            TagEnd::Strong => self.push_close_inline("</strong>"),
            TagEnd::Strikethrough => self.push_close_inline("</s>"),
            TagEnd::Superscript => self.push_close_inline("</sup>"),
            TagEnd::Subscript => self.push_close_inline("</sub>"),
            TagEnd::Link => self.push_close_inline("</a>"),
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_metadata {
            if let Some(frontmatter) = self.frontmatter.as_mut() {
                frontmatter.push_str(text);
            }
        } else if self.code.is_active() {
            self.code.push_str(text);
        } else if self.image.is_active() {
            self.image.push_str(text);
        } else if self.heading.is_active() {
            self.heading.push_text(text);
        } else {
            self.output.push_str(&escape_html(text));
        }
    }

    fn inline_code(&mut self, code: &str) {
        if self.heading.is_active() {
            self.heading.push_code(code);
        } else {
            write!(self.output, "<code>{}</code>", escape_html(code)).unwrap();
        }
    }

    fn soft_break(&mut self) {
        if self.heading.is_active() {
            self.heading.push_closing_markup("\n");
        } else {
            self.output.push('\n');
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
