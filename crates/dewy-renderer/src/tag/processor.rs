//! Line-based expansion of content tags ahead of markdown parsing.

use crate::fence::FenceTracker;

use super::TagRegistry;
use super::parser::{ParsedTag, find_tag, parse_standalone};

/// Expands `{% ... %}` tags into HTML before pulldown-cmark sees the text.
///
/// Opening and closing tags of tags with a body must sit on their own line;
/// their markup is surrounded by blank lines so the body is still parsed as
/// markdown. Self-closing tags may also appear inside a line.
///
/// Problems never abort rendering. They are collected as warnings:
///
/// - unknown tags pass through unchanged
/// - invalid attributes fall back to schema defaults
/// - stray closing tags pass through unchanged
/// - tags left open are closed at the end of the document
///
/// Lines inside fenced code blocks and tags inside inline code are left alone.
pub struct TagProcessor {
    registry: TagRegistry,
    fence: FenceTracker,
    open_tags: Vec<String>,
    warnings: Vec<String>,
}

impl Default for TagProcessor {
    fn default() -> Self {
        Self::with_builtin_tags()
    }
}

impl TagProcessor {
    #[must_use]
    pub fn new(registry: TagRegistry) -> Self {
        Self {
            registry,
            fence: FenceTracker::new(),
            open_tags: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Processor for the tags every Dewy page may use.
    #[must_use]
    pub fn with_builtin_tags() -> Self {
        Self::new(TagRegistry::builtin())
    }

    /// Expand all tags in `input`.
    #[must_use]
    pub fn process(&mut self, input: &str) -> String {
        self.fence = FenceTracker::new();
        self.open_tags.clear();

        let mut output = String::with_capacity(input.len());
        let line_count = input.lines().count();

        for (idx, line) in input.lines().enumerate() {
            output.push_str(&self.process_line(line, idx + 1));
            if idx + 1 < line_count || input.ends_with('\n') {
                output.push('\n');
            }
        }

        self.finalize(&mut output);
        output
    }

    /// Warnings gathered so far.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    fn process_line(&mut self, line: &str, line_num: usize) -> String {
        if self.fence.observe(line) || self.fence.in_fence() {
            return line.to_owned();
        }

        match parse_standalone(line) {
            Some(ParsedTag::Open {
                name,
                attrs,
                self_closing,
            }) => self
                .expand_open(&name, &attrs, self_closing, line_num, true)
                .map_or_else(|| line.to_owned(), |html| format!("{html}\n")),
            Some(ParsedTag::Close { name }) => self
                .expand_close(&name, line_num)
                .map_or_else(|| line.to_owned(), |html| format!("\n{html}\n")),
            Some(ParsedTag::Annotation) => line.to_owned(),
            None => self.process_inline(line, line_num),
        }
    }

    fn process_inline(&mut self, line: &str, line_num: usize) -> String {
        let mut result = String::with_capacity(line.len());
        let mut remaining = line;

        while let Some(found) = find_tag(remaining) {
            result.push_str(&remaining[..found.start]);
            let source = &remaining[found.start..found.end];

            let expanded = match found.tag {
                ParsedTag::Open {
                    name,
                    attrs,
                    self_closing,
                } => self.expand_open(&name, &attrs, self_closing, line_num, false),
                ParsedTag::Close { name } => {
                    self.warnings.push(format!(
                        "line {line_num}: closing tag {{% /{name} %}} must be on its own line"
                    ));
                    None
                }
                ParsedTag::Annotation => None,
            };
            result.push_str(expanded.as_deref().unwrap_or(source));
            remaining = &remaining[found.end..];
        }

        result.push_str(remaining);
        result
    }

    /// Markup for an opening tag, or `None` to leave the source untouched.
    fn expand_open(
        &mut self,
        name: &str,
        attrs: &super::TagAttributes,
        self_closing: bool,
        line_num: usize,
        standalone: bool,
    ) -> Option<String> {
        let Some(handler) = self.registry.get_mut(name) else {
            self.warnings
                .push(format!("line {line_num}: unknown tag \"{name}\""));
            return None;
        };

        let schema = handler.schema();
        let has_body = !schema.self_closing && !self_closing;
        if has_body && !standalone {
            self.warnings.push(format!(
                "line {line_num}: tag \"{name}\" must be on its own line"
            ));
            return None;
        }

        let (resolved, problems) = schema.validate(name, attrs);
        self.warnings.extend(
            problems
                .into_iter()
                .map(|problem| format!("line {line_num}: {problem}")),
        );

        let mut html = handler.open(&resolved);
        if has_body {
            self.open_tags.push(name.to_owned());
        } else if !schema.self_closing {
            // `{% callout /%}`: a body-taking tag written as self-closing.
            html.push_str(&handler.close());
        }
        Some(html)
    }

    /// Markup for a closing tag, or `None` when nothing matches.
    fn expand_close(&mut self, name: &str, line_num: usize) -> Option<String> {
        let Some(position) = self.open_tags.iter().rposition(|open| open == name) else {
            self.warnings.push(format!(
                "line {line_num}: stray closing tag {{% /{name} %}} with no opening tag"
            ));
            return None;
        };

        let mut html = String::new();
        for unclosed in self.open_tags.split_off(position).iter().rev() {
            if unclosed != name {
                self.warnings.push(format!(
                    "line {line_num}: unclosed tag {{% {unclosed} %}} closed by {{% /{name} %}}"
                ));
            }
            if let Some(handler) = self.registry.get_mut(unclosed) {
                html.push_str(&handler.close());
            }
        }
        Some(html)
    }

    fn finalize(&mut self, output: &mut String) {
        while let Some(name) = self.open_tags.pop() {
            self.warnings.push(format!(
                "unclosed tag {{% {name} %}} (missing {{% /{name} %}})"
            ));
            if let Some(handler) = self.registry.get_mut(&name) {
                output.push_str("\n\n");
                output.push_str(&handler.close());
                output.push('\n');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn process(input: &str) -> (String, Vec<String>) {
        let mut processor = TagProcessor::with_builtin_tags();
        let output = processor.process(input);
        (output, processor.take_warnings())
    }

    #[test]
    fn test_callout_block() {
        let (output, warnings) =
            process("{% callout type=\"warning\" title=\"Careful\" %}\nBody\n{% /callout %}\n");

        assert!(warnings.is_empty());
        assert!(output.starts_with(r#"<div class="callout warning">"#));
        assert!(output.contains("<strong>Careful</strong>"));
        assert!(output.contains("\n\nBody\n\n</div></div>\n"));
    }

    #[test]
    fn test_callout_default_type() {
        let (output, warnings) = process("{% callout %}\nx\n{% /callout %}");
        assert!(warnings.is_empty());
        assert!(output.contains(r#"class="callout note""#));
    }

    #[test]
    fn test_invalid_callout_type_warns_and_defaults() {
        let (output, warnings) = process("{% callout type=\"danger\" %}\nx\n{% /callout %}");
        assert!(output.contains(r#"class="callout note""#));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("line 1: callout: invalid value \"danger\""));
    }

    #[test]
    fn test_self_closing_inline() {
        let (output, warnings) = process("Now {% version-animation /%} deploys.");
        assert!(warnings.is_empty());
        assert_eq!(
            output,
            r#"Now <div class="version-animation"></div> deploys."#
        );
    }

    #[test]
    fn test_unknown_tag_passes_through() {
        let (output, warnings) = process("{% tabs %}\nBody\n{% /tabs %}");
        assert!(output.contains("{% tabs %}"));
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("unknown tag \"tabs\""));
        assert!(warnings[1].contains("stray closing tag"));
    }

    #[test]
    fn test_unclosed_tag_is_closed_at_end() {
        let (output, warnings) = process("{% callout %}\nBody");
        assert!(output.ends_with("</div></div>\n"));
        assert_eq!(
            warnings,
            vec!["unclosed tag {% callout %} (missing {% /callout %})"]
        );
    }

    #[test]
    fn test_stray_close() {
        let (output, warnings) = process("{% /callout %}");
        assert_eq!(output, "{% /callout %}");
        assert_eq!(
            warnings,
            vec!["line 1: stray closing tag {% /callout %} with no opening tag"]
        );
    }

    #[test]
    fn test_nested_callouts() {
        let input = "{% callout %}\n{% callout type=\"check\" %}\nInner\n{% /callout %}\n{% /callout %}";
        let (output, warnings) = process(input);
        assert!(warnings.is_empty());
        assert_eq!(output.matches(r#"<div class="callout "#).count(), 2);
        assert_eq!(output.matches("</div></div>").count(), 2);
    }

    #[test]
    fn test_fenced_tags_untouched() {
        let input = "```md\n{% callout %}\n```\n{% version-animation /%}";
        let (output, warnings) = process(input);
        assert!(warnings.is_empty());
        assert!(output.contains("```md\n{% callout %}\n```"));
        assert!(output.contains(r#"<div class="version-animation"></div>"#));
    }

    #[test]
    fn test_heading_annotation_untouched() {
        let (output, warnings) = process("## Setup {% #setup %}");
        assert!(warnings.is_empty());
        assert_eq!(output, "## Setup {% #setup %}");
    }

    #[test]
    fn test_container_inside_line_warns() {
        let (output, warnings) = process("text {% callout %} more");
        assert_eq!(output, "text {% callout %} more");
        assert!(warnings[0].contains("must be on its own line"));
    }

    #[test]
    fn test_self_closing_callout_is_balanced() {
        let (output, _) = process("{% callout title=\"Empty\" /%}");
        assert_eq!(output.matches("<div").count(), output.matches("</div>").count());
    }

    #[test]
    fn test_close_skips_over_unclosed_inner() {
        let mut processor = TagProcessor::new(TagRegistry::builtin());
        let output = processor.process("{% callout %}\n{% callout %}\n{% /callout %}\n{% /callout %}\n{% /callout %}");
        let warnings = processor.warnings();
        assert!(output.ends_with("{% /callout %}"));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("stray"));
    }
}
