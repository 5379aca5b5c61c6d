//! Full HTML document around a rendered page.

use std::fmt::Write;

use dewy_renderer::escape_html;

use crate::locale::Locale;
use crate::nav::{TopNavState, render_side_nav, render_top_nav};

/// Stylesheet served next to every page.
pub const GLOBALS_CSS: &str = include_str!("../assets/globals.css");

/// Everything needed to wrap page content into a document.
#[derive(Clone, Debug)]
pub struct PageShell<'a> {
    /// Browser path of the page (`/`, `/cache`, `/ja/cache`).
    pub path: &'a str,
    /// Language the reader has chosen, used by the language selector.
    pub language: Locale,
    pub title: &'a str,
    pub description: &'a str,
    /// Rendered markdown.
    pub content: &'a str,
    /// Rendered table of contents, if shown.
    pub toc: Option<&'a str>,
    pub edit_url: &'a str,
    /// Repository linked from the top bar.
    pub repository_url: &'a str,
    pub footer: &'a str,
    pub panels: TopNavState,
}

/// Edit link for the page at URL path `path` (no leading slash).
///
/// ```
/// use dewy_site::edit_url;
///
/// let base = "https://github.com/linyows/dewy/edit/main/docs/pages";
/// assert_eq!(edit_url(base, ""), format!("{base}/index.md"));
/// assert_eq!(edit_url(base, "ja/cache"), format!("{base}/ja/cache.md"));
/// ```
#[must_use]
pub fn edit_url(base: &str, path: &str) -> String {
    let page = if path.is_empty() { "index" } else { path };
    format!("{}/{page}.md", base.trim_end_matches('/'))
}

/// Footer text: `© {start}-{year} {holder}`.
#[must_use]
pub fn copyright_line(holder: &str, start_year: i32, current_year: i32) -> String {
    if start_year >= current_year {
        format!("© {current_year} {holder}")
    } else {
        format!("© {start_year}-{current_year} {holder}")
    }
}

/// Render the complete document.
#[must_use]
pub fn render_document(page: &PageShell<'_>) -> String {
    let page_locale = Locale::from_path(page.path);
    let font = page_locale.font_class();
    let title = escape_html(page.title);

    let mut html = String::with_capacity(page.content.len() + 8192);
    write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n",
        page_locale.code()
    )
    .unwrap();
    html.push_str("<meta charset=\"utf-8\">\n");
    writeln!(html, "<title>{title}</title>").unwrap();
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str("<meta name=\"referrer\" content=\"strict-origin\">\n");
    writeln!(html, "<meta name=\"title\" content=\"{title}\">").unwrap();
    writeln!(
        html,
        "<meta name=\"description\" content=\"{}\">",
        escape_html(page.description)
    )
    .unwrap();
    html.push_str("<link rel=\"shortcut icon\" href=\"/favicon.ico\">\n");
    html.push_str("<link rel=\"icon\" href=\"/favicon.ico\">\n");
    html.push_str("<link rel=\"stylesheet\" href=\"/globals.css\">\n");
    html.push_str("</head>\n");

    writeln!(html, "<body class=\"{font}\">").unwrap();
    html.push_str(&render_top_nav(
        page.path,
        page.language,
        page.panels,
        page.repository_url,
    ));
    writeln!(html, "\n<div class=\"page {font}\">").unwrap();
    html.push_str(&render_side_nav(page.path));
    html.push_str("\n<div class=\"main-and-toc\">\n<main class=\"flex column\">\n<div>\n");
    html.push_str(page.content);
    write!(
        html,
        "\n<div class=\"edit-link\"><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a></div>\n",
        escape_html(page.edit_url),
        escape_html(page_locale.edit_label())
    )
    .unwrap();
    html.push_str("</div>\n</main>\n");
    if let Some(toc) = page.toc {
        html.push_str(toc);
        html.push('\n');
    }
    html.push_str("</div>\n</div>\n");
    writeln!(html, "<footer><p>{}</p></footer>", escape_html(page.footer)).unwrap();
    html.push_str("</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn shell<'a>(path: &'a str, toc: Option<&'a str>) -> PageShell<'a> {
        PageShell {
            path,
            language: Locale::En,
            title: "Cache <Guide>",
            description: "Caching artifacts",
            content: "<h1>Cache</h1>",
            toc,
            edit_url: "https://example.com/edit/cache.md",
            repository_url: "https://github.com/linyows/dewy",
            footer: "© 2018-2026 linyows",
            panels: TopNavState::default(),
        }
    }

    #[test]
    fn test_edit_url_trims_base_slash() {
        assert_eq!(
            edit_url("https://example.com/pages/", "faq"),
            "https://example.com/pages/faq.md"
        );
    }

    #[test]
    fn test_copyright_line() {
        assert_eq!(copyright_line("linyows", 2018, 2026), "© 2018-2026 linyows");
        assert_eq!(copyright_line("linyows", 2026, 2026), "© 2026 linyows");
    }

    #[test]
    fn test_document_head() {
        let html = render_document(&shell("/cache", None));
        assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
        assert!(html.contains("<title>Cache &lt;Guide&gt;</title>"));
        assert!(html.contains("<meta name=\"description\" content=\"Caching artifacts\">"));
        assert!(html.contains("<meta name=\"referrer\" content=\"strict-origin\">"));
        assert!(html.contains("href=\"/globals.css\""));
    }

    #[test]
    fn test_document_body() {
        let html = render_document(&shell("/cache", Some("<nav class=\"toc\"></nav>")));
        assert!(html.contains("<body class=\"font-en\">"));
        assert!(html.contains("<h1>Cache</h1>"));
        assert!(html.contains("Edit this page on GitHub</a>"));
        assert!(html.contains("<nav class=\"toc\"></nav>"));
        assert!(html.contains("<footer><p>© 2018-2026 linyows</p></footer>"));
        assert!(html.contains("<li class=\"active\"><a href=\"/cache\">"));
    }

    #[test]
    fn test_japanese_document() {
        let html = render_document(&shell("/ja/cache", None));
        assert!(html.contains("<html lang=\"ja\">"));
        assert!(html.contains("<div class=\"page font-ja\">"));
        assert!(html.contains("GitHub でこのページを編集"));
        assert!(!html.contains("class=\"toc\""));
    }

    #[test]
    fn test_stylesheet_is_bundled() {
        assert!(GLOBALS_CSS.contains(".callout"));
    }
}
