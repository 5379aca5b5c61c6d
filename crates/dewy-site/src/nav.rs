//! Side and top navigation.
//!
//! Link tables are fixed per locale. The active side link is the one whose
//! `href` equals the current path exactly.

use std::fmt::Write;

use dewy_renderer::escape_html;
use serde::Serialize;

use crate::locale::Locale;
use crate::panel::PanelState;

/// Default repository shown in the top bar.
pub const GITHUB_URL: &str = "https://github.com/linyows/dewy";

/// A navigation link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub href: &'static str,
    pub title: &'static str,
}

/// A titled group of side navigation links.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct NavSection {
    pub title: &'static str,
    pub links: &'static [NavLink],
}

/// A top navigation entry. `key` names its icon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TopNavLink {
    pub key: &'static str,
    pub href: &'static str,
    pub label: &'static str,
}

const fn link(href: &'static str, title: &'static str) -> NavLink {
    NavLink { href, title }
}

static EN_SECTIONS: &[NavSection] = &[
    NavSection {
        title: "Overview",
        links: &[
            link("/introduction", "Introduction"),
            link("/getting-started", "Getting Started"),
            link("/architecture", "Architecture"),
            link("/faq", "FAQ"),
            link("/contributing", "Contributing"),
        ],
    },
    NavSection {
        title: "Concepts",
        links: &[
            link("/architecture", "Architecture"),
            link("/registry", "Registry"),
            link("/artifact", "Artifact"),
            link("/notifier", "Notifier"),
            link("/cache", "Cache"),
            link("/versioning", "Versioning"),
            link("/deployment-hooks", "Deployment Hooks"),
        ],
    },
    NavSection {
        title: "Operations",
        links: &[
            link("/signal-handling", "Signal Handling"),
            link("/multi-port", "Multi-Port"),
            link("/structured-logging", "Structured Logging"),
            link("/cache-configuration", "Cache Configuration"),
            link("/deployment-workflow", "Deployment Workflow"),
        ],
    },
];

static JA_SECTIONS: &[NavSection] = &[
    NavSection {
        title: "概要",
        links: &[
            link("/ja/introduction", "はじめに"),
            link("/ja/getting-started", "使ってみよう"),
            link("/ja/installation", "インストール"),
            link("/ja/faq", "よくある質問"),
            link("/ja/contributing", "コントリビューション"),
        ],
    },
    NavSection {
        title: "コンセプト",
        links: &[
            link("/ja/architecture", "アーキテクチャ"),
            link("/ja/registry", "レジストリー"),
            link("/ja/artifact", "アーティファクト"),
            link("/ja/notifier", "通知"),
            link("/ja/cache", "キャッシュ"),
            link("/ja/versioning", "バージョニング"),
            link("/ja/deployment-hooks", "デプロイフック"),
        ],
    },
    NavSection {
        title: "運用",
        links: &[
            link("/ja/signal-handling", "シグナルハンドリング"),
            link("/ja/multi-port", "マルチポート"),
            link("/ja/structured-logging", "構造化ログ"),
            link("/ja/cache-configuration", "キャッシュ設定"),
            link("/ja/deployment-workflow", "デプロイメントワークフロー"),
        ],
    },
];

static EN_TOP: &[TopNavLink] = &[
    TopNavLink {
        key: "guide",
        href: "/introduction/",
        label: "Guide",
    },
    TopNavLink {
        key: "docs",
        href: "/architecture/",
        label: "Docs",
    },
    TopNavLink {
        key: "reference",
        href: "/reference",
        label: "Reference",
    },
];

static JA_TOP: &[TopNavLink] = &[
    TopNavLink {
        key: "guide",
        href: "/ja/introduction/",
        label: "ガイド",
    },
    TopNavLink {
        key: "docs",
        href: "/ja/architecture/",
        label: "ドキュメント",
    },
    TopNavLink {
        key: "reference",
        href: "/ja/reference",
        label: "リファレンス",
    },
];

/// Side navigation sections for `locale`.
#[must_use]
pub fn side_sections(locale: Locale) -> &'static [NavSection] {
    match locale {
        Locale::En => EN_SECTIONS,
        Locale::Ja => JA_SECTIONS,
    }
}

/// Top navigation links for `locale`.
#[must_use]
pub fn top_links(locale: Locale) -> &'static [TopNavLink] {
    match locale {
        Locale::En => EN_TOP,
        Locale::Ja => JA_TOP,
    }
}

/// Render the side navigation for the page at `current_path`.
#[must_use]
pub fn render_side_nav(current_path: &str) -> String {
    let mut html = String::with_capacity(2048);
    html.push_str(r#"<nav class="sidenav">"#);
    for section in side_sections(Locale::from_path(current_path)) {
        write!(html, "<div><span>{}</span>", escape_html(section.title)).unwrap();
        html.push_str(r#"<ul class="flex column">"#);
        for link in section.links {
            let class = if link.href == current_path { "active" } else { "" };
            write!(
                html,
                r#"<li class="{class}"><a href="{}">{}</a></li>"#,
                link.href,
                escape_html(link.title)
            )
            .unwrap();
        }
        html.push_str("</ul></div>");
    }
    html.push_str("</nav>");
    html
}

/// Panel states the top bar is rendered with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TopNavState {
    pub nav_menu: PanelState,
    pub language_menu: PanelState,
}

/// Render the top navigation bar.
///
/// `language` is the reader's current language; the selector offers the
/// other one through `/lang/{code}?from={current_path}`.
#[must_use]
pub fn render_top_nav(
    current_path: &str,
    language: Locale,
    state: TopNavState,
    repository_url: &str,
) -> String {
    let links = top_links(Locale::from_path(current_path));
    let repository_url = escape_html(repository_url);
    let other = language.other();
    let switch_href = format!(
        "/lang/{}?from={}",
        other.code(),
        escape_html(current_path)
    );

    let mut html = String::with_capacity(2048);
    html.push_str(r#"<nav class="topnav">"#);
    html.push_str(
        r#"<div class="logo"><a href="/" class="flex"><span class="logo-icon"></span><span class="logo-font">Dewy</span></a></div>"#,
    );

    html.push_str("<section>");
    for item in links {
        write!(
            html,
            r#"<div><a href="{}" class="nav-link"><span class="nav-link-icon {}"></span>{}</a></div>"#,
            item.href,
            item.key,
            escape_html(item.label)
        )
        .unwrap();
    }
    write!(
        html,
        r#"<a class="github" href="{repository_url}" target="_blank" rel="noopener noreferrer" aria-label="GitHub"></a>"#
    )
    .unwrap();
    write!(
        html,
        r#"<div class="language-selector"><button class="language-button" type="button" aria-haspopup="menu" aria-expanded="{}">{}</button>"#,
        state.language_menu.is_open(),
        escape_html(language.display_name())
    )
    .unwrap();
    if state.language_menu.is_open() {
        write!(
            html,
            r#"<div class="language-menu"><a class="language-option" href="{switch_href}">{}</a></div>"#,
            escape_html(other.display_name())
        )
        .unwrap();
    }
    html.push_str("</div></section>");

    write!(
        html,
        r#"<section class="mobile-nav{}">"#,
        state.nav_menu.class()
    )
    .unwrap();
    for item in links {
        write!(
            html,
            r#"<div><a href="{}" class="mobile-nav-link"><span class="nav-link-icon {}"></span>{}</a></div>"#,
            item.href,
            item.key,
            escape_html(item.label)
        )
        .unwrap();
    }
    write!(
        html,
        r#"<a class="github-mobile" href="{repository_url}" target="_blank" rel="noopener noreferrer" aria-label="GitHub"><span>GitHub</span></a>"#
    )
    .unwrap();
    write!(
        html,
        r#"<div class="language-selector-mobile"><a class="language-option-mobile" href="{switch_href}"><span>{}</span></a></div>"#,
        escape_html(other.display_name())
    )
    .unwrap();
    html.push_str("</section>");

    write!(
        html,
        r#"<button class="hamburger-menu" type="button" aria-expanded="{}" aria-label="Menu"></button>"#,
        state.nav_menu.is_open()
    )
    .unwrap();
    html.push_str("</nav>");
    html
}
