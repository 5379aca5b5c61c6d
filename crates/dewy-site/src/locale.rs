//! Page language and language preference.
//!
//! English pages live at the site root and Japanese pages under `/ja/`.
//! Everything here is a pure function of the path and preference it is given.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Cookie holding the reader's explicit language choice.
pub const LANGUAGE_COOKIE: &str = "dewy-language";

/// Japanese landing page, used when switching from the site root.
const JA_HOME: &str = "/ja/introduction";

/// Site language.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ja,
}

impl Locale {
    /// Locale of a URL path: Japanese for `/ja` and anything below it.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        if is_japanese_path(path) {
            Self::Ja
        } else {
            Self::En
        }
    }

    /// Parse a stored language code. Only `en` and `ja` are accepted.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Self::En),
            "ja" => Some(Self::Ja),
            _ => None,
        }
    }

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ja => "ja",
        }
    }

    /// Name of the language in that language.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Ja => "日本語",
        }
    }

    /// The language offered by the selector when this one is active.
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::En => Self::Ja,
            Self::Ja => Self::En,
        }
    }

    #[must_use]
    pub fn toc_title(self) -> &'static str {
        match self {
            Self::En => "On this page",
            Self::Ja => "このページの内容",
        }
    }

    #[must_use]
    pub fn edit_label(self) -> &'static str {
        match self {
            Self::En => "Edit this page on GitHub",
            Self::Ja => "GitHub でこのページを編集",
        }
    }

    /// Body font class.
    #[must_use]
    pub fn font_class(self) -> &'static str {
        match self {
            Self::En => "font-en",
            Self::Ja => "font-ja",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Whether `path` is `/ja` or below it.
#[must_use]
pub fn is_japanese_path(path: &str) -> bool {
    path == "/ja" || path.starts_with("/ja/")
}

/// Resolve the reader's preferred language.
///
/// An explicit stored choice (`en` or `ja`) wins. Otherwise the first
/// `Accept-Language` entry decides: anything starting with `ja` means
/// Japanese. English is the fallback.
#[must_use]
pub fn preferred_locale(stored: Option<&str>, accept_language: Option<&str>) -> Locale {
    if let Some(locale) = stored.and_then(|code| Locale::from_code(code.trim())) {
        return locale;
    }

    let browser = accept_language
        .and_then(|header| header.split(',').next())
        .map(|tag| tag.split(';').next().unwrap_or_default().trim());
    if browser.is_some_and(|tag| tag.starts_with("ja")) {
        Locale::Ja
    } else {
        Locale::En
    }
}

/// Path of the current page in `target`, or `None` when already there.
///
/// ```
/// use dewy_site::{Locale, switch_path};
///
/// assert_eq!(switch_path("/", Locale::Ja).as_deref(), Some("/ja/introduction"));
/// assert_eq!(switch_path("/cache", Locale::Ja).as_deref(), Some("/ja/cache"));
/// assert_eq!(switch_path("/ja/cache", Locale::En).as_deref(), Some("/cache"));
/// assert_eq!(switch_path("/ja/cache", Locale::Ja), None);
/// ```
#[must_use]
pub fn switch_path(current: &str, target: Locale) -> Option<String> {
    match (target, is_japanese_path(current)) {
        (Locale::Ja, true) | (Locale::En, false) => None,
        (Locale::Ja, false) => Some(japanese_counterpart(current)),
        (Locale::En, true) => {
            let stripped = &current["/ja".len()..];
            Some(if stripped.is_empty() {
                "/".to_owned()
            } else {
                stripped.to_owned()
            })
        }
    }
}

/// Redirect for a first visit: English pages move to Japanese when the
/// reader prefers Japanese. Japanese pages are never redirected.
#[must_use]
pub fn initial_redirect(path: &str, preference: Locale) -> Option<String> {
    (preference == Locale::Ja && !is_japanese_path(path)).then(|| japanese_counterpart(path))
}

fn japanese_counterpart(path: &str) -> String {
    if path == "/" || path.is_empty() {
        JA_HOME.to_owned()
    } else {
        format!("/ja{path}")
    }
}
