//! Selector abstraction and JavaScript query generation.
//!
//! Selectors compile to small scripts evaluated in the page. Embedded strings
//! go through Rust's debug formatting, which produces a double-quoted,
//! escaped literal that is also valid JavaScript, so quotes and backslashes
//! in selectors cannot break out of the generated script.

/// Selector for locating elements in the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// CSS selector (e.g., "button.green")
    Css(String),
    /// First element whose text content contains the given string
    Text(String),
    /// CSS selector filtered by text content
    CssWithText {
        /// Base CSS selector
        css: String,
        /// Text content to match
        text: String,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create a text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a CSS selector constrained by text content
    #[must_use]
    pub fn css_with_text(css: impl Into<String>, text: impl Into<String>) -> Self {
        Self::CssWithText {
            css: css.into(),
            text: text.into(),
        }
    }

    /// Human-readable form for error messages
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Css(s) => s.clone(),
            Self::Text(t) => format!("text={t}"),
            Self::CssWithText { css, text } => format!("{css} (text={text})"),
        }
    }

    /// Expression resolving to the first matching element (or null)
    #[must_use]
    pub fn to_query(&self) -> String {
        match self {
            Self::Css(s) => format!("document.querySelector({s:?})"),
            Self::Text(t) => format!(
                "Array.from(document.querySelectorAll('*')).find(el => el.textContent.includes({t:?}))"
            ),
            Self::CssWithText { css, text } => format!(
                "Array.from(document.querySelectorAll({css:?})).find(el => el.textContent.includes({text:?}))"
            ),
        }
    }

    /// Expression resolving to the number of matches
    #[must_use]
    pub fn to_count_query(&self) -> String {
        match self {
            Self::Css(s) => format!("document.querySelectorAll({s:?}).length"),
            Self::Text(t) => format!(
                "Array.from(document.querySelectorAll('*')).filter(el => el.textContent.includes({t:?})).length"
            ),
            Self::CssWithText { css, text } => format!(
                "Array.from(document.querySelectorAll({css:?})).filter(el => el.textContent.includes({text:?})).length"
            ),
        }
    }

    /// Expression resolving to the first match's innerHTML, or null
    #[must_use]
    pub fn to_contents_query(&self) -> String {
        format!(
            "(() => {{ const el = {}; return el ? el.innerHTML : null; }})()",
            self.to_query()
        )
    }

    /// Expression resolving to the first match's viewport center, or null
    #[must_use]
    pub fn to_rect_query(&self) -> String {
        format!(
            "(() => {{ const el = {}; if (!el) return null; \
             const r = el.getBoundingClientRect(); \
             return {{ x: r.x + r.width / 2, y: r.y + r.height / 2 }}; }})()",
            self.to_query()
        )
    }

    /// Expression focusing the first match, resolving to whether it existed
    #[must_use]
    pub fn to_focus_query(&self) -> String {
        format!(
            "(() => {{ const el = {}; if (!el) return false; el.focus(); return true; }})()",
            self.to_query()
        )
    }
}

impl From<&str> for Selector {
    fn from(selector: &str) -> Self {
        Self::Css(selector.to_string())
    }
}

impl From<String> for Selector {
    fn from(selector: String) -> Self {
        Self::Css(selector)
    }
}
