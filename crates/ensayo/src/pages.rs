//! Page objects for the blog UI.
//!
//! Scenarios reference elements through these objects rather than raw
//! selector strings, so a markup change is corrected in one place.

use crate::selector::Selector;
use std::collections::HashMap;

/// Trait for page objects representing a page or component in the UI
pub trait PageObject {
    /// URL pattern that matches this page (e.g., "/blogs", "/blogs/:id")
    fn url_pattern(&self) -> &str;

    /// Selector whose presence means the page is ready for interaction
    fn ready_marker(&self) -> Selector;

    /// Get the page name for logging/debugging
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// The app's header navigation, present on every page
#[derive(Debug, Clone)]
pub struct HeaderNav {
    /// OAuth login link, rendered only when logged out
    pub login_link: Selector,
    /// Logout link, rendered only when logged in
    pub logout_link: Selector,
    /// Floating action button leading to the new-blog form
    pub add_blog_button: Selector,
}

impl Default for HeaderNav {
    fn default() -> Self {
        Self {
            login_link: Selector::css("a[href=\"/auth/google\"]"),
            logout_link: Selector::css("a[href=\"/auth/logout\"]"),
            add_blog_button: Selector::css("a.btn-floating"),
        }
    }
}

impl HeaderNav {
    /// Create the header component
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PageObject for HeaderNav {
    fn url_pattern(&self) -> &str {
        "/*"
    }

    fn ready_marker(&self) -> Selector {
        Selector::css("nav")
    }
}

/// The new-blog form
#[derive(Debug, Clone)]
pub struct BlogForm {
    /// First form label ("Blog Title")
    pub first_label: Selector,
    /// Title input field
    pub title_input: Selector,
    /// Content input field
    pub content_input: Selector,
    /// Submit button
    pub submit_button: Selector,
    /// Validation message under the title field
    pub title_error: Selector,
    /// Validation message under the content field
    pub content_error: Selector,
}

impl Default for BlogForm {
    fn default() -> Self {
        Self {
            first_label: Selector::css("form label"),
            title_input: Selector::css(".title input"),
            content_input: Selector::css(".content input"),
            submit_button: Selector::css("form button"),
            title_error: Selector::css(".title .red-text"),
            content_error: Selector::css(".content .red-text"),
        }
    }
}

impl BlogForm {
    /// Create the form page object
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PageObject for BlogForm {
    fn url_pattern(&self) -> &str {
        "/blogs/new"
    }

    fn ready_marker(&self) -> Selector {
        Selector::css("form")
    }
}

/// The confirm-your-entries review screen
#[derive(Debug, Clone)]
pub struct BlogReview {
    /// Review heading
    pub heading: Selector,
    /// Green save button
    pub save_button: Selector,
}

impl Default for BlogReview {
    fn default() -> Self {
        Self {
            heading: Selector::css("h5"),
            save_button: Selector::css("button.green"),
        }
    }
}

impl BlogReview {
    /// Create the review page object
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PageObject for BlogReview {
    fn url_pattern(&self) -> &str {
        "/blogs/new"
    }

    fn ready_marker(&self) -> Selector {
        Selector::css("button.green")
    }
}

/// The blog index listing
#[derive(Debug, Clone)]
pub struct BlogIndex {
    /// A rendered blog card
    pub card: Selector,
    /// Title inside a card
    pub card_title: Selector,
    /// Body text inside a card
    pub card_content: Selector,
}

impl Default for BlogIndex {
    fn default() -> Self {
        Self {
            card: Selector::css(".card"),
            card_title: Selector::css(".card-title"),
            card_content: Selector::css("p"),
        }
    }
}

impl BlogIndex {
    /// Create the index page object
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PageObject for BlogIndex {
    fn url_pattern(&self) -> &str {
        "/blogs"
    }

    fn ready_marker(&self) -> Selector {
        Selector::css(".container")
    }
}

/// URL pattern matcher for page objects
#[derive(Debug, Clone)]
pub struct UrlMatcher {
    pattern: String,
    segments: Vec<UrlSegment>,
}

#[derive(Debug, Clone)]
enum UrlSegment {
    Literal(String),
    Wildcard,
    Parameter(String),
}

impl UrlMatcher {
    /// Create a matcher from a pattern.
    ///
    /// Patterns support literal segments (`/blogs`), wildcards (`/blogs/*`),
    /// and named parameters (`/blogs/:id`).
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if s == "*" {
                    UrlSegment::Wildcard
                } else if let Some(name) = s.strip_prefix(':') {
                    UrlSegment::Parameter(name.to_string())
                } else {
                    UrlSegment::Literal(s.to_string())
                }
            })
            .collect();

        Self {
            pattern: pattern.to_string(),
            segments,
        }
    }

    /// Check if a path matches the pattern.
    ///
    /// Wildcards and parameters each consume exactly one segment.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        if path_segments.len() != self.segments.len() {
            return false;
        }

        self.segments.iter().enumerate().all(|(i, segment)| match segment {
            UrlSegment::Literal(lit) => path_segments.get(i) == Some(&lit.as_str()),
            UrlSegment::Wildcard | UrlSegment::Parameter(_) => true,
        })
    }

    /// Extract named parameters from a matching path
    #[must_use]
    pub fn extract_params(&self, path: &str) -> HashMap<String, String> {
        let mut params = HashMap::new();
        let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        for (i, segment) in self.segments.iter().enumerate() {
            if let UrlSegment::Parameter(name) = segment {
                if let Some(value) = path_segments.get(i) {
                    let _ = params.insert(name.clone(), (*value).to_string());
                }
            }
        }

        params
    }

    /// Get the pattern this matcher was built from
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod page_object_tests {
        use super::*;

        #[test]
        fn test_form_selectors() {
            let form = BlogForm::new();
            assert_eq!(form.first_label, Selector::css("form label"));
            assert_eq!(form.title_input, Selector::css(".title input"));
            assert_eq!(form.title_error, Selector::css(".title .red-text"));
            assert_eq!(form.url_pattern(), "/blogs/new");
        }

        #[test]
        fn test_header_logout_link_is_the_login_marker() {
            let nav = HeaderNav::new();
            assert_eq!(nav.logout_link, Selector::css("a[href=\"/auth/logout\"]"));
        }

        #[test]
        fn test_index_card_selectors() {
            let index = BlogIndex::new();
            assert_eq!(index.card, Selector::css(".card"));
            assert_eq!(index.card_title, Selector::css(".card-title"));
            assert_eq!(index.url_pattern(), "/blogs");
        }

        #[test]
        fn test_review_shares_the_form_route() {
            let form = BlogForm::new();
            let review = BlogReview::new();
            assert_eq!(form.url_pattern(), review.url_pattern());
        }

        #[test]
        fn test_page_name_defaults_to_type() {
            let index = BlogIndex::new();
            assert!(index.page_name().contains("BlogIndex"));
        }
    }

    mod url_matcher_tests {
        use super::*;

        #[test]
        fn test_literal_match() {
            let matcher = UrlMatcher::new("/blogs");
            assert!(matcher.matches("/blogs"));
            assert!(!matcher.matches("/blogs/new"));
            assert!(!matcher.matches("/surveys"));
        }

        #[test]
        fn test_wildcard_match() {
            let matcher = UrlMatcher::new("/blogs/*");
            assert!(matcher.matches("/blogs/new"));
            assert!(matcher.matches("/blogs/abc"));
            assert!(!matcher.matches("/blogs"));
        }

        #[test]
        fn test_parameter_match_and_extract() {
            let matcher = UrlMatcher::new("/blogs/:id");
            assert!(matcher.matches("/blogs/42"));
            let params = matcher.extract_params("/blogs/42");
            assert_eq!(params.get("id"), Some(&"42".to_string()));
        }

        #[test]
        fn test_page_patterns_match_their_routes() {
            assert!(UrlMatcher::new(BlogIndex::new().url_pattern()).matches("/blogs"));
            assert!(UrlMatcher::new(BlogForm::new().url_pattern()).matches("/blogs/new"));
        }

        #[test]
        fn test_pattern_getter() {
            let matcher = UrlMatcher::new("/blogs/:id");
            assert_eq!(matcher.pattern(), "/blogs/:id");
        }
    }
}
