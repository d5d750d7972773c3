//! Harness configuration.
//!
//! One configuration drives both interactive debugging and CI: runs are
//! headless unless `HEADFUL` is set, and the app origin and cookie keys come
//! from the environment so the same binary tests any deployment.

use url::Url;

use crate::browser::BrowserConfig;
use crate::result::{EnsayoError, EnsayoResult};
use crate::wait::WaitOptions;

/// Default app origin when `BLOG_APP_URL` is not set
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Name of the app's session cookie
pub const DEFAULT_COOKIE_NAME: &str = "session";

/// Configuration for a harness run
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Origin of the application under test
    pub base_url: Url,
    /// Name of the session cookie
    pub cookie_name: String,
    /// Cookie signing keys, newest first
    pub cookie_keys: Vec<String>,
    /// Browser launch configuration
    pub browser: BrowserConfig,
    /// Wait bounds for selector polling
    pub wait: WaitOptions,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL parses"),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            cookie_keys: Vec::new(),
            browser: BrowserConfig::default(),
            wait: WaitOptions::default(),
        }
    }
}

impl HarnessConfig {
    /// Create a configuration with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the app origin
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Set the session cookie name
    #[must_use]
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// Set the cookie signing keys, newest first
    #[must_use]
    pub fn with_cookie_keys(mut self, keys: impl Into<Vec<String>>) -> Self {
        self.cookie_keys = keys.into();
        self
    }

    /// Set the browser configuration
    #[must_use]
    pub fn with_browser(mut self, browser: BrowserConfig) -> Self {
        self.browser = browser;
        self
    }

    /// Set the wait bounds
    #[must_use]
    pub fn with_wait(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }

    /// Load configuration from the environment.
    ///
    /// Recognized variables:
    /// - `BLOG_APP_URL`: app origin (default `http://localhost:3000`)
    /// - `SESSION_KEYS`: comma-separated cookie signing keys, newest first
    /// - `HEADFUL`: when set, the browser runs with a visible window
    /// - `CHROMIUM_PATH`: chromium executable override
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `BLOG_APP_URL` is not a valid URL.
    pub fn from_env() -> EnsayoResult<Self> {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("BLOG_APP_URL") {
            config.base_url = Url::parse(&raw).map_err(|e| EnsayoError::Config {
                message: format!("BLOG_APP_URL {raw:?} is not a valid URL: {e}"),
            })?;
        }

        if let Ok(raw) = std::env::var("SESSION_KEYS") {
            config.cookie_keys = raw
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from)
                .collect();
        }

        if std::env::var("HEADFUL").is_ok() {
            config.browser = config.browser.with_headless(false);
        }

        if let Ok(path) = std::env::var("CHROMIUM_PATH") {
            config.browser = config.browser.with_chromium_path(path);
        }

        Ok(config)
    }

    /// Resolve a path or absolute URL against the app origin
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the path cannot be resolved.
    pub fn resolve(&self, path: &str) -> EnsayoResult<Url> {
        self.base_url.join(path).map_err(|e| EnsayoError::Config {
            message: format!("cannot resolve {path:?} against {}: {e}", self.base_url),
        })
    }
}
