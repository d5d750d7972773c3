//! Browser control for headless testing.
//!
//! With the `browser` feature enabled this module drives a real Chromium
//! instance over the DevTools Protocol via chromiumoxide. Without the
//! feature, a mock rendition records navigation, cookies, and input so
//! harness logic and fixtures unit-test without a browser binary.

use crate::result::{EnsayoError, EnsayoResult};

/// Browser launch configuration
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 800,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

// ============================================================================
// Real CDP implementation (when the `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
mod cdp {
    use super::{BrowserConfig, EnsayoError, EnsayoResult};
    use crate::api::{self, ApiRequest};
    use crate::selector::Selector;
    use crate::session::SignedSession;
    use crate::wait::WaitOptions;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::input::{
        DispatchKeyEventParams, DispatchKeyEventType, DispatchMouseEventParams,
        DispatchMouseEventType, MouseButton,
    };
    use chromiumoxide::cdp::browser_protocol::network::{CookieParam, SetCookiesParams};
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use serde::Deserialize;
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Instant;
    use tokio::sync::Mutex;
    use url::Url;

    /// Viewport center of an element, as reported by the page
    #[derive(Debug, Deserialize)]
    struct Center {
        x: f64,
        y: f64,
    }

    /// Browser instance with a live CDP connection
    #[derive(Debug)]
    pub struct Browser {
        config: BrowserConfig,
        inner: Arc<Mutex<CdpBrowser>>,
        #[allow(dead_code)]
        handle: tokio::task::JoinHandle<()>,
        // Throwaway profile; removed from disk when the browser is dropped.
        #[allow(dead_code)]
        profile: tempfile::TempDir,
    }

    impl Browser {
        /// Launch a browser instance
        ///
        /// # Errors
        ///
        /// Returns an error if no chromium can be launched.
        pub async fn launch(config: BrowserConfig) -> EnsayoResult<Self> {
            let profile = tempfile::TempDir::new()?;

            let mut builder = CdpConfig::builder()
                .window_size(config.viewport_width, config.viewport_height)
                .user_data_dir(profile.path());

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder.build().map_err(|message| {
                EnsayoError::BrowserLaunch { message }
            })?;

            let (browser, mut handler) =
                CdpBrowser::launch(cdp_config)
                    .await
                    .map_err(|e| EnsayoError::BrowserLaunch {
                        message: e.to_string(),
                    })?;

            // Drain CDP events until the connection drops
            let handle = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            tracing::info!(headless = config.headless, "browser launched");

            Ok(Self {
                config,
                inner: Arc::new(Mutex::new(browser)),
                handle,
                profile,
            })
        }

        /// Open a new page
        ///
        /// # Errors
        ///
        /// Returns an error if the tab cannot be created.
        pub async fn new_page(&self) -> EnsayoResult<Page> {
            let browser = self.inner.lock().await;
            let cdp_page =
                browser
                    .new_page("about:blank")
                    .await
                    .map_err(|e| EnsayoError::Page {
                        message: e.to_string(),
                    })?;

            Ok(Page {
                inner: Arc::new(Mutex::new(cdp_page)),
            })
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Close the browser, taking every page it owns with it
        ///
        /// # Errors
        ///
        /// Returns an error if shutdown fails.
        pub async fn close(self) -> EnsayoResult<()> {
            let mut browser = self.inner.lock().await;
            browser
                .close()
                .await
                .map_err(|e| EnsayoError::BrowserLaunch {
                    message: e.to_string(),
                })?;
            Ok(())
        }
    }

    /// A browser page with a live CDP connection
    #[derive(Debug, Clone)]
    pub struct Page {
        inner: Arc<Mutex<CdpPage>>,
    }

    impl Page {
        /// Navigate to a URL
        ///
        /// # Errors
        ///
        /// Returns an error if navigation fails.
        pub async fn goto(&self, url: &str) -> EnsayoResult<()> {
            tracing::debug!(url, "navigating");
            let page = self.inner.lock().await;
            page.goto(url)
                .await
                .map_err(|e| EnsayoError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        }

        /// Current URL as the browser reports it
        ///
        /// # Errors
        ///
        /// Returns an error if the page is gone.
        pub async fn url(&self) -> EnsayoResult<String> {
            let page = self.inner.lock().await;
            let url = page.url().await.map_err(|e| EnsayoError::Page {
                message: e.to_string(),
            })?;
            Ok(url.unwrap_or_default())
        }

        /// Evaluate an expression and deserialize its value
        ///
        /// # Errors
        ///
        /// Returns an error if evaluation or deserialization fails.
        pub async fn eval<T: serde::de::DeserializeOwned>(&self, script: &str) -> EnsayoResult<T> {
            let page = self.inner.lock().await;
            let result = page.evaluate(script).await.map_err(|e| EnsayoError::Eval {
                message: e.to_string(),
            })?;
            result.into_value().map_err(|e| EnsayoError::Eval {
                message: e.to_string(),
            })
        }

        /// Inject the session cookie pair, scoped to the app origin
        ///
        /// # Errors
        ///
        /// Returns an error if the cookies are rejected.
        pub async fn set_session_cookies(
            &self,
            signed: &SignedSession,
            base_url: &Url,
        ) -> EnsayoResult<()> {
            let cookies = vec![
                Self::cookie(&signed.name, &signed.value, base_url)?,
                Self::cookie(&signed.sig_name, &signed.sig, base_url)?,
            ];

            let page = self.inner.lock().await;
            page.execute(SetCookiesParams::new(cookies))
                .await
                .map_err(|e| EnsayoError::Cookie {
                    message: e.to_string(),
                })?;
            Ok(())
        }

        fn cookie(name: &str, value: &str, base_url: &Url) -> EnsayoResult<CookieParam> {
            CookieParam::builder()
                .name(name)
                .value(value)
                .url(base_url.as_str())
                .build()
                .map_err(|message| EnsayoError::Cookie { message })
        }

        /// Poll until at least one element matches the selector
        ///
        /// # Errors
        ///
        /// Returns a timeout error carrying the selector if nothing matches
        /// within the wait bounds.
        pub async fn wait_for_selector(
            &self,
            selector: &Selector,
            options: &WaitOptions,
        ) -> EnsayoResult<()> {
            let start = Instant::now();
            let query = selector.to_count_query();

            loop {
                let count: u64 = self.eval(&query).await?;
                if count > 0 {
                    tracing::debug!(
                        selector = %selector.describe(),
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "selector appeared"
                    );
                    return Ok(());
                }
                if start.elapsed() >= options.timeout() {
                    return Err(EnsayoError::Timeout {
                        ms: options.timeout_ms,
                        waited_for: format!("selector {:?}", selector.describe()),
                    });
                }
                tokio::time::sleep(options.poll_interval()).await;
            }
        }

        /// Click the center of the first matching element.
        ///
        /// Dispatches trusted mouse press/release events rather than a
        /// synthetic `el.click()`, so framework event handlers see the same
        /// event stream a user produces.
        ///
        /// # Errors
        ///
        /// Returns element-not-found if nothing matches, or an input error if
        /// dispatch fails.
        pub async fn click(&self, selector: &Selector) -> EnsayoResult<()> {
            let center: Option<Center> = self.eval(&selector.to_rect_query()).await?;
            let center = center.ok_or_else(|| EnsayoError::ElementNotFound {
                selector: selector.describe(),
            })?;

            tracing::debug!(selector = %selector.describe(), x = center.x, y = center.y, "click");

            let page = self.inner.lock().await;
            for kind in [
                DispatchMouseEventType::MousePressed,
                DispatchMouseEventType::MouseReleased,
            ] {
                let params = DispatchMouseEventParams::builder()
                    .r#type(kind)
                    .x(center.x)
                    .y(center.y)
                    .button(MouseButton::Left)
                    .click_count(1)
                    .build()
                    .map_err(|message| EnsayoError::Input { message })?;

                page.execute(params).await.map_err(|e| EnsayoError::Input {
                    message: e.to_string(),
                })?;
            }
            Ok(())
        }

        /// Focus the first matching element and type text into it.
        ///
        /// Each character goes out as its own key event so controlled inputs
        /// observe real input events.
        ///
        /// # Errors
        ///
        /// Returns element-not-found if nothing matches, or an input error if
        /// dispatch fails.
        pub async fn type_text(&self, selector: &Selector, text: &str) -> EnsayoResult<()> {
            let focused: bool = self.eval(&selector.to_focus_query()).await?;
            if !focused {
                return Err(EnsayoError::ElementNotFound {
                    selector: selector.describe(),
                });
            }

            tracing::debug!(selector = %selector.describe(), len = text.len(), "type");

            let page = self.inner.lock().await;
            for ch in text.chars() {
                let params = DispatchKeyEventParams::builder()
                    .r#type(DispatchKeyEventType::Char)
                    .text(ch.to_string())
                    .build()
                    .map_err(|message| EnsayoError::Input { message })?;

                page.execute(params).await.map_err(|e| EnsayoError::Input {
                    message: e.to_string(),
                })?;
            }
            Ok(())
        }

        /// innerHTML of the first matching element
        ///
        /// # Errors
        ///
        /// Returns element-not-found if nothing matches.
        pub async fn contents_of(&self, selector: &Selector) -> EnsayoResult<String> {
            let contents: Option<String> = self.eval(&selector.to_contents_query()).await?;
            contents.ok_or_else(|| EnsayoError::ElementNotFound {
                selector: selector.describe(),
            })
        }

        /// Run a GET request inside the page and return parsed JSON
        ///
        /// # Errors
        ///
        /// Returns an error if the fetch call fails to evaluate.
        pub async fn get(&self, path: &str) -> EnsayoResult<Value> {
            self.eval(&ApiRequest::get(path).to_fetch_script()).await
        }

        /// Run a POST request inside the page and return parsed JSON
        ///
        /// # Errors
        ///
        /// Returns an error if the fetch call fails to evaluate.
        pub async fn post(&self, path: &str, body: Value) -> EnsayoResult<Value> {
            self.eval(&ApiRequest::post(path, body).to_fetch_script())
                .await
        }

        /// Run several requests concurrently, returning responses in order
        ///
        /// # Errors
        ///
        /// Returns an error if the batch fails to evaluate.
        pub async fn exec_requests(&self, requests: &[ApiRequest]) -> EnsayoResult<Vec<Value>> {
            self.eval(&api::batch_script(requests)).await
        }
    }
}

// ============================================================================
// Mock implementation (when the `browser` feature is NOT enabled)
// ============================================================================

#[cfg(not(feature = "browser"))]
mod mock {
    use super::{BrowserConfig, EnsayoError, EnsayoResult};
    use crate::api::ApiRequest;
    use crate::selector::Selector;
    use crate::session::SignedSession;
    use crate::wait::WaitOptions;
    use serde_json::Value;
    use std::sync::{Arc, Mutex};
    use url::Url;

    const NO_BROWSER: &str =
        "Browser feature not enabled. Enable the 'browser' feature for real CDP support.";

    #[derive(Debug, Default)]
    struct PageState {
        url: String,
        cookies: Vec<(String, String)>,
        clicks: Vec<String>,
        typed: Vec<(String, String)>,
    }

    /// Browser instance for unit testing without a browser binary
    #[derive(Debug)]
    pub struct Browser {
        config: BrowserConfig,
    }

    impl Browser {
        /// Launch a mock browser instance
        ///
        /// # Errors
        ///
        /// Never fails in mock mode.
        pub async fn launch(config: BrowserConfig) -> EnsayoResult<Self> {
            Ok(Self { config })
        }

        /// Open a new mock page
        ///
        /// # Errors
        ///
        /// Never fails in mock mode.
        pub async fn new_page(&self) -> EnsayoResult<Page> {
            Ok(Page {
                state: Arc::new(Mutex::new(PageState {
                    url: String::from("about:blank"),
                    ..PageState::default()
                })),
            })
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Close the mock browser
        ///
        /// # Errors
        ///
        /// Never fails in mock mode.
        pub async fn close(self) -> EnsayoResult<()> {
            Ok(())
        }
    }

    /// A mock page recording navigation, cookies, and input
    #[derive(Debug, Clone)]
    pub struct Page {
        state: Arc<Mutex<PageState>>,
    }

    impl Page {
        /// Record a navigation
        ///
        /// # Errors
        ///
        /// Never fails in mock mode.
        pub async fn goto(&self, url: &str) -> EnsayoResult<()> {
            self.state.lock().expect("mock state").url = url.to_string();
            Ok(())
        }

        /// Last recorded URL
        ///
        /// # Errors
        ///
        /// Never fails in mock mode.
        pub async fn url(&self) -> EnsayoResult<String> {
            Ok(self.state.lock().expect("mock state").url.clone())
        }

        /// Evaluation needs a real browser
        ///
        /// # Errors
        ///
        /// Always fails in mock mode.
        pub async fn eval<T: serde::de::DeserializeOwned>(&self, _script: &str) -> EnsayoResult<T> {
            Err(EnsayoError::Eval {
                message: NO_BROWSER.to_string(),
            })
        }

        /// Record injected session cookies
        ///
        /// # Errors
        ///
        /// Never fails in mock mode.
        pub async fn set_session_cookies(
            &self,
            signed: &SignedSession,
            _base_url: &Url,
        ) -> EnsayoResult<()> {
            let mut state = self.state.lock().expect("mock state");
            state
                .cookies
                .push((signed.name.clone(), signed.value.clone()));
            state
                .cookies
                .push((signed.sig_name.clone(), signed.sig.clone()));
            Ok(())
        }

        /// Selector waits succeed immediately in mock mode
        ///
        /// # Errors
        ///
        /// Never fails in mock mode.
        pub async fn wait_for_selector(
            &self,
            _selector: &Selector,
            _options: &WaitOptions,
        ) -> EnsayoResult<()> {
            Ok(())
        }

        /// Record a click
        ///
        /// # Errors
        ///
        /// Never fails in mock mode.
        pub async fn click(&self, selector: &Selector) -> EnsayoResult<()> {
            self.state
                .lock()
                .expect("mock state")
                .clicks
                .push(selector.describe());
            Ok(())
        }

        /// Record typed text
        ///
        /// # Errors
        ///
        /// Never fails in mock mode.
        pub async fn type_text(&self, selector: &Selector, text: &str) -> EnsayoResult<()> {
            self.state
                .lock()
                .expect("mock state")
                .typed
                .push((selector.describe(), text.to_string()));
            Ok(())
        }

        /// Contents need a real browser
        ///
        /// # Errors
        ///
        /// Always fails in mock mode.
        pub async fn contents_of(&self, _selector: &Selector) -> EnsayoResult<String> {
            Err(EnsayoError::Eval {
                message: NO_BROWSER.to_string(),
            })
        }

        /// Fetches need a real browser
        ///
        /// # Errors
        ///
        /// Always fails in mock mode.
        pub async fn get(&self, _path: &str) -> EnsayoResult<Value> {
            Err(EnsayoError::Eval {
                message: NO_BROWSER.to_string(),
            })
        }

        /// Fetches need a real browser
        ///
        /// # Errors
        ///
        /// Always fails in mock mode.
        pub async fn post(&self, _path: &str, _body: Value) -> EnsayoResult<Value> {
            Err(EnsayoError::Eval {
                message: NO_BROWSER.to_string(),
            })
        }

        /// Fetches need a real browser
        ///
        /// # Errors
        ///
        /// Always fails in mock mode.
        pub async fn exec_requests(&self, _requests: &[ApiRequest]) -> EnsayoResult<Vec<Value>> {
            Err(EnsayoError::Eval {
                message: NO_BROWSER.to_string(),
            })
        }

        /// Cookies injected so far, in injection order
        #[must_use]
        pub fn injected_cookies(&self) -> Vec<(String, String)> {
            self.state.lock().expect("mock state").cookies.clone()
        }

        /// Selectors clicked so far
        #[must_use]
        pub fn click_log(&self) -> Vec<String> {
            self.state.lock().expect("mock state").clicks.clone()
        }

        /// Text typed so far, paired with the target selector
        #[must_use]
        pub fn type_log(&self) -> Vec<(String, String)> {
            self.state.lock().expect("mock state").typed.clone()
        }
    }
}

// Re-export based on feature
#[cfg(feature = "browser")]
pub use cdp::{Browser, Page};

#[cfg(not(feature = "browser"))]
pub use mock::{Browser, Page};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = BrowserConfig::default();
        assert!(config.headless);
        assert!(config.sandbox);
        assert_eq!(config.viewport_width, 1280);
        assert_eq!(config.viewport_height, 800);
        assert!(config.chromium_path.is_none());
    }

    #[test]
    fn test_config_builders() {
        let config = BrowserConfig::default()
            .with_headless(false)
            .with_viewport(1024, 768)
            .with_chromium_path("/usr/bin/chromium")
            .with_no_sandbox();
        assert!(!config.headless);
        assert!(!config.sandbox);
        assert_eq!(config.viewport_width, 1024);
        assert_eq!(config.chromium_path.as_deref(), Some("/usr/bin/chromium"));
    }

    #[cfg(not(feature = "browser"))]
    mod mock_tests {
        use super::*;
        use crate::selector::Selector;

        #[tokio::test]
        async fn test_mock_page_records_navigation() {
            let browser = Browser::launch(BrowserConfig::default()).await.unwrap();
            let page = browser.new_page().await.unwrap();
            assert_eq!(page.url().await.unwrap(), "about:blank");

            page.goto("http://localhost:3000/blogs").await.unwrap();
            assert_eq!(page.url().await.unwrap(), "http://localhost:3000/blogs");
        }

        #[tokio::test]
        async fn test_mock_eval_reports_missing_feature() {
            let browser = Browser::launch(BrowserConfig::default()).await.unwrap();
            let page = browser.new_page().await.unwrap();
            let err = page
                .contents_of(&Selector::css("form label"))
                .await
                .unwrap_err();
            assert!(err.to_string().contains("browser"));
        }

        #[tokio::test]
        async fn test_mock_records_input() {
            let browser = Browser::launch(BrowserConfig::default()).await.unwrap();
            let page = browser.new_page().await.unwrap();
            page.click(&Selector::css("a.btn-floating")).await.unwrap();
            page.type_text(&Selector::css(".title input"), "My Title")
                .await
                .unwrap();

            assert_eq!(page.click_log(), vec!["a.btn-floating".to_string()]);
            assert_eq!(
                page.type_log(),
                vec![(".title input".to_string(), "My Title".to_string())]
            );
        }
    }
}
