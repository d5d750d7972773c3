//! The merged test facade over browser, page, and app configuration.
//!
//! One object gives a scenario everything it touches: browser lifecycle,
//! page interaction, cookie-based login, and in-page API calls. Closing the
//! harness closes the browser, which takes the page down with it; the
//! browser handle owns shutdown, not the page.

use serde_json::Value;
use url::Url;

use crate::api::ApiRequest;
use crate::browser::{Browser, Page};
use crate::config::HarnessConfig;
use crate::factory::{authenticated_session, UserRecord};
use crate::result::EnsayoResult;
use crate::selector::Selector;
use crate::session::Keyring;

/// Selector for the logout link that only renders for authenticated users
const LOGGED_IN_MARKER: &str = "a[href=\"/auth/logout\"]";

/// A launched browser session pointed at the app under test
#[derive(Debug)]
pub struct Harness {
    browser: Browser,
    page: Page,
    config: HarnessConfig,
}

impl Harness {
    /// Launch a browser and open a page
    ///
    /// # Errors
    ///
    /// Returns an error if the browser cannot start.
    pub async fn launch(config: HarnessConfig) -> EnsayoResult<Self> {
        let browser = Browser::launch(config.browser.clone()).await?;
        let page = browser.new_page().await?;
        Ok(Self {
            browser,
            page,
            config,
        })
    }

    /// Log in by injecting a signed session for a fresh user.
    ///
    /// Generates a user record, signs a session asserting it is
    /// authenticated, injects the cookie pair, then reloads the blog index
    /// and waits for the logout link so the rendered page reflects the
    /// session before the scenario continues.
    ///
    /// # Errors
    ///
    /// Returns a session error if no cookie keys are configured, or any
    /// browser error from injection and navigation.
    pub async fn login(&self) -> EnsayoResult<UserRecord> {
        let keyring = Keyring::new(self.config.cookie_keys.clone())?;
        let user = UserRecord::generate();
        let signed = authenticated_session(&user, &keyring, &self.config.cookie_name)?;

        tracing::info!(user_id = %user.id, "logging in via session injection");

        self.page
            .set_session_cookies(&signed, &self.config.base_url)
            .await?;
        self.goto("/blogs").await?;
        self.wait_for_selector(LOGGED_IN_MARKER).await?;

        Ok(user)
    }

    /// Navigate, resolving relative paths against the app origin
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot resolve or navigation fails.
    pub async fn goto(&self, path: &str) -> EnsayoResult<()> {
        let url = self.config.resolve(path)?;
        self.page.goto(url.as_str()).await
    }

    /// Current URL as the browser reports it
    ///
    /// # Errors
    ///
    /// Returns an error if the page is gone.
    pub async fn url(&self) -> EnsayoResult<String> {
        self.page.url().await
    }

    /// Click the first element matching the selector
    ///
    /// # Errors
    ///
    /// Returns element-not-found or an input error.
    pub async fn click(&self, selector: impl Into<Selector>) -> EnsayoResult<()> {
        self.page.click(&selector.into()).await
    }

    /// Type text into the first element matching the selector
    ///
    /// # Errors
    ///
    /// Returns element-not-found or an input error.
    pub async fn type_text(
        &self,
        selector: impl Into<Selector>,
        text: &str,
    ) -> EnsayoResult<()> {
        self.page.type_text(&selector.into(), text).await
    }

    /// innerHTML of the first element matching the selector
    ///
    /// # Errors
    ///
    /// Returns element-not-found or an evaluation error.
    pub async fn contents_of(&self, selector: impl Into<Selector>) -> EnsayoResult<String> {
        self.page.contents_of(&selector.into()).await
    }

    /// Wait for at least one element to match the selector
    ///
    /// # Errors
    ///
    /// Returns a timeout error carrying the selector.
    pub async fn wait_for_selector(&self, selector: impl Into<Selector>) -> EnsayoResult<()> {
        self.page
            .wait_for_selector(&selector.into(), &self.config.wait)
            .await
    }

    /// GET against the app's JSON API from inside the page
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch call fails to evaluate.
    pub async fn get(&self, path: &str) -> EnsayoResult<Value> {
        self.page.get(path).await
    }

    /// POST against the app's JSON API from inside the page
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch call fails to evaluate.
    pub async fn post(&self, path: &str, body: Value) -> EnsayoResult<Value> {
        self.page.post(path, body).await
    }

    /// Run several API requests concurrently, responses in request order
    ///
    /// # Errors
    ///
    /// Returns an error if the batch fails to evaluate.
    pub async fn exec_requests(&self, requests: &[ApiRequest]) -> EnsayoResult<Vec<Value>> {
        self.page.exec_requests(requests).await
    }

    /// The page, for operations the delegations don't cover
    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    /// The app origin this harness points at
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    /// Close the browser, taking the page with it
    ///
    /// # Errors
    ///
    /// Returns an error if shutdown fails.
    pub async fn close(self) -> EnsayoResult<()> {
        self.browser.close().await
    }
}

#[cfg(all(test, not(feature = "browser")))]
mod tests {
    use super::*;
    use crate::session::SessionPayload;

    fn config() -> HarnessConfig {
        HarnessConfig::new().with_cookie_keys(vec!["unit-test-key".to_string()])
    }

    #[tokio::test]
    async fn test_login_injects_signed_cookie_pair() {
        let harness = Harness::launch(config()).await.unwrap();
        let user = harness.login().await.unwrap();

        let cookies = harness.page().injected_cookies();
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[0].0, "session");
        assert_eq!(cookies[1].0, "session.sig");

        let payload = SessionPayload::decode(&cookies[0].1).unwrap();
        assert_eq!(payload.passport.user, user.id);
    }

    #[tokio::test]
    async fn test_login_refreshes_the_blog_index() {
        let harness = Harness::launch(config()).await.unwrap();
        harness.login().await.unwrap();
        assert_eq!(harness.url().await.unwrap(), "http://localhost:3000/blogs");
    }

    #[tokio::test]
    async fn test_login_without_keys_is_a_session_error() {
        let harness = Harness::launch(HarnessConfig::new()).await.unwrap();
        let err = harness.login().await.unwrap_err();
        assert!(matches!(err, crate::result::EnsayoError::Session { .. }));
    }

    #[tokio::test]
    async fn test_goto_resolves_against_base_url() {
        let harness = Harness::launch(config()).await.unwrap();
        harness.goto("/blogs/new").await.unwrap();
        assert_eq!(
            harness.url().await.unwrap(),
            "http://localhost:3000/blogs/new"
        );
    }

    #[tokio::test]
    async fn test_close_consumes_the_harness() {
        let harness = Harness::launch(config()).await.unwrap();
        harness.close().await.unwrap();
    }
}
