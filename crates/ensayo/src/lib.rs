//! Ensayo: browser-driven end-to-end harness for the blog platform.
//!
//! Ensayo drives a Chromium instance over the DevTools Protocol to exercise
//! the blog application's authentication and publishing flows the way a user
//! would: navigate, click, type, and assert on rendered DOM and JSON API
//! responses. Interactive login is bypassed by minting a signed session
//! cookie pair for a fabricated user and injecting it straight into the
//! browser.
//!
//! # Architecture
//!
//! ```text
//! scenario tests ──► Harness ──► Browser/Page (CDP) ──► blog app
//!                      │
//!                      └──► fixtures: user record + signed session
//! ```
//!
//! The `browser` feature gates real CDP control; without it a mock rendition
//! records interactions so harness logic unit-tests anywhere.

#![warn(missing_docs)]

/// In-page API request marshaling
pub mod api;
/// Browser session and page facade
pub mod browser;
/// Harness configuration
pub mod config;
/// Fixture factories for users and sessions
pub mod factory;
/// The merged test facade
pub mod harness;
/// Page objects for the blog UI
pub mod pages;
/// Result and error types
pub mod result;
/// Selector abstraction
pub mod selector;
/// Session cookie codec and signer
pub mod session;
/// Tracing initialization
pub mod trace;
/// Wait options
pub mod wait;

pub use api::{ApiRequest, Method};
pub use browser::{Browser, BrowserConfig, Page};
pub use config::HarnessConfig;
pub use factory::{authenticated_session, UserRecord};
pub use harness::Harness;
pub use pages::{BlogForm, BlogIndex, BlogReview, HeaderNav, PageObject, UrlMatcher};
pub use result::{EnsayoError, EnsayoResult};
pub use selector::Selector;
pub use session::{Keyring, SessionPayload, SignedSession};
pub use wait::WaitOptions;
