//! Fixture factories for users and authenticated sessions.
//!
//! A scenario that needs a logged-in identity asks the factories for one
//! instead of walking the OAuth flow: generate a user record, sign a session
//! asserting that user is authenticated, and hand the cookie pair to the
//! browser.

use chrono::Utc;
use rand::RngCore;
use uuid::Uuid;

use crate::result::EnsayoResult;
use crate::session::{Keyring, SessionPayload, SignedSession};

/// A fabricated user record.
///
/// The id matches the app datastore's 12-byte format (4-byte unix timestamp
/// followed by 8 random bytes, hex encoded), so it sorts and parses like any
/// record the app creates itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// 24-hex-char record id
    pub id: String,
    /// OAuth subject id the identity provider would have assigned
    pub oauth_id: String,
    /// Display name shown in the app's header
    pub display_name: String,
}

impl UserRecord {
    /// Generate a fresh user with a unique id and OAuth subject
    #[must_use]
    pub fn generate() -> Self {
        let oauth_id = Uuid::new_v4().simple().to_string();
        let display_name = format!("test-user-{}", &oauth_id[..8]);
        Self {
            id: fresh_record_id(),
            oauth_id,
            display_name,
        }
    }
}

/// Generate a 24-hex-char record id: 4-byte unix timestamp + 8 random bytes
fn fresh_record_id() -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let seconds = Utc::now().timestamp().max(0) as u32;
    let mut tail = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut tail);

    let mut id = format!("{seconds:08x}");
    for byte in tail {
        id.push_str(&format!("{byte:02x}"));
    }
    id
}

/// Build the signed cookie pair asserting `user` is logged in
///
/// # Errors
///
/// Returns an error if the session payload fails to encode.
pub fn authenticated_session(
    user: &UserRecord,
    keyring: &Keyring,
    cookie_name: &str,
) -> EnsayoResult<SignedSession> {
    let payload = SessionPayload::for_user(user.id.clone());
    SignedSession::for_payload(&payload, keyring, cookie_name)
}
