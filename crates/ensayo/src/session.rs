//! Session cookie codec and signer.
//!
//! The application under test keeps its session in a pair of cookies: the
//! `session` cookie is base64-encoded JSON, and `session.sig` is an HMAC-SHA1
//! signature of `<name>=<value>` in the url-safe base64 alphabet without
//! padding. Reproducing that pair lets a test assume an authenticated
//! identity without ever touching the login UI.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha1::Sha1;

use crate::result::{EnsayoError, EnsayoResult};

type HmacSha1 = Hmac<Sha1>;

/// The deserialized body of a session cookie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPayload {
    /// Passport-style authentication state
    pub passport: Passport,
}

/// Authentication state nested in the session payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passport {
    /// Id of the authenticated user record
    pub user: String,
}

impl SessionPayload {
    /// Build a payload asserting the given user id is logged in
    #[must_use]
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            passport: Passport {
                user: user_id.into(),
            },
        }
    }

    /// Encode to the cookie wire format: base64 over compact JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the payload fails to serialize.
    pub fn encode(&self) -> EnsayoResult<String> {
        let json = serde_json::to_string(self)?;
        Ok(STANDARD.encode(json))
    }

    /// Decode a cookie value back into a payload
    ///
    /// # Errors
    ///
    /// Returns a session error if the value is not base64-wrapped JSON.
    pub fn decode(value: &str) -> EnsayoResult<Self> {
        let bytes = STANDARD
            .decode(value)
            .map_err(|e| EnsayoError::Session {
                message: format!("cookie value is not base64: {e}"),
            })?;
        serde_json::from_slice(&bytes).map_err(|e| EnsayoError::Session {
            message: format!("cookie payload is not session JSON: {e}"),
        })
    }
}

/// Ordered signing keys for session cookies.
///
/// The newest key signs; verification accepts any key so sessions minted
/// before a rotation still validate.
#[derive(Debug, Clone)]
pub struct Keyring {
    keys: Vec<String>,
}

impl Keyring {
    /// Create a keyring from signing keys, newest first
    ///
    /// # Errors
    ///
    /// Returns a session error if no keys are given.
    pub fn new(keys: impl Into<Vec<String>>) -> EnsayoResult<Self> {
        let keys = keys.into();
        if keys.is_empty() {
            return Err(EnsayoError::Session {
                message: "no cookie signing keys configured".to_string(),
            });
        }
        Ok(Self { keys })
    }

    /// Sign data with the newest key
    #[must_use]
    pub fn sign(&self, data: &str) -> String {
        Self::sign_with(&self.keys[0], data)
    }

    /// Find the index of the key that produced a signature, if any
    #[must_use]
    pub fn verify(&self, data: &str, sig: &str) -> Option<usize> {
        self.keys
            .iter()
            .position(|key| Self::sign_with(key, data) == sig)
    }

    fn sign_with(key: &str, data: &str) -> String {
        let mut mac = HmacSha1::new_from_slice(key.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(data.as_bytes());
        URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
    }
}

/// A signed session cookie pair ready for injection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedSession {
    /// Name of the payload cookie
    pub name: String,
    /// Base64 payload cookie value
    pub value: String,
    /// Name of the signature cookie (`<name>.sig`)
    pub sig_name: String,
    /// Signature cookie value
    pub sig: String,
}

impl SignedSession {
    /// Sign a payload under the given cookie name.
    ///
    /// The signed data is `<cookie_name>=<value>`, exactly the string the
    /// app's cookie middleware verifies.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload fails to encode.
    pub fn for_payload(
        payload: &SessionPayload,
        keyring: &Keyring,
        cookie_name: &str,
    ) -> EnsayoResult<Self> {
        let value = payload.encode()?;
        let sig = keyring.sign(&format!("{cookie_name}={value}"));
        Ok(Self {
            name: cookie_name.to_string(),
            value,
            sig_name: format!("{cookie_name}.sig"),
            sig,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyring() -> Keyring {
        Keyring::new(vec!["orange-crush".to_string()]).unwrap()
    }

    mod payload_tests {
        use super::*;

        #[test]
        fn test_payload_json_shape() {
            let payload = SessionPayload::for_user("5d1f2a3b4c5d6e7f80912345");
            let json = serde_json::to_string(&payload).unwrap();
            assert_eq!(
                json,
                "{\"passport\":{\"user\":\"5d1f2a3b4c5d6e7f80912345\"}}"
            );
        }

        #[test]
        fn test_encode_decode() {
            let payload = SessionPayload::for_user("abc123");
            let value = payload.encode().unwrap();
            assert_eq!(SessionPayload::decode(&value).unwrap(), payload);
        }

        #[test]
        fn test_decode_rejects_garbage() {
            let err = SessionPayload::decode("!!not-base64!!").unwrap_err();
            assert!(matches!(err, EnsayoError::Session { .. }));
        }

        #[test]
        fn test_decode_rejects_wrong_json() {
            let value = STANDARD.encode("{\"other\":true}");
            let err = SessionPayload::decode(&value).unwrap_err();
            assert!(matches!(err, EnsayoError::Session { .. }));
        }
    }

    mod keyring_tests {
        use super::*;

        #[test]
        fn test_empty_keyring_rejected() {
            let err = Keyring::new(Vec::<String>::new()).unwrap_err();
            assert!(matches!(err, EnsayoError::Session { .. }));
        }

        #[test]
        fn test_signature_alphabet() {
            let sig = keyring().sign("session=payload");
            assert!(!sig.contains('+'));
            assert!(!sig.contains('/'));
            assert!(!sig.contains('='));
            assert!(!sig.is_empty());
        }

        #[test]
        fn test_sign_verify_roundtrip() {
            let ring = keyring();
            let sig = ring.sign("session=payload");
            assert_eq!(ring.verify("session=payload", &sig), Some(0));
        }

        #[test]
        fn test_tampered_data_fails() {
            let ring = keyring();
            let sig = ring.sign("session=payload");
            assert_eq!(ring.verify("session=payloaX", &sig), None);
        }

        #[test]
        fn test_wrong_key_fails() {
            let sig = keyring().sign("session=payload");
            let other = Keyring::new(vec!["grape-soda".to_string()]).unwrap();
            assert_eq!(other.verify("session=payload", &sig), None);
        }

        #[test]
        fn test_rotated_key_still_verifies() {
            let old = keyring();
            let sig = old.sign("session=payload");
            let rotated = Keyring::new(vec![
                "brand-new-key".to_string(),
                "orange-crush".to_string(),
            ])
            .unwrap();
            assert_eq!(rotated.verify("session=payload", &sig), Some(1));
        }

        #[test]
        fn test_signing_is_deterministic() {
            let ring = keyring();
            assert_eq!(ring.sign("session=abc"), ring.sign("session=abc"));
            assert_ne!(ring.sign("session=abc"), ring.sign("session=abd"));
        }
    }

    mod signed_session_tests {
        use super::*;

        #[test]
        fn test_cookie_pair_names() {
            let payload = SessionPayload::for_user("u1");
            let signed = SignedSession::for_payload(&payload, &keyring(), "session").unwrap();
            assert_eq!(signed.name, "session");
            assert_eq!(signed.sig_name, "session.sig");
        }

        #[test]
        fn test_signature_covers_name_and_value() {
            let payload = SessionPayload::for_user("u1");
            let ring = keyring();
            let signed = SignedSession::for_payload(&payload, &ring, "session").unwrap();
            let data = format!("session={}", signed.value);
            assert_eq!(ring.verify(&data, &signed.sig), Some(0));
        }

        #[test]
        fn test_value_decodes_to_payload() {
            let payload = SessionPayload::for_user("5d1f2a3b4c5d6e7f80912345");
            let signed = SignedSession::for_payload(&payload, &keyring(), "session").unwrap();
            let decoded = SessionPayload::decode(&signed.value).unwrap();
            assert_eq!(decoded.passport.user, "5d1f2a3b4c5d6e7f80912345");
        }
    }
}
