//! Access token verification for the login form.
//!
//! Both the configured token and the submitted one are run through
//! HMAC-SHA256 keyed by the session secret, and the MACs are compared with
//! `Mac::verify_slice`, which is constant time. Inputs of different lengths
//! therefore never short-circuit the comparison.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verifies submitted access tokens against the configured one.
#[derive(Clone)]
pub struct AccessTokenVerifier {
    key: SecretString,
    expected: Vec<u8>,
}

impl std::fmt::Debug for AccessTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessTokenVerifier")
            .field("fingerprint", &self.fingerprint())
            .finish_non_exhaustive()
    }
}

impl AccessTokenVerifier {
    /// Create a verifier for `access_token`, keyed by `key`.
    #[must_use]
    pub fn new(key: &SecretString, access_token: &SecretString) -> Self {
        let expected = mac(key, access_token.expose_secret()).finalize().into_bytes();
        Self {
            key: key.clone(),
            expected: expected.to_vec(),
        }
    }

    /// Whether `submitted` matches the configured access token.
    #[must_use]
    pub fn verify(&self, submitted: &str) -> bool {
        mac(&self.key, submitted).verify_slice(&self.expected).is_ok()
    }

    /// Short hex prefix of the token's MAC, safe to log.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        hex::encode(self.expected.get(..4).unwrap_or_default())
    }
}

fn mac(key: &SecretString, message: &str) -> HmacSha256 {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key.expose_secret().as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    mac
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn verifier() -> AccessTokenVerifier {
        AccessTokenVerifier::new(
            &SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%"),
            &SecretString::from("Zq8#vN2!pL6@wR4$"),
        )
    }

    #[test]
    fn test_accepts_configured_token() {
        assert!(verifier().verify("Zq8#vN2!pL6@wR4$"));
    }

    #[test]
    fn test_rejects_other_tokens() {
        let v = verifier();
        assert!(!v.verify(""));
        assert!(!v.verify("Zq8#vN2!pL6@wR4"));
        assert!(!v.verify("Zq8#vN2!pL6@wR4$ "));
        assert!(!v.verify("zq8#vn2!pl6@wr4$"));
    }

    #[test]
    fn test_fingerprint_is_short_hex() {
        let fp = verifier().fingerprint();
        assert_eq!(fp.len(), 8);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_debug_hides_token() {
        let debug = format!("{:?}", verifier());
        assert!(!debug.contains("Zq8#vN2!pL6@wR4$"));
        assert!(!debug.contains("aB3$xY9"));
    }
}
