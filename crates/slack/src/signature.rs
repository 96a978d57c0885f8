//! Request signing checks for inbound Slack webhooks.
//!
//! Slack signs every request with `v0=HMAC-SHA256(secret, "v0:{ts}:{body}")`
//! and sends the result in `x-slack-signature` next to the
//! `x-slack-request-timestamp` it used. See
//! <https://api.slack.com/authentication/verifying-requests-from-slack>.

use chrono::Utc;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";
pub const SIGNATURE_HEADER: &str = "x-slack-signature";
pub const SIGNATURE_VERSION: &str = "v0";

/// Maximum distance, in either direction, between the request timestamp and
/// the local clock.
pub const REPLAY_WINDOW_SECS: u64 = 300;

/// Header values as they arrived. `None` covers both an absent header and one
/// that is not valid visible ASCII.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SignatureHeaders<'a> {
    pub timestamp: Option<&'a str>,
    pub signature: Option<&'a str>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("missing `{0}` header")]
    MissingHeader(&'static str),
    #[error("request timestamp `{0}` is not a unix timestamp")]
    InvalidTimestamp(String),
    #[error("request timestamp {timestamp} is outside the replay window (now {now})")]
    Expired { timestamp: i64, now: i64 },
    #[error("signing secret rejected by hmac")]
    Key,
    #[error("signature mismatch")]
    Mismatch,
}

#[derive(Clone)]
pub struct SignatureVerifier {
    signing_secret: SecretString,
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier").field("signing_secret", &"[REDACTED]").finish()
    }
}

impl SignatureVerifier {
    pub fn new(signing_secret: SecretString) -> Self {
        Self { signing_secret }
    }

    pub fn verify(&self, raw_body: &[u8], headers: SignatureHeaders<'_>) -> bool {
        self.verify_at(raw_body, headers, Utc::now().timestamp())
    }

    pub fn verify_at(&self, raw_body: &[u8], headers: SignatureHeaders<'_>, now: i64) -> bool {
        self.check_at(raw_body, headers, now).is_ok()
    }

    /// Same decision as [`SignatureVerifier::verify`], with the rejection reason.
    pub fn check(&self, raw_body: &[u8], headers: SignatureHeaders<'_>) -> Result<(), SignatureError> {
        self.check_at(raw_body, headers, Utc::now().timestamp())
    }

    pub fn check_at(
        &self,
        raw_body: &[u8],
        headers: SignatureHeaders<'_>,
        now: i64,
    ) -> Result<(), SignatureError> {
        let timestamp =
            headers.timestamp.ok_or(SignatureError::MissingHeader(TIMESTAMP_HEADER))?;
        let supplied = headers.signature.ok_or(SignatureError::MissingHeader(SIGNATURE_HEADER))?;

        let issued_at = timestamp
            .parse::<i64>()
            .map_err(|_| SignatureError::InvalidTimestamp(timestamp.to_owned()))?;
        let within_window = now
            .checked_sub(issued_at)
            .map(|skew| skew.unsigned_abs() <= REPLAY_WINDOW_SECS)
            .unwrap_or(false);
        if !within_window {
            return Err(SignatureError::Expired { timestamp: issued_at, now });
        }

        let expected = self.sign(timestamp, raw_body)?;
        if constant_time_eq(expected.as_bytes(), supplied.as_bytes()) {
            Ok(())
        } else {
            Err(SignatureError::Mismatch)
        }
    }

    /// Produces the `x-slack-signature` value for `timestamp` and `raw_body`.
    pub fn sign(&self, timestamp: &str, raw_body: &[u8]) -> Result<String, SignatureError> {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.expose_secret().as_bytes())
            .map_err(|_| SignatureError::Key)?;
        mac.update(SIGNATURE_VERSION.as_bytes());
        mac.update(b":");
        mac.update(timestamp.as_bytes());
        mac.update(b":");
        mac.update(raw_body);

        Ok(format!("{SIGNATURE_VERSION}={}", hex::encode(mac.finalize().into_bytes())))
    }
}

/// Length-checked comparison whose running time does not depend on where the
/// inputs first differ.
fn constant_time_eq(expected: &[u8], supplied: &[u8]) -> bool {
    if expected.len() != supplied.len() {
        return false;
    }

    let mut diff: u8 = 0;
    for (left, right) in expected.iter().zip(supplied) {
        diff |= left ^ right;
    }

    diff == 0
}

#[cfg(test)]
mod tests {
    use hmac::{Hmac, Mac};
    use secrecy::SecretString;
    use sha2::Sha256;

    use super::{constant_time_eq, SignatureError, SignatureHeaders, SignatureVerifier};

    const SECRET: &str = "8f742231b10e8888abcd99yyyzzz85a5";
    const NOW: i64 = 1_700_000_000;
    const BODY: &[u8] = b"command=%2Fcreate-project&trigger_id=1337.42.abcd&user_id=U2CERLKJA";

    fn verifier(secret: &str) -> SignatureVerifier {
        SignatureVerifier::new(SecretString::from(secret.to_string()))
    }

    fn reference_signature(secret: &str, timestamp: &str, body: &[u8]) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("valid key length");
        mac.update(format!("v0:{timestamp}:").as_bytes());
        mac.update(body);
        format!("v0={}", hex::encode(mac.finalize().into_bytes()))
    }

    fn headers<'a>(timestamp: &'a str, signature: &'a str) -> SignatureHeaders<'a> {
        SignatureHeaders { timestamp: Some(timestamp), signature: Some(signature) }
    }

    #[test]
    fn sign_matches_reference_hmac() {
        let timestamp = NOW.to_string();
        let signed = verifier(SECRET).sign(&timestamp, BODY).expect("sign");

        assert_eq!(signed, reference_signature(SECRET, &timestamp, BODY));
        assert!(signed.starts_with("v0="));
        assert_eq!(signed.len(), 3 + 64);
    }

    #[test]
    fn accepts_freshly_signed_request() {
        let timestamp = NOW.to_string();
        let signature = reference_signature(SECRET, &timestamp, BODY);

        assert!(verifier(SECRET).verify_at(BODY, headers(&timestamp, &signature), NOW));
    }

    #[test]
    fn verify_uses_the_wall_clock() {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = reference_signature(SECRET, &timestamp, BODY);

        assert!(verifier(SECRET).verify(BODY, headers(&timestamp, &signature)));
    }

    #[test]
    fn rejects_missing_headers() {
        let verifier = verifier(SECRET);
        let timestamp = NOW.to_string();
        let signature = reference_signature(SECRET, &timestamp, BODY);

        let no_timestamp = SignatureHeaders { timestamp: None, signature: Some(&signature) };
        let no_signature = SignatureHeaders { timestamp: Some(&timestamp), signature: None };

        assert_eq!(
            verifier.check_at(BODY, no_timestamp, NOW),
            Err(SignatureError::MissingHeader("x-slack-request-timestamp"))
        );
        assert_eq!(
            verifier.check_at(BODY, no_signature, NOW),
            Err(SignatureError::MissingHeader("x-slack-signature"))
        );
        assert!(!verifier.verify_at(BODY, SignatureHeaders::default(), NOW));
    }

    #[test]
    fn rejects_stale_and_future_timestamps_symmetrically() {
        let verifier = verifier(SECRET);

        for skew in [-301_i64, 301, -86_400, 86_400] {
            let timestamp = (NOW + skew).to_string();
            let signature = reference_signature(SECRET, &timestamp, BODY);
            assert!(
                matches!(
                    verifier.check_at(BODY, headers(&timestamp, &signature), NOW),
                    Err(SignatureError::Expired { .. })
                ),
                "skew {skew} should be rejected"
            );
        }
    }

    #[test]
    fn accepts_timestamps_on_the_window_edge() {
        let verifier = verifier(SECRET);

        for skew in [-300_i64, 300] {
            let timestamp = (NOW + skew).to_string();
            let signature = reference_signature(SECRET, &timestamp, BODY);
            assert!(
                verifier.verify_at(BODY, headers(&timestamp, &signature), NOW),
                "skew {skew} should be accepted"
            );
        }
    }

    #[test]
    fn rejects_non_numeric_timestamp() {
        let signature = reference_signature(SECRET, "soon", BODY);

        assert_eq!(
            verifier(SECRET).check_at(BODY, headers("soon", &signature), NOW),
            Err(SignatureError::InvalidTimestamp("soon".to_owned()))
        );
    }

    #[test]
    fn extreme_timestamps_do_not_overflow() {
        let timestamp = i64::MIN.to_string();
        let signature = reference_signature(SECRET, &timestamp, BODY);

        assert!(!verifier(SECRET).verify_at(BODY, headers(&timestamp, &signature), i64::MAX));
    }

    #[test]
    fn flipping_any_body_byte_invalidates_the_signature() {
        let verifier = verifier(SECRET);
        let timestamp = NOW.to_string();
        let signature = reference_signature(SECRET, &timestamp, BODY);

        for index in 0..BODY.len() {
            let mut tampered = BODY.to_vec();
            tampered[index] ^= 0x01;
            assert!(
                !verifier.verify_at(&tampered, headers(&timestamp, &signature), NOW),
                "tampered byte {index} should be rejected"
            );
        }
    }

    #[test]
    fn changed_timestamp_or_secret_invalidates_the_signature() {
        let timestamp = NOW.to_string();
        let signature = reference_signature(SECRET, &timestamp, BODY);
        let shifted = (NOW + 1).to_string();

        assert_eq!(
            verifier(SECRET).check_at(BODY, headers(&shifted, &signature), NOW),
            Err(SignatureError::Mismatch)
        );
        assert_eq!(
            verifier("another-secret").check_at(BODY, headers(&timestamp, &signature), NOW),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn rejects_signature_of_different_length() {
        let timestamp = NOW.to_string();
        let signature = reference_signature(SECRET, &timestamp, BODY);
        let truncated = &signature[..signature.len() - 1];
        let extended = format!("{signature}0");

        assert!(!verifier(SECRET).verify_at(BODY, headers(&timestamp, truncated), NOW));
        assert!(!verifier(SECRET).verify_at(BODY, headers(&timestamp, &extended), NOW));
    }

    #[test]
    fn uppercase_hex_is_not_accepted() {
        let timestamp = NOW.to_string();
        let signature = reference_signature(SECRET, &timestamp, BODY).to_ascii_uppercase();

        assert!(!verifier(SECRET).verify_at(BODY, headers(&timestamp, &signature), NOW));
    }

    #[test]
    fn constant_time_eq_checks_length_then_content() {
        assert!(constant_time_eq(b"v0=abc", b"v0=abc"));
        assert!(constant_time_eq(b"", b""));
        assert!(!constant_time_eq(b"v0=abc", b"v0=abd"));
        assert!(!constant_time_eq(b"v0=abc", b"v0=ab"));
        assert!(!constant_time_eq(b"v0=ab", b"v0=abc"));
    }

    #[test]
    fn debug_output_redacts_the_secret() {
        let debug = format!("{:?}", verifier(SECRET));

        assert!(!debug.contains(SECRET));
        assert!(debug.contains("REDACTED"));
    }
}
