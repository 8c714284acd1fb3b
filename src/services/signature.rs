//! Webhook signature verification. Kapso signs each delivery with
//! HMAC-SHA256 over the raw request body; the hex digest arrives in the
//! X-Webhook-Signature header.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verifies a hex-encoded HMAC-SHA256 signature over the raw body.
/// Comparison is constant-time via the Mac verify path.
pub fn verify_webhook_signature(secret: &str, body: &[u8], signature_hex: &str) -> bool {
    let Ok(expected) = hex::decode(signature_hex.trim()) else {
        return false;
    };

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

/// Hex signature for an outbound or test payload.
pub fn sign_payload(secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_signature_verifies() {
        let body = br#"{"event_id":"evt_1","event_type":"quote.accepted"}"#;
        let signature = sign_payload("topsecret", body);
        assert!(verify_webhook_signature("topsecret", body, &signature));
    }

    #[test]
    fn test_wrong_secret_fails() {
        let body = b"payload";
        let signature = sign_payload("topsecret", body);
        assert!(!verify_webhook_signature("other", body, &signature));
    }

    #[test]
    fn test_tampered_body_fails() {
        let signature = sign_payload("topsecret", b"payload");
        assert!(!verify_webhook_signature("topsecret", b"payload2", &signature));
    }

    #[test]
    fn test_malformed_signature_fails() {
        assert!(!verify_webhook_signature("topsecret", b"payload", "not-hex"));
        assert!(!verify_webhook_signature("topsecret", b"payload", ""));
    }

    #[test]
    fn test_signature_tolerates_surrounding_whitespace() {
        let body = b"payload";
        let signature = format!(" {} ", sign_payload("topsecret", body));
        assert!(verify_webhook_signature("topsecret", body, &signature));
    }
}
