use base64::{Engine as _, engine::general_purpose};
use chrono::Utc;

use crate::crypto::aes::{self, KEY_SIZE, NONCE_SIZE};
use crate::error::{AppError, Result};
use crate::models::session::Session;

/// Seals a session into an opaque cookie value.
///
/// The session is serialized to JSON, encrypted with AES-256-GCM under the
/// process master key, and encoded as URL-safe base64 of
/// `ciphertext || nonce` (nonce is the trailing 12 bytes).
///
/// # Arguments
///
/// * `session` - The session to seal.
/// * `key` - The 32-byte master key.
///
/// # Returns
///
/// A `Result` containing the cookie value.
pub fn seal(session: &Session, key: &[u8]) -> Result<String> {
    let key: &[u8; KEY_SIZE] = key
        .try_into()
        .map_err(|_| AppError::Encryption("Master key must be 32 bytes".to_string()))?;

    let plaintext = sonic_rs::to_vec(session)
        .map_err(|e| AppError::Encryption(format!("Session serialization failed: {}", e)))?;

    let (ciphertext, nonce) = aes::encrypt(key, &plaintext)?;

    let mut sealed = Vec::with_capacity(ciphertext.len() + nonce.len());
    sealed.extend_from_slice(&ciphertext);
    sealed.extend_from_slice(&nonce);

    Ok(general_purpose::URL_SAFE_NO_PAD.encode(sealed))
}

/// Opens a sealed cookie value back into a session.
///
/// This runs on every protected request with attacker-controlled input, so
/// every failure mode collapses to `None`: malformed base64, truncated data,
/// GCM tag mismatch, bad JSON, empty subject or token, expiry. It must never
/// panic or surface an error.
///
/// # Arguments
///
/// * `value` - The cookie value.
/// * `key` - The 32-byte master key.
///
/// # Returns
///
/// `Some(Session)` when the value decodes to a fully valid, unexpired session.
pub fn open(value: &str, key: &[u8]) -> Option<Session> {
    let key: &[u8; KEY_SIZE] = key.try_into().ok()?;

    let sealed = general_purpose::URL_SAFE_NO_PAD.decode(value).ok()?;
    if sealed.len() <= NONCE_SIZE {
        return None;
    }

    let (ciphertext, nonce) = sealed.split_at(sealed.len() - NONCE_SIZE);
    let nonce: [u8; NONCE_SIZE] = nonce.try_into().ok()?;

    let plaintext = aes::decrypt(key, ciphertext, &nonce).ok()?;
    let session: Session = sonic_rs::from_slice(&plaintext).ok()?;

    // Partially-populated sessions count as absent.
    if session.subject_id.is_empty() || session.token.is_empty() {
        return None;
    }

    if Utc::now() > session.expires_at {
        return None;
    }

    Some(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::Role;
    use chrono::Duration;

    const KEY: [u8; KEY_SIZE] = [7u8; KEY_SIZE];

    fn sample_session() -> Session {
        Session {
            subject_id: "42".to_string(),
            role: Role::Admin,
            token: "backend-token".to_string(),
            issued_at: Utc::now(),
            expires_at: Utc::now() + Duration::days(7),
        }
    }

    #[test]
    fn seal_open_round_trip() {
        let session = sample_session();
        let cookie = seal(&session, &KEY).unwrap();

        let opened = open(&cookie, &KEY).expect("sealed session must open");
        assert_eq!(opened.subject_id, session.subject_id);
        assert_eq!(opened.role, session.role);
        assert_eq!(opened.token, session.token);
    }

    #[test]
    fn open_rejects_garbage() {
        assert!(open("", &KEY).is_none());
        assert!(open("not-a-session", &KEY).is_none());
        assert!(open("!!!not base64!!!", &KEY).is_none());
        assert!(open(&"A".repeat(500), &KEY).is_none());
    }

    #[test]
    fn open_rejects_tampered_value() {
        let cookie = seal(&sample_session(), &KEY).unwrap();

        let mut bytes = cookie.into_bytes();
        let mid = bytes.len() / 2;
        bytes[mid] = if bytes[mid] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert!(open(&tampered, &KEY).is_none());
    }

    #[test]
    fn open_rejects_truncated_value() {
        let cookie = seal(&sample_session(), &KEY).unwrap();
        assert!(open(&cookie[..cookie.len() / 2], &KEY).is_none());
        assert!(open(&cookie[..8], &KEY).is_none());
    }

    #[test]
    fn open_rejects_wrong_key() {
        let cookie = seal(&sample_session(), &KEY).unwrap();
        let other_key = [9u8; KEY_SIZE];
        assert!(open(&cookie, &other_key).is_none());
    }

    #[test]
    fn open_rejects_expired_session() {
        let mut session = sample_session();
        session.issued_at = Utc::now() - Duration::days(10);
        session.expires_at = Utc::now() - Duration::days(3);

        let cookie = seal(&session, &KEY).unwrap();
        assert!(open(&cookie, &KEY).is_none());
    }

    #[test]
    fn open_rejects_empty_subject_or_token() {
        let mut session = sample_session();
        session.token = String::new();
        let cookie = seal(&session, &KEY).unwrap();
        assert!(open(&cookie, &KEY).is_none());

        let mut session = sample_session();
        session.subject_id = String::new();
        let cookie = seal(&session, &KEY).unwrap();
        assert!(open(&cookie, &KEY).is_none());
    }

    #[test]
    fn open_rejects_bad_key_length() {
        let cookie = seal(&sample_session(), &KEY).unwrap();
        assert!(open(&cookie, &[1u8; 16]).is_none());
    }
}
