//! Tests for the cipher engine.

use rstest::rstest;
use serde_json::json;

use super::*;

fn engine() -> CipherEngine {
    CipherEngine::new([42u8; 32])
}

#[rstest]
#[case("")]
#[case("short")]
#[case("a longer clinical note body with unicode: śudha✓")]
fn encrypt_then_decrypt_round_trips(#[case] plaintext: &str) {
    let engine = engine();
    let sealed = engine.encrypt(plaintext).expect("encrypt succeeds");
    assert_ne!(sealed, plaintext);
    assert_eq!(engine.decrypt(&sealed).expect("decrypt succeeds"), plaintext);
}

#[rstest]
fn object_round_trip_preserves_structure() {
    let engine = engine();
    let value = json!({
        "clientName": "John Doe",
        "sections": [{"heading": "Presenting concerns", "body": "..."}],
        "riskFlags": {"selfHarm": false},
    });
    let sealed = engine.encrypt_object(&value).expect("encrypt succeeds");
    let recovered: serde_json::Value =
        engine.decrypt_to_object(&sealed).expect("decrypt succeeds");
    assert_eq!(recovered, value);
}

#[rstest]
fn nonces_differ_between_calls() {
    let engine = engine();
    let first = engine.encrypt("same input").expect("encrypt succeeds");
    let second = engine.encrypt("same input").expect("encrypt succeeds");
    assert_ne!(first, second, "random nonce must vary the envelope");
}

#[rstest]
fn truncated_envelope_fails_to_decrypt() {
    let engine = engine();
    let sealed = engine.encrypt("to be truncated").expect("encrypt succeeds");
    let truncated: String = sealed.chars().take(sealed.len() / 2).collect();
    assert_eq!(engine.decrypt(&truncated), Err(CryptoError::Decrypt));
}

#[rstest]
fn wrong_key_fails_authentication() {
    let sealed = engine().encrypt("keyed to engine a").expect("encrypt succeeds");
    let other = CipherEngine::new([43u8; 32]);
    assert_eq!(other.decrypt(&sealed), Err(CryptoError::Decrypt));
}

#[rstest]
fn non_base64_input_fails_to_decrypt() {
    assert_eq!(engine().decrypt("not base64 at all!"), Err(CryptoError::Decrypt));
}

#[rstest]
fn hash_is_deterministic_and_input_sensitive() {
    let engine = engine();
    assert_eq!(engine.hash("Dr. John Smith"), engine.hash("Dr. John Smith"));
    assert_ne!(engine.hash("Dr. John Smith"), engine.hash("Dr. Jane Smith"));
    assert_eq!(engine.hash("Dr. John Smith").len(), 64);
}

#[rstest]
fn generate_token_yields_hex_of_requested_width() {
    let token = engine().generate_token(8);
    assert_eq!(token.len(), 16);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[rstest]
fn from_base64_rejects_short_keys() {
    let err = CipherEngine::from_base64("c2hvcnQ=").expect_err("short key rejected");
    assert!(matches!(err, CryptoError::InvalidKey { .. }));
}

#[rstest]
fn from_base64_accepts_a_full_width_key() {
    use base64::Engine as _;
    let encoded = base64::engine::general_purpose::STANDARD.encode([9u8; 32]);
    let engine = CipherEngine::from_base64(&encoded).expect("valid key accepted");
    let sealed = engine.encrypt("ok").expect("encrypt succeeds");
    assert_eq!(engine.decrypt(&sealed).expect("decrypt succeeds"), "ok");
}
