//! Integration tests for the host-facing boundary.
//!
//! Walks the four host scenarios end to end through the public API only.

use wg_keys::crypto::{clamp, derive_public, is_clamped};
use wg_keys::{generate_key_pair, generate_pre_key, Key, KeyPairResponse, ENCODED_KEY_LEN};

#[test]
fn pre_key_is_44_chars_and_32_bytes() {
    let psk = generate_pre_key().expect("entropy should be available");
    assert_eq!(psk.len(), ENCODED_KEY_LEN);
    assert!(psk.ends_with('='));

    let key = Key::from_base64(&psk).expect("preshared key must decode");
    assert_eq!(key.as_bytes().len(), 32);
}

#[test]
fn fresh_pair_public_matches_private() {
    let response = generate_key_pair(None).expect("entropy should be available");
    let (private, public) = response.into_result().expect("fresh pair cannot fail");

    assert_eq!(private.len(), ENCODED_KEY_LEN);
    assert_eq!(public.len(), ENCODED_KEY_LEN);

    let private_key = Key::from_base64(&private).unwrap();
    let public_key = Key::from_base64(&public).unwrap();
    assert!(is_clamped(private_key.as_bytes()));
    assert_eq!(derive_public(&private_key), public_key);
}

#[test]
fn invalid_text_yields_error_value_only() {
    let response = generate_key_pair(Some("not-base64!!")).expect("decode errors are values");
    assert!(response.is_error());
    assert!(response.private_key().is_none());
    assert!(response.public_key().is_none());

    let json = serde_json::to_value(&response).unwrap();
    let obj = json.as_object().unwrap();
    assert_eq!(obj.len(), 1);
    assert!(obj.contains_key("error"));
}

#[test]
fn supplied_clamped_scalar_is_echoed() {
    let mut bytes = [0x5au8; 32];
    clamp(&mut bytes);
    let private = Key::from(bytes);
    let text = private.to_base64();

    let response = generate_key_pair(Some(&text)).unwrap();
    let expected_public = derive_public(&private).to_base64();
    assert_eq!(
        response,
        KeyPairResponse::Pair {
            private: text.clone(),
            public: expected_public,
        }
    );
}

#[test]
fn supplied_key_with_trailing_newline_is_not_normalized() {
    let pair = generate_key_pair(None).unwrap();
    let (private, public) = pair.into_result().unwrap();
    let pasted = format!("{private}\r\n");

    let response = generate_key_pair(Some(&pasted)).unwrap();
    assert_eq!(response.private_key(), Some(pasted.as_str()));
    assert_eq!(response.public_key(), Some(public.as_str()));
}

#[test]
fn supplied_key_with_stray_trailing_bits_is_echoed() {
    let text = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAB=";
    let zero_public = derive_public(&Key::from([0u8; 32])).to_base64();

    let response = generate_key_pair(Some(text)).unwrap();
    assert_eq!(response.private_key(), Some(text));
    assert_eq!(response.public_key(), Some(zero_public.as_str()));
}

#[test]
fn hex_private_key_is_rejected() {
    let hex_text = "5dab087e624a8a4b79e17f8b83800ee66f3bb1292618b6fd1c2f8b27ff88e0eb";
    let response = generate_key_pair(Some(hex_text)).unwrap();
    assert_eq!(response.error(), Some("incorrect key size: 48"));
}

#[test]
fn successive_pairs_differ() {
    let a = generate_key_pair(None).unwrap();
    let b = generate_key_pair(None).unwrap();
    assert_ne!(a.private_key(), b.private_key());
    assert_ne!(a.public_key(), b.public_key());
}
