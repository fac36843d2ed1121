//! Edge cases for key text handling: odd lengths, odd alphabets, and
//! inputs that look almost right.

use wg_keys::{generate_key_pair, Key, KeyError};

#[test]
fn every_decoded_length_other_than_32_is_rejected() {
    use base64::Engine;
    let engine = base64::engine::general_purpose::STANDARD;

    for len in (0..=64usize).filter(|&n| n != 32) {
        let text = engine.encode(vec![0xabu8; len]);
        assert_eq!(
            Key::from_base64(&text),
            Err(KeyError::InvalidLength(len)),
            "length {len} must be rejected"
        );
    }
}

#[test]
fn url_safe_alphabet_is_rejected() {
    // 0xfb 0xff encodes to "+/" in the standard alphabet and "-_" url-safe.
    let standard = Key::from([0xfbu8; 32]).to_base64();
    assert!(standard.contains('+') || standard.contains('/'));
    let url_safe = standard.replace('+', "-").replace('/', "_");
    assert!(matches!(
        Key::from_base64(&url_safe),
        Err(KeyError::InvalidEncoding(_))
    ));
}

#[test]
fn surrounding_spaces_are_rejected() {
    let text = Key::from([7u8; 32]).to_base64();
    for padded in [format!(" {text}"), format!("{text} "), format!("\t{text}")] {
        let response = generate_key_pair(Some(&padded)).unwrap();
        assert!(response.is_error(), "{padded:?} should not parse");
    }
}

#[test]
fn extra_padding_is_rejected() {
    let text = format!("{}=", Key::from([1u8; 32]).to_base64());
    assert!(Key::from_base64(&text).is_err());
}

#[test]
fn all_zero_key_is_accepted_as_text() {
    let zero = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=";
    let response = generate_key_pair(Some(zero)).unwrap();
    assert_eq!(response.private_key(), Some(zero));
    assert!(response.public_key().is_some());
}

#[test]
fn error_messages_do_not_echo_key_text() {
    let secret_looking = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA==";
    let response = generate_key_pair(Some(secret_looking)).unwrap();
    let message = response.error().unwrap();
    assert!(!message.contains(secret_looking));
    assert_eq!(message, "incorrect key size: 31");
}
