use super::*;

fn pack(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

#[test]
fn empty_name_encodes_to_sentinel() {
    let t = encode("");
    assert_eq!(t.as_str(), "AQA");
    assert_eq!(decode(t.as_str()).unwrap(), "");
}

#[test]
fn roundtrip_ascii_and_unicode() {
    for name in ["Alice", "a", "YOUR NAME", "Zoë Ångström", "李小龙", "🦀 crab"] {
        let t = encode(name);
        assert_eq!(decode(t.as_str()).unwrap(), name, "token {t}");
    }
}

#[test]
fn token_hides_plain_name_and_is_url_safe() {
    let t = encode("Alice");
    assert!(!t.as_str().contains("Alice"));
    assert!(!t.as_str().contains("QWxpY2U"));
    assert!(t.as_str().chars().all(is_token_char));
}

#[test]
fn same_name_same_token() {
    assert_eq!(encode("Alice"), encode("Alice"));
    assert_ne!(encode("Alice"), encode("alice"));
}

#[test]
fn repeated_characters_do_not_repeat_in_payload() {
    let t = encode("aaaaaaaa");
    let packed = URL_SAFE_NO_PAD.decode(t.as_str()).unwrap();
    let payload = &packed[2..];
    assert_eq!(payload.len(), 8);
    assert!(payload.windows(2).any(|w| w[0] != w[1]));
}

#[test]
fn long_names_use_multi_byte_length_prefix() {
    let name = "x".repeat(300);
    let t = encode(&name);
    let packed = URL_SAFE_NO_PAD.decode(t.as_str()).unwrap();
    assert_eq!(packed[0], VERSION);
    assert_eq!(&packed[1..3], &[0xac, 0x02]);
    assert_eq!(decode(t.as_str()).unwrap(), name);
}

#[test]
fn empty_token_is_rejected() {
    assert_eq!(decode(""), Err(DecodeError::Empty));
}

#[test]
fn foreign_alphabet_is_rejected_with_position() {
    assert_eq!(
        decode("AQA="),
        Err(DecodeError::InvalidCharacter { index: 3, ch: '=' })
    );
    assert_eq!(
        decode("AQ+A"),
        Err(DecodeError::InvalidCharacter { index: 2, ch: '+' })
    );
    assert!(matches!(
        decode("Alice Smith"),
        Err(DecodeError::InvalidCharacter { index: 5, ch: ' ' })
    ));
}

#[test]
fn impossible_base64_length_is_malformed() {
    assert!(matches!(decode("A"), Err(DecodeError::Malformed(_))));
    assert!(matches!(decode("AQAAA"), Err(DecodeError::Malformed(_))));
}

#[test]
fn wrong_version_is_rejected() {
    assert_eq!(
        decode(&pack(&[0x00, 0x00])),
        Err(DecodeError::UnsupportedVersion(0))
    );
    assert_eq!(
        decode(&pack(&[0x02, 0x00])),
        Err(DecodeError::UnsupportedVersion(2))
    );
}

#[test]
fn missing_length_prefix_is_truncated() {
    assert_eq!(decode(&pack(&[VERSION])), Err(DecodeError::Truncated));
    assert_eq!(
        decode(&pack(&[VERSION, 0x80, 0x80])),
        Err(DecodeError::Truncated)
    );
}

#[test]
fn overlong_length_prefix_is_rejected() {
    assert!(matches!(
        decode(&pack(&[VERSION, 0x80, 0x00])),
        Err(DecodeError::Malformed(_))
    ));
}

#[test]
fn cut_payload_is_a_length_mismatch() {
    let t = encode("Alice");
    let mut packed = URL_SAFE_NO_PAD.decode(t.as_str()).unwrap();
    packed.pop();
    assert_eq!(
        decode(&pack(&packed)),
        Err(DecodeError::LengthMismatch {
            declared: 5,
            actual: 4
        })
    );

    packed.extend_from_slice(&[1, 2]);
    assert_eq!(
        decode(&pack(&packed)),
        Err(DecodeError::LengthMismatch {
            declared: 5,
            actual: 6
        })
    );
}

#[test]
fn non_utf8_payload_is_rejected() {
    let packed = [VERSION, 1, obfuscate(0, 0xff)];
    assert_eq!(decode(&pack(&packed)), Err(DecodeError::InvalidUtf8));
}

#[test]
fn obfuscation_inverts_at_every_position() {
    for i in 0..600usize {
        for b in [0u8, 1, 0x41, 0x7f, 0x80, 0xfe, 0xff] {
            assert_eq!(reveal(i, obfuscate(i, b)), b);
        }
    }
}
