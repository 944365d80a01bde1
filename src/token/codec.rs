//! Reversible, URL-safe display-name tokens.
//!
//! Packed layout (before base64):
//!
//! ```text
//! [version: u8 = 1] [len: LEB128 varint] [len obfuscated UTF-8 bytes]
//! ```
//!
//! The packed bytes are written with the URL-safe base64 alphabet and no padding, so a token
//! only ever contains `[A-Za-z0-9_-]` and can be dropped into a query string as-is.
//!
//! This keeps names out of plain sight in a URL. It is not encryption and carries no
//! integrity tag.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

const VERSION: u8 = 1;

const KEY: [u8; 16] = [
    0x5a, 0xc3, 0x17, 0x8e, 0x2b, 0xf4, 0x61, 0x9d, 0x36, 0xe8, 0x0f, 0xb2, 0x74, 0x49, 0xd5, 0xa0,
];

/// Multiplier for the position-dependent byte offset.
const STRIDE: u8 = 31;

/// Longest varint accepted for the length prefix (covers `u32`).
const MAX_VARINT_BYTES: usize = 5;

/// Encoded form of a display name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(String);

impl Token {
    /// Borrow the token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the token, returning its text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Why a token could not be turned back into a display name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The token was an empty string; the empty name encodes to a non-empty sentinel.
    #[error("token is empty")]
    Empty,

    /// A character outside the URL-safe base64 alphabet.
    #[error("invalid token character {ch:?} at index {index}")]
    InvalidCharacter {
        /// Byte index of the offending character.
        index: usize,
        /// The offending character.
        ch: char,
    },

    /// Alphabet was fine but the base64 structure was not (bad length or trailing bits).
    #[error("malformed token: {0}")]
    Malformed(String),

    /// Version byte missing or not understood.
    #[error("unsupported token version {0}")]
    UnsupportedVersion(u8),

    /// Length prefix is missing or runs past the end of the token.
    #[error("token is truncated")]
    Truncated,

    /// Declared payload length does not match what the token carries.
    #[error("token length mismatch: declared {declared}, found {actual}")]
    LengthMismatch {
        /// Length declared by the prefix.
        declared: usize,
        /// Bytes actually present.
        actual: usize,
    },

    /// The recovered bytes are not UTF-8.
    #[error("token does not decode to valid UTF-8")]
    InvalidUtf8,
}

/// Encode a display name into a URL-safe token.
///
/// Total over all strings and deterministic: the same name always yields the same token.
pub fn encode(name: &str) -> Token {
    let bytes = name.as_bytes();
    let mut packed = Vec::with_capacity(1 + MAX_VARINT_BYTES + bytes.len());
    packed.push(VERSION);
    write_varint(&mut packed, bytes.len());
    packed.extend(bytes.iter().enumerate().map(|(i, &b)| obfuscate(i, b)));
    Token(URL_SAFE_NO_PAD.encode(packed))
}

/// Decode a token produced by [`encode`].
///
/// Structure is validated before the transform is inverted, so corrupted or foreign input
/// returns a [`DecodeError`] rather than a garbage string.
pub fn decode(token: &str) -> Result<String, DecodeError> {
    if token.is_empty() {
        return Err(DecodeError::Empty);
    }
    if let Some((index, ch)) = token.char_indices().find(|(_, c)| !is_token_char(*c)) {
        return Err(DecodeError::InvalidCharacter { index, ch });
    }

    let packed = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|e| DecodeError::Malformed(e.to_string()))?;

    let (&version, rest) = packed
        .split_first()
        .ok_or(DecodeError::UnsupportedVersion(0))?;
    if version != VERSION {
        return Err(DecodeError::UnsupportedVersion(version));
    }

    let (declared, payload) = read_varint(rest)?;
    if declared != payload.len() {
        return Err(DecodeError::LengthMismatch {
            declared,
            actual: payload.len(),
        });
    }

    let bytes: Vec<u8> = payload
        .iter()
        .enumerate()
        .map(|(i, &b)| reveal(i, b))
        .collect();
    String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)
}

/// Return `true` when `c` may appear in a token.
pub fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn offset(i: usize) -> u8 {
    ((i % 256) as u8).wrapping_mul(STRIDE)
}

fn obfuscate(i: usize, b: u8) -> u8 {
    (b ^ KEY[i % KEY.len()]).wrapping_add(offset(i))
}

fn reveal(i: usize, b: u8) -> u8 {
    b.wrapping_sub(offset(i)) ^ KEY[i % KEY.len()]
}

fn write_varint(out: &mut Vec<u8>, mut v: usize) {
    loop {
        let byte = (v & 0x7f) as u8;
        v >>= 7;
        if v == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

fn read_varint(bytes: &[u8]) -> Result<(usize, &[u8]), DecodeError> {
    let mut value = 0usize;
    for (i, &b) in bytes.iter().enumerate().take(MAX_VARINT_BYTES) {
        value |= usize::from(b & 0x7f) << (7 * i);
        if b & 0x80 == 0 {
            // A zero continuation byte means the same length has a shorter encoding.
            if i > 0 && b == 0 {
                return Err(DecodeError::Malformed("overlong length prefix".to_owned()));
            }
            return Ok((value, &bytes[i + 1..]));
        }
    }
    Err(DecodeError::Truncated)
}

#[cfg(test)]
#[path = "../../tests/unit/token/codec.rs"]
mod tests;
