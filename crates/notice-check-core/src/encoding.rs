//! Character encodings for reading and writing notice documents

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const REPLACEMENT: char = char::REPLACEMENT_CHARACTER;
const UNMAPPABLE: u8 = b'?';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("Unsupported encoding: {0}")]
    Unsupported(String),
}

/// A supported character encoding
///
/// Decoding never fails: malformed input becomes U+FFFD. Encoding replaces
/// characters the target charset cannot represent with `?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TextEncoding {
    #[default]
    Utf8,
    UsAscii,
    Latin1,
    Utf16Be,
    Utf16Le,
    /// Byte order taken from the BOM when decoding, big-endian with BOM when encoding
    Utf16,
}

impl TextEncoding {
    /// Canonical charset name
    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::UsAscii => "US-ASCII",
            TextEncoding::Latin1 => "ISO-8859-1",
            TextEncoding::Utf16Be => "UTF-16BE",
            TextEncoding::Utf16Le => "UTF-16LE",
            TextEncoding::Utf16 => "UTF-16",
        }
    }

    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            TextEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            TextEncoding::UsAscii => bytes
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { REPLACEMENT })
                .collect(),
            TextEncoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
            TextEncoding::Utf16Be => decode_utf16(bytes, u16::from_be_bytes),
            TextEncoding::Utf16Le => decode_utf16(bytes, u16::from_le_bytes),
            TextEncoding::Utf16 => match bytes {
                [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
                [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
                _ => decode_utf16(bytes, u16::from_be_bytes),
            },
        }
    }

    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::Utf8 => text.as_bytes().to_vec(),
            TextEncoding::UsAscii => text
                .chars()
                .map(|c| if c.is_ascii() { c as u8 } else { UNMAPPABLE })
                .collect(),
            TextEncoding::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).unwrap_or(UNMAPPABLE))
                .collect(),
            TextEncoding::Utf16Be => text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
            TextEncoding::Utf16Le => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            TextEncoding::Utf16 => {
                let mut out = vec![0xFE, 0xFF];
                out.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
                out
            }
        }
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let chunks = bytes.chunks_exact(2);
    let dangling = !chunks.remainder().is_empty();
    let units = chunks.map(|pair| unit([pair[0], pair[1]]));

    let mut text: String = char::decode_utf16(units)
        .map(|r| r.unwrap_or(REPLACEMENT))
        .collect();
    if dangling {
        text.push(REPLACEMENT);
    }
    text
}

impl FromStr for TextEncoding {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_uppercase())
            .collect();

        match key.as_str() {
            "UTF8" => Ok(TextEncoding::Utf8),
            "USASCII" | "ASCII" => Ok(TextEncoding::UsAscii),
            "ISO88591" | "LATIN1" => Ok(TextEncoding::Latin1),
            "UTF16BE" => Ok(TextEncoding::Utf16Be),
            "UTF16LE" => Ok(TextEncoding::Utf16Le),
            "UTF16" => Ok(TextEncoding::Utf16),
            _ => Err(EncodingError::Unsupported(s.to_string())),
        }
    }
}

impl TryFrom<String> for TextEncoding {
    type Error = EncodingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TextEncoding> for String {
    fn from(value: TextEncoding) -> Self {
        value.name().to_string()
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("UTF-8".parse::<TextEncoding>(), Ok(TextEncoding::Utf8));
        assert_eq!("utf8".parse::<TextEncoding>(), Ok(TextEncoding::Utf8));
        assert_eq!("latin1".parse::<TextEncoding>(), Ok(TextEncoding::Latin1));
        assert_eq!("iso-8859-1".parse::<TextEncoding>(), Ok(TextEncoding::Latin1));
        assert_eq!("US_ASCII".parse::<TextEncoding>(), Ok(TextEncoding::UsAscii));
        assert_eq!("utf-16le".parse::<TextEncoding>(), Ok(TextEncoding::Utf16Le));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            "EBCDIC".parse::<TextEncoding>(),
            Err(EncodingError::Unsupported("EBCDIC".to_string()))
        );
    }

    #[test]
    fn test_utf8_malformed_is_replaced() {
        let text = TextEncoding::Utf8.decode(b"ok\xFFok");
        assert_eq!(text, "ok\u{FFFD}ok");
    }

    #[test]
    fn test_latin1() {
        let bytes = TextEncoding::Latin1.encode("café €");
        assert_eq!(bytes, b"caf\xE9 ?");
        assert_eq!(TextEncoding::Latin1.decode(b"caf\xE9"), "café");
    }

    #[test]
    fn test_ascii_replaces_non_ascii() {
        assert_eq!(TextEncoding::UsAscii.encode("naïve"), b"na?ve");
        assert_eq!(TextEncoding::UsAscii.decode(b"a\xC3b"), "a\u{FFFD}b");
    }

    #[test]
    fn test_utf16_bom_sniffing() {
        assert_eq!(TextEncoding::Utf16.decode(&[0xFF, 0xFE, b'h', 0, b'i', 0]), "hi");
        assert_eq!(TextEncoding::Utf16.decode(&[0xFE, 0xFF, 0, b'h', 0, b'i']), "hi");
        assert_eq!(TextEncoding::Utf16.decode(&[0, b'h', 0, b'i']), "hi");
        assert_eq!(
            TextEncoding::Utf16.encode("hi"),
            vec![0xFE, 0xFF, 0, b'h', 0, b'i']
        );
    }

    #[test]
    fn test_utf16_dangling_byte() {
        assert_eq!(TextEncoding::Utf16Le.decode(&[b'a', 0, b'b']), "a\u{FFFD}");
    }

    #[test]
    fn test_serde_uses_charset_name() {
        let json = serde_json::to_string(&TextEncoding::Latin1).unwrap();
        assert_eq!(json, "\"ISO-8859-1\"");
        let back: TextEncoding = serde_json::from_str("\"utf-16be\"").unwrap();
        assert_eq!(back, TextEncoding::Utf16Be);
        assert!(serde_json::from_str::<TextEncoding>("\"klingon\"").is_err());
    }
}
