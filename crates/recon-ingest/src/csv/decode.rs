//! Text decoding with a Windows-1252 fallback.

use std::borrow::Cow;

use encoding_rs::WINDOWS_1252;

use crate::error::{IngestError, Result};

/// Encoding a text upload was decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextEncoding {
    Utf8,
    Windows1252,
}

impl TextEncoding {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Windows1252 => "windows-1252",
        }
    }
}

/// Decode bytes as UTF-8, falling back to Windows-1252.
///
/// A UTF-8 byte-order mark is stripped. UTF-16 input is rejected.
pub(crate) fn decode_text<'a>(file: &str, bytes: &'a [u8]) -> Result<(Cow<'a, str>, TextEncoding)> {
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Err(IngestError::UnsupportedEncoding {
            file: file.to_string(),
            encoding: "UTF-16 LE",
        });
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Err(IngestError::UnsupportedEncoding {
            file: file.to_string(),
            encoding: "UTF-16 BE",
        });
    }

    let body = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    if let Ok(text) = std::str::from_utf8(body) {
        return Ok((Cow::Borrowed(text), TextEncoding::Utf8));
    }

    let (text, had_errors) = WINDOWS_1252.decode_without_bom_handling(body);
    if had_errors {
        return Err(IngestError::UnsupportedEncoding {
            file: file.to_string(),
            encoding: "UTF-8 or windows-1252",
        });
    }
    Ok((text, TextEncoding::Windows1252))
}

/// Pick the delimiter occurring most often in the first non-empty line.
///
/// Candidates are `,`, `;` and tab; ties go to the earlier candidate, and a
/// line with none of them reads as comma-separated.
pub(crate) fn detect_delimiter(text: &str) -> u8 {
    const CANDIDATES: [u8; 3] = [b',', b';', b'\t'];

    let Some(line) = text.lines().find(|line| !line.trim().is_empty()) else {
        return b',';
    };

    let mut counts = [0usize; CANDIDATES.len()];
    let mut in_quotes = false;
    for byte in line.bytes() {
        if byte == b'"' {
            in_quotes = !in_quotes;
            continue;
        }
        if in_quotes {
            continue;
        }
        if let Some(pos) = CANDIDATES.iter().position(|&c| c == byte) {
            counts[pos] += 1;
        }
    }

    let mut best = 0;
    for idx in 1..CANDIDATES.len() {
        if counts[idx] > counts[best] {
            best = idx;
        }
    }
    CANDIDATES[best]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8_strips_bom() {
        let bytes = "\u{feff}Código;Nome\n".as_bytes();
        let (text, encoding) = decode_text("siga.csv", bytes).unwrap();
        assert_eq!(encoding, TextEncoding::Utf8);
        assert!(text.starts_with("Código"));
    }

    #[test]
    fn test_decode_falls_back_to_windows_1252() {
        // "Código" with ó encoded as a single Latin-1 byte.
        let bytes = b"C\xf3digo,Nome\n";
        let (text, encoding) = decode_text("siga.csv", bytes).unwrap();
        assert_eq!(encoding, TextEncoding::Windows1252);
        assert_eq!(encoding.as_str(), "windows-1252");
        assert!(text.starts_with("Código"));
    }

    #[test]
    fn test_decode_rejects_utf16() {
        let err = decode_text("form.csv", &[0xFF, 0xFE, 0x41, 0x00]).unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedEncoding { .. }));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), b',');
        assert_eq!(detect_delimiter("Código;Nome;Local\n"), b';');
        assert_eq!(detect_delimiter("a\tb\tc"), b'\t');
        assert_eq!(detect_delimiter("\n\n\"x;y\",z\n"), b',');
        assert_eq!(detect_delimiter("single"), b',');
    }
}
