//! Encoding detection and normalization for VBA module files.
//!
//! The VBA editor on Japanese-locale Windows reads `.bas` sources as
//! Shift-JIS, while the files in version control are kept in UTF-8.
//! Detection tries strict UTF-8 first, then strict Shift-JIS, then falls
//! back to statistical sniffing.

use crate::error::{KitError, KitResult};
use chardetng::EncodingDetector;
use encoding_rs::{EncoderResult, SHIFT_JIS};
use std::fmt;
use std::fs;
use std::path::Path;

/// Text encoding of a tracked module file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectedEncoding {
    Utf8,
    ShiftJis,
    /// Something the statistical detector named (e.g. `windows-1252`).
    Other(String),
    Unknown,
}

impl fmt::Display for DetectedEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectedEncoding::Utf8 => write!(f, "UTF-8"),
            DetectedEncoding::ShiftJis => write!(f, "Shift-JIS"),
            DetectedEncoding::Other(name) => write!(f, "{}", name),
            DetectedEncoding::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Detect the encoding of a file on disk.
pub fn detect(path: &Path) -> KitResult<DetectedEncoding> {
    let bytes = fs::read(path)?;
    Ok(detect_bytes(&bytes))
}

/// Detect the encoding of a byte buffer.
///
/// UTF-8 wins ties: ASCII-only content is reported as UTF-8 even though it
/// is equally valid Shift-JIS.
pub fn detect_bytes(bytes: &[u8]) -> DetectedEncoding {
    if std::str::from_utf8(bytes).is_ok() {
        return DetectedEncoding::Utf8;
    }

    let (_, had_errors) = SHIFT_JIS.decode_without_bom_handling(bytes);
    if !had_errors {
        return DetectedEncoding::ShiftJis;
    }

    // Statistical fallback. The sniffer always names some encoding; only
    // trust it if the bytes actually decode cleanly under its guess.
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let guess = detector.guess(None, true);
    let (_, _, had_errors) = guess.decode(bytes);
    if had_errors {
        DetectedEncoding::Unknown
    } else {
        DetectedEncoding::Other(guess.name().to_string())
    }
}

/// Rewrite a UTF-8 file as Shift-JIS in place.
///
/// Characters outside the code page are replaced with `?`. The file must
/// currently be valid UTF-8; already-converted files fail that check and
/// are never double-converted.
pub fn convert_to_shift_jis(path: &Path) -> KitResult<()> {
    let bytes = fs::read(path)?;
    let text = String::from_utf8(bytes).map_err(|_| {
        KitError::Encoding(format!("{} is not valid UTF-8", path.display()))
    })?;

    let encoded = encode_shift_jis_lossy(&text);
    fs::write(path, encoded)?;
    Ok(())
}

/// Encode text as Shift-JIS, substituting `?` for unmappable characters.
pub fn encode_shift_jis_lossy(text: &str) -> Vec<u8> {
    let mut encoder = SHIFT_JIS.new_encoder();
    let mut out = Vec::with_capacity(text.len() * 2);
    let mut buf = [0u8; 2048];
    let mut rest = text;

    loop {
        let (result, read, written) =
            encoder.encode_from_utf8_without_replacement(rest, &mut buf, true);
        out.extend_from_slice(&buf[..written]);
        rest = &rest[read..];

        match result {
            EncoderResult::InputEmpty => break,
            EncoderResult::OutputFull => continue,
            EncoderResult::Unmappable(_) => out.push(b'?'),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_detects_as_utf8() {
        assert_eq!(
            detect_bytes(b"Attribute VB_Name = \"Module1\"\r\n"),
            DetectedEncoding::Utf8
        );
    }

    #[test]
    fn utf8_japanese_detects_as_utf8() {
        // Valid UTF-8, and its byte sequence is not well-formed Shift-JIS.
        assert_eq!(detect_bytes("あ".as_bytes()), DetectedEncoding::Utf8);
    }

    #[test]
    fn shift_jis_japanese_detects_as_shift_jis() {
        let (bytes, _, _) = SHIFT_JIS.encode("調剤券請求書");
        assert_eq!(detect_bytes(&bytes), DetectedEncoding::ShiftJis);
    }

    #[test]
    fn latin1_falls_back_to_sniffer() {
        // "café" in latin-1: invalid UTF-8 and invalid Shift-JIS.
        let bytes = [0x63, 0x61, 0x66, 0xE9];
        assert!(matches!(detect_bytes(&bytes), DetectedEncoding::Other(_)));
    }

    #[test]
    fn unmappable_characters_become_question_marks() {
        assert_eq!(encode_shift_jis_lossy("a€b"), b"a?b");
    }

    #[test]
    fn encode_round_trips_through_decode() {
        let encoded = encode_shift_jis_lossy("請求年月");
        let (decoded, had_errors) = SHIFT_JIS.decode_without_bom_handling(&encoded);
        assert!(!had_errors);
        assert_eq!(decoded, "請求年月");
    }
}
