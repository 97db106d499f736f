//! # Response Decoding
//!
//! Byte-to-record decoding for remote responses.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Response Decode Pipeline                          │
//! │                                                                         │
//! │   raw bytes ──► decode_text (charset) ──► serde_json ──► Vec<T>         │
//! │                                                                         │
//! │   The legacy system serves JSON in ISO-8859-1, so the body cannot be    │
//! │   handed to serde_json directly. It also collapses single-row result    │
//! │   sets into a bare object instead of a one-element array, so both       │
//! │   shapes must parse into the same Vec.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

// =============================================================================
// Charset
// =============================================================================

/// Character set of a remote response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Charset {
    /// ISO-8859-1, the legacy system's default.
    #[default]
    Latin1,

    /// UTF-8, for endpoints that have been migrated.
    Utf8,
}

impl std::fmt::Display for Charset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Charset::Latin1 => write!(f, "latin1"),
            Charset::Utf8 => write!(f, "utf8"),
        }
    }
}

impl std::str::FromStr for Charset {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "latin1" | "latin-1" | "iso-8859-1" | "iso8859-1" => Ok(Charset::Latin1),
            "utf8" | "utf-8" => Ok(Charset::Utf8),
            other => Err(EngineError::InvalidConfig(format!(
                "Unknown charset: '{}'. Valid options: latin1, utf8",
                other
            ))),
        }
    }
}

// =============================================================================
// Text Decoding
// =============================================================================

/// Decodes a response body into a string according to the given charset.
///
/// ISO-8859-1 maps every byte 0x00..=0xFF to the Unicode code point of the
/// same value, so the decode is a direct byte-to-char widening and cannot
/// fail. UTF-8 decoding is lossy: invalid sequences become U+FFFD rather
/// than failing the whole collection.
pub fn decode_text(bytes: &[u8], charset: Charset) -> String {
    match charset {
        Charset::Latin1 => bytes.iter().map(|&b| b as char).collect(),
        Charset::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
    }
}

// =============================================================================
// Record Parsing
// =============================================================================

/// Envelope wrapping export responses.
///
/// A multi-row result arrives as `[{...}, {...}]`, but the legacy system
/// collapses a single-row result to a bare `{...}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExportBody<T> {
    Many(Vec<T>),
    One(T),
}

/// Parses a decoded response body into a vector of records.
///
/// Single-object bodies are normalized to a one-element vector. The `url`
/// is threaded through so a malformed body surfaces as a fetch failure
/// pointing at the request that produced it.
pub fn parse_records<T: DeserializeOwned>(body: &str, url: &str) -> EngineResult<Vec<T>> {
    let parsed: ExportBody<T> = serde_json::from_str(body)
        .map_err(|e| EngineError::fetch(url, format!("invalid JSON response: {}", e)))?;

    Ok(match parsed {
        ExportBody::Many(records) => records,
        ExportBody::One(record) => vec![record],
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use socsync_core::CompanyRecord;

    #[test]
    fn test_latin1_decode_accented_text() {
        // "Operação" in ISO-8859-1: ç = 0xE7, ã = 0xE3
        let bytes = b"Opera\xE7\xE3o";
        assert_eq!(decode_text(bytes, Charset::Latin1), "Operação");
    }

    #[test]
    fn test_utf8_decode() {
        let bytes = "Operação".as_bytes();
        assert_eq!(decode_text(bytes, Charset::Utf8), "Operação");
    }

    #[test]
    fn test_charset_parsing() {
        assert_eq!("latin1".parse::<Charset>().unwrap(), Charset::Latin1);
        assert_eq!("ISO-8859-1".parse::<Charset>().unwrap(), Charset::Latin1);
        assert_eq!("utf-8".parse::<Charset>().unwrap(), Charset::Utf8);
        assert!("ebcdic".parse::<Charset>().is_err());
    }

    #[test]
    fn test_parse_array_body() {
        let body = r#"[
            {"CODIGO": "1", "NOMEABREVIADO": "ACME", "ATIVO": "1"},
            {"CODIGO": "2", "NOMEABREVIADO": "BETA", "ATIVO": "0"}
        ]"#;
        let records: Vec<CompanyRecord> = parse_records(body, "http://x").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].codigo, "1");
        assert!(!records[1].is_active());
    }

    #[test]
    fn test_parse_single_object_normalized_to_vec() {
        let body = r#"{"CODIGO": "7", "NOMEABREVIADO": "SOLO", "ATIVO": "1"}"#;
        let records: Vec<CompanyRecord> = parse_records(body, "http://x").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].codigo, "7");
    }

    #[test]
    fn test_parse_invalid_json_is_fetch_error() {
        let err =
            parse_records::<CompanyRecord>("not json", "http://soc/ws?parametro=x").unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("http://soc/ws?parametro=x"));
    }
}
