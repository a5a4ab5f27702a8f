use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// How the peer renders binary fields (hashes, payloads, certificates) as JSON strings.
///
/// [`BytesEncoding::Utf8`] copies the string's bytes verbatim
/// and never fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BytesEncoding {
    #[default]
    Utf8,
    Base64,
    Hex,
}

impl BytesEncoding {
    pub fn decode(&self, raw: &str) -> Result<Vec<u8>, String> {
        match self {
            BytesEncoding::Utf8 => Ok(raw.as_bytes().to_vec()),
            BytesEncoding::Base64 => general_purpose::STANDARD.decode(raw).map_err(|e| e.to_string()),
            BytesEncoding::Hex => hex::decode(raw).map_err(|e| e.to_string()),
        }
    }
}

impl Display for BytesEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BytesEncoding::Utf8 => write!(f, "utf8"),
            BytesEncoding::Base64 => write!(f, "base64"),
            BytesEncoding::Hex => write!(f, "hex"),
        }
    }
}

impl FromStr for BytesEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(BytesEncoding::Utf8),
            "base64" => Ok(BytesEncoding::Base64),
            "hex" => Ok(BytesEncoding::Hex),
            _ => Err(format!("Invalid bytes encoding: {}", s)),
        }
    }
}
