//! Small decode steps that redirect matchers chain together with `?`.
//!
//! Every step either yields its output or a [`DecodeError`]; none of them
//! panic on malformed input.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// RFC 4648 §5 alphabet, padding optional.
const BASE64URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid base64url: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("decoded bytes are not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn base64url(input: &str) -> Result<Vec<u8>, DecodeError> {
    Ok(BASE64URL.decode(input)?)
}

pub fn utf8(bytes: Vec<u8>) -> Result<String, DecodeError> {
    Ok(String::from_utf8(bytes)?)
}

/// Deserializes a JSON document into `T`, typically a struct naming only
/// the fields a matcher needs. Missing fields surface as [`DecodeError::Json`].
pub fn json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    Ok(serde_json::from_slice(bytes)?)
}
