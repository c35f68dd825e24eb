//! Wire format for queued registration candidates.
//!
//! One UTF-8 JSON object per message:
//! `{"name","email","password","taxId","birthDate","role"}`. There is no
//! version field.

use thiserror::Error;

use crate::candidate::CandidateUser;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("message body is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("message body is not a candidate record: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
#[error("candidate could not be serialized: {0}")]
pub struct EncodeError(#[from] serde_json::Error);

/// Serializes a candidate. Field order is fixed, so equal candidates always
/// produce identical bytes.
pub fn encode(candidate: &CandidateUser) -> Result<Vec<u8>, EncodeError> {
    Ok(serde_json::to_vec(candidate)?)
}

pub fn decode(body: &[u8]) -> Result<CandidateUser, DecodeError> {
    let text = std::str::from_utf8(body)?;
    Ok(serde_json::from_str(text)?)
}
