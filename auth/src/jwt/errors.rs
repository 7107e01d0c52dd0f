use thiserror::Error;

/// Error type for token issuance and inspection.
#[derive(Debug, Clone, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Failed to decode token: {0}")]
    DecodingFailed(String),
}

/// Outcome of a failed token verification.
///
/// Carries no reason: expired, tampered, malformed and foreign tokens
/// are indistinguishable to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Token rejected")]
pub struct TokenRejected;
