//! Errors returned by the adaptor and EOTS primitives.

use thiserror::Error;

/// Every failure the crate can report. No operation panics on caller input.
#[derive(Error, Clone, Copy, Debug, Eq, PartialEq)]
pub enum CryptoError {
    /// A message or serialized artifact has the wrong size.
    #[error("invalid input length: expected {expected} bytes, got {actual}")]
    InvalidInputLength { expected: usize, actual: usize },

    /// A hex string contains a non-hex character or has odd length.
    #[error("invalid hex encoding")]
    InvalidHex,

    /// A scalar is zero where a nonzero one is required, or is not below the group order.
    #[error("invalid scalar")]
    InvalidScalar,

    /// A point is malformed, not on the curve, or the point at infinity.
    #[error("invalid point")]
    InvalidPoint,

    /// Pre-signature verification recovered an encryption key of the wrong parity.
    #[error("recovered encryption key has the wrong y parity")]
    ParityMismatch,

    /// An algebraic verification check failed.
    #[error("signature verification failed")]
    SignatureVerificationFailed,

    /// EOTS extraction was given two signatures over the same message.
    #[error("signatures are over the same message, nothing to extract")]
    EquivocationOnSameMessage,

    /// The entropy source failed, or kept producing unusable nonces.
    #[error("entropy source failure")]
    EntropyFailure,
}

impl CryptoError {
    pub(crate) fn length(expected: usize, actual: usize) -> Self {
        CryptoError::InvalidInputLength { expected, actual }
    }
}
