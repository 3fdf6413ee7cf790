//! Error types for the virtual authenticator
//!
//! Callers are expected to match on these: an unknown credential and a
//! malformed AAGUID are ordinary test outcomes, while `InternalError` means a
//! cryptographic primitive misbehaved and the run should be abandoned.

use thiserror::Error;

/// Errors produced while building or inspecting `WebAuthn` responses
#[derive(Debug, Error)]
pub enum AuthenticatorError {
    /// The supplied AAGUID is not 32 hex characters once hyphens are removed
    #[error("Invalid AAGUID: {0}")]
    InvalidAaguid(String),

    /// No key pair was registered under the requested credential ID
    #[error("Credential not found: {0}")]
    CredentialNotFound(String),

    /// Data encoding/parsing error (base64url, CBOR, JSON, PEM)
    #[error("Encoding error: {0}")]
    EncodingError(String),

    /// Inspection or signature verification failed
    #[error("Verification failed: {0}")]
    VerificationFailed(String),

    /// Configuration error (e.g., invalid settings)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Broken invariant or failed primitive (RNG, key generation, COSE layout)
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AuthenticatorError {
    /// Whether the error signals a broken primitive rather than bad input
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InternalError(_))
    }
}
