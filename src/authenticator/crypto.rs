//! Cryptography operations for the virtual authenticator
//!
//! Randomness, hashing, key generation and the ES256 assertion signature.
//! Every failure here is a broken primitive and maps to
//! [`AuthenticatorError::InternalError`].

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use p256::ecdsa::signature::hazmat::PrehashSigner;
use p256::ecdsa::{Signature, SigningKey};
use p256::elliptic_curve::rand_core::OsRng;
use ring::rand::{SecureRandom, SystemRandom};
use sha2::{Digest, Sha256};

use super::errors::AuthenticatorError;

/// Fill a fixed-size buffer from the system CSPRNG
///
/// # Errors
/// Returns `InternalError` if the operating system RNG fails
pub fn random_bytes<const N: usize>() -> Result<[u8; N], AuthenticatorError> {
    let mut bytes = [0u8; N];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| AuthenticatorError::InternalError("System RNG failure".to_string()))?;
    Ok(bytes)
}

/// Generate a secure random challenge, Base64URL-encoded
///
/// # Errors
/// Returns `InternalError` if the operating system RNG fails
pub fn generate_challenge() -> Result<String, AuthenticatorError> {
    // 32 bytes of random data (256 bits)
    let bytes = random_bytes::<32>()?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Hash data using SHA-256
#[must_use]
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Generate a fresh P-256 signing key from the OS RNG
#[must_use]
pub fn generate_signing_key() -> SigningKey {
    SigningKey::random(&mut OsRng)
}

/// Digest signed by an assertion: `SHA-256(authData || SHA-256(clientDataJSON))`
#[must_use]
pub fn assertion_digest(authenticator_data: &[u8], client_data_json: &str) -> [u8; 32] {
    let client_data_hash = sha256(client_data_json.as_bytes());
    let mut hasher = Sha256::new();
    hasher.update(authenticator_data);
    hasher.update(client_data_hash);
    hasher.finalize().into()
}

/// Produce a DER-encoded ES256 assertion signature
///
/// The digest is signed as a prehash, so the result is the standard ES256
/// signature over `authData || clientDataHash`.
///
/// # Errors
/// Returns `InternalError` if ECDSA signing fails
pub fn sign_assertion(
    signing_key: &SigningKey,
    authenticator_data: &[u8],
    client_data_json: &str,
) -> Result<Vec<u8>, AuthenticatorError> {
    let digest = assertion_digest(authenticator_data, client_data_json);
    let signature: Signature = signing_key
        .sign_prehash(&digest)
        .map_err(|e| AuthenticatorError::InternalError(format!("ECDSA signing failed: {e}")))?;
    Ok(signature.to_der().as_bytes().to_vec())
}
