//! Relying-party side checks
//!
//! Lets tests confirm that emitted assertions verify against the COSE key
//! published at registration, using standard ES256 over
//! `authenticatorData || SHA-256(clientDataJSON)`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use p256::ecdsa::signature::Verifier;
use p256::ecdsa::Signature;

use super::client_data;
use super::cose;
use super::crypto;
use super::errors::AuthenticatorError;
use super::types::AssertionResponse;

fn decode_field(value: &str, name: &str) -> Result<Vec<u8>, AuthenticatorError> {
    URL_SAFE_NO_PAD
        .decode(value)
        .map_err(|_| AuthenticatorError::EncodingError(format!("Invalid {name} encoding")))
}

/// Verify an assertion signature against a COSE-encoded public key
///
/// # Errors
/// Returns `EncodingError` for undecodable fields, `VerificationFailed` if
/// the key is unsupported or the signature does not verify
pub fn verify_assertion(
    cose_public_key: &[u8],
    assertion: &AssertionResponse,
) -> Result<(), AuthenticatorError> {
    let verifying_key = cose::decode_cose_key(cose_public_key)?.to_verifying_key()?;

    let authenticator_data = decode_field(
        &assertion.response.authenticator_data,
        "authenticator data",
    )?;
    let client_data_json = client_data::decode_client_data_json(&assertion.response.client_data_json)?;
    let signature_bytes = decode_field(&assertion.response.signature, "signature")?;

    let signature = Signature::from_der(&signature_bytes).map_err(|e| {
        AuthenticatorError::VerificationFailed(format!("Invalid signature format: {e}"))
    })?;

    let mut signed_data = authenticator_data;
    signed_data.extend_from_slice(&crypto::sha256(client_data_json.as_bytes()));

    verifying_key
        .verify(&signed_data, &signature)
        .map_err(|_| {
            AuthenticatorError::VerificationFailed("ES256 signature verification failed".to_string())
        })
}
