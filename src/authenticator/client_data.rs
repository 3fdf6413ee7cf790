//! Client data and response marshalling
//!
//! Builds `clientDataJSON` the way a browser would and shapes the final
//! `PublicKeyCredential` JSON objects. All binary fields travel as unpadded
//! Base64URL.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::errors::AuthenticatorError;
use super::types::{
    AssertionResponse, AuthenticatorAssertionResponse, AuthenticatorAttestationResponse,
    CredentialResponse, PUBLIC_KEY_CREDENTIAL_TYPE,
};

/// Ceremony recorded in `clientDataJSON.type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientDataType {
    #[serde(rename = "webauthn.create")]
    Create,
    #[serde(rename = "webauthn.get")]
    Get,
}

impl ClientDataType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "webauthn.create",
            Self::Get => "webauthn.get",
        }
    }
}

/// Collected client data; field order is the serialized key order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientData {
    #[serde(rename = "type")]
    pub r#type: ClientDataType,
    pub challenge: String,
    pub origin: String,
    #[serde(rename = "crossOrigin", default)]
    pub cross_origin: bool, // Browsers may omit it for same-origin ceremonies
}

/// Serialize `{type, challenge, origin, crossOrigin: false}`
///
/// # Errors
/// Returns `EncodingError` if JSON serialization fails
pub fn build_client_data_json(
    r#type: ClientDataType,
    challenge: &str,
    origin: &str,
) -> Result<String, AuthenticatorError> {
    let client_data = ClientData {
        r#type,
        challenge: challenge.to_string(),
        origin: origin.to_string(),
        cross_origin: false,
    };
    serde_json::to_string(&client_data)
        .map_err(|e| AuthenticatorError::EncodingError(format!("Invalid client data JSON: {e}")))
}

/// Shape a registration result; `id` and `rawId` are the same string
#[must_use]
pub fn to_credential_response(
    credential_id: &[u8],
    attestation_object: &[u8],
    client_data_json: &str,
) -> CredentialResponse {
    let id = URL_SAFE_NO_PAD.encode(credential_id);
    CredentialResponse {
        raw_id: id.clone(),
        id,
        r#type: PUBLIC_KEY_CREDENTIAL_TYPE.to_string(),
        response: AuthenticatorAttestationResponse {
            attestation_object: URL_SAFE_NO_PAD.encode(attestation_object),
            client_data_json: URL_SAFE_NO_PAD.encode(client_data_json),
        },
    }
}

/// Shape an authentication result
///
/// `user_handle` is copied verbatim and omitted from the JSON when `None`.
#[must_use]
pub fn to_assertion_response(
    credential_id: &[u8],
    authenticator_data: &[u8],
    client_data_json: &str,
    signature: &[u8],
    user_handle: Option<&str>,
) -> AssertionResponse {
    let id = URL_SAFE_NO_PAD.encode(credential_id);
    AssertionResponse {
        raw_id: id.clone(),
        id,
        r#type: PUBLIC_KEY_CREDENTIAL_TYPE.to_string(),
        response: AuthenticatorAssertionResponse {
            authenticator_data: URL_SAFE_NO_PAD.encode(authenticator_data),
            client_data_json: URL_SAFE_NO_PAD.encode(client_data_json),
            signature: URL_SAFE_NO_PAD.encode(signature),
            user_handle: user_handle.map(str::to_string),
        },
    }
}

/// Decode Base64URL client data JSON into its text form
///
/// # Errors
/// Returns `EncodingError` for bad Base64URL or non-UTF-8 content
pub fn decode_client_data_json(client_data_json_b64: &str) -> Result<String, AuthenticatorError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(client_data_json_b64)
        .map_err(|_| AuthenticatorError::EncodingError("Invalid client data encoding".to_string()))?;
    String::from_utf8(bytes)
        .map_err(|_| AuthenticatorError::EncodingError("Client data is not UTF-8".to_string()))
}

/// Parse Base64URL client data JSON into [`ClientData`]
///
/// # Errors
/// Returns `EncodingError` for bad Base64URL, non-UTF-8 content, or JSON that
/// is not a `webauthn.create`/`webauthn.get` client data object
pub fn parse_client_data(client_data_json_b64: &str) -> Result<ClientData, AuthenticatorError> {
    let json = decode_client_data_json(client_data_json_b64)?;
    serde_json::from_str(&json)
        .map_err(|e| AuthenticatorError::EncodingError(format!("Invalid client data JSON: {e}")))
}

/// Check the ceremony type, challenge and origin recorded in client data
///
/// # Errors
/// Returns `EncodingError` if the data cannot be parsed, `VerificationFailed`
/// naming the first field that does not match
pub fn verify_client_data(
    client_data_json_b64: &str,
    expected_type: ClientDataType,
    expected_challenge: &str,
    expected_origin: &str,
) -> Result<(), AuthenticatorError> {
    let client_data = parse_client_data(client_data_json_b64)?;

    if client_data.r#type != expected_type {
        return Err(AuthenticatorError::VerificationFailed(format!(
            "Client data type is {}, expected {}",
            client_data.r#type.as_str(),
            expected_type.as_str()
        )));
    }
    if client_data.challenge != expected_challenge {
        return Err(AuthenticatorError::VerificationFailed(
            "Client data challenge does not match".to_string(),
        ));
    }
    if client_data.origin != expected_origin {
        return Err(AuthenticatorError::VerificationFailed(format!(
            "Client data origin {} does not match {expected_origin}",
            client_data.origin
        )));
    }
    Ok(())
}
