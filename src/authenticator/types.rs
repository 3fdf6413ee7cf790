//! Challenge inputs and credential responses
//!
//! Inputs deserialize from the relying party's challenge JSON. Outputs
//! serialize to the browser's `PublicKeyCredential.toJSON()` shape.

use serde::{Deserialize, Serialize};

use super::attestation::AttestationMode;
use super::auth_data::Aaguid;

/// Credential type, always "public-key"
pub const PUBLIC_KEY_CREDENTIAL_TYPE: &str = "public-key";

/// User entity attached to a challenge
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ChallengeUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>, // Opaque user handle, passed through as-is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        rename = "displayName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub display_name: Option<String>,
}

/// Registration challenge issued by the relying party
///
/// Unknown fields (`rp`, `pubKeyCredParams`, `timeout`, ...) are ignored.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RegistrationChallenge {
    pub challenge: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ChallengeUser>,
}

/// Authentication challenge issued by the relying party
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AuthenticationChallenge {
    pub challenge: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ChallengeUser>,
}

impl AuthenticationChallenge {
    /// User handle to echo back, if the challenge named a user
    #[must_use]
    pub fn user_handle(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|user| user.id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

/// Per-call registration options
///
/// Fields left unset fall back to the authenticator settings.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistrationOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aaguid: Option<String>, // Hex, hyphens allowed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attestation: Option<AttestationMode>,
}

impl RegistrationOptions {
    #[must_use]
    pub fn with_aaguid(mut self, aaguid: impl Into<String>) -> Self {
        self.aaguid = Some(aaguid.into());
        self
    }

    #[must_use]
    pub fn with_attestation(mut self, attestation: AttestationMode) -> Self {
        self.attestation = Some(attestation);
        self
    }
}

/// Per-call assertion options
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AssertionOptions {
    #[serde(rename = "signCount", default, skip_serializing_if = "Option::is_none")]
    pub sign_count: Option<u32>,
}

/// Registration response sent to the relying party
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CredentialResponse {
    pub id: String, // Base64URL-encoded credential ID
    #[serde(rename = "rawId")]
    pub raw_id: String, // Same value as `id`
    #[serde(rename = "type")]
    pub r#type: String, // Always "public-key"
    pub response: AuthenticatorAttestationResponse,
}

/// Authentication response sent to the relying party
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AssertionResponse {
    pub id: String, // Base64URL-encoded credential ID
    #[serde(rename = "rawId")]
    pub raw_id: String, // Same value as `id`
    #[serde(rename = "type")]
    pub r#type: String, // Always "public-key"
    pub response: AuthenticatorAssertionResponse,
}

/// Authenticator attestation response during registration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatorAttestationResponse {
    #[serde(rename = "attestationObject")]
    pub attestation_object: String, // Base64URL-encoded attestation object
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String, // Base64URL-encoded client data JSON
}

/// Authenticator assertion response during authentication
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatorAssertionResponse {
    #[serde(rename = "authenticatorData")]
    pub authenticator_data: String, // Base64URL-encoded authenticator data
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String, // Base64URL-encoded client data JSON
    pub signature: String, // Base64URL-encoded DER signature
    #[serde(
        rename = "userHandle",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub user_handle: Option<String>, // Omitted when the challenge carried no user
}

/// Resolved registration parameters, after defaults are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRegistration {
    pub aaguid: Aaguid,
    pub attestation: AttestationMode,
}
