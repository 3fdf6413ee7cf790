//! Virtual authenticator service
//!
//! Runs the two pipelines: registration (key registry, COSE encoder,
//! authenticator data, attestation object) and authentication (registry
//! lookup, authenticator data, assertion signature).

use std::sync::Arc;

use super::attestation;
use super::auth_data::{self, Aaguid};
use super::client_data::{self, ClientDataType};
use super::cose;
use super::crypto;
use super::errors::AuthenticatorError;
use super::registry::KeyRegistry;
use super::settings::AuthenticatorSettings;
use super::types::{
    AssertionOptions, AssertionResponse, AuthenticationChallenge, CredentialResponse,
    RegistrationChallenge, RegistrationOptions, ResolvedRegistration,
};
use crate::utils::logging::LoggingHelper;

/// Software stand-in for a platform authenticator
#[derive(Debug)]
pub struct VirtualAuthenticator {
    settings: AuthenticatorSettings,
    registry: Arc<KeyRegistry>,
}

impl VirtualAuthenticator {
    /// Create an authenticator with its own empty key registry
    ///
    /// # Errors
    /// Returns `ConfigurationError` if the settings are invalid
    pub fn new(settings: AuthenticatorSettings) -> Result<Self, AuthenticatorError> {
        Self::with_registry(settings, Arc::new(KeyRegistry::new()))
    }

    /// Create an authenticator backed by a shared key registry
    ///
    /// # Errors
    /// Returns `ConfigurationError` if the settings are invalid
    pub fn with_registry(
        settings: AuthenticatorSettings,
        registry: Arc<KeyRegistry>,
    ) -> Result<Self, AuthenticatorError> {
        settings.validate()?;
        Ok(Self { settings, registry })
    }

    #[must_use]
    pub fn settings(&self) -> &AuthenticatorSettings {
        &self.settings
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<KeyRegistry> {
        &self.registry
    }

    /// Create a credential for a registration challenge
    ///
    /// The AAGUID is validated before any key is generated, so a rejected
    /// call leaves the registry untouched.
    ///
    /// # Errors
    /// Returns `InvalidAaguid` for a malformed AAGUID, `InternalError` if key
    /// generation fails, `EncodingError` if CBOR/JSON serialization fails
    pub fn register(
        &self,
        challenge: &RegistrationChallenge,
        options: &RegistrationOptions,
    ) -> Result<CredentialResponse, AuthenticatorError> {
        let resolved = self.resolve_registration(options)?;
        let record = self.registry.generate_credential()?;

        let cose_public_key = cose::encode_public_key(record.public_key())?;
        let authenticator_data = auth_data::build_for_registration(
            &self.settings.rp_id,
            record.credential_id(),
            &cose_public_key,
            &resolved.aaguid,
        )?;

        let client_data_json = client_data::build_client_data_json(
            ClientDataType::Create,
            &challenge.challenge,
            &self.settings.origin,
        )?;
        let attestation_object =
            attestation::build_attestation_object(&authenticator_data, resolved.attestation)?;

        LoggingHelper::log_credential_registered(
            record.encoded_id(),
            resolved.attestation.format(),
            &resolved.aaguid,
            record.created_at(),
        );

        Ok(client_data::to_credential_response(
            record.credential_id(),
            &attestation_object,
            &client_data_json,
        ))
    }

    /// Sign an authentication challenge with a registered credential
    ///
    /// # Errors
    /// Returns `CredentialNotFound` if the credential was never registered
    /// with this authenticator's registry
    pub fn authenticate(
        &self,
        challenge: &AuthenticationChallenge,
        credential_id: &str,
    ) -> Result<AssertionResponse, AuthenticatorError> {
        self.authenticate_with(challenge, credential_id, AssertionOptions::default())
    }

    /// [`authenticate`](Self::authenticate) with per-call overrides
    ///
    /// # Errors
    /// Returns `CredentialNotFound` if the credential was never registered,
    /// `InternalError` if signing fails
    pub fn authenticate_with(
        &self,
        challenge: &AuthenticationChallenge,
        credential_id: &str,
        options: AssertionOptions,
    ) -> Result<AssertionResponse, AuthenticatorError> {
        let record = self.registry.require(credential_id).inspect_err(|_| {
            LoggingHelper::log_unknown_credential(credential_id);
        })?;

        let sign_count = options.sign_count.unwrap_or(self.settings.sign_count);
        let authenticator_data =
            auth_data::build_for_authentication(&self.settings.rp_id, sign_count);
        let client_data_json = client_data::build_client_data_json(
            ClientDataType::Get,
            &challenge.challenge,
            &self.settings.origin,
        )?;
        let signature =
            crypto::sign_assertion(record.signing_key(), &authenticator_data, &client_data_json)?;

        LoggingHelper::log_assertion_generated(record.encoded_id(), sign_count);

        Ok(client_data::to_assertion_response(
            record.credential_id(),
            &authenticator_data,
            &client_data_json,
            &signature,
            challenge.user_handle(),
        ))
    }

    /// Registration over raw JSON, for callers that post the result as-is
    ///
    /// # Errors
    /// Returns `EncodingError` if the challenge JSON does not have a
    /// `challenge` string, otherwise as [`register`](Self::register)
    pub fn register_json(
        &self,
        challenge: &serde_json::Value,
        options: &RegistrationOptions,
    ) -> Result<serde_json::Value, AuthenticatorError> {
        let challenge: RegistrationChallenge = from_json(challenge)?;
        to_json(&self.register(&challenge, options)?)
    }

    /// Authentication over raw JSON, for callers that post the result as-is
    ///
    /// # Errors
    /// Returns `EncodingError` if the challenge JSON does not have a
    /// `challenge` string, otherwise as [`authenticate`](Self::authenticate)
    pub fn authenticate_json(
        &self,
        challenge: &serde_json::Value,
        credential_id: &str,
    ) -> Result<serde_json::Value, AuthenticatorError> {
        let challenge: AuthenticationChallenge = from_json(challenge)?;
        to_json(&self.authenticate(&challenge, credential_id)?)
    }

    fn resolve_registration(
        &self,
        options: &RegistrationOptions,
    ) -> Result<ResolvedRegistration, AuthenticatorError> {
        let aaguid = match options.aaguid.as_deref() {
            Some(raw) => Aaguid::parse(raw)?,
            None => self.settings.default_aaguid()?,
        };
        Ok(ResolvedRegistration {
            aaguid,
            attestation: options.attestation.unwrap_or(self.settings.attestation),
        })
    }
}

fn from_json<T: serde::de::DeserializeOwned>(
    value: &serde_json::Value,
) -> Result<T, AuthenticatorError> {
    T::deserialize(value)
        .map_err(|e| AuthenticatorError::EncodingError(format!("Invalid challenge JSON: {e}")))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, AuthenticatorError> {
    serde_json::to_value(value)
        .map_err(|e| AuthenticatorError::EncodingError(format!("Invalid response JSON: {e}")))
}
