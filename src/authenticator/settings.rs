//! Authenticator settings
//!
//! Defaults match the relying party under test: RP ID `localhost`, origin
//! `http://localhost:3000`.

use serde::{Deserialize, Serialize};

use super::attestation::AttestationMode;
use super::auth_data::Aaguid;
use super::errors::AuthenticatorError;

pub const DEFAULT_RP_ID: &str = "localhost";
pub const DEFAULT_ORIGIN: &str = "http://localhost:3000";
/// Counter reported by assertions; no per-credential counter is tracked
pub const DEFAULT_SIGN_COUNT: u32 = 1;

/// Virtual authenticator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthenticatorSettings {
    /// Relying Party ID hashed into authenticator data
    pub rp_id: String,
    /// Origin written into client data (e.g., <http://localhost:3000>)
    pub origin: String,
    /// Signature counter reported by assertions
    pub sign_count: u32,
    /// Attestation used when a registration does not ask for one
    pub attestation: AttestationMode,
    /// AAGUID used when a registration does not supply one (zero if unset)
    pub aaguid: Option<String>,
}

impl Default for AuthenticatorSettings {
    fn default() -> Self {
        Self {
            rp_id: DEFAULT_RP_ID.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            sign_count: DEFAULT_SIGN_COUNT,
            attestation: AttestationMode::None,
            aaguid: None,
        }
    }
}

impl AuthenticatorSettings {
    /// Validate the settings
    ///
    /// # Errors
    /// Returns `ConfigurationError` if:
    /// - the relying party ID is empty
    /// - the origin is not https:// (except for localhost)
    /// - the default AAGUID does not parse
    pub fn validate(&self) -> Result<(), AuthenticatorError> {
        if self.rp_id.is_empty() {
            return Err(AuthenticatorError::ConfigurationError(
                "Relying party ID cannot be empty".into(),
            ));
        }

        if !self.origin.starts_with("https://") && !self.origin.starts_with("http://localhost") {
            return Err(AuthenticatorError::ConfigurationError(
                "Origin must be https:// except for localhost".into(),
            ));
        }

        self.default_aaguid()
            .map(|_| ())
            .map_err(|e| AuthenticatorError::ConfigurationError(e.to_string()))
    }

    /// AAGUID used when a registration does not name one
    ///
    /// # Errors
    /// Returns `InvalidAaguid` if the configured value is malformed
    pub fn default_aaguid(&self) -> Result<Aaguid, AuthenticatorError> {
        self.aaguid
            .as_deref()
            .map_or_else(|| Ok(Aaguid::default()), Aaguid::parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = AuthenticatorSettings::default();
        assert_eq!(settings.rp_id, "localhost");
        assert_eq!(settings.origin, "http://localhost:3000");
        assert_eq!(settings.sign_count, 1);
        assert!(settings.validate().is_ok());
        assert_eq!(settings.default_aaguid().unwrap(), Aaguid::default());
    }

    #[test]
    fn test_rejects_empty_rp_id() {
        let settings = AuthenticatorSettings {
            rp_id: String::new(),
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(AuthenticatorError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_rejects_plain_http_origin() {
        let settings = AuthenticatorSettings {
            origin: "http://example.com".to_string(),
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = AuthenticatorSettings {
            origin: "https://example.com".to_string(),
            ..Default::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_default_aaguid() {
        let settings = AuthenticatorSettings {
            aaguid: Some("1234".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(AuthenticatorError::ConfigurationError(_))
        ));
    }
}
