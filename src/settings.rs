use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::authenticator::AuthenticatorSettings;
use crate::utils::logging::LoggingHelper;

/// Directory searched for an overriding `Settings.toml`
pub const CONFIG_DIR_ENV: &str = "VIRTUAL_WEBAUTHN_CONFIG_DIR";
pub const SETTINGS_FILE_NAME: &str = "Settings.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub authenticator: AuthenticatorSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from configuration files and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Settings file cannot be read or parsed
    /// - The resulting authenticator settings are invalid
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        // Load base settings from TOML or defaults
        let mut settings = Self::load_base_settings()?;

        // Apply environment variable overrides
        Self::apply_env_overrides(&mut settings);

        Self::initialize_logging(&settings.logging);
        settings.authenticator.validate()?;
        LoggingHelper::log_effective_settings(
            &settings.authenticator.rp_id,
            &settings.authenticator.origin,
            settings.authenticator.sign_count,
        );

        Ok(settings)
    }

    /// Parse settings from a TOML document
    ///
    /// # Errors
    ///
    /// Returns an error if TOML parsing fails
    pub fn from_toml_str(content: &str) -> Result<Self, basic_toml::Error> {
        basic_toml::from_str(content)
    }

    /// Initialize `env_logger` with the configured level as default filter
    ///
    /// `RUST_LOG` still wins when set. Repeated initialization is ignored.
    fn initialize_logging(logging: &LoggingSettings) {
        let env = env_logger::Env::default().default_filter_or(logging.level.as_str());
        // A logger may already be installed by a previous load or a test harness
        let _ = env_logger::Builder::from_env(env).try_init();
    }

    /// Load base settings from TOML file(s) or use defaults
    /// Settings are loaded with the following priority (highest to lowest):
    /// 1. Environment variables (applied separately after loading base settings)
    /// 2. Settings.toml in `VIRTUAL_WEBAUTHN_CONFIG_DIR` (if specified and exists)
    /// 3. Settings.toml in current directory (if exists)
    /// 4. Default settings
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Settings file cannot be read
    /// - TOML parsing fails
    fn load_base_settings() -> Result<Self, Box<dyn std::error::Error>> {
        // 1. Start with default settings
        let mut settings = Self::default();

        // 2. Settings.toml in current directory (lower priority)
        let default_config_path = Path::new(SETTINGS_FILE_NAME);
        if default_config_path.exists() {
            settings = Self::read_file(default_config_path)?;
        }

        // 3. Settings.toml in the config directory (higher priority)
        if let Ok(config_dir) = std::env::var(CONFIG_DIR_ENV) {
            let config_path = Path::new(&config_dir).join(SETTINGS_FILE_NAME);
            if config_path.exists() {
                settings = Self::read_file(&config_path)?;
            }
        }

        Ok(settings)
    }

    fn read_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let toml_content = fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&toml_content)?;
        LoggingHelper::log_settings_source(&path.display().to_string());
        Ok(settings)
    }

    /// Apply environment variable overrides to settings
    fn apply_env_overrides(settings: &mut Self) {
        let authenticator = &mut settings.authenticator;
        if let Ok(rp_id) = std::env::var("WEBAUTHN_RP_ID") {
            authenticator.rp_id = rp_id;
        }
        if let Ok(origin) = std::env::var("WEBAUTHN_ORIGIN") {
            authenticator.origin = origin;
        }
        if let Ok(sign_count_str) = std::env::var("WEBAUTHN_SIGN_COUNT") {
            if let Ok(sign_count) = sign_count_str.parse::<u32>() {
                authenticator.sign_count = sign_count;
            }
        }
        if let Ok(aaguid) = std::env::var("WEBAUTHN_AAGUID") {
            authenticator.aaguid = Some(aaguid).filter(|value| !value.is_empty());
        }
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            settings.logging.level = level;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authenticator::AttestationMode;

    #[test]
    fn test_from_toml_str_partial_document() {
        let settings = Settings::from_toml_str(
            r#"
            [authenticator]
            origin = "https://rp.example"
            attestation = "direct"
            "#,
        )
        .unwrap();

        assert_eq!(settings.authenticator.rp_id, "localhost");
        assert_eq!(settings.authenticator.origin, "https://rp.example");
        assert_eq!(settings.authenticator.attestation, AttestationMode::Packed);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_from_toml_str_rejects_unknown_attestation() {
        assert!(Settings::from_toml_str("[authenticator]\nattestation = \"indirect\"\n").is_err());
    }
}
