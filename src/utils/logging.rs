// Centralized logging for authenticator events
use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::authenticator::Aaguid;

pub struct LoggingHelper;

impl LoggingHelper {
    /// Log a completed registration
    pub fn log_credential_registered(
        credential_id: &str,
        fmt: &str,
        aaguid: &Aaguid,
        created_at: DateTime<Utc>,
    ) {
        info!(
            "Registered credential {} (fmt={}, aaguid={}, created_at={})",
            credential_id,
            fmt,
            aaguid,
            created_at.to_rfc3339()
        );
    }

    /// Log a signed assertion
    pub fn log_assertion_generated(credential_id: &str, sign_count: u32) {
        info!(
            "Generated assertion for credential {} (signCount={})",
            credential_id, sign_count
        );
    }

    /// Log an authentication attempt against an unregistered credential
    pub fn log_unknown_credential(credential_id: &str) {
        warn!("KeyPair not found for credential ID: {}", credential_id);
    }

    /// Log where settings were loaded from
    pub fn log_settings_source(source: &str) {
        info!("Loaded authenticator settings from {}", source);
    }

    /// Log the effective relying party parameters
    pub fn log_effective_settings(rp_id: &str, origin: &str, sign_count: u32) {
        debug!(
            "Authenticator settings: rp_id={}, origin={}, sign_count={}",
            rp_id, origin, sign_count
        );
    }
}
