#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the virtual-webauthn crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod authenticator;
pub mod settings;
pub mod utils;

#[cfg(feature = "testing")]
pub mod testing;

/// Re-export commonly used items
pub use authenticator::{
    verify_assertion, AssertionOptions, AssertionResponse, AttestationMode,
    AuthenticationChallenge, AuthenticatorError, AuthenticatorSettings, ChallengeUser,
    CredentialResponse, KeyRegistry, RegistrationChallenge, RegistrationOptions,
    VirtualAuthenticator,
};
pub use settings::Settings;
