//! Test fixtures providing pre-built test objects

use rand::distr::Alphanumeric;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::authenticator::{
    AuthenticationChallenge, AuthenticatorSettings, ChallengeUser, RegistrationChallenge,
    VirtualAuthenticator,
};

use super::constants::TEST_CHALLENGE;

const FIRST_NAMES: &[&str] = &["Aiko", "Ben", "Chiara", "Dmitri", "Emeka", "Freya", "Gustavo"];
const LAST_NAMES: &[&str] = &["Tanaka", "Okafor", "Rossi", "Ivanova", "Lindqvist", "Silva"];
const DOMAINS: &[&str] = &["example.com", "example.org", "example.net"];

/// Canned user entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestUser {
    pub username: String,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
}

/// Random 32-character alphanumeric challenge
#[must_use]
pub fn generate_random_challenge() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Random user with an e-mail username and a `first.last` display name
#[must_use]
pub fn generate_random_user() -> TestUser {
    let mut rng = rand::rng();
    let first_name = FIRST_NAMES.choose(&mut rng).copied().unwrap_or("Test");
    let last_name = LAST_NAMES.choose(&mut rng).copied().unwrap_or("User");
    let domain = DOMAINS.choose(&mut rng).copied().unwrap_or("example.com");
    let suffix: u16 = rng.random();

    TestUser {
        username: format!(
            "{}.{}{suffix}@{domain}",
            first_name.to_lowercase(),
            last_name.to_lowercase()
        ),
        display_name: format!("{}.{}", first_name.to_lowercase(), last_name.to_lowercase()),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
    }
}

/// Canned user data shared by relying-party test suites
pub struct MockUserData;

impl MockUserData {
    pub const STANDARD: (&'static str, &'static str) = ("test@example.com", "test.user");
    pub const DISCOVERABLE: (&'static str, &'static str) =
        ("discoverable@example.com", "discoverable.user");
    pub const INTEGRATION: (&'static str, &'static str) =
        ("integration@example.com", "integration.user");
}

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    /// User registered by standard (non-discoverable) flows
    #[must_use]
    pub fn standard_user() -> TestUser {
        Self::canned_user(MockUserData::STANDARD)
    }

    /// User registered with a resident key
    #[must_use]
    pub fn discoverable_user() -> TestUser {
        Self::canned_user(MockUserData::DISCOVERABLE)
    }

    /// User for end-to-end integration scenarios
    #[must_use]
    pub fn integration_user() -> TestUser {
        Self::canned_user(MockUserData::INTEGRATION)
    }

    /// Authenticator with default settings and a private registry
    ///
    /// # Panics
    /// Never with default settings, which always validate
    #[must_use]
    pub fn authenticator() -> VirtualAuthenticator {
        VirtualAuthenticator::new(AuthenticatorSettings::default())
            .expect("default settings are valid")
    }

    /// Registration challenge with the fixed `abc123` challenge
    #[must_use]
    pub fn registration_challenge() -> RegistrationChallenge {
        RegistrationChallenge {
            challenge: TEST_CHALLENGE.to_string(),
            user: None,
        }
    }

    /// Registration challenge with a random challenge and user
    #[must_use]
    pub fn random_registration_challenge() -> RegistrationChallenge {
        let user = generate_random_user();
        RegistrationChallenge {
            challenge: generate_random_challenge(),
            user: Some(ChallengeUser {
                id: Some(uuid::Uuid::new_v4().simple().to_string()),
                name: Some(user.username),
                display_name: Some(user.display_name),
            }),
        }
    }

    /// Authentication challenge, optionally naming a user handle
    #[must_use]
    pub fn authentication_challenge(user_handle: Option<&str>) -> AuthenticationChallenge {
        AuthenticationChallenge {
            challenge: generate_random_challenge(),
            user: user_handle.map(|id| ChallengeUser {
                id: Some(id.to_string()),
                ..ChallengeUser::default()
            }),
        }
    }

    fn canned_user((username, display_name): (&str, &str)) -> TestUser {
        let (first_name, last_name) = display_name.split_once('.').unwrap_or((display_name, ""));
        TestUser {
            username: username.to_string(),
            display_name: display_name.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        }
    }
}
