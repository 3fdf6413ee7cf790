//! Testing utilities for relying-party test suites
//!
//! Available with the `testing` feature.
//!
//! - [`fixtures`] - Random challenges and users, canned user data, ready
//!   authenticators
//!
//! ## Usage
//!
//! ```rust
//! use virtual_webauthn::testing::TestFixtures;
//! use virtual_webauthn::RegistrationOptions;
//!
//! let authenticator = TestFixtures::authenticator();
//! let challenge = TestFixtures::registration_challenge();
//! let credential = authenticator
//!     .register(&challenge, &RegistrationOptions::default())
//!     .unwrap();
//! assert_eq!(credential.id, credential.raw_id);
//! ```

pub mod fixtures;

pub use fixtures::{
    generate_random_challenge, generate_random_user, MockUserData, TestFixtures, TestUser,
};

/// Common test constants
pub mod constants {
    /// Challenge used by the canned registration scenario
    pub const TEST_CHALLENGE: &str = "abc123";

    /// AAGUID used by tests that need a non-zero value
    pub const TEST_AAGUID: &str = "adce0002-35bc-c60a-648b-0b25f1f05503";

    /// Base64URL user handle (`test_user_handle`)
    pub const TEST_USER_HANDLE: &str = "dGVzdF91c2VyX2hhbmRsZQ";
}
