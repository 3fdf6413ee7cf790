//! Virtual `WebAuthn` authenticator
//!
//! This module produces registration (attestation) and authentication
//! (assertion) responses that are valid at the protocol level, backed by
//! in-memory P-256 keys. It also carries the decoding and verification helpers
//! a test needs to check those responses from the relying party's side.

mod attestation;
mod auth_data;
mod cbor;
mod client_data;
mod cose;
mod crypto;
mod errors;
mod registry;
mod service;
mod settings;
mod types;
mod verify;

// Re-exports for public use
pub use attestation::{
    build_attestation_object, decode_attestation_object, decode_attestation_object_b64,
    AttestationMode, AttestationStatement, DecodedAttestation, PLACEHOLDER_SIGNATURE_LENGTH,
};
pub use auth_data::{
    build_for_authentication, build_for_registration, parse_authenticator_data, Aaguid,
    AttestedCredentialData, ParsedAuthenticatorData, AUTHENTICATION_FLAGS, FIXED_HEADER_LENGTH,
    FLAG_AT, FLAG_UP, FLAG_UV, REGISTRATION_FLAGS,
};
pub use client_data::{
    build_client_data_json, decode_client_data_json, parse_client_data, to_assertion_response,
    to_credential_response, verify_client_data, ClientData, ClientDataType,
};
pub use cose::{decode_cose_key, encode_public_key, fixed_coordinate, CoseEc2Key};
pub use crypto::{assertion_digest, generate_challenge, sha256, sign_assertion};
pub use errors::AuthenticatorError;
pub use registry::{KeyPairRecord, KeyRegistry, CREDENTIAL_ID_LENGTH};
pub use service::VirtualAuthenticator;
pub use settings::{AuthenticatorSettings, DEFAULT_ORIGIN, DEFAULT_RP_ID, DEFAULT_SIGN_COUNT};
pub use types::*;
pub use verify::verify_assertion;
