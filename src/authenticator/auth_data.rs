//! Authenticator data
//!
//! Binary layout:
//! - 32 bytes: RP ID hash (SHA-256)
//! - 1 byte: flags
//! - 4 bytes: signature counter (big-endian)
//! - registration only (AT flag set):
//!   - 16 bytes: AAGUID
//!   - 2 bytes: credential ID length L (big-endian)
//!   - L bytes: credential ID
//!   - variable: COSE public key

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use super::crypto;
use super::errors::AuthenticatorError;

/// User present
pub const FLAG_UP: u8 = 0x01;
/// User verified
pub const FLAG_UV: u8 = 0x04;
/// Attested credential data included
pub const FLAG_AT: u8 = 0x40;

pub const REGISTRATION_FLAGS: u8 = FLAG_UP | FLAG_UV | FLAG_AT;
pub const AUTHENTICATION_FLAGS: u8 = FLAG_UP | FLAG_UV;

/// RP ID hash + flags + counter
pub const FIXED_HEADER_LENGTH: usize = 37;
const AAGUID_LENGTH: usize = 16;

/// Authenticator attestation GUID
///
/// Defaults to all zeros. Parsed from hex with any hyphens removed; exactly
/// 32 hex characters must remain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Aaguid([u8; AAGUID_LENGTH]);

impl Aaguid {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; AAGUID_LENGTH]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; AAGUID_LENGTH] {
        &self.0
    }

    /// Parse a hex AAGUID, hyphenated or not
    ///
    /// # Errors
    /// Returns `InvalidAaguid` if the hyphen-free form is not 32 hex characters
    pub fn parse(input: &str) -> Result<Self, AuthenticatorError> {
        let hex: String = input.chars().filter(|c| *c != '-').collect();
        if hex.len() != 2 * AAGUID_LENGTH {
            return Err(AuthenticatorError::InvalidAaguid(format!(
                "AAGUID must be 32 hex characters (16 bytes), got {}",
                hex.len()
            )));
        }
        // A 32-character string is only accepted by uuid in its simple (pure hex) form
        let uuid = Uuid::try_parse(&hex).map_err(|e| {
            AuthenticatorError::InvalidAaguid(format!("AAGUID is not valid hex: {e}"))
        })?;
        Ok(Self(uuid.into_bytes()))
    }
}

impl FromStr for Aaguid {
    type Err = AuthenticatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Aaguid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Uuid::from_bytes(self.0).hyphenated())
    }
}

impl Serialize for Aaguid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Aaguid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Build authenticator data for a registration (flags `0x45`, counter 0)
///
/// # Errors
/// Returns `InternalError` if the credential ID does not fit a u16 length
pub fn build_for_registration(
    rp_id: &str,
    credential_id: &[u8],
    cose_public_key: &[u8],
    aaguid: &Aaguid,
) -> Result<Vec<u8>, AuthenticatorError> {
    let id_len = u16::try_from(credential_id.len()).map_err(|_| {
        AuthenticatorError::InternalError(format!(
            "Credential ID too long: {} bytes",
            credential_id.len()
        ))
    })?;

    let mut data = Vec::with_capacity(
        FIXED_HEADER_LENGTH + AAGUID_LENGTH + 2 + credential_id.len() + cose_public_key.len(),
    );
    write_header(&mut data, rp_id, REGISTRATION_FLAGS, 0);
    data.extend_from_slice(aaguid.as_bytes());
    data.extend_from_slice(&id_len.to_be_bytes());
    data.extend_from_slice(credential_id);
    data.extend_from_slice(cose_public_key);
    Ok(data)
}

/// Build authenticator data for an assertion (flags `0x05`)
#[must_use]
pub fn build_for_authentication(rp_id: &str, sign_count: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(FIXED_HEADER_LENGTH);
    write_header(&mut data, rp_id, AUTHENTICATION_FLAGS, sign_count);
    data
}

fn write_header(data: &mut Vec<u8>, rp_id: &str, flags: u8, sign_count: u32) {
    data.extend_from_slice(&crypto::sha256(rp_id.as_bytes()));
    data.push(flags);
    data.extend_from_slice(&sign_count.to_be_bytes());
}

/// Attested credential data carried by registration authenticator data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestedCredentialData {
    pub aaguid: Aaguid,
    pub credential_id: Vec<u8>,
    /// Raw COSE_Key bytes
    pub credential_public_key: Vec<u8>,
}

/// Decoded authenticator data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAuthenticatorData {
    pub rp_id_hash: [u8; 32],
    pub flags: u8,
    pub sign_count: u32,
    pub attested_credential: Option<AttestedCredentialData>,
}

impl ParsedAuthenticatorData {
    #[must_use]
    pub fn user_present(&self) -> bool {
        self.flags & FLAG_UP != 0
    }

    #[must_use]
    pub fn user_verified(&self) -> bool {
        self.flags & FLAG_UV != 0
    }
}

/// Parse authenticator data
///
/// The COSE key is delimited by decoding exactly one CBOR item, so trailing
/// extension data does not end up inside `credential_public_key`.
///
/// # Errors
/// Returns `EncodingError` if the data is truncated or the key is not CBOR
pub fn parse_authenticator_data(data: &[u8]) -> Result<ParsedAuthenticatorData, AuthenticatorError> {
    if data.len() < FIXED_HEADER_LENGTH {
        return Err(AuthenticatorError::EncodingError(
            "Auth data too short".to_string(),
        ));
    }

    let mut rp_id_hash = [0u8; 32];
    rp_id_hash.copy_from_slice(&data[..32]);
    let flags = data[32];
    let sign_count = u32::from_be_bytes([data[33], data[34], data[35], data[36]]);

    let attested_credential = if flags & FLAG_AT == 0 {
        None
    } else {
        Some(parse_attested_credential(&data[FIXED_HEADER_LENGTH..])?)
    };

    Ok(ParsedAuthenticatorData {
        rp_id_hash,
        flags,
        sign_count,
        attested_credential,
    })
}

fn parse_attested_credential(data: &[u8]) -> Result<AttestedCredentialData, AuthenticatorError> {
    if data.len() < AAGUID_LENGTH + 2 {
        return Err(AuthenticatorError::EncodingError(
            "Auth data too short for credential ID length".to_string(),
        ));
    }

    let mut aaguid = [0u8; AAGUID_LENGTH];
    aaguid.copy_from_slice(&data[..AAGUID_LENGTH]);
    let mut pos = AAGUID_LENGTH;

    let id_len = usize::from(u16::from_be_bytes([data[pos], data[pos + 1]]));
    pos += 2;

    if data.len() < pos + id_len {
        return Err(AuthenticatorError::EncodingError(
            "Auth data too short for credential ID".to_string(),
        ));
    }
    let credential_id = data[pos..pos + id_len].to_vec();
    pos += id_len;

    if data.len() <= pos {
        return Err(AuthenticatorError::EncodingError(
            "Auth data too short for public key".to_string(),
        ));
    }

    let mut remaining = &data[pos..];
    let before = remaining.len();
    let _: ciborium::value::Value = ciborium::de::from_reader(&mut remaining).map_err(|_| {
        AuthenticatorError::EncodingError("Invalid CBOR public key".to_string())
    })?;
    let key_len = before - remaining.len();
    let credential_public_key = data[pos..pos + key_len].to_vec();

    Ok(AttestedCredentialData {
        aaguid: Aaguid(aaguid),
        credential_id,
        credential_public_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authenticator::cbor;

    const SAMPLE_AAGUID: &str = "adce0002-35bc-c60a-648b-0b25f1f05503";

    #[test]
    fn test_aaguid_parse_hyphenated_and_plain() {
        let hyphenated = Aaguid::parse(SAMPLE_AAGUID).unwrap();
        let plain = Aaguid::parse("adce000235bcc60a648b0b25f1f05503").unwrap();
        assert_eq!(hyphenated, plain);
        assert_eq!(hyphenated.as_bytes()[..4], [0xad, 0xce, 0x00, 0x02]);
        assert_eq!(hyphenated.to_string(), SAMPLE_AAGUID);
    }

    #[test]
    fn test_aaguid_rejects_wrong_length() {
        for input in ["", "abcd", "adce000235bcc60a648b0b25f1f0550", "adce000235bcc60a648b0b25f1f0550300"] {
            let err = Aaguid::parse(input).unwrap_err();
            assert!(matches!(err, AuthenticatorError::InvalidAaguid(_)), "{input}");
        }
    }

    #[test]
    fn test_aaguid_rejects_non_hex() {
        let err = Aaguid::parse("zzce000235bcc60a648b0b25f1f05503").unwrap_err();
        assert!(matches!(err, AuthenticatorError::InvalidAaguid(_)));
    }

    #[test]
    fn test_aaguid_default_is_zero() {
        assert_eq!(Aaguid::default().as_bytes(), &[0u8; 16]);
        assert_eq!(
            Aaguid::default().to_string(),
            "00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_authentication_layout() {
        let data = build_for_authentication("localhost", 1);
        assert_eq!(data.len(), FIXED_HEADER_LENGTH);
        assert_eq!(data[..32], crypto::sha256(b"localhost"));
        assert_eq!(data[32], 0x05);
        assert_eq!(data[33..], [0, 0, 0, 1]);
    }

    #[test]
    fn test_registration_layout() {
        let credential_id = [7u8; 32];
        let cose_key = cbor::encode(&cbor::int(1)).unwrap();
        let aaguid = Aaguid::parse(SAMPLE_AAGUID).unwrap();

        let data = build_for_registration("localhost", &credential_id, &cose_key, &aaguid).unwrap();
        assert_eq!(data.len(), 37 + 16 + 2 + 32 + cose_key.len());
        assert_eq!(data[32], 0x45);
        assert_eq!(data[33..37], [0, 0, 0, 0]);
        assert_eq!(&data[37..53], aaguid.as_bytes());
        assert_eq!(data[53..55], [0x00, 0x20]);
        assert_eq!(data[55..87], credential_id);
    }

    #[test]
    fn test_parse_registration_data() {
        let credential_id = vec![9u8; 16];
        let cose_key = cbor::encode(&cbor::text("key")).unwrap();
        let mut data =
            build_for_registration("localhost", &credential_id, &cose_key, &Aaguid::default())
                .unwrap();
        // Trailing bytes after the key must not be swallowed
        data.extend_from_slice(&[0xa0]);

        let parsed = parse_authenticator_data(&data).unwrap();
        assert_eq!(parsed.rp_id_hash, crypto::sha256(b"localhost"));
        assert!(parsed.user_present());
        assert!(parsed.user_verified());
        assert_eq!(parsed.sign_count, 0);

        let attested = parsed.attested_credential.unwrap();
        assert_eq!(attested.credential_id, credential_id);
        assert_eq!(attested.credential_public_key, cose_key);
        assert_eq!(attested.aaguid, Aaguid::default());
    }

    #[test]
    fn test_parse_authentication_data() {
        let parsed = parse_authenticator_data(&build_for_authentication("localhost", 42)).unwrap();
        assert_eq!(parsed.flags, AUTHENTICATION_FLAGS);
        assert_eq!(parsed.sign_count, 42);
        assert!(parsed.attested_credential.is_none());
    }

    #[test]
    fn test_parse_truncated_data() {
        assert!(parse_authenticator_data(&[0u8; 36]).is_err());

        let mut data = build_for_authentication("localhost", 0);
        data[32] = REGISTRATION_FLAGS;
        data.extend_from_slice(&[0u8; 16]);
        data.extend_from_slice(&[0x00, 0x20, 1, 2, 3]);
        assert!(parse_authenticator_data(&data).is_err());
    }
}
