//! COSE_Key encoding for EC2 / ES256 / P-256 public keys
//!
//! Layout (RFC 8152 section 13.1.1), emitted in this key order:
//! `{1: 2, 3: -7, -1: 1, -2: x, -3: y}`

use ciborium::value::Value;
use p256::ecdsa::VerifyingKey;
use p256::EncodedPoint;

use super::cbor;
use super::errors::AuthenticatorError;

pub const COSE_KEY_TYPE: i64 = 1;
pub const COSE_KEY_ALG: i64 = 3;
pub const COSE_EC2_CRV: i64 = -1;
pub const COSE_EC2_X: i64 = -2;
pub const COSE_EC2_Y: i64 = -3;

pub const COSE_KTY_EC2: i64 = 2;
pub const COSE_ALG_ES256: i64 = -7;
pub const COSE_CRV_P256: i64 = 1;

/// Width of a P-256 field element
pub const COORDINATE_LENGTH: usize = 32;

/// Affine coordinates of an EC2 P-256 public key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoseEc2Key {
    pub x: [u8; COORDINATE_LENGTH],
    pub y: [u8; COORDINATE_LENGTH],
}

impl CoseEc2Key {
    /// Extract fixed-width coordinates from a verifying key
    ///
    /// # Errors
    /// Returns `InternalError` if the point is not an affine, uncompressed point
    pub fn from_verifying_key(key: &VerifyingKey) -> Result<Self, AuthenticatorError> {
        let point = key.to_encoded_point(false);
        let (Some(x), Some(y)) = (point.x(), point.y()) else {
            return Err(AuthenticatorError::InternalError(
                "Public key is not an uncompressed affine point".to_string(),
            ));
        };
        Ok(Self {
            x: fixed_coordinate(x)?,
            y: fixed_coordinate(y)?,
        })
    }

    /// Rebuild the verifying key (uncompressed SEC1: `0x04 || x || y`)
    ///
    /// # Errors
    /// Returns `VerificationFailed` if the coordinates are not on P-256
    pub fn to_verifying_key(&self) -> Result<VerifyingKey, AuthenticatorError> {
        let mut sec1 = Vec::with_capacity(1 + 2 * COORDINATE_LENGTH);
        sec1.push(0x04);
        sec1.extend_from_slice(&self.x);
        sec1.extend_from_slice(&self.y);

        let point = EncodedPoint::from_bytes(&sec1).map_err(|e| {
            AuthenticatorError::VerificationFailed(format!("Invalid EC point: {e}"))
        })?;
        VerifyingKey::from_encoded_point(&point)
            .map_err(|e| AuthenticatorError::VerificationFailed(format!("Invalid ECDSA key: {e}")))
    }

    fn to_value(&self) -> Value {
        Value::Map(vec![
            (cbor::int(COSE_KEY_TYPE), cbor::int(COSE_KTY_EC2)),
            (cbor::int(COSE_KEY_ALG), cbor::int(COSE_ALG_ES256)),
            (cbor::int(COSE_EC2_CRV), cbor::int(COSE_CRV_P256)),
            (cbor::int(COSE_EC2_X), Value::Bytes(self.x.to_vec())),
            (cbor::int(COSE_EC2_Y), Value::Bytes(self.y.to_vec())),
        ])
    }
}

/// Encode a coordinate as exactly 32 big-endian bytes, left-padding with zero
///
/// A longer input cannot come from a healthy P-256 implementation and is
/// reported as `InternalError`.
pub fn fixed_coordinate(bytes: &[u8]) -> Result<[u8; COORDINATE_LENGTH], AuthenticatorError> {
    if bytes.len() > COORDINATE_LENGTH {
        return Err(AuthenticatorError::InternalError(format!(
            "EC coordinate is {} bytes, expected at most {COORDINATE_LENGTH}",
            bytes.len()
        )));
    }
    let mut out = [0u8; COORDINATE_LENGTH];
    out[COORDINATE_LENGTH - bytes.len()..].copy_from_slice(bytes);
    Ok(out)
}

/// Serialize a public key into COSE_Key CBOR bytes
///
/// # Errors
/// Returns `InternalError` on a malformed point, `EncodingError` if CBOR
/// serialization fails
pub fn encode_public_key(key: &VerifyingKey) -> Result<Vec<u8>, AuthenticatorError> {
    let cose_key = CoseEc2Key::from_verifying_key(key)?;
    cbor::encode(&cose_key.to_value())
}

/// Parse COSE_Key bytes back into coordinates
///
/// Only EC2 keys with alg ES256 on curve P-256 are accepted, and both
/// coordinates must be exactly 32 bytes.
///
/// # Errors
/// Returns `EncodingError` for malformed CBOR, `VerificationFailed` for an
/// unsupported or inconsistent key
pub fn decode_cose_key(bytes: &[u8]) -> Result<CoseEc2Key, AuthenticatorError> {
    let value = cbor::decode(bytes)?;
    let Some(map) = value.as_map() else {
        return Err(AuthenticatorError::EncodingError(
            "COSE key is not a CBOR map".to_string(),
        ));
    };

    let expect = |label: i64, expected: i64, name: &str| -> Result<(), AuthenticatorError> {
        match cbor::get_int_key(map, label).and_then(cbor::as_i64) {
            Some(actual) if actual == expected => Ok(()),
            Some(actual) => Err(AuthenticatorError::VerificationFailed(format!(
                "Unsupported COSE {name}: {actual}"
            ))),
            None => Err(AuthenticatorError::VerificationFailed(format!(
                "Missing COSE {name}"
            ))),
        }
    };
    expect(COSE_KEY_TYPE, COSE_KTY_EC2, "kty")?;
    expect(COSE_KEY_ALG, COSE_ALG_ES256, "alg")?;
    expect(COSE_EC2_CRV, COSE_CRV_P256, "crv")?;

    let coordinate = |label: i64, name: &str| -> Result<[u8; COORDINATE_LENGTH], AuthenticatorError> {
        let bytes = cbor::get_int_key(map, label)
            .and_then(Value::as_bytes)
            .ok_or_else(|| {
                AuthenticatorError::VerificationFailed(format!(
                    "Missing or invalid {name} coordinate"
                ))
            })?;
        <[u8; COORDINATE_LENGTH]>::try_from(bytes.as_slice()).map_err(|_| {
            AuthenticatorError::VerificationFailed(format!(
                "{name} coordinate must be {COORDINATE_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })
    };

    Ok(CoseEc2Key {
        x: coordinate(COSE_EC2_X, "x")?,
        y: coordinate(COSE_EC2_Y, "y")?,
    })
}
