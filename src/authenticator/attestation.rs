//! Attestation objects
//!
//! `{fmt, attStmt, authData}` in that key order. The packed variant carries a
//! random placeholder in `sig`: it is not a signature over anything and a
//! relying party that verifies packed attestation must reject it.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ciborium::value::Value;
use serde::{Deserialize, Serialize};

use super::cbor;
use super::cose::COSE_ALG_ES256;
use super::crypto;
use super::errors::AuthenticatorError;

/// Length of the placeholder `sig` in packed attestation statements
pub const PLACEHOLDER_SIGNATURE_LENGTH: usize = 32;

/// Attestation conveyance requested from the authenticator
///
/// `"none"` yields `fmt: "none"` with an empty statement; `"direct"` yields a
/// self-made `fmt: "packed"` statement for exercising rejection paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttestationMode {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "direct", alias = "packed")]
    Packed,
}

impl AttestationMode {
    /// Attestation statement format identifier written to `fmt`
    #[must_use]
    pub fn format(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Packed => "packed",
        }
    }
}

/// Wrap authenticator data into a CBOR attestation object
///
/// # Errors
/// Returns `InternalError` if the RNG fails, `EncodingError` if CBOR
/// serialization fails
pub fn build_attestation_object(
    auth_data: &[u8],
    mode: AttestationMode,
) -> Result<Vec<u8>, AuthenticatorError> {
    let statement = match mode {
        AttestationMode::None => Value::Map(Vec::new()),
        AttestationMode::Packed => {
            let placeholder = crypto::random_bytes::<PLACEHOLDER_SIGNATURE_LENGTH>()?;
            Value::Map(vec![
                (cbor::text("alg"), cbor::int(COSE_ALG_ES256)),
                (cbor::text("sig"), Value::Bytes(placeholder.to_vec())),
            ])
        }
    };

    cbor::encode(&Value::Map(vec![
        (cbor::text("fmt"), cbor::text(mode.format())),
        (cbor::text("attStmt"), statement),
        (cbor::text("authData"), Value::Bytes(auth_data.to_vec())),
    ]))
}

/// Attestation statement fields this authenticator can emit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttestationStatement {
    pub alg: Option<i64>,
    pub sig: Option<Vec<u8>>,
}

impl AttestationStatement {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alg.is_none() && self.sig.is_none()
    }
}

/// Decoded attestation object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAttestation {
    pub fmt: String,
    pub att_stmt: AttestationStatement,
    pub auth_data: Vec<u8>,
}

/// Decode CBOR attestation object bytes
///
/// # Errors
/// Returns `EncodingError` if the CBOR is malformed or a required field is
/// missing
pub fn decode_attestation_object(bytes: &[u8]) -> Result<DecodedAttestation, AuthenticatorError> {
    let attestation = cbor::decode(bytes)?;
    let Some(map) = attestation.as_map() else {
        return Err(AuthenticatorError::EncodingError(
            "Attestation object is not a CBOR map".to_string(),
        ));
    };

    let Some(fmt) = cbor::get_text_key(map, "fmt").and_then(Value::as_text) else {
        return Err(AuthenticatorError::EncodingError(
            "Missing fmt in attestation".to_string(),
        ));
    };

    let Some(statement) = cbor::get_text_key(map, "attStmt").and_then(Value::as_map) else {
        return Err(AuthenticatorError::EncodingError(
            "Missing attStmt in attestation".to_string(),
        ));
    };

    let Some(auth_data) = cbor::get_text_key(map, "authData").and_then(Value::as_bytes) else {
        return Err(AuthenticatorError::EncodingError(
            "Missing authData in attestation".to_string(),
        ));
    };

    Ok(DecodedAttestation {
        fmt: fmt.to_string(),
        att_stmt: AttestationStatement {
            alg: cbor::get_text_key(statement, "alg").and_then(cbor::as_i64),
            sig: cbor::get_text_key(statement, "sig")
                .and_then(Value::as_bytes)
                .cloned(),
        },
        auth_data: auth_data.clone(),
    })
}

/// Decode a Base64URL attestation object as sent over JSON
///
/// # Errors
/// Returns `EncodingError` for bad Base64URL or a malformed object
pub fn decode_attestation_object_b64(
    attestation_object_b64: &str,
) -> Result<DecodedAttestation, AuthenticatorError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(attestation_object_b64)
        .map_err(|_| AuthenticatorError::EncodingError("Invalid attestation encoding".to_string()))?;
    decode_attestation_object(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_attestation() {
        let bytes = build_attestation_object(&[1, 2, 3], AttestationMode::None).unwrap();
        let decoded = decode_attestation_object(&bytes).unwrap();

        assert_eq!(decoded.fmt, "none");
        assert!(decoded.att_stmt.is_empty());
        assert_eq!(decoded.auth_data, vec![1, 2, 3]);
    }

    #[test]
    fn test_packed_attestation_has_placeholder_signature() {
        let bytes = build_attestation_object(&[4, 5], AttestationMode::Packed).unwrap();
        let decoded = decode_attestation_object(&bytes).unwrap();

        assert_eq!(decoded.fmt, "packed");
        assert_eq!(decoded.att_stmt.alg, Some(-7));
        assert_eq!(
            decoded.att_stmt.sig.map(|sig| sig.len()),
            Some(PLACEHOLDER_SIGNATURE_LENGTH)
        );
    }

    #[test]
    fn test_key_order_is_fmt_attstmt_authdata() {
        let bytes = build_attestation_object(&[], AttestationMode::None).unwrap();
        let value = cbor::decode(&bytes).unwrap();
        let keys: Vec<_> = value
            .as_map()
            .unwrap()
            .iter()
            .filter_map(|(k, _)| k.as_text())
            .collect();
        assert_eq!(keys, ["fmt", "attStmt", "authData"]);
    }

    #[test]
    fn test_mode_serde_names() {
        let mode: AttestationMode = serde_json::from_str("\"direct\"").unwrap();
        assert_eq!(mode, AttestationMode::Packed);
        let mode: AttestationMode = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(mode, AttestationMode::None);
        assert!(serde_json::from_str::<AttestationMode>("\"dircet\"").is_err());
        assert_eq!(serde_json::to_string(&AttestationMode::Packed).unwrap(), "\"direct\"");
    }

    #[test]
    fn test_decode_rejects_missing_auth_data() {
        let bytes = cbor::encode(&Value::Map(vec![
            (cbor::text("fmt"), cbor::text("none")),
            (cbor::text("attStmt"), Value::Map(Vec::new())),
        ]))
        .unwrap();
        assert!(decode_attestation_object(&bytes).is_err());
        assert!(decode_attestation_object_b64("invalid base64!@#").is_err());
    }
}
