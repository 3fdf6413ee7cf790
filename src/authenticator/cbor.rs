//! CBOR processing for `WebAuthn`
//!
//! Thin helpers over `ciborium` values. Maps are kept as ordered vectors so
//! that emitted key order is exactly the insertion order.

use ciborium::value::{Integer, Value};

use super::errors::AuthenticatorError;

/// Serialize a CBOR value into a fresh buffer
pub fn encode(value: &Value) -> Result<Vec<u8>, AuthenticatorError> {
    let mut bytes = Vec::new();
    ciborium::ser::into_writer(value, &mut bytes)
        .map_err(|e| AuthenticatorError::EncodingError(format!("CBOR encoding failed: {e}")))?;
    Ok(bytes)
}

/// Parse a single CBOR value
pub fn decode(bytes: &[u8]) -> Result<Value, AuthenticatorError> {
    ciborium::de::from_reader(bytes)
        .map_err(|_| AuthenticatorError::EncodingError("Invalid CBOR format".to_string()))
}

pub fn int(value: i64) -> Value {
    Value::Integer(value.into())
}

pub fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

/// Look up a map entry by an integer key
pub fn get_int_key(map: &[(Value, Value)], key: i64) -> Option<&Value> {
    let key = Integer::from(key);
    map.iter()
        .find(|(k, _)| k.as_integer() == Some(key))
        .map(|(_, v)| v)
}

/// Look up a map entry by a text key
pub fn get_text_key<'a>(map: &'a [(Value, Value)], key: &str) -> Option<&'a Value> {
    map.iter()
        .find(|(k, _)| k.as_text() == Some(key))
        .map(|(_, v)| v)
}

/// Read an integer value as `i64`, rejecting anything out of range
pub fn as_i64(value: &Value) -> Option<i64> {
    value.as_integer().and_then(|i| i64::try_from(i).ok())
}
