//! In-memory key registry
//!
//! Holds one P-256 key pair per credential ID for the lifetime of the
//! registry. Entries are never evicted or mutated once inserted.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use log::debug;
use p256::ecdsa::{SigningKey, VerifyingKey};
use p256::pkcs8::{DecodePrivateKey, EncodePrivateKey, LineEnding};
use p256::SecretKey;

use super::crypto;
use super::errors::AuthenticatorError;

/// Length of freshly generated credential IDs, in bytes
pub const CREDENTIAL_ID_LENGTH: usize = 32;

/// Key pair bound to a single credential
#[derive(Debug, Clone)]
pub struct KeyPairRecord {
    credential_id: Vec<u8>,
    encoded_id: String,
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
    created_at: DateTime<Utc>,
}

impl KeyPairRecord {
    fn new(credential_id: Vec<u8>, signing_key: SigningKey) -> Self {
        let verifying_key = VerifyingKey::from(&signing_key);
        Self {
            encoded_id: URL_SAFE_NO_PAD.encode(&credential_id),
            credential_id,
            signing_key,
            verifying_key,
            created_at: Utc::now(),
        }
    }

    /// Raw credential ID bytes
    #[must_use]
    pub fn credential_id(&self) -> &[u8] {
        &self.credential_id
    }

    /// Base64URL (unpadded) form of the credential ID, used as registry key
    #[must_use]
    pub fn encoded_id(&self) -> &str {
        &self.encoded_id
    }

    #[must_use]
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    #[must_use]
    pub fn public_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Concurrent map from Base64URL credential ID to key pair
#[derive(Debug, Default)]
pub struct KeyRegistry {
    records: RwLock<HashMap<String, Arc<KeyPairRecord>>>,
}

impl KeyRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a key pair under a fresh 32-byte random credential ID
    ///
    /// # Errors
    /// Returns `InternalError` if the system RNG fails
    pub fn generate_credential(&self) -> Result<Arc<KeyPairRecord>, AuthenticatorError> {
        let signing_key = crypto::generate_signing_key();
        let credential_id = crypto::random_bytes::<CREDENTIAL_ID_LENGTH>()?.to_vec();
        let record = Arc::new(KeyPairRecord::new(credential_id, signing_key));
        self.insert(Arc::clone(&record));
        debug!("Generated key pair for credential {}", record.encoded_id());
        Ok(record)
    }

    /// Find the key pair registered under a Base64URL credential ID
    #[must_use]
    pub fn lookup(&self, credential_id: &str) -> Option<Arc<KeyPairRecord>> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(credential_id)
            .cloned()
    }

    /// Like [`lookup`](Self::lookup), but an absent credential is an error
    ///
    /// # Errors
    /// Returns `CredentialNotFound` if the ID was never registered here
    pub fn require(&self, credential_id: &str) -> Result<Arc<KeyPairRecord>, AuthenticatorError> {
        self.lookup(credential_id)
            .ok_or_else(|| AuthenticatorError::CredentialNotFound(credential_id.to_string()))
    }

    #[must_use]
    pub fn contains(&self, credential_id: &str) -> bool {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(credential_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Export a credential's private key as PKCS#8 PEM
    ///
    /// Lets a later process re-import the key and keep authenticating with
    /// the same credential.
    ///
    /// # Errors
    /// Returns `CredentialNotFound` for unknown IDs, `EncodingError` if PEM
    /// serialization fails
    pub fn export_private_key_pem(&self, credential_id: &str) -> Result<String, AuthenticatorError> {
        let record = self.require(credential_id)?;
        let pem = record
            .signing_key()
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| AuthenticatorError::EncodingError(format!("PKCS#8 export failed: {e}")))?;
        Ok(pem.as_str().to_owned())
    }

    /// Register a previously exported private key under its credential ID
    ///
    /// # Errors
    /// Returns `EncodingError` if the credential ID is not Base64URL or the
    /// PEM document is not a P-256 PKCS#8 private key
    pub fn import_private_key_pem(
        &self,
        credential_id: &str,
        pem: &str,
    ) -> Result<Arc<KeyPairRecord>, AuthenticatorError> {
        let signing_key = SigningKey::from_pkcs8_pem(pem)
            .map_err(|e| AuthenticatorError::EncodingError(format!("Invalid PKCS#8 key: {e}")))?;
        self.import_signing_key(credential_id, signing_key)
    }

    /// Export a credential's private key as an EC JWK (`kty`, `crv`, `x`, `y`, `d`)
    ///
    /// Same document shape WebCrypto produces with `exportKey("jwk", ...)`.
    ///
    /// # Errors
    /// Returns `CredentialNotFound` for unknown IDs, `InternalError` if the
    /// stored key cannot be converted
    pub fn export_private_key_jwk(&self, credential_id: &str) -> Result<String, AuthenticatorError> {
        let record = self.require(credential_id)?;
        let secret_key = SecretKey::from_bytes(&record.signing_key().to_bytes())
            .map_err(|e| AuthenticatorError::InternalError(format!("Invalid stored key: {e}")))?;
        Ok(secret_key.to_jwk_string().as_str().to_owned())
    }

    /// Register a private key given as an EC JWK under its credential ID
    ///
    /// Accepts keys exported by WebCrypto; fields other than the EC key
    /// parameters (`ext`, `key_ops`) are ignored.
    ///
    /// # Errors
    /// Returns `EncodingError` if the credential ID is not Base64URL or the
    /// JWK is not a P-256 private key
    pub fn import_private_key_jwk(
        &self,
        credential_id: &str,
        jwk: &str,
    ) -> Result<Arc<KeyPairRecord>, AuthenticatorError> {
        let secret_key = SecretKey::from_jwk_str(jwk)
            .map_err(|e| AuthenticatorError::EncodingError(format!("Invalid JWK: {e}")))?;
        self.import_signing_key(credential_id, SigningKey::from(secret_key))
    }

    fn import_signing_key(
        &self,
        credential_id: &str,
        signing_key: SigningKey,
    ) -> Result<Arc<KeyPairRecord>, AuthenticatorError> {
        let raw_id = URL_SAFE_NO_PAD.decode(credential_id).map_err(|_| {
            AuthenticatorError::EncodingError("Invalid credential ID encoding".to_string())
        })?;

        let record = Arc::new(KeyPairRecord::new(raw_id, signing_key));
        self.insert(Arc::clone(&record));
        debug!("Imported key pair for credential {}", record.encoded_id());
        Ok(record)
    }

    fn insert(&self, record: Arc<KeyPairRecord>) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record.encoded_id().to_string(), record);
    }
}
