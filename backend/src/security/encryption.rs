use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose, Engine as _};
use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::warn;

const NONCE_LEN: usize = 12;

#[derive(Error, Debug)]
pub enum EncryptionError {
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Symmetric cipher for sensitive columns and ad hoc payloads.
///
/// Values are serialized to JSON, sealed with AES-256-GCM under a fresh
/// random nonce and stored as `base64(nonce || ciphertext)`. The key is the
/// SHA-256 digest of the configured secret.
#[derive(Clone)]
pub struct FieldCipher {
    key: [u8; 32],
}

impl FieldCipher {
    pub fn new(secret: &str) -> Result<Self, EncryptionError> {
        if secret.is_empty() {
            return Err(EncryptionError::InvalidInput(
                "encryption secret must not be empty".to_string(),
            ));
        }
        Ok(Self {
            key: Sha256::digest(secret.as_bytes()).into(),
        })
    }

    pub fn encrypt<T>(&self, value: &T) -> Result<String, EncryptionError>
    where
        T: Serialize + ?Sized,
    {
        let plaintext = serde_json::to_vec(value)
            .map_err(|e| EncryptionError::EncryptionFailed(format!("JSON serialization failed: {}", e)))?;

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = cipher
            .encrypt(&nonce, plaintext.as_slice())
            .map_err(|e| EncryptionError::EncryptionFailed(e.to_string()))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(general_purpose::STANDARD.encode(sealed))
    }

    pub fn decrypt<T>(&self, encoded: &str) -> Result<T, EncryptionError>
    where
        T: DeserializeOwned,
    {
        let sealed = general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| EncryptionError::DecryptionFailed(format!("Invalid base64: {}", e)))?;

        if sealed.len() <= NONCE_LEN {
            return Err(EncryptionError::DecryptionFailed(
                "Ciphertext too short".to_string(),
            ));
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|e| EncryptionError::DecryptionFailed(e.to_string()))?;

        serde_json::from_slice(&plaintext)
            .map_err(|e| EncryptionError::DecryptionFailed(format!("JSON deserialization failed: {}", e)))
    }

    /// Lenient read used for stored columns: a value that cannot be
    /// decrypted is logged and read as `None`.
    pub fn decrypt_optional<T>(&self, encoded: Option<&str>, field: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let encoded = encoded?;
        match self.decrypt(encoded) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Could not decrypt {}: {}", field, e);
                None
            }
        }
    }

    pub fn encrypt_optional<T>(&self, value: Option<&T>) -> Result<Option<String>, EncryptionError>
    where
        T: Serialize + ?Sized,
    {
        value.map(|v| self.encrypt(v)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Profile {
        name: String,
        roles: Vec<i32>,
    }

    fn cipher() -> FieldCipher {
        FieldCipher::new("closet-test-secret").unwrap()
    }

    #[test]
    fn string_round_trip() {
        let cipher = cipher();
        let sealed = cipher.encrypt("Calle 123").unwrap();
        assert_ne!(sealed, "Calle 123");
        let opened: String = cipher.decrypt(&sealed).unwrap();
        assert_eq!(opened, "Calle 123");
    }

    #[test]
    fn struct_round_trip() {
        let cipher = cipher();
        let profile = Profile {
            name: "Ana".to_string(),
            roles: vec![1, 3],
        };
        let sealed = cipher.encrypt(&profile).unwrap();
        let opened: Profile = cipher.decrypt(&sealed).unwrap();
        assert_eq!(opened, profile);
    }

    #[test]
    fn nonces_differ_between_calls() {
        let cipher = cipher();
        assert_ne!(cipher.encrypt("card").unwrap(), cipher.encrypt("card").unwrap());
    }

    #[test]
    fn garbage_is_rejected() {
        let cipher = cipher();
        assert!(cipher.decrypt::<String>("not base64 at all!").is_err());
        assert!(cipher.decrypt::<String>("AAAA").is_err());
        assert_eq!(cipher.decrypt_optional::<String>(Some("garbage"), "payment_method"), None);
        assert_eq!(cipher.decrypt_optional::<String>(None, "payment_method"), None);
    }

    #[test]
    fn other_key_cannot_open() {
        let sealed = cipher().encrypt("visa").unwrap();
        let other = FieldCipher::new("another-secret").unwrap();
        assert!(other.decrypt::<String>(&sealed).is_err());
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(FieldCipher::new("").is_err());
    }
}
