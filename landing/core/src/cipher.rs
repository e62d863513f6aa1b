//! Field Encryption
//!
//! AES-256-GCM encryption for individual waitlist fields. Each field gets a
//! fresh random 96-bit nonce and is stored as `hex(nonce):hex(ciphertext)`,
//! where the ciphertext carries the GCM tag.
//!
//! The key outlives the process: it comes from configuration
//! (`LANDING_ENCRYPTION_KEY` feeds it through [`crate::ConfigOverrides`]) or
//! from a key file that is generated once and created with owner-only
//! permissions, so rows written before a restart stay readable.

use std::path::{Path, PathBuf};

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::RngCore;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

/// Size of the AES-GCM nonce in bytes
const NONCE_SIZE: usize = 12;

/// Size of an AES-256 key in bytes
pub const KEY_SIZE: usize = 32;

/// Errors from field encryption and key handling
#[derive(Debug, Error)]
pub enum CipherError {
    /// Key material was not 32 bytes of hex
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Encryption failed
    #[error("encryption failed")]
    Encryption,

    /// Ciphertext was malformed or failed authentication
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// Reading or writing the key file failed
    #[error("key file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Encrypts and decrypts single text fields
#[derive(Clone)]
pub struct FieldCipher {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldCipher").finish_non_exhaustive()
    }
}

impl FieldCipher {
    /// Build a cipher from raw key bytes
    #[must_use]
    pub fn new(key: &[u8; KEY_SIZE]) -> Self {
        Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key)),
        }
    }

    /// Build a cipher from a 64-character hex key
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKey`] for bad hex or a wrong length.
    pub fn from_hex(key_hex: &str) -> Result<Self, CipherError> {
        let bytes = hex::decode(key_hex.trim()).map_err(|e| CipherError::InvalidKey(e.to_string()))?;
        let key: [u8; KEY_SIZE] = bytes.try_into().map_err(|b: Vec<u8>| {
            CipherError::InvalidKey(format!("expected {KEY_SIZE} bytes, got {}", b.len()))
        })?;
        Ok(Self::new(&key))
    }

    /// Use the configured hex key, or the one stored at `key_path`,
    /// generating and persisting a new key there if neither exists
    ///
    /// # Errors
    ///
    /// Returns an error if the configured key is malformed or the key file
    /// cannot be read or written.
    pub async fn load_or_create(
        configured: Option<&str>,
        key_path: &Path,
    ) -> Result<Self, CipherError> {
        if let Some(key_hex) = configured {
            info!("Using configured encryption key");
            return Self::from_hex(key_hex);
        }

        if let Some(cipher) = read_key_file(key_path).await? {
            return Ok(cipher);
        }

        let mut key = [0u8; KEY_SIZE];
        rand::thread_rng().fill_bytes(&mut key);
        match write_key_file(key_path, &hex::encode(key)).await {
            Ok(()) => {
                info!(path = ?key_path, "Generated new encryption key");
                Ok(Self::new(&key))
            }
            // Another process created it first; use theirs
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => read_key_file(key_path)
                .await?
                .ok_or_else(|| CipherError::Io(e)),
            Err(e) => Err(e.into()),
        }
    }

    /// Encrypt one field
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Encryption`] if the AEAD backend fails.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        let mut nonce = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|_| CipherError::Encryption)?;

        Ok(format!("{}:{}", hex::encode(nonce), hex::encode(ciphertext)))
    }

    /// Decrypt a field produced by [`encrypt`](Self::encrypt)
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Decryption`] for malformed input, a different
    /// key, or tampered ciphertext.
    pub fn decrypt(&self, encoded: &str) -> Result<String, CipherError> {
        let (nonce_hex, data_hex) = encoded
            .split_once(':')
            .ok_or_else(|| CipherError::Decryption("missing ':' separator".into()))?;

        let nonce = hex::decode(nonce_hex).map_err(|e| CipherError::Decryption(e.to_string()))?;
        if nonce.len() != NONCE_SIZE {
            return Err(CipherError::Decryption(format!(
                "nonce must be {NONCE_SIZE} bytes, got {}",
                nonce.len()
            )));
        }
        let data = hex::decode(data_hex).map_err(|e| CipherError::Decryption(e.to_string()))?;

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(&nonce), data.as_ref())
            .map_err(|_| CipherError::Decryption("authentication failed".into()))?;

        String::from_utf8(plaintext).map_err(|e| CipherError::Decryption(e.to_string()))
    }
}

/// Default key file location inside the data directory
#[must_use]
pub fn default_key_path(data_dir: &Path) -> PathBuf {
    data_dir.join("waitlist.key")
}

async fn read_key_file(path: &Path) -> Result<Option<FieldCipher>, CipherError> {
    match fs::read_to_string(path).await {
        Ok(key_hex) => {
            info!(path = ?path, "Loaded encryption key");
            FieldCipher::from_hex(&key_hex).map(Some)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Create the key file, failing if it already exists
///
/// On unix the file is created owner read/write only, so the key is never
/// visible with wider permissions.
async fn write_key_file(path: &Path, key_hex: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        options.mode(0o600);
    }
    #[cfg(not(unix))]
    tracing::warn!(path = ?path, "Key file stored without permission hardening");

    let mut file = options.open(path).await?;
    file.write_all(key_hex.as_bytes()).await?;
    file.sync_all().await
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_HEX: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    #[test]
    fn test_encrypt_decrypt() {
        let cipher = FieldCipher::from_hex(KEY_HEX).unwrap();
        let encoded = cipher.encrypt("ada@example.com").unwrap();

        let (nonce, data) = encoded.split_once(':').unwrap();
        assert_eq!(nonce.len(), NONCE_SIZE * 2);
        assert!(!data.contains(','));
        assert_eq!(cipher.decrypt(&encoded).unwrap(), "ada@example.com");
    }

    #[test]
    fn test_nonce_differs_per_call() {
        let cipher = FieldCipher::from_hex(KEY_HEX).unwrap();
        assert_ne!(cipher.encrypt("same").unwrap(), cipher.encrypt("same").unwrap());
    }

    #[test]
    fn test_wrong_key_fails_authentication() {
        let cipher = FieldCipher::from_hex(KEY_HEX).unwrap();
        let other = FieldCipher::new(&[7u8; KEY_SIZE]);
        let encoded = cipher.encrypt("secret").unwrap();
        assert!(matches!(other.decrypt(&encoded), Err(CipherError::Decryption(_))));
    }

    #[test]
    fn test_tampered_ciphertext_rejected() {
        let cipher = FieldCipher::from_hex(KEY_HEX).unwrap();
        let encoded = cipher.encrypt("secret").unwrap();
        let mut tampered = encoded.into_bytes();
        let last = tampered.len() - 1;
        tampered[last] = if tampered[last] == b'0' { b'1' } else { b'0' };
        let tampered = String::from_utf8(tampered).unwrap();
        assert!(cipher.decrypt(&tampered).is_err());
    }

    #[test]
    fn test_invalid_keys() {
        assert!(matches!(FieldCipher::from_hex("zz"), Err(CipherError::InvalidKey(_))));
        assert!(matches!(FieldCipher::from_hex("abcd"), Err(CipherError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_key_file_created_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = default_key_path(dir.path());

        let first = FieldCipher::load_or_create(None, &path).await.unwrap();
        let encoded = first.encrypt("persisted").unwrap();

        let second = FieldCipher::load_or_create(None, &path).await.unwrap();
        assert_eq!(second.decrypt(&encoded).unwrap(), "persisted");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[tokio::test]
    async fn test_configured_key_skips_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = default_key_path(dir.path());

        let configured = FieldCipher::load_or_create(Some(KEY_HEX), &path)
            .await
            .unwrap();
        let encoded = configured.encrypt("secret").unwrap();

        assert!(!path.exists());
        let same = FieldCipher::from_hex(KEY_HEX).unwrap();
        assert_eq!(same.decrypt(&encoded).unwrap(), "secret");
    }

    #[tokio::test]
    async fn test_existing_key_file_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = default_key_path(dir.path());
        std::fs::write(&path, KEY_HEX).unwrap();

        assert_eq!(
            write_key_file(&path, "ff").await.unwrap_err().kind(),
            std::io::ErrorKind::AlreadyExists
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap(), KEY_HEX);

        let loaded = FieldCipher::load_or_create(None, &path).await.unwrap();
        let encoded = loaded.encrypt("kept").unwrap();
        let expected = FieldCipher::from_hex(KEY_HEX).unwrap();
        assert_eq!(expected.decrypt(&encoded).unwrap(), "kept");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_key_file_created_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys").join("waitlist.key");
        write_key_file(&path, KEY_HEX).await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), KEY_HEX);
    }
}
