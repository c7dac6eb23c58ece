//! RS256 key management for token signing and verification

use std::fs;
use std::path::{Path, PathBuf};

use jsonwebtoken::{DecodingKey, EncodingKey};

use crate::errors::{DomainResult, TokenError};

/// RS256 key pair used for signing and verifying session tokens
#[derive(Clone)]
pub struct Rs256KeyPair {
    /// Private key for signing tokens
    encoding_key: EncodingKey,
    /// Public key for verifying tokens
    decoding_key: DecodingKey,
    /// Path to private key file
    private_key_path: PathBuf,
    /// Path to public key file
    public_key_path: PathBuf,
}

impl std::fmt::Debug for Rs256KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rs256KeyPair")
            .field("private_key_path", &self.private_key_path)
            .field("public_key_path", &self.public_key_path)
            .finish()
    }
}

impl Rs256KeyPair {
    /// Load a key pair from PEM key files
    ///
    /// # Arguments
    ///
    /// * `private_key_path` - Path to the PEM-encoded private key file
    /// * `public_key_path` - Path to the PEM-encoded public key file
    ///
    /// # Returns
    ///
    /// * `Ok(Rs256KeyPair)` - Key pair loaded successfully
    /// * `Err(DomainError)` - Failed to read or parse the keys
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pv_core::services::token::Rs256KeyPair;
    ///
    /// let keys = Rs256KeyPair::from_files(
    ///     "keys/jwt_private_key.pem",
    ///     "keys/jwt_public_key.pem",
    /// ).expect("Failed to load keys");
    /// ```
    pub fn from_files<P: AsRef<Path>>(
        private_key_path: P,
        public_key_path: P,
    ) -> DomainResult<Self> {
        let private_key_path = private_key_path.as_ref().to_path_buf();
        let public_key_path = public_key_path.as_ref().to_path_buf();

        let private_key_pem = fs::read(&private_key_path).map_err(|e| TokenError::KeyLoad {
            message: format!("Failed to read private key: {}", e),
        })?;
        let encoding_key =
            EncodingKey::from_rsa_pem(&private_key_pem).map_err(|e| TokenError::KeyLoad {
                message: format!("Invalid private key format: {}", e),
            })?;

        let public_key_pem = fs::read(&public_key_path).map_err(|e| TokenError::KeyLoad {
            message: format!("Failed to read public key: {}", e),
        })?;
        let decoding_key =
            DecodingKey::from_rsa_pem(&public_key_pem).map_err(|e| TokenError::KeyLoad {
                message: format!("Invalid public key format: {}", e),
            })?;

        Ok(Self {
            encoding_key,
            decoding_key,
            private_key_path,
            public_key_path,
        })
    }

    /// Load a key pair from environment-configured paths
    ///
    /// Reads `JWT_PRIVATE_KEY_PATH` and `JWT_PUBLIC_KEY_PATH`, falling
    /// back to the `keys/` directory defaults.
    pub fn from_env() -> DomainResult<Self> {
        let private_key_path = std::env::var("JWT_PRIVATE_KEY_PATH")
            .unwrap_or_else(|_| "keys/jwt_private_key.pem".to_string());
        let public_key_path = std::env::var("JWT_PUBLIC_KEY_PATH")
            .unwrap_or_else(|_| "keys/jwt_public_key.pem".to_string());

        Self::from_files(private_key_path, public_key_path)
    }

    /// Build a key pair from PEM strings (embedded keys and tests)
    ///
    /// # Arguments
    ///
    /// * `private_key_pem` - PEM-encoded private key string
    /// * `public_key_pem` - PEM-encoded public key string
    pub fn from_pem(private_key_pem: &str, public_key_pem: &str) -> DomainResult<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes()).map_err(|e| {
            TokenError::KeyLoad {
                message: format!("Invalid private key format: {}", e),
            }
        })?;
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes()).map_err(|e| {
            TokenError::KeyLoad {
                message: format!("Invalid public key format: {}", e),
            }
        })?;

        Ok(Self {
            encoding_key,
            decoding_key,
            private_key_path: PathBuf::from("memory"),
            public_key_path: PathBuf::from("memory"),
        })
    }

    /// Returns the signing key
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    /// Returns the verification key
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    /// Returns the paths the keys were loaded from
    pub fn key_paths(&self) -> (&Path, &Path) {
        (&self.private_key_path, &self.public_key_path)
    }
}
