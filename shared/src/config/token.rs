//! Session token configuration

use serde::{Deserialize, Serialize};

use crate::utils::validation::{Validate, ValidationErrors};

/// Configuration for session token issuance and validation
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenConfig {
    /// Issuer claim embedded in and required of every token
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// Access token lifetime in seconds
    #[serde(default = "default_access_ttl")]
    pub access_ttl_seconds: i64,

    /// Refresh token lifetime in seconds
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_seconds: i64,

    /// Discriminator value carried in the kind claim of access tokens
    #[serde(default = "default_access_kind")]
    pub access_kind: String,

    /// Discriminator value carried in the kind claim of refresh tokens
    #[serde(default = "default_refresh_kind")]
    pub refresh_kind: String,

    /// Path to the PEM-encoded RSA private key
    #[serde(default = "default_private_key_path")]
    pub private_key_path: String,

    /// Path to the PEM-encoded RSA public key
    #[serde(default = "default_public_key_path")]
    pub public_key_path: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            issuer: default_issuer(),
            access_ttl_seconds: default_access_ttl(),
            refresh_ttl_seconds: default_refresh_ttl(),
            access_kind: default_access_kind(),
            refresh_kind: default_refresh_kind(),
            private_key_path: default_private_key_path(),
            public_key_path: default_public_key_path(),
        }
    }
}

impl TokenConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            issuer: std::env::var("TOKEN_ISSUER").unwrap_or(defaults.issuer),
            access_ttl_seconds: std::env::var("TOKEN_ACCESS_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.access_ttl_seconds),
            refresh_ttl_seconds: std::env::var("TOKEN_REFRESH_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.refresh_ttl_seconds),
            access_kind: std::env::var("TOKEN_ACCESS_KIND").unwrap_or(defaults.access_kind),
            refresh_kind: std::env::var("TOKEN_REFRESH_KIND").unwrap_or(defaults.refresh_kind),
            private_key_path: std::env::var("JWT_PRIVATE_KEY_PATH")
                .unwrap_or(defaults.private_key_path),
            public_key_path: std::env::var("JWT_PUBLIC_KEY_PATH")
                .unwrap_or(defaults.public_key_path),
        }
    }
}

impl Validate for TokenConfig {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.issuer.trim().is_empty() {
            errors.add_error("issuer", "must not be blank", "REQUIRED");
        }
        if self.access_ttl_seconds <= 0 {
            errors.add_error("access_ttl_seconds", "must be positive", "OUT_OF_RANGE");
        }
        if self.refresh_ttl_seconds <= self.access_ttl_seconds {
            errors.add_error(
                "refresh_ttl_seconds",
                "must exceed the access token lifetime",
                "OUT_OF_RANGE",
            );
        }
        if self.access_kind == self.refresh_kind {
            errors.add_error("access_kind", "must differ from refresh_kind", "DUPLICATE");
        }

        if errors.has_errors() {
            Err(errors)
        } else {
            Ok(())
        }
    }
}

fn default_issuer() -> String {
    String::from("phone-verify")
}

fn default_access_ttl() -> i64 {
    900 // 15 minutes
}

fn default_refresh_ttl() -> i64 {
    604_800 // 7 days
}

fn default_access_kind() -> String {
    String::from("access")
}

fn default_refresh_kind() -> String {
    String::from("refresh")
}

fn default_private_key_path() -> String {
    String::from("keys/jwt_private_key.pem")
}

fn default_public_key_path() -> String {
    String::from("keys/jwt_public_key.pem")
}
