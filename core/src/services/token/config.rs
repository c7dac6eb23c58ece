//! Configuration for the token service

use pv_shared::config::TokenConfig;

use crate::domain::TokenKind;

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Issuer claim stamped into and required from every token
    pub issuer: String,
    /// Access token lifetime in seconds
    pub access_ttl_seconds: i64,
    /// Refresh token lifetime in seconds
    pub refresh_ttl_seconds: i64,
    /// Kind discriminator stamped into access tokens
    pub access_kind: String,
    /// Kind discriminator stamped into refresh tokens
    pub refresh_kind: String,
}

impl TokenServiceConfig {
    /// The kind discriminator string for a token kind
    pub fn kind_value(&self, kind: TokenKind) -> &str {
        match kind {
            TokenKind::Access => &self.access_kind,
            TokenKind::Refresh => &self.refresh_kind,
        }
    }

    /// The configured lifetime for a token kind in seconds
    pub fn ttl_seconds(&self, kind: TokenKind) -> i64 {
        match kind {
            TokenKind::Access => self.access_ttl_seconds,
            TokenKind::Refresh => self.refresh_ttl_seconds,
        }
    }
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            issuer: "phone-verify".to_string(),
            access_ttl_seconds: 900,
            refresh_ttl_seconds: 604_800,
            access_kind: "access".to_string(),
            refresh_kind: "refresh".to_string(),
        }
    }
}

impl From<TokenConfig> for TokenServiceConfig {
    fn from(config: TokenConfig) -> Self {
        Self {
            issuer: config.issuer,
            access_ttl_seconds: config.access_ttl_seconds,
            refresh_ttl_seconds: config.refresh_ttl_seconds,
            access_kind: config.access_kind,
            refresh_kind: config.refresh_kind,
        }
    }
}
