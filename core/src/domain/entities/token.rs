//! Token entities for JWT-based session management.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discriminator distinguishing access tokens from refresh tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

/// Claims structure for JWT payload
///
/// Session tokens are never persisted; validity is re-derived on every use
/// from these claims plus the current device binding state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// JWT ID (single-use identifier for replay detection)
    pub jti: String,

    /// Token kind discriminator (access or refresh type string)
    pub kind: String,

    /// Space-separated authority list
    pub scope: String,

    /// Hash of the device fingerprint the session is bound to
    pub device_fingerprint_hash: String,

    /// Hash of the user agent the session was established from
    pub user_agent_hash: String,

    /// Hash of the source address the session was established from
    pub source_address_hash: String,
}

impl Claims {
    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp();
        now >= self.exp
    }

    /// Gets the subject ID from the claims
    ///
    /// # Returns
    ///
    /// `Ok(Uuid)` if the subject can be parsed as a UUID, `Err` otherwise
    pub fn subject_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }

    /// Splits the scope claim into individual authorities
    pub fn authorities(&self) -> Vec<String> {
        self.scope
            .split_whitespace()
            .map(|s| s.to_string())
            .collect()
    }
}

/// An access/refresh token pair issued together
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived access token
    pub access_token: String,

    /// Long-lived refresh token
    pub refresh_token: String,

    /// Seconds until the access token expires
    pub expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_in,
        }
    }
}

/// Authenticated caller identity derived from a validated access token
///
/// Built by the token service after the full validation pipeline succeeds;
/// the outer request layer attaches this to the request context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedPrincipal {
    /// Subject (user ID) the token was issued for
    pub subject_id: Uuid,

    /// Authorities parsed from the scope claim
    pub authorities: Vec<String>,

    /// Device fingerprint hash the session is bound to
    pub device_fingerprint_hash: String,
}

impl AuthenticatedPrincipal {
    /// Builds a principal from validated claims
    pub fn from_claims(claims: &Claims) -> Result<Self, uuid::Error> {
        Ok(Self {
            subject_id: claims.subject_id()?,
            authorities: claims.authorities(),
            device_fingerprint_hash: claims.device_fingerprint_hash.clone(),
        })
    }

    /// Checks whether the principal carries a given authority
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }
}
