//! Main token service implementation

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};
use uuid::Uuid;

use crate::domain::{AuthenticatedPrincipal, Claims, TokenKind, TokenPair};
use crate::errors::{DomainError, DomainResult, TokenError, TokenValidationError};
use crate::repositories::DeviceBindingRepository;

use super::config::TokenServiceConfig;
use super::key_manager::Rs256KeyPair;

/// Service issuing and validating device-bound session tokens
///
/// Tokens are RS256-signed and carry the device fingerprint, user agent
/// and source address hashes observed at login plus a single-use id.
/// Validation re-derives trust on every call by corroborating those
/// claims against the device binding registry.
pub struct TokenService<R: DeviceBindingRepository> {
    registry: Arc<R>,
    config: TokenServiceConfig,
    keys: Rs256KeyPair,
    validation: Validation,
}

impl<R: DeviceBindingRepository> TokenService<R> {
    /// Create a new token service
    ///
    /// # Arguments
    ///
    /// * `registry` - Device binding registry used to corroborate claims
    /// * `config` - Token service configuration
    /// * `keys` - RS256 key pair for signing and verification
    pub fn new(registry: Arc<R>, config: TokenServiceConfig, keys: Rs256KeyPair) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = 0;
        // Issuer and kind are checked inside the validation pipeline so
        // their failure precedence stays fixed.

        Self {
            registry,
            config,
            keys,
            validation,
        }
    }

    /// Issue a signed token of the given kind
    ///
    /// The single-use id hash is embedded verbatim as the `jti` claim;
    /// callers provide a fresh hash per issuance.
    ///
    /// # Arguments
    ///
    /// * `subject_id` - Subject the token is issued to
    /// * `authorities` - Authority names joined into the scope claim
    /// * `device_fingerprint_hash` - Hashed device fingerprint
    /// * `user_agent_hash` - Hashed user agent
    /// * `source_address_hash` - Hashed network address
    /// * `single_use_id_hash` - Hash of the single-use id for this token
    /// * `kind` - Access or refresh
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The signed token
    /// * `Err(DomainError)` - Signing failed
    #[allow(clippy::too_many_arguments)]
    pub fn issue(
        &self,
        subject_id: Uuid,
        authorities: &[String],
        device_fingerprint_hash: &str,
        user_agent_hash: &str,
        source_address_hash: &str,
        single_use_id_hash: &str,
        kind: TokenKind,
    ) -> DomainResult<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject_id.to_string(),
            iat: now,
            exp: now + self.config.ttl_seconds(kind),
            iss: self.config.issuer.clone(),
            jti: single_use_id_hash.to_string(),
            kind: self.config.kind_value(kind).to_string(),
            scope: authorities.join(" "),
            device_fingerprint_hash: device_fingerprint_hash.to_string(),
            user_agent_hash: user_agent_hash.to_string(),
            source_address_hash: source_address_hash.to_string(),
        };

        let header = Header::new(Algorithm::RS256);
        encode(&header, &claims, self.keys.encoding_key()).map_err(|e| {
            TokenError::Generation {
                message: format!("Failed to sign token: {}", e),
            }
            .into()
        })
    }

    /// Issue an access and refresh token pair for one login
    ///
    /// # Arguments
    ///
    /// * `subject_id` - Subject the tokens are issued to
    /// * `authorities` - Authority names joined into the scope claim
    /// * `device_fingerprint_hash` - Hashed device fingerprint
    /// * `user_agent_hash` - Hashed user agent
    /// * `source_address_hash` - Hashed network address
    /// * `access_single_use_id_hash` - Single-use id for the access token
    /// * `refresh_single_use_id_hash` - Single-use id for the refresh token
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - Both signed tokens and the access lifetime
    /// * `Err(DomainError)` - Signing failed
    #[allow(clippy::too_many_arguments)]
    pub fn issue_pair(
        &self,
        subject_id: Uuid,
        authorities: &[String],
        device_fingerprint_hash: &str,
        user_agent_hash: &str,
        source_address_hash: &str,
        access_single_use_id_hash: &str,
        refresh_single_use_id_hash: &str,
    ) -> DomainResult<TokenPair> {
        let access_token = self.issue(
            subject_id,
            authorities,
            device_fingerprint_hash,
            user_agent_hash,
            source_address_hash,
            access_single_use_id_hash,
            TokenKind::Access,
        )?;
        let refresh_token = self.issue(
            subject_id,
            authorities,
            device_fingerprint_hash,
            user_agent_hash,
            source_address_hash,
            refresh_single_use_id_hash,
            TokenKind::Refresh,
        )?;

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.config.access_ttl_seconds,
        ))
    }

    /// Validate a token of the expected kind
    ///
    /// After signature and expiry verification the claims are checked in
    /// order: kind discriminator, issuer, device/user-agent/source-address
    /// corroboration against the registry, and single-use id replay. The
    /// first failing check determines the reported reason.
    ///
    /// # Arguments
    ///
    /// * `token` - The signed token to validate
    /// * `kind` - The kind the caller expects
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - The decoded claims when every check passes
    /// * `Err(DomainError)` - The first failing check, wrapped per kind
    pub async fn validate(&self, token: &str, kind: TokenKind) -> DomainResult<Claims> {
        let invalid = |reason: TokenValidationError| -> DomainError {
            match kind {
                TokenKind::Access => TokenError::InvalidAccessToken { reason }.into(),
                TokenKind::Refresh => TokenError::InvalidRefreshToken { reason }.into(),
            }
        };

        let token_data = decode::<Claims>(token, self.keys.decoding_key(), &self.validation)
            .map_err(|e| invalid(map_decode_error(&e)))?;
        let claims = token_data.claims;

        if claims.kind != self.config.kind_value(kind) {
            return Err(invalid(TokenValidationError::InvalidType));
        }

        if claims.iss != self.config.issuer {
            return Err(invalid(TokenValidationError::InvalidIssuer));
        }

        let subject_id = claims
            .subject_id()
            .map_err(|_| invalid(TokenValidationError::Malformed))?;

        if !self
            .registry
            .is_known_device(subject_id, &claims.device_fingerprint_hash)
            .await?
        {
            return Err(invalid(TokenValidationError::InvalidDeviceId));
        }
        if !self
            .registry
            .is_known_user_agent(subject_id, &claims.user_agent_hash)
            .await?
        {
            return Err(invalid(TokenValidationError::InvalidUserAgent));
        }
        if !self
            .registry
            .is_known_source_address(subject_id, &claims.source_address_hash)
            .await?
        {
            return Err(invalid(TokenValidationError::InvalidSourceAddress));
        }

        // The single-use id is consumed when the binding is refreshed, so
        // a consumed id resurfacing in a presented token means reuse.
        if self.registry.is_replayed_single_use_id(&claims.jti).await? {
            tracing::warn!(
                subject_id = %subject_id,
                event = "token_replay_detected",
                "Single-use id has already been consumed"
            );
            return Err(invalid(TokenValidationError::ReplayDetected));
        }

        Ok(claims)
    }

    /// Validate a bearer token and build the authenticated principal
    ///
    /// # Arguments
    ///
    /// * `bearer_token` - The access token extracted from the request
    ///
    /// # Returns
    ///
    /// * `Ok(AuthenticatedPrincipal)` - Subject, authorities and device hash
    /// * `Err(DomainError)` - Any validation failure
    pub async fn authenticate(&self, bearer_token: &str) -> DomainResult<AuthenticatedPrincipal> {
        let claims = self.validate(bearer_token, TokenKind::Access).await?;
        AuthenticatedPrincipal::from_claims(&claims).map_err(|_| {
            TokenError::InvalidAccessToken {
                reason: TokenValidationError::Malformed,
            }
            .into()
        })
    }
}

/// Map signature and structure failures from token decoding
fn map_decode_error(error: &jsonwebtoken::errors::Error) -> TokenValidationError {
    use jsonwebtoken::errors::ErrorKind;

    match error.kind() {
        ErrorKind::ExpiredSignature => TokenValidationError::Expired,
        ErrorKind::InvalidToken
        | ErrorKind::InvalidSignature
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_) => TokenValidationError::Malformed,
        _ => TokenValidationError::Unknown,
    }
}
