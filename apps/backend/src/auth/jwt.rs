use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{dangerous, decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use crate::auth::claims::{IdentityClaim, TokenClaims};
use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

/// Lifetime of an issued access token.
pub const TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// Issues and verifies HS256 access tokens. Sole holder of the signing secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    security: SecurityConfig,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("security", &self.security)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Build a codec. An empty secret is a configuration error.
    pub fn new(security: SecurityConfig) -> Result<Self, AppError> {
        if security.jwt_secret.is_empty() {
            return Err(AppError::config("token signing secret is not configured"));
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(&security.jwt_secret),
            decoding: DecodingKey::from_secret(&security.jwt_secret),
            security,
        })
    }

    /// Sign `claim` with an expiry of `now + TOKEN_TTL`.
    pub fn issue(&self, claim: &IdentityClaim, now: SystemTime) -> Result<String, AppError> {
        let iat = epoch_secs(now)?;
        let claims = TokenClaims {
            identity: claim.clone().without_reserved(),
            iat,
            exp: iat + TOKEN_TTL.as_secs() as i64,
        };

        encode(&Header::new(self.security.algorithm), &claims, &self.encoding)
            .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
    }

    /// Verify structure, expiry and signature, in that order, and return the
    /// embedded identity.
    ///
    /// Errors:
    /// - malformed token or bad signature → `AppError::InvalidToken`
    /// - `now` at or past `exp` → `AppError::ExpiredToken`, even when the
    ///   signature would not verify
    pub fn verify(&self, token: &str, now: SystemTime) -> Result<IdentityClaim, AppError> {
        let unverified = self.decode_unverified(token)?;

        let now_secs = epoch_secs(now)?;
        if now_secs >= unverified.exp {
            return Err(AppError::ExpiredToken);
        }

        // Expiry is judged against the injected clock above. `aud` is an
        // ordinary caller field here, not an audience to enforce.
        let mut validation = Validation::new(self.security.algorithm);
        validation.validate_exp = false;
        validation.validate_aud = false;

        decode::<TokenClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims.identity)
            .map_err(|e| {
                debug!(kind = ?e.kind(), "token signature rejected");
                AppError::InvalidToken
            })
    }

    fn decode_unverified(&self, token: &str) -> Result<TokenClaims, AppError> {
        dangerous::insecure_decode::<TokenClaims>(token)
            .map(|data| data.claims)
            .map_err(|_| AppError::InvalidToken)
    }
}

fn epoch_secs(at: SystemTime) -> Result<i64, AppError> {
    at.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .map_err(|_| AppError::internal("clock is before the unix epoch"))
}
