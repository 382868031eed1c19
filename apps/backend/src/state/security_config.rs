use jsonwebtoken::Algorithm;

use crate::error::AppError;

/// Environment variable holding the token signing secret
pub const ACCESS_TOKEN_SECRET_VAR: &str = "ACCESS_TOKEN_SECRET";

/// Signing secret and algorithm for access tokens
#[derive(Clone)]
pub struct SecurityConfig {
    pub jwt_secret: Vec<u8>,
    /// JWT algorithm to use (defaults to HS256)
    pub algorithm: Algorithm,
}

impl SecurityConfig {
    /// Create a new SecurityConfig with the given JWT secret
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
        }
    }

    /// Read the secret from `ACCESS_TOKEN_SECRET`. A missing or blank secret
    /// is a startup-fatal configuration error.
    pub fn from_env() -> Result<Self, AppError> {
        let secret = std::env::var(ACCESS_TOKEN_SECRET_VAR).map_err(|_| {
            AppError::config(format!("{ACCESS_TOKEN_SECRET_VAR} must be set"))
        })?;
        if secret.trim().is_empty() {
            return Err(AppError::config(format!(
                "{ACCESS_TOKEN_SECRET_VAR} must not be empty"
            )));
        }
        Ok(Self::new(secret.into_bytes()))
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::new(b"test_secret_key_for_testing_purposes_only".to_vec())
    }
}

// Keep the secret out of Debug output (AppState derives Debug).
impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}
