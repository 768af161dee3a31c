//! JWT service for session token issuance and validation
//!
//! Tokens are HS256-signed with a server secret and carry the user id as the
//! subject. Validation is a pure function of the token, the current time and
//! the secret; [`JwtService`] supplies the system clock.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Default access token lifetime in seconds (30 minutes)
pub const DEFAULT_ACCESS_TOKEN_EXPIRY: u64 = 1800;

/// Errors raised while issuing or validating tokens
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenError {
    /// No signing secret is configured
    #[error("SECRET_KEY environment variable not set")]
    MissingSecret,

    /// The token's expiry has passed
    #[error("token has expired")]
    Expired,

    /// The token is malformed, badly signed or carries unusable claims
    #[error("invalid token: {0}")]
    Invalid(String),

    /// Encoding failed
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Shared secret for HS256 signing
    pub secret: String,
    /// Access token expiration time in seconds
    pub access_token_expiry: u64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_token_expiry", &self.access_token_expiry)
            .finish()
    }
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SECRET_KEY`: Signing secret (required, must not be empty)
    /// - `JWT_ACCESS_TOKEN_EXPIRY`: Access token expiry in seconds (default: 1800)
    pub fn from_env() -> Result<Self, TokenError> {
        let secret = std::env::var("SECRET_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or(TokenError::MissingSecret)?;

        let access_token_expiry = std::env::var("JWT_ACCESS_TOKEN_EXPIRY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_ACCESS_TOKEN_EXPIRY);

        Ok(JwtConfig {
            secret,
            access_token_expiry,
        })
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// User ID, as a decimal string
    pub sub: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    // expiry is checked against the caller's clock in `check_claims`
    validation.validate_exp = false;
    validation.set_required_spec_claims(&["exp", "sub"]);
    validation
}

fn claims_for(user_id: i64, issued_at: u64, expiry: u64) -> Claims {
    Claims {
        sub: user_id.to_string(),
        iat: issued_at,
        exp: issued_at.saturating_add(expiry),
    }
}

fn sign(claims: &Claims, key: &EncodingKey) -> Result<String, TokenError> {
    encode(&Header::new(Algorithm::HS256), claims, key).map_err(|e| TokenError::Signing(e.to_string()))
}

fn check_claims(
    token: &str,
    now: u64,
    key: &DecodingKey,
    validation: &Validation,
) -> Result<i64, TokenError> {
    let token_data =
        decode::<Claims>(token, key, validation).map_err(|e| TokenError::Invalid(e.to_string()))?;

    if now >= token_data.claims.exp {
        return Err(TokenError::Expired);
    }

    token_data
        .claims
        .sub
        .parse()
        .map_err(|_| TokenError::Invalid("subject is not a user id".to_string()))
}

/// Sign a token for `user_id` valid from `issued_at` for `expiry` seconds
pub fn issue_token(
    user_id: i64,
    issued_at: u64,
    expiry: u64,
    secret: &[u8],
) -> Result<String, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    sign(
        &claims_for(user_id, issued_at, expiry),
        &EncodingKey::from_secret(secret),
    )
}

/// Validate `token` at time `now` and return the user id it was issued for
pub fn validate_token(token: &str, now: u64, secret: &[u8]) -> Result<i64, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    check_claims(token, now, &DecodingKey::from_secret(secret), &validation())
}

fn now() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Result<Self, TokenError> {
        if config.secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        Ok(JwtService {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation: validation(),
            config,
        })
    }

    /// Generate an access token for a user, valid from now
    pub fn issue_token(&self, user_id: i64) -> Result<String, TokenError> {
        let claims = claims_for(user_id, now(), self.config.access_token_expiry);
        sign(&claims, &self.encoding_key)
    }

    /// Validate a token against the current time and return its user id
    pub fn validate_token(&self, token: &str) -> Result<i64, TokenError> {
        check_claims(token, now(), &self.decoding_key, &self.validation)
    }
}
