use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use thiserror::Error;

/// Session token lifetime. There is no refresh mechanism: an expired token
/// requires a fresh issue through POST /auth/jwt.
pub const TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

/// Claims
///
/// The payload carried inside the signed session token. The subject is the
/// user's email; it is the only identity attribute the session gate attaches
/// to a request.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (sub): the user's email address.
    pub sub: String,
    /// Issued At (iat): timestamp when the token was created.
    pub iat: usize,
    /// Expiration Time (exp): timestamp after which the token is rejected.
    pub exp: usize,
}

/// TokenError
///
/// Failure modes of the codec. `MissingSecret` is a deployment problem
/// (no signing secret configured); `Invalid` covers bad signatures,
/// malformed payloads, and expiry.
#[derive(Debug, Error, PartialEq)]
pub enum TokenError {
    #[error("No signing secret configured")]
    MissingSecret,
    #[error("Invalid or expired token")]
    Invalid,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// issue
///
/// Produces a signed token encoding `{sub: email, iat, exp = iat + 24h}`.
/// Pure over secret + input; the only failure is an unconfigured secret.
pub fn issue(secret: &str, email: &str) -> Result<String, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let now = unix_now();
    let claims = Claims {
        sub: email.to_string(),
        iat: now as usize,
        exp: (now + TOKEN_TTL_SECS) as usize,
    };

    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key).map_err(|_| TokenError::Invalid)
}

/// verify
///
/// Decodes and validates a token, returning its claims. Fails if the
/// signature does not match, the payload is malformed, or the current time
/// exceeds the embedded expiry.
pub fn verify(secret: &str, token: &str) -> Result<Claims, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = true;

    // Expiry maps to the same rejection as any other invalid token.
    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|_| TokenError::Invalid)
}
