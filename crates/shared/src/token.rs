//! Session token signing and verification.
//!
//! Session tokens are HS256 JWTs carrying the user id and role. Every
//! authenticated route trusts the role claim inside the token rather than
//! re-reading the user row, so role changes take effect at next login.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for token operations.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,
}

/// Session token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Role of the user ("admin" or "user")
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Unique token identifier
    pub jti: String,
}

/// Signer/verifier for session tokens, built from the configured secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    /// Token lifetime in seconds.
    pub expiry_secs: i64,
    /// Clock-skew tolerance in seconds.
    pub leeway_secs: u64,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("expiry_secs", &self.expiry_secs)
            .field("leeway_secs", &self.leeway_secs)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl TokenSigner {
    /// Creates a signer from a shared secret.
    pub fn new(secret: &str, expiry_secs: i64, leeway_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_secs,
            leeway_secs,
        }
    }

    /// Signs a session token for the given user and role.
    pub fn sign(&self, user_id: Uuid, role: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            exp: (now + Duration::seconds(self.expiry_secs)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingError(e.to_string()))
    }

    /// Verifies a session token and returns its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidToken,
                _ => TokenError::DecodingError(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }
}

/// Extracts the user ID from validated claims.
pub fn extract_user_id(claims: &Claims) -> Result<Uuid, TokenError> {
    Uuid::parse_str(&claims.sub).map_err(|_| TokenError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_signer() -> TokenSigner {
        TokenSigner::new("test_secret_key_for_session_tokens", 3600, 0)
    }

    #[test]
    fn test_sign_and_verify() {
        let signer = test_signer();
        let user_id = Uuid::new_v4();

        let token = signer.sign(user_id, "user").unwrap();
        let claims = signer.verify(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, "user");
    }

    #[test]
    fn test_role_claim_round_trip() {
        let signer = test_signer();
        let token = signer.sign(Uuid::new_v4(), "admin").unwrap();
        assert_eq!(signer.verify(&token).unwrap().role, "admin");
    }

    #[test]
    fn test_expired_token_rejected() {
        let mut signer = test_signer();
        signer.expiry_secs = -10;

        let token = signer.sign(Uuid::new_v4(), "user").unwrap();
        assert!(matches!(signer.verify(&token), Err(TokenError::TokenExpired)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signer = test_signer();
        let other = TokenSigner::new("a_different_secret_entirely", 3600, 0);

        let token = signer.sign(Uuid::new_v4(), "user").unwrap();
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_malformed_token_rejected() {
        let signer = test_signer();
        assert!(signer.verify("not_a_jwt").is_err());
        assert!(signer.verify("invalid.token.here").is_err());
    }

    #[test]
    fn test_extract_user_id() {
        let signer = test_signer();
        let user_id = Uuid::new_v4();

        let token = signer.sign(user_id, "user").unwrap();
        let claims = signer.verify(&token).unwrap();
        assert_eq!(extract_user_id(&claims).unwrap(), user_id);
    }

    #[test]
    fn test_unique_jti_per_token() {
        let signer = test_signer();
        let user_id = Uuid::new_v4();

        let c1 = signer.verify(&signer.sign(user_id, "user").unwrap()).unwrap();
        let c2 = signer.verify(&signer.sign(user_id, "user").unwrap()).unwrap();
        assert_ne!(c1.jti, c2.jti);
    }

    #[test]
    fn test_claims_timestamps() {
        let signer = test_signer();
        let before = Utc::now().timestamp();
        let claims = signer
            .verify(&signer.sign(Uuid::new_v4(), "user").unwrap())
            .unwrap();
        let after = Utc::now().timestamp();

        assert!(claims.iat >= before && claims.iat <= after);
        assert_eq!(claims.exp - claims.iat, 3600);
    }
}
