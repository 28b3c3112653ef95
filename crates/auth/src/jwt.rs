use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, Result};
use crate::model::{Principal, Role};

/// Fixed validity window for issued tokens: 2 hours from issuance.
pub const TOKEN_TTL_SECS: i64 = 2 * 60 * 60;

/// JWT claims carried by a bearer token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (identity id)
    pub sub: String,
    /// Role at issuance
    pub role: Role,
    /// Issued at (unix timestamp)
    pub iat: i64,
    /// Expiration (unix timestamp)
    pub exp: i64,
}

impl Claims {
    fn new(principal: &Principal) -> Self {
        let now = Utc::now();
        Self {
            sub: principal.id.clone(),
            role: principal.role,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(TOKEN_TTL_SECS)).timestamp(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    pub fn principal(&self) -> Principal {
        Principal::new(self.sub.clone(), self.role)
    }
}

/// Sign a token for the principal, valid for [`TOKEN_TTL_SECS`].
pub fn issue_token(principal: &Principal, secret: &str) -> Result<String> {
    let claims = Claims::new(principal);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// Verify signature and expiry, returning the embedded claims. A bad
/// signature, a malformed payload, and an elapsed expiry are all the same
/// failure to the caller.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| AuthError::InvalidToken)?;

    let claims = token_data.claims;
    if claims.is_expired() {
        return Err(AuthError::InvalidToken);
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let secret = "test_secret";
        let principal = Principal::new("user_123", Role::Teacher);

        let token = issue_token(&principal, secret).unwrap();
        let claims = verify_token(&token, secret).unwrap();

        assert_eq!(claims.sub, "user_123");
        assert_eq!(claims.role, Role::Teacher);
        assert_eq!(claims.principal(), principal);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_two_hour_window() {
        let principal = Principal::new("user_123", Role::Student);
        let token = issue_token(&principal, "s").unwrap();
        let claims = verify_token(&token, "s").unwrap();

        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let principal = Principal::new("user_123", Role::Student);
        let token = issue_token(&principal, "correct_secret").unwrap();

        assert!(matches!(
            verify_token(&token, "wrong_secret"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_malformed_token_rejected() {
        assert!(verify_token("not.a.jwt", "secret").is_err());
        assert!(verify_token("", "secret").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // Forge claims already past their expiry with the right secret; the
        // signature is valid, so only the expiry check can reject it.
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "user_123".to_string(),
            role: Role::Student,
            iat: now - TOKEN_TTL_SECS - 10,
            exp: now - 10,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(matches!(
            verify_token(&token, "secret"),
            Err(AuthError::InvalidToken)
        ));
    }
}
