//! HS256 session tokens.
//!
//! A session token is a JWT carrying the user's identity plus `iat`/`exp`.
//! Verification never errors: every failure (bad encoding, bad signature,
//! wrong algorithm, expiry) collapses to `None` so callers treat "no valid
//! session" uniformly.

use crate::error::AppError;
use crate::models::unix_now;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Fixed session lifetime: 7 days.
pub const SESSION_TTL_SECS: u64 = 60 * 60 * 24 * 7;

/// Who the token speaks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: u64,
    pub email: String,
    pub name: String,
}

/// Decoded token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub identity: Identity,
    pub iat: u64,
    pub exp: u64,
}

/// Signs and verifies session tokens with a single process-wide secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenSigner {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked in verify_at against an explicit clock, with no leeway.
        validation.validate_exp = false;
        validation.leeway = 0;
        // `iat` is required by the Claims type itself.
        validation.set_required_spec_claims(&["exp"]);

        TokenSigner {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token for `identity`, valid for seven days from now.
    pub fn issue(&self, identity: &Identity) -> Result<String, AppError> {
        self.issue_at(identity, unix_now())
    }

    pub fn issue_at(&self, identity: &Identity, now: u64) -> Result<String, AppError> {
        let claims = Claims {
            identity: identity.clone(),
            iat: now,
            exp: now + SESSION_TTL_SECS,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
    }

    /// Verify a token's signature and expiry against the current time.
    pub fn verify(&self, token: &str) -> Option<Claims> {
        self.verify_at(token, unix_now())
    }

    /// Verify a token as of `now`. A token is expired once `now >= exp`.
    pub fn verify_at(&self, token: &str, now: u64) -> Option<Claims> {
        let data = match decode::<Claims>(token, &self.decoding, &self.validation) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!(error = %e, "Session token rejected");
                return None;
            }
        };

        if now >= data.claims.exp {
            tracing::debug!(exp = data.claims.exp, "Session token expired");
            return None;
        }

        Some(data.claims)
    }
}
