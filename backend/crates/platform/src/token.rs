//! Signed, Expiring Tokens
//!
//! Compact HS256 JWTs carrying three claims:
//!
//! | claim  | value                                         |
//! |--------|-----------------------------------------------|
//! | `sub`  | subject id as a string                        |
//! | `exp`  | expiry, seconds since the Unix epoch          |
//! | `type` | `"refresh"` on refresh tokens, absent on access tokens |
//!
//! Nothing is stored server-side. A token is valid while its signature
//! checks out and the clock is before `exp`.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::Clock;

/// Which half of a token pair a token is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verified token content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub subject: String,
    pub kind: TokenKind,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Token is malformed or its signature is invalid")]
    Malformed,

    #[error("Token is missing required claim `{0}`")]
    MissingClaim(&'static str),
}

#[derive(Debug, Error)]
pub enum TokenSignError {
    #[error("Failed to sign token: {0}")]
    Sign(#[from] jsonwebtoken::errors::Error),

    /// `now + ttl` does not fit in a timestamp
    #[error("Token lifetime out of range: {0}")]
    ExpiryOutOfRange(TimeDelta),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum KindClaim {
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<KindClaim>,
}

/// Encodes and decodes tokens with one symmetric key.
///
/// Built once at startup and shared behind an `Arc`.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    pub fn new(secret: &[u8], clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the injected clock in `decode`, and
        // missing claims are reported by name instead of as a parse failure.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            clock,
        }
    }

    /// Sign a token for `subject` expiring `ttl` from now.
    ///
    /// A negative `ttl` yields an already-expired token.
    pub fn encode(
        &self,
        subject: &str,
        kind: TokenKind,
        ttl: TimeDelta,
    ) -> Result<String, TokenSignError> {
        let exp = self
            .clock
            .now()
            .checked_add_signed(ttl)
            .ok_or(TokenSignError::ExpiryOutOfRange(ttl))?;

        let claims = WireClaims {
            sub: Some(subject.to_string()),
            exp: Some(exp.timestamp()),
            kind: match kind {
                TokenKind::Access => None,
                TokenKind::Refresh => Some(KindClaim::Refresh),
            },
        };

        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Verify signature, then claims, then expiry.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<WireClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                TokenError::Malformed
            })?;

        let WireClaims { sub, exp, kind } = data.claims;

        let subject = sub.ok_or(TokenError::MissingClaim("sub"))?;
        let exp = exp.ok_or(TokenError::MissingClaim("exp"))?;

        if self.clock.now().timestamp() >= exp {
            return Err(TokenError::Expired);
        }

        let expires_at = DateTime::from_timestamp(exp, 0).ok_or(TokenError::Malformed)?;

        Ok(Claims {
            subject,
            kind: match kind {
                Some(KindClaim::Refresh) => TokenKind::Refresh,
                None => TokenKind::Access,
            },
            expires_at,
        })
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &"HS256")
            .field("key", &"[REDACTED]")
            .field("clock", &self.clock)
            .finish()
    }
}
