#![warn(clippy::uninlined_format_args)]

//! Shared bearer-token verification.
//!
//! Every service consumes the same capability: given a bearer token,
//! return the authenticated identity or a typed failure. Tokens are
//! compact HS256 JWTs (`header.payload.signature`, base64url without
//! padding, HMAC-SHA256 over the first two segments). The signature is
//! checked before any payload byte is interpreted.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const ALG_HS256: &str = "HS256";
const TYP_JWT: &str = "JWT";
const MAX_TOKEN_LEN: usize = 1024;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("token is not a three-segment compact token")]
    Malformed,
    #[error("unsupported token algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("token signature mismatch")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("invalid token claims: {0}")]
    InvalidClaims(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Header {
    alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

/// Claims carried by an issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated username.
    pub sub: String,
    /// Expiry as a unix timestamp (seconds).
    pub exp: i64,
}

/// The authenticated caller, as established by [`TokenVerifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
}

/// Issues and verifies bearer tokens against one shared secret.
pub struct TokenVerifier {
    secret: Vec<u8>,
}

impl TokenVerifier {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Issues a signed token for `claims`. Services and tests mint
    /// through this one code path.
    pub fn mint(&self, claims: &Claims) -> Result<String, AuthError> {
        let header = Header {
            alg: ALG_HS256.to_owned(),
            typ: Some(TYP_JWT.to_owned()),
        };
        let header_part = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&header)
                .map_err(|err| AuthError::InvalidClaims(err.to_string()))?,
        );
        let claims_part = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(claims)
                .map_err(|err| AuthError::InvalidClaims(err.to_string()))?,
        );
        let signing_input = format!("{header_part}.{claims_part}");
        let sig_part = URL_SAFE_NO_PAD.encode(self.sign(signing_input.as_bytes())?);
        Ok(format!("{signing_input}.{sig_part}"))
    }

    /// Verifies `token` and returns the authenticated identity.
    ///
    /// Accepts the raw token or an `Authorization` header value with a
    /// `Bearer ` prefix. `now` is injected so expiry is testable.
    pub fn verify_bearer(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, AuthError> {
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
        if token.is_empty() || token.len() > MAX_TOKEN_LEN {
            return Err(AuthError::Malformed);
        }

        let mut segments = token.split('.');
        let (header_part, claims_part, sig_part) =
            match (segments.next(), segments.next(), segments.next(), segments.next()) {
                (Some(header), Some(claims), Some(sig), None) => (header, claims, sig),
                _ => return Err(AuthError::Malformed),
            };

        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|_| AuthError::InvalidSignature)?;
        mac.update(header_part.as_bytes());
        mac.update(b".");
        mac.update(claims_part.as_bytes());
        let signature = URL_SAFE_NO_PAD
            .decode(sig_part)
            .map_err(|_| AuthError::Malformed)?;
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::InvalidSignature)?;

        let header_bytes = URL_SAFE_NO_PAD
            .decode(header_part)
            .map_err(|_| AuthError::Malformed)?;
        let header: Header =
            serde_json::from_slice(&header_bytes).map_err(|_| AuthError::Malformed)?;
        if header.alg != ALG_HS256 {
            return Err(AuthError::UnsupportedAlgorithm(header.alg));
        }

        let claims_bytes = URL_SAFE_NO_PAD
            .decode(claims_part)
            .map_err(|_| AuthError::Malformed)?;
        let claims: Claims = serde_json::from_slice(&claims_bytes)
            .map_err(|err| AuthError::InvalidClaims(err.to_string()))?;

        if claims.exp <= now.timestamp() {
            return Err(AuthError::Expired);
        }
        if claims.sub.is_empty() {
            return Err(AuthError::InvalidClaims("empty subject".to_owned()));
        }

        Ok(Identity {
            username: claims.sub,
        })
    }

    fn sign(&self, input: &[u8]) -> Result<Vec<u8>, AuthError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|_| AuthError::InvalidSignature)?;
        mac.update(input);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}
