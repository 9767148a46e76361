//! Admin authentication gate.
//!
//! A single shared admin password is exchanged for a signed, time-limited
//! bearer token (HS256 JWT). Tokens are stateless: nothing is stored server
//! side, and expiry is the only way a token stops working.
//!
//! A token is valid if and only if its signature verifies against the
//! configured secret and the current time is before its `exp` claim.

use axum::http::{HeaderMap, header::AUTHORIZATION};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sha2::Sha256;

use crate::{config::Config, models::claims::AdminClaims};

type HmacSha256 = Hmac<Sha256>;

/// Lifetime of a freshly minted token, in seconds (24 hours).
pub const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Why a protected request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header, or no token segment in it.
    #[error("Access token required")]
    MissingToken,

    /// Bad signature, expired, or undecodable payload.
    #[error("Invalid token")]
    InvalidToken,
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Invalid password")]
    InvalidPassword,

    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Issues and verifies admin tokens.
///
/// Built once at startup from [`Config`] and shared through `AppState`.
#[derive(Clone)]
pub struct AuthGate {
    secret: Vec<u8>,
    password_mac: Vec<u8>,
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl AuthGate {
    pub fn new(config: &Config) -> Self {
        Self::with_credentials(&config.jwt_secret, &config.admin_password)
    }

    pub fn with_credentials(secret: &str, admin_password: &str) -> Self {
        let secret = secret.as_bytes().to_vec();
        let password_mac = mac(&secret, admin_password).finalize().into_bytes().to_vec();

        // Expiry is checked against an explicit clock in `verify_at`, with no leeway.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(&secret),
            decoding: DecodingKey::from_secret(&secret),
            secret,
            password_mac,
            validation,
        }
    }

    /// Exchange the admin password for a token valid for 24 hours.
    ///
    /// The comparison runs in constant time: both sides are HMAC'd under the
    /// signing secret and checked with `verify_slice`. It accepts exactly the
    /// passwords plain equality would.
    pub fn login(&self, password: &str) -> Result<String, LoginError> {
        mac(&self.secret, password)
            .verify_slice(&self.password_mac)
            .map_err(|_| LoginError::InvalidPassword)?;

        Ok(self.issue_at(Utc::now())?)
    }

    /// Mint a token whose validity window starts at `issued_at`.
    pub fn issue_at(&self, issued_at: DateTime<Utc>) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = AdminClaims {
            admin: true,
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::seconds(TOKEN_TTL_SECS)).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Verify `token` against the current time.
    pub fn verify(&self, token: &str) -> Result<AdminClaims, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify `token` as of `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<AdminClaims, AuthError> {
        let data = decode::<AdminClaims>(token, &self.decoding, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "rejected bearer token");
            AuthError::InvalidToken
        })?;

        let claims = data.claims;
        if !claims.admin {
            tracing::debug!("rejected bearer token without admin claim");
            return Err(AuthError::InvalidToken);
        }
        if now.timestamp() >= claims.exp {
            tracing::debug!(exp = claims.exp, "rejected expired bearer token");
            return Err(AuthError::InvalidToken);
        }

        Ok(claims)
    }

    /// Authorize a request from its headers.
    ///
    /// Expects `Authorization: Bearer <token>`.
    pub fn check(&self, headers: &HeaderMap) -> Result<AdminClaims, AuthError> {
        let token = bearer_token(headers).ok_or(AuthError::MissingToken)?;
        self.verify(token)
    }
}

/// The token segment of the `Authorization` header, if there is one.
///
/// The header is split on single spaces and the second segment is taken, so
/// `Bearer` alone or `Bearer ` with nothing after it yield no token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .split(' ')
        .nth(1)
        .filter(|token| !token.is_empty())
}

fn mac(secret: &[u8], message: &str) -> HmacSha256 {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts keys of any length");
    mac.update(message.as_bytes());
    mac
}
