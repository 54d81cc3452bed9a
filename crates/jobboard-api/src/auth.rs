//! Cookie-based session tokens.
//!
//! `POST /jwt` signs the submitted identity claims into an HS256 token and
//! stores it in an http-only cookie. Protected handlers take an [`AuthUser`],
//! which reads the cookie and verifies the token.

use std::time::Duration;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::CookieConfig;
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "token";

/// Claims set by the issuer; clients cannot supply them.
const RESERVED_CLAIMS: &[&str] = &["email", "iat", "exp"];

/// Decoded session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub email: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
    /// Remaining identity claims, carried verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Signing keys and cookie settings for sessions.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
    cookie: CookieConfig,
}

impl SessionKeys {
    pub fn new(secret: &[u8], ttl: Duration, cookie: CookieConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);
        // Identity claims are carried verbatim, including any `aud`.
        validation.validate_aud = false;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
            cookie,
        }
    }

    /// Sign identity claims. `email` is required and must be a non-empty
    /// string. `iat` and `exp` are always set here.
    pub fn issue(&self, mut identity: Map<String, Value>) -> ApiResult<String> {
        let email = match identity.get("email") {
            Some(Value::String(email)) if !email.trim().is_empty() => email.clone(),
            _ => return Err(ApiError::validation("email is required")),
        };
        for key in RESERVED_CLAIMS {
            identity.remove(*key);
        }

        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            email,
            iat: now,
            exp: now + self.ttl.as_secs() as i64,
            extra: identity,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| ApiError::internal(format!("Failed to sign session token: {}", e)))
    }

    /// Verify signature and expiry.
    pub fn verify(&self, token: &str) -> ApiResult<SessionClaims> {
        decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Rejected session token");
                ApiError::invalid_token("Unauthorized access")
            })
    }

    /// Cookie carrying a freshly issued token.
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .secure(self.cookie.secure)
            .same_site(self.cookie.same_site)
            .build()
    }

    /// Expired, empty cookie that clears the session. Attributes match
    /// [`Self::session_cookie`].
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(SESSION_COOKIE)
            .path("/")
            .http_only(true)
            .secure(self.cookie.secure)
            .same_site(self.cookie.same_site)
            .build();
        cookie.make_removal();
        cookie
    }
}

/// Identity of the caller, taken from a verified session token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
    pub claims: SessionClaims,
}

impl From<SessionClaims> for AuthUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            email: claims.email.clone(),
            claims,
        }
    }
}

impl AuthUser {
    /// Allow access only to the caller's own records. An absent email is a
    /// mismatch.
    pub fn authorize(&self, requested_email: Option<&str>) -> ApiResult<()> {
        match requested_email {
            Some(email) if email == self.email => Ok(()),
            _ => {
                metrics::record_auth_failure("forbidden");
                Err(ApiError::forbidden("forbidden access"))
            }
        }
    }
}

/// Axum extractor for the session user.
#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let Some(token) = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value())
            .filter(|value| !value.is_empty())
        else {
            metrics::record_auth_failure("missing");
            return Err(ApiError::unauthorized("Unauthorized access"));
        };

        match state.sessions.verify(token) {
            Ok(claims) => Ok(AuthUser::from(claims)),
            Err(e) => {
                metrics::record_auth_failure("invalid");
                Err(e)
            }
        }
    }
}
