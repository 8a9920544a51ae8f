//! Token resolution for session-gated handlers.
//!
//! Clients send the token in the JSON body or as `Authorization: Bearer`.
//! A non-blank body token wins over the header.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};

use crate::domain::{
    AuthenticatedUser, Error, INVALID_TOKEN_MESSAGE, SessionTokenService, TokenVerification,
};

use super::ApiResult;

const BEARER_PREFIX: &str = "Bearer ";

/// Token taken from the `Authorization` header, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BearerToken(Option<String>);

impl BearerToken {
    pub fn new(token: Option<String>) -> Self {
        Self(token)
    }

    /// Read the bearer token from the request headers.
    pub fn from_request_headers(req: &HttpRequest) -> Self {
        let token = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_owned);
        Self(token)
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl FromRequest for BearerToken {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self::from_request_headers(req)))
    }
}

/// Pick the token to verify: the body field when present, else the header.
pub fn resolve_token<'a>(body_token: Option<&'a str>, bearer: &'a BearerToken) -> Option<&'a str> {
    body_token
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .or_else(|| bearer.as_deref())
}

/// Verify the request's token or fail with the uniform `401`.
pub fn require_user(
    tokens: &SessionTokenService,
    body_token: Option<&str>,
    bearer: &BearerToken,
) -> ApiResult<AuthenticatedUser> {
    let verification = match resolve_token(body_token, bearer) {
        Some(token) => tokens.verify(token),
        None => TokenVerification::Invalid,
    };
    verification
        .into_user()
        .ok_or_else(|| Error::unauthorized(INVALID_TOKEN_MESSAGE))
}
