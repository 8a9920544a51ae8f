//! Account handlers: registration, login and token verification.
//!
//! ```text
//! POST /api/register {"username":"R1","password":"tester"}
//! POST /api/login {"username":"R1","password":"tester"}
//! POST /api/verify-token {"token":"..."}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::domain::ports::SessionGrant;
use crate::domain::{
    CredentialsValidationError, Error, INVALID_CREDENTIALS_MESSAGE, LoginCredentials,
    RegistrationCredentials,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::{BearerToken, resolve_token};
use crate::inbound::http::state::HttpState;

/// Credentials body shared by `register` and `login`.
///
/// Missing fields deserialize as empty strings so validation, not the JSON
/// decoder, decides the response.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Successful register or login response.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub username: String,
}

impl AuthResponse {
    fn from_grant(message: &str, grant: SessionGrant) -> Self {
        Self {
            message: message.to_owned(),
            token: grant.token.into(),
            username: grant.username.into(),
        }
    }
}

/// Body for `POST /api/verify-token`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct VerifyTokenRequest {
    #[serde(default)]
    pub token: Option<String>,
}

/// Verification result. `username` is present only for valid tokens.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct VerifyTokenResponse {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

fn map_registration_error(err: CredentialsValidationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": err.field(), "code": err.reason() }))
}

/// Create an account and return a session token.
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid credentials or username taken", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let CredentialsRequest { username, password } = payload.into_inner();
    let credentials = RegistrationCredentials::try_from_parts(&username, &password)
        .map_err(map_registration_error)?;
    let grant = state.accounts.register(credentials).await?;
    Ok(HttpResponse::Created().json(AuthResponse::from_grant(
        "User registered successfully",
        grant,
    )))
}

/// Exchange credentials for a session token.
///
/// Malformed, unknown and wrong credentials all produce the same `401`.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login success", body = AuthResponse),
        (status = 401, description = "Invalid username or password", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let CredentialsRequest { username, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&username, &password).map_err(|err| {
        debug!(reason = err.reason(), field = err.field(), "login rejected before lookup");
        Error::unauthorized(INVALID_CREDENTIALS_MESSAGE)
    })?;
    let grant = state.accounts.login(credentials).await?;
    Ok(HttpResponse::Ok().json(AuthResponse::from_grant("Login successful", grant)))
}

/// Report whether a token is currently valid. Never fails.
#[utoipa::path(
    post,
    path = "/api/verify-token",
    request_body = VerifyTokenRequest,
    responses(
        (status = 200, description = "Verification result", body = VerifyTokenResponse)
    ),
    tags = ["auth"],
    operation_id = "verifyToken",
    security([])
)]
#[post("/verify-token")]
pub async fn verify_token(
    state: web::Data<HttpState>,
    bearer: BearerToken,
    payload: Option<web::Json<VerifyTokenRequest>>,
) -> web::Json<VerifyTokenResponse> {
    let body = payload.map(web::Json::into_inner).unwrap_or_default();
    let user = resolve_token(body.token.as_deref(), &bearer)
        .and_then(|token| state.tokens.verify(token).into_user());
    web::Json(VerifyTokenResponse {
        valid: user.is_some(),
        username: user.map(|user| user.username.into()),
    })
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
