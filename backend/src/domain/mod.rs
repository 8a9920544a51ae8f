//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed entities and the use-cases built on them.
//! Types here are transport agnostic; inbound and outbound adapters translate
//! to and from HTTP, SQL and CLI representations.
//!
//! Public surface:
//! - Error, ErrorCode: transport-neutral failure payload.
//! - User, Username, credentials: identity and authentication inputs.
//! - SessionTokenService: issues and verifies stateless tokens.
//! - TaskRecord, ResourceScheduleSnapshot, Scenario: the schedule model.
//! - normalize, current_schedule, all_current_schedules: schedule views.
//! - Services implementing the driving ports in [`ports`].

pub mod error;
pub mod ports;
pub mod trace_id;

mod account_service;
mod auth;
mod saved_schedule_service;
mod scenario_service;
mod schedule;
mod schedule_ingestion_service;
mod schedule_query_service;
mod session_token;
mod user;

pub use self::account_service::{AccountService, INVALID_CREDENTIALS_MESSAGE};
pub use self::auth::{
    CredentialsValidationError, LoginCredentials, PASSWORD_MIN, RegistrationCredentials,
    USERNAME_MIN,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::saved_schedule_service::SavedScheduleService;
pub use self::scenario_service::{ScenarioService, ScheduleRunner, UploadOutcome};
pub use self::schedule::*;
pub use self::schedule_ingestion_service::ScheduleIngestionService;
pub use self::schedule_query_service::ScheduleQueryService;
pub use self::session_token::{
    AuthenticatedUser, INVALID_TOKEN_MESSAGE, SESSION_TOKEN_TTL_DAYS, SessionToken,
    SessionTokenService, TokenSigningKey, TokenVerification,
};
pub use self::trace_id::TraceId;
pub use self::user::{PasswordDigest, User, UserId, UserValidationError, Username};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use schedule_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
