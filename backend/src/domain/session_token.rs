//! Stateless session tokens.
//!
//! Tokens are HS256-signed JWTs carrying `{sub, username, iat, exp}`. They are
//! never persisted, so there is no revocation: a token stays valid until its
//! expiry passes. Expiry is checked against the injected clock rather than the
//! system time so behaviour is reproducible under test.

use std::fmt;
use std::sync::Arc;

use chrono::TimeDelta;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockable::Clock;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

use super::{Error, UserId, Username};

/// Token lifetime measured from issuance.
pub const SESSION_TOKEN_TTL_DAYS: i64 = 7;
/// Uniform message for missing, malformed or expired tokens.
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired token";

const EPHEMERAL_KEY_LEN: usize = 64;

/// Secret material used to sign and verify session tokens.
///
/// The bytes are wiped when the key is dropped.
#[derive(Clone)]
pub struct TokenSigningKey(Zeroizing<Vec<u8>>);

impl TokenSigningKey {
    /// Wrap existing key material.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Zeroizing::new(bytes.into()))
    }

    /// Generate random key material for development use.
    pub fn generate() -> Self {
        let mut bytes = vec![0_u8; EPHEMERAL_KEY_LEN];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(Zeroizing::new(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl fmt::Debug for TokenSigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenSigningKey(<redacted>)")
    }
}

/// Signed session token as handed to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<SessionToken> for String {
    fn from(value: SessionToken) -> Self {
        value.0
    }
}

/// Identity recovered from a valid token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: Username,
}

/// Outcome of verifying a token. Verification never fails with an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenVerification {
    Valid(AuthenticatedUser),
    Invalid,
}

impl TokenVerification {
    /// The authenticated identity, if the token was valid.
    pub fn into_user(self) -> Option<AuthenticatedUser> {
        match self {
            Self::Valid(user) => Some(user),
            Self::Invalid => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    username: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies session tokens.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use mockable::DefaultClock;
/// use schedule_backend::domain::{
///     SessionTokenService, TokenSigningKey, TokenVerification, UserId, Username,
/// };
///
/// let service = SessionTokenService::new(
///     &TokenSigningKey::from_bytes(b"0123456789abcdef0123456789abcdef".to_vec()),
///     Arc::new(DefaultClock),
/// );
/// let username = Username::new("R1").unwrap();
/// let token = service.issue(&UserId::random(), &username).unwrap();
/// assert!(matches!(service.verify(token.as_str()), TokenVerification::Valid(_)));
/// ```
#[derive(Clone)]
pub struct SessionTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
}

impl SessionTokenService {
    /// Create a service signing with `key` and reading time from `clock`.
    pub fn new(key: &TokenSigningKey, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is compared with the injected clock in `verify`.
        validation.validate_exp = false;
        Self {
            encoding_key: EncodingKey::from_secret(key.as_bytes()),
            decoding_key: DecodingKey::from_secret(key.as_bytes()),
            validation,
            clock,
            ttl: TimeDelta::days(SESSION_TOKEN_TTL_DAYS),
        }
    }

    /// Issue a token for `user_id` expiring one lifetime from now.
    pub fn issue(&self, user_id: &UserId, username: &Username) -> Result<SessionToken, Error> {
        let issued_at = self.clock.utc();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            username: username.as_str().to_owned(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map(SessionToken)
            .map_err(|err| Error::internal(format!("failed to sign session token: {err}")))
    }

    /// Verify `token`, yielding the embedded identity when it is still valid.
    pub fn verify(&self, token: &str) -> TokenVerification {
        let claims = match jsonwebtoken::decode::<SessionClaims>(
            token,
            &self.decoding_key,
            &self.validation,
        ) {
            Ok(data) => data.claims,
            Err(error) => {
                debug!(%error, "rejected session token");
                return TokenVerification::Invalid;
            }
        };

        if claims.exp <= self.clock.utc().timestamp() {
            debug!(exp = claims.exp, "rejected expired session token");
            return TokenVerification::Invalid;
        }

        match (UserId::new(&claims.sub), Username::new(&claims.username)) {
            (Ok(user_id), Ok(username)) => {
                TokenVerification::Valid(AuthenticatedUser { user_id, username })
            }
            _ => TokenVerification::Invalid,
        }
    }
}
