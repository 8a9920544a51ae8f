//! Token signing key configuration.
//!
//! The HMAC secret is read from the file named by `SESSION_KEY_FILE`. Missing
//! keys fall back to a random per-process secret in debug builds or when
//! `SESSION_ALLOW_EPHEMERAL` is enabled; tokens then stop verifying after a
//! restart.

use std::path::PathBuf;

use mockable::Env;
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::TokenSigningKey;

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
/// Shortest key accepted in release builds.
pub const SESSION_KEY_MIN_LEN: usize = 32;
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const FINGERPRINT_BYTES: usize = 8;

/// Build mode for key validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate missing keys and short secrets.
    Debug,
    /// Release builds require a readable key of adequate length.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use schedule_backend::inbound::http::token_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Errors raised while loading the signing key.
#[derive(thiserror::Error, Debug)]
pub enum TokenConfigError {
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the key file failed and no fallback is allowed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The key file is too short for release builds.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Load the token signing key described by the environment.
///
/// # Examples
///
/// ```rust
/// use schedule_backend::inbound::http::token_config::{BuildMode, token_key_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "SESSION_KEY_FILE" => Some("/nonexistent/session_key".to_owned()),
///     _ => None,
/// });
///
/// let key = token_key_from_env(&env, BuildMode::Debug).expect("ephemeral key");
/// assert!(!key.as_bytes().is_empty());
/// ```
pub fn token_key_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TokenSigningKey, TokenConfigError> {
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_owned()),
    );

    match std::fs::read(&path) {
        Ok(bytes) => {
            let bytes = Zeroizing::new(bytes);
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                return Err(TokenConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            Ok(TokenSigningKey::from_bytes(bytes.to_vec()))
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using ephemeral token signing key"
            );
            Ok(TokenSigningKey::generate())
        }
        Err(error) => Err(TokenConfigError::KeyRead {
            path,
            source: error,
        }),
    }
}

fn allow_ephemeral_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, TokenConfigError> {
    let Some(value) = env.string(ALLOW_EPHEMERAL_ENV) else {
        return Ok(false);
    };
    match parse_bool(&value) {
        Some(flag) => Ok(flag),
        None if mode.is_debug() => {
            warn!(value = %value, "invalid SESSION_ALLOW_EPHEMERAL; defaulting to disabled");
            Ok(false)
        }
        None => Err(TokenConfigError::InvalidEnv {
            name: ALLOW_EPHEMERAL_ENV,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Truncated SHA-256 fingerprint of the key, safe to log.
///
/// Operators compare fingerprints to confirm which key a process loaded.
#[must_use]
pub fn key_fingerprint(key: &TokenSigningKey) -> String {
    let digest = Sha256::digest(key.as_bytes());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use mockable::MockEnv;
    use rstest::rstest;
    use tempfile::NamedTempFile;

    use super::*;

    fn key_file(len: usize) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create key file");
        file.write_all(&vec![b'k'; len]).expect("write key file");
        file
    }

    fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |key| vars.get(key).cloned());
        env
    }

    fn env_with_key(file: &NamedTempFile) -> MockEnv {
        let path = file.path().to_str().expect("utf-8 path").to_owned();
        mock_env(HashMap::from([(KEY_FILE_ENV, path)]))
    }

    #[rstest]
    #[case(BuildMode::Debug)]
    #[case(BuildMode::Release)]
    fn reads_key_material_from_file(#[case] mode: BuildMode) {
        let file = key_file(SESSION_KEY_MIN_LEN);
        let key = token_key_from_env(&env_with_key(&file), mode).expect("key loads");
        assert_eq!(key.as_bytes(), vec![b'k'; SESSION_KEY_MIN_LEN].as_slice());
    }

    #[rstest]
    fn release_rejects_short_keys() {
        let file = key_file(SESSION_KEY_MIN_LEN - 1);
        let err = token_key_from_env(&env_with_key(&file), BuildMode::Release)
            .expect_err("short key rejected");
        assert!(matches!(
            err,
            TokenConfigError::KeyTooShort { length, .. } if length == SESSION_KEY_MIN_LEN - 1
        ));
    }

    #[rstest]
    fn debug_accepts_short_keys() {
        let file = key_file(4);
        let key = token_key_from_env(&env_with_key(&file), BuildMode::Debug).expect("key loads");
        assert_eq!(key.as_bytes().len(), 4);
    }

    fn missing_key_env(allow_ephemeral: Option<&str>) -> MockEnv {
        let mut vars = HashMap::from([(KEY_FILE_ENV, "/nonexistent/session_key".to_owned())]);
        if let Some(flag) = allow_ephemeral {
            vars.insert(ALLOW_EPHEMERAL_ENV, flag.to_owned());
        }
        mock_env(vars)
    }

    #[rstest]
    #[case(BuildMode::Debug, None)]
    #[case(BuildMode::Release, Some("1"))]
    #[case(BuildMode::Release, Some("yes"))]
    fn missing_key_falls_back_to_ephemeral(#[case] mode: BuildMode, #[case] flag: Option<&str>) {
        let key = token_key_from_env(&missing_key_env(flag), mode).expect("ephemeral key");
        assert!(key.as_bytes().len() >= SESSION_KEY_MIN_LEN);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("0"))]
    fn release_requires_a_key_file(#[case] flag: Option<&str>) {
        let err = token_key_from_env(&missing_key_env(flag), BuildMode::Release)
            .expect_err("missing key rejected");
        assert!(matches!(err, TokenConfigError::KeyRead { .. }));
    }

    #[rstest]
    fn release_rejects_unparseable_flags() {
        let err = token_key_from_env(&missing_key_env(Some("maybe")), BuildMode::Release)
            .expect_err("invalid flag rejected");
        assert!(matches!(
            err,
            TokenConfigError::InvalidEnv { name: ALLOW_EPHEMERAL_ENV, .. }
        ));
    }

    #[rstest]
    fn fingerprint_is_short_stable_hex() {
        let key = TokenSigningKey::from_bytes(vec![b'a'; 64]);
        let fingerprint = key_fingerprint(&key);
        assert_eq!(fingerprint.len(), 16);
        assert!(fingerprint.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(fingerprint, key_fingerprint(&key));
        assert_ne!(fingerprint, key_fingerprint(&TokenSigningKey::from_bytes(vec![b'b'; 64])));
    }
}
