//! Bearer token verification settings.
//!
//! The HS256 secret shared with the identity provider is read from the
//! environment so it can be validated consistently and tested in isolation.

use std::fmt;
use std::path::PathBuf;

use mockable::Env;
use tracing::warn;
use uuid::Uuid;
use zeroize::{Zeroize, Zeroizing};

const SECRET_DEFAULT_PATH: &str = "/var/run/secrets/jwt_secret";
const SECRET_MIN_LEN: usize = 32;
const SECRET_ENV: &str = "JWT_SECRET";
const SECRET_FILE_ENV: &str = "JWT_SECRET_FILE";
const ALLOW_EPHEMERAL_ENV: &str = "AUTH_ALLOW_EPHEMERAL";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";

/// Build mode for token settings validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing toggles.
    Debug,
    /// Release builds require an explicit secret of adequate length.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use meal_ledger::inbound::http::auth_config::BuildMode;
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

/// Where the signing secret came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SecretSource {
    /// Inline `JWT_SECRET` variable.
    Inline,
    /// File named by `JWT_SECRET_FILE` or the default path.
    File,
    /// Randomly generated for this process; tokens from the identity
    /// provider will not verify.
    Ephemeral,
}

/// Token verification settings derived from the environment.
pub struct AuthSettings {
    secret: Zeroizing<Vec<u8>>,
    source: SecretSource,
}

impl AuthSettings {
    /// Shared HS256 secret.
    #[must_use]
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    /// Where the secret was loaded from.
    #[must_use]
    pub const fn source(&self) -> SecretSource {
        self.source
    }
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("secret", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Errors raised while validating token settings.
#[derive(thiserror::Error, Debug)]
pub enum AuthConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the secret file failed.
    #[error("failed to read token secret at {path}: {source}")]
    SecretRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The secret is too short for release builds.
    #[error("token secret from {origin} too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort {
        origin: String,
        length: usize,
        min_len: usize,
    },
    /// Release builds must not allow ephemeral secrets.
    #[error("AUTH_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Build token settings from environment variables and build mode.
///
/// `JWT_SECRET` takes precedence over `JWT_SECRET_FILE`. When neither yields
/// a secret, debug builds (or `AUTH_ALLOW_EPHEMERAL=1`) fall back to a random
/// per-process secret.
///
/// # Examples
///
/// ```rust
/// use meal_ledger::inbound::http::auth_config::{auth_settings_from_env, BuildMode, SecretSource};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "JWT_SECRET" => Some("an-inline-secret-of-at-least-32-bytes".to_string()),
///     "AUTH_ALLOW_EPHEMERAL" => Some("0".to_string()),
///     _ => None,
/// });
///
/// let settings = auth_settings_from_env(&env, BuildMode::Release).expect("valid settings");
/// assert_eq!(settings.source(), SecretSource::Inline);
/// ```
pub fn auth_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<AuthSettings, AuthConfigError> {
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;

    if let Some(inline) = env.string(SECRET_ENV).filter(|value| !value.is_empty()) {
        let secret = Zeroizing::new(inline.into_bytes());
        check_length(&secret, SECRET_ENV.to_owned(), mode)?;
        return Ok(AuthSettings {
            secret,
            source: SecretSource::Inline,
        });
    }

    secret_from_file(env, mode, allow_ephemeral)
}

fn check_length(secret: &[u8], origin: String, mode: BuildMode) -> Result<(), AuthConfigError> {
    let length = secret.len();
    if mode == BuildMode::Release && length < SECRET_MIN_LEN {
        return Err(AuthConfigError::SecretTooShort {
            origin,
            length,
            min_len: SECRET_MIN_LEN,
        });
    }
    Ok(())
}

fn allow_ephemeral_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, AuthConfigError> {
    match env.string(ALLOW_EPHEMERAL_ENV) {
        Some(value) => match parse_bool(&value) {
            Some(true) => {
                if mode.is_debug() {
                    Ok(true)
                } else {
                    Err(AuthConfigError::EphemeralNotAllowed)
                }
            }
            Some(false) => Ok(false),
            None => {
                if mode.is_debug() {
                    warn!(
                        value = %value,
                        "invalid AUTH_ALLOW_EPHEMERAL; defaulting to disabled"
                    );
                    Ok(false)
                } else {
                    Err(AuthConfigError::InvalidEnv {
                        name: ALLOW_EPHEMERAL_ENV,
                        value,
                        expected: BOOL_EXPECTED,
                    })
                }
            }
        },
        None => {
            if mode.is_debug() {
                warn!("AUTH_ALLOW_EPHEMERAL not set; defaulting to disabled");
                Ok(false)
            } else {
                Err(AuthConfigError::MissingEnv {
                    name: ALLOW_EPHEMERAL_ENV,
                })
            }
        }
    }
}

fn secret_from_file<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<AuthSettings, AuthConfigError> {
    let secret_path = env
        .string(SECRET_FILE_ENV)
        .unwrap_or_else(|| SECRET_DEFAULT_PATH.to_string());
    let path = PathBuf::from(secret_path);

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let trimmed_len = bytes.trim_ascii_end().len();
            bytes.truncate(trimmed_len);
            if let Err(error) = check_length(&bytes, path.display().to_string(), mode) {
                bytes.zeroize();
                return Err(error);
            }
            Ok(AuthSettings {
                secret: Zeroizing::new(bytes),
                source: SecretSource::File,
            })
        }
        Err(error) => {
            if mode.is_debug() || allow_ephemeral {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "using ephemeral token secret (dev only)"
                );
                Ok(AuthSettings {
                    secret: ephemeral_secret(),
                    source: SecretSource::Ephemeral,
                })
            } else {
                Err(AuthConfigError::SecretRead {
                    path,
                    source: error,
                })
            }
        }
    }
}

fn ephemeral_secret() -> Zeroizing<Vec<u8>> {
    let mut bytes = Vec::with_capacity(SECRET_MIN_LEN * 2);
    while bytes.len() < SECRET_MIN_LEN * 2 {
        bytes.extend_from_slice(Uuid::new_v4().as_bytes());
    }
    Zeroizing::new(bytes)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
