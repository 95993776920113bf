//! Server configuration.
//!
//! Credentials come from the environment (a `.env` file is loaded first by
//! the binary). There are no built-in defaults: a server without
//! configured credentials refuses to start.
//!
//! | Variable                  | Meaning                    |
//! |---------------------------|----------------------------|
//! | `TRANSFORMATION_USERNAME` | Basic-auth username        |
//! | `TRANSFORMATION_PASSWORD` | Basic-auth password        |

use std::fmt;
use std::net::{IpAddr, SocketAddr};

use subtle::ConstantTimeEq;

use crate::error::{ConfigError, ConfigResult};

pub const USERNAME_VAR: &str = "TRANSFORMATION_USERNAME";
pub const PASSWORD_VAR: &str = "TRANSFORMATION_PASSWORD";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

/// Expected Basic-auth credentials.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Load from process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &'static str| -> ConfigResult<String> {
            match lookup(name) {
                None => Err(ConfigError::MissingVar(name)),
                Some(value) if value.is_empty() => Err(ConfigError::EmptyVar(name)),
                Some(value) => Ok(value),
            }
        };
        Ok(Self::new(read(USERNAME_VAR)?, read(PASSWORD_VAR)?))
    }

    /// Constant-time credential check.
    ///
    /// Both comparisons always run so the response time does not reveal
    /// which one failed.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let username_ok = username.as_bytes().ct_eq(self.username.as_bytes());
        let password_ok = password.as_bytes().ct_eq(self.password.as_bytes());
        (username_ok & password_ok).into()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Everything `nest-server` needs to run.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub credentials: Credentials,
}

impl ServerConfig {
    pub fn new(host: &str, port: u16, credentials: Credentials) -> ConfigResult<Self> {
        let ip = host
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidAddress {
                address: host.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            addr: SocketAddr::new(ip, port),
            credentials,
        })
    }
}
