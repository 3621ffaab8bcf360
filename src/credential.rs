//! Login credentials handed to the remote executors.

use std::fmt;
use std::path::PathBuf;

/// How to prove who we are to a host.
#[derive(Clone)]
pub enum Secret {
    /// Plain password.
    Password(String),
    /// Private key file.
    KeyFile(PathBuf),
    /// Whatever identities the external ssh client finds on its own (agent, `~/.ssh/config`).
    DefaultIdentity,
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Secret::Password(_) => write!(f, "Password(<redacted>)"),
            Secret::KeyFile(path) => f.debug_tuple("KeyFile").field(path).finish(),
            Secret::DefaultIdentity => write!(f, "DefaultIdentity"),
        }
    }
}

/// Username plus secret. Built once at startup and shared read-only by every job.
#[derive(Debug, Clone)]
pub struct Credential {
    pub username: String,
    pub secret: Secret,
}

impl Credential {
    pub fn new(username: impl Into<String>, secret: Secret) -> Self {
        Self {
            username: username.into(),
            secret,
        }
    }
}
