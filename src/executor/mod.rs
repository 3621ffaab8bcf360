//! Remote command execution.
//!
//! The dispatcher only knows about [`RemoteExecutor`]. Two implementations exist: one drives the
//! system `ssh` client, the other speaks SSH in-process and can log in with a password.

use async_trait::async_trait;
use thiserror::Error;

use crate::credential::Credential;
use crate::host::Host;
use crate::outcome::Outcome;

mod client;
mod native;

pub use client::ClientExecutor;
pub use native::NativeExecutor;

/// Runs one command on one host.
///
/// Implementations never return errors: anything that goes wrong talking to the host is
/// folded into [`Outcome::Failed`], since a lab machine being down is business as usual.
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    async fn execute(&self, host: &Host, command: &str, credential: &Credential) -> Outcome;
}

/// Where talking to a host went wrong.
#[derive(Error, Debug)]
pub(crate) enum SessionError {
    /// Connecting, handshaking or authenticating.
    #[error("dial error: {0}")]
    Dial(String),
    /// Opening the channel or running the command on an established session.
    #[error("run error: {0}")]
    Run(String),
}

pub(crate) fn outcome_of(result: Result<String, SessionError>) -> Outcome {
    match result {
        Ok(output) => Outcome::Completed(output),
        Err(e) => Outcome::Failed(e.to_string()),
    }
}
