use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use openssh::{KnownHosts, Session, SessionBuilder};
use tracing::{debug, instrument};

use super::{outcome_of, RemoteExecutor, SessionError};
use crate::credential::{Credential, Secret};
use crate::host::Host;
use crate::outcome::Outcome;

/// Runs commands through the system `ssh` client.
///
/// Host keys are accepted without checking; lab machines get reinstalled all the time and the
/// pool is fixed anyway. Password credentials are not supported since the client runs in batch
/// mode.
#[derive(Debug, Clone)]
pub struct ClientExecutor {
    connect_timeout: Duration,
    /// Where the ssh control sockets go.
    control_directory: PathBuf,
}

impl ClientExecutor {
    pub fn new(connect_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            control_directory: std::env::temp_dir(),
        }
    }

    async fn connect(&self, host: &Host, credential: &Credential) -> Result<Session, SessionError> {
        let mut builder = SessionBuilder::default();
        builder
            .user(credential.username.clone())
            .known_hosts_check(KnownHosts::Accept)
            .connect_timeout(whole_seconds(self.connect_timeout))
            .control_directory(&self.control_directory);
        match &credential.secret {
            Secret::KeyFile(path) => {
                builder.keyfile(path);
            }
            Secret::DefaultIdentity => {}
            Secret::Password(_) => {
                return Err(SessionError::Dial(
                    "the ssh client cannot log in with a password; pass a key file or use the native executor"
                        .to_string(),
                ));
            }
        }
        let session = builder
            .connect_mux(host.address())
            .await
            .map_err(|e| SessionError::Dial(e.to_string()))?;
        debug!("connected");
        Ok(session)
    }

    async fn run(&self, session: &Session, command: &str) -> Result<String, SessionError> {
        // The command line goes to the remote login shell untouched, same as `ssh host cmd`.
        let output = session
            .raw_command(command)
            .output()
            .await
            .map_err(|e| SessionError::Run(e.to_string()))?;
        debug!(status = %output.status, bytes = output.stdout.len(), "command finished");
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// `ssh -o ConnectTimeout` only takes whole seconds; round up so a short timeout never becomes 0.
fn whole_seconds(timeout: Duration) -> Duration {
    let secs = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
    Duration::from_secs(secs.max(1))
}

#[async_trait]
impl RemoteExecutor for ClientExecutor {
    #[instrument(skip_all, fields(host = %host))]
    async fn execute(&self, host: &Host, command: &str, credential: &Credential) -> Outcome {
        let session = match self.connect(host, credential).await {
            Ok(session) => session,
            Err(e) => return Outcome::Failed(e.to_string()),
        };
        let result = self.run(&session, command).await;
        if let Err(e) = session.close().await {
            debug!("error while terminating: {}", e);
        }
        outcome_of(result)
    }
}
