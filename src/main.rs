use std::sync::Arc;

use clap::Parser;
use dialoguer::Password;
use tracing::info;

use labmap::config::{Config, ExecutorKind, RunConfig};
use labmap::credential::{Credential, Secret};
use labmap::executor::{ClientExecutor, NativeExecutor, RemoteExecutor};
use labmap::logging::init_logging;
use labmap::{get_hosts, Dispatcher, LabmapError};

/// Picks the credential for this run. Only prompts when nothing else will do.
fn credential(cli: &Config) -> Result<Credential, LabmapError> {
    let secret = match (&cli.keyfile, &cli.password, cli.executor) {
        (Some(keyfile), _, _) => Secret::KeyFile(keyfile.clone()),
        (None, Some(password), _) => Secret::Password(password.clone()),
        (None, None, ExecutorKind::Client) => Secret::DefaultIdentity,
        (None, None, ExecutorKind::Native) => Secret::Password(
            Password::new()
                .with_prompt(format!("{}'s password", cli.username))
                .interact()?,
        ),
    };
    Ok(Credential::new(cli.username.clone(), secret))
}

#[tokio::main]
async fn main() -> Result<(), LabmapError> {
    let cli = Config::parse();
    init_logging();

    let config = RunConfig::from_config(&cli)?;
    let credential = credential(&cli)?;
    // Nothing is worth waiting on past the deadline, connecting included.
    let executor: Arc<dyn RemoteExecutor> = match cli.executor {
        ExecutorKind::Client => Arc::new(ClientExecutor::new(config.timeout)),
        ExecutorKind::Native => Arc::new(NativeExecutor::new(config.timeout)),
    };
    info!(executor = ?cli.executor, user = %credential.username, "starting");

    let dispatcher = Dispatcher::new(get_hosts(), config, credential, executor);
    dispatcher.run(&mut std::io::stdout()).await?;

    // Jobs still in flight are dropped together with the runtime.
    Ok(())
}
