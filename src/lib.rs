//! labmap: the LAB MAchine Probe.
//!
//! Runs one command on every machine of a fixed lab pool at once and prints each answer as it
//! comes in, so the least busy machine is easy to spot.

// Command line arguments and run configuration.
pub mod config;
// Login credentials.
pub mod credential;
// Fan-out/fan-in engine.
pub mod dispatcher;
// Error handling.
pub mod error;
// Remote command execution.
pub mod executor;
// The host pool.
pub mod host;
// Diagnostics setup.
pub mod logging;
// Per-host results.
pub mod outcome;
// Line formatting.
pub mod presenter;

pub use config::{Config, ExecutorKind, LaunchPolicy, RunConfig};
pub use credential::{Credential, Secret};
pub use dispatcher::{Dispatcher, Report};
pub use error::LabmapError;
pub use executor::{ClientExecutor, NativeExecutor, RemoteExecutor};
pub use host::{get_hosts, Host};
pub use outcome::Outcome;
pub use presenter::format_line;
