//! Configuration for labmap.
//!
//! `Config` holds the clap structs for command line arguments and flags. It is turned into a
//! `RunConfig` exactly once at startup; nothing downstream looks at raw arguments.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::error::LabmapError;

/// Counts everyone logged in, physically or remotely.
pub const DEFAULT_COMMAND: &str = "echo \"$(users | wc -w) users\"";

const AFTER_HELP: &str = "\
labmap helps you avoid the busiest CS machines. It maps a single command across the lab \
machines and prints one line per host as the answers come in. By default it tells you how \
many users are logged in on each system.

Examples:
    Least busy hosts first:   labmap you | awk '{print $2,$1}' | sort -n
    Busiest hosts first:      labmap you | awk '{print $2,$1}' | sort -nr
    Only free hosts:          labmap you | awk '{if (!$2) print $1}'
    Full uptime:              labmap -c uptime you
    Names of connected users: labmap -c users --placeholder '-----' you";

#[derive(Parser, Debug)]
#[command(
    name = "labmap",
    version,
    about = "the LAB MAchine Probe",
    after_help = AFTER_HELP,
    disable_version_flag = true
)]
pub struct Config {
    /// User to log in as
    pub username: String,

    /// Custom command to run on every host
    #[arg(long, short, default_value = DEFAULT_COMMAND)]
    pub command: String,

    /// Use this password instead of prompting for one
    #[arg(long, short)]
    pub password: Option<String>,

    /// Private key file to authenticate with
    #[arg(long, short)]
    pub keyfile: Option<PathBuf>,

    /// Time to wait for responses, e.g. 5s or 1500ms
    #[arg(long, short, default_value = "5s", value_parser = parse_duration)]
    pub timeout: Duration,

    /// Time to wait between launching connections
    #[arg(long, short, default_value = "0s", value_parser = parse_duration)]
    pub downtime: Duration,

    /// Run at most this many connections at once instead of pacing them
    #[arg(long, short, conflicts_with = "downtime")]
    pub slots: Option<usize>,

    /// Printed in place of missing output
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub placeholder: String,

    /// How to reach the hosts
    #[arg(long, short, value_enum, default_value_t = ExecutorKind::Client)]
    pub executor: ExecutorKind,

    /// Print version
    #[arg(short = 'v', long, action = clap::ArgAction::Version)]
    version: Option<bool>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, ValueEnum)]
pub enum ExecutorKind {
    /// The system `ssh` client.
    Client,
    /// Built-in SSH implementation. Supports passwords.
    Native,
}

/// How jobs are started.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LaunchPolicy {
    /// At most this many jobs talk to their host at the same time.
    Bounded(usize),
    /// Jobs start one after another with this delay in between. No bound on concurrency.
    Paced(Duration),
}

/// Everything one run needs besides hosts and credentials.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub command: String,
    /// Deadline measured from the start of the batch.
    pub timeout: Duration,
    pub policy: LaunchPolicy,
    pub placeholder: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_COMMAND.to_string(),
            timeout: Duration::from_secs(5),
            policy: LaunchPolicy::Paced(Duration::ZERO),
            placeholder: String::new(),
        }
    }
}

impl RunConfig {
    pub fn from_config(cli: &Config) -> Result<Self, LabmapError> {
        let policy = match cli.slots {
            Some(0) => return Err(LabmapError::InvalidSlots(0)),
            Some(slots) => LaunchPolicy::Bounded(slots),
            None => LaunchPolicy::Paced(cli.downtime),
        };
        Ok(Self {
            command: cli.command.clone(),
            timeout: cli.timeout,
            policy,
            placeholder: cli.placeholder.clone(),
        })
    }
}

/// Parses durations like `5s`, `250ms` or `1m 30s`.
pub fn parse_duration(input: &str) -> Result<Duration, LabmapError> {
    humantime::parse_duration(input).map_err(|source| LabmapError::InvalidDuration {
        input: input.to_string(),
        source,
    })
}
