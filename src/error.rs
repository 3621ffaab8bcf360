use thiserror::Error;

/// Local errors that abort the whole run.
///
/// Per-host failures never show up here; they are reported in-band as
/// [`Outcome::Failed`](crate::Outcome::Failed).
#[derive(Error, Debug)]
pub enum LabmapError {
    #[error("Invalid duration '{input}': {source}")]
    InvalidDuration {
        input: String,
        #[source]
        source: humantime::DurationError,
    },
    #[error("Concurrency bound must be at least 1, got {0}")]
    InvalidSlots(usize),
    #[error("Failed to read password: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error("Failed to write to output: {0}")]
    Output(#[from] std::io::Error),
}
