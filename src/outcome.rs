/// Result of running the command on one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The command ran. Holds its standard output, whatever the exit status was.
    Completed(String),
    /// The session could not be set up or the command could not be run.
    Failed(String),
}

impl Outcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}
