//! Fan-out/fan-in over the host pool.
//!
//! One tokio task is spawned per host. Tasks report back through a single flume channel and the
//! dispatcher prints each result the moment it arrives, until every host has answered or the
//! deadline passes. Tasks still running at the deadline are abandoned, not cancelled; whatever
//! they send afterwards goes nowhere.

use std::io::Write;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{LaunchPolicy, RunConfig};
use crate::credential::Credential;
use crate::error::LabmapError;
use crate::executor::RemoteExecutor;
use crate::host::Host;
use crate::outcome::Outcome;
use crate::presenter::format_line;

/// Message sent from a job to the dispatcher when it finishes.
#[derive(Debug)]
struct Completion {
    /// Index of the host in the dispatcher's host list.
    index: usize,
    outcome: Outcome,
}

/// One host's share of the work. Lives only as long as its task.
struct Job {
    index: usize,
    host: Host,
    command: Arc<str>,
    credential: Arc<Credential>,
    executor: Arc<dyn RemoteExecutor>,
}

impl Job {
    /// Spawns the job. With `slots`, the job waits for a permit before touching the host and
    /// gives it back when the task ends, however it ends.
    fn spawn(self, slots: Option<Arc<Semaphore>>, completion_tx: flume::Sender<Completion>) {
        tokio::spawn(async move {
            let _permit = match slots {
                Some(slots) => match slots.acquire_owned().await {
                    Ok(permit) => Some(permit),
                    // The semaphore is never closed.
                    Err(_) => return,
                },
                None => None,
            };
            if completion_tx.is_disconnected() {
                debug!(host = %self.host, "run is over, not launching");
                return;
            }
            debug!(host = %self.host, "launching");
            let outcome = self
                .executor
                .execute(&self.host, &self.command, &self.credential)
                .await;
            // Fails once the dispatcher stopped listening, which is fine.
            let _ = completion_tx.send(Completion {
                index: self.index,
                outcome,
            });
        });
    }
}

/// What happened to each host during a run. Hosts appear in the order they were observed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Report {
    /// Hosts that ran the command.
    pub completed: Vec<Host>,
    /// Hosts that answered with a failure.
    pub failed: Vec<Host>,
    /// Hosts that had not answered when the deadline passed.
    pub timed_out: Vec<Host>,
}

pub struct Dispatcher {
    hosts: Vec<Host>,
    config: RunConfig,
    credential: Arc<Credential>,
    executor: Arc<dyn RemoteExecutor>,
}

impl Dispatcher {
    pub fn new(
        hosts: Vec<Host>,
        config: RunConfig,
        credential: Credential,
        executor: Arc<dyn RemoteExecutor>,
    ) -> Self {
        Self {
            hosts,
            config,
            credential: Arc::new(credential),
            executor,
        }
    }

    /// Runs the command on every host and writes one line per answer to `out`, in the order
    /// the answers arrive.
    ///
    /// Returns when all hosts have answered or the timeout has elapsed, whichever comes first.
    /// Only a failure to write to `out` is an error.
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<Report, LabmapError> {
        let deadline = Instant::now() + self.config.timeout;
        info!(
            hosts = self.hosts.len(),
            policy = ?self.config.policy,
            timeout = ?self.config.timeout,
            "dispatching"
        );

        // Capacity for every host, so a job never waits on the dispatcher to send.
        let (completion_tx, completion_rx) = flume::bounded(self.hosts.len().max(1));
        self.launch(completion_tx);

        let mut answered = vec![false; self.hosts.len()];
        let mut remaining = self.hosts.len();
        let mut report = Report::default();

        let timer = tokio::time::sleep_until(deadline);
        tokio::pin!(timer);

        while remaining > 0 {
            tokio::select! {
                // Once the deadline has passed, nothing else is accepted.
                biased;
                _ = &mut timer => {
                    debug!("deadline reached");
                    break;
                }
                received = completion_rx.recv_async() => {
                    // All senders gone with hosts still missing means some jobs panicked.
                    let Ok(Completion { index, outcome }) = received else {
                        break;
                    };
                    if std::mem::replace(&mut answered[index], true) {
                        continue;
                    }
                    remaining -= 1;

                    let host = &self.hosts[index];
                    debug!(host = %host, failed = outcome.is_failed(), "received");
                    let line = format_line(host, &outcome, &self.config.placeholder);
                    out.write_all(line.as_bytes())?;
                    out.flush()?;

                    match outcome {
                        Outcome::Completed(_) => report.completed.push(host.clone()),
                        Outcome::Failed(_) => report.failed.push(host.clone()),
                    }
                }
            }
        }

        report.timed_out = self
            .hosts
            .iter()
            .zip(answered)
            .filter(|(_, answered)| !answered)
            .map(|(host, _)| host.clone())
            .collect();

        if !report.timed_out.is_empty() {
            let names: Vec<&str> = report.timed_out.iter().map(|h| h.name.as_str()).collect();
            warn!(hosts = %names.join(","), "no answer before the deadline");
        }
        info!(
            completed = report.completed.len(),
            failed = report.failed.len(),
            timed_out = report.timed_out.len(),
            "done"
        );
        Ok(report)
    }

    /// Starts one job per host according to the launch policy. Returns without waiting for any
    /// job; with pacing, launching continues in the background until every job is out or the run
    /// is over, whichever comes first.
    fn launch(&self, completion_tx: flume::Sender<Completion>) {
        let command: Arc<str> = Arc::from(self.config.command.as_str());
        let jobs = self.hosts.iter().enumerate().map(|(index, host)| Job {
            index,
            host: host.clone(),
            command: Arc::clone(&command),
            credential: Arc::clone(&self.credential),
            executor: Arc::clone(&self.executor),
        });

        match self.config.policy {
            LaunchPolicy::Bounded(slots) => {
                let slots = Arc::new(Semaphore::new(slots));
                for job in jobs {
                    job.spawn(Some(Arc::clone(&slots)), completion_tx.clone());
                }
            }
            LaunchPolicy::Paced(downtime) => {
                let jobs: Vec<Job> = jobs.collect();
                let total = jobs.len();
                tokio::spawn(async move {
                    for (i, job) in jobs.into_iter().enumerate() {
                        if i > 0 && !downtime.is_zero() {
                            tokio::time::sleep(downtime).await;
                        }
                        // The receiver goes away when `run` returns.
                        if completion_tx.is_disconnected() {
                            debug!(remaining = total - i, "run is over, stopping launches");
                            return;
                        }
                        job.spawn(None, completion_tx.clone());
                    }
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;

    use crate::credential::Secret;

    /// Echoes the host name back.
    struct Echo;

    #[async_trait]
    impl RemoteExecutor for Echo {
        async fn execute(&self, host: &Host, _command: &str, _credential: &Credential) -> Outcome {
            Outcome::Completed(format!("{}\n", host.name))
        }
    }

    fn dispatcher(hosts: &[&str], policy: LaunchPolicy) -> Dispatcher {
        let config = RunConfig {
            timeout: Duration::from_secs(1),
            policy,
            ..RunConfig::default()
        };
        Dispatcher::new(
            hosts.iter().copied().map(Host::new).collect(),
            config,
            Credential::new("alice", Secret::DefaultIdentity),
            Arc::new(Echo),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_host_reports_once() {
        let dispatcher = dispatcher(&["al", "bart", "ca"], LaunchPolicy::Bounded(2));
        let mut out = Vec::new();
        let report = dispatcher.run(&mut out).await.unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.lines().count(), 3);
        for name in ["al", "bart", "ca"] {
            assert_eq!(out.lines().filter(|l| l.starts_with(name)).count(), 1);
        }
        assert_eq!(report.completed.len(), 3);
        assert!(report.failed.is_empty());
        assert!(report.timed_out.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_pool_returns_immediately() {
        let dispatcher = dispatcher(&[], LaunchPolicy::Paced(Duration::from_millis(10)));
        let started = Instant::now();
        let mut out = Vec::new();
        let report = dispatcher.run(&mut out).await.unwrap();
        assert!(out.is_empty());
        assert_eq!(report, Report::default());
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
