//! Timeout-bounded batch execution
//!
//! Runs one `TickerJob` per submitted spec, each on its own worker thread,
//! and waits at most `per_job_timeout` for its result. A job that misses the
//! budget is disowned: its thread keeps whatever it was doing, its eventual
//! result is discarded, and the slot moves on to the next ticker. One bad
//! ticker never stalls or aborts the rest of the batch.
//!
//! The runner owns the timeout; jobs are written to be safely abandonable
//! rather than forcibly interrupted.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::core::{TickerSpec, VolBatchError, VolBatchResult};
use crate::data::{DiscountCurveSource, OptionChainSource};
use crate::skew::{ReshapeConfig, TickerResult};

use super::job::TickerJob;

/// Per-invocation batch configuration; never global state.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Hard wall-clock budget for each job
    pub per_job_timeout: Duration,
    /// Optional pause between consecutive jobs (upstream rate limiting)
    pub pause_between_jobs: Option<Duration>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            per_job_timeout: Duration::from_secs(120),
            pause_between_jobs: None,
        }
    }
}

impl BatchConfig {
    fn validate(&self) -> VolBatchResult<()> {
        if self.per_job_timeout.is_zero() {
            return Err(VolBatchError::config("per-job timeout must be positive"));
        }
        Ok(())
    }
}

/// Why a ticker's job did not produce a result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum JobFailureKind {
    /// Exceeded the per-job wall-clock budget
    Timeout,
    /// A collaborator failed (network or data layer)
    Upstream(String),
    /// The surface could not be reshaped into a valid grid
    Transform(String),
}

impl JobFailureKind {
    pub fn label(&self) -> &'static str {
        match self {
            JobFailureKind::Timeout => "timeout",
            JobFailureKind::Upstream(_) => "upstream",
            JobFailureKind::Transform(_) => "transform",
        }
    }
}

/// A per-ticker failure, recorded as data in the batch outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobFailure {
    pub ticker: String,
    /// Wall-clock time spent on the job before it failed or was abandoned
    pub elapsed: Duration,
    pub kind: JobFailureKind,
}

impl JobFailure {
    fn timeout(ticker: &str, elapsed: Duration) -> Self {
        Self {
            ticker: ticker.to_string(),
            elapsed,
            kind: JobFailureKind::Timeout,
        }
    }

    fn from_error(ticker: &str, elapsed: Duration, error: VolBatchError) -> Self {
        let kind = match error {
            VolBatchError::Transform(reason)
            | VolBatchError::Config(reason)
            | VolBatchError::Serialization(reason) => JobFailureKind::Transform(reason),
            VolBatchError::Upstream(reason) | VolBatchError::Network(reason) => {
                JobFailureKind::Upstream(reason)
            }
            VolBatchError::IO(e) => JobFailureKind::Upstream(e.to_string()),
        };
        Self {
            ticker: ticker.to_string(),
            elapsed,
            kind,
        }
    }
}

impl std::fmt::Display for JobFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            JobFailureKind::Timeout => {
                write!(f, "{}: timed out after {:.1?}", self.ticker, self.elapsed)
            }
            JobFailureKind::Upstream(reason) => {
                write!(f, "{}: upstream failure: {}", self.ticker, reason)
            }
            JobFailureKind::Transform(reason) => {
                write!(f, "{}: transform failure: {}", self.ticker, reason)
            }
        }
    }
}

/// Outcome of a completed batch: one entry per submitted ticker, in
/// submission order, successes and failures both present.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    entries: Vec<(String, Result<TickerResult, JobFailure>)>,
}

impl BatchOutcome {
    fn push(&mut self, ticker: &str, entry: Result<TickerResult, JobFailure>) {
        self.entries.push((ticker.to_string(), entry));
    }

    pub fn entries(&self) -> &[(String, Result<TickerResult, JobFailure>)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn successes(&self) -> impl Iterator<Item = &TickerResult> {
        self.entries.iter().filter_map(|(_, r)| r.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &JobFailure> {
        self.entries.iter().filter_map(|(_, r)| r.as_ref().err())
    }

    pub fn success_count(&self) -> usize {
        self.successes().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }
}

/// Schedules ticker jobs under a per-job time budget.
///
/// The runner is the only component aware of scheduling; jobs share no
/// mutable state, so the outcome content is the same whether they run
/// sequentially or in parallel.
pub struct BatchRunner {
    chains: Arc<dyn OptionChainSource>,
    discounts: Arc<dyn DiscountCurveSource>,
    reshape: ReshapeConfig,
    config: BatchConfig,
}

impl BatchRunner {
    pub fn new(chains: Arc<dyn OptionChainSource>, discounts: Arc<dyn DiscountCurveSource>) -> Self {
        Self {
            chains,
            discounts,
            reshape: ReshapeConfig::default(),
            config: BatchConfig::default(),
        }
    }

    pub fn with_config(mut self, config: BatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_reshape(mut self, reshape: ReshapeConfig) -> Self {
        self.reshape = reshape;
        self
    }

    /// Process every spec, returning one outcome entry per ticker.
    ///
    /// Fails synchronously (before any job starts) only for configuration
    /// errors: a zero timeout or an empty spec list. Per-ticker failures are
    /// data in the outcome, never control flow.
    pub fn run(&self, specs: &[TickerSpec]) -> VolBatchResult<BatchOutcome> {
        self.config.validate()?;
        if specs.is_empty() {
            return Err(VolBatchError::config("no tickers to process"));
        }

        let mut outcome = BatchOutcome::default();

        for (i, spec) in specs.iter().enumerate() {
            outcome.push(&spec.ticker, self.run_one(spec)?);

            if let Some(pause) = self.config.pause_between_jobs {
                if i + 1 < specs.len() {
                    tracing::debug!("Pausing {:?} before next ticker", pause);
                    thread::sleep(pause);
                }
            }
        }

        tracing::info!(
            "Batch complete: {} succeeded, {} failed of {}",
            outcome.success_count(),
            outcome.failure_count(),
            outcome.len()
        );
        Ok(outcome)
    }

    fn run_one(&self, spec: &TickerSpec) -> VolBatchResult<Result<TickerResult, JobFailure>> {
        let started = Instant::now();
        let (tx, rx) = mpsc::channel();

        let job = TickerJob::new(
            spec.clone(),
            Arc::clone(&self.chains),
            Arc::clone(&self.discounts),
            self.reshape.clone(),
        );
        thread::Builder::new()
            .name(format!("job-{}", spec.ticker))
            .spawn(move || {
                // The receiver may be gone if the job was abandoned; the
                // result is simply discarded then
                let _ = tx.send(job.execute());
            })?;

        let entry = match rx.recv_timeout(self.config.per_job_timeout) {
            Ok(Ok(result)) => {
                tracing::info!(
                    "Processed {} in {:.1?}",
                    spec.ticker,
                    started.elapsed()
                );
                Ok(result)
            }
            Ok(Err(error)) => {
                let failure = JobFailure::from_error(&spec.ticker, started.elapsed(), error);
                tracing::warn!("{}", failure);
                Err(failure)
            }
            Err(RecvTimeoutError::Timeout) => {
                // Disown the worker; dropping the receiver detaches it
                let failure = JobFailure::timeout(&spec.ticker, started.elapsed());
                tracing::warn!("{}", failure);
                Err(failure)
            }
            Err(RecvTimeoutError::Disconnected) => {
                // The worker died without reporting (panic in a collaborator)
                let failure = JobFailure::from_error(
                    &spec.ticker,
                    started.elapsed(),
                    VolBatchError::upstream("job terminated without a result"),
                );
                tracing::warn!("{}", failure);
                Err(failure)
            }
        };
        Ok(entry)
    }
}
