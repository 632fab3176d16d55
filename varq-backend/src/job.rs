//! Sampling job handles
//!
//! A job moves through `Submitted → Running → Completed` (or `Failed`).
//! There is no cancellation state: [`SamplingJob::result`] is the single
//! blocking operation of the execution abstraction and waits until the job
//! finishes. A backend that wants timeouts or cancellation defines them on
//! its own job type.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::mpsc::{Receiver, Sender, TryRecvError};

use crate::error::{BackendError, Result};
use crate::result::{CompositeSamplingResult, CountsResult, SamplingCounts, SamplingResult};

/// Position of a job in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// Accepted by the backend, not yet running
    Submitted,

    /// Currently executing
    Running,

    /// Finished with a result
    Completed,

    /// Finished with an error
    Failed,
}

impl Default for JobStatus {
    fn default() -> Self {
        JobStatus::Submitted
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Submitted => write!(f, "Submitted"),
            JobStatus::Running => write!(f, "Running"),
            JobStatus::Completed => write!(f, "Completed"),
            JobStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// A handle to an in-flight or completed sampling measurement
pub trait SamplingJob: Send + Sync {
    /// Returns the result of the sampling job
    ///
    /// If the job is not complete, this call blocks until it finishes.
    /// Execution-layer failures surface as [`BackendError`] exactly as the
    /// backend reported them.
    fn result(&self) -> Result<Box<dyn SamplingResult>>;

    /// Current lifecycle position of the job
    fn status(&self) -> JobStatus;
}

/// A job that finished before the handle was handed out
///
/// Synchronous backends run the measurement inside
/// [`SamplingBackend::sample`](crate::SamplingBackend::sample) and wrap the
/// outcome in this handle, so `result()` never blocks.
#[derive(Debug, Clone)]
pub struct CompletedSamplingJob {
    outcome: Result<SamplingCounts>,
}

impl CompletedSamplingJob {
    /// Wrap a finished measurement
    pub fn new(counts: SamplingCounts) -> Self {
        Self {
            outcome: Ok(counts),
        }
    }

    /// Wrap a failed measurement
    pub fn failed(error: BackendError) -> Self {
        Self {
            outcome: Err(error),
        }
    }
}

impl SamplingJob for CompletedSamplingJob {
    fn result(&self) -> Result<Box<dyn SamplingResult>> {
        self.outcome
            .as_ref()
            .map(|counts| Box::new(CountsResult::new(counts.clone())) as Box<dyn SamplingResult>)
            .map_err(Clone::clone)
    }

    fn status(&self) -> JobStatus {
        match self.outcome {
            Ok(_) => JobStatus::Completed,
            Err(_) => JobStatus::Failed,
        }
    }
}

enum ChannelState {
    Pending(Receiver<Result<SamplingCounts>>),
    Done(Result<SamplingCounts>),
}

/// A job completed asynchronously through a channel
///
/// The backend keeps the [`Sender`] and delivers the measurement outcome
/// from whatever thread runs it; `result()` blocks on the channel the first
/// time and caches the outcome, so it can be called repeatedly. Concurrent
/// `result()` calls serialize on the internal lock.
///
/// # Example
/// ```
/// use varq_backend::{ChannelSamplingJob, JobStatus, SamplingJob};
///
/// let (job, sender) = ChannelSamplingJob::new();
/// assert_eq!(job.status(), JobStatus::Running);
///
/// sender.send(Ok([(0, 100.0)].into_iter().collect())).unwrap();
/// assert_eq!(job.result().unwrap().counts()[&0], 100.0);
/// assert_eq!(job.status(), JobStatus::Completed);
/// ```
pub struct ChannelSamplingJob {
    state: Mutex<ChannelState>,
}

impl ChannelSamplingJob {
    /// Create a pending job and the sender that will complete it
    pub fn new() -> (Self, Sender<Result<SamplingCounts>>) {
        let (sender, receiver) = std::sync::mpsc::channel();
        (
            Self {
                state: Mutex::new(ChannelState::Pending(receiver)),
            },
            sender,
        )
    }

    fn disconnected() -> BackendError {
        BackendError::ExecutionFailed("backend dropped the result channel".to_string())
    }
}

impl SamplingJob for ChannelSamplingJob {
    fn result(&self) -> Result<Box<dyn SamplingResult>> {
        let mut state = self.state.lock();
        if let ChannelState::Pending(receiver) = &*state {
            let outcome = receiver.recv().unwrap_or_else(|_| Err(Self::disconnected()));
            *state = ChannelState::Done(outcome);
        }
        match &*state {
            ChannelState::Done(Ok(counts)) => {
                Ok(Box::new(CountsResult::new(counts.clone())) as Box<dyn SamplingResult>)
            }
            ChannelState::Done(Err(error)) => Err(error.clone()),
            ChannelState::Pending(_) => unreachable!("state settled above"),
        }
    }

    fn status(&self) -> JobStatus {
        let mut state = self.state.lock();
        if let ChannelState::Pending(receiver) = &*state {
            match receiver.try_recv() {
                Ok(outcome) => *state = ChannelState::Done(outcome),
                Err(TryRecvError::Empty) => return JobStatus::Running,
                Err(TryRecvError::Disconnected) => {
                    *state = ChannelState::Done(Err(Self::disconnected()))
                }
            }
        }
        match &*state {
            ChannelState::Done(Ok(_)) => JobStatus::Completed,
            ChannelState::Done(Err(_)) => JobStatus::Failed,
            ChannelState::Pending(_) => JobStatus::Running,
        }
    }
}

/// A sampling job containing multiple sampling jobs
///
/// Splits one logical measurement into several physical submissions
/// (different backends, or shot batches) transparently to callers:
/// `result()` blocks on every member in order and merges their counts. The
/// first member failure propagates and the remaining members are left
/// untouched.
pub struct CompositeSamplingJob {
    jobs: Vec<Box<dyn SamplingJob>>,
}

impl CompositeSamplingJob {
    /// Compose a collection of jobs
    pub fn new(jobs: Vec<Box<dyn SamplingJob>>) -> Self {
        Self { jobs }
    }

    /// The member jobs
    pub fn jobs(&self) -> &[Box<dyn SamplingJob>] {
        &self.jobs
    }
}

impl SamplingJob for CompositeSamplingJob {
    fn result(&self) -> Result<Box<dyn SamplingResult>> {
        let results = self
            .jobs
            .iter()
            .map(|job| job.result())
            .collect::<Result<Vec<_>>>()?;
        Ok(Box::new(CompositeSamplingResult::new(results)))
    }

    fn status(&self) -> JobStatus {
        let statuses: Vec<JobStatus> = self.jobs.iter().map(|job| job.status()).collect();
        if statuses.iter().any(|&s| s == JobStatus::Failed) {
            JobStatus::Failed
        } else if statuses.iter().all(|&s| s == JobStatus::Completed) {
            JobStatus::Completed
        } else if statuses.iter().any(|&s| s != JobStatus::Submitted) {
            JobStatus::Running
        } else {
            JobStatus::Submitted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(u64, f64)]) -> SamplingCounts {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_completed_job_returns_counts() {
        let job = CompletedSamplingJob::new(counts(&[(1, 10.0)]));
        assert_eq!(job.status(), JobStatus::Completed);
        assert_eq!(job.result().unwrap().counts()[&1], 10.0);
    }

    #[test]
    fn test_failed_job_propagates_error() {
        let job = CompletedSamplingJob::failed(BackendError::Unavailable("offline".to_string()));
        assert_eq!(job.status(), JobStatus::Failed);
        assert!(matches!(
            job.result(),
            Err(BackendError::Unavailable(_))
        ));
    }

    #[test]
    fn test_channel_job_blocks_until_sent() {
        let (job, sender) = ChannelSamplingJob::new();
        let worker = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(20));
            sender.send(Ok(counts(&[(0, 64.0)]))).unwrap();
        });

        let result = job.result().unwrap();
        assert_eq!(result.counts()[&0], 64.0);
        worker.join().unwrap();
    }

    #[test]
    fn test_channel_job_result_is_repeatable() {
        let (job, sender) = ChannelSamplingJob::new();
        sender.send(Ok(counts(&[(2, 5.0)]))).unwrap();
        drop(sender);

        assert_eq!(job.result().unwrap().counts()[&2], 5.0);
        assert_eq!(job.result().unwrap().counts()[&2], 5.0);
        assert_eq!(job.status(), JobStatus::Completed);
    }

    #[test]
    fn test_channel_job_dropped_sender_fails() {
        let (job, sender) = ChannelSamplingJob::new();
        drop(sender);
        assert!(matches!(job.result(), Err(BackendError::ExecutionFailed(_))));
        assert_eq!(job.status(), JobStatus::Failed);
    }

    #[test]
    fn test_composite_job_merges_member_counts() {
        let composite = CompositeSamplingJob::new(vec![
            Box::new(CompletedSamplingJob::new(counts(&[(0, 30.0)]))),
            Box::new(CompletedSamplingJob::new(counts(&[(0, 20.0), (3, 50.0)]))),
        ]);

        assert_eq!(composite.status(), JobStatus::Completed);
        let merged = composite.result().unwrap().counts();
        assert_eq!(merged[&0], 50.0);
        assert_eq!(merged[&3], 50.0);
    }

    #[test]
    fn test_composite_job_fails_if_any_member_fails() {
        let composite = CompositeSamplingJob::new(vec![
            Box::new(CompletedSamplingJob::new(counts(&[(0, 1.0)]))),
            Box::new(CompletedSamplingJob::failed(BackendError::ExecutionFailed(
                "device fault".to_string(),
            ))),
        ]);

        assert_eq!(composite.status(), JobStatus::Failed);
        assert!(composite.result().is_err());
    }

    #[test]
    fn test_composite_status_running_while_members_pending() {
        let (pending, _sender) = ChannelSamplingJob::new();
        let composite = CompositeSamplingJob::new(vec![
            Box::new(CompletedSamplingJob::new(counts(&[(0, 1.0)]))),
            Box::new(pending),
        ]);
        assert_eq!(composite.status(), JobStatus::Running);
    }

    #[test]
    fn test_job_status_display() {
        assert_eq!(format!("{}", JobStatus::Submitted), "Submitted");
        assert_eq!(format!("{}", JobStatus::Failed), "Failed");
    }
}
