//! Result channel executor.
//!
//! Every statement runs on its own task and reports back over a one-shot
//! channel. The channel carries exactly one [`Outcome`]: the extracted value
//! or the failure that prevented it. Callers never observe both, and a
//! dropped or timed-out caller cancels the worker through its
//! [`CancellationToken`].

use crate::metrics::QueryMetrics;
use infovault_config::ExecutorConfig;
use infovault_core::{InfoError, InfoResult};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{oneshot, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Extraction mode of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// First column of the first row.
    Scalar,
    /// One row mapped onto a structure.
    Single,
    /// Every row mapped onto a structure.
    Sequence,
    /// First column of every row.
    Column,
    /// Insert returning the generated identifier.
    Write,
    /// Statement returning the affected row count.
    Execute,
}

impl Shape {
    /// Returns the label used in logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Single => "single",
            Self::Sequence => "sequence",
            Self::Column => "column",
            Self::Write => "write",
            Self::Execute => "execute",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single message a worker delivers.
#[derive(Debug)]
pub enum Outcome<T> {
    Value(T),
    Failure(InfoError),
}

impl<T> Outcome<T> {
    /// Converts the outcome into a result.
    pub fn into_result(self) -> InfoResult<T> {
        match self {
            Self::Value(value) => Ok(value),
            Self::Failure(error) => Err(error),
        }
    }

    /// Returns true when the outcome carries a value.
    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}

impl<T> From<InfoResult<T>> for Outcome<T> {
    fn from(result: InfoResult<T>) -> Self {
        match result {
            Ok(value) => Self::Value(value),
            Err(error) => Self::Failure(error),
        }
    }
}

/// Runs statements on worker tasks with bounded concurrency.
///
/// Cloning is cheap; clones share the same permit pool.
#[derive(Clone)]
pub struct QueryExecutor {
    permits: Arc<Semaphore>,
    max_in_flight: usize,
    deadline: Option<Duration>,
    scope: CancellationToken,
}

impl QueryExecutor {
    /// Creates an executor allowing `max_in_flight` concurrent statements.
    #[must_use]
    pub fn new(max_in_flight: usize, deadline: Option<Duration>) -> Self {
        let max_in_flight = max_in_flight.max(1);
        Self {
            permits: Arc::new(Semaphore::new(max_in_flight)),
            max_in_flight,
            deadline,
            scope: CancellationToken::new(),
        }
    }

    /// Creates an executor from configuration.
    #[must_use]
    pub fn from_config(config: &ExecutorConfig) -> Self {
        Self::new(config.max_in_flight, config.query_timeout())
    }

    /// Returns a copy that applies `deadline` to every statement.
    #[must_use]
    pub fn with_deadline(&self, deadline: Option<Duration>) -> Self {
        Self {
            deadline,
            ..self.clone()
        }
    }

    /// Returns a copy whose statements are cancelled with `parent`.
    #[must_use]
    pub fn scoped(&self, parent: &CancellationToken) -> Self {
        Self {
            scope: parent.child_token(),
            ..self.clone()
        }
    }

    /// Cancels every statement dispatched through this scope.
    pub fn cancel(&self) {
        self.scope.cancel();
    }

    /// Returns the per-statement deadline.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Returns the configured concurrency bound.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// Returns the number of statements currently holding a permit.
    pub fn in_flight(&self) -> usize {
        self.max_in_flight - self.permits.available_permits()
    }

    /// Runs `work` on a worker task and waits for its single outcome.
    ///
    /// A permit is taken before the worker is spawned, so no more than
    /// `max_in_flight` workers exist at once. The deadline covers both the
    /// wait for a permit and the statement itself.
    ///
    /// `work` owns everything the statement needs, including its row
    /// cursor, so cancelling the worker releases the cursor before any
    /// outcome could be sent.
    pub async fn dispatch<T, F>(&self, shape: Shape, work: F) -> InfoResult<T>
    where
        T: Send + 'static,
        F: Future<Output = InfoResult<T>> + Send + 'static,
    {
        let started = Instant::now();
        let token = self.scope.child_token();
        let guard = token.clone().drop_guard();

        let result = match self.deadline {
            Some(limit) => match tokio::time::timeout(limit, self.run_worker(token, work)).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(shape = %shape, ?limit, "Statement exceeded its deadline");
                    QueryMetrics::timed_out(shape.as_str());
                    // Dropping the guard cancels the worker.
                    drop(guard);
                    return Err(InfoError::Timeout(format!(
                        "{} statement exceeded {:?}",
                        shape, limit
                    )));
                }
            },
            None => self.run_worker(token, work).await,
        };
        guard.disarm();

        let result = result.map_err(|e| match e {
            WorkerError::Outcome(error) => error,
            WorkerError::Vanished => InfoError::internal(format!(
                "{} worker ended without delivering an outcome",
                shape
            )),
        });

        let elapsed = started.elapsed();
        let label = match &result {
            Ok(_) => "ok",
            Err(e) => e.error_code(),
        };
        debug!(shape = %shape, outcome = label, ?elapsed, "Statement completed");
        QueryMetrics::completed(shape.as_str(), label, elapsed);

        result
    }

    async fn run_worker<T, F>(&self, token: CancellationToken, work: F) -> Result<T, WorkerError>
    where
        T: Send + 'static,
        F: Future<Output = InfoResult<T>> + Send + 'static,
    {
        let permit = tokio::select! {
            biased;
            () = token.cancelled() => return Err(WorkerError::Outcome(InfoError::Cancelled)),
            permit = Arc::clone(&self.permits).acquire_owned() => permit
                .map_err(|_| WorkerError::Outcome(InfoError::internal("executor closed")))?,
        };

        let (tx, rx) = oneshot::channel::<Outcome<T>>();
        tokio::spawn(async move {
            let running = QueryMetrics::in_flight();
            let outcome = tokio::select! {
                biased;
                () = token.cancelled() => Outcome::Failure(InfoError::Cancelled),
                result = work => Outcome::from(result),
            };
            drop(running);
            drop(permit);
            // The caller may already have given up.
            let _ = tx.send(outcome);
        });

        match rx.await {
            Ok(outcome) => outcome.into_result().map_err(WorkerError::Outcome),
            Err(_) => Err(WorkerError::Vanished),
        }
    }
}

enum WorkerError {
    Outcome(InfoError),
    Vanished,
}

impl fmt::Debug for QueryExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryExecutor")
            .field("max_in_flight", &self.max_in_flight)
            .field("in_flight", &self.in_flight())
            .field("deadline", &self.deadline)
            .finish()
    }
}
