//! Query facade.
//!
//! Typed entry points over the executor and decoder. Every read comes in a
//! strict form, which returns the classified error, and a best-effort
//! `_or_default` form, which reports the failure to the diagnostic sink and
//! returns the type's zero value instead.

use crate::decoder::{self, PartialRows};
use crate::executor::{QueryExecutor, Shape};
use crate::metrics::QueryMetrics;
use crate::pool::DatabasePoolInterface;
use crate::statement::Statement;
use infovault_core::{InfoError, InfoResult, SharedSink};
use sqlx::mysql::{MySql, MySqlPool, MySqlRow};
use sqlx::{Decode, FromRow, Row, Type};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Typed MySQL access through the result channel executor.
#[derive(Clone)]
pub struct QueryFacade {
    pool: MySqlPool,
    executor: QueryExecutor,
    sink: SharedSink,
}

impl QueryFacade {
    /// Creates a facade over `pool`.
    pub fn new(pool: &dyn DatabasePoolInterface, executor: QueryExecutor, sink: SharedSink) -> Self {
        Self {
            pool: pool.inner().clone(),
            executor,
            sink,
        }
    }

    /// Returns a copy whose statements are cancelled with `token`.
    #[must_use]
    pub fn scoped(&self, token: &CancellationToken) -> Self {
        Self {
            executor: self.executor.scoped(token),
            ..self.clone()
        }
    }

    /// Returns a copy applying `deadline` to every statement.
    #[must_use]
    pub fn with_deadline(&self, deadline: Option<Duration>) -> Self {
        Self {
            executor: self.executor.with_deadline(deadline),
            ..self.clone()
        }
    }

    /// Returns the underlying executor.
    pub fn executor(&self) -> &QueryExecutor {
        &self.executor
    }

    /// Reads the first column of the first row.
    ///
    /// Fails with [`InfoError::NotFound`] when the statement returns no rows.
    pub async fn read_value<T>(&self, statement: &Statement) -> InfoResult<T>
    where
        T: for<'r> Decode<'r, MySql> + Type<MySql> + Send + Unpin + 'static,
    {
        self.run(Shape::Scalar, statement, |pool, statement| async move {
            let rows = statement.query().fetch(&pool);
            decoder::scalar(rows, |row: &MySqlRow| row.try_get::<T, _>(0)).await
        })
        .await
    }

    /// Reads a scalar, answering `T::default()` on any failure.
    pub async fn read_value_or_default<T>(&self, statement: &Statement) -> T
    where
        T: for<'r> Decode<'r, MySql> + Type<MySql> + Default + Send + Unpin + 'static,
    {
        let result = self.read_value(statement).await;
        self.or_default(Shape::Scalar, statement, result)
    }

    /// Reads one row into `T`. The last row wins when several match.
    pub async fn read_struct<T>(&self, statement: &Statement) -> InfoResult<T>
    where
        T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin + 'static,
    {
        self.run(Shape::Single, statement, |pool, statement| async move {
            let rows = statement.query().fetch(&pool);
            decoder::single(rows, |row: &MySqlRow| T::from_row(row)).await
        })
        .await
    }

    /// Reads one row, answering `T::default()` on any failure.
    pub async fn read_struct_or_default<T>(&self, statement: &Statement) -> T
    where
        T: for<'r> FromRow<'r, MySqlRow> + Default + Send + Unpin + 'static,
    {
        let result = self.read_struct(statement).await;
        self.or_default(Shape::Single, statement, result)
    }

    /// Reads every row into `T`, failing if any row fails.
    pub async fn read_sequence<T>(&self, statement: &Statement) -> InfoResult<Vec<T>>
    where
        T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin + 'static,
    {
        self.read_partial::<T>(statement).await?.into_strict()
    }

    /// Reads rows into `T`, keeping the rows decoded before a failure.
    pub async fn read_sequence_or_default<T>(&self, statement: &Statement) -> Vec<T>
    where
        T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin + 'static,
    {
        match self.read_partial::<T>(statement).await {
            Ok(PartialRows {
                rows,
                failure: Some(error),
            }) => {
                self.report(Shape::Sequence, statement, &error);
                rows
            }
            Ok(partial) => partial.rows,
            Err(error) => {
                self.report(Shape::Sequence, statement, &error);
                Vec::new()
            }
        }
    }

    /// Reads the first column of every row.
    pub async fn read_column<T>(&self, statement: &Statement) -> InfoResult<Vec<T>>
    where
        T: for<'r> Decode<'r, MySql> + Type<MySql> + Send + Unpin + 'static,
    {
        self.run(Shape::Column, statement, |pool, statement| async move {
            let rows = statement.query().fetch(&pool);
            decoder::sequence(rows, |row: &MySqlRow| row.try_get::<T, _>(0))
                .await
                .into_strict()
        })
        .await
    }

    /// Runs an insert and returns the generated identifier.
    ///
    /// Fails with [`InfoError::NoGeneratedIdentifier`] when the table has no
    /// auto-increment column.
    pub async fn write(&self, statement: &Statement) -> InfoResult<u64> {
        self.run(Shape::Write, statement, |pool, statement| async move {
            let done = statement.query().execute(&pool).await?;
            match done.last_insert_id() {
                0 => Err(InfoError::NoGeneratedIdentifier),
                id => Ok(id),
            }
        })
        .await
    }

    /// Runs a statement and returns the number of affected rows.
    pub async fn execute(&self, statement: &Statement) -> InfoResult<u64> {
        self.run(Shape::Execute, statement, |pool, statement| async move {
            let done = statement.query().execute(&pool).await?;
            Ok::<_, InfoError>(done.rows_affected())
        })
        .await
    }

    async fn read_partial<T>(&self, statement: &Statement) -> InfoResult<PartialRows<T>>
    where
        T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin + 'static,
    {
        self.run(Shape::Sequence, statement, |pool, statement| async move {
            let rows = statement.query().fetch(&pool);
            Ok::<_, InfoError>(decoder::sequence(rows, |row: &MySqlRow| T::from_row(row)).await)
        })
        .await
    }

    async fn run<T, W, Fut>(&self, shape: Shape, statement: &Statement, work: W) -> InfoResult<T>
    where
        T: Send + 'static,
        W: FnOnce(MySqlPool, Statement) -> Fut,
        Fut: Future<Output = InfoResult<T>> + Send + 'static,
    {
        debug!(shape = %shape, sql = %statement.summary(), "Dispatching statement");
        let work = work(self.pool.clone(), statement.clone());
        self.executor.dispatch(shape, work).await
    }

    fn or_default<T: Default>(&self, shape: Shape, statement: &Statement, result: InfoResult<T>) -> T {
        result.unwrap_or_else(|error| {
            self.report(shape, statement, &error);
            T::default()
        })
    }

    fn report(&self, shape: Shape, statement: &Statement, error: &InfoError) {
        QueryMetrics::fallback(shape.as_str());
        self.sink.report(&format!(
            "{} read failed for `{}`: {}",
            shape,
            statement.summary(),
            error
        ));
    }
}

impl std::fmt::Debug for QueryFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryFacade")
            .field("executor", &self.executor)
            .finish_non_exhaustive()
    }
}
