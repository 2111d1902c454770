//! Row decoding.
//!
//! Each function consumes a row stream and owns it until it returns, so the
//! cursor is always released before the caller sees a result. Decode
//! failures are reported as [`InfoError::DecodeFailed`]; failures raised by
//! the stream itself keep their statement or connection classification.

use futures::{Stream, StreamExt};
use infovault_core::{InfoError, InfoResult};
use tracing::debug;

/// Rows decoded before a sequence read stopped.
#[derive(Debug)]
pub struct PartialRows<T> {
    /// Rows decoded in cursor order.
    pub rows: Vec<T>,
    /// The failure that ended iteration early, if any.
    pub failure: Option<InfoError>,
}

impl<T> PartialRows<T> {
    /// Returns true when every row was decoded.
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// Returns the rows, or the failure if iteration ended early.
    pub fn into_strict(self) -> InfoResult<Vec<T>> {
        match self.failure {
            None => Ok(self.rows),
            Some(error) => Err(error),
        }
    }
}

fn decode_failed(error: sqlx::Error) -> InfoError {
    InfoError::DecodeFailed(error.to_string())
}

/// Decodes the first row and ignores the rest.
pub async fn scalar<R, T, S, F>(mut rows: S, decode: F) -> InfoResult<T>
where
    S: Stream<Item = Result<R, sqlx::Error>> + Unpin,
    F: Fn(&R) -> Result<T, sqlx::Error>,
{
    let first = rows.next().await;
    drop(rows);

    match first {
        Some(Ok(row)) => decode(&row).map_err(decode_failed),
        Some(Err(error)) => Err(error.into()),
        None => Err(InfoError::not_found("statement returned no rows")),
    }
}

/// Decodes every row and keeps the last one.
///
/// A statement matching several rows is not an error; the final row wins.
pub async fn single<R, T, S, F>(mut rows: S, decode: F) -> InfoResult<T>
where
    S: Stream<Item = Result<R, sqlx::Error>> + Unpin,
    F: Fn(&R) -> Result<T, sqlx::Error>,
{
    let mut last = None;
    let mut seen = 0_usize;

    while let Some(row) = rows.next().await {
        let row = row?;
        last = Some(decode(&row).map_err(decode_failed)?);
        seen += 1;
    }
    drop(rows);

    if seen > 1 {
        debug!(rows = seen, "Single-row read matched several rows, keeping the last");
    }

    last.ok_or_else(|| InfoError::not_found("statement returned no rows"))
}

/// Decodes rows in order until the stream ends or a row fails.
pub async fn sequence<R, T, S, F>(mut rows: S, decode: F) -> PartialRows<T>
where
    S: Stream<Item = Result<R, sqlx::Error>> + Unpin,
    F: Fn(&R) -> Result<T, sqlx::Error>,
{
    let mut decoded = Vec::new();
    let mut failure = None;

    while let Some(row) = rows.next().await {
        match row.map_err(InfoError::from).and_then(|row| decode(&row).map_err(decode_failed)) {
            Ok(value) => decoded.push(value),
            Err(error) => {
                failure = Some(error);
                break;
            }
        }
    }
    drop(rows);

    PartialRows {
        rows: decoded,
        failure,
    }
}
