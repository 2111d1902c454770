//! Parameterized SQL statements.
//!
//! A [`Statement`] owns its SQL text and positional parameters so it can be
//! moved onto an executor task. Values are always bound as parameters and
//! never interpolated into the SQL text.

use chrono::{DateTime, Utc};
use sqlx::mysql::{MySql, MySqlArguments};
use sqlx::query::Query;
use std::fmt;
use std::sync::Arc;

/// A positional statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Timestamp(DateTime<Utc>),
}

impl Param {
    fn bind_to<'q>(
        &'q self,
        query: Query<'q, MySql, MySqlArguments>,
    ) -> Query<'q, MySql, MySqlArguments> {
        match self {
            Self::Null => query.bind(None::<String>),
            Self::Bool(v) => query.bind(*v),
            Self::Int(v) => query.bind(*v),
            Self::UInt(v) => query.bind(*v),
            Self::Float(v) => query.bind(*v),
            Self::Text(v) => query.bind(v.as_str()),
            Self::Bytes(v) => query.bind(v.as_slice()),
            Self::Timestamp(v) => query.bind(*v),
        }
    }
}

macro_rules! impl_param_from {
    ($variant:ident: $($ty:ty),+) => {
        $(
            impl From<$ty> for Param {
                fn from(value: $ty) -> Self {
                    Self::$variant(value.into())
                }
            }
        )+
    };
}

impl_param_from!(Bool: bool);
impl_param_from!(Int: i8, i16, i32, i64);
impl_param_from!(UInt: u8, u16, u32, u64);
impl_param_from!(Float: f32, f64);
impl_param_from!(Text: String, &str);
impl_param_from!(Bytes: Vec<u8>);
impl_param_from!(Timestamp: DateTime<Utc>);

impl<T: Into<Param>> From<Option<T>> for Param {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// SQL text plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: Arc<str>,
    params: Vec<Param>,
}

impl Statement {
    /// Creates a statement with no parameters.
    pub fn new(sql: impl Into<Arc<str>>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Appends the next positional parameter.
    #[must_use]
    pub fn bind(mut self, value: impl Into<Param>) -> Self {
        self.params.push(value.into());
        self
    }

    /// Returns the SQL text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the bound parameters in order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Builds the sqlx query with every parameter bound.
    pub(crate) fn query(&self) -> Query<'_, MySql, MySqlArguments> {
        self.params
            .iter()
            .fold(sqlx::query(&self.sql), |query, param| param.bind_to(query))
    }

    /// Single-line form of the SQL text for log lines.
    pub fn summary(&self) -> String {
        const MAX: usize = 96;
        let collapsed = self.sql.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.chars().count() <= MAX {
            collapsed
        } else {
            let mut short: String = collapsed.chars().take(MAX).collect();
            short.push_str("...");
            short
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} params)", self.summary(), self.params.len())
    }
}
