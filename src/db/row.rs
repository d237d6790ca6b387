use crate::error::GridError;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, TypeInfo, ValueRef};
use std::sync::Arc;

/// A value bound to a `?` placeholder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bind {
    Integer(i64),
    Real(f64),
}

/// Statement text plus its bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreQuery {
    sql: Arc<str>,
    binds: Vec<Bind>,
}

impl StoreQuery {
    pub fn new(sql: impl Into<Arc<str>>) -> Self {
        Self {
            sql: sql.into(),
            binds: Vec::new(),
        }
    }

    #[must_use]
    pub fn bind_integer(mut self, value: i64) -> Self {
        self.binds.push(Bind::Integer(value));
        self
    }

    #[must_use]
    pub fn bind_real(mut self, value: f64) -> Self {
        self.binds.push(Bind::Real(value));
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn binds(&self) -> &[Bind] {
        &self.binds
    }
}

/// One result row as the text of each column, in select order.
///
/// NULL columns are carried as empty strings and fail numeric access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreRow(Vec<String>);

impl StoreRow {
    pub fn new(columns: Vec<String>) -> Self {
        Self(columns)
    }

    pub fn text(&self, index: usize) -> Result<&str, GridError> {
        self.0.get(index).map(String::as_str).ok_or_else(|| {
            GridError::Malformed(format!(
                "column {index} missing (row has {} columns)",
                self.0.len()
            ))
        })
    }

    pub fn real(&self, index: usize) -> Result<f64, GridError> {
        let raw = self.text(index)?;
        raw.trim()
            .parse::<f64>()
            .map_err(|e| GridError::Malformed(format!("column {index} = {raw:?}: {e}")))
    }

    pub fn integer(&self, index: usize) -> Result<i64, GridError> {
        let raw = self.text(index)?;
        raw.trim()
            .parse::<i64>()
            .map_err(|e| GridError::Malformed(format!("column {index} = {raw:?}: {e}")))
    }

    /// Text rendering of every column of a SQLite row.
    ///
    /// REAL values use Rust's shortest round-trip formatting so parsing the
    /// text back yields the stored `f64` bit for bit.
    pub(crate) fn from_sqlite(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let mut columns = Vec::with_capacity(row.len());
        for index in 0..row.len() {
            let raw = row.try_get_raw(index)?;
            if raw.is_null() {
                columns.push(String::new());
                continue;
            }
            let text = match raw.type_info().name() {
                "INTEGER" => row.try_get_unchecked::<i64, _>(index)?.to_string(),
                "REAL" => row.try_get_unchecked::<f64, _>(index)?.to_string(),
                _ => row.try_get_unchecked::<String, _>(index)?,
            };
            columns.push(text);
        }
        Ok(Self(columns))
    }
}
