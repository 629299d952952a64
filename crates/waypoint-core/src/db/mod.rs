//! SQLite access for jobs, activities and delivery records.
//!
//! Each [`Database`] wraps one connection. Callers open a fresh one per
//! operation inside `spawn_blocking`; the schema is applied on every open and
//! is idempotent.

use std::{fmt::Display, path::Path, str::FromStr};

use jiff::Timestamp;
use rusqlite::{types::Type, Connection, Row};

use crate::error::{DatabaseResultExt, Result};

pub mod job_queries;
pub mod migrations;
pub mod record_queries;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}

/// Read a text column and parse it, reporting failures as conversion errors.
pub(crate) fn parse_column<T>(row: &Row<'_>, index: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let text: String = row.get(index)?;
    text.parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::from(e.to_string()))
    })
}

pub(crate) fn timestamp_column(row: &Row<'_>, index: usize) -> rusqlite::Result<Timestamp> {
    parse_column(row, index)
}
