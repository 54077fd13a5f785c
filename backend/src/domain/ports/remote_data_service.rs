//! Driven port for the hosted table store.
//!
//! The dashboard reads counts and bounded listings and writes single-row
//! updates. Adapters translate [`ListQuery`] into whatever their backend
//! speaks and map failures onto [`QueryError`] and [`UpdateError`].

use async_trait::async_trait;

use super::define_port_error;
use super::query::{FieldUpdates, Filter, ListQuery, Record, Table};

define_port_error! {
    /// Failures while reading from the remote data service.
    pub enum QueryError {
        /// The request never produced a response.
        Transport { message: String } => "remote query transport failed: {message}"; transient,
        /// No response within the configured timeout.
        Timeout { message: String } => "remote query timed out: {message}"; transient,
        /// The caller may not read this table.
        PermissionDenied { message: String } => "remote query not permitted: {message}",
        /// The response body could not be interpreted.
        Decode { message: String } => "remote query response malformed: {message}",
    }
}

define_port_error! {
    /// Failures while writing to the remote data service.
    pub enum UpdateError {
        /// No row with the given identifier exists.
        NotFound { id: String } => "no row with id {id}",
        /// The caller may not modify this row.
        PermissionDenied { message: String } => "update not permitted: {message}",
        /// The service refused the values.
        Rejected { message: String } => "update rejected: {message}",
        Transport { message: String } => "remote update transport failed: {message}"; transient,
        Timeout { message: String } => "remote update timed out: {message}"; transient,
    }
}

/// Table-scoped access to the remote data service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteDataService: Send + Sync {
    /// Number of rows in `table`, optionally restricted by `filter`.
    async fn count(&self, table: Table, filter: Option<Filter>) -> Result<u64, QueryError>;

    /// Rows matching `query`.
    async fn list(&self, query: ListQuery) -> Result<Vec<Record>, QueryError>;

    /// Apply `fields` to the row of `table` whose `id` equals `id`.
    async fn update(&self, table: Table, id: &str, fields: FieldUpdates)
    -> Result<(), UpdateError>;
}
