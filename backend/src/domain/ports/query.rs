//! Query vocabulary shared by the remote data service port and its adapters.
//!
//! The port speaks in tables, equality filters, a single foreign-key join and
//! a descending order. That covers every read the dashboard issues; anything
//! richer belongs in the remote service itself.

use std::fmt;

use serde_json::{Map, Value};

/// A row as returned by the remote service: an untyped JSON object.
pub type Record = Map<String, Value>;

/// Remote tables the application reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Users,
    Apartments,
    Applications,
    Complaints,
}

impl Table {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Apartments => "apartments",
            Self::Applications => "applications",
            Self::Complaints => "complaints",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Equality predicate `column = value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: &'static str,
    pub value: Value,
}

impl Filter {
    pub fn eq(column: &'static str, value: impl Into<Value>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }

    /// Whether `record` satisfies the predicate.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        record.get(self.column) == Some(&self.value)
    }
}

/// Resolve `foreign_key` against `table.id` and embed the selected columns
/// under `alias`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub alias: &'static str,
    pub foreign_key: &'static str,
    pub table: Table,
    pub columns: &'static [&'static str],
}

/// Sort key. Only descending order is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: &'static str,
}

impl OrderBy {
    pub fn descending(column: &'static str) -> Self {
        Self { column }
    }
}

/// A bounded, optionally joined listing.
///
/// # Examples
/// ```
/// use rentify::domain::ports::{ListQuery, OrderBy, Table};
///
/// let query = ListQuery::new(Table::Apartments)
///     .order_by(OrderBy::descending("created_at"))
///     .limit(10);
/// assert_eq!(query.limit, Some(10));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub table: Table,
    pub filter: Option<Filter>,
    pub join: Option<Join>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl ListQuery {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            filter: None,
            join: None,
            order_by: None,
            limit: None,
        }
    }

    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub fn join(mut self, join: Join) -> Self {
        self.join = Some(join);
        self
    }

    #[must_use]
    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Column assignments for a single-row update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldUpdates(Record);

impl FieldUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.0.insert(column.to_owned(), value.into());
        self
    }

    pub fn as_record(&self) -> &Record {
        &self.0
    }

    pub fn into_record(self) -> Record {
        self.0
    }
}
