//! Decoding of untyped remote rows into typed domain records.
//!
//! The remote data service hands back JSON objects. Each record type declares
//! a lenient row shape (`*Row`, deserialised with serde) and a `TryFrom` into
//! the strict record; [`decode_rows`] applies both and drops rows whose
//! required fields are missing or malformed.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use super::ports::{Record, Table};
use super::user::ContactSummary;

/// Why a row could not become a typed record.
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    #[error("row does not match the expected shape: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("field `{field}` is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl RowError {
    /// A present field whose value failed validation.
    pub fn invalid(field: &'static str, reason: impl ToString) -> Self {
        Self::InvalidField {
            field,
            reason: reason.to_string(),
        }
    }
}

/// Decode `rows` fetched from `table`, skipping any that fail validation.
pub fn decode_rows<R, T>(table: Table, rows: Vec<Record>) -> Vec<T>
where
    R: DeserializeOwned,
    T: TryFrom<R, Error = RowError>,
{
    let total = rows.len();
    let decoded: Vec<T> = rows
        .into_iter()
        .filter_map(|row| {
            let id = row.get("id").cloned().unwrap_or(Value::Null);
            match serde_json::from_value::<R>(Value::Object(row))
                .map_err(RowError::from)
                .and_then(T::try_from)
            {
                Ok(record) => Some(record),
                Err(error) => {
                    warn!(table = %table, row_id = %id, %error, "skipping malformed row");
                    None
                }
            }
        })
        .collect();
    if decoded.len() < total {
        warn!(
            table = %table,
            skipped = total - decoded.len(),
            "some rows were dropped during decoding"
        );
    }
    decoded
}

/// Treat an explicit `null` like a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Like [`null_as_default`] but defaulting to `true`.
pub fn null_as_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

/// Serde default for flags that are on unless stated otherwise.
pub fn default_true() -> bool {
    true
}

/// Accept RFC 3339 strings; anything else becomes `None`.
pub fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_str)
        .and_then(parse_timestamp))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .ok()
}

/// Joined `{full_name, email}` object; `null` or a non-object yields `None`.
pub fn lenient_contact<'de, D>(deserializer: D) -> Result<Option<ContactSummary>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct ContactRow {
        #[serde(default, deserialize_with = "null_as_default")]
        full_name: String,
        #[serde(default, deserialize_with = "null_as_default")]
        email: String,
    }

    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .filter(Value::is_object)
        .and_then(|value| serde_json::from_value::<ContactRow>(value).ok())
        .map(|row| ContactSummary {
            full_name: row.full_name,
            email: row.email,
        }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct ProbeRow {
        id: Option<String>,
        #[serde(default, deserialize_with = "null_as_default")]
        name: String,
        #[serde(default = "default_true", deserialize_with = "null_as_true")]
        flag: bool,
        #[serde(default, deserialize_with = "lenient_timestamp")]
        at: Option<DateTime<Utc>>,
        #[serde(default, deserialize_with = "lenient_contact")]
        contact: Option<ContactSummary>,
    }

    #[derive(Debug)]
    struct Probe {
        id: String,
        name: String,
        flag: bool,
        at: Option<DateTime<Utc>>,
        contact: Option<ContactSummary>,
    }

    impl TryFrom<ProbeRow> for Probe {
        type Error = RowError;

        fn try_from(row: ProbeRow) -> Result<Self, Self::Error> {
            let id = row
                .id
                .filter(|id| !id.is_empty())
                .ok_or_else(|| RowError::invalid("id", "missing"))?;
            Ok(Self {
                id,
                name: row.name,
                flag: row.flag,
                at: row.at,
                contact: row.contact,
            })
        }
    }

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[rstest]
    fn defaults_fill_missing_and_null_fields() {
        let rows = vec![record(json!({ "id": "a", "name": null, "flag": null }))];
        let decoded: Vec<Probe> = decode_rows::<ProbeRow, _>(Table::Users, rows);
        let probe = decoded.first().expect("one row");
        assert_eq!(probe.id, "a");
        assert_eq!(probe.name, "");
        assert!(probe.flag);
        assert!(probe.at.is_none());
        assert!(probe.contact.is_none());
    }

    #[rstest]
    fn rows_missing_required_fields_are_skipped() {
        let rows = vec![
            record(json!({ "name": "no id" })),
            record(json!({ "id": "b", "name": "kept" })),
            record(json!({ "id": 7 })),
        ];
        let decoded: Vec<Probe> = decode_rows::<ProbeRow, _>(Table::Users, rows);
        let ids: Vec<_> = decoded.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[rstest]
    #[case(json!("2024-03-01T10:00:00+00:00"), true)]
    #[case(json!("2024-03-01T10:00:00.123456+08:00"), true)]
    #[case(json!("yesterday"), false)]
    #[case(json!(12), false)]
    fn timestamps_parse_leniently(#[case] at: Value, #[case] parsed: bool) {
        let rows = vec![record(json!({ "id": "c", "at": at }))];
        let decoded: Vec<Probe> = decode_rows::<ProbeRow, _>(Table::Complaints, rows);
        assert_eq!(decoded.first().map(|p| p.at.is_some()), Some(parsed));
    }

    #[rstest]
    fn joined_contacts_decode_when_present() {
        let rows = vec![record(json!({
            "id": "d",
            "contact": { "full_name": "Lena", "email": "lena@rentify.test" }
        }))];
        let decoded: Vec<Probe> = decode_rows::<ProbeRow, _>(Table::Apartments, rows);
        let contact = decoded
            .first()
            .and_then(|p| p.contact.clone())
            .expect("contact decoded");
        assert_eq!(contact.full_name, "Lena");
        assert_eq!(contact.email, "lena@rentify.test");
    }
}
