//! Apartment listings as shown on the admin dashboard.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use super::records::{RowError, lenient_contact, lenient_timestamp, null_as_default};
use super::user::{ContactSummary, UserId};

/// Unit layout. Unrecognised values are preserved verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApartmentType {
    Studio,
    OneBedroom,
    TwoBedroom,
    Other(String),
}

impl ApartmentType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Studio => "studio",
            Self::OneBedroom => "1br",
            Self::TwoBedroom => "2br",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

impl From<String> for ApartmentType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "studio" => Self::Studio,
            "1br" => Self::OneBedroom,
            "2br" => Self::TwoBedroom,
            _ => Self::Other(value),
        }
    }
}

impl From<ApartmentType> for String {
    fn from(value: ApartmentType) -> Self {
        match value {
            ApartmentType::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for ApartmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A listing row with its landlord resolved through the `landlord_id` join.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Apartment {
    #[schema(value_type = String)]
    pub id: Uuid,
    pub title: String,
    pub address: String,
    pub city: String,
    /// Monthly rent; absent when the stored value was negative or not numeric.
    pub monthly_rent: Option<f64>,
    #[serde(rename = "type")]
    #[schema(value_type = String, example = "2br")]
    pub apartment_type: ApartmentType,
    pub is_published: bool,
    #[schema(value_type = Option<String>)]
    pub landlord_id: Option<UserId>,
    pub landlord: Option<ContactSummary>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Remote row shape for `apartments`.
#[derive(Debug, Deserialize)]
pub struct ApartmentRow {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    city: String,
    #[serde(default, deserialize_with = "lenient_rent")]
    monthly_rent: Option<f64>,
    #[serde(default, rename = "type", deserialize_with = "null_as_default")]
    apartment_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    is_published: bool,
    #[serde(default)]
    landlord_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_contact")]
    landlord: Option<ContactSummary>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    created_at: Option<DateTime<Utc>>,
}

/// Numeric columns may arrive as JSON numbers or decimal strings.
fn lenient_rent<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let amount = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(amount.filter(|value| value.is_finite() && *value >= 0.0))
}

impl TryFrom<ApartmentRow> for Apartment {
    type Error = RowError;

    fn try_from(row: ApartmentRow) -> Result<Self, Self::Error> {
        let raw_id = row.id.ok_or_else(|| RowError::invalid("id", "missing"))?;
        let id = Uuid::parse_str(&raw_id).map_err(|err| RowError::invalid("id", err))?;
        let landlord_id = row.landlord_id.and_then(|raw| UserId::new(raw).ok());
        Ok(Self {
            id,
            title: row.title,
            address: row.address,
            city: row.city,
            monthly_rent: row.monthly_rent,
            apartment_type: ApartmentType::from(row.apartment_type),
            is_published: row.is_published,
            landlord_id,
            landlord: row.landlord,
            created_at: row.created_at,
        })
    }
}
