//! Demo data for local runs against the in-memory backend.

use chrono::Duration;
use serde_json::{Value, json};
use tracing::info;

use super::InMemoryBackend;
use crate::domain::ports::{AuthError, Record, Table};
use crate::domain::{Identity, Role};

/// Password shared by every seeded demo account.
pub const DEMO_PASSWORD: &str = "rentify-demo";

/// Accounts created by [`seed_demo_data`].
#[derive(Debug, Clone)]
pub struct DemoAccounts {
    pub admin: Identity,
    pub landlords: Vec<Identity>,
    pub tenants: Vec<Identity>,
}

const LANDLORDS: [(&str, &str); 3] = [
    ("Lena Reyes", "lena@rentify.test"),
    ("Marco Santos", "marco@rentify.test"),
    ("Grace Lim", "grace@rentify.test"),
];

const TENANTS: [(&str, &str); 4] = [
    ("Tom Cruz", "tom@rentify.test"),
    ("Ana Dela Cruz", "ana@rentify.test"),
    ("Ben Ocampo", "ben@rentify.test"),
    ("Ivy Tan", "ivy@rentify.test"),
];

const LISTINGS: [(&str, &str, &str, u32, &str); 6] = [
    ("Sunny studio near the park", "12 Mabini St", "Makati", 12_000, "studio"),
    ("Quiet one-bedroom", "4 Rizal Ave", "Quezon City", 15_500, "1br"),
    ("Family two-bedroom", "88 Luna Rd", "Pasig", 24_000, "2br"),
    ("Loft with city view", "230 Ayala Ave", "Makati", 32_000, "loft"),
    ("Compact studio", "7 Bonifacio St", "Taguig", 9_800, "studio"),
    ("Garden one-bedroom", "19 Aguinaldo St", "Mandaluyong", 14_200, "1br"),
];

const COMPLAINTS: [(&str, &str, &str); 4] = [
    ("Leaking faucet", "The kitchen faucet drips all night.", "open"),
    ("Noisy neighbours", "Loud music after midnight on weekdays.", "investigating"),
    ("Broken lock", "Front door lock sticks.", "resolved"),
    ("Listing mismatch", "Photos do not match the unit.", "dismissed"),
];

fn object(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => Record::new(),
    }
}

fn register_all(
    backend: &InMemoryBackend,
    people: &[(&str, &str)],
    role: Role,
) -> Result<Vec<Identity>, AuthError> {
    people
        .iter()
        .map(|(name, email)| backend.register(name, email, DEMO_PASSWORD, role))
        .collect()
}

/// Populate `backend` with a small, self-consistent demo dataset.
///
/// # Errors
///
/// Fails when an account with a demo email already exists.
pub fn seed_demo_data(backend: &InMemoryBackend) -> Result<DemoAccounts, AuthError> {
    let admin = backend.register("Ada Admin", "admin@rentify.test", DEMO_PASSWORD, Role::Admin)?;
    let landlords = register_all(backend, &LANDLORDS, Role::Landlord)?;
    let tenants = register_all(backend, &TENANTS, Role::Tenant)?;

    let now = backend.clock.utc();
    let stamp = |minutes_ago: i64| (now - Duration::minutes(minutes_ago)).to_rfc3339();

    let mut apartment_ids = Vec::new();
    for (index, (title, address, city, rent, kind)) in LISTINGS.iter().enumerate() {
        let landlord = &landlords[index % landlords.len()];
        let id = backend.insert(
            Table::Apartments,
            object(json!({
                "title": title,
                "address": address,
                "city": city,
                "monthly_rent": rent,
                "type": kind,
                "is_published": index % 3 != 2,
                "landlord_id": landlord.id.to_string(),
                "created_at": stamp(60 * (index as i64 + 1)),
            })),
        );
        apartment_ids.push(id);
    }

    for (index, tenant) in tenants.iter().enumerate() {
        let apartment_id = &apartment_ids[index % apartment_ids.len()];
        backend.insert(
            Table::Applications,
            object(json!({
                "apartment_id": apartment_id,
                "tenant_id": tenant.id.to_string(),
                "status": "pending",
                "created_at": stamp(30 * (index as i64 + 1)),
            })),
        );
    }

    for (index, (subject, description, status)) in COMPLAINTS.iter().enumerate() {
        let complainant = &tenants[index % tenants.len()];
        let resolved_at = (*status == "resolved").then(|| stamp(5));
        backend.insert(
            Table::Complaints,
            object(json!({
                "subject": subject,
                "description": description,
                "status": status,
                "complainant_id": complainant.id.to_string(),
                "created_at": stamp(20 * (index as i64 + 1)),
                "resolved_at": resolved_at,
            })),
        );
    }

    info!(
        admin = %admin.email,
        landlords = landlords.len(),
        tenants = tenants.len(),
        apartments = apartment_ids.len(),
        "seeded demo data"
    );
    Ok(DemoAccounts {
        admin,
        landlords,
        tenants,
    })
}
