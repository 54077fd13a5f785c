//! Tests for the in-memory backend.

use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::RegistrationForm;
use crate::domain::ports::OrderBy;
use crate::test_support::{fixture_clock, record};

#[fixture]
fn backend() -> InMemoryBackend {
    InMemoryBackend::new(fixture_clock())
}

const LANDLORD_JOIN: Join = Join {
    alias: "landlord",
    foreign_key: "landlord_id",
    table: Table::Users,
    columns: &["full_name", "email"],
};

fn registration(email: &str) -> Registration {
    Registration::try_from_form(RegistrationForm {
        full_name: "Tess Tenant",
        email,
        password: "secret1",
        confirm_password: "secret1",
        role: None,
    })
    .expect("valid registration")
}

#[rstest]
#[tokio::test]
async fn count_applies_the_filter(backend: InMemoryBackend) {
    for role in ["tenant", "tenant", "landlord"] {
        backend.insert(Table::Users, record(json!({ "role": role })));
    }

    let all = backend.count(Table::Users, None).await.expect("count");
    let tenants = backend
        .count(Table::Users, Some(Filter::eq("role", "tenant")))
        .await
        .expect("count");
    let empty = backend.count(Table::Complaints, None).await.expect("count");

    assert_eq!((all, tenants, empty), (3, 2, 0));
}

#[rstest]
#[tokio::test]
async fn list_orders_newest_first_and_truncates(backend: InMemoryBackend) {
    for day in 1..=5 {
        backend.insert(
            Table::Apartments,
            record(json!({ "title": format!("day {day}"), "created_at": format!("2024-01-0{day}T00:00:00Z") })),
        );
    }
    backend.insert(Table::Apartments, record(json!({ "title": "undated" })));

    let rows = backend
        .list(
            ListQuery::new(Table::Apartments)
                .order_by(OrderBy::descending("created_at"))
                .limit(3),
        )
        .await
        .expect("list");

    let titles: Vec<_> = rows.iter().filter_map(|row| row.get("title")).collect();
    assert_eq!(titles, [&json!("day 5"), &json!("day 4"), &json!("day 3")]);
}

#[rstest]
#[tokio::test]
async fn undated_rows_sort_last(backend: InMemoryBackend) {
    backend.insert(Table::Complaints, record(json!({ "subject": "undated" })));
    backend.insert(
        Table::Complaints,
        record(json!({ "subject": "dated", "created_at": "2024-01-01T00:00:00Z" })),
    );

    let rows = backend
        .list(ListQuery::new(Table::Complaints).order_by(OrderBy::descending("created_at")))
        .await
        .expect("list");
    assert_eq!(rows[0].get("subject"), Some(&json!("dated")));
}

#[rstest]
#[tokio::test]
async fn list_embeds_joined_columns(backend: InMemoryBackend) {
    let landlord = backend
        .register("Lena Reyes", "lena@rentify.test", "secret1", Role::Landlord)
        .expect("register");
    backend.insert(
        Table::Apartments,
        record(json!({ "title": "owned", "landlord_id": landlord.id.to_string() })),
    );
    backend.insert(
        Table::Apartments,
        record(json!({ "title": "orphan", "landlord_id": null })),
    );

    let rows = backend
        .list(ListQuery::new(Table::Apartments).join(LANDLORD_JOIN))
        .await
        .expect("list");

    let owned = rows
        .iter()
        .find(|row| row.get("title") == Some(&json!("owned")))
        .expect("owned row");
    assert_eq!(
        owned.get("landlord"),
        Some(&json!({ "full_name": "Lena Reyes", "email": "lena@rentify.test" }))
    );
    let orphan = rows
        .iter()
        .find(|row| row.get("title") == Some(&json!("orphan")))
        .expect("orphan row");
    assert_eq!(orphan.get("landlord"), Some(&Value::Null));
}

#[rstest]
#[tokio::test]
async fn update_merges_fields(backend: InMemoryBackend) {
    let id = backend.insert(
        Table::Complaints,
        record(json!({ "status": "open", "subject": "Leak" })),
    );

    backend
        .update(
            Table::Complaints,
            &id,
            FieldUpdates::new().set("status", "resolved"),
        )
        .await
        .expect("update");

    let row = backend.row(Table::Complaints, &id).expect("row exists");
    assert_eq!(row.get("status"), Some(&json!("resolved")));
    assert_eq!(row.get("subject"), Some(&json!("Leak")));
}

#[rstest]
#[tokio::test]
async fn update_of_missing_row_is_not_found(backend: InMemoryBackend) {
    let err = backend
        .update(Table::Users, "nobody", FieldUpdates::new().set("is_active", false))
        .await
        .expect_err("no such row");
    assert_eq!(err, UpdateError::not_found("nobody"));
}

#[rstest]
#[tokio::test]
async fn unavailable_backend_fails_reads_and_writes(backend: InMemoryBackend) {
    let id = backend.insert(Table::Users, record(json!({ "role": "tenant" })));
    backend.set_unavailable(true);

    let count = backend.count(Table::Users, None).await.expect_err("down");
    let list = backend
        .list(ListQuery::new(Table::Users))
        .await
        .expect_err("down");
    let update = backend
        .update(Table::Users, &id, FieldUpdates::new().set("is_active", false))
        .await
        .expect_err("down");
    assert!(count.is_transient() && list.is_transient() && update.is_transient());

    backend.set_unavailable(false);
    assert_eq!(backend.count(Table::Users, None).await.expect("up"), 1);
}

#[rstest]
#[tokio::test]
async fn account_lifecycle(backend: InMemoryBackend) {
    let outcome = backend
        .sign_up(&registration("Tess@Rentify.test"))
        .await
        .expect("sign up");
    let Some(session) = outcome.session().cloned() else {
        panic!("in-memory accounts are confirmed immediately");
    };
    assert_eq!(session.identity.email, "tess@rentify.test");
    assert_eq!(session.identity.role, Role::Tenant);

    let resolved = backend
        .identity(&session.access_token)
        .await
        .expect("token is live");
    assert_eq!(resolved, session.identity);

    let users = backend
        .count(Table::Users, Some(Filter::eq("role", "tenant")))
        .await
        .expect("count");
    assert_eq!(users, 1);

    backend
        .sign_out(&session.access_token)
        .await
        .expect("sign out");
    let err = backend
        .identity(&session.access_token)
        .await
        .expect_err("token revoked");
    assert_eq!(err, AuthError::session_expired());

    let credentials =
        SignInCredentials::try_from_parts("tess@rentify.test", "secret1").expect("valid");
    let again = backend.sign_in(&credentials).await.expect("sign in");
    assert_eq!(again.identity.id, session.identity.id);
}

#[rstest]
#[case("tess@rentify.test", "wrong-password")]
#[case("nobody@rentify.test", "secret1")]
#[tokio::test]
async fn bad_credentials_are_rejected(
    backend: InMemoryBackend,
    #[case] email: &str,
    #[case] password: &str,
) {
    backend
        .sign_up(&registration("tess@rentify.test"))
        .await
        .expect("sign up");
    let credentials = SignInCredentials::try_from_parts(email, password).expect("valid");

    let err = backend.sign_in(&credentials).await.expect_err("rejected");
    assert_eq!(err, AuthError::invalid_credentials());
}

#[rstest]
#[tokio::test]
async fn duplicate_email_is_a_conflict(backend: InMemoryBackend) {
    backend
        .sign_up(&registration("tess@rentify.test"))
        .await
        .expect("first sign up");
    let err = backend
        .sign_up(&registration("TESS@rentify.test"))
        .await
        .expect_err("duplicate");
    assert_eq!(err, AuthError::duplicate_account("tess@rentify.test"));
}

#[rstest]
#[tokio::test]
async fn demo_seed_is_self_consistent(backend: InMemoryBackend) {
    let accounts = seed_demo_data(&backend).expect("seed");
    assert!(accounts.admin.is_admin());

    for (table, expected) in [
        (Table::Users, 8),
        (Table::Apartments, 6),
        (Table::Applications, 4),
        (Table::Complaints, 4),
    ] {
        let total = backend.count(table, None).await.expect("count");
        assert_eq!(total, expected, "{table}");
    }
    let landlords = backend
        .count(Table::Users, Some(Filter::eq("role", "landlord")))
        .await
        .expect("count");
    assert_eq!(landlords, accounts.landlords.len() as u64);

    let credentials =
        SignInCredentials::try_from_parts("admin@rentify.test", DEMO_PASSWORD).expect("valid");
    let session = backend.sign_in(&credentials).await.expect("admin signs in");
    assert_eq!(session.identity.role, Role::Admin);

    assert!(seed_demo_data(&backend).is_err(), "seeding twice collides");
}
