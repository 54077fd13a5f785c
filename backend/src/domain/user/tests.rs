//! Tests for the user primitives.

use super::*;
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};
use serde_json::json;

const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[fixture]
fn admin_account() -> UserAccount {
    UserAccount {
        id: UserId::new(VALID_ID).expect("valid id"),
        full_name: "Ada Admin".to_owned(),
        email: "ada@rentify.test".to_owned(),
        role: Role::Admin,
        is_active: true,
        created_at: None,
    }
}

#[rstest]
fn user_id_rejects_empty_input() {
    assert_eq!(UserId::new(""), Err(UserValidationError::EmptyId));
}

#[rstest]
#[case("not-a-uuid")]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6 ")]
fn user_id_rejects_malformed_input(#[case] raw: &str) {
    assert_eq!(UserId::new(raw), Err(UserValidationError::InvalidId));
}

#[rstest]
fn user_id_serialises_as_plain_string() {
    let id = UserId::new(VALID_ID).expect("valid id");
    assert_eq!(serde_json::to_value(id).expect("serialise"), json!(VALID_ID));
}

#[rstest]
#[case(Role::Tenant, "/tenant/dashboard")]
#[case(Role::Landlord, "/landlord/dashboard")]
#[case(Role::Admin, "/admin/dashboard")]
fn role_landing_paths(#[case] role: Role, #[case] expected: &str) {
    assert_eq!(role.landing_path(), expected);
}

#[rstest]
#[case("tenant", Role::Tenant)]
#[case("Landlord", Role::Landlord)]
#[case(" ADMIN ", Role::Admin)]
fn role_parses_case_insensitively(#[case] raw: &str, #[case] expected: Role) {
    assert_eq!(raw.parse::<Role>(), Ok(expected));
}

#[rstest]
fn role_rejects_unknown_values() {
    assert!(matches!(
        "superuser".parse::<Role>(),
        Err(UserValidationError::UnknownRole { value }) if value == "superuser"
    ));
}

#[rstest]
fn role_defaults_to_tenant() {
    assert_eq!(Role::default(), Role::Tenant);
}

#[rstest]
fn full_name_trims_whitespace() {
    let name = FullName::new("  Grace Hopper ").expect("valid name");
    assert_eq!(name.as_ref(), "Grace Hopper");
}

#[rstest]
fn full_name_rejects_blank_and_oversized_input() {
    assert_eq!(FullName::new("   "), Err(UserValidationError::EmptyFullName));
    assert_eq!(
        FullName::new("a".repeat(FULL_NAME_MAX + 1)),
        Err(UserValidationError::FullNameTooLong { max: FULL_NAME_MAX })
    );
}

#[rstest]
#[case("tenant@example.com")]
#[case("a.b+c@sub.example.co")]
fn email_accepts_plausible_addresses(#[case] raw: &str) {
    assert!(EmailAddress::new(raw).is_ok());
}

#[rstest]
#[case("no-at-sign")]
#[case("two@@example.com")]
#[case("missing@tld")]
#[case("spaces in@example.com")]
fn email_rejects_malformed_addresses(#[case] raw: &str) {
    assert_eq!(EmailAddress::new(raw), Err(UserValidationError::InvalidEmail));
}

#[rstest]
fn email_is_normalised_to_lowercase() {
    let email = EmailAddress::new("Ada@Example.COM").expect("valid email");
    assert_eq!(email.as_ref(), "ada@example.com");
}

#[given("an admin account row")]
fn an_admin_account_row(admin_account: UserAccount) -> UserAccount {
    admin_account
}

#[when("the account is rendered for the dashboard")]
fn the_account_is_rendered(account: UserAccount) -> (bool, serde_json::Value) {
    let rendered = serde_json::to_value(&account).expect("serialise account");
    (account.can_toggle_active(), rendered)
}

#[then("the activation toggle is hidden")]
fn the_activation_toggle_is_hidden(outcome: (bool, serde_json::Value)) {
    let (can_toggle, rendered) = outcome;
    assert!(!can_toggle);
    assert_eq!(rendered.get("fullName"), Some(&json!("Ada Admin")));
    assert_eq!(rendered.get("role"), Some(&json!("admin")));
}

#[rstest]
fn admin_rows_hide_the_activation_toggle(admin_account: UserAccount) {
    let account = an_admin_account_row(admin_account);
    let outcome = the_account_is_rendered(account);
    the_activation_toggle_is_hidden(outcome);
}

#[rstest]
#[case(Role::Tenant)]
#[case(Role::Landlord)]
fn non_admin_rows_offer_the_toggle(admin_account: UserAccount, #[case] role: Role) {
    let account = UserAccount {
        role,
        ..admin_account
    };
    assert!(account.can_toggle_active());
}

fn decode_account(value: serde_json::Value) -> Result<UserAccount, RowError> {
    serde_json::from_value::<UserAccountRow>(value)
        .map_err(RowError::from)
        .and_then(UserAccount::try_from)
}

#[rstest]
fn account_rows_default_activation_to_true() {
    let account = decode_account(json!({
        "id": VALID_ID,
        "role": "landlord",
        "full_name": null,
    }))
    .expect("row decodes");
    assert!(account.is_active);
    assert_eq!(account.full_name, "");
    assert_eq!(account.role, Role::Landlord);
}

#[rstest]
#[case(json!({ "role": "tenant" }))]
#[case(json!({ "id": VALID_ID }))]
#[case(json!({ "id": VALID_ID, "role": "owner" }))]
fn account_rows_without_id_or_role_are_rejected(#[case] row: serde_json::Value) {
    assert!(decode_account(row).is_err());
}
