mod common;

use cafe_pos::{
    app_error::AppError,
    models::Role,
    store::accounts::{authenticate, list_accounts, register},
};
use common::*;

#[test]
fn register_then_authenticate() {
    let conn = &mut setup();
    let account = register(conn, "barista", "espresso", Role::Staff).unwrap();
    assert_eq!(account.username, "barista");
    assert_eq!(account.role, Role::Staff);
    assert_ne!(account.password_hash, "espresso");

    let found = authenticate(conn, "barista", "espresso").unwrap().unwrap();
    assert_eq!(found.id, account.id);
}

#[test]
fn wrong_password_or_unknown_user_is_none() {
    let conn = &mut setup();
    seed_account(conn, "barista");

    assert!(authenticate(conn, "barista", "wrong").unwrap().is_none());
    assert!(authenticate(conn, "nobody", PASSWORD).unwrap().is_none());
}

#[test]
fn duplicate_username_is_a_distinct_outcome() {
    let conn = &mut setup();
    seed_account(conn, "barista");

    let err = register(conn, "barista", "other", Role::Admin).unwrap_err();
    assert!(matches!(err, AppError::DuplicateUsername(ref name) if name == "barista"));
    assert!(err.is_recoverable());

    let accounts = list_accounts(conn).unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].role, Role::Staff);

    // The first account's password still works.
    assert!(authenticate(conn, "barista", PASSWORD).unwrap().is_some());
}

#[test]
fn usernames_are_trimmed_before_the_uniqueness_check() {
    let conn = &mut setup();
    seed_account(conn, "barista");

    let err = register(conn, "  barista ", "other", Role::Staff).unwrap_err();
    assert!(matches!(err, AppError::DuplicateUsername(_)));
}

#[test]
fn empty_fields_are_rejected_before_touching_the_database() {
    let conn = &mut setup();

    assert!(matches!(
        register(conn, "", "pw", Role::Staff),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        register(conn, "barista", "", Role::Staff),
        Err(AppError::Validation(_))
    ));
    assert!(list_accounts(conn).unwrap().is_empty());
}

#[test]
fn staff_list_hides_credentials() {
    let conn = &mut setup();
    seed_account(conn, "barista");
    register(conn, "manager", "pw", Role::Admin).unwrap();

    let accounts = list_accounts(conn).unwrap();
    let names: Vec<&str> = accounts.iter().map(|a| a.username.as_str()).collect();
    assert_eq!(names, ["barista", "manager"]);
    assert_eq!(accounts[1].role, Role::Admin);

    let json = serde_json::to_string(&accounts).unwrap();
    assert!(!json.contains("argon2"));
}
