//! Compile-time tests for the `Model` and `ToRow` derives.

#![cfg(feature = "derive")]

use dupkey::{BulkWrite, Model, Row, Rows, ToRow, Value};

#[derive(Debug, Clone, Model, ToRow)]
#[orm(table = "test_user_table")]
struct User {
    #[orm(id)]
    uuid: String,
    email: String,
    name: String,
}

#[derive(Model)]
#[orm(table = "events")]
struct Event {
    #[allow(dead_code)]
    id: i64,
}

#[derive(Clone, ToRow)]
struct Profile {
    #[orm(column = "user_uuid")]
    user: String,
    age: Option<i32>,
    #[orm(skip)]
    #[allow(dead_code)]
    cache: Vec<u8>,
}

fn user(n: u32) -> User {
    User {
        uuid: format!("uuid-{n}"),
        email: format!("user{n}@email.com"),
        name: format!("User {n}"),
    }
}

#[test]
fn model_derive_sets_table_and_primary_key() {
    assert_eq!(User::TABLE, "test_user_table");
    assert_eq!(User::PRIMARY_KEY, "uuid");
    assert_eq!(User::table_name(), "test_user_table");
}

#[test]
fn model_derive_defaults_primary_key_to_id() {
    assert_eq!(Event::TABLE, "events");
    assert_eq!(Event::PRIMARY_KEY, "id");
}

#[test]
fn to_row_keeps_declaration_order() {
    let row = user(1).to_row();
    assert_eq!(row.columns().collect::<Vec<_>>(), vec!["uuid", "email", "name"]);
    assert_eq!(row.get("email"), Some(&Value::from("user1@email.com")));
}

#[test]
fn to_row_renames_and_skips() {
    let row = Profile {
        user: "uuid-1".to_string(),
        age: None,
        cache: vec![1, 2, 3],
    }
    .to_row();
    assert_eq!(row.columns().collect::<Vec<_>>(), vec!["user_uuid", "age"]);
    assert_eq!(row.get("age"), Some(&Value::Null));
}

#[test]
fn rows_from_models() {
    let users = vec![user(1), user(2)];
    let rows = Rows::from_models(&users);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows.columns().unwrap(), vec!["uuid", "email", "name"]);

    let expected: Row = [
        ("uuid", Value::from("uuid-2")),
        ("email", Value::from("user2@email.com")),
        ("name", Value::from("User 2")),
    ]
    .into();
    assert_eq!(rows.iter().nth(1), Some(&expected));
}
