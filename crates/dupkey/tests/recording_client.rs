//! Statement execution through a recording `GenericClient`.
//!
//! The client captures every statement instead of talking to a database, so
//! MySQL-shaped SQL can be checked without a server.

use dupkey::{BulkWrite, Driver, GenericClient, Model, OrmError, OrmResult, Row, Rows, Value};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
struct Recorded {
    tag: String,
    sql: String,
    params: Vec<Value>,
}

struct RecordingClient {
    driver: Driver,
    prefix: String,
    affected: u64,
    log: Mutex<Vec<Recorded>>,
}

impl RecordingClient {
    fn new(driver: Driver, prefix: &str) -> Self {
        Self {
            driver,
            prefix: prefix.to_string(),
            affected: 0,
            log: Mutex::new(Vec::new()),
        }
    }

    fn affected(mut self, n: u64) -> Self {
        self.affected = n;
        self
    }

    fn statements(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }
}

impl GenericClient for RecordingClient {
    fn driver(&self) -> Driver {
        self.driver
    }

    fn table_prefix(&self) -> &str {
        &self.prefix
    }

    async fn affecting_statement(&self, sql: &str, params: &[Value]) -> OrmResult<u64> {
        self.affecting_statement_tagged("-", sql, params).await
    }

    async fn affecting_statement_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[Value],
    ) -> OrmResult<u64> {
        self.log.lock().unwrap().push(Recorded {
            tag: tag.to_string(),
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        Ok(self.affected)
    }
}

struct UserMysql;

impl Model for UserMysql {
    const TABLE: &'static str = "test_user_table";
    const PRIMARY_KEY: &'static str = "uuid";
}

fn users() -> Vec<Row> {
    (1..=2)
        .map(|n| {
            Row::new()
                .set("uuid", format!("uuid-{n}"))
                .set("email", format!("user{n}@email.com"))
                .set("name", format!("User {n}"))
        })
        .collect()
}

#[tokio::test]
async fn insert_on_duplicate_key_runs_one_statement() {
    let client = RecordingClient::new(Driver::Mysql, "prefix_").affected(3);

    let affected = UserMysql::insert_on_duplicate_key(&client, users(), None)
        .await
        .unwrap();
    assert_eq!(affected, 3);

    let statements = client.statements();
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].tag, "insert_on_duplicate_key");
    assert_eq!(
        statements[0].sql,
        "INSERT INTO `prefix_test_user_table`(`uuid`,`email`,`name`) VALUES\n\
         (?,?,?), (?,?,?)\n\
         ON DUPLICATE KEY UPDATE `uuid` = VALUES(`uuid`), `email` = VALUES(`email`), `name` = VALUES(`name`)"
    );
    assert_eq!(
        statements[0].params,
        vec![
            Value::from("uuid-1"),
            Value::from("user1@email.com"),
            Value::from("User 1"),
            Value::from("uuid-2"),
            Value::from("user2@email.com"),
            Value::from("User 2"),
        ]
    );
}

#[tokio::test]
async fn insert_on_duplicate_key_with_update_columns() {
    let client = RecordingClient::new(Driver::Mysql, "prefix_");

    UserMysql::insert_on_duplicate_key(&client, users(), Some(&["name"]))
        .await
        .unwrap();

    let sql = &client.statements()[0].sql;
    assert!(sql.ends_with("\nON DUPLICATE KEY UPDATE `name` = VALUES(`name`)"));
}

#[tokio::test]
async fn insert_ignore_and_replace() {
    let client = RecordingClient::new(Driver::Mysql, "prefix_");

    UserMysql::insert_ignore(&client, users()).await.unwrap();
    UserMysql::replace(&client, users()).await.unwrap();

    let statements = client.statements();
    assert_eq!(statements[0].tag, "insert_ignore");
    assert_eq!(
        statements[0].sql,
        "INSERT IGNORE INTO `prefix_test_user_table`(`uuid`,`email`,`name`) VALUES\n(?,?,?), (?,?,?)"
    );
    assert_eq!(statements[1].tag, "replace");
    assert_eq!(
        statements[1].sql,
        "REPLACE INTO `prefix_test_user_table`(`uuid`,`email`,`name`) VALUES\n(?,?,?), (?,?,?)"
    );
}

#[tokio::test]
async fn sqlite_dialect_follows_the_connection() {
    let client = RecordingClient::new(Driver::Sqlite, "");

    UserMysql::insert_ignore(&client, users()).await.unwrap();
    UserMysql::insert_on_duplicate_key(&client, users(), Some(&["email", "name"]))
        .await
        .unwrap();

    let statements = client.statements();
    assert!(statements[0].sql.starts_with("INSERT OR IGNORE INTO `test_user_table`"));
    assert!(statements[1].sql.ends_with(
        "\nON CONFLICT(`uuid`) DO UPDATE SET `email` = excluded.`email`, `name` = excluded.`name`"
    ));
}

#[tokio::test]
async fn single_row_is_wrapped_into_a_batch() {
    let client = RecordingClient::new(Driver::Mysql, "prefix_");
    let row = Row::new().set("uuid", "uuid-1").set("name", "User 1");

    UserMysql::replace(&client, row).await.unwrap();

    let statements = client.statements();
    assert_eq!(
        statements[0].sql,
        "REPLACE INTO `prefix_test_user_table`(`uuid`,`name`) VALUES\n(?,?)"
    );
    assert_eq!(statements[0].params.len(), 2);
}

#[tokio::test]
async fn empty_batch_returns_zero_without_a_query() {
    let client = RecordingClient::new(Driver::Mysql, "prefix_").affected(99);

    assert_eq!(UserMysql::insert_ignore(&client, Rows::new()).await.unwrap(), 0);
    assert_eq!(
        UserMysql::insert_on_duplicate_key(&client, Vec::<Row>::new(), Some(&["name"]))
            .await
            .unwrap(),
        0
    );
    assert_eq!(UserMysql::replace(&client, Rows::new()).await.unwrap(), 0);
    assert!(client.statements().is_empty());
}

#[tokio::test]
async fn invalid_batches_never_reach_the_client() {
    let client = RecordingClient::new(Driver::Mysql, "prefix_");

    let mismatched = vec![
        Row::new().set("uuid", "a").set("name", "A"),
        Row::new().set("uuid", "b").set("email", "b@email.com"),
    ];
    let err = UserMysql::insert_ignore(&client, mismatched).await.unwrap_err();
    assert!(matches!(err, OrmError::Validation(_)));

    let err = UserMysql::insert_on_duplicate_key(&client, users(), Some(&["missing"]))
        .await
        .unwrap_err();
    assert!(err.is_validation());

    assert!(client.statements().is_empty());
}

#[tokio::test]
async fn table_writer_for_ad_hoc_tables() {
    let client = RecordingClient::new(Driver::Sqlite, "app_");

    dupkey::table("settings")
        .primary_key(["scope", "key"])
        .insert_on_duplicate_key(
            &client,
            Row::new().set("scope", "global").set("key", "theme").set("value", "dark"),
            Some(&["value"]),
        )
        .await
        .unwrap();

    assert_eq!(
        client.statements()[0].sql,
        "INSERT INTO `app_settings`(`scope`,`key`,`value`) VALUES\n(?,?,?)\n\
         ON CONFLICT(`scope`,`key`) DO UPDATE SET `value` = excluded.`value`"
    );
}

#[tokio::test]
async fn statement_built_for_another_driver_is_rejected() {
    let client = RecordingClient::new(Driver::Sqlite, "");
    let stmt = dupkey::StatementBuilder::new(Driver::Mysql, "", "t")
        .unwrap()
        .replace(Row::new().set("id", 1))
        .unwrap();

    let err = stmt.execute(&client).await.unwrap_err();
    assert!(err.is_validation());
    assert!(client.statements().is_empty());
}
