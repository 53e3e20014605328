//! `connect` from a TOML config.

#![cfg(feature = "sqlite")]

use dupkey::{BulkWrite, ConnectConfig, Driver, GenericClient, Model, Row};

struct Setting;

impl Model for Setting {
    const TABLE: &'static str = "settings";
    const PRIMARY_KEY: &'static str = "name";
}

#[tokio::test]
async fn connect_applies_driver_and_prefix() {
    let config = ConnectConfig::from_toml_str(
        r#"
driver = "sqlite"
url = "sqlite::memory:"
table_prefix = "cfg_"
max_connections = 1

[log]
level = "trace"
max_sql_length = 0
"#,
    )
    .unwrap();

    let client = dupkey::connect(&config).await.unwrap();
    assert_eq!(client.driver(), Driver::Sqlite);
    assert_eq!(client.table_prefix(), "cfg_");

    client
        .affecting_statement("CREATE TABLE cfg_settings (name TEXT PRIMARY KEY, value TEXT)", &[])
        .await
        .unwrap();

    let rows = vec![
        Row::new().set("name", "theme").set("value", "dark"),
        Row::new().set("name", "lang").set("value", "en"),
    ];
    assert_eq!(Setting::insert_ignore(&client, rows.clone()).await.unwrap(), 2);
    assert_eq!(Setting::insert_ignore(&client, rows).await.unwrap(), 0);
}
