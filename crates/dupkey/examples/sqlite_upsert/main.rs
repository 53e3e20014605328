//! Example: bulk insert, ignore, upsert and replace against SQLite.
//!
//! Run with:
//!   cargo run --example sqlite_upsert -p dupkey
//!
//! Uses an in-memory database; set `RUST_LOG=dupkey=debug` to see the SQL.

use dupkey::{BulkWrite, ConnectConfig, GenericClient, Model, OrmResult, Rows, ToRow};

#[derive(Debug, Clone, Model, ToRow)]
#[orm(table = "tags")]
struct Tag {
    #[orm(id)]
    name: String,
    color: Option<String>,
    uses: i64,
}

fn tag(name: &str, color: Option<&str>, uses: i64) -> Tag {
    Tag {
        name: name.to_string(),
        color: color.map(str::to_string),
        uses,
    }
}

#[tokio::main]
async fn main() -> OrmResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ConnectConfig::from_toml_str(
        r#"
driver = "sqlite"
url = "sqlite::memory:"
table_prefix = "demo_"
max_connections = 1
"#,
    )?;
    let client = dupkey::connect(&config).await?;

    client
        .affecting_statement(
            "CREATE TABLE demo_tags (name TEXT PRIMARY KEY, color TEXT, uses INTEGER NOT NULL)",
            &[],
        )
        .await?;

    // --- insert, skipping rows that already exist ---
    let initial = [tag("rust", Some("orange"), 1), tag("sql", None, 1)];
    let inserted = Tag::insert_ignore(&client, Rows::from_models(&initial)).await?;
    println!("insert_ignore: {inserted} row(s) inserted");

    let again = Tag::insert_ignore(&client, Rows::from_models(&initial)).await?;
    println!("insert_ignore again: {again} row(s) inserted");

    // --- upsert, touching only `uses` on conflict ---
    let bumped = [tag("rust", Some("red"), 2), tag("tokio", Some("purple"), 1)];
    let upserted =
        Tag::insert_on_duplicate_key(&client, Rows::from_models(&bumped), Some(&["uses"])).await?;
    println!("insert_on_duplicate_key: {upserted} row(s) affected");

    // --- replace whole rows ---
    let replaced = Tag::replace(&client, tag("sql", Some("blue"), 5).to_row()).await?;
    println!("replace: {replaced} row(s) affected");

    // --- empty batches never hit the database ---
    let none = Tag::insert_ignore(&client, Rows::new()).await?;
    println!("empty batch: {none}");

    Ok(())
}
