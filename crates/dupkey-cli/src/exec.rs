use crate::cli::ExecArgs;
use crate::rows;
use anyhow::Context;
use colored::Colorize;
use dupkey::{ConnectConfig, GenericClient, StatementKind};

pub async fn run(args: ExecArgs) -> anyhow::Result<()> {
    let config = ConnectConfig::load(&args.config)?;
    let batch = rows::load(&args.write.rows)?;
    let client = dupkey::connect(&config)
        .await
        .with_context(|| format!("failed to connect ({})", config.driver))?;

    let writer = dupkey::table(&args.write.table).primary_key(args.write.key.iter().cloned());
    let update = rows::update_refs(&args.write.update);
    let row_count = batch.len();

    let affected = match args.write.mode {
        StatementKind::InsertOnDuplicateKey => {
            writer
                .insert_on_duplicate_key(&client, batch, update.as_deref())
                .await?
        }
        StatementKind::InsertIgnore => writer.insert_ignore(&client, batch).await?,
        StatementKind::Replace => writer.replace(&client, batch).await?,
    };

    tracing::info!(
        target: "dupkey.cli",
        table = %args.write.table,
        prefix = client.table_prefix(),
        kind = args.write.mode.as_str(),
        rows = row_count,
        affected,
        "done"
    );
    println!("{} {affected} row(s) affected", "ok:".green().bold());
    Ok(())
}
