use crate::cli::RenderArgs;
use crate::rows;
use colored::Colorize;
use dupkey::{Rows, Statement, StatementBuilder, StatementKind};

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let batch = rows::load(&args.write.rows)?;
    let stmt = build(&args, batch)?;

    println!("{}", format!("-- {} ({})", stmt.kind, stmt.driver).dimmed());
    println!("{}", render(&stmt)?);
    Ok(())
}

fn build(args: &RenderArgs, batch: Rows) -> anyhow::Result<Statement> {
    let builder = StatementBuilder::new(args.driver, &args.prefix, &args.write.table)?
        .conflict_key(args.write.key.iter().cloned());
    let update = rows::update_refs(&args.write.update);

    Ok(match args.write.mode {
        StatementKind::InsertOnDuplicateKey => {
            builder.insert_on_duplicate(batch, update.as_deref())?
        }
        StatementKind::InsertIgnore => builder.insert_ignore(batch)?,
        StatementKind::Replace => builder.replace(batch)?,
    })
}

/// The SQL terminated by `;`, then the params as a JSON array on one line.
fn render(stmt: &Statement) -> anyhow::Result<String> {
    Ok(format!("{};\n{}", stmt.sql, serde_json::to_string(&stmt.params)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Command, parse_args};

    const USERS: &str = r#"[
        {"id": 1, "email": "user1@email.com", "name": "User One"},
        {"id": 2, "email": "user2@email.com", "name": null}
    ]"#;

    fn render_args(list: &[&str]) -> RenderArgs {
        let args: Vec<String> = ["dupkey", "render"]
            .iter()
            .chain(list)
            .chain(&["rows.json"])
            .map(|s| s.to_string())
            .collect();
        match parse_args(&args).unwrap() {
            Command::Render(render) => render,
            other => panic!("expected render, got {other:?}"),
        }
    }

    fn output(list: &[&str]) -> String {
        let args = render_args(list);
        let stmt = build(&args, rows::parse(USERS).unwrap()).unwrap();
        render(&stmt).unwrap()
    }

    #[test]
    fn renders_mysql_upsert_with_params() {
        let out = output(&[
            "--driver", "mysql", "--table", "test_user_table", "--prefix", "prefix_",
            "--update", "name,email",
        ]);
        assert_eq!(
            out,
            "INSERT INTO `prefix_test_user_table`(`id`,`email`,`name`) VALUES\n\
             (?,?,?), (?,?,?)\n\
             ON DUPLICATE KEY UPDATE `name` = VALUES(`name`), `email` = VALUES(`email`);\n\
             [1,\"user1@email.com\",\"User One\",2,\"user2@email.com\",null]"
        );
    }

    #[test]
    fn renders_sqlite_ignore() {
        let out = output(&["--driver", "sqlite", "--table", "users", "--mode", "ignore"]);
        assert_eq!(
            out,
            "INSERT OR IGNORE INTO `users`(`id`,`email`,`name`) VALUES\n\
             (?,?,?), (?,?,?);\n\
             [1,\"user1@email.com\",\"User One\",2,\"user2@email.com\",null]"
        );
    }

    #[test]
    fn renders_sqlite_upsert_on_custom_key() {
        let out = output(&["--driver", "sqlite", "--table", "users", "--key", "email"]);
        assert!(out.contains(
            "\nON CONFLICT(`email`) DO UPDATE SET `id` = excluded.`id`, \
             `email` = excluded.`email`, `name` = excluded.`name`;\n"
        ));
    }

    #[test]
    fn empty_batch_is_an_error() {
        let args = render_args(&["--driver", "mysql", "--table", "t", "--mode", "replace"]);
        let err = build(&args, rows::parse("[]").unwrap()).unwrap_err();
        assert!(err.to_string().contains("Empty data."));
    }
}
