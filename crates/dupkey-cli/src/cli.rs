use dupkey::{Driver, StatementKind};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum Command {
    Help,
    Render(RenderArgs),
    Exec(ExecArgs),
}

/// What to write and where, shared by `render` and `exec`.
#[derive(Debug, Clone)]
pub struct WriteArgs {
    pub table: String,
    pub mode: StatementKind,
    pub update: Option<Vec<String>>,
    pub key: Vec<String>,
    pub rows: PathBuf,
}

#[derive(Debug, Clone)]
pub struct RenderArgs {
    pub driver: Driver,
    pub prefix: String,
    pub write: WriteArgs,
}

#[derive(Debug, Clone)]
pub struct ExecArgs {
    pub config: PathBuf,
    pub write: WriteArgs,
}

fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

fn parse_mode(s: &str) -> anyhow::Result<StatementKind> {
    match s {
        "upsert" => Ok(StatementKind::InsertOnDuplicateKey),
        "ignore" => Ok(StatementKind::InsertIgnore),
        "replace" => Ok(StatementKind::Replace),
        other => anyhow::bail!("unknown --mode: {other} (expected upsert, ignore or replace)"),
    }
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help);
    };

    match first.as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help),
        "render" => parse_write(it.map(|s| s.as_str()), false),
        "exec" => parse_write(it.map(|s| s.as_str()), true),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

fn parse_write<'a>(mut it: impl Iterator<Item = &'a str>, exec: bool) -> anyhow::Result<Command> {
    let mut config = PathBuf::from("dupkey.toml");
    let mut driver: Option<Driver> = None;
    let mut prefix = String::new();
    let mut table: Option<String> = None;
    let mut mode = StatementKind::InsertOnDuplicateKey;
    let mut update: Option<Vec<String>> = None;
    let mut key = vec!["id".to_string()];
    let mut rows: Option<PathBuf> = None;

    while let Some(token) = it.next() {
        let (flag, inline) = match token.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag, Some(value)),
            _ => (token, None),
        };
        let mut value = |name: &str| -> anyhow::Result<String> {
            match inline {
                Some(v) => Ok(v.to_string()),
                None => it
                    .next()
                    .map(str::to_string)
                    .ok_or_else(|| anyhow::anyhow!("{name} requires a value")),
            }
        };

        match flag {
            "-h" | "--help" => return Ok(Command::Help),
            "--config" if exec => config = PathBuf::from(value("--config")?),
            "--driver" if !exec => driver = Some(value("--driver")?.parse()?),
            "--prefix" if !exec => prefix = value("--prefix")?,
            "--table" => table = Some(value("--table")?),
            "--mode" => mode = parse_mode(&value("--mode")?)?,
            "--update" => {
                let parsed = split_csv(&value("--update")?);
                if parsed.is_empty() {
                    anyhow::bail!("--update must not be empty");
                }
                update = Some(parsed);
            }
            "--key" => {
                let parsed = split_csv(&value("--key")?);
                if parsed.is_empty() {
                    anyhow::bail!("--key must not be empty");
                }
                key = parsed;
            }
            // A lone `-` is the stdin rows path.
            other if other.starts_with('-') && other != "-" => {
                anyhow::bail!("unknown argument: {other}")
            }
            path => {
                if rows.is_some() {
                    anyhow::bail!("unexpected argument: {path}");
                }
                rows = Some(PathBuf::from(path));
            }
        }
    }

    let Some(table) = table else {
        anyhow::bail!("--table is required");
    };
    let Some(rows) = rows else {
        anyhow::bail!("missing rows file (JSON object or array of objects)");
    };
    if update.is_some() && mode != StatementKind::InsertOnDuplicateKey {
        anyhow::bail!("--update only applies to --mode upsert");
    }

    let write = WriteArgs {
        table,
        mode,
        update,
        key,
        rows,
    };

    if exec {
        return Ok(Command::Exec(ExecArgs { config, write }));
    }
    let Some(driver) = driver else {
        anyhow::bail!("--driver is required");
    };
    Ok(Command::Render(RenderArgs {
        driver,
        prefix,
        write,
    }))
}

pub fn print_help() {
    println!(
        "\
dupkey - bulk INSERT ... ON DUPLICATE KEY UPDATE / INSERT IGNORE / REPLACE INTO

USAGE:
  dupkey render --driver <mysql|sqlite> --table <name> [OPTIONS] <rows.json>
  dupkey exec [--config dupkey.toml] --table <name> [OPTIONS] <rows.json>
  dupkey help

OPTIONS:
  --prefix <prefix>          Table prefix (render only; exec reads it from the config)
  --mode <upsert|ignore|replace>
                             Statement to build (default: upsert)
  --update <c1,c2>           Columns to update on conflict (default: all)
  --key <pk[,pk2]>           Conflict key used by SQLite upserts (default: id)

<rows.json> holds one JSON object or an array of objects; `-` reads stdin.
`exec` loads .env and logs SQL per RUST_LOG (e.g. RUST_LOG=dupkey=debug)."
    );
}
