use anyhow::Context;
use dupkey::Rows;
use std::io::Read;
use std::path::Path;

/// Read a batch from a JSON file, or from stdin when `path` is `-`.
pub fn load(path: &Path) -> anyhow::Result<Rows> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read rows from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read rows file {}", path.display()))?
    };
    parse(&raw).with_context(|| format!("invalid rows in {}", path.display()))
}

pub fn parse(raw: &str) -> anyhow::Result<Rows> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    Ok(Rows::from_json(value)?)
}

/// `--update` as the borrowed slice the builders take.
pub fn update_refs(update: &Option<Vec<String>>) -> Option<Vec<&str>> {
    update
        .as_ref()
        .map(|cols| cols.iter().map(String::as_str).collect())
}
