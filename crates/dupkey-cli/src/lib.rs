mod cli;
mod exec;
mod render;
mod rows;

use tracing_subscriber::EnvFilter;

pub async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    match cmd {
        cli::Command::Help => {
            cli::print_help();
            Ok(())
        }
        cli::Command::Render(args) => render::run(args),
        cli::Command::Exec(args) => {
            // A missing .env is fine; the config may not reference any variables.
            let _ = dotenvy::dotenv();
            init_tracing();
            exec::run(args).await
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
