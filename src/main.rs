use anyhow::Result;
use clap::Parser;
use sqlite_inspect::cli;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let args = cli::Args::parse();

    // RUST_LOG wins over -v; logs go to stderr so stdout stays clean
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let stdout = std::io::stdout();
    cli::run(&args, &mut stdout.lock())?;

    Ok(())
}
