use anyhow::Result;
use clap::Parser;
use hedera_cli::{load_settings, run, CliArgs};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let settings = load_settings(&args)?;
    let output = run(&args, &settings).await?;
    println!("{output}");
    Ok(())
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,hedera=info"));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
