use anyhow::Result;

use tabular_validator::config::Config;
use tabular_validator::runner;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse configuration from command line
    let config = Config::from_args_and_env()?;

    // RUST_LOG still overrides --log-level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    runner::run(&config).await?;

    Ok(())
}
