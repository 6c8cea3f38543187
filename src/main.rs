mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use std::sync::Arc;
use tracing::info;

use agrilead::api::{self, AppState};
use agrilead::config::Config;
use agrilead::observability::init_tracing;
use agrilead::tracking::{SentryTracker, init_sentry};

type AnyError = Box<dyn std::error::Error + Send + Sync>;

fn main() -> Result<(), AnyError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            let config = Config::load(args.config.config)?;
            init_tracing(config.telemetry.log_format);

            // Sentry must be initialised before the runtime starts.
            let _sentry = init_sentry(
                config.telemetry.sentry_dsn.as_deref(),
                config.server.environment.as_str(),
            );

            let address = args.address.unwrap_or(config.server.bind_addr);
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?
                .block_on(async move {
                    info!(environment = config.server.environment.as_str(), "Starting agrilead");
                    let state = AppState::from_config(config, Arc::new(SentryTracker))?;
                    api::run(address, state).await?;
                    Ok::<_, AnyError>(())
                })?;
        }
        Commands::CheckConfig(args) => {
            let config = Config::load(args.config)?;
            println!(
                "configuration ok: {} environment, {:?} store, {} resource(s)",
                config.server.environment.as_str(),
                config.store.backend,
                config.resources.len()
            );
        }
    }

    Ok(())
}
