use anyhow::Context;
use clap::Parser;

mod api;
mod bootstrap;
mod cli;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("dtl error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    match cli.command {
        cli::Commands::Serve(args) => {
            let config = bootstrap::load_config(args.bind.as_deref(), args.database.as_deref())?;
            let db = bootstrap::open_database(&config.database).await?;
            let state = api::AppState::new(db, &config.llm)?;
            let prefix = config.server.normalized_prefix();
            let app = api::router(state, &config.server);

            let listener = tokio::net::TcpListener::bind(&config.server.bind)
                .await
                .with_context(|| format!("failed to bind {}", config.server.bind))?;
            tracing::info!(
                bind = %config.server.bind,
                prefix = %prefix,
                llm_configured = config.llm.is_configured(),
                "serving DTL API"
            );
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await
                .context("server error")?;
        }
        cli::Commands::InitDb(args) => {
            let config = bootstrap::load_config(None, args.database.as_deref())?;
            bootstrap::open_database(&config.database).await?;
            tracing::info!(url = %config.database.url, "database initialized");
        }
    }
    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("DTL_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
