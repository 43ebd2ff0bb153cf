use anyhow::Context;
use juicery_server::{Config, Server, ServerState, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (.env, logging)
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = setup_environment(&config);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        "Juicery server starting"
    );

    // 2. State (database, SMS gateway, printer)
    let state = ServerState::initialize(&config)
        .await
        .context("failed to initialize server state")?;

    // 3. HTTP server (starts background tasks)
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    Ok(())
}
