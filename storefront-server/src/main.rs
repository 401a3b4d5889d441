use storefront_server::{Server, ServerState, init_logger_with_file, print_banner, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. .env + configuration
    let config = setup_environment()?;

    // 2. Logging (guard flushes file output on exit)
    let _log_guard = init_logger_with_file(
        Some(&config.log_level),
        config.log_json,
        config.log_dir.as_deref(),
    );

    print_banner();
    tracing::info!(
        environment = %config.environment,
        database = %config.database_path,
        "Storefront server starting..."
    );

    if config.is_production() && config.debug {
        tracing::warn!("APP_DEBUG is set in production; internal errors will reach clients");
    }

    // 3. Database + services
    let state = ServerState::initialize(&config).await?;

    // 4. HTTP server
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
