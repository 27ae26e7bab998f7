use taskdesk::config;
use taskdesk::context::AppContext;
use taskdesk::server;
use taskdesk::TaskDeskResult;

#[tokio::main]
async fn main() -> TaskDeskResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load .env file if present (ignore error if not found)
    let _ = dotenvy::dotenv();

    let config = config::load_config()?;
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let ctx = AppContext::initialize(config);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "taskdesk api listening");
    axum::serve(listener, server::router(ctx)).await?;
    Ok(())
}
