use clap::Parser;
use vta_service::config::ServiceConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ServiceConfig::parse();
    let bind_addr = config.bind_addr.clone();

    let app = vta_service::app(config);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "vta-service listening");
    axum::serve(listener, app).await?;
    Ok(())
}
