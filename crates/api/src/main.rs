use anyhow::Context;

use idgate_api::config::GatewayConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    idgate_observability::init();

    let config = GatewayConfig::from_env().context("invalid configuration")?;
    let listen_addr = config.listen_addr;

    let app = idgate_api::app::build_app(config)?;

    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind {listen_addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
