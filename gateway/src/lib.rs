pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fallback;
pub mod metrics_defs;
pub mod normalize;
pub mod proxy;
pub mod request_query;
pub mod upstream;

use crate::api::Gateway;
use crate::config::Config;
use crate::error::GatewayError;
use std::sync::Arc;
use tokio::net::TcpListener;

pub async fn run(config: Config) -> Result<(), GatewayError> {
    let gateway = Arc::new(Gateway::new(&config)?);
    let app = api::router(gateway);

    let addr = format!("{}:{}", config.listener.host, config.listener.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(
        %addr,
        api_base = %config.upstream.api_base,
        media_base = config.upstream.media_base(),
        "content gateway listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
