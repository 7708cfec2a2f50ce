use anyhow::Result;
use rmcp::transport::streamable_http_server::{
    StreamableHttpService, session::local::LocalSessionManager,
};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use signal_insights::{config::AppConfig, mcp_server::InsightServer, routes, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    if config.credentials.api_key.is_none() {
        warn!("GENAI_API_KEY is not set; insights will use fallback content and videos will fail");
    }
    info!(
        cache_dir = %config.cache_dir.display(),
        insight_model = %config.insight_model,
        video_model = %config.video_model,
        "configuration loaded"
    );

    let bind_address = config.bind_address();
    let mcp_path = config.mcp_path();
    let state = AppState::new(config);

    let state_for_service = state.clone();
    let service = StreamableHttpService::new(
        move || Ok(InsightServer::new(state_for_service.clone())),
        LocalSessionManager::default().into(),
        Default::default(),
    );
    let router = routes::router(state)
        .nest_service(&mcp_path, service)
        .layer(TraceLayer::new_for_http());
    let tcp_listener = tokio::net::TcpListener::bind(&bind_address).await?;

    info!(
        "Signal insights server started at http://{}{} (UI entry point: /api/insights.generate)",
        bind_address, mcp_path
    );

    axum::serve(tcp_listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|value| value.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("signal_insights=info,tower_http=info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(env_filter)
            .init();
    }
}
