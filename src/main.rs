use workforce_scheduler::api::{router, AppState};
use workforce_scheduler::config::ServerConfig;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ServerConfig::from_env();
    let state = AppState::from(&config);
    let app = router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!(%addr, "starting workforce scheduler");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app).await.expect("server error");
}
