use session_auth::{config, routes, state};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env().expect("invalid configuration");
    let state = state::AppState::from_config(&config).expect("credential directory init failed");

    if let Some(timeout) = config.store_timeout {
        tracing::info!(?timeout, "session store calls are bounded");
    }

    let app = routes::app(state);
    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "session-auth listening");
    axum::serve(listener, app).await.expect("server failed");
}
