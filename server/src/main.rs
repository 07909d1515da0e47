mod config;
mod routes;
mod services;
mod state;

#[derive(Debug, thiserror::Error)]
enum ServerError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error("{0}")]
    Leptos(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    // A missing .env file is fine; real deployments set the environment.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env()?;
    let port = config.port;

    // Non-fatal: the app still renders, sign-in answers 503.
    if config.google.is_none() {
        tracing::warn!("GOOGLE_CLIENT_ID / GOOGLE_CLIENT_SECRET / GOOGLE_REDIRECT_URI not set, Google sign-in disabled");
    }
    tracing::info!(
        project_id = %config.firebase.web.project_id,
        auth_domain = %config.firebase.web.auth_domain,
        "firebase project"
    );

    let state = state::AppState::new(config);
    let app = routes::leptos_app(state).map_err(ServerError::Leptos)?;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;

    tracing::info!(%port, "gatekeep listening");
    axum::serve(listener, app).await?;
    Ok(())
}
