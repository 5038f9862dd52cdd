use axum::{Extension, Router, routing::get};
use reqwest::Client;
use std::{net::SocketAddr, str::FromStr, sync::Arc};

use crate::{
    Res, api,
    config::Config,
    info,
    management::{SessionStore, open_store},
    success, warning,
};

/// Shared by every handler through an [`Extension`] layer.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn SessionStore>,
    pub http: Client,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn SessionStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            http: Client::new(),
        }
    }

    /// Builds the session store the configuration asks for.
    pub fn from_config(config: Config) -> Self {
        let store = open_store(
            config.session_backend,
            config.session_dir.clone(),
            config.session_lifetime,
        );
        Self::new(config, store)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/health", get(api::health))
        .route("/login", get(api::login))
        .route("/logout", get(api::logout))
        .route(
            "/select_source",
            get(api::source_page).post(api::choose_source),
        )
        .route(
            "/select_target",
            get(api::target_page).post(api::choose_targets),
        )
        .route("/divide", get(api::divide_page).post(api::divide_step))
        .layer(Extension(state))
}

pub async fn start_api_server(config: Config, open_browser: bool) -> Res<()> {
    let addr = SocketAddr::from_str(&config.server_addr)
        .map_err(|e| format!("Failed to parse server address {}: {}", config.server_addr, e))?;

    let state = AppState::from_config(config);
    match state.store.purge_expired().await {
        Ok(0) => {}
        Ok(n) => info!("Purged {} expired sessions.", n),
        Err(e) => warning!("Failed to purge expired sessions: {}", e),
    }

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    success!(
        "Listening on http://{} ({} sessions)",
        addr,
        state.store.backend_name()
    );

    if open_browser {
        let url = format!("http://{}/", addr);
        if webbrowser::open(&url).is_err() {
            warning!("Failed to open the browser, visit {} yourself.", url);
        }
    }

    axum::serve(listener, router(state)).await?;
    Ok(())
}
