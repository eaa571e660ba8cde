use axum::{
    extract::State,
    response::Html,
    routing::get,
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    Result,
    DashboardError,
    config::{DashboardConfig, EnvSource},
    metrics::{BackendProvider, CloudWatchProvider, Credentials},
    pipeline::collect_dashboard,
    render::DashboardRenderer,
    storage::Databases,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DashboardConfig>,
    pub env: EnvSource,
    pub backends: Arc<dyn BackendProvider>,
    pub renderer: Arc<DashboardRenderer>,
    pub databases: Databases,
}

impl AppState {
    pub fn new(
        config: DashboardConfig,
        env: EnvSource,
        backends: Arc<dyn BackendProvider>,
    ) -> Result<Self> {
        Ok(Self {
            config: Arc::new(config),
            env,
            backends,
            renderer: Arc::new(DashboardRenderer::new()?),
            databases: Databases::new(),
        })
    }
}

pub fn dashboard_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index(State(state): State<AppState>) -> Result<Html<String>> {
    let env = state.env.load();
    let credentials = Credentials {
        access_key_id: env.aws_access_key_id.clone(),
        secret_access_key: env.aws_secret_access_key.clone(),
    };

    let backend = state.backends.connect(&state.config.region, credentials).await;
    let tables = collect_dashboard(backend.as_ref(), &env, &state.config, &state.databases).await;

    let html = state.renderer.render(&tables, &state.config.time_range)?;
    Ok(Html(html))
}

pub async fn start_dashboard_server(config: DashboardConfig) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.port);
    let state = AppState::new(config, EnvSource::Process, Arc::new(CloudWatchProvider))?;
    let app = dashboard_router(state);

    info!("Starting dashboard on {}", addr);

    let listener = TcpListener::bind(&addr).await.map_err(|e|
        DashboardError::Internal(format!("Failed to bind to address: {}", e)))?;

    axum::serve(listener, app).await.map_err(|e|
        DashboardError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
