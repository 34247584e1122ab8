//! Local web server for the cost predictor page.
//!
//! Holds the single session in memory. Every request runs one complete
//! interaction and re-renders the page from the resulting session state.

use crate::config::{AppConfig, DisplayConfig};
use crate::error::CostError;
use crate::fields::FieldSpecStore;
use crate::models::loader::ArtifactLoader;
use crate::models::predictor::OnnxPredictorLoader;
use crate::page::IndexPage;
use crate::registry::ModelRegistry;
use crate::session::Session;
use anyhow::{Context, Result};
use askama::Template;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Shared server state
pub struct AppState {
    pub session: Mutex<Session>,
    pub display: DisplayConfig,
}

impl AppState {
    pub fn new(session: Session, display: DisplayConfig) -> Self {
        Self {
            session: Mutex::new(session),
            display,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SelectRequest {
    model: String,
}

/// Builds the router.
///
/// Routes:
/// - `GET /` -- the page for the current session state
/// - `POST /select` -- load the chosen model
/// - `POST /predict` -- apply submitted inputs and predict
/// - `GET /health` -- liveness probe
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/select", post(select_handler))
        .route("/predict", post(predict_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index_handler(State(state): State<Arc<AppState>>) -> Response {
    let session = state.session.lock().await;
    render(IndexPage::from_session(&session, &state.display, None))
}

async fn select_handler(
    State(state): State<Arc<AppState>>,
    Form(request): Form<SelectRequest>,
) -> Response {
    let mut session = state.session.lock().await;

    let error = session
        .select_model(&request.model)
        .err()
        .map(|e| report(&e, "Model selection failed"));

    render(IndexPage::from_session(&session, &state.display, error))
}

async fn predict_handler(
    State(state): State<Arc<AppState>>,
    Form(inputs): Form<HashMap<String, String>>,
) -> Response {
    let mut session = state.session.lock().await;

    let error = match apply_and_predict(&mut session, &inputs) {
        Ok(()) => None,
        Err(e) => Some(report(&e, "Prediction failed")),
    };

    render(IndexPage::from_session(&session, &state.display, error))
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Apply every submitted value in feature order, then predict
fn apply_and_predict(
    session: &mut Session,
    inputs: &HashMap<String, String>,
) -> std::result::Result<(), CostError> {
    let Some(features) = session.features().map(<[String]>::to_vec) else {
        warn!("Predict requested with no model selected");
        return Ok(());
    };

    for feature in &features {
        if let Some(text) = inputs.get(feature) {
            session.set_input(feature, text)?;
        }
    }

    session.predict()?;
    Ok(())
}

/// Log a hard error and turn it into the message shown on the page
fn report(err: &CostError, action: &str) -> String {
    error!(kind = err.kind(), error = %err, "{}", action);
    format!("{}: {}", action, err)
}

fn render(page: IndexPage) -> Response {
    match page.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render page");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to render page").into_response()
        }
    }
}

/// Start the cost predictor server and serve until terminated
pub async fn start_server(config: AppConfig) -> Result<()> {
    let predictor_loader = OnnxPredictorLoader::with_threads(config.models.onnx_threads)
        .context("Failed to initialize ONNX Runtime")?;
    let loader = ArtifactLoader::new(&config.models.models_dir, Box::new(predictor_loader));
    let fields = FieldSpecStore::standard();
    info!(
        categorical = fields.categorical_count(),
        numeric = fields.numeric_count(),
        "Field specifications loaded"
    );
    let session = Session::new(ModelRegistry::default(), fields, loader);

    let state = Arc::new(AppState::new(session, config.display.clone()));
    let app = build_router(state);

    let addr = SocketAddr::from((
        config
            .server
            .host
            .parse::<std::net::IpAddr>()
            .context("Invalid server host")?,
        config.server.port,
    ));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(
        address = %addr,
        models_dir = %config.models.models_dir,
        "Cost predictor listening"
    );

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
