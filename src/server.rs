//! HTTP surface
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | POST | `/api/eventos` | create or replace an event |
//! | GET | `/api/eventos/{protocolo}` | original submission for editing |
//! | POST | `/api/ia/ideias` | objective + theme suggestion |
//! | POST | `/api/ia/social` | social media caption |
//! | GET | `/api/exportar` | xlsx report |
//! | GET | `/`, `/aprovacao` | form pages from the views directory |
//!
//! Everything else falls through to the public directory. Errors are JSON
//! bodies `{ "error", "kind", "code" }`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::assist::{Caption, CaptionRequest, IdeaRequest, IdeaSuggestion};
use crate::config::{AppConfig, ServerConfig};
use crate::error::{RegistryError, Result};
use crate::registry::UpsertOutcome;
use crate::service::EventService;
use crate::util::constants::{EXPORT_FILE_NAME, XLSX_CONTENT_TYPE};

/// RegistryError rendered as an HTTP response
#[derive(Debug)]
pub struct ApiError(pub RegistryError);

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        Self(err)
    }
}

/// HTTP status for each error kind
pub fn status_for(err: &RegistryError) -> StatusCode {
    match err {
        RegistryError::MalformedSubmission { .. } => StatusCode::BAD_REQUEST,
        RegistryError::NotFound { .. } => StatusCode::NOT_FOUND,
        RegistryError::Collaborator { .. } => StatusCode::BAD_GATEWAY,
        RegistryError::AssistNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        RegistryError::Config { .. } | RegistryError::Export(_) | RegistryError::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = json!({
            "error": self.0.to_string(),
            "kind": self.0.kind(),
            "code": self.0.code(),
        });
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Unwrap a JSON body, reporting rejections in the common error shape
fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| RegistryError::malformed("$", e.body_text()).into())
}

async fn create_event(
    State(service): State<EventService>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let submission = json_body(payload)?;

    // The receipt's notification handle is dropped; delivery continues
    let receipt = service.submit(submission)?;
    let outcome = match receipt.outcome {
        UpsertOutcome::Created => "created",
        UpsertOutcome::Replaced => "replaced",
    };

    Ok(Json(json!({
        "message": "Salvo com sucesso!",
        "protocol": receipt.protocol,
        "outcome": outcome,
    })))
}

async fn find_event(
    State(service): State<EventService>,
    Path(protocolo): Path<String>,
) -> ApiResult<Json<Value>> {
    let submission = service.lookup(&protocolo)?;
    Ok(Json(submission.into_value()))
}

async fn suggest_ideas(
    State(service): State<EventService>,
    payload: std::result::Result<Json<IdeaRequest>, JsonRejection>,
) -> ApiResult<Json<IdeaSuggestion>> {
    let request = json_body(payload)?;
    Ok(Json(service.suggest_ideas(&request).await?))
}

async fn social_caption(
    State(service): State<EventService>,
    payload: std::result::Result<Json<CaptionRequest>, JsonRejection>,
) -> ApiResult<Json<Caption>> {
    let request = json_body(payload)?;
    Ok(Json(service.social_caption(&request).await?))
}

async fn export_report(State(service): State<EventService>) -> ApiResult<Response> {
    let bytes = service.export_xlsx()?;
    let disposition = format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME);

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// Build the application router
pub fn router(service: EventService, config: &ServerConfig) -> Router {
    let api = Router::new()
        .route("/api/eventos", post(create_event))
        .route("/api/eventos/:protocolo", get(find_event))
        .route("/api/ia/ideias", post(suggest_ideas))
        .route("/api/ia/social", post(social_caption))
        .route("/api/exportar", get(export_report))
        .with_state(service);

    Router::new()
        .route_service("/", ServeFile::new(config.views_dir.join("index.html")))
        .route_service(
            "/aprovacao",
            ServeFile::new(config.views_dir.join("aprovacao.html")),
        )
        .merge(api)
        .fallback_service(ServeDir::new(&config.public_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until Ctrl-C
pub async fn serve(config: AppConfig) -> Result<()> {
    let service = EventService::from_config(&config)?;

    tracing::info!(
        mail = config.mail_enabled(),
        assist = config.assist_enabled(),
        "collaborators configured"
    );

    let app = router(service, &config.server);
    let listener = tokio::net::TcpListener::bind(config.server.addr()).await?;
    tracing::info!(addr = %listener.local_addr()?, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
