//! HTTP front end: submit a sentence, list languages, stream generated audio.

use crate::artifacts::{ArtifactError, ArtifactRef};
use crate::i18n::LanguageEntry;
use crate::pipeline::{LanguageFailure, RequestOutcome};
use crate::service::{SubmitError, TranslationService};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("audio unavailable")]
    AudioUnavailable,

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::AudioUnavailable => StatusCode::NOT_FOUND,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, status = %status.as_u16(), "Request failed");
        } else {
            info!(error = %self, status = %status.as_u16(), "Request rejected");
        }

        let body = ErrorResponse {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<SubmitError> for ApiError {
    fn from(e: SubmitError) -> Self {
        match e {
            SubmitError::MissingCredential => Self::ServiceUnavailable(e.to_string()),
            SubmitError::EmptySentence | SubmitError::LanguageCountOutOfRange { .. } => {
                Self::BadRequest(e.to_string())
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Body of `POST /api/translations`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub sentence: String,
    #[serde(default)]
    pub language_count: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LanguagesView {
    pub languages: Vec<LanguageView>,
    pub min: usize,
    pub max: usize,
    pub default: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LanguageView {
    pub code: String,
    pub name: String,
}

impl From<&LanguageEntry> for LanguageView {
    fn from(entry: &LanguageEntry) -> Self {
        Self {
            code: entry.code().to_string(),
            name: entry.display_name().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResultView {
    pub language_code: String,
    pub language_name: String,
    pub translated_text: String,
    pub audio_artifact_ref: ArtifactRef,
    pub audio_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OutcomeView {
    /// Present when at least one language succeeded
    pub headline: Option<String>,
    pub results: Vec<ResultView>,
    pub failures: Vec<LanguageFailure>,
}

impl From<RequestOutcome> for OutcomeView {
    fn from(outcome: RequestOutcome) -> Self {
        let headline = (!outcome.results.is_empty()).then(|| {
            format!(
                "Translations generated for {} languages!",
                outcome.results.len()
            )
        });

        let results = outcome
            .results
            .into_iter()
            .map(|r| ResultView {
                audio_url: format!("/api/audio/{}", r.audio_artifact_ref),
                language_code: r.language_code,
                language_name: r.language_name,
                translated_text: r.translated_text,
                audio_artifact_ref: r.audio_artifact_ref,
            })
            .collect();

        Self {
            headline,
            results,
            failures: outcome.failures,
        }
    }
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn languages(State(service): State<Arc<TranslationService>>) -> Json<LanguagesView> {
    let limits = service.limits();
    Json(LanguagesView {
        languages: service.catalog().entries().iter().map(LanguageView::from).collect(),
        min: limits.min,
        max: limits.max,
        default: limits.default,
    })
}

async fn translations(
    State(service): State<Arc<TranslationService>>,
    Json(request): Json<TranslateRequest>,
) -> ApiResult<Json<OutcomeView>> {
    let count = request
        .language_count
        .unwrap_or_else(|| service.limits().default);

    let outcome = service
        .submit_with_progress(&request.sentence, count, |progress| {
            info!(
                completed = progress.completed,
                total = progress.total,
                language = progress.language_code,
                "Translation progress"
            );
        })
        .await?;

    Ok(Json(OutcomeView::from(outcome)))
}

async fn audio(
    State(service): State<Arc<TranslationService>>,
    Path(artifact): Path<String>,
) -> ApiResult<Response> {
    let artifact = ArtifactRef::new(artifact);
    match service.get_artifact(&artifact).await {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, "audio/mpeg")], bytes).into_response()),
        Err(ArtifactError::NotFound(_)) => Err(ApiError::AudioUnavailable),
        Err(e) => Err(ApiError::Internal(e.to_string())),
    }
}

/// Build the application router.
pub fn router(service: Arc<TranslationService>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/languages", get(languages))
        .route("/api/translations", post(translations))
        .route("/api/audio/:artifact", get(audio))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
}

/// Bind to `port` on all interfaces and serve until the process exits.
pub async fn serve(service: Arc<TranslationService>, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, router(service)).await?;
    Ok(())
}
