rust_i18n::i18n!("locales", fallback = "en");

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::Request,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::services::{GeminiClient, GenerationClient, TutorService};
use crate::utils::ApiResult;

/// Process-wide, read-only after start-up
pub struct AppState {
    pub config: Config,
    pub tutor: TutorService,
}

impl AppState {
    pub fn new(config: Config) -> ApiResult<Self> {
        let client = Arc::new(GeminiClient::new(&config.gemini)?);
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: Config, client: Arc<dyn GenerationClient>) -> Self {
        let tutor = TutorService::new(client, config.conversation.history_window);
        Self { config, tutor }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::chat::chat,
        handlers::chat::vision,
        handlers::lexicon::define,
        handlers::lexicon::translate_sentence,
        handlers::health::health,
    ),
    components(schemas(
        models::ChatRequest,
        models::ChatReply,
        models::VisionForm,
        models::DefineRequest,
        models::DefinitionReply,
        models::TranslateRequest,
        models::TranslationReply,
        models::HealthResponse,
    )),
    tags(
        (name = "Conversation", description = "Tutor chat and image explanation"),
        (name = "Lexicon", description = "Word definitions and sentence translation"),
        (name = "System", description = "Operational endpoints"),
    ),
    info(title = "Deng Relay API", description = "Language-learning chat relay")
)]
pub struct ApiDoc;

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    let trace = TraceLayer::new_for_http().make_span_with(|req: &Request<_>| {
        tracing::info_span!(
            "request",
            id = %uuid::Uuid::new_v4(),
            method = %req.method(),
            uri = %req.uri(),
        )
    });

    Router::new()
        .route("/chat", post(handlers::chat::chat))
        .route("/vision", post(handlers::chat::vision))
        .route("/define", post(handlers::lexicon::define))
        .route("/translate_sentence", post(handlers::lexicon::translate_sentence))
        .route("/health", get(handlers::health::health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(state.config.server.max_body_bytes))
        .layer(cors)
        .layer(trace)
        .with_state(state)
}
