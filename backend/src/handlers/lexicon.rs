//! Dictionary and translation handlers

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use rust_i18n::t;

use crate::AppState;
use crate::models::{DefineRequest, DefinitionReply, TranslateRequest, TranslationReply};
use crate::services::llm::failure;
use crate::utils::{ApiError, DEFAULT_LOCALE};

/// Look up a word
#[utoipa::path(
    post,
    path = "/define",
    request_body = DefineRequest,
    responses(
        (status = 200, description = "Comma-separated translations, or fallback with error detail", body = DefinitionReply)
    ),
    tag = "Lexicon"
)]
pub async fn define(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DefineRequest>, JsonRejection>,
) -> Json<DefinitionReply> {
    match payload {
        Ok(Json(req)) => {
            tracing::info!("Define request: word={}, source={}", req.word, req.source_lang);
            Json(state.tutor.define(req).await)
        },
        Err(rejection) => {
            let err = ApiError::invalid_input(rejection.body_text());
            Json(failure("define", &err, t!("define.not_found", locale = DEFAULT_LOCALE).to_string()))
        },
    }
}

/// Translate a sentence
#[utoipa::path(
    post,
    path = "/translate_sentence",
    request_body = TranslateRequest,
    responses(
        (status = 200, description = "Fluent translation, or fallback with error detail", body = TranslationReply)
    ),
    tag = "Lexicon"
)]
pub async fn translate_sentence(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Json<TranslationReply> {
    match payload {
        Ok(Json(req)) => {
            tracing::info!("Translate request: {} chars into {}", req.text.chars().count(), req.target_lang);
            Json(state.tutor.translate(req).await)
        },
        Err(rejection) => {
            let err = ApiError::invalid_input(rejection.body_text());
            Json(failure("translate", &err, t!("translate.failed", locale = DEFAULT_LOCALE).to_string()))
        },
    }
}
