//! Conversation API Handlers
//!
//! Every handler answers 200 with an envelope, including when the body
//! itself could not be extracted.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::MultipartRejection,
        rejection::JsonRejection,
    },
};

use crate::AppState;
use crate::models::{ChatReply, ChatRequest, VisionForm};
use crate::services::llm::failure;
use crate::utils::{ApiError, DEFAULT_LOCALE};

/// Chat with the tutor persona
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Tutor reply, or fallback text with error detail", body = ChatReply)
    ),
    tag = "Conversation"
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Json<ChatReply> {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let err = ApiError::invalid_input(rejection.body_text());
            return Json(failure("chat", &err, err.localized_message(DEFAULT_LOCALE)));
        },
    };

    tracing::info!(
        "Chat request: role={}, target={}, source={}, level={}, history={}",
        req.role,
        req.target_lang,
        req.source_lang,
        req.level,
        req.history.len()
    );
    Json(state.tutor.chat(req).await)
}

/// Explain an uploaded picture
///
/// Multipart fields: `file` (image bytes), `prompt`, `source_lang`.
#[utoipa::path(
    post,
    path = "/vision",
    request_body(content = VisionForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image explanation, or fallback text with error detail", body = ChatReply)
    ),
    tag = "Conversation"
)]
pub async fn vision(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Json<ChatReply> {
    let form = match multipart {
        Ok(multipart) => read_vision_form(multipart).await,
        Err(rejection) => Err(ApiError::invalid_input(rejection.body_text())),
    };

    match form {
        Ok(form) => {
            tracing::info!(
                "Vision request: {} bytes, source={}",
                form.file.len(),
                form.source_lang
            );
            Json(state.tutor.vision(form.file, &form.prompt, &form.source_lang).await)
        },
        Err(err) => Json(failure("vision", &err, err.localized_message(DEFAULT_LOCALE))),
    }
}

#[derive(Default)]
struct VisionFields {
    file: Vec<u8>,
    prompt: String,
    source_lang: String,
}

async fn read_vision_form(mut multipart: Multipart) -> Result<VisionFields, ApiError> {
    let mut fields = VisionFields::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::invalid_input(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" | "image" => {
                fields.file = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::invalid_input(e.body_text()))?
                    .to_vec();
            },
            "prompt" => {
                fields.prompt = field.text().await.map_err(|e| ApiError::invalid_input(e.body_text()))?;
            },
            "source_lang" | "sourceLanguage" => {
                fields.source_lang =
                    field.text().await.map_err(|e| ApiError::invalid_input(e.body_text()))?;
            },
            other => tracing::debug!("Ignoring unexpected multipart field '{}'", other),
        }
    }

    if fields.source_lang.trim().is_empty() {
        fields.source_lang = "Turkish".to_string();
    }

    Ok(fields)
}
