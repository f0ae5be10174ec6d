//! Tutor dispatcher
//!
//! compose → normalize → dispatch → envelope. Every public operation returns
//! an envelope; provider and input failures are logged and folded into it.

use rust_i18n::t;
use std::sync::Arc;

use super::client::GenerationClient;
use super::image::ImagePayload;
use super::models::{Content, coalesce};
use super::scenarios::history::{anchor, normalize};
use super::scenarios::lexicon::{clean_definition, define_prompt, translate_prompt, vision_prompt};
use super::scenarios::persona::{PromptContext, compose};
use crate::models::{
    ChatReply, ChatRequest, DefineRequest, DefinitionReply, ReplyEnvelope, TranslateRequest,
    TranslationReply,
};
use crate::utils::{ApiError, ApiResult, locale_for_language};

pub struct TutorService {
    client: Arc<dyn GenerationClient>,
    history_window: usize,
}

impl TutorService {
    pub fn new(client: Arc<dyn GenerationClient>, history_window: usize) -> Self {
        Self { client, history_window: history_window.max(1) }
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Text chat with the composed persona and trimmed history
    pub async fn chat(&self, req: ChatRequest) -> ChatReply {
        let locale = locale_for_language(&req.source_lang);
        match self.try_chat(&req).await {
            Ok(reply) => ChatReply::success(reply),
            Err(err) => failure("chat", &err, err.localized_message(locale)),
        }
    }

    async fn try_chat(&self, req: &ChatRequest) -> ApiResult<String> {
        let text = required(&req.text, "text")?;

        let ctx = PromptContext::from_request(&req.role, &req.target_lang, &req.source_lang, &req.level);
        let instruction = compose(&ctx);
        let history = normalize(&req.history, self.history_window);
        tracing::debug!(
            "Chat prompt: role={}, level={}, target={}, source={}, history {} -> {}",
            ctx.role.as_str(),
            ctx.level.as_str(),
            ctx.target_language,
            ctx.source_language,
            req.history.len(),
            history.len()
        );

        let mut contents: Vec<Content> = anchor(&instruction, history).iter().map(Content::from).collect();
        contents.push(Content::user_text(text));

        self.client.generate(coalesce(contents)).await
    }

    /// Explain an uploaded image in the learner's own language
    pub async fn vision(&self, image: Vec<u8>, prompt: &str, source_lang: &str) -> ChatReply {
        let locale = locale_for_language(source_lang);
        match self.try_vision(image, prompt, source_lang).await {
            Ok(reply) => ChatReply::success(reply),
            Err(err) => failure("vision", &err, err.localized_message(locale)),
        }
    }

    async fn try_vision(&self, image: Vec<u8>, prompt: &str, source_lang: &str) -> ApiResult<String> {
        let prompt = required(prompt, "prompt")?;
        let image = ImagePayload::from_upload(image)?;
        tracing::debug!("Vision prompt with {} ({} bytes)", image.mime_type(), image.len());

        let contents = vec![Content::user_with_image(vision_prompt(prompt, source_lang), &image)];
        self.client.generate(contents).await
    }

    /// Comma-separated dictionary translations of a single word
    pub async fn define(&self, req: DefineRequest) -> DefinitionReply {
        let locale = locale_for_language(&req.source_lang);
        match self.try_define(&req).await {
            Ok(definition) => DefinitionReply::success(definition),
            Err(err) => failure("define", &err, t!("define.not_found", locale = locale).to_string()),
        }
    }

    async fn try_define(&self, req: &DefineRequest) -> ApiResult<String> {
        let word = required(&req.word, "word")?;
        let raw = self
            .client
            .generate(vec![Content::user_text(define_prompt(word, &req.source_lang))])
            .await?;

        let definition = clean_definition(&raw);
        if definition.is_empty() {
            return Err(ApiError::EmptyResponse);
        }
        Ok(definition)
    }

    /// Fluent translation without commentary
    pub async fn translate(&self, req: TranslateRequest) -> TranslationReply {
        let locale = locale_for_language(&req.target_lang);
        match self.try_translate(&req).await {
            Ok(translation) => TranslationReply::success(translation),
            Err(err) => failure("translate", &err, t!("translate.failed", locale = locale).to_string()),
        }
    }

    async fn try_translate(&self, req: &TranslateRequest) -> ApiResult<String> {
        let text = required(&req.text, "text")?;
        self.client
            .generate(vec![Content::user_text(translate_prompt(text, &req.target_lang))])
            .await
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> ApiResult<&'a str> {
    let value = value.trim();
    if value.is_empty() { Err(ApiError::MissingField(field)) } else { Ok(value) }
}

/// Log the raw cause and wrap it with the user-facing fallback
pub fn failure<E: ReplyEnvelope>(operation: &str, err: &ApiError, fallback: String) -> E {
    if err.is_client_fault() {
        tracing::info!("{} rejected input (code {}): {}", operation, err.error_code(), err);
    } else {
        tracing::warn!("{} failed (code {}): {}", operation, err.error_code(), err);
    }
    E::failure(fallback, err.to_string())
}
