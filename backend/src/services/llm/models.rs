//! Generation provider wire types (Gemini `generateContent`)
//!
//! ```json
//! {
//!   "contents": [
//!     {"role": "user",  "parts": [{"text": "System Instruction: ..."}]},
//!     {"role": "model", "parts": [{"text": "Understood. I am ready."}]},
//!     {"role": "user",  "parts": [{"text": "Hello"}, {"inlineData": {"mimeType": "image/png", "data": "..."}}]}
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::image::ImagePayload;
use super::scenarios::history::{ConversationTurn, TurnRole};
use crate::utils::{ApiError, ApiResult};

const ROLE_USER: &str = "user";
const ROLE_MODEL: &str = "model";

// ============================================================================
// Request
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// "user" or "model" (the provider has no "assistant")
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    /// Base64 (standard alphabet, padded)
    pub data: String,
}

impl Content {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self { role: ROLE_USER.to_string(), parts: vec![Part::text(text)] }
    }

    /// Prompt text followed by the image, in that order
    pub fn user_with_image(text: impl Into<String>, image: &ImagePayload) -> Self {
        Self {
            role: ROLE_USER.to_string(),
            parts: vec![Part::text(text), Part::InlineData { inline_data: image.to_blob() }],
        }
    }

    /// Text parts joined by newlines, ignoring inline data
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text { text } => Some(text.as_str()),
                Part::InlineData { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Fold consecutive same-role contents into one multi-part content
///
/// The provider expects user and model turns to alternate; a history ending
/// on a user turn would otherwise put two user turns back to back.
pub fn coalesce(contents: impl IntoIterator<Item = Content>) -> Vec<Content> {
    let mut merged: Vec<Content> = Vec::new();
    for content in contents {
        match merged.last_mut() {
            Some(last) if last.role == content.role => last.parts.extend(content.parts),
            _ => merged.push(content),
        }
    }
    merged
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

impl From<&ConversationTurn> for Content {
    fn from(turn: &ConversationTurn) -> Self {
        let role = match turn.role() {
            TurnRole::User => ROLE_USER,
            TurnRole::Assistant => ROLE_MODEL,
        };
        Self { role: role.to_string(), parts: vec![Part::text(turn.content())] }
    }
}

// ============================================================================
// Response
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub thought: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Trimmed text of the first candidate
    pub fn into_text(self) -> ApiResult<String> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ApiError::Blocked(reason));
        }

        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(ApiError::EmptyResponse);
        };

        let text: String = candidate
            .content
            .unwrap_or_default()
            .parts
            .into_iter()
            .filter(|p| p.thought != Some(true))
            .filter_map(|p| p.text)
            .collect();
        let text = text.trim();

        if !text.is_empty() {
            return Ok(text.to_string());
        }

        match candidate.finish_reason.as_deref() {
            Some(reason @ ("SAFETY" | "PROHIBITED_CONTENT" | "BLOCKLIST")) => {
                Err(ApiError::Blocked(reason.to_string()))
            },
            _ => Err(ApiError::EmptyResponse),
        }
    }
}

/// `{"error": {"code": 400, "message": "...", "status": "INVALID_ARGUMENT"}}`
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderErrorEnvelope {
    pub error: ProviderError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl ProviderErrorEnvelope {
    /// Best human-readable message from an error body, falling back to the raw text
    pub fn message_from_body(body: &str) -> String {
        match serde_json::from_str::<Self>(body) {
            Ok(env) => match env.error.status {
                Some(status) if !env.error.message.is_empty() => {
                    format!("{}: {}", status, env.error.message)
                },
                _ => env.error.message,
            },
            Err(_) => body.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coalesce_merges_same_role_runs() {
        let contents = coalesce(vec![
            Content::from(&ConversationTurn::user("System Instruction: x")),
            Content::from(&ConversationTurn::assistant("Understood. I am ready.")),
            Content::from(&ConversationTurn::user("hey")),
            Content::user_text("again"),
        ]);

        let roles: Vec<&str> = contents.iter().map(|c| c.role.as_str()).collect();
        assert_eq!(roles, vec!["user", "model", "user"]);
        assert_eq!(contents[2].parts.len(), 2);
        assert_eq!(contents[2].text(), "hey\nagain");
    }

    #[test]
    fn test_coalesce_keeps_alternating_turns() {
        let contents = vec![Content::user_text("a"), Content::from(&ConversationTurn::assistant("b"))];
        assert_eq!(coalesce(contents.clone()), contents);
    }

    #[test]
    fn test_turn_roles_map_to_provider_roles() {
        let user = Content::from(&ConversationTurn::user("hi"));
        let assistant = Content::from(&ConversationTurn::assistant("hello"));
        assert_eq!(user.role, "user");
        assert_eq!(assistant.role, "model");
        assert_eq!(assistant.text(), "hello");
    }

    #[test]
    fn test_request_serializes_camel_case_inline_data() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".into(),
                parts: vec![
                    Part::text("look"),
                    Part::InlineData {
                        inline_data: Blob { mime_type: "image/png".into(), data: "AAAA".into() },
                    },
                ],
            }],
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        {"text": "look"},
                        {"inlineData": {"mimeType": "image/png", "data": "AAAA"}}
                    ]
                }]
            })
        );
    }

    #[test]
    fn test_into_text_joins_and_trims_parts() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "  Hello "}, {"text": "there!\n"}]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(resp.into_text().unwrap(), "Hello there!");
    }

    #[test]
    fn test_into_text_skips_thought_parts() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [{"text": "thinking...", "thought": true}, {"text": "Merhaba"}]}
            }]
        }))
        .unwrap();
        assert_eq!(resp.into_text().unwrap(), "Merhaba");
    }

    #[test]
    fn test_into_text_blocked_prompt() {
        let resp: GenerateContentResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();
        assert!(matches!(resp.into_text(), Err(ApiError::Blocked(r)) if r == "SAFETY"));
    }

    #[test]
    fn test_into_text_safety_finish_without_text() {
        let resp: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": [{"finishReason": "SAFETY"}]})).unwrap();
        assert!(matches!(resp.into_text(), Err(ApiError::Blocked(_))));
    }

    #[test]
    fn test_into_text_empty() {
        assert!(matches!(
            GenerateContentResponse::default().into_text(),
            Err(ApiError::EmptyResponse)
        ));
        let resp: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "   "}]}, "finishReason": "STOP"}]
        }))
        .unwrap();
        assert!(matches!(resp.into_text(), Err(ApiError::EmptyResponse)));
    }

    #[test]
    fn test_provider_error_message() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(
            ProviderErrorEnvelope::message_from_body(body),
            "INVALID_ARGUMENT: API key not valid."
        );
        assert_eq!(ProviderErrorEnvelope::message_from_body(" upstream down \n"), "upstream down");
    }
}
