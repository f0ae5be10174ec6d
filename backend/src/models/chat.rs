use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

fn default_role() -> String {
    "friend".to_string()
}

fn default_target_lang() -> String {
    "English".to_string()
}

fn default_source_lang() -> String {
    "Turkish".to_string()
}

// Clients send `null` for fields they never filled in; treat it like an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_role<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_role))
}

fn null_as_target_lang<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_target_lang))
}

fn null_as_source_lang<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_source_lang))
}

/// Body of `POST /chat`
///
/// `history` stays untyped on the wire: older clients send entries with
/// missing or unexpected fields and the normalizer decides what survives.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ChatRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default = "default_role", deserialize_with = "null_as_role")]
    pub role: String,
    #[serde(
        default = "default_target_lang",
        alias = "targetLanguage",
        deserialize_with = "null_as_target_lang"
    )]
    pub target_lang: String,
    #[serde(
        default = "default_source_lang",
        alias = "sourceLanguage",
        deserialize_with = "null_as_source_lang"
    )]
    pub source_lang: String,
    #[serde(default, alias = "proficiencyLevel", deserialize_with = "null_as_default")]
    pub level: String,
    #[serde(default, deserialize_with = "null_as_default")]
    #[schema(value_type = Vec<Object>)]
    pub history: Vec<serde_json::Value>,
}

/// Body of `POST /define`
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DefineRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub word: String,
    #[serde(
        default = "default_source_lang",
        alias = "sourceLanguage",
        deserialize_with = "null_as_source_lang"
    )]
    pub source_lang: String,
}

/// Body of `POST /translate_sentence`
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TranslateRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(
        default = "default_target_lang",
        alias = "targetLanguage",
        deserialize_with = "null_as_target_lang"
    )]
    pub target_lang: String,
}

/// Multipart form accepted by `POST /vision` (documentation only)
#[derive(Debug, ToSchema)]
pub struct VisionForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    pub prompt: String,
    pub source_lang: String,
}

/// Uniform success-or-error shape shared by every relay endpoint
pub trait ReplyEnvelope: Sized {
    fn success(text: String) -> Self;
    fn failure(fallback: String, detail: String) -> Self;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatReply {
    pub reply: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DefinitionReply {
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TranslationReply {
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReplyEnvelope for ChatReply {
    fn success(text: String) -> Self {
        Self { reply: text, error: None }
    }
    fn failure(fallback: String, detail: String) -> Self {
        Self { reply: fallback, error: Some(detail) }
    }
}

impl ReplyEnvelope for DefinitionReply {
    fn success(text: String) -> Self {
        Self { definition: text, error: None }
    }
    fn failure(fallback: String, detail: String) -> Self {
        Self { definition: fallback, error: Some(detail) }
    }
}

impl ReplyEnvelope for TranslationReply {
    fn success(text: String) -> Self {
        Self { translation: text, error: None }
    }
    fn failure(fallback: String, detail: String) -> Self {
        Self { translation: fallback, error: Some(detail) }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_defaults() {
        let req: ChatRequest = serde_json::from_str(r#"{"text": "Hello"}"#).unwrap();
        assert_eq!(req.role, "friend");
        assert_eq!(req.target_lang, "English");
        assert_eq!(req.source_lang, "Turkish");
        assert!(req.level.is_empty());
        assert!(req.history.is_empty());
    }

    #[test]
    fn test_chat_request_accepts_camel_case_aliases() {
        let req: ChatRequest = serde_json::from_str(
            r#"{"text": "Hola", "targetLanguage": "Spanish", "sourceLanguage": "English", "proficiencyLevel": "B1"}"#,
        )
        .unwrap();
        assert_eq!(req.target_lang, "Spanish");
        assert_eq!(req.source_lang, "English");
        assert_eq!(req.level, "B1");
    }

    #[test]
    fn test_null_fields_fall_back_to_defaults() {
        let req: ChatRequest = serde_json::from_str(
            r#"{"text": "Hello", "role": null, "target_lang": null, "sourceLanguage": null, "level": null, "history": null}"#,
        )
        .unwrap();
        assert_eq!(req.role, "friend");
        assert_eq!(req.target_lang, "English");
        assert_eq!(req.source_lang, "Turkish");
        assert!(req.level.is_empty());
        assert!(req.history.is_empty());

        let req: DefineRequest =
            serde_json::from_str(r#"{"word": "run", "source_lang": null}"#).unwrap();
        assert_eq!(req.source_lang, "Turkish");

        let req: TranslateRequest = serde_json::from_str(r#"{"text": null, "target_lang": null}"#).unwrap();
        assert!(req.text.is_empty());
        assert_eq!(req.target_lang, "English");
    }

    #[test]
    fn test_envelope_omits_error_on_success() {
        let json = serde_json::to_value(ChatReply::success("Hi!".into())).unwrap();
        assert_eq!(json, serde_json::json!({"reply": "Hi!"}));

        let json = serde_json::to_value(DefinitionReply::failure(
            "Could not find definition.".into(),
            "boom".into(),
        ))
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"definition": "Could not find definition.", "error": "boom"})
        );
    }
}
