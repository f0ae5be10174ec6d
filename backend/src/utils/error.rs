use rust_i18n::t;
use thiserror::Error;

/// Relay error with enough context to log the raw cause
///
/// None of these are fatal: the dispatcher turns every variant into a
/// reply envelope carrying a localized fallback plus `to_string()` as detail.
#[derive(Error, Debug)]
pub enum ApiError {
    // Malformed input 1xxx
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Could not decode image: {0}")]
    InvalidImage(String),

    // Provider errors 2xxx
    #[error("Provider rejected credentials ({status}): {message}")]
    Auth { status: u16, message: String },

    #[error("Provider returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Response blocked by provider: {0}")]
    Blocked(String),

    #[error("Provider returned an empty response")]
    EmptyResponse,

    #[error("Failed to parse provider response: {0}")]
    Parse(String),

    // Transport errors 3xxx - auto-convert from reqwest::Error
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// Helper to create invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Helper to create invalid image error
    pub fn invalid_image(message: impl std::fmt::Display) -> Self {
        Self::InvalidImage(message.to_string())
    }

    /// Helper to create upstream error
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream { status, message: message.into() }
    }

    /// Numeric code carried in logs
    pub fn error_code(&self) -> i32 {
        match self {
            Self::InvalidInput(_) => 1001,
            Self::MissingField(_) => 1002,
            Self::InvalidImage(_) => 1003,

            Self::Auth { .. } => 2001,
            Self::Upstream { .. } => 2002,
            Self::Blocked(_) => 2003,
            Self::EmptyResponse => 2004,
            Self::Parse(_) => 2005,

            Self::Transport(_) => 3001,
        }
    }

    /// Whether the caller sent something unusable, as opposed to the provider failing
    pub fn is_client_fault(&self) -> bool {
        (1000..2000).contains(&self.error_code())
    }

    /// User-facing fallback text for the given locale
    pub fn localized_message(&self, locale: &str) -> String {
        match self {
            Self::InvalidInput(_) | Self::MissingField(_) => {
                t!("errors.invalid_input", locale = locale).to_string()
            },
            Self::InvalidImage(_) => t!("errors.invalid_image", locale = locale).to_string(),
            Self::Blocked(_) => t!("errors.blocked", locale = locale).to_string(),
            Self::Auth { .. }
            | Self::Upstream { .. }
            | Self::EmptyResponse
            | Self::Parse(_)
            | Self::Transport(_) => t!("errors.connection", locale = locale).to_string(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Parse(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
