use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-flash-latest";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub gemini: GeminiConfig,
    pub conversation: ConversationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for request bodies, image uploads included
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Whole-request timeout in seconds; 0 keeps the transport default
    #[serde(deserialize_with = "deserialize_duration_secs")]
    pub request_timeout: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConversationConfig {
    /// Number of trailing client turns forwarded to the model
    pub history_window: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Config {
    /// Load configuration with environment variable override support
    ///
    /// Loading order:
    /// 1. Load from config.toml file (explicit path first, then well-known locations)
    /// 2. Override with environment variables
    /// 3. Validate the final configuration
    pub fn load(explicit_path: Option<&str>) -> Result<Self, anyhow::Error> {
        let config_path = explicit_path
            .map(str::to_string)
            .or_else(|| std::env::var("APP_CONFIG").ok())
            .or_else(Self::find_config_file);

        let mut config = match config_path {
            Some(path) => {
                let config = Self::from_toml(&path)?;
                tracing::info!("Loaded configuration from {}", path);
                config
            },
            None => {
                tracing::warn!("Configuration file not found, using defaults");
                Config::default()
            },
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - APP_SERVER_HOST: Server host (default: 0.0.0.0)
    /// - APP_SERVER_PORT: Server port (default: 8000)
    /// - GEMINI_API_KEY: Credential for the generation provider
    /// - APP_GEMINI_MODEL: Model identifier (default: gemini-flash-latest)
    /// - APP_GEMINI_BASE_URL: Provider base URL
    /// - APP_GEMINI_TIMEOUT: Request timeout (accepts "30s", "2m")
    /// - APP_HISTORY_WINDOW: Number of history turns kept per request
    /// - APP_LOG_LEVEL: Logging level (e.g., "info,deng_relay=debug")
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("APP_SERVER_HOST") {
            self.server.host = host;
            tracing::info!("Override server.host from env: {}", self.server.host);
        }

        if let Ok(port) = std::env::var("APP_SERVER_PORT")
            && let Ok(port) = port.parse()
        {
            self.server.port = port;
            tracing::info!("Override server.port from env: {}", self.server.port);
        }

        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            self.gemini.api_key = key;
            tracing::info!("Override gemini.api_key from env");
        }

        if let Ok(model) = std::env::var("APP_GEMINI_MODEL") {
            self.gemini.model = model;
            tracing::info!("Override gemini.model from env: {}", self.gemini.model);
        }

        if let Ok(base_url) = std::env::var("APP_GEMINI_BASE_URL") {
            self.gemini.base_url = base_url;
            tracing::info!("Override gemini.base_url from env: {}", self.gemini.base_url);
        }

        if let Ok(timeout) = std::env::var("APP_GEMINI_TIMEOUT") {
            match parse_duration_to_secs(&timeout) {
                Ok(val) => {
                    self.gemini.request_timeout = val;
                    tracing::info!(
                        "Override gemini.request_timeout from env: {}",
                        self.gemini.request_timeout
                    );
                },
                Err(e) => tracing::warn!(
                    "Invalid APP_GEMINI_TIMEOUT '{}': {} (keep {})",
                    timeout,
                    e,
                    self.gemini.request_timeout
                ),
            }
        }

        if let Ok(window) = std::env::var("APP_HISTORY_WINDOW")
            && let Ok(window) = window.parse()
        {
            self.conversation.history_window = window;
            tracing::info!(
                "Override conversation.history_window from env: {}",
                self.conversation.history_window
            );
        }

        if let Ok(level) = std::env::var("APP_LOG_LEVEL") {
            self.logging.level = level;
            tracing::info!("Override logging.level from env: {}", self.logging.level);
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<(), anyhow::Error> {
        // A missing key is not fatal: the provider rejects the call and the
        // rejection is reported inside the reply envelope.
        if self.gemini.api_key.is_empty() {
            tracing::warn!("⚠️  GEMINI_API_KEY is not set, every generation call will fail");
        }

        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        if self.gemini.model.trim().is_empty() {
            anyhow::bail!("gemini.model cannot be empty");
        }

        if self.conversation.history_window == 0 {
            anyhow::bail!("conversation.history_window must be > 0");
        }

        Ok(())
    }

    fn find_config_file() -> Option<String> {
        let possible_paths =
            ["conf/config.toml", "config.toml", "./conf/config.toml", "./config.toml"];

        possible_paths
            .iter()
            .find(|path| Path::new(path).exists())
            .map(|path| path.to_string())
    }

    fn from_toml(path: &str) -> Result<Self, anyhow::Error> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Address the HTTP listener binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8000, max_body_bytes: 10 * 1024 * 1024 }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            request_timeout: 0,
        }
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self { history_window: 10 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info,deng_relay=debug".to_string(), file: None }
    }
}

// =========================
// Helpers for parsing values
// =========================

fn parse_duration_to_secs(input: &str) -> Result<u64, String> {
    // Accept plain numbers (treated as seconds)
    if let Ok(val) = input.parse::<u64>() {
        return Ok(val);
    }

    let s = input.trim().to_lowercase();
    let (num_str, unit) = s.split_at(s.chars().take_while(|c| c.is_ascii_digit()).count());
    if num_str.is_empty() || unit.is_empty() {
        return Err("missing number or unit".into());
    }
    let n: u64 = num_str.parse().map_err(|_| "invalid number".to_string())?;
    match unit {
        "s" | "sec" | "secs" | "second" | "seconds" => Ok(n),
        "m" | "min" | "mins" | "minute" | "minutes" => Ok(n * 60),
        "h" | "hr" | "hour" | "hours" => Ok(n * 60 * 60),
        _ => Err(format!("unsupported unit: {}", unit)),
    }
}

// Accepts either a number of seconds or a human-friendly string
fn deserialize_duration_secs<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct Visitor;
    impl<'de> serde::de::Visitor<'de> for Visitor {
        type Value = u64;
        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a number of seconds or a string like '30s', '2m'")
        }
        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v)
        }
        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            if v >= 0 { Ok(v as u64) } else { Err(E::custom("negative not allowed")) }
        }
        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            parse_duration_to_secs(v).map_err(E::custom)
        }
    }
    deserializer.deserialize_any(Visitor)
}
