// Common test utilities and helpers

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::AppState;
use crate::config::Config;
use crate::services::llm::{Content, GenerationClient};
use crate::utils::{ApiError, ApiResult};

/// What the fake provider does on every call
#[derive(Debug, Clone)]
pub enum Outcome {
    Reply(String),
    Upstream(u16, String),
    Blocked,
}

/// In-memory `GenerationClient` recording every request it receives
pub struct FakeClient {
    outcome: Outcome,
    calls: Mutex<Vec<Vec<Content>>>,
}

impl FakeClient {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self { outcome: Outcome::Reply(text.to_string()), calls: Mutex::new(Vec::new()) })
    }

    pub fn failing(status: u16, message: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Outcome::Upstream(status, message.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn blocking() -> Arc<Self> {
        Arc::new(Self { outcome: Outcome::Blocked, calls: Mutex::new(Vec::new()) })
    }

    pub fn calls(&self) -> Vec<Vec<Content>> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn last_call(&self) -> Vec<Content> {
        self.calls().pop().expect("at least one provider call")
    }
}

#[async_trait]
impl GenerationClient for FakeClient {
    async fn generate(&self, contents: Vec<Content>) -> ApiResult<String> {
        self.calls.lock().expect("calls lock").push(contents);
        match &self.outcome {
            Outcome::Reply(text) => Ok(text.trim().to_string()),
            Outcome::Upstream(status, message) => Err(ApiError::upstream(*status, message.clone())),
            Outcome::Blocked => Err(ApiError::Blocked("SAFETY".to_string())),
        }
    }

    fn model(&self) -> &str {
        "fake-model"
    }
}

/// Application state wired to a fake provider
pub fn create_test_state(client: Arc<FakeClient>) -> Arc<AppState> {
    Arc::new(AppState::with_client(Config::default(), client))
}
