//! External collaborators: web search and a chat-completion model.
//!
//! Both are optional. A step that finds its collaborator missing, or gets an
//! error back, writes a placeholder instead of failing the run.

mod llm;
mod search;

pub use llm::{ChatModel, GROQ_CHAT_URL, Message, OpenAiCompatChat, Prompt, Role};
pub use search::{TAVILY_SEARCH_URL, TavilySearch, WebSearch};

use crate::config::Config;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Per-request timeout for both collaborators.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Why a collaborator call didn't produce a usable answer.
#[derive(Debug, Error)]
pub enum CollabError {
    #[error("http status {0}")]
    Status(u16),
    #[error("transport: {0}")]
    Transport(String),
    #[error("decode: {0}")]
    Decode(String),
    #[error("empty response")]
    EmptyResponse,
}

impl From<ureq::Error> for CollabError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::StatusCode(code) => CollabError::Status(code),
            ureq::Error::Json(err) => CollabError::Decode(err.to_string()),
            other => CollabError::Transport(other.to_string()),
        }
    }
}

/// The collaborators handed to the travel steps. `None` means disabled.
#[derive(Clone, Default)]
pub struct Services {
    pub search: Option<Arc<dyn WebSearch>>,
    pub model: Option<Arc<dyn ChatModel>>,
}

impl Services {
    /// No collaborators at all; every step falls back.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: Arc<dyn WebSearch>) -> Self {
        self.search = Some(search);
        self
    }

    pub fn with_model(mut self, model: Arc<dyn ChatModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Build the real clients the configuration allows for.
    ///
    /// Missing credentials are not an error: the collaborator stays disabled
    /// and we say so in the log.
    pub fn from_config(config: &Config) -> Self {
        let mut services = Self::none();

        match config.chat_credentials() {
            Some((key, model)) => {
                let mut chat = OpenAiCompatChat::new(key, model);
                if let Some(url) = &config.groq_base_url {
                    chat = chat.with_endpoint(url.clone());
                }
                tracing::info!(model, endpoint = chat.endpoint(), "chat model enabled");
                services.model = Some(Arc::new(chat));
            }
            None if config.groq_api_key.is_some() => {
                tracing::info!("GROQ_MODEL not set; skipping chat model initialization");
            }
            None => {
                tracing::info!("GROQ_API_KEY not set; skipping chat model initialization");
            }
        }

        match config.search_key() {
            Some(key) => {
                tracing::info!("web search enabled");
                services.search = Some(Arc::new(TavilySearch::new(key)));
            }
            None => tracing::info!("TAVILY_API_KEY not set; searches will be skipped"),
        }

        services
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("search", &self.search.is_some())
            .field("model", &self.model.is_some())
            .finish()
    }
}
