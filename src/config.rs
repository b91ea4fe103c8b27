use std::env;
use std::fmt;

/// Which collaborators to turn on, read from the environment.
///
/// Every value is optional. An empty or whitespace-only variable counts as
/// unset.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub tavily_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    pub groq_model: Option<String>,
    pub groq_base_url: Option<String>,
}

impl Config {
    /// Read the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            tavily_api_key: get("TAVILY_API_KEY"),
            groq_api_key: get("GROQ_API_KEY"),
            groq_model: get("GROQ_MODEL"),
            groq_base_url: get("GROQ_BASE_URL"),
        }
    }

    /// The Tavily key, when web search is enabled.
    pub fn search_key(&self) -> Option<&str> {
        self.tavily_api_key.as_deref()
    }

    /// Key and model name. The chat model needs both.
    pub fn chat_credentials(&self) -> Option<(&str, &str)> {
        self.groq_api_key.as_deref().zip(self.groq_model.as_deref())
    }
}

// Keys stay out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<set>");
        f.debug_struct("Config")
            .field("tavily_api_key", &redact(&self.tavily_api_key))
            .field("groq_api_key", &redact(&self.groq_api_key))
            .field("groq_model", &self.groq_model)
            .field("groq_base_url", &self.groq_base_url)
            .finish()
    }
}
