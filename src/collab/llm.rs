use serde::{Deserialize, Serialize};
use ureq::Agent;

use super::{CollabError, REQUEST_TIMEOUT};
use crate::tools::http;

/// Groq's OpenAI-compatible chat completions endpoint.
pub const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Deterministic replies.
const TEMPERATURE: f32 = 0.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A model that turns a conversation into a reply.
pub trait ChatModel: Send + Sync {
    fn generate(&self, messages: &[Message]) -> Result<String, CollabError>;
}

/// Builder for a one-shot conversation.
///
/// ```rust
/// use trip_line::collab::{Prompt, Role};
///
/// let prompt = Prompt::new()
///     .system("You are an expert Travel Agent.")
///     .user("Plan three days in Kyoto.");
/// assert_eq!(prompt.messages().len(), 2);
/// assert_eq!(prompt.messages()[1].role, Role::User);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Prompt {
    messages: Vec<Message>,
}

impl Prompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn system(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::system(content));
        self
    }

    pub fn user(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::user(content));
        self
    }

    /// An earlier reply from the model, replayed as context.
    pub fn assistant(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::assistant(content));
        self
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn send(&self, model: &dyn ChatModel) -> Result<String, CollabError> {
        model.generate(&self.messages)
    }
}

/// Chat completions over any OpenAI-compatible HTTP API (Groq by default).
pub struct OpenAiCompatChat {
    api_key: String,
    model: String,
    endpoint: String,
    agent: Agent,
}

impl OpenAiCompatChat {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            endpoint: GROQ_CHAT_URL.to_string(),
            agent: http::agent(REQUEST_TIMEOUT),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

fn first_content(response: ChatResponse) -> Result<String, CollabError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or(CollabError::EmptyResponse)
}

impl ChatModel for OpenAiCompatChat {
    fn generate(&self, messages: &[Message]) -> Result<String, CollabError> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: TEMPERATURE,
        };
        let response: ChatResponse =
            http::post_json(&self.agent, &self.endpoint, Some(self.api_key.as_str()), &request)?;
        first_content(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_lowercase_roles() {
        let messages = [
            Message::system("be brief"),
            Message::user("hi"),
            Message::assistant("hello"),
        ];
        let request = ChatRequest {
            model: "llama-3.1-8b-instant",
            messages: &messages,
            temperature: 0.0,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "model": "llama-3.1-8b-instant",
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "hi"},
                    {"role": "assistant", "content": "hello"}
                ],
                "temperature": 0.0
            })
        );
    }

    #[test]
    fn first_choice_wins() {
        let response: ChatResponse = serde_json::from_value(serde_json::json!({
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Day 1"}},
                {"index": 1, "message": {"role": "assistant", "content": "Day 2"}}
            ]
        }))
        .unwrap();
        assert_eq!(first_content(response).unwrap(), "Day 1");
    }

    #[test]
    fn no_choices_is_empty() {
        let response: ChatResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(matches!(
            first_content(response),
            Err(CollabError::EmptyResponse)
        ));
    }

    #[test]
    fn blank_content_is_empty() {
        let response: ChatResponse = serde_json::from_value(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "  "}}]
        }))
        .unwrap();
        assert!(matches!(
            first_content(response),
            Err(CollabError::EmptyResponse)
        ));
    }

    #[test]
    fn unreachable_endpoint_is_an_error() {
        let chat = OpenAiCompatChat::new("gsk-1", "llama").with_endpoint("http://localhost:1/v1");
        let result = Prompt::new().user("hi").send(&chat);
        assert!(result.is_err());
    }

    #[test]
    fn defaults_to_groq() {
        let chat = OpenAiCompatChat::new("gsk-1", "llama");
        assert_eq!(chat.endpoint(), GROQ_CHAT_URL);
        assert_eq!(chat.model(), "llama");
    }
}
