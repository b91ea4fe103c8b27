use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use ureq::Agent;

use crate::collab::CollabError;

/// A blocking HTTP agent with a global timeout.
pub fn agent(timeout: Duration) -> Agent {
    let config = Agent::config_builder()
        .timeout_global(Some(timeout))
        .build();

    config.into()
}

/// POST a JSON body and decode the JSON response.
///
/// Non-2xx responses come back as [`CollabError::Status`].
pub fn post_json<B, R>(
    agent: &Agent,
    url: &str,
    bearer: Option<&str>,
    body: &B,
) -> Result<R, CollabError>
where
    B: Serialize,
    R: DeserializeOwned,
{
    let mut request = agent.post(url);
    if let Some(token) = bearer {
        request = request.header("Authorization", format!("Bearer {token}"));
    }

    let response = request.send_json(body)?.body_mut().read_json::<R>()?;

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_json_bad_url_returns_error() {
        let agent = agent(Duration::from_secs(5));
        let body = serde_json::json!({"key": "value"});
        let result: Result<serde_json::Value, _> =
            post_json(&agent, "http://localhost:1/nope", None, &body);
        assert!(matches!(result, Err(CollabError::Transport(_))));
    }

    #[test]
    fn test_post_json_with_bearer_bad_url_returns_error() {
        let agent = agent(Duration::from_secs(5));
        let body = serde_json::json!({"key": "value"});
        let result: Result<serde_json::Value, _> =
            post_json(&agent, "http://localhost:1/nope", Some("secret"), &body);
        assert!(result.is_err());
    }
}
