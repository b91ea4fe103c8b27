use serde::{Deserialize, Serialize};
use ureq::Agent;

use super::{CollabError, REQUEST_TIMEOUT};
use crate::tools::http;

pub const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";

/// Hits requested per query.
const MAX_RESULTS: u32 = 3;

/// Text search over the web.
pub trait WebSearch: Send + Sync {
    fn search(&self, query: &str) -> Result<String, CollabError>;
}

/// Tavily's search API.
pub struct TavilySearch {
    api_key: String,
    endpoint: String,
    agent: Agent,
}

impl TavilySearch {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: TAVILY_SEARCH_URL.to_string(),
            agent: http::agent(REQUEST_TIMEOUT),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: u32,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

fn render(response: &SearchResponse) -> String {
    if response.results.is_empty() {
        return "No results found.".to_string();
    }
    response
        .results
        .iter()
        .map(|hit| format!("**{}**\n{}\nURL: {}", hit.title, hit.content, hit.url))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

impl WebSearch for TavilySearch {
    fn search(&self, query: &str) -> Result<String, CollabError> {
        let request = SearchRequest {
            api_key: &self.api_key,
            query,
            max_results: MAX_RESULTS,
        };
        let response: SearchResponse = http::post_json(&self.agent, &self.endpoint, None, &request)?;
        tracing::debug!(query, hits = response.results.len(), "search finished");
        Ok(render(&response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_formats_each_hit() {
        let response: SearchResponse = serde_json::from_value(serde_json::json!({
            "query": "kyoto",
            "results": [
                {"title": "Fushimi Inari", "url": "https://a.example", "content": "Gates", "score": 0.9},
                {"title": "Gion", "url": "https://b.example", "content": "Old town"}
            ]
        }))
        .unwrap();

        assert_eq!(
            render(&response),
            "**Fushimi Inari**\nGates\nURL: https://a.example\n\n---\n\n**Gion**\nOld town\nURL: https://b.example"
        );
    }

    #[test]
    fn render_without_hits() {
        assert_eq!(render(&SearchResponse::default()), "No results found.");
    }

    #[test]
    fn request_carries_key_and_limit() {
        let request = SearchRequest {
            api_key: "tvly-1",
            query: "kyoto hotels",
            max_results: 3,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"api_key": "tvly-1", "query": "kyoto hotels", "max_results": 3})
        );
    }

    #[test]
    fn unreachable_endpoint_is_an_error() {
        let search = TavilySearch::new("tvly-1").with_endpoint("http://localhost:1/search");
        assert!(search.search("kyoto").is_err());
    }
}
