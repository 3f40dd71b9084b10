use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::services::backend;

/// One turn of chatbot history as the dashboard sends it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<Part>,
}

/// Client for the generative-AI completion endpoint backing the chatbot.
#[derive(Clone)]
pub struct GenAiClient {
    http: Client,
    api_url: String,
    api_key: Option<String>,
}

impl GenAiClient {
    /// Creates a new `GenAiClient`.
    pub fn new(api_url: &str, api_key: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_url: api_url.to_string(),
            api_key,
        })
    }

    /// Maps dashboard chat turns onto the upstream `contents` format.
    ///
    /// The upstream only knows `user` and `model` speaker roles.
    fn build_contents(message: &str, history: &[ChatTurn]) -> Vec<Content> {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|turn| Content {
                role: match turn.role.as_str() {
                    "assistant" | "model" => "model".to_string(),
                    _ => "user".to_string(),
                },
                parts: vec![Part {
                    text: turn.content.clone(),
                }],
            })
            .collect();

        contents.push(Content {
            role: "user".to_string(),
            parts: vec![Part {
                text: message.to_string(),
            }],
        });

        contents
    }

    /// Sends a chat exchange upstream and returns the model's reply text.
    pub async fn generate(&self, message: &str, history: &[ChatTurn]) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::Internal("GENAI_API_KEY is not configured".to_string())
        })?;

        let request = GenerateRequest {
            contents: Self::build_contents(message, history),
        };

        let response = self
            .http
            .post(&self.api_url)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                AppError::BackendUnavailable(format!("Failed to reach generative API: {}", e))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::BackendUnavailable(format!("Failed to read generative API response: {}", e))
        })?;

        if !status.is_success() {
            return Err(AppError::BackendRejected {
                status,
                message: backend::extract_message(&body, status),
            });
        }

        let parsed: GenerateResponse = sonic_rs::from_str(&body)
            .map_err(|e| AppError::MalformedResponse(format!("generate response: {}", e)))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| {
                AppError::MalformedResponse("generate response contained no candidates".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_roles_map_onto_upstream_roles() {
        let history = vec![
            ChatTurn {
                role: "user".to_string(),
                content: "hello".to_string(),
            },
            ChatTurn {
                role: "assistant".to_string(),
                content: "hi there".to_string(),
            },
        ];

        let contents = GenAiClient::build_contents("what is rust?", &history);

        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0].role, "user");
        assert_eq!(contents[1].role, "model");
        assert_eq!(contents[2].role, "user");
        assert_eq!(contents[2].parts[0].text, "what is rust?");
    }
}
