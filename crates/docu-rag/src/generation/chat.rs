//! Streaming chat completion client for OpenAI-compatible APIs

use std::time::Duration;

use futures_util::{Stream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ChatConfig;
use crate::error::{Error, Result};
use crate::types::ChatMessage;

/// Chat completion client.
///
/// Speaks the `/v1/chat/completions` wire format with `stream: true`,
/// so any compatible server works when `base_url` points elsewhere.
/// Requests are sent once; a failure ends the response stream.
pub struct ChatClient {
    /// HTTP client
    client: Client,
    /// Base URL without a trailing slash
    base_url: String,
    /// Model name sent with every request
    model: String,
    /// Sampling temperature
    temperature: f32,
    /// Bearer token
    api_key: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    temperature: f32,
}

#[derive(Deserialize)]
struct StreamChunk {
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Deserialize)]
struct StreamDelta {
    content: Option<String>,
}

impl ChatClient {
    /// Create a new client from configuration.
    ///
    /// Fails when no API key is configured and `OPENAI_API_KEY` is unset.
    pub fn new(config: &ChatConfig) -> Result<Self> {
        let api_key = config.resolve_api_key()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::chat(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            api_key,
        })
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    /// Stream the assistant's answer as text fragments.
    ///
    /// Fragments may be empty when a server-sent event carries no
    /// content delta (role announcements, finish markers); callers
    /// that forward text should skip those. The stream owns its
    /// connection, so it outlives the client borrow and can move into
    /// a spawned task.
    pub async fn stream_answer(
        &self,
        messages: &[ChatMessage],
    ) -> Result<impl Stream<Item = Result<String>> + 'static> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            stream: true,
            temperature: self.temperature,
        };

        tracing::info!(model = %self.model, messages = messages.len(), "Streaming chat completion");

        let response = self
            .client
            .post(self.chat_completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::chat(format!("Chat request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::chat(format!(
                "Chat completion failed: HTTP {} - {}",
                status, body
            )));
        }

        let stream = response.bytes_stream().map(|chunk| {
            let bytes = chunk.map_err(|e| Error::chat(format!("Stream error: {}", e)))?;
            let text = String::from_utf8_lossy(&bytes);
            Ok(collect_deltas(&text))
        });

        Ok(stream)
    }
}

/// Pull the text deltas out of one network chunk of SSE data.
///
/// Lines that are not complete `data: {json}` events (keep-alives, the
/// `[DONE]` marker, events torn across network chunks) are skipped.
fn collect_deltas(text: &str) -> String {
    let mut output = String::new();

    for line in text.lines() {
        if let Some(data) = line.strip_prefix("data: ") {
            if data.trim() == "[DONE]" {
                continue;
            }

            if let Ok(chunk) = serde_json::from_str::<StreamChunk>(data) {
                for choice in chunk.choices {
                    if let Some(content) = choice.delta.content {
                        output.push_str(&content);
                    }
                }
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_deltas_concatenates_events() {
        let sse = "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\
                   data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n";

        assert_eq!(collect_deltas(sse), "Hello");
    }

    #[test]
    fn test_collect_deltas_skips_done_marker() {
        let sse = "data: {\"choices\":[{\"delta\":{\"content\":\"end\"}}]}\n\
                   data: [DONE]\n";

        assert_eq!(collect_deltas(sse), "end");
    }

    #[test]
    fn test_collect_deltas_ignores_empty_delta() {
        // First event of a stream announces the role without content.
        let sse = "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n";

        assert_eq!(collect_deltas(sse), "");
    }

    #[test]
    fn test_collect_deltas_ignores_malformed_lines() {
        let sse = ": keep-alive\n\
                   data: {not json\n\
                   data: {\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}\n";

        assert_eq!(collect_deltas(sse), "ok");
    }

    #[test]
    fn test_request_serialization() {
        let messages = vec![
            ChatMessage::system("instructions"),
            ChatMessage::user("question"),
        ];
        let request = ChatCompletionRequest {
            model: "gpt-3.5-turbo",
            messages: &messages,
            stream: true,
            temperature: 0.3,
        };

        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "gpt-3.5-turbo");
        assert_eq!(value["stream"], true);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "question");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = ChatConfig {
            base_url: "https://api.openai.com/".to_string(),
            api_key: Some("test-key".to_string()),
            ..ChatConfig::default()
        };
        let client = ChatClient::new(&config).unwrap();

        assert_eq!(
            client.chat_completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }
}
