use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{CompletionChoice, CompletionRequest, CompletionService};
use crate::config::Settings;
use crate::error::CompletionError;

/// Client for any OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: CompletionChoice,
}

impl OpenAiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .user_agent("WebGPT/0.1")
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    pub fn from_settings(settings: &Settings, api_key: impl Into<String>) -> Result<Self, CompletionError> {
        Self::new(settings.base_url.clone(), api_key, settings.request_timeout())
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionChoice, CompletionError> {
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.as_ref().map_or(0, Vec::len),
            "sending completion request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status { status, body });
        }

        let body = response.json::<ChatCompletionResponse>().await?;
        first_choice(body)
    }
}

fn first_choice(body: ChatCompletionResponse) -> Result<CompletionChoice, CompletionError> {
    body.choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or(CompletionError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use webgpt_shared::{Message, ToolCall};

    use super::*;

    fn parse(value: serde_json::Value) -> Result<CompletionChoice, CompletionError> {
        first_choice(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn tool_call_choices_keep_raw_arguments() {
        let choice = parse(json!({
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "finish_reason": "tool_calls",
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {
                            "name": "web_search_news",
                            "arguments": "{\"query\":\"fusion energy\",\"max_results\":5}"
                        }
                    }]
                }
            }]
        }))
        .unwrap();

        assert_eq!(choice.content, None);
        assert_eq!(
            choice.requested_tools(),
            [ToolCall::new(
                "call_abc",
                "web_search_news",
                "{\"query\":\"fusion energy\",\"max_results\":5}"
            )]
        );
    }

    #[test]
    fn text_choices_have_no_tool_calls() {
        let choice = parse(json!({
            "choices": [{ "message": { "role": "assistant", "content": "Hello!" } }]
        }))
        .unwrap();

        assert_eq!(choice, CompletionChoice::text("Hello!"));
        assert!(choice.requested_tools().is_empty());
    }

    #[test]
    fn empty_choice_lists_are_errors() {
        assert!(matches!(parse(json!({ "choices": [] })), Err(CompletionError::EmptyResponse)));
    }

    #[test]
    fn requests_omit_tools_when_none_are_attached() {
        let request = CompletionRequest {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.0,
            messages: vec![Message::user("hi")],
            tools: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "gpt-4o-mini",
                "temperature": 0.0,
                "messages": [{ "role": "user", "content": "hi" }]
            })
        );
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let client = OpenAiClient::new("http://localhost:11434/v1/", "key", Duration::from_secs(5)).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:11434/v1/chat/completions");
    }
}
