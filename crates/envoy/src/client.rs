use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use webgpt_shared::Message;

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: &'a [Message],
}

#[derive(Deserialize, Debug)]
pub struct ChatResponse {
    pub content: String,
}

#[derive(Deserialize, Debug)]
struct ToolsResponse {
    tools: Vec<Value>,
}

#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Sends the whole session and returns the assistant's answer.
    pub async fn chat(&self, messages: &[Message]) -> Result<String> {
        let url = format!("{}/chat", self.base_url);

        let response = self.client
            .post(&url)
            .json(&ChatRequest { messages })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Request failed ({}): {}", status, error_message(&body)));
        }

        let response = response.json::<ChatResponse>().await?;
        Ok(response.content)
    }

    /// Names and descriptions of the tools the server exposes.
    pub async fn tools(&self) -> Result<Vec<(String, String)>> {
        let url = format!("{}/tools", self.base_url);

        let response = self.client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<ToolsResponse>()
            .await?;

        Ok(response.tools.iter().map(tool_summary).collect())
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value["error"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

fn tool_summary(tool: &Value) -> (String, String) {
    let function = &tool["function"];
    (
        function["name"].as_str().unwrap_or("?").to_string(),
        function["description"].as_str().unwrap_or_default().to_string(),
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn error_bodies_are_unwrapped() {
        assert_eq!(
            error_message(r#"{"error":"tool 'web_search' failed: timeout"}"#),
            "tool 'web_search' failed: timeout"
        );
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn tool_summaries_read_the_function_block() {
        let tool = json!({
            "type": "function",
            "function": { "name": "web_search", "description": "Search the web.", "parameters": {} }
        });

        assert_eq!(
            tool_summary(&tool),
            ("web_search".to_string(), "Search the web.".to_string())
        );
    }

    #[test]
    fn chat_requests_carry_the_history() {
        let messages = [Message::system("be brief"), Message::user("hi")];
        let value = serde_json::to_value(ChatRequest { messages: &messages }).unwrap();

        assert_eq!(
            value,
            json!({ "messages": [
                { "role": "system", "content": "be brief" },
                { "role": "user", "content": "hi" }
            ]})
        );
    }

    #[test]
    fn trailing_slash_is_dropped() {
        let client = ApiClient::new("http://localhost:8080/".to_string());
        assert_eq!(client.base_url, "http://localhost:8080");
    }
}
