use serde::{Deserialize, Serialize};
use webgpt_shared::{Message, Tool};

// Chat endpoint
#[derive(Deserialize, Serialize)]
pub struct ChatRequest {
    /// Full history of the session, oldest first, ending with the new user message.
    pub messages: Vec<Message>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ChatResponse {
    pub content: String,
}

// Tool catalogue
#[derive(Serialize)]
pub struct ListToolsResponse {
    pub tools: Vec<Tool>,
}
