use crate::client::ApiClient;
use anyhow::Result;
use std::io::{self, Write};
use webgpt_shared::{Message, Role};

/// Conversation history kept by the client and resent in full every turn.
#[derive(Default, Debug)]
pub struct Session {
    messages: Vec<Message>,
}

impl Session {
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn push_user(&mut self, content: &str) {
        self.messages.push(Message::user(content));
    }

    pub fn record_answer(&mut self, content: String) {
        self.messages.push(Message::assistant(content));
    }

    /// Drops the unanswered user message so a failed turn can be retried.
    pub fn rollback(&mut self) {
        if self.messages.last().is_some_and(|message| message.role == Role::User) {
            self.messages.pop();
        }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

pub async fn single_message(client: ApiClient, message: String) -> Result<()> {
    let mut session = Session::default();
    session.push_user(&message);

    let answer = client.chat(session.messages()).await?;
    println!("{}", answer);
    Ok(())
}

pub async fn interactive_chat(client: ApiClient) -> Result<()> {
    println!("Envoy chat started. Type 'quit' to exit, '/tools' to list tools, '/clear' to reset.\n");

    let mut session = Session::default();

    loop {
        print!("You: ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
            println!("Goodbye!");
            break;
        }

        if input.is_empty() {
            continue;
        }

        match input {
            "/tools" => {
                print_tools(&client).await;
                continue;
            }
            "/clear" => {
                session.clear();
                println!("Conversation cleared.\n");
                continue;
            }
            _ => {}
        }

        session.push_user(input);
        println!(); // Blank line before response

        match client.chat(session.messages()).await {
            Ok(answer) => {
                println!("{}\n", answer);
                session.record_answer(answer);
            }
            Err(e) => {
                session.rollback();
                eprintln!("Error: {}\n", e);
            }
        }
    }

    Ok(())
}

async fn print_tools(client: &ApiClient) {
    match client.tools().await {
        Ok(tools) => {
            for (name, description) in tools {
                println!("🔧 {}: {}", name, description.lines().next().unwrap_or(""));
            }
            println!();
        }
        Err(e) => eprintln!("Error: {}\n", e),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    use super::*;

    #[test]
    fn answers_follow_their_questions() {
        let mut session = Session::default();
        session.push_user("who won?");
        session.record_answer("Nobody yet.".to_string());

        let roles: Vec<Role> = session.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, [Role::User, Role::Assistant]);
    }

    #[test]
    fn rollback_removes_only_the_unanswered_question() {
        let mut session = Session::default();
        session.push_user("first");
        session.record_answer("one".to_string());
        session.push_user("second");

        session.rollback();
        assert_eq!(session.messages().len(), 2);

        // Nothing pending, nothing dropped
        session.rollback();
        assert_eq!(session.messages().len(), 2);
    }

    #[tokio::test]
    async fn failed_single_message_is_an_error() {
        let app = Router::new().route(
            "/chat",
            post(|| async {
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({ "error": "model requested unknown tool 'launch_rockets'" })),
                )
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = ApiClient::new(format!("http://{}", addr));
        let err = single_message(client, "go".to_string()).await.unwrap_err();

        assert!(err.to_string().contains("launch_rockets"));
    }

    #[test]
    fn clear_empties_the_history() {
        let mut session = Session::default();
        session.push_user("hello");
        session.clear();
        assert!(session.messages().is_empty());
    }
}
