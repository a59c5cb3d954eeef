mod client;
mod config;
mod ui;

use anyhow::Result;
use client::ApiClient;
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Load config
    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            return Err(e);
        }
    };

    // Parse args
    let args: Vec<String> = std::env::args().collect();

    // Handle commands, default to chat if no args
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("chat");

    match command {
        "chat" => {
            let client = ApiClient::new(config.server_url.clone());
            ui::interactive_chat(client).await?;
        }
        "config" => {
            if args.len() < 3 {
                println!("Current config:");
                println!("  Server URL: {}", config.server_url);
            } else if args[2] == "set" && args.len() >= 5 && args[3] == "server" {
                config.server_url = args[4].clone();
                config.save()?;
                println!("Server URL updated to: {}", config.server_url);
            } else {
                print_usage();
            }
        }
        "help" | "--help" | "-h" => print_usage(),
        message => {
            // Treat any other argument as a message
            let client = ApiClient::new(config.server_url.clone());
            ui::single_message(client, message.to_string()).await?;
        }
    }

    Ok(())
}

fn print_usage() {
    println!("Envoy - Client for WebGPT");
    println!("\nUsage:");
    println!("  envoy chat                    Start interactive chat");
    println!("  envoy \"your message\"          Send a single message");
    println!("  envoy config                  Show current configuration");
    println!("  envoy config set server URL   Set server URL");
}
