use std::io::{self, Write};

use anyhow::{Context, Result};
use ariana_agents::{ConversationSession, LabAssistant};
use ariana_api::ApiConfig;
use ariana_core::classify;
use ariana_observability::{init_tracing, AppMetrics};
use ariana_provider::GeminiProvider;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "ariana")]
#[command(about = "Ariana Labs assistant CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show how a message would be routed, without contacting the model.
    Classify { message: String },
    /// Answer a single message.
    Ask { message: String },
    /// Interactive conversation.
    Chat,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("ariana_cli");
    let cli = Cli::parse();

    match cli.command {
        Command::Classify { message } => {
            let outcome = classify(&message);
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Command::Ask { message } => {
            let assistant = build_assistant().await?;
            let reply = assistant.handle_message(&message).await;
            println!("{}", reply.reply);
        }
        Command::Chat => run_chat(build_assistant().await?).await?,
    }

    Ok(())
}

async fn run_chat(assistant: LabAssistant) -> Result<()> {
    println!("Ariana Labs assistant. type 'exit' to quit.");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let message = line.trim();
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }

        let reply = assistant.handle_message(message).await;
        println!("\n{}\n", reply.reply);
    }

    Ok(())
}

async fn build_assistant() -> Result<LabAssistant> {
    let config = ApiConfig::from_env()?;
    let provider =
        GeminiProvider::new(config.gemini.clone()).context("failed to build Gemini client")?;
    let session = ConversationSession::start(provider, config.session_options())
        .await
        .context("failed to seed conversation session")?;

    Ok(LabAssistant::new(session, AppMetrics::shared()))
}
