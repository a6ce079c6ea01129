//! `wren` binary: runs the assistant on stdin, answers one-shot questions,
//! and exposes routing diagnostics.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use wren::agent::classifier::classify;
use wren::agent::persona::PersonaTemplate;
use wren::agent::profiles::ModelProfileRegistry;
use wren::agent::style::style_of;
use wren::agent::synthesizer::ResponseSynthesizer;
use wren::chat::commands::handle_time;
use wren::chat::ui::{format_color, render_envelope, render_help};
use wren::chat::{ChatHandler, InboundMessage, Reply};
use wren::clock::TimeContext;
use wren::config::{config_dir, resolve_config_with, Config};
use wren::credentials::{load_credentials, load_dotenv, load_env_credentials, Credentials};
use wren::memory::ConversationStore;
use wren::providers::openrouter::{OpenRouterProvider, API_KEY_ENV};
use wren::{health, logging};

#[derive(Parser)]
#[command(name = "wren", version, about = "Multi-model chat assistant")]
struct Cli {
    /// Path to config.toml (default: ~/.wren/config.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// `.env` file (mode 0600) whose entries take precedence over the environment.
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the liveness endpoint and chat on stdin until Ctrl-C.
    Start {
        /// Conversation identity for stdin messages.
        #[arg(long, default_value = "local")]
        user: String,
    },
    /// Send one message and print the reply.
    Ask {
        /// Message text.
        message: String,
        /// Treat the message as carrying an attachment.
        #[arg(long)]
        attachment: bool,
    },
    /// Show the current Dhaka time.
    Time,
    /// Show how a message would be routed, without calling the provider.
    Classify {
        /// Message text.
        message: String,
        /// Treat the message as carrying an attachment.
        #[arg(long)]
        attachment: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let dotenv_path = load_dotenv();
    let env_file = cli.env_file.as_deref().map(load_credentials).transpose()?;

    match cli.command {
        Commands::Start { user } => {
            let config = resolve(cli.config.as_deref(), env_file.as_ref())?;
            let logs_dir = config_dir()?.join("logs");
            let _guard = logging::init_production(&logs_dir)?;
            if let Some(path) = &dotenv_path {
                info!(path = %path.display(), "loaded .env file");
            }
            run_start(&config, env_file.as_ref(), user).await
        }
        Commands::Ask {
            message,
            attachment,
        } => {
            logging::init_cli();
            let config = resolve(cli.config.as_deref(), env_file.as_ref())?;
            let handler = build_handler(&config, env_file.as_ref())?;
            let inbound = InboundMessage {
                has_attachment: attachment,
                ..InboundMessage::direct("local", message)
            };
            if let Some(reply) = handler.handle(&inbound).await {
                println!("{}", render_reply(&reply));
            }
            Ok(())
        }
        Commands::Time => {
            println!("{}", handle_time(&TimeContext::dhaka()));
            Ok(())
        }
        Commands::Classify {
            message,
            attachment,
        } => {
            logging::init_cli();
            let config = resolve(cli.config.as_deref(), env_file.as_ref())?;
            let registry = build_registry(&config)?;
            let category = classify(&message, attachment);
            let profile = registry.profile_for(category);
            println!("category:    {category}");
            println!("model:       {}", profile.backend_model_id);
            println!(
                "profile:     {} ({})",
                profile.display_name, profile.description
            );
            println!("color:       {}", format_color(profile.display_color));
            println!("temperature: {}", profile.temperature);
            println!("max tokens:  {}", profile.max_output_tokens);
            println!("style:       {}", style_of(&message));
            Ok(())
        }
    }
}

/// Serve liveness probes and chat on stdin until EOF or Ctrl-C.
async fn run_start(
    config: &Config,
    env_file: Option<&Credentials>,
    user: String,
) -> anyhow::Result<()> {
    let handler = build_handler(config, env_file)?;

    let port = config.health.port;
    let health_task = tokio::spawn(async move {
        if let Err(e) = health::serve(port).await {
            warn!(error = %e, "liveness endpoint stopped");
        }
    });

    info!(user = %user, "wren ready, reading messages from stdin");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    info!("stdin closed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let inbound = InboundMessage::direct(user.clone(), line);
                if let Some(reply) = handler.handle(&inbound).await {
                    println!("{}\n", render_reply(&reply));
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("received shutdown signal");
                break;
            }
        }
    }

    health_task.abort();
    info!(
        active_users = handler.store().active_users().len(),
        "wren shut down cleanly"
    );
    Ok(())
}

/// Wire the store, provider, registry and engine from resolved config.
fn build_handler(config: &Config, env_file: Option<&Credentials>) -> anyhow::Result<ChatHandler> {
    let api_key = env_file
        .and_then(Credentials::openrouter_api_key)
        .or_else(|| load_env_credentials().openrouter_api_key());
    if api_key.is_none() {
        warn!("{API_KEY_ENV} not set; replies will fall back");
    }

    let provider = Arc::new(OpenRouterProvider::new(&config.provider, api_key));
    info!(endpoint = provider.endpoint(), "provider configured");

    let engine = ResponseSynthesizer::new(
        provider,
        Arc::new(build_registry(config)?),
        TimeContext::dhaka(),
        Duration::from_secs(config.provider.timeout_secs),
    );
    let store = ConversationStore::new(config.memory.window);

    Ok(ChatHandler::new(Arc::new(store), Arc::new(engine)))
}

/// Resolve config with `--env-file` entries taking precedence over the
/// process environment.
fn resolve(config: Option<&Path>, env_file: Option<&Credentials>) -> anyhow::Result<Config> {
    resolve_config_with(config, |key| {
        env_file
            .and_then(|creds| creds.get(key))
            .map(str::to_owned)
            .or_else(|| std::env::var(key).ok())
    })
}

fn build_registry(config: &Config) -> anyhow::Result<ModelProfileRegistry> {
    let persona = match &config.persona.path {
        Some(path) => PersonaTemplate::from_path(path)?,
        None => PersonaTemplate::builtin().context("bundled persona template is invalid")?,
    };
    Ok(ModelProfileRegistry::new(persona).with_backend_overrides(&config.models))
}

fn render_reply(reply: &Reply) -> String {
    match reply {
        Reply::Text(text) => text.clone(),
        Reply::Help(card) => render_help(card),
        Reply::Envelope(envelope) => render_envelope(envelope, Utc::now()),
    }
}
