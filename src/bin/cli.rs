//! CLI binary for parley.

use clap::{Parser, Subcommand};
use parley::tts::GoogleTts;
use parley::web::WebSearchFallback;
use parley::{Assistant, AssistantConfig, Corpus, Responder, TerminalSurface};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Parley: a text chat assistant backed by a dataset, a small knowledge
/// base, and web search.
#[derive(Parser)]
#[command(name = "parley", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Question/answer dataset (JSON), overriding the configured path.
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Do not synthesize speech for replies.
    #[arg(long)]
    no_speech: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Chat interactively on stdin (`/history` lists turns, `/quit` exits).
    Chat,

    /// Answer a single message and exit.
    Ask {
        /// The message to answer.
        message: String,
    },

    /// Write the default configuration file.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("parley=info,parley_search=warn")),
        )
        .init();

    let cli = Cli::parse();

    if let Some(Command::InitConfig { force }) = cli.command {
        return init_config(cli.config, force);
    }

    let mut config = load_config(cli.config.as_ref())?;
    if let Some(path) = cli.dataset {
        config.dataset.path = path;
    }
    if cli.no_speech {
        config.tts.enabled = false;
    }

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => run_chat(&config).await,
        Command::Ask { message } => run_ask(&config, &message).await,
        Command::InitConfig { .. } => Ok(()),
    }
}

fn load_config(explicit: Option<&PathBuf>) -> anyhow::Result<AssistantConfig> {
    if let Some(path) = explicit {
        return Ok(AssistantConfig::from_file(path)?);
    }
    let path = AssistantConfig::default_config_path();
    if path.exists() {
        info!(path = %path.display(), "loading config");
        Ok(AssistantConfig::from_file(&path)?)
    } else {
        Ok(AssistantConfig::default())
    }
}

fn init_config(path: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(AssistantConfig::default_config_path);
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    AssistantConfig::default().save_to_file(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn build_responder(config: &AssistantConfig) -> Responder {
    let corpus = Corpus::shared(&config.dataset.path, config.matcher.threshold);
    info!(
        pairs = corpus.dataset().len(),
        matcher = corpus.has_matcher(),
        "corpus ready"
    );

    let responder = Responder::new(corpus);
    if !config.search.enabled {
        return responder;
    }
    match WebSearchFallback::from_config(&config.search) {
        Ok(web) => responder.with_web_search(web),
        Err(error) => {
            warn!(%error, "web search disabled");
            responder
        }
    }
}

fn build_assistant<S: parley::ConversationSurface>(
    config: &AssistantConfig,
    surface: S,
) -> Assistant<S> {
    let assistant = Assistant::new(build_responder(config), surface)
        .with_history_limit(config.session.max_turns);
    if !config.tts.enabled {
        return assistant;
    }
    match GoogleTts::new(&config.tts) {
        Ok(tts) => assistant.with_speech(Box::new(tts)),
        Err(error) => {
            warn!(%error, "speech disabled");
            assistant
        }
    }
}

async fn run_chat(config: &AssistantConfig) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let echo = !stdin.is_terminal();
    let surface = TerminalSurface::new(stdin.lock(), std::io::stdout(), config.tts.audio_dir())
        .with_echo_user(echo);
    let mut assistant = build_assistant(config, surface);

    println!("Ask me anything. Type /history to review, /quit to leave.\n");
    assistant.run().await?;
    Ok(())
}

async fn run_ask(config: &AssistantConfig, message: &str) -> anyhow::Result<()> {
    let surface = TerminalSurface::new(std::io::empty(), std::io::stdout(), config.tts.audio_dir())
        .with_prompt("");
    let mut assistant = build_assistant(config, surface);
    let reply = assistant.handle_turn(message).await?;
    info!(source = ?reply.source, "answered");
    Ok(())
}
