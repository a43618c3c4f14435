// src/main.rs
// newsdesk - news and web-search summaries from an assistant run

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use newsdesk::config::{load_dotenv, log_level_from, AppConfig};
use newsdesk::llm::assistant::SessionIds;
use newsdesk::server;
use newsdesk::services::NewsAssistant;
use newsdesk::tools::{NewsApiClient, NewsProvider, SearchDepth, TavilyClient, WebSearchProvider};

#[derive(Parser)]
#[command(name = "newsdesk")]
#[command(about = "Summarize news and web search results through an assistant run")]
#[command(version)]
struct Cli {
    /// Override the delay between run polls (milliseconds)
    #[arg(long, global = true)]
    poll_interval_ms: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the topic form
    Serve {
        #[arg(long, env = "NEWSDESK_HOST")]
        host: Option<String>,

        #[arg(short, long, env = "NEWSDESK_PORT")]
        port: Option<u16>,
    },

    /// Summarize one topic and print the result
    Ask {
        /// Topic to summarize, e.g. bitcoin
        topic: String,
    },

    /// Call the news lookup directly
    News { topic: String },

    /// Call the web search lookup directly
    Search {
        query: String,

        #[arg(long, default_value = "advanced")]
        depth: SearchDepth,
    },

    /// Inspect or clear the stored assistant/thread identifiers
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Print the stored identifiers
    Show,
    /// Delete the session file so the next run creates a new assistant and thread
    Reset,
}

/// Install the subscriber before configuration is read so its warnings are kept.
fn init_tracing(debug: bool) -> Result<()> {
    let level = if debug {
        Level::DEBUG
    } else {
        log_level_from(&|key: &str| std::env::var(key).ok())
            .parse()
            .unwrap_or(Level::INFO)
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    load_dotenv();
    init_tracing(cli.debug)?;

    let mut config = AppConfig::from_env();
    if let Some(ms) = cli.poll_interval_ms {
        config.poll_interval_ms = ms;
    }

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            let assistant = NewsAssistant::from_config(&config).await?;
            server::serve(&config.bind_address(), assistant).await?;
        }
        Commands::Ask { topic } => {
            let mut assistant = NewsAssistant::from_config(&config).await?;
            let token = assistant.dispatch().cancellation_token();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_err() {
                    return;
                }
                warn!("Interrupted, cancelling run (press Ctrl-C again to exit now)");
                token.cancel();
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupted again, exiting");
                    std::process::exit(130);
                }
            });

            let briefing = assistant.summarize(&topic).await?;
            println!("{}", briefing.summary_text());
            println!();
            println!("Run Steps: ");
            print!("{}", briefing.render_steps());
        }
        Commands::News { topic } => {
            let articles = NewsApiClient::from_config(&config).get_news(&topic).await?;
            if articles.is_empty() {
                println!("No articles found");
            }
            for article in articles {
                println!("{}", article);
            }
        }
        Commands::Search { query, depth } => {
            let output = TavilyClient::from_config(&config).search(&query, depth).await?;
            println!("{}", output);
        }
        Commands::Session { action } => match action {
            SessionAction::Show => {
                let ids = SessionIds::load(&config.session_file)?;
                println!("session file: {}", config.session_file.display());
                println!("assistant_id: {}", ids.assistant_id.as_deref().unwrap_or("-"));
                println!("thread_id:    {}", ids.thread_id.as_deref().unwrap_or("-"));
            }
            SessionAction::Reset => match std::fs::remove_file(&config.session_file) {
                Ok(()) => info!(path = %config.session_file.display(), "Session identifiers cleared"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    info!("No session file to clear")
                }
                Err(e) => return Err(e.into()),
            },
        },
    }

    Ok(())
}
