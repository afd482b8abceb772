use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use smlrag_client::{
    ChatApi, ChatId, ChatSession, Config, DatasetApi, HttpChatClient, HttpDatasetClient,
    NewDataset, Retrying, UiState,
};

#[derive(Parser)]
#[command(name = "smlrag", version, about = "Chat and dataset client for the Smlrag services")]
struct Cli {
    /// Extra configuration file layered over ~/.smlrag/config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage chats and their messages
    #[command(subcommand)]
    Chats(ChatCommand),
    /// Show chat and message totals
    Stats,
    /// Delete every chat on the backend
    Clear,
    /// Run one ingestion sweep on the server and wait for it
    Scan,
    /// Browse and create datasets
    #[command(subcommand)]
    Datasets(DatasetCommand),
}

#[derive(Subcommand)]
enum ChatCommand {
    List,
    /// Create a chat under the given id
    Create {
        id: String,
        #[arg(long)]
        title: Option<String>,
    },
    /// Create a chat under a generated id
    New {
        #[arg(long)]
        title: Option<String>,
    },
    Show {
        id: String,
    },
    Messages {
        id: String,
        /// Only the most recent N messages
        #[arg(long)]
        limit: Option<u32>,
    },
    Send {
        id: String,
        content: String,
    },
    Rename {
        id: String,
        title: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
enum DatasetCommand {
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Upload one file to the catalog
    Upload {
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Load config
    let config = Config::load_with(cli.config.as_deref())?;

    // Initialize tracing; stdout is reserved for JSON output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "smlrag_client={level},smlrag={level}",
                    level = config.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let http = reqwest::Client::builder()
        .timeout(config.request_timeout())
        .build()?;
    let policy = config.retry_policy();

    let chats: Arc<dyn ChatApi> = Arc::new(Retrying::new(
        HttpChatClient::with_client(http.clone(), config.api_base_url()?)
            .with_default_title(config.default_chat_title.clone()),
        policy,
    ));
    let datasets = Retrying::new(
        HttpDatasetClient::with_client(
            http,
            config.api_base_url()?,
            config.dataset_base_url()?,
            config.dataset_api_key.clone(),
        ),
        policy,
    );

    tracing::debug!("Chat API: {}", config.api_url);
    tracing::debug!("Dataset API: {}", config.dataset_api_url);

    match cli.command {
        Command::Chats(command) => run_chat_command(chats, command).await,
        Command::Stats => print_json(&chats.get_stats().await?),
        Command::Clear => {
            chats.clear_all().await?;
            print_ok("all chats cleared")
        }
        Command::Scan => print_json(&datasets.scan_files().await?),
        Command::Datasets(command) => run_dataset_command(&datasets, command).await,
    }
}

async fn run_chat_command(chats: Arc<dyn ChatApi>, command: ChatCommand) -> anyhow::Result<()> {
    match command {
        ChatCommand::List => print_json(&chats.list_chats().await?),
        ChatCommand::Create { id, title } => {
            print_json(&chats.create_chat(&ChatId::new(id), title).await?)
        }
        ChatCommand::New { title } => {
            let session = ChatSession::new(chats, UiState::new());
            print_json(&session.start_chat(title).await?)
        }
        ChatCommand::Show { id } => print_json(&chats.get_chat(&ChatId::new(id)).await?),
        ChatCommand::Messages { id, limit } => {
            print_json(&chats.get_messages(&ChatId::new(id), limit).await?)
        }
        ChatCommand::Send { id, content } => {
            print_json(&chats.send_message(&ChatId::new(id), &content).await?)
        }
        ChatCommand::Rename { id, title } => {
            chats.update_chat_title(&ChatId::new(id), &title).await?;
            print_ok("title updated")
        }
        ChatCommand::Delete { id } => {
            chats.delete_chat(&ChatId::new(id)).await?;
            print_ok("chat deleted")
        }
    }
}

async fn run_dataset_command(datasets: &impl DatasetApi, command: DatasetCommand) -> anyhow::Result<()> {
    match command {
        DatasetCommand::List { page, limit } => {
            print_json(&datasets.list_datasets(page, limit).await?)
        }
        DatasetCommand::Create { name, description } => {
            let mut dataset = NewDataset::new(name);
            dataset.description = description;
            print_json(&datasets.create_dataset(dataset).await?)
        }
        DatasetCommand::Upload { path } => print_json(&datasets.upload_document(&path).await?),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_ok(message: &str) -> anyhow::Result<()> {
    print_json(&json!({ "status": "ok", "message": message }))
}
