//! SearchLink CLI - Command-line interface for a Meilisearch-compatible engine

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use searchlink_sdk::{
    cancel_channel, ClientConfig, DocumentsQuery, ListQuery, SearchClient, SearchQuery,
    TaskDescriptor, TaskRecord, TaskStatus, TasksQuery, WaitOptions,
};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tabled::{Table, Tabled};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str =
    "searchlink_core=warn,searchlink_sdk=warn,searchlink_infra_http=warn,searchlink=info";

#[derive(Parser)]
#[command(name = "searchlink")]
#[command(about = "SearchLink CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Engine URL
    #[arg(long, env = "SEARCHLINK_URL", global = true)]
    url: Option<String>,

    /// API key (sent as a Bearer token)
    #[arg(long, env = "SEARCHLINK_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Seconds to wait for a task when --wait is used
    #[arg(long, global = true)]
    wait_timeout: Option<f64>,

    /// Print raw JSON instead of tables
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the engine is up
    Health,

    /// Show engine version
    Version,

    /// Manage indexes
    Indexes {
        #[command(subcommand)]
        command: IndexCommands,
    },

    /// Add or fetch documents
    Documents {
        #[command(subcommand)]
        command: DocumentCommands,
    },

    /// Search an index
    Search {
        /// Index uid
        index: String,

        /// Query string
        query: String,

        /// Maximum number of hits
        #[arg(short, long, default_value = "20")]
        limit: u64,
    },

    /// Inspect and wait for tasks
    Tasks {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Manage API keys
    Keys {
        #[command(subcommand)]
        command: KeyCommands,
    },
}

#[derive(Subcommand)]
enum IndexCommands {
    /// List indexes
    List {
        #[arg(short, long, default_value = "20")]
        limit: u64,
    },

    /// Create an index
    Create {
        uid: String,

        #[arg(short, long)]
        primary_key: Option<String>,

        /// Wait for the engine to process the creation
        #[arg(short, long)]
        wait: bool,
    },

    /// Delete an index
    Delete {
        uid: String,

        #[arg(short, long)]
        wait: bool,
    },
}

#[derive(Subcommand)]
enum DocumentCommands {
    /// Add documents from a JSON array file
    Add {
        index: String,

        /// Path to a JSON file holding an array of documents
        file: PathBuf,

        #[arg(short, long)]
        primary_key: Option<String>,

        #[arg(short, long)]
        wait: bool,
    },

    /// Fetch one document
    Get { index: String, id: String },

    /// List documents
    List {
        index: String,

        #[arg(short, long, default_value = "20")]
        limit: u64,
    },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// Show one task
    Get { id: u64 },

    /// List tasks
    List {
        /// Filter by status (repeatable)
        #[arg(short, long, value_parser = parse_status)]
        status: Vec<TaskStatus>,

        /// Filter by index uid (repeatable)
        #[arg(short, long)]
        index: Vec<String>,

        #[arg(short, long, default_value = "20")]
        limit: u32,
    },

    /// Wait until a task is done (Ctrl-C stops waiting)
    Wait {
        id: u64,

        /// Poll interval in milliseconds
        #[arg(long, default_value = "500")]
        interval_ms: u64,
    },

    /// Cancel tasks by status
    Cancel {
        #[arg(short, long, value_parser = parse_status, required = true)]
        status: Vec<TaskStatus>,
    },
}

#[derive(Subcommand)]
enum KeyCommands {
    /// List API keys
    List,
}

#[derive(Tabled)]
struct TaskRow {
    uid: u64,
    index: String,
    status: String,
    kind: String,
    enqueued_at: String,
    error: String,
}

impl From<&TaskRecord> for TaskRow {
    fn from(record: &TaskRecord) -> Self {
        Self {
            uid: record.uid,
            index: record.index_uid.clone().unwrap_or_default(),
            status: record.status.to_string(),
            kind: record.kind.to_string(),
            enqueued_at: record.enqueued_at.to_rfc3339(),
            error: record
                .error
                .as_ref()
                .map(|e| e.code.clone())
                .unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct IndexRow {
    uid: String,
    primary_key: String,
    updated_at: String,
}

#[derive(Tabled)]
struct KeyRow {
    name: String,
    uid: String,
    actions: String,
    indexes: String,
    expires_at: String,
}

fn parse_status(raw: &str) -> std::result::Result<TaskStatus, String> {
    serde_json::from_value(serde_json::Value::String(raw.to_lowercase()))
        .map_err(|_| format!("unknown task status {:?}", raw))
}

fn init_logging() -> Result<()> {
    let log_format =
        std::env::var("SEARCHLINK_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
        .context("Failed to create env filter")?;

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_tasks(records: &[TaskRecord]) {
    let rows: Vec<TaskRow> = records.iter().map(TaskRow::from).collect();
    println!("{}", Table::new(rows));
}

fn colored_status(status: TaskStatus) -> colored::ColoredString {
    match status {
        TaskStatus::Succeeded => status.as_str().green(),
        TaskStatus::Failed => status.as_str().red(),
        TaskStatus::Canceled => status.as_str().yellow(),
        _ => status.as_str().cyan(),
    }
}

/// Print a task outcome; a failed remote task is a CLI failure
fn report_task(record: &TaskRecord, json: bool) -> Result<()> {
    if json {
        print_json(record)?;
    } else {
        println!(
            "Task {} ({}) {}",
            record.uid,
            record.kind,
            colored_status(record.status).bold()
        );
        if let Some(duration) = &record.duration {
            println!("  {} {}", "Duration:".bold(), duration);
        }
        if let Some(error) = &record.error {
            println!("  {} {} ({})", "Error:".bold(), error.message, error.code);
        }
    }

    if record.is_failure() {
        anyhow::bail!("task {} failed", record.uid);
    }
    Ok(())
}

/// Print the accepted task, then optionally wait for it
async fn handle_task(
    client: &SearchClient,
    task: TaskDescriptor,
    wait: bool,
    json: bool,
) -> Result<()> {
    if !wait {
        if json {
            return print_json(&task);
        }
        println!(
            "{} task {} ({})",
            "✓ Enqueued".green().bold(),
            task.task_uid(),
            task.kind()
        );
        return Ok(());
    }

    info!(task_id = task.task_uid(), "Waiting for task");
    let record = task
        .wait(client, None)
        .await
        .with_context(|| format!("Failed waiting for task {}", task.task_uid()))?;
    report_task(&record, json)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env().context("Invalid SEARCHLINK_* environment")?;
    if let Some(url) = cli.url {
        config.host = url;
    }
    if cli.api_key.is_some() {
        config.api_key = cli.api_key;
    }
    if let Some(secs) = cli.wait_timeout {
        config.wait = WaitOptions::from_secs_f64(secs, config.wait.interval.as_secs_f64())
            .context("Invalid --wait-timeout")?;
    }
    let host = config.host.clone();
    let wait_defaults = config.wait;
    let client = SearchClient::connect(config).context("Failed to create client")?;
    let json = cli.json;

    match cli.command {
        Commands::Health => match client.health().await {
            Ok(health) => {
                println!("  {} {}", "URL:".bold(), host);
                println!("  {} {}", "Status:".bold(), health.status.green());
            }
            Err(e) => {
                println!("  {} {}", "URL:".bold(), host);
                println!("  {} {}", "Status:".bold(), "UNREACHABLE".red());
                anyhow::bail!(e);
            }
        },

        Commands::Version => {
            let version = client.version().await.context("Failed to fetch version")?;
            if json {
                print_json(&version)?;
            } else {
                println!("{} {}", "Engine version:".bold(), version.pkg_version);
                println!("{} {}", "Commit:".bold(), version.commit_sha);
            }
        }

        Commands::Indexes { command } => match command {
            IndexCommands::List { limit } => {
                let page = client
                    .list_indexes(&ListQuery::new().with_limit(limit))
                    .await
                    .context("Failed to list indexes")?;
                if json {
                    print_json(&page)?;
                } else {
                    let rows: Vec<IndexRow> = page
                        .results
                        .iter()
                        .map(|index| IndexRow {
                            uid: index.uid.clone(),
                            primary_key: index.primary_key.clone().unwrap_or_default(),
                            updated_at: index.updated_at.to_rfc3339(),
                        })
                        .collect();
                    println!("{}", Table::new(rows));
                    println!("{} of {} indexes", page.results.len(), page.total);
                }
            }
            IndexCommands::Create {
                uid,
                primary_key,
                wait,
            } => {
                let task = client
                    .create_index(&uid, primary_key.as_deref())
                    .await
                    .context("Failed to create index")?;
                handle_task(&client, task, wait, json).await?;
            }
            IndexCommands::Delete { uid, wait } => {
                let task = client
                    .delete_index(&uid)
                    .await
                    .context("Failed to delete index")?;
                handle_task(&client, task, wait, json).await?;
            }
        },

        Commands::Documents { command } => match command {
            DocumentCommands::Add {
                index,
                file,
                primary_key,
                wait,
            } => {
                let raw = std::fs::read_to_string(&file)
                    .with_context(|| format!("Failed to read {}", file.display()))?;
                let documents: Vec<serde_json::Value> =
                    serde_json::from_str(&raw).context("Documents file must hold a JSON array")?;
                let task = client
                    .index(&index)
                    .add_documents(&documents, primary_key.as_deref())
                    .await
                    .context("Failed to add documents")?;
                handle_task(&client, task, wait, json).await?;
            }
            DocumentCommands::Get { index, id } => {
                let document: serde_json::Value = client
                    .index(&index)
                    .get_document(&id)
                    .await
                    .with_context(|| format!("Failed to fetch document {}", id))?;
                print_json(&document)?;
            }
            DocumentCommands::List { index, limit } => {
                let page = client
                    .index(&index)
                    .get_documents::<serde_json::Value>(&DocumentsQuery::new().with_limit(limit))
                    .await
                    .context("Failed to list documents")?;
                print_json(&page)?;
            }
        },

        Commands::Search {
            index,
            query,
            limit,
        } => {
            let results = client
                .index(&index)
                .search::<serde_json::Value>(&SearchQuery::new(query).with_limit(limit))
                .await
                .context("Search failed")?;
            if json {
                print_json(&results.hits)?;
            } else {
                for hit in &results.hits {
                    println!("{}", hit);
                }
                println!(
                    "{} hits in {} ms",
                    results
                        .estimated_total_hits
                        .unwrap_or(results.hits.len() as u64),
                    results.processing_time_ms
                );
            }
        }

        Commands::Tasks { command } => match command {
            TaskCommands::Get { id } => {
                let record = client
                    .get_task(id)
                    .await
                    .with_context(|| format!("Failed to fetch task {}", id))?;
                if json {
                    print_json(&record)?;
                } else {
                    print_tasks(std::slice::from_ref(&record));
                }
            }
            TaskCommands::List {
                status,
                index,
                limit,
            } => {
                let query = TasksQuery::new()
                    .with_statuses(status)
                    .with_index_uids(index)
                    .with_limit(limit);
                let page = client
                    .get_tasks(&query)
                    .await
                    .context("Failed to list tasks")?;
                if json {
                    print_json(&page)?;
                } else {
                    print_tasks(&page.results);
                }
            }
            TaskCommands::Wait { id, interval_ms } => {
                let options = wait_defaults.with_interval(Duration::from_millis(interval_ms));
                let (cancel, token) = cancel_channel();
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        cancel.cancel();
                    }
                });

                let record = client
                    .wait_for_task_with_cancel(id, Some(options), token)
                    .await
                    .with_context(|| format!("Failed waiting for task {}", id))?;
                report_task(&record, json)?;
            }
            TaskCommands::Cancel { status } => {
                let task = client
                    .cancel_tasks(&TasksQuery::new().with_statuses(status))
                    .await
                    .context("Failed to cancel tasks")?;
                handle_task(&client, task, false, json).await?;
            }
        },

        Commands::Keys { command } => match command {
            KeyCommands::List => {
                let page = client
                    .get_keys(&ListQuery::new())
                    .await
                    .context("Failed to list keys")?;
                if json {
                    print_json(&page)?;
                } else {
                    let rows: Vec<KeyRow> = page
                        .results
                        .iter()
                        .map(|key| KeyRow {
                            name: key.name.clone().unwrap_or_default(),
                            uid: key.uid.to_string(),
                            actions: key.actions.join(","),
                            indexes: key.indexes.join(","),
                            expires_at: key
                                .expires_at
                                .map(|t| t.to_rfc3339())
                                .unwrap_or_else(|| "never".to_string()),
                        })
                        .collect();
                    println!("{}", Table::new(rows));
                }
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("enqueued"), Ok(TaskStatus::Enqueued));
        assert_eq!(parse_status("FAILED"), Ok(TaskStatus::Failed));
        assert!(parse_status("paused").is_err());
    }

    #[test]
    fn test_parse_task_list_filters() {
        let cli = Cli::try_parse_from([
            "searchlink",
            "tasks",
            "list",
            "--status",
            "enqueued",
            "--status",
            "processing",
            "--index",
            "movies",
        ])
        .unwrap();

        match cli.command {
            Commands::Tasks {
                command: TaskCommands::List { status, index, .. },
            } => {
                assert_eq!(status, vec![TaskStatus::Enqueued, TaskStatus::Processing]);
                assert_eq!(index, vec!["movies".to_string()]);
            }
            _ => panic!("expected tasks list"),
        }
    }

    #[test]
    fn test_connection_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "searchlink",
            "tasks",
            "wait",
            "5",
            "--url",
            "http://search.internal:7700",
            "--api-key",
            "masterKey",
        ])
        .unwrap();

        assert_eq!(cli.url.as_deref(), Some("http://search.internal:7700"));
        assert_eq!(cli.api_key.as_deref(), Some("masterKey"));
        assert!(matches!(
            cli.command,
            Commands::Tasks {
                command: TaskCommands::Wait { id: 5, .. }
            }
        ));
    }
}
