#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! CLI for the mailtools tool surface

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use mailtools::{ImapConfig, MailClient, Message, SearchQuery};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mailtools-cli")]
#[command(about = "Search, organize, and mutate email state on one IMAP account")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Search messages in a folder
    Search {
        /// Folder to search in
        #[arg(long, default_value = "INBOX")]
        folder: String,

        /// Sender substring
        #[arg(long)]
        from: Option<String>,

        /// Recipient substring
        #[arg(long)]
        to: Option<String>,

        /// Subject substring
        #[arg(long)]
        subject: Option<String>,

        /// Body substring
        #[arg(long)]
        body: Option<String>,

        /// Messages dated on or after (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        since: Option<NaiveDate>,

        /// Messages dated before (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        before: Option<NaiveDate>,

        /// Filter by read state (true/false)
        #[arg(long)]
        seen: Option<bool>,

        /// Filter by flagged state (true/false)
        #[arg(long)]
        flagged: Option<bool>,

        /// Maximum number of results
        #[arg(long, default_value = "50")]
        limit: usize,
    },

    /// Show account statistics across the main folders
    Stats,

    /// List all folders
    Folders,

    /// Create a folder
    CreateFolder {
        /// Folder name
        name: String,
    },

    /// Delete a folder
    DeleteFolder {
        /// Folder name
        name: String,
    },

    /// Move a message to another folder
    Move {
        /// Message UID
        uid: u32,

        /// Source folder
        #[arg(long, default_value = "INBOX")]
        from: String,

        /// Destination folder
        #[arg(long)]
        to: String,
    },

    /// Mark a message as read
    MarkRead {
        uid: u32,

        #[arg(long, default_value = "INBOX")]
        folder: String,
    },

    /// Mark a message as unread
    MarkUnread {
        uid: u32,

        #[arg(long, default_value = "INBOX")]
        folder: String,
    },

    /// Permanently delete one or more messages
    Delete {
        /// Message UIDs
        #[arg(required = true)]
        uids: Vec<u32>,

        #[arg(long, default_value = "INBOX")]
        folder: String,
    },
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("Invalid date '{s}': {e}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = ImapConfig::from_env()?;
    let mut client = MailClient::new(config);

    client.connect().await?;
    let result = run(&mut client, &args).await;
    client.disconnect().await.ok();
    result
}

#[allow(clippy::too_many_lines)]
async fn run(client: &mut MailClient, args: &Args) -> anyhow::Result<()> {
    match &args.command {
        Command::Search {
            folder,
            from,
            to,
            subject,
            body,
            since,
            before,
            seen,
            flagged,
            limit,
        } => {
            let query = SearchQuery {
                folder: folder.clone(),
                from: from.clone(),
                to: to.clone(),
                subject: subject.clone(),
                body: body.clone(),
                since: *since,
                before: *before,
                seen: *seen,
                flagged: *flagged,
                limit: *limit,
            };
            let messages = client.search(&query).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&messages)?);
            } else {
                print_message_table(&messages);
            }
        }
        Command::Stats => {
            let stats = client.account_stats().await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!(
                    "Total: {}  Unread: {}  Read: {}",
                    stats.total_emails, stats.unread_emails, stats.read_emails
                );
                for folder in &stats.folders {
                    println!(
                        "  {}: {} ({} unread)",
                        folder.path, folder.total_count, folder.unread_count
                    );
                }
            }
        }
        Command::Folders => {
            let folders = client.list_folders().await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&folders)?);
            } else {
                for folder in &folders {
                    println!("{}", folder.path);
                }
            }
        }
        Command::CreateFolder { name } => {
            client.create_folder(name).await?;
            println!("Folder \"{name}\" created.");
        }
        Command::DeleteFolder { name } => {
            client.delete_folder(name).await?;
            println!("Folder \"{name}\" deleted.");
        }
        Command::Move { uid, from, to } => {
            client.move_message(*uid, from, to).await?;
            println!("Moved message {uid} from \"{from}\" to \"{to}\".");
        }
        Command::MarkRead { uid, folder } => {
            client.mark_read(*uid, folder).await?;
            println!("Marked message {uid} as read in \"{folder}\".");
        }
        Command::MarkUnread { uid, folder } => {
            client.mark_unread(*uid, folder).await?;
            println!("Marked message {uid} as unread in \"{folder}\".");
        }
        Command::Delete { uids, folder } => {
            if let [uid] = uids.as_slice() {
                client.delete_message(*uid, folder).await?;
                println!("Deleted message {uid} from \"{folder}\".");
            } else {
                client.batch_delete(uids, folder).await?;
                println!("Deleted {} messages from \"{folder}\".", uids.len());
            }
        }
    }

    Ok(())
}

fn print_message_table(messages: &[Message]) {
    if messages.is_empty() {
        println!("No messages found.");
        return;
    }

    println!("{:<8} {:<22} {:<30} {}", "UID", "Date", "From", "Subject");
    println!("{}", "-".repeat(100));

    for message in messages {
        println!(
            "{:<8} {:<22} {:<30} {}",
            message.uid,
            truncate(&message.date, 20),
            truncate(&message.from, 28),
            truncate(&message.subject, 40),
        );
    }

    println!("\n{} message(s)", messages.len());
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}
