//! Tool surface: declared shapes, argument validation, dispatch
//!
//! This is the thin adapter between a caller speaking "invoke tool X
//! with these JSON arguments" and the typed operations on
//! [`MailClient`]. Arguments are validated into typed structs once,
//! at this boundary, before any mailbox call. Results are rendered as
//! JSON for listing tools and short acknowledgment text for
//! mutations. On any failure the session is forcibly disconnected so
//! the next invocation starts from a clean state.

use crate::client::MailClient;
use crate::error::{Error, Result};
use crate::search::SearchQuery;
use crate::stats::AccountStats;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

/// One entry in the advertised tool table.
pub struct ToolDef {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

/// The full advertised tool table, with JSON Schema argument shapes.
#[must_use]
pub fn tool_definitions() -> Vec<ToolDef> {
    vec![
        ToolDef {
            name: "search_emails",
            description: "Search messages by sender, recipient, subject, body, date, and flag criteria",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "folder": { "type": "string", "default": "INBOX" },
                    "from": { "type": "string" },
                    "to": { "type": "string" },
                    "subject": { "type": "string" },
                    "body": { "type": "string" },
                    "since": { "type": "string", "format": "date" },
                    "before": { "type": "string", "format": "date" },
                    "seen": { "type": "boolean" },
                    "flagged": { "type": "boolean" },
                    "limit": { "type": "number", "default": 50 },
                },
            }),
        },
        ToolDef {
            name: "get_email_stats",
            description: "Summarize the account: message counts across the main folders",
            input_schema: json!({ "type": "object", "properties": {} }),
        },
        ToolDef {
            name: "get_folders",
            description: "List all folders in the account",
            input_schema: json!({ "type": "object", "properties": {} }),
        },
        ToolDef {
            name: "create_folder",
            description: "Create a new folder",
            input_schema: json!({
                "type": "object",
                "properties": { "folderName": { "type": "string" } },
                "required": ["folderName"],
            }),
        },
        ToolDef {
            name: "delete_folder",
            description: "Delete a folder",
            input_schema: json!({
                "type": "object",
                "properties": { "folderName": { "type": "string" } },
                "required": ["folderName"],
            }),
        },
        ToolDef {
            name: "move_email",
            description: "Move a message between folders",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "uid": { "type": "number" },
                    "fromFolder": { "type": "string" },
                    "toFolder": { "type": "string" },
                },
                "required": ["uid", "fromFolder", "toFolder"],
            }),
        },
        ToolDef {
            name: "mark_as_read",
            description: "Mark a message as read",
            input_schema: uid_folder_schema(),
        },
        ToolDef {
            name: "mark_as_unread",
            description: "Mark a message as unread",
            input_schema: uid_folder_schema(),
        },
        ToolDef {
            name: "delete_email",
            description: "Permanently delete a message",
            input_schema: uid_folder_schema(),
        },
        ToolDef {
            name: "batch_delete_emails",
            description: "Permanently delete a batch of messages with a single expunge",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "uids": { "type": "array", "items": { "type": "number" } },
                    "folder": { "type": "string", "default": "INBOX" },
                },
                "required": ["uids"],
            }),
        },
    ]
}

fn uid_folder_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "uid": { "type": "number" },
            "folder": { "type": "string", "default": "INBOX" },
        },
        "required": ["uid"],
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct FolderNameArgs {
    folder_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct MoveEmailArgs {
    uid: u32,
    from_folder: String,
    to_folder: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct UidArgs {
    uid: u32,
    #[serde(default = "default_folder")]
    folder: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct BatchDeleteArgs {
    uids: Vec<u32>,
    #[serde(default = "default_folder")]
    folder: String,
}

fn default_folder() -> String {
    "INBOX".to_string()
}

/// Invoke one named tool with JSON arguments.
///
/// Validation happens before the session is touched, so a shape
/// failure never issues a mailbox command. Any error after that
/// forces a disconnect before it is returned.
///
/// # Errors
///
/// Returns [`Error::Validation`] for unknown tool names or argument
/// shape failures, and the underlying operation error otherwise.
pub async fn dispatch(client: &mut MailClient, name: &str, args: Value) -> Result<String> {
    debug!("Tool invocation: {}", name);
    match run(client, name, args).await {
        Ok(text) => Ok(text),
        Err(e) => {
            // Leave no half-open session behind for the next call.
            if let Err(disconnect_err) = client.disconnect().await {
                warn!("Disconnect after failed {}: {}", name, disconnect_err);
            }
            Err(e)
        }
    }
}

async fn run(client: &mut MailClient, name: &str, args: Value) -> Result<String> {
    match name {
        "search_emails" => {
            let query: SearchQuery = parse_args(args)?;
            client.connect().await?;
            let messages = client.search(&query).await?;
            render_json(&messages)
        }
        "get_email_stats" => {
            client.connect().await?;
            let stats = client.account_stats().await?;
            Ok(render_stats_summary(&stats))
        }
        "get_folders" => {
            client.connect().await?;
            let folders = client.list_folders().await?;
            render_json(&folders)
        }
        "create_folder" => {
            let args: FolderNameArgs = parse_args(args)?;
            client.connect().await?;
            client.create_folder(&args.folder_name).await?;
            Ok(format!("Folder \"{}\" created.", args.folder_name))
        }
        "delete_folder" => {
            let args: FolderNameArgs = parse_args(args)?;
            client.connect().await?;
            client.delete_folder(&args.folder_name).await?;
            Ok(format!("Folder \"{}\" deleted.", args.folder_name))
        }
        "move_email" => {
            let args: MoveEmailArgs = parse_args(args)?;
            client.connect().await?;
            client
                .move_message(args.uid, &args.from_folder, &args.to_folder)
                .await?;
            Ok(format!(
                "Moved message {} from \"{}\" to \"{}\".",
                args.uid, args.from_folder, args.to_folder
            ))
        }
        "mark_as_read" => {
            let args: UidArgs = parse_args(args)?;
            client.connect().await?;
            client.mark_read(args.uid, &args.folder).await?;
            Ok(format!(
                "Marked message {} as read in \"{}\".",
                args.uid, args.folder
            ))
        }
        "mark_as_unread" => {
            let args: UidArgs = parse_args(args)?;
            client.connect().await?;
            client.mark_unread(args.uid, &args.folder).await?;
            Ok(format!(
                "Marked message {} as unread in \"{}\".",
                args.uid, args.folder
            ))
        }
        "delete_email" => {
            let args: UidArgs = parse_args(args)?;
            client.connect().await?;
            client.delete_message(args.uid, &args.folder).await?;
            Ok(format!(
                "Deleted message {} from \"{}\".",
                args.uid, args.folder
            ))
        }
        "batch_delete_emails" => {
            let args: BatchDeleteArgs = parse_args(args)?;
            client.connect().await?;
            client.batch_delete(&args.uids, &args.folder).await?;
            Ok(format!(
                "Deleted {} messages from \"{}\".",
                args.uids.len(),
                args.folder
            ))
        }
        other => Err(Error::Validation(format!("Unknown tool: {other}"))),
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(args: Value) -> Result<T> {
    serde_json::from_value(args).map_err(|e| Error::Validation(format!("Invalid arguments: {e}")))
}

fn render_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| Error::Decode(format!("Failed to render result: {e}")))
}

/// Compact text rendering of the account summary.
fn render_stats_summary(stats: &AccountStats) -> String {
    let mut out = format!(
        "Account statistics:\n\
         Total:  {}\n\
         Unread: {}\n\
         Read:   {}\n\n\
         Folders ({}):\n",
        stats.total_emails,
        stats.unread_emails,
        stats.read_emails,
        stats.folders.len()
    );
    for folder in &stats.folders {
        out.push_str(&format!(
            "- {}: {} ({} unread)\n",
            folder.name, folder.total_count, folder.unread_count
        ));
    }
    out
}
