//! Mailbox operations over the managed session
//!
//! Every operation re-selects its target folder before issuing
//! commands; selection is never cached across operations, so each
//! call pays the SELECT round trip but cannot act on stale mailbox
//! state left by interleaved external changes.

use crate::config::ImapConfig;
use crate::error::{Error, Result};
use crate::flag::Flag;
use crate::folder::{Folder, FolderTree};
use crate::message::Message;
use crate::search::SearchQuery;
use crate::session::{ImapSession, MailSession};
use futures::StreamExt;
use tracing::{info, warn};

/// Tool-facing client for the one configured account.
pub struct MailClient {
    session: MailSession,
}

impl MailClient {
    #[must_use]
    pub const fn new(config: ImapConfig) -> Self {
        Self {
            session: MailSession::new(config),
        }
    }

    /// Connect and log in; no-op when already connected.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or login fails.
    pub async fn connect(&mut self) -> Result<()> {
        self.session.connect().await
    }

    /// Log out and drop the connection; no-op when already
    /// disconnected.
    ///
    /// # Errors
    ///
    /// Returns an error if the LOGOUT exchange fails.
    pub async fn disconnect(&mut self) -> Result<()> {
        self.session.disconnect().await
    }

    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    /// List every folder in the account, parents before children.
    ///
    /// # Errors
    ///
    /// Returns an error if the LIST command fails.
    pub async fn list_folders(&mut self) -> Result<Vec<Folder>> {
        let session = self.session.active()?;

        let mut names = session
            .list(Some(""), Some("*"))
            .await
            .map_err(|e| Error::Protocol(format!("List folders failed: {e}")))?;

        let mut tree = FolderTree::new();
        while let Some(item) = names.next().await {
            let name = item.map_err(|e| Error::Protocol(format!("List folders failed: {e}")))?;
            let delimiter = name.delimiter().unwrap_or("/").to_string();
            let attributes: Vec<String> =
                name.attributes().iter().map(|a| format!("{a:?}")).collect();
            tree.insert(name.name(), &delimiter, attributes);
        }
        drop(names);

        Ok(tree.flatten())
    }

    /// Create a folder by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the CREATE command fails (e.g. the name
    /// already exists).
    pub async fn create_folder(&mut self, name: &str) -> Result<()> {
        let session = self.session.active()?;
        session
            .create(name)
            .await
            .map_err(|e| Error::Protocol(format!("Create folder {name} failed: {e}")))?;
        info!("Created folder {}", name);
        Ok(())
    }

    /// Delete a folder by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the DELETE command fails.
    pub async fn delete_folder(&mut self, name: &str) -> Result<()> {
        let session = self.session.active()?;
        session
            .delete(name)
            .await
            .map_err(|e| Error::Protocol(format!("Delete folder {name} failed: {e}")))?;
        info!("Deleted folder {}", name);
        Ok(())
    }

    /// Search one folder and fetch the matching messages.
    ///
    /// Selects the target folder, issues UID SEARCH with the query's
    /// criteria, and batch-fetches the first `limit` matches in
    /// ascending UID order. Zero matches short-circuit without a
    /// FETCH. Messages that fail to decode are logged and dropped;
    /// the rest of the batch survives. Result order follows the fetch
    /// response stream, which servers do not guarantee to match the
    /// requested UID order.
    ///
    /// # Errors
    ///
    /// Returns an error if the SELECT, SEARCH, or FETCH fails.
    pub async fn search(&mut self, query: &SearchQuery) -> Result<Vec<Message>> {
        let criteria = query.criteria();
        let session = self.session.active()?;
        select(session, &query.folder).await?;

        let uids = session
            .uid_search(&criteria)
            .await
            .map_err(|e| Error::Protocol(format!("Search failed: {e}")))?;

        let mut uid_list: Vec<u32> = uids.into_iter().collect();
        uid_list.sort_unstable();
        uid_list.truncate(query.limit);
        if uid_list.is_empty() {
            return Ok(Vec::new());
        }

        info!(
            "Fetching {} messages matching '{}' in {}",
            uid_list.len(),
            criteria,
            query.folder
        );

        let uid_set = uid_list
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");

        let mut fetches = session
            .uid_fetch(&uid_set, "(BODY.PEEK[] FLAGS)")
            .await
            .map_err(|e| Error::Protocol(format!("Fetch failed: {e}")))?;

        let mut messages = Vec::new();
        while let Some(item) = fetches.next().await {
            let fetch = item.map_err(|e| Error::Protocol(format!("Fetch failed: {e}")))?;
            let Some(uid) = fetch.uid else {
                warn!("Fetch response without UID, skipping");
                continue;
            };
            let Some(body) = fetch.body() else {
                warn!("No body for UID {}, skipping", uid);
                continue;
            };
            let seen = fetch
                .flags()
                .any(|f| matches!(f, async_imap::types::Flag::Seen));
            let flagged = fetch
                .flags()
                .any(|f| matches!(f, async_imap::types::Flag::Flagged));

            match Message::decode(uid, &query.folder, body, seen, flagged) {
                Ok(message) => messages.push(message),
                Err(e) => warn!("Failed to decode UID {}: {}", uid, e),
            }
        }
        drop(fetches);

        Ok(messages)
    }

    /// Move one message to another folder.
    ///
    /// The destination is passed through unvalidated; an invalid name
    /// surfaces as the server's MOVE failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the SELECT or MOVE fails.
    pub async fn move_message(
        &mut self,
        uid: u32,
        from_folder: &str,
        to_folder: &str,
    ) -> Result<()> {
        let session = self.session.active()?;
        select(session, from_folder).await?;
        session
            .uid_mv(uid.to_string(), to_folder)
            .await
            .map_err(|e| {
                Error::Protocol(format!("Move UID {uid} to {to_folder} failed: {e}"))
            })?;
        info!("Moved UID {} from {} to {}", uid, from_folder, to_folder);
        Ok(())
    }

    /// Set the `\Seen` flag on one message.
    ///
    /// # Errors
    ///
    /// Returns an error if the SELECT or STORE fails.
    pub async fn mark_read(&mut self, uid: u32, folder: &str) -> Result<()> {
        self.store_flags(&uid.to_string(), folder, &Flag::Seen.store_add())
            .await
    }

    /// Clear the `\Seen` flag on one message.
    ///
    /// # Errors
    ///
    /// Returns an error if the SELECT or STORE fails.
    pub async fn mark_unread(&mut self, uid: u32, folder: &str) -> Result<()> {
        self.store_flags(&uid.to_string(), folder, &Flag::Seen.store_remove())
            .await
    }

    /// Permanently delete one message.
    ///
    /// # Errors
    ///
    /// Returns an error if the SELECT, STORE, or EXPUNGE fails.
    pub async fn delete_message(&mut self, uid: u32, folder: &str) -> Result<()> {
        self.delete_uid_set(&uid.to_string(), folder).await
    }

    /// Permanently delete a batch of messages.
    ///
    /// One STORE for the whole identifier set, then a single EXPUNGE,
    /// regardless of batch size. No-op for an empty batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the SELECT, STORE, or EXPUNGE fails.
    pub async fn batch_delete(&mut self, uids: &[u32], folder: &str) -> Result<()> {
        if uids.is_empty() {
            return Ok(());
        }
        let uid_set = uids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.delete_uid_set(&uid_set, folder).await
    }

    /// Read the message counters of one folder without touching flags
    /// (EXAMINE, the read-only SELECT). Returns (total, unseen,
    /// recent).
    pub(crate) async fn examine_counts(&mut self, folder_path: &str) -> Result<(u32, u32, u32)> {
        let session = self.session.active()?;
        let mailbox = session
            .examine(folder_path)
            .await
            .map_err(|e| Error::Protocol(format!("Failed to examine {folder_path}: {e}")))?;
        Ok((mailbox.exists, mailbox.unseen.unwrap_or(0), mailbox.recent))
    }

    /// Flag-then-expunge delete sequence.
    ///
    /// Two steps, not atomic: a crash between the STORE and the
    /// EXPUNGE leaves the messages flagged `\Deleted` but still
    /// present, recoverable by a later expunge or flag clear.
    async fn delete_uid_set(&mut self, uid_set: &str, folder: &str) -> Result<()> {
        self.store_flags(uid_set, folder, &Flag::Deleted.store_add())
            .await?;

        let session = self.session.active()?;
        let removed = session
            .expunge()
            .await
            .map_err(|e| Error::Protocol(format!("Expunge failed: {e}")))?;
        let mut removed = std::pin::pin!(removed);
        while let Some(item) = removed.next().await {
            item.map_err(|e| Error::Protocol(format!("Expunge failed: {e}")))?;
        }
        drop(removed);

        info!("Expunged UIDs {} from {}", uid_set, folder);
        Ok(())
    }

    /// SELECT the folder, then apply one STORE query to a UID set.
    async fn store_flags(&mut self, uid_set: &str, folder: &str, query: &str) -> Result<()> {
        let session = self.session.active()?;
        select(session, folder).await?;

        let mut responses = session
            .uid_store(uid_set, query)
            .await
            .map_err(|e| Error::Protocol(format!("Store {query} failed: {e}")))?;
        while let Some(item) = responses.next().await {
            item.map_err(|e| Error::Protocol(format!("Store {query} failed: {e}")))?;
        }
        drop(responses);

        Ok(())
    }
}

/// SELECT a folder on the live session.
async fn select(session: &mut ImapSession, folder: &str) -> Result<()> {
    session
        .select(folder)
        .await
        .map_err(|e| Error::Protocol(format!("Failed to select {folder}: {e}")))?;
    Ok(())
}
