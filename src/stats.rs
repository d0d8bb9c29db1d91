//! Cross-folder account statistics
//!
//! The aggregation deliberately touches only a bounded subset of
//! folders: the ones whose lowercase name contains a well-known
//! keyword, capped at five in list order. Scanning every folder of a
//! large account for a summary was the original performance problem
//! this bound solves.

use crate::client::MailClient;
use crate::error::Result;
use crate::folder::Folder;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Folder-name keywords retained for aggregation.
const KEYWORDS: [&str; 4] = ["inbox", "sent", "draft", "trash"];

/// Upper bound on folders examined per aggregation.
const MAX_FOLDERS: usize = 5;

/// Point-in-time counters for one folder. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderStats {
    pub name: String,
    pub path: String,
    pub total_count: u32,
    pub unread_count: u32,
    pub recent_count: u32,
}

/// Sender frequency entry. Declared in the stats shape but never
/// populated; see [`AccountStats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderCount {
    pub email: String,
    pub count: u64,
}

/// Aggregate statistics across the retained folder subset.
///
/// `flagged_emails`, `top_senders`, and the time-windowed counters are
/// part of the declared shape but are always zero/empty: the upstream
/// behavior never computed them, and inventing a computation here
/// would change the reported contract without confirmed requirements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AccountStats {
    pub total_emails: u64,
    pub unread_emails: u64,
    pub read_emails: u64,
    pub flagged_emails: u64,
    pub folders: Vec<FolderStats>,
    pub top_senders: Vec<SenderCount>,
    pub emails_last_30_days: u64,
    pub emails_last_7_days: u64,
    pub average_emails_per_day: f64,
}

/// Pick the folders the aggregation will examine: keyword-matching
/// names, first [`MAX_FOLDERS`] in list order.
fn select_folders(folders: &[Folder]) -> Vec<&Folder> {
    folders
        .iter()
        .filter(|f| {
            let name = f.name.to_lowercase();
            KEYWORDS.iter().any(|kw| name.contains(kw))
        })
        .take(MAX_FOLDERS)
        .collect()
}

impl MailClient {
    /// Compute the account summary.
    ///
    /// Lists folders, retains the keyword subset, EXAMINEs each one
    /// read-only, and sums the reported counters. A folder that fails
    /// to open is logged and skipped; one bad folder never fails the
    /// aggregate.
    ///
    /// # Errors
    ///
    /// Returns an error only if the folder listing itself fails.
    pub async fn account_stats(&mut self) -> Result<AccountStats> {
        let folders = self.list_folders().await?;
        let retained: Vec<Folder> = select_folders(&folders).into_iter().cloned().collect();

        let mut stats = AccountStats::default();
        for folder in retained {
            match self.examine_counts(&folder.path).await {
                Ok((total, unread, recent)) => {
                    stats.folders.push(FolderStats {
                        name: folder.name,
                        path: folder.path,
                        total_count: total,
                        unread_count: unread,
                        recent_count: recent,
                    });
                    stats.total_emails += u64::from(total);
                    stats.unread_emails += u64::from(unread);
                    stats.read_emails += u64::from(total.saturating_sub(unread));
                }
                Err(e) => {
                    warn!("Skipping folder {} in stats: {}", folder.path, e);
                }
            }
        }

        Ok(stats)
    }
}
