//! Concurrent refresh of both directories.

use tracing::info;

use console_core::{DirectoryKind, Gateway};

use crate::{DirectoryCache, LoadOutcome};

/// Terminal state of a refresh-all action.
///
/// A partial success (one directory refreshed, the other failed) is a valid
/// terminal state, reported distinctly from full success and full failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshReport {
    /// Both directories refreshed.
    Full,
    /// Exactly one directory failed.
    Partial { failed: Vec<DirectoryKind> },
    /// Both directories failed.
    Failed,
}

/// Both per-directory outcomes of a refresh-all action, reported
/// independently.
#[derive(Debug)]
pub struct RefreshAll {
    pub chat: LoadOutcome,
    pub service: LoadOutcome,
}

impl RefreshAll {
    /// Collapse the two outcomes into the terminal report.
    pub fn report(&self) -> RefreshReport {
        let failed: Vec<DirectoryKind> = [
            (DirectoryKind::ChatMembers, &self.chat),
            (DirectoryKind::ServiceUsers, &self.service),
        ]
        .into_iter()
        .filter(|(_, outcome)| outcome.error.is_some())
        .map(|(kind, _)| kind)
        .collect();

        match failed.len() {
            0 => RefreshReport::Full,
            2 => RefreshReport::Failed,
            _ => RefreshReport::Partial { failed },
        }
    }
}

/// Refresh both directories concurrently.
///
/// The two fetches run in parallel and complete or fail independently.
/// Preventing a second trigger while one is in flight is the caller's
/// debounce-by-disable discipline; there is no cancellation.
pub async fn refresh_all(
    chat: &mut DirectoryCache,
    service: &mut DirectoryCache,
    gateway: &dyn Gateway,
) -> RefreshAll {
    let (chat_outcome, service_outcome) =
        tokio::join!(chat.load(gateway, true), service.load(gateway, true));

    let result = RefreshAll {
        chat: chat_outcome,
        service: service_outcome,
    };
    info!(report = ?result.report(), "Directory refresh-all finished");
    result
}
