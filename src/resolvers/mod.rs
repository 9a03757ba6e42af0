pub mod config;
pub mod event;
pub mod live_timing;
pub mod race_start;
pub mod sessions;
pub mod standings;
pub mod teams;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;

/// Lifecycle of every resolver state:
/// uninitialized → waiting (precondition unmet) → ok ⇄ unavailable.
///
/// `Waiting` means a required upstream input is not resolved yet;
/// `Unavailable` means a fetch was attempted and failed or returned no
/// usable data. Neither is fatal — the next triggered refresh retries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolverStatus {
    #[default]
    Uninitialized,
    Waiting,
    Ok,
    Unavailable,
}

impl ResolverStatus {
    pub fn word(self) -> &'static str {
        match self {
            ResolverStatus::Uninitialized => "unknown",
            ResolverStatus::Waiting => "waiting",
            ResolverStatus::Ok => "ok",
            ResolverStatus::Unavailable => "unavailable",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot<T> {
    pub status: ResolverStatus,
    pub last_update: Option<DateTime<Utc>>,
    pub data: T,
}

/// Snapshot handoff between resolvers: a writer builds a complete new state
/// value and swaps it in; readers clone the latest published snapshot. This
/// is the only synchronization in the chain.
pub struct Shared<T>(Arc<RwLock<Snapshot<T>>>);

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Clone + Default> Shared<T> {
    pub fn new() -> Self {
        Self(Arc::new(RwLock::new(Snapshot::default())))
    }

    pub fn snapshot(&self) -> Snapshot<T> {
        self.0.read().clone()
    }

    pub fn publish(&self, status: ResolverStatus, data: T) {
        *self.0.write() = Snapshot {
            status,
            last_update: Some(Utc::now()),
            data,
        };
    }

    /// Flips the status but keeps the last good payload, so a failed
    /// refresh does not clear previously resolved data.
    pub fn mark(&self, status: ResolverStatus) {
        let mut guard = self.0.write();
        guard.status = status;
        guard.last_update = Some(Utc::now());
    }
}

impl<T: Clone + Default> Default for Shared<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Seam between the fetching resolvers and the dispatcher/scheduler.
/// `refresh` never fails from the caller's perspective: failures are
/// logged and recorded in the published status.
#[async_trait]
pub trait Refresh: Send + Sync {
    async fn refresh(&self);
}
