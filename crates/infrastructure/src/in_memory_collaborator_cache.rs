use std::time::{Duration, Instant};

use async_trait::async_trait;
use fieldops_application::CollaboratorCache;
use fieldops_core::AppResult;
use fieldops_domain::CollaboratorProfile;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone)]
struct CollaboratorSnapshotEntry {
    snapshot: Vec<CollaboratorProfile>,
    expires_at: Instant,
}

/// In-memory cache adapter for the reconciled collaborator list.
#[derive(Debug, Default)]
pub struct InMemoryCollaboratorCache {
    entry: RwLock<Option<CollaboratorSnapshotEntry>>,
}

impl InMemoryCollaboratorCache {
    /// Creates an empty in-memory collaborator cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CollaboratorCache for InMemoryCollaboratorCache {
    async fn get_snapshot(&self) -> AppResult<Option<Vec<CollaboratorProfile>>> {
        {
            let entry = self.entry.read().await;
            match entry.as_ref() {
                Some(entry) if entry.expires_at > Instant::now() => {
                    return Ok(Some(entry.snapshot.clone()));
                }
                Some(_) => {}
                None => return Ok(None),
            }
        }

        let mut entry = self.entry.write().await;
        if entry
            .as_ref()
            .is_some_and(|entry| entry.expires_at <= Instant::now())
        {
            debug!("collaborator snapshot expired");
            *entry = None;
        }

        Ok(None)
    }

    async fn store_snapshot(
        &self,
        snapshot: Vec<CollaboratorProfile>,
        ttl_seconds: u32,
    ) -> AppResult<()> {
        if ttl_seconds == 0 {
            return Ok(());
        }

        let now = Instant::now();
        let expires_at = now
            .checked_add(Duration::from_secs(u64::from(ttl_seconds)))
            .unwrap_or(now);

        *self.entry.write().await = Some(CollaboratorSnapshotEntry {
            snapshot,
            expires_at,
        });

        Ok(())
    }

    async fn invalidate(&self) -> AppResult<()> {
        if self.entry.write().await.take().is_some() {
            debug!("collaborator snapshot invalidated");
        }
        Ok(())
    }
}
