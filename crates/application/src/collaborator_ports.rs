use async_trait::async_trait;
use serde_json::Value;

use fieldops_core::{AppResult, CollaboratorId};
use fieldops_domain::{CollaboratorForm, CollaboratorProfile};

/// Repository port for the external collaborator endpoints.
///
/// Implementations return records as received; reconciliation happens in the
/// service.
#[async_trait]
pub trait CollaboratorRepository: Send + Sync {
    /// Lists raw collaborator records.
    async fn list_collaborators(&self) -> AppResult<Vec<Value>>;

    /// Creates a collaborator and returns the stored record.
    async fn create_collaborator(&self, form: &CollaboratorForm) -> AppResult<Value>;

    /// Replaces a collaborator and returns the stored record.
    async fn update_collaborator(
        &self,
        collaborator_id: &CollaboratorId,
        form: &CollaboratorForm,
    ) -> AppResult<Value>;

    /// Deletes a collaborator.
    async fn delete_collaborator(&self, collaborator_id: &CollaboratorId) -> AppResult<()>;
}

/// Cache port holding the last reconciled collaborator list.
#[async_trait]
pub trait CollaboratorCache: Send + Sync {
    /// Returns the cached snapshot when present and fresh.
    async fn get_snapshot(&self) -> AppResult<Option<Vec<CollaboratorProfile>>>;

    /// Stores a snapshot for `ttl_seconds`. A zero TTL stores nothing.
    async fn store_snapshot(
        &self,
        snapshot: Vec<CollaboratorProfile>,
        ttl_seconds: u32,
    ) -> AppResult<()>;

    /// Drops the cached snapshot so the next read refetches.
    async fn invalidate(&self) -> AppResult<()>;
}
