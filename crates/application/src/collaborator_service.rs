use std::sync::Arc;

use chrono::Utc;

use fieldops_core::{AppError, AppResult, CollaboratorId};
use fieldops_domain::{
    CollaboratorForm, CollaboratorFormSchema, CollaboratorProfile, reconcile_collaborator,
    reconcile_collaborators,
};

use crate::{CollaboratorCache, CollaboratorRepository};

/// Default lifetime of a cached collaborator list.
pub const DEFAULT_CACHE_TTL_SECONDS: u32 = 60;

/// Application service for collaborator administration.
///
/// Reads go through the cache. Mutations validate the form, call the
/// repository, and drop the cached list on success so the next read
/// refetches. The cached list is never patched in place.
#[derive(Clone)]
pub struct CollaboratorService {
    repository: Arc<dyn CollaboratorRepository>,
    cache: Arc<dyn CollaboratorCache>,
    schema: CollaboratorFormSchema,
    cache_ttl_seconds: u32,
}

impl CollaboratorService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        repository: Arc<dyn CollaboratorRepository>,
        cache: Arc<dyn CollaboratorCache>,
    ) -> Self {
        Self {
            repository,
            cache,
            schema: CollaboratorFormSchema::strict(),
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
        }
    }

    /// Overrides the form rules applied before submission.
    #[must_use]
    pub fn with_schema(mut self, schema: CollaboratorFormSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Overrides the cached list lifetime.
    #[must_use]
    pub fn with_cache_ttl_seconds(mut self, cache_ttl_seconds: u32) -> Self {
        self.cache_ttl_seconds = cache_ttl_seconds;
        self
    }

    /// Returns reconciled collaborators, from cache when fresh.
    pub async fn list_collaborators(&self) -> AppResult<Vec<CollaboratorProfile>> {
        if let Some(snapshot) = self.cache.get_snapshot().await? {
            return Ok(snapshot);
        }

        self.fetch_and_store().await
    }

    /// Drops the cached list and fetches a fresh one.
    pub async fn refresh_collaborators(&self) -> AppResult<Vec<CollaboratorProfile>> {
        self.cache.invalidate().await?;
        self.fetch_and_store().await
    }

    /// Returns one collaborator from the current list.
    pub async fn find_collaborator(
        &self,
        collaborator_id: &CollaboratorId,
    ) -> AppResult<CollaboratorProfile> {
        self.list_collaborators()
            .await?
            .into_iter()
            .find(|profile| profile.id == collaborator_id.as_str())
            .ok_or_else(|| {
                AppError::NotFound(format!("collaborator '{collaborator_id}' does not exist"))
            })
    }

    /// Validates and submits a new collaborator.
    pub async fn create_collaborator(
        &self,
        form: CollaboratorForm,
    ) -> AppResult<CollaboratorProfile> {
        self.require_valid_form(&form)?;

        let stored = self.repository.create_collaborator(&form).await?;
        self.cache.invalidate().await?;

        Ok(reconcile_collaborator(&stored, Utc::now()))
    }

    /// Validates and submits a full replacement of a collaborator.
    pub async fn update_collaborator(
        &self,
        collaborator_id: &CollaboratorId,
        form: CollaboratorForm,
    ) -> AppResult<CollaboratorProfile> {
        self.require_valid_form(&form)?;

        let stored = self
            .repository
            .update_collaborator(collaborator_id, &form)
            .await?;
        self.cache.invalidate().await?;

        Ok(reconcile_collaborator(&stored, Utc::now()))
    }

    /// Deletes a collaborator.
    pub async fn delete_collaborator(&self, collaborator_id: &CollaboratorId) -> AppResult<()> {
        self.repository.delete_collaborator(collaborator_id).await?;
        self.cache.invalidate().await
    }

    async fn fetch_and_store(&self) -> AppResult<Vec<CollaboratorProfile>> {
        let records = self.repository.list_collaborators().await?;
        let snapshot = reconcile_collaborators(&records, Utc::now());

        self.cache
            .store_snapshot(snapshot.clone(), self.cache_ttl_seconds)
            .await?;

        Ok(snapshot)
    }

    fn require_valid_form(&self, form: &CollaboratorForm) -> AppResult<()> {
        let errors = self.schema.validate(form);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::FieldValidation(errors))
        }
    }
}

#[cfg(test)]
mod tests;
