use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use fieldops_core::{AppError, AppResult, CollaboratorId};
use fieldops_domain::{
    CollaboratorForm, CollaboratorFormSchema, CollaboratorProfile, MobilePermission,
};

use crate::{CollaboratorCache, CollaboratorRepository};

use super::CollaboratorService;

#[derive(Default)]
struct FakeCollaboratorRepository {
    records: Mutex<Vec<Value>>,
    list_calls: AtomicUsize,
    write_calls: AtomicUsize,
    unavailable: AtomicBool,
}

impl FakeCollaboratorRepository {
    fn with_records(records: Vec<Value>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    fn check_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::Internal("collaborator endpoint unreachable".to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl CollaboratorRepository for FakeCollaboratorRepository {
    async fn list_collaborators(&self) -> AppResult<Vec<Value>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self.records.lock().await.clone())
    }

    async fn create_collaborator(&self, form: &CollaboratorForm) -> AppResult<Value> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let mut record = serde_json::to_value(form)
            .map_err(|error| AppError::Internal(error.to_string()))?;
        let mut records = self.records.lock().await;
        record["id"] = json!(format!("col-{}", records.len() + 1));
        records.push(record.clone());
        Ok(record)
    }

    async fn update_collaborator(
        &self,
        collaborator_id: &CollaboratorId,
        form: &CollaboratorForm,
    ) -> AppResult<Value> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let mut records = self.records.lock().await;
        let slot = records
            .iter_mut()
            .find(|record| record["id"] == collaborator_id.as_str())
            .ok_or_else(|| AppError::NotFound(collaborator_id.to_string()))?;

        let mut record = serde_json::to_value(form)
            .map_err(|error| AppError::Internal(error.to_string()))?;
        record["id"] = json!(collaborator_id.as_str());
        *slot = record.clone();
        Ok(record)
    }

    async fn delete_collaborator(&self, collaborator_id: &CollaboratorId) -> AppResult<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|record| record["id"] != collaborator_id.as_str());
        if records.len() == before {
            return Err(AppError::NotFound(collaborator_id.to_string()));
        }
        Ok(())
    }
}

#[derive(Default)]
struct FakeCollaboratorCache {
    snapshot: Mutex<Option<Vec<CollaboratorProfile>>>,
    invalidations: AtomicUsize,
}

#[async_trait]
impl CollaboratorCache for FakeCollaboratorCache {
    async fn get_snapshot(&self) -> AppResult<Option<Vec<CollaboratorProfile>>> {
        Ok(self.snapshot.lock().await.clone())
    }

    async fn store_snapshot(
        &self,
        snapshot: Vec<CollaboratorProfile>,
        ttl_seconds: u32,
    ) -> AppResult<()> {
        if ttl_seconds > 0 {
            *self.snapshot.lock().await = Some(snapshot);
        }
        Ok(())
    }

    async fn invalidate(&self) -> AppResult<()> {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
        *self.snapshot.lock().await = None;
        Ok(())
    }
}

fn service(
    records: Vec<Value>,
) -> (
    CollaboratorService,
    Arc<FakeCollaboratorRepository>,
    Arc<FakeCollaboratorCache>,
) {
    let repository = Arc::new(FakeCollaboratorRepository::with_records(records));
    let cache = Arc::new(FakeCollaboratorCache::default());
    let service = CollaboratorService::new(repository.clone(), cache.clone());
    (service, repository, cache)
}

fn collaborator_id(value: &str) -> CollaboratorId {
    CollaboratorId::new(value).unwrap_or_else(|_| panic!("valid id"))
}

fn valid_form(full_name: &str) -> CollaboratorForm {
    CollaboratorForm {
        full_name: full_name.to_owned(),
        email: "crew@artisan.fr".to_owned(),
        phone: Some("0612345678".to_owned()),
        ..CollaboratorForm::blank()
    }
}

#[tokio::test]
async fn list_reconciles_raw_records() {
    let (service, _, _) = service(vec![
        json!({ "id": "col-1", "name": "Ana" }),
        json!({ "id": "col-2", "mobilePermissions": { "canViewJobs": true } }),
    ]);

    let collaborators = service.list_collaborators().await;
    let collaborators = collaborators.unwrap_or_default();

    assert_eq!(collaborators.len(), 2);
    assert_eq!(collaborators[0].full_name, "Ana");
    assert_eq!(collaborators[1].full_name, "Unknown");
    assert!(
        collaborators[1]
            .mobile_permissions
            .get(MobilePermission::CanViewJobs)
    );
}

#[tokio::test]
async fn second_list_is_served_from_cache() {
    let (service, repository, _) = service(vec![json!({ "id": "col-1" })]);

    assert!(service.list_collaborators().await.is_ok());
    assert!(service.list_collaborators().await.is_ok());

    assert_eq!(repository.list_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn successful_create_invalidates_and_next_list_refetches() {
    let (service, repository, cache) = service(Vec::new());
    assert!(service.list_collaborators().await.is_ok());

    let created = service.create_collaborator(valid_form("Marc Dubois")).await;
    let created = created.unwrap_or_else(|error| panic!("create failed: {error}"));
    assert_eq!(created.id, "col-1");
    assert_eq!(cache.invalidations.load(Ordering::SeqCst), 1);

    let collaborators = service.list_collaborators().await.unwrap_or_default();
    assert_eq!(collaborators.len(), 1);
    assert_eq!(repository.list_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn invalid_form_is_blocked_before_the_repository() {
    let (service, repository, cache) = service(Vec::new());

    let result = service.create_collaborator(valid_form("A")).await;

    match result {
        Err(AppError::FieldValidation(errors)) => assert!(errors.contains("fullName")),
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(repository.write_calls.load(Ordering::SeqCst), 0);
    assert_eq!(cache.invalidations.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn optional_phone_schema_accepts_empty_phone() {
    let (service, _, _) = service(Vec::new());
    let service = service.with_schema(CollaboratorFormSchema::with_optional_phone());

    let form = CollaboratorForm {
        phone: Some(String::new()),
        ..valid_form("Marc Dubois")
    };

    assert!(service.create_collaborator(form).await.is_ok());
}

#[tokio::test]
async fn failed_mutation_leaves_cache_untouched() {
    let (service, repository, cache) = service(vec![json!({ "id": "col-1", "fullName": "Ana" })]);
    assert!(service.list_collaborators().await.is_ok());

    repository.unavailable.store(true, Ordering::SeqCst);
    let result = service
        .update_collaborator(&collaborator_id("col-1"), valid_form("Ana Lopez"))
        .await;

    assert!(matches!(result, Err(AppError::Internal(_))));
    assert_eq!(cache.invalidations.load(Ordering::SeqCst), 0);

    let cached = service.list_collaborators().await.unwrap_or_default();
    assert_eq!(cached[0].full_name, "Ana");
    assert_eq!(repository.list_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn update_replaces_the_whole_record() {
    let (service, _, _) = service(vec![json!({
        "id": "col-1",
        "fullName": "Ana",
        "skills": ["tiling"],
        "mobilePermissions": { "canTrackTime": true }
    })]);

    let updated = service
        .update_collaborator(&collaborator_id("col-1"), valid_form("Ana Lopez"))
        .await
        .unwrap_or_else(|error| panic!("update failed: {error}"));

    assert_eq!(updated.full_name, "Ana Lopez");
    assert!(updated.skills.is_empty());
    assert!(
        !updated
            .mobile_permissions
            .get(MobilePermission::CanTrackTime)
    );
}

#[tokio::test]
async fn delete_then_find_reports_not_found() {
    let (service, _, _) = service(vec![json!({ "id": "col-1" }), json!({ "id": "col-2" })]);
    let target = collaborator_id("col-1");

    assert!(service.find_collaborator(&target).await.is_ok());
    assert!(service.delete_collaborator(&target).await.is_ok());

    let result = service.find_collaborator(&target).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(service.list_collaborators().await.unwrap_or_default().len(), 1);
}

#[tokio::test]
async fn refresh_bypasses_a_fresh_cache() {
    let (service, repository, _) = service(vec![json!({ "id": "col-1" })]);

    assert!(service.list_collaborators().await.is_ok());
    assert!(service.refresh_collaborators().await.is_ok());

    assert_eq!(repository.list_calls.load(Ordering::SeqCst), 2);
}
