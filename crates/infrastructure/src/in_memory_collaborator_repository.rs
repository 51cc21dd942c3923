use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use fieldops_application::CollaboratorRepository;
use fieldops_core::{AppError, AppResult, CollaboratorId};
use fieldops_domain::CollaboratorForm;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory collaborator repository storing records as raw JSON.
///
/// Mirrors the REST contract: records come back unreconciled, updates
/// replace the whole record and keep `id` and `createdAt`.
#[derive(Debug, Default)]
pub struct InMemoryCollaboratorRepository {
    records: RwLock<Vec<Value>>,
}

impl InMemoryCollaboratorRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository preloaded with raw records.
    #[must_use]
    pub fn seeded(records: Vec<Value>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

fn record_id(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    }
}

fn encode_form(form: &CollaboratorForm) -> AppResult<serde_json::Map<String, Value>> {
    match serde_json::to_value(form) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(AppError::Internal(
            "collaborator form did not encode as an object".to_owned(),
        )),
        Err(error) => Err(AppError::Internal(format!(
            "failed to encode collaborator form: {error}"
        ))),
    }
}

#[async_trait]
impl CollaboratorRepository for InMemoryCollaboratorRepository {
    async fn list_collaborators(&self) -> AppResult<Vec<Value>> {
        Ok(self.records.read().await.clone())
    }

    async fn create_collaborator(&self, form: &CollaboratorForm) -> AppResult<Value> {
        let mut record = encode_form(form)?;
        record.insert("id".to_owned(), Value::from(Uuid::new_v4().to_string()));
        record.insert(
            "createdAt".to_owned(),
            Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );

        let record = Value::Object(record);
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn update_collaborator(
        &self,
        collaborator_id: &CollaboratorId,
        form: &CollaboratorForm,
    ) -> AppResult<Value> {
        let mut records = self.records.write().await;
        let slot = records
            .iter_mut()
            .find(|record| record_id(record).as_deref() == Some(collaborator_id.as_str()))
            .ok_or_else(|| {
                AppError::NotFound(format!("collaborator '{collaborator_id}' does not exist"))
            })?;

        let mut record = encode_form(form)?;
        record.insert("id".to_owned(), Value::from(collaborator_id.as_str()));
        if let Some(created_at) = slot.get("createdAt") {
            record.insert("createdAt".to_owned(), created_at.clone());
        }

        *slot = Value::Object(record);
        Ok(slot.clone())
    }

    async fn delete_collaborator(&self, collaborator_id: &CollaboratorId) -> AppResult<()> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|record| record_id(record).as_deref() != Some(collaborator_id.as_str()));

        if records.len() == before {
            return Err(AppError::NotFound(format!(
                "collaborator '{collaborator_id}' does not exist"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use fieldops_application::CollaboratorRepository;
    use fieldops_core::{AppError, CollaboratorId};
    use fieldops_domain::CollaboratorForm;
    use serde_json::json;

    use super::InMemoryCollaboratorRepository;

    fn form(full_name: &str) -> CollaboratorForm {
        CollaboratorForm {
            full_name: full_name.to_owned(),
            ..CollaboratorForm::blank()
        }
    }

    fn id(value: &str) -> CollaboratorId {
        CollaboratorId::new(value).unwrap_or_else(|_| panic!("valid id"))
    }

    #[tokio::test]
    async fn create_assigns_id_and_creation_date() {
        let repository = InMemoryCollaboratorRepository::new();
        let record = repository
            .create_collaborator(&form("Marc"))
            .await
            .unwrap_or_default();

        assert!(record["id"].as_str().is_some_and(|id| !id.is_empty()));
        assert!(record["createdAt"].is_string());
        assert_eq!(repository.list_collaborators().await.unwrap_or_default().len(), 1);
    }

    #[tokio::test]
    async fn update_keeps_creation_date_and_numeric_ids_match() {
        let repository = InMemoryCollaboratorRepository::seeded(vec![json!({
            "id": 7,
            "name": "Marc",
            "createdAt": "2024-01-01T00:00:00Z",
            "skills": ["roofing"]
        })]);

        let record = repository
            .update_collaborator(&id("7"), &form("Marc Dubois"))
            .await
            .unwrap_or_default();

        assert_eq!(record["createdAt"], "2024-01-01T00:00:00Z");
        assert_eq!(record["fullName"], "Marc Dubois");
        assert_eq!(record["skills"], json!([]));
    }

    #[tokio::test]
    async fn missing_records_are_not_found() {
        let repository = InMemoryCollaboratorRepository::new();

        let update = repository.update_collaborator(&id("nope"), &form("Ana")).await;
        let delete = repository.delete_collaborator(&id("nope")).await;

        assert!(matches!(update, Err(AppError::NotFound(_))));
        assert!(matches!(delete, Err(AppError::NotFound(_))));
    }
}
