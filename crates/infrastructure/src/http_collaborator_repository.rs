use async_trait::async_trait;
use fieldops_application::CollaboratorRepository;
use fieldops_core::{AppError, AppResult, CollaboratorId};
use fieldops_domain::CollaboratorForm;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

const COLLABORATORS_SEGMENT: &str = "collaborators";

/// REST implementation of the collaborator repository port.
pub struct HttpCollaboratorRepository {
    http_client: reqwest::Client,
    base_url: Url,
    bearer_token: Option<String>,
}

impl HttpCollaboratorRepository {
    /// Creates a repository targeting `base_url` (for example `https://host/api`).
    pub fn new(
        http_client: reqwest::Client,
        base_url: &str,
        bearer_token: Option<String>,
    ) -> AppResult<Self> {
        let base_url = Url::parse(base_url.trim()).map_err(|error| {
            AppError::Validation(format!("invalid collaborator API base url '{base_url}': {error}"))
        })?;

        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "collaborator API base url '{base_url}' must be an http(s) url"
            )));
        }

        Ok(Self {
            http_client,
            base_url,
            bearer_token: bearer_token.filter(|token| !token.trim().is_empty()),
        })
    }

    /// Returns the collection endpoint.
    pub fn collection_url(&self) -> AppResult<Url> {
        self.endpoint(&[COLLABORATORS_SEGMENT])
    }

    /// Returns the endpoint of one collaborator; the id is percent-encoded.
    pub fn item_url(&self, collaborator_id: &CollaboratorId) -> AppResult<Url> {
        self.endpoint(&[COLLABORATORS_SEGMENT, collaborator_id.as_str()])
    }

    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Internal(format!(
                    "collaborator API base url '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self.http_client.request(method, url);
        match &self.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: reqwest::RequestBuilder, operation: &str) -> AppResult<String> {
        let response = builder.send().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to call collaborator endpoint for {operation}: {error}"
            ))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|error| error.to_string());

        response_body(status, operation, body)
    }

    async fn send_for_record(
        &self,
        builder: reqwest::RequestBuilder,
        operation: &str,
        form: &CollaboratorForm,
        collaborator_id: Option<&CollaboratorId>,
    ) -> AppResult<Value> {
        let body = self.send(builder, operation).await?;

        if body.trim().is_empty() {
            // 204 responses: echo the submitted record.
            let mut record = serde_json::to_value(form).map_err(|error| {
                AppError::Internal(format!("failed to encode collaborator form: {error}"))
            })?;
            if let (Some(collaborator_id), Some(object)) =
                (collaborator_id, record.as_object_mut())
            {
                object.insert("id".to_owned(), Value::from(collaborator_id.as_str()));
            }
            return Ok(record);
        }

        let value: Value = serde_json::from_str(body.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "failed to parse collaborator {operation} response body: {error}"
            ))
        })?;

        Ok(unwrap_data_envelope(value))
    }
}

#[async_trait]
impl CollaboratorRepository for HttpCollaboratorRepository {
    async fn list_collaborators(&self) -> AppResult<Vec<Value>> {
        let url = self.collection_url()?;
        let body = self
            .send(self.request(reqwest::Method::GET, url), "list")
            .await?;

        let value: Value = serde_json::from_str(body.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "failed to parse collaborator list response body: {error}"
            ))
        })?;

        Ok(list_records(value))
    }

    async fn create_collaborator(&self, form: &CollaboratorForm) -> AppResult<Value> {
        let url = self.collection_url()?;
        let builder = self.request(reqwest::Method::POST, url).json(form);
        self.send_for_record(builder, "create", form, None).await
    }

    async fn update_collaborator(
        &self,
        collaborator_id: &CollaboratorId,
        form: &CollaboratorForm,
    ) -> AppResult<Value> {
        let url = self.item_url(collaborator_id)?;
        let builder = self.request(reqwest::Method::PUT, url).json(form);
        self.send_for_record(builder, "update", form, Some(collaborator_id))
            .await
    }

    async fn delete_collaborator(&self, collaborator_id: &CollaboratorId) -> AppResult<()> {
        let url = self.item_url(collaborator_id)?;
        self.send(self.request(reqwest::Method::DELETE, url), "delete")
            .await
            .map(|_| ())
    }
}

fn response_body(
    status: StatusCode,
    operation: &str,
    body: Result<String, String>,
) -> AppResult<String> {
    if status.is_success() {
        debug!(operation, status = status.as_u16(), "collaborator endpoint call succeeded");
        return body.map_err(|error| {
            AppError::Internal(format!(
                "failed to read collaborator {operation} body after status {}: {error}",
                status.as_u16()
            ))
        });
    }

    warn!(operation, status = status.as_u16(), "collaborator endpoint call failed");
    Err(status_error(
        status,
        operation,
        body.unwrap_or_else(|_| "<body unavailable>".to_owned()),
    ))
}

fn status_error(status: StatusCode, operation: &str, body: String) -> AppError {
    let message = format!(
        "collaborator {operation} returned status {}: {body}",
        status.as_u16()
    );

    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => AppError::Validation(message),
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
        StatusCode::FORBIDDEN => AppError::Forbidden(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::CONFLICT => AppError::Conflict(message),
        _ => AppError::Internal(message),
    }
}

/// Accepts a bare array or an object wrapping the array.
fn list_records(value: Value) -> Vec<Value> {
    match value {
        Value::Array(records) => records,
        Value::Object(mut object) => {
            for key in ["collaborators", "data"] {
                if let Some(Value::Array(records)) = object.remove(key) {
                    return records;
                }
            }

            warn!("collaborator list response has no record array; treating as empty");
            Vec::new()
        }
        _ => {
            warn!("collaborator list response is not a list; treating as empty");
            Vec::new()
        }
    }
}

fn unwrap_data_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut object) if !object.contains_key("id") => match object.remove("data") {
            Some(data @ Value::Object(_)) => data,
            Some(other) => {
                object.insert("data".to_owned(), other);
                Value::Object(object)
            }
            None => Value::Object(object),
        },
        other => other,
    }
}
