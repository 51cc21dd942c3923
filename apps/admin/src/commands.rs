use std::path::{Path, PathBuf};

use fieldops_application::CollaboratorService;
use fieldops_core::{AppError, AppResult, CollaboratorId};
use fieldops_domain::{
    CollaboratorForm, CollaboratorFormSchema, MobilePermission, PermissionCategory,
};
use serde_json::{Map, Value, json};
use tracing::info;

/// Command-line help text.
pub const USAGE: &str = "usage: fieldops-admin <command>

commands:
  list                                  list collaborators
  show <id>                             show one collaborator
  create <file.json> [--optional-phone]
                                        create a collaborator from a form file
  update <id> <file.json> [--optional-phone]
                                        replace a collaborator from a form file
  delete <id>                           delete a collaborator
  validate <file.json> [--optional-phone]
                                        check a form file without submitting it
  grant-category <id> <category> <on|off>
                                        toggle every permission of a category
  grant-all <id> <on|off>               toggle every permission
  permissions                           print permission keys by category";

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    /// Lists reconciled collaborators.
    List,
    /// Shows one collaborator.
    Show(CollaboratorId),
    /// Submits a creation form file.
    Create {
        /// Form file.
        path: PathBuf,
        /// Accept an empty phone.
        optional_phone: bool,
    },
    /// Submits a replacement form file.
    Update {
        /// Target collaborator.
        collaborator_id: CollaboratorId,
        /// Form file.
        path: PathBuf,
        /// Accept an empty phone.
        optional_phone: bool,
    },
    /// Deletes a collaborator.
    Delete(CollaboratorId),
    /// Validates a form file locally.
    Validate {
        /// Form file.
        path: PathBuf,
        /// Accept an empty phone.
        optional_phone: bool,
    },
    /// Sets every permission of one category.
    GrantCategory {
        /// Target collaborator.
        collaborator_id: CollaboratorId,
        /// Category name as typed.
        category: String,
        /// New grant value.
        value: bool,
    },
    /// Sets every permission.
    GrantAll {
        /// Target collaborator.
        collaborator_id: CollaboratorId,
        /// New grant value.
        value: bool,
    },
    /// Prints the permission table.
    Permissions,
}

impl AdminCommand {
    /// Parses arguments without the program name.
    pub fn parse(args: &[String]) -> AppResult<Self> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        match args.as_slice() {
            ["list"] => Ok(Self::List),
            ["show", id] => Ok(Self::Show(CollaboratorId::new(*id)?)),
            ["create", path, flags @ ..] => Ok(Self::Create {
                path: PathBuf::from(path),
                optional_phone: parse_optional_phone(flags)?,
            }),
            ["update", id, path, flags @ ..] => Ok(Self::Update {
                collaborator_id: CollaboratorId::new(*id)?,
                path: PathBuf::from(path),
                optional_phone: parse_optional_phone(flags)?,
            }),
            ["delete", id] => Ok(Self::Delete(CollaboratorId::new(*id)?)),
            ["validate", path, flags @ ..] => Ok(Self::Validate {
                path: PathBuf::from(path),
                optional_phone: parse_optional_phone(flags)?,
            }),
            ["grant-category", id, category, value] => Ok(Self::GrantCategory {
                collaborator_id: CollaboratorId::new(*id)?,
                category: (*category).to_owned(),
                value: parse_switch(value)?,
            }),
            ["grant-all", id, value] => Ok(Self::GrantAll {
                collaborator_id: CollaboratorId::new(*id)?,
                value: parse_switch(value)?,
            }),
            ["permissions"] => Ok(Self::Permissions),
            _ => Err(AppError::Validation(USAGE.to_owned())),
        }
    }
}

fn parse_optional_phone(flags: &[&str]) -> AppResult<bool> {
    match flags {
        [] => Ok(false),
        ["--optional-phone"] => Ok(true),
        _ => Err(AppError::Validation(USAGE.to_owned())),
    }
}

fn form_schema(optional_phone: bool) -> CollaboratorFormSchema {
    if optional_phone {
        CollaboratorFormSchema::with_optional_phone()
    } else {
        CollaboratorFormSchema::strict()
    }
}

fn parse_switch(value: &str) -> AppResult<bool> {
    match value {
        "on" | "true" => Ok(true),
        "off" | "false" => Ok(false),
        _ => Err(AppError::Validation(format!(
            "expected 'on' or 'off', got '{value}'"
        ))),
    }
}

/// Runs a command and returns the JSON document to print.
pub async fn execute(service: &CollaboratorService, command: AdminCommand) -> AppResult<Value> {
    match command {
        AdminCommand::List => to_json(&service.list_collaborators().await?),
        AdminCommand::Show(collaborator_id) => {
            to_json(&service.find_collaborator(&collaborator_id).await?)
        }
        AdminCommand::Create {
            path,
            optional_phone,
        } => {
            let schema = form_schema(optional_phone);
            let form = read_form(&schema, &path)?;
            let created = service
                .clone()
                .with_schema(schema)
                .create_collaborator(form)
                .await?;
            info!(collaborator_id = %created.id, "collaborator created");
            to_json(&created)
        }
        AdminCommand::Update {
            collaborator_id,
            path,
            optional_phone,
        } => {
            let schema = form_schema(optional_phone);
            let form = read_form(&schema, &path)?;
            let updated = service
                .clone()
                .with_schema(schema)
                .update_collaborator(&collaborator_id, form)
                .await?;
            info!(collaborator_id = %collaborator_id, "collaborator updated");
            to_json(&updated)
        }
        AdminCommand::Delete(collaborator_id) => {
            service.delete_collaborator(&collaborator_id).await?;
            info!(collaborator_id = %collaborator_id, "collaborator deleted");
            Ok(json!({ "deleted": collaborator_id.as_str() }))
        }
        AdminCommand::Validate {
            path,
            optional_phone,
        } => {
            let errors = form_schema(optional_phone).validate_json(&read_json(&path)?)?;
            if errors.is_empty() {
                Ok(json!({ "valid": true }))
            } else {
                Err(AppError::FieldValidation(errors))
            }
        }
        AdminCommand::GrantCategory {
            collaborator_id,
            category,
            value,
        } => {
            if PermissionCategory::parse(&category).is_none() {
                return Err(AppError::Validation(format!(
                    "unknown permission category '{category}'"
                )));
            }

            let profile = service.find_collaborator(&collaborator_id).await?;
            let mut form = CollaboratorForm::from_profile(&profile);
            form.mobile_permissions = form.mobile_permissions.set_category_named(&category, value);
            to_json(&service.update_collaborator(&collaborator_id, form).await?)
        }
        AdminCommand::GrantAll {
            collaborator_id,
            value,
        } => {
            let profile = service.find_collaborator(&collaborator_id).await?;
            let mut form = CollaboratorForm::from_profile(&profile);
            form.mobile_permissions = form.mobile_permissions.set_all(value);
            to_json(&service.update_collaborator(&collaborator_id, form).await?)
        }
        AdminCommand::Permissions => Ok(permission_table()),
    }
}

fn permission_table() -> Value {
    let table: Map<String, Value> = PermissionCategory::all()
        .iter()
        .map(|category| {
            let keys = category
                .permissions()
                .iter()
                .map(|permission| Value::from(permission.as_str()))
                .collect();
            (category.as_str().to_owned(), Value::Array(keys))
        })
        .collect();

    json!({
        "total": MobilePermission::all().len(),
        "categories": table,
    })
}

fn read_json(path: &Path) -> AppResult<Value> {
    let contents = std::fs::read_to_string(path).map_err(|error| {
        AppError::Validation(format!("failed to read '{}': {error}", path.display()))
    })?;

    serde_json::from_str(&contents).map_err(|error| {
        AppError::Validation(format!("'{}' is not valid JSON: {error}", path.display()))
    })
}

/// Reads a JSON array of raw collaborator records.
pub fn read_seed_records(path: &Path) -> AppResult<Vec<Value>> {
    match read_json(path)? {
        Value::Array(records) => Ok(records),
        _ => Err(AppError::Validation(format!(
            "'{}' must hold a JSON array of collaborator records",
            path.display()
        ))),
    }
}

fn read_form(schema: &CollaboratorFormSchema, path: &Path) -> AppResult<CollaboratorForm> {
    schema.parse(&read_json(path)?)
}

fn to_json<T: serde::Serialize>(value: &T) -> AppResult<Value> {
    serde_json::to_value(value)
        .map_err(|error| AppError::Internal(format!("failed to encode output: {error}")))
}
