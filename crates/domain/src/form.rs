//! Collaborator creation and edit form validation.
//!
//! Validation never fails for business-rule violations: it reports a message
//! per field path. Only a payload whose JSON types do not fit the form shape
//! is rejected outright.

use std::collections::BTreeMap;

use fieldops_core::{AppError, AppResult, FieldErrors};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{
    CapabilityMatrix, CollaboratorProfile, EmailAddress, EmergencyContact, MobilePermission,
    NotificationSettings, WorkSchedule, parse_time_of_day,
};

/// Minimum characters in a full name.
pub const FULL_NAME_MIN_LENGTH: usize = 2;

/// Maximum characters in a full name.
pub const FULL_NAME_MAX_LENGTH: usize = 100;

/// Minimum characters in a phone number.
pub const PHONE_MIN_LENGTH: usize = 10;

/// Maximum characters in administrator notes.
pub const NOTES_MAX_LENGTH: usize = 2000;

/// Submitted collaborator payload, also used as the POST/PUT body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaboratorForm {
    /// Display name.
    #[serde(default)]
    pub full_name: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Contact phone; `None` means the field was not provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Role label.
    #[serde(default)]
    pub role: String,
    /// Whether the collaborator can sign in.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Fine-grained mobile capabilities; unknown keys are dropped.
    #[serde(default, deserialize_with = "known_permissions")]
    pub mobile_permissions: CapabilityMatrix,
    /// Weekly working hours.
    #[serde(default)]
    pub work_schedule: WorkSchedule,
    /// Notification preferences.
    #[serde(default)]
    pub notification_settings: NotificationSettings,
    /// Trade skills.
    #[serde(default)]
    pub skills: Vec<String>,
    /// Certifications held.
    #[serde(default)]
    pub certifications: Vec<String>,
    /// Administrator notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Optional emergency contact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<EmergencyContactForm>,
}

fn default_active() -> bool {
    true
}

fn known_permissions<'de, D>(deserializer: D) -> Result<CapabilityMatrix, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, bool>::deserialize(deserializer)?;
    let grants: BTreeMap<MobilePermission, bool> = raw
        .into_iter()
        .filter_map(|(key, granted)| {
            key.parse::<MobilePermission>()
                .ok()
                .map(|permission| (permission, granted))
        })
        .collect();

    Ok(CapabilityMatrix::from(grants))
}

/// Emergency contact inputs; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContactForm {
    /// Contact name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Contact phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Relationship to the collaborator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
}

impl CollaboratorForm {
    /// Creates a blank form for a new collaborator.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            phone: None,
            role: crate::DEFAULT_ROLE.to_owned(),
            is_active: true,
            mobile_permissions: CapabilityMatrix::new(),
            work_schedule: WorkSchedule::default(),
            notification_settings: NotificationSettings::default(),
            skills: Vec::new(),
            certifications: Vec::new(),
            notes: None,
            emergency_contact: None,
        }
    }

    /// Prefills an edit form from a loaded profile.
    #[must_use]
    pub fn from_profile(profile: &CollaboratorProfile) -> Self {
        Self {
            full_name: profile.full_name.clone(),
            email: profile.email.clone(),
            phone: Some(profile.phone.clone()),
            role: profile.role.clone(),
            is_active: profile.is_active,
            mobile_permissions: profile.mobile_permissions.clone(),
            work_schedule: profile.work_schedule.clone(),
            notification_settings: profile.notification_settings,
            skills: profile.skills.clone(),
            certifications: profile.certifications.clone(),
            notes: Some(profile.notes.clone()),
            emergency_contact: profile
                .emergency_contact
                .as_ref()
                .map(EmergencyContactForm::from_contact),
        }
    }
}

impl EmergencyContactForm {
    fn from_contact(contact: &EmergencyContact) -> Self {
        Self {
            name: Some(contact.name.clone()),
            phone: Some(contact.phone.clone()),
            relationship: Some(contact.relationship.clone()),
        }
    }
}

/// Whether a form field must be filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRequirement {
    /// The field must hold a valid value.
    Required,
    /// Missing or empty is accepted; a non-empty value must still be valid.
    Optional,
}

/// Validation rules for a collaborator form context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollaboratorFormSchema {
    /// Phone requirement in this context.
    pub phone: FieldRequirement,
}

impl Default for CollaboratorFormSchema {
    fn default() -> Self {
        Self::strict()
    }
}

impl CollaboratorFormSchema {
    /// Rules for the administrator creation form.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            phone: FieldRequirement::Required,
        }
    }

    /// Rules for contexts where the phone may be left empty.
    #[must_use]
    pub fn with_optional_phone() -> Self {
        Self {
            phone: FieldRequirement::Optional,
        }
    }

    /// Parses a raw payload into a form.
    ///
    /// Fails only when a JSON value has the wrong type for its field.
    pub fn parse(&self, payload: &Value) -> AppResult<CollaboratorForm> {
        if !payload.is_object() {
            return Err(AppError::Validation(
                "collaborator form payload must be a JSON object".to_owned(),
            ));
        }

        CollaboratorForm::deserialize(payload).map_err(|error| {
            AppError::Validation(format!("collaborator form payload is malformed: {error}"))
        })
    }

    /// Parses and validates a raw payload.
    pub fn validate_json(&self, payload: &Value) -> AppResult<FieldErrors> {
        let form = self.parse(payload)?;
        Ok(self.validate(&form))
    }

    /// Validates a form and reports one message per failing field.
    #[must_use]
    pub fn validate(&self, form: &CollaboratorForm) -> FieldErrors {
        let mut errors = FieldErrors::new();

        let name_length = form.full_name.trim().chars().count();
        if name_length < FULL_NAME_MIN_LENGTH {
            errors.insert(
                "fullName",
                format!("must be at least {FULL_NAME_MIN_LENGTH} characters"),
            );
        } else if name_length > FULL_NAME_MAX_LENGTH {
            errors.insert(
                "fullName",
                format!("must not exceed {FULL_NAME_MAX_LENGTH} characters"),
            );
        }

        if let Err(AppError::Validation(message)) = EmailAddress::new(form.email.as_str()) {
            errors.insert("email", message);
        }

        check_phone(&mut errors, "phone", form.phone.as_deref(), self.phone);

        if form.role.trim().is_empty() {
            errors.insert("role", "is required");
        }

        if let Some(notes) = &form.notes
            && notes.chars().count() > NOTES_MAX_LENGTH
        {
            errors.insert(
                "notes",
                format!("must not exceed {NOTES_MAX_LENGTH} characters"),
            );
        }

        check_labels(&mut errors, "skills", &form.skills);
        check_labels(&mut errors, "certifications", &form.certifications);
        check_schedule(&mut errors, &form.work_schedule);

        if let Some(contact) = &form.emergency_contact {
            check_phone(
                &mut errors,
                "emergencyContact.phone",
                contact.phone.as_deref(),
                FieldRequirement::Optional,
            );
        }

        errors
    }
}

fn check_phone(
    errors: &mut FieldErrors,
    field: &str,
    phone: Option<&str>,
    requirement: FieldRequirement,
) {
    let value = phone.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        if requirement == FieldRequirement::Required {
            errors.insert(field, "is required");
        }
        return;
    }

    if value.chars().count() < PHONE_MIN_LENGTH {
        errors.insert(
            field,
            format!("must be at least {PHONE_MIN_LENGTH} characters"),
        );
    }
}

fn check_labels(errors: &mut FieldErrors, field: &str, labels: &[String]) {
    for (index, label) in labels.iter().enumerate() {
        if label.trim().is_empty() {
            errors.insert(format!("{field}[{index}]"), "must not be empty");
        }
    }
}

fn check_schedule(errors: &mut FieldErrors, schedule: &WorkSchedule) {
    for (weekday, entry) in schedule.iter() {
        let start = parse_time_of_day(&entry.start);
        let end = parse_time_of_day(&entry.end);

        if start.is_none() {
            errors.insert(format!("workSchedule.{weekday}.start"), "must use HH:MM");
        }
        if end.is_none() {
            errors.insert(format!("workSchedule.{weekday}.end"), "must use HH:MM");
        }

        if let (Some(start), Some(end)) = (start, end)
            && entry.is_working
            && end <= start
        {
            errors.insert(format!("workSchedule.{weekday}.end"), "must be after start");
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{CollaboratorForm, CollaboratorFormSchema, EmergencyContactForm};
    use crate::{DaySchedule, MobilePermission, Weekday};

    fn valid_form() -> CollaboratorForm {
        CollaboratorForm {
            full_name: "Marc Dubois".to_owned(),
            email: "marc@plomberie.fr".to_owned(),
            phone: Some("0612345678".to_owned()),
            ..CollaboratorForm::blank()
        }
    }

    #[test]
    fn valid_form_has_no_errors() {
        assert!(CollaboratorFormSchema::strict().validate(&valid_form()).is_empty());
    }

    #[test]
    fn one_character_name_is_rejected() {
        let form = CollaboratorForm {
            full_name: "A".to_owned(),
            ..valid_form()
        };
        let errors = CollaboratorFormSchema::strict().validate(&form);
        assert_eq!(errors.get("fullName"), Some("must be at least 2 characters"));
    }

    #[test]
    fn empty_phone_depends_on_context() {
        let form = CollaboratorForm {
            phone: Some(String::new()),
            ..valid_form()
        };

        let optional = CollaboratorFormSchema::with_optional_phone();
        assert!(optional.validate(&form).is_empty());
        assert!(CollaboratorFormSchema::strict().validate(&form).contains("phone"));
    }

    #[test]
    fn short_phone_is_rejected_in_every_context() {
        let form = CollaboratorForm {
            phone: Some("06123".to_owned()),
            ..valid_form()
        };

        for schema in [
            CollaboratorFormSchema::strict(),
            CollaboratorFormSchema::with_optional_phone(),
        ] {
            assert_eq!(
                schema.validate(&form).get("phone"),
                Some("must be at least 10 characters")
            );
        }
    }

    #[test]
    fn blank_role_and_bad_email_are_reported_together() {
        let form = CollaboratorForm {
            role: " ".to_owned(),
            email: "marc".to_owned(),
            ..valid_form()
        };
        let errors = CollaboratorFormSchema::strict().validate(&form);
        assert!(errors.contains("role"));
        assert!(errors.contains("email"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn schedule_entries_are_checked() {
        let mut form = valid_form();
        form.work_schedule
            .set_day(Weekday::Tuesday, DaySchedule::new("18:00", "08:00", true));
        form.work_schedule
            .set_day(Weekday::Sunday, DaySchedule::new("9h", "17:00", false));

        let errors = CollaboratorFormSchema::strict().validate(&form);
        assert_eq!(errors.get("workSchedule.tuesday.end"), Some("must be after start"));
        assert_eq!(errors.get("workSchedule.sunday.start"), Some("must use HH:MM"));
    }

    #[test]
    fn emergency_contact_fields_accept_empty_strings() {
        let form = CollaboratorForm {
            emergency_contact: Some(EmergencyContactForm {
                name: Some(String::new()),
                phone: Some(String::new()),
                relationship: None,
            }),
            ..valid_form()
        };
        assert!(CollaboratorFormSchema::strict().validate(&form).is_empty());
    }

    #[test]
    fn missing_fields_become_field_errors() {
        let errors = CollaboratorFormSchema::strict().validate_json(&json!({}));
        let errors = errors.unwrap_or_else(|_| panic!("structurally valid payload"));
        assert!(errors.contains("fullName"));
        assert!(errors.contains("email"));
        assert!(errors.contains("phone"));
        assert!(errors.contains("role"));
        assert!(!errors.contains("notes"));
    }

    #[test]
    fn wrong_json_types_are_rejected_outright() {
        let schema = CollaboratorFormSchema::strict();
        assert!(schema.validate_json(&json!({ "fullName": 12 })).is_err());
        assert!(schema.validate_json(&json!({ "skills": "plumbing" })).is_err());
        assert!(schema.validate_json(&json!(["not", "an", "object"])).is_err());
        assert!(
            schema
                .validate_json(&json!({ "mobilePermissions": { "canViewJobs": "yes" } }))
                .is_err()
        );
    }

    #[test]
    fn unknown_keys_are_ignored_at_every_level() {
        let payload = json!({
            "fullName": "Marc Dubois",
            "email": "marc@plomberie.fr",
            "phone": "0612345678",
            "role": "Worker",
            "someExtraField": true,
            "mobilePermissions": { "canViewJobs": true, "canLaunchRockets": true },
        });

        let form = CollaboratorFormSchema::strict()
            .parse(&payload)
            .unwrap_or_else(|error| panic!("payload should parse: {error}"));

        assert_eq!(form.mobile_permissions.len(), 35);
        assert!(form.mobile_permissions.get(MobilePermission::CanViewJobs));
        assert_eq!(form.mobile_permissions.granted().count(), 1);
        assert!(CollaboratorFormSchema::strict().validate(&form).is_empty());
    }

    #[test]
    fn form_body_omits_unset_optionals() {
        let value = serde_json::to_value(CollaboratorForm::blank()).unwrap_or_default();
        assert!(value.get("phone").is_none());
        assert!(value.get("emergencyContact").is_none());
        assert_eq!(value["role"], "Worker");
    }
}
