use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CapabilityMatrix, MobilePermission, NotificationSettings, WorkSchedule};

/// Role name assigned when none is provided.
pub const DEFAULT_ROLE: &str = "Worker";

/// Display name used when a record carries no usable name.
///
/// Missing, non-string and whitespace-only names all fall back to it.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Coarse role template attached read-only to a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePermissionBinding {
    /// Stable role identifier.
    pub role_id: String,
    /// Role display name.
    pub role_name: String,
    /// Free-form role description.
    pub description: String,
    /// Permission keys granted by the role.
    pub permissions: Vec<MobilePermission>,
}

/// Person to call when a collaborator is unreachable on site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContact {
    /// Contact name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Relationship to the collaborator.
    pub relationship: String,
}

/// Fully populated collaborator record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaboratorProfile {
    /// Server identifier, empty for unsaved drafts.
    pub id: String,
    /// Display name.
    pub full_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Role label.
    pub role: String,
    /// Whether the collaborator can sign in.
    pub is_active: bool,
    /// Fine-grained mobile capabilities.
    pub mobile_permissions: CapabilityMatrix,
    /// Role templates attached by administrators.
    pub role_permissions: Vec<RolePermissionBinding>,
    /// Weekly working hours.
    pub work_schedule: WorkSchedule,
    /// Notification preferences.
    pub notification_settings: NotificationSettings,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last activity timestamp, if the collaborator ever signed in.
    pub last_active: Option<DateTime<Utc>>,
    /// Number of completed jobs.
    pub total_jobs_completed: u32,
    /// Average client rating.
    pub average_rating: f64,
    /// Trade skills.
    pub skills: Vec<String>,
    /// Certifications held.
    pub certifications: Vec<String>,
    /// Administrator notes.
    pub notes: String,
    /// Optional emergency contact.
    pub emergency_contact: Option<EmergencyContact>,
}

impl CollaboratorProfile {
    /// Creates the blank profile backing a creation form.
    #[must_use]
    pub fn new_draft(now: DateTime<Utc>) -> Self {
        Self {
            id: String::new(),
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            role: DEFAULT_ROLE.to_owned(),
            is_active: true,
            mobile_permissions: CapabilityMatrix::new(),
            role_permissions: Vec::new(),
            work_schedule: WorkSchedule::default(),
            notification_settings: NotificationSettings::default(),
            created_at: now,
            last_active: None,
            total_jobs_completed: 0,
            average_rating: 0.0,
            skills: Vec::new(),
            certifications: Vec::new(),
            notes: String::new(),
            emergency_contact: None,
        }
    }

    /// Returns the matrix with attached role templates layered on.
    #[must_use]
    pub fn effective_permissions(&self) -> CapabilityMatrix {
        self.mobile_permissions.apply_bindings(&self.role_permissions)
    }

    /// Returns whether the collaborator may use a permission.
    ///
    /// Inactive collaborators hold no effective permission.
    #[must_use]
    pub fn can(&self, permission: MobilePermission) -> bool {
        self.is_active && self.effective_permissions().get(permission)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{CollaboratorProfile, DEFAULT_ROLE, RolePermissionBinding};
    use crate::MobilePermission;

    #[test]
    fn draft_has_defaults() {
        let draft = CollaboratorProfile::new_draft(Utc::now());
        assert_eq!(draft.role, DEFAULT_ROLE);
        assert!(draft.work_schedule.is_complete());
        assert_eq!(draft.mobile_permissions.granted().count(), 0);
    }

    #[test]
    fn inactive_collaborator_has_no_effective_permission() {
        let mut profile = CollaboratorProfile::new_draft(Utc::now());
        profile.role_permissions.push(RolePermissionBinding {
            role_id: "lead".to_owned(),
            role_name: "Team lead".to_owned(),
            description: "Runs a crew".to_owned(),
            permissions: vec![MobilePermission::CanAssignJobs],
        });

        assert!(profile.can(MobilePermission::CanAssignJobs));
        profile.is_active = false;
        assert!(!profile.can(MobilePermission::CanAssignJobs));
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let profile = CollaboratorProfile::new_draft(Utc::now());
        let value = serde_json::to_value(&profile).unwrap_or_default();
        assert_eq!(value["fullName"], "");
        assert_eq!(value["mobilePermissions"]["canViewClients"], false);
        assert!(value["emergencyContact"].is_null());
    }
}
