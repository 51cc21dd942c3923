//! Collaborator domain model, reconciliation and form rules.

#![forbid(unsafe_code)]

mod capability;
mod collaborator;
mod email;
mod form;
mod notification;
mod permission;
mod reconcile;
mod schedule;

pub use capability::CapabilityMatrix;
pub use collaborator::{
    CollaboratorProfile, DEFAULT_ROLE, EmergencyContact, RolePermissionBinding, UNKNOWN_NAME,
};
pub use email::{EMAIL_MAX_LENGTH, EmailAddress};
pub use form::{
    CollaboratorForm, CollaboratorFormSchema, EmergencyContactForm, FULL_NAME_MAX_LENGTH,
    FULL_NAME_MIN_LENGTH, FieldRequirement, NOTES_MAX_LENGTH, PHONE_MIN_LENGTH,
};
pub use notification::NotificationSettings;
pub use permission::{MobilePermission, PermissionCategory};
pub use reconcile::{reconcile_collaborator, reconcile_collaborators};
pub use schedule::{DaySchedule, Weekday, WorkSchedule, parse_time_of_day};
