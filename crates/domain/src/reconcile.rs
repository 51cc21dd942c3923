//! Lenient conversion of loaded collaborator records into full profiles.
//!
//! Server payloads may omit fields, use `name` instead of `fullName`, carry
//! nulls or values of the wrong JSON type. Every field resolves to its value
//! when usable and to its default otherwise; nothing here returns an error.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};

use crate::{
    CapabilityMatrix, CollaboratorProfile, DEFAULT_ROLE, DaySchedule, EmergencyContact,
    MobilePermission, NotificationSettings, RolePermissionBinding, UNKNOWN_NAME, Weekday,
    WorkSchedule,
};

/// Builds a complete profile from a loaded record.
///
/// `now` becomes `createdAt` when the record has no usable creation date.
/// Non-object input is read as an empty object.
#[must_use]
pub fn reconcile_collaborator(raw: &Value, now: DateTime<Utc>) -> CollaboratorProfile {
    let empty = Map::new();
    let record = raw.as_object().unwrap_or(&empty);

    let full_name = non_blank_string(record, "fullName")
        .or_else(|| non_blank_string(record, "name"))
        .unwrap_or_else(|| UNKNOWN_NAME.to_owned());

    CollaboratorProfile {
        id: identifier(record.get("id")).unwrap_or_default(),
        full_name,
        email: string(record, "email").unwrap_or_default(),
        phone: string(record, "phone").unwrap_or_default(),
        role: non_blank_string(record, "role").unwrap_or_else(|| DEFAULT_ROLE.to_owned()),
        is_active: record
            .get("isActive")
            .and_then(Value::as_bool)
            .unwrap_or(true),
        mobile_permissions: capability_matrix(record.get("mobilePermissions")),
        role_permissions: role_bindings(record.get("rolePermissions")),
        work_schedule: work_schedule(record.get("workSchedule")),
        notification_settings: notification_settings(record.get("notificationSettings")),
        created_at: record.get("createdAt").and_then(timestamp).unwrap_or(now),
        last_active: record.get("lastActive").and_then(timestamp),
        total_jobs_completed: record
            .get("totalJobsCompleted")
            .and_then(count)
            .unwrap_or(0),
        average_rating: record
            .get("averageRating")
            .and_then(Value::as_f64)
            .filter(|rating| rating.is_finite() && *rating >= 0.0)
            .unwrap_or(0.0),
        skills: string_list(record.get("skills")),
        certifications: string_list(record.get("certifications")),
        notes: string(record, "notes").unwrap_or_default(),
        emergency_contact: emergency_contact(record.get("emergencyContact")),
    }
}

/// Reconciles a loaded list, keeping input order.
#[must_use]
pub fn reconcile_collaborators(raw: &[Value], now: DateTime<Utc>) -> Vec<CollaboratorProfile> {
    raw.iter()
        .map(|record| reconcile_collaborator(record, now))
        .collect()
}

fn string(record: &Map<String, Value>, key: &str) -> Option<String> {
    record.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn non_blank_string(record: &Map<String, Value>, key: &str) -> Option<String> {
    string(record, key).filter(|value| !value.trim().is_empty())
}

fn identifier(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    }
}

// Per-key defaulting: a partial matrix never drops unrelated keys.
fn capability_matrix(value: Option<&Value>) -> CapabilityMatrix {
    let mut matrix = CapabilityMatrix::new();
    let Some(grants) = value.and_then(Value::as_object) else {
        return matrix;
    };

    for permission in MobilePermission::all() {
        let granted = grants
            .get(permission.as_str())
            .and_then(Value::as_bool)
            .unwrap_or(false);
        matrix.set(*permission, granted);
    }

    matrix
}

// Whole-object substitution: a present schedule is kept even when days are
// missing.
fn work_schedule(value: Option<&Value>) -> WorkSchedule {
    let Some(days) = value.and_then(Value::as_object) else {
        return WorkSchedule::default();
    };

    WorkSchedule::from_days(days.iter().filter_map(|(name, entry)| {
        let weekday = Weekday::parse(name)?;
        let entry = entry.as_object()?;
        Some((
            weekday,
            DaySchedule {
                start: string(entry, "start").unwrap_or_default(),
                end: string(entry, "end").unwrap_or_default(),
                is_working: entry
                    .get("isWorking")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            },
        ))
    }))
}

fn notification_settings(value: Option<&Value>) -> NotificationSettings {
    let Some(settings) = value.and_then(Value::as_object) else {
        return NotificationSettings::default();
    };

    let toggle = |key: &str| settings.get(key).and_then(Value::as_bool).unwrap_or(false);

    NotificationSettings {
        email_notifications: toggle("emailNotifications"),
        sms_notifications: toggle("smsNotifications"),
        push_notifications: toggle("pushNotifications"),
        job_assignments: toggle("jobAssignments"),
        status_updates: toggle("statusUpdates"),
        deadline_reminders: toggle("deadlineReminders"),
        system_alerts: toggle("systemAlerts"),
    }
}

fn role_bindings(value: Option<&Value>) -> Vec<RolePermissionBinding> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(Value::as_object)
        .map(|binding| RolePermissionBinding {
            role_id: identifier(binding.get("roleId")).unwrap_or_default(),
            role_name: string(binding, "roleName").unwrap_or_default(),
            description: string(binding, "description").unwrap_or_default(),
            permissions: binding
                .get("permissions")
                .and_then(Value::as_array)
                .map(|keys| {
                    keys.iter()
                        .filter_map(Value::as_str)
                        .filter_map(|key| key.parse::<MobilePermission>().ok())
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect()
}

fn emergency_contact(value: Option<&Value>) -> Option<EmergencyContact> {
    let contact = value?.as_object()?;
    Some(EmergencyContact {
        name: string(contact, "name").unwrap_or_default(),
        phone: string(contact, "phone").unwrap_or_default(),
        relationship: string(contact, "relationship").unwrap_or_default(),
    })
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

fn count(value: &Value) -> Option<u32> {
    if let Some(whole) = value.as_u64() {
        return u32::try_from(whole).ok();
    }

    let fractional = value.as_f64()?;
    if !fractional.is_finite() || fractional < 0.0 || fractional > f64::from(u32::MAX) {
        return None;
    }

    // 12.7 completed jobs reads as 12.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let whole = fractional as u32;
    Some(whole)
}

/// Accepts RFC 3339 strings, `YYYY-MM-DD` dates and epoch milliseconds.
fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => {
            let text = text.trim();
            DateTime::parse_from_rfc3339(text)
                .map(|parsed| parsed.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDate::parse_from_str(text, "%Y-%m-%d")
                        .ok()
                        .and_then(|date| date.and_hms_opt(0, 0, 0))
                        .map(|midnight| midnight.and_utc())
                })
        }
        Value::Number(millis) => millis.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}
