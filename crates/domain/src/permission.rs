use std::fmt::{Display, Formatter};
use std::str::FromStr;

use fieldops_core::AppError;
use serde::{Deserialize, Serialize};

/// Fine-grained capabilities granted to a collaborator in the mobile app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MobilePermission {
    /// Allows browsing the client list.
    CanViewClients,
    /// Allows registering new clients.
    CanCreateClients,
    /// Allows editing client details.
    CanEditClients,
    /// Allows deleting clients.
    CanDeleteClients,
    /// Allows reading client contact details.
    CanViewClientContacts,
    /// Allows browsing jobs.
    CanViewJobs,
    /// Allows creating jobs.
    CanCreateJobs,
    /// Allows editing jobs.
    CanEditJobs,
    /// Allows deleting jobs.
    CanDeleteJobs,
    /// Allows assigning jobs to collaborators.
    CanAssignJobs,
    /// Allows reading reports.
    CanViewReports,
    /// Allows writing intervention reports.
    CanCreateReports,
    /// Allows exporting reports.
    CanExportReports,
    /// Allows sharing reports with clients.
    CanShareReports,
    /// Allows reading financial reports.
    CanViewFinancialReports,
    /// Allows browsing invoices.
    CanViewInvoices,
    /// Allows drafting invoices.
    CanCreateInvoices,
    /// Allows editing invoices.
    CanEditInvoices,
    /// Allows sending invoices to clients.
    CanSendInvoices,
    /// Allows marking invoices as paid.
    CanMarkInvoicesPaid,
    /// Allows clocking in and out.
    CanTrackTime,
    /// Allows reading time entries.
    CanViewTimeEntries,
    /// Allows correcting time entries.
    CanEditTimeEntries,
    /// Allows approving time entries.
    CanApproveTimeEntries,
    /// Allows deleting time entries.
    CanDeleteTimeEntries,
    /// Allows browsing the materials catalogue.
    CanViewMaterials,
    /// Allows recording materials used on a job.
    CanAddMaterials,
    /// Allows editing material entries.
    CanEditMaterials,
    /// Allows ordering materials from suppliers.
    CanOrderMaterials,
    /// Allows adjusting material stock levels.
    CanManageMaterialStock,
    /// Allows reading the message inbox.
    CanViewMessages,
    /// Allows sending messages.
    CanSendMessages,
    /// Allows deleting messages.
    CanDeleteMessages,
    /// Allows broadcasting messages to several recipients.
    CanSendBulkMessages,
    /// Allows editing message templates.
    CanManageMessageTemplates,
}

impl MobilePermission {
    /// Returns all known permission keys in display order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[MobilePermission] = &[
            MobilePermission::CanViewClients,
            MobilePermission::CanCreateClients,
            MobilePermission::CanEditClients,
            MobilePermission::CanDeleteClients,
            MobilePermission::CanViewClientContacts,
            MobilePermission::CanViewJobs,
            MobilePermission::CanCreateJobs,
            MobilePermission::CanEditJobs,
            MobilePermission::CanDeleteJobs,
            MobilePermission::CanAssignJobs,
            MobilePermission::CanViewReports,
            MobilePermission::CanCreateReports,
            MobilePermission::CanExportReports,
            MobilePermission::CanShareReports,
            MobilePermission::CanViewFinancialReports,
            MobilePermission::CanViewInvoices,
            MobilePermission::CanCreateInvoices,
            MobilePermission::CanEditInvoices,
            MobilePermission::CanSendInvoices,
            MobilePermission::CanMarkInvoicesPaid,
            MobilePermission::CanTrackTime,
            MobilePermission::CanViewTimeEntries,
            MobilePermission::CanEditTimeEntries,
            MobilePermission::CanApproveTimeEntries,
            MobilePermission::CanDeleteTimeEntries,
            MobilePermission::CanViewMaterials,
            MobilePermission::CanAddMaterials,
            MobilePermission::CanEditMaterials,
            MobilePermission::CanOrderMaterials,
            MobilePermission::CanManageMaterialStock,
            MobilePermission::CanViewMessages,
            MobilePermission::CanSendMessages,
            MobilePermission::CanDeleteMessages,
            MobilePermission::CanSendBulkMessages,
            MobilePermission::CanManageMessageTemplates,
        ];

        ALL
    }

    /// Returns the stable transport key for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CanViewClients => "canViewClients",
            Self::CanCreateClients => "canCreateClients",
            Self::CanEditClients => "canEditClients",
            Self::CanDeleteClients => "canDeleteClients",
            Self::CanViewClientContacts => "canViewClientContacts",
            Self::CanViewJobs => "canViewJobs",
            Self::CanCreateJobs => "canCreateJobs",
            Self::CanEditJobs => "canEditJobs",
            Self::CanDeleteJobs => "canDeleteJobs",
            Self::CanAssignJobs => "canAssignJobs",
            Self::CanViewReports => "canViewReports",
            Self::CanCreateReports => "canCreateReports",
            Self::CanExportReports => "canExportReports",
            Self::CanShareReports => "canShareReports",
            Self::CanViewFinancialReports => "canViewFinancialReports",
            Self::CanViewInvoices => "canViewInvoices",
            Self::CanCreateInvoices => "canCreateInvoices",
            Self::CanEditInvoices => "canEditInvoices",
            Self::CanSendInvoices => "canSendInvoices",
            Self::CanMarkInvoicesPaid => "canMarkInvoicesPaid",
            Self::CanTrackTime => "canTrackTime",
            Self::CanViewTimeEntries => "canViewTimeEntries",
            Self::CanEditTimeEntries => "canEditTimeEntries",
            Self::CanApproveTimeEntries => "canApproveTimeEntries",
            Self::CanDeleteTimeEntries => "canDeleteTimeEntries",
            Self::CanViewMaterials => "canViewMaterials",
            Self::CanAddMaterials => "canAddMaterials",
            Self::CanEditMaterials => "canEditMaterials",
            Self::CanOrderMaterials => "canOrderMaterials",
            Self::CanManageMaterialStock => "canManageMaterialStock",
            Self::CanViewMessages => "canViewMessages",
            Self::CanSendMessages => "canSendMessages",
            Self::CanDeleteMessages => "canDeleteMessages",
            Self::CanSendBulkMessages => "canSendBulkMessages",
            Self::CanManageMessageTemplates => "canManageMessageTemplates",
        }
    }

    /// Returns the category that owns this permission.
    #[must_use]
    pub fn category(&self) -> PermissionCategory {
        match self {
            Self::CanViewClients
            | Self::CanCreateClients
            | Self::CanEditClients
            | Self::CanDeleteClients
            | Self::CanViewClientContacts => PermissionCategory::Clients,
            Self::CanViewJobs
            | Self::CanCreateJobs
            | Self::CanEditJobs
            | Self::CanDeleteJobs
            | Self::CanAssignJobs => PermissionCategory::Jobs,
            Self::CanViewReports
            | Self::CanCreateReports
            | Self::CanExportReports
            | Self::CanShareReports
            | Self::CanViewFinancialReports => PermissionCategory::Reports,
            Self::CanViewInvoices
            | Self::CanCreateInvoices
            | Self::CanEditInvoices
            | Self::CanSendInvoices
            | Self::CanMarkInvoicesPaid => PermissionCategory::Invoicing,
            Self::CanTrackTime
            | Self::CanViewTimeEntries
            | Self::CanEditTimeEntries
            | Self::CanApproveTimeEntries
            | Self::CanDeleteTimeEntries => PermissionCategory::TimeTracking,
            Self::CanViewMaterials
            | Self::CanAddMaterials
            | Self::CanEditMaterials
            | Self::CanOrderMaterials
            | Self::CanManageMaterialStock => PermissionCategory::Materials,
            Self::CanViewMessages
            | Self::CanSendMessages
            | Self::CanDeleteMessages
            | Self::CanSendBulkMessages
            | Self::CanManageMessageTemplates => PermissionCategory::Communications,
        }
    }
}

impl Display for MobilePermission {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for MobilePermission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|permission| permission.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown permission key '{value}'")))
    }
}

/// Groups of permissions toggled together in the administration screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionCategory {
    /// Client records.
    Clients,
    /// Jobs and assignments.
    Jobs,
    /// Intervention and financial reports.
    Reports,
    /// Invoices.
    Invoicing,
    /// Time entries.
    TimeTracking,
    /// Materials and stock.
    Materials,
    /// Messaging.
    Communications,
}

impl PermissionCategory {
    /// Returns all categories in display order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[
            Self::Clients,
            Self::Jobs,
            Self::Reports,
            Self::Invoicing,
            Self::TimeTracking,
            Self::Materials,
            Self::Communications,
        ]
    }

    /// Returns the stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::Jobs => "jobs",
            Self::Reports => "reports",
            Self::Invoicing => "invoicing",
            Self::TimeTracking => "time_tracking",
            Self::Materials => "materials",
            Self::Communications => "communications",
        }
    }

    /// Returns the lowercase fragment shared by every key of the category.
    #[must_use]
    pub fn key_token(&self) -> &'static str {
        match self {
            Self::Clients => "client",
            Self::Jobs => "job",
            Self::Reports => "report",
            Self::Invoicing => "invoice",
            Self::TimeTracking => "time",
            Self::Materials => "material",
            Self::Communications => "message",
        }
    }

    /// Returns the permission keys of this category.
    #[must_use]
    pub fn permissions(&self) -> &'static [MobilePermission] {
        let all = MobilePermission::all();
        match self {
            Self::Clients => &all[0..5],
            Self::Jobs => &all[5..10],
            Self::Reports => &all[10..15],
            Self::Invoicing => &all[15..20],
            Self::TimeTracking => &all[20..25],
            Self::Materials => &all[25..30],
            Self::Communications => &all[30..35],
        }
    }

    /// Resolves the category of a transport key. Unknown keys are ungrouped.
    #[must_use]
    pub fn resolve_key(key: &str) -> Option<Self> {
        MobilePermission::from_str(key)
            .ok()
            .map(|permission| permission.category())
    }

    /// Parses a category name, ignoring case and word separators.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|character| !matches!(character, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "clients" | "client" => Some(Self::Clients),
            "jobs" | "job" => Some(Self::Jobs),
            "reports" | "report" => Some(Self::Reports),
            "invoicing" | "invoices" | "invoice" => Some(Self::Invoicing),
            "timetracking" | "time" => Some(Self::TimeTracking),
            "materials" | "material" => Some(Self::Materials),
            "communications" | "communication" | "messages" => Some(Self::Communications),
            _ => None,
        }
    }
}

impl Display for PermissionCategory {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}
