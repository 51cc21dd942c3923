use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{MobilePermission, PermissionCategory, RolePermissionBinding};

/// Total mapping of every permission key to a boolean grant.
///
/// The matrix always holds all keys. Bulk operations return a new matrix and
/// leave the receiver untouched, so form state can be swapped wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<MobilePermission, bool>",
    into = "BTreeMap<MobilePermission, bool>"
)]
pub struct CapabilityMatrix {
    grants: BTreeMap<MobilePermission, bool>,
}

impl CapabilityMatrix {
    /// Creates a matrix with every permission revoked.
    #[must_use]
    pub fn new() -> Self {
        Self::filled(false)
    }

    /// Creates a matrix with every permission set to `value`.
    #[must_use]
    pub fn filled(value: bool) -> Self {
        Self {
            grants: MobilePermission::all()
                .iter()
                .map(|permission| (*permission, value))
                .collect(),
        }
    }

    /// Creates a matrix granting exactly the given permissions.
    #[must_use]
    pub fn from_granted(permissions: impl IntoIterator<Item = MobilePermission>) -> Self {
        let mut matrix = Self::new();
        for permission in permissions {
            matrix.grants.insert(permission, true);
        }
        matrix
    }

    /// Returns whether a permission is granted.
    #[must_use]
    pub fn get(&self, permission: MobilePermission) -> bool {
        self.grants.get(&permission).copied().unwrap_or(false)
    }

    /// Sets a single permission in place.
    pub fn set(&mut self, permission: MobilePermission, value: bool) {
        self.grants.insert(permission, value);
    }

    /// Returns a copy with a single permission changed.
    #[must_use]
    pub fn with(&self, permission: MobilePermission, value: bool) -> Self {
        let mut next = self.clone();
        next.set(permission, value);
        next
    }

    /// Returns a copy with every permission set to `value`.
    #[must_use]
    pub fn set_all(&self, value: bool) -> Self {
        Self::filled(value)
    }

    /// Returns a copy where only the category's permissions are set to `value`.
    #[must_use]
    pub fn set_category(&self, category: PermissionCategory, value: bool) -> Self {
        let mut next = self.clone();
        for permission in category.permissions() {
            next.grants.insert(*permission, value);
        }
        next
    }

    /// Same as [`Self::set_category`] with a category name from a UI control.
    ///
    /// Unknown names return an unchanged copy.
    #[must_use]
    pub fn set_category_named(&self, category_name: &str, value: bool) -> Self {
        match PermissionCategory::parse(category_name) {
            Some(category) => self.set_category(category, value),
            None => self.clone(),
        }
    }

    /// Iterates granted permissions in key order.
    pub fn granted(&self) -> impl Iterator<Item = MobilePermission> + '_ {
        self.grants
            .iter()
            .filter_map(|(permission, granted)| granted.then_some(*permission))
    }

    /// Counts granted permissions inside a category.
    #[must_use]
    pub fn granted_count_in(&self, category: PermissionCategory) -> usize {
        category
            .permissions()
            .iter()
            .filter(|permission| self.get(**permission))
            .count()
    }

    /// Returns true when every permission of the category is granted.
    #[must_use]
    pub fn is_category_fully_granted(&self, category: PermissionCategory) -> bool {
        self.granted_count_in(category) == category.permissions().len()
    }

    /// Returns a copy with role template grants layered on top.
    ///
    /// Bindings only add grants; explicit matrix grants are never revoked.
    #[must_use]
    pub fn apply_bindings(&self, bindings: &[RolePermissionBinding]) -> Self {
        let mut next = self.clone();
        for permission in bindings.iter().flat_map(|binding| binding.permissions.iter()) {
            next.grants.insert(*permission, true);
        }
        next
    }

    /// Iterates every `(permission, granted)` pair in key order.
    pub fn iter(&self) -> impl Iterator<Item = (MobilePermission, bool)> + '_ {
        self.grants
            .iter()
            .map(|(permission, granted)| (*permission, *granted))
    }

    /// Returns the number of keys held. Always the full key count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.grants.len()
    }

    /// Returns false for every constructed matrix.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

impl Default for CapabilityMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl From<BTreeMap<MobilePermission, bool>> for CapabilityMatrix {
    fn from(value: BTreeMap<MobilePermission, bool>) -> Self {
        let mut matrix = Self::new();
        matrix.grants.extend(value);
        matrix
    }
}

impl From<CapabilityMatrix> for BTreeMap<MobilePermission, bool> {
    fn from(value: CapabilityMatrix) -> Self {
        value.grants
    }
}
