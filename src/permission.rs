//! The merged permission index and permission queries.

use crate::identifier::Identifier;
use indexmap::IndexMap;
use std::fmt;

/// Contributor name recorded for permissions granted directly to a user.
pub const AUTO_CONTRIBUTOR: &str = "Auto";

/// The origin of a permission held in a [`PermissionIndex`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "persistence", derive(serde::Serialize, serde::Deserialize))]
pub enum Contributor {
    /// Granted by a resolved role.
    Role(Identifier),
    /// Granted directly to the user, outside any role.
    Auto,
}

impl Contributor {
    /// Returns the role identifier, or `None` for a direct grant.
    pub fn role(&self) -> Option<&Identifier> {
        match self {
            Contributor::Role(id) => Some(id),
            Contributor::Auto => None,
        }
    }
}

impl fmt::Display for Contributor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contributor::Role(id) => write!(f, "{id}"),
            Contributor::Auto => f.write_str(AUTO_CONTRIBUTOR),
        }
    }
}

impl From<Identifier> for Contributor {
    fn from(id: Identifier) -> Self {
        Contributor::Role(id)
    }
}

/// Permission name to contributor list, kept in insertion order.
///
/// A name is present iff at least one contributor is listed for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "persistence", derive(serde::Serialize, serde::Deserialize))]
pub struct PermissionIndex {
    entries: IndexMap<String, Vec<Contributor>>,
}

impl PermissionIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a contributor to a permission, creating the entry if needed.
    ///
    /// A contributor already listed for the permission is not appended again.
    pub fn append(&mut self, permission: impl Into<String>, contributor: Contributor) {
        let contributors = self.entries.entry(permission.into()).or_default();
        if !contributors.contains(&contributor) {
            contributors.push(contributor);
        }
    }

    /// Insert a permission with a single contributor unless it is already present.
    ///
    /// Returns `true` if the permission was added.
    pub fn insert_if_absent(
        &mut self,
        permission: impl Into<String>,
        contributor: Contributor,
    ) -> bool {
        let permission = permission.into();
        if self.entries.contains_key(&permission) {
            return false;
        }
        self.entries.insert(permission, vec![contributor]);
        true
    }

    /// Drop a permission and all of its contributors.
    pub fn remove(&mut self, permission: &str) -> bool {
        self.entries.shift_remove(permission).is_some()
    }

    /// Remove one contributor from a permission, dropping the permission once
    /// nobody contributes it any more.
    ///
    /// Returns `false` when the permission is absent or the contributor is not
    /// listed for it; the index is left untouched in both cases.
    pub fn remove_contributor(&mut self, permission: &str, contributor: &Contributor) -> bool {
        let Some(contributors) = self.entries.get_mut(permission) else {
            return false;
        };
        let Some(position) = contributors.iter().position(|c| c == contributor) else {
            return false;
        };

        contributors.remove(position);
        if contributors.is_empty() {
            self.entries.shift_remove(permission);
        }
        true
    }

    /// Check whether a permission is present.
    pub fn contains(&self, permission: &str) -> bool {
        self.entries.contains_key(permission)
    }

    /// Contributors of a permission, in the order they were recorded.
    pub fn contributors(&self, permission: &str) -> Option<&[Contributor]> {
        self.entries.get(permission).map(Vec::as_slice)
    }

    /// Check whether any of the given names is present.
    pub fn contains_any<S: AsRef<str>>(&self, permissions: &[S]) -> bool {
        permissions.iter().any(|p| self.contains(p.as_ref()))
    }

    /// All permission names, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of distinct permissions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the index holds no permission.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every permission.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// One or more permission names an authorization check asks about.
///
/// Single names and lists are accepted alike; a list is granted when any of
/// its names is held.
pub trait PermissionQuery {
    /// The requested names.
    fn permission_names(&self) -> Vec<&str>;
}

impl PermissionQuery for str {
    fn permission_names(&self) -> Vec<&str> {
        vec![self]
    }
}

impl PermissionQuery for String {
    fn permission_names(&self) -> Vec<&str> {
        vec![self.as_str()]
    }
}

impl PermissionQuery for [&str] {
    fn permission_names(&self) -> Vec<&str> {
        self.to_vec()
    }
}

impl PermissionQuery for [String] {
    fn permission_names(&self) -> Vec<&str> {
        self.iter().map(String::as_str).collect()
    }
}

impl<const N: usize> PermissionQuery for [&str; N] {
    fn permission_names(&self) -> Vec<&str> {
        self.to_vec()
    }
}

impl<const N: usize> PermissionQuery for [String; N] {
    fn permission_names(&self) -> Vec<&str> {
        self.iter().map(String::as_str).collect()
    }
}

impl PermissionQuery for Vec<&str> {
    fn permission_names(&self) -> Vec<&str> {
        self.clone()
    }
}

impl PermissionQuery for Vec<String> {
    fn permission_names(&self) -> Vec<&str> {
        self.iter().map(String::as_str).collect()
    }
}
