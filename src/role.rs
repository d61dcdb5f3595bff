//! Role definitions and the contract the shield resolves roles through.

use crate::{
    error::{Error, Result},
    identifier::Identifier,
};
use std::fmt::Debug;
use uuid::Uuid;

/// Anything that can be attached to a shield as a role.
///
/// The shield only reads roles: it keeps a shared reference and never
/// mutates them. Any representation (database rows, config entries, the
/// bundled [`Role`]) can implement this.
pub trait AuthorizableRole: Debug + Send + Sync {
    /// Stable key, unique among the roles attached to one shield.
    fn identifier(&self) -> Identifier;

    /// Permission names granted by holding this role.
    fn permissions(&self) -> &[String];
}

/// A role represents a collection of permissions that can be held by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "persistence", derive(serde::Serialize, serde::Deserialize))]
pub struct Role {
    /// Unique identifier for the role.
    id: Identifier,
    /// Human-readable name of the role.
    name: String,
    /// Optional description of the role.
    description: Option<String>,
    /// Permissions granted by this role, without duplicates.
    permissions: Vec<String>,
}

impl Role {
    /// Create a new role with the given name and a generated UUID identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), name)
    }

    /// Create a new role with a specific identifier.
    pub fn with_id(id: impl Into<Identifier>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            permissions: Vec::new(),
        }
    }

    /// Get the role's unique identifier.
    pub fn id(&self) -> &Identifier {
        &self.id
    }

    /// Get the role's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the role's description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Get the role's description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Add a permission to this role. Adding a permission twice has no effect.
    pub fn add_permission(mut self, permission: impl Into<String>) -> Self {
        self.insert_permission(permission.into());
        self
    }

    /// Add multiple permissions to this role.
    pub fn add_permissions<I, P>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        for permission in permissions {
            self.insert_permission(permission.into());
        }
        self
    }

    /// Remove a permission from this role.
    pub fn remove_permission(&mut self, permission: &str) {
        self.permissions.retain(|p| p != permission);
    }

    /// Check if this role grants a specific permission.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    fn insert_permission(&mut self, permission: String) {
        if !self.permissions.contains(&permission) {
            self.permissions.push(permission);
        }
    }
}

impl AuthorizableRole for Role {
    fn identifier(&self) -> Identifier {
        self.id.clone()
    }

    fn permissions(&self) -> &[String] {
        &self.permissions
    }
}

/// Builder for creating roles with a fluent API.
#[derive(Debug, Default)]
pub struct RoleBuilder {
    id: Option<Identifier>,
    name: Option<String>,
    description: Option<String>,
    permissions: Vec<String>,
}

impl RoleBuilder {
    /// Create a new role builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the role identifier. A UUID is generated when none is given.
    pub fn id(mut self, id: impl Into<Identifier>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the role name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the role description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a permission to the role.
    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.push(permission.into());
        self
    }

    /// Add multiple permissions to the role.
    pub fn permissions<I, P>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.permissions.extend(permissions.into_iter().map(Into::into));
        self
    }

    /// Build the role.
    pub fn build(self) -> Result<Role> {
        let name = self
            .name
            .ok_or_else(|| Error::InvalidConfiguration("Role name is required".to_string()))?;

        if self.permissions.iter().any(|p| p.trim().is_empty()) {
            return Err(Error::InvalidConfiguration(format!(
                "Role '{name}' has an empty permission name"
            )));
        }

        let mut role = match self.id {
            Some(id) => Role::with_id(id, name),
            None => Role::new(name),
        };

        if let Some(description) = self.description {
            role = role.with_description(description);
        }

        Ok(role.add_permissions(self.permissions))
    }
}
