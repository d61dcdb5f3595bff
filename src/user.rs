//! Authenticated identities and the capabilities they may expose.

use crate::{identifier::Identifier, role::AuthorizableRole};
use std::{collections::HashMap, fmt::Debug, sync::Arc};

/// An authenticated identity the shield can resolve permissions for.
///
/// Both capabilities are optional. `None` means the user type does not carry
/// that capability at all, which the shield treats the same as an empty list.
pub trait Authenticatable: Debug + Send + Sync {
    /// Stable identity key, compared against resource owners.
    fn auth_identifier(&self) -> Identifier;

    /// Roles held by this user.
    fn roles(&self) -> Option<Vec<Arc<dyn AuthorizableRole>>> {
        None
    }

    /// Permissions granted directly to this user, outside any role.
    fn permissions(&self) -> Option<Vec<String>> {
        None
    }
}

/// A user carrying roles and direct permission grants.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique identifier for the user.
    id: Identifier,
    /// Display name for the user.
    display_name: Option<String>,
    /// Roles held by the user.
    roles: Vec<Arc<dyn AuthorizableRole>>,
    /// Permissions granted directly.
    permissions: Vec<String>,
    /// Additional attributes for the user.
    attributes: HashMap<String, String>,
}

impl User {
    /// Create a new user without roles or permissions.
    pub fn new(id: impl Into<Identifier>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            roles: Vec::new(),
            permissions: Vec::new(),
            attributes: HashMap::new(),
        }
    }

    /// Get the user's identifier.
    pub fn id(&self) -> &Identifier {
        &self.id
    }

    /// Set the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Get the display name.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Give the user a role.
    pub fn with_role<R: AuthorizableRole + 'static>(self, role: R) -> Self {
        self.with_shared_role(Arc::new(role))
    }

    /// Give the user a role shared with other users.
    pub fn with_shared_role(mut self, role: Arc<dyn AuthorizableRole>) -> Self {
        self.roles.push(role);
        self
    }

    /// Grant a permission directly.
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.push(permission.into());
        self
    }

    /// Set an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Get an attribute value.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

impl Authenticatable for User {
    fn auth_identifier(&self) -> Identifier {
        self.id.clone()
    }

    fn roles(&self) -> Option<Vec<Arc<dyn AuthorizableRole>>> {
        Some(self.roles.clone())
    }

    fn permissions(&self) -> Option<Vec<String>> {
        Some(self.permissions.clone())
    }
}
