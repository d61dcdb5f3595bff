//! Owned resources for ownership checks.

use crate::{
    error::{Error, Result},
    identifier::Identifier,
};
use std::collections::HashMap;

/// Something that belongs to a user.
pub trait Ownership {
    /// Identity key of the owning user.
    fn owner_identifier(&self) -> Identifier;
}

/// A resource represents something that is owned by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// Unique identifier for the resource.
    id: String,
    /// Type of resource (e.g., "document", "project").
    resource_type: String,
    /// Identity key of the owner.
    owner: Identifier,
    /// Additional attributes for the resource.
    attributes: HashMap<String, String>,
}

impl Resource {
    /// Create a new resource with validation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidResource`] if the ID or resource type is blank
    /// or contains null characters.
    pub fn new_checked(
        id: impl Into<String>,
        resource_type: impl Into<String>,
        owner: impl Into<Identifier>,
    ) -> Result<Self> {
        let id = id.into();
        let resource_type = resource_type.into();

        for (field, value) in [("id", &id), ("resource type", &resource_type)] {
            if value.trim().is_empty() || value.contains('\0') {
                return Err(Error::InvalidResource(format!(
                    "Resource {field} cannot be blank or contain null characters: '{value}'"
                )));
            }
        }

        Ok(Self {
            id,
            resource_type,
            owner: owner.into(),
            attributes: HashMap::new(),
        })
    }

    /// Create a new resource.
    ///
    /// # Panics
    ///
    /// This method panics if the ID or resource type is blank or contains
    /// null characters. For non-panicking validation, use `new_checked`.
    pub fn new(
        id: impl Into<String>,
        resource_type: impl Into<String>,
        owner: impl Into<Identifier>,
    ) -> Self {
        match Self::new_checked(id, resource_type, owner) {
            Ok(resource) => resource,
            Err(e) => panic!("Resource validation failed: {}", e),
        }
    }

    /// Get the resource's unique identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the resource type.
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Get the owner's identity key.
    pub fn owner(&self) -> &Identifier {
        &self.owner
    }

    /// Hand the resource to another owner.
    pub fn transfer_to(&mut self, owner: impl Into<Identifier>) {
        self.owner = owner.into();
    }

    /// Add an attribute to the resource.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Get an attribute value.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(|s| s.as_str())
    }
}

impl Ownership for Resource {
    fn owner_identifier(&self) -> Identifier {
        self.owner.clone()
    }
}
