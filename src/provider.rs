//! Identity sources the shield loads users from.

use crate::{error::Result, identifier::Identifier, user::Authenticatable};
use dashmap::DashMap;
use std::sync::Arc;

/// Supplies users by identity key.
///
/// Implementations may hit a database or a remote directory; the shield calls
/// them synchronously and propagates their errors.
pub trait UserProvider: Send + Sync {
    /// The user type this provider hands out.
    type User: Authenticatable;

    /// Load a user, or `None` if the identifier is unknown.
    fn retrieve_by_id(&self, id: &Identifier) -> Result<Option<Arc<Self::User>>>;
}

/// In-memory provider using DashMap for thread safety.
///
/// Clones share the same user table, so one provider can back many shields.
#[derive(Debug)]
pub struct MemoryUserProvider<U> {
    users: Arc<DashMap<Identifier, Arc<U>>>,
}

impl<U> Clone for MemoryUserProvider<U> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
        }
    }
}

impl<U> Default for MemoryUserProvider<U> {
    fn default() -> Self {
        Self {
            users: Arc::new(DashMap::new()),
        }
    }
}

impl<U: Authenticatable> MemoryUserProvider<U> {
    /// Create a new, empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a user under its identity key, replacing any previous one.
    pub fn store_user(&self, user: U) -> Arc<U> {
        let user = Arc::new(user);
        self.users.insert(user.auth_identifier(), Arc::clone(&user));
        user
    }

    /// Delete a user.
    pub fn remove_user(&self, id: &Identifier) -> bool {
        self.users.remove(id).is_some()
    }

    /// Get the number of stored users.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Clear all stored users.
    pub fn clear(&self) {
        self.users.clear();
    }
}

impl<U: Authenticatable> UserProvider for MemoryUserProvider<U> {
    type User = U;

    fn retrieve_by_id(&self, id: &Identifier) -> Result<Option<Arc<U>>> {
        Ok(self.users.get(id).map(|entry| Arc::clone(entry.value())))
    }
}
