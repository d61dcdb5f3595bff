//! Request hook that resolves the authenticated user before a handler runs.

use crate::{
    error::Result,
    provider::UserProvider,
    shield::{Shield, ShieldConfig},
};

/// Forces user resolution ahead of the wrapped handler.
///
/// Handlers then query a fully resolved shield instead of relying on the
/// lazy resolution inside [`Shield::user`]. The hook only acts when the
/// host's configured auth driver is the shield.
#[derive(Debug, Clone)]
pub struct ResolveAuthUser {
    enabled: bool,
}

impl ResolveAuthUser {
    /// Create the hook for the host's configuration.
    pub fn new(config: &ShieldConfig) -> Self {
        Self {
            enabled: config.is_shield_driver(),
        }
    }

    /// Whether the hook resolves users.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Resolve the current user, then hand the request to `next`.
    ///
    /// # Errors
    ///
    /// Propagates user provider failures; `next` is not called then.
    pub fn handle<P, R, T, F>(&self, shield: &mut Shield<P>, request: R, next: F) -> Result<T>
    where
        P: UserProvider,
        F: FnOnce(&mut Shield<P>, R) -> T,
    {
        if self.enabled {
            shield.user()?;
        }

        Ok(next(shield, request))
    }
}
