//! The shield: per-session role and permission resolution.
//!
//! A [`Shield`] holds the authorization state derived for one authenticated
//! session. It resolves the current user's roles and direct grants into a
//! merged [`PermissionIndex`], caches that result until the user changes or
//! logs out, and answers `can` / `has_role` / `is_owner` queries against it.
//!
//! # State
//!
//! - **Attached roles**: every role handed to [`Shield::attach_role`].
//! - **Resolved roles**: the attached roles whose permissions are merged
//!   into the index. Always a subset of the attached roles.
//! - **Permission index**: permission name to the roles (or the `"Auto"`
//!   contributor for direct grants) responsible for it.
//!
//! Resolution is synchronous, so callers only ever observe the
//! [`ResolutionState::Empty`] or [`ResolutionState::Resolved`] states.
//!
//! # Concurrency
//!
//! A shield is not shared between requests. Mutation goes through
//! `&mut self`; each request or session builds its own shield over a shared
//! [`UserProvider`].

#[cfg(feature = "audit")]
use log::{debug, info, warn};

use crate::{
    error::{Error, Result},
    identifier::Identifier,
    metrics::ShieldMetrics,
    permission::{Contributor, PermissionIndex, PermissionQuery},
    provider::UserProvider,
    resource::Ownership,
    role::AuthorizableRole,
    user::Authenticatable,
};
use indexmap::IndexMap;
use std::{fmt, sync::Arc};

/// Driver name under which the host registers the shield.
pub const SHIELD_DRIVER: &str = "shield";

/// Permission that turns its holder into a super-user.
pub const SUPER_USER_PERMISSION: &str = "root";

/// Configuration for the shield.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "persistence", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "persistence", serde(default))]
pub struct ShieldConfig {
    /// Auth driver configured by the host application.
    pub driver: String,
    /// Permission granting unconditional access.
    pub super_user_permission: String,
    /// Keep a detached role's identifier in the attached set.
    pub retain_detached_roles: bool,
    /// Whether to emit per-check audit records.
    pub enable_audit: bool,
}

impl Default for ShieldConfig {
    fn default() -> Self {
        Self {
            driver: SHIELD_DRIVER.to_string(),
            super_user_permission: SUPER_USER_PERMISSION.to_string(),
            retain_detached_roles: false,
            enable_audit: true,
        }
    }
}

impl ShieldConfig {
    /// Whether the host's configured driver is the shield.
    pub fn is_shield_driver(&self) -> bool {
        self.driver == SHIELD_DRIVER
    }

    /// Check the configuration for values the shield cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.driver.trim().is_empty() {
            return Err(Error::InvalidConfiguration(
                "driver cannot be empty".to_string(),
            ));
        }
        if self.super_user_permission.trim().is_empty() {
            return Err(Error::InvalidConfiguration(
                "super_user_permission cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Load and validate a configuration from JSON. Missing fields take
    /// their default values.
    #[cfg(feature = "persistence")]
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Whether the current user's roles and permissions have been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    /// Nothing resolved yet: no user, or state was just reset.
    Empty,
    /// Resolution ran for the current user.
    Resolved,
}

/// Role and permission state for one authenticated session.
pub struct Shield<P>
where
    P: UserProvider,
{
    provider: P,
    config: ShieldConfig,
    metrics: ShieldMetrics,
    // Identity remembered by the session; the user object may not be loaded yet.
    session_id: Option<Identifier>,
    user: Option<Arc<P::User>>,
    attached_roles: IndexMap<Identifier, Arc<dyn AuthorizableRole>>,
    resolved_roles: IndexMap<Identifier, Arc<dyn AuthorizableRole>>,
    permissions: PermissionIndex,
    resolved: bool,
}

impl<P> Shield<P>
where
    P: UserProvider,
{
    /// Create a shield with default configuration.
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, ShieldConfig::default())
    }

    /// Create a shield with custom configuration.
    ///
    /// The configuration is taken as is. An empty `super_user_permission`
    /// turns a direct grant of `""` into a super-user grant, so configs
    /// built from untrusted input should go through [`Shield::try_with_config`].
    pub fn with_config(provider: P, config: ShieldConfig) -> Self {
        Self {
            provider,
            config,
            metrics: ShieldMetrics::new(),
            session_id: None,
            user: None,
            attached_roles: IndexMap::new(),
            resolved_roles: IndexMap::new(),
            permissions: PermissionIndex::new(),
            resolved: false,
        }
    }

    /// Create a shield after validating its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] when [`ShieldConfig::validate`] fails.
    pub fn try_with_config(provider: P, config: ShieldConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config(provider, config))
    }

    /// Report into a shared metrics collector.
    pub fn with_metrics(mut self, metrics: ShieldMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &ShieldConfig {
        &self.config
    }

    /// Get the metrics collector.
    pub fn metrics(&self) -> &ShieldMetrics {
        &self.metrics
    }

    /// Get the user provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Attach a role and merge its permissions.
    ///
    /// Attaching a role that is already resolved changes nothing in the
    /// permission index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthenticated`] when no user is set and no restored
    /// session loads one, or the provider's error when loading fails.
    pub fn attach_role(&mut self, role: Arc<dyn AuthorizableRole>) -> Result<()> {
        self.ensure_authenticated("attach a role")?;
        self.attach_role_unchecked(role);
        Ok(())
    }

    fn attach_role_unchecked(&mut self, role: Arc<dyn AuthorizableRole>) {
        let id = role.identifier();

        if self.attached_roles.contains_key(&id) {
            self.resolve_role(&role);
        }

        self.attached_roles.insert(id.clone(), Arc::clone(&role));
        self.resolve_role(&role);

        #[cfg(feature = "audit")]
        info!("Role '{id}' attached");
    }

    /// Merge a role's permissions into the index unless it is already resolved.
    ///
    /// Returns `true` if the role was merged by this call.
    pub fn resolve_role(&mut self, role: &Arc<dyn AuthorizableRole>) -> bool {
        let id = role.identifier();
        if self.resolved_roles.contains_key(&id) {
            return false;
        }

        for permission in role.permissions() {
            self.permissions
                .append(permission.as_str(), Contributor::Role(id.clone()));
        }

        self.resolved_roles.insert(id, Arc::clone(role));
        self.metrics.record_role_attachment();
        true
    }

    /// Get a resolved role by identifier.
    pub fn get_resolved_role(
        &self,
        identifier: impl Into<Identifier>,
    ) -> Option<&Arc<dyn AuthorizableRole>> {
        self.resolved_roles.get(&identifier.into())
    }

    /// Detach a resolved role and withdraw its contributions.
    ///
    /// Permissions another role or a direct grant also contributes stay in
    /// place. Returns `false` when no resolved role has this identifier.
    pub fn detach_role(&mut self, identifier: impl Into<Identifier>) -> bool {
        let identifier = identifier.into();
        let Some(role) = self.resolved_roles.get(&identifier).cloned() else {
            return false;
        };

        for permission in role.permissions() {
            self.remove_permission(permission, Some(&*role));
        }

        self.resolved_roles.shift_remove(&identifier);
        if !self.config.retain_detached_roles {
            self.attached_roles.shift_remove(&identifier);
        }
        self.metrics.record_role_detachment();

        #[cfg(feature = "audit")]
        info!("Role '{identifier}' detached");

        true
    }

    /// Grant a permission, attributed to `role` or to the `"Auto"` contributor.
    ///
    /// A permission already in the index is left as it is. Returns `true` if
    /// the permission was added.
    pub fn set_permission(
        &mut self,
        permission: impl Into<String>,
        role: Option<&dyn AuthorizableRole>,
    ) -> bool {
        let contributor = role.map_or(Contributor::Auto, |role| {
            Contributor::Role(role.identifier())
        });
        self.permissions.insert_if_absent(permission, contributor)
    }

    /// Remove a permission.
    ///
    /// Without a role the permission is dropped with all its contributors.
    /// With a role only that role's contribution is withdrawn, and the
    /// permission goes once nobody contributes it. Returns `false` if nothing
    /// was removed, including when `role` does not contribute the permission.
    pub fn remove_permission(
        &mut self,
        permission: &str,
        role: Option<&dyn AuthorizableRole>,
    ) -> bool {
        match role {
            None => self.permissions.remove(permission),
            Some(role) => self
                .permissions
                .remove_contributor(permission, &Contributor::Role(role.identifier())),
        }
    }

    /// Withdraw a direct grant, leaving role contributions in place.
    pub fn revoke_direct_permission(&mut self, permission: &str) -> bool {
        self.permissions
            .remove_contributor(permission, &Contributor::Auto)
    }

    /// Check whether a role is resolved.
    pub fn has_role(&self, identifier: impl Into<Identifier>) -> bool {
        self.resolved_roles.contains_key(&identifier.into())
    }

    /// Resolved role identifiers, in resolution order.
    pub fn roles(&self) -> Vec<Identifier> {
        self.resolved_roles.keys().cloned().collect()
    }

    /// Attached role identifiers, in attachment order.
    pub fn attached_roles(&self) -> Vec<Identifier> {
        self.attached_roles.keys().cloned().collect()
    }

    /// Check whether a role identifier is in the attached set.
    pub fn is_attached(&self, identifier: impl Into<Identifier>) -> bool {
        self.attached_roles.contains_key(&identifier.into())
    }

    /// Check whether the user holds any of the requested permissions.
    ///
    /// Super-users are granted everything.
    pub fn can<Q>(&self, permission: &Q) -> bool
    where
        Q: PermissionQuery + ?Sized,
    {
        if self.is_super_user() {
            self.metrics.record_permission_check(true, true);
            return true;
        }

        let requested = permission.permission_names();
        let granted = self.permissions.contains_any(requested.as_slice());
        self.metrics.record_permission_check(granted, false);

        #[cfg(feature = "audit")]
        if self.config.enable_audit {
            debug!(
                "Permission check {:?} for user '{}': {}",
                requested,
                self.id().map(|id| id.to_string()).unwrap_or_default(),
                if granted { "granted" } else { "denied" }
            );
        }

        granted
    }

    /// Negation of [`Shield::can`].
    pub fn cannot<Q>(&self, permission: &Q) -> bool
    where
        Q: PermissionQuery + ?Sized,
    {
        !self.can(permission)
    }

    /// Check whether the user holds the super-user permission.
    pub fn is_super_user(&self) -> bool {
        self.permissions.contains(&self.config.super_user_permission)
    }

    /// Permission names held, in insertion order.
    pub fn permissions(&self) -> Vec<&str> {
        self.permissions.names().collect()
    }

    /// Contributors of a permission.
    pub fn permission_contributors(&self, permission: &str) -> Option<&[Contributor]> {
        self.permissions.contributors(permission)
    }

    /// Get the merged permission index.
    pub fn permission_index(&self) -> &PermissionIndex {
        &self.permissions
    }

    /// Check whether the current user owns a resource.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthenticated`] when no user is loaded.
    pub fn is_owner<R>(&self, resource: &R) -> Result<bool>
    where
        R: Ownership + ?Sized,
    {
        let Some(user) = &self.user else {
            return Err(self.unauthenticated("check resource ownership"));
        };
        Ok(user.auth_identifier() == resource.owner_identifier())
    }

    /// Install a new current user, replacing all previously resolved state.
    pub fn set_user(&mut self, user: Arc<P::User>) {
        let id = user.auth_identifier();
        self.session_id = Some(id.clone());
        self.user = Some(Arc::clone(&user));

        self.reset_roles_and_permissions();
        self.resolve_user(&*user);

        #[cfg(feature = "audit")]
        info!(
            "User '{id}' set with {} roles and {} permissions",
            self.resolved_roles.len(),
            self.permissions.len()
        );
    }

    /// Get the current user, loading it from the provider and resolving it
    /// on first access.
    pub fn user(&mut self) -> Result<Option<Arc<P::User>>> {
        if self.user.is_none() {
            if let Some(id) = &self.session_id {
                self.user = self.provider.retrieve_by_id(id)?;
            }
        }

        let Some(user) = self.user.clone() else {
            return Ok(None);
        };

        if !self.resolved {
            self.resolve_user(&*user);
        }

        Ok(Some(user))
    }

    /// Identity key of the current user or of the restored session.
    pub fn id(&self) -> Option<Identifier> {
        self.user
            .as_ref()
            .map(|user| user.auth_identifier())
            .or_else(|| self.session_id.clone())
    }

    /// Check whether a user is authenticated.
    pub fn check(&mut self) -> Result<bool> {
        Ok(self.user()?.is_some())
    }

    /// Check whether no user is authenticated.
    pub fn guest(&mut self) -> Result<bool> {
        Ok(!self.check()?)
    }

    /// Load a user from the provider and install it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UserNotFound`] if the provider does not know the id.
    pub fn login_using_id(&mut self, id: impl Into<Identifier>) -> Result<Arc<P::User>> {
        let id = id.into();
        let user = self
            .provider
            .retrieve_by_id(&id)?
            .ok_or_else(|| Error::UserNotFound(id.to_string()))?;

        self.set_user(Arc::clone(&user));
        Ok(user)
    }

    /// Remember a session's identity without loading it. The user is fetched
    /// and resolved on the next call to [`Shield::user`].
    pub fn restore_session(&mut self, id: impl Into<Identifier>) {
        self.user = None;
        self.session_id = Some(id.into());
        self.reset_roles_and_permissions();
    }

    /// Forget the current user and everything resolved for it.
    pub fn logout(&mut self) {
        #[cfg(feature = "audit")]
        if let Some(id) = self.id() {
            info!("User '{id}' logged out");
        }

        self.user = None;
        self.session_id = None;
        self.reset_roles_and_permissions();
    }

    /// Resolve a user's direct grants and roles.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthenticated`] when no user is set.
    pub fn set_roles_and_permissions<U>(&mut self, user: &U) -> Result<()>
    where
        U: Authenticatable + ?Sized,
    {
        self.ensure_authenticated("resolve roles and permissions")?;
        self.resolve_user(user);
        Ok(())
    }

    /// Clear all roles and permissions and mark the state unresolved.
    pub fn reset_roles_and_permissions(&mut self) {
        self.attached_roles.clear();
        self.resolved_roles.clear();
        self.permissions.clear();
        self.resolved = false;
    }

    /// Current resolution state.
    pub fn state(&self) -> ResolutionState {
        if self.resolved {
            ResolutionState::Resolved
        } else {
            ResolutionState::Empty
        }
    }

    /// Check whether resolution ran for the current user.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    fn resolve_user<U>(&mut self, user: &U)
    where
        U: Authenticatable + ?Sized,
    {
        if let Some(permissions) = user.permissions() {
            for permission in permissions {
                self.set_permission(permission, None);
            }
        }

        if let Some(roles) = user.roles() {
            for role in roles {
                self.attach_role_unchecked(role);
            }
        }

        // An empty resolution still counts as complete.
        self.resolved = true;
        self.metrics.record_resolution();

        #[cfg(feature = "audit")]
        debug!("Resolved user '{}'", user.auth_identifier());
    }

    // A restored session counts once its user loads from the provider.
    fn ensure_authenticated(&mut self, operation: &str) -> Result<()> {
        if self.user()?.is_some() {
            Ok(())
        } else {
            Err(self.unauthenticated(operation))
        }
    }

    fn unauthenticated(&self, operation: &str) -> Error {
        #[cfg(feature = "audit")]
        warn!("Rejected attempt to {operation} without an authenticated user");

        Error::Unauthenticated(format!("cannot {operation} before a user is set"))
    }
}

impl<P> Default for Shield<P>
where
    P: UserProvider + Default,
{
    fn default() -> Self {
        Self::new(P::default())
    }
}

impl<P> fmt::Debug for Shield<P>
where
    P: UserProvider,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shield")
            .field("user", &self.id())
            .field("roles", &self.roles())
            .field("permissions", &self.permissions())
            .field("resolved", &self.resolved)
            .finish()
    }
}
