//! Read-only authorization surface for application code.
//!
//! Request handlers and view code receive a `&dyn Gate` (or any `G: Gate`)
//! instead of reaching for a global shield.

use crate::{
    identifier::Identifier,
    permission::PermissionQuery,
    provider::UserProvider,
    shield::Shield,
};

/// Authorization queries over a resolved user.
pub trait Gate {
    /// Check whether any of the named permissions is held.
    fn allows(&self, permissions: &[&str]) -> bool;

    /// Check whether a role is held.
    fn has_role(&self, identifier: &Identifier) -> bool;

    /// Held role identifiers.
    fn roles(&self) -> Vec<Identifier>;

    /// Held permission names.
    fn permissions(&self) -> Vec<&str>;

    /// Check whether the user bypasses all permission checks.
    fn is_super_user(&self) -> bool;

    /// Check a single permission or a list of them.
    fn can<Q>(&self, permission: &Q) -> bool
    where
        Self: Sized,
        Q: PermissionQuery + ?Sized,
    {
        self.allows(&permission.permission_names())
    }

    /// Negation of [`Gate::can`].
    fn cannot<Q>(&self, permission: &Q) -> bool
    where
        Self: Sized,
        Q: PermissionQuery + ?Sized,
    {
        !self.can(permission)
    }

    /// Negation of [`Gate::allows`].
    fn denies(&self, permissions: &[&str]) -> bool {
        !self.allows(permissions)
    }
}

impl<P> Gate for Shield<P>
where
    P: UserProvider,
{
    fn allows(&self, permissions: &[&str]) -> bool {
        Shield::can(self, permissions)
    }

    fn has_role(&self, identifier: &Identifier) -> bool {
        Shield::has_role(self, identifier)
    }

    fn roles(&self) -> Vec<Identifier> {
        Shield::roles(self)
    }

    fn permissions(&self) -> Vec<&str> {
        Shield::permissions(self)
    }

    fn is_super_user(&self) -> bool {
        Shield::is_super_user(self)
    }
}
