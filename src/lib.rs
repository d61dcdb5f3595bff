//! # Role Shield
//!
//! This crate resolves an authenticated user's roles and direct permission
//! grants into a cached, per-session permission index and answers
//! authorization queries against it.
//!
//! ## Features
//!
//! - Roles and users through small traits, so any representation can plug in
//! - Idempotent role attachment and correct contributor tracking on detach
//! - Direct (role-less) permission grants
//! - Super-user permission bypassing every check
//! - Lazy resolution of users restored from a session
//! - Resource ownership checks
//! - A read-only [`Gate`] surface to hand to application code
//!
//! ## Quick Start
//!
//! ```rust
//! use role_shield::{MemoryUserProvider, Role, Shield, User};
//! use std::sync::Arc;
//!
//! let editor = Role::with_id(2, "editor").add_permission("edit");
//! let viewer = Role::with_id(3, "viewer").add_permission("view");
//! let user = User::new(1).with_role(editor).with_role(viewer);
//!
//! let mut shield = Shield::new(MemoryUserProvider::<User>::new());
//! shield.set_user(Arc::new(user));
//!
//! assert!(shield.can("edit"));
//! assert!(shield.can(&["delete", "view"]));
//! assert!(shield.cannot("delete"));
//!
//! shield.detach_role(2);
//! assert_eq!(shield.permissions(), vec!["view"]);
//! ```
//!
//! ## Audit Logging
//!
//! When the `audit` feature is enabled, the shield logs through the `log`
//! facade. To enable logging:
//!
//! ```rust
//! use role_shield::init_audit_logger;
//!
//! // Initialize logging (must be called early in program execution)
//! init_audit_logger();
//!
//! // Configure log level through RUST_LOG environment variable:
//! // RUST_LOG=info,role_shield=debug
//! ```
//!
//! The following events are logged:
//! - Users being set and logged out
//! - Role attachments and detachments
//! - Operations rejected for lack of an authenticated user
//! - Permission checks and resolutions (at debug level)
//!

#[cfg(feature = "audit")]
pub fn init_audit_logger() {
    env_logger::init();
}

pub mod error;
pub mod gate;
pub mod identifier;
pub mod macros;
pub mod metrics;
pub mod middleware;
pub mod permission;
pub mod provider;
pub mod resource;
pub mod role;
pub mod shield;
pub mod user;

// Re-export main types for convenience
pub use crate::{
    error::{Error, Result},
    gate::Gate,
    identifier::Identifier,
    metrics::{MetricsSummary, ShieldMetrics},
    middleware::ResolveAuthUser,
    permission::{Contributor, PermissionIndex, PermissionQuery, AUTO_CONTRIBUTOR},
    provider::{MemoryUserProvider, UserProvider},
    resource::{Ownership, Resource},
    role::{AuthorizableRole, Role, RoleBuilder},
    shield::{ResolutionState, Shield, ShieldConfig, SHIELD_DRIVER, SUPER_USER_PERMISSION},
    user::{Authenticatable, User},
};
