//! Metrics collection for the shield.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counters for shield operations.
///
/// Clones share their counters, so a single collector can be handed to every
/// session's shield.
#[derive(Debug, Clone, Default)]
pub struct ShieldMetrics {
    /// Number of `can` checks performed.
    pub permission_checks: Arc<AtomicU64>,
    /// Checks that were granted.
    pub permissions_granted: Arc<AtomicU64>,
    /// Checks that were denied.
    pub permissions_denied: Arc<AtomicU64>,
    /// Checks granted through the super-user permission.
    pub super_user_bypasses: Arc<AtomicU64>,
    /// Number of roles merged into a permission index.
    pub role_attachments: Arc<AtomicU64>,
    /// Number of roles detached.
    pub role_detachments: Arc<AtomicU64>,
    /// Number of user resolutions run.
    pub resolutions: Arc<AtomicU64>,
}

impl ShieldMetrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of a permission check.
    pub fn record_permission_check(&self, granted: bool, via_super_user: bool) {
        self.permission_checks.fetch_add(1, Ordering::Relaxed);
        if granted {
            self.permissions_granted.fetch_add(1, Ordering::Relaxed);
        } else {
            self.permissions_denied.fetch_add(1, Ordering::Relaxed);
        }
        if via_super_user {
            self.super_user_bypasses.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a role merged into the index.
    pub fn record_role_attachment(&self) {
        self.role_attachments.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a role detached from the index.
    pub fn record_role_detachment(&self) {
        self.role_detachments.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed user resolution.
    pub fn record_resolution(&self) {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the share of checks that were granted.
    pub fn grant_ratio(&self) -> f64 {
        let total = self.permission_checks.load(Ordering::Relaxed);
        if total == 0 {
            0.0
        } else {
            self.permissions_granted.load(Ordering::Relaxed) as f64 / total as f64
        }
    }

    /// Get metrics summary.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            permission_checks: self.permission_checks.load(Ordering::Relaxed),
            permissions_granted: self.permissions_granted.load(Ordering::Relaxed),
            permissions_denied: self.permissions_denied.load(Ordering::Relaxed),
            super_user_bypasses: self.super_user_bypasses.load(Ordering::Relaxed),
            role_attachments: self.role_attachments.load(Ordering::Relaxed),
            role_detachments: self.role_detachments.load(Ordering::Relaxed),
            resolutions: self.resolutions.load(Ordering::Relaxed),
            grant_ratio: self.grant_ratio(),
        }
    }

    /// Reset all counters.
    pub fn reset(&self) {
        for counter in [
            &self.permission_checks,
            &self.permissions_granted,
            &self.permissions_denied,
            &self.super_user_bypasses,
            &self.role_attachments,
            &self.role_detachments,
            &self.resolutions,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// Point-in-time copy of [`ShieldMetrics`].
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSummary {
    /// Number of `can` checks performed.
    pub permission_checks: u64,
    /// Checks that were granted.
    pub permissions_granted: u64,
    /// Checks that were denied.
    pub permissions_denied: u64,
    /// Checks granted through the super-user permission.
    pub super_user_bypasses: u64,
    /// Roles merged into a permission index.
    pub role_attachments: u64,
    /// Roles detached.
    pub role_detachments: u64,
    /// User resolutions run.
    pub resolutions: u64,
    /// Share of checks that were granted.
    pub grant_ratio: f64,
}
