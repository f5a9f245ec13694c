//! Per-request maintenance decision.
//!
//! | enabled | mode    | excluded | privileged && allow_admin | blocked |
//! |---------|---------|----------|---------------------------|---------|
//! | false   | any     | any      | any                       | no      |
//! | true    | full    | yes      | any                       | no      |
//! | true    | full    | no       | yes                       | no      |
//! | true    | full    | no       | no                        | yes     |
//! | true    | partial | any      | any                       | no      |
//!
//! Partial mode has no per-page semantics yet and never blocks.

use serde::Serialize;

use crate::maintenance::{MaintenanceConfig, MaintenanceMode};

/// What a caller sees in place of the requested page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenancePlaceholder {
    pub message: String,
    pub estimated_time: String,
    /// Whether to offer the "continue to site" affordance.
    pub bypass_available: bool,
}

/// Outcome of evaluating a path against the maintenance config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GateDecision {
    /// Maintenance is off (or in partial mode).
    Open,
    /// Maintenance is on but the path is an excluded prefix.
    Excluded,
    /// Maintenance is on and a privileged caller was let through.
    Bypassed,
    /// Maintenance is on and the placeholder must be shown.
    Blocked { placeholder: MaintenancePlaceholder },
}

impl GateDecision {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }
}

pub struct MaintenanceGate;

impl MaintenanceGate {
    /// Whether `requested_path` must be replaced by the placeholder.
    pub fn should_block(
        config: &MaintenanceConfig,
        requested_path: &str,
        caller_is_privileged: bool,
    ) -> bool {
        Self::decide(config, requested_path, caller_is_privileged).is_blocked()
    }

    /// Full decision, including why a request was let through.
    pub fn decide(
        config: &MaintenanceConfig,
        requested_path: &str,
        caller_is_privileged: bool,
    ) -> GateDecision {
        if !config.enabled {
            return GateDecision::Open;
        }
        match config.mode {
            MaintenanceMode::Partial => GateDecision::Open,
            MaintenanceMode::Full => {
                if Self::is_excluded(config, requested_path) {
                    GateDecision::Excluded
                } else if caller_is_privileged && config.allow_admin_access {
                    GateDecision::Bypassed
                } else {
                    GateDecision::Blocked {
                        placeholder: Self::placeholder(config, caller_is_privileged),
                    }
                }
            }
        }
    }

    /// Exact string-prefix match against any excluded entry.
    pub fn is_excluded(config: &MaintenanceConfig, requested_path: &str) -> bool {
        config
            .excluded_pages
            .iter()
            .any(|prefix| requested_path.starts_with(prefix.as_str()))
    }

    /// Build the placeholder view for a caller.
    pub fn placeholder(
        config: &MaintenanceConfig,
        caller_is_privileged: bool,
    ) -> MaintenancePlaceholder {
        MaintenancePlaceholder {
            message: config.message.clone(),
            estimated_time: config.estimated_time.clone(),
            bypass_available: caller_is_privileged && config.allow_admin_access,
        }
    }
}
