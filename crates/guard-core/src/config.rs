//! Diagnostic rendering configuration.
//!
//! Configuration only changes how a [`ContractViolation`](crate::report::ContractViolation)
//! is rendered. It never changes which calls are accepted.

use guard_types::env_utils::{env_bool_or, env_var_or};

/// Separator width used when nothing else is configured.
pub const DEFAULT_RULE_WIDTH: usize = 70;

pub const RULE_WIDTH_ENV: &str = "CONTRACT_GUARD_RULE_WIDTH";
pub const FULL_PATHS_ENV: &str = "CONTRACT_GUARD_FULL_PATHS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    /// Width of the `=` separator lines in rendered reports.
    pub rule_width: usize,
    /// Render the full call-site path rather than just the file name.
    pub full_paths: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            rule_width: DEFAULT_RULE_WIDTH,
            full_paths: true,
        }
    }
}

impl GuardConfig {
    /// Load from `CONTRACT_GUARD_RULE_WIDTH` and `CONTRACT_GUARD_FULL_PATHS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            rule_width: env_var_or(RULE_WIDTH_ENV, defaults.rule_width).max(1),
            full_paths: env_bool_or(FULL_PATHS_ENV, defaults.full_paths),
        }
    }

    pub fn with_rule_width(mut self, width: usize) -> Self {
        self.rule_width = width.max(1);
        self
    }

    pub fn with_full_paths(mut self, full_paths: bool) -> Self {
        self.full_paths = full_paths;
        self
    }
}
