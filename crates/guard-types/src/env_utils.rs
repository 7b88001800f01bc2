//! Environment variable parsing utilities.
//!
//! Configuration in this workspace is read from `CONTRACT_GUARD_*` variables.
//! These helpers replace the repeated pattern:
//!
//! ```ignore
//! std::env::var("CONTRACT_GUARD_RULE_WIDTH")
//!     .ok()
//!     .and_then(|v| v.parse::<usize>().ok())
//!     .unwrap_or(70)
//! ```
//!
//! # Example
//!
//! ```
//! use guard_types::env_utils::{env_bool_or, env_var_or};
//!
//! let width: usize = env_var_or("CONTRACT_GUARD_RULE_WIDTH", 70);
//! let full_paths = env_bool_or("CONTRACT_GUARD_FULL_PATHS", true);
//! ```

use std::str::FromStr;

/// Parse an environment variable into a type that implements `FromStr`.
///
/// Returns `None` if the variable is not set or cannot be parsed.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Parse an environment variable with a default value.
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

/// Interpret a flag value. `None` for anything that is neither truthy nor falsy.
fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a flag ("1", "true", "yes", "on" and their negatives, case-insensitive),
/// falling back to `default` when unset or unrecognized.
pub fn env_bool_or(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .and_then(|v| parse_flag(&v))
        .unwrap_or(default)
}
