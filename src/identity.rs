//! Current-user resolution for seen-state.
//!
//! Seen flags are stored per user, so tourguide needs to know who is
//! looking. The user is resolved through a chain:
//!
//! 1. `--as <user>`: explicit per-command override
//! 2. `TOURGUIDE_USER` env var: process/session level
//! 3. `user` in `~/.tourguide/config.toml`: global default
//!
//! Unlike most lookups, coming up empty is fine: the user is a guest,
//! tours still run, and nothing is remembered.

use std::env;

use crate::config::Config;

/// Resolve the current user from the resolution chain.
///
/// Returns `None` for a guest. Empty values at any level are skipped.
pub fn resolve_user(explicit: Option<&str>, config: &Config) -> Option<String> {
    resolve_from(explicit, env::var("TOURGUIDE_USER").ok(), config)
}

fn resolve_from(explicit: Option<&str>, from_env: Option<String>, config: &Config) -> Option<String> {
    // 1. Explicit --as flag.
    if let Some(user) = explicit.filter(|s| !s.is_empty()) {
        return Some(user.to_string());
    }

    // 2. TOURGUIDE_USER environment variable.
    if let Some(user) = from_env.filter(|s| !s.is_empty()) {
        return Some(user);
    }

    // 3. ~/.tourguide/config.toml.
    config.user.clone().filter(|s| !s.is_empty())
}
