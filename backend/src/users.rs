//! User-name resolution for owner-scoped targets.

use std::collections::HashMap;
use tracing::warn;

/// Maps an account name to its numeric uid.
pub trait UserResolver {
    fn uid_for_name(&self, name: &str) -> Option<u32>;
}

/// Looks names up in the system user database via `getpwnam_r`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemUsers;

impl UserResolver for SystemUsers {
    fn uid_for_name(&self, name: &str) -> Option<u32> {
        match nix::unistd::User::from_name(name) {
            Ok(user) => user.map(|u| u.uid.as_raw()),
            Err(e) => {
                warn!(user = name, error = %e, "user lookup failed");
                None
            }
        }
    }
}

impl UserResolver for HashMap<String, u32> {
    fn uid_for_name(&self, name: &str) -> Option<u32> {
        self.get(name).copied()
    }
}
