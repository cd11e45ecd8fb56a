//! Identity keys and the key allocator.

use rustc_hash::FxHashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::{Mutex, OnceLock, PoisonError};

/// Prefix used by [`new_hook_key`] when none is given.
pub const DEFAULT_KEY_PREFIX: &str = "hook";

/// Identifies one logical stateful unit across renders.
///
/// Two units share state only if they use equal keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HookKey {
    Name(Rc<str>),
    Id(u64),
}

impl fmt::Display for HookKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookKey::Name(name) => f.write_str(name),
            HookKey::Id(id) => write!(f, "#{id}"),
        }
    }
}

impl From<&str> for HookKey {
    fn from(name: &str) -> Self {
        HookKey::Name(Rc::from(name))
    }
}

impl From<String> for HookKey {
    fn from(name: String) -> Self {
        HookKey::Name(Rc::from(name))
    }
}

impl From<&HookKey> for HookKey {
    fn from(key: &HookKey) -> Self {
        key.clone()
    }
}

impl From<u64> for HookKey {
    fn from(id: u64) -> Self {
        HookKey::Id(id)
    }
}

impl From<usize> for HookKey {
    fn from(id: usize) -> Self {
        HookKey::Id(id as u64)
    }
}

fn counters() -> &'static Mutex<FxHashMap<String, u64>> {
    static COUNTERS: OnceLock<Mutex<FxHashMap<String, u64>>> = OnceLock::new();
    COUNTERS.get_or_init(|| Mutex::new(FxHashMap::default()))
}

/// Generate a fresh key of the form `{prefix}_{n}`.
///
/// Each prefix has its own counter, starting at 1, shared by the whole
/// process, so two calls never return the same key.
///
/// ```
/// use hookbox::new_hook_key;
///
/// let a = new_hook_key(Some("row"));
/// let b = new_hook_key(Some("row"));
/// assert_ne!(a, b);
/// ```
pub fn new_hook_key(prefix: Option<&str>) -> HookKey {
    let prefix = prefix.unwrap_or(DEFAULT_KEY_PREFIX);
    let n = {
        let mut counters = counters().lock().unwrap_or_else(PoisonError::into_inner);
        let counter = counters.entry(prefix.to_owned()).or_insert(0);
        *counter += 1;
        *counter
    };
    HookKey::from(format!("{prefix}_{n}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_with_prefix_are_unique() {
        let a = new_hook_key(Some("x"));
        let b = new_hook_key(Some("x"));
        assert_ne!(a, b);
        assert!(a.to_string().starts_with("x_"));
    }

    #[test]
    fn keys_without_prefix_are_unique() {
        let a = new_hook_key(None);
        let b = new_hook_key(None);
        assert_ne!(a, b);
        assert!(b.to_string().starts_with("hook_"));
    }

    #[test]
    fn counters_are_per_prefix() {
        let first = new_hook_key(Some("counters_are_per_prefix"));
        let _other = new_hook_key(Some("counters_are_per_prefix_other"));
        let second = new_hook_key(Some("counters_are_per_prefix"));
        assert_eq!(first.to_string(), "counters_are_per_prefix_1");
        assert_eq!(second.to_string(), "counters_are_per_prefix_2");
    }

    #[test]
    fn names_and_ids_are_distinct() {
        assert_ne!(HookKey::from("1"), HookKey::from(1u64));
        assert_eq!(HookKey::from(7usize).to_string(), "#7");
    }
}
