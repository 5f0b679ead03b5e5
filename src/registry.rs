//! Handle table mapping opaque integer handles to owned sessions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};

/// Opaque session handle. Zero is never issued and marks an invalid handle.
pub type Handle = u64;

/// Table of live sessions addressed by opaque handles.
///
/// Handles come from a monotonic counter and are never reused, so a stale
/// handle can never alias a newer session. Every lookup goes through the
/// table rather than through the raw value, so a forged or released handle
/// is a clean miss, never a dangling dereference.
///
/// Each entry carries its own lock: calls against one handle are serialized,
/// calls against distinct handles only contend on the brief map access.
pub struct Registry<T> {
    next: AtomicU64,
    entries: RwLock<HashMap<Handle, Mutex<T>>>,
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Stores a session and returns its new non-zero handle.
    pub fn insert(&self, session: T) -> Handle {
        let handle = self.next.fetch_add(1, Ordering::Relaxed);
        self.entries.write().insert(handle, Mutex::new(session));
        handle
    }

    /// Runs `f` against the session behind `handle`, or returns `None` if
    /// the handle was never issued or has been removed.
    pub fn with<R>(&self, handle: Handle, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let entries = self.entries.read();
        let entry = entries.get(&handle)?;
        Some(f(&mut entry.lock()))
    }

    /// Removes and drops the session behind `handle`. Returns whether an
    /// entry existed; removing an unknown handle is a no-op.
    pub fn remove(&self, handle: Handle) -> bool {
        self.entries.write().remove(&handle).is_some()
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if no session is live.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_unique_and_nonzero() {
        let registry = Registry::new();
        let handles: Vec<Handle> = (0..8).map(|i| registry.insert(i)).collect();
        for (i, &h) in handles.iter().enumerate() {
            assert_ne!(h, 0);
            assert!(!handles[..i].contains(&h));
        }
        assert_eq!(registry.len(), 8);
    }

    #[test]
    fn test_with_unknown_handle() {
        let registry: Registry<i32> = Registry::new();
        assert!(registry.with(0, |_| ()).is_none());
        assert!(registry.with(123, |_| ()).is_none());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let registry = Registry::new();
        let h = registry.insert("session");
        assert!(registry.remove(h));
        assert!(!registry.remove(h));
        assert!(registry.with(h, |_| ()).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_handles_never_reused() {
        let registry = Registry::new();
        let first = registry.insert(1);
        registry.remove(first);
        let second = registry.insert(2);
        assert_ne!(first, second);
    }

    #[test]
    fn test_remove_one_keeps_others() {
        let registry = Registry::new();
        let a = registry.insert(10);
        let b = registry.insert(20);
        registry.remove(a);
        assert_eq!(registry.with(b, |v| *v), Some(20));
    }
}
