//! Keyed comparison capability shared by config records and live agents.
//!
//! Both containers in the pool are keyed by username. Each entity type
//! implements [`Keyed`] once, and lookups pick the comparison they need
//! instead of passing mode flags around.

use std::cmp::Ordering;

/// Comparison surface for entities stored in a username-keyed container.
pub trait Keyed {
    /// The entity's key.
    fn key(&self) -> &str;

    /// Compare two entities by their keys.
    fn compare_exact(&self, other: &Self) -> Ordering {
        self.key().cmp(other.key())
    }

    /// Compare this entity against a bare search key.
    fn compare_by_key(&self, key: &str) -> Ordering {
        self.key().cmp(key)
    }

    /// Compare only the first `prefix.len()` bytes of the key.
    ///
    /// Returns `Equal` when the key starts with `prefix`, so every entity
    /// matching a partial key sorts as equal to it.
    fn compare_by_prefix(&self, prefix: &str) -> Ordering {
        let key = self.key().as_bytes();
        let end = prefix.len().min(key.len());
        match key[..end].cmp(&prefix.as_bytes()[..end]) {
            Ordering::Equal if key.len() < prefix.len() => Ordering::Less,
            ordering => ordering,
        }
    }
}
