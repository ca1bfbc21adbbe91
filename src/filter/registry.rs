//! The host engine's filter table.
//!
//! Filters are looked up by identifier at chunk read time. The table is process-global and
//! guarded by a mutex; entries are whole descriptors, so a lookup hands back an independent copy
//! that stays valid after later unregistration.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, OnceLock};

use super::FilterDescriptor;

static FILTERS: OnceLock<Mutex<HashMap<u32, FilterDescriptor>>> = OnceLock::new();

fn filters() -> MutexGuard<'static, HashMap<u32, FilterDescriptor>> {
    FILTERS
        .get_or_init(|| Mutex::new(HashMap::new()))
        .lock()
        .unwrap()
}

/// Register `descriptor` in the filter table.
///
/// Returns false (and leaves the table unchanged) if a filter with the same identifier is already
/// registered.
///
/// # Panics
///
/// Panics if the filter table lock is poisoned.
pub fn register(descriptor: FilterDescriptor) -> bool {
    let mut filters = filters();
    if filters.contains_key(&descriptor.id()) {
        false
    } else {
        filters.insert(descriptor.id(), descriptor);
        true
    }
}

/// Remove the filter registered under `id` from the filter table.
///
/// Returns true if a filter was registered under `id`.
///
/// # Panics
///
/// Panics if the filter table lock is poisoned.
pub fn unregister(id: u32) -> bool {
    filters().remove(&id).is_some()
}

/// Look up the filter registered under `id`.
///
/// # Panics
///
/// Panics if the filter table lock is poisoned.
#[must_use]
pub fn lookup(id: u32) -> Option<FilterDescriptor> {
    filters().get(&id).copied()
}

/// Returns true if a filter is registered under `id`.
///
/// # Panics
///
/// Panics if the filter table lock is poisoned.
#[must_use]
pub fn is_registered(id: u32) -> bool {
    filters().contains_key(&id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{decode_chunk, encode_chunk, FilterCapabilities};

    // Uses its own identifier so it cannot interfere with the lifecycle tests, which own the zfp
    // identifier in this process.
    #[test]
    fn registry_register_unregister() {
        let id = 60001;
        let descriptor = FilterDescriptor::new(
            id,
            "test",
            FilterCapabilities::new(true, true),
            encode_chunk,
            decode_chunk,
        );
        assert!(!is_registered(id));
        assert!(lookup(id).is_none());

        assert!(register(descriptor));
        assert!(is_registered(id));
        assert_eq!(lookup(id).unwrap().name(), "test");

        // A second registration under the same identifier is refused.
        assert!(!register(descriptor));

        assert!(unregister(id));
        assert!(!is_registered(id));
        assert!(!unregister(id));
    }
}
