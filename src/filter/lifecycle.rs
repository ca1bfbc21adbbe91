//! The process-wide filter lifecycle.
//!
//! Registration is reference-counted rather than boolean: multiple independent subsystems in a
//! host process may each assume they own an initialize/finalize pair, and one subsystem's
//! teardown must not break another's still-active use.

use std::sync::{Mutex, MutexGuard, OnceLock};

use thiserror::Error;

use super::{registry, zfp_filter_descriptor, ZFP_FILTER_ID};

/// A filter lifecycle usage error.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Finalize was called without a matching initialize.
    #[error("finalize called without a matching initialize")]
    NotInitialized,
}

#[derive(Default)]
struct LifecycleState {
    /// Outstanding initializations.
    count: u32,
    /// Whether this lifecycle performed the registration, as opposed to finding the identifier
    /// already registered externally.
    owns_registration: bool,
}

static STATE: OnceLock<Mutex<LifecycleState>> = OnceLock::new();

fn state() -> MutexGuard<'static, LifecycleState> {
    STATE
        .get_or_init(|| Mutex::new(LifecycleState::default()))
        .lock()
        .unwrap()
}

/// Initialize the ZFP filter.
///
/// The first initialization registers the filter in the host [filter table](super::lookup);
/// subsequent ones only increment the reference count. If the identifier is already registered
/// externally, registration is skipped (and teardown leaves the external registration alone).
///
/// Every successful call must be paired with a [`finalize`].
///
/// # Errors
///
/// Currently always returns [`Ok`]; the result keeps the status contract stable should host
/// registration become fallible.
///
/// # Panics
///
/// Panics if the lifecycle lock is poisoned.
pub fn initialize() -> Result<(), LifecycleError> {
    let mut state = state();
    if state.count == 0 && !registry::is_registered(ZFP_FILTER_ID) {
        registry::register(zfp_filter_descriptor());
        state.owns_registration = true;
    }
    state.count += 1;
    Ok(())
}

/// Release one initialization of the ZFP filter.
///
/// Releasing the last outstanding initialization unregisters the filter from the host filter
/// table, if this lifecycle registered it.
///
/// # Errors
///
/// Returns [`LifecycleError::NotInitialized`] if no initialization is outstanding; this signals a
/// caller lifecycle bug and leaves the state unchanged.
///
/// # Panics
///
/// Panics if the lifecycle lock is poisoned.
pub fn finalize() -> Result<(), LifecycleError> {
    let mut state = state();
    if state.count == 0 {
        return Err(LifecycleError::NotInitialized);
    }
    state.count -= 1;
    if state.count == 0 && state.owns_registration {
        registry::unregister(ZFP_FILTER_ID);
        state.owns_registration = false;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // A single test owns the process-global lifecycle state; splitting the sequence across tests
    // would race under the parallel test harness.
    #[test]
    fn lifecycle_reference_counting() {
        assert!(!registry::is_registered(ZFP_FILTER_ID));

        initialize().unwrap();
        assert!(registry::is_registered(ZFP_FILTER_ID));
        initialize().unwrap();
        assert!(registry::is_registered(ZFP_FILTER_ID));

        // The first finalize releases one of two initializations; the filter stays registered.
        finalize().unwrap();
        assert!(registry::is_registered(ZFP_FILTER_ID));
        finalize().unwrap();
        assert!(!registry::is_registered(ZFP_FILTER_ID));

        // A further finalize is a caller bug.
        assert!(matches!(finalize(), Err(LifecycleError::NotInitialized)));

        // The pair composes again after teardown.
        initialize().unwrap();
        assert!(registry::is_registered(ZFP_FILTER_ID));
        finalize().unwrap();
        assert!(!registry::is_registered(ZFP_FILTER_ID));

        // An externally registered filter is left alone by teardown.
        assert!(registry::register(zfp_filter_descriptor()));
        initialize().unwrap();
        finalize().unwrap();
        assert!(registry::is_registered(ZFP_FILTER_ID));
        assert!(registry::unregister(ZFP_FILTER_ID));
    }
}
