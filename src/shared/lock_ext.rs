//! Usage: RwLock extension trait with poisoned-state auto-recovery.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub(crate) trait RwLockExt<T> {
    /// Take a read guard, recovering the inner value if a writer panicked.
    fn read_or_recover(&self) -> RwLockReadGuard<'_, T>;
    /// Take a write guard, recovering the inner value if a writer panicked.
    fn write_or_recover(&self) -> RwLockWriteGuard<'_, T>;
}

impl<T> RwLockExt<T> for RwLock<T> {
    #[track_caller]
    fn read_or_recover(&self) -> RwLockReadGuard<'_, T> {
        match self.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log_recovery::<T>();
                poisoned.into_inner()
            }
        }
    }

    #[track_caller]
    fn write_or_recover(&self) -> RwLockWriteGuard<'_, T> {
        match self.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log_recovery::<T>();
                poisoned.into_inner()
            }
        }
    }
}

#[track_caller]
fn log_recovery<T>() {
    let loc = std::panic::Location::caller();
    tracing::error!(
        lock_type = std::any::type_name::<T>(),
        file = loc.file(),
        line = loc.line(),
        "RwLock poisoned by a panicked writer; recovered, state may be stale"
    );
}
