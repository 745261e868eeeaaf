//! Configuration shared by every matrix and vector in the process.
//!
//! Settings are read-mostly: operations take a snapshot through [`settings`]
//! and never hold the lock while computing.

pub mod options;
pub use options::{ProviderKind, Settings};

use std::sync::{OnceLock, RwLock};

static SETTINGS: OnceLock<RwLock<Settings>> = OnceLock::new();

fn cell() -> &'static RwLock<Settings> {
    SETTINGS.get_or_init(|| RwLock::new(Settings::default()))
}

fn read<R>(f: impl FnOnce(&Settings) -> R) -> R {
    match cell().read() {
        Ok(guard) => f(&guard),
        Err(poisoned) => f(&poisoned.into_inner()),
    }
}

/// Snapshot of the current process-wide settings.
pub fn settings() -> Settings {
    read(Settings::clone)
}

/// Active provider selection, without cloning the whole [`Settings`].
pub fn provider_kind() -> ProviderKind {
    read(|s| s.provider)
}

/// Element count at which bulk operations switch to rayon.
pub fn parallel_threshold() -> usize {
    read(|s| s.parallel_threshold)
}

/// Replace the process-wide settings.
pub fn set_settings(settings: Settings) {
    log::debug!("updating settings: {settings:?}");
    let mut guard = match cell().write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    *guard = settings;
}

/// Build the global rayon pool with `threads` workers (all cores when `None`).
///
/// Returns `false` if a global pool was already installed.
#[cfg(feature = "rayon")]
pub fn init_parallelism(threads: Option<usize>) -> bool {
    let threads = threads.unwrap_or_else(num_cpus::get);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .is_ok()
}

/// True when a bulk operation over `len` elements should run in parallel.
#[allow(unused_variables)]
pub(crate) fn parallel_enabled(len: usize) -> bool {
    #[cfg(feature = "rayon")]
    {
        len >= parallel_threshold()
    }
    #[cfg(not(feature = "rayon"))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_accessors_match_snapshot() {
        let snapshot = settings();
        assert_eq!(provider_kind(), snapshot.provider);
        assert_eq!(parallel_threshold(), snapshot.parallel_threshold);
    }
}
