//! Process-wide options for display, parallelism and provider selection.
//!
//! This module provides the `Settings` struct, which is read by the
//! presentation code (preview bounds), by the bulk elementwise operations
//! (parallel threshold) and by the scalar strategies when they resolve the
//! active linear algebra provider. Values can be set through the API or
//! picked up from the environment.

use std::env;

/// Execution strategy used for the provider-backed primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// Pure-Rust loops, parallelized with rayon when enabled.
    #[default]
    Managed,
    /// Dense kernels from faer (real scalars only; complex falls back to managed).
    Faer,
}

/// Display, parallelism & provider options.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Maximum number of rows rendered by `Display` before eliding.
    pub max_display_rows: usize,

    /// Maximum number of columns rendered by `Display` before eliding.
    pub max_display_columns: usize,

    /// Element count below which bulk operations stay serial.
    pub parallel_threshold: usize,

    /// Provider used for dot products, dense multiply and LU inverse.
    pub provider: ProviderKind,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            max_display_rows: 8,
            max_display_columns: 6,
            parallel_threshold: 4096,
            provider: ProviderKind::Managed,
        }
    }
}

impl Settings {
    /// Defaults overridden by `LINKERN_PROVIDER`, `LINKERN_PARALLEL_THRESHOLD`,
    /// `LINKERN_MAX_ROWS` and `LINKERN_MAX_COLUMNS` when they are set and parse.
    pub fn from_env() -> Self {
        let mut s = Settings::default();
        if let Ok(v) = env::var("LINKERN_PROVIDER") {
            match v.to_ascii_lowercase().as_str() {
                "faer" => s.provider = ProviderKind::Faer,
                "managed" => s.provider = ProviderKind::Managed,
                other => log::debug!("ignoring unknown LINKERN_PROVIDER value {other:?}"),
            }
        }
        if let Some(n) = parse_env("LINKERN_PARALLEL_THRESHOLD") {
            s.parallel_threshold = n;
        }
        if let Some(n) = parse_env("LINKERN_MAX_ROWS") {
            s.max_display_rows = n;
        }
        if let Some(n) = parse_env("LINKERN_MAX_COLUMNS") {
            s.max_display_columns = n;
        }
        s
    }
}

fn parse_env(key: &str) -> Option<usize> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
