//! Managed and faer providers must agree on every delegated primitive.
//!
//! Settings are process-wide. Every test in this file that changes them, or
//! the `LINKERN_*` environment, holds `common::settings_guard()` for its whole
//! body so no other test can swap the provider mid-comparison.

mod common;

use approx::assert_abs_diff_eq;
use common::assert_close;
use linkern::config::{parallel_threshold, provider_kind};
use linkern::{Matrix, ProviderKind, Settings, Vector, set_settings, settings};
use rand::distributions::Uniform;

fn with_settings<R>(update: impl FnOnce(&mut Settings), f: impl FnOnce() -> R) -> R {
    let previous = settings();
    let mut next = previous.clone();
    update(&mut next);
    set_settings(next);
    let out = f();
    set_settings(previous);
    out
}

fn with_provider<R>(provider: ProviderKind, f: impl FnOnce() -> R) -> R {
    with_settings(
        |s| s.provider = provider,
        || {
            assert_eq!(provider_kind(), provider);
            f()
        },
    )
}

/// Products, inverse and dot product computed by both providers agree.
#[test]
fn managed_and_faer_agree() {
    let _guard = common::settings_guard();
    common::init_logging();
    let mut rng = common::rng(2024);
    let dist = Uniform::new(-1.0, 1.0);
    let a = Matrix::random(23, 17, &dist, &mut rng);
    let b = Matrix::random(17, 9, &dist, &mut rng);
    let square = Matrix::random(12, 12, &dist, &mut rng).add(&Matrix::dense_identity(12).multiply_scalar(6.0).unwrap()).unwrap();
    let x = Vector::random(23, &dist, &mut rng);
    let y = Vector::random(23, &dist, &mut rng);

    let run = || {
        (
            a.multiply(&b).unwrap(),
            a.transpose_this_and_multiply(&a).unwrap(),
            b.transpose_and_multiply(&b).unwrap(),
            square.inverse().unwrap(),
            x.dot(&y).unwrap(),
            a.singular_values().unwrap(),
        )
    };
    let managed = with_provider(ProviderKind::Managed, run);
    let faer = with_provider(ProviderKind::Faer, run);

    assert_close(&managed.0, &faer.0, 1e-12);
    assert_close(&managed.1, &faer.1, 1e-12);
    assert_close(&managed.2, &faer.2, 1e-12);
    assert_close(&managed.3, &faer.3, 1e-10);
    assert_abs_diff_eq!(managed.4, faer.4, epsilon = 1e-12);
    assert_eq!(managed.5.len(), faer.5.len());
    for (m, f) in managed.5.iter().zip(&faer.5) {
        assert_abs_diff_eq!(m, f, epsilon = 1e-10);
    }

    let identity = square.multiply(&faer.3).unwrap();
    assert_close(&identity, &Matrix::dense_identity(12), 1e-10);
}

fn set_env(pairs: &[(&str, Option<&str>)]) {
    for (key, value) in pairs {
        // SAFETY: callers hold the settings guard, so no other test in this
        // binary reads or writes the environment concurrently.
        unsafe {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
    }
}

/// Each `LINKERN_*` variable overrides its field; unparsable values keep the default.
#[test]
fn environment_overrides_parse() {
    let _guard = common::settings_guard();
    let defaults = Settings::default();

    set_env(&[
        ("LINKERN_PROVIDER", Some("FAER")),
        ("LINKERN_PARALLEL_THRESHOLD", Some(" 128 ")),
        ("LINKERN_MAX_ROWS", Some("3")),
        ("LINKERN_MAX_COLUMNS", Some("11")),
    ]);
    let parsed = Settings::from_env();
    assert_eq!(parsed.provider, ProviderKind::Faer);
    assert_eq!(parsed.parallel_threshold, 128);
    assert_eq!(parsed.max_display_rows, 3);
    assert_eq!(parsed.max_display_columns, 11);

    set_env(&[
        ("LINKERN_PROVIDER", Some("blas")),
        ("LINKERN_PARALLEL_THRESHOLD", Some("-5")),
        ("LINKERN_MAX_ROWS", Some("many")),
        ("LINKERN_MAX_COLUMNS", Some("")),
    ]);
    assert_eq!(Settings::from_env(), defaults);

    set_env(&[("LINKERN_PROVIDER", Some("managed")), ("LINKERN_MAX_ROWS", None)]);
    let managed = Settings::from_env();
    assert_eq!(managed.provider, ProviderKind::Managed);
    assert_eq!(managed.max_display_rows, defaults.max_display_rows);

    set_env(&[
        ("LINKERN_PROVIDER", None),
        ("LINKERN_PARALLEL_THRESHOLD", None),
        ("LINKERN_MAX_COLUMNS", None),
    ]);
    assert_eq!(Settings::from_env(), defaults);
}

/// Lowering the threshold sends bulk work through rayon without changing results.
#[cfg(feature = "rayon")]
#[test]
fn parallel_path_matches_serial() {
    let _guard = common::settings_guard();
    let _ = linkern::config::init_parallelism(Some(2));
    let mut rng = common::rng(99);
    let dist = Uniform::new(-1.0, 1.0);
    let a = Matrix::random(90, 90, &dist, &mut rng);
    let b = Matrix::random(90, 90, &dist, &mut rng);
    let serial = with_settings(
        |s| s.parallel_threshold = usize::MAX,
        || a.add(&b).unwrap().pointwise_multiply(&a).unwrap(),
    );
    let parallel = with_settings(
        |s| s.parallel_threshold = 16,
        || {
            assert_eq!(parallel_threshold(), 16);
            a.add(&b).unwrap().pointwise_multiply(&a).unwrap()
        },
    );
    assert_eq!(serial, parallel);
}
