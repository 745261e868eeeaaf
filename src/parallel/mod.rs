//! Data-parallel helpers for bulk elementwise work.
//!
//! Every helper splits the output into disjoint slots: each unit reads only
//! from immutable inputs and writes its own element, so no locking is
//! needed. Below [`Settings::parallel_threshold`](crate::config::Settings)
//! elements, or without the `rayon` feature, the helpers run serially.

#[cfg(feature = "rayon")]
use crate::config::parallel_enabled;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// `dst[i] = f(src[i])`
pub(crate) fn map_into<T, F>(src: &[T], dst: &mut [T], f: F)
where
    T: Copy + Send + Sync,
    F: Fn(T) -> T + Send + Sync,
{
    debug_assert_eq!(src.len(), dst.len());
    #[cfg(feature = "rayon")]
    if parallel_enabled(dst.len()) {
        dst.par_iter_mut()
            .zip(src.par_iter())
            .for_each(|(d, s)| *d = f(*s));
        return;
    }
    for (d, s) in dst.iter_mut().zip(src) {
        *d = f(*s);
    }
}

/// `dst[i] = f(a[i], b[i])`
pub(crate) fn zip_into<T, F>(a: &[T], b: &[T], dst: &mut [T], f: F)
where
    T: Copy + Send + Sync,
    F: Fn(T, T) -> T + Send + Sync,
{
    debug_assert_eq!(a.len(), dst.len());
    debug_assert_eq!(b.len(), dst.len());
    #[cfg(feature = "rayon")]
    if parallel_enabled(dst.len()) {
        dst.par_iter_mut()
            .zip(a.par_iter().zip(b.par_iter()))
            .for_each(|(d, (x, y))| *d = f(*x, *y));
        return;
    }
    for ((d, x), y) in dst.iter_mut().zip(a).zip(b) {
        *d = f(*x, *y);
    }
}

/// Materialize `len` values produced by `f(index)`.
pub(crate) fn collect<T, F>(len: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Send + Sync,
{
    #[cfg(feature = "rayon")]
    if parallel_enabled(len) {
        return (0..len).into_par_iter().map(f).collect();
    }
    (0..len).map(f).collect()
}

/// Bulk assignment `dst.copy_from_slice(src)`, split across workers.
pub(crate) fn assign<T: Copy + Send + Sync>(dst: &mut [T], src: &[T]) {
    debug_assert_eq!(src.len(), dst.len());
    #[cfg(feature = "rayon")]
    if parallel_enabled(dst.len()) {
        dst.par_iter_mut().zip(src.par_iter()).for_each(|(d, s)| *d = *s);
        return;
    }
    dst.copy_from_slice(src);
}
