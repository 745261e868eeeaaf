//! Random fill through `rand` distributions.

use rand::Rng;
use rand::distributions::Distribution;

/// `n` independent draws from `distribution`.
pub(crate) fn sample<T, D, R>(n: usize, distribution: &D, rng: &mut R) -> Vec<T>
where
    D: Distribution<T>,
    R: Rng + ?Sized,
{
    distribution.sample_iter(rng).take(n).collect()
}
