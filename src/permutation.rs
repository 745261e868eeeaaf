//! Index permutations and their inversion sequences.
//!
//! A permutation `p` maps position `i` to position `p[i]`: applying it to a
//! sequence moves item `i` to slot `p[i]`. Matrices apply permutations in
//! place through the inversion sequence, a list of pairwise swaps.

use crate::error::LinalgError;

/// A bijection on `0..n`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permutation {
    indices: Vec<usize>,
}

impl Permutation {
    /// Validate that `indices` is a permutation of `0..indices.len()`.
    pub fn new(indices: Vec<usize>) -> Result<Self, LinalgError> {
        let n = indices.len();
        let mut seen = vec![false; n];
        for &i in &indices {
            if i >= n {
                return Err(LinalgError::InvalidPermutation(format!(
                    "index {i} out of range for length {n}"
                )));
            }
            if seen[i] {
                return Err(LinalgError::InvalidPermutation(format!("index {i} appears twice")));
            }
            seen[i] = true;
        }
        Ok(Permutation { indices })
    }

    pub(crate) fn from_unchecked(indices: Vec<usize>) -> Self {
        Permutation { indices }
    }

    pub fn identity(n: usize) -> Self {
        Permutation { indices: (0..n).collect() }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Destination of position `i`.
    pub fn get(&self, i: usize) -> usize {
        self.indices[i]
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn inverse(&self) -> Permutation {
        let mut inv = vec![0; self.len()];
        for (i, &p) in self.indices.iter().enumerate() {
            inv[p] = i;
        }
        Permutation { indices: inv }
    }

    /// Swap sequence `s`: exchanging positions `k` and `s[k]` for
    /// `k = 0, 1, ..` in order realizes this permutation. `s[k] >= k` always.
    pub fn inversions(&self) -> Vec<usize> {
        let n = self.len();
        let wanted = self.inverse().indices;
        let mut current: Vec<usize> = (0..n).collect();
        let mut location: Vec<usize> = (0..n).collect();
        let mut swaps = vec![0; n];
        for k in 0..n {
            let j = location[wanted[k]];
            swaps[k] = j;
            if j != k {
                current.swap(k, j);
                location[current[k]] = k;
                location[current[j]] = j;
            }
        }
        swaps
    }

    /// Rebuild a permutation from its swap sequence.
    pub fn from_inversions(swaps: &[usize]) -> Result<Self, LinalgError> {
        let n = swaps.len();
        let mut current: Vec<usize> = (0..n).collect();
        for (k, &j) in swaps.iter().enumerate() {
            if j >= n {
                return Err(LinalgError::InvalidPermutation(format!(
                    "swap target {j} out of range for length {n}"
                )));
            }
            current.swap(k, j);
        }
        let mut indices = vec![0; n];
        for (slot, &item) in current.iter().enumerate() {
            indices[item] = slot;
        }
        Ok(Permutation { indices })
    }

    /// Reorder `items` so that item `i` lands in slot `p[i]`.
    pub fn apply<X: Copy>(&self, items: &[X]) -> Result<Vec<X>, LinalgError> {
        if items.len() != self.len() {
            return Err(LinalgError::length("Permutation::apply", self.len(), items.len()));
        }
        let mut out = items.to_vec();
        for (i, &p) in self.indices.iter().enumerate() {
            out[p] = items[i];
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicates_and_out_of_range() {
        assert!(Permutation::new(vec![0, 0, 1]).is_err());
        assert!(Permutation::new(vec![0, 3, 1]).is_err());
        assert!(Permutation::new(vec![2, 0, 1]).is_ok());
    }

    #[test]
    fn inverse_composes_to_identity() {
        let p = Permutation::new(vec![2, 0, 3, 1]).unwrap();
        let q = p.inverse();
        for i in 0..4 {
            assert_eq!(q.get(p.get(i)), i);
        }
    }

    #[test]
    fn inversions_round_trip() {
        let p = Permutation::new(vec![3, 0, 4, 1, 2]).unwrap();
        let swaps = p.inversions();
        assert!(swaps.iter().enumerate().all(|(k, &j)| j >= k));
        assert_eq!(Permutation::from_inversions(&swaps).unwrap(), p);
    }

    #[test]
    fn swaps_reproduce_apply() {
        let p = Permutation::new(vec![1, 2, 0]).unwrap();
        let items = ['a', 'b', 'c'];
        let mut swapped = items.to_vec();
        for (k, &j) in p.inversions().iter().enumerate() {
            swapped.swap(k, j);
        }
        assert_eq!(swapped, p.apply(&items).unwrap());
        assert_eq!(swapped, vec!['c', 'a', 'b']);
    }
}
