//! Vertex welding and index building.
//!
//! Corners whose tuples are bit-for-bit identical share one vertex. There is
//! no spatial tolerance: two positions only merge if the float parser rounded
//! them to the same value. Unique vertices keep the order in which they first
//! occur, and indices continue from `base` so several geometries can share
//! one index namespace.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use thiserror::Error;

use crate::gather::Tuples;

/// Errors that can occur while welding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WeldError {
    #[error("Index namespace overflow: base {base} plus {unique} unique vertices exceeds u32")]
    IndexOverflow { base: u32, unique: usize },
}

/// Result type for welding.
pub type WeldResult<T> = Result<T, WeldError>;

/// Output of [`weld`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Welded {
    /// Unique tuples in first-occurrence order.
    pub vertices: Vec<f32>,

    /// One index per input tuple, starting at the base.
    pub indices: Vec<u32>,

    pub unique_count: usize,
}

/// Hash key comparing a tuple by the bit patterns of its floats.
struct TupleKey<'a>(&'a [f32]);

impl PartialEq for TupleKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self
                .0
                .iter()
                .zip(other.0)
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl Eq for TupleKey<'_> {}

impl Hash for TupleKey<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for v in self.0 {
            v.to_bits().hash(state);
        }
    }
}

/// Deduplicate `tuples`, numbering unique vertices from `base`.
pub fn weld(tuples: &Tuples, base: u32) -> WeldResult<Welded> {
    let mut lookup: HashMap<TupleKey, u32> = HashMap::with_capacity(tuples.len());
    let mut vertices = Vec::new();
    let mut indices = Vec::with_capacity(tuples.len());

    for tuple in tuples.iter() {
        let index = match lookup.get(&TupleKey(tuple)) {
            Some(&index) => index,
            None => {
                let unique = lookup.len() + 1;
                let index = u32::try_from(u64::from(base) + lookup.len() as u64)
                    .map_err(|_| WeldError::IndexOverflow { base, unique })?;
                lookup.insert(TupleKey(tuple), index);
                vertices.extend_from_slice(tuple);
                index
            }
        };
        indices.push(index);
    }

    Ok(Welded {
        vertices,
        indices,
        unique_count: lookup.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuples(width: usize, data: Vec<f32>) -> Tuples {
        Tuples { data, width }
    }

    /// Pairwise scan used to cross-check the hashed weld.
    fn weld_pairwise(tuples: &Tuples, base: u32) -> (Vec<f32>, Vec<u32>) {
        let mut indices: Vec<Option<u32>> = vec![None; tuples.len()];
        let mut vertices = Vec::new();
        let mut next = base;
        for i in 0..tuples.len() {
            if indices[i].is_some() {
                continue;
            }
            indices[i] = Some(next);
            vertices.extend_from_slice(tuples.get(i));
            for j in i + 1..tuples.len() {
                if tuples.get(i) == tuples.get(j) {
                    indices[j] = Some(next);
                }
            }
            next += 1;
        }
        (vertices, indices.into_iter().flatten().collect())
    }

    #[test]
    fn test_quad_from_two_triangles() {
        // Corners 0 1 2 / 2 1 3 over four distinct positions
        let p = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]];
        let data = [0, 1, 2, 2, 1, 3].iter().flat_map(|&i| p[i]).collect();
        let welded = weld(&tuples(3, data), 0).unwrap();

        assert_eq!(welded.unique_count, 4);
        assert_eq!(welded.vertices.len(), 12);
        assert_eq!(welded.indices, vec![0, 1, 2, 2, 1, 3]);
    }

    #[test]
    fn test_base_offsets_indices() {
        let data = vec![5.0, 5.0, 5.0, 5.0, 5.0, 5.0];
        let welded = weld(&tuples(3, data), 10).unwrap();
        assert_eq!(welded.indices, vec![10, 10]);
        assert_eq!(welded.unique_count, 1);
    }

    #[test]
    fn test_any_differing_component_splits() {
        // Same position, different normal
        let data = vec![
            0.0, 0.0, 0.0, 0.0, 0.0, 1.0, //
            0.0, 0.0, 0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 0.0, 0.0, 1.0,
        ];
        let welded = weld(&tuples(6, data), 0).unwrap();
        assert_eq!(welded.indices, vec![0, 1, 0]);
        assert_eq!(welded.unique_count, 2);
    }

    #[test]
    fn test_first_occurrence_order() {
        let data = vec![3.0, 1.0, 3.0, 2.0, 1.0];
        let welded = weld(&tuples(1, data), 0).unwrap();
        assert_eq!(welded.vertices, vec![3.0, 1.0, 2.0]);
        assert_eq!(welded.indices, vec![0, 1, 0, 2, 1]);
    }

    #[test]
    fn test_matches_pairwise_scan() {
        // Deterministic pseudo-random tuples drawn from a small value set so
        // that plenty of duplicates occur.
        let mut state = 0x2545_f491_u32;
        let mut data = Vec::new();
        for _ in 0..600 * 5 {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            data.push((state % 3) as f32 * 0.5);
        }
        let input = tuples(5, data);

        let welded = weld(&input, 7).unwrap();
        let (vertices, indices) = weld_pairwise(&input, 7);

        assert_eq!(welded.vertices, vertices);
        assert_eq!(welded.indices, indices);
        assert_eq!(welded.unique_count, vertices.len() / 5);
    }

    #[test]
    fn test_empty_input() {
        let welded = weld(&tuples(3, Vec::new()), 4).unwrap();
        assert_eq!(welded, Welded::default());
    }

    #[test]
    fn test_overflow() {
        let data = vec![1.0, 2.0];
        let err = weld(&tuples(1, data.clone()), u32::MAX).unwrap_err();
        assert_eq!(
            err,
            WeldError::IndexOverflow {
                base: u32::MAX,
                unique: 2
            }
        );

        // The last representable index is still usable
        let welded = weld(&tuples(1, data), u32::MAX - 1).unwrap();
        assert_eq!(welded.indices, vec![u32::MAX - 1, u32::MAX]);
    }
}
