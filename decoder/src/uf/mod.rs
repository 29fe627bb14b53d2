//! The three-phase Union-Find decoder (Delfosse-Nickerson, arXiv:1709.06218):
//! syndrome validation by cluster growth and fusion, spanning-tree construction
//! over each resulting even cluster, and peeling from the leaves to obtain a
//! correction.
//!
//! Clusters are kept in ordinary `BTreeMap`s rather than a weighted
//! union-find-with-path-compression arena; the algorithm re-scans odd clusters on
//! every growth round. That is an accepted complexity trade for clarity, not a
//! correctness shortcut — fusion order, and so which cluster survives a merge, is
//! pinned by scanning in ascending root order, matching the documented contract.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::bitset::BitString;
use crate::codes::{InvalidArgumentError, StabilizerType, SurfaceCode};

/// A connected region of the syndrome graph: the data qubits grown into it and the
/// stabilizer vertices it covers. Clusters are disjoint on both supports.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cluster {
    pub data_support: BitString,
    pub syndrome_support: BitString,
}

/// One edge of a cluster's spanning tree, in DFS discovery order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeEdge {
    pub parent: usize,
    pub child: usize,
    pub edge_qubit: usize,
}

#[derive(Clone, Copy, Debug, Error)]
pub enum IllFormedSyndromeError {
    #[error(
        "syndrome growth did not terminate after {rounds} rounds ({remaining_odd} clusters still odd); \
         the syndrome's parity is inconsistent with the code's boundary"
    )]
    GrowthDidNotTerminate {
        rounds: usize,
        remaining_odd: usize,
    },
}

#[derive(Clone, Copy, Debug, Error)]
pub enum InternalInvariantError {
    #[error("cluster rooted at {root} has no connecting data qubit between vertices {from} and {to}")]
    MissingConnectingEdge { root: usize, from: usize, to: usize },
    #[error(
        "spanning tree for cluster rooted at {root} covers {got} of {expected} vertices"
    )]
    SpanningTreeIncomplete {
        root: usize,
        expected: usize,
        got: usize,
    },
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgumentError),
}

/// Validates `syndrome_mask` by growing and fusing clusters until every one is
/// even. Returns the even clusters keyed by surviving root, and the number of
/// growth rounds performed.
pub fn uf_decode(
    code: &dyn SurfaceCode,
    syndrome_mask: &BitString,
    syndrome_type: StabilizerType,
) -> Result<(BTreeMap<usize, Cluster>, usize), IllFormedSyndromeError> {
    let n_data = code.num_data_qubits();
    let n_stab = code.num_stabilizers(syndrome_type);
    let error_type = syndrome_type.opposite();

    let mut odd_clusters: BTreeMap<usize, Cluster> = syndrome_mask
        .iter_ones()
        .map(|i| {
            (
                i,
                Cluster {
                    data_support: BitString::zeros(n_data),
                    syndrome_support: BitString::from_indices(n_stab, [i]),
                },
            )
        })
        .collect();
    let mut even_clusters: BTreeMap<usize, Cluster> = BTreeMap::new();

    let max_rounds = n_stab + 2;
    let mut rounds = 0usize;

    while !odd_clusters.is_empty() {
        rounds += 1;
        if rounds > max_rounds {
            return Err(IllFormedSyndromeError::GrowthDidNotTerminate {
                rounds,
                remaining_odd: odd_clusters.len(),
            });
        }

        let roots: Vec<usize> = odd_clusters.keys().copied().collect();
        for root in roots {
            if !odd_clusters.contains_key(&root) {
                continue; // already absorbed earlier this round
            }

            // Half step: grow data_support by one half-edge around the cluster boundary.
            let boundary: Vec<usize> = odd_clusters[&root].syndrome_support.iter_ones().collect();
            for v in boundary {
                // `v` is drawn from a live cluster's own syndrome_support, always in range.
                let stabilizer = code.stabilizer(v, syndrome_type).expect("vertex in range");
                odd_clusters
                    .get_mut(&root)
                    .expect("root still present")
                    .data_support
                    .union_with(stabilizer);
            }
            if fuse(&mut odd_clusters, &mut even_clusters, root, |c| {
                &c.data_support
            }) {
                continue;
            }

            // Full step: promote every vertex the grown data_support now touches.
            let touched = code.generate_syndrome(&odd_clusters[&root].data_support, error_type, true);
            odd_clusters
                .get_mut(&root)
                .expect("root still present")
                .syndrome_support
                .union_with(&touched);
            fuse(&mut odd_clusters, &mut even_clusters, root, |c| {
                &c.syndrome_support
            });
        }
    }

    Ok((even_clusters, rounds))
}

/// Looks for another odd cluster whose active dimension overlaps `root`'s, fusing
/// them into `even` under the *other* cluster's root (ties broken by scanning
/// ascending, so the lowest other root wins). Returns whether a fusion happened.
fn fuse(
    odd: &mut BTreeMap<usize, Cluster>,
    even: &mut BTreeMap<usize, Cluster>,
    root: usize,
    active: impl Fn(&Cluster) -> &BitString,
) -> bool {
    let this_active = match odd.get(&root) {
        Some(c) => active(c).clone(),
        None => return false,
    };
    let partner = odd
        .iter()
        .find(|&(&other, c)| other != root && active(c).intersects(&this_active))
        .map(|(&other, _)| other);

    let Some(partner) = partner else {
        return false;
    };
    let this = odd.remove(&root).expect("root present");
    let other = odd.remove(&partner).expect("partner present");

    let mut data_support = this.data_support;
    data_support.union_with(&other.data_support);
    let mut syndrome_support = this.syndrome_support;
    syndrome_support.union_with(&other.syndrome_support);

    even.insert(
        partner,
        Cluster {
            data_support,
            syndrome_support,
        },
    );
    true
}

/// Builds a DFS spanning tree over each even cluster's syndrome vertices, using
/// only data qubits already in that cluster's `data_support`.
pub fn spanning_trees(
    code: &dyn SurfaceCode,
    even_clusters: &BTreeMap<usize, Cluster>,
    syndrome_type: StabilizerType,
) -> Result<BTreeMap<usize, Vec<TreeEdge>>, InternalInvariantError> {
    let error_type = syndrome_type.opposite();
    let mut trees = BTreeMap::new();

    for (&root, cluster) in even_clusters {
        let vertex_set = &cluster.syndrome_support;
        let vertices: Vec<usize> = vertex_set.to_indices();
        let Some(&start) = vertices.first() else {
            trees.insert(root, Vec::new());
            continue;
        };

        let mut visited: BTreeSet<usize> = BTreeSet::new();
        let mut edges = Vec::new();
        let mut stack: Vec<(usize, Option<TreeEdge>)> = vec![(start, None)];

        while let Some((node, incoming)) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            if let Some(edge) = incoming {
                edges.push(edge);
            }

            let support = code
                .stabilizer(node, syndrome_type)
                .map_err(InternalInvariantError::InvalidArgument)?;
            let masked = support.and(&cluster.data_support);
            let adjacent = code.generate_syndrome(&masked, error_type, false);

            let mut neighbors: Vec<usize> = adjacent
                .to_indices()
                .into_iter()
                .filter(|n| vertex_set.get_bit(*n) && !visited.contains(n))
                .collect();
            neighbors.sort_unstable();

            for neighbor in neighbors {
                let neighbor_support = code
                    .stabilizer(neighbor, syndrome_type)
                    .map_err(InternalInvariantError::InvalidArgument)?;
                let edge_qubit = support
                    .and(neighbor_support)
                    .to_indices()
                    .into_iter()
                    .next()
                    .ok_or(InternalInvariantError::MissingConnectingEdge {
                        root,
                        from: node,
                        to: neighbor,
                    })?;
                stack.push((
                    neighbor,
                    Some(TreeEdge {
                        parent: node,
                        child: neighbor,
                        edge_qubit,
                    }),
                ));
            }
        }

        if edges.len() + 1 != vertices.len() {
            return Err(InternalInvariantError::SpanningTreeIncomplete {
                root,
                expected: vertices.len(),
                got: edges.len() + 1,
            });
        }
        trees.insert(root, edges);
    }

    Ok(trees)
}

/// Strips each cluster's spanning tree from the leaves, accumulating the data
/// qubits whose flip cancels that cluster's portion of `original_syndrome`.
pub fn peel(
    trees: &BTreeMap<usize, Vec<TreeEdge>>,
    original_syndrome: &BitString,
) -> BTreeMap<usize, Vec<usize>> {
    let mut corrections = BTreeMap::new();

    for (&root, edges) in trees {
        let mut working = original_syndrome.clone();
        let mut correction = Vec::new();

        for edge in edges.iter().rev() {
            if working.get_bit(edge.child) {
                correction.push(edge.edge_qubit);
                working.toggle_bit(edge.child);
                working.toggle_bit(edge.parent);
            }
        }
        corrections.insert(root, correction);
    }

    corrections
}

/// Folds per-cluster corrections into a single data-qubit bit-mask.
pub fn corrections_to_mask(corrections: &BTreeMap<usize, Vec<usize>>, n_data: usize) -> BitString {
    BitString::from_indices(n_data, corrections.values().flatten().copied())
}

/// Runs all three phases against `error`, an error of `error_type`, and returns
/// the syndrome, the number of growth rounds, and the resulting correction mask.
#[derive(Clone, Debug)]
pub struct DecodeOutcome {
    pub syndrome: BitString,
    pub rounds: usize,
    pub correction: BitString,
}

#[derive(Clone, Copy, Debug, Error)]
pub enum DecodeError {
    #[error(transparent)]
    IllFormedSyndrome(#[from] IllFormedSyndromeError),
    #[error(transparent)]
    InternalInvariant(#[from] InternalInvariantError),
}

pub fn decode(
    code: &dyn SurfaceCode,
    error: &BitString,
    error_type: StabilizerType,
) -> Result<DecodeOutcome, DecodeError> {
    let syndrome_type = error_type.opposite();
    let syndrome = code.generate_syndrome(error, error_type, false);
    let (even_clusters, rounds) = uf_decode(code, &syndrome, syndrome_type)?;
    let trees = spanning_trees(code, &even_clusters, syndrome_type)?;
    let corrections = peel(&trees, &syndrome);
    let correction = corrections_to_mask(&corrections, code.num_data_qubits());
    Ok(DecodeOutcome {
        syndrome,
        rounds,
        correction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::RotatedPlanarCode;
    use crate::codes::ToricCode;

    #[test]
    fn idempotent_on_empty_syndrome() {
        let code = ToricCode::new(3, 3).unwrap();
        let empty = BitString::zeros(code.num_stabilizers(StabilizerType::Z));
        let (clusters, rounds) = uf_decode(&code, &empty, StabilizerType::Z).unwrap();
        assert!(clusters.is_empty());
        assert_eq!(rounds, 0);
    }

    #[test]
    fn single_qubit_error_on_rotated_planar_decodes_cleanly() {
        let code = RotatedPlanarCode::new(3).unwrap();
        let error = BitString::from_indices(code.num_data_qubits(), [4]);
        let outcome = decode(&code, &error, StabilizerType::X).unwrap();
        assert_eq!(outcome.syndrome.to_indices(), vec![1, 2]);
        let residual = code.generate_syndrome(&outcome.correction, StabilizerType::X, false);
        assert!(residual.is_empty());
    }

    #[test]
    fn two_qubit_error_on_toric_decodes_cleanly() {
        let code = ToricCode::new(3, 3).unwrap();
        let error = BitString::from_indices(code.num_data_qubits(), [4, 6]);
        let outcome = decode(&code, &error, StabilizerType::X).unwrap();
        assert_eq!(outcome.syndrome.popcount() % 2, 0);
        let residual = code.generate_syndrome(&outcome.correction, StabilizerType::X, false);
        assert!(residual.is_empty());
    }

    #[test]
    fn even_clusters_partition_the_original_syndrome() {
        let code = ToricCode::new(5, 7).unwrap();
        let error = BitString::from_indices(code.num_data_qubits(), [3, 13, 43]);
        let syndrome = code.generate_syndrome(&error, StabilizerType::X, false);
        let (clusters, _rounds) = uf_decode(&code, &syndrome, StabilizerType::Z).unwrap();

        let mut covered = BitString::zeros(code.num_stabilizers(StabilizerType::Z));
        for cluster in clusters.values() {
            assert!(!covered.intersects(&cluster.syndrome_support));
            covered.union_with(&cluster.syndrome_support);
        }
        assert_eq!(
            covered.and(&syndrome).to_indices(),
            syndrome.to_indices()
        );
    }

    #[test]
    fn spanning_tree_has_exactly_vertex_count_minus_one_edges() {
        let code = ToricCode::new(5, 7).unwrap();
        let error = BitString::from_indices(code.num_data_qubits(), [3, 13, 43]);
        let syndrome = code.generate_syndrome(&error, StabilizerType::X, false);
        let (clusters, _) = uf_decode(&code, &syndrome, StabilizerType::Z).unwrap();
        let trees = spanning_trees(&code, &clusters, StabilizerType::Z).unwrap();

        for (root, edges) in &trees {
            let cluster = &clusters[root];
            assert_eq!(edges.len() + 1, cluster.syndrome_support.popcount());
        }
    }
}
