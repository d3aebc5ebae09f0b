//! Folding pass-through joints into the bones that contain them.

// Chain lengths are small joint counts.
#![allow(clippy::cast_precision_loss)]

use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::builder::JointTable;
use crate::graph::SkeletonGraph;

/// Everything derived from the full skeleton by compression.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub(crate) struct Compression {
    pub(crate) graph: SkeletonGraph,
    pub(crate) parents: Vec<Option<usize>>,
    pub(crate) symmetry: Vec<Option<usize>>,
    pub(crate) full_to_compressed: Vec<Option<usize>>,
    pub(crate) compressed_to_full: Vec<usize>,
    pub(crate) bone_lengths: Vec<f64>,
    /// Full-indexed: segment length over the length of its compressed bone.
    pub(crate) fractions: Vec<Option<f64>>,
    /// Full-indexed: distance from the bone's child end, as a fraction.
    pub(crate) cumulative: Vec<Option<f64>>,
    /// Full-indexed: compressed bone containing the joint's parent segment.
    pub(crate) bone_of: Vec<Option<usize>>,
}

impl Compression {
    pub(crate) fn len(&self) -> usize {
        self.compressed_to_full.len()
    }
}

/// Derive the compressed skeleton.
///
/// A joint survives iff it is the root or its degree is not 2. Every
/// surviving non-root joint is linked to its nearest surviving ancestor, and
/// the full segments between them make up one compressed bone.
pub(crate) fn compress(graph: &SkeletonGraph, joints: &JointTable) -> Compression {
    let n = graph.len();
    let positions = graph.positions();

    let mut full_to_compressed = vec![None; n];
    let mut compressed_to_full = Vec::new();
    for (i, slot) in full_to_compressed.iter_mut().enumerate() {
        if i == 0 || graph.degree(i) != 2 {
            *slot = Some(compressed_to_full.len());
            compressed_to_full.push(i);
        }
    }
    let m = compressed_to_full.len();

    let mut out = Compression {
        graph: SkeletonGraph::with_capacity(m),
        parents: vec![None; m],
        symmetry: vec![None; m],
        full_to_compressed,
        compressed_to_full,
        bone_lengths: vec![0.0; m],
        fractions: vec![None; n],
        cumulative: vec![None; n],
        bone_of: vec![None; n],
    };

    for (c, &f) in out.compressed_to_full.iter().enumerate() {
        out.graph.add_vertex(positions[f]);
        if c > 0 {
            out.parents[c] = retained_ancestor(f, &joints.parents, &out.full_to_compressed);
        }
    }
    for c in 1..m {
        if let Some(p) = out.parents[c] {
            out.graph.add_edge(c, p);
        }
    }

    let mut folded_pairs = 0usize;
    for (hi, lo) in joints
        .symmetry
        .iter()
        .enumerate()
        .filter_map(|(hi, s)| s.map(|lo| (hi, lo)))
    {
        match (out.full_to_compressed[hi], out.full_to_compressed[lo]) {
            (Some(a), Some(b)) => out.symmetry[a] = Some(b),
            (None, None) => folded_pairs += 1,
            _ => warn!(
                joint = %joints.names[hi],
                partner = %joints.names[lo],
                "One side of a symmetric pair was collapsed; compressed joint has no mirror"
            ),
        }
    }
    if folded_pairs > 0 {
        debug!(pairs = folded_pairs, "Symmetric pairs folded into compressed bones");
    }

    for c in 1..m {
        let mut chain: Vec<(usize, f64)> = Vec::new();
        let mut cur = out.compressed_to_full[c];
        while let Some(parent) = joints.parents[cur] {
            chain.push((cur, (positions[cur] - positions[parent]).norm()));
            cur = parent;
            if out.full_to_compressed[cur].is_some() {
                break;
            }
        }

        let total: f64 = chain.iter().map(|&(_, len)| len).sum();
        out.bone_lengths[c] = total;

        let count = chain.len() as f64;
        let mut along = 0.0;
        for (k, &(joint, len)) in chain.iter().enumerate() {
            let (share, start) = if total > 0.0 {
                (len / total, along / total)
            } else {
                (1.0 / count, k as f64 / count)
            };
            out.fractions[joint] = Some(share);
            out.cumulative[joint] = Some(start);
            out.bone_of[joint] = Some(c);
            along += len;
        }
    }

    out
}

/// Compressed index of the nearest retained proper ancestor of `joint`.
fn retained_ancestor(
    mut joint: usize,
    parents: &[Option<usize>],
    full_to_compressed: &[Option<usize>],
) -> Option<usize> {
    loop {
        joint = parents[joint]?;
        if let Some(c) = full_to_compressed[joint] {
            return Some(c);
        }
    }
}
