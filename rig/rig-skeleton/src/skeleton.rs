//! The finished skeleton: full joints, compressed joints and the maps between.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::builder::JointTable;
use crate::compress::Compression;
use crate::error::{SkeletonError, SkeletonResult};
use crate::graph::SkeletonGraph;

/// A compressed skeleton together with the full skeleton it came from.
///
/// Indices come in two spaces. Full indices address every joint in
/// insertion order; compressed indices address only the joints kept by
/// compression (the root, leaves and branch points). Methods name which
/// space they take.
///
/// Produced by [`SkeletonBuilder::compress`](crate::SkeletonBuilder::compress).
/// After that only tagging and uniform scaling change it.
///
/// # Example
///
/// ```
/// use rig_skeleton::SkeletonTemplate;
///
/// let human = SkeletonTemplate::Human.build()?;
/// let lfoot = human.joint_index("lfoot").unwrap();
/// let c = human.full_to_compressed(lfoot).unwrap();
///
/// assert_eq!(human.compressed_to_full(c), Some(lfoot));
/// assert!(human.is_foot(c));
///
/// // The knee sits inside the leg bone.
/// let knee = human.joint_index("lknee").unwrap();
/// assert_eq!(human.full_to_compressed(knee), None);
/// assert_eq!(human.full_bone(knee), Some(c));
/// # Ok::<(), rig_skeleton::SkeletonError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Skeleton {
    full: SkeletonGraph,
    joints: JointTable,
    compressed: Compression,
    feet: Vec<bool>,
    fat: Vec<bool>,
}

impl Skeleton {
    pub(crate) fn from_parts(
        full: SkeletonGraph,
        joints: JointTable,
        compressed: Compression,
    ) -> Self {
        let m = compressed.len();
        Self {
            full,
            joints,
            compressed,
            feet: vec![false; m],
            fat: vec![false; m],
        }
    }

    /// A skeleton with no joints.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    // =========================================================================
    // Full skeleton
    // =========================================================================

    /// Number of full joints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.full.len()
    }

    /// Whether the skeleton has no joints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.full.is_empty()
    }

    /// Full index of a joint by name.
    #[must_use]
    pub fn joint_index(&self, name: &str) -> Option<usize> {
        self.joints.index.get(name).copied()
    }

    /// Name of a full joint.
    #[must_use]
    pub fn joint_name(&self, joint: usize) -> Option<&str> {
        self.joints.names.get(joint).map(String::as_str)
    }

    /// The full joint graph.
    #[must_use]
    pub const fn full_graph(&self) -> &SkeletonGraph {
        &self.full
    }

    /// Parent of a full joint; `None` for the root.
    #[must_use]
    pub fn parent(&self, joint: usize) -> Option<usize> {
        self.joints.parents.get(joint).copied().flatten()
    }

    /// Lower-indexed mirror of a full joint, if it is the higher side of a
    /// symmetric pair.
    #[must_use]
    pub fn symmetry(&self, joint: usize) -> Option<usize> {
        self.joints.symmetry.get(joint).copied().flatten()
    }

    // =========================================================================
    // Compressed skeleton
    // =========================================================================

    /// Number of compressed joints.
    #[must_use]
    pub fn compressed_len(&self) -> usize {
        self.compressed.len()
    }

    /// The compressed joint graph.
    #[must_use]
    pub const fn compressed_graph(&self) -> &SkeletonGraph {
        &self.compressed.graph
    }

    /// Parent of a compressed joint; `None` for the root.
    #[must_use]
    pub fn compressed_parent(&self, joint: usize) -> Option<usize> {
        self.compressed.parents.get(joint).copied().flatten()
    }

    /// Lower-indexed mirror of a compressed joint.
    ///
    /// `None` also when the full partner was collapsed by compression.
    #[must_use]
    pub fn compressed_symmetry(&self, joint: usize) -> Option<usize> {
        self.compressed.symmetry.get(joint).copied().flatten()
    }

    /// Length of the bone from a compressed joint to its parent, summed
    /// over the full segments it covers. `None` when out of range; 0 for
    /// the root.
    #[must_use]
    pub fn bone_length(&self, joint: usize) -> Option<f64> {
        self.compressed.bone_lengths.get(joint).copied()
    }

    /// All compressed bone lengths.
    #[must_use]
    pub fn bone_lengths(&self) -> &[f64] {
        &self.compressed.bone_lengths
    }

    /// Whether a compressed joint is a ground-contact candidate.
    #[must_use]
    pub fn is_foot(&self, joint: usize) -> bool {
        self.feet.get(joint).copied().unwrap_or(false)
    }

    /// Whether a compressed joint is weighted for girth.
    #[must_use]
    pub fn is_fat(&self, joint: usize) -> bool {
        self.fat.get(joint).copied().unwrap_or(false)
    }

    /// Foot tags, compressed-indexed.
    #[must_use]
    pub fn feet(&self) -> &[bool] {
        &self.feet
    }

    /// Fat tags, compressed-indexed.
    #[must_use]
    pub fn fat(&self) -> &[bool] {
        &self.fat
    }

    // =========================================================================
    // Index maps
    // =========================================================================

    /// Compressed index of a full joint, or `None` if it was collapsed.
    #[must_use]
    pub fn full_to_compressed(&self, joint: usize) -> Option<usize> {
        self.compressed.full_to_compressed.get(joint).copied().flatten()
    }

    /// Full index of a compressed joint.
    #[must_use]
    pub fn compressed_to_full(&self, joint: usize) -> Option<usize> {
        self.compressed.compressed_to_full.get(joint).copied()
    }

    /// Full-to-compressed map, full-indexed.
    #[must_use]
    pub fn full_to_compressed_map(&self) -> &[Option<usize>] {
        &self.compressed.full_to_compressed
    }

    /// Compressed-to-full map, compressed-indexed.
    #[must_use]
    pub fn compressed_to_full_map(&self) -> &[usize] {
        &self.compressed.compressed_to_full
    }

    /// Compressed bone containing the segment from full joint `joint` to its
    /// parent; `None` for the root.
    #[must_use]
    pub fn full_bone(&self, joint: usize) -> Option<usize> {
        self.compressed.bone_of.get(joint).copied().flatten()
    }

    /// Length of the segment from full joint `joint` to its parent, as a
    /// fraction of the compressed bone containing it.
    ///
    /// The fractions of all segments of one bone sum to 1. `None` for the
    /// root.
    #[must_use]
    pub fn fraction(&self, joint: usize) -> Option<f64> {
        self.compressed.fractions.get(joint).copied().flatten()
    }

    /// Distance from the child end of the containing compressed bone to
    /// full joint `joint`, as a fraction of that bone's length.
    ///
    /// 0 for a retained joint (it is the child end), in `(0, 1)` for a
    /// collapsed one. `None` for the root.
    #[must_use]
    pub fn cumulative_fraction(&self, joint: usize) -> Option<f64> {
        self.compressed.cumulative.get(joint).copied().flatten()
    }

    // =========================================================================
    // Tagging and scaling
    // =========================================================================

    /// Tag the named joint as a foot.
    ///
    /// # Errors
    ///
    /// - [`SkeletonError::UnknownJoint`] if no joint has this name.
    /// - [`SkeletonError::CollapsedJoint`] if compression removed it.
    pub fn mark_foot(&mut self, name: &str) -> SkeletonResult<()> {
        let c = self.retained(name)?;
        self.feet[c] = true;
        Ok(())
    }

    /// Tag the named joint as fat.
    ///
    /// # Errors
    ///
    /// - [`SkeletonError::UnknownJoint`] if no joint has this name.
    /// - [`SkeletonError::CollapsedJoint`] if compression removed it.
    pub fn mark_fat(&mut self, name: &str) -> SkeletonResult<()> {
        let c = self.retained(name)?;
        self.fat[c] = true;
        Ok(())
    }

    fn retained(&self, name: &str) -> SkeletonResult<usize> {
        let joint = self.joints.lookup(name)?;
        self.full_to_compressed(joint)
            .ok_or_else(|| SkeletonError::CollapsedJoint {
                name: name.to_string(),
            })
    }

    /// Scale every joint position and bone length by `factor`.
    ///
    /// Fractions, topology and tags are unchanged.
    pub fn scale(&mut self, factor: f64) {
        self.full.scale(factor);
        self.compressed.graph.scale(factor);
        for len in &mut self.compressed.bone_lengths {
            *len *= factor;
        }
    }

    /// Place every full joint given positions for the compressed joints.
    ///
    /// Retained joints take their compressed position. A collapsed joint is
    /// put on the straight line between its bone's child and parent ends, at
    /// its [`cumulative_fraction`](Self::cumulative_fraction) from the child
    /// end.
    ///
    /// # Errors
    ///
    /// Returns [`SkeletonError::PoseLengthMismatch`] unless `pose` has one
    /// position per compressed joint.
    pub fn reconstruct_full(&self, pose: &[Point3<f64>]) -> SkeletonResult<Vec<Point3<f64>>> {
        if pose.len() != self.compressed_len() {
            return Err(SkeletonError::PoseLengthMismatch {
                expected: self.compressed_len(),
                got: pose.len(),
            });
        }

        let placed = (0..self.len())
            .map(|joint| {
                if let Some(c) = self.full_to_compressed(joint) {
                    return pose[c];
                }
                let Some(bone) = self.full_bone(joint) else {
                    return Point3::origin();
                };
                let child = pose[bone];
                let parent = self.compressed_parent(bone).map_or(child, |p| pose[p]);
                let t = self.cumulative_fraction(joint).unwrap_or(0.0);
                child + (parent - child) * t
            })
            .collect();
        Ok(placed)
    }
}
