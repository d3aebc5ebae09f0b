//! Construction of the full skeleton.

use hashbrown::HashMap;
use nalgebra::Point3;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::compress::compress;
use crate::error::{SkeletonError, SkeletonResult};
use crate::graph::SkeletonGraph;
use crate::skeleton::Skeleton;

/// Factor applied to authored joint positions.
///
/// Templates are authored in `[-1, 1]`; halving them makes the skeleton fit
/// a mesh normalized to the unit box.
pub const AUTHORING_SCALE: f64 = 0.5;

/// Per-joint bookkeeping shared by the builder and the finished skeleton.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub(crate) struct JointTable {
    pub(crate) names: Vec<String>,
    pub(crate) index: HashMap<String, usize>,
    pub(crate) parents: Vec<Option<usize>>,
    /// Stored on the higher index of each pair, pointing to the lower.
    pub(crate) symmetry: Vec<Option<usize>>,
}

impl JointTable {
    pub(crate) fn lookup(&self, name: &str) -> SkeletonResult<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| SkeletonError::UnknownJoint {
                name: name.to_string(),
            })
    }

    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }
}

/// Builds a full skeleton joint by joint.
///
/// Joints must be added parent first; the first joint is the root and is
/// the only one without a parent. Once every joint and symmetry pair is
/// declared, [`compress`](Self::compress) consumes the builder and produces
/// the finished [`Skeleton`].
///
/// Each builder owns its own name table, so any number of skeletons can be
/// built side by side.
///
/// # Example
///
/// ```
/// use nalgebra::Point3;
/// use rig_skeleton::SkeletonBuilder;
///
/// let mut builder = SkeletonBuilder::new();
/// builder.add_joint("hips", Point3::new(0.0, 0.0, 0.0), None)?;
/// builder.add_joint("lknee", Point3::new(-0.2, -0.4, 0.0), Some("hips"))?;
/// builder.add_joint("lfoot", Point3::new(-0.2, -0.8, 0.0), Some("lknee"))?;
/// builder.add_joint("rknee", Point3::new(0.2, -0.4, 0.0), Some("hips"))?;
/// builder.add_joint("rfoot", Point3::new(0.2, -0.8, 0.0), Some("rknee"))?;
/// builder.mark_symmetric("lfoot", "rfoot")?;
///
/// let mut skeleton = builder.compress();
/// skeleton.mark_foot("lfoot")?;
///
/// // The knees pass straight through and are folded into the leg bones.
/// assert_eq!(skeleton.compressed_len(), 3);
/// assert_eq!(skeleton.compressed_symmetry(2), Some(1));
/// # Ok::<(), rig_skeleton::SkeletonError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SkeletonBuilder {
    graph: SkeletonGraph,
    joints: JointTable,
}

impl SkeletonBuilder {
    /// An empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a joint at the authored `position`, stored scaled by
    /// [`AUTHORING_SCALE`].
    ///
    /// `parent` of `None` (or an empty name) makes this joint the root.
    /// Returns the joint index, which is its insertion order.
    ///
    /// # Errors
    ///
    /// - [`SkeletonError::DuplicateJoint`] if `name` is taken.
    /// - [`SkeletonError::UnknownJoint`] if `parent` has not been added.
    /// - [`SkeletonError::MultipleRoots`] if `parent` is `None` and a root
    ///   exists.
    pub fn add_joint(
        &mut self,
        name: &str,
        position: Point3<f64>,
        parent: Option<&str>,
    ) -> SkeletonResult<usize> {
        if self.joints.index.contains_key(name) {
            return Err(SkeletonError::DuplicateJoint {
                name: name.to_string(),
            });
        }
        let parent = match parent.filter(|p| !p.is_empty()) {
            Some(parent) => Some(self.joints.lookup(parent)?),
            None => {
                if let Some(root) = self.joints.names.first() {
                    return Err(SkeletonError::MultipleRoots {
                        name: name.to_string(),
                        root: root.clone(),
                    });
                }
                None
            }
        };

        let index = self.graph.add_vertex(position * AUTHORING_SCALE);
        if let Some(parent) = parent {
            self.graph.add_edge(index, parent);
        }
        self.joints.names.push(name.to_string());
        self.joints.index.insert(name.to_string(), index);
        self.joints.parents.push(parent);
        self.joints.symmetry.push(None);
        Ok(index)
    }

    /// Declare `a` and `b` mirror images of each other.
    ///
    /// The pair is recorded on the higher-indexed joint, pointing to the
    /// lower one. Declaring a pair again replaces the earlier record.
    ///
    /// # Errors
    ///
    /// - [`SkeletonError::UnknownJoint`] if either name is unknown.
    /// - [`SkeletonError::SelfSymmetric`] if both names are the same joint.
    pub fn mark_symmetric(&mut self, a: &str, b: &str) -> SkeletonResult<()> {
        let ia = self.joints.lookup(a)?;
        let ib = self.joints.lookup(b)?;
        if ia == ib {
            return Err(SkeletonError::SelfSymmetric {
                name: a.to_string(),
            });
        }
        let (lo, hi) = if ia < ib { (ia, ib) } else { (ib, ia) };
        self.joints.symmetry[hi] = Some(lo);
        Ok(())
    }

    /// Index of a joint by name.
    #[must_use]
    pub fn joint_index(&self, name: &str) -> Option<usize> {
        self.joints.index.get(name).copied()
    }

    /// Number of joints added so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// Whether no joint has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.len() == 0
    }

    /// The full joint graph built so far.
    #[must_use]
    pub const fn graph(&self) -> &SkeletonGraph {
        &self.graph
    }

    #[cfg(test)]
    pub(crate) const fn joint_table(&self) -> &JointTable {
        &self.joints
    }

    /// Finish construction and derive the compressed skeleton.
    ///
    /// Joints of degree 2 other than the root are folded into the bone that
    /// passes through them. Foot and fat tags are applied afterwards on the
    /// returned [`Skeleton`].
    #[must_use]
    pub fn compress(self) -> Skeleton {
        let compression = compress(&self.graph, &self.joints);
        debug!(
            joints = self.graph.len(),
            compressed = compression.len(),
            "Compressed skeleton"
        );
        Skeleton::from_parts(self.graph, self.joints, compression)
    }
}
