//! Template skeletons for automatic rigging.
//!
//! A skeleton is authored as a tree of named joints. Embedding it into a
//! character mesh only needs the joints where something happens: the root,
//! the branch points and the tips. Compression folds every other joint into
//! the bone passing through it and remembers where along that bone it sat,
//! so the full skeleton can be rebuilt once the compressed one is posed.
//!
//! - [`SkeletonBuilder`] - Adds joints and symmetry pairs, then compresses
//! - [`Skeleton`] - Full and compressed joints, index maps, bone lengths,
//!   fractions, foot and fat tags
//! - [`SkeletonGraph`] - Undirected joint graph with rest positions
//! - [`SkeletonTemplate`] - Built-in human, quadruped, horse and centaur
//! - [`load_skeleton`] / [`parse_skeleton`] - Text-file skeletons
//!
//! # Build Order
//!
//! Joints are added parent first, then symmetry pairs, then
//! [`SkeletonBuilder::compress`] consumes the builder. Foot and fat tags live
//! on compressed joints, so they are set on the resulting [`Skeleton`];
//! there is no way to tag before compressing or to compress twice.
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.
//!
//! # Example
//!
//! ```
//! use rig_skeleton::SkeletonTemplate;
//!
//! let mut human = SkeletonTemplate::Human.build()?;
//! assert_eq!(human.len(), 18);
//! assert_eq!(human.compressed_len(), 7);
//!
//! // Fractions are ratios and survive scaling.
//! let knee = human.joint_index("lknee").unwrap();
//! let before = human.fraction(knee);
//! human.scale(2.0);
//! assert_eq!(human.fraction(knee), before);
//! # Ok::<(), rig_skeleton::SkeletonError>(())
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod builder;
mod compress;
mod error;
mod graph;
mod loader;
mod skeleton;
mod templates;

pub use builder::{AUTHORING_SCALE, SkeletonBuilder};
pub use error::{SkeletonError, SkeletonResult};
pub use graph::SkeletonGraph;
pub use loader::{ROOT_SENTINEL, load_skeleton, parse_skeleton};
pub use skeleton::Skeleton;
pub use templates::SkeletonTemplate;

// Re-export nalgebra types for convenience
pub use nalgebra::Point3;
