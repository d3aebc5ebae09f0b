//! Property-based tests for skeleton compression.
//!
//! Random joint trees are built through the public builder and checked
//! against the invariants compression promises.
//!
//! Run with: cargo test -p rig-skeleton -- proptest

use approx::relative_eq;
use nalgebra::Point3;
use proptest::prelude::*;
use rig_skeleton::{Skeleton, SkeletonBuilder};

// =============================================================================
// Strategies
// =============================================================================

/// A random tree: for each joint after the root, the index of its parent
/// among the joints before it, plus authored positions.
fn arb_tree() -> impl Strategy<Value = (Vec<usize>, Vec<[f64; 3]>)> {
    (1usize..40).prop_flat_map(|n| {
        (
            prop::collection::vec(any::<prop::sample::Index>(), n),
            prop::collection::vec(prop::array::uniform3(-1.0..1.0f64), n),
        )
            .prop_map(|(picks, positions)| {
                let parents = picks
                    .iter()
                    .enumerate()
                    .map(|(i, pick)| if i == 0 { 0 } else { pick.index(i) })
                    .collect();
                (parents, positions)
            })
    })
}

fn build((parents, positions): &(Vec<usize>, Vec<[f64; 3]>)) -> Skeleton {
    let mut builder = SkeletonBuilder::new();
    for (i, p) in positions.iter().enumerate() {
        let parent = (i > 0).then(|| format!("j{}", parents[i]));
        builder
            .add_joint(&format!("j{i}"), Point3::from(*p), parent.as_deref())
            .unwrap();
    }
    builder.compress()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn proptest_retention_rule_and_index_maps(tree in arb_tree()) {
        let s = build(&tree);
        let full = s.full_graph();

        for i in 0..s.len() {
            let kept = i == 0 || full.degree(i) != 2;
            prop_assert_eq!(s.full_to_compressed(i).is_some(), kept);
            if let Some(c) = s.full_to_compressed(i) {
                prop_assert_eq!(s.compressed_to_full(c), Some(i));
            }
        }
        prop_assert!(full.is_tree());
        prop_assert!(s.compressed_graph().is_tree());
    }

    #[test]
    fn proptest_fractions_rebuild_segment_lengths(tree in arb_tree()) {
        let s = build(&tree);
        let positions = s.full_graph().positions();
        let mut sums = vec![0.0; s.compressed_len()];

        for j in 1..s.len() {
            let bone = s.full_bone(j).unwrap();
            let fraction = s.fraction(j).unwrap();
            sums[bone] += fraction;

            let segment = (positions[j] - positions[s.parent(j).unwrap()]).norm();
            let rebuilt = fraction * s.bone_length(bone).unwrap();
            prop_assert!(relative_eq!(rebuilt, segment, epsilon = 1e-9));
        }
        for (c, sum) in sums.iter().enumerate().skip(1) {
            prop_assert!(relative_eq!(*sum, 1.0, epsilon = 1e-9), "bone {}: {}", c, sum);
        }
        prop_assert_eq!(s.fraction(0), None);
    }

    #[test]
    fn proptest_scale_round_trips(tree in arb_tree(), factor in 0.1..10.0f64) {
        let original = build(&tree);
        let mut s = original.clone();

        s.scale(factor);
        for j in 0..s.len() {
            prop_assert_eq!(s.fraction(j), original.fraction(j));
        }
        s.scale(1.0 / factor);

        for (a, b) in s.full_graph().positions().iter().zip(original.full_graph().positions()) {
            prop_assert!(relative_eq!(a, b, epsilon = 1e-9));
        }
        for (a, b) in s.bone_lengths().iter().zip(original.bone_lengths()) {
            prop_assert!(relative_eq!(*a, *b, epsilon = 1e-9));
        }
        prop_assert_eq!(s.compressed_to_full_map(), original.compressed_to_full_map());
    }

    #[test]
    fn proptest_reconstruction_stays_on_bones(tree in arb_tree()) {
        let s = build(&tree);
        let rest = s.compressed_graph().positions().to_vec();
        let full = s.reconstruct_full(&rest).unwrap();

        for j in 0..s.len() {
            if let Some(c) = s.full_to_compressed(j) {
                prop_assert_eq!(full[j], rest[c]);
                continue;
            }
            let bone = s.full_bone(j).unwrap();
            let a = rest[bone];
            let b = rest[s.compressed_parent(bone).unwrap()];
            let t = s.cumulative_fraction(j).unwrap();
            prop_assert!((0.0..=1.0).contains(&t));

            // On the segment: distances to the ends add up to its length.
            let detour = (full[j] - a).norm() + (b - full[j]).norm() - (b - a).norm();
            prop_assert!(detour.abs() < 1e-9);
        }
    }
}
