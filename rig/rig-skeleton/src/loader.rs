//! Skeletons described in a text file.
//!
//! One joint per line, parents before children:
//!
//! ```text
//! name x y z parent
//! ```
//!
//! Coordinates are in the normalized space the compressed skeleton lives in
//! (already halved), and `parent` is `-1` for the root. Lines with fewer than
//! five fields are skipped, as are lines starting with `#`. Symmetry and
//! foot/fat tags are not part of the format.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use nalgebra::Point3;
use tracing::{error, info, warn};

use crate::builder::{AUTHORING_SCALE, SkeletonBuilder};
use crate::error::{SkeletonError, SkeletonResult};
use crate::skeleton::Skeleton;

/// Parent field marking the root joint.
pub const ROOT_SENTINEL: &str = "-1";

/// Build and compress a skeleton from a joint listing.
///
/// # Errors
///
/// - [`SkeletonError::Parse`] for an unreadable coordinate or a line the
///   builder rejects (duplicate name, unknown parent, second root).
/// - [`SkeletonError::Io`] if reading fails.
///
/// # Example
///
/// ```
/// use rig_skeleton::parse_skeleton;
///
/// let text = "\
/// hips   0.0  0.0 0.0 -1
/// knee   0.0 -0.2 0.0 hips
/// foot   0.0 -0.4 0.0 knee
/// ";
/// let skeleton = parse_skeleton(text.as_bytes())?;
/// assert_eq!(skeleton.len(), 3);
/// assert_eq!(skeleton.compressed_len(), 2);
/// assert!((skeleton.bone_length(1).unwrap() - 0.4).abs() < 1e-12);
/// # Ok::<(), rig_skeleton::SkeletonError>(())
/// ```
pub fn parse_skeleton<R: BufRead>(reader: R) -> SkeletonResult<Skeleton> {
    let mut builder = SkeletonBuilder::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let number = i + 1;
        let words: Vec<&str> = line.split_whitespace().collect();

        if words.first().is_some_and(|w| w.starts_with('#')) {
            continue;
        }
        if words.len() < 5 {
            if !words.is_empty() {
                warn!(line = number, fields = words.len(), "Skipping short skeleton line");
            }
            continue;
        }

        let coord = |k: usize| {
            words[k].parse::<f64>().map_err(|_| SkeletonError::Parse {
                line: number,
                message: format!("invalid coordinate '{}'", words[k]),
            })
        };
        let position = Point3::new(coord(1)?, coord(2)?, coord(3)?) / AUTHORING_SCALE;
        let parent = (words[4] != ROOT_SENTINEL).then_some(words[4]);

        builder
            .add_joint(words[0], position, parent)
            .map_err(|err| SkeletonError::Parse {
                line: number,
                message: err.to_string(),
            })?;
    }

    Ok(builder.compress())
}

/// Load a skeleton file.
///
/// A file that cannot be opened is logged at error level and yields an
/// empty skeleton, leaving the decision to the caller.
///
/// # Errors
///
/// Same as [`parse_skeleton`] once the file is open.
pub fn load_skeleton<P: AsRef<Path>>(path: P) -> SkeletonResult<Skeleton> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            error!(path = %path.display(), error = %err, "Cannot open skeleton file");
            return Ok(Skeleton::empty());
        }
    };

    let skeleton = parse_skeleton(BufReader::new(file))?;
    info!(
        path = %path.display(),
        joints = skeleton.len(),
        compressed = skeleton.compressed_len(),
        "Loaded skeleton"
    );
    Ok(skeleton)
}
