//! Built-in skeleton templates.
//!
//! Positions are authored in `[-1, 1]` with +Y up. Human and centaur face
//! +Z with arms spread along X; the four-legged templates run along Z with
//! the head at +Z.

use std::fmt;
use std::str::FromStr;

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::builder::SkeletonBuilder;
use crate::error::{SkeletonError, SkeletonResult};
use crate::skeleton::Skeleton;

/// One authored joint.
struct JointDef {
    name: &'static str,
    position: [f64; 3],
    parent: Option<&'static str>,
}

const fn root(name: &'static str, x: f64, y: f64, z: f64) -> JointDef {
    JointDef {
        name,
        position: [x, y, z],
        parent: None,
    }
}

const fn joint(name: &'static str, x: f64, y: f64, z: f64, parent: &'static str) -> JointDef {
    JointDef {
        name,
        position: [x, y, z],
        parent: Some(parent),
    }
}

/// A complete template: joints parent first, then the relations.
struct TemplateDef {
    joints: &'static [JointDef],
    symmetric: &'static [(&'static str, &'static str)],
    feet: &'static [&'static str],
    fat: &'static [&'static str],
}

const HUMAN: TemplateDef = TemplateDef {
    joints: &[
        root("shoulders", 0.0, 0.5, 0.0),
        joint("back", 0.0, 0.15, 0.0, "shoulders"),
        joint("hips", 0.0, 0.0, 0.0, "back"),
        joint("head", 0.0, 0.7, 0.0, "shoulders"),
        joint("lthigh", -0.1, 0.0, 0.0, "hips"),
        joint("lknee", -0.15, -0.35, 0.0, "lthigh"),
        joint("lankle", -0.15, -0.8, 0.0, "lknee"),
        joint("lfoot", -0.15, -0.8, 0.1, "lankle"),
        joint("rthigh", 0.1, 0.0, 0.0, "hips"),
        joint("rknee", 0.15, -0.35, 0.0, "rthigh"),
        joint("rankle", 0.15, -0.8, 0.0, "rknee"),
        joint("rfoot", 0.15, -0.8, 0.1, "rankle"),
        joint("lshoulder", -0.2, 0.5, 0.0, "shoulders"),
        joint("lelbow", -0.4, 0.25, 0.075, "lshoulder"),
        joint("lhand", -0.6, 0.0, 0.15, "lelbow"),
        joint("rshoulder", 0.2, 0.5, 0.0, "shoulders"),
        joint("relbow", 0.4, 0.25, 0.075, "rshoulder"),
        joint("rhand", 0.6, 0.0, 0.15, "relbow"),
    ],
    symmetric: &[
        ("lthigh", "rthigh"),
        ("lknee", "rknee"),
        ("lankle", "rankle"),
        ("lfoot", "rfoot"),
        ("lshoulder", "rshoulder"),
        ("lelbow", "relbow"),
        ("lhand", "rhand"),
    ],
    feet: &["lfoot", "rfoot"],
    fat: &["hips", "shoulders", "head"],
};

const QUADRUPED: TemplateDef = TemplateDef {
    joints: &[
        root("shoulders", 0.0, 0.0, 0.5),
        joint("back", 0.0, 0.0, 0.0, "shoulders"),
        joint("hips", 0.0, 0.0, -0.5, "back"),
        joint("neck", 0.0, 0.2, 0.63, "shoulders"),
        joint("head", 0.0, 0.2, 0.9, "neck"),
        joint("lthigh", -0.15, 0.0, -0.5, "hips"),
        joint("lhknee", -0.2, -0.4, -0.5, "lthigh"),
        joint("lhfoot", -0.2, -0.8, -0.5, "lhknee"),
        joint("rthigh", 0.15, 0.0, -0.5, "hips"),
        joint("rhknee", 0.2, -0.4, -0.5, "rthigh"),
        joint("rhfoot", 0.2, -0.8, -0.5, "rhknee"),
        joint("lshoulder", -0.2, 0.0, 0.5, "shoulders"),
        joint("lfknee", -0.2, -0.4, 0.5, "lshoulder"),
        joint("lffoot", -0.2, -0.8, 0.5, "lfknee"),
        joint("rshoulder", 0.2, 0.0, 0.5, "shoulders"),
        joint("rfknee", 0.2, -0.4, 0.5, "rshoulder"),
        joint("rffoot", 0.2, -0.8, 0.5, "rfknee"),
        joint("tail", 0.0, 0.0, -0.7, "hips"),
    ],
    symmetric: &[
        ("lthigh", "rthigh"),
        ("lhknee", "rhknee"),
        ("lhfoot", "rhfoot"),
        ("lshoulder", "rshoulder"),
        ("lfknee", "rfknee"),
        ("lffoot", "rffoot"),
    ],
    feet: &["lhfoot", "rhfoot", "lffoot", "rffoot"],
    fat: &["hips", "shoulders", "head"],
};

const HORSE: TemplateDef = TemplateDef {
    joints: &[
        root("shoulders", 0.0, 0.0, 0.5),
        joint("back", 0.0, 0.0, 0.0, "shoulders"),
        joint("hips", 0.0, 0.0, -0.5, "back"),
        joint("neck", 0.0, 0.2, 0.63, "shoulders"),
        joint("head", 0.0, 0.2, 0.9, "neck"),
        joint("lthigh", -0.15, 0.0, -0.5, "hips"),
        joint("lhknee", -0.2, -0.2, -0.45, "lthigh"),
        joint("lhheel", -0.2, -0.4, -0.5, "lhknee"),
        joint("lhfoot", -0.2, -0.8, -0.5, "lhheel"),
        joint("rthigh", 0.15, 0.0, -0.5, "hips"),
        joint("rhknee", 0.2, -0.2, -0.45, "rthigh"),
        joint("rhheel", 0.2, -0.4, -0.5, "rhknee"),
        joint("rhfoot", 0.2, -0.8, -0.5, "rhheel"),
        joint("lshoulder", -0.2, 0.0, 0.5, "shoulders"),
        joint("lfknee", -0.2, -0.4, 0.5, "lshoulder"),
        joint("lffoot", -0.2, -0.8, 0.5, "lfknee"),
        joint("rshoulder", 0.2, 0.0, 0.5, "shoulders"),
        joint("rfknee", 0.2, -0.4, 0.5, "rshoulder"),
        joint("rffoot", 0.2, -0.8, 0.5, "rfknee"),
        joint("tail", 0.0, 0.0, -0.7, "hips"),
    ],
    symmetric: &[
        ("lthigh", "rthigh"),
        ("lhknee", "rhknee"),
        ("lhheel", "rhheel"),
        ("lhfoot", "rhfoot"),
        ("lshoulder", "rshoulder"),
        ("lfknee", "rfknee"),
        ("lffoot", "rffoot"),
    ],
    feet: &["lhfoot", "rhfoot", "lffoot", "rffoot"],
    fat: &["hips", "shoulders", "head"],
};

const CENTAUR: TemplateDef = TemplateDef {
    joints: &[
        root("shoulders", 0.0, 0.0, 0.5),
        joint("back", 0.0, 0.0, 0.0, "shoulders"),
        joint("hips", 0.0, 0.0, -0.5, "back"),
        joint("hback", 0.0, 0.25, 0.5, "shoulders"),
        joint("hshoulders", 0.0, 0.5, 0.5, "hback"),
        joint("head", 0.0, 0.7, 0.5, "hshoulders"),
        joint("lthigh", -0.15, 0.0, -0.5, "hips"),
        joint("lhknee", -0.2, -0.4, -0.45, "lthigh"),
        joint("lhfoot", -0.2, -0.8, -0.5, "lhknee"),
        joint("rthigh", 0.15, 0.0, -0.5, "hips"),
        joint("rhknee", 0.2, -0.4, -0.45, "rthigh"),
        joint("rhfoot", 0.2, -0.8, -0.5, "rhknee"),
        joint("lshoulder", -0.2, 0.0, 0.5, "shoulders"),
        joint("lfknee", -0.2, -0.4, 0.5, "lshoulder"),
        joint("lffoot", -0.2, -0.8, 0.5, "lfknee"),
        joint("rshoulder", 0.2, 0.0, 0.5, "shoulders"),
        joint("rfknee", 0.2, -0.4, 0.5, "rshoulder"),
        joint("rffoot", 0.2, -0.8, 0.5, "rfknee"),
        joint("hlshoulder", -0.2, 0.5, 0.5, "hshoulders"),
        joint("lelbow", -0.4, 0.25, 0.575, "hlshoulder"),
        joint("lhand", -0.6, 0.0, 0.65, "lelbow"),
        joint("hrshoulder", 0.2, 0.5, 0.5, "hshoulders"),
        joint("relbow", 0.4, 0.25, 0.575, "hrshoulder"),
        joint("rhand", 0.6, 0.0, 0.65, "relbow"),
        joint("tail", 0.0, 0.0, -0.7, "hips"),
    ],
    symmetric: &[
        ("lthigh", "rthigh"),
        ("lhknee", "rhknee"),
        ("lhfoot", "rhfoot"),
        ("lshoulder", "rshoulder"),
        ("lfknee", "rfknee"),
        ("lffoot", "rffoot"),
        ("hlshoulder", "hrshoulder"),
        ("lelbow", "relbow"),
        ("lhand", "rhand"),
    ],
    feet: &["lhfoot", "rhfoot", "lffoot", "rffoot"],
    fat: &["hips", "shoulders", "hshoulders", "head"],
};

/// The built-in skeletons.
///
/// # Example
///
/// ```
/// use rig_skeleton::SkeletonTemplate;
///
/// let template: SkeletonTemplate = "Horse".parse()?;
/// assert_eq!(template, SkeletonTemplate::Horse);
/// assert_eq!(template.to_string(), "horse");
///
/// let horse = template.build()?;
/// assert_eq!(horse.len(), 20);
/// assert_eq!(horse.feet().iter().filter(|&&f| f).count(), 4);
/// # Ok::<(), rig_skeleton::SkeletonError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SkeletonTemplate {
    /// Biped with arms; root at the shoulders.
    Human,
    /// Generic four-legged animal with neck and tail.
    Quadruped,
    /// Quadruped with an extra heel joint on the hind legs.
    Horse,
    /// Four-legged body with a human torso, arms and head.
    Centaur,
}

impl SkeletonTemplate {
    /// Every template.
    pub const ALL: [Self; 4] = [Self::Human, Self::Quadruped, Self::Horse, Self::Centaur];

    /// Lowercase template name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Quadruped => "quadruped",
            Self::Horse => "horse",
            Self::Centaur => "centaur",
        }
    }

    const fn def(self) -> &'static TemplateDef {
        match self {
            Self::Human => &HUMAN,
            Self::Quadruped => &QUADRUPED,
            Self::Horse => &HORSE,
            Self::Centaur => &CENTAUR,
        }
    }

    /// Build, compress and tag the template.
    ///
    /// # Errors
    ///
    /// Propagates builder and tagging errors. The built-in tables are
    /// consistent, so this only fails if a table is edited into an invalid
    /// state.
    pub fn build(self) -> SkeletonResult<Skeleton> {
        let def = self.def();

        let mut builder = SkeletonBuilder::new();
        for j in def.joints {
            builder.add_joint(j.name, Point3::from(j.position), j.parent)?;
        }
        for &(a, b) in def.symmetric {
            builder.mark_symmetric(a, b)?;
        }

        let mut skeleton = builder.compress();
        for name in def.feet {
            skeleton.mark_foot(name)?;
        }
        for name in def.fat {
            skeleton.mark_fat(name)?;
        }
        Ok(skeleton)
    }
}

impl fmt::Display for SkeletonTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SkeletonTemplate {
    type Err = SkeletonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "quadruped" | "quad" => Ok(Self::Quadruped),
            "horse" => Ok(Self::Horse),
            "centaur" => Ok(Self::Centaur),
            _ => Err(SkeletonError::UnknownTemplate {
                name: s.to_string(),
            }),
        }
    }
}
