//! Eye landmark index mapping.
//!
//! Six landmarks per eye, ordered so the EAR formula can address them as
//! p1..p6: outer corner, two upper-lid points, inner corner, two lower-lid
//! points. The ids follow the MediaPipe FaceMesh topology the external
//! detector emits.

/// Which eye a landmark index set (or gesture) refers to, in the subject's
/// own anatomical frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Eye {
    Left,
    Right,
}

/// The six landmark ids describing one eye's outline.
///
/// Invariant: every id must reference a valid position in each landmark set
/// the estimator receives; the mapping is fixed configuration, not data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EyeIndices {
    pub outer_corner: usize,
    pub upper_lid_1: usize,
    pub upper_lid_2: usize,
    pub inner_corner: usize,
    pub lower_lid_1: usize,
    pub lower_lid_2: usize,
}

impl EyeIndices {
    /// The ids in p1..p6 order.
    pub fn ordered(&self) -> [usize; 6] {
        [
            self.outer_corner,
            self.upper_lid_1,
            self.upper_lid_2,
            self.inner_corner,
            self.lower_lid_1,
            self.lower_lid_2,
        ]
    }

    /// Largest id in the mapping; landmark sets must be at least this long.
    pub fn max_id(&self) -> usize {
        self.ordered().into_iter().max().unwrap_or(0)
    }

    pub fn for_eye(eye: Eye) -> &'static EyeIndices {
        match eye {
            Eye::Left => &LEFT_EYE,
            Eye::Right => &RIGHT_EYE,
        }
    }
}

/// Subject's left eye (MediaPipe FaceMesh).
pub const LEFT_EYE: EyeIndices = EyeIndices {
    outer_corner: 362,
    upper_lid_1: 385,
    upper_lid_2: 387,
    inner_corner: 263,
    lower_lid_1: 373,
    lower_lid_2: 380,
};

/// Subject's right eye (MediaPipe FaceMesh).
pub const RIGHT_EYE: EyeIndices = EyeIndices {
    outer_corner: 33,
    upper_lid_1: 160,
    upper_lid_2: 158,
    inner_corner: 133,
    lower_lid_1: 153,
    lower_lid_2: 144,
};
