//! Landmarks - Hand and body keypoints as detected in one camera frame
//!
//! Coordinates are normalized to the cropped region of interest: x and y in
//! 0.0 - 1.0, z relative to the wrist (hands) or hips (pose).

use senyas_core::{SenyasError, SenyasResult};

/// Points per detected hand
pub const HAND_LANDMARKS: usize = 21;

/// Points per detected body pose
pub const POSE_LANDMARKS: usize = 33;

/// Hand keypoint identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandJoint {
    Wrist,

    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,

    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,

    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,

    RingMcp,
    RingPip,
    RingDip,
    RingTip,

    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl HandJoint {
    /// Fingertips, thumb first
    pub fn tips() -> &'static [HandJoint] {
        &[
            HandJoint::ThumbTip,
            HandJoint::IndexTip,
            HandJoint::MiddleTip,
            HandJoint::RingTip,
            HandJoint::PinkyTip,
        ]
    }
}

/// One keypoint
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Detector's visibility estimate; only meaningful for pose points
    pub visibility: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            x,
            y,
            z,
            visibility: 1.0,
        }
    }

    pub fn with_visibility(mut self, visibility: f32) -> Self {
        self.visibility = visibility;
        self
    }

    /// Linear interpolation
    pub fn lerp(&self, other: &Landmark, t: f32) -> Landmark {
        Landmark {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
            visibility: self.visibility + (other.visibility - self.visibility) * t,
        }
    }

    /// Planar distance, ignoring depth
    pub fn distance_xy(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// The 21 keypoints of one hand
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    points: Vec<Landmark>,
}

impl HandLandmarks {
    pub fn from_points(points: Vec<Landmark>) -> SenyasResult<Self> {
        if points.len() != HAND_LANDMARKS {
            return Err(SenyasError::FeatureLength {
                expected: HAND_LANDMARKS,
                actual: points.len(),
            });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    pub fn joint(&self, joint: HandJoint) -> &Landmark {
        &self.points[joint as usize]
    }

    /// Shift every point, used to synthesise motion
    pub fn translated(&self, dx: f32, dy: f32) -> HandLandmarks {
        HandLandmarks {
            points: self
                .points
                .iter()
                .map(|p| Landmark {
                    x: p.x + dx,
                    y: p.y + dy,
                    ..*p
                })
                .collect(),
        }
    }

    /// Interpolate between two hand shapes
    pub fn lerp(&self, other: &HandLandmarks, t: f32) -> HandLandmarks {
        let t = t.clamp(0.0, 1.0);
        HandLandmarks {
            points: self
                .points
                .iter()
                .zip(other.points.iter())
                .map(|(a, b)| a.lerp(b, t))
                .collect(),
        }
    }
}

/// The 33 keypoints of a body pose
#[derive(Debug, Clone, PartialEq)]
pub struct PoseLandmarks {
    points: Vec<Landmark>,
}

impl PoseLandmarks {
    pub fn from_points(points: Vec<Landmark>) -> SenyasResult<Self> {
        if points.len() != POSE_LANDMARKS {
            return Err(SenyasError::FeatureLength {
                expected: POSE_LANDMARKS,
                actual: points.len(),
            });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }
}

/// Which hand a detection belongs to, from the learner's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

/// Everything the landmark detector found in one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detection {
    pub pose: Option<PoseLandmarks>,
    pub left_hand: Option<HandLandmarks>,
    pub right_hand: Option<HandLandmarks>,
}

impl Detection {
    /// A single-hand detection, as produced by a hands-only tracker
    pub fn hand(handedness: Handedness, hand: HandLandmarks) -> Self {
        match handedness {
            Handedness::Left => Self {
                left_hand: Some(hand),
                ..Self::default()
            },
            Handedness::Right => Self {
                right_hand: Some(hand),
                ..Self::default()
            },
        }
    }

    pub fn with_pose(mut self, pose: PoseLandmarks) -> Self {
        self.pose = Some(pose);
        self
    }

    pub fn has_hands(&self) -> bool {
        self.left_hand.is_some() || self.right_hand.is_some()
    }

    /// The hand used by single-hand models: right if present, else left
    pub fn primary_hand(&self) -> Option<&HandLandmarks> {
        self.right_hand.as_ref().or(self.left_hand.as_ref())
    }

    pub fn hand_for(&self, handedness: Handedness) -> Option<&HandLandmarks> {
        match handedness {
            Handedness::Left => self.left_hand.as_ref(),
            Handedness::Right => self.right_hand.as_ref(),
        }
    }
}
