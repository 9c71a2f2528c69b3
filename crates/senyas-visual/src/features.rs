//! Feature vectors - Flattened landmark coordinates fed to classifiers
//!
//! Each model was trained on one fixed layout. The layout decides which
//! landmarks are read and in what order; a vector of the wrong length is a
//! configuration error, never a recognition miss.

use serde::{Deserialize, Serialize};

use senyas_core::{SenyasError, SenyasResult};

use crate::landmark::{Detection, HandLandmarks, HAND_LANDMARKS, POSE_LANDMARKS};

/// Values contributed by both hands in the holistic layout
pub const HOLISTIC_HAND_SPAN: usize = HAND_LANDMARKS * 3 * 2;

/// Flattened feature vector
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureVector(Vec<f32>);

impl FeatureVector {
    pub fn new(values: Vec<f32>) -> Self {
        FeatureVector(values)
    }

    pub fn zeros(len: usize) -> Self {
        FeatureVector(vec![0.0; len])
    }

    pub fn values(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }

    /// Fail unless the vector has exactly `expected` values
    pub fn check_len(&self, expected: usize) -> SenyasResult<()> {
        if self.0.len() != expected {
            return Err(SenyasError::FeatureLength {
                expected,
                actual: self.0.len(),
            });
        }
        Ok(())
    }

    /// Mean absolute value of the trailing `span` values
    pub fn motion_energy(&self, span: usize) -> f32 {
        motion_energy(&self.0, span)
    }
}

impl From<Vec<f32>> for FeatureVector {
    fn from(values: Vec<f32>) -> Self {
        FeatureVector(values)
    }
}

/// Feature layout a model was trained on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureLayout {
    /// One hand, (x, y) per point
    HandXy,
    /// One hand, (x, y, z) per point
    HandXyz,
    /// Pose (x, y, z, visibility) then left and right hand (x, y, z)
    Holistic,
}

impl FeatureLayout {
    /// Number of values in a vector of this layout
    pub const fn len(self) -> usize {
        match self {
            FeatureLayout::HandXy => HAND_LANDMARKS * 2,
            FeatureLayout::HandXyz => HAND_LANDMARKS * 3,
            FeatureLayout::Holistic => POSE_LANDMARKS * 4 + HOLISTIC_HAND_SPAN,
        }
    }

    /// Flatten a detection; `None` when the layout's subject is absent
    ///
    /// Hand layouts read the primary hand only. The holistic layout zero-fills
    /// whatever is missing and only returns `None` for an empty detection.
    pub fn extract(self, detection: &Detection) -> Option<FeatureVector> {
        match self {
            FeatureLayout::HandXy => {
                let hand = detection.primary_hand()?;
                let mut values = Vec::with_capacity(self.len());
                for p in hand.points() {
                    values.push(p.x);
                    values.push(p.y);
                }
                Some(FeatureVector(values))
            }
            FeatureLayout::HandXyz => {
                let hand = detection.primary_hand()?;
                let mut values = Vec::with_capacity(self.len());
                push_hand_xyz(&mut values, Some(hand));
                Some(FeatureVector(values))
            }
            FeatureLayout::Holistic => {
                if detection.pose.is_none() && !detection.has_hands() {
                    return None;
                }
                let mut values = Vec::with_capacity(self.len());
                match &detection.pose {
                    Some(pose) => {
                        for p in pose.points() {
                            values.extend_from_slice(&[p.x, p.y, p.z, p.visibility]);
                        }
                    }
                    None => values.resize(POSE_LANDMARKS * 4, 0.0),
                }
                push_hand_xyz(&mut values, detection.left_hand.as_ref());
                push_hand_xyz(&mut values, detection.right_hand.as_ref());
                Some(FeatureVector(values))
            }
        }
    }

    /// Values the motion gate inspects (the hands, at the tail)
    pub const fn hand_span(self) -> usize {
        match self {
            FeatureLayout::Holistic => HOLISTIC_HAND_SPAN,
            other => other.len(),
        }
    }
}

fn push_hand_xyz(values: &mut Vec<f32>, hand: Option<&HandLandmarks>) {
    match hand {
        Some(hand) => {
            for p in hand.points() {
                values.extend_from_slice(&[p.x, p.y, p.z]);
            }
        }
        None => values.resize(values.len() + HAND_LANDMARKS * 3, 0.0),
    }
}

/// Mean absolute value of the trailing `span` values
///
/// Zero-filled hands give zero energy, so frames without visible hands never
/// pass a positive motion threshold.
pub fn motion_energy(values: &[f32], span: usize) -> f32 {
    let span = span.min(values.len());
    if span == 0 {
        return 0.0;
    }
    let tail = &values[values.len() - span..];
    tail.iter().map(|v| v.abs()).sum::<f32>() / span as f32
}

/// Z-score a window over all of its values
pub fn standardize(window: &[FeatureVector], epsilon: f32) -> Vec<FeatureVector> {
    let count: usize = window.iter().map(|v| v.len()).sum();
    if count == 0 {
        return window.to_vec();
    }

    let mean = window
        .iter()
        .flat_map(|v| v.values().iter())
        .map(|&x| x as f64)
        .sum::<f64>()
        / count as f64;
    let variance = window
        .iter()
        .flat_map(|v| v.values().iter())
        .map(|&x| {
            let d = x as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / count as f64;
    let std = variance.sqrt() + epsilon as f64;

    window
        .iter()
        .map(|v| {
            FeatureVector(
                v.values()
                    .iter()
                    .map(|&x| ((x as f64 - mean) / std) as f32)
                    .collect(),
            )
        })
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn standardize_keeps_shape(window in prop::collection::vec(
            prop::collection::vec(-1.0f32..1.0, 8), 1..40)
        ) {
            let window: Vec<FeatureVector> = window.into_iter().map(FeatureVector::new).collect();
            let z = standardize(&window, STD_EPS);
            prop_assert_eq!(z.len(), window.len());
            prop_assert!(z.iter().all(|v| v.len() == 8));
            prop_assert!(z.iter().flat_map(|v| v.values().iter()).all(|x| x.is_finite()));
        }

        #[test]
        fn motion_energy_is_non_negative(values in prop::collection::vec(-1.0f32..1.0, 0..300), span in 0usize..300) {
            prop_assert!(motion_energy(&values, span) >= 0.0);
        }
    }

    const STD_EPS: f32 = 1e-6;
}
