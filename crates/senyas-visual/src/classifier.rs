//! Classifier boundary
//!
//! Trained models are opaque. A model either returns a prediction directly
//! ([`FrameClassifier`], [`SequenceClassifier`]) or a probability vector over
//! a known label set ([`ProbabilityModel`]), which the adapters here turn into
//! a prediction.

use std::collections::HashMap;
use std::sync::Arc;

use senyas_core::{SenyasError, SenyasResult};

use crate::features::{standardize, FeatureVector};

/// Default epsilon for window standardisation
pub const STANDARDIZE_EPSILON: f32 = 1e-6;

/// One classifier output
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub confidence: f32,
}

impl Prediction {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }

    /// Argmax over a probability vector, with aliases applied to the label
    pub fn from_probabilities(labels: &LabelSet, probabilities: &[f32]) -> SenyasResult<Self> {
        if probabilities.len() != labels.len() {
            return Err(SenyasError::Classifier(format!(
                "model returned {} probabilities for {} labels",
                probabilities.len(),
                labels.len()
            )));
        }

        let (index, confidence) = probabilities
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best: Option<(usize, f32)>, (i, p)| match best {
                Some((_, bp)) if bp >= p => best,
                _ => Some((i, p)),
            })
            .ok_or_else(|| SenyasError::Classifier("empty label set".into()))?;

        Ok(Prediction::new(labels.canonical_at(index), confidence))
    }
}

/// Ordered model labels plus aliases mapping model names to lesson names
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabelSet {
    labels: Vec<String>,
    aliases: HashMap<String, String>,
}

impl LabelSet {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            aliases: HashMap::new(),
        }
    }

    pub fn with_alias(mut self, model_label: &str, lesson_label: &str) -> Self {
        self.aliases
            .insert(model_label.to_string(), lesson_label.to_string());
        self
    }

    /// A..Z
    pub fn alphabet() -> Self {
        LabelSet::new(('A'..='Z').map(String::from))
    }

    /// 0..9
    pub fn digits() -> Self {
        LabelSet::new(('0'..='9').map(String::from))
    }

    /// Phrase model labels; the model says `thanks`, lessons say `thankyou`
    pub fn phrases() -> Self {
        LabelSet::new(["hello", "thanks", "iloveyou", "sorry"]).with_alias("thanks", "thankyou")
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Lesson name for a model label
    pub fn canonical<'a>(&'a self, label: &'a str) -> &'a str {
        self.aliases.get(label).map(String::as_str).unwrap_or(label)
    }

    fn canonical_at(&self, index: usize) -> String {
        self.canonical(&self.labels[index]).to_string()
    }

    /// Lesson-facing labels, aliases applied
    pub fn lesson_labels(&self) -> Vec<String> {
        self.labels
            .iter()
            .map(|l| self.canonical(l).to_string())
            .collect()
    }
}

/// Single-frame classifier
pub trait FrameClassifier: Send + Sync {
    /// Length of the feature vector this classifier accepts
    fn input_len(&self) -> usize;

    fn classify(&self, features: &FeatureVector) -> SenyasResult<Prediction>;
}

/// Fixed-window sequence classifier
pub trait SequenceClassifier: Send + Sync {
    /// Frames per window
    fn window_len(&self) -> usize;

    /// Length of each frame's feature vector
    fn frame_len(&self) -> usize;

    fn classify_window(&self, window: &[FeatureVector]) -> SenyasResult<Prediction>;
}

/// Raw model: feature values in, one probability per label out
pub trait ProbabilityModel: Send + Sync {
    fn input_len(&self) -> usize;

    fn probabilities(&self, input: &[f32]) -> SenyasResult<Vec<f32>>;
}

/// [`FrameClassifier`] over a [`ProbabilityModel`]
pub struct SoftmaxClassifier {
    model: Arc<dyn ProbabilityModel>,
    labels: LabelSet,
}

impl SoftmaxClassifier {
    pub fn new(model: Arc<dyn ProbabilityModel>, labels: LabelSet) -> Self {
        Self { model, labels }
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }
}

impl FrameClassifier for SoftmaxClassifier {
    fn input_len(&self) -> usize {
        self.model.input_len()
    }

    fn classify(&self, features: &FeatureVector) -> SenyasResult<Prediction> {
        features.check_len(self.model.input_len())?;
        let probabilities = self.model.probabilities(features.values())?;
        Prediction::from_probabilities(&self.labels, &probabilities)
    }
}

/// [`SequenceClassifier`] that standardises the window and flattens it
/// frame-major before handing it to a [`ProbabilityModel`]
pub struct StandardizedSequenceClassifier {
    model: Arc<dyn ProbabilityModel>,
    labels: LabelSet,
    window_len: usize,
    frame_len: usize,
    epsilon: f32,
}

impl StandardizedSequenceClassifier {
    pub fn new(
        model: Arc<dyn ProbabilityModel>,
        labels: LabelSet,
        window_len: usize,
        frame_len: usize,
    ) -> SenyasResult<Self> {
        if window_len == 0 || model.input_len() != window_len * frame_len {
            return Err(SenyasError::InvalidConfig(format!(
                "model takes {} values, window is {} x {}",
                model.input_len(),
                window_len,
                frame_len
            )));
        }
        Ok(Self {
            model,
            labels,
            window_len,
            frame_len,
            epsilon: STANDARDIZE_EPSILON,
        })
    }

    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }
}

impl SequenceClassifier for StandardizedSequenceClassifier {
    fn window_len(&self) -> usize {
        self.window_len
    }

    fn frame_len(&self) -> usize {
        self.frame_len
    }

    fn classify_window(&self, window: &[FeatureVector]) -> SenyasResult<Prediction> {
        if window.len() != self.window_len {
            return Err(SenyasError::FeatureLength {
                expected: self.window_len,
                actual: window.len(),
            });
        }
        for frame in window {
            frame.check_len(self.frame_len)?;
        }

        let input: Vec<f32> = standardize(window, self.epsilon)
            .into_iter()
            .flat_map(FeatureVector::into_inner)
            .collect();
        let probabilities = self.model.probabilities(&input)?;
        Prediction::from_probabilities(&self.labels, &probabilities)
    }
}
