//! Recognition challenge - one verification attempt for one expected label
//!
//! Single-frame mode classifies every observed vector. Temporal mode gates
//! frames on hand motion, keeps a rolling window and classifies once the
//! window is full. Both modes confirm through the same debounce rule: the last
//! `debounce_window` predictions name the expected label and the least
//! confident of them reaches the label's threshold.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use senyas_core::{SenyasError, SenyasResult};
use senyas_visual::{
    Detection, FeatureLayout, FeatureVector, FrameClassifier, Prediction, SequenceClassifier,
};

use crate::thresholds::{check_unit, ThresholdTable};

/// Frames per window of the shipped phrase model
pub const DEFAULT_SEQUENCE_WINDOW: usize = 30;

/// Temporal-mode settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalConfig {
    /// Minimum window confidence for a prediction to enter the history
    pub admission_threshold: f32,
    /// Mean absolute hand value a frame must exceed to be buffered
    pub motion_epsilon: f32,
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self {
            admission_threshold: 0.85,
            motion_epsilon: 0.01,
        }
    }
}

/// Challenge configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChallengeConfig {
    pub thresholds: ThresholdTable,
    /// Consecutive agreeing predictions needed to confirm
    pub debounce_window: usize,
    /// Bound on remembered predictions
    pub history_len: usize,
    pub temporal: TemporalConfig,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdTable::default(),
            debounce_window: 5,
            history_len: 15,
            temporal: TemporalConfig::default(),
        }
    }
}

impl ChallengeConfig {
    pub fn alphabet() -> Self {
        Self {
            thresholds: ThresholdTable::alphabet(),
            ..Self::default()
        }
    }

    pub fn digits() -> Self {
        Self {
            thresholds: ThresholdTable::digits(),
            ..Self::default()
        }
    }

    pub fn phrases() -> Self {
        Self {
            thresholds: ThresholdTable::phrases(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> SenyasResult<()> {
        self.thresholds.validate()?;
        if self.debounce_window == 0 {
            return Err(SenyasError::InvalidConfig(
                "debounce window must be positive".into(),
            ));
        }
        if self.history_len < self.debounce_window {
            return Err(SenyasError::InvalidConfig(format!(
                "history of {} cannot hold a debounce window of {}",
                self.history_len, self.debounce_window
            )));
        }
        check_unit("admission threshold", self.temporal.admission_threshold)?;
        let epsilon = self.temporal.motion_epsilon;
        if epsilon.is_nan() || epsilon < 0.0 {
            return Err(SenyasError::InvalidConfig(
                "motion epsilon must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// Classifier plus the feature layout it was trained on
#[derive(Clone)]
pub enum Recognizer {
    Frame {
        classifier: Arc<dyn FrameClassifier>,
        layout: FeatureLayout,
    },
    Sequence {
        classifier: Arc<dyn SequenceClassifier>,
        layout: FeatureLayout,
    },
}

impl Recognizer {
    pub fn frame(classifier: Arc<dyn FrameClassifier>, layout: FeatureLayout) -> Self {
        Recognizer::Frame { classifier, layout }
    }

    pub fn sequence(classifier: Arc<dyn SequenceClassifier>, layout: FeatureLayout) -> Self {
        Recognizer::Sequence { classifier, layout }
    }

    pub fn layout(&self) -> FeatureLayout {
        match self {
            Recognizer::Frame { layout, .. } | Recognizer::Sequence { layout, .. } => *layout,
        }
    }

    pub fn mode(&self) -> ChallengeMode {
        match self {
            Recognizer::Frame { .. } => ChallengeMode::SingleFrame,
            Recognizer::Sequence { .. } => ChallengeMode::TemporalSequence,
        }
    }
}

impl fmt::Debug for Recognizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recognizer")
            .field("mode", &self.mode())
            .field("layout", &self.layout())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeMode {
    SingleFrame,
    TemporalSequence,
}

/// Result of one observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Nothing to judge yet, or nothing seen
    Pending,
    Correct,
    /// A sign was seen and it was not the expected one
    Incorrect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChallengeState {
    #[default]
    Idle,
    Correct,
    Incorrect,
}

/// One remembered prediction
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub label: String,
    pub confidence: f32,
}

/// Per-challenge counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChallengeStats {
    /// Feature vectors handed to `observe`
    pub observed: u64,
    /// Frames dropped by the motion gate
    pub gated: u64,
    /// Classifier invocations
    pub classified: u64,
}

/// One verification attempt for one expected label
#[derive(Debug)]
pub struct RecognitionChallenge {
    expected: String,
    recognizer: Recognizer,
    config: ChallengeConfig,
    threshold: f32,
    window_len: usize,
    buffer: VecDeque<FeatureVector>,
    history: VecDeque<Observation>,
    state: ChallengeState,
    last_prediction: Option<Prediction>,
    stats: ChallengeStats,
}

impl RecognitionChallenge {
    pub fn new(
        expected: impl Into<String>,
        recognizer: Recognizer,
        config: ChallengeConfig,
    ) -> SenyasResult<Self> {
        config.validate()?;
        let layout = recognizer.layout();
        let (window_len, frame_len) = match &recognizer {
            Recognizer::Frame { classifier, .. } => (1, classifier.input_len()),
            Recognizer::Sequence { classifier, .. } => {
                (classifier.window_len(), classifier.frame_len())
            }
        };
        if window_len == 0 {
            return Err(SenyasError::InvalidConfig(
                "sequence window must be positive".into(),
            ));
        }
        if frame_len != layout.len() {
            return Err(SenyasError::InvalidConfig(format!(
                "classifier takes {frame_len} values per frame, {layout:?} extracts {}",
                layout.len()
            )));
        }

        let expected = expected.into();
        let threshold = config.thresholds.threshold_for(&expected);
        Ok(Self {
            expected,
            recognizer,
            threshold,
            window_len,
            buffer: VecDeque::with_capacity(window_len),
            history: VecDeque::with_capacity(config.history_len),
            config,
            state: ChallengeState::Idle,
            last_prediction: None,
            stats: ChallengeStats::default(),
        })
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }

    pub fn mode(&self) -> ChallengeMode {
        self.recognizer.mode()
    }

    pub fn layout(&self) -> FeatureLayout {
        self.recognizer.layout()
    }

    pub fn state(&self) -> ChallengeState {
        self.state
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn is_correct(&self) -> bool {
        self.state == ChallengeState::Correct
    }

    /// Most recent classifier output, for the debug overlay
    pub fn last_prediction(&self) -> Option<&Prediction> {
        self.last_prediction.as_ref()
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    pub fn history(&self) -> impl Iterator<Item = &Observation> {
        self.history.iter()
    }

    pub fn stats(&self) -> ChallengeStats {
        self.stats
    }

    /// Extract features with the recognizer's layout, then observe
    pub fn observe_detection(&mut self, detection: Option<&Detection>) -> SenyasResult<Verdict> {
        let features = detection.and_then(|d| self.recognizer.layout().extract(d));
        self.observe(features.as_ref())
    }

    /// Feed one frame; `None` means nothing was detected
    pub fn observe(&mut self, features: Option<&FeatureVector>) -> SenyasResult<Verdict> {
        if self.state == ChallengeState::Correct {
            return Ok(Verdict::Correct);
        }
        let Some(features) = features else {
            return Ok(Verdict::Pending);
        };
        features.check_len(self.recognizer.layout().len())?;
        self.stats.observed += 1;

        match &self.recognizer {
            Recognizer::Frame { classifier, .. } => {
                let classifier = Arc::clone(classifier);
                self.observe_frame(classifier.as_ref(), features)
            }
            Recognizer::Sequence { classifier, layout } => {
                let (classifier, layout) = (Arc::clone(classifier), *layout);
                self.observe_sequence(classifier.as_ref(), layout, features)
            }
        }
    }

    /// Discard buffered frames, history and verdict
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.history.clear();
        self.state = ChallengeState::Idle;
        self.last_prediction = None;
    }

    fn observe_frame(
        &mut self,
        classifier: &dyn FrameClassifier,
        features: &FeatureVector,
    ) -> SenyasResult<Verdict> {
        let prediction = classifier.classify(features)?;
        self.stats.classified += 1;

        let hit = prediction.label == self.expected && prediction.confidence >= self.threshold;
        self.remember(&prediction);
        self.last_prediction = Some(prediction);

        if !hit {
            self.state = ChallengeState::Incorrect;
            return Ok(Verdict::Incorrect);
        }
        if self.confirmed() {
            return Ok(self.confirm());
        }
        self.state = ChallengeState::Idle;
        Ok(Verdict::Pending)
    }

    fn observe_sequence(
        &mut self,
        classifier: &dyn SequenceClassifier,
        layout: FeatureLayout,
        features: &FeatureVector,
    ) -> SenyasResult<Verdict> {
        let energy = features.motion_energy(layout.hand_span());
        if energy <= self.config.temporal.motion_epsilon {
            self.stats.gated += 1;
            tracing::trace!(label = %self.expected, energy, "frame gated");
            return Ok(Verdict::Pending);
        }

        self.buffer.push_back(features.clone());
        while self.buffer.len() > self.window_len {
            self.buffer.pop_front();
        }
        if self.buffer.len() < self.window_len {
            return Ok(Verdict::Pending);
        }

        let prediction = classifier.classify_window(self.buffer.make_contiguous())?;
        self.stats.classified += 1;
        let admitted = prediction.confidence >= self.config.temporal.admission_threshold;
        if admitted {
            self.remember(&prediction);
        }
        self.last_prediction = Some(prediction);
        if !admitted {
            return Ok(Verdict::Pending);
        }

        if self.confirmed() {
            return Ok(self.confirm());
        }
        if self.unanimously_wrong() {
            self.state = ChallengeState::Incorrect;
            return Ok(Verdict::Incorrect);
        }
        self.state = ChallengeState::Idle;
        Ok(Verdict::Pending)
    }

    fn remember(&mut self, prediction: &Prediction) {
        self.history.push_back(Observation {
            label: prediction.label.clone(),
            confidence: prediction.confidence,
        });
        while self.history.len() > self.config.history_len {
            self.history.pop_front();
        }
    }

    fn recent(&self) -> Option<impl Iterator<Item = &Observation>> {
        let n = self.config.debounce_window;
        if self.history.len() < n {
            return None;
        }
        Some(self.history.iter().skip(self.history.len() - n))
    }

    fn confirmed(&self) -> bool {
        let Some(recent) = self.recent() else {
            return false;
        };
        let mut min_confidence = f32::INFINITY;
        for obs in recent {
            if obs.label != self.expected {
                return false;
            }
            min_confidence = min_confidence.min(obs.confidence);
        }
        min_confidence >= self.threshold
    }

    fn unanimously_wrong(&self) -> bool {
        let Some(mut recent) = self.recent() else {
            return false;
        };
        let Some(first) = recent.next() else {
            return false;
        };
        first.label != self.expected && recent.all(|obs| obs.label == first.label)
    }

    fn confirm(&mut self) -> Verdict {
        self.state = ChallengeState::Correct;
        tracing::info!(
            label = %self.expected,
            confidence = self.last_prediction.as_ref().map(|p| p.confidence),
            "sign confirmed"
        );
        Verdict::Correct
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    struct Fixed;

    impl FrameClassifier for Fixed {
        fn input_len(&self) -> usize {
            FeatureLayout::HandXy.len()
        }

        fn classify(&self, features: &FeatureVector) -> SenyasResult<Prediction> {
            Ok(Prediction::new("A", features.values()[0]))
        }
    }

    struct Window(usize);

    impl SequenceClassifier for Window {
        fn window_len(&self) -> usize {
            self.0
        }

        fn frame_len(&self) -> usize {
            FeatureLayout::Holistic.len()
        }

        fn classify_window(&self, window: &[FeatureVector]) -> SenyasResult<Prediction> {
            Ok(Prediction::new("hello", window[0].values()[0]))
        }
    }

    fn vector(layout: FeatureLayout, first: f32, fill: f32) -> FeatureVector {
        let mut values = vec![fill; layout.len()];
        values[0] = first;
        FeatureVector::new(values)
    }

    proptest! {
        #[test]
        fn below_threshold_never_correct(confidences in prop::collection::vec(0.0f32..0.95, 1..60)) {
            let mut challenge = RecognitionChallenge::new(
                "A",
                Recognizer::frame(Arc::new(Fixed), FeatureLayout::HandXy),
                ChallengeConfig::alphabet(),
            ).unwrap();
            for c in confidences {
                let verdict = challenge.observe(Some(&vector(FeatureLayout::HandXy, c, 0.0))).unwrap();
                prop_assert_ne!(verdict, Verdict::Correct);
            }
        }

        #[test]
        fn buffer_never_exceeds_window(
            window in 1usize..40,
            frames in prop::collection::vec((0.0f32..1.0, prop::bool::ANY), 0..120),
        ) {
            let mut challenge = RecognitionChallenge::new(
                "hello",
                Recognizer::sequence(Arc::new(Window(window)), FeatureLayout::Holistic),
                ChallengeConfig::phrases(),
            ).unwrap();
            for (confidence, moving) in frames {
                let fill = if moving { 0.5 } else { 0.0 };
                challenge.observe(Some(&vector(FeatureLayout::Holistic, confidence, fill))).unwrap();
                prop_assert!(challenge.buffered() <= window);
                prop_assert!(challenge.history().count() <= 15);
            }
        }
    }
}
