//! Scripted classifiers
//!
//! Stand-ins for trained models. Each returns queued predictions in order,
//! repeats the last one once the script runs dry, and counts invocations so
//! tests can assert exactly when the model was consulted.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use senyas_core::{SenyasError, SenyasResult};
use senyas_visual::{FeatureLayout, FeatureVector, FrameClassifier, Prediction, SequenceClassifier};

#[derive(Debug, Default)]
struct Script {
    queue: VecDeque<Prediction>,
    last: Option<Prediction>,
    calls: u64,
    /// Fail this many upcoming calls
    failures: u32,
}

impl Script {
    fn next(&mut self) -> SenyasResult<Prediction> {
        self.calls += 1;
        if self.failures > 0 {
            self.failures -= 1;
            return Err(SenyasError::Classifier("scripted failure".into()));
        }
        if let Some(next) = self.queue.pop_front() {
            self.last = Some(next);
        }
        Ok(self
            .last
            .clone()
            .unwrap_or_else(|| Prediction::new("", 0.0)))
    }
}

/// Single-frame classifier driven by a script
#[derive(Debug)]
pub struct ScriptedFrameClassifier {
    layout: FeatureLayout,
    script: Mutex<Script>,
}

impl ScriptedFrameClassifier {
    pub fn new(layout: FeatureLayout) -> Arc<Self> {
        Arc::new(Self {
            layout,
            script: Mutex::new(Script::default()),
        })
    }

    pub fn layout(&self) -> FeatureLayout {
        self.layout
    }

    pub fn push(&self, label: &str, confidence: f32) {
        self.push_n(label, confidence, 1);
    }

    pub fn push_n(&self, label: &str, confidence: f32, n: usize) {
        let mut script = self.script.lock();
        for _ in 0..n {
            script.queue.push_back(Prediction::new(label, confidence));
        }
    }

    /// Make the next `n` calls fail with a classifier error
    pub fn fail_next(&self, n: u32) {
        self.script.lock().failures += n;
    }

    pub fn calls(&self) -> u64 {
        self.script.lock().calls
    }

    pub fn pending(&self) -> usize {
        self.script.lock().queue.len()
    }
}

impl FrameClassifier for ScriptedFrameClassifier {
    fn input_len(&self) -> usize {
        self.layout.len()
    }

    fn classify(&self, features: &FeatureVector) -> SenyasResult<Prediction> {
        features.check_len(self.layout.len())?;
        self.script.lock().next()
    }
}

/// Window classifier driven by a script
#[derive(Debug)]
pub struct ScriptedSequenceClassifier {
    window_len: usize,
    frame_len: usize,
    script: Mutex<Script>,
}

impl ScriptedSequenceClassifier {
    pub fn new(window_len: usize, layout: FeatureLayout) -> Arc<Self> {
        Arc::new(Self {
            window_len,
            frame_len: layout.len(),
            script: Mutex::new(Script::default()),
        })
    }

    pub fn push(&self, label: &str, confidence: f32) {
        self.push_n(label, confidence, 1);
    }

    pub fn push_n(&self, label: &str, confidence: f32, n: usize) {
        let mut script = self.script.lock();
        for _ in 0..n {
            script.queue.push_back(Prediction::new(label, confidence));
        }
    }

    pub fn calls(&self) -> u64 {
        self.script.lock().calls
    }
}

impl SequenceClassifier for ScriptedSequenceClassifier {
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
        self.script.lock().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_then_repeat_last() {
        let classifier = ScriptedFrameClassifier::new(FeatureLayout::HandXy);
        let features = FeatureVector::zeros(42);
        assert_eq!(classifier.classify(&features).unwrap().label, "");

        classifier.push("A", 0.9);
        classifier.push("B", 0.8);
        assert_eq!(classifier.classify(&features).unwrap().label, "A");
        assert_eq!(classifier.classify(&features).unwrap().label, "B");
        assert_eq!(classifier.classify(&features).unwrap().label, "B");
        assert_eq!(classifier.calls(), 4);
    }

    #[test]
    fn test_scripted_failure() {
        let classifier = ScriptedFrameClassifier::new(FeatureLayout::HandXy);
        classifier.fail_next(1);
        let features = FeatureVector::zeros(42);
        assert!(matches!(
            classifier.classify(&features),
            Err(SenyasError::Classifier(_))
        ));
        assert!(classifier.classify(&features).is_ok());
    }

    #[test]
    fn test_sequence_checks_window() {
        let classifier = ScriptedSequenceClassifier::new(3, FeatureLayout::HandXy);
        let short = vec![FeatureVector::zeros(42); 2];
        assert!(classifier.classify_window(&short).is_err());
        let window = vec![FeatureVector::zeros(42); 3];
        assert!(classifier.classify_window(&window).is_ok());
        assert_eq!(classifier.calls(), 1);
    }
}
