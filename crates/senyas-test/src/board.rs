//! Sign board - a shared "what the learner is signing right now"
//!
//! The board stands in for a real learner in front of a real camera. Tests
//! and the demo show a label on it; the [`BoardCamera`] then produces hand
//! detections and the board classifiers report that label. With nothing on
//! the board the camera sees an empty room.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use senyas_core::{SenyasError, SenyasResult, SessionTime};
use senyas_recognition::Recognizer;
use senyas_visual::{
    Camera, CameraFrame, Detection, FeatureLayout, FeatureVector, FrameClassifier,
    HandLandmarks, Handedness, Landmark, PoseLandmarks, Prediction, SequenceClassifier,
    HAND_LANDMARKS, POSE_LANDMARKS,
};

/// Frame period the board camera stamps its frames with
const FRAME_MICROS: u64 = 33_333;

/// The sign currently shown, shared between camera and classifiers
#[derive(Debug, Clone, Default)]
pub struct SignBoard {
    shown: Arc<Mutex<Option<Prediction>>>,
}

impl SignBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a sign with near-certain confidence
    pub fn show(&self, label: &str) {
        self.show_with(label, 0.99);
    }

    pub fn show_with(&self, label: &str, confidence: f32) {
        *self.shown.lock() = Some(Prediction::new(label, confidence));
    }

    pub fn clear(&self) {
        *self.shown.lock() = None;
    }

    pub fn current(&self) -> Option<Prediction> {
        self.shown.lock().clone()
    }

    fn read(&self) -> SenyasResult<Prediction> {
        self.current()
            .ok_or_else(|| SenyasError::Classifier("nothing on the sign board".into()))
    }

    /// Recognizers for the three lesson families, all reading this board
    pub fn recognizers(&self, phrase_window: usize) -> senyas_runtime::Recognizers {
        senyas_runtime::Recognizers {
            alphabet: Recognizer::frame(
                Arc::new(BoardClassifier::new(self.clone(), FeatureLayout::HandXy)),
                FeatureLayout::HandXy,
            ),
            digits: Recognizer::frame(
                Arc::new(BoardClassifier::new(self.clone(), FeatureLayout::HandXyz)),
                FeatureLayout::HandXyz,
            ),
            phrases: Recognizer::sequence(
                Arc::new(BoardSequenceClassifier::new(
                    self.clone(),
                    phrase_window,
                    FeatureLayout::Holistic,
                )),
                FeatureLayout::Holistic,
            ),
        }
    }
}

/// Camera that sees a signing hand whenever the board shows a sign
#[derive(Debug)]
pub struct BoardCamera {
    board: SignBoard,
    open: bool,
    frames: u64,
}

impl BoardCamera {
    pub fn new(board: SignBoard) -> Self {
        Self {
            board,
            open: false,
            frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Camera for BoardCamera {
    fn open(&mut self) -> SenyasResult<()> {
        self.open = true;
        Ok(())
    }

    fn release(&mut self) {
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn try_read_frame(&mut self) -> Option<CameraFrame> {
        if !self.open {
            return None;
        }
        self.frames += 1;
        let captured_at = SessionTime::from_micros(self.frames * FRAME_MICROS);
        let detection = self
            .board
            .current()
            .map(|_| signing_detection(self.frames));
        Some(CameraFrame::new(captured_at, detection))
    }
}

/// A right hand plus pose, swaying slightly from frame to frame
pub fn signing_detection(frame: u64) -> Detection {
    let sway = (frame % 8) as f32 * 0.005;
    let hand = (0..HAND_LANDMARKS)
        .map(|i| Landmark::new(0.35 + sway + i as f32 * 0.01, 0.45 + i as f32 * 0.005, -0.02))
        .collect();
    let pose = (0..POSE_LANDMARKS)
        .map(|i| Landmark::new(0.5, 0.1 + i as f32 * 0.02, 0.0).with_visibility(0.9))
        .collect();
    let mut detection = match HandLandmarks::from_points(hand) {
        Ok(hand) => Detection::hand(Handedness::Right, hand),
        Err(_) => Detection::default(),
    };
    if let Ok(pose) = PoseLandmarks::from_points(pose) {
        detection = detection.with_pose(pose);
    }
    detection
}

/// Frame classifier reporting whatever the board shows
#[derive(Debug)]
pub struct BoardClassifier {
    board: SignBoard,
    layout: FeatureLayout,
    calls: AtomicU64,
}

impl BoardClassifier {
    pub fn new(board: SignBoard, layout: FeatureLayout) -> Self {
        Self {
            board,
            layout,
            calls: AtomicU64::new(0),
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

impl FrameClassifier for BoardClassifier {
    fn input_len(&self) -> usize {
        self.layout.len()
    }

    fn classify(&self, features: &FeatureVector) -> SenyasResult<Prediction> {
        features.check_len(self.layout.len())?;
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.board.read()
    }
}

/// Window classifier reporting whatever the board shows
#[derive(Debug)]
pub struct BoardSequenceClassifier {
    board: SignBoard,
    window_len: usize,
    frame_len: usize,
    calls: AtomicU64,
}

impl BoardSequenceClassifier {
    pub fn new(board: SignBoard, window_len: usize, layout: FeatureLayout) -> Self {
        Self {
            board,
            window_len,
            frame_len: layout.len(),
            calls: AtomicU64::new(0),
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

impl SequenceClassifier for BoardSequenceClassifier {
    fn window_len(&self) -> usize {
        self.window_len
    }

    fn frame_len(&self) -> usize {
        self.frame_len
    }

    fn classify_window(&self, window: &[FeatureVector]) -> SenyasResult<Prediction> {
        if let Some(frame) = window.first() {
            frame.check_len(self.frame_len)?;
        }
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.board.read()
    }
}
