//! Camera boundary
//!
//! Pull-based and non-blocking. Frames arrive mirrored, cropped and already
//! reduced to landmark detections by the embedding application.

use senyas_core::{SenyasResult, SessionTime};

use crate::landmark::Detection;

/// One processed camera frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraFrame {
    pub captured_at: SessionTime,
    /// `None` when the detector found nothing in the frame
    pub detection: Option<Detection>,
}

impl CameraFrame {
    pub fn new(captured_at: SessionTime, detection: Option<Detection>) -> Self {
        Self {
            captured_at,
            detection,
        }
    }

    pub fn empty(captured_at: SessionTime) -> Self {
        Self::new(captured_at, None)
    }
}

/// A camera device plus its landmark detector
pub trait Camera: Send {
    fn open(&mut self) -> SenyasResult<()>;

    fn release(&mut self);

    fn is_open(&self) -> bool;

    /// Latest frame if one is ready; never blocks
    fn try_read_frame(&mut self) -> Option<CameraFrame>;
}
