//! Camera chaos - hostile capture conditions for recognition tests
//!
//! Wraps any [`Camera`] and degrades what it delivers:
//! - Dropped frames (nothing ready this tick)
//! - Lost detections, alone or in bursts (hand leaves the frame)
//! - Landmark jitter

use std::collections::VecDeque;

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use senyas_core::{SenyasResult, SessionTime};
use senyas_visual::{Camera, CameraFrame, Detection, HandLandmarks, Landmark};

/// Camera chaos configuration
#[derive(Clone, Debug)]
pub struct CameraChaosConfig {
    /// Probability a frame is not ready (0.0 - 1.0)
    pub frame_drop_rate: f64,
    /// Probability a detection is lost on an otherwise good frame
    pub detection_loss_rate: f64,
    /// Probability a burst of lost detections starts
    pub burst_loss_prob: f64,
    /// Burst length range, in frames
    pub burst_length: (u32, u32),
    /// Maximum landmark displacement, normalized units
    pub jitter: f32,
    /// Frames held back before delivery
    pub latency_frames: usize,
}

impl Default for CameraChaosConfig {
    fn default() -> Self {
        CameraChaosConfig {
            frame_drop_rate: 0.02,
            detection_loss_rate: 0.02,
            burst_loss_prob: 0.01,
            burst_length: (2, 4),
            jitter: 0.002,
            latency_frames: 0,
        }
    }
}

impl CameraChaosConfig {
    /// Steady hands, good light
    pub fn good() -> Self {
        CameraChaosConfig {
            frame_drop_rate: 0.001,
            detection_loss_rate: 0.001,
            burst_loss_prob: 0.0,
            burst_length: (1, 1),
            jitter: 0.001,
            latency_frames: 0,
        }
    }

    /// Dim room, slow webcam
    pub fn poor() -> Self {
        CameraChaosConfig {
            frame_drop_rate: 0.1,
            detection_loss_rate: 0.05,
            burst_loss_prob: 0.03,
            burst_length: (2, 6),
            jitter: 0.01,
            latency_frames: 2,
        }
    }

    /// Backlit learner who keeps leaving the frame
    pub fn hostile() -> Self {
        CameraChaosConfig {
            frame_drop_rate: 0.25,
            detection_loss_rate: 0.15,
            burst_loss_prob: 0.08,
            burst_length: (5, 15),
            jitter: 0.03,
            latency_frames: 4,
        }
    }
}

/// Camera chaos statistics
#[derive(Clone, Debug, Default)]
pub struct CameraChaosStats {
    pub frames_read: u64,
    pub frames_delivered: u64,
    pub frames_dropped: u64,
    pub detections_lost: u64,
    pub detections_jittered: u64,
}

impl CameraChaosStats {
    pub fn drop_rate(&self) -> f64 {
        if self.frames_read == 0 {
            0.0
        } else {
            self.frames_dropped as f64 / self.frames_read as f64
        }
    }

    pub fn detection_loss_rate(&self) -> f64 {
        let delivered = self.frames_delivered;
        if delivered == 0 {
            0.0
        } else {
            self.detections_lost as f64 / delivered as f64
        }
    }
}

/// A camera behind unreliable capture
pub struct ChaosCamera<C> {
    inner: C,
    config: CameraChaosConfig,
    rng: StdRng,
    delayed: VecDeque<CameraFrame>,
    burst_remaining: u32,
    stats: CameraChaosStats,
}

impl<C: Camera> ChaosCamera<C> {
    /// Create a chaos camera with seed
    pub fn new(inner: C, config: CameraChaosConfig, seed: u64) -> Self {
        ChaosCamera {
            inner,
            config,
            rng: StdRng::seed_from_u64(seed),
            delayed: VecDeque::new(),
            burst_remaining: 0,
            stats: CameraChaosStats::default(),
        }
    }

    pub fn stats(&self) -> &CameraChaosStats {
        &self.stats
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    fn should_lose_detection(&mut self) -> bool {
        if self.burst_remaining > 0 {
            self.burst_remaining -= 1;
            return true;
        }
        if self.rng.gen::<f64>() < self.config.burst_loss_prob {
            let (min, max) = self.config.burst_length;
            self.burst_remaining = self.rng.gen_range(min..=max.max(min)).saturating_sub(1);
            tracing::trace!(frames = self.burst_remaining + 1, "detection burst loss");
            return true;
        }
        self.rng.gen::<f64>() < self.config.detection_loss_rate
    }

    fn jitter(&mut self, detection: Detection) -> Detection {
        if self.config.jitter <= 0.0 {
            return detection;
        }
        let noise = Uniform::new_inclusive(-self.config.jitter, self.config.jitter);
        let mut shake = |hand: HandLandmarks| -> HandLandmarks {
            let points: Vec<Landmark> = hand
                .points()
                .iter()
                .map(|p| Landmark {
                    x: p.x + noise.sample(&mut self.rng),
                    y: p.y + noise.sample(&mut self.rng),
                    ..*p
                })
                .collect();
            HandLandmarks::from_points(points).unwrap_or(hand)
        };
        let jittered = Detection {
            pose: detection.pose,
            left_hand: detection.left_hand.map(&mut shake),
            right_hand: detection.right_hand.map(&mut shake),
        };
        self.stats.detections_jittered += 1;
        jittered
    }
}

impl<C: Camera> Camera for ChaosCamera<C> {
    fn open(&mut self) -> SenyasResult<()> {
        self.inner.open()
    }

    fn release(&mut self) {
        self.delayed.clear();
        self.burst_remaining = 0;
        self.inner.release();
    }

    fn is_open(&self) -> bool {
        self.inner.is_open()
    }

    fn try_read_frame(&mut self) -> Option<CameraFrame> {
        let frame = self.inner.try_read_frame()?;
        self.stats.frames_read += 1;

        if self.rng.gen::<f64>() < self.config.frame_drop_rate {
            self.stats.frames_dropped += 1;
            return None;
        }

        let CameraFrame {
            captured_at,
            detection,
        } = frame;
        let detection = match detection {
            Some(_) if self.should_lose_detection() => {
                self.stats.detections_lost += 1;
                None
            }
            Some(d) => Some(self.jitter(d)),
            None => None,
        };
        self.delayed.push_back(CameraFrame::new(captured_at, detection));

        if self.delayed.len() <= self.config.latency_frames {
            return None;
        }
        let delivered = self.delayed.pop_front()?;
        self.stats.frames_delivered += 1;
        Some(delivered)
    }
}

impl<C> std::fmt::Debug for ChaosCamera<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChaosCamera")
            .field("config", &self.config)
            .field("stats", &self.stats)
            .finish()
    }
}

/// Camera replaying a fixed script of detections, then repeating the last
#[derive(Debug, Default)]
pub struct ScriptedCamera {
    script: VecDeque<Option<Detection>>,
    last: Option<Detection>,
    open: bool,
    fail_open: bool,
    frames: u64,
}

impl ScriptedCamera {
    pub fn new<I>(script: I) -> Self
    where
        I: IntoIterator<Item = Option<Detection>>,
    {
        Self {
            script: script.into_iter().collect(),
            ..Self::default()
        }
    }

    /// A camera that can never be opened
    pub fn unavailable() -> Self {
        Self {
            fail_open: true,
            ..Self::default()
        }
    }
}

impl Camera for ScriptedCamera {
    fn open(&mut self) -> SenyasResult<()> {
        if self.fail_open {
            return Err(senyas_core::SenyasError::CameraUnavailable(
                "no capture device".into(),
            ));
        }
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
        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }
        self.frames += 1;
        Some(CameraFrame::new(
            SessionTime::from_millis(self.frames * 33),
            self.last.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::signing_detection;

    fn hand_camera() -> ScriptedCamera {
        ScriptedCamera::new([Some(signing_detection(0))])
    }

    #[test]
    fn test_good_conditions_deliver_most_frames() {
        let mut camera = ChaosCamera::new(hand_camera(), CameraChaosConfig::good(), 12345);
        camera.open().unwrap();

        let delivered = (0..1000)
            .filter_map(|_| camera.try_read_frame())
            .filter(|f| f.detection.is_some())
            .count();

        assert!(delivered > 980, "delivered {delivered}");
        assert_eq!(camera.stats().frames_read, 1000);
    }

    #[test]
    fn test_hostile_conditions_lose_frames() {
        let mut camera = ChaosCamera::new(hand_camera(), CameraChaosConfig::hostile(), 12345);
        camera.open().unwrap();
        for _ in 0..2000 {
            camera.try_read_frame();
        }

        let stats = camera.stats();
        assert!(stats.drop_rate() > 0.15, "{stats:?}");
        assert!(stats.detection_loss_rate() > 0.1, "{stats:?}");
    }

    #[test]
    fn test_latency_holds_frames_back() {
        let config = CameraChaosConfig {
            frame_drop_rate: 0.0,
            detection_loss_rate: 0.0,
            burst_loss_prob: 0.0,
            latency_frames: 3,
            ..CameraChaosConfig::default()
        };
        let mut camera = ChaosCamera::new(hand_camera(), config, 7);
        camera.open().unwrap();

        for _ in 0..3 {
            assert!(camera.try_read_frame().is_none());
        }
        let first = camera.try_read_frame().unwrap();
        assert_eq!(first.captured_at, SessionTime::from_millis(33));
    }

    #[test]
    fn test_jitter_stays_bounded() {
        let config = CameraChaosConfig {
            frame_drop_rate: 0.0,
            detection_loss_rate: 0.0,
            burst_loss_prob: 0.0,
            jitter: 0.01,
            ..CameraChaosConfig::default()
        };
        let original = signing_detection(0);
        let mut camera = ChaosCamera::new(hand_camera(), config, 99);
        camera.open().unwrap();

        let frame = camera.try_read_frame().unwrap();
        let shaken = frame.detection.unwrap();
        let before = original.primary_hand().unwrap().points();
        let after = shaken.primary_hand().unwrap().points();
        for (a, b) in before.iter().zip(after) {
            assert!((a.x - b.x).abs() <= 0.01 + f32::EPSILON);
            assert!((a.y - b.y).abs() <= 0.01 + f32::EPSILON);
            assert_eq!(a.z, b.z);
        }
        assert_eq!(shaken.pose, original.pose);
    }

    #[test]
    fn test_release_clears_backlog() {
        let config = CameraChaosConfig {
            frame_drop_rate: 0.0,
            latency_frames: 2,
            ..CameraChaosConfig::default()
        };
        let mut camera = ChaosCamera::new(hand_camera(), config, 1);
        camera.open().unwrap();
        camera.try_read_frame();
        camera.try_read_frame();
        camera.release();
        assert!(!camera.is_open());
        assert!(camera.try_read_frame().is_none());
    }

    #[test]
    fn test_unavailable_camera() {
        let mut camera = ScriptedCamera::unavailable();
        assert!(camera.open().is_err());
        assert!(camera.try_read_frame().is_none());
    }
}
