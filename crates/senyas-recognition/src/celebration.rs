//! Celebration - timed reward shown after a confirmed sign
//!
//! `idle -> active -> idle`. While active, recognition is paused by the owning
//! scene. The confetti is decorative; completion is decided by elapsed time
//! first and by particle exhaustion second, bounded by a grace period.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use senyas_core::{SenyasError, SenyasResult, SessionTime};

const PALETTE: [[u8; 3]; 6] = [
    [255, 0, 0],
    [0, 255, 0],
    [0, 0, 255],
    [255, 255, 0],
    [255, 0, 255],
    [0, 255, 255],
];

/// Celebration configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CelebrationConfig {
    pub duration_ms: u64,
    /// Extra time allowed for particles still on screen
    pub grace_ms: u64,
    pub particle_count: usize,
    pub surface_width: f32,
    pub surface_height: f32,
    pub min_size: f32,
    pub max_size: f32,
    /// Fall speed range, px/s
    pub min_speed: f32,
    pub max_speed: f32,
    /// Rotation speed bound, deg/s, applied symmetrically
    pub max_rotation_speed: f32,
}

impl Default for CelebrationConfig {
    fn default() -> Self {
        Self {
            duration_ms: 5_000,
            grace_ms: 1_000,
            particle_count: 100,
            surface_width: 1024.0,
            surface_height: 600.0,
            min_size: 5.0,
            max_size: 15.0,
            min_speed: 150.0,
            max_speed: 360.0,
            max_rotation_speed: 240.0,
        }
    }
}

impl CelebrationConfig {
    /// Particles for a completed spelling word
    pub const WORD_PARTICLES: usize = 150;

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn grace(&self) -> Duration {
        Duration::from_millis(self.grace_ms)
    }

    pub fn validate(&self) -> SenyasResult<()> {
        if self.duration_ms == 0 {
            return Err(SenyasError::InvalidConfig(
                "celebration duration must be positive".into(),
            ));
        }
        let positive_range = |lo: f32, hi: f32| lo > 0.0 && lo <= hi;
        if !(self.surface_width > 0.0) || !(self.surface_height > 0.0) {
            return Err(SenyasError::InvalidConfig(
                "celebration surface must have a positive size".into(),
            ));
        }
        if !positive_range(self.min_size, self.max_size)
            || !positive_range(self.min_speed, self.max_speed)
            || self.max_rotation_speed.is_nan()
            || self.max_rotation_speed < 0.0
        {
            return Err(SenyasError::InvalidConfig(
                "celebration particle ranges are inverted or non-positive".into(),
            ));
        }
        Ok(())
    }
}

/// One confetti particle
#[derive(Debug, Clone, PartialEq)]
pub struct Confetti {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Fall speed, px/s
    pub speed: f32,
    /// Degrees
    pub rotation: f32,
    /// Degrees per second
    pub rotation_speed: f32,
    pub color: [u8; 3],
}

impl Confetti {
    fn spawn(rng: &mut StdRng, config: &CelebrationConfig) -> Self {
        Self {
            x: rng.gen_range(0.0..=config.surface_width),
            y: rng.gen_range(0.0..=config.surface_height / 3.0),
            width: rng.gen_range(config.min_size..=config.max_size),
            height: rng.gen_range(config.min_size..=config.max_size),
            speed: rng.gen_range(config.min_speed..=config.max_speed),
            rotation: rng.gen_range(0.0..360.0),
            rotation_speed: rng
                .gen_range(-config.max_rotation_speed..=config.max_rotation_speed),
            color: PALETTE[rng.gen_range(0..PALETTE.len())],
        }
    }

    fn fall(&mut self, secs: f32) {
        self.y += self.speed * secs;
        self.rotation = (self.rotation + self.rotation_speed * secs).rem_euclid(360.0);
    }

    fn on_screen(&self, config: &CelebrationConfig) -> bool {
        self.y <= config.surface_height && self.x >= 0.0 && self.x <= config.surface_width
    }
}

/// A running celebration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CelebrationEvent {
    pub started_at: SessionTime,
    pub duration: Duration,
    pub particle_count: usize,
}

/// Drives one celebration at a time
#[derive(Debug)]
pub struct CelebrationController {
    config: CelebrationConfig,
    rng: StdRng,
    event: Option<CelebrationEvent>,
    elapsed: Duration,
    particles: Vec<Confetti>,
    completed: u64,
}

impl CelebrationController {
    pub fn new(config: CelebrationConfig) -> SenyasResult<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic particle layout
    pub fn with_seed(config: CelebrationConfig, seed: u64) -> SenyasResult<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: CelebrationConfig, rng: StdRng) -> SenyasResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            event: None,
            elapsed: Duration::ZERO,
            particles: Vec::new(),
            completed: 0,
        })
    }

    pub fn config(&self) -> &CelebrationConfig {
        &self.config
    }

    /// Start with the configured particle count; ignored while active
    pub fn trigger(&mut self, now: SessionTime) -> bool {
        self.trigger_with(now, self.config.particle_count)
    }

    /// Start with an explicit particle count; ignored while active
    pub fn trigger_with(&mut self, now: SessionTime, particle_count: usize) -> bool {
        if self.event.is_some() {
            tracing::debug!("celebration already running, trigger ignored");
            return false;
        }

        let config = &self.config;
        let rng = &mut self.rng;
        self.particles = (0..particle_count)
            .map(|_| Confetti::spawn(rng, config))
            .collect();
        self.elapsed = Duration::ZERO;
        self.event = Some(CelebrationEvent {
            started_at: now,
            duration: self.config.duration(),
            particle_count,
        });
        tracing::debug!(particles = particle_count, "celebration started");
        true
    }

    pub fn is_active(&self) -> bool {
        self.event.is_some()
    }

    pub fn event(&self) -> Option<&CelebrationEvent> {
        self.event.as_ref()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn particles(&self) -> &[Confetti] {
        &self.particles
    }

    /// Celebrations finished since construction
    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Step time and particles; true exactly once, on the step that finishes
    pub fn advance(&mut self, dt: Duration) -> bool {
        let Some(event) = self.event else {
            return false;
        };

        self.elapsed += dt;
        let secs = dt.as_secs_f32();
        let config = &self.config;
        for particle in &mut self.particles {
            particle.fall(secs);
        }
        self.particles.retain(|p| p.on_screen(config));

        let past_duration = self.elapsed >= event.duration;
        let past_grace = self.elapsed >= event.duration + self.config.grace();
        if past_duration && (self.particles.is_empty() || past_grace) {
            self.finish();
            return true;
        }
        false
    }

    /// Drop a running celebration without reporting completion
    pub fn cancel(&mut self) {
        self.event = None;
        self.particles.clear();
        self.elapsed = Duration::ZERO;
    }

    fn finish(&mut self) {
        self.event = None;
        self.particles.clear();
        self.completed += 1;
        tracing::debug!(elapsed = ?self.elapsed, "celebration finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(33);

    fn controller() -> CelebrationController {
        CelebrationController::with_seed(CelebrationConfig::default(), 7).unwrap()
    }

    fn run_until_done(c: &mut CelebrationController, limit: Duration) -> usize {
        let mut finishes = 0;
        let mut t = Duration::ZERO;
        while t < limit {
            if c.advance(FRAME) {
                finishes += 1;
            }
            t += FRAME;
        }
        finishes
    }

    #[test]
    fn test_spawn_in_top_third() {
        let mut c = controller();
        assert!(c.trigger(SessionTime::ZERO));
        assert_eq!(c.particles().len(), 100);
        for p in c.particles() {
            assert!(p.y <= 200.0);
            assert!((5.0..=15.0).contains(&p.width));
            assert!((150.0..=360.0).contains(&p.speed));
        }
    }

    #[test]
    fn test_double_trigger_finishes_once() {
        let mut c = controller();
        assert!(c.trigger(SessionTime::ZERO));
        c.advance(Duration::from_millis(500));
        assert!(!c.trigger(SessionTime::from_millis(500)));
        assert_eq!(run_until_done(&mut c, Duration::from_secs(10)), 1);
        assert!(!c.is_active());
        assert_eq!(c.completed(), 1);
    }

    #[test]
    fn test_not_finished_before_duration() {
        let mut c = controller();
        c.trigger(SessionTime::ZERO);
        assert!(!c.advance(Duration::from_millis(4_900)));
        assert!(c.is_active());
        assert!(c.particles().is_empty());
        assert!(c.advance(Duration::from_millis(100)));
    }

    #[test]
    fn test_grace_period_caps_slow_particles() {
        let config = CelebrationConfig {
            min_speed: 1.0,
            max_speed: 1.0,
            ..CelebrationConfig::default()
        };
        let mut c = CelebrationController::with_seed(config, 1).unwrap();
        c.trigger(SessionTime::ZERO);
        assert!(!c.advance(Duration::from_millis(5_000)));
        assert!(!c.particles().is_empty());
        assert!(c.advance(Duration::from_millis(1_000)));
    }

    #[test]
    fn test_word_burst_and_cancel() {
        let mut c = controller();
        c.trigger_with(SessionTime::ZERO, CelebrationConfig::WORD_PARTICLES);
        assert_eq!(c.event().map(|e| e.particle_count), Some(150));
        c.cancel();
        assert!(!c.is_active());
        assert!(!c.advance(FRAME));
        assert_eq!(c.completed(), 0);
    }

    #[test]
    fn test_invalid_config() {
        let config = CelebrationConfig {
            min_size: 20.0,
            ..CelebrationConfig::default()
        };
        assert!(CelebrationController::new(config).is_err());
    }
}
