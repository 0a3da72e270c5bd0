//! Per-frame time management
//!
//! The ticker turns wall-clock frame timestamps into simulation time. Reset
//! and time jumps are one-shot requests on [`TimeControls`]; the ticker
//! consumes them and clears the flag on the frame it applies them.

use crate::consts::{FPS_SAMPLE_FRAMES, MAX_FRAME_DELTA_MS};

use super::movil::Movil;
use super::vector::Vector;

/// Playback controls shared with the UI
#[derive(Debug, Clone, PartialEq)]
pub struct TimeControls {
    pub playing: bool,
    /// Simulation seconds per wall-clock second
    pub speed: f64,
    /// Whether a time jump immediately moves bodies to the new time
    pub movement_prediction: bool,
    /// One-shot: rewind to t = 0 on the next frame
    pub reset: bool,
    /// One-shot: jump to this simulation time on the next frame
    pub jump_to: Option<f64>,
}

impl Default for TimeControls {
    fn default() -> Self {
        Self {
            playing: false,
            speed: 1.0,
            movement_prediction: true,
            reset: false,
            jump_to: None,
        }
    }
}

/// What one ticker step produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Wall-clock time since the previous frame (ms)
    pub wall_delta_ms: f64,
    /// Simulation time bodies must advance by this frame (ms, 0 unless playing)
    pub sim_delta_ms: f64,
    /// Simulation clock after this frame (s)
    pub time_count: f64,
    /// Fresh FPS sample, published once per `FPS_SAMPLE_FRAMES` frames
    pub fps: Option<u32>,
    /// A reset or jump was applied this frame
    pub discontinuity: bool,
}

/// Simulation clock for one rendering surface
#[derive(Debug, Clone, Default)]
pub struct Ticker {
    time_count: f64,
    last_time: Option<f64>,
    frame_count: u64,
    fps: u32,
    delta_time: f64,
    fps_window_start: Option<f64>,
    /// Frame intervals seen since `fps_window_start`
    fps_window_intervals: u64,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed simulation time in seconds
    #[inline]
    pub fn time_count(&self) -> f64 {
        self.time_count
    }

    #[inline]
    pub fn fps(&self) -> u32 {
        self.fps
    }

    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Wall-clock delta of the last frame (ms)
    #[inline]
    pub fn delta_time(&self) -> f64 {
        self.delta_time
    }

    /// Forget the previous frame timestamp (call when the loop restarts)
    pub fn rearm(&mut self) {
        self.last_time = None;
        self.frame_count = 0;
        self.fps_window_start = None;
        self.fps_window_intervals = 0;
    }

    /// Advance one animation frame at wall-clock `now_ms`
    ///
    /// Applies a pending reset (bodies rewound to t = 0) and then a pending
    /// jump. Without either, a playing clock advances by `delta · speed`.
    /// Bodies are not advanced here for regular playback; the caller feeds
    /// them `sim_delta_ms`.
    pub fn step<V: Vector>(
        &mut self,
        now_ms: f64,
        controls: &mut TimeControls,
        movils: &mut [Movil<V>],
    ) -> FrameTime {
        let wall_delta_ms = match self.last_time {
            Some(last) => (now_ms - last).clamp(0.0, MAX_FRAME_DELTA_MS),
            None => 0.0,
        };
        self.last_time = Some(now_ms);
        self.delta_time = wall_delta_ms;

        let mut discontinuity = false;
        let mut sim_delta_ms = 0.0;

        if controls.reset {
            for movil in movils.iter_mut() {
                if let Err(e) = movil.rewind() {
                    log::warn!("Reset skipped a body: {}", e);
                }
            }
            self.time_count = 0.0;
            self.frame_count = 0;
            self.fps_window_start = None;
            self.fps_window_intervals = 0;
            controls.reset = false;
            discontinuity = true;
            log::debug!("Simulation reset");
        }

        if let Some(target) = controls.jump_to.take() {
            let jump = target - self.time_count;
            if controls.movement_prediction {
                for movil in movils.iter_mut() {
                    if let Err(e) = movil.update(jump * 1000.0) {
                        log::warn!("Time jump skipped a body: {}", e);
                    }
                }
            }
            self.time_count = target;
            discontinuity = true;
            log::debug!(
                "Jumped to t = {:.3}s (prediction {})",
                self.time_count,
                controls.movement_prediction
            );
        }

        if controls.playing && !discontinuity {
            sim_delta_ms = wall_delta_ms * controls.speed;
            self.time_count += sim_delta_ms / 1000.0;
        }

        let fps = self.sample_fps(now_ms);

        FrameTime {
            wall_delta_ms,
            sim_delta_ms,
            time_count: self.time_count,
            fps,
            discontinuity,
        }
    }

    /// Publish once every `FPS_SAMPLE_FRAMES` intervals; the window opens on
    /// the first frame, which contributes no interval
    fn sample_fps(&mut self, now_ms: f64) -> Option<u32> {
        self.frame_count += 1;
        let Some(start) = self.fps_window_start else {
            self.fps_window_start = Some(now_ms);
            return None;
        };
        self.fps_window_intervals += 1;
        if self.fps_window_intervals < FPS_SAMPLE_FRAMES {
            return None;
        }
        self.fps_window_start = Some(now_ms);
        self.fps_window_intervals = 0;
        let elapsed = now_ms - start;
        if elapsed <= 0.0 {
            return None;
        }
        self.fps = (FPS_SAMPLE_FRAMES as f64 * 1000.0 / elapsed).round() as u32;
        Some(self.fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::sim::vector::Vec2;

    const FRAME: f64 = 1000.0 / 60.0;

    fn thrown() -> Vec<Movil<Vec2>> {
        vec![
            Movil::new(1, Vec2::ZERO, Vec2::new(5.0, 0.0), Vec2::ZERO, Color::WHITE),
            Movil::new(2, Vec2::ZERO, Vec2::ZERO, Vec2::new(0.0, -9.8), Color::WHITE),
        ]
    }

    fn playing() -> TimeControls {
        TimeControls {
            playing: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_first_frame_has_no_delta() {
        let mut ticker = Ticker::new();
        let mut controls = playing();
        let frame = ticker.step(12_345.0, &mut controls, &mut thrown());
        assert_eq!(frame.wall_delta_ms, 0.0);
        assert_eq!(frame.time_count, 0.0);
    }

    #[test]
    fn test_playing_advances_with_speed() {
        let mut ticker = Ticker::new();
        let mut controls = TimeControls {
            speed: 2.0,
            ..playing()
        };
        let mut movils = thrown();
        ticker.step(0.0, &mut controls, &mut movils);
        let frame = ticker.step(100.0, &mut controls, &mut movils);
        assert_eq!(frame.wall_delta_ms, 100.0);
        assert_eq!(frame.sim_delta_ms, 200.0);
        assert!((ticker.time_count() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_paused_does_not_advance() {
        let mut ticker = Ticker::new();
        let mut controls = TimeControls::default();
        let mut movils = thrown();
        ticker.step(0.0, &mut controls, &mut movils);
        let frame = ticker.step(500.0, &mut controls, &mut movils);
        assert_eq!(frame.sim_delta_ms, 0.0);
        assert_eq!(ticker.time_count(), 0.0);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut ticker = Ticker::new();
        let mut controls = playing();
        let mut movils = thrown();
        ticker.step(0.0, &mut controls, &mut movils);
        let frame = ticker.step(60_000.0, &mut controls, &mut movils);
        assert_eq!(frame.wall_delta_ms, MAX_FRAME_DELTA_MS);
    }

    #[test]
    fn test_reset_rewinds_bodies_and_clears_flag() {
        let mut ticker = Ticker::new();
        let mut controls = playing();
        let mut movils = thrown();
        let mut now = 0.0;
        for _ in 0..30 {
            let frame = ticker.step(now, &mut controls, &mut movils);
            for m in movils.iter_mut() {
                m.update(frame.sim_delta_ms).unwrap();
            }
            now += FRAME;
        }
        assert!(movils[0].position().x > 0.0);

        controls.reset = true;
        let frame = ticker.step(now, &mut controls, &mut movils);
        assert!(frame.discontinuity);
        assert!(!controls.reset);
        assert_eq!(ticker.time_count(), 0.0);
        assert_eq!(ticker.frame_count(), 1);
        assert_eq!(movils, thrown());
    }

    #[test]
    fn test_reset_at_zero_is_idempotent() {
        let mut ticker = Ticker::new();
        let mut controls = TimeControls {
            reset: true,
            ..Default::default()
        };
        let mut movils = thrown();
        ticker.step(0.0, &mut controls, &mut movils);
        assert_eq!(movils, thrown());
    }

    #[test]
    fn test_jump_with_prediction_moves_bodies() {
        let mut ticker = Ticker::new();
        let mut controls = TimeControls {
            jump_to: Some(10.0),
            ..Default::default()
        };
        let mut movils = thrown();
        ticker.step(0.0, &mut controls, &mut movils);
        assert_eq!(controls.jump_to, None);
        assert_eq!(ticker.time_count(), 10.0);
        assert!((movils[0].position().x - 50.0).abs() < 1e-9);
        assert!((movils[1].velocity().y + 98.0).abs() < 1e-9);
    }

    #[test]
    fn test_jump_without_prediction_only_moves_clock() {
        let mut ticker = Ticker::new();
        let mut controls = TimeControls {
            jump_to: Some(4.0),
            movement_prediction: false,
            ..Default::default()
        };
        let mut movils = thrown();
        ticker.step(0.0, &mut controls, &mut movils);
        assert_eq!(ticker.time_count(), 4.0);
        assert_eq!(movils, thrown());
    }

    #[test]
    fn test_stale_bodies_rewind_after_unpredicted_jump() {
        let mut ticker = Ticker::new();
        let mut controls = TimeControls {
            jump_to: Some(4.0),
            movement_prediction: false,
            ..Default::default()
        };
        let mut movils = thrown();
        ticker.step(0.0, &mut controls, &mut movils);
        assert_eq!(ticker.time_count(), 4.0);
        assert_eq!(movils[0].elapsed(), 0.0);

        controls.playing = true;
        ticker.rearm();
        let mut now = 1_000.0;
        for _ in 0..45 {
            let frame = ticker.step(now, &mut controls, &mut movils);
            for m in movils.iter_mut() {
                m.update(frame.sim_delta_ms).unwrap();
            }
            now += FRAME;
        }
        // Clock and bodies disagree: the clock kept the jump offset
        assert!(ticker.time_count() > 4.0);
        assert!(movils[0].elapsed() < 1.0);
        assert!(movils[0].position().x > 0.0);

        controls.reset = true;
        ticker.step(now, &mut controls, &mut movils);
        assert_eq!(ticker.time_count(), 0.0);
        assert_eq!(movils, thrown());
    }

    #[test]
    fn test_fps_sampled_once_per_window() {
        let mut ticker = Ticker::new();
        let mut controls = playing();
        let mut movils = thrown();
        let mut samples = Vec::new();
        for i in 0..=(FPS_SAMPLE_FRAMES * 2) {
            let frame = ticker.step(i as f64 * FRAME, &mut controls, &mut movils);
            if let Some(fps) = frame.fps {
                samples.push((i, fps));
            }
        }
        assert_eq!(samples.len(), 2);
        // The first frame only opens the window
        assert_eq!(samples[0], (FPS_SAMPLE_FRAMES, 60));
        assert_eq!(samples[1], (FPS_SAMPLE_FRAMES * 2, 60));
        assert_eq!(ticker.fps(), 60);
    }

    #[test]
    fn test_rearm_drops_paused_wall_time() {
        let mut ticker = Ticker::new();
        let mut controls = playing();
        let mut movils = thrown();
        ticker.step(0.0, &mut controls, &mut movils);
        ticker.rearm();
        let frame = ticker.step(90_000.0, &mut controls, &mut movils);
        assert_eq!(frame.wall_delta_ms, 0.0);
    }
}
