//! Simulation session
//!
//! Everything one mounted canvas needs between frames: the bodies, playback
//! controls, ticker, plane transform and pointer state. UI code never mutates
//! this directly; it dispatches [`Intent`]s and the render loop reads the
//! result on the next frame.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::color::Color;
use crate::consts::{MAX_SPEED, MIN_SPEED};
use crate::error::SessionError;
use crate::persistence::{MovilSpec, Scenario};
use crate::settings::{PlaneTheme, Settings};

use super::movil::Movil;
use super::plane::{AbsolutePlane, MouseState, Viewport};
use super::ticker::{Ticker, TimeControls};
use super::vector::Vector;

/// Live drawing options
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayOptions {
    pub show_vectors: bool,
    pub show_grid: bool,
    pub show_labels: bool,
    pub vector_scale: f64,
    pub marker_radius: f64,
    pub theme: PlaneTheme,
}

impl From<&Settings> for DisplayOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            show_vectors: settings.show_vectors,
            show_grid: settings.show_grid,
            show_labels: settings.show_labels,
            vector_scale: settings.vector_scale,
            marker_radius: settings.marker_radius,
            theme: settings.theme,
        }
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

/// Property edit for one body
#[derive(Debug, Clone, PartialEq)]
pub enum MovilEdit<V> {
    Position(V),
    Velocity(V),
    Acceleration(V),
    Color(Color),
}

/// Request from the UI, applied by [`Session::dispatch`]
#[derive(Debug, Clone, PartialEq)]
pub enum Intent<V> {
    Play,
    Pause,
    TogglePlay,
    SetSpeed(f64),
    /// Rewind every body to t = 0 on the next frame
    Reset,
    /// Move the clock to this simulation time (seconds) on the next frame
    JumpTo(f64),
    SetMovementPrediction(bool),
    SetShowVectors(bool),
    SetShowGrid(bool),
    /// New body at rest at the origin with a palette color
    AddMovil,
    SpawnMovil(MovilSpec<V>),
    RemoveMovil(u32),
    EditMovil { id: u32, edit: MovilEdit<V> },
    /// Pointer events in canvas CSS pixels
    PointerDown(DVec2),
    PointerMove(DVec2),
    PointerUp,
    Wheel(f64),
    ResetView,
    LoadScenario(Scenario<V>),
}

/// State of one simulation surface
#[derive(Debug, Clone)]
pub struct Session<V: Vector> {
    pub(crate) movils: Vec<Movil<V>>,
    pub(crate) controls: TimeControls,
    pub(crate) display: DisplayOptions,
    pub(crate) ticker: Ticker,
    pub(crate) plane: AbsolutePlane,
    pub(crate) mouse: MouseState,
    pub(crate) viewport: Viewport,
    rng: Pcg32,
    next_id: u32,
    /// Pan/zoom changed since the last frame
    pub(crate) plane_dirty: bool,
    /// Something visible changed while paused
    pub(crate) needs_redraw: bool,
}

impl<V: Vector> Session<V> {
    /// Empty session with default settings; `seed` drives body colors
    pub fn new(seed: u64) -> Self {
        Self::with_settings(&Settings::default(), seed)
    }

    pub fn with_settings(settings: &Settings, seed: u64) -> Self {
        Self {
            movils: Vec::new(),
            controls: TimeControls {
                speed: settings.default_speed,
                movement_prediction: settings.movement_prediction,
                ..Default::default()
            },
            display: DisplayOptions::from(settings),
            ticker: Ticker::new(),
            plane: AbsolutePlane::default(),
            mouse: MouseState::default(),
            viewport: Viewport::default(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            plane_dirty: false,
            needs_redraw: true,
        }
    }

    pub fn movils(&self) -> &[Movil<V>] {
        &self.movils
    }

    pub fn movil(&self, id: u32) -> Option<&Movil<V>> {
        self.movils.iter().find(|m| m.id == id)
    }

    pub fn controls(&self) -> &TimeControls {
        &self.controls
    }

    pub fn display(&self) -> &DisplayOptions {
        &self.display
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn plane(&self) -> &AbsolutePlane {
        &self.plane
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.controls.playing
    }

    /// Whether a paused surface should still draw a frame
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw || self.controls.reset || self.controls.jump_to.is_some()
    }

    /// A pan gesture is in progress
    pub fn is_dragging(&self) -> bool {
        self.mouse.is_down
    }

    /// Draw once more even when paused (e.g. after the canvas was resized)
    pub fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Add a body and return its id
    pub fn add_movil(&mut self, spec: MovilSpec<V>) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.movils.push(spec.into_movil(id));
        self.needs_redraw = true;
        log::debug!("Added body {}", id);
        id
    }

    /// Current bodies and options as a shareable scenario
    pub fn scenario(&self) -> Scenario<V> {
        Scenario {
            movils: self.movils.iter().map(MovilSpec::from_movil).collect(),
            speed: self.controls.speed,
            show_vectors: self.display.show_vectors,
            movement_prediction: self.controls.movement_prediction,
        }
    }

    /// Apply one UI intent
    pub fn dispatch(&mut self, intent: Intent<V>) -> Result<(), SessionError> {
        match intent {
            Intent::Play => self.set_playing(true),
            Intent::Pause => self.set_playing(false),
            Intent::TogglePlay => self.set_playing(!self.controls.playing),
            Intent::SetSpeed(speed) => {
                if !(speed.is_finite() && (MIN_SPEED..=MAX_SPEED).contains(&speed)) {
                    return Err(SessionError::InvalidSpeed(speed));
                }
                self.controls.speed = speed;
            }
            Intent::Reset => self.controls.reset = true,
            Intent::JumpTo(target) => {
                if !(target.is_finite() && target >= 0.0) {
                    return Err(SessionError::InvalidTime(target));
                }
                self.controls.jump_to = Some(target);
            }
            Intent::SetMovementPrediction(on) => self.controls.movement_prediction = on,
            Intent::SetShowVectors(on) => self.display.show_vectors = on,
            Intent::SetShowGrid(on) => self.display.show_grid = on,
            Intent::AddMovil => {
                let color = Color::random(&mut self.rng);
                self.add_movil(MovilSpec {
                    position: V::ZERO,
                    velocity: V::ZERO,
                    acceleration: V::ZERO,
                    color,
                });
            }
            Intent::SpawnMovil(spec) => {
                self.add_movil(spec);
            }
            Intent::RemoveMovil(id) => {
                let index = self
                    .movils
                    .iter()
                    .position(|m| m.id == id)
                    .ok_or(SessionError::UnknownMovil(id))?;
                self.movils.remove(index);
                log::debug!("Removed body {}", id);
            }
            Intent::EditMovil { id, edit } => {
                let movil = self
                    .movils
                    .iter_mut()
                    .find(|m| m.id == id)
                    .ok_or(SessionError::UnknownMovil(id))?;
                match edit {
                    MovilEdit::Position(p) => movil.set_initial_position(p)?,
                    MovilEdit::Velocity(v) => movil.set_initial_velocity(v)?,
                    MovilEdit::Acceleration(a) => movil.set_acceleration(a)?,
                    MovilEdit::Color(c) => movil.set_color(c),
                }
            }
            Intent::PointerDown(at) => self.mouse.pointer_down(at),
            Intent::PointerMove(at) => {
                if self.mouse.pointer_move(at, &mut self.plane) {
                    self.plane_dirty = true;
                }
            }
            Intent::PointerUp => self.mouse.pointer_up(),
            Intent::Wheel(delta) => {
                if self.plane.zoom(delta) {
                    self.plane_dirty = true;
                }
            }
            Intent::ResetView => {
                self.plane.reset_view();
                self.plane_dirty = true;
            }
            Intent::LoadScenario(scenario) => self.load_scenario(scenario),
        }
        self.needs_redraw = true;
        Ok(())
    }

    fn set_playing(&mut self, playing: bool) {
        if playing && !self.controls.playing {
            // Wall time spent paused must not count as a frame delta
            self.ticker.rearm();
        }
        if playing != self.controls.playing {
            log::info!("Simulation {}", if playing { "playing" } else { "paused" });
        }
        self.controls.playing = playing;
    }

    fn load_scenario(&mut self, scenario: Scenario<V>) {
        let speed = scenario.clamped_speed();
        self.movils.clear();
        self.next_id = 1;
        for spec in scenario.movils {
            self.add_movil(spec);
        }
        self.controls = TimeControls {
            speed,
            movement_prediction: scenario.movement_prediction,
            ..Default::default()
        };
        self.display.show_vectors = scenario.show_vectors;
        self.ticker = Ticker::new();
        log::info!("Loaded scenario with {} bodies", self.movils.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KinematicsError;
    use crate::sim::vector::{Vec1, Vec2};

    fn spec(v: Vec2, a: Vec2) -> MovilSpec<Vec2> {
        MovilSpec {
            position: Vec2::ZERO,
            velocity: v,
            acceleration: a,
            color: Color::WHITE,
        }
    }

    #[test]
    fn test_add_and_remove_keep_ids_unique() {
        let mut session = Session::<Vec2>::new(1);
        session.dispatch(Intent::AddMovil).unwrap();
        session.dispatch(Intent::AddMovil).unwrap();
        session.dispatch(Intent::RemoveMovil(1)).unwrap();
        session.dispatch(Intent::AddMovil).unwrap();
        let ids: Vec<u32> = session.movils().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(
            session.dispatch(Intent::RemoveMovil(1)),
            Err(SessionError::UnknownMovil(1))
        );
    }

    #[test]
    fn test_spawn_and_recolor_from_editor_fields() {
        let mut session = Session::<Vec2>::new(1);
        let spawned = MovilSpec {
            position: crate::input::parse_vec2("Position", "1", "2").unwrap(),
            velocity: Vec2::new(6.0, 12.0),
            acceleration: Vec2::new(0.0, -9.8),
            color: crate::input::parse_color("Color", "#ef4444").unwrap(),
        };
        session.dispatch(Intent::SpawnMovil(spawned.clone())).unwrap();
        assert_eq!(session.scenario().movils, vec![spawned]);

        let green = crate::input::parse_color("Color", "#22c55e").unwrap();
        session
            .dispatch(Intent::EditMovil {
                id: 1,
                edit: MovilEdit::Color(green),
            })
            .unwrap();
        assert_eq!(session.movil(1).unwrap().color, green);
        assert_eq!(
            session.dispatch(Intent::EditMovil {
                id: 9,
                edit: MovilEdit::Color(green),
            }),
            Err(SessionError::UnknownMovil(9))
        );
    }

    #[test]
    fn test_invalid_speed_and_time_are_rejected() {
        let mut session = Session::<Vec1>::new(1);
        assert_eq!(
            session.dispatch(Intent::SetSpeed(f64::NAN)).unwrap_err().to_string(),
            "speed NaN is outside the allowed range"
        );
        assert!(session.dispatch(Intent::SetSpeed(MAX_SPEED * 2.0)).is_err());
        assert!(session.dispatch(Intent::JumpTo(-1.0)).is_err());
        assert_eq!(session.controls().speed, 1.0);
        assert_eq!(session.controls().jump_to, None);
        session.dispatch(Intent::SetSpeed(2.5)).unwrap();
        assert_eq!(session.controls().speed, 2.5);
    }

    #[test]
    fn test_edit_goes_through_validation() {
        let mut session = Session::<Vec2>::new(1);
        let id = session.add_movil(spec(Vec2::ZERO, Vec2::ZERO));
        session
            .dispatch(Intent::EditMovil {
                id,
                edit: MovilEdit::Velocity(Vec2::new(5.0, 0.0)),
            })
            .unwrap();
        assert_eq!(session.movil(id).unwrap().velocity(), Vec2::new(5.0, 0.0));

        let err = session
            .dispatch(Intent::EditMovil {
                id,
                edit: MovilEdit::Acceleration(Vec2::new(0.0, f64::INFINITY)),
            })
            .unwrap_err();
        assert_eq!(
            err,
            SessionError::Kinematics(KinematicsError::InvalidValue {
                id,
                field: "acceleration"
            })
        );
    }

    #[test]
    fn test_drag_and_wheel_mark_plane_dirty() {
        let mut session = Session::<Vec2>::new(1);
        session.plane_dirty = false;
        session.dispatch(Intent::PointerMove(DVec2::new(5.0, 5.0))).unwrap();
        assert!(!session.plane_dirty);

        session.dispatch(Intent::PointerDown(DVec2::new(0.0, 0.0))).unwrap();
        session.dispatch(Intent::PointerMove(DVec2::new(40.0, 0.0))).unwrap();
        session.dispatch(Intent::PointerUp).unwrap();
        assert!(session.plane_dirty);
        assert!(session.plane().position.x > 0.0);

        session.plane_dirty = false;
        session.dispatch(Intent::Wheel(-120.0)).unwrap();
        assert!(session.plane_dirty);
    }

    #[test]
    fn test_scenario_round_trip_through_session() {
        let mut session = Session::<Vec2>::new(7);
        session.add_movil(spec(Vec2::new(5.0, 0.0), Vec2::ZERO));
        session.add_movil(spec(Vec2::new(3.0, 4.0), Vec2::new(0.0, -9.8)));
        session.dispatch(Intent::SetShowVectors(true)).unwrap();
        session.dispatch(Intent::SetSpeed(0.5)).unwrap();
        let scenario = session.scenario();

        let mut restored = Session::<Vec2>::new(99);
        restored.dispatch(Intent::Play).unwrap();
        restored.dispatch(Intent::LoadScenario(scenario.clone())).unwrap();
        assert_eq!(restored.scenario(), scenario);
        assert!(!restored.is_playing());
        assert!(restored.display().show_vectors);
        assert_eq!(restored.movils().iter().map(|m| m.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_toggle_play() {
        let mut session = Session::<Vec2>::new(1);
        session.dispatch(Intent::TogglePlay).unwrap();
        assert!(session.is_playing());
        session.dispatch(Intent::TogglePlay).unwrap();
        assert!(!session.is_playing());
    }
}
