//! Per-frame render loop body
//!
//! Strict order each frame: viewport check, ticker step, clear, grid and
//! axes, then every body (update if playing, project, marker, arrows).
//! Nothing here schedules the next frame; the platform layer does that after
//! this returns.

use crate::sim::{AbsolutePlane, FrameTime, Session, Vector, Viewport};

use super::draw;
use super::surface::Surface;

/// Hooks the surrounding UI uses to mirror simulation state
pub trait FrameObserver {
    /// Simulation clock changed (seconds)
    fn on_time(&mut self, _time_count: f64) {}
    /// New FPS sample
    fn on_fps(&mut self, _fps: u32) {}
    /// Pan or zoom changed
    fn on_plane(&mut self, _plane: &AbsolutePlane) {}
}

/// Observer that ignores everything
impl FrameObserver for () {}

/// Summary of one rendered frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub time: FrameTime,
    /// The surface was resized before drawing
    pub resized: bool,
    pub drawn: usize,
    /// Bodies whose update was rejected this frame
    pub failed_updates: usize,
}

/// Run one frame
///
/// `measured` is the canvas size as laid out right now; a difference from the
/// session's last viewport resizes the surface before anything is drawn.
pub fn render_frame<V, S, O>(
    session: &mut Session<V>,
    surface: &mut S,
    measured: Viewport,
    now_ms: f64,
    observer: &mut O,
) -> FrameReport
where
    V: Vector,
    S: Surface + ?Sized,
    O: FrameObserver + ?Sized,
{
    let resized = measured != session.viewport;
    if resized {
        log::debug!(
            "Canvas resized to {}x{} @{}x",
            measured.width,
            measured.height,
            measured.dpr
        );
        session.viewport = measured;
        surface.resize(&measured);
        session.plane_dirty = true;
    }
    let viewport = session.viewport;

    let time = session
        .ticker
        .step(now_ms, &mut session.controls, &mut session.movils);

    let display = &session.display;
    let plane = &session.plane;
    let theme = display.theme;

    surface.clear(theme.background());
    if display.show_grid {
        draw::draw_grid(surface, plane, &viewport, theme);
    }
    draw::draw_axes(surface, plane, &viewport, theme);
    if display.show_labels {
        draw::draw_labels(surface, plane, &viewport, theme);
    }

    let mut failed_updates = 0;
    for movil in session.movils.iter_mut() {
        if session.controls.playing && time.sim_delta_ms != 0.0 {
            if let Err(e) = movil.update(time.sim_delta_ms) {
                log::warn!("{}", e);
                failed_updates += 1;
            }
        }

        let position = movil.position().to_plane();
        let at = plane.to_screen(position, &viewport);
        draw::draw_movil(surface, at, display.marker_radius, movil.color);

        if display.show_vectors {
            let velocity_tip = position + movil.velocity().to_plane() * display.vector_scale;
            draw::draw_arrow(
                surface,
                at,
                plane.to_screen(velocity_tip, &viewport),
                theme.velocity_arrow(),
            );
            let acceleration_tip =
                position + movil.acceleration().to_plane() * display.vector_scale;
            draw::draw_arrow(
                surface,
                at,
                plane.to_screen(acceleration_tip, &viewport),
                theme.acceleration_arrow(),
            );
        }
    }

    if time.sim_delta_ms != 0.0 || time.discontinuity {
        observer.on_time(time.time_count);
    }
    if let Some(fps) = time.fps {
        observer.on_fps(fps);
    }
    if session.plane_dirty {
        observer.on_plane(&session.plane);
        session.plane_dirty = false;
    }
    session.needs_redraw = false;

    FrameReport {
        time,
        resized,
        drawn: session.movils.len(),
        failed_updates,
    }
}
