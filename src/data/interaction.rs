//! Pointer and wheel handling, decoupled from rendering.
//!
//! Controllers turn raw input into view-transform mutations and report
//! what the caller has to do next via [`ViewChange`]. Orbiting the 3D
//! camera is a pure view change; 2D pan/zoom changes the visible domain
//! and may ask for a resample.

use super::projection::{Camera, EulerAngles};
use super::view2d::View2d;

/// Raw pointer input in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Down { pos: [f64; 2] },
    Move { pos: [f64; 2] },
    /// Released anywhere, not only over the canvas.
    Up,
    /// Wheel delta in pixels; positive scrolls up.
    Wheel { delta: f64 },
}

/// What an input event requires from the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewChange {
    pub redraw: bool,
    pub resample: bool,
}

impl ViewChange {
    pub const NONE: Self = Self {
        redraw: false,
        resample: false,
    };
    pub const REDRAW: Self = Self {
        redraw: true,
        resample: false,
    };
    pub const RESAMPLE: Self = Self {
        redraw: true,
        resample: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrbitState {
    Idle,
    Dragging {
        start_pos: [f64; 2],
        start_angles: EulerAngles,
    },
}

/// Drag-to-rotate and wheel-to-zoom for the 3D camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitController {
    state: OrbitState,
    drag_sensitivity: f64,
    wheel_sensitivity: f64,
}

impl OrbitController {
    pub fn new(drag_sensitivity: f64, wheel_sensitivity: f64) -> Self {
        Self {
            state: OrbitState::Idle,
            drag_sensitivity,
            wheel_sensitivity,
        }
    }

    pub fn state(&self) -> OrbitState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, OrbitState::Dragging { .. })
    }

    pub fn handle(&mut self, input: PointerInput, camera: &mut Camera) -> ViewChange {
        match (input, self.state) {
            (PointerInput::Down { pos }, _) => {
                self.state = OrbitState::Dragging {
                    start_pos: pos,
                    start_angles: camera.angles,
                };
                ViewChange::NONE
            }
            (
                PointerInput::Move { pos },
                OrbitState::Dragging {
                    start_pos,
                    start_angles,
                },
            ) => {
                let dx = pos[0] - start_pos[0];
                let dy = pos[1] - start_pos[1];
                camera.angles = EulerAngles {
                    x: start_angles.x - dy * self.drag_sensitivity,
                    y: start_angles.y + dx * self.drag_sensitivity,
                    z: start_angles.z,
                };
                ViewChange::REDRAW
            }
            (PointerInput::Move { .. }, OrbitState::Idle) => ViewChange::NONE,
            (PointerInput::Up, _) => {
                self.state = OrbitState::Idle;
                ViewChange::NONE
            }
            (PointerInput::Wheel { delta }, _) => {
                let before = camera.zoom;
                camera.set_zoom(camera.zoom + delta * self.wheel_sensitivity);
                if camera.zoom != before {
                    ViewChange::REDRAW
                } else {
                    ViewChange::NONE
                }
            }
        }
    }
}

/// Drag-to-pan and wheel-to-zoom for the 2D chart.
///
/// Screen deltas are converted to data units with the current pixel scale,
/// supplied by the caller for every event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanZoomController {
    last_pos: Option<[f64; 2]>,
    wheel_sensitivity: f64,
    resample_on_change: bool,
}

impl PanZoomController {
    pub fn new(wheel_sensitivity: f64, resample_on_change: bool) -> Self {
        Self {
            last_pos: None,
            wheel_sensitivity,
            resample_on_change,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.last_pos.is_some()
    }

    fn domain_changed(&self) -> ViewChange {
        if self.resample_on_change {
            ViewChange::RESAMPLE
        } else {
            ViewChange::REDRAW
        }
    }

    /// `units_per_px` is the data-space size of one screen pixel along x and y.
    pub fn handle(&mut self, input: PointerInput, view: &mut View2d, units_per_px: [f64; 2]) -> ViewChange {
        match input {
            PointerInput::Down { pos } => {
                self.last_pos = Some(pos);
                ViewChange::NONE
            }
            PointerInput::Move { pos } => {
                let Some(last) = self.last_pos else {
                    return ViewChange::NONE;
                };
                self.last_pos = Some(pos);
                let dx = -(pos[0] - last[0]) * units_per_px[0];
                // screen y grows downward, data y grows upward
                let dy = (pos[1] - last[1]) * units_per_px[1];
                if dx == 0.0 && dy == 0.0 {
                    return ViewChange::NONE;
                }
                view.pan_by(dx, dy);
                if dx != 0.0 {
                    self.domain_changed()
                } else {
                    ViewChange::REDRAW
                }
            }
            PointerInput::Up => {
                self.last_pos = None;
                ViewChange::NONE
            }
            PointerInput::Wheel { delta } => {
                if delta == 0.0 {
                    return ViewChange::NONE;
                }
                let before = view.x_domain();
                view.zoom_by((1.0 - delta * self.wheel_sensitivity).clamp(0.5, 2.0));
                if view.x_domain() != before {
                    self.domain_changed()
                } else {
                    ViewChange::NONE
                }
            }
        }
    }

    /// The zoom in / zoom out / reset buttons.
    pub fn zoom_in(&self, view: &mut View2d) -> ViewChange {
        view.zoom_in();
        self.domain_changed()
    }

    pub fn zoom_out(&self, view: &mut View2d) -> ViewChange {
        view.zoom_out();
        self.domain_changed()
    }

    pub fn reset(&self, view: &mut View2d) -> ViewChange {
        view.reset();
        ViewChange::RESAMPLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{View2dConfig, View3dConfig};

    #[test]
    fn drag_rotates_from_start_angles() {
        let mut cam = Camera::new(&View3dConfig::default());
        let start = cam.angles;
        let mut orbit = OrbitController::new(0.01, 0.01);

        assert_eq!(orbit.handle(PointerInput::Down { pos: [100.0, 100.0] }, &mut cam), ViewChange::NONE);
        assert!(orbit.is_dragging());

        let change = orbit.handle(PointerInput::Move { pos: [150.0, 80.0] }, &mut cam);
        assert_eq!(change, ViewChange::REDRAW);
        assert!((cam.angles.y - (start.y + 0.5)).abs() < 1e-12);
        assert!((cam.angles.x - (start.x + 0.2)).abs() < 1e-12);

        // deltas are measured from the drag start, not accumulated per move
        orbit.handle(PointerInput::Move { pos: [150.0, 80.0] }, &mut cam);
        assert!((cam.angles.y - (start.y + 0.5)).abs() < 1e-12);

        orbit.handle(PointerInput::Up, &mut cam);
        assert_eq!(orbit.state(), OrbitState::Idle);
        let after = cam.angles;
        assert_eq!(orbit.handle(PointerInput::Move { pos: [0.0, 0.0] }, &mut cam), ViewChange::NONE);
        assert_eq!(cam.angles, after);
    }

    #[test]
    fn orbit_never_requests_resample() {
        let mut cam = Camera::new(&View3dConfig::default());
        let mut orbit = OrbitController::new(0.01, 0.01);
        let inputs = [
            PointerInput::Down { pos: [0.0, 0.0] },
            PointerInput::Move { pos: [10.0, 5.0] },
            PointerInput::Wheel { delta: 120.0 },
            PointerInput::Up,
        ];
        for input in inputs {
            assert!(!orbit.handle(input, &mut cam).resample);
        }
    }

    #[test]
    fn wheel_zoom_is_clamped_and_independent_of_drag() {
        let mut cam = Camera::new(&View3dConfig::default());
        let mut orbit = OrbitController::new(0.01, 0.01);
        orbit.handle(PointerInput::Wheel { delta: 500.0 }, &mut cam);
        assert_eq!(cam.zoom, 30.0);
        for _ in 0..100 {
            orbit.handle(PointerInput::Wheel { delta: 1000.0 }, &mut cam);
        }
        assert_eq!(cam.zoom, 100.0);
        assert_eq!(orbit.handle(PointerInput::Wheel { delta: 10.0 }, &mut cam), ViewChange::NONE);
        assert!(!orbit.is_dragging());
    }

    #[test]
    fn pan_moves_domain_against_drag() {
        let mut view = View2d::new(&View2dConfig::default());
        let mut pz = PanZoomController::new(0.001, true);
        pz.handle(PointerInput::Down { pos: [0.0, 0.0] }, &mut view, [0.1, 0.1]);
        let change = pz.handle(PointerInput::Move { pos: [10.0, 0.0] }, &mut view, [0.1, 0.1]);
        assert_eq!(change, ViewChange::RESAMPLE);
        let (a, b) = view.x_domain();
        assert!((a + 6.0).abs() < 1e-12 && (b - 4.0).abs() < 1e-12);
        pz.handle(PointerInput::Up, &mut view, [0.1, 0.1]);
        assert!(!pz.is_dragging());
    }

    #[test]
    fn rescale_only_mode_skips_resample() {
        let mut view = View2d::new(&View2dConfig::default());
        let pz = PanZoomController::new(0.001, false);
        assert_eq!(pz.zoom_in(&mut view), ViewChange::REDRAW);
        assert_eq!(view.x_domain(), (-4.0, 4.0));
    }
}
