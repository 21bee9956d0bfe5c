//! 3D camera state and the orthographic 3D → 2D projection.

use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};

use crate::config::View3dConfig;

/// Rotation angles in radians, applied as `Rz(z) · Ry(y) · Rx(x)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EulerAngles {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl EulerAngles {
    pub fn rotation(&self) -> DMat3 {
        DMat3::from_rotation_z(self.z) * DMat3::from_rotation_y(self.y) * DMat3::from_rotation_x(self.x)
    }
}

/// 3D view transform: orientation plus a zoom scalar in pixels per unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub angles: EulerAngles,
    pub zoom: f64,
    default_angles: EulerAngles,
    default_zoom: f64,
    zoom_range: (f64, f64),
}

impl Camera {
    pub fn new(cfg: &View3dConfig) -> Self {
        let angles = EulerAngles {
            x: cfg.initial_angles[0],
            y: cfg.initial_angles[1],
            z: cfg.initial_angles[2],
        };
        let zoom_range = (cfg.zoom_range[0], cfg.zoom_range[1]);
        let zoom = cfg.initial_zoom.clamp(zoom_range.0, zoom_range.1);
        Self {
            angles,
            zoom,
            default_angles: angles,
            default_zoom: zoom,
            zoom_range,
        }
    }

    /// Set the zoom, clamped to the configured range.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.zoom_range.0, self.zoom_range.1);
        }
    }

    pub fn zoom_range(&self) -> (f64, f64) {
        self.zoom_range
    }

    pub fn reset(&mut self) {
        self.angles = self.default_angles;
        self.zoom = self.default_zoom;
    }

    /// Build a projector for the current orientation; reuse it for a whole frame.
    pub fn projector(&self) -> Projector {
        Projector {
            rotation: self.angles.rotation(),
            zoom: self.zoom,
        }
    }
}

/// Orthographic projection with a precomputed rotation matrix.
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    rotation: DMat3,
    zoom: f64,
}

impl Projector {
    /// Screen offset from the canvas center; screen y grows downward.
    pub fn project(&self, p: DVec3) -> [f64; 2] {
        let r = self.rotation * p;
        [r.x * self.zoom, -r.y * self.zoom]
    }

    /// Distance toward the viewer after rotation; larger is closer.
    pub fn depth(&self, p: DVec3) -> f64 {
        (self.rotation * p).z
    }

    /// Rotate a direction (e.g. a normal) into view space.
    pub fn rotate(&self, v: DVec3) -> DVec3 {
        self.rotation * v
    }
}

/// One coordinate axis ready to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisLine {
    pub label: char,
    pub from: DVec3,
    pub to: DVec3,
    pub label_at: DVec3,
}

/// The x, y and z axes spanning `±range * 1.2`, labels just past the positive end.
pub fn axes(range: f64) -> [AxisLine; 3] {
    let len = range * 1.2;
    let make = |label, dir: DVec3| AxisLine {
        label,
        from: -dir * len,
        to: dir * len,
        label_at: dir * len * 1.1,
    };
    [
        make('x', DVec3::X),
        make('y', DVec3::Y),
        make('z', DVec3::Z),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f64; 2], b: [f64; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-9 && (a[1] - b[1]).abs() < 1e-9
    }

    fn camera(x: f64, y: f64, z: f64, zoom: f64) -> Camera {
        let mut cam = Camera::new(&View3dConfig::default());
        cam.angles = EulerAngles { x, y, z };
        cam.set_zoom(zoom);
        cam
    }

    #[test]
    fn identity_orientation_flips_screen_y() {
        let p = camera(0.0, 0.0, 0.0, 10.0).projector();
        assert!(close(p.project(DVec3::new(1.0, 2.0, 3.0)), [10.0, -20.0]));
    }

    #[test]
    fn yaw_quarter_turn_hides_x_axis() {
        let p = camera(0.0, std::f64::consts::FRAC_PI_2, 0.0, 10.0).projector();
        // after Ry(90°) the x axis points away from the viewer
        assert!(close(p.project(DVec3::X), [0.0, 0.0]));
        assert!((p.depth(DVec3::X) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn matches_explicit_matrix() {
        let (a, b, c) = (0.3_f64, -0.7_f64, 1.1_f64);
        let m = EulerAngles { x: c, y: b, z: a }.rotation();
        let axy = a.cos() * b.sin() * c.sin() - a.sin() * c.cos();
        let azy = b.cos() * c.sin();
        assert!((m.col(1).x - axy).abs() < 1e-12);
        assert!((m.col(1).z - azy).abs() < 1e-12);
        assert!((m.col(0).z + b.sin()).abs() < 1e-12);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cam = Camera::new(&View3dConfig::default());
        cam.set_zoom(1000.0);
        assert_eq!(cam.zoom, 100.0);
        cam.set_zoom(0.0);
        assert_eq!(cam.zoom, 5.0);
        cam.reset();
        assert_eq!(cam.zoom, 25.0);
    }

    #[test]
    fn axes_are_labelled_and_symmetric() {
        let ax = axes(10.0);
        assert_eq!(ax.map(|a| a.label), ['x', 'y', 'z']);
        assert_eq!(ax[2].to, DVec3::new(0.0, 0.0, 12.0));
        assert_eq!(ax[2].from, -ax[2].to);
    }
}
