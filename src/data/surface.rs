//! Surface geometry built from grid samples: a shaded triangle mesh or a wireframe.

use egui::ecolor::Hsva;
use egui::Color32;
use glam::DVec3;

use super::projection::Projector;
use super::sampler::GridSamples;

/// Color used when height coloring is off or every vertex has the same height.
pub const SURFACE_BASE_COLOR: Color32 = Color32::from_rgb(66, 133, 244);

/// Triangulated surface: two triangles per grid cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SurfaceMesh {
    pub positions: Vec<DVec3>,
    pub normals: Vec<DVec3>,
    pub colors: Vec<Color32>,
    /// Counter-clockwise when seen from +z.
    pub triangles: Vec<[u32; 3]>,
}

impl SurfaceMesh {
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Triangle indices ordered back to front for painter's-algorithm drawing.
    pub fn back_to_front(&self, projector: &Projector) -> Vec<usize> {
        let mut order: Vec<(usize, f64)> = self
            .triangles
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let c = (self.positions[t[0] as usize]
                    + self.positions[t[1] as usize]
                    + self.positions[t[2] as usize])
                    / 3.0;
                (i, projector.depth(c))
            })
            .collect();
        order.sort_by(|a, b| a.1.total_cmp(&b.1));
        order.into_iter().map(|(i, _)| i).collect()
    }
}

/// Build a mesh from grid samples.
///
/// Cells touching a missing vertex are skipped, which only happens when
/// the grid was sampled with [`MissingValuePolicy::Gap`](super::sampler::MissingValuePolicy::Gap).
pub fn build_mesh(grid: &GridSamples, color_by_height: bool) -> SurfaceMesh {
    let cols = grid.columns();
    let rows = grid.rows();
    let mut mesh = SurfaceMesh::default();
    if cols == 0 || rows == 0 {
        return mesh;
    }

    for (r, &y) in grid.ys.iter().enumerate() {
        for (c, &x) in grid.xs.iter().enumerate() {
            let z = grid.get(r, c).unwrap_or(0.0);
            mesh.positions.push(DVec3::new(x, y, z));
        }
    }

    let idx = |r: usize, c: usize| (r * cols + c) as u32;
    let present = |r: usize, c: usize| grid.get(r, c).is_some();
    for r in 0..rows.saturating_sub(1) {
        for c in 0..cols.saturating_sub(1) {
            if !(present(r, c) && present(r, c + 1) && present(r + 1, c) && present(r + 1, c + 1)) {
                continue;
            }
            let (v00, v10, v11, v01) = (idx(r, c), idx(r, c + 1), idx(r + 1, c + 1), idx(r + 1, c));
            mesh.triangles.push([v00, v10, v11]);
            mesh.triangles.push([v00, v11, v01]);
        }
    }

    mesh.normals = vertex_normals(&mesh.positions, &mesh.triangles);

    let range = grid.z_range();
    mesh.colors = mesh
        .positions
        .iter()
        .map(|p| match (color_by_height, range) {
            (true, Some(range)) => height_color(p.z, range),
            _ => SURFACE_BASE_COLOR,
        })
        .collect();
    mesh
}

/// Average of the unit normals of the faces around each vertex.
pub fn vertex_normals(positions: &[DVec3], triangles: &[[u32; 3]]) -> Vec<DVec3> {
    let mut acc = vec![DVec3::ZERO; positions.len()];
    for t in triangles {
        let [a, b, c] = t.map(|i| positions[i as usize]);
        let n = (b - a).cross(c - a).normalize_or_zero();
        for &i in t {
            acc[i as usize] += n;
        }
    }
    acc.into_iter()
        .map(|n| {
            let unit = n.normalize_or_zero();
            if unit == DVec3::ZERO {
                DVec3::Z
            } else {
                unit
            }
        })
        .collect()
}

/// Blue (low) to red (high) hue ramp; constant color when the range is degenerate.
pub fn height_color(z: f64, (lo, hi): (f64, f64)) -> Color32 {
    let span = hi - lo;
    if !(span > 0.0) || !span.is_finite() {
        return SURFACE_BASE_COLOR;
    }
    let t = ((z - lo) / span).clamp(0.0, 1.0);
    let hue = (240.0 * (1.0 - t)) / 360.0;
    Hsva::new(hue as f32, 0.75, 0.95, 1.0).into()
}

/// Two-sided Lambert shading with a fixed light from the upper-left front.
pub fn shade(color: Color32, view_normal: DVec3) -> Color32 {
    let light = DVec3::new(-0.3, 0.5, 1.0).normalize();
    let intensity = 0.35 + 0.65 * view_normal.dot(light).abs();
    let scale = |v: u8| (v as f64 * intensity).round().clamp(0.0, 255.0) as u8;
    Color32::from_rgb(scale(color.r()), scale(color.g()), scale(color.b()))
}

/// Wire lines of a grid: one family holds x fixed and sweeps y, the other
/// holds y fixed and sweeps x. Lines break at missing vertices.
pub fn wireframe_lines(grid: &GridSamples) -> Vec<Vec<DVec3>> {
    fn flush(run: &mut Vec<DVec3>, lines: &mut Vec<Vec<DVec3>>) {
        if run.len() >= 2 {
            lines.push(std::mem::take(run));
        } else {
            run.clear();
        }
    }

    let mut lines = Vec::new();
    let mut run: Vec<DVec3> = Vec::new();

    for (c, &x) in grid.xs.iter().enumerate() {
        for (r, &y) in grid.ys.iter().enumerate() {
            match grid.get(r, c) {
                Some(z) => run.push(DVec3::new(x, y, z)),
                None => flush(&mut run, &mut lines),
            }
        }
        flush(&mut run, &mut lines);
    }
    for (r, &y) in grid.ys.iter().enumerate() {
        for (c, &x) in grid.xs.iter().enumerate() {
            match grid.get(r, c) {
                Some(z) => run.push(DVec3::new(x, y, z)),
                None => flush(&mut run, &mut lines),
            }
        }
        flush(&mut run, &mut lines);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::View3dConfig;
    use crate::data::expression::compile;
    use crate::data::projection::Camera;
    use crate::data::sampler::{sample_2d, MissingValuePolicy};

    fn grid(text: &str, res: usize, policy: MissingValuePolicy) -> GridSamples {
        let f = compile(text).unwrap();
        sample_2d(&f, (-2.0, 2.0), (-2.0, 2.0), res, policy)
    }

    #[test]
    fn two_triangles_per_cell() {
        let mesh = build_mesh(&grid("x^2*y", 4, MissingValuePolicy::Fill(0.0)), true);
        assert_eq!(mesh.positions.len(), 25);
        assert_eq!(mesh.triangle_count(), 32);
        assert!(mesh.positions.iter().all(|p| p.z.is_finite()));
    }

    #[test]
    fn winding_faces_up_on_flat_surface() {
        let mesh = build_mesh(&grid("1", 3, MissingValuePolicy::Fill(0.0)), false);
        for t in &mesh.triangles {
            let [a, b, c] = t.map(|i| mesh.positions[i as usize]);
            assert!((b - a).cross(c - a).z > 0.0);
        }
        assert!(mesh.normals.iter().all(|n| (*n - DVec3::Z).length() < 1e-12));
    }

    #[test]
    fn flat_surface_uses_constant_color() {
        let mesh = build_mesh(&grid("2", 2, MissingValuePolicy::Fill(0.0)), true);
        assert!(mesh.colors.iter().all(|c| *c == SURFACE_BASE_COLOR));
        assert_eq!(height_color(1.0, (1.0, 1.0)), SURFACE_BASE_COLOR);
    }

    #[test]
    fn height_ramp_goes_blue_to_red() {
        let low = height_color(0.0, (0.0, 1.0));
        let high = height_color(1.0, (0.0, 1.0));
        assert!(low.b() > low.r());
        assert!(high.r() > high.b());
    }

    #[test]
    fn normals_are_unit_length() {
        let mesh = build_mesh(&grid("sin(x)*cos(y)", 6, MissingValuePolicy::Fill(0.0)), false);
        assert!(mesh.normals.iter().all(|n| (n.length() - 1.0).abs() < 1e-9));
    }

    #[test]
    fn gap_grid_skips_cells_with_missing_vertices() {
        let mesh = build_mesh(&grid("sqrt(x)", 4, MissingValuePolicy::Gap), false);
        // columns at x = -2, -1 are missing; x = 0, 1, 2 remain -> 2 cells wide
        assert_eq!(mesh.triangle_count(), 2 * 2 * 4);
    }

    #[test]
    fn wireframe_breaks_at_gaps() {
        let lines = wireframe_lines(&grid("sqrt(x)", 4, MissingValuePolicy::Gap));
        // 3 present columns sweeping y, plus 5 rows each broken down to x >= 0
        assert_eq!(lines.len(), 3 + 5);
        assert!(lines.iter().flatten().all(|p| p.x >= 0.0));
    }

    #[test]
    fn depth_order_is_back_to_front() {
        let mesh = build_mesh(&grid("x", 2, MissingValuePolicy::Fill(0.0)), false);
        let projector = Camera::new(&View3dConfig::default()).projector();
        let order = mesh.back_to_front(&projector);
        assert_eq!(order.len(), mesh.triangle_count());
        let depth = |i: usize| {
            let t = mesh.triangles[i];
            let c = t.iter().map(|&v| mesh.positions[v as usize]).sum::<DVec3>() / 3.0;
            projector.depth(c)
        };
        assert!(order.windows(2).all(|w| depth(w[0]) <= depth(w[1])));
    }
}
