use egui::{Align2, Color32, FontId, Pos2, Sense, Shape, Stroke, Ui};
use glam::DVec3;

use super::panel_trait::{Panel, PanelState};
use crate::config::{MultiCalcConfig, SamplingConfig, SurfaceStyle};
use crate::data::expression::Evaluator;
use crate::data::interaction::{OrbitController, PointerInput, ViewChange};
use crate::data::projection::{axes, Camera, Projector};
use crate::data::sampler::{sample_2d, MissingValuePolicy};
use crate::data::session::SessionData;
use crate::data::surface::{build_mesh, shade, wireframe_lines, SurfaceMesh, SURFACE_BASE_COLOR};

const AXIS_COLORS: [Color32; 3] = [
    Color32::from_rgb(220, 50, 47),
    Color32::from_rgb(60, 170, 60),
    Color32::from_rgb(50, 100, 220),
];

/// Geometry of the surface currently on screen.
#[derive(Debug, Clone, PartialEq)]
enum Surface {
    Wireframe(Vec<Vec<DVec3>>),
    Mesh(SurfaceMesh),
}

/// Orbitable surface plot of `f(x, y)` on a fixed square domain.
pub struct Plot3dPanel {
    pub state: PanelState,
    pub camera: Camera,
    pub style: SurfaceStyle,
    pub color_by_height: bool,
    orbit: OrbitController,
    sampling: SamplingConfig,
    surface: Surface,
    seen_revision: u64,
    needs_rebuild: bool,
}

impl Plot3dPanel {
    pub fn new(cfg: &MultiCalcConfig) -> Self {
        Self {
            state: PanelState::new("3D Plot", egui_phosphor::regular::CUBE),
            camera: Camera::new(&cfg.view3d),
            style: cfg.view3d.surface_style,
            color_by_height: cfg.view3d.color_by_height,
            orbit: OrbitController::new(cfg.view3d.drag_sensitivity, cfg.view3d.wheel_sensitivity),
            sampling: cfg.sampling.clone(),
            surface: Surface::Wireframe(Vec::new()),
            seen_revision: 0,
            needs_rebuild: true,
        }
    }

    /// Resample `f` on the surface grid for the current style.
    pub fn rebuild(&mut self, f: &Evaluator) {
        let domain = self.sampling.surface_domain();
        self.surface = match self.style {
            SurfaceStyle::Wireframe => {
                let grid = sample_2d(
                    f,
                    domain,
                    domain,
                    self.sampling.wire_resolution(),
                    MissingValuePolicy::Gap,
                );
                Surface::Wireframe(wireframe_lines(&grid))
            }
            SurfaceStyle::Mesh => {
                let grid = sample_2d(
                    f,
                    domain,
                    domain,
                    self.sampling.mesh_resolution(),
                    MissingValuePolicy::Fill(0.0),
                );
                Surface::Mesh(build_mesh(&grid, self.color_by_height))
            }
        };
        self.needs_rebuild = false;
        log::debug!("rebuilt {:?} surface for {:?}", self.style, f.source());
    }

    /// Number of wire lines or mesh triangles on screen.
    pub fn primitive_count(&self) -> usize {
        match &self.surface {
            Surface::Wireframe(lines) => lines.len(),
            Surface::Mesh(mesh) => mesh.triangle_count(),
        }
    }

    fn toolbar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            let before = (self.style, self.color_by_height);
            ui.selectable_value(&mut self.style, SurfaceStyle::Wireframe, "Wireframe");
            ui.selectable_value(&mut self.style, SurfaceStyle::Mesh, "Mesh");
            if self.style == SurfaceStyle::Mesh {
                ui.checkbox(&mut self.color_by_height, "Color by height");
            }
            if (self.style, self.color_by_height) != before {
                self.needs_rebuild = true;
            }
            if ui
                .button(egui_phosphor::regular::ARROW_COUNTER_CLOCKWISE)
                .on_hover_text("Reset view")
                .clicked()
            {
                self.camera.reset();
            }
            ui.label(egui::RichText::new("Drag to rotate, scroll to zoom").weak());
        });
    }

    fn draw_axes(&self, painter: &egui::Painter, projector: &Projector, center: Pos2, text: Color32) {
        let range = self.sampling.wire_range;
        for (axis, color) in axes(range).iter().zip(AXIS_COLORS) {
            painter.line_segment(
                [to_screen(projector, center, axis.from), to_screen(projector, center, axis.to)],
                Stroke::new(1.5, color),
            );
            painter.text(
                to_screen(projector, center, axis.label_at),
                Align2::CENTER_CENTER,
                axis.label,
                FontId::proportional(14.0),
                text,
            );
        }
    }

    fn draw_surface(&self, painter: &egui::Painter, projector: &Projector, center: Pos2) {
        match &self.surface {
            Surface::Wireframe(lines) => {
                let stroke = Stroke::new(1.0, SURFACE_BASE_COLOR.gamma_multiply(0.8));
                let shapes = lines.iter().map(|line| {
                    let points = line.iter().map(|p| to_screen(projector, center, *p)).collect();
                    Shape::line(points, stroke)
                });
                painter.extend(shapes);
            }
            Surface::Mesh(mesh) => {
                let mut out = egui::Mesh::default();
                for ((p, n), c) in mesh.positions.iter().zip(&mesh.normals).zip(&mesh.colors) {
                    out.colored_vertex(to_screen(projector, center, *p), shade(*c, projector.rotate(*n)));
                }
                for i in mesh.back_to_front(projector) {
                    let [a, b, c] = mesh.triangles[i];
                    out.add_triangle(a, b, c);
                }
                painter.add(Shape::mesh(out));
            }
        }
    }
}

fn to_screen(projector: &Projector, center: Pos2, p: DVec3) -> Pos2 {
    let [x, y] = projector.project(p);
    center + egui::vec2(x as f32, y as f32)
}

impl Panel for Plot3dPanel {
    fn state(&self) -> &PanelState {
        &self.state
    }
    fn state_mut(&mut self) -> &mut PanelState {
        &mut self.state
    }

    fn update_data(&mut self, data: &mut SessionData<'_>) {
        let revision = data.function.revision();
        if revision != self.seen_revision {
            self.seen_revision = revision;
            self.needs_rebuild = true;
        }
        if self.needs_rebuild {
            if let Some(f) = data.function.evaluator() {
                self.rebuild(f);
            }
        }
    }

    fn render_panel(&mut self, ui: &mut Ui, data: &mut SessionData<'_>) {
        self.toolbar(ui);
        if self.needs_rebuild {
            if let Some(f) = data.function.evaluator() {
                self.rebuild(f);
            }
        }

        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let to_arr = |p: Pos2| [p.x as f64, p.y as f64];
        let mut inputs = Vec::new();
        if response.drag_started() {
            if let Some(p) = response.interact_pointer_pos() {
                inputs.push(PointerInput::Down { pos: to_arr(p) });
            }
        } else if response.dragged() {
            if let Some(p) = response.interact_pointer_pos() {
                inputs.push(PointerInput::Move { pos: to_arr(p) });
            }
        }
        if response.drag_stopped() {
            inputs.push(PointerInput::Up);
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                inputs.push(PointerInput::Wheel { delta: scroll as f64 });
            }
        }
        let mut change = ViewChange::NONE;
        for input in inputs {
            change.redraw |= self.orbit.handle(input, &mut self.camera).redraw;
        }
        if change.redraw {
            ui.ctx().request_repaint();
        }

        let rect = response.rect;
        painter.rect_filled(rect, 0.0, ui.visuals().extreme_bg_color);
        let projector = self.camera.projector();
        let center = rect.center();
        let text = ui.visuals().text_color();
        self.draw_axes(&painter, &projector, center, text);
        self.draw_surface(&painter, &projector, center);

        let notice = if data.function.validity().is_invalid() {
            Some(("Invalid function, showing the last valid surface", ui.visuals().error_fg_color))
        } else if data.function.evaluator().is_none() {
            Some(("Enter a function to plot", text))
        } else {
            None
        };
        if let Some((msg, color)) = notice {
            painter.text(
                rect.left_top() + egui::vec2(8.0, 8.0),
                Align2::LEFT_TOP,
                msg,
                FontId::proportional(14.0),
                color,
            );
        }
    }
}
