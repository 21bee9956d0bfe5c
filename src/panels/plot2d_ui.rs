use egui::{Color32, RichText, Ui};
use egui_plot::{GridInput, GridMark, Line, Plot, Points};

use super::panel_trait::{Panel, PanelState};
use crate::config::MultiCalcConfig;
use crate::data::expression::Evaluator;
use crate::data::interaction::{PanZoomController, PointerInput, ViewChange};
use crate::data::sampler::{sample_1d, LineSamples, LineSampling};
use crate::data::session::SessionData;
use crate::data::ticks::{nice_step, tick_values, TickFormat};
use crate::data::view2d::{polyline_segments, View2d};

const LINE_COLOR: Color32 = Color32::from_rgb(66, 133, 244);
const TARGET_TICKS: usize = 10;

/// Interactive line chart of `f(x)`.
pub struct Plot2dPanel {
    pub state: PanelState,
    pub view: View2d,
    controller: PanZoomController,
    sampling: LineSampling,
    tick_format: TickFormat,
    samples: LineSamples,
    segments: Vec<Vec<[f64; 2]>>,
    seen_revision: u64,
    needs_resample: bool,
}

impl Plot2dPanel {
    pub fn new(cfg: &MultiCalcConfig) -> Self {
        Self {
            state: PanelState::new("2D Plot", egui_phosphor::regular::CHART_LINE),
            view: View2d::new(&cfg.view2d),
            controller: PanZoomController::new(cfg.view2d.wheel_sensitivity, cfg.view2d.resample_on_zoom),
            sampling: cfg.sampling.line_sampling(),
            tick_format: TickFormat {
                suppress_origin: cfg.view2d.suppress_origin_tick,
            },
            samples: LineSamples::default(),
            segments: Vec::new(),
            seen_revision: 0,
            needs_resample: true,
        }
    }

    pub fn samples(&self) -> &LineSamples {
        &self.samples
    }

    /// Connected runs of the current samples, as drawn.
    pub fn segments(&self) -> &[Vec<[f64; 2]>] {
        &self.segments
    }

    /// Sample `f` over the visible domain and refit the y-axis.
    pub fn resample(&mut self, f: &Evaluator) {
        self.samples = sample_1d(f, self.view.x_domain(), &self.sampling);
        self.view.fit_y(&self.samples);
        self.segments = polyline_segments(&self.samples.points);
        self.needs_resample = false;
        log::debug!(
            "resampled {:?} over {:?}: {} points, {} gaps",
            f.source(),
            self.view.x_domain(),
            self.samples.points.len(),
            self.samples.gap_count()
        );
    }

    pub fn apply_change(&mut self, change: ViewChange) {
        if change.resample {
            self.needs_resample = true;
        }
    }

    fn toolbar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            if ui
                .button(egui_phosphor::regular::MAGNIFYING_GLASS_PLUS)
                .on_hover_text("Zoom in")
                .clicked()
            {
                let change = self.controller.zoom_in(&mut self.view);
                self.apply_change(change);
            }
            if ui
                .button(egui_phosphor::regular::MAGNIFYING_GLASS_MINUS)
                .on_hover_text("Zoom out")
                .clicked()
            {
                let change = self.controller.zoom_out(&mut self.view);
                self.apply_change(change);
            }
            if ui
                .button(egui_phosphor::regular::ARROW_COUNTER_CLOCKWISE)
                .on_hover_text("Reset view")
                .clicked()
            {
                let change = self.controller.reset(&mut self.view);
                self.apply_change(change);
            }
            let (x0, x1) = self.view.x_domain();
            ui.label(RichText::new(format!("x ∈ [{x0:.3}, {x1:.3}]")).weak());
        });
    }
}

/// Grid marks at the 1-2-5 ticks of the visible range.
fn nice_grid(input: GridInput) -> Vec<GridMark> {
    let (min, max) = input.bounds;
    let step = nice_step(max - min, TARGET_TICKS);
    tick_values((min, max), step)
        .into_iter()
        .map(|value| GridMark { value, step_size: step })
        .collect()
}

impl Panel for Plot2dPanel {
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
            self.view.forget_fit();
            self.needs_resample = true;
        }
        if self.needs_resample {
            if let Some(f) = data.function.evaluator() {
                self.resample(f);
            }
        }
    }

    fn render_panel(&mut self, ui: &mut Ui, data: &mut SessionData<'_>) {
        self.toolbar(ui);

        if data.function.validity().is_invalid() {
            ui.colored_label(
                ui.visuals().error_fg_color,
                format!(
                    "{} Invalid function, showing the last valid plot",
                    egui_phosphor::regular::WARNING
                ),
            );
        } else if data.function.evaluator().is_none() {
            ui.label("Enter a function to plot.");
        }

        let (x0, x1) = self.view.x_domain();
        let (y0, y1) = self.view.y_domain();
        let fmt = self.tick_format;
        let dragging = self.controller.is_dragging();
        let segments = &self.segments;

        let plot = Plot::new("multicalc_plot2d")
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .allow_double_click_reset(false)
            .x_grid_spacer(nice_grid)
            .y_grid_spacer(nice_grid)
            .x_axis_formatter(move |mark, _range| fmt.format(mark.value, mark.step_size))
            .y_axis_formatter(move |mark, _range| fmt.format(mark.value, mark.step_size));

        let plot_resp = plot.show(ui, |plot_ui| {
            plot_ui.set_plot_bounds_x(x0..=x1);
            plot_ui.set_plot_bounds_y(y0..=y1);
            for seg in segments {
                if seg.len() == 1 {
                    plot_ui.points(Points::new("f", seg.clone()).radius(1.5).color(LINE_COLOR));
                } else {
                    plot_ui.line(Line::new("f", seg.clone()).color(LINE_COLOR).width(2.0));
                }
            }

            let resp = plot_ui.response();
            let hovered = resp.hovered();
            let rect = resp.rect;
            let (pressed, down, pos, scroll) = resp.ctx.input(|i| {
                (
                    i.pointer.primary_pressed(),
                    i.pointer.primary_down(),
                    i.pointer.interact_pos(),
                    i.raw_scroll_delta.y,
                )
            });

            let mut inputs = Vec::new();
            let to_arr = |p: egui::Pos2| [p.x as f64, p.y as f64];
            match pos {
                Some(p) if pressed && hovered => inputs.push(PointerInput::Down { pos: to_arr(p) }),
                Some(p) if dragging && down => inputs.push(PointerInput::Move { pos: to_arr(p) }),
                _ => {}
            }
            if dragging && !down {
                inputs.push(PointerInput::Up);
            }
            if hovered && scroll != 0.0 {
                inputs.push(PointerInput::Wheel { delta: scroll as f64 });
            }
            let units_per_px = [
                (x1 - x0) / rect.width().max(1.0) as f64,
                (y1 - y0) / rect.height().max(1.0) as f64,
            ];
            (inputs, units_per_px)
        });

        let (inputs, units_per_px) = plot_resp.inner;
        let mut change = ViewChange::NONE;
        for input in inputs {
            let c = self.controller.handle(input, &mut self.view, units_per_px);
            change.redraw |= c.redraw;
            change.resample |= c.resample;
        }
        self.apply_change(change);
        if change.redraw {
            ui.ctx().request_repaint();
        }
        if self.needs_resample {
            if let Some(f) = data.function.evaluator() {
                self.resample(f);
            }
        }
    }
}
