use egui::{RichText, Ui};

use super::panel_trait::{Panel, PanelState};
use super::widgets::{error_card, loading_row, math_text, result_card};
use crate::controllers::AnalysisEvent;
use crate::data::analysis::{
    AnalysisKind, AnalysisOutcome, AnalysisRequest, LagrangeRequest, LagrangeResponse, OptimumPoint,
};
use crate::data::session::SessionData;
use crate::error::AnalysisError;

/// Constrained optimization with Lagrange multipliers.
pub struct OptimizationPanel {
    pub state: PanelState,
    pub objective: String,
    pub constraint: String,
    result: Option<LagrangeResponse>,
    error: Option<AnalysisError>,
}

impl Default for OptimizationPanel {
    fn default() -> Self {
        Self {
            state: PanelState::new("Optimization", egui_phosphor::regular::TARGET),
            objective: "x*y".into(),
            constraint: "x^2 + y^2 - 1".into(),
            result: None,
            error: None,
        }
    }
}

fn optimum_list(ui: &mut Ui, title: &str, points: &[OptimumPoint]) {
    ui.label(RichText::new(title).strong());
    if points.is_empty() {
        ui.label(RichText::new("none").weak());
        return;
    }
    egui::Grid::new(title).num_columns(2).striped(true).show(ui, |ui| {
        for p in points {
            math_text(ui, &p.point);
            ui.label(RichText::new(format!("f = {}", p.value)).monospace());
            ui.end_row();
        }
    });
}

impl Panel for OptimizationPanel {
    fn state(&self) -> &PanelState {
        &self.state
    }
    fn state_mut(&mut self) -> &mut PanelState {
        &mut self.state
    }

    fn render_panel(&mut self, ui: &mut Ui, data: &mut SessionData<'_>) {
        egui::Grid::new("lagrange_inputs").num_columns(2).show(ui, |ui| {
            ui.label("Objective f(x, y)");
            ui.add(egui::TextEdit::singleline(&mut self.objective).font(egui::TextStyle::Monospace));
            ui.end_row();
            ui.label("Constraint g(x, y) = 0");
            ui.add(egui::TextEdit::singleline(&mut self.constraint).font(egui::TextStyle::Monospace));
            ui.end_row();
        });

        let loading = data.analysis.is_loading(AnalysisKind::SolveWithLagrange);
        if ui
            .add_enabled(
                !loading,
                egui::Button::new(format!("{} Solve", egui_phosphor::regular::CROSSHAIR)),
            )
            .clicked()
        {
            self.error = None;
            data.analysis.request(AnalysisRequest::SolveWithLagrange(LagrangeRequest {
                objective_func: self.objective.trim().to_string(),
                constraint_func: self.constraint.trim().to_string(),
            }));
        }
        if loading {
            loading_row(ui, "Solving…");
        }
        error_card(ui, &mut self.error);

        if let Some(r) = &self.result {
            result_card(ui, "Critical points", |ui| {
                optimum_list(ui, "Maxima", &r.maxima);
                optimum_list(ui, "Minima", &r.minima);
                ui.separator();
                math_text(ui, &r.calculation_steps);
            });
        }
    }

    fn handle_analysis(&mut self, event: &AnalysisEvent, _data: &mut SessionData<'_>) {
        match (event.kind, &event.result) {
            (AnalysisKind::SolveWithLagrange, Ok(AnalysisOutcome::Optimization(r))) => {
                self.result = Some(r.clone());
                self.error = None;
            }
            (AnalysisKind::SolveWithLagrange, Err(e)) => self.error = Some(e.clone()),
            _ => {}
        }
    }
}
