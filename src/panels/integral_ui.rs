use egui::{RichText, Ui};

use super::panel_trait::{Panel, PanelState};
use super::widgets::{error_card, loading_row, math_text, result_card};
use crate::controllers::AnalysisEvent;
use crate::data::analysis::{
    AnalysisKind, AnalysisOutcome, AnalysisRequest, IntegralLimits, IntegralRequest,
    IntegralResponse, IntegralType,
};
use crate::data::session::SessionData;
use crate::error::AnalysisError;

/// Double or triple integral of the current function over rectangular limits.
pub struct IntegralPanel {
    pub state: PanelState,
    pub integral_type: IntegralType,
    pub limits: IntegralLimits,
    z_min: String,
    z_max: String,
    result: Option<IntegralResponse>,
    error: Option<AnalysisError>,
}

impl Default for IntegralPanel {
    fn default() -> Self {
        Self {
            state: PanelState::new("Integrals", egui_phosphor::regular::SIGMA),
            integral_type: IntegralType::Double,
            limits: IntegralLimits {
                x_min: "-2".into(),
                x_max: "2".into(),
                y_min: "-2".into(),
                y_max: "2".into(),
                z_min: None,
                z_max: None,
            },
            z_min: "0".into(),
            z_max: String::new(),
            result: None,
            error: None,
        }
    }
}

impl IntegralPanel {
    /// The request for `func` with the limits as currently entered.
    pub fn build_request(&self, func: &str) -> IntegralRequest {
        let mut limits = self.limits.clone();
        if self.integral_type == IntegralType::Triple {
            limits.z_min = Some(self.z_min.trim().to_string());
            limits.z_max = Some(self.z_max.trim().to_string());
        }
        IntegralRequest {
            func: func.trim().to_string(),
            integral_type: self.integral_type,
            limits,
        }
    }

    pub fn result(&self) -> Option<&IntegralResponse> {
        self.result.as_ref()
    }
}

fn limit_row(ui: &mut Ui, axis: &str, min: &mut String, max: &mut String) {
    ui.label(format!("{axis} min"));
    ui.add(egui::TextEdit::singleline(min).font(egui::TextStyle::Monospace).desired_width(70.0));
    ui.label(format!("{axis} max"));
    ui.add(egui::TextEdit::singleline(max).font(egui::TextStyle::Monospace).desired_width(70.0));
    ui.end_row();
}

impl Panel for IntegralPanel {
    fn state(&self) -> &PanelState {
        &self.state
    }
    fn state_mut(&mut self) -> &mut PanelState {
        &mut self.state
    }

    fn render_panel(&mut self, ui: &mut Ui, data: &mut SessionData<'_>) {
        ui.horizontal(|ui| {
            ui.label("Integrand:");
            ui.label(RichText::new(data.func()).monospace());
        });
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.integral_type, IntegralType::Double, "Double ∬");
            ui.selectable_value(&mut self.integral_type, IntegralType::Triple, "Triple ∭");
        });

        egui::Grid::new("integral_limits").num_columns(4).show(ui, |ui| {
            limit_row(ui, "x", &mut self.limits.x_min, &mut self.limits.x_max);
            limit_row(ui, "y", &mut self.limits.y_min, &mut self.limits.y_max);
            if self.integral_type == IntegralType::Triple {
                limit_row(ui, "z", &mut self.z_min, &mut self.z_max);
            }
        });

        let loading = data.analysis.is_loading(AnalysisKind::CalculateIntegral);
        if ui
            .add_enabled(
                !loading,
                egui::Button::new(format!("{} Calculate", egui_phosphor::regular::CALCULATOR)),
            )
            .clicked()
        {
            self.error = None;
            let req = self.build_request(data.func());
            data.analysis.request(AnalysisRequest::CalculateIntegral(req));
        }
        if loading {
            loading_row(ui, "Integrating…");
        }
        error_card(ui, &mut self.error);

        if let Some(r) = &self.result {
            result_card(ui, "Result", |ui| {
                ui.label(RichText::new(format!("{}", r.result)).monospace().size(18.0));
                ui.separator();
                math_text(ui, &r.calculation_steps);
            });
        }
    }

    fn handle_analysis(&mut self, event: &AnalysisEvent, _data: &mut SessionData<'_>) {
        if event.kind != AnalysisKind::CalculateIntegral {
            return;
        }
        match &event.result {
            Ok(AnalysisOutcome::Integral(r)) => {
                self.result = Some(r.clone());
                self.error = None;
            }
            Ok(_) => {}
            Err(e) => self.error = Some(e.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn z_limits_only_for_triple() {
        let mut panel = IntegralPanel::default();
        let req = panel.build_request(" x*y ");
        assert_eq!(req.func, "x*y");
        assert_eq!(req.limits.z_min, None);

        panel.integral_type = IntegralType::Triple;
        let req = panel.build_request("x*y");
        assert_eq!(req.limits.z_min.as_deref(), Some("0"));
        assert_eq!(req.limits.z_max.as_deref(), Some(""));
    }
}
