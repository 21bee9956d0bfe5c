use egui::{RichText, Ui};

use super::panel_trait::{Panel, PanelState};
use super::widgets::{error_card, labelled_math, loading_row, math_text, result_card};
use crate::controllers::AnalysisEvent;
use crate::data::analysis::{
    AnalysisKind, AnalysisOutcome, AnalysisRequest, AnalyzeFunctionRequest, FunctionAnalysis,
    NaturalTo3dRequest,
};
use crate::data::session::SessionData;
use crate::error::AnalysisError;

/// Model-backed analysis of the current function plus natural-language input.
pub struct AnalysisPanel {
    pub state: PanelState,
    pub description: String,
    error: Option<AnalysisError>,
    conversion_error: Option<AnalysisError>,
}

impl Default for AnalysisPanel {
    fn default() -> Self {
        Self {
            state: PanelState::new("Analysis", egui_phosphor::regular::MAGNIFYING_GLASS),
            description: String::new(),
            error: None,
            conversion_error: None,
        }
    }
}

impl AnalysisPanel {
    fn show_result(ui: &mut Ui, analysis: &FunctionAnalysis) {
        result_card(ui, "Analysis", |ui| {
            match analysis {
                FunctionAnalysis::SingleVariable(a) => {
                    labelled_math(ui, "Domain", &a.domain);
                    labelled_math(ui, "Range", &a.range);
                    labelled_math(ui, "f'(x)", &a.first_derivative);
                    labelled_math(ui, "f''(x)", &a.second_derivative);
                }
                FunctionAnalysis::TwoVariable(a) => {
                    labelled_math(ui, "Domain x", &a.domain.x);
                    labelled_math(ui, "Domain y", &a.domain.y);
                    labelled_math(ui, "Range", &a.range);
                    labelled_math(ui, "∂f/∂x", &a.partial_derivative_x);
                    labelled_math(ui, "∂f/∂y", &a.partial_derivative_y);
                    labelled_math(ui, "∇f", &a.gradient);
                }
            }
            ui.separator();
            egui::CollapsingHeader::new("Calculation steps")
                .id_salt("analysis_steps")
                .show(ui, |ui| math_text(ui, analysis.calculation_steps()));
        });
    }
}

impl Panel for AnalysisPanel {
    fn state(&self) -> &PanelState {
        &self.state
    }
    fn state_mut(&mut self) -> &mut PanelState {
        &mut self.state
    }

    fn render_panel(&mut self, ui: &mut Ui, data: &mut SessionData<'_>) {
        // ── Analyze current function ─────────────────────────────────────
        let loading = data.analysis.is_loading(AnalysisKind::AnalyzeFunction);
        let func = data.func().trim().to_string();
        ui.horizontal(|ui| {
            let can_run = !loading && !func.is_empty() && !data.function.validity().is_invalid();
            if ui
                .add_enabled(can_run, egui::Button::new(format!("{} Analyze", egui_phosphor::regular::SPARKLE)))
                .on_hover_text("Domain, range and derivatives of the current function")
                .clicked()
            {
                self.error = None;
                data.analysis
                    .request(AnalysisRequest::AnalyzeFunction(AnalyzeFunctionRequest { func: func.clone() }));
            }
            ui.label(RichText::new(&func).monospace());
        });
        if loading {
            loading_row(ui, "Analyzing…");
        }
        error_card(ui, &mut self.error);
        if let Some(result) = &data.store.state().last_analysis {
            Self::show_result(ui, result);
        }

        ui.add_space(8.0);
        ui.separator();

        // ── Natural language to function ─────────────────────────────────
        ui.label(RichText::new("Describe a surface").strong());
        let converting = data.analysis.is_loading(AnalysisKind::NaturalTo3d);
        ui.add(
            egui::TextEdit::multiline(&mut self.description)
                .hint_text("e.g. a saddle shape")
                .desired_rows(2)
                .desired_width(f32::INFINITY),
        );
        let can_convert = !converting && !self.description.trim().is_empty();
        if ui
            .add_enabled(can_convert, egui::Button::new(format!("{} Convert", egui_phosphor::regular::MAGIC_WAND)))
            .clicked()
        {
            self.conversion_error = None;
            data.analysis.request(AnalysisRequest::NaturalTo3d(NaturalTo3dRequest {
                description: self.description.trim().to_string(),
            }));
        }
        if converting {
            loading_row(ui, "Converting…");
        }
        error_card(ui, &mut self.conversion_error);
    }

    fn handle_analysis(&mut self, event: &AnalysisEvent, data: &mut SessionData<'_>) {
        match (event.kind, &event.result) {
            (AnalysisKind::AnalyzeFunction, Ok(AnalysisOutcome::Analysis(a))) => {
                data.set_analysis(a.clone());
                self.error = None;
            }
            (AnalysisKind::AnalyzeFunction, Err(e)) => self.error = Some(e.clone()),
            (AnalysisKind::NaturalTo3d, Ok(AnalysisOutcome::Conversion(r))) => {
                log::info!("converted description to {:?}", r.func);
                data.apply_function(r.func.clone());
                self.conversion_error = None;
            }
            (AnalysisKind::NaturalTo3d, Err(e)) => self.conversion_error = Some(e.clone()),
            _ => {}
        }
    }
}
