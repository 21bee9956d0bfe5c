use egui::Ui;

use super::panel_trait::{Panel, PanelState};
use super::widgets::{error_card, loading_row, math_text, result_card};
use crate::controllers::AnalysisEvent;
use crate::data::analysis::{AnalysisKind, AnalysisOutcome, AnalysisRequest, ExplainFormulaRequest};
use crate::data::session::SessionData;
use crate::error::AnalysisError;

const LANGUAGES: [&str; 5] = ["English", "Español", "Français", "Deutsch", "Português"];

/// Plain-language explanation of an arbitrary formula.
pub struct ExplainerPanel {
    pub state: PanelState,
    pub formula: String,
    pub language: String,
    explanation: Option<String>,
    error: Option<AnalysisError>,
}

impl ExplainerPanel {
    pub fn new(language: &str) -> Self {
        Self {
            state: PanelState::new("Explain", egui_phosphor::regular::CHAT_TEXT),
            formula: "e^(i*pi) + 1 = 0".into(),
            language: language.to_string(),
            explanation: None,
            error: None,
        }
    }

    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }
}

impl Panel for ExplainerPanel {
    fn state(&self) -> &PanelState {
        &self.state
    }
    fn state_mut(&mut self) -> &mut PanelState {
        &mut self.state
    }

    fn render_panel(&mut self, ui: &mut Ui, data: &mut SessionData<'_>) {
        ui.label("Formula");
        ui.add(
            egui::TextEdit::multiline(&mut self.formula)
                .font(egui::TextStyle::Monospace)
                .desired_rows(2)
                .desired_width(f32::INFINITY),
        );
        ui.horizontal(|ui| {
            ui.label("Language");
            egui::ComboBox::from_id_salt("explain_language")
                .selected_text(self.language.as_str())
                .show_ui(ui, |ui| {
                    for lang in LANGUAGES {
                        ui.selectable_value(&mut self.language, lang.to_string(), lang);
                    }
                });
        });

        let loading = data.analysis.is_loading(AnalysisKind::ExplainFormula);
        let can_run = !loading && !self.formula.trim().is_empty();
        if ui
            .add_enabled(
                can_run,
                egui::Button::new(format!("{} Explain", egui_phosphor::regular::LIGHTBULB)),
            )
            .clicked()
        {
            self.error = None;
            data.analysis.request(AnalysisRequest::ExplainFormula(ExplainFormulaRequest {
                formula: self.formula.trim().to_string(),
                language: self.language.clone(),
            }));
        }
        if loading {
            loading_row(ui, "Explaining…");
        }
        error_card(ui, &mut self.error);

        if let Some(text) = &self.explanation {
            result_card(ui, "Explanation", |ui| math_text(ui, text));
        }
    }

    fn handle_analysis(&mut self, event: &AnalysisEvent, _data: &mut SessionData<'_>) {
        match (event.kind, &event.result) {
            (AnalysisKind::ExplainFormula, Ok(AnalysisOutcome::Explanation(r))) => {
                self.explanation = Some(r.explanation.clone());
                self.error = None;
            }
            (AnalysisKind::ExplainFormula, Err(e)) => self.error = Some(e.clone()),
            _ => {}
        }
    }
}
