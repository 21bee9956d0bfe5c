use egui::{Color32, RichText, Ui};

use super::panel_trait::{Panel, PanelState};
use super::widgets::math_text;
use crate::data::function_input::Validity;
use crate::data::guided::GUIDED_STEPS;
use crate::data::session::SessionData;

const VALID_COLOR: Color32 = Color32::from_rgb(46, 160, 67);

/// Function text field with its validity badge and the guided-mode walkthrough.
pub struct FunctionInputPanel {
    pub state: PanelState,
}

impl Default for FunctionInputPanel {
    fn default() -> Self {
        Self {
            state: PanelState::new("Function", egui_phosphor::regular::FUNCTION),
        }
    }
}

impl FunctionInputPanel {
    fn badge(ui: &mut Ui, validity: &Validity) {
        match validity {
            Validity::Empty => {}
            Validity::Pending => {
                ui.label(RichText::new(egui_phosphor::regular::HOURGLASS).color(Color32::GRAY))
                    .on_hover_text("Checking…");
            }
            Validity::Valid => {
                ui.label(RichText::new(egui_phosphor::regular::CHECK_CIRCLE).color(VALID_COLOR))
                    .on_hover_text("Valid function");
            }
            Validity::Invalid(e) => {
                let color = ui.visuals().error_fg_color;
                ui.label(
                    RichText::new(format!("{} Invalid", egui_phosphor::regular::WARNING_CIRCLE))
                        .color(color),
                )
                .on_hover_text(e.to_string());
            }
        }
    }

    fn guided_steps(ui: &mut Ui) {
        egui::CollapsingHeader::new("Guided walkthrough: gradient of sin(x)·cos(y)")
            .id_salt("guided_steps")
            .default_open(true)
            .show(ui, |ui| {
                for step in GUIDED_STEPS.iter() {
                    ui.label(RichText::new(step.title).strong());
                    math_text(ui, &format!("$${}$$", step.formula));
                    ui.label(step.explanation);
                    ui.add_space(6.0);
                }
            });
    }
}

impl Panel for FunctionInputPanel {
    fn state(&self) -> &PanelState {
        &self.state
    }
    fn state_mut(&mut self) -> &mut PanelState {
        &mut self.state
    }

    fn render_panel(&mut self, ui: &mut Ui, data: &mut SessionData<'_>) {
        let label = data
            .function
            .evaluator()
            .map(|f| f.free_variables().label())
            .unwrap_or_else(|| "f(x, y)".to_string());

        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("{label} =")).monospace().strong());
            let mut text = data.func().to_string();
            let resp = ui.add(
                egui::TextEdit::singleline(&mut text)
                    .font(egui::TextStyle::Monospace)
                    .hint_text("e.g. sin(x^2 + y^2)")
                    .desired_width((ui.available_width() - 220.0).max(80.0)),
            );
            if resp.changed() {
                data.edit_function(text);
            }
            // Enter skips the quiet period.
            if resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) && data.function.flush() {
                log::debug!("validated on enter");
            }
            Self::badge(ui, data.function.validity());

            let mut guided = data.store.state().guided_mode;
            if ui.checkbox(&mut guided, "Guided mode").changed() {
                data.set_guided_mode(guided);
            }
        });

        if data.store.state().guided_mode {
            ui.separator();
            Self::guided_steps(ui);
        }
    }
}
