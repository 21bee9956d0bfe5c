//! Small widgets shared by the analysis panels.

use egui::{Color32, RichText, Ui};

use crate::data::analysis::{split_math, MathSegment};
use crate::error::AnalysisError;

/// Render Markdown-ish text with `$inline$` and `$$block$$` math.
///
/// Math is shown as monospace source; block math gets its own line.
pub fn math_text(ui: &mut Ui, text: &str) {
    let strong = ui.visuals().strong_text_color();
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        for segment in split_math(text) {
            match segment {
                MathSegment::Text(t) => {
                    ui.label(t);
                }
                MathSegment::InlineMath(m) => {
                    ui.label(RichText::new(m).monospace().color(strong));
                }
                MathSegment::BlockMath(m) => {
                    ui.end_row();
                    ui.label(RichText::new(m).monospace().strong().color(strong));
                    ui.end_row();
                }
            }
        }
    });
}

/// A labelled line of math, e.g. `Domain: $x > 0$`.
pub fn labelled_math(ui: &mut Ui, label: &str, text: &str) {
    ui.horizontal_wrapped(|ui| {
        ui.label(RichText::new(format!("{label}:")).strong());
        math_text(ui, text);
    });
}

/// The error card shown under a form. The close button clears `error`.
pub fn error_card(ui: &mut Ui, error: &mut Option<AnalysisError>) {
    let Some(e) = error.as_ref() else {
        return;
    };
    let message = e.to_string();
    let color = ui.visuals().error_fg_color;
    let mut dismiss = false;
    egui::Frame::group(ui.style())
        .fill(color.gamma_multiply(0.12))
        .stroke(egui::Stroke::new(1.0, color))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.colored_label(color, format!("{} Error", egui_phosphor::regular::WARNING));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .small_button(egui_phosphor::regular::X)
                        .on_hover_text("Dismiss")
                        .clicked()
                    {
                        dismiss = true;
                    }
                });
            });
            ui.label(message);
        });
    if dismiss {
        *error = None;
    }
}

/// Spinner with a caption while a flow is running.
pub fn loading_row(ui: &mut Ui, caption: &str) {
    ui.horizontal(|ui| {
        ui.spinner();
        ui.label(RichText::new(caption).color(Color32::GRAY));
    });
}

/// A titled frame holding a result.
pub fn result_card(ui: &mut Ui, title: &str, add_contents: impl FnOnce(&mut Ui)) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(RichText::new(title).heading());
        ui.add_space(4.0);
        add_contents(ui);
    });
}
