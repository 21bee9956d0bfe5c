use egui::{RichText, Ui};

use super::panel_trait::{Panel, PanelState};
use crate::data::session::SessionData;

/// Saved functions, newest first.
pub struct HistoryPanel {
    pub state: PanelState,
}

impl Default for HistoryPanel {
    fn default() -> Self {
        Self {
            state: PanelState::new("History", egui_phosphor::regular::CLOCK_COUNTER_CLOCKWISE),
        }
    }
}

enum HistoryAction {
    Restore(usize),
    Delete(usize),
    Clear,
}

impl Panel for HistoryPanel {
    fn state(&self) -> &PanelState {
        &self.state
    }
    fn state_mut(&mut self) -> &mut PanelState {
        &mut self.state
    }

    fn render_panel(&mut self, ui: &mut Ui, data: &mut SessionData<'_>) {
        let history = data.store.history();
        if history.is_empty() {
            ui.label(RichText::new("Functions you plot are saved here.").weak());
            return;
        }

        let mut action = None;
        ui.horizontal(|ui| {
            ui.label(format!("{} of {} saved", history.len(), history.capacity()));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .button(format!("{} Clear all", egui_phosphor::regular::TRASH))
                    .clicked()
                {
                    action = Some(HistoryAction::Clear);
                }
            });
        });
        ui.separator();

        egui::ScrollArea::vertical().show(ui, |ui| {
            for (i, entry) in history.entries().iter().enumerate() {
                ui.horizontal(|ui| {
                    let label = RichText::new(&entry.func).monospace();
                    if ui
                        .link(label)
                        .on_hover_text(format!("Saved {}", entry.saved_label()))
                        .clicked()
                    {
                        action = Some(HistoryAction::Restore(i));
                    }
                    if entry.guided_mode {
                        ui.label(RichText::new(egui_phosphor::regular::GRADUATION_CAP).weak())
                            .on_hover_text("Guided mode");
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .small_button(egui_phosphor::regular::X)
                            .on_hover_text("Delete")
                            .clicked()
                        {
                            action = Some(HistoryAction::Delete(i));
                        }
                        ui.label(RichText::new(entry.saved_label()).weak().small());
                    });
                });
            }
        });

        match action {
            Some(HistoryAction::Restore(i)) => data.restore_history(i),
            Some(HistoryAction::Delete(i)) => data.store.delete_entry(i),
            Some(HistoryAction::Clear) => data.store.clear_history(),
            None => {}
        }
    }
}
