//! Layout and rendering of the docked panels.
//!
//! * **[`render_function_bar`](MultiCalcPanel::render_function_bar)** – the function input above everything.
//! * **[`render_panels`](MultiCalcPanel::render_panels)** – left and right sidebars with tab strips.
//! * **[`render_detached_windows`](MultiCalcPanel::render_detached_windows)** – popped-out panels.

use eframe::egui;

use crate::data::session::SessionData;
use crate::panels::panel_trait::Panel;

use super::MultiCalcPanel;

impl MultiCalcPanel {
    pub(crate) fn render_function_bar(&mut self, ui: &mut egui::Ui, now: std::time::Instant) {
        let mut data = self.session.data(now);
        egui::TopBottomPanel::top("multicalc_function_bar").show_inside(ui, |ui| {
            ui.add_space(4.0);
            self.function_panel.render_panel(ui, &mut data);
            ui.add_space(4.0);
        });
    }

    pub(crate) fn render_panels(&mut self, ui: &mut egui::Ui, now: std::time::Instant) {
        let mut data = self.session.data(now);

        if self.left_side_panels.iter().any(is_docked) {
            egui::SidePanel::left("multicalc_left_sidebar")
                .resizable(true)
                .default_width(260.0)
                .min_width(160.0)
                .show_inside(ui, |ui| render_tabs(ui, &mut self.left_side_panels, &mut data));
        } else if !self.left_side_panels.is_empty() {
            egui::SidePanel::left("multicalc_left_sidebar")
                .resizable(false)
                .exact_width(30.0)
                .show_inside(ui, |ui| icon_strip(ui, &mut self.left_side_panels));
        }

        if self.right_side_panels.iter().any(is_docked) {
            egui::SidePanel::right("multicalc_right_sidebar")
                .resizable(true)
                .default_width(380.0)
                .min_width(220.0)
                .show_inside(ui, |ui| render_tabs(ui, &mut self.right_side_panels, &mut data));
        } else if !self.right_side_panels.is_empty() {
            egui::SidePanel::right("multicalc_right_sidebar")
                .resizable(false)
                .exact_width(30.0)
                .show_inside(ui, |ui| icon_strip(ui, &mut self.right_side_panels));
        }
    }

    pub(crate) fn render_detached_windows(&mut self, ctx: &egui::Context, now: std::time::Instant) {
        let mut data = self.session.data(now);
        for p in self
            .left_side_panels
            .iter_mut()
            .chain(self.right_side_panels.iter_mut())
        {
            let st = *p.state();
            if !(st.visible && st.detached) {
                continue;
            }
            let mut open = true;
            egui::Window::new(st.label())
                .id(egui::Id::new(("multicalc_detached", st.title)))
                .open(&mut open)
                .default_width(360.0)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| p.render_panel(ui, &mut data));
                });
            if !open {
                let st = p.state_mut();
                st.visible = false;
                st.detached = false;
            }
        }
    }
}

fn is_docked(p: &Box<dyn Panel>) -> bool {
    p.state().visible && !p.state().detached
}

/// Collapsed sidebar: one icon per panel, clicking docks it again.
fn icon_strip(ui: &mut egui::Ui, list: &mut [Box<dyn Panel>]) {
    let mut clicked = None;
    ui.vertical(|ui| {
        for (i, p) in list.iter().enumerate() {
            let st = p.state();
            if ui
                .selectable_label(st.visible, st.icon)
                .on_hover_text(st.title)
                .clicked()
            {
                clicked = Some(i);
            }
        }
    });
    if let Some(ci) = clicked {
        activate(list, ci);
    }
}

/// Show panel `idx` as the docked tab; other docked panels are hidden.
fn activate(list: &mut [Box<dyn Panel>], idx: usize) {
    for (i, p) in list.iter_mut().enumerate() {
        let st = p.state_mut();
        if i == idx {
            st.visible = true;
            st.detached = false;
        } else if !st.detached {
            st.visible = false;
        }
    }
}

/// Render a tab strip followed by the active panel's body.
///
/// The header also holds "Pop out" and "Hide" actions for the active panel.
fn render_tabs(ui: &mut egui::Ui, list: &mut [Box<dyn Panel>], data: &mut SessionData<'_>) {
    let active = list.iter().position(is_docked);
    let mut clicked = None;
    let mut pop_out = false;
    let mut hide = false;

    ui.horizontal_wrapped(|ui| {
        for (i, p) in list.iter().enumerate() {
            let label = if list.len() > 1 {
                p.state().label()
            } else {
                p.title().to_string()
            };
            if ui.selectable_label(Some(i) == active, label).clicked() {
                clicked = Some(i);
            }
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .small_button(egui_phosphor::regular::X)
                .on_hover_text("Hide")
                .clicked()
            {
                hide = true;
            }
            if ui
                .small_button(egui_phosphor::regular::ARROW_SQUARE_OUT)
                .on_hover_text("Pop out")
                .clicked()
            {
                pop_out = true;
            }
        });
    });
    ui.separator();

    if let Some(i) = clicked {
        activate(list, i);
    } else if let Some(i) = active {
        let st = list[i].state_mut();
        if pop_out {
            st.detached = true;
        } else if hide {
            st.visible = false;
        }
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        match list.iter().position(is_docked) {
            Some(i) => list[i].render_panel(ui, data),
            None => {
                ui.label("No panel active");
            }
        }
    });
}
