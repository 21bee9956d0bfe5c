//! Standalone application wrapper for MultiCalc.
//!
//! [`MultiCalcApp`] wraps a [`MultiCalcPanel`](super::MultiCalcPanel) and
//! implements [`eframe::App`] so that the calculator can run as a native window.

use eframe::egui;

use super::MultiCalcPanel;

pub struct MultiCalcApp {
    /// The inner panel widget that owns all data and UI state.
    pub main_panel: MultiCalcPanel,
    /// Set once the analysis controller can wake the UI.
    repaint_wired: bool,
}

impl MultiCalcApp {
    pub fn new(main_panel: MultiCalcPanel) -> Self {
        Self {
            main_panel,
            repaint_wired: false,
        }
    }
}

impl eframe::App for MultiCalcApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.repaint_wired {
            self.main_panel
                .session
                .analysis
                .set_repaint_context(ctx.clone());
            self.repaint_wired = true;
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.main_panel.update(ui);
        });
    }
}
