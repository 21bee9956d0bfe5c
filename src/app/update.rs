//! Per-frame update logic for [`MultiCalcPanel`].
//!
//! * **[`update`](MultiCalcPanel::update)** – the entry point called every frame.
//! * **[`update_data`](MultiCalcPanel::update_data)** – the data-only pass: run
//!   due debounces, route finished analysis results and let every panel refresh.

use std::time::{Duration, Instant};

use eframe::egui;

use crate::panels::panel_trait::Panel;

use super::{CentralView, MultiCalcPanel};

/// Repaint interval while an analysis spinner is visible.
const LOADING_REPAINT: Duration = Duration::from_millis(100);

impl MultiCalcPanel {
    /// Main per-frame update: tick the session, render the chrome, then draw the plot.
    pub fn update(&mut self, ui: &mut egui::Ui) {
        let now = Instant::now();
        self.update_data(now);

        self.render_function_bar(ui, now);
        self.render_panels(ui, now);

        egui::CentralPanel::default().show_inside(ui, |ui| {
            ui.horizontal(|ui| {
                let p2 = self.plot2d.state().label();
                let p3 = self.plot3d.state().label();
                ui.selectable_value(&mut self.central_view, CentralView::Plot2d, p2);
                ui.selectable_value(&mut self.central_view, CentralView::Plot3d, p3);
            });
            ui.separator();
            let mut data = self.session.data(now);
            match self.central_view {
                CentralView::Plot2d => self.plot2d.render_panel(ui, &mut data),
                CentralView::Plot3d => self.plot3d.render_panel(ui, &mut data),
            }
        });

        self.render_detached_windows(ui.ctx(), now);
        self.schedule_repaint(ui.ctx(), now);
    }

    /// Tick debounces and analysis, then refresh every panel.
    ///
    /// Analysis results are routed to all panels before any `update_data`
    /// hook runs, so a function applied by a result is plotted this frame.
    pub fn update_data(&mut self, now: Instant) {
        let events = self
            .session
            .tick(now, chrono::Utc::now().timestamp_millis());

        let Self {
            session,
            function_panel,
            plot2d,
            plot3d,
            left_side_panels,
            right_side_panels,
            ..
        } = self;
        let mut data = session.data(now);

        let mut panels: Vec<&mut dyn Panel> = vec![
            function_panel as &mut dyn Panel,
            plot2d as &mut dyn Panel,
            plot3d as &mut dyn Panel,
        ];
        for p in left_side_panels.iter_mut().chain(right_side_panels.iter_mut()) {
            panels.push(p.as_mut());
        }

        for event in &events {
            for p in panels.iter_mut() {
                p.handle_analysis(event, &mut data);
            }
        }
        for p in panels.iter_mut() {
            p.update_data(&mut data);
        }
    }

    fn schedule_repaint(&self, ctx: &egui::Context, now: Instant) {
        if let Some(due) = self.session.next_wakeup(now) {
            ctx.request_repaint_after(due);
        }
        if self.session.analysis.any_loading() {
            ctx.request_repaint_after(LOADING_REPAINT);
        }
    }
}
