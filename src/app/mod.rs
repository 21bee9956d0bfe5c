//! Main application module for MultiCalc.
//!
//! | Sub-module        | Responsibility |
//! | ----------------- | -------------- |
//! | [`update`]        | Per-frame ticking, panel refresh and central-area rendering |
//! | [`panel_helpers`] | Locating and toggling panels by type |
//! | [`layout`]        | Function bar, sidebars, tab strips and detached windows |
//! | [`multicalc_app`] | Standalone [`MultiCalcApp`] (eframe) wrapper |
//! | [`run`]           | Top-level [`run_multicalc()`] entry point and icon loading |

mod layout;
mod multicalc_app;
mod panel_helpers;
mod run;
mod update;

pub use multicalc_app::MultiCalcApp;
pub use run::{model_from_config, run_multicalc};

use std::sync::Arc;

use crate::config::MultiCalcConfig;
use crate::data::analysis::LanguageModel;
use crate::data::session::Session;
use crate::panels::panel_trait::Panel;
use crate::panels::{
    AnalysisPanel, ExplainerPanel, FunctionInputPanel, HistoryPanel, IntegralPanel,
    OptimizationPanel, Plot2dPanel, Plot3dPanel,
};

/// Which plot fills the central area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CentralView {
    Plot2d,
    Plot3d,
}

// ─────────────────────────────────────────────────────────────────────────────
// MultiCalcPanel – the central widget type
// ─────────────────────────────────────────────────────────────────────────────

/// The widget that owns the session and every panel.
///
/// It can run standalone inside [`MultiCalcApp`] or be embedded in a host
/// egui application by calling [`MultiCalcPanel::update`] each frame.
pub struct MultiCalcPanel {
    // ── Data ─────────────────────────────────────────────────────────────────
    pub session: Session,

    // ── Panels ───────────────────────────────────────────────────────────────
    /// Function text field shown above the plots.
    pub function_panel: FunctionInputPanel,
    pub plot2d: Plot2dPanel,
    pub plot3d: Plot3dPanel,
    pub central_view: CentralView,

    /// Panels docked to the right of the plots (analysis flows).
    pub right_side_panels: Vec<Box<dyn Panel>>,

    /// Panels docked to the left of the plots (history).
    pub left_side_panels: Vec<Box<dyn Panel>>,
}

impl MultiCalcPanel {
    /// Create the panel set for `config`, answering analysis requests with `model`.
    ///
    /// * **Left:** History
    /// * **Right:** Analysis, Integrals, Optimization, Explain
    pub fn new(config: MultiCalcConfig, model: Arc<dyn LanguageModel>) -> Self {
        Self::with_session(Session::from_config(config, model))
    }

    pub fn with_session(session: Session) -> Self {
        let cfg = &session.config;
        let central_view = match session.function.evaluator() {
            Some(f) if f.free_variables().count() < 2 => CentralView::Plot2d,
            _ => CentralView::Plot3d,
        };
        let mut integrals = IntegralPanel::default();
        integrals.state = integrals.state.hidden();
        let mut optimization = OptimizationPanel::default();
        optimization.state = optimization.state.hidden();
        let mut explainer = ExplainerPanel::new(&cfg.analysis.language);
        explainer.state = explainer.state.hidden();

        Self {
            function_panel: FunctionInputPanel::default(),
            plot2d: Plot2dPanel::new(cfg),
            plot3d: Plot3dPanel::new(cfg),
            central_view,
            right_side_panels: vec![
                Box::new(AnalysisPanel::default()),
                Box::new(integrals),
                Box::new(optimization),
                Box::new(explainer),
            ],
            left_side_panels: vec![Box::new(HistoryPanel::default())],
            session,
        }
    }
}
