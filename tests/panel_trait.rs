use std::sync::Arc;
use std::time::Instant;

use multicalc::config::MultiCalcConfig;
use multicalc::data::analysis::{
    AnalysisOutcome, FunctionAnalysis, NaturalTo3dResponse, SingleVariableAnalysis, UnconfiguredModel,
};
use multicalc::data::app_state::{AppState, Store};
use multicalc::panels::*;
use multicalc::{AnalysisController, AnalysisEvent, AnalysisKind, CentralView, MemoryStore, MultiCalcPanel, Session};

fn main_panel(func: &str) -> MultiCalcPanel {
    let config = MultiCalcConfig::default();
    let store = Store::new(
        AppState::new(func),
        Box::new(MemoryStore::new()),
        "history",
        config.history.capacity,
        config.debounce.history_ms,
    );
    let session = Session::new(config, store, AnalysisController::new(Arc::new(UnconfiguredModel)));
    MultiCalcPanel::with_session(session)
}

#[test]
fn tab_label_contains_icon_and_title() {
    let p = HistoryPanel::default();
    let label = p.state().label();
    assert!(label.contains(p.title()));
    assert!(label.starts_with(p.state().icon));
}

#[test]
fn only_first_right_panel_is_shown_initially() {
    let main = main_panel("x*y");
    let visible: Vec<&str> = main
        .right_side_panels
        .iter()
        .filter(|p| p.state().visible)
        .map(|p| p.title())
        .collect();
    assert_eq!(visible, ["Analysis"]);
}

#[test]
fn central_view_follows_variable_count() {
    assert_eq!(main_panel("sin(x)").central_view, CentralView::Plot2d);
    assert_eq!(main_panel("x*y").central_view, CentralView::Plot3d);
}

#[test]
fn panels_are_found_by_type() {
    let mut main = main_panel("x");
    assert!(main.panel::<HistoryPanel>().is_some());
    let integrals = main.panel_mut::<IntegralPanel>().unwrap();
    integrals.limits.x_max = "pi".into();
    assert_eq!(main.panel::<IntegralPanel>().unwrap().limits.x_max, "pi");
    assert!(main.panel::<FunctionInputPanel>().is_none());
}

#[test]
fn toggling_switches_the_docked_tab() {
    let mut main = main_panel("x");
    assert!(main.toggle_panel_visibility::<IntegralPanel>());
    assert!(main.panel::<IntegralPanel>().unwrap().state().visible);
    assert!(!main.panel::<AnalysisPanel>().unwrap().state().visible);

    assert!(main.toggle_panel_visibility::<IntegralPanel>());
    assert!(!main.panel::<IntegralPanel>().unwrap().state().visible);
}

#[test]
fn plots_resample_when_the_function_changes() {
    let mut main = main_panel("x^2");
    let now = Instant::now();
    main.update_data(now);
    assert_eq!(main.plot2d.samples().points.len(), 200);
    assert!(main.plot3d.primitive_count() > 0);

    let before = main.plot2d.samples().max_magnitude;
    main.session.data(now).apply_function("x^4".into());
    main.update_data(now);
    assert!(main.plot2d.samples().max_magnitude > before);
}

#[test]
fn conversion_result_replaces_the_function() {
    let mut main = main_panel("x");
    let event = AnalysisEvent {
        kind: AnalysisKind::NaturalTo3d,
        result: Ok(AnalysisOutcome::Conversion(NaturalTo3dResponse {
            func: "x^2 - y^2".into(),
        })),
    };
    let now = Instant::now();
    let mut data = main.session.data(now);
    main.right_side_panels[0].handle_analysis(&event, &mut data);
    assert_eq!(main.session.store.state().func, "x^2 - y^2");
    assert_eq!(
        main.session.function.evaluator().map(|f| f.source()),
        Some("x^2 - y^2")
    );
}

#[test]
fn analysis_result_is_kept_in_app_state() {
    let mut main = main_panel("x^2");
    let analysis = FunctionAnalysis::SingleVariable(SingleVariableAnalysis {
        domain: "all reals".into(),
        range: "[0, inf)".into(),
        first_derivative: "2x".into(),
        second_derivative: "2".into(),
        calculation_steps: "Power rule.".into(),
    });
    let event = AnalysisEvent {
        kind: AnalysisKind::AnalyzeFunction,
        result: Ok(AnalysisOutcome::Analysis(analysis.clone())),
    };
    let now = Instant::now();
    let mut data = main.session.data(now);
    main.right_side_panels[0].handle_analysis(&event, &mut data);
    assert_eq!(main.session.store.state().last_analysis, Some(analysis));

    main.session.data(now).edit_function("x^3".into());
    assert!(main.session.store.state().last_analysis.is_none());
}
