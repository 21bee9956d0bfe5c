use std::sync::Arc;
use std::time::{Duration, Instant};

use multicalc::config::{MultiCalcConfig, View2dConfig};
use multicalc::data::analysis::UnconfiguredModel;
use multicalc::data::app_state::{AppState, Store};
use multicalc::data::sampler::{sample_1d, sample_2d, LineSampling, MissingValuePolicy};
use multicalc::data::surface::build_mesh;
use multicalc::data::view2d::{polyline_segments, View2d};
use multicalc::{compile, AnalysisController, MemoryStore, Session};

#[test]
fn parabola_fits_thirty_units() {
    let f = compile("x^2").unwrap();
    let samples = sample_1d(&f, (-5.0, 5.0), &LineSampling::default());
    assert_eq!(samples.points.len(), 200);
    assert_eq!(samples.gap_count(), 0);

    let ys: Vec<f64> = samples.points.iter().filter_map(|s| s.y).collect();
    let min = ys.iter().cloned().fold(f64::INFINITY, f64::min);
    assert!(min >= 0.0 && min < 0.01, "min {min}");
    assert!((samples.max_magnitude - 25.0).abs() < 1e-9);

    let mut view = View2d::new(&View2dConfig::default());
    view.fit_y(&samples);
    let (lo, hi) = view.y_domain();
    assert!((lo + 30.0).abs() < 1e-6 && (hi - 30.0).abs() < 1e-6);
}

#[test]
fn reciprocal_breaks_at_the_pole() {
    let f = compile("1/x").unwrap();
    let samples = sample_1d(&f, (-5.0, 5.0), &LineSampling::default());
    let gap = samples
        .points
        .iter()
        .find(|s| s.is_gap())
        .expect("a gap near zero");
    assert!(gap.x.abs() < 0.05);

    let segments = polyline_segments(&samples.points);
    assert_eq!(segments.len(), 2);
    assert!(segments[0].iter().all(|p| p[0] < 0.0));
    assert!(segments[1].iter().all(|p| p[0] > 0.0));
}

#[test]
fn small_grid_builds_thirty_two_triangles() {
    let f = compile("x^2*y").unwrap();
    let grid = sample_2d(&f, (-2.0, 2.0), (-2.0, 2.0), 4, MissingValuePolicy::Fill(0.0));
    assert_eq!(grid.values.len(), 25);
    assert!(grid.values.iter().all(|v| v.is_some_and(f64::is_finite)));

    let mesh = build_mesh(&grid, true);
    assert_eq!(mesh.positions.len(), 25);
    assert_eq!(mesh.triangle_count(), 32);
}

#[test]
fn zoom_in_shrinks_domain_around_center() {
    let mut view = View2d::new(&View2dConfig::default());
    assert_eq!(view.x_domain(), (-5.0, 5.0));
    view.zoom_in();
    let (a, b) = view.x_domain();
    assert!((a + 4.0).abs() < 1e-12 && (b - 4.0).abs() < 1e-12);
}

fn memory_session() -> Session {
    let config = MultiCalcConfig::default();
    let store = Store::new(
        AppState::new(""),
        Box::new(MemoryStore::new()),
        "history",
        config.history.capacity,
        config.debounce.history_ms,
    );
    Session::new(config, store, AnalysisController::new(Arc::new(UnconfiguredModel)))
}

/// Type `text` at `t` and let both debounces settle.
fn enter(session: &mut Session, text: &str, t: Instant, at_millis: i64) {
    session.data(t).edit_function(text.to_string());
    session.tick(t + Duration::from_millis(300), at_millis);
    session.tick(t + Duration::from_millis(1000), at_millis);
}

#[test]
fn settled_expressions_fill_history_newest_first() {
    let t0 = Instant::now();
    let mut session = memory_session();
    let funcs = ["x^2", "sin(x)", "x*y", "cos(x)*y", "sqrt(x)"];
    for (i, f) in funcs.iter().enumerate() {
        enter(&mut session, f, t0 + Duration::from_secs(2 * i as u64), i as i64);
    }

    let saved: Vec<&str> = session
        .store
        .history()
        .entries()
        .iter()
        .map(|e| e.func.as_str())
        .collect();
    assert_eq!(saved, ["sqrt(x)", "cos(x)*y", "x*y", "sin(x)", "x^2"]);

    enter(&mut session, "x^2", t0 + Duration::from_secs(20), 99);
    let history = session.store.history();
    assert_eq!(history.len(), 5);
    assert_eq!(history.entries()[0].func, "x^2");
    assert_eq!(history.entries()[0].last_saved, Some(99));
    assert_eq!(
        history.entries().iter().filter(|e| e.func == "x^2").count(),
        1
    );
}

#[test]
fn typing_burst_saves_only_the_final_text() {
    let t0 = Instant::now();
    let mut session = memory_session();
    for (i, text) in ["s", "si", "sin", "sin(x", "sin(x)"].iter().enumerate() {
        let t = t0 + Duration::from_millis(100 * i as u64);
        session.data(t).edit_function(text.to_string());
        session.tick(t, 0);
    }
    session.tick(t0 + Duration::from_secs(3), 7);
    let history = session.store.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history.entries()[0].func, "sin(x)");
    assert_eq!(session.function.evaluator().map(|f| f.source()), Some("sin(x)"));
}
