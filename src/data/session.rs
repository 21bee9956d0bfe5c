//! The live session: store, function input and analysis controller, plus the
//! per-frame view of it handed to every panel.

use std::sync::Arc;
use std::time::{Duration, Instant};

use super::analysis::{FunctionAnalysis, LanguageModel};
use super::app_state::{Action, Store};
use super::function_input::FunctionInput;
use crate::config::MultiCalcConfig;
use crate::controllers::{AnalysisController, AnalysisEvent};

/// Everything a running calculator owns apart from its panels.
pub struct Session {
    pub store: Store,
    pub function: FunctionInput,
    pub analysis: AnalysisController,
    pub config: MultiCalcConfig,
}

impl Session {
    pub fn new(config: MultiCalcConfig, store: Store, analysis: AnalysisController) -> Self {
        let function = FunctionInput::new(
            &store.state().func,
            Duration::from_millis(config.debounce.validate_ms),
        );
        Self {
            store,
            function,
            analysis,
            config,
        }
    }

    /// Storage and debounce settings taken from `config`.
    pub fn from_config(config: MultiCalcConfig, model: Arc<dyn LanguageModel>) -> Self {
        let store = Store::from_config(&config);
        Self::new(config, store, AnalysisController::new(model))
    }

    /// Run due debounces and collect finished analysis results.
    ///
    /// `at_millis` is the wall-clock timestamp recorded on a history save.
    pub fn tick(&mut self, now: Instant, at_millis: i64) -> Vec<AnalysisEvent> {
        self.function.poll(now);
        if self.store.tick(now, at_millis) {
            log::debug!("saved {:?} to history", self.store.state().func);
        }
        self.analysis.poll()
    }

    /// Time until the next debounce fires, if any is pending.
    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        match (self.function.time_until_due(now), self.store.autosave_due_in(now)) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn data(&mut self, now: Instant) -> SessionData<'_> {
        SessionData {
            store: &mut self.store,
            function: &mut self.function,
            analysis: &self.analysis,
            config: &self.config,
            now,
        }
    }
}

pub struct SessionData<'a> {
    pub store: &'a mut Store,
    pub function: &'a mut FunctionInput,
    pub analysis: &'a AnalysisController,
    pub config: &'a MultiCalcConfig,
    /// Frame time used for every debounce decision in this frame.
    pub now: Instant,
}

impl<'a> SessionData<'a> {
    /// A keystroke: the text is stored now, compiled after the quiet period.
    pub fn edit_function(&mut self, text: String) {
        self.function.edit(text.clone(), self.now);
        self.store.dispatch_at(Action::SetFunction(text), self.now);
    }

    /// Replace the function and compile it immediately (history restore, conversion).
    pub fn apply_function(&mut self, text: String) {
        self.function.apply_now(&text);
        self.store.dispatch_at(Action::SetFunction(text), self.now);
    }

    pub fn set_guided_mode(&mut self, on: bool) {
        self.store.dispatch_at(Action::SetGuidedMode(on), self.now);
    }

    pub fn set_analysis(&mut self, analysis: FunctionAnalysis) {
        self.store.dispatch_at(Action::SetAnalysis(analysis), self.now);
    }

    /// Restore history entry `index` and compile its function.
    pub fn restore_history(&mut self, index: usize) {
        if let Some(entry) = self.store.history().get(index).cloned() {
            self.function.apply_now(&entry.func);
            self.store.dispatch_at(Action::LoadState(entry), self.now);
        }
    }

    /// Current text of the function input.
    pub fn func(&self) -> &str {
        &self.store.state().func
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::analysis::UnconfiguredModel;
    use crate::data::app_state::AppState;
    use crate::persistence::MemoryStore;

    fn session() -> Session {
        let config = MultiCalcConfig::default();
        let store = Store::new(
            AppState::new("x^2"),
            Box::new(MemoryStore::new()),
            "history",
            config.history.capacity,
            config.debounce.history_ms,
        );
        Session::new(config, store, AnalysisController::new(Arc::new(UnconfiguredModel)))
    }

    #[test]
    fn edits_validate_then_save() {
        let t0 = Instant::now();
        let mut s = session();
        s.data(t0).edit_function("x^3".into());
        assert_eq!(s.next_wakeup(t0), Some(Duration::from_millis(300)));

        s.tick(t0 + Duration::from_millis(300), 1);
        assert_eq!(s.function.evaluator().map(|f| f.source()), Some("x^3"));
        assert!(s.store.history().is_empty());

        s.tick(t0 + Duration::from_millis(1000), 2);
        assert_eq!(s.store.history().entries()[0].func, "x^3");
        assert_eq!(s.next_wakeup(t0 + Duration::from_millis(1000)), None);
    }

    #[test]
    fn restore_compiles_immediately() {
        let t0 = Instant::now();
        let mut s = session();
        s.data(t0).apply_function("sin(x)".into());
        s.tick(t0 + Duration::from_secs(2), 5);
        s.data(t0).apply_function("cos(x)".into());

        s.data(t0).restore_history(0);
        assert_eq!(s.store.state().func, "sin(x)");
        assert_eq!(s.store.state().last_saved, Some(5));
        assert_eq!(s.function.evaluator().map(|f| f.source()), Some("sin(x)"));
    }
}
