//! Session state, the pure reducer over it, and the store that owns it.

use std::sync::mpsc::{Receiver, Sender};
use std::time::Instant;

use super::analysis::FunctionAnalysis;
use super::debounce::Debouncer;
use super::history::{HistoryEntry, HistoryLog};
use crate::config::MultiCalcConfig;
use crate::persistence::{load_history, save_history, FallbackStore, KeyValueStore};

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    /// Raw text of the function input.
    pub func: String,
    pub guided_mode: bool,
    /// Unix milliseconds of the last history save.
    pub last_saved: Option<i64>,
    /// Analysis of `func`, dropped whenever `func` changes.
    pub last_analysis: Option<FunctionAnalysis>,
}

impl AppState {
    pub fn new(func: impl Into<String>) -> Self {
        Self {
            func: func.into(),
            guided_mode: false,
            last_saved: None,
            last_analysis: None,
        }
    }

    pub fn to_entry(&self) -> HistoryEntry {
        HistoryEntry {
            func: self.func.clone(),
            guided_mode: self.guided_mode,
            last_saved: self.last_saved,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetFunction(String),
    SetGuidedMode(bool),
    /// Restore a history entry.
    LoadState(HistoryEntry),
    SaveToHistory { at_millis: i64 },
    SetAnalysis(FunctionAnalysis),
}

pub fn reduce(state: &AppState, action: Action) -> AppState {
    match action {
        Action::SetFunction(func) => {
            let last_analysis = if func == state.func {
                state.last_analysis.clone()
            } else {
                None
            };
            AppState {
                func,
                last_analysis,
                ..state.clone()
            }
        }
        Action::SetGuidedMode(guided_mode) => AppState {
            guided_mode,
            ..state.clone()
        },
        Action::LoadState(entry) => AppState {
            func: entry.func,
            guided_mode: entry.guided_mode,
            last_saved: entry.last_saved,
            last_analysis: None,
        },
        Action::SaveToHistory { at_millis } => AppState {
            last_saved: Some(at_millis),
            ..state.clone()
        },
        Action::SetAnalysis(analysis) => AppState {
            last_analysis: Some(analysis),
            ..state.clone()
        },
    }
}

/// Schedules a history save once `func` or `guided_mode` stop changing.
#[derive(Debug, Clone)]
pub struct HistoryAutosave {
    debounce: Debouncer<()>,
}

impl HistoryAutosave {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            debounce: Debouncer::from_millis(delay_ms),
        }
    }

    pub fn observe(&mut self, prev: &AppState, next: &AppState, now: Instant) {
        if prev.func != next.func || prev.guided_mode != next.guided_mode {
            self.debounce.call((), now);
        }
    }

    /// The save action once the quiet period has passed, if there is anything to save.
    pub fn poll(&mut self, state: &AppState, now: Instant, at_millis: i64) -> Option<Action> {
        self.debounce.poll(now)?;
        (!state.func.trim().is_empty()).then_some(Action::SaveToHistory { at_millis })
    }

    pub fn is_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    pub fn time_until_due(&self, now: Instant) -> Option<std::time::Duration> {
        self.debounce.time_until_due(now)
    }
}

/// Owns the [`AppState`], the history log and its storage.
///
/// All mutation goes through [`dispatch`](Store::dispatch); subscribers get a
/// copy of the new state after every change.
pub struct Store {
    state: AppState,
    history: HistoryLog,
    storage: Box<dyn KeyValueStore>,
    storage_key: String,
    autosave: HistoryAutosave,
    listeners: Vec<Sender<AppState>>,
}

impl Store {
    pub fn new(
        initial: AppState,
        storage: Box<dyn KeyValueStore>,
        storage_key: impl Into<String>,
        capacity: usize,
        autosave_ms: u64,
    ) -> Self {
        let storage_key = storage_key.into();
        let history = load_history(storage.as_ref(), &storage_key, capacity);
        Self {
            state: initial,
            history,
            storage,
            storage_key,
            autosave: HistoryAutosave::new(autosave_ms),
            listeners: Vec::new(),
        }
    }

    /// File-backed history under the configured directory, memory-only when
    /// disabled or no directory can be resolved.
    pub fn from_config(cfg: &MultiCalcConfig) -> Self {
        let storage = match (cfg.history.memory_only, cfg.history.resolved_storage_dir()) {
            (false, Some(dir)) => {
                log::info!("history stored in {}", dir.display());
                FallbackStore::new(Box::new(crate::persistence::FileStore::new(dir)))
            }
            _ => {
                log::info!("history kept in memory only");
                FallbackStore::memory_only()
            }
        };
        Self::new(
            AppState::new(cfg.default_function.clone()),
            Box::new(storage),
            cfg.history.storage_key.clone(),
            cfg.history.capacity,
            cfg.debounce.history_ms,
        )
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn subscribe(&mut self) -> Receiver<AppState> {
        let (tx, rx) = std::sync::mpsc::channel();
        self.listeners.push(tx);
        rx
    }

    pub fn dispatch(&mut self, action: Action) {
        self.dispatch_at(action, Instant::now());
    }

    /// Dispatch with an explicit clock for the autosave debounce.
    pub fn dispatch_at(&mut self, action: Action, now: Instant) {
        let save = matches!(action, Action::SaveToHistory { .. });
        let next = reduce(&self.state, action);
        self.autosave.observe(&self.state, &next, now);
        if next == self.state && !save {
            return;
        }
        self.state = next;
        if save {
            self.history.record(self.state.to_entry());
            self.persist_history();
        }
        self.notify();
    }

    /// Run a due history save. Returns `true` if one was recorded.
    pub fn tick(&mut self, now: Instant, at_millis: i64) -> bool {
        match self.autosave.poll(&self.state, now, at_millis) {
            Some(action) => {
                self.dispatch_at(action, now);
                true
            }
            None => false,
        }
    }

    pub fn autosave_due_in(&self, now: Instant) -> Option<std::time::Duration> {
        self.autosave.time_until_due(now)
    }

    /// Restore the history entry at `index`.
    pub fn load_entry(&mut self, index: usize) {
        if let Some(entry) = self.history.get(index).cloned() {
            self.dispatch(Action::LoadState(entry));
        }
    }

    pub fn delete_entry(&mut self, index: usize) {
        if self.history.remove(index).is_some() {
            self.persist_history();
            self.notify();
        }
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.persist_history();
        self.notify();
    }

    fn persist_history(&mut self) {
        if let Err(e) = save_history(self.storage.as_mut(), &self.storage_key, &self.history) {
            log::warn!("failed to save history: {e}");
        }
    }

    fn notify(&mut self) {
        let state = &self.state;
        self.listeners.retain(|tx| tx.send(state.clone()).is_ok());
    }
}
