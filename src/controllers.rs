//! Controllers that run work off the UI thread.
//!
//! [`AnalysisController`] executes model-backed flows on worker threads and
//! hands finished results back to the UI through [`AnalysisController::poll`].
//! Within one flow kind the newest request wins: results of superseded
//! requests are dropped when they arrive.

use std::collections::HashMap;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::data::analysis::{self, AnalysisKind, AnalysisOutcome, AnalysisRequest, LanguageModel};
use crate::error::AnalysisError;

/// A finished flow.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisEvent {
    pub kind: AnalysisKind,
    pub result: Result<AnalysisOutcome, AnalysisError>,
}

/// Controller to start analysis flows and collect their results.
#[derive(Clone)]
pub struct AnalysisController {
    pub(crate) inner: Arc<Mutex<AnalysisCtrlInner>>,
    model: Arc<dyn LanguageModel>,
}

pub(crate) struct AnalysisCtrlInner {
    next_generation: u64,
    /// Generation of the request currently awaited per kind.
    pending: HashMap<AnalysisKind, u64>,
    finished: Vec<(u64, AnalysisEvent)>,
    listeners: Vec<Sender<AnalysisEvent>>,
    repaint: Option<egui::Context>,
}

impl AnalysisController {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(AnalysisCtrlInner {
                next_generation: 0,
                pending: HashMap::new(),
                finished: Vec::new(),
                listeners: Vec::new(),
                repaint: None,
            })),
            model,
        }
    }

    fn lock(&self) -> MutexGuard<'_, AnalysisCtrlInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Wake the UI when a worker finishes.
    pub fn set_repaint_context(&self, ctx: egui::Context) {
        self.lock().repaint = Some(ctx);
    }

    /// Start `req` on a worker thread, superseding any in-flight request of the same kind.
    pub fn request(&self, req: AnalysisRequest) {
        let kind = req.kind();
        let generation = {
            let mut inner = self.lock();
            inner.next_generation += 1;
            let g = inner.next_generation;
            if inner.pending.insert(kind, g).is_some() {
                log::debug!("{} request {g} supersedes an in-flight one", kind.label());
            }
            g
        };

        let inner = Arc::clone(&self.inner);
        let model = Arc::clone(&self.model);
        let spawned = std::thread::Builder::new()
            .name(format!("analysis-{generation}"))
            .spawn(move || {
                let result = analysis::run(model.as_ref(), &req);
                let mut guard = inner.lock().unwrap_or_else(|e| e.into_inner());
                guard.finished.push((generation, AnalysisEvent { kind, result }));
                if let Some(ctx) = &guard.repaint {
                    ctx.request_repaint();
                }
            });
        if let Err(e) = spawned {
            let event = AnalysisEvent {
                kind,
                result: Err(AnalysisError::Model(format!("failed to start worker: {e}"))),
            };
            self.lock().finished.push((generation, event));
        }
    }

    /// Forget the in-flight request of `kind`; its result will be dropped.
    pub fn cancel(&self, kind: AnalysisKind) {
        self.lock().pending.remove(&kind);
    }

    pub fn is_loading(&self, kind: AnalysisKind) -> bool {
        self.lock().pending.contains_key(&kind)
    }

    pub fn any_loading(&self) -> bool {
        !self.lock().pending.is_empty()
    }

    /// Results of the latest requests that finished since the last call.
    pub fn poll(&self) -> Vec<AnalysisEvent> {
        let mut inner = self.lock();
        let finished = std::mem::take(&mut inner.finished);
        let mut out = Vec::new();
        for (generation, event) in finished {
            if inner.pending.get(&event.kind) != Some(&generation) {
                log::warn!(
                    "discarding stale {} result from request {generation}",
                    event.kind.label()
                );
                continue;
            }
            inner.pending.remove(&event.kind);
            if let Err(e) = &event.result {
                log::error!("{} failed: {e}", event.kind.label());
            }
            inner.listeners.retain(|tx| tx.send(event.clone()).is_ok());
            out.push(event);
        }
        out
    }

    /// Subscribe to accepted results. The receiver gets every event [`poll`](Self::poll) returns.
    pub fn subscribe(&self) -> Receiver<AnalysisEvent> {
        let (tx, rx) = std::sync::mpsc::channel();
        self.lock().listeners.push(tx);
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::analysis::{NaturalTo3dRequest, UnconfiguredModel};
    use std::time::{Duration, Instant};

    /// Answers `{"func": <description>}` after sleeping for the number of
    /// milliseconds after the `@` in the description.
    struct Delayed;

    impl LanguageModel for Delayed {
        fn complete(&self, prompt: &str) -> Result<String, AnalysisError> {
            let desc = prompt.rsplit("Description: ").next().unwrap_or("").trim();
            let (func, delay) = desc.split_once('@').unwrap();
            std::thread::sleep(Duration::from_millis(delay.parse().unwrap()));
            Ok(format!(r#"{{"func": "{func}"}}"#))
        }
    }

    fn convert(desc: &str) -> AnalysisRequest {
        AnalysisRequest::NaturalTo3d(NaturalTo3dRequest {
            description: desc.to_string(),
        })
    }

    fn wait_for(ctrl: &AnalysisController, timeout: Duration) -> Vec<AnalysisEvent> {
        let start = Instant::now();
        let mut events = Vec::new();
        while start.elapsed() < timeout {
            events.extend(ctrl.poll());
            if !events.is_empty() && !ctrl.any_loading() {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        events
    }

    #[test]
    fn newest_request_wins() {
        let ctrl = AnalysisController::new(Arc::new(Delayed));
        ctrl.request(convert("x@300"));
        ctrl.request(convert("y@0"));
        assert!(ctrl.is_loading(AnalysisKind::NaturalTo3d));

        let events = wait_for(&ctrl, Duration::from_secs(5));
        assert_eq!(events.len(), 1);
        match &events[0].result {
            Ok(AnalysisOutcome::Conversion(r)) => assert_eq!(r.func, "y"),
            other => panic!("unexpected result {other:?}"),
        }
        assert!(!ctrl.is_loading(AnalysisKind::NaturalTo3d));

        // the superseded request finishes later and is dropped
        std::thread::sleep(Duration::from_millis(500));
        assert!(ctrl.poll().is_empty());
    }

    #[test]
    fn failures_are_reported_as_events() {
        let ctrl = AnalysisController::new(Arc::new(UnconfiguredModel));
        let rx = ctrl.subscribe();
        ctrl.request(convert("a cone"));
        let events = wait_for(&ctrl, Duration::from_secs(5));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].result, Err(AnalysisError::NotConfigured));
        assert_eq!(rx.try_recv().map(|e| e.kind), Ok(AnalysisKind::NaturalTo3d));
    }

    #[test]
    fn cancelled_request_is_dropped() {
        let ctrl = AnalysisController::new(Arc::new(Delayed));
        ctrl.request(convert("x@50"));
        ctrl.cancel(AnalysisKind::NaturalTo3d);
        assert!(!ctrl.is_loading(AnalysisKind::NaturalTo3d));
        std::thread::sleep(Duration::from_millis(300));
        assert!(ctrl.poll().is_empty());
    }
}
