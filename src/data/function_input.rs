//! Debounced validation of the function text.
//!
//! Raw text is accepted immediately; compiling waits for a quiet period. A
//! failed compile marks the input invalid but keeps the last valid
//! evaluator, so the plots never blank on a bad keystroke.

use std::time::{Duration, Instant};

use super::debounce::Debouncer;
use super::expression::{compile, Evaluator};
use crate::error::ExpressionError;

#[derive(Debug, Clone, PartialEq)]
pub enum Validity {
    /// Nothing entered.
    Empty,
    /// Edited, waiting for the quiet period.
    Pending,
    Valid,
    Invalid(ExpressionError),
}

impl Validity {
    pub fn is_invalid(&self) -> bool {
        matches!(self, Validity::Invalid(_))
    }
}

#[derive(Debug, Clone)]
pub struct FunctionInput {
    validate: Debouncer<String>,
    validity: Validity,
    evaluator: Option<Evaluator>,
    /// Bumped whenever a new evaluator is accepted.
    revision: u64,
}

impl FunctionInput {
    /// Compiles `initial` right away.
    pub fn new(initial: &str, delay: Duration) -> Self {
        let mut input = Self {
            validate: Debouncer::new(delay),
            validity: Validity::Empty,
            evaluator: None,
            revision: 0,
        };
        input.apply_now(initial);
        input
    }

    /// Record an edit; the compile runs once the input has been quiet for the delay.
    pub fn edit(&mut self, text: impl Into<String>, now: Instant) {
        self.validate.call(text.into(), now);
        self.validity = Validity::Pending;
    }

    /// Compile the pending text if its quiet period is over.
    ///
    /// Returns `true` when a new evaluator was accepted and the plots must resample.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.validate.poll(now) {
            Some(text) => self.validate_text(&text),
            None => false,
        }
    }

    /// Compile `text` immediately, dropping any pending edit.
    pub fn apply_now(&mut self, text: &str) -> bool {
        self.validate.cancel();
        self.validate_text(text)
    }

    /// Compile whatever is pending without waiting.
    pub fn flush(&mut self) -> bool {
        match self.validate.flush() {
            Some(text) => self.validate_text(&text),
            None => false,
        }
    }

    fn validate_text(&mut self, text: &str) -> bool {
        match compile(text) {
            Ok(f) => {
                log::debug!("compiled {:?}", f.source());
                let changed = self.evaluator.as_ref().map(|e| e.source()) != Some(f.source());
                self.validity = Validity::Valid;
                self.evaluator = Some(f);
                if changed {
                    self.revision += 1;
                }
                changed
            }
            Err(ExpressionError::Empty) => {
                self.validity = Validity::Empty;
                false
            }
            Err(e) => {
                log::debug!("rejected {text:?}: {e}");
                self.validity = Validity::Invalid(e);
                false
            }
        }
    }

    pub fn validity(&self) -> &Validity {
        &self.validity
    }

    /// The last evaluator that compiled, even if the current text is invalid.
    pub fn evaluator(&self) -> Option<&Evaluator> {
        self.evaluator.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_pending(&self) -> bool {
        self.validate.is_pending()
    }

    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.validate.time_until_due(now)
    }
}
