//! MultiCalc crate root: re-exports and module wiring.
//!
//! An interactive function explorer built on egui/eframe:
//! - `data`: UI-free logic (expressions, sampling, view transforms, surfaces,
//!   debouncing, session state, history, analysis flows)
//! - `panels`: egui panels behind the [`Panel`](panels::Panel) trait
//! - `app`: the central widget, layout and the eframe application
//! - `controllers`: off-thread execution of analysis requests
//! - `config`: configuration and YAML loading
//! - `persistence`: key-value storage for the history log

pub mod app;
pub mod config;
pub mod controllers;
pub mod data;
pub mod error;
pub mod panels;
pub mod persistence;

// Public re-exports for a compact external API
pub use app::{model_from_config, run_multicalc, CentralView, MultiCalcApp, MultiCalcPanel};
pub use config::{MultiCalcConfig, SurfaceStyle};
pub use controllers::{AnalysisController, AnalysisEvent};
pub use data::analysis::{AnalysisKind, AnalysisOutcome, AnalysisRequest, LanguageModel};
pub use data::expression::{compile, Evaluator};
pub use data::session::{Session, SessionData};
pub use error::{AnalysisError, ConfigError, ExpressionError, StorageError};
pub use persistence::{FileStore, KeyValueStore, MemoryStore};
