//! Configuration types for the MultiCalc UI.
//!
//! Every field has a serde default so a partial YAML file is accepted.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::sampler::LineSampling;
use crate::data::view2d::YScale;
use crate::error::ConfigError;

// ─────────────────────────────────────────────────────────────────────────────
// Sampling
// ─────────────────────────────────────────────────────────────────────────────

/// Upper bound on 3D grid cells per axis, whatever the config asks for.
pub const MAX_GRID_CELLS: usize = 400;

/// Sample counts and limits shared by both plots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Points per 1D resample. Default: `200`.
    pub line_points: usize,
    /// Values with a larger magnitude are treated as gaps. Default: `1e6`.
    pub magnitude_clamp: f64,
    /// Cells per axis of the 3D mesh, at most [`MAX_GRID_CELLS`]. Default: `40`.
    pub surface_resolution: usize,
    /// Spacing of the 3D wireframe lines. Default: `0.5`.
    pub wire_step: f64,
    /// Half-extent of the 3D domain on x and y. Default: `10.0`.
    pub wire_range: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            line_points: 200,
            magnitude_clamp: 1e6,
            surface_resolution: 40,
            wire_step: 0.5,
            wire_range: 10.0,
        }
    }
}

impl SamplingConfig {
    pub fn line_sampling(&self) -> LineSampling {
        LineSampling {
            count: self.line_points,
            magnitude_clamp: self.magnitude_clamp,
            ..LineSampling::default()
        }
    }

    /// Wireframe cells per axis implied by `wire_range` and `wire_step`,
    /// capped at [`MAX_GRID_CELLS`].
    pub fn wire_resolution(&self) -> usize {
        if self.wire_step > 0.0 && self.wire_range > 0.0 {
            ((2.0 * self.wire_range / self.wire_step).round() as usize).min(MAX_GRID_CELLS)
        } else {
            0
        }
    }

    pub fn mesh_resolution(&self) -> usize {
        self.surface_resolution.min(MAX_GRID_CELLS)
    }

    pub fn surface_domain(&self) -> (f64, f64) {
        (-self.wire_range, self.wire_range)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// 2D view
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct View2dConfig {
    /// Initial and reset x-domain. Default: `[-5, 5]`.
    pub initial_x: [f64; 2],
    /// Width multiplier for one zoom-in step. Default: `0.8`.
    pub zoom_factor: f64,
    /// Zoom-out stops at this domain width. Default: `1000`.
    pub max_width: f64,
    /// Headroom over the largest observed magnitude. Default: `1.2`.
    pub y_margin: f64,
    pub y_scale: YScale,
    /// Resample the visible domain after zoom and pan instead of rescaling
    /// the existing samples. Default: `true`.
    pub resample_on_zoom: bool,
    /// Hide the tick label at the origin. Default: `true`.
    pub suppress_origin_tick: bool,
    /// Wheel delta to zoom-factor conversion.
    pub wheel_sensitivity: f64,
}

impl Default for View2dConfig {
    fn default() -> Self {
        Self {
            initial_x: [-5.0, 5.0],
            zoom_factor: 0.8,
            max_width: 1000.0,
            y_margin: 1.2,
            y_scale: YScale::FitMagnitude,
            resample_on_zoom: true,
            suppress_origin_tick: true,
            wheel_sensitivity: 0.002,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// 3D view
// ─────────────────────────────────────────────────────────────────────────────

/// How the 3D plot draws the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceStyle {
    /// Projected grid lines; breaks where the function is undefined.
    Wireframe,
    /// Shaded triangles; undefined points are filled with zero.
    Mesh,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct View3dConfig {
    /// Euler angles `[x, y, z]` in radians.
    pub initial_angles: [f64; 3],
    /// Pixels per unit.
    pub initial_zoom: f64,
    pub zoom_range: [f64; 2],
    /// Radians per pixel dragged.
    pub drag_sensitivity: f64,
    /// Zoom units per wheel pixel.
    pub wheel_sensitivity: f64,
    pub surface_style: SurfaceStyle,
    pub color_by_height: bool,
}

impl Default for View3dConfig {
    fn default() -> Self {
        Self {
            initial_angles: [-0.5, 0.5, 0.0],
            initial_zoom: 25.0,
            zoom_range: [5.0, 100.0],
            drag_sensitivity: 0.01,
            wheel_sensitivity: 0.01,
            surface_style: SurfaceStyle::Wireframe,
            color_by_height: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Debounce, history, analysis
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceConfig {
    /// Quiet period before the typed function is compiled.
    pub validate_ms: u64,
    /// Quiet period before a settled function is written to history.
    pub history_ms: u64,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            validate_ms: 300,
            history_ms: 1000,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of remembered functions. Default: `10`.
    pub capacity: usize,
    /// Storage key of the history record.
    pub storage_key: String,
    /// Directory for the file store. `None` = `$HOME/.multicalc`.
    pub storage_dir: Option<PathBuf>,
    /// Keep history in memory only.
    pub memory_only: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            storage_key: "multicalc-history".to_string(),
            storage_dir: None,
            memory_only: false,
        }
    }
}

impl HistoryConfig {
    /// `storage_dir` or the default under the home directory.
    pub fn resolved_storage_dir(&self) -> Option<PathBuf> {
        self.storage_dir.clone().or_else(|| {
            std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".multicalc"))
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Program and arguments of an external model; the prompt is written to
    /// its stdin and the answer read from stdout.
    pub command: Option<Vec<String>>,
    /// Default language of formula explanations.
    pub language: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            command: None,
            language: "English".to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MultiCalcConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level configuration.
///
/// | Field       | Purpose |
/// |-------------|---------|
/// | `sampling`  | Sample counts, clamp and 3D extent |
/// | `view2d`    | 2D domain, zoom and y-scale rules |
/// | `view3d`    | Camera defaults and surface style |
/// | `debounce`  | Validation and history quiet periods |
/// | `history`   | Capacity and storage location |
/// | `analysis`  | External model command |
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiCalcConfig {
    // ── Window / chrome ──────────────────────────────────────────────────────
    /// Native window title.
    pub title: String,
    /// Function shown on first start.
    pub default_function: String,
    /// Optional eframe native-window options.
    #[serde(skip)]
    pub native_options: Option<eframe::NativeOptions>,

    // ── Plotting ─────────────────────────────────────────────────────────────
    pub sampling: SamplingConfig,
    pub view2d: View2dConfig,
    pub view3d: View3dConfig,

    // ── Input and storage ────────────────────────────────────────────────────
    pub debounce: DebounceConfig,
    pub history: HistoryConfig,

    // ── Analysis ─────────────────────────────────────────────────────────────
    pub analysis: AnalysisConfig,
}

impl Default for MultiCalcConfig {
    fn default() -> Self {
        Self {
            title: "MultiCalc Pro".to_string(),
            default_function: "sin(x^2 + y^2) / (x^2 + y^2)".to_string(),
            native_options: None,
            sampling: SamplingConfig::default(),
            view2d: View2dConfig::default(),
            view3d: View3dConfig::default(),
            debounce: DebounceConfig::default(),
            history: HistoryConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl MultiCalcConfig {
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let cfg = Self::from_yaml(&text)?;
        log::info!("loaded config from {}", path.display());
        Ok(cfg)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_yaml()?)?;
        Ok(())
    }
}
