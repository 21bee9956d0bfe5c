//! Visible domain of the 2D line chart and the polyline built from samples.

use serde::{Deserialize, Serialize};

use super::sampler::{LineSamples, Sample};
use crate::config::View2dConfig;

/// How the y-domain is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum YScale {
    /// Symmetric around zero, sized from the largest observed magnitude times the margin.
    FitMagnitude,
    /// A fixed range that never follows the data.
    Sticky { min: f64, max: f64 },
}

/// 2D view transform: visible x-domain plus the derived y-domain.
///
/// Only the interaction layer mutates it (zoom, pan, reset); the renderer reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct View2d {
    x: (f64, f64),
    default_x: (f64, f64),
    zoom_factor: f64,
    max_width: f64,
    y_margin: f64,
    y_scale: YScale,
    y_offset: f64,
    /// Grow-only fitted half-height; cleared on reset or expression change.
    fitted_half_height: Option<f64>,
}

impl View2d {
    pub fn new(cfg: &View2dConfig) -> Self {
        let default_x = (cfg.initial_x[0], cfg.initial_x[1]);
        Self {
            x: default_x,
            default_x,
            zoom_factor: cfg.zoom_factor,
            max_width: cfg.max_width,
            y_margin: cfg.y_margin,
            y_scale: cfg.y_scale,
            y_offset: 0.0,
            fitted_half_height: None,
        }
    }

    pub fn x_domain(&self) -> (f64, f64) {
        self.x
    }

    pub fn width(&self) -> f64 {
        self.x.1 - self.x.0
    }

    pub fn y_scale(&self) -> YScale {
        self.y_scale
    }

    pub fn set_y_scale(&mut self, scale: YScale) {
        self.y_scale = scale;
        self.fitted_half_height = None;
    }

    /// Shrink the domain around its center by the zoom factor.
    pub fn zoom_in(&mut self) {
        self.zoom_by(self.zoom_factor);
    }

    /// Grow the domain around its center by the inverse zoom factor, capped at the max width.
    pub fn zoom_out(&mut self) {
        if self.zoom_factor > 0.0 {
            self.zoom_by(1.0 / self.zoom_factor);
        }
    }

    /// Scale the domain width by `factor` around its center.
    pub fn zoom_by(&mut self, factor: f64) {
        if !(factor > 0.0) || !factor.is_finite() {
            return;
        }
        let center = (self.x.0 + self.x.1) / 2.0;
        let half = (self.width() / 2.0 * factor).min(self.max_width / 2.0);
        self.x = (center - half, center + half);
    }

    /// Shift the visible window by data-space deltas.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() {
            self.x = (self.x.0 + dx, self.x.1 + dx);
        }
        if dy.is_finite() {
            self.y_offset += dy;
        }
    }

    /// Return to the configured initial domain and drop the fitted y-range.
    pub fn reset(&mut self) {
        self.x = self.default_x;
        self.y_offset = 0.0;
        self.fitted_half_height = None;
    }

    /// Forget the fitted y-range (used when a new expression is plotted).
    pub fn forget_fit(&mut self) {
        self.fitted_half_height = None;
    }

    /// Update the fitted y-range from fresh samples.
    ///
    /// The fit only grows between calls so consecutive resamples of the
    /// same expression do not make the axis jump.
    pub fn fit_y(&mut self, samples: &LineSamples) {
        if let YScale::FitMagnitude = self.y_scale {
            let candidate = if samples.max_magnitude > 0.0 {
                samples.max_magnitude * self.y_margin
            } else {
                1.0
            };
            let next = match self.fitted_half_height {
                Some(h) if h >= candidate => h,
                _ => candidate,
            };
            self.fitted_half_height = Some(next);
        }
    }

    pub fn y_domain(&self) -> (f64, f64) {
        let (lo, hi) = match self.y_scale {
            YScale::Sticky { min, max } => (min, max),
            YScale::FitMagnitude => {
                let h = self.fitted_half_height.unwrap_or(1.0);
                (-h, h)
            }
        };
        (lo + self.y_offset, hi + self.y_offset)
    }
}

/// Split samples into connected runs; a gap always ends a run.
pub fn polyline_segments(samples: &[Sample]) -> Vec<Vec<[f64; 2]>> {
    let mut segments = Vec::new();
    let mut current: Vec<[f64; 2]> = Vec::new();
    for s in samples {
        match s.y {
            Some(y) => current.push([s.x, y]),
            None => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}
