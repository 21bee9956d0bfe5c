//! Axis tick placement and label formatting for the 2D chart.

/// Pick a step from the 1-2-5 series so that roughly `target` ticks span `span`.
///
/// ```
/// # use multicalc::data::ticks::nice_step;
/// assert_eq!(nice_step(10.0, 10), 1.0);
/// assert_eq!(nice_step(40.0, 10), 5.0);
/// assert_eq!(nice_step(200.0, 10), 20.0);
/// ```
pub fn nice_step(span: f64, target: usize) -> f64 {
    if !span.is_finite() || span <= 0.0 || target == 0 {
        return 1.0;
    }
    let raw = span / target as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let nice = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Tick positions inside `domain` at multiples of `step`.
pub fn tick_values(domain: (f64, f64), step: f64) -> Vec<f64> {
    let (min, max) = domain;
    if !(step > 0.0) || !min.is_finite() || !max.is_finite() || max < min {
        return Vec::new();
    }
    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

/// Decimal places needed to distinguish ticks spaced by `step`.
pub fn decimals_for_step(step: f64) -> usize {
    if !(step > 0.0) || step >= 1.0 {
        return 0;
    }
    (-step.log10().floor()).max(0.0) as usize
}

/// Tick label formatting rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickFormat {
    /// Leave the label at zero empty so the two axes don't collide at the origin.
    pub suppress_origin: bool,
}

impl Default for TickFormat {
    fn default() -> Self {
        Self {
            suppress_origin: true,
        }
    }
}

impl TickFormat {
    /// Format a tick value. Integers are printed without a decimal part.
    pub fn format(&self, value: f64, step: f64) -> String {
        let eps = if step > 0.0 { step * 1e-6 } else { 1e-12 };
        if value.abs() < eps {
            return if self.suppress_origin {
                String::new()
            } else {
                "0".to_string()
            };
        }
        let rounded = value.round();
        if (value - rounded).abs() < eps {
            return format!("{}", rounded as i64);
        }
        format!("{:.*}", decimals_for_step(step).max(1), value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_cover_domain() {
        let step = nice_step(10.0, 10);
        let ticks = tick_values((-5.0, 5.0), step);
        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks[0], -5.0);
        assert_eq!(ticks[10], 5.0);
    }

    #[test]
    fn degenerate_inputs_fall_back() {
        assert_eq!(nice_step(0.0, 10), 1.0);
        assert_eq!(nice_step(f64::NAN, 10), 1.0);
        assert!(tick_values((1.0, 0.0), 1.0).is_empty());
        assert!(tick_values((0.0, 1.0), 0.0).is_empty());
    }

    #[test]
    fn integer_labels_have_no_decimals() {
        let fmt = TickFormat::default();
        assert_eq!(fmt.format(3.0, 1.0), "3");
        assert_eq!(fmt.format(-20.0, 5.0), "-20");
    }

    #[test]
    fn fractional_labels_follow_step() {
        let fmt = TickFormat::default();
        assert_eq!(fmt.format(0.25, 0.05), "0.25");
        assert_eq!(fmt.format(1.5, 0.5), "1.5");
    }

    #[test]
    fn origin_label_is_optional() {
        assert_eq!(TickFormat::default().format(0.0, 1.0), "");
        let keep = TickFormat {
            suppress_origin: false,
        };
        assert_eq!(keep.format(1e-15, 1.0), "0");
    }
}
