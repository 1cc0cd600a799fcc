//! Axis scaling and tick/label generation.
//!
//! An [`AxisScale`] describes how raw data values on one axis are presented:
//! display unit scaling, decimal places, axis title, and an optional explicit
//! tick step. Tick generation is pure so the whole labelling pipeline can be
//! exercised without a graphics context.

/// One axis tick: a normalized position along the axis and its label text.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Position in `[0, 1]` along the axis (0 = lower limit, 1 = upper limit).
    pub pos: f64,
    /// Pre-formatted label text in display units.
    pub label: String,
}

/// Presentation settings for one plot axis.
#[derive(Debug, Clone)]
pub struct AxisScale {
    /// Axis title drawn next to the tick labels, e.g. `"Frequency (MHz)"`.
    pub title: String,
    /// Raw data units per display unit (1e6 turns Hz into MHz).
    pub scaler: f64,
    /// Decimal places in tick labels.
    pub decimals: usize,
    /// Explicit tick step in raw data units; `None` divides the range by 10.
    pub step: Option<f64>,
}

impl AxisScale {
    pub fn new(title: impl Into<String>, scaler: f64, decimals: usize) -> Self {
        Self {
            title: title.into(),
            scaler,
            decimals,
            step: None,
        }
    }

    /// Format a raw data value as a tick label in display units.
    ///
    /// ```
    /// # use rtl_spect::data::ticks::AxisScale;
    /// let mhz = AxisScale::new("Frequency (MHz)", 1e6, 1);
    /// assert_eq!(mhz.format(98_500_000.0), "98.5");
    /// ```
    pub fn format(&self, value: f64) -> String {
        format!("{:.*}", self.decimals, value / self.scaler)
    }

    /// The tick step used for the given limits: the explicit override if set,
    /// otherwise a tenth of the range.
    pub fn step_for(&self, min: f64, max: f64) -> f64 {
        self.step.unwrap_or((max - min) / 10.0)
    }

    /// Generate the tick sequence for the limits `[min, max]`.
    ///
    /// Ticks start at the lower limit and advance by the step while strictly
    /// below the upper limit; a final tick pinned at normalized position 1 is
    /// always appended, labelled with the exact upper limit. When the step
    /// does not divide the range evenly this leaves an uneven final interval,
    /// which is intentional: the plot boundary is always labelled with the
    /// true limit.
    pub fn ticks(&self, min: f64, max: f64) -> Vec<Tick> {
        let mut out = Vec::new();
        let range = max - min;
        let step = self.step_for(min, max);
        if range > 0.0 && step > 0.0 && step.is_finite() {
            let mut x = min;
            while x < max {
                out.push(Tick {
                    pos: (x - min) / range,
                    label: self.format(x),
                });
                x += step;
            }
        }
        out.push(Tick {
            pos: 1.0,
            label: self.format(max),
        });
        out
    }
}
