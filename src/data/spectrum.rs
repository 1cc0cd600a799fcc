//! The accumulated spectrum: live sample map, baseline snapshot, axis limits.
//!
//! `SpectrumData` is owned exclusively by the UI thread; scan batches arrive
//! over a channel and are merged here, never mutated from the worker side.
//! Rendering reads from it through [`SpectrumData::series`] and never writes.

use std::collections::HashMap;

/// Frequencies are map keys with exact-match semantics, so they are stored by
/// bit pattern. Scan output frequencies are finite and positive; non-finite
/// input is rejected before it gets here.
fn key(freq: f64) -> u64 {
    freq.to_bits()
}

/// Frequency→magnitude store with baseline snapshot and plot limits.
///
/// Merge policy is last-write-wins on an exact frequency key: `rtl_power_fftw`
/// already averages over its repeat count before printing, so repeated sweeps
/// overwrite rather than average again.
pub struct SpectrumData {
    samples: HashMap<u64, f64>,
    baseline: Option<HashMap<u64, f64>>,
    x_limits: (f64, f64),
    y_limits: (f64, f64),
    live_cursor: Option<f64>,
    dirty: bool,
}

impl Default for SpectrumData {
    fn default() -> Self {
        Self {
            samples: HashMap::new(),
            baseline: None,
            x_limits: (88e6, 108e6),
            y_limits: (-80.0, 0.0),
            live_cursor: None,
            dirty: false,
        }
    }
}

impl SpectrumData {
    /// Replace the X (frequency, Hz) limits. Rejected as a silent no-op
    /// unless both endpoints are finite and `min < max`.
    pub fn set_x_limits(&mut self, min: f64, max: f64) {
        if min.is_finite() && max.is_finite() && min < max {
            self.x_limits = (min, max);
            self.dirty = true;
        }
    }

    /// Replace the Y (magnitude, dB) limits. Same acceptance rule as
    /// [`set_x_limits`](Self::set_x_limits).
    pub fn set_y_limits(&mut self, min: f64, max: f64) {
        if min.is_finite() && max.is_finite() && min < max {
            self.y_limits = (min, max);
            self.dirty = true;
        }
    }

    pub fn x_limits(&self) -> (f64, f64) {
        self.x_limits
    }

    pub fn y_limits(&self) -> (f64, f64) {
        self.y_limits
    }

    /// Union-merge a batch of `(frequency Hz, magnitude dB)` samples into the
    /// live map. Keys present in both resolve to the incoming value.
    /// Non-finite frequencies or magnitudes are dropped with a warning: a NaN
    /// key could never be matched again under exact-key semantics.
    pub fn merge_samples<I>(&mut self, batch: I)
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        for (freq, mag) in batch {
            if !freq.is_finite() || !mag.is_finite() {
                tracing::warn!(freq, mag, "dropping non-finite sample");
                continue;
            }
            self.samples.insert(key(freq), mag);
        }
        self.dirty = true;
    }

    /// Empty the live sample map. The baseline is untouched.
    pub fn clear_samples(&mut self) {
        self.samples.clear();
        self.dirty = true;
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Magnitude currently stored for an exact frequency, if any.
    pub fn magnitude_at(&self, freq: f64) -> Option<f64> {
        self.samples.get(&key(freq)).copied()
    }

    /// Mark the frequency of the most recently received sample; drawn as a
    /// persistent vertical line until the next scan update replaces it.
    pub fn set_live_cursor(&mut self, freq: f64) {
        self.live_cursor = Some(freq);
        self.dirty = true;
    }

    pub fn clear_live_cursor(&mut self) {
        self.live_cursor = None;
        self.dirty = true;
    }

    pub fn live_cursor(&self) -> Option<f64> {
        self.live_cursor
    }

    /// Deep-copy the current live map into the baseline slot. Subsequent
    /// mutations of the live data do not touch the snapshot.
    pub fn save_baseline(&mut self) {
        self.baseline = Some(self.samples.clone());
        self.dirty = true;
    }

    pub fn reset_baseline(&mut self) {
        self.baseline = None;
        self.dirty = true;
    }

    pub fn has_baseline(&self) -> bool {
        self.baseline.is_some()
    }

    /// The renderable series: `(frequency, magnitude)` sorted ascending by
    /// frequency. While a baseline is set, the baseline magnitude at the same
    /// exact frequency is subtracted; frequencies without a baseline entry
    /// pass through unmodified (no interpolation across the two maps).
    pub fn series(&self) -> Vec<(f64, f64)> {
        let mut points: Vec<(f64, f64)> = self
            .samples
            .iter()
            .map(|(&bits, &mag)| {
                let freq = f64::from_bits(bits);
                let mag = match self.baseline.as_ref().and_then(|b| b.get(&bits)) {
                    Some(base) => mag - base,
                    None => mag,
                };
                (freq, mag)
            })
            .collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        points
    }

    /// Consume the dirty flag; `true` means a mutation happened since the
    /// last call and a repaint should be scheduled.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
