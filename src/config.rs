//! Application configuration: window title, input ranges, scan defaults.

use std::ops::RangeInclusive;
use std::path::PathBuf;

/// Valid ranges for the control-panel inputs. These bound the scan
/// parameters; the spin widgets clamp to them.
#[derive(Debug, Clone)]
pub struct InputRanges {
    /// Start/end frequency, MHz.
    pub freq_mhz: RangeInclusive<f64>,
    /// Resolution bandwidth, kHz.
    pub rbw_khz: RangeInclusive<f64>,
    /// Sample rate, Msps.
    pub rate_msps: RangeInclusive<f64>,
    /// Tuner gain, dB (passed to the tool in tenths).
    pub gain_db: RangeInclusive<f64>,
    pub repeats: RangeInclusive<u32>,
    /// Frequency correction, ppm.
    pub ppm: RangeInclusive<i32>,
    /// Plot Y limits, dB.
    pub plot_db: RangeInclusive<f64>,
}

impl Default for InputRanges {
    fn default() -> Self {
        Self {
            freq_mhz: 30.0..=1800.0,
            rbw_khz: 1.0..=3200.0,
            rate_msps: 0.25..=3.2,
            gain_db: 0.0..=50.0,
            repeats: 1..=1000,
            ppm: -100..=100,
            plot_db: -100.0..=100.0,
        }
    }
}

/// Initial values for the control-panel form, in UI units.
#[derive(Debug, Clone)]
pub struct FormDefaults {
    pub start_mhz: f64,
    pub end_mhz: f64,
    pub rbw_khz: f64,
    pub rate_msps: f64,
    pub gain_db: f64,
    pub repeats: u32,
    pub ppm: i32,
    pub plot_min_db: f64,
    pub plot_max_db: f64,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            start_mhz: 88.0,
            end_mhz: 108.0,
            rbw_khz: 10.0,
            rate_msps: 2.4,
            gain_db: 0.0,
            repeats: 100,
            ppm: 37,
            plot_min_db: -80.0,
            plot_max_db: 0.0,
        }
    }
}

/// Top-level configuration for [`run_spect`](crate::app::run_spect).
#[derive(Debug, Clone)]
pub struct SpectConfig {
    /// Native window title.
    pub title: String,
    /// Path of the power-spectrum sampling tool.
    pub executable: PathBuf,
    /// Samples per streamed batch.
    pub batch_size: usize,
    pub ranges: InputRanges,
    pub defaults: FormDefaults,
}

impl Default for SpectConfig {
    fn default() -> Self {
        Self {
            title: "RTL-SDR Spectrum Analyzer".to_string(),
            executable: PathBuf::from("rtl_power_fftw"),
            batch_size: 10,
            ranges: InputRanges::default(),
            defaults: FormDefaults::default(),
        }
    }
}
