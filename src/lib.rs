//! rtl-spect crate root: re-exports and module wiring.
//!
//! A desktop spectrum-analyzer front end for `rtl_power_fftw`, built on
//! egui/eframe. The pieces:
//! - `data`: the accumulated spectrum store and axis tick generation
//! - `layout`: stateless plot layout and data↔pixel mapping
//! - `plot`: the custom plot widget (grid, labels, polyline, cursors)
//! - `scan`: the external-process worker and its event channel
//! - `app`: control panel, status bar, and wiring

pub mod app;
pub mod color_scheme;
pub mod config;
pub mod data;
pub mod layout;
pub mod plot;
pub mod scan;

// Public re-exports for a compact external API
pub use app::{run_spect, MainApp};
pub use color_scheme::PlotColors;
pub use config::{FormDefaults, InputRanges, SpectConfig};
pub use data::spectrum::SpectrumData;
pub use data::ticks::{AxisScale, Tick};
pub use layout::{LayoutInput, PlotLayout, TextMeasure};
pub use plot::SpectrumPlot;
pub use scan::{
    bin_count, channel_scan, parse_sample_line, spawn_scan, LineError, ScanEvent, ScanHandle,
    ScanParams, ScanStatus,
};
