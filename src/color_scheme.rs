//! Color definitions for the spectrum plot widget.

use egui::Color32;

/// Colors used by [`SpectrumPlot`](crate::plot::SpectrumPlot), in draw order
/// from background to overlays.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotColors {
    pub background: Color32,
    pub grid: Color32,
    pub labels: Color32,
    pub trace: Color32,
    /// Transient pointer crosshair.
    pub cursor: Color32,
    /// Persistent vertical marker at the most recent sample frequency.
    pub live_cursor: Color32,
}

impl Default for PlotColors {
    fn default() -> Self {
        // Dark scheme matching the rest of the egui dark visuals.
        Self {
            background: Color32::from_rgb(0x22, 0x22, 0x22),
            grid: Color32::from_rgb(0x77, 0x77, 0x77),
            labels: Color32::WHITE,
            trace: Color32::YELLOW,
            cursor: Color32::from_rgb(0xff, 0x00, 0xff),
            live_cursor: Color32::WHITE,
        }
    }
}
