//! The spectrum plot widget.
//!
//! `SpectrumPlot` renders a [`SpectrumData`] snapshot into an egui `Ui`:
//! background, axis titles, grid with tick labels, the data polyline
//! (baseline-subtracted), the persistent live-cursor line, and the pointer
//! crosshair, in that order so later elements overlay earlier ones. The
//! widget holds only transient view state (the cached crosshair position);
//! all data lives in `SpectrumData` and is never mutated here.

use std::f32::consts::FRAC_PI_2;

use egui::epaint::TextShape;
use egui::{pos2, Align2, Color32, FontId, Pos2, Sense, Shape, Stroke, TextStyle, Ui, Vec2};

use crate::color_scheme::PlotColors;
use crate::data::spectrum::SpectrumData;
use crate::data::ticks::AxisScale;
use crate::layout::{LayoutInput, PlotLayout, TextMeasure};

/// Measures text through the egui font atlas of the surrounding `Ui`.
struct FontMeasure<'a> {
    ui: &'a Ui,
    font_id: FontId,
}

impl TextMeasure for FontMeasure<'_> {
    fn size(&self, text: &str) -> Vec2 {
        self.ui.fonts_mut(|f| {
            f.layout_no_wrap(text.to_owned(), self.font_id.clone(), Color32::WHITE)
                .size()
        })
    }
}

pub struct SpectrumPlot {
    pub x_axis: AxisScale,
    pub y_axis: AxisScale,
    pub colors: PlotColors,
    pub padding: f32,
    /// Last hover position, cached while the pointer is inside the client
    /// rect and cleared when it leaves.
    cursor_px: Option<Pos2>,
}

impl Default for SpectrumPlot {
    fn default() -> Self {
        Self {
            x_axis: AxisScale::new("Frequency (MHz)", 1e6, 1),
            y_axis: AxisScale::new("Relative Gain (dB)", 1.0, 0),
            colors: PlotColors::default(),
            padding: 10.0,
            cursor_px: None,
        }
    }
}

impl SpectrumPlot {
    /// Cached crosshair pixel position from the last render; `None` while
    /// the pointer is outside the client rectangle.
    pub fn crosshair(&self) -> Option<Pos2> {
        self.cursor_px
    }

    /// Render the plot into the available space and handle pointer hover.
    ///
    /// Returns the data-space point under the pointer when it is inside the
    /// client rectangle (bounds inclusive), `None` otherwise. Callers treat
    /// `None` as "clear the cursor readout", not as an error.
    pub fn show(&mut self, ui: &mut Ui, data: &SpectrumData) -> Option<(f64, f64)> {
        let (outer, response) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
        let font_id = TextStyle::Body.resolve(ui.style());
        let x_limits = data.x_limits();
        let y_limits = data.y_limits();

        let x_ticks = self.x_axis.ticks(x_limits.0, x_limits.1);
        let y_ticks = self.y_axis.ticks(y_limits.0, y_limits.1);
        let layout = PlotLayout::compute(
            outer,
            &LayoutInput {
                x_ticks: &x_ticks,
                y_ticks: &y_ticks,
                x_title: &self.x_axis.title,
                y_title: &self.y_axis.title,
                padding: self.padding,
            },
            x_limits,
            y_limits,
            &FontMeasure {
                ui,
                font_id: font_id.clone(),
            },
        );

        let painter = ui.painter_at(outer);
        let client = layout.client;

        painter.rect_filled(outer, 0.0, self.colors.background);

        // Axis titles: X centered below the labels, Y rotated along the left
        // edge reading bottom-to-top.
        painter.text(
            pos2(client.center().x, outer.bottom() - self.padding),
            Align2::CENTER_BOTTOM,
            &self.x_axis.title,
            font_id.clone(),
            self.colors.labels,
        );
        let y_title =
            painter.layout_no_wrap(self.y_axis.title.clone(), font_id.clone(), self.colors.labels);
        let y_title_pos = pos2(
            outer.left() + self.padding,
            client.center().y + y_title.size().x / 2.0,
        );
        painter.add(TextShape::new(y_title_pos, y_title, self.colors.labels).with_angle(-FRAC_PI_2));

        // Grid lines and tick labels.
        for tick in &x_ticks {
            let x = layout.x_tick_px(tick.pos);
            painter.line_segment(
                [pos2(x, client.bottom()), pos2(x, client.top())],
                Stroke::new(1.0, self.colors.grid),
            );
            painter.text(
                pos2(x, client.bottom() + self.padding),
                Align2::CENTER_TOP,
                &tick.label,
                font_id.clone(),
                self.colors.labels,
            );
        }
        for tick in &y_ticks {
            let y = layout.y_tick_px(tick.pos);
            painter.line_segment(
                [pos2(client.left(), y), pos2(client.right(), y)],
                Stroke::new(1.0, self.colors.grid),
            );
            painter.text(
                pos2(client.left() - self.padding, y),
                Align2::RIGHT_CENTER,
                &tick.label,
                font_id.clone(),
                self.colors.labels,
            );
        }

        // Data polyline: straight segments between sorted samples, no
        // smoothing. Skipped entirely while the live map is empty.
        let series = data.series();
        if !series.is_empty() {
            let points: Vec<Pos2> = series
                .iter()
                .map(|&(freq, mag)| layout.data_to_px(freq, mag))
                .collect();
            painter.add(Shape::line(points, Stroke::new(1.5, self.colors.trace)));
        }

        if let Some(freq) = data.live_cursor() {
            if freq >= x_limits.0 && freq <= x_limits.1 {
                let x = layout.x_to_px(freq);
                painter.line_segment(
                    [pos2(x, client.top()), pos2(x, client.bottom())],
                    Stroke::new(1.0, self.colors.live_cursor),
                );
            }
        }

        // Pointer hover: report the data-space point while inside the client
        // rect; outside, the crosshair is cleared and nothing is reported.
        let hover = match response.hover_pos() {
            Some(pos) if layout.contains(pos) => {
                self.cursor_px = Some(pos);
                Some(layout.px_to_data(pos))
            }
            _ => {
                self.cursor_px = None;
                None
            }
        };

        if let Some(pos) = self.cursor_px {
            painter.line_segment(
                [pos2(pos.x, client.top()), pos2(pos.x, client.bottom())],
                Stroke::new(1.0, self.colors.cursor),
            );
            painter.line_segment(
                [pos2(client.left(), pos.y), pos2(client.right(), pos.y)],
                Stroke::new(1.0, self.colors.cursor),
            );
        }

        hover
    }
}
