//! Stateless plot layout: client-rect computation and data↔pixel mapping.
//!
//! [`PlotLayout::compute`] turns axis limits, generated ticks, and a viewport
//! rectangle into the pixel rectangle that data is drawn in, with insets wide
//! enough that tick labels and axis titles never overlap plot content. Text
//! measurement is abstracted behind [`TextMeasure`] so the whole algorithm is
//! testable without a graphics context; the widget supplies an egui-backed
//! implementation at draw time.

use egui::{pos2, Pos2, Rect, Vec2};

use crate::data::ticks::Tick;

/// Pixel-extent measurement for label and title text.
pub trait TextMeasure {
    /// Width and height of `text` in the current font.
    fn size(&self, text: &str) -> Vec2;
}

/// Everything the layout pass needs besides the viewport itself.
pub struct LayoutInput<'a> {
    pub x_ticks: &'a [Tick],
    pub y_ticks: &'a [Tick],
    pub x_title: &'a str,
    pub y_title: &'a str,
    /// Base inset between plot content, labels, and the viewport edge.
    pub padding: f32,
}

/// A computed layout: the client rectangle plus the measurements needed to
/// place labels and titles around it.
#[derive(Debug, Clone)]
pub struct PlotLayout {
    /// Pixel rectangle the data polyline and grid are drawn in. Recomputed
    /// every render pass; the insets grow with the current label text.
    pub client: Rect,
    pub x_limits: (f64, f64),
    pub y_limits: (f64, f64),
    /// Widest X tick label.
    pub x_label_width: f32,
    /// Widest Y tick label.
    pub y_label_width: f32,
    /// Font line height (labels and titles share one font).
    pub label_height: f32,
    pub padding: f32,
}

impl PlotLayout {
    pub fn compute(
        outer: Rect,
        input: &LayoutInput<'_>,
        x_limits: (f64, f64),
        y_limits: (f64, f64),
        measure: &dyn TextMeasure,
    ) -> Self {
        let mut x_label_width: f32 = 0.0;
        let mut y_label_width: f32 = 0.0;
        let mut label_height: f32 = measure.size("0").y;
        for tick in input.x_ticks {
            let size = measure.size(&tick.label);
            x_label_width = x_label_width.max(size.x);
            label_height = label_height.max(size.y);
        }
        for tick in input.y_ticks {
            let size = measure.size(&tick.label);
            y_label_width = y_label_width.max(size.x);
            label_height = label_height.max(size.y);
        }
        let x_title_height = measure.size(input.x_title).y;
        // The Y title is drawn rotated 90°, so its font height is the
        // horizontal space it occupies.
        let y_title_height = measure.size(input.y_title).y;

        let p = input.padding;
        let left = outer.left() + 2.0 * p + y_title_height + y_label_width;
        let top = outer.top() + 2.0 * p;
        let right = outer.right() - 2.0 * p;
        let bottom = outer.bottom() - 2.0 * p - label_height - x_title_height;

        Self {
            client: Rect::from_min_max(pos2(left, top), pos2(right, bottom)),
            x_limits,
            y_limits,
            x_label_width,
            y_label_width,
            label_height,
            padding: p,
        }
    }

    /// Pixel X for a normalized tick position.
    pub fn x_tick_px(&self, pos: f64) -> f32 {
        self.client.left() + pos as f32 * self.client.width()
    }

    /// Pixel Y for a normalized tick position (1.0 is the top edge).
    pub fn y_tick_px(&self, pos: f64) -> f32 {
        self.client.top() + (1.0 - pos as f32) * self.client.height()
    }

    /// Map a frequency to a pixel X coordinate.
    pub fn x_to_px(&self, freq: f64) -> f32 {
        let (min, max) = self.x_limits;
        let (l, r) = (self.client.left() as f64, self.client.right() as f64);
        ((freq - min) / (max - min) * (r - l) + l) as f32
    }

    /// Map a magnitude to a pixel Y coordinate. Y is inverted: larger
    /// magnitudes map to smaller pixel Y (higher on screen).
    pub fn y_to_px(&self, mag: f64) -> f32 {
        let (min, max) = self.y_limits;
        let (t, b) = (self.client.top() as f64, self.client.bottom() as f64);
        ((mag - min) / (max - min) * (t - b) + b) as f32
    }

    pub fn data_to_px(&self, freq: f64, mag: f64) -> Pos2 {
        pos2(self.x_to_px(freq), self.y_to_px(mag))
    }

    /// Algebraic inverse of [`data_to_px`](Self::data_to_px): pixel position
    /// to `(frequency, magnitude)`.
    pub fn px_to_data(&self, pos: Pos2) -> (f64, f64) {
        let (x_min, x_max) = self.x_limits;
        let (y_min, y_max) = self.y_limits;
        let (l, r) = (self.client.left() as f64, self.client.right() as f64);
        let (t, b) = (self.client.top() as f64, self.client.bottom() as f64);
        let freq = (pos.x as f64 - l) / (r - l) * (x_max - x_min) + x_min;
        let mag = (pos.y as f64 - b) / (t - b) * (y_max - y_min) + y_min;
        (freq, mag)
    }

    /// Whether a pixel position lies within the client rectangle, bounds
    /// inclusive on all four edges.
    pub fn contains(&self, pos: Pos2) -> bool {
        pos.x >= self.client.left()
            && pos.x <= self.client.right()
            && pos.y >= self.client.top()
            && pos.y <= self.client.bottom()
    }
}
