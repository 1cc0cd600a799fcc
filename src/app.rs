//! Main application: control panel, status bar, and scan wiring.
//!
//! `MainApp` owns the [`SpectrumData`] store and is the only writer to it:
//! scan batches arrive over the worker channel and are applied inside
//! [`eframe::App::update`], on the UI thread. The control panel disables
//! Start/Single while a scan is running (one scan at a time, prevented at the
//! controls rather than resolved as a race) and re-enables them only when the
//! worker's completion event arrives.

use std::sync::mpsc::Receiver;
use std::time::Duration;

use eframe::egui;
use egui_phosphor::regular::{BROOM, FLOPPY_DISK, PLAY, PLAY_CIRCLE, STOP};

use crate::config::{FormDefaults, SpectConfig};
use crate::data::spectrum::SpectrumData;
use crate::plot::SpectrumPlot;
use crate::scan::{bin_count, channel_scan, spawn_scan, ScanEvent, ScanHandle, ScanParams, ScanStatus};

/// Control-panel form values, in UI units (MHz, kHz, Msps, dB).
struct ScanForm {
    start_mhz: f64,
    end_mhz: f64,
    rbw_khz: f64,
    rate_msps: f64,
    gain_db: f64,
    repeats: u32,
    ppm: i32,
    plot_min_db: f64,
    plot_max_db: f64,
}

impl From<&FormDefaults> for ScanForm {
    fn from(d: &FormDefaults) -> Self {
        Self {
            start_mhz: d.start_mhz,
            end_mhz: d.end_mhz,
            rbw_khz: d.rbw_khz,
            rate_msps: d.rate_msps,
            gain_db: d.gain_db,
            repeats: d.repeats,
            ppm: d.ppm,
            plot_min_db: d.plot_min_db,
            plot_max_db: d.plot_max_db,
        }
    }
}

pub struct MainApp {
    cfg: SpectConfig,
    form: ScanForm,
    data: SpectrumData,
    plot: SpectrumPlot,
    scan: Option<ScanHandle>,
    scan_rx: Option<Receiver<ScanEvent>>,
    running: bool,
    /// Frequency of the most recently received sample, MHz, for the status bar.
    last_freq_mhz: Option<f64>,
    /// Data-space point under the pointer, if it is inside the plot.
    cursor: Option<(f64, f64)>,
    /// Launch-failure or abnormal-exit note for the status bar.
    notice: Option<String>,
}

impl MainApp {
    pub fn new(cfg: SpectConfig) -> Self {
        let form = ScanForm::from(&cfg.defaults);
        let mut data = SpectrumData::default();
        data.set_x_limits(form.start_mhz * 1e6, form.end_mhz * 1e6);
        data.set_y_limits(form.plot_min_db, form.plot_max_db);
        Self {
            cfg,
            form,
            data,
            plot: SpectrumPlot::default(),
            scan: None,
            scan_rx: None,
            running: false,
            last_freq_mhz: None,
            cursor: None,
            notice: None,
        }
    }

    /// Apply all pending worker events. Runs once per frame on the UI thread;
    /// this is the single synchronization point with the scan worker.
    fn drain_scan_events(&mut self) {
        let Some(rx) = &self.scan_rx else { return };
        let mut finished = None;
        while let Ok(event) = rx.try_recv() {
            match event {
                ScanEvent::Batch(batch) => {
                    let newest = batch
                        .iter()
                        .map(|&(freq, _)| freq)
                        .fold(f64::NEG_INFINITY, f64::max);
                    self.data.merge_samples(batch);
                    if newest.is_finite() {
                        self.data.set_live_cursor(newest);
                        self.last_freq_mhz = Some(newest / 1e6);
                    }
                }
                ScanEvent::Finished(status) => finished = Some(status),
            }
        }
        if let Some(status) = finished {
            self.running = false;
            self.scan = None;
            self.scan_rx = None;
            self.last_freq_mhz = None;
            self.notice = match status {
                ScanStatus::Failed => Some("scan process exited abnormally".to_string()),
                ScanStatus::Completed | ScanStatus::Stopped => None,
            };
        }
    }

    fn start_scan(&mut self, continuous: bool) {
        self.apply_plot_limits();
        self.data.clear_samples();
        let params = ScanParams {
            executable: self.cfg.executable.clone(),
            start_freq: (self.form.start_mhz * 1e6) as u64,
            end_freq: (self.form.end_mhz * 1e6) as u64,
            sample_rate: (self.form.rate_msps * 1e6) as u64,
            bins: bin_count(self.form.rate_msps * 1e6, self.form.rbw_khz * 1e3),
            gain: (self.form.gain_db * 10.0) as i32,
            repeats: self.form.repeats,
            continuous,
            ppm: self.form.ppm,
            extra_args: Vec::new(),
            batch_size: self.cfg.batch_size,
        };
        let (tx, rx) = channel_scan();
        match spawn_scan(params, tx) {
            Ok(handle) => {
                self.scan = Some(handle);
                self.scan_rx = Some(rx);
                self.running = true;
                self.notice = None;
            }
            Err(e) => {
                // Controls stay enabled; there is no worker to wait for.
                tracing::warn!(error = %e, "failed to launch scan process");
                self.notice = Some(format!("failed to launch scanner: {e}"));
            }
        }
    }

    /// Cooperative stop. The worker flushes its in-flight batch and sends
    /// the completion event; controls re-enable when that arrives.
    fn stop_scan(&mut self) {
        if let Some(scan) = &self.scan {
            scan.request_stop();
        }
    }

    fn apply_plot_limits(&mut self) {
        self.data
            .set_x_limits(self.form.start_mhz * 1e6, self.form.end_mhz * 1e6);
        self.data
            .set_y_limits(self.form.plot_min_db, self.form.plot_max_db);
    }

    fn status_line(&self) -> String {
        let state = if self.running { "running" } else { "ready" };
        let freq = match self.last_freq_mhz {
            Some(mhz) => format!("{mhz:.3}"),
            None => "-".to_string(),
        };
        let cursor = match self.cursor {
            Some((freq, mag)) => format!("({:.3} MHz, {:.3} dB)", freq / 1e6, mag),
            None => "(-, -)".to_string(),
        };
        let mut line = format!("Status: {state} | scan freq: {freq} | cursor: {cursor}");
        if let Some(notice) = &self.notice {
            line.push_str(" | ");
            line.push_str(notice);
        }
        line
    }

    fn controls_ui(&mut self, ui: &mut egui::Ui) {
        let running = self.running;
        if ui
            .add_enabled(!running, egui::Button::new(format!("{PLAY} Start")))
            .clicked()
        {
            self.start_scan(true);
        }
        if ui
            .add_enabled(!running, egui::Button::new(format!("{PLAY_CIRCLE} Single")))
            .clicked()
        {
            self.start_scan(false);
        }
        if ui
            .add_enabled(running, egui::Button::new(format!("{STOP} Stop")))
            .clicked()
        {
            self.stop_scan();
        }
        ui.separator();

        let mut limits_changed = false;
        let ranges = self.cfg.ranges.clone();
        egui::Grid::new("scan_form").num_columns(2).show(ui, |ui| {
            ui.label("start [MHz]");
            limits_changed |= ui
                .add(
                    egui::DragValue::new(&mut self.form.start_mhz)
                        .range(ranges.freq_mhz.clone())
                        .speed(0.1)
                        .fixed_decimals(3),
                )
                .changed();
            ui.end_row();

            ui.label("end [MHz]");
            limits_changed |= ui
                .add(
                    egui::DragValue::new(&mut self.form.end_mhz)
                        .range(ranges.freq_mhz.clone())
                        .speed(0.1)
                        .fixed_decimals(3),
                )
                .changed();
            ui.end_row();

            ui.label("rbw [kHz]");
            ui.add(
                egui::DragValue::new(&mut self.form.rbw_khz)
                    .range(ranges.rbw_khz.clone())
                    .speed(1.0)
                    .fixed_decimals(3),
            );
            ui.end_row();

            ui.label("rate [Msps]");
            ui.add(
                egui::DragValue::new(&mut self.form.rate_msps)
                    .range(ranges.rate_msps.clone())
                    .speed(0.01)
                    .fixed_decimals(3),
            );
            ui.end_row();

            ui.label("gain [dB]");
            ui.add(
                egui::DragValue::new(&mut self.form.gain_db)
                    .range(ranges.gain_db.clone())
                    .speed(0.5)
                    .fixed_decimals(1),
            );
            ui.end_row();

            ui.label("repeats");
            ui.add(
                egui::DragValue::new(&mut self.form.repeats)
                    .range(*ranges.repeats.start() as f64..=*ranges.repeats.end() as f64),
            );
            ui.end_row();

            ui.label("ppm");
            ui.add(
                egui::DragValue::new(&mut self.form.ppm)
                    .range(*ranges.ppm.start() as f64..=*ranges.ppm.end() as f64),
            );
            ui.end_row();

            ui.label("plot max [dB]");
            limits_changed |= ui
                .add(
                    egui::DragValue::new(&mut self.form.plot_max_db)
                        .range(ranges.plot_db.clone())
                        .speed(0.5)
                        .fixed_decimals(1),
                )
                .changed();
            ui.end_row();

            ui.label("plot min [dB]");
            limits_changed |= ui
                .add(
                    egui::DragValue::new(&mut self.form.plot_min_db)
                        .range(ranges.plot_db.clone())
                        .speed(0.5)
                        .fixed_decimals(1),
                )
                .changed();
            ui.end_row();
        });
        ui.separator();

        if ui
            .button(format!("{FLOPPY_DISK} Save Baseline"))
            .clicked()
        {
            self.data.save_baseline();
        }
        if ui
            .add_enabled(
                self.data.has_baseline(),
                egui::Button::new(format!("{BROOM} Reset Baseline")),
            )
            .clicked()
        {
            self.data.reset_baseline();
        }

        if limits_changed {
            self.apply_plot_limits();
        }
    }
}

impl eframe::App for MainApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_scan_events();

        egui::SidePanel::right("controls")
            .resizable(false)
            .show(ctx, |ui| self.controls_ui(ui));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(self.status_line());
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            self.cursor = self.plot.show(ui, &self.data);
        });

        if self.data.take_dirty() {
            ctx.request_repaint();
        }
        if self.running {
            // Batches arrive without UI events; keep polling the channel.
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}

/// Launch the spectrum analyzer in a native window. Blocks until the window
/// is closed.
pub fn run_spect(cfg: SpectConfig) -> eframe::Result<()> {
    let title = cfg.title.clone();
    let app = MainApp::new(cfg);

    let mut viewport = egui::ViewportBuilder::default().with_inner_size(egui::vec2(800.0, 480.0));
    if let Some(icon) = load_app_icon_svg() {
        viewport = viewport.with_icon(icon);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(|cc| {
            // Install the Phosphor icon font before creating the app.
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(app))
        }),
    )
}

/// Attempt to load the project's `icon.svg` as an [`egui::IconData`].
///
/// Returns `None` if the file does not exist or cannot be parsed/rendered.
fn load_app_icon_svg() -> Option<egui::IconData> {
    let svg_path = concat!(env!("CARGO_MANIFEST_DIR"), "/icon.svg");
    let data = std::fs::read(svg_path).ok()?;

    let opt = usvg::Options::default();
    let tree = usvg::Tree::from_data(&data, &opt).ok()?;
    let size = tree.size().to_int_size();
    if size.width() == 0 || size.height() == 0 {
        return None;
    }
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())?;
    let mut canvas = pixmap.as_mut();
    resvg::render(&tree, tiny_skia::Transform::default(), &mut canvas);
    let rgba = pixmap.take();
    Some(egui::IconData {
        rgba,
        width: size.width(),
        height: size.height(),
    })
}
