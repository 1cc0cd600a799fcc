//! Scan worker: drives `rtl_power_fftw` and streams sample batches to the UI.
//!
//! [`spawn_scan`] launches the external process and a reader thread that
//! parses its line-oriented stdout into `(frequency Hz, magnitude dB)`
//! samples, batching them for delivery over a `std::sync::mpsc` channel. The
//! UI thread drains the receiver with `try_recv` each frame, so the worker is
//! the only writer on the channel and `SpectrumData` stays single-writer.
//!
//! Stopping is cooperative: [`ScanHandle::request_stop`] sets a flag and
//! kills the child; whatever samples the reader has already accumulated are
//! still flushed before the final [`ScanEvent::Finished`].

use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Number of frequency bins for one sweep segment: `sample_rate / rbw`.
pub fn bin_count(sample_rate: f64, rbw: f64) -> u32 {
    (sample_rate / rbw) as u32
}

/// Parameters for one scan, in the raw units `rtl_power_fftw` expects.
#[derive(Debug, Clone)]
pub struct ScanParams {
    pub executable: PathBuf,
    /// Sweep start, Hz.
    pub start_freq: u64,
    /// Sweep end, Hz.
    pub end_freq: u64,
    /// Device sample rate, Hz.
    pub sample_rate: u64,
    /// Frequency bins per segment.
    pub bins: u32,
    /// Tuner gain in tenths of a dB.
    pub gain: i32,
    /// Sweeps to average per output.
    pub repeats: u32,
    /// Keep sweeping until stopped.
    pub continuous: bool,
    /// Oscillator correction, parts per million.
    pub ppm: i32,
    /// Additional `--key value` pairs forwarded verbatim.
    pub extra_args: Vec<(String, String)>,
    /// Samples per delivered batch; partial batches are flushed on stop or
    /// process exit.
    pub batch_size: usize,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("rtl_power_fftw"),
            start_freq: 88_000_000,
            end_freq: 108_000_000,
            sample_rate: 2_400_000,
            bins: 240,
            gain: 0,
            repeats: 100,
            continuous: false,
            ppm: 0,
            extra_args: Vec::new(),
            batch_size: 10,
        }
    }
}

impl ScanParams {
    /// The argument vector passed to the executable.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "-f".into(),
            format!("{}:{}", self.start_freq, self.end_freq),
            "-r".into(),
            self.sample_rate.to_string(),
            "-b".into(),
            self.bins.to_string(),
            "-g".into(),
            self.gain.to_string(),
            "-n".into(),
            self.repeats.to_string(),
            "-p".into(),
            self.ppm.to_string(),
        ];
        if self.continuous {
            args.push("-c".into());
        }
        for (key, value) in &self.extra_args {
            args.push(format!("--{key}"));
            args.push(value.clone());
        }
        args
    }
}

/// How a scan ended. All three re-enable the UI identically; they differ
/// only in the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    /// The process ran to completion.
    Completed,
    /// A stop was requested and observed.
    Stopped,
    /// The process exited with a non-zero status or crashed.
    Failed,
}

/// Messages delivered from the scan worker to the UI thread.
#[derive(Debug)]
pub enum ScanEvent {
    /// A batch of parsed `(frequency Hz, magnitude dB)` samples.
    Batch(Vec<(f64, f64)>),
    /// Always the final event of a scan.
    Finished(ScanStatus),
}

/// Create the channel pair connecting the scan worker to the UI.
pub fn channel_scan() -> (Sender<ScanEvent>, Receiver<ScanEvent>) {
    std::sync::mpsc::channel()
}

/// Handle to a running scan, used to request a cooperative stop.
pub struct ScanHandle {
    stop: Arc<AtomicBool>,
    child: Arc<Mutex<Child>>,
}

impl ScanHandle {
    /// Signal the scan to stop and kill the external process to unblock the
    /// reader. Samples accumulated before the stop is observed are still
    /// delivered once before the completion event. Calling this after the
    /// scan finished is a no-op.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Ok(mut child) = self.child.lock() {
            if let Err(e) = child.kill() {
                tracing::debug!(error = %e, "kill on scan process (already exited?)");
            }
        }
    }
}

/// Outcome of parsing one stdout line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineError {
    /// Fewer than two whitespace-separated fields.
    MissingFields,
    /// One of the first two fields is not a float.
    BadNumber,
}

impl std::fmt::Display for LineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineError::MissingFields => write!(f, "fewer than two fields"),
            LineError::BadNumber => write!(f, "field is not a number"),
        }
    }
}

/// Parse one `rtl_power_fftw` output line.
///
/// Comment lines (leading `#`) and blank lines yield `Ok(None)`. Otherwise
/// the first two whitespace-separated fields must parse as
/// `(frequency Hz, magnitude dB)`; extra fields are ignored.
pub fn parse_sample_line(line: &str) -> Result<Option<(f64, f64)>, LineError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut fields = line.split_whitespace();
    let freq = fields.next().ok_or(LineError::MissingFields)?;
    let mag = fields.next().ok_or(LineError::MissingFields)?;
    let freq: f64 = freq.parse().map_err(|_| LineError::BadNumber)?;
    let mag: f64 = mag.parse().map_err(|_| LineError::BadNumber)?;
    Ok(Some((freq, mag)))
}

/// Launch the scan process and its reader thread.
///
/// Launch failure is returned to the caller so the UI can reset its running
/// state instead of waiting for a completion event that will never come.
pub fn spawn_scan(params: ScanParams, tx: Sender<ScanEvent>) -> std::io::Result<ScanHandle> {
    let args = params.to_args();
    tracing::info!(exe = %params.executable.display(), ?args, "starting scan");
    let mut child = Command::new(&params.executable)
        .args(&args)
        .stdout(Stdio::piped())
        .spawn()?;
    let stdout = child.stdout.take().ok_or_else(|| {
        std::io::Error::other("scan process has no stdout pipe")
    })?;

    let stop = Arc::new(AtomicBool::new(false));
    let child = Arc::new(Mutex::new(child));
    let handle = ScanHandle {
        stop: Arc::clone(&stop),
        child: Arc::clone(&child),
    };

    let batch_size = params.batch_size.max(1);
    std::thread::spawn(move || {
        read_samples(BufReader::new(stdout), batch_size, &stop, &tx);
        let status = wait_status(&child, &stop);
        let _ = tx.send(ScanEvent::Finished(status));
    });

    Ok(handle)
}

/// Read and parse sample lines until EOF, a read error, or a stop request,
/// flushing full batches as they fill and the partial batch at the end.
fn read_samples<R: BufRead>(
    reader: R,
    batch_size: usize,
    stop: &AtomicBool,
    tx: &Sender<ScanEvent>,
) {
    let mut batch: Vec<(f64, f64)> = Vec::with_capacity(batch_size);
    for line in reader.lines() {
        if stop.load(Ordering::Relaxed) {
            break;
        }
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "scan output read failed");
                break;
            }
        };
        match parse_sample_line(&line) {
            Ok(Some(sample)) => {
                batch.push(sample);
                if batch.len() >= batch_size {
                    let _ = tx.send(ScanEvent::Batch(std::mem::take(&mut batch)));
                    batch.reserve(batch_size);
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(line = %line, error = %e, "skipping unparseable scan output line");
            }
        }
    }
    if !batch.is_empty() {
        let _ = tx.send(ScanEvent::Batch(batch));
    }
}

/// Wait for the scan process to exit. Polls `try_wait` so the child lock is
/// never held across a blocking wait: a stop request must be able to kill
/// the child at any time, including after the reader has already hit EOF on
/// a process that keeps running with its stdout closed.
fn wait_status(child: &Mutex<Child>, stop: &AtomicBool) -> ScanStatus {
    let exit = loop {
        let polled = {
            let mut guard = match child.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            guard.try_wait()
        };
        match polled {
            Ok(Some(status)) => break Ok(status),
            Ok(None) => std::thread::sleep(Duration::from_millis(20)),
            Err(e) => break Err(e),
        }
    };
    let stopped = stop.load(Ordering::Relaxed);
    match exit {
        _ if stopped => {
            tracing::info!("scan stopped by request");
            ScanStatus::Stopped
        }
        Ok(status) if status.success() => {
            tracing::info!("scan completed");
            ScanStatus::Completed
        }
        Ok(status) => {
            tracing::warn!(%status, "scan process exited abnormally");
            ScanStatus::Failed
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not collect scan process status");
            ScanStatus::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_flushes_partial_batch_on_eof() {
        let input = b"# header\n100 -40\n200 -41\n300 -42\n" as &[u8];
        let (tx, rx) = channel_scan();
        read_samples(input, 2, &AtomicBool::new(false), &tx);
        drop(tx);
        let batches: Vec<_> = rx
            .iter()
            .map(|ev| match ev {
                ScanEvent::Batch(b) => b,
                other => panic!("unexpected event: {other:?}"),
            })
            .collect();
        assert_eq!(
            batches,
            vec![
                vec![(100.0, -40.0), (200.0, -41.0)],
                vec![(300.0, -42.0)]
            ]
        );
    }

    #[test]
    fn reader_skips_malformed_lines_without_aborting() {
        let input = b"garbage\n100 -40\nalso bad line\n200 -41\n" as &[u8];
        let (tx, rx) = channel_scan();
        read_samples(input, 10, &AtomicBool::new(false), &tx);
        drop(tx);
        match rx.recv().unwrap() {
            ScanEvent::Batch(b) => assert_eq!(b, vec![(100.0, -40.0), (200.0, -41.0)]),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
