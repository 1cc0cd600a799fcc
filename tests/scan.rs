use std::path::PathBuf;
use std::time::Duration;

use rtl_spect::{
    bin_count, channel_scan, parse_sample_line, spawn_scan, LineError, ScanEvent, ScanParams,
    ScanStatus, SpectrumData,
};

#[test]
fn comment_and_blank_lines_are_skipped() {
    assert_eq!(parse_sample_line("# rtl_power_fftw output"), Ok(None));
    assert_eq!(parse_sample_line(""), Ok(None));
    assert_eq!(parse_sample_line("   "), Ok(None));
}

#[test]
fn sample_lines_parse_first_two_fields() {
    assert_eq!(
        parse_sample_line("98500000.0 -42.5"),
        Ok(Some((98_500_000.0, -42.5)))
    );
    // Extra fields are ignored.
    assert_eq!(
        parse_sample_line("  1e8\t-40 extra trailing junk"),
        Ok(Some((1e8, -40.0)))
    );
}

#[test]
fn malformed_lines_report_why() {
    assert_eq!(parse_sample_line("12345"), Err(LineError::MissingFields));
    assert_eq!(parse_sample_line("abc -40"), Err(LineError::BadNumber));
    assert_eq!(parse_sample_line("100 def"), Err(LineError::BadNumber));
}

#[test]
fn bin_count_is_rate_over_rbw() {
    assert_eq!(bin_count(2.4e6, 10e3), 240);
    assert_eq!(bin_count(3.2e6, 3.2e6), 1);
}

#[test]
fn args_follow_the_rtl_power_fftw_cli() {
    let params = ScanParams {
        start_freq: 88_000_000,
        end_freq: 108_000_000,
        sample_rate: 2_400_000,
        bins: 240,
        gain: 105,
        repeats: 100,
        continuous: true,
        ppm: 37,
        extra_args: vec![("window".to_string(), "hamming".to_string())],
        ..Default::default()
    };
    assert_eq!(
        params.to_args(),
        vec![
            "-f",
            "88000000:108000000",
            "-r",
            "2400000",
            "-b",
            "240",
            "-g",
            "105",
            "-n",
            "100",
            "-p",
            "37",
            "-c",
            "--window",
            "hamming",
        ]
    );
}

#[test]
fn single_scan_omits_continuous_flag() {
    let params = ScanParams::default();
    assert!(!params.to_args().contains(&"-c".to_string()));
}

#[test]
fn launch_failure_is_returned_to_the_caller() {
    let params = ScanParams {
        executable: PathBuf::from("/nonexistent/rtl_power_fftw"),
        ..Default::default()
    };
    let (tx, _rx) = channel_scan();
    assert!(spawn_scan(params, tx).is_err());
}

// ─── End-to-end against a stand-in scanner process ───────────────────────────

#[cfg(unix)]
mod end_to_end {
    use super::*;

    /// Write an executable shell script standing in for rtl_power_fftw.
    fn fake_scanner(name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = std::env::temp_dir().join(format!(
            "rtl_spect_fake_{}_{}",
            std::process::id(),
            name
        ));
        std::fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn collect(rx: &std::sync::mpsc::Receiver<ScanEvent>) -> (Vec<Vec<(f64, f64)>>, ScanStatus) {
        let mut batches = Vec::new();
        loop {
            match rx.recv_timeout(Duration::from_secs(10)).expect("scan event") {
                ScanEvent::Batch(batch) => batches.push(batch),
                ScanEvent::Finished(status) => return (batches, status),
            }
        }
    }

    #[test]
    fn full_sweep_is_batched_and_merged() {
        // 88-108 MHz at 2.4 Msps with 10 kHz rbw: 240 bins per segment.
        let repeats = 100;
        let bins = bin_count(2.4e6, 10e3);
        assert_eq!(bins, 240);

        // 25 samples across the band, preceded by header comments and one
        // malformed line that must be skipped without aborting the stream.
        let mut body = String::from("echo '# rtl_power_fftw'\necho 'bogus line'\n");
        for i in 0..25 {
            body.push_str(&format!("echo '{} {}'\n", 88_000_000 + i * 800_000, -40 - i));
        }
        let exe = fake_scanner("sweep.sh", &body);

        let params = ScanParams {
            executable: exe.clone(),
            batch_size: 10,
            repeats,
            ..Default::default()
        };
        let (tx, rx) = channel_scan();
        let handle = spawn_scan(params, tx).expect("spawn fake scanner");
        let (batches, status) = collect(&rx);
        let _ = std::fs::remove_file(exe);

        assert_eq!(status, ScanStatus::Completed);
        let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![10, 10, 5], "partial final batch must be flushed");

        let mut data = SpectrumData::default();
        for batch in batches {
            data.merge_samples(batch);
        }
        assert_eq!(data.len(), 25);
        assert!(data.len() <= (bins as usize) * repeats as usize);
        assert_eq!(data.magnitude_at(88_000_000.0), Some(-40.0));
        assert_eq!(data.magnitude_at(88_800_000.0), Some(-41.0));

        // Stop after completion is a no-op, not an error.
        handle.request_stop();
    }

    #[test]
    fn abnormal_exit_still_delivers_samples_and_finishes_failed() {
        let exe = fake_scanner("crash.sh", "echo '100000000 -40'\nexit 3\n");
        let params = ScanParams {
            executable: exe.clone(),
            batch_size: 10,
            ..Default::default()
        };
        let (tx, rx) = channel_scan();
        spawn_scan(params, tx).expect("spawn fake scanner");
        let (batches, status) = collect(&rx);
        let _ = std::fs::remove_file(exe);

        assert_eq!(status, ScanStatus::Failed);
        assert_eq!(batches, vec![vec![(100_000_000.0, -40.0)]]);
    }

    #[test]
    fn stop_stays_responsive_when_scanner_closes_stdout_without_exiting() {
        // A daemonizing scanner may close its stdout and keep running; the
        // reader hits EOF while the process is still alive. Stop must not
        // block on the worker in that state.
        let exe = fake_scanner("mute.sh", "exec >&-\nexec sleep 600\n");
        let params = ScanParams {
            executable: exe.clone(),
            ..Default::default()
        };
        let (tx, rx) = channel_scan();
        let handle = spawn_scan(params, tx).expect("spawn fake scanner");

        // Let the reader reach EOF while the process keeps running.
        std::thread::sleep(Duration::from_millis(300));
        let before = std::time::Instant::now();
        handle.request_stop();
        assert!(
            before.elapsed() < Duration::from_secs(2),
            "request_stop must return promptly"
        );
        let (batches, status) = collect(&rx);
        let _ = std::fs::remove_file(exe);

        assert!(batches.is_empty());
        assert_eq!(status, ScanStatus::Stopped);
    }

    #[test]
    fn request_stop_flushes_and_reports_stopped() {
        // Emit a few samples, then block far longer than the test timeout;
        // only a stop can end this scan.
        let exe = fake_scanner(
            "endless.sh",
            "echo '100000000 -40'\necho '100010000 -41'\nexec sleep 600\n",
        );
        let params = ScanParams {
            executable: exe.clone(),
            batch_size: 10,
            continuous: true,
            ..Default::default()
        };
        let (tx, rx) = channel_scan();
        let handle = spawn_scan(params, tx).expect("spawn fake scanner");

        // Give the reader a moment to parse the two samples, then stop.
        std::thread::sleep(Duration::from_millis(300));
        handle.request_stop();
        let (batches, status) = collect(&rx);
        let _ = std::fs::remove_file(exe);

        assert_eq!(status, ScanStatus::Stopped);
        let all: Vec<(f64, f64)> = batches.into_iter().flatten().collect();
        assert_eq!(
            all,
            vec![(100_000_000.0, -40.0), (100_010_000.0, -41.0)],
            "samples accumulated before the stop must still be delivered"
        );
    }
}
