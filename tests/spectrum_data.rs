use rtl_spect::SpectrumData;

#[test]
fn limits_update_when_ordered() {
    let mut data = SpectrumData::default();
    data.set_x_limits(30e6, 1800e6);
    data.set_y_limits(-90.0, 10.0);
    assert_eq!(data.x_limits(), (30e6, 1800e6));
    assert_eq!(data.y_limits(), (-90.0, 10.0));
}

#[test]
fn reversed_or_equal_limits_are_a_silent_no_op() {
    let mut data = SpectrumData::default();
    let x_before = data.x_limits();
    let y_before = data.y_limits();
    data.set_x_limits(200e6, 100e6);
    data.set_x_limits(100e6, 100e6);
    data.set_y_limits(0.0, -80.0);
    assert_eq!(data.x_limits(), x_before, "reversed x limits must not apply");
    assert_eq!(data.y_limits(), y_before, "reversed y limits must not apply");
}

#[test]
fn non_finite_limits_are_rejected() {
    let mut data = SpectrumData::default();
    let before = data.x_limits();
    data.set_x_limits(f64::NAN, 100e6);
    data.set_x_limits(0.0, f64::INFINITY);
    assert_eq!(data.x_limits(), before);
}

#[test]
fn merge_is_last_write_wins_across_batches() {
    let mut data = SpectrumData::default();
    data.merge_samples([(100e6, -40.0), (200e6, -50.0)]);
    data.merge_samples([(100e6, -35.0), (300e6, -60.0)]);
    assert_eq!(data.len(), 3);
    assert_eq!(data.magnitude_at(100e6), Some(-35.0));
    assert_eq!(data.magnitude_at(200e6), Some(-50.0));
    assert_eq!(data.magnitude_at(300e6), Some(-60.0));
}

#[test]
fn non_finite_samples_are_dropped() {
    let mut data = SpectrumData::default();
    data.merge_samples([
        (f64::NAN, -40.0),
        (100e6, f64::INFINITY),
        (200e6, -50.0),
    ]);
    assert_eq!(data.len(), 1);
    assert_eq!(data.magnitude_at(200e6), Some(-50.0));
}

#[test]
fn clear_samples_leaves_baseline_intact() {
    let mut data = SpectrumData::default();
    data.merge_samples([(100e6, -40.0)]);
    data.save_baseline();
    data.clear_samples();
    assert!(data.is_empty());
    assert!(data.has_baseline());
    // Re-merged data is still baseline-subtracted against the old snapshot.
    data.merge_samples([(100e6, -30.0)]);
    assert_eq!(data.series(), vec![(100e6, 10.0)]);
}

#[test]
fn baseline_snapshot_is_isolated_from_later_mutation() {
    let mut data = SpectrumData::default();
    data.merge_samples([(100e6, -40.0)]);
    data.save_baseline();
    data.merge_samples([(100e6, -10.0)]);
    // The snapshot still holds -40: the rendered value is -10 - (-40).
    assert_eq!(data.series(), vec![(100e6, 30.0)]);
}

#[test]
fn baseline_subtracts_only_on_exact_key_match() {
    let mut data = SpectrumData::default();
    data.merge_samples([(100e6, -40.0)]);
    data.save_baseline();
    data.clear_samples();
    data.merge_samples([(100e6, -30.0), (200e6, -50.0)]);
    assert_eq!(data.series(), vec![(100e6, 10.0), (200e6, -50.0)]);

    data.reset_baseline();
    assert!(!data.has_baseline());
    assert_eq!(data.series(), vec![(100e6, -30.0), (200e6, -50.0)]);
}

#[test]
fn series_is_sorted_ascending_by_frequency() {
    let mut data = SpectrumData::default();
    data.merge_samples([(300e6, -3.0), (100e6, -1.0), (200e6, -2.0)]);
    let freqs: Vec<f64> = data.series().iter().map(|&(f, _)| f).collect();
    assert_eq!(freqs, vec![100e6, 200e6, 300e6]);
}

#[test]
fn empty_store_yields_empty_series() {
    let data = SpectrumData::default();
    assert!(data.is_empty());
    assert!(data.series().is_empty());
}

#[test]
fn live_cursor_set_and_clear() {
    let mut data = SpectrumData::default();
    assert_eq!(data.live_cursor(), None);
    data.set_live_cursor(98.5e6);
    assert_eq!(data.live_cursor(), Some(98.5e6));
    data.clear_live_cursor();
    assert_eq!(data.live_cursor(), None);
}

#[test]
fn mutations_set_the_dirty_flag_once() {
    let mut data = SpectrumData::default();
    assert!(!data.take_dirty());
    data.merge_samples([(100e6, -40.0)]);
    assert!(data.take_dirty());
    assert!(!data.take_dirty(), "take_dirty must consume the flag");
    // A rejected limit update must not mark the view dirty.
    data.set_x_limits(2.0, 1.0);
    assert!(!data.take_dirty());
}
