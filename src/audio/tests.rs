use super::analysis::push_samples;
use super::*;

#[test]
fn snapshot_is_neutral_before_any_samples() {
    let ring = SampleRing::new();
    let mut feed = AnalysisFeed::new(ring);

    assert_eq!(feed.snapshot(), [0u8; BIN_COUNT]);
}

#[test]
fn snapshot_reacts_to_signal_energy() {
    let ring = SampleRing::new();
    let mut feed = AnalysisFeed::new(ring.clone());

    // A full-scale sine somewhere in the band should light up the spectrum.
    let samples: Vec<f32> = (0..FFT_SIZE)
        .map(|i| (2.0 * std::f32::consts::PI * 8.0 * i as f32 / FFT_SIZE as f32).sin())
        .collect();
    push_samples(&ring, &samples);

    let snap = feed.snapshot();
    assert!(snap.iter().any(|&b| b > 0), "expected non-zero magnitude");
    // Bin 8 carries the tone; it should dominate the top of the spectrum.
    let loudest = snap
        .iter()
        .enumerate()
        .max_by_key(|&(_, &b)| b)
        .map(|(i, _)| i)
        .unwrap();
    assert!((7..=9).contains(&loudest), "loudest bin was {loudest}");
}

#[test]
fn snapshot_has_fixed_bin_count() {
    let ring = SampleRing::new();
    push_samples(&ring, &[0.5; 16]);
    let mut feed = AnalysisFeed::new(ring);

    assert_eq!(feed.snapshot().len(), BIN_COUNT);
    assert_eq!(BIN_COUNT, FFT_SIZE / 2);
}

#[test]
fn ring_keeps_only_the_latest_window() {
    let ring = SampleRing::new();
    // Overfill: silence first, then a constant signal.
    push_samples(&ring, &vec![0.0; FFT_SIZE]);
    push_samples(&ring, &vec![0.9; FFT_SIZE]);

    let mut feed = AnalysisFeed::new(ring);
    let snap = feed.snapshot();
    // DC bin reflects the constant signal, so the old silence is gone.
    assert!(snap[0] > 0);
}
