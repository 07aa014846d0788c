//! Pull-based frequency analysis for the visualizer.
//!
//! A [`TapSource`] sits between the decoder and the output sink and copies a
//! mono mixdown of everything it plays into a shared ring. [`AnalysisFeed`]
//! turns the latest ring contents into byte magnitudes on demand; the
//! renderer polls `snapshot()` at frame cadence, so a slow consumer can
//! never build up a backlog.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rodio::Source;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

/// Transform size. The feed exposes the lower half of the spectrum.
pub const FFT_SIZE: usize = 256;
/// Number of magnitude bins in a snapshot.
pub const BIN_COUNT: usize = FFT_SIZE / 2;

/// Shared mono sample ring holding the most recent `FFT_SIZE` samples.
#[derive(Clone)]
pub struct SampleRing(Arc<Mutex<VecDeque<f32>>>);

impl SampleRing {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(VecDeque::with_capacity(FFT_SIZE))))
    }

    fn push(&self, sample: f32) {
        if let Ok(mut ring) = self.0.lock() {
            if ring.len() == FFT_SIZE {
                ring.pop_front();
            }
            ring.push_back(sample);
        }
    }

    /// Copy the latest samples into `out`, returning how many were copied.
    fn copy_latest(&self, out: &mut [f32; FFT_SIZE]) -> usize {
        match self.0.lock() {
            Ok(ring) => {
                let mut n = 0;
                for (slot, sample) in out.iter_mut().zip(ring.iter()) {
                    *slot = *sample;
                    n += 1;
                }
                n
            }
            Err(_) => 0,
        }
    }
}

impl Default for SampleRing {
    fn default() -> Self {
        Self::new()
    }
}

/// `Source` adapter that forwards samples unchanged while writing a mono
/// mixdown into the ring. Playback is unaffected by analysis.
pub struct TapSource<S> {
    inner: S,
    ring: SampleRing,
    frame: Vec<f32>,
}

impl<S> TapSource<S>
where
    S: Source<Item = f32>,
{
    pub fn new(inner: S, ring: SampleRing) -> Self {
        Self {
            inner,
            ring,
            frame: Vec::with_capacity(2),
        }
    }
}

impl<S> Iterator for TapSource<S>
where
    S: Source<Item = f32>,
{
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let sample = self.inner.next()?;
        let channels = self.inner.channels().max(1) as usize;
        self.frame.push(sample);
        if self.frame.len() >= channels {
            let mono = self.frame.iter().sum::<f32>() / channels as f32;
            self.ring.push(mono);
            self.frame.clear();
        }
        Some(sample)
    }
}

impl<S> Source for TapSource<S>
where
    S: Source<Item = f32>,
{
    fn current_span_len(&self) -> Option<usize> {
        self.inner.current_span_len()
    }

    fn channels(&self) -> rodio::ChannelCount {
        self.inner.channels()
    }

    fn sample_rate(&self) -> rodio::SampleRate {
        self.inner.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }
}

/// Frequency snapshot source for the renderer.
pub struct AnalysisFeed {
    ring: SampleRing,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
}

impl AnalysisFeed {
    pub fn new(ring: SampleRing) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(FFT_SIZE);

        // Hann window, pre-computed.
        let window: Vec<f32> = (0..FFT_SIZE)
            .map(|i| {
                0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / FFT_SIZE as f32).cos())
            })
            .collect();

        Self {
            ring,
            fft,
            window,
            buffer: vec![Complex::new(0.0, 0.0); FFT_SIZE],
        }
    }

    /// Current frequency-magnitude distribution, one byte per bin.
    ///
    /// Returns all zeros until samples have arrived, so polling before
    /// playback (or before initialization) is harmless.
    pub fn snapshot(&mut self) -> [u8; BIN_COUNT] {
        let mut samples = [0.0f32; FFT_SIZE];
        let n = self.ring.copy_latest(&mut samples);
        if n == 0 {
            return [0; BIN_COUNT];
        }

        for i in 0..FFT_SIZE {
            self.buffer[i] = Complex::new(samples[i] * self.window[i], 0.0);
        }
        self.fft.process(&mut self.buffer);

        let mut out = [0u8; BIN_COUNT];
        for (i, slot) in out.iter_mut().enumerate() {
            let magnitude = self.buffer[i].norm() / FFT_SIZE as f32;
            let db = 20.0 * (magnitude + 1e-10).log10();
            // Map roughly -60dB..0dB to 0..=255.
            let v = ((db + 60.0) / 60.0).clamp(0.0, 1.0);
            *slot = (v * 255.0) as u8;
        }
        out
    }
}

#[cfg(test)]
pub(super) fn push_samples(ring: &SampleRing, samples: &[f32]) {
    for &s in samples {
        ring.push(s);
    }
}
