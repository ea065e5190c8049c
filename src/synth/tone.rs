//! Tone sequence rendering
//!
//! Each grid cell becomes one fixed-length sine tone at the cell's mapped
//! frequency, in row-major order, with no gaps between tones. Every tone
//! starts at phase zero.

use crate::config::AudioConfig;
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::mapping::FrequencyMap;
use std::f64::consts::PI;
use tracing::debug;

/// Largest sample count a 16-bit mono WAV data chunk can hold
pub const MAX_WAV_SAMPLES: u64 = u32::MAX as u64 / 2;

/// Sample `n` of a sine at `frequency`, in -1.0..=1.0
pub fn sine_sample(frequency: f64, sample_rate: f64, n: usize) -> f64 {
    (2.0 * PI * frequency * n as f64 / sample_rate).sin()
}

/// Renders grids into 16-bit mono PCM
#[derive(Debug, Clone)]
pub struct ToneRenderer {
    sample_rate: u32,
    tone_duration_ms: u32,
    amplitude: f64,
}

impl ToneRenderer {
    /// Create a renderer
    ///
    /// `sample_rate * tone_duration_ms` should be a multiple of 1000 so that
    /// every tone has an exact sample count; otherwise each tone is
    /// shortened to the whole samples that fit.
    pub fn new(sample_rate: u32, tone_duration_ms: u32) -> Self {
        Self {
            sample_rate,
            tone_duration_ms,
            amplitude: 1.0,
        }
    }

    /// Create a renderer from audio settings
    pub fn from_config(config: &AudioConfig) -> Self {
        Self::new(config.sample_rate, config.tone_duration_ms).with_amplitude(config.amplitude)
    }

    /// Set the peak level (0.0-1.0)
    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude.clamp(0.0, 1.0);
        self
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn tone_duration_ms(&self) -> u32 {
        self.tone_duration_ms
    }

    /// Samples in one tone
    pub fn samples_per_tone(&self) -> usize {
        (self.sample_rate as u64 * self.tone_duration_ms as u64 / 1000) as usize
    }

    /// Samples needed for `cells` tones
    pub fn samples_for(&self, cells: usize) -> u64 {
        cells as u64 * self.samples_per_tone() as u64
    }

    /// Samples needed for the whole grid
    pub fn total_samples(&self, grid: &Grid) -> usize {
        grid.len() * self.samples_per_tone()
    }

    /// Duration of the rendered grid in milliseconds
    pub fn total_duration_ms(&self, grid: &Grid) -> u64 {
        grid.len() as u64 * self.tone_duration_ms as u64
    }

    /// Render the grid into one pre-sized buffer
    pub fn render(&self, grid: &Grid, frequencies: &FrequencyMap) -> Result<Vec<i16>> {
        let samples = self.samples_for(grid.len());
        if samples > MAX_WAV_SAMPLES {
            return Err(Error::AudioTooLarge {
                samples,
                max: MAX_WAV_SAMPLES,
            });
        }

        let per_tone = self.samples_per_tone();
        let mut buffer = vec![0i16; samples as usize];
        if per_tone == 0 {
            return Ok(buffer);
        }

        let sample_rate = self.sample_rate as f64;
        let scale = self.amplitude * i16::MAX as f64;

        for (&value, tone) in grid.cells().iter().zip(buffer.chunks_exact_mut(per_tone)) {
            let freq = frequencies
                .frequency(value)
                .ok_or(Error::UnmappedValue { value })?;
            for (n, sample) in tone.iter_mut().enumerate() {
                // `as` truncates toward zero
                *sample = (sine_sample(freq, sample_rate, n) * scale) as i16;
            }
        }

        debug!(
            tones = grid.len(),
            samples = buffer.len(),
            "rendered tone sequence"
        );
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridPolicy;
    use crate::ingest::NumberSequence;

    fn grid(values: &[i64]) -> Grid {
        Grid::from_sequence(&NumberSequence::new(values.to_vec()), GridPolicy::Truncate).unwrap()
    }

    #[test]
    fn test_sine_sample_quarter_period() {
        assert!(sine_sample(1.0, 4.0, 0).abs() < 1e-12);
        assert!((sine_sample(1.0, 4.0, 1) - 1.0).abs() < 1e-12);
        assert!(sine_sample(1.0, 4.0, 2).abs() < 1e-12);
        assert!((sine_sample(1.0, 4.0, 3) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sample_counts() {
        let renderer = ToneRenderer::new(44100, 10);
        let g = grid(&[1, 2, 3, 4]);

        assert_eq!(renderer.samples_per_tone(), 441);
        assert_eq!(renderer.total_samples(&g), 4 * 441);
        assert_eq!(renderer.total_duration_ms(&g), 40);
    }

    #[test]
    fn test_rendered_length_matches_duration() {
        for (rate, ms) in [(44100, 10), (48000, 5), (8000, 25)] {
            let renderer = ToneRenderer::new(rate, ms);
            let g = grid(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
            let freqs = FrequencyMap::build(&g, 200.0, 2000.0).unwrap();

            let samples = renderer.render(&g, &freqs).unwrap();
            let duration_ms = samples.len() as u64 * 1000 / rate as u64;
            assert_eq!(duration_ms, 9 * ms as u64);
        }
    }

    #[test]
    fn test_each_tone_starts_at_zero() {
        let renderer = ToneRenderer::new(44100, 10);
        let g = grid(&[1, 2, 3, 4]);
        let freqs = FrequencyMap::build(&g, 200.0, 2000.0).unwrap();
        let samples = renderer.render(&g, &freqs).unwrap();

        for tone in samples.chunks(441) {
            assert_eq!(tone[0], 0);
        }
    }

    #[test]
    fn test_every_tone_is_a_sine() {
        let renderer = ToneRenderer::new(44100, 10);
        let g = grid(&[1, 2, 3, 4]);
        let freqs = FrequencyMap::build(&g, 200.0, 2000.0).unwrap();
        let samples = renderer.render(&g, &freqs).unwrap();

        for (tone, freq) in samples.chunks(441).zip([200.0, 800.0, 1400.0, 2000.0]) {
            for (n, &s) in tone.iter().enumerate() {
                let expected = (2.0 * PI * freq * n as f64 / 44100.0).sin();
                let actual = s as f64 / i16::MAX as f64;
                assert!((expected - actual).abs() < 1e-3, "{freq} Hz sample {n}: {expected} vs {actual}");
            }
        }
    }

    #[test]
    fn test_amplitude_bounds_samples() {
        let renderer = ToneRenderer::new(44100, 10).with_amplitude(0.5);
        let g = grid(&[1, 2, 3, 4]);
        let freqs = FrequencyMap::build(&g, 200.0, 2000.0).unwrap();
        let samples = renderer.render(&g, &freqs).unwrap();

        let peak = samples.iter().map(|s| s.unsigned_abs()).max().unwrap();
        assert!(peak <= i16::MAX as u16 / 2 + 1);
        assert!(peak > i16::MAX as u16 / 4);
    }

    #[test]
    fn test_oversized_audio_rejected_before_allocating() {
        // 4 tones of 3 hours each at 192 kHz
        let renderer = ToneRenderer::new(192000, 3 * 60 * 60 * 1000);
        let g = grid(&[1, 2, 3, 4]);
        let freqs = FrequencyMap::build(&g, 200.0, 2000.0).unwrap();

        assert!(renderer.samples_for(4) > MAX_WAV_SAMPLES);
        assert!(matches!(
            renderer.render(&g, &freqs),
            Err(Error::AudioTooLarge { max: MAX_WAV_SAMPLES, .. })
        ));
    }

    #[test]
    fn test_unmapped_value_is_error() {
        let renderer = ToneRenderer::new(44100, 10);
        let g = grid(&[1, 2, 3, 4]);
        let freqs = FrequencyMap::from_values(&[1, 2], 200.0, 2000.0).unwrap();

        assert!(matches!(
            renderer.render(&g, &freqs),
            Err(Error::UnmappedValue { value: 3 })
        ));
    }
}
