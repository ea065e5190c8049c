//! Configuration schema definitions

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::grid::GridPolicy;
use crate::mapping::frequency::{DEFAULT_MAX_HZ, DEFAULT_MIN_HZ, DEFAULT_PRECISION};
use crate::synth::MAX_WAV_SAMPLES;

/// Main configuration for Chromatone
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChromatoneConfig {
    /// Audio rendering settings
    #[serde(default)]
    pub audio: AudioConfig,

    /// Frequency band for the value mapping
    #[serde(default)]
    pub frequency: FrequencyConfig,

    /// Grid reshaping
    #[serde(default)]
    pub grid: GridConfig,

    /// Input budgets
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl ChromatoneConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // Validate audio settings
        if self.audio.sample_rate < 8000 || self.audio.sample_rate > 192000 {
            bail!("Sample rate must be between 8000 and 192000");
        }
        if self.audio.tone_duration_ms == 0 {
            bail!("Tone duration must be at least 1 ms");
        }
        if (self.audio.sample_rate as u64 * self.audio.tone_duration_ms as u64) % 1000 != 0 {
            bail!(
                "Tone duration of {} ms is not a whole number of samples at {} Hz",
                self.audio.tone_duration_ms,
                self.audio.sample_rate
            );
        }
        if !(0.0..=1.0).contains(&self.audio.amplitude) {
            bail!("Amplitude must be between 0.0 and 1.0");
        }

        // Validate frequency band
        if self.frequency.min_hz <= 0.0 {
            bail!("Minimum frequency must be positive");
        }
        if self.frequency.min_hz >= self.frequency.max_hz {
            bail!(
                "Minimum frequency ({}) must be below maximum frequency ({})",
                self.frequency.min_hz,
                self.frequency.max_hz
            );
        }
        if self.frequency.max_hz > self.audio.sample_rate as f64 / 2.0 {
            bail!("Maximum frequency must not exceed the Nyquist limit");
        }
        if self.frequency.precision > 9 {
            bail!("Frequency precision must be at most 9 decimal places");
        }

        if self.limits.max_values == 0 {
            bail!("Value limit must be at least 1");
        }
        if self.limits.cache_capacity == 0 {
            bail!("Cache capacity must be at least 1");
        }

        // A full-size input must still fit in one WAV file
        let samples_per_tone =
            self.audio.sample_rate as u64 * self.audio.tone_duration_ms as u64 / 1000;
        let worst_case = (self.limits.max_values as u64).saturating_mul(samples_per_tone);
        if worst_case > MAX_WAV_SAMPLES {
            bail!(
                "{} values of {} ms at {} Hz need {} samples, a WAV file holds at most {}",
                self.limits.max_values,
                self.audio.tone_duration_ms,
                self.audio.sample_rate,
                worst_case,
                MAX_WAV_SAMPLES
            );
        }

        Ok(())
    }
}

/// Audio rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate in Hz (default: 44100)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Length of each cell's tone in milliseconds (default: 10)
    #[serde(default = "default_tone_duration_ms")]
    pub tone_duration_ms: u32,

    /// Peak level 0.0-1.0 (default: 1.0)
    #[serde(default = "default_amplitude")]
    pub amplitude: f64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            tone_duration_ms: default_tone_duration_ms(),
            amplitude: default_amplitude(),
        }
    }
}

fn default_sample_rate() -> u32 { 44100 }
fn default_tone_duration_ms() -> u32 { 10 }
fn default_amplitude() -> f64 { 1.0 }

/// Frequency band configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyConfig {
    /// Frequency of the smallest value (default: 200 Hz)
    #[serde(default = "default_min_hz")]
    pub min_hz: f64,

    /// Frequency of the largest value (default: 2000 Hz)
    #[serde(default = "default_max_hz")]
    pub max_hz: f64,

    /// Decimal places kept in inverse lookup keys (default: 5)
    #[serde(default = "default_precision")]
    pub precision: u32,
}

impl Default for FrequencyConfig {
    fn default() -> Self {
        Self {
            min_hz: default_min_hz(),
            max_hz: default_max_hz(),
            precision: default_precision(),
        }
    }
}

fn default_min_hz() -> f64 { DEFAULT_MIN_HZ }
fn default_max_hz() -> f64 { DEFAULT_MAX_HZ }
fn default_precision() -> u32 { DEFAULT_PRECISION }

/// Grid configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridConfig {
    /// What to do with sequences whose length is not a perfect square
    #[serde(default)]
    pub policy: GridPolicy,
}

/// Input budgets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum number of values accepted from one input (default: 1048576)
    #[serde(default = "default_max_values")]
    pub max_values: usize,

    /// Parsed inputs kept in the parse cache (default: 16)
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_values: default_max_values(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

fn default_max_values() -> usize { 1 << 20 }
fn default_cache_capacity() -> usize { 16 }
