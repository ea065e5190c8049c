//! WAV recorder
//!
//! Writes rendered samples into a 16-bit mono WAV container, either to a
//! file or to an in-memory buffer.

use crate::error::Result;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;

/// WAV recorder
pub struct Recorder<W: Write + Seek> {
    writer: WavWriter<W>,
    sample_rate: u32,
    samples_written: u64,
}

fn spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

impl Recorder<BufWriter<File>> {
    /// Create a recorder writing to `path`
    pub fn create(path: &Path, sample_rate: u32) -> Result<Self> {
        let writer = WavWriter::create(path, spec(sample_rate))?;
        Ok(Self::from_writer(writer, sample_rate))
    }
}

impl<W: Write + Seek> Recorder<W> {
    /// Create a recorder over any seekable writer
    pub fn new(inner: W, sample_rate: u32) -> Result<Self> {
        let writer = WavWriter::new(inner, spec(sample_rate))?;
        Ok(Self::from_writer(writer, sample_rate))
    }

    fn from_writer(writer: WavWriter<W>, sample_rate: u32) -> Self {
        Self {
            writer,
            sample_rate,
            samples_written: 0,
        }
    }

    /// Get the sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get the number of samples written
    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }

    /// Get the duration recorded in seconds
    pub fn duration_secs(&self) -> f64 {
        self.samples_written as f64 / self.sample_rate as f64
    }

    /// Write a buffer of samples
    pub fn write_buffer(&mut self, buffer: &[i16]) -> Result<()> {
        let mut block = self.writer.get_i16_writer(buffer.len() as u32);
        for &sample in buffer {
            block.write_sample(sample);
        }
        block.flush()?;
        self.samples_written += buffer.len() as u64;
        Ok(())
    }

    /// Finalize the WAV file
    ///
    /// This must be called to write the final header sizes.
    pub fn finalize(self) -> Result<()> {
        self.writer.finalize()?;
        Ok(())
    }
}

/// Encode samples as a complete WAV file in memory
pub fn encode_wav(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut recorder = Recorder::new(&mut cursor, sample_rate)?;
        recorder.write_buffer(samples)?;
        recorder.finalize()?;
    }
    Ok(cursor.into_inner())
}
