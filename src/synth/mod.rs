//! Synthesis of tone sequences
//!
//! Turns a grid and its frequency mapping into PCM samples.

mod tone;

pub use tone::{sine_sample, ToneRenderer, MAX_WAV_SAMPLES};
