//! Content-addressed parse cache
//!
//! Remembers parsed sequences keyed by the SHA-256 of the raw input, so that
//! re-running the same upload skips parsing. Capacity is bounded; the oldest
//! entry is evicted first.

use super::NumberSequence;
use crate::error::Result;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use tracing::debug;

type ContentHash = [u8; 32];

/// Bounded cache of parsed inputs
pub struct ParseCache {
    capacity: usize,
    entries: HashMap<ContentHash, NumberSequence>,
    order: VecDeque<ContentHash>,
    hits: u64,
    misses: u64,
}

impl ParseCache {
    /// Create a cache holding at most `capacity` inputs
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Return the parsed sequence for `bytes`, parsing on a miss
    ///
    /// Failed parses are not cached.
    pub fn get_or_parse(&mut self, bytes: &[u8], max_values: usize) -> Result<NumberSequence> {
        let key: ContentHash = Sha256::digest(bytes).into();

        if let Some(seq) = self.entries.get(&key) {
            self.hits += 1;
            debug!("parse cache hit");
            return Ok(seq.clone());
        }

        self.misses += 1;
        let seq = NumberSequence::from_bytes(bytes, max_values)?;

        if self.order.len() == self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.order.push_back(key);
        self.entries.insert(key, seq.clone());
        debug!(entries = self.order.len(), "parse cache miss");

        Ok(seq)
    }

    /// Number of cached inputs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
