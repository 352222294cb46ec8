//! Record buffer with a bounded size and a running header key set.

use std::collections::BTreeSet;
use std::mem;

use crate::config::KeyScope;
use crate::models::{TagRecord, FILE_PATH_KEY};

/// A full (or final) buffer, ready to be written.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// `file_path` first, then tag names in sorted order.
    pub header: Vec<String>,
    /// Records in arrival order.
    pub records: Vec<TagRecord>,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Owns the pending records and the key set of the current chunk.
#[derive(Debug)]
pub struct Accumulator {
    buffer: Vec<TagRecord>,
    keys: BTreeSet<String>,
    capacity: usize,
    scope: KeyScope,
}

impl Accumulator {
    /// `capacity` is the flush threshold and must be non-zero.
    pub fn new(capacity: usize, scope: KeyScope) -> Self {
        Self {
            buffer: Vec::new(),
            keys: BTreeSet::new(),
            capacity: capacity.max(1),
            scope,
        }
    }

    /// Append a record; returns `true` once the buffer is full.
    pub fn push(&mut self, record: TagRecord) -> bool {
        for key in record.tag_keys() {
            if !self.keys.contains(key) {
                self.keys.insert(key.to_string());
            }
        }
        self.buffer.push(record);
        self.is_full()
    }

    pub fn is_full(&self) -> bool {
        self.buffer.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Header the buffered records would be written with.
    pub fn header(&self) -> Vec<String> {
        std::iter::once(FILE_PATH_KEY.to_string())
            .chain(self.keys.iter().cloned())
            .collect()
    }

    /// Drain the buffer into a chunk. `None` when nothing is buffered.
    ///
    /// With [`KeyScope::PerChunk`] the key set starts over; with
    /// [`KeyScope::Carried`] it keeps growing across chunks.
    pub fn take_chunk(&mut self) -> Option<Chunk> {
        if self.buffer.is_empty() {
            return None;
        }

        let header = self.header();
        if self.scope == KeyScope::PerChunk {
            self.keys.clear();
        }
        let records = mem::replace(&mut self.buffer, Vec::with_capacity(self.capacity.min(4096)));

        Some(Chunk { header, records })
    }
}
