//! Dense bar indexing: timestamp -> contiguous slot position.

use std::collections::HashMap;

use crate::data_types::{Bar, SlotPadding};

/// Timestamps below this are interpreted as seconds and scaled to
/// milliseconds before lookup.
const SECONDS_CUTOFF: f64 = 10_000_000_000.0;

/// Bidirectional mapping between bar timestamps and dense positions
/// `0..N-1`, plus the phantom padding slots reserved on either side of the
/// real range. Rebuilt in full whenever the bar sequence mutates; lookups
/// tolerate second-denominated and float-jittered timestamps.
#[derive(Clone, Debug, Default)]
pub struct TimeIndex {
    map: HashMap<i64, usize>,
    len: usize,
    padding: SlotPadding,
}

impl TimeIndex {
    pub fn new(padding: SlotPadding) -> Self {
        Self {
            map: HashMap::new(),
            len: 0,
            padding,
        }
    }

    /// Full rebuild from an ascending bar sequence. O(N).
    pub fn rebuild(&mut self, bars: &[Bar]) {
        self.map.clear();
        self.map.reserve(bars.len());
        for (position, bar) in bars.iter().enumerate() {
            self.map.insert(bar.time, position);
        }
        self.len = bars.len();
    }

    pub fn set_padding(&mut self, padding: SlotPadding) {
        self.padding = padding;
    }

    pub fn padding(&self) -> SlotPadding {
        self.padding
    }

    /// Number of real bars.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total dense array length including phantom slots.
    pub fn padded_len(&self) -> usize {
        self.padding.lead + self.len + self.padding.trail
    }

    /// Dense position of a bar timestamp, without padding. Accepts seconds
    /// or milliseconds; falls back to a rounded match when the exact key is
    /// absent.
    pub fn position(&self, time: f64) -> Option<usize> {
        let ms = if time != 0.0 && time.abs() < SECONDS_CUTOFF {
            time * 1000.0
        } else {
            time
        };
        self.map
            .get(&(ms as i64))
            .or_else(|| self.map.get(&(ms.round() as i64)))
            .copied()
    }

    /// Dense array slot of a bar timestamp, padding applied.
    pub fn padded_slot(&self, time: f64) -> Option<usize> {
        self.position(time).map(|p| p + self.padding.lead)
    }

    /// Maps a real bar position to its dense array slot.
    pub fn slot_of_position(&self, position: usize) -> usize {
        position + self.padding.lead
    }

    /// Maps a dense array slot back to a real bar position, if it lands on
    /// one rather than on a phantom slot.
    pub fn position_of_slot(&self, slot: usize) -> Option<usize> {
        let position = slot.checked_sub(self.padding.lead)?;
        (position < self.len).then_some(position)
    }
}
