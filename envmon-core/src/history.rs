use std::collections::VecDeque;

use crate::model::HistoryEntry;

/// Default window: 120 readings, ten minutes at a 5 second poll.
pub const DEFAULT_CAPACITY: usize = 120;

/// Fixed-capacity FIFO of recent readings, oldest first.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl HistoryBuffer {
    /// `capacity` must be non-zero; `Config::validate` rejects 0.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    /// Append `entry`, evicting exactly one entry from the front when full.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Copy of the buffer in recording order.
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(i: usize) -> HistoryEntry {
        HistoryEntry {
            timestamp: format!("call-{i}"),
            temperature: i as f64,
            humidity: 50.0,
            pressure: 1000.0,
        }
    }

    #[test]
    fn starts_empty() {
        let buf = HistoryBuffer::default();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), DEFAULT_CAPACITY);
        assert!(buf.snapshot().is_empty());
    }

    #[test]
    fn length_tracks_min_of_calls_and_capacity() {
        let mut buf = HistoryBuffer::new(DEFAULT_CAPACITY);
        for i in 0..300 {
            buf.record(entry(i));
            assert_eq!(buf.len(), (i + 1).min(DEFAULT_CAPACITY));
        }
    }

    #[test]
    fn evicts_oldest_first() {
        let mut buf = HistoryBuffer::new(DEFAULT_CAPACITY);
        for i in 0..250 {
            buf.record(entry(i));
            let calls = i + 1;
            if calls > DEFAULT_CAPACITY {
                let oldest = format!("call-{}", calls - DEFAULT_CAPACITY);
                assert_eq!(buf.snapshot()[0].timestamp, oldest);
            }
        }
    }

    #[test]
    fn keeps_recording_order() {
        let mut buf = HistoryBuffer::new(5);
        for i in 0..13 {
            buf.record(entry(i));
        }
        let temps: Vec<f64> = buf.snapshot().iter().map(|e| e.temperature).collect();
        assert_eq!(temps, vec![8.0, 9.0, 10.0, 11.0, 12.0]);
    }

    #[test]
    fn hundred_twenty_first_poll_drops_first() {
        let mut buf = HistoryBuffer::new(120);
        for i in 1..=121 {
            buf.record(entry(i));
        }
        assert_eq!(buf.len(), 120);
        let snap = buf.snapshot();
        assert!(snap.iter().all(|e| e.timestamp != "call-1"));
        assert_eq!(snap[0].timestamp, "call-2");
        assert_eq!(snap[119].timestamp, "call-121");
    }

    #[test]
    fn stores_nan_as_is() {
        let mut buf = HistoryBuffer::new(2);
        buf.record(HistoryEntry {
            temperature: f64::NAN,
            ..entry(0)
        });
        assert!(buf.snapshot()[0].temperature.is_nan());
    }

    #[test]
    fn snapshot_is_detached_copy() {
        let mut buf = HistoryBuffer::new(3);
        buf.record(entry(0));
        let snap = buf.snapshot();
        buf.record(entry(1));
        assert_eq!(snap.len(), 1);
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut buf = HistoryBuffer::new(0);
        buf.record(entry(0));
        buf.record(entry(1));
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.snapshot()[0].timestamp, "call-1");
    }

    #[test]
    fn huge_capacity_allocates_lazily() {
        let mut buf = HistoryBuffer::new(usize::MAX);
        assert_eq!(buf.capacity(), usize::MAX);
        buf.record(entry(0));
        buf.record(entry(1));
        assert_eq!(buf.len(), 2);
    }
}
