//! Bounded, newest-first event history.

use std::collections::VecDeque;

use tars_core::constants::{EVENT_LOG_CAPACITY, EVENT_LOG_SEPARATOR};
use tars_core::events::EventRecord;

/// Rolling history of material posture changes. The oldest record is evicted first.
#[derive(Debug, Clone)]
pub struct EventLog {
    records: VecDeque<EventRecord>,
    capacity: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(EVENT_LOG_CAPACITY)
    }
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, record: EventRecord) {
        self.records.push_front(record);
        self.records.truncate(self.capacity);
    }

    /// Records, newest first.
    pub fn records(&self) -> impl Iterator<Item = &EventRecord> {
        self.records.iter()
    }

    pub fn latest(&self) -> Option<&EventRecord> {
        self.records.front()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Human-readable rolling text, newest first, capped at `capacity` lines.
    pub fn render_text(&self) -> String {
        let mut lines = Vec::new();
        for record in &self.records {
            lines.push(EVENT_LOG_SEPARATOR.to_string());
            lines.push(record.header_line());
            lines.extend(
                record
                    .contacts
                    .iter()
                    .map(|c| format!("  > {}", c.summary())),
            );
            if lines.len() >= self.capacity {
                break;
            }
        }
        lines.truncate(self.capacity);
        let mut text = lines.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        text
    }
}
