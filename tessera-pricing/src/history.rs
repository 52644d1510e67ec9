use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use uuid::Uuid;

/// One adjusted-price observation for a seat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub price: i64,
    pub reason: String,
    pub rule_id: Option<Uuid>,
}

/// Per-seat ring buffers of price observations, capped so a long-lived
/// engine never grows without bound.
#[derive(Debug)]
pub struct HistoryLedger {
    capacity: usize,
    seats: HashMap<String, VecDeque<PriceHistoryEntry>>,
}

impl HistoryLedger {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            seats: HashMap::new(),
        }
    }

    /// Append an entry, evicting the oldest once the seat is at capacity.
    pub fn record(&mut self, seat_id: &str, entry: PriceHistoryEntry) {
        let entries = self.seats.entry(seat_id.to_string()).or_default();
        if entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Snapshot of a seat's history, oldest first; empty for unknown seats.
    pub fn entries(&self, seat_id: &str) -> Vec<PriceHistoryEntry> {
        self.seats
            .get(seat_id)
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(price: i64) -> PriceHistoryEntry {
        PriceHistoryEntry {
            timestamp: Utc::now(),
            price,
            reason: String::new(),
            rule_id: None,
        }
    }

    #[test]
    fn test_oldest_entries_evicted_at_capacity() {
        let mut ledger = HistoryLedger::new(100);

        for price in 0..150 {
            ledger.record("seat-a1", entry(price));
        }

        let entries = ledger.entries("seat-a1");
        assert_eq!(entries.len(), 100);
        assert_eq!(entries[0].price, 50);
        assert_eq!(entries[99].price, 149);
    }

    #[test]
    fn test_unknown_seat_is_empty() {
        let ledger = HistoryLedger::new(100);
        assert!(ledger.entries("nope").is_empty());
    }
}
