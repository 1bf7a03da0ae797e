//! Order-independent fingerprint of a contact set.
//!
//! Used only to tell "nothing materially changed" between ticks. Scores are
//! quantized to 1/1000 so sub-threshold jitter does not register as change.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use tars_core::constants::FINGERPRINT_SCORE_SCALE;
use tars_core::types::EntityId;

use super::scan::ContactSet;

/// Fingerprint of `(identity, score)` pairs. Independent of iteration order.
pub fn of_entries(entries: impl IntoIterator<Item = (EntityId, f64)>) -> u64 {
    let mut sum: u64 = 0;
    let mut count: u64 = 0;
    for (id, score) in entries {
        let mut h = DefaultHasher::new();
        id.hash(&mut h);
        quantize(score).hash(&mut h);
        sum = sum.wrapping_add(h.finish());
        count += 1;
    }
    let mut h = DefaultHasher::new();
    count.hash(&mut h);
    sum.hash(&mut h);
    h.finish()
}

pub fn of_contacts(contacts: &ContactSet) -> u64 {
    of_entries(contacts.values().map(|t| (t.id(), t.aggregate_score())))
}

fn quantize(score: f64) -> i64 {
    if score.is_finite() {
        (score * FINGERPRINT_SCORE_SCALE).round() as i64
    } else {
        0
    }
}
