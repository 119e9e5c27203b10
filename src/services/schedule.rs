use std::collections::HashMap;

use crate::models::Slot;

/// The fixed daily schedule: an ordered list of time labels plus the number
/// of concurrent bookings one slot can hold. Both come from configuration.
#[derive(Debug, Clone)]
pub struct SlotCatalog {
    labels: Vec<String>,
    capacity: u32,
}

impl SlotCatalog {
    pub fn new(labels: Vec<String>, capacity: u32) -> Self {
        Self { labels, capacity }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Full-day availability report for a multiset of already-taken time
    /// labels. A label is available while its count stays below capacity.
    /// Labels outside the catalog are ignored. Output order is catalog order,
    /// one entry per catalog label.
    pub fn compute_availability(&self, taken: &[String]) -> Vec<Slot> {
        let mut counts: HashMap<&str, u32> = HashMap::with_capacity(self.labels.len());
        for label in &self.labels {
            counts.insert(label.as_str(), 0);
        }

        for label in taken {
            if let Some(count) = counts.get_mut(label.as_str()) {
                *count += 1;
            }
        }

        self.labels
            .iter()
            .map(|label| Slot {
                slot: label.clone(),
                is_available: counts[label.as_str()] < self.capacity,
            })
            .collect()
    }
}
