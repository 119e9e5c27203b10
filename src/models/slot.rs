use serde::{Deserialize, Serialize};

/// One entry of an availability report: a time-of-day label and whether the
/// slot can still take a booking. Never persisted; recomputed per query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Slot {
    pub slot: String,
    pub is_available: bool,
}
