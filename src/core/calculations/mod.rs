//! Balance and settlement engine.
//!
//! Every function here is a pure transform of its arguments: nothing is
//! mutated in place, so callers can diff old and new results freely.

pub mod balance;
pub mod grouping;
pub mod settlement;
pub mod snapshot;
pub mod split;
pub mod summary;

pub use balance::compute_balances;
pub use grouping::{apply_grouping, individual_group_id};
pub use settlement::compute_settlements;
pub use snapshot::{SessionSnapshot, recompute};
pub use split::{member_slots, split_amount, split_amounts};
pub use summary::compute_summary;

/// Residual magnitude below which a balance counts as settled.
pub const BALANCE_EPSILON: f64 = 0.01;

/// Rounds to two decimal places to absorb floating point drift.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
