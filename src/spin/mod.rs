//! Deterministic spin core
//!
//! Pure functions over immutable snapshots:
//! - Seeded RNG only, threaded in by the caller
//! - Fixed draw order per spin
//! - No rendering, scheduling or platform dependencies

pub mod plan;
pub mod slot;
pub mod state;
pub mod tick;

pub use plan::{plan_spin, select_weighted_index};
pub use slot::{Slot, alignment_angle, segment_at, slot_width};
pub use state::{Segment, SpinPhase, SpinPlan, SpinState};
pub use tick::{begin_spin, step};
