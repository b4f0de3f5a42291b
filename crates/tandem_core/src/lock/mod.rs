//! # Two-Party Mutual Exclusion
//!
//! A software lock for exactly two participants, built from plain memory
//! reads and writes. No compare-and-swap, no locked bus cycles.
//!
//! ## The Problem
//!
//! ```text
//! Participant A:                 Participant B:
//!   interested[A] = true           interested[B] = true
//!   read interested[B] -> false    read interested[A] -> false
//!   enter critical section         enter critical section     <- BOTH INSIDE
//! ```
//!
//! The algorithm is correct on paper. On real hardware the store to
//! `interested` may be sitting in a store buffer while the subsequent load
//! executes, so each side can read the other's *stale* flag. x86 permits
//! exactly this store/load reordering.
//!
//! ## The Solution
//!
//! A full store/load fence between the announcement and the check forces the
//! write to become globally visible first. The fence is a type parameter
//! ([`FullFence`] / [`NoFence`]) so the same lock can be exercised with the
//! bug reproducible and with it fixed.
//!
//! ## Per-Participant State Machine
//!
//! ```text
//! Idle --acquire--> Announced (interested = true, priority -> other)
//!      --spin until !(other_interested && priority == other)--> Holding
//!      --release--> Idle
//! ```
//!
//! Transitions are driven only by that participant's own thread; the other
//! participant's flags are read-only inputs to the spin condition.

mod barrier;
mod peterson;
mod wait;

pub use barrier::{FullFence, NoFence, StoreLoadBarrier};
pub use peterson::{FencedLock, Participant, PetersonLock, UnfencedLock};
pub use wait::{SpinHint, ThreadYield, WaitStrategy};
