//! # Post-Mortem Tracing
//!
//! A per-thread circular event log plus a chronological merge across logs.
//!
//! ## The Problem
//!
//! The failure under study is a memory-ordering race that happens once in
//! millions of iterations. Any observer that synchronizes (a logger behind a
//! mutex, a shared channel) would order the very accesses whose ordering is
//! in question and make the bug vanish.
//!
//! ## The Solution
//!
//! ```text
//! Thread 0:  TraceBuffer 0  (single writer, no synchronization)
//! Thread 1:  TraceBuffer 1  (single writer, no synchronization)
//!
//!            after both threads stop:
//!            MergedTrace([buf 0, buf 1]) -> one time-descending history
//! ```
//!
//! Each buffer is a fixed-capacity ring written only by its owning thread.
//! Recording an event is a cursor bump and a slot overwrite - no allocation,
//! no blocking, no atomics. The oldest entries are silently overwritten once
//! the ring is full; a short, lossy, *recent* history is the design goal.
//!
//! Reading is permitted only after the writer has stopped. That sequencing
//! is the caller's responsibility; the buffer itself never checks.

mod buffer;
mod event;
mod merge;

pub use buffer::{TraceBuffer, TraceCursor, DEFAULT_CAPACITY};
pub use event::{Timestamp, TraceEvent, TracePayload};
pub use merge::{dump_merged, MergedTrace};
