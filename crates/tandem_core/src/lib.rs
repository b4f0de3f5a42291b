//! # TANDEM Core
//!
//! Two-party mutual exclusion without atomic hardware instructions, plus the
//! tracing machinery needed to see what happens when it goes wrong:
//!
//! - Sub-10ns uncontended acquire/release
//! - Zero allocations on the lock and trace hot paths
//! - The memory-ordering bug is *reproducible on purpose* (see [`lock`])
//!
//! ## Architecture Rules
//!
//! 1. **No atomic read-modify-write in the lock** - plain loads and stores
//!    only; the optional store/load fence is the single ordering constraint
//! 2. **Tracing never synchronizes** - one writer per buffer, read only after
//!    the writer has stopped
//! 3. **No heap allocations after construction** - buffers are pre-sized
//!
//! ## Example
//!
//! ```rust,ignore
//! use tandem_core::{FencedLock, Participant, ThreadYield};
//!
//! let lock = FencedLock::new(ThreadYield);
//! lock.acquire(Participant::A);
//! // critical section
//! lock.release(Participant::A);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod lock;
pub mod trace;

pub use lock::{
    FencedLock, FullFence, NoFence, Participant, PetersonLock, SpinHint, StoreLoadBarrier,
    ThreadYield, UnfencedLock, WaitStrategy,
};
pub use trace::{
    dump_merged, MergedTrace, Timestamp, TraceBuffer, TraceCursor, TraceEvent, TracePayload,
};
