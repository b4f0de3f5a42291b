//! # TANDEM
//!
//! The harness that exercises the two-party lock to destruction.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        lock_stress                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  worker A ──┐                                ┌── worker B   │
//! │  (trace     │     ┌───────────────────┐     │    (trace    │
//! │   buffer A) ├────>│  PetersonLock     │<────┤  buffer B)   │
//! │             │     │  shared counter   │     │              │
//! │             │     └───────────────────┘     │              │
//! │             │                               │              │
//! │             └──────> report channel <───────┘              │
//! │                           │                                │
//! │                           v                                │
//! │              RunReport + merged trace dump                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The counter check is the runtime statement of the lock's invariant: while
//! a participant is inside the critical section the counter must read
//! exactly 1. A fenced run must never trip it; an unfenced run eventually
//! will, and the merged trace dump shows the interleaving that did it.
//!
//! ## Modules
//!
//! - `config`: command-line configuration
//! - `clock`: the monotonic timestamp source
//! - `runner`: worker threads, violation detection, reporting

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod clock;
pub mod config;
pub mod runner;

pub use clock::MonotonicClock;
pub use config::{ConfigError, RunConfig};
pub use runner::{exercise_lock, RunReport, Violation, WorkerReport};
