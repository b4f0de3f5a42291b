//! The two-party lock itself.
//!
//! Informed by the classic Peterson construction: announce interest, grant
//! the other side priority, then wait until the other side is either
//! uninterested or has granted priority back.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use super::barrier::{FullFence, NoFence, StoreLoadBarrier};
use super::wait::WaitStrategy;

/// One of exactly two lock contenders.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Participant {
    /// Participant 0.
    A = 0,
    /// Participant 1.
    B = 1,
}

impl Participant {
    /// Returns the other participant.
    #[inline]
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// Returns this participant's index (0 or 1).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A spinning mutual-exclusion lock for exactly two participants.
///
/// Every access to the shared flags uses `Ordering::Relaxed`, which compiles
/// to plain load and store instructions - no compare-and-swap, no locked bus
/// cycles. The only ordering constraint is the barrier `B` issued between
/// announcing interest and checking the other side; with [`NoFence`] the
/// store may be reordered past the load and both participants can enter the
/// critical section simultaneously. That failure mode is a feature: it is
/// the condition this crate exists to make observable.
///
/// ## Contract
///
/// - Each participant calls [`acquire`] and [`release`] only from its own
///   thread, strictly alternating. Violations are fatal assertions, not
///   recoverable errors.
/// - [`acquire`] may spin forever. There is no timeout and no cancellation;
///   liveness rests on the alternation argument alone.
///
/// [`acquire`]: PetersonLock::acquire
/// [`release`]: PetersonLock::release
pub struct PetersonLock<W, B = FullFence> {
    /// The strategy invoked on every idle spin iteration.
    wait: W,

    /// For both participants, whether that participant is currently
    /// acquiring or holding the lock.
    interested: [AtomicBool; 2],

    /// Which participant defers when both are interested at once. Holds an
    /// index (0 or 1), not a condition.
    priority: AtomicU8,

    /// The compile-time fence selection. `fn() -> B` keeps the lock's auto
    /// traits independent of the marker type.
    _barrier: PhantomData<fn() -> B>,
}

/// The corrected lock: announcement and check are ordered by a full fence.
pub type FencedLock<W> = PetersonLock<W, FullFence>;

/// The broken lock: nothing stops the hardware from reordering.
pub type UnfencedLock<W> = PetersonLock<W, NoFence>;

impl<W: WaitStrategy, B: StoreLoadBarrier> PetersonLock<W, B> {
    /// Creates a lock with both participants uninterested.
    #[must_use]
    pub fn new(wait: W) -> Self {
        Self {
            wait,
            interested: [AtomicBool::new(false), AtomicBool::new(false)],
            // Dead state: every acquire writes priority before any path
            // reads it, so the initial value is never observed.
            priority: AtomicU8::new(Participant::A as u8),
            _barrier: PhantomData,
        }
    }

    /// Acquires the lock for `me`, spinning until it is available.
    ///
    /// # Panics
    ///
    /// Panics (fatally, under the workspace `panic = "abort"` profiles) if
    /// `me` is already acquiring or holding the lock.
    pub fn acquire(&self, me: Participant) {
        assert!(
            !self.interested[me.index()].load(Ordering::Relaxed),
            "participant {me:?} acquired the lock it already holds"
        );

        let other = me.other();

        // Announce our interest, but graciously let the other side go first.
        self.interested[me.index()].store(true, Ordering::Relaxed);
        self.priority.store(other as u8, Ordering::Relaxed);

        // The store above must be globally visible before the loads below.
        B::fence();

        while self.interested[other.index()].load(Ordering::Relaxed)
            && self.priority.load(Ordering::Relaxed) == other as u8
        {
            self.wait.wait_one();
        }
    }

    /// Releases the lock held by `me`. No fence is required on this side.
    ///
    /// # Panics
    ///
    /// Panics if `me` does not hold the lock.
    pub fn release(&self, me: Participant) {
        assert!(
            self.interested[me.index()].load(Ordering::Relaxed),
            "participant {me:?} released a lock it does not hold"
        );

        self.interested[me.index()].store(false, Ordering::Relaxed);
    }

    /// Whether `participant` is currently acquiring or holding the lock.
    ///
    /// Post-mortem inspection only; the answer is stale by the time the
    /// caller sees it.
    #[must_use]
    pub fn is_interested(&self, participant: Participant) -> bool {
        self.interested[participant.index()].load(Ordering::Relaxed)
    }
}
