//! Contended mutual-exclusion properties, exercised with real OS threads.

use std::sync::atomic::{AtomicI64, Ordering};

use tandem_core::{
    FencedLock, Participant, PetersonLock, SpinHint, StoreLoadBarrier, ThreadYield, UnfencedLock,
    WaitStrategy,
};

const ITERATIONS: u64 = 100_000;

/// Runs two participants hammering a shared counter under `lock` and returns
/// how many times a participant observed another inside its critical section.
fn contend<W, B>(lock: &PetersonLock<W, B>, iterations: u64) -> u64
where
    W: WaitStrategy + Sync,
    B: StoreLoadBarrier,
{
    let counter = AtomicI64::new(0);
    let violations = AtomicI64::new(0);

    std::thread::scope(|s| {
        for participant in [Participant::A, Participant::B] {
            let counter = &counter;
            let violations = &violations;
            s.spawn(move || {
                for _ in 0..iterations {
                    lock.acquire(participant);

                    let up = counter.fetch_add(1, Ordering::Relaxed) + 1;
                    let down = counter.fetch_sub(1, Ordering::Relaxed) - 1;
                    if up != 1 || down != 0 {
                        violations.fetch_add(1, Ordering::Relaxed);
                    }

                    lock.release(participant);
                }
            });
        }
    });

    u64::try_from(violations.load(Ordering::Relaxed)).unwrap_or(0)
}

#[test]
fn fenced_lock_excludes_with_yield_strategy() {
    let lock: FencedLock<ThreadYield> = PetersonLock::new(ThreadYield);
    assert_eq!(contend(&lock, ITERATIONS), 0);
}

#[test]
fn fenced_lock_excludes_with_spin_hint_strategy() {
    // The property must hold regardless of wait-strategy timing.
    let lock: FencedLock<SpinHint> = PetersonLock::new(SpinHint);
    assert_eq!(contend(&lock, ITERATIONS), 0);
}

#[test]
fn unfenced_lock_terminates_whatever_the_outcome() {
    // Without the fence the property is *expected* to eventually fail on
    // hardware that reorders store/load; this suite asserts only that the
    // run terminates and the violation count is observable, never that the
    // broken lock stays lucky.
    let lock: UnfencedLock<ThreadYield> = PetersonLock::new(ThreadYield);
    let _observed = contend(&lock, 10_000);
}

#[test]
fn lock_alternates_when_recontended_from_one_thread() {
    // Sequential reacquisition from a single thread never spins.
    let lock: FencedLock<SpinHint> = PetersonLock::new(SpinHint);
    for _ in 0..1_000 {
        lock.acquire(Participant::A);
        lock.release(Participant::A);
        lock.acquire(Participant::B);
        lock.release(Participant::B);
    }
}
