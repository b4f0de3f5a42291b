//! Worker threads, violation detection and post-mortem reporting.
//!
//! Two OS threads contend for one lock around a shared counter. The counter
//! is the runtime form of the mutual-exclusion invariant: immediately after
//! a participant increments it the value must be exactly 1, and immediately
//! after the matching decrement exactly 0. Anything else means both
//! participants were inside the critical section at once.
//!
//! The counter itself uses `Relaxed` atomic accesses only so that the lock
//! under test remains the sole source of exclusion.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel::bounded;
use parking_lot::{Condvar, Mutex};

use tandem_core::trace::MergedTrace;
use tandem_core::trace_event;
use tandem_core::{
    Participant, PetersonLock, StoreLoadBarrier, ThreadYield, TraceBuffer, TracePayload,
};

use crate::clock::MonotonicClock;
use crate::config::RunConfig;

/// A detected mutual-exclusion violation.
///
/// Not an error in the primitives: this is the condition under test, and
/// detecting it is the harness's whole job.
#[derive(Debug, Clone, Copy)]
pub struct Violation {
    /// Who observed it.
    pub participant: Participant,
    /// The counter value that should have been 1 (or 0).
    pub observed: i64,
    /// The iteration on which it was observed.
    pub iteration: u64,
}

/// One worker's result: what it completed, what it saw, what it recorded.
pub struct WorkerReport {
    /// The participant this worker played.
    pub participant: Participant,
    /// Iterations fully completed.
    pub completed: u64,
    /// The violation this worker observed, if any.
    pub violation: Option<Violation>,
    /// The worker's trace buffer, quiescent once the report exists.
    pub events: TraceBuffer,
}

/// The outcome of one full exercise run.
pub struct RunReport {
    /// Which barrier the lock was built with.
    pub barrier: &'static str,
    /// Iterations requested per participant.
    pub iterations: u64,
    /// Wall-clock duration of the contended phase.
    pub elapsed: Duration,
    /// The shared counter's final value (0 unless a violation desynced it).
    pub final_count: i64,
    /// Both workers' reports, indexed by participant.
    pub workers: [WorkerReport; 2],
}

impl RunReport {
    /// The first violation either worker observed, favoring participant A.
    #[must_use]
    pub fn violation(&self) -> Option<&Violation> {
        self.workers.iter().find_map(|w| w.violation.as_ref())
    }

    /// Prints the run summary and, after a violation, the merged trace of
    /// both participants (up to `limit` lines, newest first).
    ///
    /// # Errors
    ///
    /// Propagates write failures from the sink.
    pub fn dump<W: io::Write>(&self, sink: &mut W, limit: usize) -> io::Result<()> {
        let [a, b] = &self.workers;

        writeln!(
            sink,
            "{} run: {} + {} iterations in {:?}",
            self.barrier, a.completed, b.completed, self.elapsed
        )?;
        writeln!(sink, "shared counter = {}", self.final_count)?;

        if let Some(violation) = self.violation() {
            writeln!(
                sink,
                "Requirement \"counter == 1 inside the critical section\" failed!"
            )?;
            writeln!(
                sink,
                "participant {:?} observed {} on iteration {}",
                violation.participant, violation.observed, violation.iteration
            )?;
            writeln!(sink, "Dumping merged event buffers:")?;
            for (index, event) in MergedTrace::new(&[&a.events, &b.events]).take(limit) {
                event.render(sink, index, 0)?;
            }
        } else {
            writeln!(sink, "mutual exclusion held")?;
        }

        Ok(())
    }
}

/// Holds the workers at the line until both are spawned, so the contended
/// phase starts simultaneously and its duration is measurable.
struct StartGate {
    open: Mutex<bool>,
    signal: Condvar,
}

impl StartGate {
    fn new() -> Self {
        Self {
            open: Mutex::new(false),
            signal: Condvar::new(),
        }
    }

    fn release_all(&self) {
        *self.open.lock() = true;
        self.signal.notify_all();
    }

    fn wait(&self) {
        let mut open = self.open.lock();
        while !*open {
            self.signal.wait(&mut open);
        }
    }
}

/// Runs the full exercise: two participants, `config.iterations` lock/unlock
/// cycles each, with the barrier selected by `B`.
///
/// On a violation the observing worker records the offending counter value
/// in its trace, releases the lock (which frees the still-spinning peer),
/// raises the stop flag and quits; the peer notices the flag on its next
/// iteration. The primitives themselves never detect anything.
#[must_use]
pub fn exercise_lock<B: StoreLoadBarrier>(config: &RunConfig) -> RunReport {
    let lock: PetersonLock<ThreadYield, B> = PetersonLock::new(ThreadYield);
    let clock = MonotonicClock::new();
    let shared = AtomicI64::new(0);
    let stop = AtomicBool::new(false);
    let gate = StartGate::new();
    let (report_tx, report_rx) = bounded::<WorkerReport>(2);

    let iterations = config.iterations;
    let trace_capacity = config.trace_capacity;

    tracing::info!("exercising two-party lock ({})", B::NAME);
    let started = Instant::now();

    std::thread::scope(|s| {
        for participant in [Participant::A, Participant::B] {
            let tx = report_tx.clone();
            let lock = &lock;
            let clock = &clock;
            let shared = &shared;
            let stop = &stop;
            let gate = &gate;

            s.spawn(move || {
                let mut events = TraceBuffer::new(trace_capacity);
                let mut completed = 0;
                let mut violation = None;

                gate.wait();

                for iteration in 0..iterations {
                    if stop.load(Ordering::Acquire) {
                        break;
                    }

                    trace_event!(events, clock.now(), TracePayload::Acquiring);
                    lock.acquire(participant);
                    trace_event!(events, clock.now(), TracePayload::Acquired);

                    let up = shared.fetch_add(1, Ordering::Relaxed) + 1;
                    let observed = if up == 1 {
                        let down = shared.fetch_sub(1, Ordering::Relaxed) - 1;
                        (down != 0).then_some(down)
                    } else {
                        Some(up)
                    };

                    if let Some(observed) = observed {
                        trace_event!(
                            events,
                            clock.now(),
                            TracePayload::CounterObserved { value: observed }
                        );
                        lock.release(participant);
                        stop.store(true, Ordering::Release);
                        violation = Some(Violation {
                            participant,
                            observed,
                            iteration,
                        });
                        tracing::warn!(
                            "participant {:?} observed shared counter at {} - mutual exclusion violated",
                            participant,
                            observed
                        );
                        break;
                    }

                    trace_event!(events, clock.now(), TracePayload::Releasing);
                    lock.release(participant);
                    completed = iteration + 1;
                }

                // The receiver outlives the scope; a send failure would mean
                // the runner itself is gone.
                let _ = tx.send(WorkerReport {
                    participant,
                    completed,
                    violation,
                    events,
                });
            });
        }

        gate.release_all();
    });

    let elapsed = started.elapsed();
    tracing::debug!("contended phase finished in {:?}", elapsed);

    let mut slots = [None, None];
    for report in report_rx.try_iter() {
        let index = report.participant.index();
        slots[index] = Some(report);
    }
    let [Some(a), Some(b)] = slots else {
        unreachable!("both workers report before the scope closes");
    };

    RunReport {
        barrier: B::NAME,
        iterations,
        elapsed,
        final_count: shared.load(Ordering::Relaxed),
        workers: [a, b],
    }
}
