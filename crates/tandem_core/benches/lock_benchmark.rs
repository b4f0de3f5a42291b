//! # Lock & Trace Hot-Path Benchmark
//!
//! REQUIREMENTS:
//! - Uncontended acquire/release in nanoseconds
//! - 0 allocations per trace push
//!
//! Run with: `cargo bench --package tandem_core`

// Benchmarks don't need docs and may have intentionally unused code
#![allow(missing_docs)]
#![allow(dead_code)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tandem_core::{
    FencedLock, MergedTrace, Participant, PetersonLock, SpinHint, TraceBuffer, TraceEvent,
    TracePayload, UnfencedLock,
};

/// Benchmark: uncontended acquire/release pair, fenced.
fn bench_fenced_acquire_release(c: &mut Criterion) {
    let lock: FencedLock<SpinHint> = PetersonLock::new(SpinHint);

    c.bench_function("fenced_acquire_release", |b| {
        b.iter(|| {
            lock.acquire(black_box(Participant::A));
            lock.release(black_box(Participant::A));
        });
    });
}

/// Benchmark: uncontended acquire/release pair, unfenced (the fence cost is
/// the difference between the two).
fn bench_unfenced_acquire_release(c: &mut Criterion) {
    let lock: UnfencedLock<SpinHint> = PetersonLock::new(SpinHint);

    c.bench_function("unfenced_acquire_release", |b| {
        b.iter(|| {
            lock.acquire(black_box(Participant::A));
            lock.release(black_box(Participant::A));
        });
    });
}

/// Benchmark: one trace push into a pre-sized ring.
fn bench_trace_push(c: &mut Criterion) {
    let mut buffer = TraceBuffer::new(256);
    let mut timestamp = 0u64;

    c.bench_function("trace_push", |b| {
        b.iter(|| {
            timestamp += 1;
            buffer.push(black_box(TraceEvent::new(
                timestamp,
                1,
                TracePayload::Acquiring,
            )));
        });
    });
}

/// Benchmark: merging two full 256-entry buffers.
fn bench_merge_two_full_buffers(c: &mut Criterion) {
    let mut a = TraceBuffer::new(256);
    let mut b = TraceBuffer::new(256);
    for timestamp in 0..256u64 {
        a.push(TraceEvent::new(timestamp * 2, 1, TracePayload::Acquiring));
        b.push(TraceEvent::new(timestamp * 2 + 1, 2, TracePayload::Acquired));
    }

    c.bench_function("merge_two_full_buffers", |bench| {
        bench.iter(|| MergedTrace::new(black_box(&[&a, &b])).count());
    });
}

criterion_group!(
    benches,
    bench_fenced_acquire_release,
    bench_unfenced_acquire_release,
    bench_trace_push,
    bench_merge_two_full_buffers
);
criterion_main!(benches);
