//! Wait strategies for the spin loop.
//!
//! The lock busy-waits; what it does on each idle iteration is policy, not
//! correctness. Any side-effect-free operation is a valid strategy.

/// One step of waiting inside a spin loop.
///
/// Injected into the lock at construction so the lock carries no assumptions
/// about the threading runtime.
pub trait WaitStrategy {
    /// Wait for one spin iteration.
    fn wait_one(&self);
}

/// Cooperatively yields the OS thread on every spin iteration.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadYield;

impl WaitStrategy for ThreadYield {
    #[inline]
    fn wait_one(&self) {
        std::thread::yield_now();
    }
}

/// Stays on-core and issues the CPU's spin-wait hint (`pause` on x86).
#[derive(Clone, Copy, Debug, Default)]
pub struct SpinHint;

impl WaitStrategy for SpinHint {
    #[inline]
    fn wait_one(&self) {
        std::hint::spin_loop();
    }
}
