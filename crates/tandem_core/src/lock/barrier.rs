//! Store/load ordering barriers.
//!
//! The raw architecture-specific fence instruction (`mfence` on x86,
//! `dmb sy` on ARM) is abstracted as a named capability and selected at
//! compile time, so the lock itself never names an instruction set.

use std::sync::atomic::{fence, Ordering};

/// A full store/load ordering barrier, selected at compile time.
///
/// Implementors guarantee that every store issued before [`fence`] is
/// globally visible before any load issued after it. The two provided
/// implementations are the whole point of this crate: [`FullFence`] makes
/// the two-party lock correct, [`NoFence`] makes its failure reproducible.
///
/// [`fence`]: StoreLoadBarrier::fence
pub trait StoreLoadBarrier {
    /// Human-readable name for run reports.
    const NAME: &'static str;

    /// Order all prior stores before all subsequent loads.
    fn fence();
}

/// Emits a real full fence (`SeqCst`), compiling to the architecture's
/// store/load barrier instruction.
#[derive(Clone, Copy, Debug, Default)]
pub struct FullFence;

impl StoreLoadBarrier for FullFence {
    const NAME: &'static str = "store/load fence";

    #[inline]
    fn fence() {
        fence(Ordering::SeqCst);
    }
}

/// No barrier at all. The hardware is free to reorder the lock's
/// announcement store past its check load.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFence;

impl StoreLoadBarrier for NoFence {
    const NAME: &'static str = "no fence";

    #[inline]
    fn fence() {}
}
