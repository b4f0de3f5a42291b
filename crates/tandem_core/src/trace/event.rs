//! Trace events: fixed-size, typed, self-contained.

use std::fmt;
use std::io;

/// An opaque monotonic timestamp.
///
/// The concrete source is the caller's business (the harness uses a
/// nanosecond tick over `Instant`); the trace layer only requires that
/// values are non-decreasing across calls on a given thread.
pub type Timestamp = u64;

/// What happened, as a closed set of typed payloads.
///
/// A tagged variant per event kind, each carrying only the fields it needs,
/// keeps slots fixed-size and `Copy` without an untyped format-plus-args
/// contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TracePayload {
    /// The participant started acquiring the lock.
    Acquiring,
    /// The acquire returned; the participant believes it holds the lock.
    Acquired,
    /// The participant is about to release the lock.
    Releasing,
    /// The shared counter was sampled at a value that violates mutual
    /// exclusion.
    CounterObserved {
        /// The offending counter value.
        value: i64,
    },
}

impl fmt::Display for TracePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Acquiring => f.write_str("Acquiring lock..."),
            Self::Acquired => f.write_str("Acquiring lock...done"),
            Self::Releasing => f.write_str("Releasing lock"),
            Self::CounterObserved { value } => {
                write!(f, "shared counter observed at {value}")
            }
        }
    }
}

/// One recorded event. Immutable once written and self-contained, so a
/// buffer can be read by a different thread than the one that wrote it
/// (strictly after the writer has stopped).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceEvent {
    /// When it happened.
    pub timestamp: Timestamp,
    /// Source-line marker of the recording site.
    pub line: u32,
    /// What happened.
    pub payload: TracePayload,
}

impl TraceEvent {
    /// Creates an event.
    #[inline]
    #[must_use]
    pub const fn new(timestamp: Timestamp, line: u32, payload: TracePayload) -> Self {
        Self {
            timestamp,
            line,
            payload,
        }
    }

    /// Renders this event as one diagnostic line.
    ///
    /// `baseline` is subtracted from the timestamp for readable elapsed
    /// times; `id` marks which buffer (participant) the event came from.
    ///
    /// # Errors
    ///
    /// Propagates write failures from the sink.
    pub fn render<W: io::Write>(
        &self,
        sink: &mut W,
        id: usize,
        baseline: Timestamp,
    ) -> io::Result<()> {
        writeln!(
            sink,
            "{:>9}: [{:>3}] line {:>4}: {}",
            self.timestamp.saturating_sub(baseline),
            id,
            self.line,
            self.payload
        )
    }
}

/// Records an event, capturing the source line of the call site.
///
/// The timestamp is supplied by the caller; the trace layer deliberately has
/// no clock of its own.
///
/// ```rust,ignore
/// trace_event!(events, clock.now(), TracePayload::Acquiring);
/// ```
#[macro_export]
macro_rules! trace_event {
    ($buffer:expr, $timestamp:expr, $payload:expr) => {
        $buffer.push($crate::trace::TraceEvent::new(
            $timestamp,
            line!(),
            $payload,
        ))
    };
}
