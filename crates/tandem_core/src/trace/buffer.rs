//! The per-thread circular trace buffer and its reverse cursor.

use std::fmt;
use std::io;
use std::ptr;

use super::event::{Timestamp, TraceEvent};

/// Default ring capacity: enough for the last few critical sections of both
/// participants, small enough to stay cache-resident.
pub const DEFAULT_CAPACITY: usize = 256;

/// A fixed-capacity circular log of trace events for exactly one thread.
///
/// `push` takes `&mut self`: the type system enforces the single-writer
/// rule. Reading from another thread is permitted only once the writer has
/// stopped; the buffer carries no synchronization on purpose - adding any
/// would defeat its role as a low-overhead observer of a race.
///
/// Positions are tracked as a monotonically increasing push count (the
/// "generation") rather than a raw slot index. The slot for generation `g`
/// is `g & mask`; the generation disambiguates a freshly wrapped ring from
/// an empty one without any iterator special-casing.
pub struct TraceBuffer {
    /// The ring. `None` marks a slot that has never been written.
    slots: Box<[Option<TraceEvent>]>,

    /// `capacity - 1`; wraparound is a single mask, not a division.
    mask: u64,

    /// Total pushes since construction. The newest entry, if any, lives at
    /// `(head - 1) & mask`.
    head: u64,
}

impl TraceBuffer {
    /// Creates a buffer with the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or not a power of two.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "trace buffer capacity cannot be zero");
        assert!(
            capacity.is_power_of_two(),
            "trace buffer capacity must be a power of two, got {capacity}"
        );

        Self {
            slots: vec![None; capacity].into_boxed_slice(),
            mask: capacity as u64 - 1,
            head: 0,
        }
    }

    /// Returns the fixed capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns how many entries are currently retained.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.head.min(self.slots.len() as u64) as usize
    }

    /// Returns true if nothing has ever been pushed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head == 0
    }

    /// Appends an event, overwriting the entry `capacity` pushes ago.
    ///
    /// Always succeeds, never blocks, never allocates. Losing the oldest
    /// entry on wrap is intentional; callers needing more history must size
    /// the buffer up or dump before it wraps.
    #[inline]
    pub fn push(&mut self, event: TraceEvent) {
        let index = (self.head & self.mask) as usize;
        self.slots[index] = Some(event);
        self.head += 1;
    }

    /// Returns the most recently pushed event.
    #[must_use]
    pub fn newest(&self) -> Option<&TraceEvent> {
        self.newest_first().event()
    }

    /// Cursor at the newest entry, advancing toward older ones.
    #[must_use]
    pub fn newest_first(&self) -> TraceCursor<'_> {
        TraceCursor {
            buffer: self,
            seq: self.head,
        }
    }

    /// Cursor one past the oldest retained entry.
    ///
    /// Traversal runs from [`newest_first`] until the cursor equals this
    /// boundary. Because equality compares generations, a full buffer's
    /// fresh cursors sit on the same slot index yet compare unequal, and an
    /// empty buffer's cursors compare equal immediately.
    ///
    /// [`newest_first`]: TraceBuffer::newest_first
    #[must_use]
    pub fn oldest_boundary(&self) -> TraceCursor<'_> {
        TraceCursor {
            buffer: self,
            seq: self.head - self.len() as u64,
        }
    }

    /// Writes up to `limit` entries, newest to oldest, into `sink`.
    ///
    /// `id` tags every line (one buffer per participant); `baseline` is
    /// subtracted from timestamps for readable elapsed values.
    ///
    /// # Errors
    ///
    /// Propagates write failures from the sink; the traversal itself cannot
    /// fail.
    pub fn dump<W: io::Write>(
        &self,
        sink: &mut W,
        id: usize,
        baseline: Timestamp,
        limit: usize,
    ) -> io::Result<()> {
        let end = self.oldest_boundary();
        let mut cursor = self.newest_first();
        let mut written = 0;

        while cursor != end && written < limit {
            if let Some(event) = cursor.event() {
                event.render(sink, id, baseline)?;
            }
            cursor.advance();
            written += 1;
        }

        Ok(())
    }
}

impl fmt::Debug for TraceBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraceBuffer")
            .field("capacity", &self.capacity())
            .field("head", &self.head)
            .finish_non_exhaustive()
    }
}

/// A newest-to-oldest cursor into a [`TraceBuffer`].
///
/// Cheap to copy and re-derivable at will; holds a generation, not shared
/// state. Two cursors are equal when they reference the same buffer at the
/// same generation.
#[derive(Clone, Copy, Debug)]
pub struct TraceCursor<'a> {
    buffer: &'a TraceBuffer,
    seq: u64,
}

impl<'a> TraceCursor<'a> {
    /// The event under the cursor, or `None` at a boundary.
    #[must_use]
    pub fn event(&self) -> Option<&'a TraceEvent> {
        let boundary = self.buffer.head - self.buffer.len() as u64;
        if self.seq <= boundary || self.seq > self.buffer.head {
            return None;
        }

        self.buffer.slots[((self.seq - 1) & self.buffer.mask) as usize].as_ref()
    }

    /// Steps toward the next-older entry.
    ///
    /// # Panics
    ///
    /// Panics if advanced past the zero generation.
    pub fn advance(&mut self) {
        assert!(self.seq > 0, "trace cursor advanced past the oldest entry");
        self.seq -= 1;
    }

    /// The generation this cursor sits on (the buffer's push count at the
    /// entry's write, plus one).
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.seq
    }

    /// The raw slot index under the cursor. Distinct generations can map to
    /// the same slot index; equality is decided by generation alone.
    #[must_use]
    pub fn slot_index(&self) -> usize {
        ((self.seq.wrapping_sub(1)) & self.buffer.mask) as usize
    }
}

impl PartialEq for TraceCursor<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.buffer, other.buffer) && self.seq == other.seq
    }
}

impl Eq for TraceCursor<'_> {}

#[cfg(test)]
mod tests {
    use super::super::event::TracePayload;
    use super::*;

    fn stamped(timestamp: Timestamp) -> TraceEvent {
        TraceEvent::new(timestamp, 1, TracePayload::Acquiring)
    }

    fn timestamps_newest_first(buffer: &TraceBuffer) -> Vec<Timestamp> {
        let end = buffer.oldest_boundary();
        let mut cursor = buffer.newest_first();
        let mut seen = Vec::new();

        while cursor != end {
            seen.push(cursor.event().unwrap().timestamp);
            cursor.advance();
        }

        seen
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn test_capacity_must_be_power_of_two() {
        let _ = TraceBuffer::new(100);
    }

    #[test]
    fn test_empty_buffer_iterates_nothing() {
        let buffer = TraceBuffer::new(8);

        assert!(buffer.is_empty());
        assert_eq!(buffer.newest_first(), buffer.oldest_boundary());
        assert!(timestamps_newest_first(&buffer).is_empty());
        assert!(buffer.newest().is_none());
    }

    #[test]
    fn test_exact_capacity_round_trip() {
        let mut buffer = TraceBuffer::new(8);
        for timestamp in 1..=8 {
            buffer.push(stamped(timestamp));
        }

        assert_eq!(buffer.len(), 8);
        assert_eq!(
            timestamps_newest_first(&buffer),
            vec![8, 7, 6, 5, 4, 3, 2, 1]
        );
    }

    #[test]
    fn test_overflow_drops_the_oldest() {
        let mut buffer = TraceBuffer::new(8);
        for timestamp in 1..=11 {
            buffer.push(stamped(timestamp));
        }

        // 11 pushes into 8 slots: the earliest 3 are gone.
        assert_eq!(buffer.len(), 8);
        assert_eq!(
            timestamps_newest_first(&buffer),
            vec![11, 10, 9, 8, 7, 6, 5, 4]
        );
    }

    #[test]
    fn test_full_buffer_cursors_share_index_but_differ() {
        let mut buffer = TraceBuffer::new(4);
        for timestamp in 1..=4 {
            buffer.push(stamped(timestamp));
        }

        let mut newest = buffer.newest_first();
        let end = buffer.oldest_boundary();

        // Same slot, different generations: "newest" and "one past oldest"
        // must not collapse on a wrapped ring.
        assert_eq!(newest.slot_index(), end.slot_index());
        assert_ne!(newest, end);
        assert_ne!(newest.generation(), end.generation());

        for _ in 0..4 {
            assert_ne!(newest, end);
            newest.advance();
        }
        assert_eq!(newest, end);
    }

    #[test]
    fn test_cursors_from_different_buffers_never_compare_equal() {
        let a = TraceBuffer::new(4);
        let b = TraceBuffer::new(4);
        assert_ne!(a.newest_first(), b.newest_first());
    }

    #[test]
    fn test_dump_respects_limit_and_order() {
        let mut buffer = TraceBuffer::new(8);
        for timestamp in [100, 200, 300] {
            buffer.push(stamped(timestamp));
        }

        let mut out = Vec::new();
        buffer.dump(&mut out, 0, 0, 2).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("300"));
        assert!(lines[1].contains("200"));
    }
}
