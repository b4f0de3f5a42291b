//! Chronological merge of several per-thread trace buffers.

use std::io;

use super::buffer::{TraceBuffer, TraceCursor};
use super::event::{Timestamp, TraceEvent};

/// One buffer's share of the merge: a live cursor and its stop boundary.
/// Lanes share no mutable state with each other.
struct Lane<'a> {
    cursor: TraceCursor<'a>,
    end: TraceCursor<'a>,
}

/// An iterator producing one globally time-descending event sequence from
/// several independently time-descending buffers.
///
/// Each step linearly rescans all still-live lanes and emits the first lane
/// whose timestamp is maximal, so ties break to the lowest buffer index.
/// A heap would be overkill: the lane count is the participant count.
///
/// Yields `(buffer_index, event)` pairs; consumed once per diagnostic dump.
pub struct MergedTrace<'a> {
    lanes: Vec<Lane<'a>>,
}

impl<'a> MergedTrace<'a> {
    /// Builds a merge over the given buffers, newest entries first.
    #[must_use]
    pub fn new(buffers: &[&'a TraceBuffer]) -> Self {
        Self {
            lanes: buffers
                .iter()
                .map(|buffer| Lane {
                    cursor: buffer.newest_first(),
                    end: buffer.oldest_boundary(),
                })
                .collect(),
        }
    }
}

impl<'a> Iterator for MergedTrace<'a> {
    type Item = (usize, &'a TraceEvent);

    fn next(&mut self) -> Option<Self::Item> {
        let mut leader: Option<(usize, &'a TraceEvent)> = None;

        for (index, lane) in self.lanes.iter().enumerate() {
            if lane.cursor == lane.end {
                continue;
            }

            let Some(event) = lane.cursor.event() else {
                continue;
            };

            // Strict comparison keeps the first maximal lane found.
            match leader {
                Some((_, best)) if event.timestamp <= best.timestamp => {}
                _ => leader = Some((index, event)),
            }
        }

        let (index, event) = leader?;
        self.lanes[index].cursor.advance();

        Some((index, event))
    }
}

/// Renders the full merged history of `buffers` into `sink`, each line
/// tagged with its originating buffer index.
///
/// # Errors
///
/// Propagates write failures from the sink.
pub fn dump_merged<W: io::Write>(
    buffers: &[&TraceBuffer],
    sink: &mut W,
    baseline: Timestamp,
) -> io::Result<()> {
    for (index, event) in MergedTrace::new(buffers) {
        event.render(sink, index, baseline)?;
    }

    Ok(())
}
