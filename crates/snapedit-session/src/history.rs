//! Canvas snapshots with undo.
//!
//! The history is a stack of full canvas snapshots. Slot 0 holds the image the
//! session was opened with and is never popped or evicted; the top is always
//! the canvas on screen.

use snapedit_core::PixelBuffer;

/// Snapshot stack backing static-mode undo.
#[derive(Debug, Clone)]
pub struct EditHistory {
    /// Snapshots, oldest first. Never empty.
    snapshots: Vec<PixelBuffer>,
    /// Maximum number of snapshots, including the initial one.
    limit: Option<usize>,
}

impl EditHistory {
    /// Create an unbounded history seeded with the initial canvas.
    pub fn new(initial: PixelBuffer) -> Self {
        Self::with_limit(initial, None)
    }

    /// Create a history holding at most `limit` snapshots.
    ///
    /// Limits below 2 are raised to 2 so one edit can always be undone.
    pub fn with_limit(initial: PixelBuffer, limit: Option<usize>) -> Self {
        Self {
            snapshots: vec![initial],
            limit: limit.map(|l| l.max(2)),
        }
    }

    /// Append a snapshot, which becomes the current canvas.
    ///
    /// When a limit is set and exceeded, the oldest snapshot after the
    /// initial one is dropped.
    pub fn push(&mut self, snapshot: PixelBuffer) {
        self.snapshots.push(snapshot);
        if let Some(limit) = self.limit {
            if self.snapshots.len() > limit {
                self.snapshots.remove(1);
            }
        }
    }

    /// Drop the most recent snapshot. Returns `false` at the initial one.
    pub fn undo(&mut self) -> bool {
        if self.snapshots.len() > 1 {
            self.snapshots.pop();
            true
        } else {
            false
        }
    }

    /// The current canvas.
    pub fn top(&self) -> &PixelBuffer {
        // Never empty: `undo` keeps slot 0
        &self.snapshots[self.snapshots.len() - 1]
    }

    pub(crate) fn top_mut(&mut self) -> &mut PixelBuffer {
        let last = self.snapshots.len() - 1;
        &mut self.snapshots[last]
    }

    /// The image the session was opened with.
    pub fn initial(&self) -> &PixelBuffer {
        &self.snapshots[0]
    }

    /// Snapshot at `index`, oldest first.
    pub fn get(&self, index: usize) -> Option<&PixelBuffer> {
        self.snapshots.get(index)
    }

    /// Number of snapshots, including the initial one.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.snapshots.len() > 1
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Bytes held by all snapshots.
    pub fn memory_size(&self) -> usize {
        self.snapshots.iter().map(PixelBuffer::memory_size).sum()
    }
}
