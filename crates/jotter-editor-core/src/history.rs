//! Undo/redo over whole-block-list snapshots, debounced.
//!
//! Rapid edits coalesce: `record` re-arms a pending snapshot on every
//! call, and only once the quiescence window has elapsed does `settle`
//! commit it. Undo granularity is therefore "burst of edits", not
//! "keystroke". The log is linear and truncatable: committing after an
//! undo discards the redo branch.

use std::time::Duration;

use jotter_blocks::Block;
use web_time::Instant;

/// Quiescence window before a pending snapshot commits.
pub const DEBOUNCE: Duration = Duration::from_millis(500);

/// Maximum retained entries; the oldest is evicted beyond this.
pub const MAX_ENTRIES: usize = 50;

/// One committed snapshot of the whole block list.
#[derive(Clone, Debug)]
pub struct HistoryEntry {
    pub blocks: Vec<Block>,
    pub recorded_at: Instant,
}

#[derive(Clone, Debug)]
struct Pending {
    blocks: Vec<Block>,
    due: Instant,
}

/// Bounded, debounced undo/redo log.
#[derive(Debug, Default)]
pub struct EditHistory {
    entries: Vec<HistoryEntry>,
    cursor: Option<usize>,
    pending: Option<Pending>,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the log with the note's initial block list so the very first
    /// edit has something to undo back to. No-op once the log is
    /// non-empty or when there is nothing to seed.
    pub fn seed(&mut self, blocks: &[Block], now: Instant) {
        if self.entries.is_empty() && !blocks.is_empty() {
            self.entries.push(HistoryEntry {
                blocks: blocks.to_vec(),
                recorded_at: now,
            });
            self.cursor = Some(0);
        }
    }

    /// Schedule a snapshot of `blocks`. Re-arms the pending deadline, so
    /// only the last call of a burst survives to commit.
    pub fn record(&mut self, blocks: &[Block], now: Instant) {
        self.pending = Some(Pending {
            blocks: blocks.to_vec(),
            due: now + DEBOUNCE,
        });
    }

    /// Commit the pending snapshot if its quiescence window has elapsed.
    /// Returns true when an entry was committed.
    pub fn settle(&mut self, now: Instant) -> bool {
        if self.pending.as_ref().is_some_and(|p| p.due <= now) {
            self.flush()
        } else {
            false
        }
    }

    /// Commit the pending snapshot immediately, regardless of deadline.
    pub fn flush(&mut self) -> bool {
        match self.pending.take() {
            Some(Pending { blocks, due }) => {
                self.commit(blocks, due);
                true
            }
            None => false,
        }
    }

    fn commit(&mut self, blocks: Vec<Block>, at: Instant) {
        // Truncate the redo branch, if any.
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.entries.truncate(keep);

        self.entries.push(HistoryEntry {
            blocks,
            recorded_at: at,
        });
        if self.entries.len() > MAX_ENTRIES {
            self.entries.remove(0);
        }
        self.cursor = Some(self.entries.len() - 1);
        tracing::trace!(
            entries = self.entries.len(),
            cursor = self.cursor,
            "history snapshot committed"
        );
    }

    /// Step back one entry. Any pending burst is committed first so it
    /// becomes the redo target instead of resurfacing later.
    pub fn undo(&mut self) -> Option<Vec<Block>> {
        self.flush();
        let cursor = self.cursor?;
        if cursor == 0 {
            return None;
        }
        self.cursor = Some(cursor - 1);
        Some(self.entries[cursor - 1].blocks.clone())
    }

    /// Step forward one entry. A pending burst invalidates the redo
    /// branch, exactly as its commit would.
    pub fn redo(&mut self) -> Option<Vec<Block>> {
        self.flush();
        let cursor = self.cursor?;
        if cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor = Some(cursor + 1);
        Some(self.entries[cursor + 1].blocks.clone())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0) || self.pending.is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.pending.is_none()
            && self
                .cursor
                .is_some_and(|c| c + 1 < self.entries.len())
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Deadline of the pending snapshot, for the host's timer.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
