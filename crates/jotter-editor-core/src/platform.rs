//! Platform abstraction traits.
//!
//! These traits define the boundary between the editor logic and its
//! host: cursor handling and UI prompts (`EditorPlatform`), durable
//! storage (`BlockStore`), image upload (`ImageStore`), and the clock
//! driving the debounce timers (`Clock`). The same editor core works in
//! a browser shell, a native shell, or a test harness.

use jotter_blocks::{Block, BlockId, NoteId};
use web_time::Instant;

use crate::error::StoreError;

/// Screen position anchoring the slash-command menu under a block.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MenuAnchor {
    pub x: f32,
    pub y: f32,
}

/// Cursor capability and UI hooks implemented per host toolkit.
pub trait EditorPlatform {
    /// Caret offset (in chars) inside the focused block's text, if a
    /// text field is focused.
    fn cursor_offset(&self) -> Option<usize>;

    /// Move the caret within the focused block's text.
    fn set_cursor_offset(&mut self, offset: usize);

    /// Screen anchor for a block, used to place the slash-command menu.
    fn block_anchor(&self, id: BlockId) -> Option<MenuAnchor>;

    /// Ask the user to confirm removing `count` blocks. Only called for
    /// multi-block deletions.
    fn confirm_removal(&mut self, count: usize) -> bool;
}

/// Persistence collaborator. `save_blocks` is fire-and-forget from the
/// editor's perspective; a failure is logged and never retried here.
pub trait BlockStore {
    fn load_blocks(&mut self, note_id: NoteId) -> Result<Vec<Block>, StoreError>;
    fn save_blocks(&mut self, note_id: NoteId, blocks: &[Block]) -> Result<(), StoreError>;
}

/// Image upload collaborator: bytes in, hosted URL out.
pub trait ImageStore {
    fn upload(&mut self, bytes: &[u8]) -> Result<String, StoreError>;
}

/// Time source for debounce deadlines. Injected so tests can drive the
/// quiescence window deterministically.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// The real wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
