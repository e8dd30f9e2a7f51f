//! The note editor orchestrator.
//!
//! `NoteEditor` owns the canonical block list for one note-editing
//! session and composes the live formatting engine, the history
//! manager, the selection controller, and the slash menu. Hosts feed it
//! `EditorAction`s and content-change notifications; it mutates the
//! list, records a debounced history snapshot, and queues typed effects
//! for the host to apply (focus moves, menu visibility). All mutations
//! are synchronous with the triggering call - the only timers involved
//! are the debounce deadlines surfaced through `tick`.

use jotter_blocks::{Block, BlockId, BlockType, NoteId, parse_markdown, position_of, renumber};
use tracing::{debug, warn};
use web_time::Instant;

use crate::actions::EditorAction;
use crate::error::{EditorError, StoreError};
use crate::format::{FormatOutcome, evaluate};
use crate::history::EditHistory;
use crate::platform::{BlockStore, Clock, EditorPlatform, ImageStore, MenuAnchor, SystemClock};
use crate::selection::{ClickModifiers, SelectionState};
use crate::slash::{SlashCommand, SlashMenu};

/// Where the host should place the caret after a focus effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorPlacement {
    Start,
    End,
    Offset(usize),
}

/// Typed effects for the host shell, drained after each call. These
/// replace the source design's process-global event channel: every
/// effect is scoped to this editor instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EditorEffect {
    FocusBlock {
        block_id: BlockId,
        cursor: CursorPlacement,
    },
    OpenSlashMenu {
        anchor: MenuAnchor,
    },
    CloseSlashMenu,
}

pub struct NoteEditor<C: Clock = SystemClock> {
    note_id: NoteId,
    blocks: Vec<Block>,
    history: EditHistory,
    selection: SelectionState,
    slash: SlashMenu,
    effects: Vec<EditorEffect>,
    focused: Option<BlockId>,
    dirty: bool,
    clock: C,
}

impl NoteEditor<SystemClock> {
    /// Fresh editor for an empty note.
    pub fn new(note_id: NoteId) -> Self {
        Self::with_clock(note_id, SystemClock)
    }

    /// Editor over blocks loaded from the persistence collaborator.
    pub fn load(note_id: NoteId, store: &mut dyn BlockStore) -> Result<Self, StoreError> {
        let blocks = store.load_blocks(note_id)?;
        Ok(Self::with_blocks(note_id, blocks, SystemClock))
    }
}

impl<C: Clock> NoteEditor<C> {
    pub fn with_clock(note_id: NoteId, clock: C) -> Self {
        Self {
            note_id,
            blocks: Vec::new(),
            history: EditHistory::new(),
            selection: SelectionState::new(),
            slash: SlashMenu::new(),
            effects: Vec::new(),
            focused: None,
            dirty: false,
            clock,
        }
    }

    /// Editor over an existing block list. History is seeded with it so
    /// the first edit can be undone back to the loaded state.
    pub fn with_blocks(note_id: NoteId, mut blocks: Vec<Block>, clock: C) -> Self {
        renumber(&mut blocks);
        let mut editor = Self::with_clock(note_id, clock);
        editor.history.seed(&blocks, editor.clock.now());
        editor.blocks = blocks;
        editor
    }

    pub fn note_id(&self) -> NoteId {
        self.note_id
    }

    /// The canonical block list. Everything the UI renders derives from
    /// this and only this.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn slash_menu(&self) -> &SlashMenu {
        &self.slash
    }

    pub fn slash_menu_mut(&mut self) -> &mut SlashMenu {
        &mut self.slash
    }

    pub fn focused_block(&self) -> Option<BlockId> {
        self.focused
    }

    pub fn set_focused_block(&mut self, id: Option<BlockId>) {
        self.focused = id;
    }

    /// Effects queued since the last drain, in order.
    pub fn drain_effects(&mut self) -> Vec<EditorEffect> {
        std::mem::take(&mut self.effects)
    }

    /// Whether there are edits the persistence collaborator has not seen.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Settle the history debounce; returns the next pending deadline so
    /// the host can (re)arm its timer.
    pub fn tick(&mut self, now: Instant) -> Option<Instant> {
        self.history.settle(now);
        self.history.next_deadline()
    }

    // === Keyboard dispatch ===

    /// Apply a semantic action. Returns true if the editor handled it
    /// (the host should then swallow the originating event).
    pub fn apply(&mut self, action: EditorAction, platform: &mut dyn EditorPlatform) -> bool {
        match action {
            EditorAction::Undo => self.undo(),
            EditorAction::Redo => self.redo(),
            EditorAction::SelectAll => {
                self.selection.select_all(&self.blocks);
                true
            }
            EditorAction::DeleteSelection => self.delete_selection(platform) > 0,
            EditorAction::Escape => {
                self.escape();
                true
            }
            EditorAction::SplitBlock { block_id } => {
                self.split_block(block_id, platform).is_some()
            }
            EditorAction::MergeBackspace { block_id } => self.merge_backspace(block_id),
            EditorAction::InsertBlock { block_type, index } => {
                self.insert_block(block_type, index);
                true
            }
            EditorAction::DuplicateBlock { block_id } => self.duplicate_block(block_id).is_some(),
            EditorAction::MoveBlock { block_id, to } => self.move_block(block_id, to),
            EditorAction::FocusPrevious { block_id } => self.focus_neighbor(block_id, -1),
            EditorAction::FocusNext { block_id } => self.focus_neighbor(block_id, 1),
        }
    }

    // === Structural operations ===

    /// Insert a fresh empty block; `None` appends at the end. The new
    /// block receives focus.
    pub fn insert_block(&mut self, block_type: BlockType, index: Option<usize>) -> BlockId {
        let index = index.unwrap_or(self.blocks.len()).min(self.blocks.len());
        let block = Block::new(self.note_id, block_type, "", index as u32);
        let id = block.id;
        self.blocks.insert(index, block);
        self.after_structural_change();
        debug!(%id, %block_type, index, "inserted block");
        self.effects.push(EditorEffect::FocusBlock {
            block_id: id,
            cursor: CursorPlacement::End,
        });
        id
    }

    /// Enter: split a block at the caret. Content after the caret moves
    /// into the new block; a caret at the end yields an empty one. List
    /// blocks continue their list type, everything else starts a
    /// paragraph.
    pub fn split_block(
        &mut self,
        block_id: BlockId,
        platform: &mut dyn EditorPlatform,
    ) -> Option<BlockId> {
        let index = position_of(&self.blocks, block_id)?;
        let (new_type, tail) = {
            let block = &self.blocks[index];
            let new_type = if block.block_type.is_list() {
                block.block_type
            } else {
                BlockType::Paragraph
            };
            let char_len = block.content.chars().count();
            let offset = platform.cursor_offset().unwrap_or(char_len).min(char_len);
            let split_at = block
                .content
                .char_indices()
                .nth(offset)
                .map(|(byte, _)| byte)
                .unwrap_or(block.content.len());
            (new_type, block.content[split_at..].to_string())
        };

        if !tail.is_empty() {
            let head_len = self.blocks[index].content.len() - tail.len();
            let head = self.blocks[index].content[..head_len].to_string();
            self.blocks[index].set_content(head);
        }

        let new_block = Block::new(self.note_id, new_type, tail, (index + 1) as u32);
        let new_id = new_block.id;
        self.blocks.insert(index + 1, new_block);
        self.after_structural_change();
        debug!(from = %block_id, to = %new_id, "split block");
        self.effects.push(EditorEffect::FocusBlock {
            block_id: new_id,
            cursor: CursorPlacement::Start,
        });
        Some(new_id)
    }

    /// Backspace on an empty block: remove it and focus the end of the
    /// previous block. No-op on the first block or a lone block.
    pub fn merge_backspace(&mut self, block_id: BlockId) -> bool {
        let Some(index) = position_of(&self.blocks, block_id) else {
            return false;
        };
        if index == 0 || self.blocks.len() <= 1 || !self.blocks[index].is_empty() {
            return false;
        }
        let previous = self.blocks[index - 1].id;
        self.blocks.remove(index);
        self.selection.forget(block_id);
        self.after_structural_change();
        self.effects.push(EditorEffect::FocusBlock {
            block_id: previous,
            cursor: CursorPlacement::End,
        });
        true
    }

    /// Remove a single block without confirmation (the per-block trash
    /// affordance).
    pub fn delete_block(&mut self, block_id: BlockId) -> bool {
        let Some(index) = position_of(&self.blocks, block_id) else {
            return false;
        };
        self.blocks.remove(index);
        self.selection.forget(block_id);
        self.after_structural_change();
        debug!(%block_id, "deleted block");
        true
    }

    /// Insert a copy of a block right after it.
    pub fn duplicate_block(&mut self, block_id: BlockId) -> Option<BlockId> {
        let index = position_of(&self.blocks, block_id)?;
        let copy = self.blocks[index].duplicate();
        let copy_id = copy.id;
        self.blocks.insert(index + 1, copy);
        self.after_structural_change();
        self.effects.push(EditorEffect::FocusBlock {
            block_id: copy_id,
            cursor: CursorPlacement::End,
        });
        Some(copy_id)
    }

    /// Move a block to a new position (clamped).
    pub fn move_block(&mut self, block_id: BlockId, to: usize) -> bool {
        let Some(from) = position_of(&self.blocks, block_id) else {
            return false;
        };
        let to = to.min(self.blocks.len() - 1);
        if from == to {
            return false;
        }
        let block = self.blocks.remove(from);
        self.blocks.insert(to, block);
        self.after_structural_change();
        debug!(%block_id, from, to, "moved block");
        true
    }

    /// Delete every selected block. Selections larger than one require
    /// the platform's confirmation; a declined prompt aborts with no
    /// mutation. Returns the number of blocks removed.
    pub fn delete_selection(&mut self, platform: &mut dyn EditorPlatform) -> usize {
        let count = self.selection.len();
        if count == 0 {
            return 0;
        }
        if count > 1 && !platform.confirm_removal(count) {
            return 0;
        }
        self.blocks.retain(|b| !self.selection.is_selected(b.id));
        self.selection.clear();
        self.after_structural_change();
        debug!(count, "deleted selection");
        count
    }

    // === Selection and drag ===

    pub fn click_block(&mut self, id: BlockId, modifiers: ClickModifiers) {
        self.selection.click(id, modifiers, &self.blocks);
    }

    pub fn drag_start(&mut self, id: BlockId) {
        self.selection.drag_start(id);
    }

    /// Complete a drag gesture onto `target`.
    pub fn drop_on(&mut self, target: BlockId) -> bool {
        match self.selection.drop_on(target, &self.blocks) {
            Some((dragged, to)) => self.move_block(dragged, to),
            None => false,
        }
    }

    /// Escape: clear the selection and close the slash menu.
    pub fn escape(&mut self) {
        self.selection.clear();
        self.close_slash_menu();
    }

    // === Content changes ===

    /// Route a keystroke's resulting content through the live formatting
    /// engine and apply whatever it decided.
    pub fn on_content_changed(
        &mut self,
        block_id: BlockId,
        new_content: &str,
        platform: &mut dyn EditorPlatform,
    ) {
        let Some(index) = position_of(&self.blocks, block_id) else {
            return;
        };

        let outcome = evaluate(&self.blocks[index], new_content);

        if outcome == FormatOutcome::SlashTrigger {
            // Store the raw content (the menu apply strips the slash).
            self.blocks[index].set_content(new_content);
            let anchor = platform.block_anchor(block_id).unwrap_or_default();
            self.slash.open_at(anchor);
            self.effects.push(EditorEffect::OpenSlashMenu { anchor });
            self.after_content_change();
            return;
        }
        self.close_slash_menu();

        match outcome {
            FormatOutcome::SlashTrigger => {}
            FormatOutcome::LinkBlock { url } => {
                let block = &mut self.blocks[index];
                block.set_block_type(BlockType::Link);
                block.set_content(url);
                self.effects.push(EditorEffect::FocusBlock {
                    block_id,
                    cursor: CursorPlacement::End,
                });
                debug!(%block_id, "converted block to link");
            }
            FormatOutcome::InlineLink { content } => {
                let block = &mut self.blocks[index];
                block.set_content(content);
                block.mark_inline_link();
                debug!(%block_id, "converted trailing url to inline link");
            }
            FormatOutcome::Convert {
                block_type,
                content,
            } => {
                let block = &mut self.blocks[index];
                block.set_block_type(block_type);
                if block_type != BlockType::Divider {
                    block.set_content(content);
                }
                self.effects.push(EditorEffect::FocusBlock {
                    block_id,
                    cursor: CursorPlacement::End,
                });
                debug!(%block_id, %block_type, "markdown prefix conversion");
            }
            FormatOutcome::Plain => {
                self.blocks[index].set_content(new_content);
            }
        }
        self.after_content_change();
    }

    /// Apply a slash-menu command to the focused block: strip the
    /// trailing `/`, convert the type, close the menu, refocus.
    pub fn apply_slash_command(&mut self, command: &SlashCommand) -> bool {
        let Some(block_id) = self.focused else {
            return false;
        };
        let Some(index) = position_of(&self.blocks, block_id) else {
            return false;
        };

        let block = &mut self.blocks[index];
        let mut content = block.content.clone();
        if content.ends_with('/') {
            content.pop();
        }
        block.set_block_type(command.block_type);
        if command.block_type != BlockType::Divider {
            block.set_content(content);
        }
        self.close_slash_menu();
        self.effects.push(EditorEffect::FocusBlock {
            block_id,
            cursor: CursorPlacement::End,
        });
        self.after_content_change();
        debug!(%block_id, command = command.id, "applied slash command");
        true
    }

    // === History ===

    /// Install the previous history snapshot as the canonical list.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(blocks) => {
                self.install(blocks);
                true
            }
            None => false,
        }
    }

    /// Install the next history snapshot as the canonical list.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(blocks) => {
                self.install(blocks);
                true
            }
            None => false,
        }
    }

    fn install(&mut self, blocks: Vec<Block>) {
        self.blocks = blocks;
        self.selection.clear();
        self.dirty = true;
    }

    // === Import ===

    /// Import a markdown file: validate the name and encoding, parse,
    /// and append the resulting blocks after the existing ones. Errors
    /// leave the editor untouched.
    pub fn import_markdown_file(
        &mut self,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<usize, EditorError> {
        let lower = file_name.to_ascii_lowercase();
        if !lower.ends_with(".md") && !lower.ends_with(".markdown") {
            return Err(EditorError::UnsupportedFile(file_name.to_string()));
        }
        let text = std::str::from_utf8(bytes).map_err(|_| EditorError::InvalidEncoding)?;
        if text.is_empty() {
            return Err(EditorError::EmptyFile);
        }
        Ok(self.import_markdown(text))
    }

    /// Parse markdown text and append the blocks. Returns how many were
    /// added.
    pub fn import_markdown(&mut self, text: &str) -> usize {
        let imported = parse_markdown(self.note_id, text);
        let count = imported.len();
        self.blocks.extend(imported);
        self.after_structural_change();
        debug!(count, total = self.blocks.len(), "imported markdown");
        count
    }

    // === Collaborators ===

    /// Upload image bytes through the collaborator and install the
    /// returned URL as the block's content. A failed upload changes
    /// nothing and is reported to the caller for its alert.
    pub fn upload_image(
        &mut self,
        block_id: BlockId,
        bytes: &[u8],
        store: &mut dyn ImageStore,
    ) -> Result<(), EditorError> {
        let Some(index) = position_of(&self.blocks, block_id) else {
            return Err(EditorError::UnknownBlock(block_id));
        };
        match store.upload(bytes) {
            Ok(url) => {
                self.blocks[index].set_content(url);
                self.after_content_change();
                Ok(())
            }
            Err(err) => {
                warn!(%block_id, %err, "image upload failed");
                Err(EditorError::Upload(err.to_string()))
            }
        }
    }

    /// Push the canonical list to the persistence collaborator.
    /// Fire-and-forget: a failure is logged and the in-memory state
    /// (list and history) is untouched, so nothing is lost.
    pub fn sync(&mut self, store: &mut dyn BlockStore) {
        if !self.dirty {
            return;
        }
        match store.save_blocks(self.note_id, &self.blocks) {
            Ok(()) => {
                self.dirty = false;
                debug!(blocks = self.blocks.len(), "saved blocks");
            }
            Err(err) => {
                warn!(%err, "saving blocks failed; keeping in-memory edits");
            }
        }
    }

    // === Internals ===

    fn focus_neighbor(&mut self, block_id: BlockId, direction: isize) -> bool {
        let Some(index) = position_of(&self.blocks, block_id) else {
            return false;
        };
        let Some(neighbor) = index
            .checked_add_signed(direction)
            .and_then(|i| self.blocks.get(i))
        else {
            return false;
        };
        self.effects.push(EditorEffect::FocusBlock {
            block_id: neighbor.id,
            cursor: CursorPlacement::End,
        });
        true
    }

    fn close_slash_menu(&mut self) {
        if self.slash.is_open() {
            self.slash.close();
            self.effects.push(EditorEffect::CloseSlashMenu);
        }
    }

    fn after_structural_change(&mut self) {
        renumber(&mut self.blocks);
        self.record();
    }

    fn after_content_change(&mut self) {
        self.record();
    }

    fn record(&mut self) {
        self.history.record(&self.blocks, self.clock.now());
        self.dirty = true;
    }
}
