//! Editor actions and keyboard input types.
//!
//! `EditorAction` is the semantic operation vocabulary of the editor,
//! decoupled from how an operation is triggered. `action_for_key` is the
//! pure keymap from a key combination (plus editing context) to an
//! action; hosts convert their native key events into `KeyCombo` and
//! dispatch whatever comes back through `NoteEditor::apply`.

use jotter_blocks::{BlockId, BlockType};

/// Platform-agnostic key representation, trimmed to the keys the block
/// editor reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Character(char),
    Backspace,
    Delete,
    Enter,
    Escape,
    ArrowUp,
    ArrowDown,
}

/// Modifier key state for a key combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        ctrl: false,
        alt: false,
        shift: true,
        meta: false,
    };

    pub const META: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: true,
    };

    pub const CTRL_SHIFT: Self = Self {
        ctrl: true,
        alt: false,
        shift: true,
        meta: false,
    };

    pub const META_SHIFT: Self = Self {
        ctrl: false,
        alt: false,
        shift: true,
        meta: true,
    };

    /// The primary modifier for the platform (Cmd on Mac, Ctrl elsewhere).
    pub fn primary(is_mac: bool) -> Self {
        if is_mac { Self::META } else { Self::CTRL }
    }

    pub fn primary_shift(is_mac: bool) -> Self {
        if is_mac {
            Self::META_SHIFT
        } else {
            Self::CTRL_SHIFT
        }
    }
}

/// A key plus its modifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }
}

/// Semantic operations on the note being edited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorAction {
    Undo,
    Redo,
    SelectAll,
    /// Delete every selected block (with confirmation for more than one).
    DeleteSelection,
    /// Clear selection and close the slash menu.
    Escape,
    /// Enter: split the focused block at the caret.
    SplitBlock { block_id: BlockId },
    /// Backspace on an empty block: remove it, focus the previous one.
    MergeBackspace { block_id: BlockId },
    /// Insert a fresh block; `None` appends at the end.
    InsertBlock {
        block_type: BlockType,
        index: Option<usize>,
    },
    DuplicateBlock { block_id: BlockId },
    MoveBlock { block_id: BlockId, to: usize },
    /// Cmd/Ctrl+ArrowUp: move focus to the block above.
    FocusPrevious { block_id: BlockId },
    /// Cmd/Ctrl+ArrowDown: move focus to the block below.
    FocusNext { block_id: BlockId },
}

/// Editing context the keymap needs to resolve ambiguous keys.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyContext {
    /// Block whose text field has focus, if any.
    pub focused_block: Option<BlockId>,
    /// Whether that block's content is currently empty.
    pub focused_content_empty: bool,
    /// Whether focus is inside an actively-edited text field.
    pub editing_text: bool,
    /// Number of currently selected blocks.
    pub selection_count: usize,
    /// Total number of blocks in the note.
    pub block_count: usize,
    pub is_mac: bool,
}

/// Resolve a key combination to an editor action, if it maps to one.
pub fn action_for_key(combo: KeyCombo, ctx: &KeyContext) -> Option<EditorAction> {
    let primary = Modifiers::primary(ctx.is_mac);
    let primary_shift = Modifiers::primary_shift(ctx.is_mac);

    match combo.key {
        Key::Character('z') if combo.modifiers == primary => Some(EditorAction::Undo),
        Key::Character('z') if combo.modifiers == primary_shift => Some(EditorAction::Redo),
        Key::Character('y') if combo.modifiers == primary => Some(EditorAction::Redo),
        Key::Character('a') if combo.modifiers == primary => Some(EditorAction::SelectAll),
        Key::Escape => Some(EditorAction::Escape),
        Key::Enter if combo.modifiers == Modifiers::NONE => ctx
            .focused_block
            .map(|block_id| EditorAction::SplitBlock { block_id }),
        Key::Backspace | Key::Delete if combo.modifiers == Modifiers::NONE => {
            // Selection deletion wins unless a single block is being
            // text-edited (then Backspace is ordinary text editing).
            if ctx.selection_count > 0 && (!ctx.editing_text || ctx.selection_count > 1) {
                return Some(EditorAction::DeleteSelection);
            }
            if combo.key == Key::Backspace
                && ctx.focused_content_empty
                && ctx.block_count > 1
            {
                return ctx
                    .focused_block
                    .map(|block_id| EditorAction::MergeBackspace { block_id });
            }
            None
        }
        Key::ArrowUp if combo.modifiers == primary => ctx
            .focused_block
            .map(|block_id| EditorAction::FocusPrevious { block_id }),
        Key::ArrowDown if combo.modifiers == primary => ctx
            .focused_block
            .map(|block_id| EditorAction::FocusNext { block_id }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> KeyContext {
        KeyContext {
            focused_block: Some(BlockId::new()),
            block_count: 3,
            ..KeyContext::default()
        }
    }

    #[test]
    fn test_undo_redo_bindings() {
        let ctx = ctx();
        let undo = KeyCombo::with_modifiers(Key::Character('z'), Modifiers::CTRL);
        assert_eq!(action_for_key(undo, &ctx), Some(EditorAction::Undo));

        let redo_shift = KeyCombo::with_modifiers(Key::Character('z'), Modifiers::CTRL_SHIFT);
        assert_eq!(action_for_key(redo_shift, &ctx), Some(EditorAction::Redo));

        let redo_y = KeyCombo::with_modifiers(Key::Character('y'), Modifiers::CTRL);
        assert_eq!(action_for_key(redo_y, &ctx), Some(EditorAction::Redo));
    }

    #[test]
    fn test_mac_uses_meta_as_primary() {
        let mut ctx = ctx();
        ctx.is_mac = true;
        let meta_z = KeyCombo::with_modifiers(Key::Character('z'), Modifiers::META);
        assert_eq!(action_for_key(meta_z, &ctx), Some(EditorAction::Undo));

        let ctrl_z = KeyCombo::with_modifiers(Key::Character('z'), Modifiers::CTRL);
        assert_eq!(action_for_key(ctrl_z, &ctx), None);
    }

    #[test]
    fn test_backspace_prefers_selection_deletion() {
        let mut ctx = ctx();
        ctx.selection_count = 2;
        ctx.editing_text = true;
        let backspace = KeyCombo::new(Key::Backspace);
        assert_eq!(
            action_for_key(backspace, &ctx),
            Some(EditorAction::DeleteSelection)
        );

        // A single selected block while editing text: plain text editing.
        ctx.selection_count = 1;
        assert_eq!(action_for_key(backspace, &ctx), None);

        // Not editing text: even one selected block deletes.
        ctx.editing_text = false;
        assert_eq!(
            action_for_key(backspace, &ctx),
            Some(EditorAction::DeleteSelection)
        );
    }

    #[test]
    fn test_backspace_on_empty_block_merges() {
        let mut ctx = ctx();
        ctx.focused_content_empty = true;
        ctx.editing_text = true;
        let backspace = KeyCombo::new(Key::Backspace);
        assert!(matches!(
            action_for_key(backspace, &ctx),
            Some(EditorAction::MergeBackspace { .. })
        ));

        // The only block in the note never merges away.
        ctx.block_count = 1;
        assert_eq!(action_for_key(backspace, &ctx), None);
    }

    #[test]
    fn test_enter_splits_focused_block() {
        let ctx = ctx();
        assert!(matches!(
            action_for_key(KeyCombo::new(Key::Enter), &ctx),
            Some(EditorAction::SplitBlock { .. })
        ));

        // Shift+Enter is left to the host (soft break).
        let shift_enter = KeyCombo::with_modifiers(Key::Enter, Modifiers::SHIFT);
        assert_eq!(action_for_key(shift_enter, &ctx), None);
    }
}
