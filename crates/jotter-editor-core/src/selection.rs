//! Multi-block selection and drag-reorder state.
//!
//! Tracks which blocks are selected (plain click, shift range,
//! ctrl/cmd toggle), the range anchor, and the block being dragged.
//! Structural changes to the list itself are requested from the
//! orchestrator; this controller only decides *what* moves where.

use std::collections::HashSet;

use jotter_blocks::{Block, BlockId, position_of};

/// Modifier state of a block click. `toggle` is ctrl on most platforms,
/// cmd on macOS.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClickModifiers {
    pub shift: bool,
    pub toggle: bool,
}

#[derive(Debug, Default)]
pub struct SelectionState {
    selected: HashSet<BlockId>,
    anchor: Option<BlockId>,
    dragged: Option<BlockId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply click semantics against the current block list.
    pub fn click(&mut self, id: BlockId, modifiers: ClickModifiers, blocks: &[Block]) {
        if modifiers.shift {
            if let Some(anchor) = self.anchor {
                if let (Some(a), Some(b)) = (position_of(blocks, anchor), position_of(blocks, id))
                {
                    let (start, end) = (a.min(b), a.max(b));
                    self.selected = blocks[start..=end].iter().map(|block| block.id).collect();
                    return;
                }
            }
            // No usable anchor: fall through to a plain click.
        }
        if modifiers.toggle {
            if !self.selected.remove(&id) {
                self.selected.insert(id);
            }
            self.anchor = Some(id);
        } else {
            self.selected.clear();
            self.selected.insert(id);
            self.anchor = Some(id);
        }
    }

    pub fn select_all(&mut self, blocks: &[Block]) {
        self.selected = blocks.iter().map(|block| block.id).collect();
    }

    /// Clear the selection. The range anchor survives, matching the
    /// behavior of clearing via Escape.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Drop a block from the selection bookkeeping after it was deleted.
    pub fn forget(&mut self, id: BlockId) {
        self.selected.remove(&id);
        if self.anchor == Some(id) {
            self.anchor = None;
        }
        if self.dragged == Some(id) {
            self.dragged = None;
        }
    }

    pub fn is_selected(&self, id: BlockId) -> bool {
        self.selected.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.selected.iter().copied()
    }

    pub fn anchor(&self) -> Option<BlockId> {
        self.anchor
    }

    pub fn drag_start(&mut self, id: BlockId) {
        self.dragged = Some(id);
    }

    pub fn dragged(&self) -> Option<BlockId> {
        self.dragged
    }

    /// Resolve a drop gesture. Returns the move to perform, or None for
    /// the no-op cases (nothing dragged, dropped on itself, stale ids).
    /// Clears the drag state only when a move is actually produced.
    pub fn drop_on(&mut self, target: BlockId, blocks: &[Block]) -> Option<(BlockId, usize)> {
        let dragged = self.dragged?;
        if dragged == target {
            return None;
        }
        let target_index = position_of(blocks, target)?;
        position_of(blocks, dragged)?;
        self.dragged = None;
        Some((dragged, target_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jotter_blocks::{BlockType, NoteId};

    fn blocks(n: usize) -> Vec<Block> {
        let note = NoteId::new();
        (0..n)
            .map(|i| Block::new(note, BlockType::Paragraph, format!("b{i}"), i as u32))
            .collect()
    }

    #[test]
    fn test_plain_click_is_singleton() {
        let list = blocks(3);
        let mut sel = SelectionState::new();
        sel.click(list[0].id, ClickModifiers::default(), &list);
        sel.click(list[2].id, ClickModifiers::default(), &list);
        assert_eq!(sel.len(), 1);
        assert!(sel.is_selected(list[2].id));
        assert_eq!(sel.anchor(), Some(list[2].id));
    }

    #[test]
    fn test_shift_click_selects_range_both_directions() {
        let list = blocks(4);
        let mut sel = SelectionState::new();

        // Anchor at A, shift-click C: {A, B, C}.
        sel.click(list[0].id, ClickModifiers::default(), &list);
        sel.click(
            list[2].id,
            ClickModifiers {
                shift: true,
                toggle: false,
            },
            &list,
        );
        assert_eq!(sel.len(), 3);
        for block in &list[0..3] {
            assert!(sel.is_selected(block.id));
        }
        assert!(!sel.is_selected(list[3].id));

        // Anchor at C (still), shift-click A selects the same range.
        let mut sel = SelectionState::new();
        sel.click(list[2].id, ClickModifiers::default(), &list);
        sel.click(
            list[0].id,
            ClickModifiers {
                shift: true,
                toggle: false,
            },
            &list,
        );
        assert_eq!(sel.len(), 3);
        assert!(sel.is_selected(list[1].id));
    }

    #[test]
    fn test_toggle_click_flips_membership() {
        let list = blocks(3);
        let toggle = ClickModifiers {
            shift: false,
            toggle: true,
        };
        let mut sel = SelectionState::new();
        sel.click(list[0].id, ClickModifiers::default(), &list);
        sel.click(list[1].id, toggle, &list);
        assert_eq!(sel.len(), 2);

        sel.click(list[1].id, toggle, &list);
        assert_eq!(sel.len(), 1);
        assert!(sel.is_selected(list[0].id));
        // Anchor follows the toggled block.
        assert_eq!(sel.anchor(), Some(list[1].id));
    }

    #[test]
    fn test_select_all_and_clear() {
        let list = blocks(3);
        let mut sel = SelectionState::new();
        sel.select_all(&list);
        assert_eq!(sel.len(), 3);
        sel.clear();
        assert!(sel.is_empty());
    }

    #[test]
    fn test_drop_on_self_is_noop_and_keeps_drag() {
        let list = blocks(3);
        let mut sel = SelectionState::new();
        sel.drag_start(list[1].id);
        assert_eq!(sel.drop_on(list[1].id, &list), None);
        assert_eq!(sel.dragged(), Some(list[1].id));
    }

    #[test]
    fn test_drop_resolves_target_position() {
        let list = blocks(3);
        let mut sel = SelectionState::new();
        assert_eq!(sel.drop_on(list[0].id, &list), None);

        sel.drag_start(list[2].id);
        assert_eq!(sel.drop_on(list[0].id, &list), Some((list[2].id, 0)));
        assert_eq!(sel.dragged(), None);
    }
}
