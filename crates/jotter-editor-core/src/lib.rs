//! jotter-editor-core: framework-agnostic note editor logic.
//!
//! This crate provides:
//! - `NoteEditor` - the orchestrator owning the canonical block list
//! - live markdown formatting while typing (`format`)
//! - debounced whole-list undo/redo history (`history`)
//! - multi-block selection and drag reorder (`selection`)
//! - the slash-command menu state machine (`slash`)
//! - platform/persistence traits a host shell implements (`platform`)
//!
//! No UI toolkit dependency: hosts feed `EditorAction`s and content
//! changes in, and drain typed `EditorEffect`s out. One editor instance
//! is one note-editing session; nothing is process-global.

pub mod actions;
pub mod editor;
pub mod error;
pub mod format;
pub mod history;
pub mod platform;
pub mod selection;
pub mod slash;

pub use actions::{EditorAction, Key, KeyCombo, KeyContext, Modifiers, action_for_key};
pub use editor::{CursorPlacement, EditorEffect, NoteEditor};
pub use error::{EditorError, StoreError};
pub use format::FormatOutcome;
pub use history::{EditHistory, HistoryEntry};
pub use platform::{BlockStore, Clock, EditorPlatform, ImageStore, MenuAnchor, SystemClock};
pub use selection::{ClickModifiers, SelectionState};
pub use slash::{SLASH_COMMANDS, SlashCommand, SlashMenu};
