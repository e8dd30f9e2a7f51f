//! jotter-blocks: the data layer of the jotter note editor.
//!
//! This crate provides:
//! - `Block` / `BlockType` - the typed content units a note is made of
//! - `parse_markdown` - line-oriented import of markdown text into blocks
//! - `render_blocks` - semantic HTML output for read-only views
//!
//! Everything here is pure data and pure functions; editor state lives in
//! `jotter-editor-core`.

pub mod block;
pub mod import;
pub mod render;

pub use block::{
    Block, BlockId, BlockType, NoteId, Properties, position_of, renumber, PROP_HAS_INLINE_LINK,
    PROP_LANGUAGE,
};
pub use import::parse_markdown;
pub use render::render_blocks;
