//! Core block types: the atomic content units of a note.
//!
//! A note is an ordered list of typed blocks. `sort_order` is kept dense
//! (a permutation of `0..n-1`) by `renumber`, which every structural
//! mutation must call after inserting, removing, or moving blocks.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Open key-value metadata attached to a block.
///
/// Well-known keys are [`PROP_LANGUAGE`] (code blocks) and
/// [`PROP_HAS_INLINE_LINK`] (paragraphs carrying a converted inline link).
pub type Properties = serde_json::Map<String, serde_json::Value>;

pub const PROP_LANGUAGE: &str = "language";
pub const PROP_HAS_INLINE_LINK: &str = "hasInlineLink";

/// Stable identifier of a block. Stamped once at construction; persistence
/// and history both key on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(Uuid);

impl BlockId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of the note a block belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(Uuid);

impl NoteId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The closed set of block kinds.
///
/// Serialized in snake_case (`heading1`, `bullet_list`, ...) to match the
/// stored representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    BulletList,
    NumberedList,
    Quote,
    Code,
    Image,
    Link,
    Divider,
    Callout,
}

impl BlockType {
    pub const ALL: [BlockType; 12] = [
        BlockType::Paragraph,
        BlockType::Heading1,
        BlockType::Heading2,
        BlockType::Heading3,
        BlockType::BulletList,
        BlockType::NumberedList,
        BlockType::Quote,
        BlockType::Code,
        BlockType::Image,
        BlockType::Link,
        BlockType::Divider,
        BlockType::Callout,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Paragraph => "paragraph",
            BlockType::Heading1 => "heading1",
            BlockType::Heading2 => "heading2",
            BlockType::Heading3 => "heading3",
            BlockType::BulletList => "bullet_list",
            BlockType::NumberedList => "numbered_list",
            BlockType::Quote => "quote",
            BlockType::Code => "code",
            BlockType::Image => "image",
            BlockType::Link => "link",
            BlockType::Divider => "divider",
            BlockType::Callout => "callout",
        }
    }

    /// Placeholder text shown in an empty block of this type.
    pub fn placeholder(&self) -> &'static str {
        match self {
            BlockType::Heading1 => "Heading 1",
            BlockType::Heading2 => "Heading 2",
            BlockType::Heading3 => "Heading 3",
            BlockType::BulletList => "List item",
            BlockType::NumberedList => "Numbered list item",
            BlockType::Quote => "Quote",
            BlockType::Code => "Code",
            BlockType::Callout => "Callout",
            BlockType::Link => "Paste or type a URL...",
            BlockType::Divider => "",
            BlockType::Paragraph | BlockType::Image => "Type '/' for commands",
        }
    }

    /// Name of the icon a host UI shows next to this type.
    pub fn icon(&self) -> &'static str {
        match self {
            BlockType::Paragraph => "Type",
            BlockType::Heading1 => "Heading1",
            BlockType::Heading2 => "Heading2",
            BlockType::Heading3 => "Heading3",
            BlockType::BulletList => "List",
            BlockType::NumberedList => "ListOrdered",
            BlockType::Quote => "Quote",
            BlockType::Code => "Code",
            BlockType::Image => "ImageIcon",
            BlockType::Link => "Link",
            BlockType::Divider => "Minus",
            BlockType::Callout => "AlertCircle",
        }
    }

    /// Whether pressing Enter in a block of this type continues the list.
    pub fn is_list(&self) -> bool {
        matches!(self, BlockType::BulletList | BlockType::NumberedList)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The atomic content unit of a note.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub note_id: NoteId,
    pub block_type: BlockType,
    pub content: String,
    #[serde(default)]
    pub properties: Properties,
    pub sort_order: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Block {
    /// Create a block with a fresh id and both timestamps stamped now.
    pub fn new(
        note_id: NoteId,
        block_type: BlockType,
        content: impl Into<String>,
        sort_order: u32,
    ) -> Self {
        let now = Utc::now();
        let content = match block_type {
            // type == divider implies content == ""
            BlockType::Divider => String::new(),
            _ => content.into(),
        };
        Self {
            id: BlockId::new(),
            note_id,
            block_type,
            content,
            properties: Properties::new(),
            sort_order,
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy of this block with a fresh id and fresh timestamps.
    pub fn duplicate(&self) -> Self {
        let now = Utc::now();
        Self {
            id: BlockId::new(),
            note_id: self.note_id,
            block_type: self.block_type,
            content: self.content.clone(),
            properties: self.properties.clone(),
            sort_order: self.sort_order,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh `updated_at`. Called by every content or type mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.touch();
    }

    /// Change the block's type. Switching to `divider` clears the content
    /// to uphold the divider invariant.
    pub fn set_block_type(&mut self, block_type: BlockType) {
        self.block_type = block_type;
        if block_type == BlockType::Divider {
            self.content.clear();
        }
        self.touch();
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn set_property(&mut self, key: &str, value: impl Into<serde_json::Value>) {
        self.properties.insert(key.to_string(), value.into());
        self.touch();
    }

    /// Language tag of a code block, if set.
    pub fn language(&self) -> Option<&str> {
        self.properties.get(PROP_LANGUAGE).and_then(|v| v.as_str())
    }

    pub fn set_language(&mut self, language: &str) {
        self.set_property(PROP_LANGUAGE, language);
    }

    /// Whether this block's content carries a converted inline link.
    pub fn has_inline_link(&self) -> bool {
        self.properties
            .get(PROP_HAS_INLINE_LINK)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    pub fn mark_inline_link(&mut self) {
        self.set_property(PROP_HAS_INLINE_LINK, true);
    }
}

/// Reassert the dense-order invariant: `sort_order` becomes the block's
/// position in the list. Must run after every structural mutation.
pub fn renumber(blocks: &mut [Block]) {
    for (index, block) in blocks.iter_mut().enumerate() {
        block.sort_order = index as u32;
    }
}

/// Position of a block in the list, by id.
pub fn position_of(blocks: &[Block], id: BlockId) -> Option<usize> {
    blocks.iter().position(|b| b.id == id)
}
