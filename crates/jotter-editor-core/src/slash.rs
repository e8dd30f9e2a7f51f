//! The slash-command menu: command table and menu state machine.
//!
//! Typing `/` at the end of a block opens the menu; the host renders
//! `filtered()` and routes menu keystrokes here. Applying the selected
//! command is the orchestrator's job (`NoteEditor::apply_slash_command`).

use jotter_blocks::BlockType;

use crate::platform::MenuAnchor;

/// One entry of the command table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlashCommand {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub block_type: BlockType,
    pub keywords: &'static [&'static str],
}

/// Every available command, in display order.
pub const SLASH_COMMANDS: &[SlashCommand] = &[
    SlashCommand {
        id: "paragraph",
        label: "Text",
        description: "Just start writing with plain text.",
        icon: "Type",
        block_type: BlockType::Paragraph,
        keywords: &["text", "paragraph", "plain"],
    },
    SlashCommand {
        id: "heading1",
        label: "Heading 1",
        description: "Big section heading.",
        icon: "Heading1",
        block_type: BlockType::Heading1,
        keywords: &["h1", "heading", "title", "big"],
    },
    SlashCommand {
        id: "heading2",
        label: "Heading 2",
        description: "Medium section heading.",
        icon: "Heading2",
        block_type: BlockType::Heading2,
        keywords: &["h2", "heading", "subtitle"],
    },
    SlashCommand {
        id: "heading3",
        label: "Heading 3",
        description: "Small section heading.",
        icon: "Heading3",
        block_type: BlockType::Heading3,
        keywords: &["h3", "heading", "small"],
    },
    SlashCommand {
        id: "bullet_list",
        label: "Bulleted list",
        description: "Create a simple bulleted list.",
        icon: "List",
        block_type: BlockType::BulletList,
        keywords: &["bullet", "list", "ul", "unordered"],
    },
    SlashCommand {
        id: "numbered_list",
        label: "Numbered list",
        description: "Create a list with numbering.",
        icon: "ListOrdered",
        block_type: BlockType::NumberedList,
        keywords: &["numbered", "list", "ol", "ordered", "1"],
    },
    SlashCommand {
        id: "quote",
        label: "Quote",
        description: "Capture a quote.",
        icon: "Quote",
        block_type: BlockType::Quote,
        keywords: &["quote", "citation", "blockquote"],
    },
    SlashCommand {
        id: "code",
        label: "Code",
        description: "Capture a code snippet.",
        icon: "Code",
        block_type: BlockType::Code,
        keywords: &["code", "snippet", "programming", "monospace"],
    },
    SlashCommand {
        id: "callout",
        label: "Callout",
        description: "Make writing stand out.",
        icon: "AlertCircle",
        block_type: BlockType::Callout,
        keywords: &["callout", "note", "info", "highlight"],
    },
    SlashCommand {
        id: "link",
        label: "Link",
        description: "Create a link to another page.",
        icon: "Link",
        block_type: BlockType::Link,
        keywords: &["link", "url", "external", "page", "website"],
    },
    SlashCommand {
        id: "divider",
        label: "Divider",
        description: "Visually divide blocks.",
        icon: "Minus",
        block_type: BlockType::Divider,
        keywords: &["divider", "separator", "line", "hr"],
    },
    SlashCommand {
        id: "image",
        label: "Image",
        description: "Upload or embed with a link.",
        icon: "ImageIcon",
        block_type: BlockType::Image,
        keywords: &["image", "picture", "photo", "upload"],
    },
];

/// Menu state: open/closed, anchor position, search query, and the
/// highlighted row within the filtered results.
#[derive(Debug, Default)]
pub struct SlashMenu {
    open: bool,
    anchor: MenuAnchor,
    query: String,
    highlighted: usize,
}

impl SlashMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_at(&mut self, anchor: MenuAnchor) {
        self.open = true;
        self.anchor = anchor;
        self.query.clear();
        self.highlighted = 0;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn anchor(&self) -> MenuAnchor {
        self.anchor
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replace the search query; the highlight resets to the first row.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.highlighted = 0;
    }

    /// Commands matching the query against label, description, and
    /// keywords (case-insensitive substring).
    pub fn filtered(&self) -> Vec<&'static SlashCommand> {
        let query = self.query.to_lowercase();
        SLASH_COMMANDS
            .iter()
            .filter(|command| {
                command.label.to_lowercase().contains(&query)
                    || command.description.to_lowercase().contains(&query)
                    || command.keywords.iter().any(|k| k.contains(&query))
            })
            .collect()
    }

    /// Move the highlight down, wrapping to the top.
    pub fn highlight_next(&mut self) {
        let count = self.filtered().len();
        if count == 0 {
            return;
        }
        self.highlighted = if self.highlighted + 1 < count {
            self.highlighted + 1
        } else {
            0
        };
    }

    /// Move the highlight up, wrapping to the bottom.
    pub fn highlight_previous(&mut self) {
        let count = self.filtered().len();
        if count == 0 {
            return;
        }
        self.highlighted = if self.highlighted > 0 {
            self.highlighted - 1
        } else {
            count - 1
        };
    }

    pub fn highlighted_index(&self) -> usize {
        self.highlighted
    }

    /// The command Enter would apply.
    pub fn highlighted(&self) -> Option<&'static SlashCommand> {
        self.filtered().get(self.highlighted).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_every_block_type() {
        for block_type in BlockType::ALL {
            assert!(
                SLASH_COMMANDS.iter().any(|c| c.block_type == block_type),
                "no slash command for {block_type}"
            );
        }
        assert_eq!(SLASH_COMMANDS.len(), BlockType::ALL.len());
    }

    #[test]
    fn test_filter_matches_label_description_and_keywords() {
        let mut menu = SlashMenu::new();
        menu.open_at(MenuAnchor::default());

        menu.set_query("Heading");
        assert_eq!(menu.filtered().len(), 3);

        // "hr" only appears in the divider keywords.
        menu.set_query("hr");
        let hits = menu.filtered();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "divider");

        // Description match.
        menu.set_query("stand out");
        let hits = menu.filtered();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "callout");

        menu.set_query("zzz");
        assert!(menu.filtered().is_empty());
    }

    #[test]
    fn test_empty_query_shows_everything() {
        let menu = SlashMenu::new();
        assert_eq!(menu.filtered().len(), SLASH_COMMANDS.len());
    }

    #[test]
    fn test_navigation_wraps_both_ways() {
        let mut menu = SlashMenu::new();
        menu.open_at(MenuAnchor::default());
        menu.set_query("heading");
        assert_eq!(menu.filtered().len(), 3);

        assert_eq!(menu.highlighted_index(), 0);
        menu.highlight_previous();
        assert_eq!(menu.highlighted_index(), 2);
        menu.highlight_next();
        assert_eq!(menu.highlighted_index(), 0);
        menu.highlight_next();
        menu.highlight_next();
        menu.highlight_next();
        assert_eq!(menu.highlighted_index(), 0);
    }

    #[test]
    fn test_query_change_resets_highlight() {
        let mut menu = SlashMenu::new();
        menu.open_at(MenuAnchor::default());
        menu.highlight_next();
        assert_ne!(menu.highlighted_index(), 0);
        menu.set_query("list");
        assert_eq!(menu.highlighted_index(), 0);
        assert_eq!(menu.highlighted().map(|c| c.id), Some("bullet_list"));
    }
}
