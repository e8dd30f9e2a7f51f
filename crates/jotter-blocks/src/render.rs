//! Semantic HTML output for a block list.
//!
//! Used for read-only views of a note. Consecutive list blocks of the
//! same kind are grouped under a single `<ul>`/`<ol>`; everything else
//! renders one element per block.

use pulldown_cmark_escape::{StrWrite, escape_href, escape_html, escape_html_body_text};

use crate::block::{Block, BlockType};

/// Render a block list to an HTML fragment.
pub fn render_blocks(blocks: &[Block]) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = HtmlWriter::new(&mut out).run(blocks);
    out
}

struct HtmlWriter<W> {
    writer: W,
}

impl<W: StrWrite> HtmlWriter<W> {
    fn new(writer: W) -> Self {
        Self { writer }
    }

    fn run(mut self, blocks: &[Block]) -> Result<(), W::Error> {
        let mut i = 0;
        while i < blocks.len() {
            let kind = blocks[i].block_type;
            if kind.is_list() {
                let start = i;
                while i < blocks.len() && blocks[i].block_type == kind {
                    i += 1;
                }
                self.list(kind, &blocks[start..i])?;
            } else {
                self.block(&blocks[i])?;
                i += 1;
            }
        }
        Ok(())
    }

    fn list(&mut self, kind: BlockType, items: &[Block]) -> Result<(), W::Error> {
        let tag = if kind == BlockType::BulletList {
            "ul"
        } else {
            "ol"
        };
        self.writer.write_str("<")?;
        self.writer.write_str(tag)?;
        self.writer.write_str(">\n")?;
        for item in items {
            self.writer.write_str("<li>")?;
            self.text(item)?;
            self.writer.write_str("</li>\n")?;
        }
        self.writer.write_str("</")?;
        self.writer.write_str(tag)?;
        self.writer.write_str(">\n")
    }

    fn block(&mut self, block: &Block) -> Result<(), W::Error> {
        match block.block_type {
            BlockType::Paragraph => self.wrapped(block, "<p>", "</p>\n"),
            BlockType::Heading1 => self.wrapped(block, "<h1>", "</h1>\n"),
            BlockType::Heading2 => self.wrapped(block, "<h2>", "</h2>\n"),
            BlockType::Heading3 => self.wrapped(block, "<h3>", "</h3>\n"),
            BlockType::Quote => self.wrapped(block, "<blockquote><p>", "</p></blockquote>\n"),
            BlockType::Callout => {
                self.wrapped(block, "<aside class=\"callout\"><p>", "</p></aside>\n")
            }
            BlockType::Code => {
                self.writer.write_str("<pre><code")?;
                if let Some(language) = block.language() {
                    self.writer.write_str(" class=\"language-")?;
                    escape_html(&mut self.writer, language)?;
                    self.writer.write_str("\"")?;
                }
                self.writer.write_str(">")?;
                escape_html(&mut self.writer, &block.content)?;
                self.writer.write_str("</code></pre>\n")
            }
            BlockType::Image => {
                self.writer.write_str("<img src=\"")?;
                escape_href(&mut self.writer, &block.content)?;
                self.writer.write_str("\" alt=\"\" />\n")
            }
            BlockType::Link => {
                self.writer.write_str("<p><a href=\"")?;
                escape_href(&mut self.writer, &block.content)?;
                self.writer.write_str("\">")?;
                escape_html_body_text(&mut self.writer, &block.content)?;
                self.writer.write_str("</a></p>\n")
            }
            BlockType::Divider => self.writer.write_str("<hr />\n"),
            // Lists are grouped by `run`; a lone item still renders as a
            // one-element list.
            BlockType::BulletList | BlockType::NumberedList => {
                self.list(block.block_type, std::slice::from_ref(block))
            }
        }
    }

    fn wrapped(&mut self, block: &Block, open: &str, close: &str) -> Result<(), W::Error> {
        self.writer.write_str(open)?;
        self.text(block)?;
        self.writer.write_str(close)
    }

    /// Block text content. Blocks carrying a converted inline link hold a
    /// pre-escaped anchor fragment and pass through verbatim.
    fn text(&mut self, block: &Block) -> Result<(), W::Error> {
        if block.has_inline_link() {
            self.writer.write_str(&block.content)
        } else {
            escape_html_body_text(&mut self.writer, &block.content)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::NoteId;

    fn block(block_type: BlockType, content: &str) -> Block {
        Block::new(NoteId::new(), block_type, content, 0)
    }

    #[test]
    fn test_heading_and_paragraph() {
        let blocks = vec![block(BlockType::Heading1, "Title"), block(BlockType::Paragraph, "Body")];
        assert_eq!(render_blocks(&blocks), "<h1>Title</h1>\n<p>Body</p>\n");
    }

    #[test]
    fn test_consecutive_bullets_group_into_one_list() {
        let blocks = vec![
            block(BlockType::BulletList, "one"),
            block(BlockType::BulletList, "two"),
            block(BlockType::Paragraph, "after"),
        ];
        assert_eq!(
            render_blocks(&blocks),
            "<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n<p>after</p>\n"
        );
    }

    #[test]
    fn test_numbered_run_breaks_on_type_change() {
        let blocks = vec![
            block(BlockType::NumberedList, "first"),
            block(BlockType::BulletList, "second"),
        ];
        assert_eq!(
            render_blocks(&blocks),
            "<ol>\n<li>first</li>\n</ol>\n<ul>\n<li>second</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_content_is_escaped() {
        let blocks = vec![block(BlockType::Paragraph, "a < b & c")];
        assert_eq!(render_blocks(&blocks), "<p>a &lt; b &amp; c</p>\n");
    }

    #[test]
    fn test_code_block_with_language_class() {
        let mut code = block(BlockType::Code, "if a < b {}");
        code.set_language("rust");
        assert_eq!(
            render_blocks(std::slice::from_ref(&code)),
            "<pre><code class=\"language-rust\">if a &lt; b {}</code></pre>\n"
        );
    }

    #[test]
    fn test_divider_and_link() {
        let blocks = vec![block(BlockType::Divider, ""), block(BlockType::Link, "https://example.com")];
        assert_eq!(
            render_blocks(&blocks),
            "<hr />\n<p><a href=\"https://example.com\">https://example.com</a></p>\n"
        );
    }

    #[test]
    fn test_inline_link_fragment_passes_through() {
        let mut para = block(
            BlockType::Paragraph,
            "see <a href=\"https://example.com\" rel=\"noopener noreferrer\">https://example.com</a>",
        );
        para.mark_inline_link();
        let html = render_blocks(std::slice::from_ref(&para));
        assert!(html.contains("<a href=\"https://example.com\""));
        assert!(!html.contains("&lt;a href"));
    }
}
