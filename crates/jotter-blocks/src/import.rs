//! Markdown import: raw text to an ordered block list.
//!
//! A single line-oriented pass. The only state carried between lines is
//! the code-fence accumulator; everything else is classified line by
//! line with a fixed prefix precedence. Malformed markdown degrades to
//! plain paragraphs - this function never fails.

use std::sync::LazyLock;

use regex::Regex;

use crate::block::{Block, BlockType, NoteId};

static NUMBERED_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\d+\.\s").unwrap());
static IMAGE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap());
static LINK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\(([^)]+)\)").unwrap());

/// Parse markdown text into an ordered list of blocks for `note_id`.
///
/// `sort_order` is the position in the returned list; skipped lines leave
/// no gaps. Blank lines outside code fences become empty paragraphs so
/// the source document's spacing survives the import.
pub fn parse_markdown(note_id: NoteId, text: &str) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();
    let mut in_code_block = false;
    let mut code_lines: Vec<&str> = Vec::new();
    let mut code_language = String::new();

    for line in text.split('\n') {
        let trimmed = line.trim();

        if let Some(rest) = trimmed.strip_prefix("```") {
            if in_code_block {
                in_code_block = false;
                push_code(&mut blocks, note_id, &code_lines, &code_language);
                code_lines.clear();
            } else {
                in_code_block = true;
                code_language = rest.trim().to_string();
                code_lines.clear();
            }
            continue;
        }

        if in_code_block {
            // Verbatim, including blank lines; no pattern matching here.
            code_lines.push(line);
            continue;
        }

        let (block_type, content) = classify_line(line);
        if !content.is_empty()
            || block_type == BlockType::Divider
            || block_type == BlockType::Paragraph
        {
            let block = Block::new(note_id, block_type, content, blocks.len() as u32);
            blocks.push(block);
        }
    }

    // An unterminated fence still flushes: the importer degrades, it does
    // not drop text.
    if in_code_block {
        push_code(&mut blocks, note_id, &code_lines, &code_language);
    }

    tracing::debug!(blocks = blocks.len(), "parsed markdown import");
    blocks
}

fn push_code(blocks: &mut Vec<Block>, note_id: NoteId, lines: &[&str], language: &str) {
    let content = lines.join("\n").trim().to_string();
    let mut block = Block::new(note_id, BlockType::Code, content, blocks.len() as u32);
    if !language.is_empty() {
        block.set_language(language);
    }
    blocks.push(block);
}

/// Classify one line outside a code fence. Precedence is fixed: headings
/// (longest prefix first), quote, bullet, numbered, divider, image, link,
/// then plain paragraph.
fn classify_line(line: &str) -> (BlockType, String) {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return (BlockType::Paragraph, String::new());
    }
    if let Some(rest) = trimmed.strip_prefix("### ") {
        return (BlockType::Heading3, rest.trim().to_string());
    }
    if let Some(rest) = trimmed.strip_prefix("## ") {
        return (BlockType::Heading2, rest.trim().to_string());
    }
    if let Some(rest) = trimmed.strip_prefix("# ") {
        return (BlockType::Heading1, rest.trim().to_string());
    }
    if let Some(rest) = trimmed.strip_prefix("> ") {
        return (BlockType::Quote, rest.trim().to_string());
    }
    if let Some(rest) = trimmed
        .strip_prefix("* ")
        .or_else(|| trimmed.strip_prefix("- "))
    {
        return (BlockType::BulletList, rest.trim().to_string());
    }
    if let Some(matched) = NUMBERED_ITEM.find(line) {
        return (BlockType::NumberedList, line[matched.end()..].trim().to_string());
    }
    if trimmed == "---" || trimmed == "***" || trimmed == "___" {
        return (BlockType::Divider, String::new());
    }
    if trimmed.starts_with("![") {
        if let Some(caps) = IMAGE_LINE.captures(trimmed) {
            return (BlockType::Image, caps[2].to_string());
        }
    }
    if trimmed.starts_with('[') {
        if let Some(caps) = LINK_LINE.captures(trimmed) {
            return (BlockType::Link, caps[2].to_string());
        }
    }
    (BlockType::Paragraph, trimmed.to_string())
}
