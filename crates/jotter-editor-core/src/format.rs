//! Live formatting: what a content change means for the block it hit.
//!
//! Evaluated on every keystroke for the block being edited. The checks
//! run in a fixed order and the first match wins:
//!
//! 1. trailing `/` opens the slash menu (content stored verbatim)
//! 2. URL detection: a lone URL converts the block to a link; text
//!    followed by a pasted URL becomes an inline-link fragment
//! 3. markdown prefixes convert the block type in place
//! 4. otherwise: plain content update
//!
//! The ordering guarantees a block already promoted to `link` is never
//! re-detected, and that slash intent beats any partial markdown match.

use std::sync::LazyLock;

use jotter_blocks::{Block, BlockType};
use pulldown_cmark_escape::{escape_href, escape_html_body_text};
use regex::Regex;

static URL_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^https?://\S+$").unwrap());

/// The markdown prefix table, in match order. Longest heading first so
/// `###` is never claimed by the `#` rule.
const PREFIX_RULES: &[(&str, BlockType)] = &[
    ("### ", BlockType::Heading3),
    ("## ", BlockType::Heading2),
    ("# ", BlockType::Heading1),
    ("> ", BlockType::Quote),
    ("* ", BlockType::BulletList),
    ("- ", BlockType::BulletList),
    ("1. ", BlockType::NumberedList),
];

/// What the orchestrator should do with a content change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormatOutcome {
    /// Store the content verbatim and open the slash menu.
    SlashTrigger,
    /// Convert the block to a `link` block holding `url`.
    LinkBlock { url: String },
    /// Keep the block type; replace the content with an inline-link
    /// fragment and mark the block.
    InlineLink { content: String },
    /// Convert the block type and install the stripped content.
    Convert {
        block_type: BlockType,
        content: String,
    },
    /// Ordinary content update.
    Plain,
}

/// Decide what a content change means for `block`.
pub fn evaluate(block: &Block, new_content: &str) -> FormatOutcome {
    if new_content.ends_with('/') {
        return FormatOutcome::SlashTrigger;
    }

    if block.block_type != BlockType::Link {
        if let Some(outcome) = detect_url(new_content) {
            return outcome;
        }
    }

    for (prefix, block_type) in PREFIX_RULES {
        if let Some(rest) = new_content.strip_prefix(prefix) {
            if !rest.is_empty() {
                return FormatOutcome::Convert {
                    block_type: *block_type,
                    content: rest.trim().to_string(),
                };
            }
        }
    }
    if let Some(rest) = new_content.strip_prefix("```") {
        return FormatOutcome::Convert {
            block_type: BlockType::Code,
            content: rest.trim().to_string(),
        };
    }

    FormatOutcome::Plain
}

fn detect_url(new_content: &str) -> Option<FormatOutcome> {
    let trimmed = new_content.trim();
    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let last = *tokens.last()?;
    if !URL_TOKEN.is_match(last) {
        return None;
    }

    if tokens.len() == 1 {
        return Some(FormatOutcome::LinkBlock {
            url: trimmed.to_string(),
        });
    }

    // Text followed by a pasted URL - but only when the URL is the sole
    // one in the content.
    if tokens[..tokens.len() - 1].iter().any(|t| URL_TOKEN.is_match(t)) {
        return None;
    }
    let text = tokens[..tokens.len() - 1].join(" ");
    Some(FormatOutcome::InlineLink {
        content: inline_link_fragment(&text, last),
    })
}

/// `{text} <a href="{url}" rel="noopener noreferrer">{url}</a>`, with
/// href and text escaped. Stored as the block's content; the renderer
/// passes it through verbatim when `hasInlineLink` is set.
fn inline_link_fragment(text: &str, url: &str) -> String {
    let mut fragment = String::new();
    // Writing into a String cannot fail.
    let _ = escape_html_body_text(&mut fragment, text);
    fragment.push_str(" <a href=\"");
    let _ = escape_href(&mut fragment, url);
    fragment.push_str("\" rel=\"noopener noreferrer\">");
    let _ = escape_html_body_text(&mut fragment, url);
    fragment.push_str("</a>");
    fragment
}

#[cfg(test)]
mod tests {
    use super::*;
    use jotter_blocks::NoteId;

    fn block(block_type: BlockType) -> Block {
        Block::new(NoteId::new(), block_type, "", 0)
    }

    #[test]
    fn test_trailing_slash_wins_over_everything() {
        let b = block(BlockType::Paragraph);
        assert_eq!(evaluate(&b, "anything/"), FormatOutcome::SlashTrigger);
        // Even a URL ending in a slash is slash-menu intent first.
        assert_eq!(
            evaluate(&b, "https://example.com/"),
            FormatOutcome::SlashTrigger
        );
        // And so is a would-be heading.
        assert_eq!(evaluate(&b, "# heading/"), FormatOutcome::SlashTrigger);
    }

    #[test]
    fn test_lone_url_becomes_link_block() {
        let b = block(BlockType::Paragraph);
        assert_eq!(
            evaluate(&b, "https://example.com"),
            FormatOutcome::LinkBlock {
                url: "https://example.com".to_string()
            }
        );
        // Case-insensitive scheme, surrounding whitespace trimmed.
        assert_eq!(
            evaluate(&b, "  HTTPS://example.com  "),
            FormatOutcome::LinkBlock {
                url: "HTTPS://example.com".to_string()
            }
        );
    }

    #[test]
    fn test_link_block_is_not_redetected() {
        let b = block(BlockType::Link);
        assert_eq!(evaluate(&b, "https://example.com"), FormatOutcome::Plain);
    }

    #[test]
    fn test_trailing_url_becomes_inline_link() {
        let b = block(BlockType::Paragraph);
        let outcome = evaluate(&b, "see this https://example.com");
        match outcome {
            FormatOutcome::InlineLink { content } => {
                assert!(content.starts_with("see this "));
                assert!(content.contains("<a href=\"https://example.com\""));
                assert!(content.contains("rel=\"noopener noreferrer\""));
                assert!(content.ends_with("</a>"));
            }
            other => panic!("expected InlineLink, got {other:?}"),
        }
    }

    #[test]
    fn test_two_urls_fall_through() {
        let b = block(BlockType::Paragraph);
        assert_eq!(
            evaluate(&b, "https://a.example https://b.example"),
            FormatOutcome::Plain
        );
    }

    #[test]
    fn test_non_url_last_token_is_plain() {
        let b = block(BlockType::Paragraph);
        assert_eq!(
            evaluate(&b, "https://example.com is neat"),
            FormatOutcome::Plain
        );
    }

    #[test]
    fn test_markdown_prefix_conversion_order() {
        let b = block(BlockType::Paragraph);
        assert_eq!(
            evaluate(&b, "### Small"),
            FormatOutcome::Convert {
                block_type: BlockType::Heading3,
                content: "Small".to_string()
            }
        );
        assert_eq!(
            evaluate(&b, "## Medium"),
            FormatOutcome::Convert {
                block_type: BlockType::Heading2,
                content: "Medium".to_string()
            }
        );
        assert_eq!(
            evaluate(&b, "# Big"),
            FormatOutcome::Convert {
                block_type: BlockType::Heading1,
                content: "Big".to_string()
            }
        );
        assert_eq!(
            evaluate(&b, "> wise words"),
            FormatOutcome::Convert {
                block_type: BlockType::Quote,
                content: "wise words".to_string()
            }
        );
        assert_eq!(
            evaluate(&b, "- item"),
            FormatOutcome::Convert {
                block_type: BlockType::BulletList,
                content: "item".to_string()
            }
        );
        assert_eq!(
            evaluate(&b, "* item"),
            FormatOutcome::Convert {
                block_type: BlockType::BulletList,
                content: "item".to_string()
            }
        );
        assert_eq!(
            evaluate(&b, "1. first"),
            FormatOutcome::Convert {
                block_type: BlockType::NumberedList,
                content: "first".to_string()
            }
        );
    }

    #[test]
    fn test_code_fence_converts_with_optional_remainder() {
        let b = block(BlockType::Paragraph);
        assert_eq!(
            evaluate(&b, "```rust"),
            FormatOutcome::Convert {
                block_type: BlockType::Code,
                content: "rust".to_string()
            }
        );
        assert_eq!(
            evaluate(&b, "```"),
            FormatOutcome::Convert {
                block_type: BlockType::Code,
                content: String::new()
            }
        );
    }

    #[test]
    fn test_bare_prefix_does_not_convert() {
        let b = block(BlockType::Paragraph);
        assert_eq!(evaluate(&b, "# "), FormatOutcome::Plain);
        assert_eq!(evaluate(&b, "- "), FormatOutcome::Plain);
    }

    #[test]
    fn test_plain_text_stays_plain() {
        let b = block(BlockType::Paragraph);
        assert_eq!(evaluate(&b, "just words"), FormatOutcome::Plain);
        assert_eq!(evaluate(&b, ""), FormatOutcome::Plain);
    }
}
