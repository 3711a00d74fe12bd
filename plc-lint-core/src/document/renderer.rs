// Canonical re-serialization of blocks
//
// Rendering is deterministic and idempotent: rendering, re-parsing and
// rendering again yields the same text.

use super::parser::{heading_text, interrupts_paragraph, is_setext_underline, Block, ListItem};

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collapse whitespace after the leading indentation, which is significant
/// for nested list content
fn collapse_keep_indent(line: &str) -> String {
    let content = line.trim_start();
    if content.is_empty() {
        return String::new();
    }
    let indent = &line[..line.len() - content.len()];
    format!("{}{}", indent, collapse(content))
}

fn fence_for(info: Option<&str>, lines: &[String]) -> String {
    let fence_char = if info.map_or(false, |i| i.contains('`')) { '~' } else { '`' };
    let longest = lines
        .iter()
        .map(|line| line.trim_start().chars().take_while(|c| *c == fence_char).count())
        .max()
        .unwrap_or(0);
    std::iter::repeat(fence_char).take(longest.max(2) + 1).collect()
}

fn render_paragraph(lines: &[String], out: &mut Vec<String>) {
    for (idx, line) in lines.iter().enumerate() {
        let line = collapse(line);
        // keep continuation lines from reading as a new block
        if idx > 0 && (interrupts_paragraph(&line) || is_setext_underline(&line)) {
            out.push(format!("    {}", line));
        } else {
            out.push(line);
        }
    }
}

fn render_item(marker: &str, item: &ListItem, out: &mut Vec<String>) {
    let pad = " ".repeat(marker.len() + 1);
    for (idx, line) in item.lines.iter().enumerate() {
        let line = collapse_keep_indent(line);
        if idx == 0 {
            out.push(format!("{} {}", marker, line).trim_end().to_string());
        } else if line.is_empty() {
            out.push(String::new());
        } else {
            out.push(format!("{}{}", pad, line));
        }
    }
}

pub fn render_block(block: &Block) -> String {
    let mut out = Vec::new();
    match block {
        Block::Heading { level, text } => {
            let text = collapse(text);
            let hashes = "#".repeat(*level as usize);
            if text.is_empty() {
                out.push(hashes);
            } else if heading_text(&text) != text {
                // trailing `#` run would read as a closing sequence
                out.push(format!("{} {} #", hashes, text));
            } else {
                out.push(format!("{} {}", hashes, text));
            }
        }
        Block::Paragraph { lines } => render_paragraph(lines, &mut out),
        Block::List {
            ordered,
            start,
            items,
        } => {
            for (idx, item) in items.iter().enumerate() {
                let marker = if *ordered {
                    format!("{}.", start + idx as u64)
                } else {
                    "-".to_string()
                };
                render_item(&marker, item, &mut out);
            }
        }
        Block::CodeBlock { info, lines } => {
            let fence = fence_for(info.as_deref(), lines);
            out.push(format!("{}{}", fence, info.as_deref().unwrap_or_default()));
            out.extend(lines.iter().cloned());
            out.push(fence);
        }
        Block::Quote { lines } => {
            for line in lines {
                let line = collapse(line);
                if line.is_empty() {
                    out.push(">".to_string());
                } else {
                    out.push(format!("> {}", line));
                }
            }
        }
        Block::ThematicBreak => out.push("---".to_string()),
        Block::Html { lines } => out.extend(lines.iter().cloned()),
        Block::LinkDefinition { label, url } => {
            if url.is_empty() || url.contains(char::is_whitespace) {
                out.push(format!("[{}]: <{}>", collapse(label), url));
            } else {
                out.push(format!("[{}]: {}", collapse(label), url));
            }
        }
    }
    out.join("\n")
}

/// Render blocks separated by exactly one blank line; empty input renders empty
pub fn render<'a>(blocks: impl IntoIterator<Item = &'a Block>) -> String {
    blocks
        .into_iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parser::parse_blocks;
    use pretty_assertions::assert_eq;

    fn canonical(text: &str) -> String {
        render(&parse_blocks(text))
    }

    #[test]
    fn test_canonical_lists_and_spacing() {
        let text = "*   alpha   beta\n+ gamma\n\n\n\n3) three\n4) four";
        assert_eq!(canonical(text), "- alpha beta\n- gamma\n\n3. three\n4. four");
    }

    #[test]
    fn test_canonical_headings() {
        assert_eq!(canonical("Title\n=====\n\n##   Usage   ##"), "# Title\n\n## Usage");
    }

    #[test]
    fn test_setext_text_ending_in_hash_keeps_hash() {
        let once = canonical("Title #\n---\n\nbody");
        assert_eq!(once, "## Title # #\n\nbody");
        assert_eq!(canonical(&once), once);
        assert_eq!(canonical("a ##\n==="), "# a ## #");
    }

    #[test]
    fn test_code_fence_preserved() {
        let text = "```sh\n  docker   run\n```";
        assert_eq!(canonical(text), "```sh\n  docker   run\n```");
    }

    #[test]
    fn test_indented_code_becomes_fenced() {
        assert_eq!(canonical("    a  b"), "```\na  b\n```");
    }

    #[test]
    fn test_fence_longer_than_content_backticks() {
        let text = "~~~\n```\ninner\n```\n~~~";
        assert_eq!(canonical(text), "````\n```\ninner\n```\n````");
        assert_eq!(canonical(&canonical(text)), canonical(text));
    }

    #[test]
    fn test_paragraph_continuation_stays_paragraph() {
        let text = "intro\n    # not a heading\n    ---";
        let once = canonical(text);
        assert_eq!(once, "intro\n    # not a heading\n    ---");
        assert_eq!(canonical(&once), once);
    }

    #[test]
    fn test_nested_list_idempotent() {
        let text = "- outer\n    - inner  text\n\n  continued";
        let once = canonical(text);
        assert_eq!(once, "- outer\n    - inner text\n\n  continued");
        assert_eq!(canonical(&once), once);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(canonical(""), "");
        assert_eq!(canonical("\n\n  \n"), "");
    }
}
