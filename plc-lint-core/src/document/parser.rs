// Block-level parsing of markdown documents into typed blocks

use super::inline::{normalize_label, LinkDefinitions};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ATX_HEADING: Regex =
        Regex::new(r"^ {0,3}(?P<hashes>#{1,6})(?:[ \t]+(?P<text>.*))?$").expect("valid ATX regex");
    static ref FENCE_OPEN: Regex =
        Regex::new(r"^(?P<indent> {0,3})(?P<fence>`{3,}|~{3,})(?P<info>.*)$").expect("valid fence regex");
    static ref THEMATIC_BREAK: Regex =
        Regex::new(r"^ {0,3}(?:(?:\*[ \t]*){3,}|(?:-[ \t]*){3,}|(?:_[ \t]*){3,})$").expect("valid break regex");
    static ref SETEXT_UNDERLINE: Regex =
        Regex::new(r"^ {0,3}(?:=+|-+)[ \t]*$").expect("valid setext regex");
    static ref LIST_MARKER: Regex = Regex::new(
        r"^(?P<indent> {0,3})(?:(?P<bullet>[-+*])|(?P<number>[0-9]{1,9})[.)])(?:[ \t]+(?P<rest>.*)|$)"
    )
    .expect("valid list regex");
    static ref QUOTE: Regex = Regex::new(r"^ {0,3}> ?(?P<content>.*)$").expect("valid quote regex");
    static ref HTML_START: Regex =
        Regex::new(r"^ {0,3}<(?:/?[A-Za-z][A-Za-z0-9-]*(?:[ \t]|/?>|$)|!--|![A-Za-z]|\?)")
            .expect("valid html regex");
    static ref LINK_DEFINITION: Regex = Regex::new(
        r"^ {0,3}\[(?P<label>[^\]]+)\]:[ \t]*(?:<(?P<angled>[^>]*)>|(?P<url>\S+))(?:[ \t]+.*)?$"
    )
    .expect("valid link definition regex");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `text` is the raw inline markup, closing `#`s removed
    Heading { level: u8, text: String },
    Paragraph { lines: Vec<String> },
    List {
        ordered: bool,
        start: u64,
        items: Vec<ListItem>,
    },
    /// Fenced or indented code; `lines` are verbatim
    CodeBlock { info: Option<String>, lines: Vec<String> },
    Quote { lines: Vec<String> },
    ThematicBreak,
    Html { lines: Vec<String> },
    LinkDefinition { label: String, url: String },
}

/// One list item; continuation lines keep indentation relative to the item content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub lines: Vec<String>,
}

#[derive(Debug, Clone)]
struct ListMarker {
    ordered: bool,
    number: u64,
    content_offset: usize,
    rest: String,
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn indentation(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ').count()
}

fn strip_indent(line: &str, width: usize) -> &str {
    let strip = indentation(line).min(width);
    &line[strip..]
}

fn expand_leading_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut leading = true;
    for c in line.chars() {
        match c {
            '\t' if leading => out.push_str("    "),
            ' ' if leading => out.push(' '),
            _ => {
                leading = false;
                out.push(c);
            }
        }
    }
    out
}

fn list_marker(line: &str) -> Option<ListMarker> {
    if THEMATIC_BREAK.is_match(line) {
        return None;
    }
    let caps = LIST_MARKER.captures(line)?;
    let ordered = caps.name("number").is_some();
    let number = caps
        .name("number")
        .and_then(|n| n.as_str().parse().ok())
        .unwrap_or(1);
    let (content_offset, rest) = match caps.name("rest") {
        Some(rest) => (rest.start(), rest.as_str().trim_end().to_string()),
        None => (line.trim_end().len() + 1, String::new()),
    };
    Some(ListMarker {
        ordered,
        number,
        content_offset,
        rest,
    })
}

/// Whether `line` starts a block that ends a running paragraph
pub(crate) fn interrupts_paragraph(line: &str) -> bool {
    ATX_HEADING.is_match(line)
        || FENCE_OPEN.is_match(line)
        || THEMATIC_BREAK.is_match(line)
        || QUOTE.is_match(line)
        || HTML_START.is_match(line)
        || list_marker(line).map_or(false, |m| !m.rest.is_empty())
}

pub(crate) fn is_link_definition(line: &str) -> bool {
    LINK_DEFINITION.is_match(line)
}

pub(crate) fn is_setext_underline(line: &str) -> bool {
    SETEXT_UNDERLINE.is_match(line)
}

pub(crate) fn heading_text(raw: &str) -> String {
    let text = raw.trim();
    // closing sequence: a run of `#` that is the whole text or follows whitespace
    let without_hashes = text.trim_end_matches('#');
    if without_hashes.is_empty() {
        return String::new();
    }
    if without_hashes.len() < text.len() && without_hashes.ends_with([' ', '\t']) {
        return without_hashes.trim_end().to_string();
    }
    text.to_string()
}

struct BlockParser {
    lines: Vec<String>,
    pos: usize,
}

impl BlockParser {
    fn new(text: &str) -> Self {
        Self {
            lines: text.lines().map(expand_leading_tabs).collect(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Vec<Block> {
        let mut blocks = Vec::new();
        while self.pos < self.lines.len() {
            if is_blank(&self.lines[self.pos]) {
                self.pos += 1;
                continue;
            }
            blocks.push(self.next_block());
        }
        blocks
    }

    fn next_block(&mut self) -> Block {
        let line = self.lines[self.pos].clone();

        if indentation(&line) >= 4 {
            return self.indented_code();
        }
        if let Some(caps) = FENCE_OPEN.captures(&line) {
            let fence = caps["fence"].to_string();
            let info = caps["info"].trim().to_string();
            if !(fence.starts_with('`') && info.contains('`')) {
                return self.fenced_code(caps["indent"].len(), &fence, info);
            }
        }
        if let Some(caps) = ATX_HEADING.captures(&line) {
            self.pos += 1;
            return Block::Heading {
                level: caps["hashes"].len() as u8,
                text: caps.name("text").map(|t| heading_text(t.as_str())).unwrap_or_default(),
            };
        }
        if THEMATIC_BREAK.is_match(&line) {
            self.pos += 1;
            return Block::ThematicBreak;
        }
        if let Some(marker) = list_marker(&line) {
            return self.list(marker);
        }
        if QUOTE.is_match(&line) {
            return self.quote();
        }
        if HTML_START.is_match(&line) {
            return self.html();
        }
        if let Some(caps) = LINK_DEFINITION.captures(&line) {
            self.pos += 1;
            let url = caps
                .name("angled")
                .or_else(|| caps.name("url"))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            return Block::LinkDefinition {
                label: caps["label"].trim().to_string(),
                url,
            };
        }
        self.paragraph()
    }

    fn indented_code(&mut self) -> Block {
        let mut lines = Vec::new();
        while self.pos < self.lines.len() {
            let line = &self.lines[self.pos];
            if is_blank(line) {
                lines.push(String::new());
            } else if indentation(line) >= 4 {
                lines.push(line[4..].trim_end().to_string());
            } else {
                break;
            }
            self.pos += 1;
        }
        while lines.last().map_or(false, |l| l.is_empty()) {
            lines.pop();
        }
        Block::CodeBlock { info: None, lines }
    }

    fn fenced_code(&mut self, indent: usize, fence: &str, info: String) -> Block {
        let fence_char = fence.chars().next().unwrap_or('`');
        let mut lines = Vec::new();
        self.pos += 1;

        while self.pos < self.lines.len() {
            let line = &self.lines[self.pos];
            self.pos += 1;
            let trimmed = line.trim();
            let closes = indentation(line) <= 3
                && trimmed.len() >= fence.len()
                && trimmed.chars().all(|c| c == fence_char);
            if closes {
                break;
            }
            lines.push(strip_indent(line, indent).to_string());
        }

        Block::CodeBlock {
            info: (!info.is_empty()).then_some(info),
            lines,
        }
    }

    fn quote(&mut self) -> Block {
        let mut lines = Vec::new();
        while self.pos < self.lines.len() {
            match QUOTE.captures(&self.lines[self.pos]) {
                Some(caps) => lines.push(caps["content"].trim_end().to_string()),
                None => break,
            }
            self.pos += 1;
        }
        Block::Quote { lines }
    }

    fn html(&mut self) -> Block {
        let mut lines = Vec::new();
        while self.pos < self.lines.len() && !is_blank(&self.lines[self.pos]) {
            lines.push(self.lines[self.pos].trim_end().to_string());
            self.pos += 1;
        }
        Block::Html { lines }
    }

    fn paragraph(&mut self) -> Block {
        let mut lines = vec![self.lines[self.pos].trim().to_string()];
        self.pos += 1;

        while self.pos < self.lines.len() {
            let line = &self.lines[self.pos];
            if is_blank(line) {
                break;
            }
            if is_setext_underline(line) {
                self.pos += 1;
                let level = if line.trim().starts_with('=') { 1 } else { 2 };
                return Block::Heading {
                    level,
                    text: lines.join(" "),
                };
            }
            if interrupts_paragraph(line) {
                break;
            }
            lines.push(line.trim().to_string());
            self.pos += 1;
        }
        Block::Paragraph { lines }
    }

    fn list(&mut self, first: ListMarker) -> Block {
        let ordered = first.ordered;
        let start = first.number;
        let mut items = Vec::new();
        let mut marker = first;

        loop {
            let offset = marker.content_offset;
            let mut lines = vec![marker.rest.clone()];
            let mut next_marker = None;
            self.pos += 1;

            while self.pos < self.lines.len() {
                let line = &self.lines[self.pos];

                if is_blank(line) {
                    let next = (self.pos + 1..self.lines.len()).find(|&i| !is_blank(&self.lines[i]));
                    match next {
                        Some(i) if indentation(&self.lines[i]) >= offset => {
                            lines.extend((self.pos..i).map(|_| String::new()));
                            self.pos = i;
                            continue;
                        }
                        Some(i) => {
                            if let Some(m) = list_marker(&self.lines[i]).filter(|m| m.ordered == ordered) {
                                self.pos = i;
                                next_marker = Some(m);
                            }
                        }
                        None => {}
                    }
                    break;
                }

                if indentation(line) >= offset {
                    lines.push(strip_indent(line, offset).trim_end().to_string());
                    self.pos += 1;
                    continue;
                }
                if let Some(m) = list_marker(line) {
                    if m.ordered == ordered {
                        next_marker = Some(m);
                    }
                    break;
                }
                if interrupts_paragraph(line) {
                    break;
                }
                // lazy continuation
                lines.push(line.trim().to_string());
                self.pos += 1;
            }

            while lines.len() > 1 && lines.last().map_or(false, |l| l.is_empty()) {
                lines.pop();
            }
            items.push(ListItem { lines });

            match next_marker {
                Some(m) => marker = m,
                None => break,
            }
        }

        Block::List {
            ordered,
            start,
            items,
        }
    }
}

/// Parse raw text into its block sequence
pub fn parse_blocks(text: &str) -> Vec<Block> {
    BlockParser::new(text).parse()
}

/// Collect `[label]: url` definitions; the first definition of a label wins
pub fn link_definitions(blocks: &[Block]) -> LinkDefinitions {
    blocks.iter().fold(LinkDefinitions::new(), |mut defs, block| {
        if let Block::LinkDefinition { label, url } = block {
            defs.entry(normalize_label(label)).or_insert_with(|| url.clone());
        }
        defs
    })
}
