// Inline markup parsing
//
// Only as much of the inline grammar as the compliance checks need:
// emphasis, strong, strikethrough, code spans, links (inline, reference and
// autolinks) and images. Everything else is literal text.

use std::collections::HashMap;

/// Reference definitions keyed by normalized label
pub type LinkDefinitions = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Code(String),
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    Strikethrough(Vec<Inline>),
    Link { children: Vec<Inline>, url: String },
    Image { alt: Vec<Inline>, url: String },
}

/// Normalize a reference label for lookup (case-insensitive, whitespace-collapsed)
pub fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Parse inline markup without any reference definitions
pub fn parse_inlines(text: &str) -> Vec<Inline> {
    InlineParser::new(text, None).parse()
}

pub fn parse_inlines_with(text: &str, definitions: &LinkDefinitions) -> Vec<Inline> {
    InlineParser::new(text, Some(definitions)).parse()
}

/// Concatenate the text content of all inline nodes in document order
pub fn plain_text(nodes: &[Inline]) -> String {
    nodes.iter().fold(String::new(), |mut out, node| {
        match node {
            Inline::Text(text) | Inline::Code(text) => out.push_str(text),
            Inline::Emphasis(children)
            | Inline::Strong(children)
            | Inline::Strikethrough(children)
            | Inline::Link { children, .. } => out.push_str(&plain_text(children)),
            Inline::Image { alt, .. } => out.push_str(&plain_text(alt)),
        }
        out
    })
}

/// Flatten heading or label markup to plain text
pub fn flatten(text: &str, definitions: &LinkDefinitions) -> String {
    plain_text(&parse_inlines_with(text, definitions))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// All links in pre-order: an outer link comes before links nested in its label
pub fn links(nodes: &[Inline]) -> Vec<(String, String)> {
    let mut found = Vec::new();
    collect_links(nodes, &mut found);
    found
}

fn collect_links(nodes: &[Inline], found: &mut Vec<(String, String)>) {
    for node in nodes {
        match node {
            Inline::Link { children, url } => {
                found.push((plain_text(children), url.clone()));
                collect_links(children, found);
            }
            Inline::Emphasis(children)
            | Inline::Strong(children)
            | Inline::Strikethrough(children) => collect_links(children, found),
            Inline::Image { alt, .. } => collect_links(alt, found),
            Inline::Text(_) | Inline::Code(_) => {}
        }
    }
}

struct InlineParser<'a> {
    chars: Vec<char>,
    definitions: Option<&'a LinkDefinitions>,
}

impl<'a> InlineParser<'a> {
    fn new(text: &str, definitions: Option<&'a LinkDefinitions>) -> Self {
        Self {
            chars: text.chars().collect(),
            definitions,
        }
    }

    fn parse(&self) -> Vec<Inline> {
        self.parse_range(0, self.chars.len())
    }

    fn parse_range(&self, start: usize, end: usize) -> Vec<Inline> {
        let mut nodes = Vec::new();
        let mut text = String::new();
        let mut i = start;

        while i < end {
            let c = self.chars[i];

            let parsed = match c {
                '\\' if i + 1 < end && self.chars[i + 1].is_ascii_punctuation() => {
                    text.push(self.chars[i + 1]);
                    i += 2;
                    continue;
                }
                '`' => self.code_span(i, end),
                '!' if i + 1 < end && self.chars[i + 1] == '[' => self.image(i, end),
                '[' => self.link(i, end),
                '<' => self.autolink(i, end),
                '*' | '_' | '~' => self.delimited(i, end),
                _ => None,
            };

            match parsed {
                Some((node, next)) => {
                    if !text.is_empty() {
                        nodes.push(Inline::Text(std::mem::take(&mut text)));
                    }
                    nodes.push(node);
                    i = next;
                }
                None => {
                    text.push(c);
                    i += 1;
                }
            }
        }

        if !text.is_empty() {
            nodes.push(Inline::Text(text));
        }
        nodes
    }

    fn run_length(&self, at: usize, end: usize, ch: char) -> usize {
        self.chars[at..end].iter().take_while(|c| **c == ch).count()
    }

    fn code_span(&self, start: usize, end: usize) -> Option<(Inline, usize)> {
        let ticks = self.run_length(start, end, '`');
        let mut i = start + ticks;

        while i < end {
            if self.chars[i] == '`' {
                let run = self.run_length(i, end, '`');
                if run == ticks {
                    let content: String = self.chars[start + ticks..i].iter().collect();
                    let content = match content.strip_prefix(' ').and_then(|c| c.strip_suffix(' ')) {
                        Some(inner) if !inner.trim().is_empty() => inner.to_string(),
                        _ => content,
                    };
                    return Some((Inline::Code(content), i + run));
                }
                i += run;
            } else {
                i += 1;
            }
        }
        None
    }

    /// Index of the `]` matching the `[` at `open`, honoring nesting and escapes
    fn closing_bracket(&self, open: usize, end: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = open;
        while i < end {
            match self.chars[i] {
                '\\' => i += 1,
                '`' => {
                    // brackets inside code spans do not count
                    if let Some((_, next)) = self.code_span(i, end) {
                        i = next;
                        continue;
                    }
                }
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
            i += 1;
        }
        None
    }

    /// Parses `(destination "title")` starting at `open`; returns url and index after `)`
    fn destination(&self, open: usize, end: usize) -> Option<(String, usize)> {
        if open >= end || self.chars[open] != '(' {
            return None;
        }
        let mut depth = 0usize;
        let mut i = open;
        while i < end {
            match self.chars[i] {
                '\\' => i += 1,
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        let inner: String = self.chars[open + 1..i].iter().collect();
                        let inner = inner.trim();
                        let url = if let Some(rest) = inner.strip_prefix('<') {
                            rest.split('>').next().unwrap_or_default().to_string()
                        } else {
                            inner.split_whitespace().next().unwrap_or_default().to_string()
                        };
                        return Some((url, i + 1));
                    }
                }
                _ => {}
            }
            i += 1;
        }
        None
    }

    fn lookup(&self, label: &str) -> Option<String> {
        self.definitions
            .and_then(|defs| defs.get(&normalize_label(label)))
            .cloned()
    }

    /// Inline `[label](url)` or reference `[label][ref]`, `[label][]`, `[label]`
    fn link_target(&self, open: usize, close: usize, end: usize) -> Option<(String, usize)> {
        if let Some((url, next)) = self.destination(close + 1, end) {
            return Some((url, next));
        }

        let label: String = self.chars[open + 1..close].iter().collect();
        if close + 1 < end && self.chars[close + 1] == '[' {
            if let Some(ref_close) = self.closing_bracket(close + 1, end) {
                let reference: String = self.chars[close + 2..ref_close].iter().collect();
                let key = if reference.trim().is_empty() { &label } else { &reference };
                return self.lookup(key).map(|url| (url, ref_close + 1));
            }
        }
        self.lookup(&label).map(|url| (url, close + 1))
    }

    fn link(&self, open: usize, end: usize) -> Option<(Inline, usize)> {
        let close = self.closing_bracket(open, end)?;
        let (url, next) = self.link_target(open, close, end)?;
        let children = self.parse_range(open + 1, close);
        Some((Inline::Link { children, url }, next))
    }

    fn image(&self, bang: usize, end: usize) -> Option<(Inline, usize)> {
        let open = bang + 1;
        let close = self.closing_bracket(open, end)?;
        let (url, next) = self.link_target(open, close, end)?;
        let alt = self.parse_range(open + 1, close);
        Some((Inline::Image { alt, url }, next))
    }

    fn autolink(&self, open: usize, end: usize) -> Option<(Inline, usize)> {
        let close = (open + 1..end).find(|&i| self.chars[i] == '>')?;
        let target: String = self.chars[open + 1..close].iter().collect();
        let is_uri = target
            .split_once(':')
            .map(|(scheme, rest)| {
                scheme.len() >= 2
                    && scheme.chars().all(|c| c.is_ascii_alphanumeric() || "+.-".contains(c))
                    && !rest.is_empty()
            })
            .unwrap_or(false);
        if !is_uri || target.contains(char::is_whitespace) {
            return None;
        }
        Some((
            Inline::Link {
                children: vec![Inline::Text(target.clone())],
                url: target,
            },
            close + 1,
        ))
    }

    fn delimited(&self, start: usize, end: usize) -> Option<(Inline, usize)> {
        let ch = self.chars[start];
        let run = self.run_length(start, end, ch);
        let width = match (ch, run) {
            ('~', n) if n >= 2 => 2,
            ('~', _) => return None,
            (_, n) if n >= 2 => 2,
            _ => 1,
        };

        // underscores only delimit at word boundaries
        if ch == '_' && start > 0 && self.chars[start - 1].is_alphanumeric() {
            return None;
        }
        let content_start = start + width;
        if content_start >= end || self.chars[content_start].is_whitespace() {
            return None;
        }

        let mut i = content_start;
        while i + width <= end {
            if self.chars[i] == '\\' {
                i += 2;
                continue;
            }
            if self.chars[i] == '`' {
                if let Some((_, next)) = self.code_span(i, end) {
                    i = next;
                    continue;
                }
            }
            let closes = self.chars[i..i + width].iter().all(|c| *c == ch)
                && i > content_start
                && !self.chars[i - 1].is_whitespace();
            let word_boundary = ch != '_'
                || i + width >= end
                || !self.chars[i + width].is_alphanumeric();
            if closes && word_boundary {
                let children = self.parse_range(content_start, i);
                let node = match (ch, width) {
                    ('~', _) => Inline::Strikethrough(children),
                    (_, 2) => Inline::Strong(children),
                    _ => Inline::Emphasis(children),
                };
                return Some((node, i + width));
            }
            i += 1;
        }
        None
    }
}
