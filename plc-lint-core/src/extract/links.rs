// Hyperlink extraction from free text

use crate::document::inline::{links, parse_inlines, parse_inlines_with, LinkDefinitions};
use crate::document::parser::{is_link_definition, link_definitions, parse_blocks};
use crate::types::LinkReference;

/// First inline `[label](url)` link in `text`
pub fn first_inline_link(text: &str) -> Option<LinkReference> {
    links(&parse_inlines(text))
        .into_iter()
        .next()
        .map(|(label, url)| LinkReference { label, url })
}

/// Non-empty remainder of `line` after the first occurrence of `marker`
pub fn after_marker<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    line.find(marker)
        .map(|idx| &line[idx + marker.len()..])
        .filter(|rest| !rest.trim().is_empty())
}

/// First inline link in the fragment following `marker`
pub fn link_after_marker(line: &str, marker: &str) -> Option<LinkReference> {
    after_marker(line, marker).and_then(first_inline_link)
}

/// Every link in `text`, inline and reference-style, in document order.
/// Reference links resolve against definitions found anywhere in `text`.
pub fn extract_links(text: &str) -> Vec<LinkReference> {
    let definitions = link_definitions(&parse_blocks(text));
    links_with(text, &definitions)
}

pub fn links_with(text: &str, definitions: &LinkDefinitions) -> Vec<LinkReference> {
    text.lines()
        .filter(|line| !is_link_definition(line))
        .flat_map(|line| links(&parse_inlines_with(line, definitions)))
        .map(|(label, url)| LinkReference { label, url })
        .collect()
}

/// First link in `text`, reference-style links included
pub fn first_link_with(text: &str, definitions: &LinkDefinitions) -> Option<LinkReference> {
    links_with(text, definitions).into_iter().next()
}
