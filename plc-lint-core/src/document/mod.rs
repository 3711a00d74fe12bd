pub mod inline;
pub mod parser;
pub mod renderer;
pub mod segmenter;

pub use inline::{flatten, Inline, LinkDefinitions};
pub use parser::{Block, ListItem};
pub use segmenter::{SectionMap, ROOT_SECTION};

use crate::types::Heading;

/// A parsed document: an immutable block sequence plus its link definitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
    definitions: LinkDefinitions,
}

impl Document {
    pub fn parse(text: &str) -> Self {
        let blocks = parser::parse_blocks(text);
        let definitions = parser::link_definitions(&blocks);
        Self { blocks, definitions }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn definitions(&self) -> &LinkDefinitions {
        &self.definitions
    }

    /// All headings with flattened text; ordinals count every heading
    pub fn headings(&self) -> Vec<Heading> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Heading { level, text } => Some((*level, text)),
                _ => None,
            })
            .enumerate()
            .map(|(idx, (level, text))| Heading {
                level,
                text: flatten(text, &self.definitions),
                ordinal: idx + 1,
            })
            .collect()
    }

    /// Headings with `min_level <= level <= max_level`, ordinals unchanged
    pub fn headings_between(&self, min_level: u8, max_level: u8) -> Vec<Heading> {
        self.headings()
            .into_iter()
            .filter(|h| h.level >= min_level && h.level <= max_level)
            .collect()
    }

    pub fn first_heading(&self, level: u8) -> Option<Heading> {
        self.headings().into_iter().find(|h| h.level == level)
    }

    pub fn sections(&self, partition_level: u8) -> SectionMap {
        segmenter::segment(&self.blocks, &self.definitions, partition_level)
    }

    /// Canonical rendering of the whole document
    pub fn render(&self) -> String {
        renderer::render(&self.blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const README: &str = "# Pipeline Components: Widget\n\n## Usage\n\ntext\n\n### Details\n\n## License\n\nMIT";

    #[test]
    fn test_heading_ordinals_count_all_levels() {
        let doc = Document::parse(README);
        let h2: Vec<_> = doc
            .headings_between(2, 2)
            .into_iter()
            .map(|h| (h.text, h.ordinal))
            .collect();
        assert_eq!(h2, vec![("Usage".to_string(), 2), ("License".to_string(), 4)]);
    }

    #[test]
    fn test_first_heading() {
        let doc = Document::parse(README);
        assert_eq!(
            doc.first_heading(1).map(|h| h.text),
            Some("Pipeline Components: Widget".to_string())
        );
        assert_eq!(doc.first_heading(4), None);
    }

    #[test]
    fn test_render_reparse_is_stable() {
        let doc = Document::parse(README);
        let again = Document::parse(&doc.render());
        assert_eq!(again.sections(2), doc.sections(2));
        assert_eq!(again.headings(), doc.headings());
    }
}
