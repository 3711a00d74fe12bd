// Section partitioning
//
// The block list is folded into named sections. A heading at the partition
// level opens a section named after its flattened text; a shallower heading
// returns to `__ROOT__`; everything else, deeper headings included, lands in
// the current section's buffer.

use super::inline::{flatten, LinkDefinitions};
use super::parser::Block;
use super::renderer::render;
use crate::types::Section;

pub const ROOT_SECTION: &str = "__ROOT__";

/// Section name → rendered content, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMap {
    sections: Vec<Section>,
}

impl SectionMap {
    /// Later duplicates overwrite the content but keep the first position
    fn insert(&mut self, name: String, content: String) {
        match self.sections.iter_mut().find(|s| s.name == name) {
            Some(existing) => existing.content = content,
            None => {
                let order = self.sections.len();
                self.sections.push(Section { name, content, order });
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn content(&self, name: &str) -> Option<&str> {
        self.get(name).map(|s| s.content.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

struct Accumulator<'a> {
    current_name: String,
    buffer: Vec<&'a Block>,
    sections: SectionMap,
}

impl<'a> Accumulator<'a> {
    fn new() -> Self {
        Self {
            current_name: ROOT_SECTION.to_string(),
            buffer: Vec::new(),
            sections: SectionMap::default(),
        }
    }

    fn flush(mut self, next_name: String) -> Self {
        let content = render(self.buffer.drain(..));
        self.sections.insert(self.current_name, content);
        Self {
            current_name: next_name,
            buffer: self.buffer,
            sections: self.sections,
        }
    }

    fn step(mut self, block: &'a Block, partition_level: u8, definitions: &LinkDefinitions) -> Self {
        match block {
            Block::Heading { level, .. } if *level < partition_level => {
                self.flush(ROOT_SECTION.to_string())
            }
            Block::Heading { level, text } if *level == partition_level => {
                self.flush(flatten(text, definitions))
            }
            other => {
                self.buffer.push(other);
                self
            }
        }
    }

    fn finish(self) -> SectionMap {
        self.flush(String::new()).sections
    }
}

pub fn segment(blocks: &[Block], definitions: &LinkDefinitions, partition_level: u8) -> SectionMap {
    blocks
        .iter()
        .fold(Accumulator::new(), |acc, block| acc.step(block, partition_level, definitions))
        .finish()
}
