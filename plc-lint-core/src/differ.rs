// Structural comparison of a subject document against its skeleton

use crate::document::SectionMap;
use crate::types::Heading;
use tracing::debug;

/// Outcome of comparing one named section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionComparison {
    /// The subject has no such section
    Absent,
    Identical,
    Differs,
}

/// Where two heading lists diverge; empty when they are equal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadingDiff {
    /// Skeleton headings the subject lacks
    pub missing: Vec<String>,
    /// Subject headings the skeleton lacks
    pub unexpected: Vec<String>,
    /// First position at which the lists disagree
    pub first_mismatch: Option<usize>,
}

impl HeadingDiff {
    pub fn is_equal(&self) -> bool {
        self.first_mismatch.is_none()
    }
}

/// Element-wise equality of level, text and ordinal
pub fn headings_equal(subject: &[Heading], skeleton: &[Heading]) -> bool {
    subject == skeleton
}

pub fn diff_headings(subject: &[Heading], skeleton: &[Heading]) -> HeadingDiff {
    let first_mismatch = subject
        .iter()
        .zip(skeleton)
        .position(|(a, b)| a != b)
        .or_else(|| (subject.len() != skeleton.len()).then(|| subject.len().min(skeleton.len())));

    let texts = |headings: &[Heading]| headings.iter().map(|h| h.text.clone()).collect::<Vec<_>>();
    let subject_texts = texts(subject);
    let skeleton_texts = texts(skeleton);

    HeadingDiff {
        missing: skeleton_texts
            .iter()
            .filter(|t| !subject_texts.contains(t))
            .cloned()
            .collect(),
        unexpected: subject_texts
            .iter()
            .filter(|t| !skeleton_texts.contains(t))
            .cloned()
            .collect(),
        first_mismatch,
    }
}

pub fn compare_section(subject: &SectionMap, skeleton: &SectionMap, name: &str) -> SectionComparison {
    let Some(ours) = subject.content(name) else {
        return SectionComparison::Absent;
    };

    match skeleton.content(name) {
        Some(theirs) if theirs == ours => SectionComparison::Identical,
        Some(_) => {
            debug!("section '{}' differs from the skeleton", name);
            SectionComparison::Differs
        }
        None => {
            debug!("section '{}' has no skeleton counterpart", name);
            SectionComparison::Differs
        }
    }
}
