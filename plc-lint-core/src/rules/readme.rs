// PLC13: structure and attributions of README.md

use super::{missing_from_skeleton, EvaluationContext, RuleFamily, StatusBoard};
use crate::differ::{compare_section, diff_headings, headings_equal, SectionComparison};
use crate::document::{Document, LinkDefinitions, SectionMap, ROOT_SECTION};
use crate::extract::links::{after_marker, first_link_with};
use crate::types::RuleCode;
use regex::Regex;
use tracing::debug;

const TARGET: &str = "README.md";

const HEADING: RuleCode = RuleCode::new(13, 2);
const BADGES: RuleCode = RuleCode::new(13, 3);
const MAIN_SECTIONS: RuleCode = RuleCode::new(13, 4);
const VERSIONING: RuleCode = RuleCode::new(13, 5);
const SUPPORT: RuleCode = RuleCode::new(13, 6);
const CONTRIBUTING: RuleCode = RuleCode::new(13, 7);
const AUTHOR: RuleCode = RuleCode::new(13, 9);
const AUTHOR_LINK: RuleCode = RuleCode::new(13, 10);
const AUTHOR_LINK_RESOLVES: RuleCode = RuleCode::new(13, 11);
const CONTRIBUTORS: RuleCode = RuleCode::new(13, 12);
const CONTRIBUTORS_RESOLVES: RuleCode = RuleCode::new(13, 13);
const CREATOR: RuleCode = RuleCode::new(13, 14);
const CREATOR_RESOLVES: RuleCode = RuleCode::new(13, 15);
const LICENSE_TYPE: RuleCode = RuleCode::new(13, 16);
const LICENSE_LINK: RuleCode = RuleCode::new(13, 17);
const LICENSE_LINK_RESOLVES: RuleCode = RuleCode::new(13, 18);

const AUTHORS_SECTION: &str = "Authors & contributors";
const LICENSE_SECTION: &str = "License";

const INITIAL_AUTHOR_MARKER: &str = "The original setup of this repository is by ";
const CONTRIBUTORS_MARKER: &str = "contributor's page";
const LICENSED_UNDER_MARKER: &str = "licensed under a ";

/// Sections that must match the skeleton verbatim when present
const VERBATIM_SECTIONS: [(RuleCode, &str); 3] = [
    (VERSIONING, "Versioning"),
    (SUPPORT, "Support"),
    (CONTRIBUTING, "Contributing"),
];

fn contributors_pattern(organization: &str, component: &str) -> Option<Regex> {
    let pattern = format!(
        "^{}(?:[^/]+/)?{}/-/graphs/main",
        regex::escape(organization),
        regex::escape(component)
    );
    Regex::new(&pattern)
        .map_err(|e| debug!("contributors pattern rejected: {}", e))
        .ok()
}

pub struct ReadmeFamily;

impl ReadmeFamily {
    fn check_structure(board: &mut StatusBoard, ours: &Document, theirs: &Document, ctx: &EvaluationContext<'_>) {
        let policy = &ctx.config.policy;

        if let Some(title) = ours.first_heading(1) {
            board.check(HEADING, title.text.starts_with(&policy.heading_prefix));
        }

        let subject_sections = ours.sections(policy.partition_level);
        let skeleton_sections = theirs.sections(policy.partition_level);
        board.check(
            BADGES,
            subject_sections.content(ROOT_SECTION) == skeleton_sections.content(ROOT_SECTION),
        );

        let level = policy.partition_level;
        let subject_headings = ours.headings_between(level, level);
        let skeleton_headings = theirs.headings_between(level, level);
        if headings_equal(&subject_headings, &skeleton_headings) {
            board.pass(MAIN_SECTIONS);
        } else {
            let diff = diff_headings(&subject_headings, &skeleton_headings);
            debug!(
                "README sections differ at {:?}: missing {:?}, unexpected {:?}",
                diff.first_mismatch, diff.missing, diff.unexpected
            );
        }

        for (code, name) in VERBATIM_SECTIONS {
            match compare_section(&subject_sections, &skeleton_sections, name) {
                SectionComparison::Absent => {}
                SectionComparison::Identical => board.pass(code),
                SectionComparison::Differs => board.fail(code),
            }
        }
    }

    fn check_authors(board: &mut StatusBoard, sections: &SectionMap, definitions: &LinkDefinitions, ctx: &EvaluationContext<'_>) {
        let Some(content) = sections.content(AUTHORS_SECTION) else {
            return;
        };
        board.fail_all(&[AUTHOR, CONTRIBUTORS, CONTRIBUTORS_RESOLVES]);

        let initial_author = content
            .lines()
            .find_map(|line| after_marker(line, INITIAL_AUTHOR_MARKER));
        if let Some(fragment) = initial_author {
            board.pass(AUTHOR);
            if let Some(link) = first_link_with(fragment, definitions) {
                board.pass(AUTHOR_LINK);
                board.pass_if_resolves(AUTHOR_LINK_RESOLVES, link.url);
            }
        }

        let Some(pattern) = contributors_pattern(&ctx.config.organization.url, ctx.input.component_name) else {
            return;
        };
        let contributors = content
            .lines()
            .filter(|line| line.contains(CONTRIBUTORS_MARKER))
            .find_map(|line| first_link_with(line, definitions))
            .filter(|link| pattern.is_match(&link.url));
        if let Some(link) = contributors {
            board.pass(CONTRIBUTORS);
            board.pass_if_resolves(CONTRIBUTORS_RESOLVES, link.url);
        }
    }

    fn check_license(board: &mut StatusBoard, sections: &SectionMap, definitions: &LinkDefinitions, ctx: &EvaluationContext<'_>) {
        let Some(content) = sections.content(LICENSE_SECTION) else {
            return;
        };
        let policy = &ctx.config.policy;
        board.fail_all(&[CREATOR, CREATOR_RESOLVES, LICENSE_TYPE, LICENSE_LINK, LICENSE_LINK_RESOLVES]);

        let attribution = content.lines().find_map(|line| {
            line.find(&policy.creator_attribution).map(|idx| &line[idx..])
        });
        if let Some(fragment) = attribution {
            board.pass(CREATOR);
            if let Some(link) = first_link_with(fragment, definitions) {
                if link.url == policy.creator_url {
                    board.pass_if_resolves(CREATOR_RESOLVES, link.url);
                }
            }
        }

        let license = content
            .lines()
            .filter_map(|line| after_marker(line, LICENSED_UNDER_MARKER))
            .find_map(|fragment| first_link_with(fragment, definitions));
        let Some(link) = license else {
            return;
        };
        board.check(LICENSE_TYPE, policy.license_labels.contains(&link.label));
        if link.url == policy.license_link {
            board.pass(LICENSE_LINK);
            let url = format!(
                "{}{}/-/blob/HEAD/{}",
                ctx.config.organization.url,
                ctx.input.component_name,
                link.url.trim_start_matches("./")
            );
            board.pass_if_resolves(LICENSE_LINK_RESOLVES, url);
        }
    }
}

impl RuleFamily for ReadmeFamily {
    fn family(&self) -> u8 {
        13
    }

    fn name(&self) -> &str {
        "ReadmeFile"
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> StatusBoard {
        let mut board = StatusBoard::new(self.family());
        let policy = &ctx.config.policy;
        board.set_message(
            CREATOR,
            format!(
                "The 'License' section in the `README.md` file MUST contain the creator attribution `{}`",
                policy.creator_attribution
            ),
        );
        board.set_message(
            CREATOR_RESOLVES,
            format!(
                "The attribution in the 'License' section in the `README.md` file MUST resolve to {}",
                policy.creator_url
            ),
        );

        let Some(ours) = ctx.input.files.file(TARGET) else {
            return board;
        };
        let Some(theirs) = ctx.input.skeleton.file(TARGET) else {
            board.error(HEADING, missing_from_skeleton(TARGET));
            return board;
        };

        let ours = Document::parse(ours);
        let theirs = Document::parse(theirs);
        board.fail_all(&[HEADING, BADGES, MAIN_SECTIONS]);
        Self::check_structure(&mut board, &ours, &theirs, ctx);

        let sections = ours.sections(ctx.config.policy.partition_level);
        Self::check_authors(&mut board, &sections, ours.definitions(), ctx);
        Self::check_license(&mut board, &sections, ours.definitions(), ctx);
        board
    }
}
