// PLC12: the LICENSE file

use super::{missing_from_skeleton, EvaluationContext, RuleFamily, StatusBoard};
use crate::extract::attribution;
use crate::types::{CommitHistory, RuleCode, Status};
use tracing::debug;

const TARGET: &str = "LICENSE";

const MIT_IDENTICAL: RuleCode = RuleCode::new(12, 1);
const ATTRIBUTION: RuleCode = RuleCode::new(12, 2);
const CREATION_YEAR: RuleCode = RuleCode::new(12, 3);
const YEAR_RANGE: RuleCode = RuleCode::new(12, 4);
const RANGE_END: RuleCode = RuleCode::new(12, 5);
const HOLDER: RuleCode = RuleCode::new(12, 6);
const HOLDER_ACCEPTED: RuleCode = RuleCode::new(12, 7);

const NO_HISTORY: &str = "No log entries found for the repository";

/// License body from `marker` onwards with all whitespace runs collapsed
fn license_text(content: &str, marker: &str) -> Option<String> {
    content.find(marker).map(|idx| {
        content[idx..]
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    })
}

/// "`a`, `b` or `c`"
fn holder_list(holders: &[String]) -> String {
    let quoted: Vec<String> = holders.iter().map(|h| format!("`{}`", h)).collect();
    match quoted.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
    }
}

fn non_empty(history: Option<&CommitHistory>) -> Option<&CommitHistory> {
    history.filter(|h| !h.is_empty())
}

pub struct LicenseFamily;

impl LicenseFamily {
    fn check_license_text(board: &mut StatusBoard, ours: &str, theirs: &str, ctx: &EvaluationContext<'_>) {
        let policy = &ctx.config.policy;
        if !ours.contains(&policy.license_name) || !theirs.contains(&policy.license_name) {
            debug!("LICENSE does not name {}", policy.license_name);
            return;
        }

        let subject_text = license_text(ours, &policy.license_text_marker);
        let skeleton_text = license_text(theirs, &policy.license_text_marker);
        if subject_text.is_some() && subject_text == skeleton_text {
            board.pass(MIT_IDENTICAL);
        }
    }

    fn check_years(board: &mut StatusBoard, line: &str, history: Option<&CommitHistory>) {
        let (year_from, year_to) = attribution::years(line);
        let Some(year_from) = year_from else {
            return;
        };

        match non_empty(history) {
            None => {
                board.error(CREATION_YEAR, NO_HISTORY);
                if year_to.is_some() {
                    board.pass(YEAR_RANGE);
                    board.error(RANGE_END, NO_HISTORY);
                }
            }
            Some(history) => {
                board.check(CREATION_YEAR, history.first_year() == Some(year_from));
                if let Some(year_to) = year_to {
                    board.pass(YEAR_RANGE);
                    board.check(RANGE_END, history.last_year() == Some(year_to));
                }
            }
        }
    }
}

impl RuleFamily for LicenseFamily {
    fn family(&self) -> u8 {
        12
    }

    fn name(&self) -> &str {
        "LicenseFile"
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> StatusBoard {
        let mut board = StatusBoard::new(self.family());
        board.set_message(
            HOLDER_ACCEPTED,
            format!(
                "The copyright holder MUST be {}",
                holder_list(&ctx.config.policy.accepted_holders)
            ),
        );

        let Some(ours) = ctx.input.files.file(TARGET) else {
            return board;
        };
        let Some(theirs) = ctx.input.skeleton.file(TARGET) else {
            board.error(MIT_IDENTICAL, missing_from_skeleton(TARGET));
            return board;
        };

        board.fail_all(&[MIT_IDENTICAL, ATTRIBUTION, CREATION_YEAR, HOLDER, HOLDER_ACCEPTED]);
        Self::check_license_text(&mut board, ours, theirs, ctx);

        let Some(line) = attribution::attribution_line(ours) else {
            return board;
        };
        board.pass(ATTRIBUTION);
        Self::check_years(&mut board, line, ctx.input.history);

        if let Some(holder) = attribution::holder(line) {
            board.pass(HOLDER);
            if attribution::holder_accepted(&holder, &ctx.config.policy.accepted_holders) {
                board.pass(HOLDER_ACCEPTED);
            }
        }

        debug!(
            "LICENSE attribution '{}' → creation year {:?}",
            line.trim(),
            board.status(CREATION_YEAR).unwrap_or(Status::Skip)
        );
        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LintConfig;
    use crate::rules::testing::{input, run, run_with_config, status_of};
    use crate::types::RepositoryFiles;
    use std::collections::HashMap;
    use chrono::DateTime;

    const SKELETON: &str = "MIT License\n\nCopyright (c) 2018 Pipeline Components\n\nPermission is hereby granted, free of charge,\nto any person obtaining a copy";

    fn license(content: &str) -> RepositoryFiles {
        [("LICENSE", content)].into_iter().collect()
    }

    fn history(years: &[i32]) -> CommitHistory {
        CommitHistory::new(
            years
                .iter()
                .map(|y| DateTime::parse_from_rfc3339(&format!("{}-03-01T12:00:00+00:00", y)).unwrap())
                .collect(),
        )
    }

    #[test]
    fn test_absent_license_all_skip() {
        let files = RepositoryFiles::new();
        let skeleton = license(SKELETON);
        let results = run(&LicenseFamily, input(&files, &skeleton));
        assert!(results.iter().all(|r| r.status == Status::Skip));
    }

    #[test]
    fn test_missing_from_skeleton() {
        let files = license(SKELETON);
        let skeleton = RepositoryFiles::new();
        let results = run(&LicenseFamily, input(&files, &skeleton));
        assert_eq!(status_of(&results, 12, 1), Status::Error);
        assert_eq!(
            results[0].message,
            "The required `LICENSE` file is missing from the skeleton repository"
        );
        assert!(results[1..].iter().all(|r| r.status == Status::Skip));
    }

    #[test]
    fn test_range_matching_history() {
        let files = license("MIT License\n\n(c) 1999-2005 Example Org\n\nPermission is hereby granted, free of charge, to any person obtaining a copy");
        let skeleton = license(SKELETON);
        let log = history(&[1999, 2001, 2005]);
        let mut inp = input(&files, &skeleton);
        inp.history = Some(&log);

        let results = run(&LicenseFamily, inp);
        assert_eq!(status_of(&results, 12, 1), Status::Pass);
        assert_eq!(status_of(&results, 12, 2), Status::Pass);
        assert_eq!(status_of(&results, 12, 3), Status::Pass);
        assert_eq!(status_of(&results, 12, 4), Status::Pass);
        assert_eq!(status_of(&results, 12, 5), Status::Pass);
        assert_eq!(status_of(&results, 12, 6), Status::Pass);
        assert_eq!(status_of(&results, 12, 7), Status::Fail);
    }

    #[test]
    fn test_stale_range_end_fails() {
        let files = license("Copyright (c) 2018-2020 Pipeline Components");
        let skeleton = license(SKELETON);
        let log = history(&[2018, 2024]);
        let mut inp = input(&files, &skeleton);
        inp.history = Some(&log);

        let results = run(&LicenseFamily, inp);
        assert_eq!(status_of(&results, 12, 1), Status::Fail);
        assert_eq!(status_of(&results, 12, 3), Status::Pass);
        assert_eq!(status_of(&results, 12, 5), Status::Fail);
        assert_eq!(status_of(&results, 12, 7), Status::Pass);
    }

    #[test]
    fn test_year_without_history_is_error() {
        let files = license("Copyright (c) 2018 Robbert Müller");
        let skeleton = license(SKELETON);
        let results = run(&LicenseFamily, input(&files, &skeleton));

        assert_eq!(status_of(&results, 12, 3), Status::Error);
        assert_eq!(results[2].message, "No log entries found for the repository");
        assert_eq!(status_of(&results, 12, 4), Status::Skip);
        assert_eq!(status_of(&results, 12, 5), Status::Skip);
    }

    #[test]
    fn test_no_attribution_line() {
        let files = license("MIT License\n\nPermission is hereby granted");
        let skeleton = license(SKELETON);
        let results = run(&LicenseFamily, input(&files, &skeleton));

        for number in [2, 3, 6, 7] {
            assert_eq!(status_of(&results, 12, number), Status::Fail);
        }
        assert_eq!(status_of(&results, 12, 4), Status::Skip);
    }

    #[test]
    fn test_license_text_ignores_line_wrapping() {
        let files = license("MIT License\n\nCopyright (c) 2018 Pipeline Components\n\nPermission is hereby granted, free of charge, to any\nperson obtaining a copy");
        let skeleton = license(SKELETON);
        let results = run(&LicenseFamily, input(&files, &skeleton));
        assert_eq!(status_of(&results, 12, 1), Status::Pass);
    }

    #[test]
    fn test_holder_message_follows_config() {
        let files = license(SKELETON);
        let skeleton = license(SKELETON);
        let mut config = LintConfig::default();
        config.policy.accepted_holders = vec!["Acme".to_string(), "Acme Labs".to_string()];

        let results = run_with_config(&LicenseFamily, input(&files, &skeleton), &config, &HashMap::new());
        let holder = results.iter().find(|r| r.code == HOLDER_ACCEPTED).unwrap();
        assert_eq!(holder.message, "The copyright holder MUST be `Acme` or `Acme Labs`");

        let results = run(&LicenseFamily, input(&files, &skeleton));
        let holder = results.iter().find(|r| r.code == HOLDER_ACCEPTED).unwrap();
        assert_eq!(
            holder.message,
            "The copyright holder MUST be `pipeline-components`, `Pipeline Components` or `Robbert Müller`"
        );
    }
}
