//! End-to-end engine tests.
//!
//! Each test builds an in-memory subject and skeleton repository, runs the
//! full family pipeline with stub network capabilities, and asserts on the
//! resulting report.

use plc_lint_core::config::FamilyConfig;
use plc_lint_core::types::{Branch, CommitHistory, RepositoryDetails, RepositoryFiles, RuleCode, Status};
use plc_lint_core::{
    Document, EvaluationInput, LintConfig, LintReport, RuleEngine, StaticBranchSource, StaticLinkResolver, CATALOG,
    CATALOG_VERSION,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::BTreeMap;

// ============================================================================
// Fixture helpers
// ============================================================================

const README: &str = "\
# Pipeline Components: widget

[![pipeline status](https://gitlab.com/pipeline-components/widget/badges/main/pipeline.svg)](https://gitlab.com/pipeline-components/widget/-/commits/main)

## Usage

Run it.

## Versioning

We use SemVer.

## Support

Open an issue.

## Contributing

Merge requests welcome.

## Authors & contributors

The original setup of this repository is by [Robbert Müller](https://gitlab.com/mjrider).

For all contributors see the [contributor's page](https://gitlab.com/pipeline-components/widget/-/graphs/main).

## License

This project is licensed under a [MIT License](./LICENSE).
Created by [Robbert Müller](https://gitlab.com/mjrider).
";

const LICENSE: &str = "\
MIT License

Copyright (c) 2018-2024 Pipeline Components

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files.
";

const LIVE_URLS: [&str; 3] = [
    "https://gitlab.com/mjrider",
    "https://gitlab.com/pipeline-components/widget/-/graphs/main",
    "https://gitlab.com/pipeline-components/widget/-/blob/HEAD/LICENSE",
];

fn component_files() -> RepositoryFiles {
    let mut files: RepositoryFiles = [
        (".gitignore", "/target\n"),
        (".gitlab-ci.yml", "include: []\n"),
        (".mdlrc", "rules \"~MD013\"\n"),
        (".yamllint", "extends: default\n"),
        ("action.yml", "name: widget\n"),
        ("Dockerfile", "FROM alpine\nENV DEFAULTCMD=widget\n"),
        ("LICENSE", LICENSE),
        ("README.md", README),
        ("renovate.json", "{}\n"),
        ("app/.gitkeep", ""),
        (".github/FUNDING.yml", "custom: []\n"),
        (".github/workflows/release.yml", "on: push\n"),
    ]
    .into_iter()
    .collect();
    files.insert_directory("app");
    files.insert_directory(".github");
    files.insert_directory(".github/workflows");
    files
}

fn history() -> CommitHistory {
    CommitHistory::new(
        ["2024-06-01T10:00:00+02:00", "2018-03-01T09:00:00+00:00"]
            .iter()
            .map(|ts| chrono::DateTime::parse_from_rfc3339(ts).unwrap())
            .collect(),
    )
}

fn details() -> RepositoryDetails {
    let mut remotes = BTreeMap::new();
    remotes.insert(
        "origin".to_string(),
        vec!["git@gitlab.com:pipeline-components/widget.git".to_string()],
    );
    RepositoryDetails { remotes }
}

fn engine(config: LintConfig, live: &[&str]) -> RuleEngine {
    let branches = StaticBranchSource::new().with_project(
        "widget",
        vec![Branch {
            name: "main".to_string(),
            default: true,
            protected: true,
            web_url: None,
        }],
    );
    RuleEngine::new_with_dependencies(
        config,
        Box::new(StaticLinkResolver::new(live.iter().copied())),
        Box::new(branches),
    )
}

fn evaluate(engine: &RuleEngine, files: &RepositoryFiles, skeleton: &RepositoryFiles) -> LintReport {
    let history = history();
    let details = details();
    engine.evaluate(EvaluationInput {
        project_name: Some("widget"),
        component_name: "widget",
        files,
        skeleton,
        history: Some(&history),
        details: Some(&details),
    })
}

fn status(report: &LintReport, family: u8, number: u16) -> Status {
    report
        .results
        .iter()
        .find(|r| r.code == RuleCode::new(family, number))
        .map(|r| r.status)
        .unwrap_or_else(|| panic!("no result for PLC{}{:03}", family, number))
}

// ============================================================================
// Engine behaviour
// ============================================================================

#[test]
fn test_compliant_repository_has_no_failures() {
    let files = component_files();
    let report = evaluate(&engine(LintConfig::default(), &LIVE_URLS), &files, &files);

    let failures: Vec<String> = report
        .results
        .iter()
        .filter(|r| matches!(r.status, Status::Fail | Status::Error))
        .map(|r| r.to_line())
        .collect();
    assert_eq!(failures, Vec::<String>::new());
    assert_eq!(report.catalog_version, CATALOG_VERSION);
    assert_eq!(report.component, "widget");
}

#[test]
fn test_report_covers_catalog_in_order() {
    let files = RepositoryFiles::new();
    let report = evaluate(&engine(LintConfig::default(), &[]), &files, &files);

    let codes: Vec<RuleCode> = report.results.iter().map(|r| r.code).collect();
    let catalog: Vec<RuleCode> = CATALOG.iter().map(|d| d.code).collect();
    assert_eq!(codes, catalog);
}

#[test]
fn test_dead_link_fails_only_resolution_rule() {
    let files = component_files();
    let report = evaluate(&engine(LintConfig::default(), &[]), &files, &files);

    assert_eq!(status(&report, 13, 10), Status::Pass);
    assert_eq!(status(&report, 13, 11), Status::Fail);
    assert_eq!(status(&report, 13, 12), Status::Pass);
    assert_eq!(status(&report, 13, 13), Status::Fail);
    assert_eq!(status(&report, 13, 17), Status::Pass);
    assert_eq!(status(&report, 13, 18), Status::Fail);
}

#[test]
fn test_skeleton_missing_files_are_errors() {
    let files = component_files();
    let skeleton = RepositoryFiles::new();
    let report = evaluate(&engine(LintConfig::default(), &LIVE_URLS), &files, &skeleton);

    for family in [8, 9, 12, 13, 14, 17, 19] {
        let primary = report
            .results
            .iter()
            .find(|r| r.code.family() == family)
            .map(|r| r.code);
        let errors: Vec<RuleCode> = report
            .results
            .iter()
            .filter(|r| r.code.family() == family && r.status == Status::Error)
            .map(|r| r.code)
            .collect();
        let expected_primary = if family == 13 { RuleCode::new(13, 2) } else { primary.unwrap() };
        assert_eq!(errors, vec![expected_primary], "family {}", family);
    }
    assert!(report.summary().error >= 7);
    assert!(report.skeleton_digest.len() == 64);
}

#[test]
fn test_disabled_family_reports_skip() {
    let files = RepositoryFiles::new();
    let mut config = LintConfig::default();
    config.pipeline.families = vec![
        FamilyConfig {
            name: "Folders".to_string(),
            enabled: false,
        },
        FamilyConfig {
            name: "Files".to_string(),
            enabled: true,
        },
    ];
    let report = evaluate(&engine(config, &[]), &files, &files);

    assert_eq!(status(&report, 4, 1), Status::Skip);
    assert_eq!(status(&report, 4, 2), Status::Skip);
    assert_eq!(status(&report, 5, 1), Status::Fail);
}

#[test]
fn test_repository_family_end_to_end() {
    let files = component_files();
    let report = evaluate(&engine(LintConfig::default(), &LIVE_URLS), &files, &files);
    for number in 1..=5 {
        assert_eq!(status(&report, 2, number), Status::Pass, "PLC200{}", number);
    }
    assert_eq!(status(&report, 12, 5), Status::Pass);
}

#[test]
fn test_config_from_yaml_changes_policy() {
    let yaml = "policy:\n  heading_prefix: \"Widgets: \"\n";
    let config: LintConfig = serde_yaml::from_str(yaml).unwrap();
    let files = component_files();
    let report = evaluate(&engine(config, &LIVE_URLS), &files, &files);
    assert_eq!(status(&report, 13, 2), Status::Fail);
}

// ============================================================================
// Document properties
// ============================================================================

fn word() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn line() -> impl Strategy<Value = String> {
    prop::collection::vec(word(), 1..6).prop_map(|words| words.join(" "))
}

fn block() -> impl Strategy<Value = String> {
    prop_oneof![
        (1usize..=3, line()).prop_map(|(level, text)| format!("{} {}", "#".repeat(level), text)),
        (line(), "#{0,2}", prop::bool::ANY).prop_map(|(text, tail, spaced)| {
            let gap = if spaced && !tail.is_empty() { " " } else { "" };
            format!("{}{}{}\n---", text, gap, tail)
        }),
        prop::collection::vec(line(), 1..4).prop_map(|lines| lines.join("\n")),
        prop::collection::vec(line(), 1..4)
            .prop_map(|items| items.iter().map(|i| format!("- {}", i)).collect::<Vec<_>>().join("\n")),
        prop::collection::vec(line(), 0..3).prop_map(|lines| format!("```\n{}\n```", lines.join("\n"))),
    ]
}

fn markdown() -> impl Strategy<Value = String> {
    prop::collection::vec(block(), 0..12).prop_map(|blocks| blocks.join("\n\n"))
}

proptest! {
    #[test]
    fn prop_render_then_resegment_is_stable(text in markdown()) {
        let document = Document::parse(&text);
        let reparsed = Document::parse(&document.render());
        prop_assert_eq!(reparsed.sections(2), document.sections(2));
        prop_assert_eq!(reparsed.headings(), document.headings());
    }

    #[test]
    fn prop_identical_documents_identical_sections(text in markdown()) {
        let a = Document::parse(&text).sections(2);
        let b = Document::parse(&text).sections(2);
        prop_assert_eq!(a, b);
    }
}
