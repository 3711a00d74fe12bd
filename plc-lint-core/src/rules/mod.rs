// Rule families and the engine that runs them
//
// - catalog.rs: canonical code → policy table
// - board.rs: per-family status bookkeeping
// - engine.rs: RuleEngine, config-driven family pipeline
// - one module per family (or group of look-alike families)

pub mod app_folder;
pub mod board;
pub mod catalog;
pub mod component;
pub mod engine;
pub mod identical;
pub mod license;
pub mod presence;
pub mod readme;
pub mod repository;

pub use board::StatusBoard;
pub use catalog::{RuleDefinition, CATALOG, CATALOG_VERSION};
pub use engine::RuleEngine;

use crate::config::LintConfig;
use crate::remote::BranchSource;
use crate::types::{CommitHistory, RepositoryDetails, RepositoryFiles};

/// Pipeline names of all families, in catalog order
pub const FAMILY_NAMES: &[&str] = &[
    "Component",
    "Repository",
    "Folders",
    "Files",
    "MdlrcFile",
    "YamllintFile",
    "LicenseFile",
    "ReadmeFile",
    "RenovateFile",
    "AppFolder",
    "GithubFolder",
    "FundingFile",
    "WorkflowsFolder",
    "ReleaseFile",
];

/// Everything the I/O collaborators gathered about one repository
#[derive(Debug, Clone, Copy)]
pub struct EvaluationInput<'a> {
    /// Base name of the project directory, when there is one
    pub project_name: Option<&'a str>,
    pub component_name: &'a str,
    pub files: &'a RepositoryFiles,
    pub skeleton: &'a RepositoryFiles,
    /// `None` when the project is not a git repository
    pub history: Option<&'a CommitHistory>,
    pub details: Option<&'a RepositoryDetails>,
}

/// What a family sees while evaluating
pub struct EvaluationContext<'a> {
    pub input: EvaluationInput<'a>,
    pub config: &'a LintConfig,
    pub branches: &'a dyn BranchSource,
}

/// A group of related rules sharing one code prefix
pub trait RuleFamily: Send + Sync {
    /// Numeric family, the `N` of `PLC<N>xxx`
    fn family(&self) -> u8;

    /// Pipeline name, as listed in [`FAMILY_NAMES`]
    fn name(&self) -> &str;

    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> StatusBoard;
}

/// The standard family set, in catalog order
pub fn default_families() -> Vec<Box<dyn RuleFamily>> {
    vec![
        Box::new(component::ComponentFamily),
        Box::new(repository::RepositoryFamily),
        Box::new(presence::PresenceFamily::folders()),
        Box::new(presence::PresenceFamily::files()),
        Box::new(identical::IdenticalFileFamily::mdlrc()),
        Box::new(identical::IdenticalFileFamily::yamllint()),
        Box::new(license::LicenseFamily),
        Box::new(readme::ReadmeFamily),
        Box::new(identical::IdenticalFileFamily::renovate()),
        Box::new(app_folder::AppFolderFamily),
        Box::new(presence::PresenceFamily::github_folder()),
        Box::new(identical::IdenticalFileFamily::funding()),
        Box::new(presence::PresenceFamily::workflows_folder()),
        Box::new(identical::IdenticalFileFamily::release()),
    ]
}

/// Message used when a compared file is absent from the skeleton
pub(crate) fn missing_from_skeleton(file: &str) -> String {
    format!(
        "The required `{}` file is missing from the skeleton repository",
        file
    )
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::remote::StaticBranchSource;
    use crate::types::{RuleCode, RuleResult, Status};
    use std::collections::HashMap;

    pub fn input<'a>(files: &'a RepositoryFiles, skeleton: &'a RepositoryFiles) -> EvaluationInput<'a> {
        EvaluationInput {
            project_name: Some("widget"),
            component_name: "widget",
            files,
            skeleton,
            history: None,
            details: None,
        }
    }

    pub fn run(family: &dyn RuleFamily, input: EvaluationInput<'_>) -> Vec<RuleResult> {
        run_resolving(family, input, &HashMap::new())
    }

    pub fn run_resolving(
        family: &dyn RuleFamily,
        input: EvaluationInput<'_>,
        resolutions: &HashMap<String, bool>,
    ) -> Vec<RuleResult> {
        run_with_config(family, input, &LintConfig::default(), resolutions)
    }

    pub fn run_with_config(
        family: &dyn RuleFamily,
        input: EvaluationInput<'_>,
        config: &LintConfig,
        resolutions: &HashMap<String, bool>,
    ) -> Vec<RuleResult> {
        let branches = StaticBranchSource::new();
        let ctx = EvaluationContext {
            input,
            config,
            branches: &branches,
        };
        family.evaluate(&ctx).finish(resolutions)
    }

    pub fn status_of(results: &[RuleResult], family: u8, number: u16) -> Status {
        results
            .iter()
            .find(|r| r.code == RuleCode::new(family, number))
            .map(|r| r.status)
            .unwrap_or_else(|| panic!("no result for PLC{}{:03}", family, number))
    }

    #[test]
    fn test_family_names_match_families() {
        let names: Vec<String> = default_families().iter().map(|f| f.name().to_string()).collect();
        assert_eq!(names, FAMILY_NAMES.iter().map(|n| n.to_string()).collect::<Vec<_>>());
    }
}
