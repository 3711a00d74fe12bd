use super::{catalog, default_families, EvaluationContext, EvaluationInput, RuleFamily, StatusBoard};
use crate::config::LintConfig;
use crate::remote::BranchSource;
use crate::report::{skeleton_digest, LintReport};
use crate::resolver::{resolve_all, LinkResolver};
use crate::types::RuleResult;
use std::cell::RefCell;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Runs the configured family pipeline over one repository
pub struct RuleEngine {
    config: LintConfig,
    resolver: Box<dyn LinkResolver>,
    branches: Box<dyn BranchSource>,
    families: Vec<Box<dyn RuleFamily>>,
    pub rule_timings: RefCell<Vec<(String, Duration)>>,
}

impl RuleEngine {
    /// Engine over the standard families, talking to the network through
    /// the given capabilities
    pub fn new_with_dependencies(
        config: LintConfig,
        resolver: Box<dyn LinkResolver>,
        branches: Box<dyn BranchSource>,
    ) -> Self {
        Self {
            config,
            resolver,
            branches,
            families: default_families(),
            rule_timings: RefCell::new(Vec::new()),
        }
    }

    /// Engine that resolves nothing and sees no branches
    pub fn offline(config: LintConfig) -> Self {
        Self::new_with_dependencies(
            config,
            Box::new(crate::resolver::StaticLinkResolver::offline()),
            Box::new(crate::remote::StaticBranchSource::new()),
        )
    }

    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    fn evaluate_family(&self, family: &dyn RuleFamily, ctx: &EvaluationContext<'_>) -> StatusBoard {
        if !self.config.pipeline.is_enabled(family.name()) {
            debug!("⏭️  Skipping disabled family: {}", family.name());
            return StatusBoard::new(family.family());
        }

        let started = Instant::now();
        let board = family.evaluate(ctx);
        let elapsed = started.elapsed();
        debug!(
            "🔧 {} evaluated in {:?} ({} link check(s))",
            family.name(),
            elapsed,
            board.link_checks().len()
        );
        self.rule_timings
            .borrow_mut()
            .push((family.name().to_string(), elapsed));
        board
    }

    /// One result per catalog code, in code order. Never fails: anything
    /// that cannot be evaluated surfaces as Skip or Error results.
    pub fn evaluate(&self, input: EvaluationInput<'_>) -> LintReport {
        self.rule_timings.borrow_mut().clear();

        let ctx = EvaluationContext {
            input,
            config: &self.config,
            branches: self.branches.as_ref(),
        };

        let boards: Vec<StatusBoard> = self
            .families
            .iter()
            .map(|family| self.evaluate_family(family.as_ref(), &ctx))
            .collect();

        let resolutions = resolve_all(
            self.resolver.as_ref(),
            boards
                .iter()
                .flat_map(|board| board.link_checks())
                .map(|check| check.url.as_str()),
        );

        let mut results: Vec<RuleResult> = boards
            .into_iter()
            .flat_map(|board| board.finish(&resolutions))
            .collect();
        results.sort_by_key(|result| result.code);

        if results.len() != catalog::CATALOG.len() {
            warn!(
                "⚠️  {} results for {} catalog codes",
                results.len(),
                catalog::CATALOG.len()
            );
        }

        let report = LintReport::new(
            input.component_name,
            skeleton_digest(input.skeleton),
            results,
        );
        let summary = report.summary();
        info!(
            "📊 {}: {} passed, {} failed, {} skipped, {} errors",
            report.component, summary.pass, summary.fail, summary.skip, summary.error
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FamilyConfig;
    use crate::resolver::StaticLinkResolver;
    use crate::rules::testing::input;
    use crate::types::{RepositoryFiles, RuleCode, Status};

    #[test]
    fn test_every_catalog_code_reported_in_order() {
        let files = RepositoryFiles::new();
        let engine = RuleEngine::offline(LintConfig::default());
        let report = engine.evaluate(input(&files, &files));

        let codes: Vec<RuleCode> = report.results.iter().map(|r| r.code).collect();
        let expected: Vec<RuleCode> = catalog::CATALOG.iter().map(|d| d.code).collect();
        assert_eq!(codes, expected);
        assert_eq!(engine.rule_timings.borrow().len(), default_families().len());
    }

    #[test]
    fn test_disabled_family_is_skipped() {
        let files: RepositoryFiles = [("Dockerfile", "FROM alpine")].into_iter().collect();
        let mut config = LintConfig::default();
        config.pipeline.families = vec![FamilyConfig {
            name: "Files".to_string(),
            enabled: false,
        }];
        let engine = RuleEngine::offline(config);
        let report = engine.evaluate(input(&files, &files));

        let files_family: Vec<_> = report.results.iter().filter(|r| r.code.family() == 5).collect();
        assert_eq!(files_family.len(), 9);
        assert!(files_family.iter().all(|r| r.status == Status::Skip));
        // unlisted families still run
        assert!(report
            .results
            .iter()
            .any(|r| r.code == RuleCode::new(4, 1) && r.status == Status::Fail));
    }

    #[test]
    fn test_link_checks_resolved_once() {
        let readme = "# Pipeline Components: widget\n\n## License\n\nCreated by [Robbert Müller](https://gitlab.com/mjrider)\n";
        let files: RepositoryFiles = [("README.md", readme)].into_iter().collect();
        let engine = RuleEngine::new_with_dependencies(
            LintConfig::default(),
            Box::new(StaticLinkResolver::new(["https://gitlab.com/mjrider"])),
            Box::new(crate::remote::StaticBranchSource::new()),
        );
        let report = engine.evaluate(input(&files, &files));
        let creator = report
            .results
            .iter()
            .find(|r| r.code == RuleCode::new(13, 15))
            .map(|r| r.status);
        assert_eq!(creator, Some(Status::Pass));
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let files: RepositoryFiles = [("Dockerfile", "FROM alpine"), ("LICENSE", "MIT License")]
            .into_iter()
            .collect();
        let engine = RuleEngine::offline(LintConfig::default());
        let first = engine.evaluate(input(&files, &files));
        let second = engine.evaluate(input(&files, &files));
        assert_eq!(first, second);
        assert_eq!(first.generated_at, None);
    }
}
