// Lint report and its serialized forms

use crate::error::LintError;
use crate::rules::CATALOG_VERSION;
use crate::types::{RepositoryFiles, RuleResult, Status};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LintReport {
    pub catalog_version: String,
    pub component: String,
    /// Set by the caller; evaluation itself never reads the clock
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    /// SHA-256 of the skeleton the repository was compared against
    pub skeleton_digest: String,
    pub results: Vec<RuleResult>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub pass: usize,
    pub fail: usize,
    pub skip: usize,
    pub error: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = LintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => Err(LintError::UnknownFormat(s.to_string())),
        }
    }
}

impl LintReport {
    pub fn new(component: impl Into<String>, skeleton_digest: String, results: Vec<RuleResult>) -> Self {
        Self {
            catalog_version: CATALOG_VERSION.to_string(),
            component: component.into(),
            generated_at: None,
            skeleton_digest,
            results,
        }
    }

    pub fn stamped(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    pub fn summary(&self) -> Summary {
        self.results.iter().fold(Summary::default(), |mut summary, result| {
            match result.status {
                Status::Pass => summary.pass += 1,
                Status::Fail => summary.fail += 1,
                Status::Skip => summary.skip += 1,
                Status::Error => summary.error += 1,
            }
            summary
        })
    }

    pub fn has_status(&self, status: Status) -> bool {
        self.results.iter().any(|r| r.status == status)
    }

    pub fn to_lines(&self) -> Vec<String> {
        self.results.iter().map(RuleResult::to_line).collect()
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => {
                let mut text = self.to_lines().join("\n");
                text.push('\n');
                Ok(text)
            }
            OutputFormat::Json => serde_json::to_string_pretty(self).context("Failed to serialize report as JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(self).context("Failed to serialize report as YAML"),
        }
    }

    pub fn save_with_format(&self, path: &Path, format: OutputFormat) -> Result<()> {
        let rendered = self.render(format)?;
        std::fs::write(path, rendered)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        Ok(())
    }
}

/// Hash over the sorted `(path, content)` pairs of a file set
pub fn skeleton_digest(files: &RepositoryFiles) -> String {
    let mut hasher = Sha256::new();
    for (path, content) in files.iter() {
        hasher.update(path.as_bytes());
        hasher.update([0u8]);
        hasher.update(content.as_bytes());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RuleCode;
    use pretty_assertions::assert_eq;

    fn report() -> LintReport {
        LintReport::new(
            "widget",
            "abc".to_string(),
            vec![
                RuleResult::new(RuleCode::new(1, 1), Status::Pass, "first"),
                RuleResult::new(RuleCode::new(1, 2), Status::Fail, "second"),
                RuleResult::new(RuleCode::new(1, 3), Status::Skip, "third"),
            ],
        )
    }

    #[test]
    fn test_summary_counts() {
        assert_eq!(
            report().summary(),
            Summary {
                pass: 1,
                fail: 1,
                skip: 1,
                error: 0
            }
        );
        assert!(report().has_status(Status::Fail));
        assert!(!report().has_status(Status::Error));
    }

    #[test]
    fn test_json_round_trips() {
        let original = report();
        let json = original.render(OutputFormat::Json).unwrap();
        let parsed: LintReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
        assert!(json.contains("\"PLC1002\""));
    }

    #[test]
    fn test_generated_at_only_when_stamped() {
        let json = report().render(OutputFormat::Json).unwrap();
        assert!(!json.contains("generated_at"));

        let at = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z").unwrap().with_timezone(&Utc);
        let stamped = report().stamped(at);
        let json = stamped.render(OutputFormat::Json).unwrap();
        assert!(json.contains("\"generated_at\": \"2024-05-01T10:00:00Z\""));
        let parsed: LintReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.generated_at, Some(at));
    }

    #[test]
    fn test_text_lines() {
        let text = report().render(OutputFormat::Text).unwrap();
        assert!(text.starts_with("PLC1001 "));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("YAML".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert!(matches!(
            "xml".parse::<OutputFormat>(),
            Err(LintError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_digest_depends_on_content() {
        let a: RepositoryFiles = [("LICENSE", "MIT")].into_iter().collect();
        let b: RepositoryFiles = [("LICENSE", "MIT ")].into_iter().collect();
        assert_eq!(skeleton_digest(&a), skeleton_digest(&a.clone()));
        assert_ne!(skeleton_digest(&a), skeleton_digest(&b));
        assert_eq!(skeleton_digest(&a).len(), 64);
    }
}
