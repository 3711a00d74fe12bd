// plc-lint Core Library
//
// Repository policy checks for Pipeline Components: a markdown document
// model, fact extractors, and a catalog of rule families evaluated by a
// config-driven engine. All I/O (file listing, skeleton download, git)
// lives in the CLI crate; network access enters through injected
// capabilities.

pub mod config;
pub mod differ;
pub mod document;
pub mod error;
pub mod extract;
pub mod remote;
pub mod report;
pub mod resolver;
pub mod rules;
pub mod types;

// Re-export main types and functions for easy use
pub use config::LintConfig;
pub use document::{Document, SectionMap};
pub use error::LintError;
pub use remote::{BranchSource, StaticBranchSource};
pub use report::{LintReport, OutputFormat, Summary};
pub use resolver::{LinkResolver, StaticLinkResolver};
pub use rules::{EvaluationInput, RuleEngine, CATALOG, CATALOG_VERSION};
pub use types::*;

#[cfg(feature = "http")]
pub use remote::GitLabBranchSource;
#[cfg(feature = "http")]
pub use resolver::HttpLinkResolver;
