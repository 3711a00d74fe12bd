use thiserror::Error;

/// Typed failures surfaced by the core library.
///
/// Rule evaluation itself never fails; these cover parsing of identifiers
/// and configuration.
#[derive(Debug, Error)]
pub enum LintError {
    #[error("unknown rule status '{0}'")]
    UnknownStatus(String),

    #[error("invalid rule code '{0}', expected PLC<family><number>")]
    InvalidRuleCode(String),

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unknown output format '{0}', expected text, json or yaml")]
    UnknownFormat(String),
}
