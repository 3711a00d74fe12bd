use crate::error::LintError;
use chrono::{DateTime, Datelike, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Value stored for directory entries in a [`RepositoryFiles`] mapping.
/// Directory keys always end with `/`.
pub const DIRECTORY_MARKER: &str = "\u{0}<directory>";

// ===== RULE RESULTS =====

/// Outcome of a single rule.
///
/// `Error` means the policy could not be evaluated (missing reference data),
/// which is distinct from `Fail` (the policy was evaluated and violated).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Fail,
    Skip,
    Error,
}

impl Status {
    /// Marker used for console output
    pub fn marker(&self) -> &'static str {
        match self {
            Status::Pass => "✅",
            Status::Fail => "❌",
            Status::Skip => "⏭️",
            Status::Error => "⚠️",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "pass",
            Status::Fail => "fail",
            Status::Skip => "skip",
            Status::Error => "error",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = LintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pass" => Ok(Status::Pass),
            "fail" => Ok(Status::Fail),
            "skip" => Ok(Status::Skip),
            "error" => Ok(Status::Error),
            _ => Err(LintError::UnknownStatus(s.to_string())),
        }
    }
}

/// Stable rule identifier, rendered as `PLC<family><number:03>`.
///
/// Ordering is numeric on `(family, number)`, so `PLC2001` sorts before
/// `PLC12001`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleCode {
    family: u8,
    number: u16,
}

impl RuleCode {
    pub const fn new(family: u8, number: u16) -> Self {
        Self { family, number }
    }

    pub fn family(&self) -> u8 {
        self.family
    }

    pub fn number(&self) -> u16 {
        self.number
    }
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PLC{}{:03}", self.family, self.number)
    }
}

impl FromStr for RuleCode {
    type Err = LintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LintError::InvalidRuleCode(s.to_string());

        let digits = s.strip_prefix("PLC").ok_or_else(invalid)?;
        if digits.len() < 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let (family, number) = digits.split_at(digits.len() - 3);
        Ok(Self {
            family: family.parse().map_err(|_| invalid())?,
            number: number.parse().map_err(|_| invalid())?,
        })
    }
}

impl Serialize for RuleCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RuleCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleResult {
    pub code: RuleCode,
    pub status: Status,
    pub message: String,
}

impl RuleResult {
    pub fn new(code: RuleCode, status: Status, message: impl Into<String>) -> Self {
        Self {
            code,
            status,
            message: message.into(),
        }
    }

    /// `CODE MARKER message`, the line format printed by the CLI
    pub fn to_line(&self) -> String {
        format!("{} {} {}", self.code, self.status.marker(), self.message)
    }
}

// ===== DOCUMENT FACTS =====

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub text: String,
    /// 1-based position among all headings of the document, regardless of level
    pub ordinal: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub content: String,
    /// Position among sections of the same tier
    pub order: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttributionFact {
    pub holder: Option<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkReference {
    pub label: String,
    pub url: String,
}

// ===== REPOSITORY INPUTS =====

/// Flat `path → content` view of a repository tree.
///
/// Directories are stored with a trailing `/` and [`DIRECTORY_MARKER`] as
/// their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryFiles {
    entries: BTreeMap<String, String>,
}

impl RepositoryFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_file(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.entries.insert(path.into(), content.into());
    }

    pub fn insert_directory(&mut self, path: impl Into<String>) {
        let mut path = path.into();
        if !path.ends_with('/') {
            path.push('/');
        }
        self.entries.insert(path, DIRECTORY_MARKER.to_string());
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    /// Content of a regular file; directories yield `None`
    pub fn file(&self, path: &str) -> Option<&str> {
        self.get(path).filter(|content| *content != DIRECTORY_MARKER)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn is_directory(&self, path: &str) -> bool {
        path.ends_with('/') && self.get(path) == Some(DIRECTORY_MARKER)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RepositoryFiles {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Commit timestamps of the subject repository, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitHistory {
    timestamps: Vec<DateTime<FixedOffset>>,
}

impl CommitHistory {
    pub fn new(mut timestamps: Vec<DateTime<FixedOffset>>) -> Self {
        timestamps.sort();
        Self { timestamps }
    }

    pub fn first_year(&self) -> Option<i32> {
        self.timestamps.first().map(|ts| ts.year())
    }

    pub fn last_year(&self) -> Option<i32> {
        self.timestamps.last().map(|ts| ts.year())
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Remote name → configured URLs, as reported by the version-control tool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDetails {
    pub remotes: BTreeMap<String, Vec<String>>,
}

/// Branch metadata returned by a [`crate::remote::BranchSource`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub protected: bool,
    #[serde(default)]
    pub web_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_code_display_and_parse() {
        let code = RuleCode::new(13, 4);
        assert_eq!(code.to_string(), "PLC13004");
        assert_eq!("PLC13004".parse::<RuleCode>().unwrap(), code);
        assert_eq!("PLC1003".parse::<RuleCode>().unwrap(), RuleCode::new(1, 3));
    }

    #[test]
    fn test_rule_code_rejects_garbage() {
        assert!("PLC12".parse::<RuleCode>().is_err());
        assert!("XYZ1001".parse::<RuleCode>().is_err());
        assert!("PLC1a01".parse::<RuleCode>().is_err());
    }

    #[test]
    fn test_rule_code_orders_numerically() {
        let mut codes = vec![
            RuleCode::new(12, 1),
            RuleCode::new(2, 1),
            RuleCode::new(1, 3),
            RuleCode::new(1, 1),
        ];
        codes.sort();
        let rendered: Vec<String> = codes.iter().map(|c| c.to_string()).collect();
        assert_eq!(rendered, vec!["PLC1001", "PLC1003", "PLC2001", "PLC12001"]);
    }

    #[test]
    fn test_unknown_status_is_an_error() {
        assert_eq!("PASS".parse::<Status>().unwrap(), Status::Pass);
        assert!(matches!(
            "incomplete".parse::<Status>(),
            Err(LintError::UnknownStatus(_))
        ));
    }

    #[test]
    fn test_repository_files_directories() {
        let mut files = RepositoryFiles::new();
        files.insert_directory("app");
        files.insert_file("app/.gitkeep", "");

        assert!(files.is_directory("app/"));
        assert_eq!(files.file("app/"), None);
        assert_eq!(files.file("app/.gitkeep"), Some(""));
    }

    #[test]
    fn test_commit_history_sorts_oldest_first() {
        let parse = |s: &str| DateTime::parse_from_rfc3339(s).unwrap();
        let history = CommitHistory::new(vec![
            parse("2005-06-01T00:00:00+00:00"),
            parse("1999-01-01T00:00:00+00:00"),
        ]);
        assert_eq!(history.first_year(), Some(1999));
        assert_eq!(history.last_year(), Some(2005));
    }
}
