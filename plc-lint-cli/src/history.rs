//! Git collaborators - commit history and configured remotes

use anyhow::{Context, Result};
use chrono::DateTime;
use plc_lint_core::{CommitHistory, RepositoryDetails};
use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

fn git(dir: &Path, args: &[&str]) -> Result<Option<String>> {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .context("Failed to run git; is it installed?")?;

    if !output.status.success() {
        debug!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
}

/// Whether `dir` is itself the root of a git repository
pub fn is_repository(dir: &Path) -> bool {
    dir.join(".git").exists()
}

/// Parse `git log --format=%aI` output; unparsable lines are skipped
pub fn parse_log(output: &str) -> CommitHistory {
    let timestamps = output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match DateTime::parse_from_rfc3339(line) {
            Ok(ts) => Some(ts),
            Err(e) => {
                warn!("⚠️  Ignoring commit date '{}': {}", line, e);
                None
            }
        })
        .collect();
    CommitHistory::new(timestamps)
}

/// Parse `git remote -v` output into remote name → distinct URLs
pub fn parse_remotes(output: &str) -> RepositoryDetails {
    let mut remotes: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for line in output.lines() {
        let mut fields = line.split_whitespace();
        let (Some(name), Some(url)) = (fields.next(), fields.next()) else {
            continue;
        };
        let urls = remotes.entry(name.to_string()).or_default();
        if !urls.iter().any(|u| u == url) {
            urls.push(url.to_string());
        }
    }
    RepositoryDetails { remotes }
}

/// `None` when `dir` is not a repository; a repository without commits
/// yields an empty history
pub fn commit_history(dir: &Path) -> Result<Option<CommitHistory>> {
    if !is_repository(dir) {
        return Ok(None);
    }
    let log = git(dir, &["log", "--format=%aI"])?;
    Ok(Some(log.map(|out| parse_log(&out)).unwrap_or_default()))
}

pub fn repository_details(dir: &Path) -> Result<Option<RepositoryDetails>> {
    if !is_repository(dir) {
        return Ok(None);
    }
    Ok(git(dir, &["remote", "-v"])?.map(|out| parse_remotes(&out)))
}
