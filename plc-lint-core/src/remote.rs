// Hosting-service lookups for the repository family

use crate::types::Branch;
use std::collections::HashMap;
use tracing::debug;

/// Lists a hosted project's branches.
///
/// `None` means the project could not be read (private, missing or
/// unreachable). An unreadable body yields an empty list.
pub trait BranchSource: Send + Sync {
    fn branches(&self, project_path: &str) -> Option<Vec<Branch>>;
}

/// `git@host:group/project` → `https://host/group/project`
pub fn normalize_remote_url(url: &str) -> String {
    match url.strip_prefix("git@") {
        Some(rest) => format!("https://{}", rest.replacen(':', "/", 1)),
        None => url.to_string(),
    }
}

/// Project path of `remote` below `organization_url`, without a `.git` suffix
pub fn project_path(remote: &str, organization_url: &str) -> Option<String> {
    normalize_remote_url(remote)
        .strip_prefix(organization_url)
        .map(|project| project.trim_end_matches('/').trim_end_matches(".git").to_string())
        .filter(|project| !project.is_empty())
}

#[cfg(feature = "http")]
pub struct GitLabBranchSource {
    api_url: String,
    agent: ureq::Agent,
}

#[cfg(feature = "http")]
impl GitLabBranchSource {
    pub fn new(api_url: impl Into<String>, timeout: Option<std::time::Duration>) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            api_url: api_url.into(),
            agent: builder.build(),
        }
    }

    fn branches_url(&self, project_path: &str) -> String {
        format!(
            "{}/projects/{}/repository/branches",
            self.api_url.trim_end_matches('/'),
            urlencoding::encode(project_path)
        )
    }
}

#[cfg(feature = "http")]
impl BranchSource for GitLabBranchSource {
    fn branches(&self, project_path: &str) -> Option<Vec<Branch>> {
        let url = self.branches_url(project_path);
        let response = match self.agent.get(&url).call() {
            Ok(response) if (200..=399).contains(&response.status()) => response,
            Ok(response) => {
                debug!("{} answered {}", url, response.status());
                return None;
            }
            Err(err) => {
                debug!("branch lookup for {} failed: {}", project_path, err);
                return None;
            }
        };

        let body = response.into_string().unwrap_or_default();
        match serde_json::from_str::<Vec<Branch>>(&body) {
            Ok(branches) => Some(branches),
            Err(err) => {
                tracing::warn!("⚠️  unreadable branch list for {}: {}", project_path, err);
                Some(Vec::new())
            }
        }
    }
}

/// Fixed project → branches table
#[derive(Debug, Clone, Default)]
pub struct StaticBranchSource {
    projects: HashMap<String, Vec<Branch>>,
}

impl StaticBranchSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(mut self, project_path: impl Into<String>, branches: Vec<Branch>) -> Self {
        self.projects.insert(project_path.into(), branches);
        self
    }
}

impl BranchSource for StaticBranchSource {
    fn branches(&self, project_path: &str) -> Option<Vec<Branch>> {
        self.projects.get(project_path).cloned()
    }
}
