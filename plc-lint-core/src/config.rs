use crate::error::LintError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_skeleton_remote() -> String {
    "https://gitlab.com/pipeline-components/org/skeleton".to_string()
}

fn default_skeleton_reference() -> String {
    "main".to_string()
}

fn default_organization_url() -> String {
    "https://gitlab.com/pipeline-components/".to_string()
}

fn default_api_url() -> String {
    "https://gitlab.com/api/v4".to_string()
}

fn default_partition_level() -> u8 {
    2
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LintConfig {
    /// Name of the component; the project directory name when unset
    #[serde(default)]
    pub component_name: Option<String>,
    #[serde(default)]
    pub skeleton: SkeletonConfig,
    #[serde(default)]
    pub organization: OrganizationConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    /// Which rule families run; unlisted families are enabled
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkeletonConfig {
    /// Repository the reference archive is downloaded from
    #[serde(default = "default_skeleton_remote")]
    pub remote: String,
    /// Branch or tag of the archive
    #[serde(default = "default_skeleton_reference")]
    pub reference: String,
    /// Local checkout used instead of downloading
    #[serde(default)]
    pub local_path: Option<String>,
}

impl SkeletonConfig {
    /// `<remote>/-/archive/<ref>/<name>-<ref>.tar.gz`
    pub fn archive_url(&self) -> String {
        let remote = self.remote.trim_end_matches('/');
        let name = remote.rsplit('/').next().unwrap_or("skeleton");
        format!(
            "{}/-/archive/{}/{}-{}.tar.gz",
            remote, self.reference, name, self.reference
        )
    }
}

impl Default for SkeletonConfig {
    fn default() -> Self {
        Self {
            remote: default_skeleton_remote(),
            reference: default_skeleton_reference(),
            local_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationConfig {
    /// Prefix every remote must start with; ends with `/`
    #[serde(default = "default_organization_url")]
    pub url: String,
    /// Base URL of the hosting service's REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for OrganizationConfig {
    fn default() -> Self {
        Self {
            url: default_organization_url(),
            api_url: default_api_url(),
        }
    }
}

fn default_heading_prefix() -> String {
    "Pipeline Components: ".to_string()
}

fn default_accepted_holders() -> Vec<String> {
    vec![
        "pipeline-components".to_string(),
        "Pipeline Components".to_string(),
        "Robbert Müller".to_string(),
    ]
}

fn default_license_name() -> String {
    "MIT License".to_string()
}

fn default_license_text_marker() -> String {
    "Permission is hereby granted".to_string()
}

fn default_license_labels() -> Vec<String> {
    vec!["MIT license".to_string(), "MIT License".to_string()]
}

fn default_license_link() -> String {
    "./LICENSE".to_string()
}

fn default_creator_attribution() -> String {
    "Created by [Robbert Müller]".to_string()
}

fn default_creator_url() -> String {
    "https://gitlab.com/mjrider".to_string()
}

/// Organization-specific values the README and LICENSE checks compare against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Required prefix of the README's first level-1 heading
    #[serde(default = "default_heading_prefix")]
    pub heading_prefix: String,
    /// Substrings of which a license holder must contain one
    #[serde(default = "default_accepted_holders")]
    pub accepted_holders: Vec<String>,
    #[serde(default = "default_license_name")]
    pub license_name: String,
    /// Phrase the license body starts with
    #[serde(default = "default_license_text_marker")]
    pub license_text_marker: String,
    /// Accepted labels of the README license link
    #[serde(default = "default_license_labels")]
    pub license_labels: Vec<String>,
    #[serde(default = "default_license_link")]
    pub license_link: String,
    #[serde(default = "default_creator_attribution")]
    pub creator_attribution: String,
    #[serde(default = "default_creator_url")]
    pub creator_url: String,
    /// Heading level the README is split into sections at
    #[serde(default = "default_partition_level")]
    pub partition_level: u8,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            heading_prefix: default_heading_prefix(),
            accepted_holders: default_accepted_holders(),
            license_name: default_license_name(),
            license_text_marker: default_license_text_marker(),
            license_labels: default_license_labels(),
            license_link: default_license_link(),
            creator_attribution: default_creator_attribution(),
            creator_url: default_creator_url(),
            partition_level: default_partition_level(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Per-request timeout for link checks and API calls; none when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Rule families, by name
    #[serde(default)]
    pub families: Vec<FamilyConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyConfig {
    /// Name of the family
    pub name: String,
    /// Whether this family is evaluated; disabled families report Skip
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl PipelineConfig {
    pub fn is_enabled(&self, name: &str) -> bool {
        self.families
            .iter()
            .find(|family| family.name == name)
            .map(|family| family.enabled)
            .unwrap_or(true)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            families: crate::rules::FAMILY_NAMES
                .iter()
                .map(|name| FamilyConfig {
                    name: name.to_string(),
                    enabled: true,
                })
                .collect(),
        }
    }
}

impl LintConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, LintError> {
        let content = std::fs::read_to_string(path).map_err(|source| LintError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| LintError::ConfigParse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&Path>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|err| {
                warn!("⚠️  {}, using defaults", err);
                Self::default()
            }),
            None => Self::default(),
        }
    }
}
