//! External identity verification for Modrinth project IDs
//!
//! A courtesy check, not a trust boundary: only an explicit "not found"
//! from the remote blocks a submission. Any other status, transport
//! failure, timeout or unreadable body yields [`Verification::Unknown`].

use async_trait::async_trait;
use bmt_common::config::ModrinthConfig;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Modrinth client errors
#[derive(Debug, Error)]
pub enum ModrinthError {
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Project not found: {0}")]
    NotFound(String),

    #[error("API error {0}")]
    Api(u16),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Normalized view of a remote project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub name: String,
    pub slug: String,
    pub id: String,
    pub client_side: Option<String>,
    pub server_side: Option<String>,
}

impl ProjectSummary {
    /// Modrinth resolves both project IDs and slugs
    pub fn is_known_as(&self, identifier: &str) -> bool {
        self.id.eq_ignore_ascii_case(identifier) || self.slug.eq_ignore_ascii_case(identifier)
    }
}

/// Subset of the Modrinth `/project/{id}` response
#[derive(Debug, Deserialize)]
struct ModrinthProject {
    id: String,
    slug: String,
    title: String,
    client_side: Option<String>,
    server_side: Option<String>,
}

impl From<ModrinthProject> for ProjectSummary {
    fn from(project: ModrinthProject) -> Self {
        Self {
            name: project.title,
            slug: project.slug,
            id: project.id,
            client_side: project.client_side,
            server_side: project.server_side,
        }
    }
}

/// Tri-state verification result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// Remote confirmed the identifier
    Confirmed(ProjectSummary),
    /// Remote explicitly reported "not found"; the message blocks the submission
    Rejected(String),
    /// Nothing to check, or the remote could not answer
    Unknown,
}

impl Verification {
    pub fn is_blocking(&self) -> bool {
        matches!(self, Verification::Rejected(_))
    }

    pub fn data(&self) -> Option<&ProjectSummary> {
        match self {
            Verification::Confirmed(project) => Some(project),
            _ => None,
        }
    }
}

/// Remote lookup collaborator
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, project_id: &str) -> Verification;
}

/// Verify an optional identifier; absence needs no lookup
pub async fn verify_optional(verifier: &dyn IdentityVerifier, project_id: Option<&str>) -> Verification {
    match project_id {
        Some(id) => verifier.verify(id).await,
        None => Verification::Unknown,
    }
}

/// Verifier used when remote checks are switched off
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledVerifier;

#[async_trait]
impl IdentityVerifier for DisabledVerifier {
    async fn verify(&self, project_id: &str) -> Verification {
        tracing::debug!(project_id, "Remote verification disabled");
        Verification::Unknown
    }
}

/// Modrinth API client
pub struct ModrinthClient {
    http_client: reqwest::Client,
    base_url: Url,
}

impl ModrinthClient {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self, ModrinthError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ModrinthError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ModrinthError::InvalidBaseUrl(base_url.to_string()));
        }

        let http_client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| ModrinthError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn from_config(config: &ModrinthConfig) -> Result<Self, ModrinthError> {
        Self::new(&config.base_url, &config.user_agent, config.timeout())
    }

    /// `{base}/project/{id}` with the ID percent-encoded as one segment
    fn project_url(&self, project_id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("project").push(project_id);
        }
        url
    }

    /// Look up a project by ID or slug
    pub async fn lookup_project(&self, project_id: &str) -> Result<ProjectSummary, ModrinthError> {
        let url = self.project_url(project_id);
        tracing::debug!(project_id, url = %url, "Querying Modrinth API");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ModrinthError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ModrinthError::NotFound(project_id.to_string()));
        }
        if !status.is_success() {
            return Err(ModrinthError::Api(status.as_u16()));
        }

        let project: ModrinthProject = response
            .json()
            .await
            .map_err(|e| ModrinthError::Parse(e.to_string()))?;

        Ok(project.into())
    }
}

#[async_trait]
impl IdentityVerifier for ModrinthClient {
    async fn verify(&self, project_id: &str) -> Verification {
        match self.lookup_project(project_id).await {
            Ok(project) => {
                if !project.is_known_as(project_id) {
                    tracing::warn!(
                        project_id,
                        resolved_id = %project.id,
                        resolved_slug = %project.slug,
                        "Modrinth resolved the ID to a project with a different ID and slug"
                    );
                }
                tracing::info!(
                    project_id,
                    title = %project.name,
                    client_side = project.client_side.as_deref().unwrap_or("unknown"),
                    server_side = project.server_side.as_deref().unwrap_or("unknown"),
                    "Modrinth project confirmed"
                );
                Verification::Confirmed(project)
            }
            Err(ModrinthError::NotFound(id)) => {
                tracing::info!(project_id = %id, "Modrinth project not found");
                Verification::Rejected(format!("Modrinth project \"{}\" not found", id))
            }
            Err(e) => {
                tracing::warn!(project_id, error = %e, "Modrinth verification unavailable, allowing");
                Verification::Unknown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ModrinthClient {
        ModrinthClient::new(base, "test-agent", Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_client_creation_from_defaults() {
        assert!(ModrinthClient::from_config(&ModrinthConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            ModrinthClient::new("not a url", "ua", Duration::from_secs(1)),
            Err(ModrinthError::InvalidBaseUrl(_))
        ));
        assert!(ModrinthClient::new("mailto:someone@example.com", "ua", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_project_url_encodes_identifier() {
        let c = client("https://api.modrinth.com/v2");
        assert_eq!(
            c.project_url("sodium").as_str(),
            "https://api.modrinth.com/v2/project/sodium"
        );
        assert_eq!(
            c.project_url("../admin").as_str(),
            "https://api.modrinth.com/v2/project/..%2Fadmin"
        );

        let trailing = client("https://api.modrinth.com/v2/");
        assert_eq!(
            trailing.project_url("x").as_str(),
            "https://api.modrinth.com/v2/project/x"
        );
    }

    #[test]
    fn test_summary_matches_id_or_slug() {
        let summary = ProjectSummary {
            name: "Sodium".to_string(),
            slug: "sodium".to_string(),
            id: "AANobbMI".to_string(),
            client_side: Some("required".to_string()),
            server_side: Some("unsupported".to_string()),
        };
        assert!(summary.is_known_as("SODIUM"));
        assert!(summary.is_known_as("aanobbmi"));
        assert!(!summary.is_known_as("lithium"));
    }

    #[test]
    fn test_verification_flags() {
        assert!(Verification::Rejected("x".into()).is_blocking());
        assert!(!Verification::Unknown.is_blocking());
        assert!(Verification::Unknown.data().is_none());
    }

    #[tokio::test]
    async fn test_absent_identifier_is_unknown() {
        let outcome = verify_optional(&DisabledVerifier, None).await;
        assert_eq!(outcome, Verification::Unknown);
    }
}
