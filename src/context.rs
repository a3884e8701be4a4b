//! Build context structures
//!
//! Everything the CI orchestrator tells us about the triggering event.
//! Filled once by the caller and only read afterwards. The serialized form is
//! the namespace message templates see (`repo.*`, `commit.*`, `build.*`, ...).

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Context {
    pub repo: Repository,
    pub commit: Commit,
    pub source: Source,
    pub build: Build,
    #[serde(rename = "github")]
    pub platform: CiPlatform,
}

/// Repository information
#[derive(Debug, Clone, Default, Serialize)]
pub struct Repository {
    pub full_name: String,
    pub namespace: String,
    pub name: String,
}

/// Commit information
#[derive(Debug, Clone, Default, Serialize)]
pub struct Commit {
    pub sha: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub branch: String,
    pub link: String,
    pub author: String,
    pub email: String,
    pub avatar: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Source {
    pub branch: String,
}

/// Build information
#[derive(Debug, Clone, Default, Serialize)]
pub struct Build {
    pub tag: String,
    pub event: String,
    pub number: u64,
    pub status: String,
    pub link: String,
    /// Unix timestamp (seconds)
    pub started: i64,
    /// Unix timestamp (seconds)
    pub finished: i64,
    pub pull_request: String,
    pub deploy_to: String,
}

/// Which CI system invoked us, plus the GitHub Actions workflow metadata.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CiPlatform {
    pub drone: bool,
    pub github: bool,
    pub workflow: String,
    pub workspace: String,
    pub action: String,
    pub event_name: String,
    pub event_path: String,
}

impl Commit {
    /// The ref when the orchestrator supplied one, otherwise the branch name.
    pub fn ref_or_branch(&self) -> &str {
        if self.git_ref.is_empty() {
            &self.branch
        } else {
            &self.git_ref
        }
    }
}
