//! Pull-request comment publishing
//!
//! A [`CommentSink`] is anything that can list, create and edit comments on
//! one pull request. [`upsert_comment`] uses the watermark embedded in every
//! report body to update the comment a previous run left behind instead of
//! piling up new ones.

pub mod github;

pub use github::GitHubCliSink;

use thiserror::Error;

use crate::report::COMMENT_WATERMARK;

/// Publishing a comment failed
#[derive(Debug, Error)]
pub enum NotifyError {
    /// A required environment variable is unset or empty
    #[error("missing environment variable {0}")]
    MissingEnv(&'static str),

    /// The pull request number is not a positive integer
    #[error("'{0}' is not a pull request number")]
    InvalidPullRequest(String),

    /// The repository slug is not `owner/repo`
    #[error("'{0}' is not an owner/repo slug")]
    InvalidSlug(String),

    /// The client program could not be started
    #[error("could not run {program}: {source}")]
    Spawn {
        /// Program name
        program: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The API call was rejected
    #[error("GitHub API request failed: {0}")]
    Api(String),

    /// The API answered with something unexpected
    #[error("unexpected GitHub API response: {0}")]
    Response(#[from] serde_json::Error),
}

/// What [`upsert_comment`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentAction {
    /// A new comment was posted
    Created,
    /// The existing comment with this id was replaced
    Updated(u64),
}

/// Destination for report comments on one pull request
pub trait CommentSink {
    /// Id of the most recent comment whose body contains `marker`
    fn find_existing_comment(&self, marker: &str) -> Result<Option<u64>, NotifyError>;

    /// Post a new comment
    fn create_comment(&self, body: &str) -> Result<(), NotifyError>;

    /// Replace the body of comment `id`
    fn update_comment(&self, id: u64, body: &str) -> Result<(), NotifyError>;
}

/// Update this tool's earlier comment, or post a new one.
pub fn upsert_comment(sink: &dyn CommentSink, body: &str) -> Result<CommentAction, NotifyError> {
    match sink.find_existing_comment(COMMENT_WATERMARK)? {
        Some(id) => {
            sink.update_comment(id, body)?;
            log::info!("updated pull request comment {}", id);
            Ok(CommentAction::Updated(id))
        }
        None => {
            sink.create_comment(body)?;
            log::info!("posted pull request comment");
            Ok(CommentAction::Created)
        }
    }
}

/// Pull request to comment on, with the credentials to do so
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestTarget {
    /// API token
    pub token: String,
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Pull request number
    pub number: u64,
}

impl PullRequestTarget {
    /// Read the target from the process environment.
    ///
    /// Uses `GITHUB_TOKEN`, `TRAVIS_PULL_REQUEST` or `PULL_REQUEST_NUMBER`,
    /// and `TRAVIS_PULL_REQUEST_SLUG` or `PULL_REQUEST_SLUG`.
    pub fn from_env() -> Result<Self, NotifyError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the target through `lookup` instead of the real environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, NotifyError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = get("GITHUB_TOKEN").ok_or(NotifyError::MissingEnv("GITHUB_TOKEN"))?;
        let number_raw = get("TRAVIS_PULL_REQUEST")
            .or_else(|| get("PULL_REQUEST_NUMBER"))
            .ok_or(NotifyError::MissingEnv("PULL_REQUEST_NUMBER"))?;
        let slug = get("TRAVIS_PULL_REQUEST_SLUG")
            .or_else(|| get("PULL_REQUEST_SLUG"))
            .ok_or(NotifyError::MissingEnv("PULL_REQUEST_SLUG"))?;

        let number = number_raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| NotifyError::InvalidPullRequest(number_raw.clone()))?;

        let (owner, repo) = slug
            .trim()
            .split_once('/')
            .filter(|(owner, repo)| !owner.is_empty() && !repo.is_empty() && !repo.contains('/'))
            .ok_or_else(|| NotifyError::InvalidSlug(slug.clone()))?;

        Ok(Self {
            token,
            owner: owner.to_string(),
            repo: repo.to_string(),
            number,
        })
    }
}
