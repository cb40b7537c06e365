//! GitHub comments through the `gh` CLI

use serde::Deserialize;

use super::{CommentSink, NotifyError, PullRequestTarget};
use crate::infra::{failure_message, CommandExecutor, RealCommandExecutor};

/// Program used to reach the GitHub API
pub const GH_PROGRAM: &str = "gh";

#[derive(Debug, Deserialize)]
struct IssueComment {
    id: u64,
    #[serde(default)]
    body: Option<String>,
}

/// [`CommentSink`] backed by `gh api`.
///
/// The token is passed to `gh` as `GH_TOKEN`, so no prior `gh auth login`
/// is needed on CI machines.
pub struct GitHubCliSink<CE: CommandExecutor = RealCommandExecutor> {
    target: PullRequestTarget,
    cmd_executor: CE,
}

impl GitHubCliSink<RealCommandExecutor> {
    /// Sink for `target` using the real `gh` binary
    pub fn new(target: PullRequestTarget) -> Self {
        Self::with_executor(target, RealCommandExecutor)
    }
}

impl<CE: CommandExecutor> GitHubCliSink<CE> {
    /// Sink with a custom command executor (for testing)
    pub fn with_executor(target: PullRequestTarget, cmd_executor: CE) -> Self {
        Self {
            target,
            cmd_executor,
        }
    }

    fn issue_comments_endpoint(&self) -> String {
        format!(
            "repos/{}/{}/issues/{}/comments",
            self.target.owner, self.target.repo, self.target.number
        )
    }

    fn api(&self, args: &[&str]) -> Result<String, NotifyError> {
        let token = &self.target.token;
        let output = self
            .cmd_executor
            .execute(
                |cmd| cmd.arg("api").args(args).env("GH_TOKEN", token),
                GH_PROGRAM,
            )
            .map_err(|source| NotifyError::Spawn {
                program: GH_PROGRAM,
                source,
            })?;

        if !output.status.success() {
            return Err(NotifyError::Api(failure_message(&output)));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Parse `gh api --paginate` output: one JSON array per page, back to back.
fn parse_comment_pages(stdout: &str) -> Result<Vec<IssueComment>, NotifyError> {
    let mut comments = Vec::new();
    for page in serde_json::Deserializer::from_str(stdout).into_iter::<Vec<IssueComment>>() {
        comments.extend(page?);
    }
    Ok(comments)
}

impl<CE: CommandExecutor> CommentSink for GitHubCliSink<CE> {
    fn find_existing_comment(&self, marker: &str) -> Result<Option<u64>, NotifyError> {
        let endpoint = self.issue_comments_endpoint();
        let stdout = self.api(&["--paginate", &endpoint])?;
        Ok(parse_comment_pages(&stdout)?
            .into_iter()
            .filter(|c| c.body.as_deref().is_some_and(|body| body.contains(marker)))
            .map(|c| c.id)
            .last())
    }

    fn create_comment(&self, body: &str) -> Result<(), NotifyError> {
        let endpoint = self.issue_comments_endpoint();
        let field = format!("body={}", body);
        self.api(&["--method", "POST", &endpoint, "--raw-field", &field])
            .map(drop)
    }

    fn update_comment(&self, id: u64, body: &str) -> Result<(), NotifyError> {
        let endpoint = format!(
            "repos/{}/{}/issues/comments/{}",
            self.target.owner, self.target.repo, id
        );
        let field = format!("body={}", body);
        self.api(&["--method", "PATCH", &endpoint, "--raw-field", &field])
            .map(drop)
    }
}
