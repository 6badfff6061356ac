//! Users API methods

use super::GitHubClient;
use crate::github::error::{GitHubError, GitHubResult};

impl GitHubClient {
    /// Login of the user the token belongs to
    pub(crate) async fn current_login(&self) -> GitHubResult<String> {
        let user = self
            .inner
            .current()
            .user()
            .await
            .map_err(GitHubError::from)?;
        Ok(user.login)
    }
}
