use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A GitHub account as embedded in API responses
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub login: String,
}

/// Login GitHub shows in place of deleted accounts
pub const GHOST_LOGIN: &str = "ghost";

fn login_or_ghost(user: Option<&User>) -> String {
    user.map_or(GHOST_LOGIN, |user| user.login.as_str()).to_owned()
}

/// A pull request from `GET /repos/{owner}/{repo}/pulls`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    /// `None` when the author's account was deleted
    pub user: Option<User>,
    /// `None` for pull requests that were closed without merging
    pub merged_at: Option<Timestamp>,
    pub html_url: String,
}

/// An issue comment from `GET /repos/{owner}/{repo}/issues/{number}/comments`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Comment {
    pub user: Option<User>,
    pub body: String,
}

/// One line item of the report: a merged PR together with the comment that carried the marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForceMergeRecord {
    pub repo: String,
    pub pr_number: u64,
    pub title: String,
    pub author: String,
    pub commenter: String,
    pub comment_body: String,
    pub merged_at: Timestamp,
    pub url: String,
}

impl ForceMergeRecord {
    pub fn new(repo: &str, pr: &PullRequest, merged_at: Timestamp, comment: &Comment) -> Self {
        Self {
            repo: repo.to_owned(),
            pr_number: pr.number,
            title: pr.title.clone(),
            author: login_or_ghost(pr.user.as_ref()),
            commenter: login_or_ghost(comment.user.as_ref()),
            comment_body: comment.body.clone(),
            merged_at,
            url: pr.html_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_unmerged_pull_request_has_no_merge_time() {
        let json = r#"{
            "number": 7,
            "title": "Abandoned",
            "user": {"login": "carol", "id": 3},
            "merged_at": null,
            "html_url": "https://github.com/acme/widgets/pull/7",
            "state": "closed"
        }"#;
        let pr: PullRequest = serde_json::from_str(json).unwrap();
        assert_eq!(pr.number, 7);
        assert_eq!(pr.user.map(|user| user.login).as_deref(), Some("carol"));
        assert!(pr.merged_at.is_none());
    }

    #[test]
    fn merge_time_is_parsed_as_utc_timestamp() {
        let json = r#"{
            "number": 42,
            "title": "Fix flaky test",
            "user": {"login": "alice"},
            "merged_at": "2024-03-15T10:20:30Z",
            "html_url": "https://github.com/acme/widgets/pull/42"
        }"#;
        let pr: PullRequest = serde_json::from_str(json).unwrap();
        let expected: Timestamp = "2024-03-15T10:20:30Z".parse().unwrap();
        assert_eq!(pr.merged_at, Some(expected));
    }

    #[test]
    fn deleted_accounts_decode_and_report_as_ghost() {
        let json = r#"[{
            "number": 9,
            "title": "Old work",
            "user": null,
            "merged_at": "2024-03-02T00:00:00Z",
            "html_url": "https://github.com/acme/widgets/pull/9"
        }]"#;
        let prs: Vec<PullRequest> = serde_json::from_str(json).unwrap();
        assert!(prs[0].user.is_none());

        let comment: Comment = serde_json::from_str(r#"{"user": null, "body": "FORCE_MERGE"}"#).unwrap();
        assert!(comment.user.is_none());

        let record = ForceMergeRecord::new("acme/widgets", &prs[0], "2024-03-02T00:00:00Z".parse().unwrap(), &comment);
        assert_eq!(record.author, GHOST_LOGIN);
        assert_eq!(record.commenter, GHOST_LOGIN);
    }
}
