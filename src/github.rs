use std::fmt;

use log::debug;
use serde::de::DeserializeOwned;
use ureq::{Agent, AgentBuilder, Request};

use crate::data::{Comment, PullRequest};
use crate::error::{Error, Result};
use crate::window::DateWindow;

/// Default base URL of the GitHub REST API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Page size used for every paginated request (GitHub's maximum)
pub const PER_PAGE: usize = 100;

/// The two read-only endpoints a report needs
pub trait GitHubApi {
    /// One page (1-based) of closed pull requests, most recently updated first
    fn list_closed_pulls(&self, repo: &str, page: u32) -> Result<Vec<PullRequest>>;

    /// Comments on an issue or pull request.
    ///
    /// `None` issues a single request with the API's default paging.
    fn list_issue_comments(&self, repo: &str, number: u64, page: Option<u32>)
    -> Result<Vec<Comment>>;
}

/// How every request is authenticated
#[derive(Clone, Default)]
pub struct Credentials {
    token: Option<String>,
}

impl Credentials {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|token| !token.is_empty()),
        }
    }

    fn authorize(&self, request: Request) -> Request {
        match &self.token {
            Some(token) => request.set("Authorization", &format!("Bearer {token}")),
            None => request,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.token {
            Some(_) => write!(f, "Credentials(<redacted>)"),
            None => write!(f, "Credentials(anonymous)"),
        }
    }
}

/// Blocking client for the GitHub REST API
pub struct RestClient {
    agent: Agent,
    base_url: String,
    credentials: Credentials,
}

impl RestClient {
    pub fn new(base_url: &str, credentials: Credentials) -> Self {
        let agent = AgentBuilder::new()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            credentials,
        }
    }

    fn pulls_url(&self, repo: &str) -> String {
        format!("{}/repos/{repo}/pulls", self.base_url)
    }

    fn comments_url(&self, repo: &str, number: u64) -> String {
        format!("{}/repos/{repo}/issues/{number}/comments", self.base_url)
    }

    fn get(&self, url: &str) -> Request {
        let request = self
            .agent
            .get(url)
            .set("Accept", "application/vnd.github+json");
        self.credentials.authorize(request)
    }

    fn call<T: DeserializeOwned>(url: &str, request: Request) -> Result<T> {
        let response = request.call().map_err(|err| Error::from_ureq(url, err))?;
        response.into_json().map_err(|source| Error::Decode {
            url: url.to_owned(),
            source,
        })
    }
}

impl GitHubApi for RestClient {
    fn list_closed_pulls(&self, repo: &str, page: u32) -> Result<Vec<PullRequest>> {
        let url = self.pulls_url(repo);
        let request = self
            .get(&url)
            .query("state", "closed")
            .query("sort", "updated")
            .query("direction", "desc")
            .query("per_page", &PER_PAGE.to_string())
            .query("page", &page.to_string());
        Self::call(&url, request)
    }

    fn list_issue_comments(
        &self,
        repo: &str,
        number: u64,
        page: Option<u32>,
    ) -> Result<Vec<Comment>> {
        let url = self.comments_url(repo, number);
        let mut request = self.get(&url);
        if let Some(page) = page {
            request = request
                .query("per_page", &PER_PAGE.to_string())
                .query("page", &page.to_string());
        }
        Self::call(&url, request)
    }
}

/// Knobs trading completeness against the number of requests
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchOptions {
    /// Keep paging after a PR merged before the window start shows up
    pub full_scan: bool,

    /// Page through all comments instead of reading only the first page
    pub all_comments: bool,
}

/// Fetch all pull requests merged inside `window`.
///
/// Pages are requested in "recently updated first" order. Paging stops at
/// the first empty page or, unless `full_scan` is set, after the page on
/// which a PR merged before the window start was seen. Update order is only
/// a proxy for merge order, so the early stop can miss PRs that were merged
/// long ago but updated recently.
pub fn fetch_merged_prs(
    api: &impl GitHubApi,
    repo: &str,
    window: &DateWindow,
    options: FetchOptions,
) -> Result<Vec<PullRequest>> {
    let mut prs = Vec::new();
    let mut page = 1;

    loop {
        let batch = api.list_closed_pulls(repo, page)?;
        if batch.is_empty() {
            break;
        }

        let mut reached_start = false;
        for pr in batch {
            let Some(merged_at) = pr.merged_at else {
                debug!("Skipping PR {} (not merged)", pr.number);
                continue;
            };

            if window.contains(merged_at) {
                debug!("Adding PR {} merged at {merged_at} ({window})", pr.number);
                prs.push(pr);
            } else {
                debug!("Skipping PR {} merged at {merged_at} ({window})", pr.number);
                if window.is_before_start(merged_at) {
                    reached_start = true;
                }
            }
        }

        if reached_start && !options.full_scan {
            debug!("Reached PRs merged before {}, stopping after page {page}", window.start);
            break;
        }
        page += 1;
    }

    Ok(prs)
}

/// Fetch the comments of one pull request
pub fn fetch_comments(
    api: &impl GitHubApi,
    repo: &str,
    number: u64,
    options: FetchOptions,
) -> Result<Vec<Comment>> {
    if !options.all_comments {
        return api.list_issue_comments(repo, number, None);
    }

    let mut comments = Vec::new();
    let mut page = 1;
    loop {
        let batch = api.list_issue_comments(repo, number, Some(page))?;
        let len = batch.len();
        comments.extend(batch);
        if len < PER_PAGE {
            break;
        }
        page += 1;
    }
    Ok(comments)
}
