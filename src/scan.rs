use log::{debug, info};

use crate::data::ForceMergeRecord;
use crate::error::Result;
use crate::github::{FetchOptions, GitHubApi, fetch_comments, fetch_merged_prs};
use crate::window::DateWindow;

/// Marker that flags a merge which bypassed review
pub const DEFAULT_MARKER: &str = "FORCE_MERGE";

/// What to scan and how
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub repo: String,
    pub window: DateWindow,
    pub marker: String,
    pub options: FetchOptions,
}

/// Find every comment containing the marker on PRs merged inside the window.
///
/// Records come out in PR fetch order, then comment order. A PR yields one
/// record per matching comment. Matching is a case-sensitive substring test.
pub fn scan(api: &impl GitHubApi, request: &ScanRequest) -> Result<Vec<ForceMergeRecord>> {
    let ScanRequest {
        repo,
        window,
        marker,
        options,
    } = request;

    info!("Fetching merged PRs for repository {repo} from {window}...");
    let prs = fetch_merged_prs(api, repo, window, *options)?;

    info!("Scanning {} merged PRs for {marker} comments...", prs.len());
    let mut records = Vec::new();
    for pr in &prs {
        // Only in-window PRs come back from the fetcher, and those are all merged.
        let Some(merged_at) = pr.merged_at else {
            continue;
        };

        let comments = fetch_comments(api, repo, pr.number, *options)?;
        debug!("PR {} has {} comments", pr.number, comments.len());

        records.extend(
            comments
                .iter()
                .filter(|comment| comment.body.contains(marker.as_str()))
                .map(|comment| ForceMergeRecord::new(repo, pr, merged_at, comment)),
        );
    }

    info!("Found {} {marker} comments", records.len());
    Ok(records)
}
