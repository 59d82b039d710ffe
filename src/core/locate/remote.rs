//! Repository-hosting API access (GitHub contents API).
//!
//! Directory trees are expanded with an iterative worklist: each round lists
//! at most `concurrency` directories at once and queues the subdirectories it
//! finds. Every request goes through [`GitHubClient::get`], the single place
//! where rate-limit backoff and retries happen.

use std::{
    collections::{HashSet, VecDeque},
    fmt,
    str::FromStr,
    time::Duration,
};

use futures::{StreamExt, future::try_join_all, stream};
use reqwest::{
    Response, StatusCode, Url,
    header::{ACCEPT, HeaderMap, RETRY_AFTER},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

const API_VERSION: &str = "2022-11-28";
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw+json";
const PER_PAGE: usize = 100;
/// The contents endpoint returns at most 1000 entries per directory.
const MAX_PAGES: usize = 10;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A `{owner, repo, branch}` reference to a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteRepo {
    pub owner: String,
    pub repo: String,
    #[serde(default = "default_branch")]
    pub branch: String,
}

fn default_branch() -> String {
    "main".to_string()
}

impl FromStr for RemoteRepo {
    type Err = Error;

    /// Parse `owner/repo` or `owner/repo@branch`.
    fn from_str(s: &str) -> Result<Self> {
        let (slug, branch) = match s.split_once('@') {
            Some((slug, branch)) if !branch.is_empty() => (slug, branch.to_string()),
            Some(_) => return Err(Error::InvalidRemote(s.to_string())),
            None => (s, default_branch()),
        };
        match slug.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                Ok(Self {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                    branch,
                })
            }
            _ => Err(Error::InvalidRemote(s.to_string())),
        }
    }
}

impl fmt::Display for RemoteRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.repo, self.branch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum EntryKind {
    File,
    Dir,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct ContentEntry {
    path: String,
    #[serde(rename = "type")]
    kind: EntryKind,
}

/// The contents endpoint answers with an array for directories and a single
/// object for files.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentsResponse {
    Listing(Vec<ContentEntry>),
    Single(ContentEntry),
}

impl ContentsResponse {
    fn into_entries(self) -> Vec<ContentEntry> {
        match self {
            ContentsResponse::Listing(entries) => entries,
            ContentsResponse::Single(entry) => vec![entry],
        }
    }
}

/// Exponential backoff policy for throttled requests.
#[derive(Debug, Clone, Copy)]
pub struct Backoff {
    pub base: Duration,
    pub max_delay: Duration,
    pub max_retries: u32,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(500),
            max_delay: Duration::from_secs(60),
            max_retries: 5,
        }
    }
}

impl Backoff {
    /// Delay before retry number `attempt` (0-based). A server-provided
    /// `Retry-After` takes precedence.
    pub fn delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        let delay = retry_after
            .unwrap_or_else(|| self.base.saturating_mul(2u32.saturating_pow(attempt)));
        delay.min(self.max_delay)
    }
}

/// Whether a response signals throttling rather than a real failure.
fn is_rate_limited(status: StatusCode, headers: &HeaderMap) -> bool {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return true;
    }
    status == StatusCode::FORBIDDEN
        && (headers.contains_key(RETRY_AFTER)
            || headers
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.trim() == "0"))
}

fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Async client for the GitHub contents API.
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
    token: Option<String>,
    concurrency: usize,
    backoff: Backoff,
}

impl GitHubClient {
    /// Create a client. Without a token, unauthenticated rate limits apply.
    pub fn new(api_base: &str, token: Option<String>, concurrency: usize) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("kitscope/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| Error::Network {
                url: api_base.to_string(),
                source,
            })?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
            concurrency: concurrency.max(1),
            backoff: Backoff::default(),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// `{api_base}/repos/{owner}/{repo}/contents/{path}?ref={branch}[&per_page&page]`
    fn contents_url(&self, repo: &RemoteRepo, path: &str, page: Option<usize>) -> Result<Url> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| Error::decode(&self.api_base, format!("invalid API base: {e}")))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| Error::decode(&self.api_base, "API base cannot carry a path"))?;
            segments
                .pop_if_empty()
                .extend(["repos", repo.owner.as_str(), repo.repo.as_str(), "contents"])
                .extend(path.split('/').filter(|s| !s.is_empty()));
        }
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("ref", &repo.branch);
            if let Some(page) = page {
                query
                    .append_pair("per_page", &PER_PAGE.to_string())
                    .append_pair("page", &page.to_string());
            }
        }
        Ok(url)
    }

    /// Issue a GET with retries on throttling and transient transport errors.
    ///
    /// Returns `Ok(None)` for 404.
    async fn get(&self, url: &Url, accept: &str) -> Result<Option<Response>> {
        let mut attempt = 0;
        loop {
            let mut request = self
                .http
                .get(url.clone())
                .header(ACCEPT, accept)
                .header("X-GitHub-Api-Version", API_VERSION);
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status == StatusCode::NOT_FOUND {
                        return Ok(None);
                    }
                    if status.is_success() {
                        return Ok(Some(response));
                    }
                    if is_rate_limited(status, response.headers())
                        && attempt < self.backoff.max_retries
                    {
                        let delay = self.backoff.delay(attempt, retry_after(response.headers()));
                        warn!(%url, ?delay, "rate limited, retrying");
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(Error::RemoteStatus {
                        url: url.to_string(),
                        status: status.as_u16(),
                    });
                }
                Err(err)
                    if (err.is_timeout() || err.is_connect())
                        && attempt < self.backoff.max_retries =>
                {
                    let delay = self.backoff.delay(attempt, None);
                    warn!(%url, ?delay, "request failed ({err}), retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(source) => {
                    return Err(Error::Network {
                        url: url.to_string(),
                        source,
                    });
                }
            }
        }
    }

    /// List one directory, following pages. A missing directory is empty.
    ///
    /// Paging stops at a short page, at a page that adds no new entries (the
    /// endpoint may ignore `page` and repeat the whole listing), or after
    /// [`MAX_PAGES`].
    async fn list_dir(&self, repo: &RemoteRepo, dir: &str) -> Result<Vec<ContentEntry>> {
        let mut entries = Vec::new();
        let mut seen = HashSet::new();
        for page in 1..=MAX_PAGES {
            let url = self.contents_url(repo, dir, Some(page))?;
            let Some(response) = self.get(&url, JSON_MEDIA_TYPE).await? else {
                break;
            };
            let batch = response
                .json::<ContentsResponse>()
                .await
                .map_err(|e| Error::decode(url.as_str(), e.to_string()))?
                .into_entries();

            let full_page = batch.len() >= PER_PAGE;
            let before = entries.len();
            entries.extend(batch.into_iter().filter(|e| seen.insert(e.path.clone())));
            if !full_page || entries.len() == before {
                break;
            }
        }
        debug!(repo = %repo, dir, count = entries.len(), "listed remote directory");
        Ok(entries)
    }

    /// Whether `dir` is a non-empty directory, from a single listing request.
    pub async fn dir_exists(&self, repo: &RemoteRepo, dir: &str) -> Result<bool> {
        let url = self.contents_url(repo, dir, None)?;
        let Some(response) = self.get(&url, JSON_MEDIA_TYPE).await? else {
            return Ok(false);
        };
        let contents = response
            .json::<ContentsResponse>()
            .await
            .map_err(|e| Error::decode(url.as_str(), e.to_string()))?;
        Ok(matches!(contents, ContentsResponse::Listing(entries) if !entries.is_empty()))
    }

    /// Recursively list every file under `dir`, sorted.
    pub async fn list_files(&self, repo: &RemoteRepo, dir: &str) -> Result<Vec<String>> {
        let mut pending: VecDeque<String> = VecDeque::from([dir.trim_matches('/').to_string()]);
        let mut files = Vec::new();

        while !pending.is_empty() {
            let take = pending.len().min(self.concurrency);
            let batch: Vec<String> = pending.drain(..take).collect();
            let listings = try_join_all(batch.iter().map(|d| self.list_dir(repo, d))).await?;

            for entry in listings.into_iter().flatten() {
                match entry.kind {
                    EntryKind::Dir => pending.push_back(entry.path),
                    EntryKind::File => files.push(entry.path),
                    EntryKind::Other => {}
                }
            }
        }

        files.sort();
        Ok(files)
    }

    /// Fetch a file's raw content. `Ok(None)` when it does not exist.
    pub async fn read_file(&self, repo: &RemoteRepo, path: &str) -> Result<Option<String>> {
        let url = self.contents_url(repo, path, None)?;
        let Some(response) = self.get(&url, RAW_MEDIA_TYPE).await? else {
            return Ok(None);
        };
        let text = response.text().await.map_err(|source| Error::Network {
            url: url.to_string(),
            source,
        })?;
        Ok(Some(text))
    }

    /// Fetch many files with bounded concurrency, preserving input order.
    ///
    /// Individual failures are logged and yield `None`.
    pub async fn read_files(&self, repo: &RemoteRepo, paths: &[String]) -> Vec<Option<String>> {
        stream::iter(paths)
            .map(|path| async move {
                match self.read_file(repo, path).await {
                    Ok(content) => content,
                    Err(err) => {
                        warn!("Failed to fetch {}: {}", path, err);
                        None
                    }
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await
    }
}
