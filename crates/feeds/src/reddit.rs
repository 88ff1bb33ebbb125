//! Reddit implementation of [`FeedClient`] over the OAuth JSON API.
//!
//! Application-only OAuth (client credentials). Tokens are cached and renewed
//! shortly before expiry. Redirects are not followed: Reddit answers an
//! unknown subreddit with a redirect to its search page.

use std::{
    collections::{BTreeSet, HashSet, VecDeque},
    sync::Arc,
    time::{Duration, Instant},
};

use {
    async_trait::async_trait,
    chrono::{DateTime, Utc},
    reqwest::{Client, StatusCode, redirect::Policy},
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, de::DeserializeOwned},
    tokio::sync::Mutex,
    tracing::{debug, info, warn},
    url::Url,
};

use crate::{
    Error, Result,
    client::{FeedClient, FeedStream, first_title_match},
    types::FeedItem,
};

/// Renew the token when it has less than this left.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// How many item ids a stream remembers to avoid re-yielding.
const SEEN_CAPACITY: usize = 1000;

/// Connection settings for [`RedditClient`].
#[derive(Clone)]
pub struct RedditClientConfig {
    pub client_id: String,
    pub client_secret: Secret<String>,
    /// Defaults to `DISCORD_BOT:<client_id>:1.0`.
    pub user_agent: Option<String>,
    pub auth_url: String,
    pub api_base: String,
    /// Delay between polls of an open stream.
    pub poll_interval: Duration,
    /// Items requested per listing call when searching or streaming.
    pub listing_limit: u32,
    pub request_timeout: Duration,
}

impl std::fmt::Debug for RedditClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedditClientConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl Default for RedditClientConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: Secret::new(String::new()),
            user_agent: None,
            auth_url: "https://www.reddit.com/api/v1/access_token".into(),
            api_base: "https://oauth.reddit.com".into(),
            poll_interval: Duration::from_secs(15),
            listing_limit: 100,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Reddit API client. Cheap to clone.
#[derive(Clone)]
pub struct RedditClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: Client,
    config: RedditClientConfig,
    api_base: Url,
    token: Mutex<Option<AccessToken>>,
}

struct AccessToken {
    value: String,
    expires_at: Instant,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
    error: Option<String>,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Deserialize)]
struct Listing<T> {
    data: ListingData<T>,
}

#[derive(Deserialize)]
struct ListingData<T> {
    children: Vec<Thing<T>>,
}

#[derive(Deserialize)]
struct Thing<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct Submission {
    id: String,
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    permalink: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    selftext: String,
    created_utc: f64,
    subreddit: String,
}

#[derive(Deserialize)]
struct Account {
    #[serde(default)]
    icon_img: Option<String>,
}

#[derive(Deserialize)]
struct NameSearch {
    #[serde(default)]
    names: Vec<String>,
}

impl RedditClient {
    pub fn new(config: RedditClientConfig) -> Result<Self> {
        let api_base = Url::parse(&config.api_base)
            .map_err(|e| Error::fatal(format!("invalid reddit api base {}: {e}", config.api_base)))?;
        Url::parse(&config.auth_url)
            .map_err(|e| Error::fatal(format!("invalid reddit auth url {}: {e}", config.auth_url)))?;

        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(|| format!("DISCORD_BOT:{}:1.0", config.client_id));

        let http = Client::builder()
            .user_agent(user_agent)
            .timeout(config.request_timeout)
            .redirect(Policy::none())
            .build()
            .map_err(|e| Error::external("failed to build reddit http client", e))?;

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                config,
                api_base,
                token: Mutex::new(None),
            }),
        })
    }

    /// Request a token now. Rejected credentials come back as [`Error::Fatal`].
    pub async fn authenticate(&self) -> Result<()> {
        self.inner.access_token(true).await.map(|_| ())
    }
}

impl Inner {
    async fn access_token(&self, force: bool) -> Result<String> {
        let mut cached = self.token.lock().await;
        if !force
            && let Some(token) = cached.as_ref()
            && token.expires_at > Instant::now() + TOKEN_REFRESH_MARGIN
        {
            return Ok(token.value.clone());
        }

        debug!(client_id = %self.config.client_id, "requesting reddit access token");
        let resp = self
            .http
            .post(&self.config.auth_url)
            .basic_auth(
                &self.config.client_id,
                Some(self.config.client_secret.expose_secret()),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| classify_transport("reddit token request failed", e))?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::fatal(format!(
                "reddit rejected the client credentials (HTTP {status})"
            )));
        }
        if let Err(e) = resp.error_for_status_ref() {
            return Err(classify_status("reddit token request failed", status, e));
        }

        let body: TokenResponse = resp
            .json()
            .await
            .map_err(|e| classify_transport("invalid reddit token response", e))?;
        let Some(value) = body.access_token else {
            return Err(Error::fatal(format!(
                "reddit token request failed: {}",
                body.error.unwrap_or_else(|| "no access token returned".into())
            )));
        };

        info!(expires_in = body.expires_in, "reddit access token acquired");
        *cached = Some(AccessToken {
            value: value.clone(),
            expires_at: Instant::now() + Duration::from_secs(body.expires_in),
        });
        Ok(value)
    }

    /// GET an API path. 404 and redirects map to [`Error::FeedNotFound`] for `name`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        name: &str,
    ) -> Result<T> {
        let token = self.access_token(false).await?;
        let url = self
            .api_base
            .join(path)
            .map_err(|e| Error::message(format!("invalid reddit path {path}: {e}")))?;

        let resp = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(|e| classify_transport("reddit request failed", e))?;

        let status = resp.status();
        if status.is_redirection() || status == StatusCode::NOT_FOUND {
            return Err(Error::feed_not_found(name));
        }
        if status == StatusCode::UNAUTHORIZED {
            // Token revoked or expired early; the next call fetches a new one.
            self.token.lock().await.take();
        }
        if let Err(e) = resp.error_for_status_ref() {
            return Err(classify_status("reddit request failed", status, e));
        }

        resp.json()
            .await
            .map_err(|e| classify_transport("invalid reddit response", e))
    }

    async fn listing(
        &self,
        path: &str,
        limit: u32,
        sort_new: bool,
        name: &str,
    ) -> Result<Vec<Submission>> {
        let mut query = vec![("limit", limit.to_string()), ("raw_json", "1".to_string())];
        if sort_new {
            query.push(("sort", "new".to_string()));
        }
        let listing: Listing<Submission> = self.get_json(path, &query, name).await?;
        Ok(listing.data.children.into_iter().map(|t| t.data).collect())
    }

    async fn author_avatar(&self, author: &str) -> Option<String> {
        if !is_valid_name(author) {
            return None;
        }
        let path = format!("user/{author}/about");
        match self
            .get_json::<Thing<Account>>(&path, &[("raw_json", "1".to_string())], author)
            .await
        {
            Ok(account) => account.data.icon_img.filter(|icon| !icon.is_empty()),
            Err(e) => {
                debug!(author, error = %e, "could not load author avatar");
                None
            },
        }
    }

    async fn into_item(&self, submission: Submission) -> FeedItem {
        let author_avatar = self.author_avatar(&submission.author).await;
        to_feed_item(submission, author_avatar)
    }

    async fn exists(&self, name: &str) -> bool {
        if !is_valid_name(name) {
            return false;
        }
        let query = [
            ("query", name.to_string()),
            ("exact", "true".to_string()),
            ("include_over_18", "true".to_string()),
        ];
        match self
            .get_json::<NameSearch>("api/search_reddit_names", &query, name)
            .await
        {
            Ok(found) => found.names.iter().any(|n| n.eq_ignore_ascii_case(name)),
            Err(e) => {
                debug!(feed = name, error = %e, "subreddit lookup failed");
                false
            },
        }
    }
}

#[async_trait]
impl FeedClient for RedditClient {
    async fn exists(&self, name: &str) -> bool {
        self.inner.exists(name).await
    }

    async fn fetch_one(&self, name: &str, search_term: Option<&str>) -> Result<Option<FeedItem>> {
        if !is_valid_name(name) {
            return Ok(None);
        }
        let inner = &self.inner;
        let (path, sort_new) = if inner.exists(name).await {
            (format!("r/{name}/new"), false)
        } else {
            debug!(name, "not a subreddit, searching user submissions");
            (format!("user/{name}/submitted"), true)
        };
        let limit = if search_term.is_some() {
            inner.config.listing_limit
        } else {
            1
        };

        let submissions = match inner.listing(&path, limit, sort_new, name).await {
            Ok(submissions) => submissions,
            Err(Error::FeedNotFound { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        let chosen = match search_term {
            Some(term) => {
                let items: Vec<FeedItem> = submissions
                    .into_iter()
                    .map(|s| to_feed_item(s, None))
                    .collect();
                first_title_match(&items, term).cloned()
            },
            None => submissions.into_iter().next().map(|s| to_feed_item(s, None)),
        };

        let Some(mut item) = chosen else {
            return Ok(None);
        };
        item.author_avatar = inner.author_avatar(&item.author).await;
        Ok(Some(item))
    }

    async fn open_stream(&self, names: &BTreeSet<String>) -> Result<FeedStream> {
        if names.is_empty() {
            return Err(Error::message("cannot stream an empty set of subreddits"));
        }
        let joined = names.iter().map(String::as_str).collect::<Vec<_>>().join("+");
        let path = format!("r/{joined}/new");
        let inner = Arc::clone(&self.inner);
        let limit = inner.config.listing_limit;

        // Prime the seen set so anything already published is skipped.
        let mut seen = SeenSet::new(SEEN_CAPACITY);
        for submission in inner.listing(&path, limit, false, &joined).await? {
            seen.insert(submission.id);
        }
        info!(feeds = %joined, primed = seen.len(), "reddit stream opened");

        Ok(Box::pin(async_stream::stream! {
            loop {
                tokio::time::sleep(inner.config.poll_interval).await;
                let batch = match inner.listing(&path, limit, false, &joined).await {
                    Ok(batch) => batch,
                    Err(e) => {
                        yield Err(e);
                        return;
                    },
                };
                debug!(feeds = %joined, count = batch.len(), "polled reddit stream");
                // Listings are newest first; yield in arrival order.
                for submission in batch.into_iter().rev() {
                    if seen.insert(submission.id.clone()) {
                        yield Ok(inner.into_item(submission).await);
                    }
                }
            }
        }))
    }
}

/// Bounded set of recently seen ids; the oldest id is evicted first.
struct SeenSet {
    order: VecDeque<String>,
    ids: HashSet<String>,
    capacity: usize,
}

impl SeenSet {
    fn new(capacity: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(capacity),
            ids: HashSet::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns true if `id` was not seen before.
    fn insert(&mut self, id: String) -> bool {
        if self.ids.contains(&id) {
            return false;
        }
        if self.order.len() >= self.capacity
            && let Some(oldest) = self.order.pop_front()
        {
            self.ids.remove(&oldest);
        }
        self.ids.insert(id.clone());
        self.order.push_back(id);
        true
    }

    fn len(&self) -> usize {
        self.order.len()
    }
}

fn to_feed_item(submission: Submission, author_avatar: Option<String>) -> FeedItem {
    let url = if submission.url.is_empty() {
        format!("https://www.reddit.com{}", submission.permalink)
    } else {
        submission.url
    };
    let published_at =
        DateTime::<Utc>::from_timestamp(submission.created_utc as i64, 0).unwrap_or_default();
    FeedItem {
        id: submission.id,
        title: submission.title,
        url,
        author: submission.author,
        author_avatar,
        body: Some(submission.selftext).filter(|text| !text.trim().is_empty()),
        published_at,
        feed: submission.subreddit.to_lowercase(),
    }
}

/// Subreddit and user names: letters, digits, `_` and `-`.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 32
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn classify_transport(context: &str, e: reqwest::Error) -> Error {
    if e.is_timeout() || e.is_connect() || e.is_request() || e.is_body() || e.is_decode() {
        Error::transient(context, e)
    } else {
        Error::external(context, e)
    }
}

fn classify_status(context: &str, status: StatusCode, e: reqwest::Error) -> Error {
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        warn!(%status, "reddit returned a retryable status");
        Error::transient(context, e)
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Error::fatal(format!("{context}: HTTP {status}"))
    } else {
        Error::external(context, e)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use {
        super::*,
        futures::StreamExt,
        mockito::{Matcher, Server, ServerGuard},
    };

    fn config_for(server: &ServerGuard) -> RedditClientConfig {
        RedditClientConfig {
            client_id: "id".into(),
            client_secret: Secret::new("secret".into()),
            auth_url: format!("{}/api/v1/access_token", server.url()),
            api_base: server.url(),
            poll_interval: Duration::from_millis(10),
            ..Default::default()
        }
    }

    async fn mock_token(server: &mut ServerGuard) -> mockito::Mock {
        server
            .mock("POST", "/api/v1/access_token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"tok","token_type":"bearer","expires_in":3600}"#)
            .create_async()
            .await
    }

    async fn mock_avatars(server: &mut ServerGuard) -> mockito::Mock {
        server
            .mock("GET", Matcher::Regex(r"^/user/[^/]+/about".into()))
            .with_status(200)
            .with_body(
                serde_json::json!({"kind": "t2", "data": {"icon_img": "https://img/a.png"}})
                    .to_string(),
            )
            .create_async()
            .await
    }

    fn listing(posts: &[(&str, &str)]) -> String {
        let children: Vec<_> = posts
            .iter()
            .map(|(id, title)| {
                serde_json::json!({
                    "kind": "t3",
                    "data": {
                        "id": id,
                        "title": title,
                        "url": format!("https://example.com/{id}"),
                        "permalink": format!("/r/News/comments/{id}/"),
                        "author": "writer",
                        "selftext": "",
                        "created_utc": 1_700_000_000.0,
                        "subreddit": "News"
                    }
                })
            })
            .collect();
        serde_json::json!({"kind": "Listing", "data": {"children": children}}).to_string()
    }

    #[tokio::test]
    async fn authenticate_rejected_is_fatal() {
        let mut server = Server::new_async().await;
        let _token = server
            .mock("POST", "/api/v1/access_token")
            .with_status(401)
            .with_body(r#"{"message":"Unauthorized","error":401}"#)
            .create_async()
            .await;

        let client = RedditClient::new(config_for(&server)).unwrap();
        let err = client.authenticate().await.unwrap_err();
        assert!(matches!(err, Error::Fatal { .. }), "{err}");
    }

    #[tokio::test]
    async fn token_is_cached() {
        let mut server = Server::new_async().await;
        let token = server
            .mock("POST", "/api/v1/access_token")
            .with_status(200)
            .with_body(r#"{"access_token":"tok","expires_in":3600}"#)
            .expect(1)
            .create_async()
            .await;
        let _names = server
            .mock("GET", "/api/search_reddit_names")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"names":["News"]}"#)
            .create_async()
            .await;

        let client = RedditClient::new(config_for(&server)).unwrap();
        assert!(client.exists("news").await);
        assert!(client.exists("news").await);
        token.assert_async().await;
    }

    #[tokio::test]
    async fn exists_matches_exact_name() {
        let mut server = Server::new_async().await;
        let _token = mock_token(&mut server).await;
        let _names = server
            .mock("GET", "/api/search_reddit_names")
            .match_query(Matcher::UrlEncoded("query".into(), "news".into()))
            .with_status(200)
            .with_body(r#"{"names":["News"]}"#)
            .create_async()
            .await;

        let client = RedditClient::new(config_for(&server)).unwrap();
        assert!(client.exists("news").await);
    }

    #[tokio::test]
    async fn exists_false_on_not_found_and_errors() {
        let mut server = Server::new_async().await;
        let _token = mock_token(&mut server).await;
        let _missing = server
            .mock("GET", "/api/search_reddit_names")
            .match_query(Matcher::UrlEncoded("query".into(), "nothere".into()))
            .with_status(404)
            .create_async()
            .await;
        let _broken = server
            .mock("GET", "/api/search_reddit_names")
            .match_query(Matcher::UrlEncoded("query".into(), "flaky".into()))
            .with_status(503)
            .create_async()
            .await;

        let client = RedditClient::new(config_for(&server)).unwrap();
        assert!(!client.exists("nothere").await);
        assert!(!client.exists("flaky").await);
        assert!(!client.exists("bad/name").await);
    }

    #[tokio::test]
    async fn fetch_one_returns_newest() {
        let mut server = Server::new_async().await;
        let _token = mock_token(&mut server).await;
        let _avatars = mock_avatars(&mut server).await;
        let _names = server
            .mock("GET", "/api/search_reddit_names")
            .match_query(Matcher::Any)
            .with_body(r#"{"names":["News"]}"#)
            .create_async()
            .await;
        let _new = server
            .mock("GET", "/r/news/new")
            .match_query(Matcher::UrlEncoded("limit".into(), "1".into()))
            .with_body(listing(&[("a1", "Fresh story")]))
            .create_async()
            .await;

        let client = RedditClient::new(config_for(&server)).unwrap();
        let item = client.fetch_one("news", None).await.unwrap().unwrap();
        assert_eq!(item.title, "Fresh story");
        assert_eq!(item.feed, "news");
        assert_eq!(item.author_avatar.as_deref(), Some("https://img/a.png"));
        assert_eq!(item.published_at.timestamp(), 1_700_000_000);
    }

    #[tokio::test]
    async fn fetch_one_search_first_match_wins() {
        let mut server = Server::new_async().await;
        let _token = mock_token(&mut server).await;
        let _avatars = mock_avatars(&mut server).await;
        let _names = server
            .mock("GET", "/api/search_reddit_names")
            .match_query(Matcher::Any)
            .with_body(r#"{"names":["News"]}"#)
            .create_async()
            .await;
        let _new = server
            .mock("GET", "/r/news/new")
            .match_query(Matcher::Any)
            .with_body(listing(&[
                ("a1", "Budget cuts announced"),
                ("a2", "Budget cuts explained"),
            ]))
            .create_async()
            .await;

        let client = RedditClient::new(config_for(&server)).unwrap();
        let item = client
            .fetch_one("news", Some("budget"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(item.title, "Budget cuts announced");

        let none = client.fetch_one("news", Some("weather")).await.unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn fetch_one_falls_back_to_user() {
        let mut server = Server::new_async().await;
        let _token = mock_token(&mut server).await;
        let _avatars = mock_avatars(&mut server).await;
        let _names = server
            .mock("GET", "/api/search_reddit_names")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;
        let submitted = server
            .mock("GET", "/user/spez/submitted")
            .match_query(Matcher::Any)
            .with_body(listing(&[("u1", "Announcement")]))
            .create_async()
            .await;

        let client = RedditClient::new(config_for(&server)).unwrap();
        let item = client.fetch_one("spez", None).await.unwrap().unwrap();
        assert_eq!(item.title, "Announcement");
        submitted.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_one_unknown_name_is_none() {
        let mut server = Server::new_async().await;
        let _token = mock_token(&mut server).await;
        let _names = server
            .mock("GET", "/api/search_reddit_names")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;
        let _user = server
            .mock("GET", "/user/ghost/submitted")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let client = RedditClient::new(config_for(&server)).unwrap();
        assert!(client.fetch_one("ghost", None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn stream_skips_existing_and_yields_new_in_order() {
        let mut server = Server::new_async().await;
        let _token = mock_token(&mut server).await;
        let _avatars = mock_avatars(&mut server).await;
        let polls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&polls);
        let _new = server
            .mock("GET", "/r/news+rust/new")
            .match_query(Matcher::Any)
            .with_body_from_request(move |_req| {
                let body = if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    listing(&[("old", "Already there")])
                } else {
                    listing(&[("n2", "Second"), ("n1", "First"), ("old", "Already there")])
                };
                body.into_bytes()
            })
            .create_async()
            .await;

        let client = RedditClient::new(config_for(&server)).unwrap();
        let names: BTreeSet<String> = ["news".to_string(), "rust".to_string()].into();
        let mut stream = client.open_stream(&names).await.unwrap();

        let first = stream.next().await.unwrap().unwrap();
        let second = stream.next().await.unwrap().unwrap();
        assert_eq!(first.id, "n1");
        assert_eq!(second.id, "n2");
        assert!(polls.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn stream_ends_with_transient_error() {
        let mut server = Server::new_async().await;
        let _token = mock_token(&mut server).await;
        let polls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&polls);
        let _new = server
            .mock("GET", "/r/news/new")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body_from_request(move |_req| {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    listing(&[]).into_bytes()
                } else {
                    b"<html>we are down</html>".to_vec()
                }
            })
            .create_async()
            .await;

        let client = RedditClient::new(config_for(&server)).unwrap();
        let names: BTreeSet<String> = ["news".to_string()].into();
        let mut stream = client.open_stream(&names).await.unwrap();

        let err = stream.next().await.unwrap().unwrap_err();
        assert!(err.is_transient(), "{err}");
        assert!(stream.next().await.is_none());
    }

    #[test]
    fn seen_set_evicts_oldest() {
        let mut seen = SeenSet::new(2);
        assert!(seen.insert("a".into()));
        assert!(seen.insert("b".into()));
        assert!(!seen.insert("a".into()));
        assert!(seen.insert("c".into()));
        assert!(seen.insert("a".into()));
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn valid_names() {
        assert!(is_valid_name("AskReddit"));
        assert!(is_valid_name("some-user_1"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("a+b"));
        assert!(!is_valid_name("../etc"));
    }
}
