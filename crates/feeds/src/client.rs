//! Feed platform abstraction: existence checks, one-shot fetch and streaming.

use std::{collections::BTreeSet, pin::Pin};

use {async_trait::async_trait, futures::Stream};

use crate::{Result, types::FeedItem};

/// Lazy, infinite, non-restartable sequence of newly published items.
///
/// An `Err` ends the session; the caller opens a new one to resume.
pub type FeedStream = Pin<Box<dyn Stream<Item = Result<FeedItem>> + Send>>;

/// Remote content platform.
#[async_trait]
pub trait FeedClient: Send + Sync {
    /// True iff a feed with exactly this name resolves. Lookup failures are `false`.
    async fn exists(&self, name: &str) -> bool;

    /// Resolve `name` as a feed, falling back to an author identity, and
    /// return either the newest item or the first one whose title matches
    /// `search_term`.
    async fn fetch_one(&self, name: &str, search_term: Option<&str>) -> Result<Option<FeedItem>>;

    /// Open one merged subscription over `names`. Items published before the
    /// call are skipped.
    async fn open_stream(&self, names: &BTreeSet<String>) -> Result<FeedStream>;
}

/// Collapse runs of whitespace and lower-case, for title matching.
pub fn normalize_search_text(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// First item whose title contains `term`. Scanning stops at the first match.
pub fn first_title_match<'a, I>(items: I, term: &str) -> Option<&'a FeedItem>
where
    I: IntoIterator<Item = &'a FeedItem>,
{
    let needle = normalize_search_text(term);
    if needle.is_empty() {
        return items.into_iter().next();
    }
    items
        .into_iter()
        .find(|item| normalize_search_text(&item.title).contains(&needle))
}

#[cfg(test)]
mod tests {
    use {super::*, chrono::Utc};

    fn item(id: &str, title: &str) -> FeedItem {
        FeedItem {
            id: id.into(),
            title: title.into(),
            url: format!("https://example.com/{id}"),
            author: "someone".into(),
            author_avatar: None,
            body: None,
            published_at: Utc::now(),
            feed: "news".into(),
        }
    }

    #[test]
    fn first_match_wins() {
        let items = vec![
            item("1", "Weather today"),
            item("2", "Budget cuts announced"),
            item("3", "Budget cuts explained"),
        ];
        let found = first_title_match(&items, "budget");
        assert_eq!(found.map(|i| i.id.as_str()), Some("2"));
    }

    #[test]
    fn match_ignores_case_and_whitespace() {
        let items = vec![item("1", "Budget   Cuts\tannounced")];
        assert!(first_title_match(&items, "  budget cuts ").is_some());
    }

    #[test]
    fn no_match_returns_none() {
        let items = vec![item("1", "Weather today")];
        assert!(first_title_match(&items, "budget").is_none());
    }

    #[test]
    fn blank_term_returns_newest() {
        let items = vec![item("1", "first"), item("2", "second")];
        assert_eq!(
            first_title_match(&items, "   ").map(|i| i.id.as_str()),
            Some("1")
        );
    }
}
