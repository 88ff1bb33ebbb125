//! Turning feed items and listings into Discord embeds.

use {
    chrono::{DateTime, Utc},
    serenity::all::{CreateEmbed, CreateEmbedAuthor, Timestamp},
};

use feedwatch_feeds::FeedItem;

/// Characters of post body kept in a notification.
pub const DESCRIPTION_LIMIT: usize = 150;

/// Discord rejects embed titles longer than this.
const TITLE_LIMIT: usize = 256;

/// Discord rejects embed descriptions longer than this.
pub const EMBED_DESCRIPTION_LIMIT: usize = 4096;

/// Everything shown for one post, independent of the Discord builder types.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: String,
    pub url: String,
    pub description: String,
    pub author_name: String,
    pub author_icon: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub color: u32,
}

impl Notification {
    pub fn from_item(item: &FeedItem, color: u32) -> Self {
        Self {
            title: truncate_chars(&item.title, TITLE_LIMIT),
            url: item.url.clone(),
            description: summarize_body(item.body.as_deref()),
            author_name: item.author.clone(),
            author_icon: item.author_avatar.clone(),
            timestamp: item.published_at,
            color,
        }
    }

    pub fn to_embed(&self) -> CreateEmbed {
        let mut author = CreateEmbedAuthor::new(&self.author_name);
        if let Some(icon) = &self.author_icon {
            author = author.icon_url(icon);
        }

        let mut embed = CreateEmbed::new()
            .title(&self.title)
            .url(&self.url)
            .description(&self.description)
            .author(author)
            .colour(self.color);
        if let Ok(ts) = Timestamp::from_unix_timestamp(self.timestamp.timestamp()) {
            embed = embed.timestamp(ts);
        }
        embed
    }
}

/// First [`DESCRIPTION_LIMIT`] characters of the body followed by `...`.
/// Link posts have no body and render as just `...`.
pub fn summarize_body(body: Option<&str>) -> String {
    let body = body.map(str::trim).unwrap_or_default();
    format!("{}...", body.chars().take(DESCRIPTION_LIMIT).collect::<String>())
}

/// Titled list, one entry per line, split over as many embeds as needed to
/// keep each description within [`EMBED_DESCRIPTION_LIMIT`]. Later pages get
/// a `(n/total)` suffix.
pub fn listing_embeds(title: &str, lines: &[String], color: u32) -> Vec<CreateEmbed> {
    let pages = listing_pages(lines, EMBED_DESCRIPTION_LIMIT);
    let total = pages.len();
    pages
        .into_iter()
        .enumerate()
        .map(|(i, page)| {
            let title = if total > 1 {
                format!("{title} ({}/{total})", i + 1)
            } else {
                title.to_string()
            };
            CreateEmbed::new()
                .title(truncate_chars(&title, TITLE_LIMIT))
                .description(page)
                .colour(color)
        })
        .collect()
}

/// Pack lines into newline-joined pages of at most `limit` characters.
/// A single line longer than `limit` is cut. Always yields one page.
pub fn listing_pages(lines: &[String], limit: usize) -> Vec<String> {
    let mut pages = Vec::new();
    let mut page = String::new();
    let mut page_chars = 0;
    for line in lines {
        let line = truncate_chars(line, limit);
        let line_chars = line.chars().count();
        let needed = if page.is_empty() {
            line_chars
        } else {
            line_chars + 1
        };
        if !page.is_empty() && page_chars + needed > limit {
            pages.push(std::mem::take(&mut page));
            page_chars = 0;
        }
        if !page.is_empty() {
            page.push('\n');
            page_chars += 1;
        }
        page.push_str(&line);
        page_chars += line_chars;
    }
    if !page.is_empty() || pages.is_empty() {
        pages.push(page);
    }
    pages
}

fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut out: String = text.chars().take(limit.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(body: Option<&str>) -> FeedItem {
        FeedItem {
            id: "abc".into(),
            title: "Budget cuts announced".into(),
            url: "https://reddit.com/r/news/abc".into(),
            author: "reporter".into(),
            author_avatar: Some("https://styles.redditmedia.com/icon.png".into()),
            body: body.map(String::from),
            published_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default(),
            feed: "news".into(),
        }
    }

    #[test]
    fn long_body_is_cut_at_limit() {
        let body = "x".repeat(400);
        let n = Notification::from_item(&item(Some(&body)), 0x00FF00);
        assert_eq!(n.description.len(), DESCRIPTION_LIMIT + 3);
        assert!(n.description.ends_with("..."));
    }

    #[test]
    fn short_body_kept_whole() {
        assert_eq!(summarize_body(Some("  hello  ")), "hello...");
    }

    #[test]
    fn link_post_has_ellipsis_only() {
        assert_eq!(summarize_body(None), "...");
    }

    #[test]
    fn cut_respects_char_boundaries() {
        let body = "é".repeat(200);
        let out = summarize_body(Some(&body));
        assert_eq!(out.chars().count(), DESCRIPTION_LIMIT + 3);
    }

    #[test]
    fn notification_carries_item_fields() {
        let n = Notification::from_item(&item(Some("text")), 0x123456);
        assert_eq!(n.title, "Budget cuts announced");
        assert_eq!(n.url, "https://reddit.com/r/news/abc");
        assert_eq!(n.author_name, "reporter");
        assert_eq!(
            n.author_icon.as_deref(),
            Some("https://styles.redditmedia.com/icon.png")
        );
        assert_eq!(n.timestamp.timestamp(), 1_700_000_000);
        assert_eq!(n.color, 0x123456);
    }

    fn channel_lines(count: usize) -> Vec<String> {
        (0..count)
            .map(|i| format!("<#{}> r/subreddit{i}", 1_100_000_000_000_000_000u64 + i as u64))
            .collect()
    }

    #[test]
    fn short_listing_is_one_page() {
        let lines = channel_lines(3);
        let pages = listing_pages(&lines, EMBED_DESCRIPTION_LIMIT);
        assert_eq!(pages, vec![lines.join("\n")]);
    }

    #[test]
    fn long_listing_splits_within_limit() {
        let lines = channel_lines(300);
        assert!(lines.join("\n").chars().count() > EMBED_DESCRIPTION_LIMIT);

        let pages = listing_pages(&lines, EMBED_DESCRIPTION_LIMIT);
        assert!(pages.len() > 1);
        for page in &pages {
            assert!(page.chars().count() <= EMBED_DESCRIPTION_LIMIT);
        }
        let rejoined: Vec<String> = pages
            .iter()
            .flat_map(|page| page.lines().map(String::from))
            .collect();
        assert_eq!(rejoined, lines);
        assert_eq!(listing_embeds("Subscribed", &lines, 0).len(), pages.len());
    }

    #[test]
    fn pages_fill_exactly_to_limit() {
        let lines = vec!["aaaa".to_string(), "bbbb".to_string(), "cc".to_string()];
        assert_eq!(listing_pages(&lines, 9), vec!["aaaa\nbbbb", "cc"]);
    }

    #[test]
    fn overlong_line_is_cut() {
        let lines = vec!["x".repeat(20)];
        let pages = listing_pages(&lines, 10);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].chars().count(), 10);
    }

    #[test]
    fn empty_listing_still_has_a_page() {
        assert_eq!(listing_pages(&[], EMBED_DESCRIPTION_LIMIT), vec![String::new()]);
    }

    #[test]
    fn overlong_title_truncated() {
        let mut it = item(None);
        it.title = "t".repeat(300);
        let n = Notification::from_item(&it, 0);
        assert_eq!(n.title.chars().count(), TITLE_LIMIT);
    }
}
