use std::collections::{HashMap, HashSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::sleep;

pub const DEFAULT_REDDIT_API_URL: &str = "https://meme-api.com/gimme";
const MAX_ATTEMPTS: usize = 5;
const RETRY_DELAY: Duration = Duration::from_millis(500);
/// Posted-url memory per guild is reset past this size.
const MAX_REMEMBERED_PER_GUILD: usize = 1_000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedditPost {
    pub post_link: String,
    pub subreddit: String,
    pub title: String,
    pub url: String,
    pub author: String,
    #[serde(default)]
    pub ups: i64,
    #[serde(default)]
    pub nsfw: bool,
}

/// Fetches random image posts and remembers which images each guild has seen.
pub struct RedditClient {
    http: reqwest::Client,
    api_url: String,
    posted: Mutex<HashMap<u64, HashSet<String>>>,
}

impl RedditClient {
    pub fn new(http: reqwest::Client, api_url: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.into(),
            posted: Mutex::new(HashMap::new()),
        }
    }

    fn endpoint(&self, subreddit: Option<&str>) -> String {
        let base = self.api_url.trim_end_matches('/');
        match subreddit.map(|name| name.trim().trim_start_matches("r/")) {
            Some(name) if !name.is_empty() => format!("{base}/{name}"),
            _ => base.to_owned(),
        }
    }

    pub async fn random_post(&self, subreddit: Option<&str>) -> anyhow::Result<RedditPost> {
        let response = self.http.get(self.endpoint(subreddit)).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("reddit API error: {}", response.status());
        }

        Ok(response.json::<RedditPost>().await?)
    }

    /// A random post whose image has not been shown in this guild yet.
    ///
    /// NSFW posts are skipped unless `allow_nsfw`. After the last attempt the
    /// final acceptable post is returned even if it was seen before.
    pub async fn fresh_post(
        &self,
        guild_id: u64,
        subreddit: Option<&str>,
        allow_nsfw: bool,
    ) -> anyhow::Result<Option<RedditPost>> {
        let mut fallback = None;

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                sleep(RETRY_DELAY).await;
            }

            let post = self.random_post(subreddit).await?;
            if post.nsfw && !allow_nsfw {
                continue;
            }

            if self.remember(guild_id, &post.url).await {
                return Ok(Some(post));
            }
            fallback = Some(post);
        }

        Ok(fallback)
    }

    /// Record `url` for the guild. Returns `false` when it was already known.
    async fn remember(&self, guild_id: u64, url: &str) -> bool {
        let mut posted = self.posted.lock().await;
        let seen = posted.entry(guild_id).or_default();
        if seen.len() >= MAX_REMEMBERED_PER_GUILD {
            seen.clear();
        }
        seen.insert(url.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::{RedditClient, RedditPost};

    fn client() -> RedditClient {
        RedditClient::new(reqwest::Client::new(), "https://meme-api.com/gimme/")
    }

    #[test]
    fn endpoint_appends_subreddit() {
        let client = client();
        assert_eq!(client.endpoint(None), "https://meme-api.com/gimme");
        assert_eq!(client.endpoint(Some("r/aww")), "https://meme-api.com/gimme/aww");
        assert_eq!(client.endpoint(Some("  ")), "https://meme-api.com/gimme");
    }

    #[tokio::test]
    async fn remembers_posted_images_per_guild() {
        let client = client();
        assert!(client.remember(1, "https://i.redd.it/a.png").await);
        assert!(!client.remember(1, "https://i.redd.it/a.png").await);
        assert!(client.remember(2, "https://i.redd.it/a.png").await);
    }

    #[test]
    fn parses_api_payload() {
        let raw = r#"{"postLink":"https://redd.it/x","subreddit":"memes","title":"t",
            "url":"https://i.redd.it/x.jpg","nsfw":false,"spoiler":false,"author":"me","ups":42,
            "preview":[]}"#;
        let post: RedditPost = serde_json::from_str(raw).unwrap();
        assert_eq!(post.ups, 42);
        assert_eq!(post.post_link, "https://redd.it/x");
    }
}
