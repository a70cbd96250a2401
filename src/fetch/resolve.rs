//! Channel URL resolution.
//!
//! Anything the user pastes is validated into a [`ChannelRef`] before any
//! network call. Channel-id URLs map straight to the upload feed; handle,
//! legacy-user, custom and video URLs need a page fetch to recover the
//! canonical channel id (and, best effort, a subscriber-count string).

use anyhow::{Context, Result};
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use super::{HttpClient, fetch_text};

/// A validated channel or video locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelRef {
    /// Canonical `UC…` channel id.
    ChannelId(String),
    /// `@handle` form.
    Handle(String),
    /// Legacy `/user/NAME` form.
    User(String),
    /// Vanity `/c/NAME` form.
    Custom(String),
    /// A single video; resolution walks back to its channel.
    Video(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("not a valid URL: {0}")]
    InvalidUrl(String),

    #[error("not a recognized channel or video URL: {0}")]
    UnsupportedUrl(String),
}

/// Feed URL plus whatever channel metadata the resolution pass scraped.
#[derive(Debug)]
pub struct ResolvedChannel {
    pub feed_url: String,
    pub subscriber_estimate: Option<String>,
}

impl ChannelRef {
    /// Classifies a pasted URL. No network access; unrecognized input is an
    /// enumerated failure, never a panic or a guess.
    pub fn parse(input: &str) -> Result<Self, ResolveError> {
        let url: reqwest::Url = input
            .trim()
            .parse()
            .map_err(|_| ResolveError::InvalidUrl(input.to_string()))?;

        let host = url.host_str().unwrap_or("");
        let is_youtube = matches!(
            host,
            "www.youtube.com" | "youtube.com" | "m.youtube.com"
        );

        if host == "youtu.be" {
            let id = url.path().trim_matches('/');
            if id.is_empty() {
                return Err(ResolveError::UnsupportedUrl(input.to_string()));
            }
            return Ok(ChannelRef::Video(id.to_string()));
        }

        if !is_youtube {
            return Err(ResolveError::UnsupportedUrl(input.to_string()));
        }

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|p| !p.is_empty()).collect())
            .unwrap_or_default();

        match segments.as_slice() {
            ["channel", id] if id.starts_with("UC") => Ok(ChannelRef::ChannelId(id.to_string())),
            [handle] if handle.starts_with('@') => {
                Ok(ChannelRef::Handle(handle.trim_start_matches('@').to_string()))
            }
            ["user", name] => Ok(ChannelRef::User(name.to_string())),
            ["c", name] => Ok(ChannelRef::Custom(name.to_string())),
            ["watch"] => {
                let id = url
                    .query_pairs()
                    .find(|(k, _)| k == "v")
                    .map(|(_, v)| v.to_string())
                    .ok_or_else(|| ResolveError::UnsupportedUrl(input.to_string()))?;
                Ok(ChannelRef::Video(id))
            }
            _ => Err(ResolveError::UnsupportedUrl(input.to_string())),
        }
    }
}

fn feed_url_for(channel_id: &str) -> String {
    format!("https://www.youtube.com/feeds/videos.xml?channel_id={channel_id}")
}

/// Resolves a validated reference to its upload feed URL.
///
/// Channel-id references resolve without touching the network. Every other
/// form fetches the public page and pulls the canonical id out of the HTML.
pub async fn resolve_feed_url<C: HttpClient>(
    client: &C,
    reference: &ChannelRef,
) -> Result<ResolvedChannel> {
    // Page to scrape when the channel id is not in the URL itself
    let page_url = match reference {
        ChannelRef::ChannelId(id) => {
            return Ok(ResolvedChannel {
                feed_url: feed_url_for(id),
                subscriber_estimate: None,
            });
        }
        ChannelRef::Handle(h) => format!("https://www.youtube.com/@{h}"),
        ChannelRef::User(n) => format!("https://www.youtube.com/user/{n}"),
        ChannelRef::Custom(n) => format!("https://www.youtube.com/c/{n}"),
        ChannelRef::Video(id) => format!("https://www.youtube.com/watch?v={id}"),
    };

    debug!(page = %page_url, "Resolving channel id from page");
    let html = fetch_text(client, &page_url).await?;

    let channel_id = extract_channel_id(&html)
        .with_context(|| format!("no channel id found at {page_url}"))?;

    Ok(ResolvedChannel {
        feed_url: feed_url_for(&channel_id),
        subscriber_estimate: extract_subscriber_estimate(&html),
    })
}

fn extract_channel_id(html: &str) -> Option<String> {
    let re = Regex::new(r#""channelId"\s*:\s*"(UC[0-9A-Za-z_-]{22})""#)
        .expect("valid channel id regex");
    if let Some(caps) = re.captures(html) {
        return Some(caps[1].to_string());
    }

    // og:url / canonical link fallback
    let re = Regex::new(r"/channel/(UC[0-9A-Za-z_-]{22})").expect("valid channel path regex");
    re.captures(html).map(|caps| caps[1].to_string())
}

/// Best-effort subscriber string (e.g. "12.3K subscribers"); never derived,
/// only passed through for display.
fn extract_subscriber_estimate(html: &str) -> Option<String> {
    let re = Regex::new(r#""subscriberCountText"\s*:\s*\{\s*"simpleText"\s*:\s*"([^"]+)""#)
        .expect("valid subscriber count regex");
    if let Some(caps) = re.captures(html) {
        return Some(caps[1].to_string());
    }

    let re = Regex::new(r"([0-9][0-9.,]*[KMB]?) subscribers").expect("valid subscriber text regex");
    re.captures(html).map(|caps| caps[0].to_string())
}
