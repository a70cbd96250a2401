//! Streaming parser for the channel upload feed (`videos.xml`, Atom).
//!
//! Walks the document event-by-event instead of deserializing the whole tree;
//! the feed carries namespaced extension tags (`yt:*`, `media:*`) that only
//! matter at a handful of points. Entries with an unparseable publish date
//! are skipped with a warning rather than failing the whole feed.

use chrono::{DateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::Event;
use thiserror::Error;
use tracing::warn;

use crate::stats::UploadItem;

/// Channel metadata from the feed header, plus a pass-through subscriber
/// estimate filled in later by URL resolution when available.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ChannelInfo {
    pub title: String,
    pub url: String,
    pub subscriber_estimate: Option<String>,
}

#[derive(Debug)]
pub struct ChannelFeed {
    pub channel: ChannelInfo,
    pub items: Vec<UploadItem>,
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("document is not an Atom upload feed")]
    NotAFeed,
}

/// Parses a `videos.xml` Atom document into channel info and upload items.
///
/// # Errors
///
/// Returns [`FeedError::Xml`] on malformed XML and [`FeedError::NotAFeed`]
/// when the root element is not an Atom `<feed>`.
pub fn parse_channel_feed(xml: &str) -> Result<ChannelFeed, FeedError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut saw_root = false;
    let mut in_entry = false;
    let mut in_author = false;
    let mut current_tag = String::new();

    let mut channel = ChannelInfo::default();
    let mut items = Vec::new();

    // per-entry accumulators
    let mut title = String::new();
    let mut published = String::new();
    let mut video_url = String::new();
    let mut video_id = String::new();
    let mut views: u64 = 0;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name_buf = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_buf).unwrap_or("");

                if !saw_root {
                    if name != "feed" {
                        return Err(FeedError::NotAFeed);
                    }
                    saw_root = true;
                    continue;
                }

                match name {
                    "entry" => {
                        in_entry = true;
                        title.clear();
                        published.clear();
                        video_url.clear();
                        video_id.clear();
                        views = 0;
                    }
                    "author" => in_author = true,
                    "link" => {
                        if let Some(href) = link_href(&e) {
                            assign_link(in_entry, &href, &mut video_url, &mut channel);
                        }
                    }
                    "media:statistics" if in_entry => {
                        views = statistics_views(&e).unwrap_or(0);
                    }
                    _ => current_tag = name.to_string(),
                }
            }
            Event::Empty(e) => {
                let name_buf = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_buf).unwrap_or("");

                match name {
                    "link" => {
                        if let Some(href) = link_href(&e) {
                            assign_link(in_entry, &href, &mut video_url, &mut channel);
                        }
                    }
                    "media:statistics" if in_entry => {
                        views = statistics_views(&e).unwrap_or(0);
                    }
                    _ => {}
                }
            }
            Event::Text(e) => {
                let text = e.unescape().unwrap_or_default().into_owned();
                match current_tag.as_str() {
                    "title" if in_entry => title = text,
                    "title" if channel.title.is_empty() => channel.title = text,
                    "published" if in_entry => published = text,
                    "yt:videoId" if in_entry => video_id = text,
                    "uri" if in_author && channel.url.is_empty() => channel.url = text,
                    _ => {}
                }
                current_tag.clear();
            }
            Event::End(e) => {
                let name_buf = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_buf).unwrap_or("");
                match name {
                    "entry" => {
                        in_entry = false;
                        match finish_entry(&title, &published, &video_url, &video_id, views) {
                            Some(item) => items.push(item),
                            None => {
                                warn!(title = %title, published = %published, "Skipping malformed feed entry");
                            }
                        }
                    }
                    "author" => in_author = false,
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(FeedError::NotAFeed);
    }

    Ok(ChannelFeed { channel, items })
}

/// Fresh uploads may report no view count yet; absent or unparseable counts
/// fall back to zero at the call site.
fn statistics_views(e: &quick_xml::events::BytesStart<'_>) -> Option<u64> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"views" {
            let raw = String::from_utf8_lossy(attr.value.as_ref());
            return raw.parse().ok();
        }
    }
    None
}

fn link_href(e: &quick_xml::events::BytesStart<'_>) -> Option<String> {
    let mut href = None;
    let mut rel_alternate = true;

    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"href" => href = Some(String::from_utf8_lossy(attr.value.as_ref()).to_string()),
            b"rel" => rel_alternate = attr.value.as_ref() == b"alternate",
            _ => {}
        }
    }

    if rel_alternate { href } else { None }
}

fn assign_link(in_entry: bool, href: &str, video_url: &mut String, channel: &mut ChannelInfo) {
    if in_entry {
        if href.contains("/watch") {
            *video_url = href.to_string();
        }
    } else if channel.url.is_empty() {
        channel.url = href.to_string();
    }
}

/// Validates one accumulated entry. `None` means the entry is dropped from
/// bucketed calculations entirely.
fn finish_entry(
    title: &str,
    published: &str,
    video_url: &str,
    video_id: &str,
    views: u64,
) -> Option<UploadItem> {
    if title.is_empty() {
        return None;
    }

    let published_at: DateTime<Utc> = DateTime::parse_from_rfc3339(published)
        .ok()?
        .with_timezone(&Utc);

    let url = if !video_url.is_empty() {
        video_url.to_string()
    } else if !video_id.is_empty() {
        format!("https://www.youtube.com/watch?v={video_id}")
    } else {
        String::new()
    };

    Some(UploadItem {
        title: title.to_string(),
        published_at,
        views,
        url,
    })
}
