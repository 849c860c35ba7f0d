use crate::models::{ChannelRef, VideoRecord};
use crate::utils::parse_published_at;
use chrono::{DateTime, Duration, Utc};
use log::warn;
use reqwest::Client;
use serde_json::Value;

// Documentation: https://developers.google.com/youtube/v3/docs
const API_BASE: &str = "https://www.googleapis.com/youtube/v3";
const PAGE_SIZE: u32 = 50;

/// Upstream failure talking to the YouTube Data API. Distinct from a lookup
/// that succeeds but finds nothing, which services report as `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("YouTube API request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

pub struct YouTubeClient {
    http: Client,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        YouTubeClient {
            http: Client::new(),
            api_key: api_key.into(),
        }
    }

    async fn get_json(&self, url: &str) -> Result<Value, ApiError> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.json::<Value>().await?)
    }

    /// Resolve a channel URL, legacy username, or @handle to a canonical
    /// channel ID. `/channel/` URLs resolve without a network call.
    pub async fn resolve_channel_id(&self, identifier: &str) -> Result<Option<String>, ApiError> {
        match ChannelRef::parse(identifier) {
            ChannelRef::ChannelId(id) => Ok(Some(id)),
            ChannelRef::LegacyName(name) => self.channel_id_for_username(&name).await,
            ChannelRef::Handle(handle) => self.channel_id_for_handle(&handle).await,
        }
    }

    async fn channel_id_for_username(&self, username: &str) -> Result<Option<String>, ApiError> {
        let url = format!(
            "{API_BASE}/channels?part=id&forUsername={username}&key={}",
            self.api_key
        );
        let response = self.get_json(&url).await?;
        Ok(response["items"][0]["id"].as_str().map(String::from))
    }

    async fn channel_id_for_handle(&self, handle: &str) -> Result<Option<String>, ApiError> {
        let url = format!(
            "{API_BASE}/search?part=snippet&q=%40{handle}&type=channel&maxResults=1&key={}",
            self.api_key
        );
        let response = self.get_json(&url).await?;
        Ok(response["items"][0]["snippet"]["channelId"]
            .as_str()
            .map(String::from))
    }

    /// The channel's default uploads playlist, or None for an unknown channel.
    pub async fn uploads_playlist_id(&self, channel_id: &str) -> Result<Option<String>, ApiError> {
        let url = format!(
            "{API_BASE}/channels?part=contentDetails&id={channel_id}&key={}",
            self.api_key
        );
        let response = self.get_json(&url).await?;
        Ok(
            response["items"][0]["contentDetails"]["relatedPlaylists"]["uploads"]
                .as_str()
                .map(String::from),
        )
    }

    /// IDs of uploads published within the trailing `days` window.
    pub async fn list_recent_video_ids(
        &self,
        channel_id: &str,
        days: i64,
    ) -> Result<Option<Vec<String>>, ApiError> {
        let playlist_id = match self.uploads_playlist_id(channel_id).await? {
            Some(id) => id,
            None => return Ok(None),
        };

        let cutoff = Utc::now() - Duration::days(days);
        let mut video_ids = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = format!(
                "{API_BASE}/playlistItems?part=snippet&playlistId={playlist_id}&maxResults={PAGE_SIZE}&key={}",
                self.api_key
            );
            if let Some(token) = &page_token {
                url.push_str(&format!("&pageToken={token}"));
            }
            let response = self.get_json(&url).await?;

            let (mut page_ids, past_cutoff) = match response["items"].as_array() {
                Some(items) => in_window_video_ids(items, cutoff),
                None => (Vec::new(), false),
            };
            video_ids.append(&mut page_ids);

            page_token = response["nextPageToken"].as_str().map(String::from);
            // Uploads playlists are ordered newest first, so once one entry
            // falls outside the window the following pages will too.
            if page_token.is_none() || past_cutoff {
                break;
            }
        }

        Ok(Some(video_ids))
    }

    /// Fetch one video's statistics and build a classified record.
    /// Videos that no longer exist upstream come back as None.
    pub async fn fetch_video(&self, video_id: &str) -> Result<Option<VideoRecord>, ApiError> {
        let url = format!(
            "{API_BASE}/videos?part=snippet,statistics,contentDetails,liveStreamingDetails&id={video_id}&key={}",
            self.api_key
        );
        let response = self.get_json(&url).await?;

        let item = &response["items"][0];
        if item.is_null() {
            return Ok(None);
        }
        Ok(Some(video_from_item(video_id, item)))
    }

    /// Full window pipeline: list IDs, then fetch details one at a time.
    /// Per-video failures are logged and the video skipped.
    pub async fn collect_channel_videos(
        &self,
        channel_id: &str,
        days: i64,
    ) -> Result<Vec<VideoRecord>, ApiError> {
        let video_ids = match self.list_recent_video_ids(channel_id, days).await? {
            Some(ids) => ids,
            None => return Ok(Vec::new()),
        };

        let mut videos = Vec::with_capacity(video_ids.len());
        for video_id in &video_ids {
            match self.fetch_video(video_id).await {
                Ok(Some(video)) => videos.push(video),
                Ok(None) => warn!("Video {video_id} is no longer available, skipping"),
                Err(e) => warn!("Failed to fetch details for video {video_id}: {e}"),
            }
        }
        Ok(videos)
    }
}

/// Filter one playlist page against the window cutoff. Returns the IDs of
/// entries published on or after the cutoff, plus whether any entry fell
/// outside the window (the caller stops paging once one does).
fn in_window_video_ids(items: &[Value], cutoff: DateTime<Utc>) -> (Vec<String>, bool) {
    let mut video_ids = Vec::new();
    let mut past_cutoff = false;

    for item in items {
        let published =
            parse_published_at(item["snippet"]["publishedAt"].as_str().unwrap_or(""));
        if published < cutoff {
            past_cutoff = true;
            continue;
        }
        if let Some(video_id) = item["snippet"]["resourceId"]["videoId"].as_str() {
            video_ids.push(video_id.to_string());
        }
    }

    (video_ids, past_cutoff)
}

fn video_from_item(video_id: &str, item: &Value) -> VideoRecord {
    // Statistics come back as decimal strings; absent fields default to zero.
    let stat = |field: &str| -> u64 {
        item["statistics"][field]
            .as_str()
            .unwrap_or("0")
            .parse()
            .unwrap_or(0)
    };

    VideoRecord::new(
        video_id,
        item["snippet"]["title"].as_str().unwrap_or(""),
        parse_published_at(item["snippet"]["publishedAt"].as_str().unwrap_or("")),
        item["contentDetails"]["duration"].as_str().unwrap_or(""),
        stat("viewCount"),
        stat("likeCount"),
        stat("commentCount"),
        !item["liveStreamingDetails"].is_null(),
        item["snippet"]["liveBroadcastContent"].as_str(),
    )
}
