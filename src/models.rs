use crate::utils::parse_iso8601_duration_to_seconds;
use chrono::{DateTime, Utc};
use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::Responder;
use rocket::serde::{Deserialize, Serialize};
use rocket::{response, Response};
use std::fmt;
use std::io::Cursor;

/// Longest duration (in seconds) that still counts as a Short.
pub const SHORT_MAX_SECONDS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VideoType {
    Video,
    Short,
    Live,
}

impl VideoType {
    pub const ALL: [VideoType; 3] = [VideoType::Video, VideoType::Short, VideoType::Live];

    /// First match wins: live indicators beat duration, short beats video.
    pub fn classify(
        duration: &str,
        has_live_details: bool,
        broadcast_content: Option<&str>,
    ) -> Self {
        if has_live_details || matches!(broadcast_content, Some("live") | Some("upcoming")) {
            VideoType::Live
        } else if parse_iso8601_duration_to_seconds(duration) <= SHORT_MAX_SECONDS {
            VideoType::Short
        } else {
            VideoType::Video
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VideoType::Video => "Video",
            VideoType::Short => "Short",
            VideoType::Live => "Live",
        }
    }
}

impl fmt::Display for VideoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One upload's observable facts. The content type is derived once at
/// construction and never recomputed from the stored fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRecord {
    pub video_id: String,
    pub title: String,
    pub published_at: DateTime<Utc>,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub duration: String,
    #[serde(rename = "type")]
    pub kind: VideoType,
    pub url: String,
}

impl VideoRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        video_id: &str,
        title: &str,
        published_at: DateTime<Utc>,
        duration: &str,
        views: u64,
        likes: u64,
        comments: u64,
        has_live_details: bool,
        broadcast_content: Option<&str>,
    ) -> Self {
        let kind = VideoType::classify(duration, has_live_details, broadcast_content);
        VideoRecord {
            video_id: video_id.to_string(),
            title: title.to_string(),
            published_at,
            views,
            likes,
            comments,
            duration: duration.to_string(),
            kind,
            url: format!("https://youtube.com/watch?v={video_id}"),
        }
    }
}

/// Tagged form of a free-form channel identifier. The parse rules are
/// ordered; earlier rules win.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelRef {
    /// Canonical channel ID taken verbatim from a `/channel/` URL.
    ChannelId(String),
    /// Legacy username, resolved via a `forUsername` lookup.
    LegacyName(String),
    /// Handle (without the leading `@`), resolved via a channel search.
    Handle(String),
}

impl ChannelRef {
    pub fn parse(identifier: &str) -> Self {
        let identifier = identifier.trim();

        if let Some((_, rest)) = identifier.split_once("/channel/") {
            let id = rest.split('/').next().unwrap_or(rest);
            return ChannelRef::ChannelId(id.to_string());
        }
        if identifier.contains("/c/") || identifier.contains("/user/") {
            let name = identifier
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or_default();
            return ChannelRef::LegacyName(name.to_string());
        }
        if let Some((_, rest)) = identifier.split_once("/@") {
            let handle = rest.split('/').next().unwrap_or(rest);
            return ChannelRef::Handle(handle.to_string());
        }
        if let Some(handle) = identifier.strip_prefix('@') {
            return ChannelRef::Handle(handle.to_string());
        }
        ChannelRef::LegacyName(identifier.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip)]
    status: Status,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ErrorResponse {
            error: message.into(),
            status: Status::BadRequest,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ErrorResponse {
            error: message.into(),
            status: Status::NotFound,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ErrorResponse {
            error: message.into(),
            status: Status::InternalServerError,
        }
    }
}

impl<'r> Responder<'r, 'static> for ErrorResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let json = serde_json::to_string(&self).map_err(|_| Status::InternalServerError)?;
        Response::build()
            .status(self.status)
            .header(ContentType::JSON)
            .sized_body(json.len(), Cursor::new(json))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn live_details_win_over_duration() {
        assert_eq!(VideoType::classify("PT30S", true, None), VideoType::Live);
        assert_eq!(VideoType::classify("PT2H30M", true, None), VideoType::Live);
    }

    #[test]
    fn broadcast_status_marks_live() {
        assert_eq!(
            VideoType::classify("PT10M", false, Some("live")),
            VideoType::Live
        );
        assert_eq!(
            VideoType::classify("PT10M", false, Some("upcoming")),
            VideoType::Live
        );
        assert_eq!(
            VideoType::classify("PT10M", false, Some("none")),
            VideoType::Video
        );
    }

    #[test]
    fn sixty_seconds_is_the_short_boundary() {
        assert_eq!(VideoType::classify("PT60S", false, None), VideoType::Short);
        assert_eq!(VideoType::classify("PT1M", false, None), VideoType::Short);
        assert_eq!(VideoType::classify("PT61S", false, None), VideoType::Video);
        assert_eq!(VideoType::classify("PT1M1S", false, None), VideoType::Video);
    }

    #[test]
    fn malformed_duration_counts_as_zero_and_classifies_short() {
        assert_eq!(VideoType::classify("P1D", false, None), VideoType::Short);
        assert_eq!(VideoType::classify("", false, None), VideoType::Short);
        assert_eq!(VideoType::classify("garbage", false, None), VideoType::Short);
    }

    #[test]
    fn record_is_classified_at_construction() {
        let published = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let record = VideoRecord::new("abc", "title", published, "PT45S", 10, 1, 0, false, None);
        assert_eq!(record.kind, VideoType::Short);
        assert_eq!(record.url, "https://youtube.com/watch?v=abc");
    }

    #[test]
    fn channel_url_yields_verbatim_id() {
        assert_eq!(
            ChannelRef::parse("https://www.youtube.com/channel/UC123/videos"),
            ChannelRef::ChannelId("UC123".to_string())
        );
        assert_eq!(
            ChannelRef::parse("https://youtube.com/channel/UCabc"),
            ChannelRef::ChannelId("UCabc".to_string())
        );
    }

    #[test]
    fn channel_rule_takes_precedence() {
        assert_eq!(
            ChannelRef::parse("https://youtube.com/channel/UC1/@something"),
            ChannelRef::ChannelId("UC1".to_string())
        );
    }

    #[test]
    fn legacy_url_forms_yield_usernames() {
        assert_eq!(
            ChannelRef::parse("https://youtube.com/c/SomeName"),
            ChannelRef::LegacyName("SomeName".to_string())
        );
        assert_eq!(
            ChannelRef::parse("https://youtube.com/user/olduser/"),
            ChannelRef::LegacyName("olduser".to_string())
        );
    }

    #[test]
    fn handle_forms_are_detected() {
        assert_eq!(
            ChannelRef::parse("https://youtube.com/@somehandle/featured"),
            ChannelRef::Handle("somehandle".to_string())
        );
        assert_eq!(
            ChannelRef::parse("@somehandle"),
            ChannelRef::Handle("somehandle".to_string())
        );
    }

    #[test]
    fn bare_string_falls_back_to_username() {
        assert_eq!(
            ChannelRef::parse("myusername"),
            ChannelRef::LegacyName("myusername".to_string())
        );
    }
}
