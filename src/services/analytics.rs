use crate::models::{VideoRecord, VideoType};
use crate::services::youtube::{ApiError, YouTubeClient};
use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEFAULT_TOP_N: usize = 5;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Metric used to rank the top-video leaderboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopMetric {
    Views,
    Likes,
    Comments,
}

impl TopMetric {
    pub fn value(self, video: &VideoRecord) -> u64 {
        match self {
            TopMetric::Views => video.views,
            TopMetric::Likes => video.likes,
            TopMetric::Comments => video.comments,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TopMetric::Views => "views",
            TopMetric::Likes => "likes",
            TopMetric::Comments => "comments",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeAggregate {
    pub count: usize,
    pub total_views: u64,
    pub total_likes: u64,
    pub total_comments: u64,
    pub average_views: f64,
    pub average_likes: f64,
    pub average_comments: f64,
    pub engagement_rate: f64,
    pub top_videos: Vec<VideoRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_day: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_hour: Option<u32>,
}

impl Default for TypeAggregate {
    fn default() -> Self {
        TypeAggregate {
            count: 0,
            total_views: 0,
            total_likes: 0,
            total_comments: 0,
            average_views: 0.0,
            average_likes: 0.0,
            average_comments: 0.0,
            engagement_rate: 0.0,
            top_videos: Vec::new(),
            best_day: None,
            best_hour: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OverallStats {
    pub total_videos: usize,
    pub total_views: u64,
    pub total_likes: u64,
    pub total_comments: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelReport {
    pub channel_id: String,
    pub analysis_period_days: i64,
    pub analysis_date: DateTime<Utc>,
    pub overall_stats: OverallStats,
    pub content_type_analysis: BTreeMap<VideoType, TypeAggregate>,
    pub all_videos: Vec<VideoRecord>,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Build the full report for one analysis run. Every content type appears in
/// the result, zero-valued when no video of that type fell in the window.
pub fn build_report(
    channel_id: &str,
    days: i64,
    videos: Vec<VideoRecord>,
    metric: TopMetric,
    top_n: usize,
) -> ChannelReport {
    let overall_stats = OverallStats {
        total_videos: videos.len(),
        total_views: videos.iter().map(|v| v.views).sum(),
        total_likes: videos.iter().map(|v| v.likes).sum(),
        total_comments: videos.iter().map(|v| v.comments).sum(),
    };

    let mut grouped: BTreeMap<VideoType, Vec<VideoRecord>> =
        VideoType::ALL.iter().map(|t| (*t, Vec::new())).collect();
    for video in &videos {
        grouped.entry(video.kind).or_default().push(video.clone());
    }

    let content_type_analysis = grouped
        .into_iter()
        .map(|(kind, group)| (kind, aggregate_type(group, metric, top_n)))
        .collect();

    ChannelReport {
        channel_id: channel_id.to_string(),
        analysis_period_days: days,
        analysis_date: Utc::now(),
        overall_stats,
        content_type_analysis,
        all_videos: videos,
    }
}

fn aggregate_type(mut group: Vec<VideoRecord>, metric: TopMetric, top_n: usize) -> TypeAggregate {
    let count = group.len();
    if count == 0 {
        return TypeAggregate::default();
    }

    let total_views: u64 = group.iter().map(|v| v.views).sum();
    let total_likes: u64 = group.iter().map(|v| v.likes).sum();
    let total_comments: u64 = group.iter().map(|v| v.comments).sum();

    let engagement_rate = if total_views > 0 {
        round2((total_likes + total_comments) as f64 / total_views as f64 * 100.0)
    } else {
        0.0
    };

    let best_day = best_publishing_day(&group);
    let best_hour = best_publishing_hour(&group);

    // Stable descending sort keeps discovery order between ties.
    group.sort_by(|a, b| metric.value(b).cmp(&metric.value(a)));
    group.truncate(top_n);

    TypeAggregate {
        count,
        total_views,
        total_likes,
        total_comments,
        average_views: round2(total_views as f64 / count as f64),
        average_likes: round2(total_likes as f64 / count as f64),
        average_comments: round2(total_comments as f64 / count as f64),
        engagement_rate,
        top_videos: group,
        best_day,
        best_hour,
    }
}

/// Weekday whose uploads average the most views. Ties resolve to the
/// earliest day in Monday-to-Sunday order.
fn best_publishing_day(group: &[VideoRecord]) -> Option<String> {
    let mut best: Option<(Weekday, f64)> = None;
    for day in WEEKDAYS {
        if let Some(mean) = mean_views(group, |v| v.published_at.weekday() == day) {
            if best.map_or(true, |(_, m)| mean > m) {
                best = Some((day, mean));
            }
        }
    }
    best.map(|(day, _)| day_name(day).to_string())
}

/// Hour of day (0-23) whose uploads average the most views. Ties resolve to
/// the earliest hour.
fn best_publishing_hour(group: &[VideoRecord]) -> Option<u32> {
    let mut best: Option<(u32, f64)> = None;
    for hour in 0..24 {
        if let Some(mean) = mean_views(group, |v| v.published_at.hour() == hour) {
            if best.map_or(true, |(_, m)| mean > m) {
                best = Some((hour, mean));
            }
        }
    }
    best.map(|(hour, _)| hour)
}

fn mean_views(group: &[VideoRecord], matches: impl Fn(&VideoRecord) -> bool) -> Option<f64> {
    let views: Vec<u64> = group
        .iter()
        .filter(|v| matches(v))
        .map(|v| v.views)
        .collect();
    if views.is_empty() {
        return None;
    }
    Some(views.iter().sum::<u64>() as f64 / views.len() as f64)
}

fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Resolve, list, classify, aggregate. None means the identifier did not
/// resolve to any channel.
pub async fn analyze_channel(
    client: &YouTubeClient,
    identifier: &str,
    days: i64,
) -> Result<Option<ChannelReport>, ApiError> {
    let channel_id = match client.resolve_channel_id(identifier).await? {
        Some(id) => id,
        None => return Ok(None),
    };
    let videos = client.collect_channel_videos(&channel_id, days).await?;
    Ok(Some(build_report(
        &channel_id,
        days,
        videos,
        TopMetric::Views,
        DEFAULT_TOP_N,
    )))
}

/// Library entry point: the full report as a pretty-printed JSON document.
pub async fn get_channel_analytics(
    client: &YouTubeClient,
    identifier: &str,
    days: i64,
) -> anyhow::Result<String> {
    match analyze_channel(client, identifier, days).await? {
        Some(report) => Ok(serde_json::to_string_pretty(&report)?),
        None => Ok(serde_json::to_string_pretty(&serde_json::json!({
            "error": "Could not find channel ID"
        }))?),
    }
}
