use crate::models::{VideoRecord, VideoType};
use crate::services::analytics::{round2, ChannelReport, TopMetric};
use anyhow::Result;
use std::fmt::Write as _;
use std::path::Path;

const LEADERBOARD_METRICS: [TopMetric; 3] = [TopMetric::Views, TopMetric::Likes, TopMetric::Comments];

/// Abbreviate large numbers: 1500 -> "1.5K", 2.5e6 -> "2.5M", 1.2e9 -> "1.2B".
pub fn format_number(num: f64) -> String {
    if num >= 1_000_000_000.0 {
        format!("{:.1}B", num / 1_000_000_000.0)
    } else if num >= 1_000_000.0 {
        format!("{:.1}M", num / 1_000_000.0)
    } else if num >= 1_000.0 {
        format!("{:.1}K", num / 1_000.0)
    } else if num.fract() == 0.0 {
        format!("{}", num as u64)
    } else {
        format!("{num:.2}")
    }
}

/// Pretty-printed JSON document, value-for-value the aggregator's output.
pub fn render_json(report: &ChannelReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Raw per-video rows, written before any analysis output so partial results
/// survive a later failure.
pub fn write_csv(path: &Path, videos: &[VideoRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for video in videos {
        writer.serialize(video)?;
    }
    writer.flush()?;
    Ok(())
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let rule: String = {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line
    };

    let format_row = |cells: &[String]| -> String {
        let mut line = String::from("|");
        for (i, &width) in widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            line.push_str(&format!(" {cell:<width$} |"));
        }
        line
    };

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut out = String::new();
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format_row(&header_cells));
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');
    for row in rows {
        out.push_str(&format_row(row));
        out.push('\n');
    }
    out.push_str(&rule);
    out
}

fn leaderboard(videos: &[VideoRecord], kind: VideoType, metric: TopMetric, n: usize) -> String {
    let mut group: Vec<&VideoRecord> = videos.iter().filter(|v| v.kind == kind).collect();
    group.sort_by(|a, b| metric.value(b).cmp(&metric.value(a)));
    group.truncate(n);

    let rows: Vec<Vec<String>> = group
        .iter()
        .map(|v| {
            vec![
                v.title.clone(),
                format_number(v.views as f64),
                format_number(v.likes as f64),
                format_number(v.comments as f64),
                v.url.clone(),
            ]
        })
        .collect();

    render_table(&["Title", "Views", "Likes", "Comments", "URL"], &rows)
}

/// Human-readable summary of a full report. `top_n` bounds the per-metric
/// leaderboards.
pub fn render_console(report: &ChannelReport, top_n: usize) -> String {
    let mut out = String::new();
    let overall = &report.overall_stats;

    let _ = writeln!(out, "====================================");
    let _ = writeln!(out, "Channel Analytics Summary");
    let _ = writeln!(out, "====================================");
    let _ = writeln!(out);
    let _ = writeln!(out, "Overall Channel Statistics:");
    let _ = writeln!(out, "Total content pieces: {}", overall.total_videos);
    let _ = writeln!(out, "Total views: {}", format_number(overall.total_views as f64));
    let _ = writeln!(out, "Total likes: {}", format_number(overall.total_likes as f64));
    let _ = writeln!(
        out,
        "Total comments: {}",
        format_number(overall.total_comments as f64)
    );

    let _ = writeln!(out, "\nContent Distribution:");
    let distribution: Vec<Vec<String>> = VideoType::ALL
        .iter()
        .map(|kind| {
            vec![
                kind.to_string(),
                report.content_type_analysis[kind].count.to_string(),
            ]
        })
        .collect();
    let _ = writeln!(out, "{}", render_table(&["Type", "Count"], &distribution));

    let _ = writeln!(out, "\nAverage Performance by Content Type:");
    let averages: Vec<Vec<String>> = VideoType::ALL
        .iter()
        .map(|kind| {
            let agg = &report.content_type_analysis[kind];
            vec![
                kind.to_string(),
                format_number(agg.average_views),
                format_number(agg.average_likes),
                format_number(agg.average_comments),
            ]
        })
        .collect();
    let _ = writeln!(
        out,
        "{}",
        render_table(&["Type", "Avg Views", "Avg Likes", "Avg Comments"], &averages)
    );

    let _ = writeln!(out, "\nEngagement Rates by Content Type:");
    let engagement: Vec<Vec<String>> = VideoType::ALL
        .iter()
        .map(|kind| {
            let agg = &report.content_type_analysis[kind];
            vec![kind.to_string(), format!("{}%", agg.engagement_rate)]
        })
        .collect();
    let _ = writeln!(
        out,
        "{}",
        render_table(&["Content Type", "Avg Engagement Rate"], &engagement)
    );

    let _ = writeln!(out, "\n====================================");
    let _ = writeln!(out, "Top Performers By Category");
    let _ = writeln!(out, "====================================");

    for kind in VideoType::ALL {
        let agg = &report.content_type_analysis[&kind];
        if agg.count == 0 {
            let _ = writeln!(out, "\nNo {kind}s found in the analyzed period.");
            continue;
        }

        let _ = writeln!(out, "\n=== {kind} Analytics ===");
        for metric in LEADERBOARD_METRICS {
            let _ = writeln!(out, "\nTop {} {kind}s by {}:", top_n.min(agg.count), metric.label());
            let _ = writeln!(out, "{}", leaderboard(&report.all_videos, kind, metric, top_n));
        }

        let view_share = if overall.total_views > 0 {
            round2(agg.total_views as f64 / overall.total_views as f64 * 100.0)
        } else {
            0.0
        };
        let _ = writeln!(out, "\n{kind} Statistics:");
        let _ = writeln!(out, "Total {kind}s: {}", agg.count);
        let _ = writeln!(out, "Total Views: {}", format_number(agg.total_views as f64));
        let _ = writeln!(out, "Average Views: {}", format_number(agg.average_views));
        let _ = writeln!(out, "Share of Total Views: {view_share}%");

        if let (Some(day), Some(hour)) = (&agg.best_day, agg.best_hour) {
            let _ = writeln!(out, "\nBest Publishing Times for {kind}s:");
            let _ = writeln!(out, "Best Day: {day}");
            let _ = writeln!(out, "Best Hour: {hour:02}:00");
        }

        let _ = writeln!(out, "\n-----------------------------------");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::analytics::{build_report, TopMetric};
    use chrono::{TimeZone, Utc};

    fn sample_videos() -> Vec<VideoRecord> {
        let at = |day, hour| Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap();
        vec![
            VideoRecord::new("s1", "A short", at(1, 9), "PT30S", 1500, 100, 10, false, None),
            VideoRecord::new("v1", "A video", at(2, 9), "PT20M", 2_500_000, 5000, 300, false, None),
            VideoRecord::new("l1", "A stream", at(3, 9), "PT0S", 999, 50, 5, true, None),
        ]
    }

    #[test]
    fn format_number_fixed_cases() {
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1500.0), "1.5K");
        assert_eq!(format_number(2_500_000.0), "2.5M");
        assert_eq!(format_number(1_200_000_000.0), "1.2B");
    }

    #[test]
    fn format_number_keeps_small_fractions() {
        assert_eq!(format_number(7.5), "7.50");
        assert_eq!(format_number(0.0), "0");
    }

    #[test]
    fn table_pads_columns() {
        let table = render_table(
            &["Type", "Count"],
            &[vec!["Video".to_string(), "3".to_string()]],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "+-------+-------+");
        assert_eq!(lines[1], "| Type  | Count |");
        assert_eq!(lines[3], "| Video | 3     |");
    }

    #[test]
    fn console_report_mentions_every_section() {
        let report = build_report("UCx", 30, sample_videos(), TopMetric::Views, 5);
        let text = render_console(&report, 5);

        assert!(text.contains("Channel Analytics Summary"));
        assert!(text.contains("Content Distribution"));
        assert!(text.contains("Engagement Rates by Content Type"));
        assert!(text.contains("Best Publishing Times"));
        assert!(text.contains("2.5M"));
    }

    #[test]
    fn json_report_round_trips() {
        let report = build_report("UCx", 30, sample_videos(), TopMetric::Views, 5);
        let json = render_json(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["channel_id"], "UCx");
        assert_eq!(value["all_videos"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn csv_rows_keep_the_raw_fields() {
        let dir = std::env::temp_dir().join("channel-analytics-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("rows.csv");

        write_csv(&path, &sample_videos()).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();

        assert_eq!(
            lines.next().unwrap(),
            "video_id,title,published_at,views,likes,comments,duration,type,url"
        );
        assert!(contents.contains("s1,A short"));
        assert!(contents.contains("Short"));
        std::fs::remove_file(&path).unwrap();
    }
}
