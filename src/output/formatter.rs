use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::draws::StreamResult;
use crate::scoring::{ScoreBreakdown, Section};

const SECTIONS: [Section; 4] = [
    Section::Core,
    Section::Spouse,
    Section::Transferability,
    Section::Additional,
];

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Everything one run produced, for JSON output.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub epoch: &'a str,
    pub breakdown: &'a ScoreBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streams: Option<&'a [StreamResult]>,
}

pub fn format_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Format the itemized breakdown, one section per block.
///
/// Points column is right-aligned, 4 chars wide (fits "1200").
pub fn format_breakdown(breakdown: &ScoreBreakdown, epoch: &str, use_colors: bool) -> String {
    let items = breakdown.line_items();
    let label_width = items.iter().map(|i| i.label.len()).max().unwrap_or(0);
    let mut lines = Vec::new();

    let total = format!("CRS score: {}", breakdown.total);
    if use_colors {
        lines.push(format!("{}  {}", total.bold(), format!("(policy {})", epoch).dimmed()));
    } else {
        lines.push(format!("{}  (policy {})", total, epoch));
    }

    for section in SECTIONS {
        lines.push(String::new());
        let heading = format!(
            "{:<width$}  {:>4}",
            section.title(),
            breakdown.subtotal(section),
            width = label_width + 2
        );
        lines.push(if use_colors {
            heading.bold().to_string()
        } else {
            heading
        });

        for item in items.iter().filter(|i| i.section == section) {
            let line = format!(
                "  {:<width$}  {:>4}",
                item.label,
                item.points,
                width = label_width
            );
            lines.push(if use_colors && item.points == 0 {
                line.dimmed().to_string()
            } else {
                line
            });
        }
    }

    lines.join("\n")
}

/// Format the breakdown as tab-separated values for scripting
/// Columns: section, factor, points (no headers, no colors); last row is the total
pub fn format_breakdown_tsv(breakdown: &ScoreBreakdown) -> String {
    let mut lines: Vec<String> = breakdown
        .line_items()
        .iter()
        .map(|item| {
            format!(
                "{}\t{}\t{}",
                section_key(item.section),
                item.label,
                item.points
            )
        })
        .collect();
    lines.push(format!("total\t\t{}", breakdown.total));
    lines.join("\n")
}

fn section_key(section: Section) -> &'static str {
    match section {
        Section::Core => "core",
        Section::Spouse => "spouse",
        Section::Transferability => "transferability",
        Section::Additional => "additional",
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a stream name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// "2025-11-14" -> "Nov 14, 2025"; anything unparseable is shown as-is.
fn format_draw_date(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%b %d, %Y").to_string())
        .unwrap_or_else(|_| date.to_string())
}

/// Format ranked streams with the verdict, cutoff and recent draws.
///
/// Each stream takes two lines: the verdict line and an indented history
/// line where `+` marks a draw the score would have cleared and `-` one it
/// would have missed. Streams outside the applicant's profile are tagged
/// "(other)".
pub fn format_stream_table(results: &[StreamResult], use_colors: bool) -> String {
    if results.is_empty() {
        return "No draw history available.".to_string();
    }

    let term_width = get_terminal_width();

    // Index 3 + verdict 7 + cutoff 4 + separators
    let fixed_width = 3 + 1 + 7 + 2 + 4 + 2 + " (other)".len();

    results
        .iter()
        .enumerate()
        .map(|(idx, result)| {
            let index_str = format!("{:>2}.", idx + 1);
            let verdict = if result.qualified { "INVITED" } else { "MISSED " };
            let name = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_name(&result.stream_name, width - fixed_width)
                }
                Some(_) => truncate_name(&result.stream_name, 20),
                None => result.stream_name.clone(),
            };
            let other = if result.relevant { "" } else { " (other)" };

            let history = result
                .recent_history
                .iter()
                .map(|draw| {
                    let mark = if draw.cleared { "+" } else { "-" };
                    let entry = format!("{} {}{}", format_draw_date(&draw.date), draw.score, mark);
                    match (use_colors, draw.cleared) {
                        (true, true) => entry.green().to_string(),
                        (true, false) => entry.red().to_string(),
                        (false, _) => entry,
                    }
                })
                .collect::<Vec<_>>()
                .join("  ");

            let head = if use_colors {
                let verdict = if result.qualified {
                    verdict.green().bold().to_string()
                } else {
                    verdict.red().bold().to_string()
                };
                let name = if result.relevant {
                    name.bold().to_string()
                } else {
                    name.dimmed().to_string()
                };
                format!(
                    "{} {}  {:>4}  {}{}",
                    index_str.dimmed(),
                    verdict,
                    result.latest_cutoff,
                    name,
                    other.dimmed()
                )
            } else {
                format!(
                    "{} {}  {:>4}  {}{}",
                    index_str, verdict, result.latest_cutoff, name, other
                )
            };

            format!("{}\n      {}", head, history)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line summarizing how many relevant streams the score clears.
pub fn format_stream_summary(results: &[StreamResult]) -> String {
    let relevant: Vec<&StreamResult> = results.iter().filter(|r| r.relevant).collect();
    let qualified = relevant.iter().filter(|r| r.qualified).count();
    format!(
        "Meets the latest cutoff in {} of {} relevant streams.",
        qualified,
        relevant.len()
    )
}

/// Format streams as tab-separated values for scripting
/// Columns: stream, category, latest_cutoff, qualified, relevant (no headers, no colors)
pub fn format_streams_tsv(results: &[StreamResult]) -> String {
    results
        .iter()
        .map(|result| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                result.stream_name,
                result.category.label(),
                result.latest_cutoff,
                result.qualified,
                result.relevant
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
