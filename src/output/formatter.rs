use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::scoring::RankedEntry;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score as a signed value with 3 decimals ("+1.225", "-0.400").
/// A rounded negative zero is shown as "+0.000".
pub fn format_score(score: f64) -> String {
    let formatted = format!("{:+.3}", score);
    if formatted == "-0.000" {
        "+0.000".to_string()
    } else {
        formatted
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
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

fn judge_count(n: usize) -> String {
    if n == 1 {
        "1 judge".to_string()
    } else {
        format!("{} judges", n)
    }
}

/// Format a ranking as a table with columns: Rank, Score, Entry, Judges
/// No headers (minimal format)
/// Rank column: 3 chars (fits "99."), right-aligned
/// Score column is right-aligned, 7 chars wide (fits "-12.345")
pub fn format_ranking_table(entries: &[RankedEntry], use_colors: bool) -> String {
    if entries.is_empty() {
        return "No entries found.".to_string();
    }

    let term_width = get_terminal_width();

    let rank_width = 3;
    let score_width = 7;
    let separator = "  ";

    entries
        .iter()
        .enumerate()
        .map(|(idx, ranked)| {
            // 1-based rank, right-aligned with trailing dot
            let rank_str = format!("{:>2}.", idx + 1);
            let score_padded = format!(
                "{:>width$}",
                format_score(ranked.score),
                width = score_width
            );
            let judges = judge_count(ranked.judges());

            let fixed_width = rank_width + 1 + score_width + separator.len() * 2 + judges.len();
            let name = if let Some(width) = term_width {
                if width > fixed_width + 10 {
                    truncate_name(&ranked.entry, width - fixed_width)
                } else {
                    // Very narrow terminal, show truncated
                    truncate_name(&ranked.entry, 20)
                }
            } else {
                // No terminal (pipe), don't truncate
                ranked.entry.clone()
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}",
                    rank_str.dimmed(),
                    score_padded.bold(),
                    separator,
                    name,
                    separator,
                    judges.dimmed()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    rank_str, score_padded, separator, name, separator, judges
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a ranking as tab-separated values for scripting
/// Columns: rank, score, entry, judges (no headers, no colors)
pub fn format_tsv(entries: &[RankedEntry]) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(idx, ranked)| {
            format!(
                "{}\t{:.6}\t{}\t{}",
                idx + 1,
                ranked.score,
                ranked.entry,
                ranked.judges()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a ranking as a pretty-printed JSON array
pub fn format_json(entries: &[RankedEntry]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(entries)
}

/// Format one entry with the score each judge gave it (for `explain`)
pub fn format_breakdown(ranked: &RankedEntry, rank: usize, use_colors: bool) -> String {
    let mut lines = Vec::with_capacity(ranked.contributions.len() + 2);
    if use_colors {
        lines.push(format!("{}", ranked.entry.bold()));
        lines.push(format!(
            "  Rank: {}  Score: {}  ({})",
            rank,
            format_score(ranked.score).bold(),
            judge_count(ranked.judges())
        ));
    } else {
        lines.push(ranked.entry.clone());
        lines.push(format!(
            "  Rank: {}  Score: {}  ({})",
            rank,
            format_score(ranked.score),
            judge_count(ranked.judges())
        ));
    }

    let judge_width = ranked
        .contributions
        .iter()
        .map(|c| c.judge.chars().count())
        .max()
        .unwrap_or(0);
    for contribution in &ranked.contributions {
        let judge = format!("{:<width$}", contribution.judge, width = judge_width);
        let score = format_score(contribution.score);
        if use_colors {
            let score = if contribution.score < 0.0 {
                score.red().to_string()
            } else {
                score.green().to_string()
            };
            lines.push(format!("    {}  {}", judge.cyan(), score));
        } else {
            lines.push(format!("    {}  {}", judge, score));
        }
    }

    lines.join("\n")
}
