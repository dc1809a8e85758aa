//! Rendering of search results for the terminal
use crate::error::Result;
use crate::results::{MatchKind, SearchMatch, SearchReport};
use byte_unit::{Byte, UnitType};
use colored::*;
use std::collections::BTreeMap;

/// Matches grouped per file with highlighted spans and numbered context
pub fn render_text(matches: &[SearchMatch]) -> String {
    let mut output = Vec::new();
    let mut current_file: Option<&str> = None;

    for m in matches {
        if current_file != Some(m.file_path.as_str()) {
            output.push(format!("\n{} {}:", "File".green().bold(), m.file_path));
            current_file = Some(m.file_path.as_str());
        } else if !m.context_before.is_empty() || !m.context_after.is_empty() {
            output.push("-".repeat(80).dimmed().to_string());
        }

        let first_before = m.line_number.saturating_sub(m.context_before.len());
        for (i, line) in m.context_before.iter().enumerate() {
            output.push(format!(
                "  {} │ {}",
                (first_before + i).to_string().dimmed(),
                line.dimmed()
            ));
        }

        let (before, matched, after) = m.split_line();
        output.push(format!(
            "→ {} │ {}{}{}",
            location(m).yellow().bold(),
            before,
            matched.yellow().bold(),
            after
        ));

        for (i, line) in m.context_after.iter().enumerate() {
            output.push(format!(
                "  {} │ {}",
                (m.line_number + 1 + i).to_string().dimmed(),
                line.dimmed()
            ));
        }
    }

    output.join("\n")
}

pub fn render_json(report: &SearchReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn render_stats(report: &SearchReport) -> String {
    let stats = &report.stats;
    let scanned = Byte::from_u64(stats.bytes_scanned).get_appropriate_unit(UnitType::Binary);
    let per_file = matches_per_file(&report.matches);

    let mut lines = vec![
        format!("\n{}", "Summary:".green().bold()),
        format!("{}: {}", "Matches".cyan(), report.matches.len()),
        format!("{}: {}", "Files with matches".cyan(), per_file.len()),
        format!("{}: {}", "Files scanned".cyan(), stats.files_scanned),
        format!("{}: {}", "Files skipped".cyan(), stats.files_skipped),
        format!("{}: {}", "Directories skipped".cyan(), stats.dirs_skipped),
        format!("{}: {}", "Extraction failures".cyan(), stats.extractor_failures),
        format!(
            "{}: {:.2} {}",
            "Scanned".cyan(),
            scanned.get_value(),
            scanned.get_unit()
        ),
        format!("{}: {:.2?}", "Elapsed".cyan(), stats.duration),
    ];
    if report.limit_reached {
        lines.push("Result limit reached".yellow().to_string());
    }
    if report.cancelled {
        lines.push("Search cancelled".yellow().to_string());
    }
    lines.join("\n")
}

fn location(m: &SearchMatch) -> String {
    match m.kind {
        MatchKind::ByteOffset => format!("0x{:08X}", m.line_number),
        MatchKind::TextLine | MatchKind::MetadataEntry => m.line_number.to_string(),
    }
}

fn matches_per_file(matches: &[SearchMatch]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for m in matches {
        *counts.entry(m.file_path.as_str()).or_insert(0) += 1;
    }
    counts
}
