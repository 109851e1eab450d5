//! Text report over a set of section statistics

use std::collections::HashMap;
use super::format::{count, fixed, grouped, or_placeholder};
use super::stats::SectionStats;

const NAME_COLUMN_WIDTH: usize = 20;
const NO_SAMPLES: &str = "no samples";
const UNDEFINED: &str = "-";

/// Renders one line per section, heaviest total time first.
///
/// Ties on total time are broken by name so output is deterministic.
/// Percentages are only shown when `enclosing_section` names a section with
/// recorded time.
pub fn render_report(
    sections: &HashMap<String, SectionStats>,
    enclosing_section: Option<&str>,
    include_batch_rates: bool,
) -> String {
    let enclosing_nanos = enclosing_section
        .and_then(|name| sections.get(name))
        .map(|s| s.total_time_nanos)
        .unwrap_or(0);

    let mut sorted: Vec<&SectionStats> = sections.values().collect();
    sorted.sort_by(|a, b| {
        b.total_time_nanos
            .cmp(&a.total_time_nanos)
            .then_with(|| a.name.cmp(&b.name))
    });

    sorted
        .into_iter()
        .map(|s| format_line(s, enclosing_nanos, include_batch_rates))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Formats a single section. `enclosing_nanos` of 0 omits the percentage.
pub fn format_line(stats: &SectionStats, enclosing_nanos: u64, include_batch_rates: bool) -> String {
    let indent = " ".repeat(stats.nesting);
    let name_width = NAME_COLUMN_WIDTH.saturating_sub(stats.nesting);

    let mut took = format!("{} s", fixed(stats.total_secs(), 9, 2));
    if let Some(percent) = stats.percent_of(enclosing_nanos) {
        took.push_str(&format!(" ({}%)", fixed(percent, 6, 2)));
    }

    let mut line = format!(
        "{}{:<name_width$}: took {}, {} samples, ",
        indent,
        stats.name,
        took,
        count(stats.sample_count, 12),
        name_width = name_width,
    );

    if stats.sample_count == 0 {
        line.push_str(NO_SAMPLES);
        return line;
    }

    let mut ms_per_k = or_placeholder(stats.ms_per_thousand(), 9, UNDEFINED, |v, w| fixed(v, w, 2));
    let mut hz = or_placeholder(stats.rate_hz(), 13, UNDEFINED, |v, w| grouped(v, w, 2));
    if include_batch_rates {
        let batch_ms = or_placeholder(stats.batch_ms_per_thousand(), 9, UNDEFINED, |v, w| fixed(v, w, 2));
        let batch_hz = or_placeholder(stats.batch_rate_hz(), 13, UNDEFINED, |v, w| grouped(v, w, 2));
        ms_per_k.push_str(&format!(" ({})", batch_ms));
        hz.push_str(&format!(" ({})", batch_hz));
    }

    line.push_str(&format!("{} ms / 1000 samples, {} hz", ms_per_k, hz));
    line
}
