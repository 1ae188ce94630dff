//! Text rendering of the dashboard charts

use super::stats::{BoxSummary, StackedHistogram};
use crate::dataset::{ByChurn, ChurnCounts};
use std::fmt::{self, Write};

pub const RETAINED_LABEL: &str = "No Churn";
pub const CHURNED_LABEL: &str = "Churn";

const RETAINED_BAR: &str = "█";
const CHURNED_BAR: &str = "▒";

/// Bar length for `value` when `max` fills `width` characters
fn bar_len(value: f64, max: f64, width: usize) -> usize {
    if max <= 0.0 || value <= 0.0 {
        return 0;
    }
    ((value / max) * width as f64).round() as usize
}

fn bar(glyph: &str, value: f64, max: f64, width: usize) -> String {
    glyph.repeat(bar_len(value, max, width).min(width))
}

fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

pub fn write_churn_share<W: Write>(out: &mut W, counts: &ChurnCounts, width: usize) -> fmt::Result {
    let total = counts.total();
    writeln!(out, "Churn share ({} customers)", total)?;
    for (label, glyph, count) in [
        (RETAINED_LABEL, RETAINED_BAR, counts.retained),
        (CHURNED_LABEL, CHURNED_BAR, counts.churned),
    ] {
        let share = percent(count, total);
        writeln!(
            out,
            "  {:<9} {:>7} {:>6.1}%  {}",
            label,
            count,
            share,
            bar(glyph, share, 100.0, width)
        )?;
    }
    Ok(())
}

/// Box plot of one column for both classes on a shared axis
pub fn write_box_plot<W: Write>(
    out: &mut W,
    title: &str,
    summaries: &ByChurn<Option<BoxSummary>>,
    width: usize,
) -> fmt::Result {
    writeln!(out, "{}", title)?;

    let present: Vec<&BoxSummary> = [&summaries.retained, &summaries.churned]
        .into_iter()
        .flatten()
        .collect();
    if present.is_empty() {
        return writeln!(out, "  (no data)");
    }
    let lo = present.iter().map(|s| s.min).fold(f64::INFINITY, f64::min);
    let hi = present.iter().map(|s| s.max).fold(f64::NEG_INFINITY, f64::max);

    for (label, summary) in [
        (RETAINED_LABEL, &summaries.retained),
        (CHURNED_LABEL, &summaries.churned),
    ] {
        match summary {
            Some(s) => {
                writeln!(
                    out,
                    "  {:<9} n={:<6} min {:.2}  q1 {:.2}  median {:.2}  q3 {:.2}  max {:.2}",
                    label, s.count, s.min, s.q1, s.median, s.q3, s.max
                )?;
                writeln!(out, "  {:<9} {}", "", box_line(s, lo, hi, width))?;
            }
            None => writeln!(out, "  {:<9} (no data)", label)?,
        }
    }
    Ok(())
}

/// Draw `├──[██┃██]──┤` scaled to the `[lo, hi]` axis
fn box_line(s: &BoxSummary, lo: f64, hi: f64, width: usize) -> String {
    let width = width.max(2);
    let position = |v: f64| -> usize {
        if hi > lo {
            (((v - lo) / (hi - lo)) * (width - 1) as f64).round() as usize
        } else {
            0
        }
    };

    let mut cells = vec![' '; width];
    for cell in &mut cells[position(s.min)..=position(s.max)] {
        *cell = '─';
    }
    for cell in &mut cells[position(s.q1)..=position(s.q3)] {
        *cell = '█';
    }
    cells[position(s.min)] = '├';
    cells[position(s.max)] = '┤';
    cells[position(s.median)] = '┃';

    cells.into_iter().collect::<String>().trim_end().to_string()
}

pub fn write_histogram<W: Write>(
    out: &mut W,
    title: &str,
    histogram: Option<&StackedHistogram>,
    width: usize,
) -> fmt::Result {
    writeln!(
        out,
        "{} ({} {}, {} {})",
        title, RETAINED_BAR, RETAINED_LABEL, CHURNED_BAR, CHURNED_LABEL
    )?;

    let histogram = match histogram {
        Some(h) => h,
        None => return writeln!(out, "  (no data)"),
    };

    let max = histogram.max_total() as f64;
    for (i, counts) in histogram.counts.iter().enumerate() {
        let bars = format!(
            "{}{}",
            bar(RETAINED_BAR, counts.retained as f64, max, width),
            bar(CHURNED_BAR, counts.churned as f64, max, width)
        );
        writeln!(
            out,
            "  {:>8.2} - {:>8.2} │{:<w$} {:>6} / {:<6}",
            histogram.edges[i],
            histogram.edges[i + 1],
            bars,
            counts.retained,
            counts.churned,
            w = width
        )?;
    }
    Ok(())
}

/// Stacked bars per discrete value with the churn rate of each group
pub fn write_count_bars<W: Write>(
    out: &mut W,
    title: &str,
    unit: &str,
    rows: &[(u32, ByChurn<u64>)],
    width: usize,
) -> fmt::Result {
    writeln!(
        out,
        "{} ({} {}, {} {})",
        title, RETAINED_BAR, RETAINED_LABEL, CHURNED_BAR, CHURNED_LABEL
    )?;
    if rows.is_empty() {
        return writeln!(out, "  (no data)");
    }

    let max = rows
        .iter()
        .map(|(_, c)| c.retained + c.churned)
        .max()
        .unwrap_or(0) as f64;

    for (value, counts) in rows {
        let total = counts.retained + counts.churned;
        let bars = format!(
            "{}{}",
            bar(RETAINED_BAR, counts.retained as f64, max, width),
            bar(CHURNED_BAR, counts.churned as f64, max, width)
        );
        writeln!(
            out,
            "  {:>3} {:<6} │{:<w$} {:>6} / {:<6} {:>5.1}% churn",
            value,
            unit,
            bars,
            counts.retained,
            counts.churned,
            percent(counts.churned, total),
            w = width
        )?;
    }
    Ok(())
}

/// Mean and median of a column per class, bars scaled by the mean
pub fn write_center_comparison<W: Write>(
    out: &mut W,
    title: &str,
    summaries: &ByChurn<Option<BoxSummary>>,
    width: usize,
) -> fmt::Result {
    writeln!(out, "{}", title)?;

    let max_mean = [&summaries.retained, &summaries.churned]
        .into_iter()
        .flatten()
        .map(|s| s.mean)
        .fold(0.0, f64::max);

    for (label, glyph, summary) in [
        (RETAINED_LABEL, RETAINED_BAR, &summaries.retained),
        (CHURNED_LABEL, CHURNED_BAR, &summaries.churned),
    ] {
        match summary {
            Some(s) => writeln!(
                out,
                "  {:<9} mean {:>7.1}  median {:>7.1}  {}",
                label,
                s.mean,
                s.median,
                bar(glyph, s.mean, max_mean, width)
            )?,
            None => writeln!(out, "  {:<9} (no data)", label)?,
        }
    }
    Ok(())
}
