//! Descriptive statistics behind the dashboard charts

use crate::dataset::ByChurn;
use std::collections::BTreeMap;

/// Five-number summary plus mean, as drawn by a box plot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSummary {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
}

impl BoxSummary {
    /// Summarize `values`, ignoring NaNs. `None` when nothing is left.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(|a, b| a.total_cmp(b));

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;

        Some(Self {
            count,
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[count - 1],
            mean,
        })
    }
}

/// Linearly interpolated quantile of sorted, non-empty data
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Equal-width histogram with churned and retained counts stacked per bin
#[derive(Debug, Clone, PartialEq)]
pub struct StackedHistogram {
    /// `bins + 1` bin edges; the last bin includes its upper edge
    pub edges: Vec<f64>,
    pub counts: Vec<ByChurn<u64>>,
}

impl StackedHistogram {
    /// Bin both classes over their combined range.
    ///
    /// A constant column collapses to a single bin.
    pub fn build(values: &ByChurn<Vec<f64>>, bins: usize) -> Option<Self> {
        let all = values
            .retained
            .iter()
            .chain(values.churned.iter())
            .copied()
            .filter(|v| v.is_finite());

        let (min, max) = all.fold(None, |range: Option<(f64, f64)>, v| match range {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;

        let bins = if max > min { bins.max(1) } else { 1 };
        let width = (max - min) / bins as f64;
        let edges = (0..=bins)
            .map(|i| if i == bins { max } else { min + width * i as f64 })
            .collect();

        let mut counts = vec![ByChurn::<u64>::default(); bins];
        let bin_of = |v: f64| -> usize {
            if width > 0.0 {
                (((v - min) / width).floor() as usize).min(bins - 1)
            } else {
                0
            }
        };

        for &v in values.retained.iter().filter(|v| v.is_finite()) {
            counts[bin_of(v)].retained += 1;
        }
        for &v in values.churned.iter().filter(|v| v.is_finite()) {
            counts[bin_of(v)].churned += 1;
        }

        Some(Self { edges, counts })
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Largest stacked bin height
    pub fn max_total(&self) -> u64 {
        self.counts
            .iter()
            .map(|c| c.retained + c.churned)
            .max()
            .unwrap_or(0)
    }
}

/// Per-value counts of a discrete column, split by churn, in ascending value order
pub fn count_by_value<I>(values: I) -> Vec<(u32, ByChurn<u64>)>
where
    I: IntoIterator<Item = (u32, bool)>,
{
    let mut table: BTreeMap<u32, ByChurn<u64>> = BTreeMap::new();
    for (value, churned) in values {
        let entry = table.entry(value).or_default();
        if churned {
            entry.churned += 1;
        } else {
            entry.retained += 1;
        }
    }
    table.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_summary_quartiles() {
        let summary = BoxSummary::from_values(&[4.0, 1.0, 3.0, 2.0, 5.0]).unwrap();
        assert_eq!(summary.count, 5);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.q1, 2.0);
        assert_eq!(summary.median, 3.0);
        assert_eq!(summary.q3, 4.0);
        assert_eq!(summary.max, 5.0);
        assert_eq!(summary.mean, 3.0);
    }

    #[test]
    fn test_box_summary_interpolates() {
        let summary = BoxSummary::from_values(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!((summary.q1 - 1.75).abs() < 1e-12);
        assert!((summary.median - 2.5).abs() < 1e-12);
        assert!((summary.q3 - 3.25).abs() < 1e-12);
    }

    #[test]
    fn test_box_summary_empty() {
        assert_eq!(BoxSummary::from_values(&[]), None);
        assert_eq!(BoxSummary::from_values(&[f64::NAN]), None);
    }

    #[test]
    fn test_histogram_stacks_classes() {
        let values = ByChurn {
            retained: vec![0.0, 1.0, 2.0, 9.0],
            churned: vec![10.0, 5.0],
        };
        let hist = StackedHistogram::build(&values, 2).unwrap();

        assert_eq!(hist.edges, vec![0.0, 5.0, 10.0]);
        assert_eq!(hist.counts[0], ByChurn { retained: 3, churned: 0 });
        assert_eq!(hist.counts[1], ByChurn { retained: 1, churned: 2 });
        assert_eq!(hist.max_total(), 3);
    }

    #[test]
    fn test_histogram_counts_every_value() {
        let values = ByChurn {
            retained: (0..100).map(|v| v as f64 * 1.37).collect(),
            churned: (0..40).map(|v| v as f64 * 2.11).collect(),
        };
        let hist = StackedHistogram::build(&values, 7).unwrap();

        let retained: u64 = hist.counts.iter().map(|c| c.retained).sum();
        let churned: u64 = hist.counts.iter().map(|c| c.churned).sum();
        assert_eq!(retained, 100);
        assert_eq!(churned, 40);
        assert_eq!(hist.bins(), 7);
    }

    #[test]
    fn test_histogram_constant_column() {
        let values = ByChurn {
            retained: vec![3.0, 3.0],
            churned: vec![3.0],
        };
        let hist = StackedHistogram::build(&values, 10).unwrap();
        assert_eq!(hist.bins(), 1);
        assert_eq!(hist.counts[0], ByChurn { retained: 2, churned: 1 });
    }

    #[test]
    fn test_histogram_without_values() {
        let values = ByChurn::<Vec<f64>>::default();
        assert_eq!(StackedHistogram::build(&values, 10), None);
    }

    #[test]
    fn test_count_by_value() {
        let rows = count_by_value(vec![(1, false), (0, false), (1, true), (4, true), (1, false)]);
        assert_eq!(
            rows,
            vec![
                (0, ByChurn { retained: 1, churned: 0 }),
                (1, ByChurn { retained: 2, churned: 1 }),
                (4, ByChurn { retained: 0, churned: 1 }),
            ]
        );
    }
}
