//! Descriptive churn charts over the static dataset.
//!
//! Every chart is computed over all rows of the dataset; nothing is filtered
//! or sampled.

pub mod render;
pub mod stats;

use crate::config::DashboardConfig;
use crate::dataset::{ByChurn, ChurnCounts, ChurnDataset};
use std::fmt;
use stats::{count_by_value, BoxSummary, StackedHistogram};

pub use render::{CHURNED_LABEL, RETAINED_LABEL};

/// All dashboard charts, computed once from the dataset
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub churn_counts: ChurnCounts,
    pub data_usage: ByChurn<Option<BoxSummary>>,
    pub monthly_charge: Option<StackedHistogram>,
    pub service_calls: Vec<(u32, ByChurn<u64>)>,
    pub account_weeks: ByChurn<Option<BoxSummary>>,
    bar_width: usize,
}

fn summarize(split: &ByChurn<Vec<f64>>) -> ByChurn<Option<BoxSummary>> {
    ByChurn {
        retained: BoxSummary::from_values(&split.retained),
        churned: BoxSummary::from_values(&split.churned),
    }
}

impl Dashboard {
    pub fn build(dataset: &ChurnDataset, config: &DashboardConfig) -> Self {
        let monthly_charge = StackedHistogram::build(
            &dataset.split_by_churn(|r| r.monthly_charge),
            config.histogram_bins,
        );
        let service_calls = count_by_value(
            dataset
                .records()
                .iter()
                .map(|r| (r.cust_serv_calls, r.churned())),
        );

        Self {
            churn_counts: dataset.churn_counts(),
            data_usage: summarize(&dataset.split_by_churn(|r| r.data_usage)),
            monthly_charge,
            service_calls,
            account_weeks: summarize(&dataset.split_by_churn(|r| r.account_weeks as f64)),
            bar_width: config.bar_width,
        }
    }
}

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.bar_width;

        render::write_churn_share(f, &self.churn_counts, width)?;
        writeln!(f)?;
        render::write_box_plot(f, "Data usage by churn (GB)", &self.data_usage, width)?;
        writeln!(f)?;
        render::write_histogram(
            f,
            "Monthly charge by churn",
            self.monthly_charge.as_ref(),
            width,
        )?;
        writeln!(f)?;
        render::write_count_bars(
            f,
            "Customer service calls by churn",
            "calls",
            &self.service_calls,
            width,
        )?;
        writeln!(f)?;
        render::write_center_comparison(
            f,
            "Account weeks by churn",
            &self.account_weeks,
            width,
        )
    }
}
