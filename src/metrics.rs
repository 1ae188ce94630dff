//! Session counters for the prediction form.

use crate::types::prediction::ChurnLabel;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// In-process counters, dropped when the session ends
pub struct SessionMetrics {
    /// Successful predictions
    pub predictions: AtomicU64,
    /// Predictions labeled churn
    pub churn_predictions: AtomicU64,
    /// Submissions rejected at the form boundary
    pub rejected_inputs: AtomicU64,
    /// Submissions that failed in or before the model
    pub failures: AtomicU64,
    /// Inference latencies (in microseconds)
    latencies: RwLock<Vec<u64>>,
    start_time: Instant,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self {
            predictions: AtomicU64::new(0),
            churn_predictions: AtomicU64::new(0),
            rejected_inputs: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            latencies: RwLock::new(Vec::new()),
            start_time: Instant::now(),
        }
    }

    pub fn record_prediction(&self, label: ChurnLabel, latency: Duration) {
        self.predictions.fetch_add(1, Ordering::Relaxed);
        if label.is_churn() {
            self.churn_predictions.fetch_add(1, Ordering::Relaxed);
        }

        if let Ok(mut latencies) = self.latencies.write() {
            latencies.push(latency.as_micros() as u64);
        }
    }

    pub fn record_rejected(&self) {
        self.rejected_inputs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Latency statistics over every recorded prediction
    pub fn latency_stats(&self) -> LatencyStats {
        let mut sorted = match self.latencies.read() {
            Ok(latencies) => latencies.clone(),
            Err(_) => return LatencyStats::default(),
        };
        if sorted.is_empty() {
            return LatencyStats::default();
        }
        sorted.sort_unstable();

        let count = sorted.len();
        let sum: u64 = sorted.iter().sum();

        LatencyStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            max_us: sorted[count - 1],
        }
    }

    /// Log a one-block summary of the session
    pub fn log_summary(&self) {
        let predictions = self.predictions.load(Ordering::Relaxed);
        let churn = self.churn_predictions.load(Ordering::Relaxed);
        let latency = self.latency_stats();

        info!(
            predictions,
            churn_predictions = churn,
            rejected_inputs = self.rejected_inputs.load(Ordering::Relaxed),
            failures = self.failures.load(Ordering::Relaxed),
            mean_latency_us = latency.mean_us,
            p50_latency_us = latency.p50_us,
            max_latency_us = latency.max_us,
            session_secs = self.start_time.elapsed().as_secs(),
            "Session summary"
        );
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Inference latency statistics
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LatencyStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub max_us: u64,
}
