//! Metrics and Telemetry
//!
//! Process-wide counters, timers, and gauges keyed by name plus an optional
//! tag set. Built once at startup, shared through an `Arc`, and cleared only
//! by an explicit administrative call. Timer series grow without bound;
//! summaries are computed on demand.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use serde::Serialize;

/// Optional tag set attached to a metric; ordered so keys canonicalize
pub type Tags = BTreeMap<String, String>;

/// Raw metric value
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Metric {
    Counter(f64),
    Timer(Vec<f64>),
    Gauge(f64),
}

/// Summary of a timer series
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimerSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub p95: f64,
    pub p99: f64,
}

/// Summarized metric value
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricSummary {
    Value(f64),
    Timer(TimerSummary),
}

/// Metrics collector
#[derive(Default)]
pub struct MetricsService {
    metrics: RwLock<HashMap<String, Metric>>,
}

impl MetricsService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment a counter, creating it at `value` if absent
    pub fn increment_counter(&self, name: &str, value: f64, tags: Option<&Tags>) {
        let key = Self::metric_key(name, tags);
        let mut metrics = self.metrics.write();
        match metrics.get_mut(&key) {
            Some(Metric::Counter(current)) => *current += value,
            _ => {
                metrics.insert(key, Metric::Counter(value));
            }
        }
        tracing::debug!(metric = name, value, "counter incremented");
    }

    /// Append a duration sample (milliseconds) to a timer series
    pub fn record_timer(&self, name: &str, duration_ms: f64, tags: Option<&Tags>) {
        let key = Self::metric_key(name, tags);
        let mut metrics = self.metrics.write();
        match metrics.get_mut(&key) {
            Some(Metric::Timer(samples)) => samples.push(duration_ms),
            _ => {
                metrics.insert(key, Metric::Timer(vec![duration_ms]));
            }
        }
        tracing::debug!(metric = name, duration_ms, "timer recorded");
    }

    /// Set a gauge; last write wins
    pub fn set_gauge(&self, name: &str, value: f64, tags: Option<&Tags>) {
        let key = Self::metric_key(name, tags);
        self.metrics.write().insert(key, Metric::Gauge(value));
        tracing::debug!(metric = name, value, "gauge set");
    }

    /// Get a single metric by name and tags
    pub fn get(&self, name: &str, tags: Option<&Tags>) -> Option<Metric> {
        self.metrics
            .read()
            .get(&Self::metric_key(name, tags))
            .cloned()
    }

    /// Snapshot of every raw metric value
    pub fn snapshot(&self) -> HashMap<String, Metric> {
        self.metrics.read().clone()
    }

    /// Snapshot with timer series reduced to summaries
    pub fn summary(&self) -> HashMap<String, MetricSummary> {
        self.metrics
            .read()
            .iter()
            .map(|(key, metric)| {
                let summary = match metric {
                    Metric::Counter(v) | Metric::Gauge(v) => MetricSummary::Value(*v),
                    Metric::Timer(samples) => MetricSummary::Timer(Self::summarize(samples)),
                };
                (key.clone(), summary)
            })
            .collect()
    }

    /// Drop every metric; administrative reset
    pub fn clear(&self) {
        self.metrics.write().clear();
        tracing::debug!("all metrics cleared");
    }

    fn summarize(samples: &[f64]) -> TimerSummary {
        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let count = sorted.len();
        let min = sorted.first().copied().unwrap_or(0.0);
        let max = sorted.last().copied().unwrap_or(0.0);
        let sum: f64 = sorted.iter().sum();
        let avg = if count > 0 { sum / count as f64 } else { 0.0 };

        TimerSummary {
            count,
            min,
            max,
            avg,
            p95: Self::percentile(&sorted, 0.95),
            p99: Self::percentile(&sorted, 0.99),
        }
    }

    /// Nearest-rank percentile over an already-sorted slice
    fn percentile(sorted: &[f64], p: f64) -> f64 {
        if sorted.is_empty() {
            return 0.0;
        }
        let rank = (sorted.len() as f64 * p).ceil() as usize;
        sorted[rank.saturating_sub(1).min(sorted.len() - 1)]
    }

    /// Canonical key: `name` or `name{k=v,...}` with tags sorted by key
    fn metric_key(name: &str, tags: Option<&Tags>) -> String {
        match tags {
            None => name.to_string(),
            Some(tags) if tags.is_empty() => name.to_string(),
            Some(tags) => {
                let pairs: Vec<String> =
                    tags.iter().map(|(k, v)| format!("{k}={v}")).collect();
                format!("{name}{{{}}}", pairs.join(","))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_counter_accumulates() {
        let metrics = MetricsService::new();
        metrics.increment_counter("requests", 1.0, None);
        metrics.increment_counter("requests", 2.0, None);

        assert_eq!(metrics.get("requests", None), Some(Metric::Counter(3.0)));
    }

    #[test]
    fn test_tagged_counters_are_independent() {
        let metrics = MetricsService::new();
        let pix = tags(&[("method", "pix")]);
        let slip = tags(&[("method", "bank_slip")]);

        metrics.increment_counter("charges", 1.0, Some(&pix));
        metrics.increment_counter("charges", 1.0, Some(&slip));
        metrics.increment_counter("charges", 1.0, Some(&pix));

        assert_eq!(
            metrics.get("charges", Some(&pix)),
            Some(Metric::Counter(2.0))
        );
        assert_eq!(
            metrics.get("charges", Some(&slip)),
            Some(Metric::Counter(1.0))
        );
    }

    #[test]
    fn test_metric_key_sorts_tags() {
        let a = tags(&[("b", "2"), ("a", "1")]);
        assert_eq!(
            MetricsService::metric_key("latency", Some(&a)),
            "latency{a=1,b=2}"
        );
        assert_eq!(MetricsService::metric_key("latency", None), "latency");
    }

    #[test]
    fn test_gauge_last_write_wins() {
        let metrics = MetricsService::new();
        metrics.set_gauge("queue_depth", 10.0, None);
        metrics.set_gauge("queue_depth", 4.0, None);

        assert_eq!(metrics.get("queue_depth", None), Some(Metric::Gauge(4.0)));
    }

    #[test]
    fn test_timer_summary() {
        let metrics = MetricsService::new();
        for sample in [10.0, 20.0, 30.0] {
            metrics.record_timer("db_call", sample, None);
        }

        let summary = metrics.summary();
        match summary.get("db_call").unwrap() {
            MetricSummary::Timer(timer) => {
                assert_eq!(timer.count, 3);
                assert_eq!(timer.min, 10.0);
                assert_eq!(timer.max, 30.0);
                assert_eq!(timer.avg, 20.0);
                assert_eq!(timer.p95, 30.0);
                assert_eq!(timer.p99, 30.0);
            }
            other => panic!("expected timer summary, got {other:?}"),
        }
    }

    #[test]
    fn test_summary_passes_scalars_through() {
        let metrics = MetricsService::new();
        metrics.increment_counter("requests", 5.0, None);
        metrics.set_gauge("queue_depth", 2.0, None);

        let summary = metrics.summary();
        assert_eq!(
            summary.get("requests"),
            Some(&MetricSummary::Value(5.0))
        );
        assert_eq!(
            summary.get("queue_depth"),
            Some(&MetricSummary::Value(2.0))
        );
    }

    #[test]
    fn test_clear() {
        let metrics = MetricsService::new();
        metrics.increment_counter("requests", 1.0, None);
        metrics.clear();

        assert!(metrics.snapshot().is_empty());
    }

    #[test]
    fn test_percentile_single_sample() {
        let metrics = MetricsService::new();
        metrics.record_timer("one", 42.0, None);

        match metrics.summary().get("one").unwrap() {
            MetricSummary::Timer(timer) => {
                assert_eq!(timer.p95, 42.0);
                assert_eq!(timer.p99, 42.0);
            }
            other => panic!("expected timer summary, got {other:?}"),
        }
    }
}
