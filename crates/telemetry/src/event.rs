//! Metric events and their reporter

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur while emitting a metric event
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// HTTP client construction failed
    #[error("failed to build telemetry client: {0}")]
    Client(String),

    /// Posting the event failed
    #[error("failed to post metric event: {0}")]
    Post(String),

    /// The collector returned a non-success status
    #[error("metric event rejected with status {0}")]
    Rejected(u16),
}

/// One named measurement inside a metric event
#[derive(Debug, Clone, Serialize)]
pub struct RunMetric {
    /// Metric name (e.g. "timeTakenSecs")
    pub metric: String,
    /// Metric value
    pub value: serde_json::Value,
}

impl RunMetric {
    /// A whole-number metric
    pub fn count(metric: impl Into<String>, value: i64) -> Self {
        Self {
            metric: metric.into(),
            value: value.into(),
        }
    }

    /// A string-valued metric
    pub fn text(metric: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            value: serde_json::Value::String(value.into()),
        }
    }
}

/// The envelope posted to the telemetry collector
#[derive(Debug, Clone, Serialize)]
pub struct MetricEvent {
    /// Reporting job (e.g. "Consumption Metrics")
    pub system: String,
    /// The measurements
    pub metrics: Vec<RunMetric>,
}

/// Posts metric events, or logs them when no collector is configured
pub struct TelemetryReporter {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl TelemetryReporter {
    /// Create a reporter
    ///
    /// With `endpoint = None` events are logged instead of posted.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be constructed.
    pub fn new(endpoint: Option<String>, timeout_secs: u64) -> Result<Self, TelemetryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| TelemetryError::Client(e.to_string()))?;
        Ok(Self { client, endpoint })
    }

    /// Emit one metric event
    pub async fn emit(&self, system: &str, metrics: Vec<RunMetric>) -> Result<(), TelemetryError> {
        let event = MetricEvent {
            system: system.to_string(),
            metrics,
        };

        let Some(endpoint) = &self.endpoint else {
            info!(system, event = %serde_json::to_string(&event).unwrap_or_default(),
                  "no telemetry endpoint, metric event logged");
            return Ok(());
        };

        let response = self
            .client
            .post(endpoint)
            .json(&event)
            .send()
            .await
            .map_err(|e| TelemetryError::Post(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TelemetryError::Rejected(response.status().as_u16()));
        }

        info!(system, metrics = event.metrics.len(), "metric event emitted");
        Ok(())
    }

    /// Emit, downgrading any failure to a warning
    ///
    /// The run's outputs are already persisted by the time telemetry
    /// fires; losing the event must not fail the run.
    pub async fn emit_best_effort(&self, system: &str, metrics: Vec<RunMetric>) {
        if let Err(err) = self.emit(system, metrics).await {
            warn!(system, error = %err, "metric event emission failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_constructors() {
        let count = RunMetric::count("timeTakenSecs", 42);
        assert_eq!(count.metric, "timeTakenSecs");
        assert_eq!(count.value, serde_json::json!(42));

        let text = RunMetric::text("date", "2024-03-15");
        assert_eq!(text.value, serde_json::json!("2024-03-15"));
    }

    #[test]
    fn test_event_serialization() {
        let event = MetricEvent {
            system: "Consumption Metrics".into(),
            metrics: vec![
                RunMetric::count("timeTakenSecs", 17),
                RunMetric::text("date", "2024-03-15"),
            ],
        };
        let body = serde_json::to_value(&event).unwrap();
        assert_eq!(body["system"], "Consumption Metrics");
        assert_eq!(body["metrics"][0]["metric"], "timeTakenSecs");
        assert_eq!(body["metrics"][0]["value"], 17);
        assert_eq!(body["metrics"][1]["value"], "2024-03-15");
    }

    #[tokio::test]
    async fn test_emit_without_endpoint_is_ok() {
        let reporter = TelemetryReporter::new(None, 5).unwrap();
        reporter
            .emit("Consumption Metrics", vec![RunMetric::count("timeTakenSecs", 1)])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_emit_best_effort_swallows_failures() {
        // unroutable endpoint: emit fails, best-effort does not panic
        let reporter =
            TelemetryReporter::new(Some("http://127.0.0.1:1/metrics".into()), 1).unwrap();
        reporter
            .emit_best_effort("Consumption Metrics", vec![])
            .await;
    }
}
