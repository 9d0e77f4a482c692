//! Prometheus metrics for cloudapi clients.
//!
//! Every provider call records a request counter and a duration histogram
//! through the `metrics` facade. Nothing is exported unless a recorder is
//! installed with [`init_metrics`]; the CLI does that when
//! `observability.metrics` is set.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;

// -- Metric name constants ----------------------------------------------------

/// Total API calls (counter). Labels: provider, action, status.
pub const REQUESTS_TOTAL: &str = "cloudapi_requests_total";

/// API call duration in seconds, retries included (histogram). Labels:
/// provider, action.
pub const REQUEST_DURATION_SECONDS: &str = "cloudapi_request_duration_seconds";

/// Total retried attempts (counter). Labels: provider, action.
pub const RETRIES_TOTAL: &str = "cloudapi_retries_total";

// -- Global recorder installation ---------------------------------------------

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global Prometheus recorder. Idempotent.
pub fn init_metrics() -> &'static PrometheusHandle {
    PROMETHEUS_HANDLE.get_or_init(|| {
        PrometheusBuilder::new()
            .install_recorder()
            .expect("failed to install Prometheus recorder")
    })
}

/// Register metric descriptions. Call once after `init_metrics()`.
pub fn describe_metrics() {
    describe_counter!(REQUESTS_TOTAL, "Total cloud API calls");
    describe_histogram!(
        REQUEST_DURATION_SECONDS,
        "Cloud API call duration in seconds"
    );
    describe_counter!(RETRIES_TOTAL, "Total retried cloud API attempts");
}

/// Prometheus exposition text, or `None` when no recorder is installed.
pub fn render() -> Option<String> {
    PROMETHEUS_HANDLE.get().map(PrometheusHandle::render)
}

// -- Recording ----------------------------------------------------------------

/// Record one finished call. `status` is the HTTP status, or `None` when no
/// response arrived.
pub fn record_request(provider: &'static str, action: &str, status: Option<u16>, elapsed: Duration) {
    counter!(
        REQUESTS_TOTAL,
        "provider" => provider,
        "action" => action.to_string(),
        "status" => status_label(status)
    )
    .increment(1);
    histogram!(
        REQUEST_DURATION_SECONDS,
        "provider" => provider,
        "action" => action.to_string()
    )
    .record(elapsed.as_secs_f64());
}

/// Record an attempt that will be retried.
pub fn record_retry(provider: &'static str, action: &str) {
    counter!(RETRIES_TOTAL, "provider" => provider, "action" => action.to_string()).increment(1);
}

fn status_label(status: Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "error".to_string(),
    }
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_label() {
        assert_eq!(status_label(Some(200)), "200");
        assert_eq!(status_label(Some(503)), "503");
        assert_eq!(status_label(None), "error");
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_request("ec2", "DescribeImages", Some(200), Duration::from_millis(5));
        record_retry("ec2", "DescribeImages");
    }

    #[test]
    fn test_render_after_init() {
        init_metrics();
        describe_metrics();
        record_request("glesys", "server/list", Some(200), Duration::from_millis(1));
        let text = render().unwrap();
        assert!(text.contains(REQUESTS_TOTAL));
    }
}
