// self
use crate::obs::{PipelineKind, PipelineOutcome};

/// Counter incremented once per [`PipelineOutcome`], labeled `kind` and `outcome`.
pub const PIPELINE_COUNTER: &str = "tripjournal_client_pipeline_total";
/// Gauge holding the number of requests parked behind the in-flight refresh.
pub const REFRESH_QUEUE_GAUGE: &str = "tripjournal_client_refresh_queue_depth";

/// Counts a pipeline outcome; a no-op without the `metrics` feature.
pub fn record_pipeline_outcome(kind: PipelineKind, outcome: PipelineOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(PIPELINE_COUNTER, "kind" => kind.as_str(), "outcome" => outcome.as_str())
		.increment(1);
	#[cfg(not(feature = "metrics"))]
	let _ = (kind, outcome);
}

/// Publishes the refresh queue depth; zero once the queue has been drained.
pub fn record_queue_depth(depth: usize) {
	#[cfg(feature = "metrics")]
	metrics::gauge!(REFRESH_QUEUE_GAUGE).set(depth as f64);
	#[cfg(not(feature = "metrics"))]
	let _ = depth;
}
