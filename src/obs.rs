//! Optional observability helpers for the request pipelines.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `tripjournal_client.pipeline` with the
//!   `kind` and `stage` fields, plus `warn` events when a refresh fails.
//! - Enable `metrics` to increment the `tripjournal_client_pipeline_total` counter for every
//!   attempt/success/failure/queued outcome, labeled by `kind` + `outcome`, and to publish the
//!   refresh queue depth on the `tripjournal_client_refresh_queue_depth` gauge.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Pipeline stages observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PipelineKind {
	/// A caller-issued request.
	Request,
	/// A request reissued with a refreshed credential.
	Replay,
	/// A refresh transport call.
	Refresh,
}
impl PipelineKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			PipelineKind::Request => "request",
			PipelineKind::Replay => "replay",
			PipelineKind::Refresh => "refresh",
		}
	}
}
impl Display for PipelineKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PipelineOutcome {
	/// Entry to a stage.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
	/// Request parked behind an in-flight refresh.
	Queued,
}
impl PipelineOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			PipelineOutcome::Attempt => "attempt",
			PipelineOutcome::Success => "success",
			PipelineOutcome::Failure => "failure",
			PipelineOutcome::Queued => "queued",
		}
	}
}
impl Display for PipelineOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
