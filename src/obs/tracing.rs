// self
use crate::{_prelude::*, obs::PipelineKind};

/// Future returned by [`PipelineSpan::instrument`].
#[cfg(feature = "tracing")]
pub type Instrumented<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`PipelineSpan::instrument`]; the input future itself without `tracing`.
#[cfg(not(feature = "tracing"))]
pub type Instrumented<F> = F;

/// Span covering one pass through a pipeline stage.
///
/// Without the `tracing` feature only the labels are kept, so `Debug` output stays useful.
#[derive(Clone, Debug)]
pub struct PipelineSpan {
	kind: PipelineKind,
	stage: &'static str,
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl PipelineSpan {
	/// Opens a span labeled with `kind` and `stage`.
	pub fn new(kind: PipelineKind, stage: &'static str) -> Self {
		Self {
			kind,
			stage,
			#[cfg(feature = "tracing")]
			span: tracing::info_span!("tripjournal_client.pipeline", kind = kind.as_str(), stage),
		}
	}

	/// Pipeline this span belongs to.
	pub fn kind(&self) -> PipelineKind {
		self.kind
	}

	/// Call site label.
	pub fn stage(&self) -> &'static str {
		self.stage
	}

	/// Attaches the span to `fut`; the span is entered on every poll, never held across one.
	pub fn instrument<Fut>(&self, fut: Fut) -> Instrumented<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			tracing::Instrument::instrument(fut, self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Logs a request parking behind the in-flight refresh, with the queue depth it joined at.
pub fn queued_event(depth: usize) {
	#[cfg(feature = "tracing")]
	tracing::debug!(depth, "request parked until the credential refresh settles");
	#[cfg(not(feature = "tracing"))]
	let _ = depth;
}

/// Logs a failure the pipeline absorbed, such as a store that could not be cleared.
pub fn warn_event(stage: &'static str, error: &dyn StdError) {
	#[cfg(feature = "tracing")]
	tracing::warn!(stage, error = %error, "tripjournal_client.pipeline degraded");
	#[cfg(not(feature = "tracing"))]
	let _ = (stage, error);
}
