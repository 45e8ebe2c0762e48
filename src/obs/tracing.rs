//! `meilisearch.operation` spans around client calls, task waits, and tenant-token signing.

// self
use crate::{_prelude::*, obs::OperationKind, task::TaskUid};

/// Future returned by [`OperationSpan::instrument`].
#[cfg(feature = "tracing")]
pub type Traced<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`OperationSpan::instrument`]; the input future itself without `tracing`.
#[cfg(not(feature = "tracing"))]
pub type Traced<F> = F;

/// Span for one client operation.
///
/// Carries the `operation` label, the public method that started it as `stage`, and the
/// `task_uid` it targets once [`OperationSpan::with_task`] records one. Without the `tracing`
/// feature the span is zero-sized and every method is a no-op.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Opens a span for `kind` started from `stage`.
	pub fn new(kind: OperationKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"meilisearch.operation",
				operation = kind.as_str(),
				stage,
				task_uid = tracing::field::Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Records the task fetched or awaited by this operation.
	pub fn with_task(self, task_uid: TaskUid) -> Self {
		#[cfg(feature = "tracing")]
		{
			self.span.record("task_uid", task_uid.get());
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = task_uid;
		}

		self
	}

	/// Enters the span for a synchronous section such as token signing.
	pub fn entered(self) -> EnteredOperation {
		#[cfg(feature = "tracing")]
		{
			EnteredOperation { _entered: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			EnteredOperation {}
		}
	}

	/// Attaches the span to `fut` so every poll of a request or wait loop runs inside it.
	pub fn instrument<Fut>(&self, fut: Fut) -> Traced<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Entered [`OperationSpan`]; the span is exited on drop.
pub struct EnteredOperation {
	#[cfg(feature = "tracing")]
	_entered: tracing::span::EnteredSpan,
}
impl Debug for EnteredOperation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("EnteredOperation").finish_non_exhaustive()
	}
}
