// self
use crate::{
	obs::{OperationKind, OperationOutcome},
	task::TaskUid,
};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_operation_outcome(kind: OperationKind, outcome: OperationOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"meilisearch_client_operation_total",
			"operation" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records one fetch issued by the task poller.
pub fn record_task_poll(task_uid: TaskUid, attempt: u32) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("meilisearch_client_task_poll_total").increment(1);
	}
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(task_uid = task_uid.get(), attempt, "Polled task status.");
	}

	#[cfg(not(feature = "tracing"))]
	{
		let _ = (task_uid, attempt);
	}
}
