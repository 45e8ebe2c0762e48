//! Optional observability helpers for client operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `meilisearch.operation` with the
//!   `operation`, `stage` (call site), and `task_uid` (single-task calls and waits) fields, plus
//!   a debug event per task poll.
//! - Enable `metrics` to increment the `meilisearch_client_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`, and the
//!   `meilisearch_client_task_poll_total` counter for every fetch issued while waiting.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::{_prelude::*, task::TaskUid};

/// Client operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Single task lookup.
	GetTask,
	/// Task listing.
	ListTasks,
	/// Task cancelation request.
	CancelTasks,
	/// Task deletion request.
	DeleteTasks,
	/// Index swap request.
	SwapIndexes,
	/// Poll loop waiting for a task to conclude.
	WaitForTask,
	/// Local tenant-token signing.
	GenerateTenantToken,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::GetTask => "get_task",
			OperationKind::ListTasks => "list_tasks",
			OperationKind::CancelTasks => "cancel_tasks",
			OperationKind::DeleteTasks => "delete_tasks",
			OperationKind::SwapIndexes => "swap_indexes",
			OperationKind::WaitForTask => "wait_for_task",
			OperationKind::GenerateTenantToken => "generate_tenant_token",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to a client operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside an operation span and records attempt plus success/failure outcomes.
pub async fn observe<T, Fut>(kind: OperationKind, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	observe_in(OperationSpan::new(kind, stage), kind, fut).await
}

/// Same as [`observe`], with the span tagged by the task the operation targets.
pub async fn observe_task<T, Fut>(
	kind: OperationKind,
	stage: &'static str,
	task_uid: TaskUid,
	fut: Fut,
) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	observe_in(OperationSpan::new(kind, stage).with_task(task_uid), kind, fut).await
}

async fn observe_in<T, Fut>(span: OperationSpan, kind: OperationKind, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	record_operation_outcome(kind, OperationOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => record_operation_outcome(kind, OperationOutcome::Success),
		Err(_) => record_operation_outcome(kind, OperationOutcome::Failure),
	}

	result
}
