//! Task model returned by the search server's asynchronous task queue.
//!
//! Every write operation is accepted as a [`TaskInfo`] and concludes later as a [`Task`] whose
//! [`TaskStatus`] leaves the pending superstate (`enqueued` / `processing`). The client only
//! observes tasks; it never mutates them.

pub mod kind;
pub mod query;

pub use kind::*;
pub use query::*;

// self
use crate::_prelude::*;

/// Free-form task payload; its shape depends on [`TaskType`].
pub type TaskDetails = BTreeMap<String, serde_json::Value>;

/// Sequential task identifier assigned by the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskUid(u64);
impl TaskUid {
	/// Wraps a raw task identifier.
	pub const fn new(value: u64) -> Self {
		Self(value)
	}

	/// Returns the raw identifier.
	pub const fn get(self) -> u64 {
		self.0
	}
}
impl From<u64> for TaskUid {
	fn from(value: u64) -> Self {
		Self(value)
	}
}
impl From<&TaskInfo> for TaskUid {
	fn from(info: &TaskInfo) -> Self {
		info.task_uid
	}
}
impl Display for TaskUid {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}", self.0)
	}
}

/// Failure description attached to tasks whose status is [`TaskStatus::Failed`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskFailure {
	/// Human-readable failure message.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	/// Machine-readable error code.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub code: Option<String>,
	/// Error category.
	#[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
	pub error_type: Option<String>,
	/// Documentation link for the error code.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub link: Option<String>,
	/// Keys the server added beyond the documented ones.
	#[serde(flatten)]
	pub extra: BTreeMap<String, serde_json::Value>,
}

/// Summary returned by the server when it accepts an asynchronous operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
	/// Identifier to poll with.
	pub task_uid: TaskUid,
	/// Index targeted by the operation, absent for global operations.
	#[serde(default)]
	pub index_uid: Option<String>,
	/// Status at enqueue time.
	pub status: TaskStatus,
	/// Operation kind.
	#[serde(rename = "type")]
	pub task_type: TaskType,
	/// Enqueue timestamp.
	#[serde(with = "time::serde::rfc3339")]
	pub enqueued_at: OffsetDateTime,
}

/// Full task state as returned by `GET /tasks/{uid}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
	/// Sequential task identifier.
	pub uid: TaskUid,
	/// Index targeted by the task, absent for global operations.
	#[serde(default)]
	pub index_uid: Option<String>,
	/// Current lifecycle status.
	pub status: TaskStatus,
	/// Operation kind; unrecognized kinds parse as [`TaskType::Unknown`].
	#[serde(rename = "type")]
	pub task_type: TaskType,
	/// Task that canceled this one, if any.
	#[serde(default)]
	pub canceled_by: Option<TaskUid>,
	/// Type-dependent payload.
	#[serde(default)]
	pub details: Option<TaskDetails>,
	/// Failure description, present only when the task failed.
	#[serde(default)]
	pub error: Option<TaskFailure>,
	/// Time spent processing, as an ISO 8601 duration.
	#[serde(default)]
	pub duration: Option<String>,
	/// Enqueue timestamp.
	#[serde(with = "time::serde::rfc3339")]
	pub enqueued_at: OffsetDateTime,
	/// Processing start, absent while enqueued.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub started_at: Option<OffsetDateTime>,
	/// Completion timestamp, absent while pending.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub finished_at: Option<OffsetDateTime>,
}
impl Task {
	/// Returns `true` while the task is enqueued or processing.
	pub fn is_pending(&self) -> bool {
		self.status.is_pending()
	}

	/// Returns `true` when the task concluded successfully.
	pub fn is_succeeded(&self) -> bool {
		self.status == TaskStatus::Succeeded
	}

	/// Returns the failure description when the task failed.
	pub fn failure(&self) -> Option<&TaskFailure> {
		match self.status {
			TaskStatus::Failed => self.error.as_ref(),
			_ => None,
		}
	}
}

/// Paginated list of tasks returned by `GET /tasks`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TasksResults<T> {
	/// Page content.
	pub results: T,
	/// Page size applied by the server.
	#[serde(default)]
	pub limit: Option<u32>,
	/// Identifier of the first task on this page.
	#[serde(default)]
	pub from: Option<TaskUid>,
	/// Value to pass as `from` for the next page; `None` on the last page.
	#[serde(default)]
	pub next: Option<TaskUid>,
	/// Total number of tasks matching the filters.
	#[serde(default)]
	pub total: Option<u64>,
}

/// Pair of indexes to swap atomically.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSwap {
	/// The two index identifiers to exchange.
	pub indexes: [String; 2],
}
impl IndexSwap {
	/// Builds a swap request for `a` and `b`.
	pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
		Self { indexes: [a.into(), b.into()] }
	}
}
