//! Task lifecycle status and operation kind with an unknown-kind fallback.

// crates.io
use serde::{Deserializer, Serializer};
// self
use crate::_prelude::*;

/// Lifecycle status of a task.
///
/// `Enqueued → Processing → {Succeeded | Failed}`, and either pending state may move to
/// `Canceled`. Only the server drives transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
	/// Accepted and waiting in the queue.
	Enqueued,
	/// Currently being processed.
	Processing,
	/// Completed successfully.
	Succeeded,
	/// Completed with an error.
	Failed,
	/// Canceled before completion.
	Canceled,
}
impl TaskStatus {
	/// Returns the wire identifier for the status.
	pub const fn as_str(self) -> &'static str {
		match self {
			TaskStatus::Enqueued => "enqueued",
			TaskStatus::Processing => "processing",
			TaskStatus::Succeeded => "succeeded",
			TaskStatus::Failed => "failed",
			TaskStatus::Canceled => "canceled",
		}
	}

	/// Returns `true` for the pending superstate (`Enqueued` or `Processing`).
	pub const fn is_pending(self) -> bool {
		matches!(self, TaskStatus::Enqueued | TaskStatus::Processing)
	}

	/// Returns `true` once the server will no longer change the status.
	pub const fn is_terminal(self) -> bool {
		!self.is_pending()
	}
}
impl Display for TaskStatus {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Operation kind performed by a task.
///
/// Deserialization never fails: values the client does not recognize map to
/// [`TaskType::Unknown`] so newer servers keep working with older clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskType {
	/// `indexCreation`.
	IndexCreation,
	/// `indexUpdate`.
	IndexUpdate,
	/// `indexDeletion`.
	IndexDeletion,
	/// `documentAdditionOrUpdate`.
	DocumentAdditionOrUpdate,
	/// `documentDeletion`.
	DocumentDeletion,
	/// `settingsUpdate`.
	SettingsUpdate,
	/// `dumpCreation`.
	DumpCreation,
	/// `taskCancelation`.
	TaskCancelation,
	/// `snapshotCreation`.
	SnapshotCreation,
	/// `taskDeletion`.
	TaskDeletion,
	/// `indexSwap`.
	IndexSwap,
	/// Any kind this client does not know about.
	Unknown,
}
impl TaskType {
	const KNOWN: [TaskType; 11] = [
		TaskType::IndexCreation,
		TaskType::IndexUpdate,
		TaskType::IndexDeletion,
		TaskType::DocumentAdditionOrUpdate,
		TaskType::DocumentDeletion,
		TaskType::SettingsUpdate,
		TaskType::DumpCreation,
		TaskType::TaskCancelation,
		TaskType::SnapshotCreation,
		TaskType::TaskDeletion,
		TaskType::IndexSwap,
	];

	/// Returns the wire identifier for the task type.
	pub const fn as_str(self) -> &'static str {
		match self {
			TaskType::IndexCreation => "indexCreation",
			TaskType::IndexUpdate => "indexUpdate",
			TaskType::IndexDeletion => "indexDeletion",
			TaskType::DocumentAdditionOrUpdate => "documentAdditionOrUpdate",
			TaskType::DocumentDeletion => "documentDeletion",
			TaskType::SettingsUpdate => "settingsUpdate",
			TaskType::DumpCreation => "dumpCreation",
			TaskType::TaskCancelation => "taskCancelation",
			TaskType::SnapshotCreation => "snapshotCreation",
			TaskType::TaskDeletion => "taskDeletion",
			TaskType::IndexSwap => "indexSwap",
			TaskType::Unknown => "unknown",
		}
	}

	/// Parses a wire identifier case-insensitively, defaulting to [`TaskType::Unknown`].
	pub fn parse_or_unknown(raw: &str) -> Self {
		Self::KNOWN
			.into_iter()
			.find(|kind| kind.as_str().eq_ignore_ascii_case(raw))
			.unwrap_or(TaskType::Unknown)
	}
}
impl Display for TaskType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl Serialize for TaskType {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(self.as_str())
	}
}
impl<'de> Deserialize<'de> for TaskType {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = serde_json::Value::deserialize(deserializer)?;

		Ok(raw.as_str().map(TaskType::parse_or_unknown).unwrap_or(TaskType::Unknown))
	}
}
