//! Task queue endpoints: lookup, listing, cancelation, deletion, and index swaps.
//!
//! Every helper builds an [`ApiRequest`], runs it through the client's [`Transport`], and
//! decodes the JSON body. Each call is observed under its own [`OperationKind`], so metrics
//! separate single lookups from listings and from the writes that enqueue new tasks.

// self
use crate::{
	_prelude::*,
	client::Client,
	http::{ApiRequest, HttpMethod, Transport},
	obs::{self, OperationKind},
	task::{
		CancelTasksQuery, DeleteTasksQuery, IndexSwap, Task, TaskFilter, TaskInfo, TaskUid,
		TasksQuery, TasksResults,
	},
};

impl<T> Client<T>
where
	T: ?Sized + Transport,
{
	/// Fetches the current state of one task.
	pub async fn get_task(&self, task_uid: impl Into<TaskUid>) -> Result<Task> {
		let task_uid = task_uid.into();

		obs::observe_task(OperationKind::GetTask, "get_task", task_uid, self.fetch_task(task_uid))
			.await
	}

	/// Lists tasks matching `query`, one page at a time.
	pub async fn get_tasks(&self, query: &TasksQuery) -> Result<TasksResults<Vec<Task>>> {
		obs::observe(OperationKind::ListTasks, "get_tasks", async move {
			let request = ApiRequest::get("tasks").with_query(query.query_pairs()?);

			self.send(request).await
		})
		.await
	}

	/// Lists the tasks that target `index_uid`.
	pub async fn get_index_tasks(&self, index_uid: &str) -> Result<TasksResults<Vec<Task>>> {
		let query = TasksQuery::new(TaskFilter::default().with_index_uids([index_uid]));

		self.get_tasks(&query).await
	}

	/// Cancels the enqueued or processing tasks matching `filter`.
	///
	/// The server rejects unfiltered cancelations, so an empty filter surfaces as an
	/// [`ApiError`](crate::error::ApiError). The returned [`TaskInfo`] describes the cancelation
	/// task itself.
	pub async fn cancel_tasks(&self, filter: &CancelTasksQuery) -> Result<TaskInfo> {
		obs::observe(OperationKind::CancelTasks, "cancel_tasks", async move {
			let request =
				ApiRequest::new(HttpMethod::Post, "tasks/cancel").with_query(filter.query_pairs()?);

			self.send(request).await
		})
		.await
	}

	/// Deletes finished tasks matching `filter` from the task history.
	pub async fn delete_tasks(&self, filter: &DeleteTasksQuery) -> Result<TaskInfo> {
		obs::observe(OperationKind::DeleteTasks, "delete_tasks", async move {
			let request =
				ApiRequest::new(HttpMethod::Delete, "tasks").with_query(filter.query_pairs()?);

			self.send(request).await
		})
		.await
	}

	/// Atomically swaps the documents, settings, and task history of each index pair.
	pub async fn swap_indexes(&self, swaps: &[IndexSwap]) -> Result<TaskInfo> {
		obs::observe(OperationKind::SwapIndexes, "swap_indexes", async move {
			let request = ApiRequest::new(HttpMethod::Post, "swap-indexes").with_json(swaps)?;

			self.send(request).await
		})
		.await
	}

	/// Issues `GET /tasks/{uid}` without operation bookkeeping; the poller records its own.
	pub(crate) async fn fetch_task(&self, task_uid: TaskUid) -> Result<Task> {
		self.send(ApiRequest::get(format!("tasks/{task_uid}"))).await
	}
}
