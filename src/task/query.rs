//! Query-string builders for the task listing, cancelation, and deletion endpoints.

// crates.io
use time::format_description::well_known::Rfc3339;
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	task::{TaskStatus, TaskType, TaskUid},
};

/// Filters accepted by `GET /tasks`, `POST /tasks/cancel`, and `DELETE /tasks`.
///
/// Unset fields are omitted from the query string; list fields are comma-joined.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskFilter {
	/// Restrict to these task identifiers.
	pub uids: Vec<TaskUid>,
	/// Restrict to these statuses.
	pub statuses: Vec<TaskStatus>,
	/// Restrict to these task types.
	pub types: Vec<TaskType>,
	/// Restrict to tasks targeting these indexes.
	pub index_uids: Vec<String>,
	/// Restrict to tasks canceled by these cancelation tasks.
	pub canceled_by: Vec<TaskUid>,
	/// Enqueued strictly before this instant.
	pub before_enqueued_at: Option<OffsetDateTime>,
	/// Enqueued strictly after this instant.
	pub after_enqueued_at: Option<OffsetDateTime>,
	/// Started strictly before this instant.
	pub before_started_at: Option<OffsetDateTime>,
	/// Started strictly after this instant.
	pub after_started_at: Option<OffsetDateTime>,
	/// Finished strictly before this instant.
	pub before_finished_at: Option<OffsetDateTime>,
	/// Finished strictly after this instant.
	pub after_finished_at: Option<OffsetDateTime>,
}
impl TaskFilter {
	/// Restricts the filter to the provided task identifiers.
	pub fn with_uids<I>(mut self, uids: I) -> Self
	where
		I: IntoIterator<Item = TaskUid>,
	{
		self.uids.extend(uids);

		self
	}

	/// Restricts the filter to the provided statuses.
	pub fn with_statuses<I>(mut self, statuses: I) -> Self
	where
		I: IntoIterator<Item = TaskStatus>,
	{
		self.statuses.extend(statuses);

		self
	}

	/// Restricts the filter to the provided task types.
	pub fn with_types<I>(mut self, types: I) -> Self
	where
		I: IntoIterator<Item = TaskType>,
	{
		self.types.extend(types);

		self
	}

	/// Restricts the filter to the provided index identifiers.
	pub fn with_index_uids<I, S>(mut self, index_uids: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.index_uids.extend(index_uids.into_iter().map(Into::into));

		self
	}

	/// Restricts the filter to tasks canceled by the provided cancelation tasks.
	pub fn with_canceled_by<I>(mut self, uids: I) -> Self
	where
		I: IntoIterator<Item = TaskUid>,
	{
		self.canceled_by.extend(uids);

		self
	}

	/// Keeps tasks enqueued before `instant`.
	pub fn enqueued_before(mut self, instant: OffsetDateTime) -> Self {
		self.before_enqueued_at = Some(instant);

		self
	}

	/// Keeps tasks enqueued after `instant`.
	pub fn enqueued_after(mut self, instant: OffsetDateTime) -> Self {
		self.after_enqueued_at = Some(instant);

		self
	}

	/// Keeps tasks started before `instant`.
	pub fn started_before(mut self, instant: OffsetDateTime) -> Self {
		self.before_started_at = Some(instant);

		self
	}

	/// Keeps tasks started after `instant`.
	pub fn started_after(mut self, instant: OffsetDateTime) -> Self {
		self.after_started_at = Some(instant);

		self
	}

	/// Keeps tasks finished before `instant`.
	pub fn finished_before(mut self, instant: OffsetDateTime) -> Self {
		self.before_finished_at = Some(instant);

		self
	}

	/// Keeps tasks finished after `instant`.
	pub fn finished_after(mut self, instant: OffsetDateTime) -> Self {
		self.after_finished_at = Some(instant);

		self
	}

	/// Returns `true` when no filter is set.
	pub fn is_empty(&self) -> bool {
		*self == Self::default()
	}

	/// Renders the filter as query pairs in a stable order.
	pub fn query_pairs(&self) -> Result<Vec<(String, String)>, ConfigError> {
		let mut pairs = Vec::new();

		push_list(&mut pairs, "uids", self.uids.iter().map(ToString::to_string));
		push_list(&mut pairs, "statuses", self.statuses.iter().map(|s| s.as_str().to_owned()));
		push_list(&mut pairs, "types", self.types.iter().map(|t| t.as_str().to_owned()));
		push_list(&mut pairs, "indexUids", self.index_uids.iter().cloned());
		push_list(&mut pairs, "canceledBy", self.canceled_by.iter().map(ToString::to_string));

		for (field, instant) in [
			("beforeEnqueuedAt", self.before_enqueued_at),
			("afterEnqueuedAt", self.after_enqueued_at),
			("beforeStartedAt", self.before_started_at),
			("afterStartedAt", self.after_started_at),
			("beforeFinishedAt", self.before_finished_at),
			("afterFinishedAt", self.after_finished_at),
		] {
			if let Some(instant) = instant {
				let value = instant
					.format(&Rfc3339)
					.map_err(|source| ConfigError::QueryDate { field, source })?;

				pairs.push((field.to_owned(), value));
			}
		}

		Ok(pairs)
	}
}

/// Query for `GET /tasks`: filters plus pagination.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TasksQuery {
	/// Filters applied to the listing.
	pub filter: TaskFilter,
	/// Maximum number of tasks per page.
	pub limit: Option<u32>,
	/// Identifier of the first task to return.
	pub from: Option<TaskUid>,
}
impl TasksQuery {
	/// Creates a query listing tasks that match `filter`.
	pub fn new(filter: TaskFilter) -> Self {
		Self { filter, limit: None, from: None }
	}

	/// Sets the page size.
	pub fn with_limit(mut self, limit: u32) -> Self {
		self.limit = Some(limit);

		self
	}

	/// Sets the first task of the page, typically the previous page's `next`.
	pub fn with_from(mut self, from: TaskUid) -> Self {
		self.from = Some(from);

		self
	}

	/// Renders filters and pagination as query pairs.
	pub fn query_pairs(&self) -> Result<Vec<(String, String)>, ConfigError> {
		let mut pairs = self.filter.query_pairs()?;

		if let Some(limit) = self.limit {
			pairs.push(("limit".into(), limit.to_string()));
		}
		if let Some(from) = self.from {
			pairs.push(("from".into(), from.to_string()));
		}

		Ok(pairs)
	}
}

/// Query for `POST /tasks/cancel`.
pub type CancelTasksQuery = TaskFilter;
/// Query for `DELETE /tasks`.
pub type DeleteTasksQuery = TaskFilter;

fn push_list<I>(pairs: &mut Vec<(String, String)>, key: &str, values: I)
where
	I: Iterator<Item = String>,
{
	let joined = values.collect::<Vec<_>>().join(",");

	if !joined.is_empty() {
		pairs.push((key.to_owned(), joined));
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn empty_filter_renders_no_pairs() {
		let filter = TaskFilter::default();

		assert!(filter.is_empty());
		assert!(filter.query_pairs().expect("Empty filter should render.").is_empty());
	}

	#[test]
	fn lists_are_comma_joined_in_stable_order() {
		let filter = TaskFilter::default()
			.with_index_uids(["movies", "books"])
			.with_statuses([TaskStatus::Enqueued, TaskStatus::Processing])
			.with_uids([TaskUid::new(1), TaskUid::new(2)])
			.with_types([TaskType::IndexSwap]);
		let pairs = filter.query_pairs().expect("Filter should render.");

		assert_eq!(
			pairs,
			vec![
				("uids".to_owned(), "1,2".to_owned()),
				("statuses".to_owned(), "enqueued,processing".to_owned()),
				("types".to_owned(), "indexSwap".to_owned()),
				("indexUids".to_owned(), "movies,books".to_owned()),
			]
		);
	}

	#[test]
	fn dates_and_pagination_are_rendered() {
		let query = TasksQuery::new(
			TaskFilter::default().enqueued_after(macros::datetime!(2024-05-01 10:00 UTC)),
		)
		.with_limit(20)
		.with_from(TaskUid::new(99));
		let pairs = query.query_pairs().expect("Query should render.");

		assert_eq!(
			pairs,
			vec![
				("afterEnqueuedAt".to_owned(), "2024-05-01T10:00:00Z".to_owned()),
				("limit".to_owned(), "20".to_owned()),
				("from".to_owned(), "99".to_owned()),
			]
		);
	}
}
