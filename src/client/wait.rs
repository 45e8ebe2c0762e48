//! Task poller: waits for an asynchronous task to leave the pending superstate.
//!
//! A wait fetches the task immediately, returns as soon as its status is terminal
//! (`succeeded`, `failed`, or `canceled`), and otherwise sleeps for the poll interval before
//! fetching again. The deadline is computed once from a monotonic clock when the wait starts,
//! so a slow fetch can overshoot the nominal timeout by at most one request's latency. Fetch
//! failures abort the wait unchanged; nothing inside the loop is retried.
//!
//! Cancellation is cooperative: a [`CancellationToken`] is checked before each fetch and raced
//! against both the in-flight fetch and the sleep, so cancelling interrupts the wait at the
//! next suspension point with [`Error::Canceled`].

// crates.io
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
// self
use crate::{
	_prelude::*,
	client::Client,
	http::Transport,
	obs::{self, OperationKind},
	task::{Task, TaskUid},
};

/// Default time budget of a task wait.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_millis(5_000);
/// Default gap between two task fetches.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Timeout and poll interval applied to a task wait.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaitOptions {
	/// Maximum time spent waiting before failing with [`Error::Timeout`]; [`Duration::MAX`]
	/// waits until the task concludes.
	pub timeout: Duration,
	/// Minimum gap between two fetches.
	pub interval: Duration,
}
impl WaitOptions {
	/// Creates options with an explicit timeout and interval.
	pub const fn new(timeout: Duration, interval: Duration) -> Self {
		Self { timeout, interval }
	}

	/// Overrides the timeout.
	pub const fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Overrides the poll interval.
	pub const fn with_interval(mut self, interval: Duration) -> Self {
		self.interval = interval;

		self
	}
}
impl Default for WaitOptions {
	fn default() -> Self {
		Self::new(DEFAULT_WAIT_TIMEOUT, DEFAULT_POLL_INTERVAL)
	}
}

impl<T> Client<T>
where
	T: ?Sized + Transport,
{
	/// Waits for `task_uid` using the client's configured [`WaitOptions`].
	pub async fn wait_for_task(&self, task_uid: impl Into<TaskUid>) -> Result<Task> {
		self.wait_for_task_with(task_uid, self.config.wait).await
	}

	/// Waits for `task_uid` with explicit options.
	pub async fn wait_for_task_with(
		&self,
		task_uid: impl Into<TaskUid>,
		options: WaitOptions,
	) -> Result<Task> {
		self.wait_for_task_with_cancellation(task_uid, options, &CancellationToken::new()).await
	}

	/// Waits for `task_uid`, aborting with [`Error::Canceled`] once `cancel` fires.
	///
	/// The returned task may have failed or been canceled on the server; inspect
	/// [`Task::status`] and [`Task::error`]. Only a task that is still pending at the deadline
	/// produces [`Error::Timeout`].
	pub async fn wait_for_task_with_cancellation(
		&self,
		task_uid: impl Into<TaskUid>,
		options: WaitOptions,
		cancel: &CancellationToken,
	) -> Result<Task> {
		let task_uid = task_uid.into();

		obs::observe_task(
			OperationKind::WaitForTask,
			"wait_for_task",
			task_uid,
			self.poll_until_concluded(task_uid, options, cancel),
		)
		.await
	}

	async fn poll_until_concluded(
		&self,
		task_uid: TaskUid,
		options: WaitOptions,
		cancel: &CancellationToken,
	) -> Result<Task> {
		// A timeout too large to represent has no deadline.
		let deadline = Instant::now().checked_add(options.timeout);
		let mut attempt = 0_u32;

		loop {
			if cancel.is_cancelled() {
				return Err(Error::Canceled { task_uid });
			}

			attempt = attempt.saturating_add(1);

			let task = tokio::select! {
				biased;
				_ = cancel.cancelled() => return Err(Error::Canceled { task_uid }),
				fetched = self.fetch_task(task_uid) => fetched?,
			};

			obs::record_task_poll(task_uid, attempt);

			if !task.is_pending() {
				return Ok(task);
			}
			if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
				return Err(Error::Timeout { task_uid, timeout: options.timeout });
			}

			tokio::select! {
				biased;
				_ = cancel.cancelled() => return Err(Error::Canceled { task_uid }),
				_ = time::sleep(options.interval) => {},
			}
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::{ScriptedTransport, scripted_client, task_json};

	#[test]
	fn defaults_match_server_recommendations() {
		let options = WaitOptions::default();

		assert_eq!(options.timeout, Duration::from_millis(5_000));
		assert_eq!(options.interval, Duration::from_millis(50));
		assert_eq!(
			options.with_timeout(Duration::from_secs(1)).with_interval(Duration::from_millis(10)),
			WaitOptions::new(Duration::from_secs(1), Duration::from_millis(10))
		);
	}

	#[tokio::test(start_paused = true)]
	async fn pending_task_times_out_after_deadline() {
		let transport = ScriptedTransport::repeating(task_json(9, "processing"));
		let client = scripted_client(transport.clone());
		let options = WaitOptions::new(Duration::from_millis(120), Duration::from_millis(50));
		let started = Instant::now();
		let err = client
			.wait_for_task_with(9_u64, options)
			.await
			.expect_err("A task that never concludes should time out.");

		assert!(matches!(err, Error::Timeout { task_uid, .. } if task_uid == TaskUid::new(9)));
		assert!(started.elapsed() >= Duration::from_millis(120));
		// Fetches at 0, 50, 100, and 150ms; the last one observes the elapsed deadline.
		assert_eq!(transport.calls(), 4);
	}

	#[tokio::test(start_paused = true)]
	async fn unbounded_timeout_waits_until_concluded() {
		let transport = ScriptedTransport::repeating(task_json(1, "succeeded"));

		transport.push(Ok(task_json(1, "processing").into_bytes()));

		let client = scripted_client(transport.clone());
		let task = client
			.wait_for_task_with(1_u64, WaitOptions::default().with_timeout(Duration::MAX))
			.await
			.expect("An unrepresentable deadline should not abort the wait.");

		assert!(task.is_succeeded());
		assert_eq!(transport.calls(), 2);
	}

	#[tokio::test(start_paused = true)]
	async fn cancellation_during_sleep_aborts_wait() {
		let transport = ScriptedTransport::repeating(task_json(5, "enqueued"));
		let client = scripted_client(transport.clone());
		let cancel = CancellationToken::new();
		let trigger = cancel.clone();

		tokio::spawn(async move {
			time::sleep(Duration::from_millis(75)).await;
			trigger.cancel();
		});

		let err = client
			.wait_for_task_with_cancellation(5_u64, WaitOptions::default(), &cancel)
			.await
			.expect_err("Cancelled waits should not return a task.");

		assert!(matches!(err, Error::Canceled { task_uid } if task_uid == TaskUid::new(5)));
		assert_eq!(transport.calls(), 2);
	}

	#[tokio::test]
	async fn pre_cancelled_token_skips_fetch() {
		let transport = ScriptedTransport::repeating(task_json(5, "succeeded"));
		let client = scripted_client(transport.clone());
		let cancel = CancellationToken::new();

		cancel.cancel();

		let err = client
			.wait_for_task_with_cancellation(5_u64, WaitOptions::default(), &cancel)
			.await
			.expect_err("A cancelled token should abort before the first fetch.");

		assert!(matches!(err, Error::Canceled { .. }));
		assert_eq!(transport.calls(), 0);
	}
}
