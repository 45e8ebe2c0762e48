// crates.io
use tokio::time::Instant;
// self
use meilisearch_tasks::{
	_preludet::*,
	CancellationToken,
	client::WaitOptions,
	error::{ApiError, TransportError},
	http::{ApiRequest, HttpMethod},
	task::{TaskStatus, TaskUid},
};

fn failed_task_json(uid: u64) -> String {
	serde_json::json!({
		"uid": uid,
		"indexUid": "movies",
		"status": "failed",
		"type": "documentAdditionOrUpdate",
		"error": {
			"message": "Index `movies` not found.",
			"code": "index_not_found",
			"type": "invalid_request",
			"link": "https://docs.meilisearch.com/errors#index_not_found"
		},
		"enqueuedAt": "2024-05-01T10:00:00Z"
	})
	.to_string()
}

fn assert_polled(requests: &[ApiRequest], uid: u64) {
	let path = format!("tasks/{uid}");

	for request in requests {
		assert_eq!(request.method, HttpMethod::Get);
		assert_eq!(request.path, path);
		assert!(request.query.is_empty());
		assert!(request.body.is_none());
	}
}

#[tokio::test(start_paused = true)]
async fn terminal_statuses_return_without_sleeping() {
	for (status, expected) in [
		("succeeded", TaskStatus::Succeeded),
		("failed", TaskStatus::Failed),
		("canceled", TaskStatus::Canceled),
	] {
		let transport = ScriptedTransport::repeating(task_json(7, status));
		let started = Instant::now();
		let task = scripted_client(transport.clone())
			.wait_for_task(7_u64)
			.await
			.expect("Concluded tasks should be returned to the caller.");

		assert_eq!(task.status, expected);
		assert_eq!(task.uid, TaskUid::new(7));
		assert_eq!(transport.calls(), 1);
		assert_polled(&transport.requests(), 7);
		assert_eq!(started.elapsed(), Duration::ZERO);
	}
}

#[tokio::test(start_paused = true)]
async fn failed_task_is_a_result_not_an_error() {
	let transport = ScriptedTransport::bodies([
		task_json(3, "enqueued"),
		task_json(3, "processing"),
		failed_task_json(3),
	]);
	let task = scripted_client(transport.clone())
		.wait_for_task(3_u64)
		.await
		.expect("A task that failed on the server still concludes the wait.");
	let failure = task.failure().expect("Failed tasks should carry their error.");

	assert_eq!(failure.code.as_deref(), Some("index_not_found"));
	assert_eq!(transport.calls(), 3);
	assert_polled(&transport.requests(), 3);
}

#[tokio::test]
async fn processing_task_concludes_within_budget() {
	let transport = ScriptedTransport::bodies([
		task_json(42, "processing"),
		task_json(42, "processing"),
		task_json(42, "processing"),
		task_json(42, "succeeded"),
	]);
	let options = WaitOptions::new(Duration::from_millis(200), Duration::from_millis(50));
	let started = std::time::Instant::now();
	let task = scripted_client(transport.clone())
		.wait_for_task_with(42_u64, options)
		.await
		.expect("The task should succeed before the deadline.");

	assert_eq!(task.status, TaskStatus::Succeeded);
	assert_eq!(transport.calls(), 4);
	assert_polled(&transport.requests(), 42);
	assert!(started.elapsed() >= Duration::from_millis(150));
}

#[tokio::test(start_paused = true)]
async fn still_pending_at_deadline_times_out() {
	let transport = ScriptedTransport::repeating(task_json(42, "enqueued"));
	let options = WaitOptions::new(Duration::from_millis(200), Duration::from_millis(50));
	let started = Instant::now();
	let err = scripted_client(transport.clone())
		.wait_for_task_with(42_u64, options)
		.await
		.expect_err("Tasks stuck in the queue should time out.");
	let elapsed = started.elapsed();

	let Error::Timeout { task_uid, timeout } = &err else {
		panic!("Expected a timeout, got {err:?}.");
	};

	assert_eq!(*task_uid, TaskUid::new(42));
	assert_eq!(*timeout, Duration::from_millis(200));
	assert!(err.to_string().contains("42"));
	assert!(elapsed >= Duration::from_millis(200));
	assert!(elapsed <= Duration::from_millis(250));
	// Fetches at 0, 50, 100, 150, and 200ms; the last one observes the elapsed deadline.
	assert_eq!(transport.calls(), 5);
	assert_polled(&transport.requests(), 42);
}

#[tokio::test(start_paused = true)]
async fn fetch_errors_abort_the_wait_unchanged() {
	let transport = ScriptedTransport::new(vec![
		Ok(task_json(11, "processing").into_bytes()),
		Err(TransportError::Unavailable { status: 502 }.into()),
		Ok(task_json(11, "succeeded").into_bytes()),
	]);
	let err = scripted_client(transport.clone())
		.wait_for_task(11_u64)
		.await
		.expect_err("Transport failures should not be retried.");

	assert!(matches!(err, Error::Transport(TransportError::Unavailable { status: 502 })));
	assert_eq!(transport.calls(), 2);

	let missing = ScriptedTransport::new(vec![Err(ApiError::from_body(
		404,
		Some("Not Found"),
		br#"{"message":"Task `11` not found.","code":"task_not_found","type":"invalid_request","link":null}"#,
	)
	.into())]);
	let err = scripted_client(missing.clone())
		.wait_for_task(11_u64)
		.await
		.expect_err("API errors should surface to the caller.");

	assert!(matches!(
		err,
		Error::Api(ApiError { status: 404, ref code, .. }) if code.as_deref() == Some("task_not_found")
	));
	assert_eq!(missing.calls(), 1);
	assert_polled(&missing.requests(), 11);
}

#[tokio::test(start_paused = true)]
async fn cancellation_interrupts_pending_wait() {
	let transport = ScriptedTransport::repeating(task_json(8, "processing"));
	let client = scripted_client(transport.clone());
	let cancel = CancellationToken::new();
	let waiter = {
		let client = client.clone();
		let cancel = cancel.clone();

		tokio::spawn(async move {
			client.wait_for_task_with_cancellation(8_u64, WaitOptions::default(), &cancel).await
		})
	};

	tokio::time::sleep(Duration::from_millis(120)).await;
	cancel.cancel();

	let err = waiter
		.await
		.expect("Wait task should not panic.")
		.expect_err("Cancelled waits should not produce a task.");

	assert!(matches!(err, Error::Canceled { task_uid } if task_uid == TaskUid::new(8)));
	assert_eq!(transport.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn concurrent_waits_are_independent() {
	let transport = ScriptedTransport::repeating(task_json(21, "succeeded"));

	transport.push(Ok(task_json(21, "enqueued").into_bytes()));
	transport.push(Ok(task_json(21, "processing").into_bytes()));

	let client = scripted_client(transport.clone());
	let (first, second) = tokio::join!(client.wait_for_task(21_u64), client.wait_for_task(21_u64));
	let first = first.expect("First concurrent wait should succeed.");
	let second = second.expect("Second concurrent wait should succeed.");

	assert_eq!(first.status, TaskStatus::Succeeded);
	assert_eq!(second.status, TaskStatus::Succeeded);
	assert_eq!(first.uid, second.uid);
	assert_eq!(transport.calls(), 4);
	assert_polled(&transport.requests(), 21);
}
