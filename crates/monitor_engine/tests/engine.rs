use std::time::Duration;

use monitor_engine::{EngineEvent, EngineHandle, FailureKind, FetchSettings};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn next_event(engine: &EngineHandle) -> EngineEvent {
    for _ in 0..500 {
        if let Some(event) = engine.try_recv() {
            return event;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("no engine event within 5s");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn fetches_report_back_with_their_keys() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"daemons": []})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/reports/failed"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let engine = EngineHandle::new(FetchSettings::default()).unwrap();

    engine.fetch_status(3, format!("{}/status", server.uri()));
    assert_eq!(
        next_event(&engine).await,
        EngineEvent::StatusFetched {
            cycle: 3,
            result: Ok(json!({"daemons": []})),
        }
    );

    engine.fetch_tab("failed", format!("{}/reports/failed", server.uri()));
    match next_event(&engine).await {
        EngineEvent::TabFetched { tab_id, result } => {
            assert_eq!(tab_id, "failed");
            assert_eq!(result.unwrap_err().kind, FailureKind::HttpStatus(500));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn action_completion_carries_url_and_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/daemons/web/stop"))
        .respond_with(ResponseTemplate::new(500).set_body_string("stop timed out"))
        .mount(&server)
        .await;

    let engine = EngineHandle::new(FetchSettings::default()).unwrap();
    let url = format!("{}/daemons/web/stop", server.uri());
    engine.submit_action(url.clone());

    match next_event(&engine).await {
        EngineEvent::ActionCompleted { url: done, result } => {
            assert_eq!(done, url);
            let response = result.unwrap();
            assert_eq!(response.status, 500);
            assert_eq!(response.body, "stop timed out");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn poll_timer_reports_due_cycle_and_can_be_cancelled() {
    let engine = EngineHandle::new(FetchSettings::default()).unwrap();

    engine.schedule_poll(2, Duration::from_millis(20));
    assert_eq!(next_event(&engine).await, EngineEvent::PollDue { cycle: 2 });

    engine.schedule_poll(3, Duration::from_millis(200));
    engine.cancel_poll();
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(engine.try_recv(), None);
}
