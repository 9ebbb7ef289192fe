use std::time::Duration;

use httpmock::prelude::*;
use intake_config::DownstreamTarget;
use intake_core::{Notifier, NotifyError, error_chain};
use intake_notify::{DEFAULT_TIMEOUT, EVENT_HEADER, OBJECT_READY_EVENT, WebhookNotifier};
use serde_json::json;

type TestResult = anyhow::Result<()>;

#[tokio::test]
async fn accepted_dispatch_posts_event() -> TestResult {
    let server = MockServer::start_async().await;
    let target = server.url("/hooks/in");
    let expected_target = target.clone();
    let mock = server.mock(move |when, then| {
        when.method(POST)
            .path("/hooks/in")
            .header(EVENT_HEADER, OBJECT_READY_EVENT)
            .json_body(json!({
                "container": "landing",
                "key": "in/2026-02-22T10:30:00.000Z-a.json",
                "target": expected_target,
            }));
        then.status(202);
    });

    let notifier = WebhookNotifier::new(DEFAULT_TIMEOUT)?;
    notifier
        .notify(
            &DownstreamTarget::from(target),
            "landing",
            "in/2026-02-22T10:30:00.000Z-a.json",
        )
        .await?;
    mock.assert();
    Ok(())
}

#[tokio::test]
async fn non_success_status_is_rejection() -> TestResult {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST).path("/hook");
        then.status(503);
    });

    let notifier = WebhookNotifier::new(DEFAULT_TIMEOUT)?;
    let err = notifier
        .notify(&DownstreamTarget::from(server.url("/hook")), "c", "in/k")
        .await
        .unwrap_err();
    assert!(matches!(err, NotifyError::Rejected { status: 503, .. }));
    assert_eq!(
        error_chain(&err),
        "downstream rejected dispatch with status 503"
    );
    mock.assert();
    Ok(())
}

#[tokio::test]
async fn slow_webhook_times_out_as_dispatch_failure() -> TestResult {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/slow");
        then.status(200).delay(Duration::from_secs(2));
    });

    let notifier = WebhookNotifier::new(Duration::from_millis(100))?;
    let err = notifier
        .notify(&DownstreamTarget::from(server.url("/slow")), "c", "in/k")
        .await
        .unwrap_err();
    assert!(matches!(err, NotifyError::Dispatch { .. }));
    Ok(())
}

#[tokio::test]
async fn malformed_target_never_dispatches() -> TestResult {
    let notifier = WebhookNotifier::new(DEFAULT_TIMEOUT)?;
    let err = notifier
        .notify(&DownstreamTarget::from("not a url"), "c", "in/k")
        .await
        .unwrap_err();
    assert!(matches!(err, NotifyError::InvalidTarget { .. }));
    Ok(())
}
