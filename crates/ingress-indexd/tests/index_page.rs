//! End-to-end index page tests.
//!
//! Drives the real pipeline — dispatcher, accumulator, publisher,
//! router — with in-memory events and asserts on the rendered page.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures::stream;
use tokio::sync::watch;
use tower::ServiceExt;

use ingress_index_core::{Accumulator, RawIngress, Snapshot};
use ingress_index_watch::{Dispatcher, IngressEvent, snapshot_channel};
use ingress_index_web::{Publisher, WebState, build_router};

struct Harness {
    dispatcher: Dispatcher,
    published: watch::Receiver<Snapshot>,
    router: Router,
    // Dropping this would stop the publisher mid-test.
    _shutdown_tx: watch::Sender<bool>,
}

fn harness(force_tls: bool) -> Harness {
    let accumulator = Arc::new(Accumulator::new());
    let (snapshot_tx, snapshot_rx) = snapshot_channel();
    let dispatcher = Dispatcher::new(accumulator, force_tls, snapshot_tx);
    let (publisher, published) = Publisher::new(snapshot_rx);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(publisher.run(shutdown_rx));
    let router = build_router(WebState {
        published: published.clone(),
    });
    Harness {
        dispatcher,
        published,
        router,
        _shutdown_tx: shutdown_tx,
    }
}

fn raw(namespace: &str, name: &str, host: &str) -> RawIngress {
    RawIngress::new(namespace, name, &[], &[host])
}

async fn get_page(router: &Router) -> (StatusCode, String) {
    let resp = router
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// Block until the published snapshot holds exactly `n` records.
async fn wait_for_count(published: &mut watch::Receiver<Snapshot>, n: usize) {
    loop {
        if published.borrow().len() == n {
            return;
        }
        published.changed().await.unwrap();
    }
}

#[tokio::test]
async fn empty_index_renders_placeholder() {
    let h = harness(true);

    let (status, body) = get_page(&h.router).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No Ingress objects found"), "body: {body}");
}

#[tokio::test]
async fn add_then_delete_round_trip() {
    let mut h = harness(true);

    h.dispatcher
        .apply(IngressEvent::Added(raw("default", "web", "app.example.com")))
        .await;
    wait_for_count(&mut h.published, 1).await;

    let (status, body) = get_page(&h.router).await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        body.contains(r#"default / <a href="https://app.example.com">web</a>"#),
        "body: {body}"
    );
    assert!(!body.contains("No Ingress objects found"));

    h.dispatcher
        .apply(IngressEvent::Deleted(raw("default", "web", "app.example.com")))
        .await;
    wait_for_count(&mut h.published, 0).await;

    let (status, body) = get_page(&h.router).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No Ingress objects found"), "body: {body}");
}

#[tokio::test]
async fn plain_host_renders_http_link_when_tls_not_forced() {
    let mut h = harness(false);

    h.dispatcher
        .apply(IngressEvent::Added(raw("default", "web", "app.example.com")))
        .await;
    wait_for_count(&mut h.published, 1).await;

    let (_, body) = get_page(&h.router).await;
    assert!(
        body.contains(r#"<a href="http://app.example.com">web</a>"#),
        "body: {body}"
    );
}

#[tokio::test]
async fn records_render_sorted_case_insensitively() {
    let mut h = harness(true);

    let events = stream::iter(vec![
        IngressEvent::Added(raw("default", "Zed", "z.example.com")),
        IngressEvent::Added(raw("default", "alpha", "a.example.com")),
        IngressEvent::Added(raw("default", "Beta", "b.example.com")),
    ]);
    h.dispatcher.clone().run(events).await;
    wait_for_count(&mut h.published, 3).await;

    let (_, body) = get_page(&h.router).await;
    let alpha = body.find(">alpha<").expect("alpha rendered");
    let beta = body.find(">Beta<").expect("Beta rendered");
    let zed = body.find(">Zed<").expect("Zed rendered");
    assert!(alpha < beta && beta < zed, "body: {body}");
}

#[tokio::test]
async fn unrepresentable_ingress_never_reaches_the_page() {
    let mut h = harness(true);

    h.dispatcher
        .apply(IngressEvent::Added(raw("default", "dev", "localhost:8080")))
        .await;
    h.dispatcher
        .apply(IngressEvent::Added(raw("default", "web", "app.example.com")))
        .await;
    wait_for_count(&mut h.published, 1).await;

    let (_, body) = get_page(&h.router).await;
    assert!(body.contains(">web<"), "body: {body}");
    assert!(!body.contains(">dev<"), "body: {body}");
}
