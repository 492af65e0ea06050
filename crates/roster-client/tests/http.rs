mod common;

use std::sync::Arc;

use common::XmlTrustServer;
use roster_client::error::{StatusCode, TransportError};
use roster_client::{HtmlTableRenderer, HttpTrustClient, PollOutcome, Roster, TrustApi, Untranslated};
use roster_core::{
    IdToken, Persona, PersonaName, Revision, RosterColumn, SortOrder, SortState, TrustAction,
    TrustList,
};

fn client(server: &XmlTrustServer) -> HttpTrustClient {
    HttpTrustClient::new(server.url.clone(), "roster-tests").expect("Can build client")
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn fetches_revision_and_lists() {
    let server = XmlTrustServer::start().await;
    server.mock.add(
        TrustList::Trusted,
        Persona::new("alice").with_reason("uploads <rare> & good stuff"),
    );
    server.mock.add(
        TrustList::Trusted,
        Persona::new("carol").with_subscribed(true),
    );
    server
        .mock
        .add(TrustList::Distrusted, Persona::new("bob").with_reason("spam"));
    let client = client(&server);

    assert_eq!(
        client.fetch_revision().await.expect("Can fetch"),
        Revision(3)
    );

    let trusted = client
        .fetch_list(
            TrustList::Trusted,
            SortState {
                key: RosterColumn::User,
                order: SortOrder::Descending,
            },
        )
        .await
        .expect("Can fetch");
    assert_eq!(
        trusted
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>(),
        vec!["carol", "alice"]
    );
    assert_eq!(trusted[1].reason, "uploads <rare> & good stuff");
    assert_eq!(trusted[1].token, IdToken::from_wire("YWxpY2U="));
    assert!(trusted[0].subscribed);

    let distrusted = client
        .fetch_list(TrustList::Distrusted, SortState::default())
        .await
        .expect("Can fetch");
    assert_eq!(distrusted, vec![Persona::new("bob").with_reason("spam")]);
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn submits_form_actions() {
    let server = XmlTrustServer::start().await;
    let bob = server.mock.learn("bob");
    let client = client(&server);

    client
        .submit_action(TrustAction::Trust, &bob, "met in person")
        .await
        .expect("Accepted");
    assert_eq!(
        server.mock.list(TrustList::Trusted),
        vec![Persona::new("bob").with_reason("met in person")]
    );

    client
        .submit_action(TrustAction::Subscribe, &bob, "ignored")
        .await
        .expect("Accepted");
    client
        .submit_action(TrustAction::Neutral, &bob, "ignored")
        .await
        .expect("Accepted");

    assert_eq!(
        server.mock.submits(),
        vec![
            (TrustAction::Trust, bob.clone(), "met in person".to_owned()),
            (TrustAction::Subscribe, bob.clone(), String::new()),
            (TrustAction::Neutral, bob, String::new()),
        ]
    );
    assert!(server.mock.list(TrustList::Trusted).is_empty());
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn rejected_action_is_a_status_error() {
    let server = XmlTrustServer::start().await;
    let client = client(&server);

    let res = client
        .submit_action(
            TrustAction::Distrust,
            &IdToken::encode(&PersonaName::from("nobody")),
            "",
        )
        .await;

    assert!(
        matches!(
            res,
            Err(TransportError::Status {
                status: StatusCode::BAD_REQUEST
            })
        ),
        "{res:?}"
    );
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn unreachable_server_is_a_request_error() {
    let server = XmlTrustServer::start().await;
    let url = server.url.clone();
    drop(server);
    tokio::task::yield_now().await;

    let client = HttpTrustClient::new(url, "roster-tests").expect("Can build client");
    // Abort is asynchronous, the listener may linger for a moment
    for _ in 0..50 {
        if client.fetch_revision().await.is_err() {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    panic!("Server still answering");
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn roster_renders_html_over_http() {
    let server = XmlTrustServer::start().await;
    server
        .mock
        .add(TrustList::Trusted, Persona::new("alice").with_reason("friend"));
    let renderer = Arc::new(HtmlTableRenderer::new(Arc::new(Untranslated)));
    let roster = Roster::builder()
        .api(Arc::new(client(&server)))
        .renderer(renderer.clone())
        .build();

    assert_eq!(
        roster.poller().tick().await,
        PollOutcome::Changed(Revision(1))
    );

    let trusted = renderer.markup(TrustList::Trusted).expect("Rendered");
    assert!(trusted.contains(r#"<div id="trustedUsers">"#));
    assert!(trusted.contains("friend"));
    assert!(trusted.contains(r#"id="distrusted-link-YWxpY2U=""#));
    let distrusted = renderer.markup(TrustList::Distrusted).expect("Rendered");
    assert!(distrusted.contains(r#"<div id="distrustedUsers">"#));
    assert!(!distrusted.contains("<tr data-persona"));
}
