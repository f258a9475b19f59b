//! Integration Test: GET /poll による再チェックと通知

use axum::http::StatusCode;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::support::bot::TestBot;

async fn respond_with(site: &MockServer, status: u16) {
    site.reset().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status))
        .mount(site)
        .await;
}

#[tokio::test]
async fn status_change_notifies_owner_once() {
    let bot = TestBot::start().await;
    let site = MockServer::start().await;
    respond_with(&site, 200).await;

    bot.send_text(42, 100, &format!("/track {}", site.uri())).await;
    bot.wait_for_messages(1).await;

    // 変化なし
    let (status, report) = bot.get_json("/poll").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["records"], 1);
    assert_eq!(report["changed"], 0);

    respond_with(&site, 503).await;
    let (_, report) = bot.get_json("/poll").await;
    assert_eq!(report["changed"], 1);
    assert_eq!(report["notified"], 1);

    let messages = bot.wait_for_messages(2).await;
    let alert = &messages[1];
    assert_eq!(alert["chat_id"], 42);
    assert_eq!(alert["reply_to_message_id"], 100);
    assert!(alert["text"]
        .as_str()
        .unwrap()
        .contains("It's down or inaccessible to me"));

    let records = bot.store.load_all().await.unwrap();
    assert_eq!(records[0].status, 503);

    // 同じステータスが続く間は通知しない
    let (_, report) = bot.get_json("/poll").await;
    assert_eq!(report["changed"], 0);
}

#[tokio::test]
async fn unreachable_baseline_skips_poll() {
    let bot = TestBot::start_with_baseline(vec!["http://127.0.0.1:1".to_string()]).await;
    let site = MockServer::start().await;
    respond_with(&site, 200).await;

    bot.send_text(42, 1, &format!("/track {}", site.uri())).await;
    bot.wait_for_messages(1).await;

    respond_with(&site, 500).await;
    let (status, report) = bot.get_json("/poll").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["skipped"], true);
    assert_eq!(bot.store.load_all().await.unwrap()[0].status, 200);
}
