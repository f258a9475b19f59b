//! Integration Test: Webhook からの track / list / untrack / clear

use axum::http::StatusCode;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::support::bot::TestBot;

async fn live_site() -> MockServer {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&site)
        .await;
    site
}

#[tokio::test]
async fn track_replies_and_stores_record() {
    let bot = TestBot::start().await;
    let site = live_site().await;

    let status = bot
        .send_text(1001, 10, &format!("/track {}/some/page", site.uri()))
        .await;
    assert_eq!(status, StatusCode::OK);

    let messages = bot.wait_for_messages(1).await;
    assert_eq!(messages[0]["chat_id"], 1001);
    assert_eq!(messages[0]["reply_to_message_id"], 10);
    assert_eq!(messages[0]["parse_mode"], "Markdown");
    assert_eq!(messages[0]["disable_web_page_preview"], true);
    let text = messages[0]["text"].as_str().unwrap();
    assert!(text.starts_with(&format!("Site: `{}`", site.uri())));
    assert!(text.contains("live and kicking"));

    let contents = bot.file_contents();
    let fields: Vec<&str> = contents.trim_end().split(',').collect();
    assert_eq!(fields.len(), 5);
    assert_eq!(fields[0], site.uri());
    assert_eq!(fields[1], "1001");
    assert_eq!(fields[2], "10");
    assert_eq!(fields[4], "200");
}

#[tokio::test]
async fn track_twice_keeps_one_record() {
    let bot = TestBot::start().await;
    let site = live_site().await;
    let command = format!("/track {}", site.uri());

    bot.send_text(1001, 1, &command).await;
    bot.wait_for_messages(1).await;
    bot.send_text(1001, 2, &command).await;
    bot.wait_for_messages(2).await;

    let records = bot.store.load_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].message_id, 1);
}

#[tokio::test]
async fn invalid_input_gets_error_reply() {
    let bot = TestBot::start().await;

    bot.send_text(5, 1, "/track aa@%$^a.com/page").await;

    let messages = bot.wait_for_messages(1).await;
    assert_eq!(
        messages[0]["text"],
        "Oops! That does not work.\n\nError: `web: input is incorrect`"
    );
    assert!(bot.store.load_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_untrack_and_clear() {
    let bot = TestBot::start().await;
    let first = live_site().await;
    let second = live_site().await;

    bot.send_text(7, 1, &format!("/track {}", first.uri())).await;
    bot.send_text(7, 2, &format!("/track {}", second.uri())).await;
    bot.send_text(8, 3, &format!("/track {}", first.uri())).await;
    bot.wait_for_messages(3).await;

    bot.send_text(7, 4, "/list").await;
    let messages = bot.wait_for_messages(4).await;
    let list = messages
        .iter()
        .find(|m| m["reply_to_message_id"] == 4)
        .unwrap();
    assert_eq!(
        list["text"],
        format!(
            "Here are your tracked domains:\n\n1. `{}`\n2. `{}`\n",
            first.uri(),
            second.uri()
        )
    );

    bot.send_text(7, 5, &format!("/untrack {}", first.uri())).await;
    let messages = bot.wait_for_messages(5).await;
    assert!(messages
        .iter()
        .any(|m| m["reply_to_message_id"] == 5 && m["text"] == "Removed"));

    let remaining: Vec<(String, i64)> = bot
        .store
        .load_all()
        .await
        .unwrap()
        .into_iter()
        .map(|r| (r.site, r.user_id))
        .collect();
    assert_eq!(remaining, vec![(second.uri(), 7), (first.uri(), 8)]);

    bot.send_text(7, 6, "/clear").await;
    bot.wait_for_messages(6).await;
    let remaining = bot.store.load_all().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].user_id, 8);
}

#[tokio::test]
async fn health_endpoint() {
    let bot = TestBot::start().await;
    let (status, body) = bot.get_json("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
