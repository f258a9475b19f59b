use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use mandown::notify::TelegramNotifier;
use mandown::probe::Prober;
use mandown::shutdown::ShutdownController;
use mandown::store::RecordStore;
use mandown::{api, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "123:test";

/// 実ルーター + wiremock の Bot API
#[allow(dead_code)]
pub struct TestBot {
    _dir: tempfile::TempDir,
    pub store: RecordStore,
    pub app: Router,
    pub telegram: MockServer,
}

#[allow(dead_code)]
impl TestBot {
    pub async fn start() -> Self {
        Self::start_with_baseline(Vec::new()).await
    }

    pub async fn start_with_baseline(baseline_sites: Vec<String>) -> Self {
        let telegram = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/bot{}/sendMessage", TEST_TOKEN)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&telegram)
            .await;

        let dir = tempfile::tempdir().expect("tempdir");
        let store = RecordStore::new(dir.path().join("db.csv"));
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .no_proxy()
            .build()
            .expect("client");
        let notifier = TelegramNotifier::new(client.clone(), &telegram.uri(), TEST_TOKEN);
        let state = AppState::new(
            store.clone(),
            Prober::with_client(client),
            Arc::new(notifier),
            baseline_sites,
            ShutdownController::new(),
        );

        Self {
            _dir: dir,
            store,
            app: api::create_app(state),
            telegram,
        }
    }

    /// POST /hook にテキストメッセージを送る
    pub async fn send_text(&self, chat_id: i64, message_id: i64, text: &str) -> StatusCode {
        let payload = json!({
            "update_id": message_id,
            "message": {
                "message_id": message_id,
                "text": text,
                "chat": {"id": chat_id},
                "from": {"id": chat_id, "first_name": "Grace"}
            }
        });
        let response = self
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/hook")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        response.status()
    }

    /// GET 系エンドポイントを呼び出して JSON を返す
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let response = self
            .app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    /// Bot API が受け取った sendMessage を、件数が揃うまで待って返す
    pub async fn wait_for_messages(&self, count: usize) -> Vec<Value> {
        for _ in 0..100 {
            let received = self.telegram.received_requests().await.unwrap_or_default();
            if received.len() >= count {
                return received
                    .iter()
                    .map(|request| request.body_json::<Value>().unwrap())
                    .collect();
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("expected {} sendMessage calls", count);
    }

    pub fn file_contents(&self) -> String {
        std::fs::read_to_string(self.store.path()).unwrap_or_default()
    }
}
