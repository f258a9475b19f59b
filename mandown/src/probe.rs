//! バルクヘルスプローブ
//!
//! 複数URLへ並列にGETを送り、ユニークURLごとに1件の結果を集める。
//!
//! - 重複と空文字は除外（初出順を保持）
//! - 1URLにつき1タスク、全タスクの報告が揃うまで待つ
//! - URL解析失敗はステータス0、通信失敗はステータス1（バッチ全体は中断しない）
//! - リトライなし、結果の順序は保証しない

use mandown_common::error::{MandownError, MandownResult};
use mandown_common::types::Health;
use reqwest::{Client, Url};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, info};

/// プローブのデフォルトタイムアウト（秒）
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 180;

/// HTTPプローブ
#[derive(Clone)]
pub struct Prober {
    /// HTTPクライアント（タイムアウト設定済み）
    client: Client,
    /// 同時実行数の上限（None = 無制限）
    limit: Option<Arc<Semaphore>>,
}

impl Prober {
    /// 指定タイムアウトのクライアントでプローブを作成
    pub fn new(timeout: Duration) -> MandownResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MandownError::Internal(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self::with_client(client))
    }

    /// 既存のクライアントでプローブを作成
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            limit: None,
        }
    }

    /// 同時プローブ数の上限を設定（0は無制限）
    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.limit = (limit > 0).then(|| Arc::new(Semaphore::new(limit)));
        self
    }

    /// 単一URLのプローブ
    pub async fn check_health(&self, site: &str) -> Health {
        let url = match Url::parse(site) {
            Ok(url) => url,
            Err(e) => return Health::malformed(site, e.to_string()),
        };

        match self.client.get(url).send().await {
            Ok(response) => Health::responded(site, response.status().as_u16()),
            Err(e) => Health::unreachable(site, describe_error(&e)),
        }
    }

    /// 複数URLを並列にプローブ
    pub async fn check_bulk<I, S>(&self, sites: I) -> Vec<Health>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sites = dedupe_sites(sites);
        if sites.is_empty() {
            return Vec::new();
        }

        debug!(count = sites.len(), "Starting bulk probe");

        let (tx, mut rx) = mpsc::channel(sites.len());
        for site in &sites {
            let prober = self.clone();
            let site = site.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let _permit = match &prober.limit {
                    Some(limit) => limit.clone().acquire_owned().await.ok(),
                    None => None,
                };
                let health = prober.check_health(&site).await;
                let _ = tx.send(health).await;
            });
        }
        drop(tx);

        let mut results = Vec::with_capacity(sites.len());
        while let Some(health) = rx.recv().await {
            results.push(health);
        }

        // パニックしたタスクの分も1件ずつ埋める
        if results.len() < sites.len() {
            let reported: HashSet<String> = results.iter().map(|h| h.site.clone()).collect();
            for site in sites.iter().filter(|s| !reported.contains(*s)) {
                results.push(Health::unreachable(site.as_str(), "probe task aborted"));
            }
        }

        let failures = results.iter().filter(|h| !h.is_accepted()).count();
        info!(
            probed = results.len(),
            failures = failures,
            "Bulk probe completed"
        );

        results
    }

    /// いずれかのサイトが応答するか（ステータス0/1と5xx以外）
    pub async fn any_reachable(&self, sites: &[String]) -> bool {
        self.check_bulk(sites)
            .await
            .iter()
            .any(|health| health.is_accepted() && health.status < 500)
    }
}

/// 初出順を保ったまま重複と空文字を除く
pub fn dedupe_sites<I, S>(sites: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    sites
        .into_iter()
        .map(|site| site.as_ref().to_string())
        .filter(|site| !site.is_empty() && seen.insert(site.clone()))
        .collect()
}

/// エラーと、その原因チェーンを ": " で連結する
///
/// reqwest の Display は最上位しか出さないため、DNS失敗などの根本原因はここで拾う。
pub fn describe_error(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
