//! 再チェック（ポーリング）
//!
//! 全レコードを一括プローブし、変化したものを通知して書き戻す。
//! タイマーでの定期実行と `GET /poll` からの単発実行の両方に使う。

use crate::notify::{dispatch, Notifier};
use crate::probe::{dedupe_sites, Prober};
use crate::reconcile::{reconcile, Reconciliation};
use crate::shutdown::ShutdownController;
use crate::store::RecordStore;
use chrono::Utc;
use mandown_common::error::MandownResult;
use mandown_common::protocol::PollReport;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// 再チェック実行器
#[derive(Clone)]
pub struct Poller {
    store: RecordStore,
    prober: Prober,
    notifier: Arc<dyn Notifier>,
    /// 1つも到達できなければその回をスキップする (空 = 無効)
    baseline_sites: Vec<String>,
}

impl Poller {
    pub fn new(store: RecordStore, prober: Prober, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            prober,
            notifier,
            baseline_sites: Vec::new(),
        }
    }

    /// ベースラインサイトを設定
    pub fn with_baseline_sites(mut self, sites: Vec<String>) -> Self {
        self.baseline_sites = sites;
        self
    }

    /// 1回分の再チェック（通知は送信完了を待たない）
    pub async fn run_once(&self) -> MandownResult<PollReport> {
        let (report, _sends) = self.pass().await?;
        Ok(report)
    }

    /// 1回分の再チェックを行い、通知の送信完了まで待つ
    pub async fn run_once_and_flush(&self) -> MandownResult<PollReport> {
        let (report, sends) = self.pass().await?;
        for send in sends {
            if let Err(e) = send.await {
                warn!("Notification task failed: {}", e);
            }
        }
        Ok(report)
    }

    async fn pass(&self) -> MandownResult<(PollReport, Vec<JoinHandle<()>>)> {
        if !self.baseline_sites.is_empty() && !self.prober.any_reachable(&self.baseline_sites).await
        {
            warn!(
                baseline = self.baseline_sites.len(),
                "No baseline site reachable, skipping poll"
            );
            let report = PollReport {
                skipped: true,
                ..Default::default()
            };
            return Ok((report, Vec::new()));
        }

        let records = self.store.load_all().await?;
        let sites = dedupe_sites(records.iter().map(|record| record.site.as_str()));
        let results = self.prober.check_bulk(&sites).await;

        let outcome = reconcile(records, &results, Utc::now());
        let records = outcome.records.len();
        let suppressed = outcome.suppressed;
        let (changed, sends) = self.commit(outcome).await?;

        let report = PollReport {
            skipped: false,
            records,
            probed: results.len(),
            changed,
            suppressed,
            notified: sends.len(),
        };
        info!(
            records = report.records,
            probed = report.probed,
            changed = report.changed,
            suppressed = report.suppressed,
            "Poll completed"
        );
        Ok((report, sends))
    }

    /// 変化を書き戻し、反映できたものだけ通知する
    ///
    /// 読み込み後に削除・再登録されたレコードは反映されず、通知もしない。
    async fn commit(&self, outcome: Reconciliation) -> MandownResult<(usize, Vec<JoinHandle<()>>)> {
        let applied = self.store.apply_statuses(&outcome.updates).await?;
        let stale = applied.iter().filter(|applied| !**applied).count();
        if stale > 0 {
            debug!(stale, "Records changed during poll, keeping stored values");
        }

        let sends: Vec<JoinHandle<()>> = outcome
            .notifications
            .into_iter()
            .zip(applied)
            .filter(|(_, applied)| *applied)
            .map(|(outgoing, _)| dispatch(self.notifier.clone(), outgoing))
            .collect();
        Ok((sends.len(), sends))
    }

    /// バックグラウンドで定期実行を開始（停止シグナルで終了）
    ///
    /// 間隔が0のときはループを始めずにすぐ終わる。
    pub fn start(self, every: Duration, shutdown: ShutdownController) -> JoinHandle<()> {
        tokio::spawn(async move {
            if every.is_zero() {
                warn!("Poll interval is zero, poll loop not started");
                return;
            }

            let mut timer = interval(every);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(interval_secs = every.as_secs(), "Poll loop started");

            // 初回のtickは即時に返るため、1周期待ってから始める
            timer.tick().await;

            loop {
                tokio::select! {
                    _ = timer.tick() => {
                        if let Err(e) = self.run_once().await {
                            error!("Poll error: {}", e);
                        }
                    }
                    _ = shutdown.wait() => {
                        info!("Poll loop stopped");
                        break;
                    }
                }
            }
        })
    }
}
