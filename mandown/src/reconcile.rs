//! 再チェック結果の突き合わせ
//!
//! 保存済みレコードと新しいプローブ結果を比較し、書き戻すレコードと
//! 送る通知を決める。I/Oを持たない純粋関数。

use crate::messages;
use crate::notify::Outgoing;
use crate::store::StatusUpdate;
use chrono::{DateTime, SubsecRound, Utc};
use mandown_common::types::{Health, Record, STATUS_UNREACHABLE};
use std::collections::HashMap;

/// サイトの状態変化とみなさない通信エラー
const TRANSIENT_MARKERS: &[&str] = &[
    "connection reset",
    "broken pipe",
    "connection closed before message completed",
    "too many open files",
];

/// 突き合わせ結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// 書き戻すレコード（入力と同じ順序）
    pub records: Vec<Record>,
    /// 送信する通知
    pub notifications: Vec<Outgoing>,
    /// 書き戻すステータス変化（`notifications` と同じ順序・同じ件数）
    pub updates: Vec<StatusUpdate>,
    /// ステータスが変化したレコード数
    pub changed: usize,
    /// 一時的な通信エラーとして無視したレコード数
    pub suppressed: usize,
}

/// ボット側の一時的な通信エラーか
pub fn is_transient(health: &Health) -> bool {
    if health.status != STATUS_UNREACHABLE {
        return false;
    }
    let Some(misc) = health.misc.as_deref() else {
        return false;
    };
    let misc = misc.to_lowercase();
    TRANSIENT_MARKERS.iter().any(|marker| misc.contains(marker))
}

/// レコードと結果を突き合わせる
///
/// 結果のないレコードはそのまま残す。変化したレコードだけ時刻を `now` に更新する。
pub fn reconcile(records: Vec<Record>, results: &[Health], now: DateTime<Utc>) -> Reconciliation {
    let by_site: HashMap<&str, &Health> = results
        .iter()
        .map(|health| (health.site.as_str(), health))
        .collect();
    let now = now.trunc_subsecs(0);

    let mut outcome = Reconciliation {
        records: Vec::with_capacity(records.len()),
        ..Default::default()
    };

    for mut record in records {
        match by_site.get(record.site.as_str()) {
            Some(health) if health.status != record.status => {
                if is_transient(health) {
                    outcome.suppressed += 1;
                } else {
                    let previous_status = record.status;
                    record.status = health.status;
                    record.time = now;
                    outcome.changed += 1;
                    outcome.notifications.push(Outgoing {
                        chat_id: record.user_id,
                        text: messages::status(&record.site, health.status, health.misc.as_deref()),
                        reply_to: Some(record.message_id),
                    });
                    outcome.updates.push(StatusUpdate {
                        record: record.clone(),
                        previous_status,
                    });
                }
            }
            _ => {}
        }
        outcome.records.push(record);
    }

    outcome
}
