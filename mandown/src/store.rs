//! レコードストア
//!
//! 監視レコードをCSVファイル1つに保存する。1行1レコード、
//! 列は `site,user_id,message_id,time,status`（ヘッダーなし）。
//! 変更のたびにファイル全体を一時ファイルへ書き出してから置き換える。

use mandown_common::error::{MandownError, MandownResult};
use mandown_common::types::Record;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// 再チェックで検出したステータス変化
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    /// 変化後のレコード
    pub record: Record,
    /// 再チェック開始時点のステータス
    pub previous_status: u16,
}

/// CSVファイルベースのレコードストア
///
/// 各操作は内部ロックで直列化される（読み込み→変更→全体書き込み）。
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl RecordStore {
    /// ファイルパスを指定してストアを作成（ファイルは最初の書き込みで作られる）
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// 保存先パス
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 全レコードを読み込む
    pub async fn load_all(&self) -> MandownResult<Vec<Record>> {
        let _guard = self.lock.lock().await;
        self.read()
    }

    /// ユーザーのレコードをファイル上の順序で返す
    pub async fn list_by_user(&self, user_id: i64) -> MandownResult<Vec<Record>> {
        let _guard = self.lock.lock().await;
        Ok(self
            .read()?
            .into_iter()
            .filter(|record| record.user_id == user_id)
            .collect())
    }

    /// (site, user) が未登録なら追加する。追加したら true
    pub async fn put(&self, record: Record) -> MandownResult<bool> {
        let _guard = self.lock.lock().await;
        let mut records = self.read()?;
        if records
            .iter()
            .any(|existing| existing.is_key(&record.site, record.user_id))
        {
            return Ok(false);
        }
        records.push(record);
        self.write(&records)?;
        Ok(true)
    }

    /// (site, user) に一致するレコードを削除し、削除件数を返す
    pub async fn delete(&self, site: &str, user_id: i64) -> MandownResult<usize> {
        self.remove_where(|record| record.is_key(site, user_id)).await
    }

    /// ユーザーの全レコードを削除し、削除件数を返す
    pub async fn clear_user(&self, user_id: i64) -> MandownResult<usize> {
        self.remove_where(|record| record.user_id == user_id).await
    }

    /// ファイル全体を置き換える
    pub async fn write_all(&self, records: &[Record]) -> MandownResult<()> {
        let _guard = self.lock.lock().await;
        self.write(records)
    }

    /// 再チェックで変化したステータスを現在のファイル内容へ反映して全体を書き戻す
    ///
    /// 現在のレコードが再チェック開始時点と同じ登録（message_id とステータスが一致）の
    /// ときだけ差し替える。再チェック中に削除・再登録されたレコードには触れない。
    /// 返り値は `updates` と同じ順序で、反映したかどうか。
    pub async fn apply_statuses(&self, updates: &[StatusUpdate]) -> MandownResult<Vec<bool>> {
        let _guard = self.lock.lock().await;
        let mut records = self.read()?;
        let applied = updates
            .iter()
            .map(|update| {
                let fresh = &update.record;
                match records
                    .iter_mut()
                    .find(|current| current.is_key(&fresh.site, fresh.user_id))
                {
                    Some(current)
                        if current.message_id == fresh.message_id
                            && current.status == update.previous_status =>
                    {
                        current.status = fresh.status;
                        current.time = fresh.time;
                        true
                    }
                    _ => false,
                }
            })
            .collect();
        self.write(&records)?;
        Ok(applied)
    }

    async fn remove_where<F>(&self, predicate: F) -> MandownResult<usize>
    where
        F: Fn(&Record) -> bool,
    {
        let _guard = self.lock.lock().await;
        let records = self.read()?;
        let before = records.len();
        let kept: Vec<Record> = records.into_iter().filter(|r| !predicate(r)).collect();
        let removed = before - kept.len();
        self.write(&kept)?;
        Ok(removed)
    }

    fn read(&self) -> MandownResult<Vec<Record>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(&self.path)
            .map_err(|e| storage_error(&self.path, e))?;

        let mut records = Vec::new();
        for (line, row) in reader.deserialize::<Record>().enumerate() {
            match row {
                Ok(record) => records.push(record),
                Err(e) if e.is_io_error() => return Err(storage_error(&self.path, e)),
                Err(e) => warn!(
                    path = %self.path.display(),
                    line = line + 1,
                    error = %e,
                    "Skipping unreadable record"
                ),
            }
        }
        Ok(records)
    }

    fn write(&self, records: &[Record]) -> MandownResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| storage_error(&self.path, e))?;
        }

        let tmp = tmp_path(&self.path);
        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_path(&tmp)
                .map_err(|e| storage_error(&tmp, e))?;
            for record in records {
                writer
                    .serialize(record)
                    .map_err(|e| storage_error(&tmp, e))?;
            }
            writer.flush().map_err(|e| storage_error(&tmp, e))?;
        }
        fs::rename(&tmp, &self.path).map_err(|e| storage_error(&self.path, e))?;

        debug!(path = %self.path.display(), count = records.len(), "Records written");
        Ok(())
    }
}

/// 書き込み用の一時ファイル（保存先の名前に `.tmp` を付け足す）
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn storage_error(path: &Path, err: impl std::fmt::Display) -> MandownError {
    MandownError::Storage(format!("{}: {}", path.display(), err))
}
