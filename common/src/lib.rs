//! ManDown common types
//!
//! ボット本体とテストで共有する型定義

#![warn(missing_docs)]

/// 設定構造体
pub mod config;

/// エラー型
pub mod error;

/// Webhook / 通知 / ポーリング結果のワイヤ型
pub mod protocol;

/// 監視レコードとプローブ結果
pub mod types;
