//! テスト用ユーティリティ

pub mod bot;
