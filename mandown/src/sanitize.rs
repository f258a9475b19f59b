//! URL正規化
//!
//! ユーザー入力を `http://host` / `https://host` の正規形に変換する。
//! 保持するのはスキームとホスト（明示ポート含む）のみで、パス・クエリは捨てる。

use mandown_common::error::SanitizeError;
use reqwest::Url;
use std::net::IpAddr;

/// 正規化結果
///
/// スキーム未指定なら両方、指定されていればそのスキームだけが入る。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sanitized {
    /// `http://` 形式
    pub http: Option<String>,
    /// `https://` 形式
    pub https: Option<String>,
}

impl Sanitized {
    /// 存在する正規形を http, https の順に返す
    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        self.http.iter().chain(self.https.iter()).map(String::as_str)
    }
}

/// 入力を正規化する
pub fn sanitize(input: &str) -> Result<Sanitized, SanitizeError> {
    let site = input.trim().to_lowercase();
    if site.is_empty() {
        return Err(SanitizeError::Empty);
    }

    let explicit = match site.split_once("://") {
        Some(("http", _)) => Some("http"),
        Some(("https", _)) => Some("https"),
        Some(_) => return Err(SanitizeError::Invalid),
        None => None,
    };

    let parsed = match explicit {
        Some(_) => Url::parse(&site),
        None => Url::parse(&format!("http://{site}")),
    }
    .map_err(|_| SanitizeError::Invalid)?;

    if !parsed.username().is_empty() || parsed.password().is_some() {
        return Err(SanitizeError::Invalid);
    }

    let host = parsed.host_str().ok_or(SanitizeError::Invalid)?;
    if !is_ip_literal(host) && !is_valid_domain(host) {
        return Err(SanitizeError::Invalid);
    }
    let authority = match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };

    Ok(Sanitized {
        http: (explicit != Some("https")).then(|| format!("http://{authority}")),
        https: (explicit != Some("http")).then(|| format!("https://{authority}")),
    })
}

fn is_ip_literal(host: &str) -> bool {
    host.trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<IpAddr>()
        .is_ok()
}

/// ドット区切りで2ラベル以上、各ラベルが `[a-z0-9-]` のドメイン名か
fn is_valid_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        })
}
