//! check サブコマンド
//!
//! 指定URLをその場でプローブし、結果をJSONで出力します。記録はしません。

use crate::config::Settings;
use crate::sanitize::sanitize;
use clap::Args;

/// check サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// URLs or domains to probe
    #[arg(required = true)]
    pub urls: Vec<String>,
}

/// 入力をプローブ対象に展開する
///
/// 正規化できた入力は正規形（http/https）に、できなかった入力はそのまま
/// プローブしてエラー内容を結果に残す。
pub fn expand_targets(urls: &[String]) -> Vec<String> {
    urls.iter()
        .flat_map(|url| match sanitize(url) {
            Ok(sanitized) => sanitized.candidates().map(str::to_string).collect(),
            Err(_) => vec![url.clone()],
        })
        .collect()
}

pub async fn execute(args: &CheckArgs, settings: Settings) -> anyhow::Result<()> {
    let prober = super::build_prober(&settings)?;
    let targets = expand_targets(&args.urls);

    let mut results = prober.check_bulk(&targets).await;
    results.sort_by(|a, b| a.site.cmp(&b.site));

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_targets() {
        let urls = vec![
            "aaa.com".to_string(),
            "https://bbb.org/path".to_string(),
            "not a url".to_string(),
        ];
        assert_eq!(
            expand_targets(&urls),
            vec![
                "http://aaa.com",
                "https://aaa.com",
                "https://bbb.org",
                "not a url",
            ]
        );
    }
}
