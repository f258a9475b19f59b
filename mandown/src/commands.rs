//! チャットコマンドの解析

/// ボットコマンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// /start
    Start,
    /// /help
    Help,
    /// /about
    About,
    /// /list
    List,
    /// /clear
    Clear,
    /// /track <url>
    Track(String),
    /// /untrack <url>
    Untrack(String),
    /// 解釈できない入力
    Unknown,
}

impl Command {
    /// テキストを解析する
    ///
    /// 先頭トークンがコマンド（大文字小文字を区別、`@botname` 接尾辞は無視）、
    /// 残りをトリムしたものが引数。
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let (head, rest) = match text.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (text, ""),
        };
        let name = head.split_once('@').map_or(head, |(name, _)| name);

        match name {
            "/start" => Self::Start,
            "/help" => Self::Help,
            "/about" => Self::About,
            "/list" => Self::List,
            "/clear" => Self::Clear,
            "/track" => Self::Track(rest.to_string()),
            "/untrack" => Self::Untrack(rest.to_string()),
            _ => Self::Unknown,
        }
    }
}
