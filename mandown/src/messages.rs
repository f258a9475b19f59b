//! ユーザー向けメッセージ（Markdown）

use mandown_common::types::{STATUS_MALFORMED, STATUS_UNREACHABLE};
use std::fmt::Display;

/// プローブ結果の説明文
pub fn status(site: &str, code: u16, misc: Option<&str>) -> String {
    let mut output = format!("Site: `{site}`\n\n");
    match code {
        STATUS_MALFORMED | STATUS_UNREACHABLE => {
            output.push_str(&format!(
                "Hoppla! We have an error message 🤒\n\n`{}`",
                misc.unwrap_or_default()
            ));
        }
        200..=299 => output.push_str(&format!(
            "Joohoo! It's live and kicking 🙂!\n\n{}",
            status_link(code)
        )),
        400..=499 => output.push_str(&format!(
            "Erm! Did I do something wrong? 🤔\n\n{}",
            status_link(code)
        )),
        500..=599 => output.push_str(&format!(
            "Schade! It's down or inaccessible to me 😟\n\n{}",
            status_link(code)
        )),
        _ => output.push_str("Something is fishy 🐟"),
    }
    output
}

fn status_link(code: u16) -> String {
    format!("Status: [{code}](https://httpstatuses.com/{code})")
}

/// 入力エラー
pub fn input_error(err: &impl Display) -> String {
    format!("Oops! That does not work.\n\nError: `{err}`")
}

/// /start, /help の応答
pub fn help(first_name: Option<&str>) -> String {
    let greeting = match first_name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => format!("Hi {}! ", escape_markdown(name)),
        None => String::new(),
    };
    format!(
        "{greeting}I can understand these commands:\n\n\
         `/track yourdomain.com` - Get notified when the status of your domain changes\n\
         Eg: `/track telegram.org`\n\n\
         `/untrack yourdomain.com` - Stop following a domain\n\
         Eg: `/untrack telegram.org`\n\n\
         /list - Get a list of your followed domains\n\
         Eg: `/list`\n\n\
         /clear - Clear your list of your followed domains\n\
         Eg: `/clear`\n\n\
         /about - Read About\n\
         Eg: `/about`\n\n"
    )
}

/// Markdownの記号を文字として扱わせる
fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub fn about() -> String {
    "*ManDown*:\n\n\
     Open Source on [GitHub](https://github.com/Donnie/ManDown)\n\
     No personally identifiable information is stored or used by this bot."
        .to_string()
}

/// 番号付きの監視リスト
pub fn list<S: AsRef<str>>(sites: &[S]) -> String {
    if sites.is_empty() {
        return empty_list();
    }
    let mut output = String::from("Here are your tracked domains:\n\n");
    for (index, site) in sites.iter().enumerate() {
        output.push_str(&format!("{}. `{}`\n", index + 1, site.as_ref()));
    }
    output
}

pub fn empty_list() -> String {
    "Your list is empty.".to_string()
}

pub fn unknown() -> String {
    "Didn't really get you. /help".to_string()
}

pub fn removed() -> String {
    "Removed".to_string()
}

pub fn all_clear() -> String {
    "All clear".to_string()
}
