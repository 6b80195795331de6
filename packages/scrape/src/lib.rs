//! Regex helpers that push object-literal text toward JSON.
//!
//! These rewrite text without understanding it. Quotes inside strings,
//! escaped characters, `//` inside URLs and block comments all defeat them.
//! `seedport_parser` is the structured replacement; these stay for callers
//! that depend on their exact output.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//.*").expect("line comment pattern"));

static BARE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+):").expect("bare key pattern"));

static SPACED_BARE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\s)(\w+):").expect("spaced bare key pattern"));

static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([\]}])").expect("trailing comma pattern"));

/// Rewrite a literal fragment toward strict JSON.
///
/// In order: strip `//` comments, quote `word:` keys, turn every `'` into
/// `"`, and drop commas that directly precede `]` or `}`. Not idempotent.
pub fn normalize_literal(text: &str) -> String {
    let text = LINE_COMMENT.replace_all(text, "");
    let text = BARE_KEY.replace_all(&text, "\"${1}\":");
    let text = text.replace('\'', "\"");
    TRAILING_COMMA.replace_all(&text, "${1}").into_owned()
}

/// Strip `//` comments and quote keys that follow whitespace.
///
/// Unlike [`normalize_literal`], quotes and commas are left alone.
pub fn clean_object(text: &str) -> String {
    let text = LINE_COMMENT.replace_all(text, "");
    SPACED_BARE_KEY
        .replace_all(&text, "${1}\"${2}\":")
        .into_owned()
}

/// Text of the `[...]` assigned by `const <name> = [`, cut at the first `]`.
///
/// Returns `None` when there is no such declaration.
pub fn find_list<'a>(content: &'a str, name: &str) -> Option<&'a str> {
    let pattern = format!(r"(?s)const {} = (\[.*?\])", regex::escape(name));
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            debug!(list = name, error = %e, "list pattern rejected");
            return None;
        }
    };

    re.captures(content)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

/// Like [`find_list`], but a missing declaration reads as `[]`.
///
/// The fallback cannot be told apart from a declared empty list.
pub fn extract_list(content: &str, name: &str) -> String {
    match find_list(content, name) {
        Some(list) => list.to_string(),
        None => {
            debug!(list = name, "no match, returning empty list");
            "[]".to_string()
        }
    }
}
