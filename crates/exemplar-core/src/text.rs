//! Text renderings: compact stringification, path display, escaping and
//! URL joining
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::accessors::{is_key, str_key};
use crate::consts::DOT;
use crate::value::Value;
use regex::Regex;
use std::sync::OnceLock;

static REGEX_SPECIALS: OnceLock<Regex> = OnceLock::new();
static REPEATED_SLASHES: OnceLock<Regex> = OnceLock::new();

/// Compact, quote-free rendering for messages and keys. Strings render
/// verbatim; `maxlen` truncates with a trailing `...`.
pub fn stringify<'a>(val: impl Into<Option<&'a Value>>, maxlen: Option<usize>) -> String {
    let text = match val.into() {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_json_string().replace('"', ""),
    };

    match maxlen {
        Some(maxlen) if text.chars().count() > maxlen => {
            let mut out: String = text.chars().take(maxlen.saturating_sub(3)).collect();
            out.push_str("...");
            out
        }
        _ => text,
    }
}

/// Render a path for messages, skipping the first `from` segments.
///
/// Lists join their key segments with `.`; dots inside segments and
/// anything that is not a key are dropped. A single string or number is
/// a one-segment path and renders whole.
pub fn pathify<'a>(val: impl Into<Option<&'a Value>>, from: usize) -> String {
    match val.into() {
        Some(Value::List(list)) => {
            let list = list.borrow();
            let rest = list.get(from..).unwrap_or(&[]);
            if rest.is_empty() {
                return "<root>".to_string();
            }
            rest.iter()
                .filter(|p| is_key(*p))
                .map(|p| str_key(p).replace(DOT, ""))
                .collect::<Vec<_>>()
                .join(".")
        }
        Some(key @ (Value::String(_) | Value::Number(_))) if from == 0 => str_key(key),
        Some(Value::String(_) | Value::Number(_)) => "<root>".to_string(),
        None => "<unknown-path>".to_string(),
        Some(other) => format!("<unknown-path:{}>", stringify(other, Some(47))),
    }
}

/// [`pathify`] over already-split segments
pub fn pathify_parts<S: AsRef<str>>(parts: &[S], from: usize) -> String {
    let rest = parts.get(from..).unwrap_or(&[]);
    if rest.is_empty() {
        return "<root>".to_string();
    }
    rest.iter()
        .map(|p| p.as_ref().replace(DOT, ""))
        .collect::<Vec<_>>()
        .join(".")
}

/// Escape regular-expression metacharacters
pub fn esc_re(text: &str) -> String {
    let specials = REGEX_SPECIALS.get_or_init(|| Regex::new(r"[.*+?^${}()|\[\]\\]").unwrap());
    specials.replace_all(text, r"\$0").into_owned()
}

/// Percent-encode for use as a URL component
pub fn esc_url(text: &str) -> String {
    url::form_urlencoded::byte_serialize(text.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Join URL parts with single slashes.
///
/// Empty parts are dropped. The first part only loses trailing slashes
/// (so a scheme's `//` survives); later parts have repeated slashes
/// collapsed and both ends trimmed.
pub fn join_url<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let repeated = REPEATED_SLASHES.get_or_init(|| Regex::new(r"([^/])/{2,}").unwrap());

    parts
        .into_iter()
        .filter(|p| !p.as_ref().is_empty())
        .enumerate()
        .map(|(i, part)| {
            let part = part.as_ref();
            if i == 0 {
                part.trim_end_matches('/').to_string()
            } else {
                repeated
                    .replace_all(part, "$1/")
                    .trim_start_matches('/')
                    .trim_end_matches('/')
                    .to_string()
            }
        })
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stringify() {
        assert_eq!(stringify(None::<&Value>, None), "");
        assert_eq!(stringify(&Value::from("abc"), None), "abc");
        assert_eq!(stringify(&Value::from(1), None), "1");
        assert_eq!(stringify(&Value::Null, None), "null");
        assert_eq!(stringify(&Value::from(json!({"a": [1, "b"]})), None), "{a:[1,b]}");
    }

    #[test]
    fn test_stringify_maxlen() {
        let val = Value::from(json!({"alpha": 1, "beta": 2}));
        assert_eq!(stringify(&val, Some(10)), "{alpha:...");
        assert_eq!(stringify(&val, Some(100)), "{alpha:1,beta:2}");
        assert_eq!(stringify(&Value::from("abcdef"), Some(4)), "a...");
    }

    #[test]
    fn test_pathify() {
        let path = Value::from(json!(["$TOP", "a", "b.c", 1]));
        assert_eq!(pathify(&path, 0), "$TOP.a.bc.1");
        assert_eq!(pathify(&path, 1), "a.bc.1");
        assert_eq!(pathify(&path, 4), "<root>");
        assert_eq!(pathify(&Value::from("x"), 0), "x");
        assert_eq!(pathify(&Value::from(json!([])), 0), "<root>");
        assert_eq!(pathify(None::<&Value>, 0), "<unknown-path>");
        assert_eq!(pathify(&Value::from(true), 0), "<unknown-path:true>");
    }

    #[test]
    fn test_pathify_string_path_is_whole() {
        assert_eq!(pathify(&Value::from("a.b"), 0), "a.b");
        assert_eq!(pathify(&Value::from("a.b"), 1), "<root>");
        assert_eq!(pathify(&Value::from(json!(2.5)), 0), "2");
    }

    #[test]
    fn test_pathify_drops_non_keys() {
        let path = Value::from(json!(["a", 1.5, true, 2, null, "b"]));
        assert_eq!(pathify(&path, 0), "a.2.b");
        assert_eq!(pathify(&path, 3), "2.b");
    }

    #[test]
    fn test_pathify_parts() {
        assert_eq!(pathify_parts(&["$TOP", "a", "b"], 1), "a.b");
        assert_eq!(pathify_parts(&["$TOP"], 1), "<root>");
        assert_eq!(pathify_parts::<&str>(&[], 3), "<root>");
    }

    #[test]
    fn test_esc_re() {
        assert_eq!(esc_re("a.b*c"), r"a\.b\*c");
        assert_eq!(esc_re("[x](y){z}"), r"\[x\]\(y\)\{z\}");
        assert_eq!(esc_re("^$|?+\\"), r"\^\$\|\?\+\\");
        assert_eq!(esc_re("plain"), "plain");
    }

    #[test]
    fn test_esc_url() {
        assert_eq!(esc_url("a b&c=d/e"), "a%20b%26c%3Dd%2Fe");
        assert_eq!(esc_url("safe-_.*"), "safe-_.*");
        assert_eq!(esc_url("1+1"), "1%2B1");
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url(["http://a.com/", "/b/", "c"]), "http://a.com/b/c");
        assert_eq!(join_url(["http://a.com", "", "b//c", "d/"]), "http://a.com/b/c/d");
        assert_eq!(join_url(["a", "//", "b"]), "a/b");
        assert_eq!(join_url(Vec::<String>::new()), "");
    }
}
