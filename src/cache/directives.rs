//! Cache-Control and Vary header field parsing
//!
//! Tokenization is quote-aware: commas inside a double-quoted region do
//! not split tokens, so `private="X-Foo,X-Bar"` stays one directive. This
//! is a two-state scanner, deliberately not a regex.

use std::collections::BTreeMap;

/// Integer directive values are clamped to this range.
const DIRECTIVE_MAX: i64 = 1 << 31;

/// Split `value` on `,`, except inside double-quoted regions. Tokens are
/// trimmed; empty tokens are dropped.
#[must_use]
pub fn split_quote_aware(value: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in value.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            ',' if !in_quotes => {
                let token = current.trim();
                if !token.is_empty() {
                    tokens.push(token.to_string());
                }
                current.clear();
            }
            _ => current.push(c),
        }
    }

    let token = current.trim();
    if !token.is_empty() {
        tokens.push(token.to_string());
    }

    tokens
}

/// Parsed `Cache-Control` field.
///
/// Known flag directives become booleans, known integer directives become
/// clamped integers, and anything else is preserved in `extensions` where
/// the decision engine ignores it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheControl {
    pub no_store: bool,
    pub no_cache: bool,
    pub must_revalidate: bool,
    pub public: bool,
    pub private: bool,
    pub max_age: Option<i64>,
    pub s_maxage: Option<i64>,
    pub max_stale: Option<i64>,
    pub min_fresh: Option<i64>,
    /// Unrecognized directives, name → value (`None` for bare flags).
    pub extensions: BTreeMap<String, Option<String>>,
}

impl CacheControl {
    /// Parse one or more `Cache-Control` field values. Multiple field
    /// values are concatenated with `,` before tokenizing.
    #[must_use]
    pub fn parse<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let joined = values.into_iter().collect::<Vec<_>>().join(",");
        let mut cc = CacheControl::default();

        for token in split_quote_aware(&joined) {
            let (name, value) = match token.split_once('=') {
                Some((name, value)) => {
                    let value = value.trim().trim_matches('"').to_string();
                    (name.trim().to_lowercase(), Some(value))
                }
                None => (token.to_lowercase(), None),
            };

            match name.as_str() {
                "no-store" => cc.no_store = true,
                "no-cache" => cc.no_cache = true,
                "must-revalidate" => cc.must_revalidate = true,
                "public" => cc.public = true,
                "private" => cc.private = true,
                "max-age" => cc.max_age = Some(parse_directive_int(value.as_deref())),
                "s-maxage" => cc.s_maxage = Some(parse_directive_int(value.as_deref())),
                "max-stale" => cc.max_stale = Some(parse_directive_int(value.as_deref())),
                "min-fresh" => cc.min_fresh = Some(parse_directive_int(value.as_deref())),
                _ => {
                    cc.extensions.insert(name, value);
                }
            }
        }

        cc
    }
}

/// Base-10 integer coercion: non-numeric values become 0, then the result
/// is clamped to `[0, 2^31]`.
fn parse_directive_int(value: Option<&str>) -> i64 {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(0)
        .clamp(0, DIRECTIVE_MAX)
}

/// Parse `Vary` field values into an ordered, lowercased, deduplicated
/// list of header names. `*` is carried through verbatim.
#[must_use]
pub fn parse_vary<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let joined = values.into_iter().collect::<Vec<_>>().join(",");
    let mut names: Vec<String> = Vec::new();

    for token in split_quote_aware(&joined) {
        let name = token.to_lowercase();
        if !names.contains(&name) {
            names.push(name);
        }
    }

    names
}
