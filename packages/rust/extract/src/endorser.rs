//! Endorser name and detail extraction.
//!
//! Strips reference tags and markup from a statement, then splits the
//! remainder into the entity name and a descriptive detail on the first
//! comma (or opening parenthesis when no comma exists).

use std::sync::LazyLock;

use regex::Regex;

/// Matches any reference tag, self-closing or inline-full. The self-closing
/// alternative comes first so adjacent text between tags survives removal.
static ANY_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(<ref[^>]*?/>|<ref[^>]*>.*?</ref>)").expect("valid regex"));

/// Matches piped links `[[Target|Shown]]`, capturing the shown text.
static PIPED_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[[^|\]]+\|(?P<shown>[^\]]+)\]\]").expect("valid regex"));

/// Matches template markup `{{…}}` (footnotes, layout helpers).
static TEMPLATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{[^}]+\}\}").expect("valid regex"));

/// Title abbreviations some pages preface representatives' names with.
const TITLE_PREFIXES: [&str; 4] = ["Rep. ", "Sen. ", "Ass. ", "Del. "];

/// Extract `(name, detail)` from one statement's markup.
///
/// The name may be absent when nothing survives stripping. The detail is
/// empty when the statement is a bare name; otherwise its first character
/// is capitalized.
pub fn extract_endorser(text: &str) -> (Option<String>, String) {
    let mut remainder = ANY_REF_RE.replace_all(text, "").into_owned();

    // Rewrite piped links to their shown text, then drop bracket markers.
    if PIPED_LINK_RE.is_match(&remainder) {
        remainder = PIPED_LINK_RE.replace_all(&remainder, "$shown").into_owned();
    }
    remainder = remainder.replace(['[', ']'], "");
    remainder = TEMPLATE_RE.replace_all(&remainder, "").into_owned();

    // Everything before the first comma (or open parenthesis, when there is
    // no comma but a paren pair exists) is the name.
    let split_char = if remainder.contains(')') && remainder.contains('(') && !remainder.contains(',')
    {
        '('
    } else {
        ','
    };
    let (head, tail) = match remainder.split_once(split_char) {
        Some((head, tail)) => (head, Some(tail)),
        None => (remainder.as_str(), None),
    };

    // Quotes decorate newspaper names; asterisks mark post-primary entries.
    let mut name = head.trim_matches([' ', '\'', '*']).to_string();
    for prefix in TITLE_PREFIXES {
        if let Some(stripped) = name.strip_prefix(prefix) {
            name = stripped.to_string();
            break;
        }
    }

    let mut detail = tail.unwrap_or("").trim_matches([' ', '*']).to_string();
    if split_char == '(' && tail.is_some() {
        detail.insert(0, '(');
    }
    if !detail.is_empty() {
        detail = capitalize_first(&detail);
    }

    let name = (!name.is_empty()).then_some(name);
    (name, detail)
}

/// Uppercase the first character, leaving the rest untouched.
fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
