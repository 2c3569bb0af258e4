//! Splitting one bullet line into independent per-entity statements.
//!
//! Hand-authored lines often name several endorsers, each followed by its
//! own reference tag. Each {name}{separator}{reference} run becomes one
//! statement; a line with no such runs is itself the single statement.

use std::sync::LazyLock;

use regex::Regex;

/// One {entity-name-like text}{optional separator}{reference tag} run.
///
/// Entity-name-like text is either bracketed link text (at least five
/// characters, optional trailing parenthetical) or a short run of letters,
/// spaces, periods, and hyphens.
static STATEMENT_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(\[\[[^\]]{5,}\]\]( \([^)]+\))?|[A-Za-z .\-()]+)(, ?| and |)(<ref name="[^"]+" ?/>|<ref[^<]+?</ref>)"#,
    )
    .expect("valid regex")
});

/// A leading `Label: ` prefix (letters/spaces, colon-terminated) marking a
/// shared role for every endorser on the line.
static LABEL_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<label>[A-Za-z][A-Za-z ]*): ").expect("valid regex"));

/// Split a bullet line into independent statements.
///
/// Returns the detected label (if any) and the statements. The label is not
/// split at top level; callers append it to each statement's section path.
/// Zero runs means the whole remainder is the single statement.
pub fn split_statements(line: &str) -> (Option<String>, Vec<String>) {
    let (label, remainder) = match LABEL_PREFIX_RE.captures(line) {
        Some(caps) => (
            Some(caps["label"].trim().to_string()),
            &line[caps[0].len()..],
        ),
        None => (None, line),
    };

    let mut statements: Vec<String> = STATEMENT_RUN_RE
        .find_iter(remainder)
        .map(|m| m.as_str().trim().to_string())
        .collect();

    if statements.is_empty() {
        statements.push(remainder.trim().to_string());
    }

    (label, statements)
}
