//! Named reference definitions and short-form expansion.
//!
//! A document defines a reference once with a full tag
//! (`<ref name="X">…</ref>`) and reuses it with self-closing usages
//! (`<ref name="X" />`). The [`RefTable`] collects the definitions in one
//! pass so that usages anywhere in the document can be inlined, even when
//! the definition appears later than its first use.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// Matches a full definition tag: `<ref name="X">body</ref>`.
/// Quotes around the name are optional when it contains no spaces.
static REF_DEFINITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<ref name=("(?P<quoted>[^"]+?)"|(?P<bare>[^ /"]+?))>[^<]+</ref>"#)
        .expect("valid regex")
});

/// Matches a self-closing usage: `<ref name="X" />` or `<ref name=X/>`.
static REF_USAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<ref name=("(?P<quoted>[^"]+)?"|(?P<bare>[^ ]+?)) ?/>"#).expect("valid regex")
});

/// Document-scoped table of named reference definitions.
///
/// Built once per document and immutable afterwards. Later definitions with
/// the same name overwrite earlier ones; last-wins is intentional.
#[derive(Debug, Default)]
pub struct RefTable {
    definitions: HashMap<String, String>,
}

impl RefTable {
    /// Collect every named full-tag definition from the document.
    /// Self-closing usages are excluded.
    pub fn collect(text: &str) -> Self {
        let mut definitions = HashMap::new();
        for line in text.lines() {
            for caps in REF_DEFINITION_RE.captures_iter(line) {
                let name = caps
                    .name("quoted")
                    .or_else(|| caps.name("bare"))
                    .map(|m| m.as_str().to_string());
                if let Some(name) = name {
                    definitions.insert(name, caps[0].to_string());
                }
            }
        }
        debug!(count = definitions.len(), "collected reference definitions");
        Self { definitions }
    }

    /// Look up the full tag text for a name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.definitions.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Replace every self-closing usage on the line with its definition body.
    ///
    /// Unknown names are left untouched, as are all other tag forms.
    /// Idempotent: definitions are full tags, which the usage pattern never
    /// matches, so re-expanding an already-expanded line is a no-op.
    pub fn expand(&self, line: &str) -> String {
        let mut expanded = line.to_string();
        for caps in REF_USAGE_RE.captures_iter(line) {
            let name = match caps.name("quoted").or_else(|| caps.name("bare")) {
                Some(m) => m.as_str(),
                None => continue,
            };
            if let Some(definition) = self.definitions.get(name) {
                expanded = expanded.replace(&caps[0], definition);
            }
        }
        expanded
    }
}
