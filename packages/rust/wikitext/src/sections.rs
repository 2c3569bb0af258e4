//! Section-aware line walking.
//!
//! The walker is a small state machine over document lines: headings mutate
//! a section stack, bullet markers flush and restart statement accumulation,
//! and a terminal heading ("See also" / "References") cleanly ends the walk.
//! Every emitted statement carries a *clone* of the stack as of its bullet.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use endorsetrack_shared::{ImportConfig, RawStatement, SectionPath};

use crate::refs::RefTable;

/// Matches the `<big>'''…'''</big>` emphasis/size wrapper some editors use
/// as a pseudo-heading, with optional surrounding bold markers.
static PSEUDO_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:''')?<big>'''(?P<title>[^<']+)'''</big>(?:''')?$").expect("valid regex")
});

/// Canonical heading depth a pseudo-heading is rewritten to: one level below
/// the `===`-level headings it appears under in the corpus.
const PSEUDO_HEADING_DEPTH: usize = 4;

/// Single forward-pass walker producing `(raw text, section path)` pairs.
///
/// Instances are cheap and single-use per document; concurrent imports must
/// each use their own walker.
#[derive(Debug, Clone)]
pub struct SectionWalker {
    base_offset: usize,
    terminal_sections: Vec<String>,
}

impl SectionWalker {
    pub fn new(config: &ImportConfig) -> Self {
        Self {
            base_offset: config.heading_base_offset,
            terminal_sections: config.terminal_sections.clone(),
        }
    }

    /// Walk the document, expanding short-form references line by line, and
    /// return the ordered raw statements.
    ///
    /// Lines before the first heading are preamble and never emit anything.
    /// Template-only and link-only lines are skipped. Bullet content may
    /// span physical lines; accumulation ends at the next bullet or heading.
    pub fn walk(&self, text: &str, refs: &RefTable) -> Vec<RawStatement> {
        let mut statements: Vec<RawStatement> = Vec::new();
        let mut sections = SectionPath::new();
        let mut pending: Vec<String> = Vec::new();
        let mut pending_sections = SectionPath::new();
        let mut started = false;

        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let line = canonicalize_pseudo_heading(line);
            if !started {
                if !line.starts_with("==") {
                    continue;
                }
                started = true;
            }

            if line.starts_with("* ") || line.starts_with("==") {
                flush(&mut pending, &pending_sections, &mut statements);

                if let Some(content) = line.strip_prefix("* ") {
                    pending.push(refs.expand(content));
                    pending_sections = sections.clone();
                } else {
                    let name = line.trim_matches('=').trim();
                    if self.terminal_sections.iter().any(|t| t == name) {
                        debug!(section = name, "terminal heading reached, ending walk");
                        return statements;
                    }
                    let pairs = line.chars().take_while(|&c| c == '=').count();
                    sections.pop_to_depth(pairs.saturating_sub(self.base_offset));
                    sections.push(name);
                }
            } else {
                if line.starts_with("{{") || line.starts_with("[[") {
                    continue;
                }
                pending.push(refs.expand(&line));
                pending_sections = sections.clone();
            }
        }

        flush(&mut pending, &pending_sections, &mut statements);
        statements
    }
}

impl Default for SectionWalker {
    fn default() -> Self {
        Self::new(&ImportConfig::default())
    }
}

/// Emit the accumulated statement, if any, tagged with a copied stack.
fn flush(pending: &mut Vec<String>, sections: &SectionPath, out: &mut Vec<RawStatement>) {
    if pending.is_empty() {
        return;
    }
    let raw_text = pending.concat().trim().to_string();
    pending.clear();
    if raw_text.is_empty() {
        return;
    }
    out.push(RawStatement {
        raw_text,
        sections: sections.clone(),
    });
}

/// Rewrite a pseudo-heading line to canonical heading form; other lines pass
/// through unchanged.
fn canonicalize_pseudo_heading(line: &str) -> Cow<'_, str> {
    match PSEUDO_HEADING_RE.captures(line.trim()) {
        Some(caps) => {
            let markers = "=".repeat(PSEUDO_HEADING_DEPTH);
            Cow::Owned(format!("{markers}{}{markers}", &caps["title"]))
        }
        None => Cow::Borrowed(line),
    }
}
