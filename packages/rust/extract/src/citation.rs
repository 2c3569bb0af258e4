//! Citation metadata parsing from embedded reference bodies.
//!
//! Three citation shapes appear in the corpus, tried in this order for each
//! inline-full reference: `{{cite …}}` templates, bare URLs, and bracketed
//! external links. Fields are filled first-success-wins: a later reference
//! may fill a field an earlier one left unset, but never overwrites one.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use endorsetrack_shared::{Citation, EndorseTrackError, Result};

/// Matches inline-full reference tags and captures the body. The attribute
/// class excludes `/`, so self-closing usages never match.
static INLINE_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<ref( [^>/]*)?>(?P<body>.*?)</ref>").expect("valid regex"));

/// Template keys holding the publication name, in priority order.
const NAME_KEYS: [&str; 4] = ["publisher", "work", "website", "newspaper"];

/// Template keys holding the citation date, in priority order.
const DATE_KEYS: [&str; 3] = ["date", "accessdate", "access-date"];

/// Year suffixes that mark trailing bracketed-link text as a date.
const TRAILING_YEAR_SUFFIXES: [&str; 2] = [" 2015", " 2016"];

/// Length and prefix of the compact numeric (`YYYY-MM-DD`) trailing date.
const COMPACT_DATE_LEN: usize = 10;
const COMPACT_DATE_PREFIX: &str = "201";

/// Parse every inline-full reference in the statement into citation fields.
///
/// References whose body matches none of the known shapes are skipped with
/// their fields left absent; the statement is still emitted.
pub fn extract_citation(text: &str) -> Citation {
    let mut citation = Citation::default();

    for caps in INLINE_REF_RE.captures_iter(text) {
        let body = caps.name("body").map(|m| m.as_str()).unwrap_or("");
        match fields_from_body(body) {
            Ok(fields) => merge_unset(&mut citation, fields),
            Err(e) => {
                debug!(error = %e, "skipping unrecognized reference body");
            }
        }
    }

    // Publisher names are sometimes wiki-linked; drop the brackets.
    if let Some(name) = citation.name.take() {
        let name = name.trim_matches(['[', ']']).to_string();
        if !name.is_empty() {
            citation.name = Some(name);
        }
    }

    citation
}

/// Classify one reference body and extract its fields.
fn fields_from_body(body: &str) -> Result<Citation> {
    if body.to_lowercase().starts_with("{{cite ") {
        Ok(cite_template_fields(body))
    } else if body.starts_with("http") {
        Ok(Citation {
            url: Some(body.to_string()),
            ..Default::default()
        })
    } else if body.contains("[http") && body.contains(']') {
        Ok(bracketed_link_fields(body))
    } else {
        Err(EndorseTrackError::parse(format!(
            "reference body matches no citation shape: {body:?}"
        )))
    }
}

/// `{{cite …| k = v | …}}`: split on `|`, each part on the first `=`,
/// keys lower-cased and trimmed, empty values dropped.
fn cite_template_fields(body: &str) -> Citation {
    let mut values: HashMap<String, String> = HashMap::new();
    for part in body.trim_matches('}').split('|') {
        let part = part.trim();
        let (key, value) = part.split_once('=').unwrap_or((part, ""));
        let key = key.trim().to_lowercase();
        let value = value.trim();
        if !value.is_empty() {
            values.insert(key, value.to_string());
        }
    }

    let first_of = |keys: &[&str]| {
        keys.iter()
            .find_map(|k| values.get(*k))
            .map(String::to_string)
    };

    Citation {
        url: values.get("url").cloned(),
        name: first_of(&NAME_KEYS),
        date_raw: first_of(&DATE_KEYS),
    }
}

/// `[url text] trailer`: url up to the first space, trailer captured as a
/// raw date when it looks like one, remaining link text as the name.
fn bracketed_link_fields(body: &str) -> Citation {
    let open = match body.find('[') {
        Some(i) => i,
        None => return Citation::default(),
    };
    let close = match body.find(']') {
        Some(i) if i > open => i,
        _ => return Citation::default(),
    };
    let link = &body[open + 1..close];

    // Text after the closing bracket may be a date.
    let trailer = body[close + 1..].trim_matches([' ', '.']);
    let date_raw = if !trailer.contains('.')
        && ((trailer.len() == COMPACT_DATE_LEN && trailer.starts_with(COMPACT_DATE_PREFIX))
            || TRAILING_YEAR_SUFFIXES.iter().any(|s| trailer.ends_with(s)))
    {
        Some(trailer.to_string())
    } else {
        None
    };

    // The first space splits the URL from the link text.
    let (url, link_text) = link.split_once(' ').unwrap_or((link, ""));

    // With a date the whole link text is the name; otherwise only the
    // pre-comma portion is usable (and no comma means no name at all).
    let name = if date_raw.is_some() {
        Some(link_text.to_string())
    } else {
        link_text
            .contains(',')
            .then(|| link_text.split(',').next().unwrap_or("").to_string())
    };

    Citation {
        url: Some(url.to_string()),
        name: name.filter(|n| !n.is_empty()),
        date_raw,
    }
}

/// Fill only the still-unset fields of `citation` from `fields`.
fn merge_unset(citation: &mut Citation, fields: Citation) {
    if citation.url.is_none() {
        citation.url = fields.url;
    }
    if citation.name.is_none() {
        citation.name = fields.name;
    }
    if citation.date_raw.is_none() {
        citation.date_raw = fields.date_raw;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cite_template_priority_lists() {
        let citation = extract_citation(
            "<ref>{{cite web|url=http://example.com/a|title=T|website=Site|newspaper=Paper\
             |accessdate=July 18, 2016|date=January 1, 2016}}</ref>",
        );
        assert_eq!(citation.url.as_deref(), Some("http://example.com/a"));
        // website outranks newspaper; date outranks accessdate.
        assert_eq!(citation.name.as_deref(), Some("Site"));
        assert_eq!(citation.date_raw.as_deref(), Some("January 1, 2016"));
    }

    #[test]
    fn empty_template_values_are_dropped() {
        let citation = extract_citation(
            "<ref>{{cite web|url=http://example.com/a|publisher=|work=The Work|date=}}</ref>",
        );
        assert_eq!(citation.name.as_deref(), Some("The Work"));
        assert!(citation.date_raw.is_none());
    }

    #[test]
    fn later_reference_fills_unset_fields_only() {
        let citation = extract_citation(
            "<ref>{{cite web|url=http://example.com/first|work=First Work}}</ref>\
             <ref>[http://example.com/second Second Name] 2016-01-02.</ref>",
        );
        // url and name came from the first tag and are not overwritten,
        // but the date was still unset and the second tag may fill it.
        assert_eq!(citation.url.as_deref(), Some("http://example.com/first"));
        assert_eq!(citation.name.as_deref(), Some("First Work"));
        assert_eq!(citation.date_raw.as_deref(), Some("2016-01-02"));
    }

    #[test]
    fn self_closing_references_are_ignored() {
        let citation = extract_citation("[[Jane Doe]]<ref name=\"a\" /><ref name=b/>");
        assert_eq!(citation, Citation::default());
    }

    #[test]
    fn unrecognized_body_leaves_fields_absent() {
        let citation = extract_citation("<ref>personal communication</ref>");
        assert_eq!(citation, Citation::default());
    }

    #[test]
    fn interior_period_in_trailer_is_not_a_date() {
        // A period inside the trailer marks prose, not a date.
        let citation = extract_citation(
            "<ref>[http://example.com/a Gazette] Retrieved Nov. 1, 2016</ref>",
        );
        assert_eq!(citation.url.as_deref(), Some("http://example.com/a"));
        assert!(citation.date_raw.is_none());
        // And without a date or a comma, the link text yields no name.
        assert!(citation.name.is_none());
    }

    #[test]
    fn linked_publisher_name_loses_brackets() {
        let citation = extract_citation(
            "<ref>{{cite news|url=http://example.com/dc|work=[[The Daily Caller]]}}</ref>",
        );
        assert_eq!(citation.name.as_deref(), Some("The Daily Caller"));
    }
}
