//! Per-statement parsing: citation metadata, endorser name/detail, dates.
//!
//! Input is one statement's raw markup (already expanded and split). Every
//! stage is best-effort: an unparseable reference or date leaves its fields
//! absent and the statement is still emitted for downstream human review.

mod citation;
mod dates;
mod endorser;

use tracing::debug;

use endorsetrack_shared::ParsedStatement;

pub use citation::extract_citation;
pub use dates::normalize_date;
pub use endorser::extract_endorser;

/// Parse one statement into its canonical structured form.
///
/// Combines the citation extractor, the name/detail extractor, and the date
/// normalizer. A raw date that fails its chosen grammar is downgraded to an
/// absent `endorsed_on`, never an error.
pub fn parse_statement(text: &str) -> ParsedStatement {
    let citation = extract_citation(text);
    let (endorser_name, endorser_detail) = extract_endorser(text);

    let endorsed_on = citation.date_raw.as_deref().and_then(|raw| {
        match normalize_date(raw) {
            Ok(date) => Some(date),
            Err(e) => {
                debug!(error = %e, "unparseable citation date, leaving absent");
                None
            }
        }
    });

    ParsedStatement {
        endorser_name,
        endorser_detail,
        citation,
        endorsed_on,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn linked_name_with_cite_news() {
        let parsed = parse_statement(
            "[[Melania Trump]]<ref>{{cite news| url = http://example.com/victory| \
             title = Victory speech| website = CNN| access-date = February 29, 2016}}</ref>",
        );
        assert_eq!(parsed.endorser_name.as_deref(), Some("Melania Trump"));
        assert_eq!(parsed.endorser_detail, "");
        assert_eq!(
            parsed.citation.url.as_deref(),
            Some("http://example.com/victory")
        );
        assert_eq!(parsed.citation.name.as_deref(), Some("CNN"));
        assert_eq!(parsed.endorsed_on, Some(date(2016, 2, 29)));
    }

    #[test]
    fn detail_after_comma_is_capitalized() {
        let parsed = parse_statement(
            "[[Paul Teutul Sr.]], Co. founder of [[Orange County Choppers]]\
             <ref>{{cite web|url=http://example.com/chopper|title=Chopper star endorses \
             |publisher=TheHill |date= |accessdate=February 25, 2016}}</ref>",
        );
        assert_eq!(parsed.endorser_name.as_deref(), Some("Paul Teutul Sr."));
        assert_eq!(
            parsed.endorser_detail,
            "Co. founder of Orange County Choppers"
        );
        assert_eq!(parsed.citation.name.as_deref(), Some("TheHill"));
        // Empty |date= is dropped; accessdate fills the raw date instead.
        assert_eq!(parsed.endorsed_on, Some(date(2016, 2, 25)));
    }

    #[test]
    fn first_full_reference_wins_over_later_ones() {
        let parsed = parse_statement(
            "[[Bob Knight]]<ref name=ATH /><ref>{{cite news | url = http://example.com/knight \
             | title = Knight endorses | first = Des | last = Bieler | date = April 28, 2016 \
             | work = [[The Washington Post]] | accessdate = October 23, 2016 }}</ref>",
        );
        assert_eq!(parsed.endorser_name.as_deref(), Some("Bob Knight"));
        assert_eq!(parsed.endorser_detail, "");
        // The self-closing ref has no body; the cite fills every field, and
        // the bracketed work name loses its link markers.
        assert_eq!(parsed.citation.name.as_deref(), Some("The Washington Post"));
        assert_eq!(parsed.endorsed_on, Some(date(2016, 4, 28)));
    }

    #[test]
    fn trailing_text_after_reference_joins_the_detail() {
        let parsed = parse_statement(
            "[[Ben Stein]], actor and political commentator; speechwriter for \
             [[Richard Nixon]] and [[Gerald Ford]]<ref>{{cite news|title=Stein must go\
             |url=http://example.com/stein |access-date=October 9, 2016|work=CBS News}}</ref> \
             (''retracted October 9, 2016'')",
        );
        assert_eq!(parsed.endorser_name.as_deref(), Some("Ben Stein"));
        assert_eq!(
            parsed.endorser_detail,
            "Actor and political commentator; speechwriter for Richard Nixon and Gerald Ford \
             (''retracted October 9, 2016'')"
        );
        assert_eq!(parsed.citation.name.as_deref(), Some("CBS News"));
        assert_eq!(parsed.endorsed_on, Some(date(2016, 10, 9)));
    }

    #[test]
    fn bare_url_reference_fills_url_only() {
        let parsed = parse_statement(
            "J.D. Vance, author of ''[[Hillbilly Elegy]]''\
             <ref>https://example.com/jdv/status/790313275338526720</ref>",
        );
        assert_eq!(parsed.endorser_name.as_deref(), Some("J.D. Vance"));
        assert_eq!(parsed.endorser_detail, "Author of ''Hillbilly Elegy''");
        assert_eq!(
            parsed.citation.url.as_deref(),
            Some("https://example.com/jdv/status/790313275338526720")
        );
        assert!(parsed.citation.name.is_none());
        assert!(parsed.endorsed_on.is_none());
    }

    #[test]
    fn bracketed_link_with_trailing_year_date() {
        let parsed = parse_statement(
            "[[Diamond and Silk]]<ref>[https://example.com/watch?v=-piJWc_6Lqc \
             Former Democrats Stump. Fox Business, Varney and Co.] January 8, 2016</ref>",
        );
        assert_eq!(parsed.endorser_name.as_deref(), Some("Diamond and Silk"));
        assert_eq!(
            parsed.citation.url.as_deref(),
            Some("https://example.com/watch?v=-piJWc_6Lqc")
        );
        // A captured date keeps the whole link text as the name.
        assert_eq!(
            parsed.citation.name.as_deref(),
            Some("Former Democrats Stump. Fox Business, Varney and Co.")
        );
        assert_eq!(parsed.endorsed_on, Some(date(2016, 1, 8)));
    }

    #[test]
    fn bracketed_link_without_date_takes_pre_comma_name() {
        let parsed = parse_statement(
            "[[William F. B. O'Reilly]], The publisher of the conservative newsblog the \
             \"Blackberry Alarm Clock\".<ref>[http://example.com/writeins Newsday, Updated \
             November 5, 2016 12:03 PM]</ref>",
        );
        assert_eq!(
            parsed.endorser_name.as_deref(),
            Some("William F. B. O'Reilly")
        );
        assert_eq!(
            parsed.endorser_detail,
            "The publisher of the conservative newsblog the \"Blackberry Alarm Clock\"."
        );
        assert_eq!(parsed.citation.name.as_deref(), Some("Newsday"));
        assert!(parsed.endorsed_on.is_none());
    }

    #[test]
    fn bracketed_link_without_date_or_comma_has_no_name() {
        let parsed = parse_statement(
            "Rick Moore, mayor of [[Payson, Utah]]<ref>Katie England, \
             [http://example.com/moore Presidential campaign has momentum], \
             ''Daily Herald'' (October 31, 2016).</ref>",
        );
        assert_eq!(parsed.endorser_name.as_deref(), Some("Rick Moore"));
        assert_eq!(parsed.endorser_detail, "Mayor of Payson, Utah");
        assert_eq!(
            parsed.citation.url.as_deref(),
            Some("http://example.com/moore")
        );
        assert!(parsed.citation.name.is_none());
        assert!(parsed.endorsed_on.is_none());
    }

    #[test]
    fn compact_numeric_trailing_date() {
        let parsed = parse_statement(
            "[[Team Love Records]]*<ref>Team Love Records. \
             [https://example.com/tlr/status/770625825985167360 Twitter] 2016-08-30.</ref>",
        );
        assert_eq!(parsed.endorser_name.as_deref(), Some("Team Love Records"));
        assert_eq!(parsed.citation.name.as_deref(), Some("Twitter"));
        assert_eq!(parsed.endorsed_on, Some(date(2016, 8, 30)));
    }

    #[test]
    fn footnote_template_is_stripped_from_the_name() {
        let parsed = parse_statement(
            "[[Michael Savage]]{{efn|name=a}}<ref>{{cite web |last1=Unruh |first1=Bob \
             |title=Savage acclaim |url=http://example.com/savage |website=WDN \
             |accessdate=July 12, 2015 |date=July 10, 2015}}</ref>",
        );
        assert_eq!(parsed.endorser_name.as_deref(), Some("Michael Savage"));
        assert_eq!(parsed.endorser_detail, "");
        assert_eq!(parsed.citation.name.as_deref(), Some("WDN"));
        assert_eq!(parsed.endorsed_on, Some(date(2015, 7, 10)));
    }

    #[test]
    fn title_prefix_and_parenthetical_detail() {
        let parsed = parse_statement(
            "Rep. [[Erroll Davis]] (1971–72)<ref name=\"LR\">Przybyla, H. \
             [http://example.com/business USA Today] 2016-06-23.</ref>",
        );
        assert_eq!(parsed.endorser_name.as_deref(), Some("Erroll Davis"));
        assert_eq!(parsed.endorser_detail, "(1971–72)");
        assert_eq!(parsed.citation.name.as_deref(), Some("USA Today"));
        assert_eq!(parsed.endorsed_on, Some(date(2016, 6, 23)));
    }

    #[test]
    fn piped_link_detail_keeps_shown_text() {
        let parsed = parse_statement(
            "[[Joseph E. Schmitz]],{{efn|name=a}} [[Office of the Inspector General, \
             U.S. Department of Defense|Inspector General]] (2002–05)\
             <ref name=\"pr\">{{cite web|url=http://example.com/team|title=Foreign policy team\
             |author=Philip Rucker|date=March 21, 2016|work=Washington Post\
             |accessdate=March 26, 2016}}</ref>",
        );
        assert_eq!(parsed.endorser_name.as_deref(), Some("Joseph E. Schmitz"));
        assert_eq!(parsed.endorser_detail, "Inspector General (2002–05)");
        assert_eq!(parsed.citation.name.as_deref(), Some("Washington Post"));
        assert_eq!(parsed.endorsed_on, Some(date(2016, 3, 21)));
    }

    #[test]
    fn no_markup_survives_into_name_or_detail() {
        let statements = [
            "[[Gene Keady]]<ref name=ATH /><ref name=\"dc\">{{cite news | url = \
             http://example.com/legends | date = 2016-05-03 | work = [[The Daily Caller]] \
             | accessdate = 2016-10-24 }}</ref>",
            "''[[Daily Herald (Utah)|Daily Herald]]'' <ref>{{Cite news\
             |url=http://example.com/herald|title=Editorial|newspaper=Daily Herald\
             |access-date=2016-10-31}}</ref>",
        ];
        for statement in statements {
            let parsed = parse_statement(statement);
            let name = parsed.endorser_name.unwrap_or_default();
            for marker in ["[[", "]]", "{{", "}}", "<ref"] {
                assert!(!name.contains(marker), "{marker} in name {name:?}");
                assert!(
                    !parsed.endorser_detail.contains(marker),
                    "{marker} in detail {:?}",
                    parsed.endorser_detail
                );
            }
        }
    }

    #[test]
    fn unparseable_date_leaves_endorsed_on_absent() {
        let parsed = parse_statement(
            "[[Jane Doe]]<ref>{{cite web|url=http://example.com/x|work=The Sun\
             |date=sometime in fall}}</ref>",
        );
        assert_eq!(parsed.citation.date_raw.as_deref(), Some("sometime in fall"));
        assert!(parsed.endorsed_on.is_none());
        // The statement is still fully emitted otherwise.
        assert_eq!(parsed.citation.name.as_deref(), Some("The Sun"));
    }
}
