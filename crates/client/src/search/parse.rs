//! Parsing of the search service's plain-text result listing.
//!
//! Results arrive as numbered, labelled lines:
//!
//! ```text
//! [1] Title: Example Domain
//! [1] URL Source: https://example.com/
//! [1] Description: This domain is for use in illustrative examples
//! [1] Date: Jan 1, 2024
//! [2] Title: ...
//! ```
//!
//! A value runs until the next line starting with `[n]`, so it may span
//! lines. `[n]` lines without a label end the value and are otherwise
//! ignored.

use std::sync::LazyLock;

use regex::Regex;

use browsekit_core::SearchHit;
use browsekit_core::provider::NOT_FOUND;

static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\[\d+\](?:[ \t]+([A-Za-z][A-Za-z ]*?):)?[ \t]*").expect("valid marker regex"));

#[derive(Default)]
struct Partial {
    url: Option<String>,
    title: Option<String>,
    description: Option<String>,
}

impl Partial {
    fn finish(self) -> SearchHit {
        let or_missing = |v: Option<String>| v.filter(|s| !s.is_empty()).unwrap_or_else(|| NOT_FOUND.to_string());
        SearchHit { url: or_missing(self.url), title: or_missing(self.title), description: or_missing(self.description) }
    }
}

/// Extract at most `max_results` hits from a result listing.
///
/// Each hit starts at a `Title:` line; text before the first one is ignored.
pub fn parse_search_results(text: &str, max_results: usize) -> Vec<SearchHit> {
    if max_results == 0 {
        return Vec::new();
    }

    let markers: Vec<(String, usize, usize)> = MARKER
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let label = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
            Some((label, whole.start(), whole.end()))
        })
        .collect();

    let mut hits = Vec::new();
    let mut current: Option<Partial> = None;

    for (idx, (label, _, value_start)) in markers.iter().enumerate() {
        let value_end = markers.get(idx + 1).map(|(_, start, _)| *start).unwrap_or(text.len());
        let value = text[*value_start..value_end].trim().to_string();

        if label == "Title" {
            if let Some(done) = current.take() {
                hits.push(done.finish());
                if hits.len() == max_results {
                    return hits;
                }
            }
            current = Some(Partial { title: Some(value), ..Default::default() });
            continue;
        }

        let Some(partial) = current.as_mut() else {
            continue;
        };
        match label.as_str() {
            "URL Source" => partial.url = Some(value),
            "Description" => partial.description = Some(value),
            _ => {}
        }
    }

    if let Some(done) = current
        && hits.len() < max_results
    {
        hits.push(done.finish());
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = "\
[1] Title: NanoGPT speedrun
[1] URL Source: https://github.com/KellerJordan/modded-nanogpt
[1] Description: Speedrunning GPT-2 training.
[1] Date: Oct 1, 2024
[2] Title: Speedrun records
[2] URL Source: https://example.com/records
[2] Description: A running list
of records, across lines.
[3] Title: Third
[3] URL Source: https://example.com/third
";

    #[test]
    fn test_parse_all_fields() {
        let hits = parse_search_results(FIXTURE, 10);
        assert_eq!(hits.len(), 3);

        assert_eq!(hits[0].title, "NanoGPT speedrun");
        assert_eq!(hits[0].url, "https://github.com/KellerJordan/modded-nanogpt");
        assert_eq!(hits[0].description, "Speedrunning GPT-2 training.");
    }

    #[test]
    fn test_multiline_description() {
        let hits = parse_search_results(FIXTURE, 10);
        assert_eq!(hits[1].description, "A running list\nof records, across lines.");
    }

    #[test]
    fn test_missing_field_is_not_found() {
        let hits = parse_search_results(FIXTURE, 10);
        assert_eq!(hits[2].url, "https://example.com/third");
        assert_eq!(hits[2].description, NOT_FOUND);
    }

    #[test]
    fn test_max_results_limits_output() {
        let hits = parse_search_results(FIXTURE, 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[1].title, "Speedrun records");

        let one = parse_search_results(FIXTURE, 1);
        assert_eq!(one.len(), 1);
    }

    #[test]
    fn test_unlabelled_line_ends_value() {
        let text = "[1] Title: One\n[1] URL Source: https://one.test/\n[1] Description: first\n\
                    [1] 42 comments\n[2] Title: Two\n[2] 2024-05-01\n[2] URL Source: https://two.test/\n";
        let hits = parse_search_results(text, 5);

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].description, "first");
        assert_eq!(hits[1].title, "Two");
        assert_eq!(hits[1].url, "https://two.test/");
    }

    #[test]
    fn test_preamble_ignored() {
        let text = "Some banner text\n[1] Title: Only\n[1] URL Source: https://only.test/\n";
        let hits = parse_search_results(text, 5);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].url, "https://only.test/");
        assert_eq!(hits[0].description, NOT_FOUND);
    }

    #[test]
    fn test_no_results() {
        assert!(parse_search_results("", 3).is_empty());
        assert!(parse_search_results("nothing matched your query", 3).is_empty());
    }
}
