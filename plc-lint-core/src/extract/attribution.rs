// Copyright line facts: marker, years and holder

use crate::types::AttributionFact;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref COPYRIGHT_MARKER: Regex =
        Regex::new(r"\([cC]\)|Copyright|[©Ⓒⓒ]").expect("valid copyright marker regex");
    static ref YEARS: Regex =
        Regex::new(r"(?P<from>[0-9]{4})(?:-(?P<to>[0-9]{4}))?").expect("valid years regex");
}

/// First line carrying a copyright marker
pub fn attribution_line(text: &str) -> Option<&str> {
    text.lines().find(|line| COPYRIGHT_MARKER.is_match(line))
}

/// `(year_from, year_to)` of the first year token; `year_to` only for ranges
pub fn years(line: &str) -> (Option<i32>, Option<i32>) {
    match YEARS.captures(line) {
        Some(caps) => (
            caps.name("from").and_then(|m| m.as_str().parse().ok()),
            caps.name("to").and_then(|m| m.as_str().parse().ok()),
        ),
        None => (None, None),
    }
}

pub fn holder(line: &str) -> Option<String> {
    let without_markers = COPYRIGHT_MARKER.replace_all(line, " ");
    let without_years = YEARS.replace_all(&without_markers, " ");
    let holder = without_years
        .trim_matches(|c: char| c == ',' || c == '-' || c == '.' || c.is_whitespace())
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    (!holder.is_empty()).then_some(holder)
}

pub fn extract(line: &str) -> AttributionFact {
    let (year_from, year_to) = years(line);
    AttributionFact {
        holder: holder(line),
        year_from,
        year_to,
    }
}

/// Case-sensitive substring match against the accepted names
pub fn holder_accepted(holder: &str, accepted: &[String]) -> bool {
    accepted.iter().any(|name| holder.contains(name.as_str()))
}
