//! Positional view over a DOI string.
//!
//! DOIs handled here follow `10.<registrant>/<code>.<year>.<volume>.<issue>.<no>`,
//! e.g. `10.33093/jiwe.2022.1.1.4`. Segments are counted on the dot split of
//! the whole string, so the leading `10` is segment 0 and
//! `33093/jiwe` is segment 1. Nothing is validated: a segment that does not
//! exist is simply `None`.

use super::journals::journal_name;
use super::sort::{parse_component, SortKey};

/// Resolver prefix for DOI links.
pub const DOI_URL_PREFIX: &str = "https://doi.org/";

/// Dot-split positions of the derived fields.
pub const YEAR_SEGMENT: usize = 2;
pub const VOLUME_SEGMENT: usize = 3;
pub const ISSUE_SEGMENT: usize = 4;

/// Borrowed, non-empty DOI string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Doi<'a> {
    raw: &'a str,
}

impl<'a> Doi<'a> {
    /// Wrap a DOI. Empty strings yield `None`.
    pub fn parse(raw: &'a str) -> Option<Self> {
        if raw.is_empty() {
            None
        } else {
            Some(Self { raw })
        }
    }

    /// Dot-separated segments of the whole string.
    pub fn segments(&self) -> impl Iterator<Item = &'a str> {
        self.raw.split('.')
    }

    pub fn segment(&self, index: usize) -> Option<&'a str> {
        self.segments().nth(index)
    }

    /// Text after the last dot (the whole string when there is none).
    pub fn last_segment(&self) -> &'a str {
        self.raw.rsplit('.').next().unwrap_or(self.raw)
    }

    /// First dot segment of the part after the first `/`.
    pub fn journal_code(&self) -> Option<&'a str> {
        self.raw
            .split('/')
            .nth(1)
            .and_then(|suffix| suffix.split('.').next())
    }

    pub fn journal_name(&self) -> Option<&'static str> {
        self.journal_code().and_then(journal_name)
    }

    pub fn year(&self) -> Option<&'a str> {
        self.segment(YEAR_SEGMENT)
    }

    pub fn volume(&self) -> Option<&'a str> {
        self.segment(VOLUME_SEGMENT)
    }

    pub fn issue(&self) -> Option<&'a str> {
        self.segment(ISSUE_SEGMENT)
    }

    /// Resolver URL for this DOI.
    pub fn url(&self) -> String {
        format!("{}{}", DOI_URL_PREFIX, self.raw)
    }

    /// Citation sort key from segments 2..=5.
    pub fn sort_key(&self) -> SortKey {
        let mut parts = [None; 4];
        for (slot, segment) in parts.iter_mut().zip(self.segments().skip(YEAR_SEGMENT)) {
            *slot = parse_component(segment);
        }
        SortKey(parts)
    }
}

/// Sort key for an optional DOI string; empty or absent DOIs sort last.
pub fn sort_key_of(raw: &str) -> SortKey {
    Doi::parse(raw).map(|d| d.sort_key()).unwrap_or(SortKey::ABSENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "10.33093/jiwe.2022.1.1.4";

    #[test]
    fn test_positional_fields() {
        let doi = Doi::parse(SAMPLE).unwrap();

        assert_eq!(doi.last_segment(), "4");
        assert_eq!(doi.journal_code(), Some("jiwe"));
        assert_eq!(
            doi.journal_name(),
            Some("Journal of Informatics and Web Engineering")
        );
        assert_eq!(doi.year(), Some("2022"));
        assert_eq!(doi.volume(), Some("1"));
        assert_eq!(doi.issue(), Some("1"));
        assert_eq!(doi.url(), "https://doi.org/10.33093/jiwe.2022.1.1.4");
    }

    #[test]
    fn test_sort_key() {
        let key = Doi::parse(SAMPLE).unwrap().sort_key();
        assert_eq!(key, SortKey([Some(2022), Some(1), Some(1), Some(4)]));
    }

    #[test]
    fn test_empty_is_none() {
        assert!(Doi::parse("").is_none());
        assert_eq!(sort_key_of(""), SortKey::ABSENT);
    }

    #[test]
    fn test_short_doi_has_missing_segments() {
        let doi = Doi::parse("10.1000/abc").unwrap();

        assert_eq!(doi.last_segment(), "1000/abc");
        assert_eq!(doi.journal_code(), Some("abc"));
        assert_eq!(doi.journal_name(), None);
        assert_eq!(doi.year(), None);
        assert_eq!(doi.volume(), None);
        assert_eq!(doi.issue(), None);
        assert_eq!(doi.sort_key(), SortKey::ABSENT);
    }

    #[test]
    fn test_no_slash_means_no_journal_code() {
        let doi = Doi::parse("not-a-doi").unwrap();
        assert_eq!(doi.journal_code(), None);
        assert_eq!(doi.last_segment(), "not-a-doi");
        assert_eq!(doi.url(), "https://doi.org/not-a-doi");
    }

    #[test]
    fn test_non_numeric_segment_in_key() {
        let key = sort_key_of("10.33093/jiwe.2022.x.1.4");
        assert_eq!(key, SortKey([Some(2022), None, Some(1), Some(4)]));
    }
}
