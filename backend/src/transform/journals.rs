//! Journal code table.
//!
//! The short code sits right after the registrant prefix in a DOI suffix
//! (`10.33093/jiwe.2022.1.1.4` → `jiwe`). Matching is exact and
//! case-sensitive; unknown codes have no name.

/// Known journal codes and their full names.
pub const JOURNALS: [(&str, &str); 8] = [
    ("jiwe", "Journal of Informatics and Web Engineering"),
    ("jetap", "Journal of Engineering Technology and Applied Physics"),
    ("ijoras", "International Journal on Robotics, Automation and Sciences"),
    ("ijcm", "International Journal of Creative Multimedia"),
    ("ijomfa", "International Journal of Management, Finance and Accounting"),
    ("ipbss", "Issues and Perspectives in Business and Social Sciences"),
    ("ajlp", "Asian Journal of Law and Policy"),
    ("jclc", "Journal of Communication, Language and Culture"),
];

/// Full journal name for a code, if the code is known.
pub fn journal_name(code: &str) -> Option<&'static str> {
    JOURNALS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
}

/// Human-readable listing of the table, one `code → name` per line.
pub fn journals_description() -> String {
    JOURNALS
        .iter()
        .map(|(code, name)| format!("{:<8} {}", code, name))
        .collect::<Vec<_>>()
        .join("\n")
}
