//! Table loader with encoding and delimiter auto-detection.
//!
//! Turns uploaded bytes into a [`Table`]. Column names and row order are
//! preserved, empty cells become `null` (never the text `"nan"`), and every
//! other cell is kept verbatim as a string.

use csv::{ReaderBuilder, StringRecord};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::models::{Record, Table};

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed table
    pub table: Table,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
}

impl ParseResult {
    /// Column headers as read from the file (after de-duplication).
    pub fn headers(&self) -> &[String] {
        &self.table.columns
    }
}

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 is taken as UTF-8; anything else is left to chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "utf-8-sig" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string using the given encoding.
///
/// Latin-1 is read as Windows-1252, which agrees with it on every printable
/// character. Unknown encodings fall back to lossy UTF-8. A leading
/// byte-order mark is dropped so it never ends up inside the first header name.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoded = match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        _ => String::from_utf8_lossy(bytes).into_owned(),
    };

    match decoded.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => decoded,
    }
}

/// Detect the delimiter by counting occurrences in the header line.
///
/// Falls back to `,` when no candidate appears.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().find(|l| !l.trim().is_empty()).unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse delimited text with an explicit delimiter.
///
/// # Example
/// ```ignore
/// use pubtable::parser::parse_str;
///
/// let table = parse_str("Title,DOI\nA,10.33093/jiwe.2022.1.1.4", ',').unwrap();
/// assert_eq!(table.columns, vec!["Title", "DOI"]);
/// assert_eq!(table.rows[0]["Title"], "A");
/// ```
pub fn parse_str(content: &str, delimiter: char) -> CsvResult<Table> {
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter as u8)
        .from_reader(content.as_bytes());

    let headers = dedupe_headers(reader.headers()?);
    if headers.is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let mut table = Table::new(headers);

    for result in reader.records() {
        let record = result?;
        if is_empty_line(&record, content) {
            continue;
        }
        if record.len() > table.columns.len() {
            return Err(CsvError::Malformed {
                line: record.position().map(|p| p.line()).unwrap_or(0),
                expected: table.columns.len(),
                found: record.len(),
            });
        }

        let mut row = Record::new();
        for (i, header) in table.columns.iter().enumerate() {
            let cell = match record.get(i) {
                Some(raw) if !raw.is_empty() => Value::String(raw.to_string()),
                _ => Value::Null,
            };
            row.insert(header.clone(), cell);
        }
        table.rows.push(row);
    }

    Ok(table)
}

/// Parse bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> CsvResult<ParseResult> {
    if bytes.is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = detect_delimiter(&content);
    let table = parse_str(&content, delimiter)?;

    Ok(ParseResult {
        table,
        encoding,
        delimiter,
    })
}

/// Parse a file with auto-detection of encoding and delimiter.
pub fn parse_file_auto<P: AsRef<Path>>(path: P) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes_auto(&bytes)
}

/// Trim header names and make duplicates unique as `name.1`, `name.2`, …
fn dedupe_headers(raw: &StringRecord) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut headers = Vec::with_capacity(raw.len());

    for name in raw.iter().map(str::trim) {
        let mut candidate = name.to_string();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{}.{}", name, suffix);
            suffix += 1;
        }
        seen.insert(candidate.clone());
        headers.push(candidate);
    }

    if headers.len() == 1 && headers[0].is_empty() {
        headers.clear();
    }
    headers
}

/// True only for a record read from a line with nothing on it. A quoted
/// `""` or a whitespace-only cell is still a row.
fn is_empty_line(record: &StringRecord, content: &str) -> bool {
    if record.len() > 1 || record.iter().any(|f| !f.is_empty()) {
        return false;
    }
    let start = record.position().map(|p| p.byte() as usize).unwrap_or(0);
    content
        .get(start..)
        .map_or(true, |rest| rest.is_empty() || rest.starts_with(['\n', '\r']))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_csv() {
        let table = parse_str("name,age\nAlice,30\nBob,25", ',').unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0]["name"], "Alice");
        assert_eq!(table.rows[0]["age"], "30");
        assert_eq!(table.rows[1]["name"], "Bob");
        assert_eq!(table.rows[1]["age"], "25");
    }

    #[test]
    fn test_quoted_values_keep_delimiters() {
        let csv = "Title,DOI\n\"Robots, Automation and Sciences\",10.33093/ijoras.2023.5.1.2";
        let table = parse_str(csv, ',').unwrap();

        assert_eq!(table.rows[0]["Title"], "Robots, Automation and Sciences");
        assert_eq!(table.rows[0]["DOI"], "10.33093/ijoras.2023.5.1.2");
    }

    #[test]
    fn test_missing_values_are_null() {
        let table = parse_str("a,b,c\n1,,3\n4", ',').unwrap();

        assert_eq!(table.rows[0]["a"], "1");
        assert!(table.rows[0]["b"].is_null());
        assert_eq!(table.rows[0]["c"], "3");
        assert!(table.rows[1]["b"].is_null());
        assert!(table.rows[1]["c"].is_null());
    }

    #[test]
    fn test_cells_are_not_trimmed() {
        let table = parse_str("a,b\n  x ,y", ',').unwrap();
        assert_eq!(table.rows[0]["a"], "  x ");
    }

    #[test]
    fn test_empty_lines_skipped() {
        let table = parse_str("a,b\n1,2\n\n3,4\n", ',').unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1]["a"], "3");
    }

    #[test]
    fn test_single_column_keeps_empty_and_blank_cells() {
        let table = parse_str("DOI\n\"\"\n   \n\n10.33093/jiwe.2022.1.1.4\n", ',').unwrap();

        assert_eq!(table.len(), 3);
        assert!(table.rows[0]["DOI"].is_null());
        assert_eq!(table.rows[1]["DOI"], "   ");
        assert_eq!(table.rows[2]["DOI"], "10.33093/jiwe.2022.1.1.4");
    }

    #[test]
    fn test_extra_fields_rejected() {
        let err = parse_str("a,b\n1,2,3", ',').unwrap_err();
        match err {
            CsvError::Malformed { expected, found, .. } => {
                assert_eq!(expected, 2);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_duplicate_headers_renamed() {
        let table = parse_str("DOI,DOI,DOI\nx,y,z", ',').unwrap();
        assert_eq!(table.columns, vec!["DOI", "DOI.1", "DOI.2"]);
        assert_eq!(table.rows[0]["DOI.1"], "y");
    }

    #[test]
    fn test_header_only() {
        let table = parse_str("Title,DOI\n", ',').unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns, vec!["Title", "DOI"]);
    }

    #[test]
    fn test_empty_csv_error() {
        assert!(matches!(parse_str("", ','), Err(CsvError::EmptyFile)));
        assert!(matches!(parse_bytes_auto(b""), Err(CsvError::EmptyFile)));
    }

    #[test]
    fn test_detect_delimiter_comma() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
    }

    #[test]
    fn test_detect_delimiter_semicolon() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
    }

    #[test]
    fn test_detect_delimiter_tab() {
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
    }

    #[test]
    fn test_detect_delimiter_single_column() {
        assert_eq!(detect_delimiter("DOI\n10.33093/jiwe.2022.1.1.4"), ',');
    }

    #[test]
    fn test_auto_parse() {
        let csv = "Title;DOI\nA;10.33093/jiwe.2022.1.1.4\nB;10.33093/jiwe.2022.1.1.1";
        let result = parse_bytes_auto(csv.as_bytes()).unwrap();

        assert_eq!(result.delimiter, ';');
        assert_eq!(result.encoding, "utf-8");
        assert_eq!(result.table.len(), 2);
        assert_eq!(result.headers(), ["Title", "DOI"]);
    }

    #[test]
    fn test_bom_removed_from_first_header() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"Title,DOI\nA,B");
        let result = parse_bytes_auto(&bytes).unwrap();
        assert_eq!(result.headers()[0], "Title");
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1");
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_latin1_currency_sign() {
        // 0xA4 is the generic currency sign in Latin-1, not the euro sign
        let decoded = decode_content(&[0x31, 0x30, 0xA4], "iso-8859-1");
        assert_eq!(decoded, "10¤");
    }

    #[test]
    fn test_parse_file_missing() {
        let err = parse_file_auto("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, CsvError::Io(_)));
    }
}
