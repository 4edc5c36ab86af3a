//! Record enricher: raw upload table → enriched table in citation order.
//!
//! # Steps
//!
//! 1. Coerce `DOI` cells to strings (missing → `""`) when the column exists.
//! 2. Add every fixed output column that is missing (all null) and move the
//!    fixed columns to the front in declared order.
//! 3. Derive `No`, `Journal Name`, `Year Published`, `Volume`, `Issues` and
//!    `DOI/URL` from each row's DOI; copy `Title` into `Paper Title` and
//!    drop `Title`.
//! 4. Fold the per-author column triples into
//!    `Full Authors (Institution published)`.
//! 5. Stable sort by the DOI sort key.
//! 6. Renumber `No (All)` as 1..N.
//!
//! The function is pure and infallible: a malformed DOI only produces null
//! derived cells and a row that sorts last.

use serde_json::Value;

use super::authors;
use super::doi::{sort_key_of, Doi};
use super::sort::sort_records;
use crate::models::{
    cell_to_string, text_or_null, Record, Table, COL_DOI, COL_DOI_URL, COL_FULL_AUTHORS,
    COL_ISSUES, COL_JOURNAL_NAME, COL_NO, COL_NO_ALL, COL_PAPER_TITLE, COL_TITLE, COL_VOLUME,
    COL_YEAR_PUBLISHED, FIXED_COLUMNS,
};

/// Enrich and sort a table.
///
/// # Example
///
/// ```rust,ignore
/// use serde_json::json;
/// use pubtable::{enrich, Table};
///
/// let table = Table::from_records(vec![json!({"DOI": "10.33093/jiwe.2022.1.1.4"})]);
/// let out = enrich(table);
/// assert_eq!(out.rows[0]["Journal Name"], "Journal of Informatics and Web Engineering");
/// ```
pub fn enrich(mut table: Table) -> Table {
    if table.has_column(COL_DOI) {
        stringify_doi(&mut table);
    }

    for column in FIXED_COLUMNS {
        table.add_column(column, Value::Null);
    }
    table.reorder(&FIXED_COLUMNS);

    let has_title = table.has_column(COL_TITLE);
    for row in &mut table.rows {
        derive_from_doi(row);
        let title = if has_title {
            row.get(COL_TITLE).cloned().unwrap_or(Value::Null)
        } else {
            Value::Null
        };
        row.insert(COL_PAPER_TITLE.to_string(), title);
    }
    if has_title {
        table.remove_column(COL_TITLE);
    }

    authors::aggregate_into(&mut table, COL_FULL_AUTHORS);

    table.rows = sort_records(std::mem::take(&mut table.rows), |row| {
        sort_key_of(&doi_text(row))
    });

    for (i, row) in table.rows.iter_mut().enumerate() {
        row.insert(COL_NO_ALL.to_string(), Value::from(i as u64 + 1));
    }

    table
}

fn stringify_doi(table: &mut Table) {
    for row in &mut table.rows {
        let text = row.get(COL_DOI).map(cell_to_string).unwrap_or_default();
        row.insert(COL_DOI.to_string(), Value::String(text));
    }
}

fn doi_text(row: &Record) -> String {
    row.get(COL_DOI).map(cell_to_string).unwrap_or_default()
}

/// Overwrite the DOI-derived cells of one row.
fn derive_from_doi(row: &mut Record) {
    let raw = doi_text(row);
    let doi = Doi::parse(&raw);

    let derived = [
        (COL_NO, doi.map(|d| d.last_segment().to_string())),
        (COL_JOURNAL_NAME, doi.and_then(|d| d.journal_name()).map(String::from)),
        (COL_YEAR_PUBLISHED, doi.and_then(|d| d.year()).map(String::from)),
        (COL_VOLUME, doi.and_then(|d| d.volume()).map(String::from)),
        (COL_ISSUES, doi.and_then(|d| d.issue()).map(String::from)),
        (COL_DOI_URL, doi.map(|d| d.url())),
    ];

    for (column, value) in derived {
        row.insert(column.to_string(), text_or_null(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{COL_MONTH, COL_PAGE, COL_TYPES};
    use serde_json::json;

    fn enrich_records(records: Vec<Value>) -> Table {
        enrich(Table::from_records(records))
    }

    fn dois(table: &Table) -> Vec<String> {
        table.rows.iter().map(|r| cell_to_string(&r[COL_DOI])).collect()
    }

    #[test]
    fn test_single_row_derivations() {
        let out = enrich_records(vec![json!({
            "Title": "Learning Experience with LearnwithEmma",
            "DOI": "10.33093/jiwe.2022.1.1.4"
        })]);
        let row = &out.rows[0];

        assert_eq!(row[COL_NO_ALL], 1);
        assert_eq!(row[COL_NO], "4");
        assert_eq!(row[COL_JOURNAL_NAME], "Journal of Informatics and Web Engineering");
        assert_eq!(row[COL_YEAR_PUBLISHED], "2022");
        assert_eq!(row[COL_VOLUME], "1");
        assert_eq!(row[COL_ISSUES], "1");
        assert_eq!(row[COL_DOI_URL], "https://doi.org/10.33093/jiwe.2022.1.1.4");
        assert_eq!(row[COL_PAPER_TITLE], "Learning Experience with LearnwithEmma");
        assert!(row[COL_MONTH].is_null());
        assert!(row[COL_TYPES].is_null());
        assert!(row[COL_PAGE].is_null());
    }

    #[test]
    fn test_fixed_columns_first_then_passthrough() {
        let mut input = Table::from_records(vec![json!({
            "Submission ID": "236",
            "Title": "A",
            "DOI": "10.33093/jiwe.2022.1.1.4",
            "Keywords": "web"
        })]);
        input.reorder(&["Submission ID", "Title", "DOI", "Keywords"]);

        let out = enrich(input);

        assert_eq!(&out.columns[..15], &FIXED_COLUMNS.map(String::from)[..]);
        assert_eq!(&out.columns[15..], &["Submission ID", "Keywords"]);
        assert!(!out.has_column(COL_TITLE));
        for row in &out.rows {
            assert!(row.get(COL_TITLE).is_none());
        }
    }

    #[test]
    fn test_fixed_columns_present_for_empty_input() {
        let out = enrich(Table::new(vec!["Other".into()]));
        assert!(out.is_empty());
        assert_eq!(out.columns.len(), 16);
        assert_eq!(out.columns[15], "Other");
    }

    #[test]
    fn test_sorted_by_year_then_parts() {
        let out = enrich_records(vec![
            json!({"DOI": "10.33093/jiwe.2022.1.1.1"}),
            json!({"DOI": "10.33093/jiwe.2021.5.2.3"}),
            json!({"DOI": "10.33093/jiwe.2022.1.1.0"}),
        ]);

        assert_eq!(
            dois(&out),
            vec![
                "10.33093/jiwe.2021.5.2.3",
                "10.33093/jiwe.2022.1.1.0",
                "10.33093/jiwe.2022.1.1.1",
            ]
        );
    }

    #[test]
    fn test_unparseable_rows_sort_last_in_input_order() {
        let out = enrich_records(vec![
            json!({"id": "bad-1", "DOI": "garbage"}),
            json!({"id": "good-2022", "DOI": "10.33093/jiwe.2022.1.1.4"}),
            json!({"id": "missing", "DOI": null}),
            json!({"id": "good-2021", "DOI": "10.33093/jetap.2021.3.2.1"}),
            json!({"id": "bad-2", "DOI": "10.33093/jiwe"}),
        ]);

        let ids: Vec<&str> = out.rows.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["good-2021", "good-2022", "bad-1", "missing", "bad-2"]);
    }

    #[test]
    fn test_row_numbers_are_dense() {
        let out = enrich_records(vec![
            json!({"DOI": "10.33093/jiwe.2022.1.1.5"}),
            json!({"DOI": ""}),
            json!({"DOI": "10.33093/jiwe.2022.1.1.1"}),
            json!({"DOI": "10.33093/ajlp.2020.2.1.9"}),
        ]);

        assert_eq!(out.len(), 4);
        let numbers: Vec<u64> = out.rows.iter().map(|r| r[COL_NO_ALL].as_u64().unwrap()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_missing_doi_becomes_empty_string_with_null_derivations() {
        let out = enrich_records(vec![json!({"DOI": null, "Title": "T"})]);
        let row = &out.rows[0];

        assert_eq!(row[COL_DOI], "");
        for column in [COL_NO, COL_JOURNAL_NAME, COL_YEAR_PUBLISHED, COL_VOLUME, COL_ISSUES, COL_DOI_URL] {
            assert!(row[column].is_null(), "{} should be null", column);
        }
        assert_eq!(row[COL_PAPER_TITLE], "T");
    }

    #[test]
    fn test_numeric_doi_is_stringified() {
        let out = enrich_records(vec![json!({"DOI": 10})]);
        assert_eq!(out.rows[0][COL_DOI], "10");
        assert_eq!(out.rows[0][COL_NO], "10");
        assert!(out.rows[0][COL_JOURNAL_NAME].is_null());
    }

    #[test]
    fn test_input_without_doi_column() {
        let out = enrich_records(vec![json!({"Title": "Only a title"})]);
        let row = &out.rows[0];

        assert!(row[COL_DOI].is_null());
        assert!(row[COL_DOI_URL].is_null());
        assert_eq!(row[COL_PAPER_TITLE], "Only a title");
        assert_eq!(row[COL_FULL_AUTHORS], "");
    }

    #[test]
    fn test_input_without_title_column() {
        let out = enrich_records(vec![json!({"DOI": "10.33093/jiwe.2022.1.1.4"})]);
        assert!(out.rows[0][COL_PAPER_TITLE].is_null());
    }

    #[test]
    fn test_unmapped_journal_code_is_null() {
        let out = enrich_records(vec![json!({"DOI": "10.33093/xyz.2022.1.1.4"})]);
        let row = &out.rows[0];

        assert!(row[COL_JOURNAL_NAME].is_null());
        assert_eq!(row[COL_YEAR_PUBLISHED], "2022");
        assert_eq!(row[COL_NO], "4");
    }

    #[test]
    fn test_short_doi_keeps_available_fields() {
        let out = enrich_records(vec![json!({"DOI": "10.33093/ijcm.2023"})]);
        let row = &out.rows[0];

        assert_eq!(row[COL_NO], "2023");
        assert_eq!(row[COL_JOURNAL_NAME], "International Journal of Creative Multimedia");
        assert_eq!(row[COL_YEAR_PUBLISHED], "2023");
        assert!(row[COL_VOLUME].is_null());
        assert!(row[COL_ISSUES].is_null());
    }

    #[test]
    fn test_authors_are_aggregated() {
        let out = enrich_records(vec![json!({
            "DOI": "10.33093/jiwe.2022.1.1.4",
            "Given Name (Author 1)": "Jane",
            "Family Name (Author 1)": "Doe",
            "Affiliation (Author 1)": "MIT",
            "Given Name (Author 2)": "John",
            "Family Name (Author 2)": "Roe",
            "Affiliation (Author 2)": null
        })]);
        let row = &out.rows[0];

        assert_eq!(row[COL_FULL_AUTHORS], "Jane Doe (MIT), John Roe");
        assert_eq!(row["Given Name (Author 1)"], "Jane");
    }

    #[test]
    fn test_existing_fixed_values_are_overwritten() {
        let out = enrich_records(vec![json!({
            "No (All)": "99",
            "Journal Name": "Stale",
            "DOI": "10.33093/jclc.2024.6.2.7"
        })]);
        let row = &out.rows[0];

        assert_eq!(row[COL_NO_ALL], 1);
        assert_eq!(row[COL_JOURNAL_NAME], "Journal of Communication, Language and Culture");
    }
}
