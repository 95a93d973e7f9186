//! Document records and the metadata table
//!
//! `meta.csv` is headerless, one row per document in index order:
//! `id, title, author, journaltitle, volume, issue, pubdate, pagerange`.
//! Multiple authors share the author column, separated by TAB.

use chrono::{DateTime, NaiveDate};
use serde::Serialize;

use crate::model::Artifact;
use crate::{Error, Result};

/// Number of columns every metadata row must carry
pub const META_COLUMNS: usize = 8;

/// One bibliographic entry
///
/// Immutable once loaded. Everything else in the corpus refers to a record
/// by its zero-based position in the metadata table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRecord {
    /// Persistent identifier (DOI-like)
    pub doi: String,
    pub title: String,
    /// Author names in "First Last" form; empty for anonymous works
    pub authors: Vec<String>,
    pub journal_title: String,
    pub volume: String,
    pub issue: String,
    /// Publication date
    pub date: NaiveDate,
    pub page_range: String,
}

impl DocumentRecord {
    /// Split the lead author's name into (surname, given names)
    ///
    /// The surname is simply the last whitespace-separated token, so names
    /// ending in "Jr." or "2nd" come out wrong. Returns `None` for anonymous
    /// documents.
    pub fn lead_author_parts(&self) -> Option<(&str, String)> {
        let lead = self.authors.first()?;
        let mut tokens: Vec<&str> = lead.split_whitespace().collect();
        let surname = tokens.pop()?;
        Some((surname, tokens.join(" ")))
    }
}

/// Parse the metadata table into document records
///
/// Fails on the first row that has too few columns or an unreadable date;
/// the error names the zero-based row.
pub fn parse_meta_csv(input: &str) -> Result<Vec<DocumentRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input.as_bytes());

    let mut docs = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() < META_COLUMNS {
            return Err(Error::Parse {
                artifact: Artifact::Meta,
                row,
                message: format!(
                    "expected {} columns, found {}",
                    META_COLUMNS,
                    record.len()
                ),
            });
        }

        let field = |i: usize| record[i].trim().to_string();
        let pubdate = record[6].trim();
        let date = parse_pubdate(pubdate).ok_or_else(|| Error::Parse {
            artifact: Artifact::Meta,
            row,
            message: format!("unrecognized publication date '{}'", pubdate),
        })?;

        docs.push(DocumentRecord {
            doi: field(0),
            title: field(1),
            authors: split_authors(&record[2]),
            journal_title: field(3),
            volume: field(4),
            issue: field(5),
            date,
            page_range: clean_page_range(record[7].trim()),
        });
    }

    Ok(docs)
}

/// Split the TAB-joined author column, dropping blank names
fn split_authors(column: &str) -> Vec<String> {
    column
        .split('\t')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strip a leading "p. " / "pp. " and turn hyphens into en dashes
fn clean_page_range(raw: &str) -> String {
    let stripped = raw
        .strip_prefix("pp. ")
        .or_else(|| raw.strip_prefix("p. "))
        .unwrap_or(raw);
    stripped.replace('-', "\u{2013}")
}

/// Parse a publication date
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DD`, `YYYY-MM` and `YYYY`. Partial
/// dates resolve to the first day of the period.
pub fn parse_pubdate(s: &str) -> Option<NaiveDate> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }

    let mut parts = s.split('-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = match parts.next() {
        Some(m) => m.parse().ok()?,
        None => 1,
    };
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
10.2307/432448,The Novel and Its Discontents,Jane Smith\tAlan Jones,PMLA,108,2,1993-03-01T00:00:00Z,pp. 12-34
10.2307/432449,\"Anonymous, Untitled\",,PMLA,109,1,1994-01-01,p. 5
";

    #[test]
    fn test_parse_meta_csv_fields() {
        let docs = parse_meta_csv(SAMPLE).unwrap();
        assert_eq!(docs.len(), 2);

        let first = &docs[0];
        assert_eq!(first.doi, "10.2307/432448");
        assert_eq!(first.authors, vec!["Jane Smith", "Alan Jones"]);
        assert_eq!(first.journal_title, "PMLA");
        assert_eq!(first.date, NaiveDate::from_ymd_opt(1993, 3, 1).unwrap());
        assert_eq!(first.page_range, "12\u{2013}34");

        let second = &docs[1];
        assert_eq!(second.title, "Anonymous, Untitled");
        assert!(second.authors.is_empty());
        assert_eq!(second.page_range, "5");
    }

    #[test]
    fn test_parse_meta_csv_short_row() {
        let err = parse_meta_csv("a,b,c\n").unwrap_err();
        match err {
            Error::Parse { row, .. } => assert_eq!(row, 0),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_meta_csv_bad_date_names_row() {
        let input = "x,t,A B,J,1,1,1990-01-01,1\ny,t,A B,J,1,1,someday,1\n";
        match parse_meta_csv(input).unwrap_err() {
            Error::Parse { row, message, .. } => {
                assert_eq!(row, 1);
                assert!(message.contains("someday"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_pubdate_formats() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        assert_eq!(parse_pubdate("1995-06-15T00:00:00Z"), Some(d(1995, 6, 15)));
        assert_eq!(parse_pubdate("1995-06-15"), Some(d(1995, 6, 15)));
        assert_eq!(parse_pubdate("1995-06"), Some(d(1995, 6, 1)));
        assert_eq!(parse_pubdate("1995"), Some(d(1995, 1, 1)));
        assert_eq!(parse_pubdate("1995-13"), None);
        assert_eq!(parse_pubdate(""), None);
    }

    #[test]
    fn test_lead_author_parts() {
        let mut doc = parse_meta_csv(SAMPLE).unwrap().remove(0);
        assert_eq!(doc.lead_author_parts(), Some(("Smith", "Jane".to_string())));

        doc.authors = vec!["Plato".to_string()];
        assert_eq!(doc.lead_author_parts(), Some(("Plato", String::new())));

        doc.authors.clear();
        assert_eq!(doc.lead_author_parts(), None);
    }
}
