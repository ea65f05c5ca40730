use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use crate::leaderboard::{CategorizationScheme, Categorized};
use crate::models::{ordinal_label, Result, WinnerRecord};

pub const DEFAULT_EXPORT_FILE: &str = "Leaderboard.xlsx";

pub const COLUMN_HEADERS: [&str; 8] = [
    "Rank",
    "Student Name",
    "Year",
    "Branch",
    "Section",
    "Codechef Id",
    "Stars",
    "CC Rank",
];

const MAX_SHEET_NAME_LEN: usize = 31;

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Blank,
}

impl CellValue {
    fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    fn optional(value: Option<&str>) -> Self {
        value.map(CellValue::text).unwrap_or(CellValue::Blank)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Title,
    BucketHeader,
    ColumnHeader,
    Data,
    Spacer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub kind: RowKind,
    pub cells: Vec<CellValue>,
}

impl SheetRow {
    fn single(kind: RowKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            cells: vec![CellValue::text(text)],
        }
    }
}

/// One worksheet as rows of cells, before it is written to xlsx.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub name: String,
    pub rows: Vec<SheetRow>,
}

impl SheetLayout {
    pub fn data_rows(&self) -> impl Iterator<Item = &SheetRow> {
        self.rows.iter().filter(|row| row.kind == RowKind::Data)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportDocument {
    pub sheets: Vec<SheetLayout>,
}

/// Lays out a categorized leaderboard: one sheet per group, and inside it a
/// header block plus one row per record for each bucket. Buckets are written
/// in the order they are stored, so rank them first.
pub fn build_document(categorized: &Categorized) -> ExportDocument {
    let scheme = categorized.scheme();
    let mut used_names = HashSet::new();
    let mut sheets = Vec::new();

    for group in categorized.groups() {
        let (title, raw_name) = match scheme {
            CategorizationScheme::ByYearAndStar => {
                (format!("Year - {}", group.key), format!("Year {}", group.key))
            }
            _ => (group.key.to_string(), group.key.to_string()),
        };

        let mut rows = vec![SheetRow::single(RowKind::Title, title)];

        for bucket in &group.buckets {
            rows.push(SheetRow::single(RowKind::BucketHeader, bucket.key));
            rows.push(SheetRow {
                kind: RowKind::ColumnHeader,
                cells: COLUMN_HEADERS.iter().map(|h| CellValue::text(*h)).collect(),
            });
            for (index, record) in bucket.records.iter().enumerate() {
                rows.push(data_row(index as u64 + 1, record));
            }
            rows.push(SheetRow {
                kind: RowKind::Spacer,
                cells: Vec::new(),
            });
        }

        sheets.push(SheetLayout {
            name: unique_sheet_name(&raw_name, &mut used_names),
            rows,
        });
    }

    ExportDocument { sheets }
}

fn data_row(position: u64, record: &WinnerRecord) -> SheetRow {
    SheetRow {
        kind: RowKind::Data,
        cells: vec![
            CellValue::text(ordinal_label(position)),
            CellValue::text(record.username.as_str()),
            CellValue::optional(record.year_of_study.as_deref()),
            CellValue::optional(record.branch.as_deref()),
            CellValue::optional(record.section.as_deref()),
            CellValue::optional(record.codechef_id.as_deref()),
            CellValue::optional(record.star_rating.as_deref()),
            record
                .contest_global_rank
                .map(|rank| CellValue::Number(rank as f64))
                .unwrap_or(CellValue::Blank),
        ],
    }
}

/// Excel sheet names are at most 31 characters, may not contain `[]:*?/\`
/// and must be unique ignoring case.
pub fn sanitize_sheet_name(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .collect();
    let truncated: String = cleaned.chars().take(MAX_SHEET_NAME_LEN).collect();
    let trimmed = trim_sheet_edges(&truncated);

    if trimmed.is_empty() {
        "Sheet".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Sheet names may not start or end with an apostrophe.
fn trim_sheet_edges(name: &str) -> &str {
    name.trim_matches(|c: char| c == '\'' || c.is_whitespace())
}

fn unique_sheet_name(raw: &str, used: &mut HashSet<String>) -> String {
    let base = sanitize_sheet_name(raw);
    let mut candidate = base.clone();
    let mut counter = 2;

    while used.contains(&candidate.to_lowercase()) {
        let suffix = format!(" ({counter})");
        let keep = MAX_SHEET_NAME_LEN - suffix.chars().count();
        let head: String = base.chars().take(keep).collect();
        candidate = format!("{}{}", trim_sheet_edges(&head), suffix);
        counter += 1;
    }

    used.insert(candidate.to_lowercase());
    candidate
}

impl ExportDocument {
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn data_row_count(&self) -> usize {
        self.sheets.iter().map(|s| s.data_rows().count()).sum()
    }

    pub fn to_workbook(&self) -> Result<Workbook> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();

        for sheet in &self.sheets {
            let mut worksheet = Worksheet::new();
            worksheet.set_name(sheet.name.as_str())?;

            for (row_index, row) in sheet.rows.iter().enumerate() {
                let row_num = row_index as u32;
                let emphasised = matches!(
                    row.kind,
                    RowKind::Title | RowKind::BucketHeader | RowKind::ColumnHeader
                );

                for (col_index, cell) in row.cells.iter().enumerate() {
                    let col_num = col_index as u16;
                    match cell {
                        CellValue::Text(text) if emphasised => {
                            worksheet.write_string_with_format(row_num, col_num, text.as_str(), &bold)?;
                        }
                        CellValue::Text(text) => {
                            worksheet.write_string(row_num, col_num, text.as_str())?;
                        }
                        CellValue::Number(value) => {
                            worksheet.write_number(row_num, col_num, *value)?;
                        }
                        CellValue::Blank => {}
                    }
                }
            }

            worksheet.set_column_width(1, 24)?;
            worksheet.set_column_width(5, 18)?;
            workbook.push_worksheet(worksheet);
        }

        Ok(workbook)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut workbook = self.to_workbook()?;
        Ok(workbook.save_to_buffer()?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut workbook = self.to_workbook()?;
        workbook.save(path.as_ref())?;
        info!(
            "Wrote {} sheet(s), {} row(s) to {}",
            self.sheets.len(),
            self.data_row_count(),
            path.as_ref().display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::categorize;

    #[test]
    fn test_sheet_name_sanitizing() {
        assert_eq!(sanitize_sheet_name("Year 2"), "Year 2");
        assert_eq!(sanitize_sheet_name("START1 / [3 Star]?"), "START1  3 Star");
        assert_eq!(sanitize_sheet_name("***"), "Sheet");
        assert_eq!(sanitize_sheet_name(&"x".repeat(40)).len(), 31);
        assert_eq!(sanitize_sheet_name("'Quoted'"), "Quoted");
    }

    #[test]
    fn test_truncated_name_does_not_end_with_apostrophe() {
        let contest = format!("{}'s Cup", "A".repeat(30));
        let name = sanitize_sheet_name(&contest);
        assert_eq!(name, "A".repeat(30));

        let mut used = HashSet::new();
        unique_sheet_name(&contest, &mut used);
        let second = unique_sheet_name(&format!("{}'s Cup", "a".repeat(30)), &mut used);
        assert!(!second.ends_with('\''));
        assert!(second.chars().count() <= 31);
    }

    #[test]
    fn test_long_contest_name_exports() {
        let contest = format!("{}'s Cup", "A".repeat(30));
        let records = vec![
            WinnerRecord::new("a").with_contest(contest.as_str()).with_rank(1),
            WinnerRecord::new("b").with_contest(format!("{}'s Cup", "a".repeat(30))).with_rank(2),
        ];
        let document = build_document(&categorize(&records, CategorizationScheme::ByContestName));

        assert_eq!(document.sheets.len(), 2);
        assert!(document.sheets.iter().all(|s| !s.name.ends_with('\'')));
        assert!(document.to_bytes().is_ok());
    }

    #[test]
    fn test_unique_sheet_names() {
        let mut used = HashSet::new();
        assert_eq!(unique_sheet_name("Year 1", &mut used), "Year 1");
        assert_eq!(unique_sheet_name("year 1", &mut used), "year 1 (2)");
        let long = "y".repeat(40);
        let first = unique_sheet_name(&long, &mut used);
        let second = unique_sheet_name(&long, &mut used);
        assert_ne!(first, second);
        assert!(second.chars().count() <= 31);
    }

    #[test]
    fn test_year_sheet_layout() {
        let records = vec![
            WinnerRecord::new("b").with_year("1").with_contest("START9").with_stars("2").with_rank(8),
            WinnerRecord::new("a").with_year("1").with_contest("START9").with_stars("2").with_rank(3),
        ];
        let categorized = categorize(&records, CategorizationScheme::ByYearAndStar).ranked(None);
        let document = build_document(&categorized);

        assert_eq!(document.sheets.len(), 1);
        let sheet = &document.sheets[0];
        assert_eq!(sheet.name, "Year 1");

        let kinds: Vec<RowKind> = sheet.rows.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RowKind::Title,
                RowKind::BucketHeader,
                RowKind::ColumnHeader,
                RowKind::Data,
                RowKind::Data,
                RowKind::Spacer,
            ]
        );
        assert_eq!(sheet.rows[0].cells[0].as_text(), Some("Year - 1"));
        assert_eq!(sheet.rows[1].cells[0].as_text(), Some("START9 - (2 Star)"));

        let first = &sheet.rows[3].cells;
        assert_eq!(first[0].as_text(), Some("1st"));
        assert_eq!(first[1].as_text(), Some("a"));
        assert_eq!(first[7], CellValue::Number(3.0));
        assert_eq!(first[4], CellValue::Blank);
    }

    #[test]
    fn test_empty_document_saves() {
        let document = build_document(&categorize(&[], CategorizationScheme::ByStarOnly));
        assert!(document.is_empty());

        let bytes = document.to_bytes().unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_workbook_bytes_are_zip() {
        let records = vec![WinnerRecord::new("solo").with_stars("4").with_rank(1)];
        let document = build_document(&categorize(&records, CategorizationScheme::ByStarOnly));

        let bytes = document.to_bytes().unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
