//! Tabular export of raw records.
//!
//! Output is UTF-8 with a byte-order mark so spreadsheet tools detect the
//! encoding of Japanese titles.

use std::io::Write;
use std::path::Path;

use notepower_core::ArticleRecord;

use crate::atomic::write_with;
use crate::error::StoreError;

const BOM: &str = "\u{feff}";

pub const CSV_COLUMNS: [&str; 18] = [
    "note_id",
    "key",
    "title",
    "body_preview",
    "user_id",
    "user_nickname",
    "follower_count",
    "like_count",
    "comment_count",
    "price",
    "is_paid",
    "published_at",
    "url",
    "category",
    "keyword",
    "power_score",
    "engagement_rate",
    "virality_score",
];

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_row<W: Write + ?Sized>(w: &mut W, row: &[String]) -> std::io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            w.write_all(b",")?;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            w.write_all(cell.as_bytes())?;
        }
    }
    w.write_all(b"\r\n")
}

fn record_row(r: &ArticleRecord) -> Vec<String> {
    vec![
        r.note_id.clone(),
        r.key.clone(),
        r.title.clone(),
        r.body_preview.clone(),
        r.user_id.clone(),
        r.user_nickname.clone(),
        r.follower_count.to_string(),
        r.like_count.to_string(),
        r.comment_count.to_string(),
        r.price.to_string(),
        r.is_paid.to_string(),
        r.published_at.clone(),
        r.url.clone(),
        r.category.clone(),
        r.keyword.clone(),
        format!("{:.4}", r.scores.power_score),
        format!("{:.4}", r.scores.engagement_rate),
        format!("{:.4}", r.scores.virality_score),
    ]
}

/// Renders records as CSV text, header row included.
#[must_use]
pub fn to_csv_string(records: &[ArticleRecord]) -> String {
    let mut buf: Vec<u8> = BOM.as_bytes().to_vec();
    // Writing into a Vec cannot fail.
    let header: Vec<String> = CSV_COLUMNS.iter().map(|c| (*c).to_string()).collect();
    let _ = write_row(&mut buf, &header);
    for r in records {
        let _ = write_row(&mut buf, &record_row(r));
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Writes records to `path` as CSV, returning the number of data rows.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file cannot be written.
pub fn export_csv(path: &Path, records: &[ArticleRecord]) -> Result<usize, StoreError> {
    let text = to_csv_string(records);
    write_with(path, |w| {
        w.write_all(text.as_bytes())
            .map_err(|e| StoreError::io(path, e))
    })?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notepower_core::Scores;

    fn record(title: &str) -> ArticleRecord {
        ArticleRecord {
            note_id: "1".to_string(),
            key: "n1".to_string(),
            title: title.to_string(),
            body_preview: "本文\n二行目".to_string(),
            user_id: "taro".to_string(),
            user_nickname: "太郎".to_string(),
            follower_count: 50,
            like_count: 100,
            comment_count: 1,
            price: 300,
            is_paid: true,
            published_at: "2024-01-01".to_string(),
            url: "https://note.com/taro/n/n1".to_string(),
            category: "career".to_string(),
            keyword: "副業".to_string(),
            scores: Scores {
                power_score: 2.0,
                engagement_rate: 2.06,
                virality_score: 141.421_356,
            },
        }
    }

    #[test]
    fn output_starts_with_bom_and_header() {
        let csv = to_csv_string(&[]);
        assert!(csv.starts_with('\u{feff}'));
        assert!(csv.trim_start_matches('\u{feff}').starts_with("note_id,key,title,"));
        assert_eq!(csv.matches("\r\n").count(), 1);
    }

    #[test]
    fn fields_with_commas_quotes_or_newlines_are_quoted() {
        let csv = to_csv_string(&[record("\"副業\", 始めました")]);
        assert!(csv.contains("\"\"\"副業\"\", 始めました\""));
        assert!(csv.contains("\"本文\n二行目\""));
    }

    #[test]
    fn scores_are_fixed_precision() {
        let csv = to_csv_string(&[record("t")]);
        assert!(csv.contains(",2.0000,2.0600,141.4214"));
    }

    #[test]
    fn export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.csv");
        assert_eq!(export_csv(&path, &[record("a"), record("b")]).unwrap(), 2);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches("\r\n").count(), 3);
    }
}
