use crate::domain::model::Record;
use crate::utils::error::Result;
use csv::ReaderBuilder;
use serde_json::Value;

/// Parses CSV text with a header row into one `Record` per data row.
///
/// Blank lines are skipped. A short row only carries the columns it has;
/// fields past the last header are dropped. Bytes that are not valid UTF-8
/// (Windows-1252 exports, for one) become U+FFFD instead of failing the file.
pub fn parse_csv(data: &[u8]) -> Result<Vec<Record>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let header = decode_field(field);
            if i == 0 {
                header.trim_start_matches('\u{feff}').to_string()
            } else {
                header
            }
        })
        .collect();
    let mut records = Vec::new();
    let mut lossy_rows = 0usize;

    for (index, row) in reader.byte_records().enumerate() {
        let row = row?;

        if row.len() > headers.len() {
            tracing::warn!(
                "Row {} has {} fields but the header has {}; extra fields ignored",
                index + 1,
                row.len(),
                headers.len()
            );
        }
        if std::str::from_utf8(row.as_slice()).is_err() {
            lossy_rows += 1;
        }

        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(key, value)| (key.clone(), Value::String(decode_field(value))))
            .collect();
        records.push(record);
    }

    if lossy_rows > 0 {
        tracing::warn!(
            "{} rows contained bytes that are not valid UTF-8; they were replaced",
            lossy_rows
        );
    }
    tracing::debug!("Parsed {} CSV rows with {} columns", records.len(), headers.len());
    Ok(records)
}

fn decode_field(field: &[u8]) -> String {
    String::from_utf8_lossy(field).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_header_row_becomes_keys() {
        let rows = parse_csv(b"name,marks\nAsha,91\n").unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(
            serde_json::to_value(&rows[0]).unwrap(),
            json!({"name": "Asha", "marks": "91"})
        );
        assert_eq!(rows[0].keys().collect::<Vec<_>>(), vec!["name", "marks"]);
    }

    #[test]
    fn test_values_stay_strings() {
        let rows = parse_csv(b"roll,sgpa\n0818IT221001,8.10\n").unwrap();
        assert_eq!(rows[0].get("sgpa"), Some(&json!("8.10")));
    }

    #[test]
    fn test_quoted_fields() {
        let rows = parse_csv(b"name,remark\n\"Rao, Asha\",\"said \"\"hi\"\"\"\n").unwrap();
        assert_eq!(rows[0].get("name"), Some(&json!("Rao, Asha")));
        assert_eq!(rows[0].get("remark"), Some(&json!("said \"hi\"")));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let rows = parse_csv(b"name,marks\nAsha,91\n\nRavi,78\n").unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_ragged_rows() {
        let rows = parse_csv(b"name,marks,grade\nAsha,91\nRavi,78,B,extra\n").unwrap();

        assert_eq!(rows[0].len(), 2);
        assert!(rows[0].get("grade").is_none());
        assert_eq!(rows[1].len(), 3);
        assert_eq!(rows[1].get("grade"), Some(&json!("B")));
    }

    #[test]
    fn test_header_only() {
        let rows = parse_csv(b"name,marks\n").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_non_utf8_bytes_are_replaced() {
        let rows = parse_csv(b"name,marks\nJos\xe9,91\n").unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name"), Some(&json!("Jos\u{fffd}")));
        assert_eq!(rows[0].get("marks"), Some(&json!("91")));
    }

    #[test]
    fn test_byte_order_mark_not_in_first_key() {
        let rows = parse_csv(b"\xef\xbb\xbfname,marks\nAsha,91\n").unwrap();
        assert_eq!(rows[0].keys().collect::<Vec<_>>(), vec!["name", "marks"]);
    }
}
