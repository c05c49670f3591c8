//! CSV loading with encoding and delimiter auto-detection.
//!
//! Turns raw bytes into a [`Table`] of trimmed string cells, or into a
//! [`LabeledMatrix`] when the file is a previously written matrix.

use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::models::{IdLabel, LabeledMatrix, Table};

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

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding
///
/// UTF-8 input with stray invalid bytes is decoded lossily. Any other
/// encoding label known to `encoding_rs` must decode cleanly; unknown labels
/// fall back to lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => String::from_utf8_lossy(bytes).into_owned(),
        },
        label => match encoding_rs::Encoding::for_label(label.as_bytes()) {
            Some(codec) => {
                let (text, _, had_errors) = codec.decode(bytes);
                if had_errors {
                    return Err(CsvError::EncodingError {
                        encoding: encoding.to_string(),
                        message: format!("malformed {} byte sequence", codec.name()),
                    });
                }
                text.into_owned()
            }
            None => String::from_utf8_lossy(bytes).into_owned(),
        },
    };

    // Excel-exported files often carry a UTF-8 BOM.
    Ok(decoded.trim_start_matches('\u{feff}').to_string())
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

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

/// Parse CSV text with an explicit delimiter.
///
/// Cells are trimmed; blank lines are skipped; short rows are padded.
///
/// # Example
/// ```ignore
/// use traffic::parse_table;
///
/// let table = parse_table("id_1,id_2,car\n1,2,10", ',').unwrap();
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.column("car").unwrap(), vec!["10"]);
/// ```
pub fn parse_table(content: &str, delimiter: char) -> CsvResult<Table> {
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter_byte(delimiter)?)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::NoHeaders);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|c| c.is_empty()) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table::new(headers, rows))
}

fn delimiter_byte(delimiter: char) -> CsvResult<u8> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(CsvError::ParseError {
            line: 0,
            message: format!("Delimiter '{}' is not a single-byte character", delimiter),
        })
    }
}

/// Parse CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> CsvResult<ParseResult> {
    if bytes.is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let delimiter = detect_delimiter(&content);
    let table = parse_table(&content, delimiter)?;

    Ok(ParseResult {
        table,
        encoding,
        delimiter,
    })
}

/// Load a CSV file with auto-detection of encoding and delimiter.
///
/// # Example
/// ```ignore
/// let result = load_table("dataset-1.csv")?;
/// println!("Encoding: {}, Delimiter: '{}'", result.encoding, result.delimiter);
/// println!("Rows: {}", result.table.len());
/// ```
pub fn load_table<P: AsRef<Path>>(path: P) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes_auto(&bytes)
}

/// Interpret a table as a labeled matrix.
///
/// The first column holds row labels and its header names the row axis;
/// every other header is a column label. Empty cells read as 0.
pub fn parse_matrix(table: &Table) -> CsvResult<LabeledMatrix> {
    let (index_name, column_headers) = table.headers().split_first().ok_or(CsvError::NoHeaders)?;
    let columns: Vec<IdLabel> = column_headers.iter().map(|h| IdLabel::parse(h)).collect();

    // Cells are read by position: labels may repeat.
    let mut row_labels = Vec::with_capacity(table.len());
    let mut values = Vec::with_capacity(table.len());
    for (pos, row) in table.rows().iter().enumerate() {
        let (label, cells) = row.split_first().ok_or(CsvError::NoHeaders)?;
        row_labels.push(IdLabel::parse(label));

        let mut parsed = Vec::with_capacity(cells.len());
        for (header, raw) in column_headers.iter().zip(cells) {
            let value = if raw.is_empty() {
                0.0
            } else {
                raw.parse::<f64>().map_err(|_| CsvError::InvalidCell {
                    // +1 for the header, +1 for 1-based lines
                    line: pos + 2,
                    column: header.clone(),
                    value: raw.clone(),
                })?
            };
            parsed.push(value);
        }
        values.push(parsed);
    }

    Ok(LabeledMatrix {
        index_name: index_name.clone(),
        rows: row_labels,
        columns,
        values,
    })
}

/// Load a matrix CSV file written by [`LabeledMatrix::write_csv`].
pub fn load_matrix<P: AsRef<Path>>(path: P) -> CsvResult<LabeledMatrix> {
    let parsed = load_table(path)?;
    parse_matrix(&parsed.table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_csv() {
        let table = parse_table("id_1,id_2,car\n1001400,1001402,9.7\n1001402,1001404,20.2", ',').unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.headers(), &["id_1", "id_2", "car"]);
        assert_eq!(table.column("car").unwrap(), vec!["9.7", "20.2"]);
    }

    #[test]
    fn test_quoted_and_padded_values() {
        let csv = "route, car\n\"7\" ,  12 ";
        let table = parse_table(csv, ',').unwrap();

        assert_eq!(table.column("route").unwrap(), vec!["7"]);
        assert_eq!(table.column("car").unwrap(), vec!["12"]);
    }

    #[test]
    fn test_empty_lines_skipped() {
        let table = parse_table("a,b\n1,2\n\n3,4\n", ',').unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_missing_values() {
        let table = parse_table("a;b;c\n1;;3\n4", ';').unwrap();

        assert_eq!(table.column("b").unwrap(), vec!["", ""]);
        assert_eq!(table.column("c").unwrap(), vec!["3", ""]);
    }

    #[test]
    fn test_empty_csv_error() {
        assert!(matches!(parse_table("", ','), Err(CsvError::EmptyFile)));
        assert!(matches!(parse_bytes_auto(b""), Err(CsvError::EmptyFile)));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
        assert_eq!(detect_delimiter("single"), ',');
    }

    #[test]
    fn test_auto_parse() {
        let csv = "id;id_2;startDay\n1014000;-1;Monday";
        let result = parse_bytes_auto(csv.as_bytes()).unwrap();

        assert_eq!(result.delimiter, ';');
        assert_eq!(result.encoding, "utf-8");
        assert_eq!(result.table.len(), 1);
    }

    #[test]
    fn test_decode_latin1() {
        let text = decode_content(&[b'c', 0xE9, b'r'], "iso-8859-1").unwrap();
        assert_eq!(text, "c\u{e9}r");
    }

    #[test]
    fn test_decode_malformed_multibyte() {
        // lone Shift_JIS lead byte
        let err = decode_content(&[b'a', 0x82], "shift_jis").unwrap_err();
        assert!(matches!(err, CsvError::EncodingError { ref encoding, .. } if encoding == "shift_jis"));
    }

    #[test]
    fn test_decode_unknown_label_is_lossy() {
        assert_eq!(decode_content(b"car", "x-unknown").unwrap(), "car");
    }

    #[test]
    fn test_bom_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"car\n3");
        let result = parse_bytes_auto(&bytes).unwrap();
        assert_eq!(result.table.headers(), &["car"]);
    }

    #[test]
    fn test_parse_matrix() {
        let table = parse_table("id_1,1,2\n1,0,25\n2,,0", ',').unwrap();
        let matrix = parse_matrix(&table).unwrap();

        assert_eq!(matrix.index_name, "id_1");
        assert_eq!(matrix.rows, vec![IdLabel::Int(1), IdLabel::Int(2)]);
        assert_eq!(matrix.columns, vec![IdLabel::Int(1), IdLabel::Int(2)]);
        assert_eq!(matrix.values, vec![vec![0.0, 25.0], vec![0.0, 0.0]]);
    }

    #[test]
    fn test_parse_matrix_repeated_column_label() {
        let table = parse_table("id_1,1,1\n1,5,7", ',').unwrap();
        let matrix = parse_matrix(&table).unwrap();

        assert_eq!(matrix.columns, vec![IdLabel::Int(1), IdLabel::Int(1)]);
        assert_eq!(matrix.values, vec![vec![5.0, 7.0]]);
    }

    #[test]
    fn test_parse_matrix_rejects_text_cell() {
        let table = parse_table("id_1,1\n1,abc", ',').unwrap();
        let err = parse_matrix(&table).unwrap_err();
        assert!(matches!(err, CsvError::InvalidCell { line: 2, .. }));
    }

    #[test]
    fn test_matrix_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matrix.csv");

        let table = parse_table("id_1,1,2\n1,0,1.5\n2,3,0", ',').unwrap();
        let matrix = parse_matrix(&table).unwrap();
        let file = std::fs::File::create(&path).unwrap();
        matrix.write_csv(file).unwrap();

        assert_eq!(load_matrix(&path).unwrap(), matrix);
    }
}
