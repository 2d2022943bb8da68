//! Delimited-text loader with encoding and delimiter auto-detection.
//!
//! Produces a [`Table`] of text cells. No population-specific logic here.

use std::io::ErrorKind;
use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::models::{Cell, StatePopulationRecord, Table};

/// Candidate delimiters, in tie-break order.
const SEPARATORS: [char; 4] = [',', ';', '\t', '|'];

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub table: Table,
    /// Detected encoding
    pub encoding: String,
    /// Detected delimiter
    pub delimiter: char,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "utf-8-sig" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding.
///
/// Invalid UTF-8 falls back to Windows-1252, which maps every byte.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoded = match encoding.to_lowercase().as_str() {
        // ISO-8859-1 printable range is a subset of Windows-1252
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        _ => match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        },
    };
    decoded.trim_start_matches('\u{feff}').to_string()
}

/// Detect the delimiter by counting unquoted occurrences in the first line.
///
/// Falls back to `,` when the line has none of the candidates.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let mut counts = [0usize; SEPARATORS.len()];
    let mut in_quotes = false;
    for c in first_line.chars() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if !in_quotes {
            if let Some(i) = SEPARATORS.iter().position(|&s| s == c) {
                counts[i] += 1;
            }
        }
    }

    let mut best_sep = SEPARATORS[0];
    let mut best_count = 0;
    for (&sep, &count) in SEPARATORS.iter().zip(counts.iter()) {
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse delimited text with an explicit delimiter.
///
/// Fails with [`LoadError::EmptyInput`] when there is no header or no data row.
pub fn parse_str(content: &str, delimiter: char) -> LoadResult<Table> {
    if content.trim().is_empty() {
        return Err(LoadError::EmptyInput);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if columns.is_empty() || columns.iter().all(|c| c.trim().is_empty()) {
        return Err(LoadError::EmptyInput);
    }

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        rows.push(record.iter().map(Cell::from_field).collect());
    }

    if rows.is_empty() {
        return Err(LoadError::EmptyInput);
    }

    Ok(Table::new(columns, rows))
}

/// Parse bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> LoadResult<ParseResult> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(LoadError::EmptyInput);
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

/// Load a file with auto-detection of encoding and delimiter.
///
/// # Example
/// ```ignore
/// let result = load_table("raw/population_by_state.csv")?;
/// println!("Encoding: {}, Delimiter: '{}'", result.encoding, result.delimiter);
/// println!("Shape: {:?}", result.table.shape());
/// ```
pub fn load_table<P: AsRef<Path>>(path: P) -> LoadResult<ParseResult> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Unknown {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    parse_bytes_auto(&bytes)
}

/// Read a final summary file back into records.
pub fn load_summary<P: AsRef<Path>>(path: P) -> LoadResult<Vec<StatePopulationRecord>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path).map_err(|e| {
        let missing =
            matches!(e.kind(), csv::ErrorKind::Io(io) if io.kind() == ErrorKind::NotFound);
        if missing {
            LoadError::NotFound(path.to_path_buf())
        } else {
            LoadError::Csv(e)
        }
    })?;

    let records = reader
        .deserialize()
        .collect::<Result<Vec<StatePopulationRecord>, csv::Error>>()?;
    if records.is_empty() {
        return Err(LoadError::EmptyInput);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(table: &Table, row: usize) -> Vec<String> {
        table.rows()[row].iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_simple_csv() {
        let table = parse_str("label,Texas,Ohio\nTotal,10,20\nMale,5,9", ',').unwrap();

        assert_eq!(table.shape(), (2, 3));
        assert_eq!(table.columns(), ["label", "Texas", "Ohio"]);
        assert_eq!(texts(&table, 0), ["Total", "10", "20"]);
        assert_eq!(texts(&table, 1), ["Male", "5", "9"]);
    }

    #[test]
    fn test_quoted_thousands_separators() {
        let csv = "Label (Grouping),California,Wyoming\n\"Total\",\"39,538,223\",\"576,851\"";
        let table = parse_str(csv, ',').unwrap();

        assert_eq!(table.shape(), (1, 3));
        assert_eq!(table.rows()[0][1], Cell::Text("39,538,223".into()));
        assert_eq!(table.rows()[0][2], Cell::Text("576,851".into()));
    }

    #[test]
    fn test_missing_values() {
        let table = parse_str("a;b;c\n1;;3", ';').unwrap();

        assert_eq!(table.rows()[0][0], Cell::Text("1".into()));
        assert_eq!(table.rows()[0][1], Cell::Missing);
        assert_eq!(table.rows()[0][2], Cell::Text("3".into()));
    }

    #[test]
    fn test_short_and_long_rows() {
        let table = parse_str("a,b\n1\n1,2,3,4", ',').unwrap();

        assert_eq!(table.rows()[0], vec![Cell::Text("1".into()), Cell::Missing]);
        assert_eq!(texts(&table, 1), ["1", "2"]);
    }

    #[test]
    fn test_blank_rows_skipped() {
        let table = parse_str("a,b\n1,2\n\n,\n3,4\n", ',').unwrap();
        assert_eq!(table.shape(), (2, 2));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse_str("", ','), Err(LoadError::EmptyInput)));
        assert!(matches!(parse_str("  \n\n", ','), Err(LoadError::EmptyInput)));
        assert!(matches!(parse_bytes_auto(b""), Err(LoadError::EmptyInput)));
    }

    #[test]
    fn test_header_only_is_empty() {
        assert!(matches!(parse_str("a,b,c\n", ','), Err(LoadError::EmptyInput)));
    }

    #[test]
    fn test_detect_delimiter_semicolon() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
    }

    #[test]
    fn test_detect_delimiter_comma() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
    }

    #[test]
    fn test_detect_delimiter_tab() {
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
    }

    #[test]
    fn test_detect_delimiter_pipe() {
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
    }

    #[test]
    fn test_detect_delimiter_ignores_quoted() {
        assert_eq!(detect_delimiter("\"a;b;c;d\",x,y"), ',');
        assert_eq!(detect_delimiter("single"), ',');
    }

    #[test]
    fn test_auto_parse() {
        let result = parse_bytes_auto(b"name;age\nAlice;30\nBob;25").unwrap();

        assert_eq!(result.delimiter, ';');
        assert_eq!(result.encoding, "utf-8");
        assert_eq!(result.table.shape(), (2, 2));
        assert_eq!(result.table.columns(), ["name", "age"]);
    }

    #[test]
    fn test_bom_stripped() {
        let result = parse_bytes_auto("\u{feff}label,Texas\nTotal,1".as_bytes()).unwrap();
        assert_eq!(result.table.columns()[0], "label");
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
        assert_eq!(decode_content(&[0xA4, 0xBD], "iso-8859-1"), "¤½");
    }

    #[test]
    fn test_invalid_utf8_falls_back() {
        let decoded = decode_content(&[0x4F, 0xE9], "utf-8");
        assert_eq!(decoded, "Oé");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");
        match load_table(&path) {
            Err(LoadError::NotFound(p)) => assert_eq!(p, path),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_load_directory_is_unknown() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load_table(dir.path()), Err(LoadError::Unknown { .. })));
    }

    #[test]
    fn test_load_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        std::fs::write(
            &path,
            "state,state_population,us_avg_population,PercentDiffFromUSAvg,Population_Rank\n\
             a,10,5,100.0,1\n\
             b,0,5,,2\n",
        )
        .unwrap();

        let records = load_summary(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].percent_diff_from_us_avg, Some(100.0));
        assert_eq!(records[1].percent_diff_from_us_avg, None);
        assert_eq!(records[1].population_rank, 2);
    }
}
