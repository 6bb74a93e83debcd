// CSV/TSV import/export

use std::io::{Read, Write};
use std::path::Path;

use retable_engine::table::Table;
use retable_engine::value::Value;

use crate::error::LoadError;
use crate::table_from_grid;

/// Import a delimited text file. The first record is the header row;
/// the delimiter is sniffed from the content.
pub fn import(path: &Path) -> Result<Table, LoadError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    import_from_string(&content, delimiter)
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        // Must produce >1 field on the first line to be viable
        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // Score: (number of lines with same field count as line 1) * field_count
        // Higher field count breaks ties — more columns = more likely real delimiter
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
fn read_file_as_utf8(path: &Path) -> Result<String, LoadError> {
    let mut file = std::fs::File::open(path).map_err(|e| LoadError::Io(e.to_string()))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| LoadError::Io(e.to_string()))?;

    // Try UTF-8 first; on failure, recover the buffer from the error
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            // Fall back to Windows-1252 (common for Excel-exported CSVs)
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

fn import_from_string(content: &str, delimiter: u8) -> Result<Table, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();

    let headers = match records.next() {
        Some(result) => result
            .map_err(|e| LoadError::Parse(e.to_string()))?
            .iter()
            .map(|field| field.to_string())
            .collect::<Vec<String>>(),
        None => return Err(LoadError::Parse("file has no header row".to_string())),
    };

    let mut grid = Vec::new();
    for result in records {
        let record = result.map_err(|e| LoadError::Parse(e.to_string()))?;
        grid.push(record.iter().map(cell_from_field).collect());
    }

    table_from_grid(headers, grid)
}

/// Typed import of one CSV field: empty -> Null, numeric -> Number,
/// everything else text as written.
fn cell_from_field(field: &str) -> Value {
    if field.is_empty() {
        return Value::Null;
    }
    if let Ok(num) = field.trim().parse::<f64>() {
        return Value::Number(num);
    }
    Value::Text(field.to_string())
}

pub fn export(table: &Table, path: &Path) -> Result<(), LoadError> {
    export_with_delimiter(table, path, b',')
}

pub fn export_with_delimiter(table: &Table, path: &Path, delimiter: u8) -> Result<(), LoadError> {
    let file = std::fs::File::create(path).map_err(|e| LoadError::Io(e.to_string()))?;
    write_to(table, file, delimiter)
}

/// Write a table as delimited text to any writer (used for stdout output).
pub fn write_to<W: Write>(table: &Table, writer: W, delimiter: u8) -> Result<(), LoadError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    writer
        .write_record(table.columns())
        .map_err(|e| LoadError::Io(e.to_string()))?;

    for row in table.rows() {
        let record: Vec<String> = table
            .columns()
            .iter()
            .map(|name| row.get(name).map(Value::display).unwrap_or_default())
            .collect();
        writer
            .write_record(&record)
            .map_err(|e| LoadError::Io(e.to_string()))?;
    }

    writer.flush().map_err(|e| LoadError::Io(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_import_typed_cells() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("orders.csv");
        fs::write(&path, "item,qty,price\napples,2,5\npears,,4.5\n").unwrap();

        let table = import(&path).unwrap();
        assert_eq!(table.columns(), ["item", "qty", "price"]);
        assert_eq!(table.get(0, "item"), Some(&Value::Text("apples".to_string())));
        assert_eq!(table.get(0, "qty"), Some(&Value::Number(2.0)));
        assert_eq!(table.get(1, "qty"), Some(&Value::Null));
        assert_eq!(table.get(1, "price"), Some(&Value::Number(4.5)));
    }

    #[test]
    fn test_import_sniffs_semicolon() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "a;b\n1;2\n3;4\n").unwrap();

        let table = import(&path).unwrap();
        assert_eq!(table.columns(), ["a", "b"]);
        assert_eq!(table.get(1, "b"), Some(&Value::Number(4.0)));
    }

    #[test]
    fn test_import_windows_1252_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin.csv");
        // "café" with 0xE9 (Windows-1252 é), invalid as UTF-8
        fs::write(&path, b"name,qty\ncaf\xe9,1\n").unwrap();

        let table = import(&path).unwrap();
        assert_eq!(table.get(0, "name"), Some(&Value::Text("café".to_string())));
    }

    #[test]
    fn test_import_ragged_rows_pad_with_null() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ragged.csv");
        fs::write(&path, "a,b,c\n1,2\n").unwrap();

        let table = import(&path).unwrap();
        assert_eq!(table.get(0, "c"), Some(&Value::Null));
    }

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("orders.csv");
        fs::write(&path, "item,qty\napples,2\npears,3\n").unwrap();

        let table = import(&path).unwrap();
        let out = dir.path().join("out.csv");
        export(&table, &out).unwrap();

        let back = import(&out).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn test_empty_file_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, "").unwrap();

        assert!(matches!(import(&path), Err(LoadError::Parse(_))));
    }
}
