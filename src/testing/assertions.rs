//! Assertion and inspection helpers for generated CSV text.
//!
//! The parsing helpers understand only the output this crate writes: every
//! cell wrapped in quotes, no escaping. They are not general CSV readers.

/// Split generated text into lines, without their `\n` terminators.
///
/// # Example
///
/// ```
/// use recordcsv::testing::csv_lines;
///
/// assert_eq!(csv_lines("\"a\"\n\"1\"\n"), vec!["\"a\"", "\"1\""]);
/// assert_eq!(csv_lines("\n"), vec![""]);
/// ```
pub fn csv_lines(text: &str) -> Vec<&str> {
    text.split_terminator('\n').collect()
}

/// Unquote the cells of one generated line.
///
/// # Example
///
/// ```
/// use recordcsv::testing::split_cells;
///
/// assert_eq!(split_cells("\"a\",\"\",\"c\""), vec!["a", "", "c"]);
/// assert!(split_cells("").is_empty());
/// ```
pub fn split_cells(line: &str) -> Vec<String> {
    if line.is_empty() {
        return Vec::new();
    }
    let inner = line
        .strip_prefix('"')
        .and_then(|l| l.strip_suffix('"'))
        .unwrap_or(line);
    inner.split("\",\"").map(str::to_owned).collect()
}

/// Unquoted header cells of generated text.
pub fn header_columns(text: &str) -> Vec<String> {
    csv_lines(text)
        .first()
        .map(|line| split_cells(line))
        .unwrap_or_default()
}

/// Unquoted cells of every data row, in output order.
pub fn data_rows(text: &str) -> Vec<Vec<String>> {
    csv_lines(text)
        .iter()
        .skip(1)
        .map(|line| split_cells(line))
        .collect()
}

/// Assert that generated CSV text matches `expected`, line by line.
///
/// # Panics
///
/// Panics on the first differing line, or if the line counts differ.
///
/// # Example
///
/// ```
/// use recordcsv::testing::assert_csv_eq;
///
/// assert_csv_eq("\"a\"\n\"1\"\n", "\"a\"\n\"1\"\n");
/// ```
pub fn assert_csv_eq(actual: &str, expected: &str) {
    let actual_lines = csv_lines(actual);
    let expected_lines = csv_lines(expected);

    for (i, (a, e)) in actual_lines.iter().zip(expected_lines.iter()).enumerate() {
        assert_eq!(
            a, e,
            "CSV mismatch at line {i}:\n  Expected: {e}\n  Actual: {a}\n  Full expected:\n{expected}\n  Full actual:\n{actual}"
        );
    }
    assert_eq!(
        actual_lines.len(),
        expected_lines.len(),
        "CSV line count mismatch:\n  Expected lines: {}\n  Actual lines: {}\n  Full expected:\n{expected}\n  Full actual:\n{actual}",
        expected_lines.len(),
        actual_lines.len()
    );
    assert_eq!(
        actual.ends_with('\n'),
        expected.ends_with('\n'),
        "CSV trailing newline mismatch"
    );
}

/// Assert that generated text holds exactly `rows` data rows.
///
/// # Panics
///
/// Panics if the text has no header line or the row count differs.
pub fn assert_row_count(text: &str, rows: usize) {
    let lines = csv_lines(text);
    assert!(!lines.is_empty(), "CSV text has no header line");
    assert_eq!(
        lines.len() - 1,
        rows,
        "CSV row count mismatch:\n  Expected rows: {rows}\n  Actual rows: {}\n  Text:\n{text}",
        lines.len() - 1
    );
}

/// Assert that every line has as many cells as the header.
///
/// Only meaningful when no value contains the `","` sequence.
///
/// # Panics
///
/// Panics on the first line whose width differs from the header's.
pub fn assert_rectangular(text: &str) {
    let width = header_columns(text).len();
    for (i, row) in data_rows(text).iter().enumerate() {
        assert_eq!(
            row.len(),
            width,
            "Row {i} has {} cells, header has {width}:\n  Row: {row:?}",
            row.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_rows() {
        let text = "\"a\",\"b\"\n\"1\",\"\"\n\"3\",\"4\"\n";
        assert_eq!(header_columns(text), vec!["a", "b"]);
        assert_eq!(data_rows(text), vec![vec!["1", ""], vec!["3", "4"]]);
        assert_row_count(text, 2);
        assert_rectangular(text);
    }

    #[test]
    fn empty_text_has_no_header() {
        assert!(header_columns("").is_empty());
        assert!(data_rows("").is_empty());
    }

    #[test]
    #[should_panic(expected = "CSV mismatch at line 1")]
    fn reports_first_differing_line() {
        assert_csv_eq("\"a\"\n\"1\"\n", "\"a\"\n\"2\"\n");
    }

    #[test]
    #[should_panic(expected = "CSV line count mismatch")]
    fn reports_missing_lines() {
        assert_csv_eq("\"a\"\n", "\"a\"\n\"1\"\n");
    }
}
