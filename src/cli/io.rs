//! Line-oriented JSON I/O for the CLI
//!
//! - Input: one JSON request per line on stdin, blank lines skipped
//! - Output: one JSON response per line on stdout
//! - UTF-8 only

use std::io::{BufRead, Write};

use super::errors::CliResult;

/// Iterates over the non-blank request lines of a reader
pub fn read_requests<R: BufRead>(reader: R) -> impl Iterator<Item = CliResult<String>> {
    reader
        .lines()
        .filter(|line| !matches!(line, Ok(l) if l.trim().is_empty()))
        .map(|line| line.map_err(Into::into))
}

/// Writes one JSON line and flushes
pub fn write_json<W: Write>(out: &mut W, json_str: &str) -> CliResult<()> {
    writeln!(out, "{}", json_str)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_blank_lines_skipped() {
        let input = Cursor::new("{\"a\":1}\n\n   \n{\"b\":2}\n");
        let lines: Vec<String> = read_requests(input).map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["{\"a\":1}", "{\"b\":2}"]);
    }

    #[test]
    fn test_write_json_appends_newline() {
        let mut out = Vec::new();
        write_json(&mut out, "{\"status\":\"ok\",\"data\":[]}").unwrap();
        assert_eq!(out, b"{\"status\":\"ok\",\"data\":[]}\n");
    }
}
