//! Loading of the opcode listing.
use super::*;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Reads the whole listing into memory, one entry per line. Line text is kept
/// as-is (only the line terminator is removed) since record parsing relies on
/// fixed columns.
pub fn read_lines(path: &Path) -> Result<Vec<String>, Error> {
    let lines = BufReader::new(File::open(path)?)
        .lines()
        .collect::<Result<Vec<String>, io::Error>>()?;
    info!("Loaded {} lines from {}", lines.len(), path.display());
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn missing_file_is_io_error() {
        let e = read_lines(Path::new("test/does-not-exist")).unwrap_err();
        assert_eq!(e.kind, ErrorKind::IO);
    }
    #[test]
    fn lines_keep_their_columns() -> Result<(), Error> {
        let lines = read_lines(Path::new("test/sample-opcodes"))?;
        assert!(lines.iter().any(|l| l == "---- plain"));
        assert!(lines.iter().any(|l| l.starts_with(".C:0000  00          NOP")));
        Ok(())
    }
}
