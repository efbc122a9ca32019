//! # Z80 opcode table generator
//!
//! Reads the VICE monitor's disassembly of every Z80 opcode table and
//! generates, for each table, the C++ instruction descriptors used by the
//! table-driven Z80 disassembler plus a matching set of disassembler tests.
//!
//! ## Getting Started
//! ```
//! cargo run -- /path/to/z80-opcodes > generated.cpp
//! ```
//! The listing defaults to `z80-opcodes` in the current directory. Generated
//! code is written to stdout and progress to stderr.
//! ## Options
//! Help for command line options is available using -h or --help.
#[macro_use]
mod macros;
mod classify;
mod config;
mod emit;
mod error;
mod literal;
mod section;
mod source;
use std::io::Write;
use std::path::Path;
use std::result::Result;
use std::{fmt, io};
pub(crate) use crate::error::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    config::init();
    // process_file does all the work
    match process_file(config::ARGS.file.as_str()) {
        Ok(output) => {
            io::stdout().lock().write_all(&output)?;
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e);
            Err(Box::new(e))
        }
    }
}
/// process_file converts the listing at `filename` and returns the generated
/// code. Nothing is returned unless every section converted cleanly.
fn process_file(filename: &str) -> Result<Vec<u8>, Error> {
    let lines = source::read_lines(Path::new(filename))?;
    let sections = section::parse_sections(&lines);
    if sections.is_empty() {
        warn!("no opcode sections found in {}", filename);
    }
    let mut output = Vec::new();
    let summary = emit::emit_all(&mut output, &sections)?;
    info!("Converted {}", summary);
    Ok(output)
}
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    const TEST_PATH: &str = "test";
    #[test]
    fn sample_listing() -> Result<(), Error> {
        let out = String::from_utf8(process_file("test/sample-opcodes")?).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        // every record produces one table line and three test lines
        let tables: Vec<&str> = lines.iter().copied().filter(|l| l.starts_with("InstrDesc ")).collect();
        assert_eq!(
            tables,
            vec![
                "InstrDesc opcodes[256] = {",
                "InstrDesc opcodes_cb[256] = {",
                "InstrDesc opcodes_dd[256] = {",
                "InstrDesc opcodes_ed[256] = {",
                "InstrDesc opcodes_fd[256] = {",
                "InstrDesc opcodes_ddcb[256] = {",
                "InstrDesc opcodes_fdcb[256] = {",
            ]
        );
        for expected in [
            "  /* 0x00 */  {\"NOP\", NONE, false},",
            "  /* 0x01 */  {\"LD BC,%s\", ABS16, false},",
            "  /* 0x02 */  {\"DJNZ %s\", REL, false},",
            "  /* 0x03 */  {\"LD A,#%s\", ABS8, false},",
            "  /* 0x04 */  {\"LD (IX%s),#%s\", DISP_ABS8, false},",
            "  /* 0x05 */  {\"INC IXH\", NONE, true},",
            "  /* 0x01 */  {\"LD (%s),BC\", ABS16, false},",
            "  /* 0x00 */  {\"RLC (IX%s),B\", DISP, true},",
            "verifyLine(lines[0], 0x0010, { 0xDD,0x24 }, \"*INC IXH\");",
        ] {
            assert!(lines.contains(&expected), "missing: {}", expected);
        }
        let records = fs::read_to_string("test/sample-opcodes")?
            .lines()
            .filter(|l| l.starts_with(".C:"))
            .count();
        assert_eq!(lines.iter().filter(|l| l.starts_with("  /* 0x")).count(), records);
        assert_eq!(lines.iter().filter(|l| l.starts_with("verifyLine(")).count(), records);
        assert_eq!(lines.iter().filter(|l| **l == emit::SEPARATOR).count(), 2 * tables.len());
        Ok(())
    }
    #[test]
    fn corrupt_listings() -> Result<(), Error> {
        // every listing in ./test/corrupt must fail with ErrorKind::Consistency
        let path = Path::new(TEST_PATH).join("corrupt");
        let mut entries = fs::read_dir(&path)?
            .map(|res| res.map(|e| e.path()))
            .collect::<Result<Vec<_>, io::Error>>()?;
        entries.sort();
        assert!(!entries.is_empty());
        for pb in entries {
            match process_file(pb.to_str().unwrap()) {
                Err(e) if e.kind == ErrorKind::Consistency => {}
                Err(e) => panic!("Expected ErrorKind::Consistency for {} but got {}", pb.display(), e),
                Ok(_) => panic!("Expected ErrorKind::Consistency for {} but got Ok()", pb.display()),
            }
        }
        Ok(())
    }
    #[test]
    fn listing_without_sections() -> Result<(), Error> {
        // records outside any section are skipped, leaving nothing to generate
        assert!(process_file("test/no-sections")?.is_empty());
        Ok(())
    }
    #[test]
    fn missing_listing() {
        let e = process_file("test/no-such-listing").unwrap_err();
        assert_eq!(e.kind, ErrorKind::IO);
    }
}
