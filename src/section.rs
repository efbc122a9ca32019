//! The opcode listing is a dump of the VICE monitor disassembling each of the
//! Z80's opcode tables in turn. Every table starts with a marker line naming
//! its prefix, followed by one record line per opcode:
//! ```text
//! ---- prefix dd
//! .C:0000  DD 09       ADD IX,BC
//! .C:0002  DD 21 34 12 LD IX,$1234
//! .C:0006  DD 24       *INC IXH
//! ```
//! Record lines use fixed columns: the address in columns 3-6, the opcode
//! bytes in columns 9-19 and the instruction text from column 21 on. A
//! leading `*` on the instruction marks an undocumented opcode.
use super::*;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE_MARKER: Regex = Regex::new(r"^----\s*(.*?)\s*$").unwrap();
}
const RECORD_LEAD: &str = ".C:";
const ILLEGAL_MARK: char = '*';

/// The opcode table a section describes, i.e. which prefix byte(s) precede
/// the opcode byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrefixContext {
    None,
    Cb,
    Dd,
    Ed,
    Fd,
    DdCb,
    FdCb,
}
impl PrefixContext {
    /// Maps the suffix of a section marker ("prefix dd cb", ...) to its context.
    pub fn from_marker(suffix: &str) -> Option<PrefixContext> {
        match suffix {
            "plain" => Some(PrefixContext::None),
            "prefix cb" => Some(PrefixContext::Cb),
            "prefix dd" => Some(PrefixContext::Dd),
            "prefix ed" => Some(PrefixContext::Ed),
            "prefix fd" => Some(PrefixContext::Fd),
            "prefix dd cb" => Some(PrefixContext::DdCb),
            "prefix fd cb" => Some(PrefixContext::FdCb),
            _ => None,
        }
    }
    /// Name of the generated descriptor table for this context.
    pub fn table_name(&self) -> &'static str {
        match self {
            PrefixContext::None => "opcodes",
            PrefixContext::Cb => "opcodes_cb",
            PrefixContext::Dd => "opcodes_dd",
            PrefixContext::Ed => "opcodes_ed",
            PrefixContext::Fd => "opcodes_fd",
            PrefixContext::DdCb => "opcodes_ddcb",
            PrefixContext::FdCb => "opcodes_fdcb",
        }
    }
}

/// A single record line of the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpcodeRecord {
    /// index within the section, which is also the low-order opcode byte
    pub position: usize,
    /// the 4 hex digit address exactly as listed
    pub address: String,
    /// opcode bytes as 2 hex digit tokens, prefix byte(s) first
    pub bytes: Vec<String>,
    /// instruction text as listed, including any illegal marker
    pub text: String,
    /// instruction text with the illegal marker removed
    pub instruction: String,
    pub illegal: bool,
}
impl OpcodeRecord {
    pub fn parse(position: usize, line: &str) -> OpcodeRecord {
        let text = column(line, 21, None).trim().to_string();
        let (instruction, illegal) = match text.strip_prefix(ILLEGAL_MARK) {
            Some(rest) => (rest.to_string(), true),
            None => (text.clone(), false),
        };
        OpcodeRecord {
            position,
            address: column(line, 3, Some(7)).to_string(),
            bytes: column(line, 9, Some(20))
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            text,
            instruction,
            illegal,
        }
    }
}
// The listing is trusted to be well formed; short lines just yield empty fields.
fn column(line: &str, start: usize, end: Option<usize>) -> &str {
    let end = end.map_or(line.len(), |e| e.min(line.len()));
    line.get(start..end).unwrap_or("")
}

/// All records listed under one marker line, in listing order.
#[derive(Debug)]
pub struct Section {
    pub prefix: PrefixContext,
    pub records: Vec<OpcodeRecord>,
}
impl Section {
    pub fn name(&self) -> &'static str { self.prefix.table_name() }
}

/// Splits the listing into sections. Lines before the first marker and lines
/// between the end of a section's records and the next marker are ignored.
pub fn parse_sections(lines: &[String]) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut idx = 0usize;
    while idx < lines.len() {
        let Some(marker) = RE_MARKER.captures(&lines[idx]) else {
            idx += 1;
            continue;
        };
        idx += 1;
        let suffix = marker.get(1).map_or("", |m| m.as_str());
        let prefix = PrefixContext::from_marker(suffix).unwrap_or_else(|| {
            warn!("unrecognized section marker \"{}\"; treating it as unprefixed", suffix);
            PrefixContext::None
        });
        let mut records = Vec::new();
        while idx < lines.len() && lines[idx].starts_with(RECORD_LEAD) {
            records.push(OpcodeRecord::parse(records.len(), &lines[idx]));
            idx += 1;
        }
        if records.len() > 256 {
            warn!("section {} lists {} opcodes (expected at most 256)", prefix.table_name(), records.len());
        }
        verbose_println!("section {}: {} records", prefix.table_name(), records.len());
        sections.push(Section { prefix, records });
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    fn lines(src: &[&str]) -> Vec<String> { src.iter().map(|s| s.to_string()).collect() }

    #[test]
    fn record_columns() {
        let r = OpcodeRecord::parse(7, ".C:0002  DD 21 34 12 LD IX,$1234");
        assert_eq!(r.position, 7);
        assert_eq!(r.address, "0002");
        assert_eq!(r.bytes, vec!["DD", "21", "34", "12"]);
        assert_eq!(r.instruction, "LD IX,$1234");
        assert!(!r.illegal);
    }
    #[test]
    fn illegal_marker_is_stripped() {
        let r = OpcodeRecord::parse(0, ".C:0006  DD 24       *INC IXH");
        assert!(r.illegal);
        assert_eq!(r.text, "*INC IXH");
        assert_eq!(r.instruction, "INC IXH");
        assert_eq!(r.bytes, vec!["DD", "24"]);
    }
    #[test]
    fn bare_marker_and_short_lines() {
        let r = OpcodeRecord::parse(0, ".C:0010  ED 77       *");
        assert!(r.illegal);
        assert_eq!(r.instruction, "");
        let r = OpcodeRecord::parse(0, ".C:00");
        assert_eq!(r.address, "00");
        assert!(r.bytes.is_empty());
        assert_eq!(r.text, "");
        assert!(!r.illegal);
    }
    #[test]
    fn sections_and_positions() {
        let src = lines(&[
            "(C:$0000) d 0000",
            "---- plain",
            ".C:0000  00          NOP",
            ".C:0001  01 34 12    LD BC,$1234",
            "",
            ".C:0004  03          INC BC",
            "---- prefix fd cb",
            ".C:0000  FD CB 05 00 *RLC (IY+$05),B",
            "---- prefix zz",
        ]);
        let sections = parse_sections(&src);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].prefix, PrefixContext::None);
        // the blank line ends the section
        assert_eq!(sections[0].records.len(), 2);
        assert_eq!(sections[0].records[1].position, 1);
        assert_eq!(sections[1].prefix, PrefixContext::FdCb);
        assert_eq!(sections[1].name(), "opcodes_fdcb");
        assert_eq!(sections[1].records[0].position, 0);
        assert!(sections[1].records[0].illegal);
        assert_eq!(sections[2].prefix, PrefixContext::None);
        assert!(sections[2].records.is_empty());
    }
    #[test]
    fn marker_table() {
        assert_eq!(PrefixContext::from_marker("prefix dd cb"), Some(PrefixContext::DdCb));
        assert_eq!(PrefixContext::from_marker("prefix ed"), Some(PrefixContext::Ed));
        assert_eq!(PrefixContext::from_marker("plain"), Some(PrefixContext::None));
        assert_eq!(PrefixContext::from_marker("prefix xx"), None);
    }
}
