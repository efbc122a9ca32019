//! Writes the generated C++ for each section: first the section's descriptor
//! table, then the disassembler test statements for every opcode in it.
//!
//! For the record `.C:0003  C3 00 80    JP $8000` the table entry is
//! ```text
//!   /* 0x03 */  {"JP %s", ABS16, false},
//! ```
//! and the test statements are
//! ```text
//! initMem(0x0003, { 0xC3,0x00,0x80 });
//! lines = disassembler_.disassembleForward(0x0003, memory_, 1);
//! verifyLine(lines[0], 0x0003, { 0xC3,0x00,0x80 }, "JP $8000");
//! ```
use super::classify::{self, ClassifiedInstruction, ParamMode};
use super::section::{OpcodeRecord, Section};
use super::*;

use std::collections::BTreeMap;

pub const SEPARATOR: &str = "==============================================================";
const ILLEGAL_ONLY: &str = "*";

/// A record together with its classification.
pub struct Entry<'a> {
    pub record: &'a OpcodeRecord,
    pub classified: ClassifiedInstruction,
}

/// Counts gathered while emitting, reported once the run is done.
#[derive(Debug, Default)]
pub struct Summary {
    pub sections: usize,
    pub records: usize,
    pub illegal: usize,
    pub unknown: usize,
    pub modes: BTreeMap<ParamMode, usize>,
}
impl Summary {
    fn add(&mut self, entry: &Entry) {
        self.records += 1;
        if entry.record.illegal {
            self.illegal += 1;
        }
        if entry.classified.is_unknown() {
            self.unknown += 1;
        }
        *self.modes.entry(entry.classified.mode).or_default() += 1;
    }
}
impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} sections, {} opcodes ({} illegal, {} unknown)",
            self.sections, self.records, self.illegal, self.unknown
        )?;
        for mode in ParamMode::ALL {
            write!(f, ", {} {}", self.modes.get(&mode).copied().unwrap_or(0), mode)?;
        }
        Ok(())
    }
}

/// Classifies every record of a section, failing on the first record that
/// shows the listing is corrupt.
pub fn classify_section(section: &Section) -> Result<Vec<Entry<'_>>, Error> {
    let mut entries = Vec::with_capacity(section.records.len());
    for record in &section.records {
        let classified = classify::classify(&record.bytes, &record.instruction).map_err(|e| {
            Error::new(
                e.kind,
                format!(
                    "{} ({} opcode 0x{:02x} at ${})",
                    e.msg,
                    section.name(),
                    record.position,
                    record.address
                )
                .as_str(),
            )
        })?;
        verbose_println!(
            "{} 0x{:02x}: {:12} {:10} {}",
            section.name(),
            record.position,
            record.text,
            classified.mode,
            classified.template
        );
        if !classified.is_unknown()
            && (classified.render() != record.instruction
                || classified.template.matches(classify::PLACEHOLDER).count() != classified.mode.operand_count())
        {
            warn!(
                "template \"{}\" does not reproduce \"{}\" ({} 0x{:02x})",
                classified.template,
                record.instruction,
                section.name(),
                record.position
            );
        }
        entries.push(Entry { record, classified });
    }
    Ok(entries)
}

/// Writes the descriptor table for a section, one entry per opcode in
/// listing order. A short section yields a short initializer.
pub fn write_table(out: &mut dyn io::Write, section: &Section, entries: &[Entry]) -> Result<(), Error> {
    writeln!(out, "InstrDesc {}[256] = {{", section.name())?;
    for e in entries {
        writeln!(
            out,
            "  /* 0x{:02x} */  {{\"{}\", {}, {}}},",
            e.record.position, e.classified.template, e.classified.mode, e.record.illegal
        )?;
    }
    writeln!(out, "}};")?;
    Ok(())
}

/// Writes the round-trip test statements for a section's opcodes: load the
/// bytes, disassemble one line, compare with the listing.
pub fn write_tests(out: &mut dyn io::Write, entries: &[Entry]) -> Result<(), Error> {
    for e in entries {
        let r = e.record;
        let bytes = r.bytes.iter().map(|b| format!("0x{}", b)).collect::<Vec<_>>().join(",");
        let expected = if r.text == ILLEGAL_ONLY {
            classify::UNKNOWN
        } else {
            r.text.as_str()
        };
        writeln!(out, "initMem(0x{}, {{ {} }});", r.address, bytes)?;
        writeln!(out, "lines = disassembler_.disassembleForward(0x{}, memory_, 1);", r.address)?;
        writeln!(out, "verifyLine(lines[0], 0x{}, {{ {} }}, \"{}\");", r.address, bytes, expected)?;
    }
    Ok(())
}

/// Writes every section's table and tests, in listing order.
pub fn emit_all(out: &mut dyn io::Write, sections: &[Section]) -> Result<Summary, Error> {
    let mut summary = Summary::default();
    for section in sections {
        let entries = classify_section(section)?;
        write_table(out, section, &entries)?;
        writeln!(out, "{}", SEPARATOR)?;
        write_tests(out, &entries)?;
        writeln!(out, "{}", SEPARATOR)?;
        summary.sections += 1;
        entries.iter().for_each(|e| summary.add(e));
    }
    Ok(summary)
}
