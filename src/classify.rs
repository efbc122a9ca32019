//! Works out how a Z80 instruction's operand is encoded and turns its listed
//! text into a template for the disassembler's descriptor table.
//!
//! The listing renders operands as `$` hex literals. Classification picks the
//! literal that corresponds to the operand byte(s) and replaces it with a
//! `%s` placeholder, e.g. `JP $8000` becomes `JP %s` with mode [`ParamMode::Abs16`].
//! Signed displacements take their sign with them (`(IX-$03)` becomes
//! `(IX%s)`) since the disassembler prints the sign itself.
//!
//! Which literal to pick is decided by the opcode's prefix and its length:
//!
//!| prefix | length | outcome |
//!| --- | --- | --- |
//!| CB | any | no operand |
//!| DD CB / FD CB | any | displacement (3rd byte) |
//!| DD | 2 | no operand |
//!| DD | 3 | immediate (3rd byte), 16-bit relative target, or displacement |
//!| FD | 1 | no operand |
//!| FD | 3 | immediate (2nd byte), 16-bit relative target, or displacement |
//!| DD / FD | 4 | 16-bit absolute, or displacement plus immediate |
//!| ED | 2 | no operand |
//!| ED | 4 | 16-bit absolute |
//!| none | 1 | no operand |
//!| none | 2 | 8-bit immediate or relative target |
//!| none | 3 | 16-bit absolute |
//!
//! Anything else yields the `???` template, except an unprefixed opcode of any
//! other length, which means the listing itself is broken.
use super::literal::{self, HexLiteral};
use super::*;

/// Stands in for an operand in a template.
pub const PLACEHOLDER: &str = "%s";
/// Template used when no sensible template can be derived. This is also what
/// the disassembler prints for opcodes it does not recognize.
pub const UNKNOWN: &str = "???";

/// How an instruction's operand bytes are turned into text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ParamMode {
    /// no operand
    None,
    /// branch target relative to the next instruction
    Rel,
    /// 8-bit value
    Abs8,
    /// 16-bit value, little endian
    Abs16,
    /// signed 8-bit index displacement
    Disp,
    /// signed displacement followed by an 8-bit immediate
    DispAbs8,
}
impl ParamMode {
    pub const ALL: [ParamMode; 6] = [
        ParamMode::None,
        ParamMode::Rel,
        ParamMode::Abs8,
        ParamMode::Abs16,
        ParamMode::Disp,
        ParamMode::DispAbs8,
    ];
    /// Name of the corresponding enumerator in the generated tables.
    pub fn name(&self) -> &'static str {
        match self {
            ParamMode::None => "NONE",
            ParamMode::Rel => "REL",
            ParamMode::Abs8 => "ABS8",
            ParamMode::Abs16 => "ABS16",
            ParamMode::Disp => "DISP",
            ParamMode::DispAbs8 => "DISP_ABS8",
        }
    }
    /// Number of placeholders a template of this mode carries.
    pub fn operand_count(&self) -> usize {
        match self {
            ParamMode::None => 0,
            ParamMode::DispAbs8 => 2,
            _ => 1,
        }
    }
}
impl fmt::Display for ParamMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { f.pad(self.name()) }
}

/// The result of classifying one instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedInstruction {
    pub mode: ParamMode,
    /// instruction text with operands replaced by [`PLACEHOLDER`]
    pub template: String,
    /// the text each placeholder replaced, in placeholder order
    pub operands: Vec<String>,
}
impl ClassifiedInstruction {
    fn verbatim(text: &str) -> Self {
        ClassifiedInstruction {
            mode: ParamMode::None,
            template: text.to_string(),
            operands: Vec::new(),
        }
    }
    fn unknown() -> Self { ClassifiedInstruction::verbatim(UNKNOWN) }
    /// Builds the template by cutting the given spans (ascending, non-overlapping)
    /// out of `text`.
    fn spliced(mode: ParamMode, text: &str, cuts: &[(usize, usize)]) -> Self {
        let mut template = String::with_capacity(text.len());
        let mut operands = Vec::with_capacity(cuts.len());
        let mut pos = 0usize;
        for &(start, end) in cuts {
            template.push_str(&text[pos..start]);
            template.push_str(PLACEHOLDER);
            operands.push(text[start..end].to_string());
            pos = end;
        }
        template.push_str(&text[pos..]);
        ClassifiedInstruction { mode, template, operands }
    }
    pub fn is_unknown(&self) -> bool { self.template == UNKNOWN }
    /// Puts the original operand text back into the template.
    pub fn render(&self) -> String {
        let mut parts = self.template.split(PLACEHOLDER);
        let mut out = parts.next().unwrap_or_default().to_string();
        for (i, part) in parts.enumerate() {
            out.push_str(self.operands.get(i).map_or(PLACEHOLDER, |s| s.as_str()));
            out.push_str(part);
        }
        out
    }
}

/// The prefix an opcode's bytes start with. DD CB and FD CB count as their
/// own prefix since the byte after CB is a displacement, not an opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Prefix {
    None,
    Cb,
    Dd,
    DdCb,
    Ed,
    Fd,
    FdCb,
}
impl Prefix {
    fn of(bytes: &[String]) -> Prefix {
        let cb_follows = bytes.len() > 2 && bytes[1] == "CB";
        match bytes.first().map(String::as_str) {
            Some("CB") => Prefix::Cb,
            Some("DD") if cb_follows => Prefix::DdCb,
            Some("DD") => Prefix::Dd,
            Some("ED") => Prefix::Ed,
            Some("FD") if cb_follows => Prefix::FdCb,
            Some("FD") => Prefix::Fd,
            _ => Prefix::None,
        }
    }
}

/// The rule used to find the operand in an instruction's text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Strategy {
    /// no operand; the text is the template
    Verbatim,
    /// nothing sensible can be derived
    Unknown,
    /// signed displacement matching the byte at the given index
    Displacement(usize),
    /// literal matching the byte at the given index is an 8-bit value; failing
    /// that a 4 digit first literal is a relative target, any other first
    /// literal a displacement
    Abs8RelOrDisp(usize),
    /// 4 digit literal, otherwise a displacement plus a trailing `#` immediate
    Abs16OrDispAbs8,
    /// first literal, which has 4 digits
    Abs16,
    /// a `#` immediate or 2 digit literal is an 8-bit value, anything else a
    /// relative target
    Abs8OrRel,
    /// the opcode cannot exist
    Corrupt,
}
impl Strategy {
    fn select(prefix: Prefix, len: usize) -> Strategy {
        match (prefix, len) {
            (Prefix::Cb, _) => Strategy::Verbatim,
            (Prefix::DdCb | Prefix::FdCb, _) => Strategy::Displacement(2),
            (Prefix::Dd, 2) => Strategy::Verbatim,
            (Prefix::Dd, 3) => Strategy::Abs8RelOrDisp(2),
            // The FD table in the listing has its operand-less entries one byte
            // shorter than DD's and its operand byte one position earlier. It is
            // unclear whether that is intended or an artifact of how the listing
            // was produced, so both are kept exactly as listed.
            (Prefix::Fd, 1) => Strategy::Verbatim,
            (Prefix::Fd, 3) => Strategy::Abs8RelOrDisp(1),
            (Prefix::Dd | Prefix::Fd, 4) => Strategy::Abs16OrDispAbs8,
            (Prefix::Dd | Prefix::Fd, _) => Strategy::Unknown,
            (Prefix::Ed, 2) => Strategy::Verbatim,
            (Prefix::Ed, 4) => Strategy::Abs16,
            (Prefix::Ed, _) => Strategy::Unknown,
            (Prefix::None, 1) => Strategy::Verbatim,
            (Prefix::None, 2) => Strategy::Abs8OrRel,
            (Prefix::None, 3) => Strategy::Abs16,
            (Prefix::None, _) => Strategy::Corrupt,
        }
    }
}

/// Classifies an instruction given its opcode bytes and its text (without the
/// illegal marker).
///
/// Fails only for an unprefixed opcode whose length is not 1, 2 or 3 bytes;
/// every other case resolves to some template, `???` at worst.
pub fn classify(bytes: &[String], text: &str) -> Result<ClassifiedInstruction, Error> {
    if text.is_empty() {
        return Ok(ClassifiedInstruction::unknown());
    }
    let strategy = Strategy::select(Prefix::of(bytes), bytes.len());
    let literals = literal::scan(text);
    let matching = |idx: usize| find_token(&literals, text, bytes.get(idx));
    let classified = match strategy {
        Strategy::Verbatim => Some(ClassifiedInstruction::verbatim(text)),
        Strategy::Unknown => None,
        Strategy::Displacement(idx) => {
            matching(idx).map(|l| ClassifiedInstruction::spliced(ParamMode::Disp, text, &[(l.signed_start(), l.end())]))
        }
        Strategy::Abs8RelOrDisp(idx) => match matching(idx) {
            Some(l) => Some(ClassifiedInstruction::spliced(ParamMode::Abs8, text, &[(l.start, l.end())])),
            None => literals.first().and_then(|l| match l.digits {
                4 => Some(ClassifiedInstruction::spliced(ParamMode::Rel, text, &[(l.start, l.end())])),
                _ => Some(ClassifiedInstruction::spliced(ParamMode::Disp, text, &[(l.signed_start(), l.end())])),
            }),
        },
        Strategy::Abs16OrDispAbs8 => match literals.iter().rev().find(|l| l.digits == 4) {
            Some(l) => Some(ClassifiedInstruction::spliced(ParamMode::Abs16, text, &[(l.start, l.end())])),
            None => disp_abs8(text, &literals),
        },
        Strategy::Abs16 => literals
            .first()
            .filter(|l| l.digits == 4)
            .map(|l| ClassifiedInstruction::spliced(ParamMode::Abs16, text, &[(l.start, l.end())])),
        Strategy::Abs8OrRel => {
            let (mode, lit) = match literals.iter().find(|l| l.immediate) {
                Some(l) => (ParamMode::Abs8, Some(l)),
                None => {
                    let first = literals.first();
                    let mode = if first.map_or(0, |l| l.digits) == 2 {
                        ParamMode::Abs8
                    } else {
                        ParamMode::Rel
                    };
                    (mode, first)
                }
            };
            lit.map(|l| ClassifiedInstruction::spliced(mode, text, &[(l.start, l.end())]))
        }
        Strategy::Corrupt => {
            return Err(consistency_err!(
                "unprefixed opcode cannot be {} bytes long: [{}] \"{}\"",
                bytes.len(),
                bytes.join(" "),
                text
            ));
        }
    };
    Ok(classified.unwrap_or_else(ClassifiedInstruction::unknown))
}

/// The literal whose digits are exactly `token`.
fn find_token<'a>(literals: &'a [HexLiteral], text: &str, token: Option<&String>) -> Option<&'a HexLiteral> {
    let token = token?;
    literals.iter().find(|l| l.digits_of(text) == token.as_str())
}

/// A signed displacement followed later by an 8-bit immediate that ends the
/// text, e.g. `LD (IX+$05),#$20`.
fn disp_abs8(text: &str, literals: &[HexLiteral]) -> Option<ClassifiedInstruction> {
    let (imm, before) = literals.split_last()?;
    if !imm.immediate || imm.digits != 2 || imm.end() != text.len() {
        return None;
    }
    let disp = before.iter().rev().find(|l| l.sign.is_some() && l.digits == 2)?;
    Some(ClassifiedInstruction::spliced(
        ParamMode::DispAbs8,
        text,
        &[(disp.signed_start(), disp.end()), (imm.start, imm.end())],
    ))
}
