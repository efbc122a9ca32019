//! Locates the `$`-prefixed hex literals in an instruction's text so the
//! classifier can cut operands out by position instead of by string search.
//!
//! Besides the digits, each literal remembers the character right before the
//! `$`: a `+`/`-` makes it a signed displacement (`(IX-$03)`) and a `#` makes
//! it an immediate (`LD A,#$12`).

/// One `$` literal found in an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexLiteral {
    /// byte offset of the `$`
    pub start: usize,
    /// number of hex digits following the `$` (may be zero)
    pub digits: usize,
    /// `+` or `-` immediately before the `$`
    pub sign: Option<char>,
    /// `#` immediately before the `$`
    pub immediate: bool,
}
impl HexLiteral {
    /// Offset one past the last digit.
    pub fn end(&self) -> usize { self.start + 1 + self.digits }
    /// Offset of the sign if there is one, otherwise of the `$`.
    pub fn signed_start(&self) -> usize {
        if self.sign.is_some() {
            self.start - 1
        } else {
            self.start
        }
    }
    /// The digits without the `$`.
    pub fn digits_of<'a>(&self, text: &'a str) -> &'a str { &text[self.start + 1..self.end()] }
}

/// Returns every `$` literal in `text`, left to right.
pub fn scan(text: &str) -> Vec<HexLiteral> {
    let bytes = text.as_bytes();
    let mut literals = Vec::new();
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }
        let prev = if i > 0 { Some(bytes[i - 1]) } else { None };
        let digits = bytes[i + 1..].iter().take_while(|b| b.is_ascii_hexdigit()).count();
        literals.push(HexLiteral {
            start: i,
            digits,
            sign: match prev {
                Some(b'+') => Some('+'),
                Some(b'-') => Some('-'),
                _ => None,
            },
            immediate: prev == Some(b'#'),
        });
        i += 1 + digits;
    }
    literals
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn displacement_and_immediate() {
        let text = "LD (IX-$03),#$7F";
        let lits = scan(text);
        assert_eq!(lits.len(), 2);
        assert_eq!(lits[0].sign, Some('-'));
        assert!(!lits[0].immediate);
        assert_eq!(lits[0].digits_of(text), "03");
        assert_eq!(&text[lits[0].signed_start()..lits[0].end()], "-$03");
        assert!(lits[1].immediate);
        assert_eq!(lits[1].sign, None);
        assert_eq!(lits[1].end(), text.len());
    }
    #[test]
    fn widths() {
        let text = "JR NZ,$0007";
        let lits = scan(text);
        assert_eq!(lits.len(), 1);
        assert_eq!(lits[0].digits, 4);
        assert_eq!(lits[0].signed_start(), lits[0].start);
        assert!(scan("NOP").is_empty());
        let bare = scan("OUT ($),A");
        assert_eq!(bare[0].digits, 0);
    }
}
