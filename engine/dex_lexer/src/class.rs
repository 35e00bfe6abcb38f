//! O(1) byte classification.
//!
//! A fixed 256-entry table maps every byte to its lexical category. The
//! table is built in a `const` context, so classification is a single
//! branch-free index at runtime. Higher layers must classify through
//! [`classify`] rather than comparing bytes ad hoc.

/// Lexical category of a single input byte.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CharClass {
    /// Byte with no meaning in the grammar. Produces an illegal token.
    Invalid,
    /// Space, tab, LF, or CR. Skipped between tokens.
    Whitespace,
    /// `0`–`9`.
    Digit,
    /// `A`–`Z`, `a`–`z`, or `_`. Starts and continues identifiers.
    Letter,
    /// `.` — the decimal point inside a numeric literal.
    Dot,
    /// One of `+ - * / % ^`.
    Operator,
    LParen,
    RParen,
    Comma,
    /// Byte 0, the end-of-input sentinel.
    Eof,
}

/// The classification table, one entry per possible byte value.
static CLASS_TABLE: [CharClass; 256] = build_table();

const fn build_table() -> [CharClass; 256] {
    let mut table = [CharClass::Invalid; 256];

    table[0] = CharClass::Eof;
    table[b' ' as usize] = CharClass::Whitespace;
    table[b'\t' as usize] = CharClass::Whitespace;
    table[b'\n' as usize] = CharClass::Whitespace;
    table[b'\r' as usize] = CharClass::Whitespace;

    let mut b = b'0';
    while b <= b'9' {
        table[b as usize] = CharClass::Digit;
        b += 1;
    }

    let mut b = b'a';
    while b <= b'z' {
        table[b as usize] = CharClass::Letter;
        b += 1;
    }
    let mut b = b'A';
    while b <= b'Z' {
        table[b as usize] = CharClass::Letter;
        b += 1;
    }
    // Underscore is an identifier character.
    table[b'_' as usize] = CharClass::Letter;

    table[b'.' as usize] = CharClass::Dot;
    table[b'(' as usize] = CharClass::LParen;
    table[b')' as usize] = CharClass::RParen;
    table[b',' as usize] = CharClass::Comma;

    table[b'+' as usize] = CharClass::Operator;
    table[b'-' as usize] = CharClass::Operator;
    table[b'*' as usize] = CharClass::Operator;
    table[b'/' as usize] = CharClass::Operator;
    table[b'%' as usize] = CharClass::Operator;
    table[b'^' as usize] = CharClass::Operator;

    table
}

/// Classify a single byte.
#[inline]
pub fn classify(byte: u8) -> CharClass {
    CLASS_TABLE[byte as usize]
}
