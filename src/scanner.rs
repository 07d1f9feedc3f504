//! Line scanning over an in-memory document.
//!
//! Lines keep their original terminators (`\n` or `\r\n`) so content can be
//! reassembled byte-for-byte. Line numbers are 1-based.

/// A single line of the input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number.
    pub number: usize,
    /// Raw text including its terminator, if any.
    pub text: &'a str,
}

/// Iterate the lines of `text` with 1-based numbering.
///
/// A final line without a terminator is still yielded; an empty document
/// yields nothing.
pub fn lines(text: &str) -> impl Iterator<Item = Line<'_>> {
    text.split_inclusive('\n')
        .enumerate()
        .map(|(i, text)| Line { number: i + 1, text })
}
