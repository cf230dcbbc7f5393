//! Decoding of `\uXXXX` escapes into UTF-16 code units.
//!
//! The buffer accumulates exactly four ASCII hexadecimal digits (`0-9`,
//! `A-F`, `a-f`) and yields the code unit they spell. Combining surrogate
//! pairs into a `char` is left to the caller, which sees both halves.
use crate::error::SyntaxError;

#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    value: u16,
    len: u8,
}

impl UnicodeEscapeBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Clears any accumulated digits.
    pub(crate) fn reset(&mut self) {
        self.value = 0;
        self.len = 0;
    }

    /// Feeds one hexadecimal digit.
    ///
    /// Returns `Ok(Some(unit))` once the fourth digit arrives, after which the
    /// buffer is reset for the next escape.
    pub(crate) fn feed(&mut self, byte: u8) -> Result<Option<u16>, SyntaxError> {
        let digit = match byte {
            b'0'..=b'9' => byte - b'0',
            b'a'..=b'f' => byte - b'a' + 10,
            b'A'..=b'F' => byte - b'A' + 10,
            _ => return Err(SyntaxError::InvalidUnicodeEscape(char::from(byte))),
        };

        self.value = (self.value << 4) | u16::from(digit);
        self.len += 1;

        if self.len == 4 {
            let unit = self.value;
            self.reset();
            Ok(Some(unit))
        } else {
            Ok(None)
        }
    }
}

/// Returns `true` for the first half of a UTF-16 surrogate pair.
pub(crate) fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

/// Returns `true` for the second half of a UTF-16 surrogate pair.
pub(crate) fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

/// Combines a surrogate pair into the character it encodes.
pub(crate) fn combine_surrogates(high: u16, low: u16) -> Option<char> {
    let code = 0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
    char::from_u32(code)
}
