//! Column addressing shared across the store and record layers.
//!
//! Columns are 1-based indices exposed to users in letter notation: `1 -> A`,
//! `26 -> Z`, `27 -> AA`. The letter form is bijective base-26 (digits `A..=Z`
//! stand for `1..=26`, there is no zero digit).

use core::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors returned when a column index or letter string is malformed.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum AddressError {
    /// Column indices start at 1.
    #[error("column index must be 1-based (>= 1), got {0}")]
    OutOfRange(i64),
    #[error("column letters must not be empty")]
    Empty,
    #[error("invalid character {ch:?} in column letters `{input}`")]
    InvalidCharacter { input: String, ch: char },
    /// Letter string denotes an index that does not fit in a `u32`.
    #[error("column letters `{0}` exceed the supported range")]
    Overflow(String),
}

/// A validated, 1-based column position.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ColumnAddress(u32);

impl ColumnAddress {
    /// Construct from a 1-based index.
    pub fn new(index: u32) -> Result<Self, AddressError> {
        if index == 0 {
            return Err(AddressError::OutOfRange(0));
        }
        Ok(Self(index))
    }

    /// Parse letter notation, accepting lowercase input.
    pub fn parse(letters: &str) -> Result<Self, AddressError> {
        letters_to_column(letters).map(Self)
    }

    #[inline(always)]
    pub fn index(self) -> u32 {
        self.0
    }

    /// Uppercase letter notation for this column.
    pub fn letters(self) -> String {
        encode_letters(self.0)
    }
}

impl fmt::Display for ColumnAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.letters())
    }
}

impl FromStr for ColumnAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<u32> for ColumnAddress {
    type Error = AddressError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ColumnAddress {
    type Error = AddressError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ColumnAddress> for u32 {
    fn from(value: ColumnAddress) -> Self {
        value.0
    }
}

/// A column as declared by callers: either an index or letters.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ColumnSpec {
    Index(i64),
    Letters(String),
}

impl ColumnSpec {
    /// Validate and convert into a [`ColumnAddress`].
    pub fn resolve(&self) -> Result<ColumnAddress, AddressError> {
        match self {
            ColumnSpec::Index(idx) => {
                let idx = u32::try_from(*idx).map_err(|_| AddressError::OutOfRange(*idx))?;
                ColumnAddress::new(idx)
            }
            ColumnSpec::Letters(letters) => ColumnAddress::parse(letters),
        }
    }
}

impl From<u32> for ColumnSpec {
    fn from(value: u32) -> Self {
        ColumnSpec::Index(value as i64)
    }
}

impl From<i32> for ColumnSpec {
    fn from(value: i32) -> Self {
        ColumnSpec::Index(value as i64)
    }
}

impl From<i64> for ColumnSpec {
    fn from(value: i64) -> Self {
        ColumnSpec::Index(value)
    }
}

impl From<usize> for ColumnSpec {
    fn from(value: usize) -> Self {
        ColumnSpec::Index(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<&str> for ColumnSpec {
    fn from(value: &str) -> Self {
        ColumnSpec::Letters(value.to_string())
    }
}

impl From<String> for ColumnSpec {
    fn from(value: String) -> Self {
        ColumnSpec::Letters(value)
    }
}

impl From<ColumnAddress> for ColumnSpec {
    fn from(value: ColumnAddress) -> Self {
        ColumnSpec::Index(value.index() as i64)
    }
}

/// Convert a 1-based column index into letters.
pub fn column_to_letters(index: u32) -> Result<String, AddressError> {
    ColumnAddress::new(index).map(ColumnAddress::letters)
}

/// Convert letters (any case) into a 1-based column index.
pub fn letters_to_column(letters: &str) -> Result<u32, AddressError> {
    if letters.is_empty() {
        return Err(AddressError::Empty);
    }
    let mut col: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return Err(AddressError::InvalidCharacter {
                input: letters.to_string(),
                ch,
            });
        }
        let digit = (ch.to_ascii_uppercase() as u8 - b'A') as u32 + 1;
        col = col
            .checked_mul(26)
            .and_then(|c| c.checked_add(digit))
            .ok_or_else(|| AddressError::Overflow(letters.to_string()))?;
    }
    Ok(col)
}

/// Canonical uppercase letters for an index or letter string.
///
/// Letter input is validated and uppercased; it is not re-encoded, so the
/// result is exactly the caller's letters in uppercase.
pub fn normalize(spec: impl Into<ColumnSpec>) -> Result<String, AddressError> {
    match spec.into() {
        ColumnSpec::Letters(letters) => {
            letters_to_column(&letters)?;
            Ok(letters.to_ascii_uppercase())
        }
        index @ ColumnSpec::Index(_) => index.resolve().map(ColumnAddress::letters),
    }
}

fn encode_letters(mut n: u32) -> String {
    let mut buf = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        buf.push(b'A' + rem);
        n = (n - 1) / 26;
    }
    buf.reverse();
    buf.into_iter().map(char::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_letters() {
        assert_eq!(column_to_letters(1).unwrap(), "A");
        assert_eq!(column_to_letters(26).unwrap(), "Z");
        assert_eq!(column_to_letters(27).unwrap(), "AA");
        assert_eq!(column_to_letters(52).unwrap(), "AZ");
        assert_eq!(column_to_letters(702).unwrap(), "ZZ");
        assert_eq!(column_to_letters(703).unwrap(), "AAA");
        assert_eq!(column_to_letters(16_384).unwrap(), "XFD");
    }

    #[test]
    fn zero_index_rejected() {
        assert_eq!(column_to_letters(0), Err(AddressError::OutOfRange(0)));
        assert_eq!(
            ColumnSpec::from(-3).resolve(),
            Err(AddressError::OutOfRange(-3))
        );
    }

    #[test]
    fn letters_roundtrip() {
        for n in (1..=20_000u32).step_by(7) {
            let letters = column_to_letters(n).unwrap();
            assert_eq!(letters_to_column(&letters).unwrap(), n);
        }
        assert_eq!(letters_to_column("xfd").unwrap(), 16_384);
    }

    #[test]
    fn normalize_inputs() {
        assert_eq!(normalize("c").unwrap(), "C");
        assert_eq!(normalize(3).unwrap(), "C");
        assert_eq!(normalize("aB").unwrap(), "AB");
        assert_eq!(normalize(""), Err(AddressError::Empty));
        assert!(matches!(
            normalize("A1"),
            Err(AddressError::InvalidCharacter { ch: '1', .. })
        ));
    }

    #[test]
    fn overflow_detected() {
        assert!(matches!(
            letters_to_column("ZZZZZZZZZZ"),
            Err(AddressError::Overflow(_))
        ));
    }

    #[test]
    fn display_uses_letters() {
        let col = ColumnAddress::parse("ab").unwrap();
        assert_eq!(col.index(), 28);
        assert_eq!(col.to_string(), "AB");
        assert!(ColumnAddress::new(2).unwrap() < col);
    }
}
