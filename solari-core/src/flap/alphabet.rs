//! Symbols printed on the flaps, in drum order

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum flaps on one drum
pub const MAX_FLAPS: usize = 64;

/// Digits then letters, as printed on the standard 36-flap drum
pub const DEFAULT_ALPHABET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Alphabet validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlphabetError {
    /// No symbols given
    Empty,
    /// More than [`MAX_FLAPS`] symbols
    TooLong,
    /// Symbol outside printable ASCII
    InvalidSymbol(char),
    /// Symbol appears twice (ignoring case)
    Duplicate(char),
}

impl core::fmt::Display for AlphabetError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AlphabetError::Empty => f.write_str("alphabet is empty"),
            AlphabetError::TooLong => write!(f, "alphabet has more than {} flaps", MAX_FLAPS),
            AlphabetError::InvalidSymbol(c) => write!(f, "'{}' cannot be printed on a flap", c),
            AlphabetError::Duplicate(c) => write!(f, "'{}' appears on more than one flap", c),
        }
    }
}

/// Ordered, distinct flap symbols
///
/// Slot `i` is the flap carrying `symbol_at(i)`. Lookups ignore ASCII case.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FlapAlphabet {
    symbols: Vec<u8, MAX_FLAPS>,
}

impl FlapAlphabet {
    /// Build an alphabet from a string of symbols in drum order
    pub fn new(symbols: &str) -> Result<Self, AlphabetError> {
        if symbols.is_empty() {
            return Err(AlphabetError::Empty);
        }

        let mut out: Vec<u8, MAX_FLAPS> = Vec::new();
        for c in symbols.chars() {
            if !(c.is_ascii_graphic() || c == ' ') {
                return Err(AlphabetError::InvalidSymbol(c));
            }
            let byte = c as u8;
            if out.iter().any(|s| s.eq_ignore_ascii_case(&byte)) {
                return Err(AlphabetError::Duplicate(c));
            }
            out.push(byte).map_err(|_| AlphabetError::TooLong)?;
        }

        Ok(Self { symbols: out })
    }

    /// Number of flaps
    pub fn len(&self) -> u8 {
        self.symbols.len() as u8
    }

    /// Alphabets are never empty once built
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Slot carrying `c`, ignoring ASCII case
    pub fn slot_of(&self, c: char) -> Option<u8> {
        if !c.is_ascii() {
            return None;
        }
        let byte = c as u8;
        self.symbols
            .iter()
            .position(|s| s.eq_ignore_ascii_case(&byte))
            .map(|slot| slot as u8)
    }

    /// Symbol printed on `slot`
    pub fn symbol_at(&self, slot: u8) -> Option<char> {
        self.symbols.get(slot as usize).map(|&b| b as char)
    }
}

impl Default for FlapAlphabet {
    fn default() -> Self {
        let mut symbols = Vec::new();
        for b in DEFAULT_ALPHABET.bytes() {
            let _ = symbols.push(b);
        }
        Self { symbols }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_alphabet() {
        let alphabet = FlapAlphabet::default();
        assert_eq!(alphabet.len(), 36);
        assert_eq!(alphabet.slot_of('0'), Some(0));
        assert_eq!(alphabet.slot_of('9'), Some(9));
        assert_eq!(alphabet.slot_of('A'), Some(10));
        assert_eq!(alphabet.slot_of('I'), Some(18));
        assert_eq!(alphabet.slot_of('Q'), Some(26));
        assert_eq!(alphabet.slot_of('Z'), Some(35));
        assert_eq!(FlapAlphabet::new(DEFAULT_ALPHABET), Ok(alphabet));
    }

    #[test]
    fn test_left_inverse_of_ordering() {
        let alphabet = FlapAlphabet::default();
        for (i, c) in DEFAULT_ALPHABET.chars().enumerate() {
            assert_eq!(alphabet.slot_of(c), Some(i as u8));
            assert_eq!(alphabet.symbol_at(i as u8), Some(c));
        }
        assert_eq!(alphabet.symbol_at(36), None);
    }

    #[test]
    fn test_case_insensitive() {
        let alphabet = FlapAlphabet::default();
        for c in 'a'..='z' {
            assert_eq!(alphabet.slot_of(c), alphabet.slot_of(c.to_ascii_uppercase()));
        }
    }

    #[test]
    fn test_unknown_symbols() {
        let alphabet = FlapAlphabet::default();
        assert_eq!(alphabet.slot_of('#'), None);
        assert_eq!(alphabet.slot_of(' '), None);
        assert_eq!(alphabet.slot_of('é'), None);
    }

    #[test]
    fn test_validation() {
        assert_eq!(FlapAlphabet::new(""), Err(AlphabetError::Empty));
        assert_eq!(FlapAlphabet::new("ABa"), Err(AlphabetError::Duplicate('a')));
        assert_eq!(FlapAlphabet::new("AB\n"), Err(AlphabetError::InvalidSymbol('\n')));
        assert_eq!(FlapAlphabet::new("ABÄ"), Err(AlphabetError::InvalidSymbol('Ä')));

        // '!'..='`' never repeats ignoring case; '{' makes 65
        let too_long: heapless::String<128> = ('!'..='`').chain(['{']).collect();
        assert_eq!(FlapAlphabet::new(&too_long), Err(AlphabetError::TooLong));
    }

    #[test]
    fn test_blank_flap_allowed() {
        let alphabet = FlapAlphabet::new(" ABC").unwrap();
        assert_eq!(alphabet.len(), 4);
        assert_eq!(alphabet.slot_of(' '), Some(0));
        assert_eq!(alphabet.slot_of('c'), Some(3));
    }
}
