use std::collections::HashMap;

/// Fallback alphabet used when a caller supplies fewer than two symbols.
///
/// 66 symbols: the base64 set plus the two URL-safe variants, wide enough
/// for any bit width up to 6.
pub const DEFAULT_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/-_";

/// An ordered set of symbols together with its reverse lookup index.
///
/// The index (symbol to digit value) is built once at construction and never
/// mutated afterwards, so an `Alphabet` can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct Alphabet {
    chars: Vec<char>,
    char_to_index: HashMap<char, usize>,
}

impl Alphabet {
    /// Creates a new alphabet from an ordered list of symbols.
    ///
    /// Duplicate symbols are tolerated: the first occurrence keeps its
    /// position in the index, later occurrences are still addressable by
    /// digit but never win a reverse lookup.
    pub fn new(chars: Vec<char>) -> Self {
        let mut char_to_index = HashMap::with_capacity(chars.len());
        for (i, &c) in chars.iter().enumerate() {
            char_to_index.entry(c).or_insert(i);
        }
        Alphabet {
            chars,
            char_to_index,
        }
    }

    /// Returns the number of symbols in the alphabet.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Returns `true` if the alphabet has no symbols.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Returns the symbols in order.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Encodes a digit as a symbol.
    ///
    /// Returns `None` if the digit is out of range.
    pub fn encode_digit(&self, digit: usize) -> Option<char> {
        self.chars.get(digit).copied()
    }

    /// Decodes a symbol back to its digit value.
    ///
    /// Returns `None` if the symbol is not in the alphabet.
    pub fn decode_char(&self, c: char) -> Option<usize> {
        self.char_to_index.get(&c).copied()
    }
}

impl From<&str> for Alphabet {
    fn from(s: &str) -> Self {
        Self::new(s.chars().collect())
    }
}
