use num_integer::lcm;

use crate::alphabet::{Alphabet, DEFAULT_ALPHABET};
use crate::errors::DecodeError;

/// Construction-time options for a [`Codec`].
#[derive(Debug, Clone, Copy)]
pub struct CodecOptions {
    /// Left-justify the bits of a final partial group (zero-fill on the
    /// right) before mapping to a symbol. RFC 4648 encodings want this.
    pub right_pad_final_bits: bool,
    /// Append trailing pad symbols so the output length reaches a whole
    /// number of byte groups.
    pub pad_final_group: bool,
    /// The trailing filler symbol. Decoding trims any run of it from the
    /// end of the input before interpreting content, so a pad symbol that
    /// also appears in the alphabet makes trailing data symbols
    /// indistinguishable from padding. Pick one outside the alphabet.
    pub pad_char: char,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            right_pad_final_bits: false,
            pad_final_group: false,
            pad_char: '=',
        }
    }
}

/// Per-call options for [`Codec::decode_with`].
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// When `false`, a symbol missing from the alphabet is retried with
    /// its opposite-case variant before being treated as unknown.
    pub case_sensitive: bool,
    /// When `true`, an unknown symbol aborts with
    /// [`DecodeError::InvalidCharacter`]; when `false` it is skipped.
    pub strict: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            strict: false,
        }
    }
}

/// A fixed-width binary-to-text codec over a power-of-two alphabet.
///
/// Each output symbol carries `bits_per_char` bits of input, extracted
/// MSB-first across byte boundaries. The configuration is validated and
/// normalized at construction and immutable afterwards; construction never
/// fails. Invalid requests are clamped to the nearest valid configuration:
///
/// - fewer than 2 alphabet symbols substitutes [`DEFAULT_ALPHABET`]
/// - a bit width outside `[1, 8]` is clamped into range
/// - a bit width too wide for the alphabet is reduced until
///   `2^bits_per_char <= alphabet.len()`
///
/// Only the first `2^bits_per_char` symbols of the alphabet are
/// significant; a symbol at a later position never encodes, and decodes
/// as unknown.
#[derive(Debug, Clone)]
pub struct Codec {
    alphabet: Alphabet,
    bits_per_char: usize,
    right_pad_final_bits: bool,
    pad_final_group: bool,
    pad_char: char,
}

impl Codec {
    /// Creates a codec with default options (no final-bit justification,
    /// no group padding, `'='` as the pad symbol).
    pub fn new(bits_per_char: usize, alphabet: &str) -> Self {
        Self::new_with_options(bits_per_char, alphabet, CodecOptions::default())
    }

    /// Creates a codec with explicit options.
    pub fn new_with_options(bits_per_char: usize, alphabet: &str, options: CodecOptions) -> Self {
        let mut alphabet = Alphabet::from(alphabet);
        if alphabet.len() < 2 {
            alphabet = Alphabet::from(DEFAULT_ALPHABET);
        }

        let mut bits_per_char = bits_per_char.clamp(1, 8);
        while bits_per_char > 1 && (1usize << bits_per_char) > alphabet.len() {
            bits_per_char -= 1;
        }

        Codec {
            alphabet,
            bits_per_char,
            right_pad_final_bits: options.right_pad_final_bits,
            pad_final_group: options.pad_final_group,
            pad_char: options.pad_char,
        }
    }

    /// Returns the number of bits each output symbol carries.
    pub fn bits_per_char(&self) -> usize {
        self.bits_per_char
    }

    /// Returns the number of distinct symbols actually used,
    /// `2^bits_per_char`.
    pub fn radix(&self) -> usize {
        1 << self.bits_per_char
    }

    /// Returns the alphabet backing this codec.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Returns the trailing filler symbol.
    pub fn pad_char(&self) -> char {
        self.pad_char
    }

    /// Returns the smallest number of raw bytes that encodes to a whole
    /// number of symbols with no partial group, `lcm(bits_per_char, 8) / 8`.
    pub fn bytes_per_group(&self) -> usize {
        lcm(self.bits_per_char, 8) / 8
    }

    /// Returns the number of symbols `n` input bytes encode to, before any
    /// group padding is appended: `ceil(n * 8 / bits_per_char)`.
    pub fn encoded_len(&self, n: usize) -> usize {
        (n * 8).div_ceil(self.bits_per_char)
    }

    fn chars_per_group(&self) -> usize {
        lcm(self.bits_per_char, 8) / self.bits_per_char
    }

    /// Encodes bytes into a string over the alphabet. Total: every input
    /// has an encoding, and empty input encodes to an empty string.
    pub fn encode(&self, data: &[u8]) -> String {
        let bits_per_char = self.bits_per_char;

        // Pre-calculate output size for better memory allocation
        let output_chars = self.encoded_len(data.len());
        let capacity = if self.pad_final_group {
            let group = self.chars_per_group();
            output_chars.div_ceil(group) * group
        } else {
            output_chars
        };
        let mut result = String::with_capacity(capacity);

        let mut bit_buffer = 0u32;
        let mut bits_in_buffer = 0usize;

        // Process in chunks for better CPU cache utilization
        const PROCESS_CHUNK: usize = 64;
        let chunks = data.chunks_exact(PROCESS_CHUNK);
        let remainder = chunks.remainder();

        // Process main chunks
        for chunk in chunks {
            for &byte in chunk {
                bit_buffer = (bit_buffer << 8) | (byte as u32);
                bits_in_buffer += 8;

                while bits_in_buffer >= bits_per_char {
                    bits_in_buffer -= bits_per_char;
                    let index =
                        ((bit_buffer >> bits_in_buffer) & ((1 << bits_per_char) - 1)) as usize;
                    result.push(self.alphabet.encode_digit(index).unwrap());
                }
            }
        }

        // Process remainder
        for &byte in remainder {
            bit_buffer = (bit_buffer << 8) | (byte as u32);
            bits_in_buffer += 8;

            while bits_in_buffer >= bits_per_char {
                bits_in_buffer -= bits_per_char;
                let index = ((bit_buffer >> bits_in_buffer) & ((1 << bits_per_char) - 1)) as usize;
                result.push(self.alphabet.encode_digit(index).unwrap());
            }
        }

        // Handle the final partial group
        if bits_in_buffer > 0 {
            let index = if self.right_pad_final_bits {
                ((bit_buffer << (bits_per_char - bits_in_buffer)) & ((1 << bits_per_char) - 1))
                    as usize
            } else {
                (bit_buffer & ((1 << bits_in_buffer) - 1)) as usize
            };
            result.push(self.alphabet.encode_digit(index).unwrap());
        }

        // Pad the output to a whole number of byte groups
        if self.pad_final_group {
            let group = self.chars_per_group();
            let padded_chars = output_chars.div_ceil(group) * group;
            for _ in output_chars..padded_chars {
                result.push(self.pad_char);
            }
        }

        result
    }

    /// Decodes a string back into bytes with default options
    /// (case-sensitive, lenient). Total: unknown symbols are skipped and
    /// empty input decodes to empty bytes.
    pub fn decode(&self, encoded: &str) -> Vec<u8> {
        // Lenient decoding cannot produce an error.
        self.decode_with(encoded, DecodeOptions::default())
            .unwrap_or_default()
    }

    /// Decodes a string back into bytes.
    ///
    /// Trailing pad symbols are trimmed before interpreting content, so any
    /// number of them (including zero) is accepted. An unknown symbol is
    /// skipped in lenient mode and aborts with
    /// [`DecodeError::InvalidCharacter`] in strict mode.
    pub fn decode_with(
        &self,
        encoded: &str,
        options: DecodeOptions,
    ) -> Result<Vec<u8>, DecodeError> {
        let trimmed = encoded.trim_end_matches(self.pad_char);
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        let bits_per_char = self.bits_per_char;
        let chars: Vec<char> = trimmed.chars().collect();
        let last = chars.len() - 1;

        // Pre-allocate output buffer with estimated size
        let mut result = Vec::with_capacity(chars.len() * bits_per_char / 8);

        let mut bit_buffer = 0u32;
        let mut bits_in_buffer = 0usize;

        for (position, &c) in chars.iter().enumerate() {
            let Some(digit) = self.lookup(c, options.case_sensitive) else {
                if options.strict {
                    return Err(DecodeError::invalid_character(
                        c,
                        position,
                        encoded,
                        &self.valid_chars(),
                    ));
                }
                continue;
            };

            let needed = 8 - bits_in_buffer;
            if position == last && needed < bits_per_char {
                // The final symbol carries fewer data bits than a full
                // group: either the high bits (the encoder right-filled
                // with zeros) or the leftover low bits.
                let tail = if self.right_pad_final_bits {
                    (digit >> (bits_per_char - needed)) as u32
                } else {
                    (digit as u32) & ((1 << needed) - 1)
                };
                bit_buffer = (bit_buffer << needed) | tail;
                bits_in_buffer += needed;
            } else {
                bit_buffer = (bit_buffer << bits_per_char) | (digit as u32);
                bits_in_buffer += bits_per_char;
            }

            while bits_in_buffer >= 8 {
                bits_in_buffer -= 8;
                result.push(((bit_buffer >> bits_in_buffer) & 0xFF) as u8);
            }
        }

        Ok(result)
    }

    /// Looks up a symbol's digit, retrying the opposite-case variant when
    /// case-insensitive. A hit at a position past the radix counts as a
    /// miss: those alphabet symbols are not significant at this bit width.
    fn lookup(&self, c: char, case_sensitive: bool) -> Option<usize> {
        let radix = self.radix();
        if let Some(digit) = self.alphabet.decode_char(c).filter(|&d| d < radix) {
            return Some(digit);
        }
        if case_sensitive {
            return None;
        }
        let folded = if c.is_uppercase() {
            c.to_lowercase().next()
        } else {
            c.to_uppercase().next()
        };
        folded
            .and_then(|f| self.alphabet.decode_char(f))
            .filter(|&d| d < radix)
    }

    // Valid character set for error messages
    fn valid_chars(&self) -> String {
        let radix = self.radix();
        if radix <= 64 {
            (0..radix)
                .filter_map(|i| self.alphabet.encode_digit(i))
                .collect()
        } else {
            format!("{} characters in alphabet", radix)
        }
    }
}
