use std::fmt;

/// Errors that can occur during strict decoding.
///
/// Lenient decoding never fails; constructing a [`Codec`](crate::Codec)
/// never fails either. An unrecognized symbol under strict decoding is the
/// only failure the crate produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The input contains a symbol not in the alphabet
    InvalidCharacter {
        char: char,
        position: usize,
        input: String,
        valid_chars: String,
    },
}

impl DecodeError {
    /// Create an InvalidCharacter error with context
    pub fn invalid_character(c: char, position: usize, input: &str, valid_chars: &str) -> Self {
        // Truncate long inputs (by character, the input may not be ASCII)
        let display_input = if input.chars().count() > 60 {
            format!("{}...", input.chars().take(60).collect::<String>())
        } else {
            input.to_string()
        };

        DecodeError::InvalidCharacter {
            char: c,
            position,
            input: display_input,
            valid_chars: valid_chars.to_string(),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let use_color = should_use_color();

        match self {
            DecodeError::InvalidCharacter {
                char: c,
                position,
                input,
                valid_chars,
            } => {
                // Error header
                if use_color {
                    writeln!(
                        f,
                        "\x1b[1;31merror:\x1b[0m invalid character '{}' at position {}",
                        c, position
                    )?;
                } else {
                    writeln!(
                        f,
                        "error: invalid character '{}' at position {}",
                        c, position
                    )?;
                }
                writeln!(f)?;

                // Show input with caret pointing at error position
                // Need to account for multi-byte UTF-8 characters
                let char_position = input.chars().take(*position).count();
                writeln!(f, "  {}", input)?;
                write!(f, "  {}", " ".repeat(char_position))?;
                if use_color {
                    writeln!(f, "\x1b[1;31m^\x1b[0m")?;
                } else {
                    writeln!(f, "^")?;
                }
                writeln!(f)?;

                // Hint with valid characters (truncate if too long)
                let hint_chars = if valid_chars.chars().count() > 80 {
                    format!("{}...", valid_chars.chars().take(80).collect::<String>())
                } else {
                    valid_chars.clone()
                };

                if use_color {
                    write!(f, "\x1b[1;36mhint:\x1b[0m valid characters: {}", hint_chars)?;
                } else {
                    write!(f, "hint: valid characters: {}", hint_chars)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Check if colored output should be used
fn should_use_color() -> bool {
    // Respect NO_COLOR environment variable
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    // Check if stderr is a terminal
    use std::io::IsTerminal;
    std::io::stderr().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_has_context() {
        let err = DecodeError::invalid_character('_', 12, "SGVsbG9faW52YWxpZA==", "A-Za-z0-9+/=");
        let display = format!("{}", err);

        assert!(display.contains("invalid character '_' at position 12"));
        assert!(display.contains("SGVsbG9faW52YWxpZA=="));
        assert!(display.contains("^"));
        assert!(display.contains("hint:"));
    }

    #[test]
    fn test_error_display_truncates_long_input() {
        let input: String = "A".repeat(200);
        let err = DecodeError::invalid_character('!', 5, &input, "AB");
        let display = format!("{}", err);

        assert!(display.contains("..."));
        assert!(!display.contains(&input));
    }
}
