use serde::Deserialize;
use std::collections::HashMap;

use crate::codec::{Codec, CodecOptions};

/// Configuration for a single named codec loaded from TOML.
#[derive(Debug, Deserialize, Clone)]
pub struct AlphabetConfig {
    /// The symbols comprising the alphabet, in digit order
    #[serde(default)]
    pub chars: String,
    /// Bits carried per symbol; defaults to the widest fit for the alphabet
    #[serde(default)]
    pub bits_per_char: Option<usize>,
    /// Left-justify the bits of a final partial group (RFC 4648 style)
    #[serde(default)]
    pub right_pad_final_bits: bool,
    /// Pad the output to a whole number of byte groups
    #[serde(default)]
    pub pad_final_group: bool,
    /// Optional pad symbol (e.g., "=" for base64); only its first
    /// character is used
    #[serde(default)]
    pub padding: Option<String>,
}

impl AlphabetConfig {
    /// Builds a [`Codec`] from this configuration.
    ///
    /// A missing `bits_per_char` requests the widest width; construction
    /// clamps it down to the largest one the alphabet supports.
    pub fn build(&self) -> Codec {
        let bits_per_char = self.bits_per_char.unwrap_or(8);
        let mut options = CodecOptions {
            right_pad_final_bits: self.right_pad_final_bits,
            pad_final_group: self.pad_final_group,
            ..CodecOptions::default()
        };
        if let Some(c) = self.padding.as_ref().and_then(|s| s.chars().next()) {
            options.pad_char = c;
        }
        Codec::new_with_options(bits_per_char, &self.chars, options)
    }
}

/// The set of named codecs known to the crate, keyed by name.
#[derive(Debug, Deserialize)]
pub struct AlphabetsConfig {
    pub alphabets: HashMap<String, AlphabetConfig>,
}

impl AlphabetsConfig {
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn load_default() -> Result<Self, Box<dyn std::error::Error>> {
        let content = include_str!("../alphabets.toml");
        Ok(Self::from_toml(content)?)
    }

    /// Load configuration from custom file path
    pub fn load_from_file(path: &std::path::Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_toml(&content)?)
    }

    /// Load configuration with user overrides from standard locations
    /// 1. Start with built-in alphabets
    /// 2. Override with ~/.config/base-k/alphabets.toml if it exists
    /// 3. Override with ./alphabets.toml if it exists in current directory
    pub fn load_with_overrides() -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = Self::load_default()?;

        // Try to load user config from ~/.config/base-k/alphabets.toml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config_path = config_dir.join("base-k").join("alphabets.toml");
            if user_config_path.exists() {
                match Self::load_from_file(&user_config_path) {
                    Ok(user_config) => {
                        config.merge(user_config);
                    }
                    Err(e) => {
                        eprintln!(
                            "Warning: Failed to load user config from {:?}: {}",
                            user_config_path, e
                        );
                    }
                }
            }
        }

        // Try to load local config from ./alphabets.toml
        let local_config_path = std::path::Path::new("alphabets.toml");
        if local_config_path.exists() {
            match Self::load_from_file(local_config_path) {
                Ok(local_config) => {
                    config.merge(local_config);
                }
                Err(e) => {
                    eprintln!(
                        "Warning: Failed to load local config from {:?}: {}",
                        local_config_path, e
                    );
                }
            }
        }

        Ok(config)
    }

    /// Merge another config into this one, overriding existing alphabets
    pub fn merge(&mut self, other: AlphabetsConfig) {
        for (name, alphabet) in other.alphabets {
            self.alphabets.insert(name, alphabet);
        }
    }

    pub fn get_alphabet(&self, name: &str) -> Option<&AlphabetConfig> {
        self.alphabets.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_config() {
        let config = AlphabetsConfig::load_default().unwrap();
        assert!(config.alphabets.contains_key("base64"));
        assert!(config.alphabets.contains_key("base32"));
        assert!(config.alphabets.contains_key("base16"));
    }

    #[test]
    fn test_base64_entry() {
        let config = AlphabetsConfig::load_default().unwrap();
        let base64 = config.get_alphabet("base64").unwrap();
        assert_eq!(base64.chars.chars().count(), 64);
        assert_eq!(base64.padding, Some("=".to_string()));
        assert!(base64.right_pad_final_bits);
        assert!(base64.pad_final_group);
    }

    #[test]
    fn test_build_derives_bits_from_alphabet() {
        let config = AlphabetsConfig::load_default().unwrap();

        let base16 = config.get_alphabet("base16").unwrap().build();
        assert_eq!(base16.bits_per_char(), 4);

        let base64 = config.get_alphabet("base64").unwrap().build();
        assert_eq!(base64.bits_per_char(), 6);

        let dna = config.get_alphabet("dna").unwrap().build();
        assert_eq!(dna.bits_per_char(), 2);
    }

    #[test]
    fn test_padding_reduced_to_first_char() {
        let toml_content = r#"
[alphabets.custom]
chars = "0123456789ABCDEF"
pad_final_group = true
padding = "=*"
"#;
        let config = AlphabetsConfig::from_toml(toml_content).unwrap();
        let codec = config.get_alphabet("custom").unwrap().build();
        assert_eq!(codec.pad_char(), '=');
    }

    #[test]
    fn test_merge_configs() {
        let mut config1 = AlphabetsConfig {
            alphabets: HashMap::new(),
        };
        config1.alphabets.insert(
            "test1".to_string(),
            AlphabetConfig {
                chars: "ABC".to_string(),
                bits_per_char: None,
                right_pad_final_bits: false,
                pad_final_group: false,
                padding: None,
            },
        );

        let mut config2 = AlphabetsConfig {
            alphabets: HashMap::new(),
        };
        config2.alphabets.insert(
            "test2".to_string(),
            AlphabetConfig {
                chars: "XYZ".to_string(),
                bits_per_char: None,
                right_pad_final_bits: false,
                pad_final_group: false,
                padding: None,
            },
        );
        config2.alphabets.insert(
            "test1".to_string(),
            AlphabetConfig {
                chars: "DEF".to_string(),
                bits_per_char: None,
                right_pad_final_bits: false,
                pad_final_group: false,
                padding: None,
            },
        );

        config1.merge(config2);

        assert_eq!(config1.alphabets.len(), 2);
        assert_eq!(config1.get_alphabet("test1").unwrap().chars, "DEF");
        assert_eq!(config1.get_alphabet("test2").unwrap().chars, "XYZ");
    }

    #[test]
    fn test_load_from_toml_string() {
        let toml_content = r#"
[alphabets.custom]
chars = "0123456789"
bits_per_char = 3
"#;
        let config = AlphabetsConfig::from_toml(toml_content).unwrap();
        assert!(config.alphabets.contains_key("custom"));
        let codec = config.get_alphabet("custom").unwrap().build();
        assert_eq!(codec.bits_per_char(), 3);
    }
}
