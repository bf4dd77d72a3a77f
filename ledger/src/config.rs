//! Ledger tuning knobs.

use serde::{Deserialize, Serialize};

/// Configuration for a [`ReferralLedger`](crate::ReferralLedger).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Length of generated codes, in hex characters.
    #[serde(default = "default_code_length")]
    pub code_length: usize,

    /// How many candidate codes to draw before giving up on a collision streak.
    #[serde(default = "default_max_code_attempts")]
    pub max_code_attempts: u32,
}

fn default_code_length() -> usize {
    6
}

fn default_max_code_attempts() -> u32 {
    8
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            max_code_attempts: default_max_code_attempts(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config: LedgerConfig = toml::from_str("").expect("empty toml should use defaults");
        assert_eq!(config, LedgerConfig::default());
        assert_eq!(config.code_length, 6);
        assert_eq!(config.max_code_attempts, 8);
    }

    #[test]
    fn partial_toml_overrides() {
        let config: LedgerConfig = toml::from_str("code_length = 10").expect("should parse");
        assert_eq!(config.code_length, 10);
        assert_eq!(config.max_code_attempts, 8);
    }
}
