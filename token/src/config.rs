//! Token configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use vestgate_release::DEFAULT_QUORUM;
use vestgate_types::amount::MAX_DECIMALS;
use vestgate_types::{Address, TokenAmount};

use crate::error::TokenError;

/// Creation-time parameters of a token.
///
/// Can be loaded from a TOML file via [`TokenConfig::from_toml_file`] or
/// built programmatically (e.g. for tests) with [`TokenConfig::new`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// The controlling identity; receives the whole supply at creation.
    pub owner: Address,

    /// Issued supply in whole tokens.
    #[serde(default = "default_total_supply_whole")]
    pub total_supply_whole: u64,

    /// Fractional digits of the raw unit.
    #[serde(default = "default_decimals")]
    pub decimals: u8,

    /// Confirmations required to release transfers.
    #[serde(default = "default_release_quorum")]
    pub release_quorum: usize,
}

fn default_total_supply_whole() -> u64 {
    1_000_000_000
}

fn default_decimals() -> u8 {
    18
}

fn default_release_quorum() -> usize {
    DEFAULT_QUORUM
}

impl TokenConfig {
    /// Defaults for everything but the owner.
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            total_supply_whole: default_total_supply_whole(),
            decimals: default_decimals(),
            release_quorum: default_release_quorum(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, TokenError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| TokenError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, TokenError> {
        let config: Self =
            toml::from_str(s).map_err(|e| TokenError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, TokenError> {
        toml::to_string_pretty(self).map_err(|e| TokenError::InvalidConfig(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), TokenError> {
        if self.owner.is_zero() {
            return Err(TokenError::InvalidConfig(
                "owner must not be the null address".into(),
            ));
        }
        if self.decimals > MAX_DECIMALS {
            return Err(TokenError::InvalidConfig(format!(
                "decimals must be at most {MAX_DECIMALS}, got {}",
                self.decimals
            )));
        }
        if self.release_quorum < DEFAULT_QUORUM {
            return Err(TokenError::InvalidConfig(format!(
                "release_quorum must be at least {DEFAULT_QUORUM}, got {}",
                self.release_quorum
            )));
        }
        self.raw_supply()?;
        Ok(())
    }

    /// Raw units in one whole token.
    pub fn unit(&self) -> Result<u128, TokenError> {
        TokenAmount::unit(self.decimals).ok_or(TokenError::Overflow)
    }

    /// The issued supply in raw units.
    pub fn raw_supply(&self) -> Result<u128, TokenError> {
        TokenAmount::from_whole(self.total_supply_whole as u128, self.decimals)
            .map(|a| a.raw())
            .ok_or(TokenError::Overflow)
    }
}
