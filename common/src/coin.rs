use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token amount in base units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: u128,
}

impl Coin {
    pub fn new(amount: u128, denom: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

// Chain binaries take coins as `<amount><denom>`.
impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Joins coins the way `add-genesis-account` expects them
pub fn format_coins(coins: &[Coin]) -> String {
    coins
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Scales a whole-token amount by `10^decimals`
pub fn scale_amount(base: u128, decimals: u32) -> Result<u128, ConfigError> {
    10u128
        .checked_pow(decimals)
        .and_then(|factor| base.checked_mul(factor))
        .ok_or(ConfigError::AmountOverflow { base, decimals })
}

/// An externally supplied account funded in genesis or by a faucet transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletData {
    pub address: String,
    pub denom: String,
    pub amount: u128,
}

impl WalletData {
    pub fn coin(&self) -> Coin {
        Coin::new(self.amount, self.denom.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_coins() {
        let coins = vec![Coin::new(100, "adym"), Coin::new(7, "uatom")];
        assert_eq!(format_coins(&coins), "100adym,7uatom");
        assert_eq!(format_coins(&[]), "");
    }

    #[test]
    fn test_scale_amount() {
        assert_eq!(scale_amount(5, 0).unwrap(), 5);
        assert_eq!(scale_amount(100_000_000_000_000, 6).unwrap(), 100_000_000_000_000_000_000);
        assert_eq!(
            scale_amount(100_000_000_000_000, 18).unwrap(),
            100_000_000_000_000 * 10u128.pow(18)
        );
        assert!(matches!(
            scale_amount(u128::MAX, 1),
            Err(ConfigError::AmountOverflow { .. })
        ));
    }
}
