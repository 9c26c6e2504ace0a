//! # Money
//!
//! Currency handling for the storefront.
//! All amounts are carried as integers in the smallest currency unit
//! (cents for EUR/USD) to avoid floating-point money errors.

use serde::{Deserialize, Serialize};

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    EUR,
    USD,
    GBP,
    JPY,
}

impl Currency {
    /// Returns the lowercase ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::EUR => "eur",
            Currency::USD => "usd",
            Currency::GBP => "gbp",
            Currency::JPY => "jpy",
        }
    }

    /// Parse a currency code (case-insensitive)
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_lowercase().as_str() {
            "eur" => Some(Currency::EUR),
            "usd" => Some(Currency::USD),
            "gbp" => Some(Currency::GBP),
            "jpy" => Some(Currency::JPY),
            _ => None,
        }
    }

    /// Number of decimal places for this currency
    /// (JPY has 0 decimals, the others have 2)
    pub fn decimal_places(&self) -> u8 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Format an amount in minor units for display (e.g. 1200 -> "€12.00")
    pub fn format_minor(&self, amount: i64) -> String {
        let symbol = match self {
            Currency::EUR => "€",
            Currency::USD => "$",
            Currency::GBP => "£",
            Currency::JPY => "¥",
        };
        if self.decimal_places() == 0 {
            format!("{}{}", symbol, amount)
        } else {
            let divisor = 10_i64.pow(self.decimal_places() as u32);
            format!(
                "{}{}.{:02}",
                symbol,
                amount / divisor,
                (amount % divisor).abs()
            )
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::EUR
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(Currency::from_code("eur"), Some(Currency::EUR));
        assert_eq!(Currency::from_code("USD"), Some(Currency::USD));
        assert_eq!(Currency::from_code("xyz"), None);
    }

    #[test]
    fn test_format_minor() {
        assert_eq!(Currency::EUR.format_minor(1200), "€12.00");
        assert_eq!(Currency::USD.format_minor(1099), "$10.99");
        assert_eq!(Currency::USD.format_minor(5), "$0.05");
        assert_eq!(Currency::JPY.format_minor(1000), "¥1000");
    }
}
