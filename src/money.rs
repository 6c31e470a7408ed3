//! Transaction amount shown in the payment screen banner.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Currency {
    /// US dollar
    Usd,
    /// Uzbekistani so'm
    Uzs,
    /// Any other ISO 4217 code, shown as-is.
    Other(String),
}

/// Where the currency sign goes relative to the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPosition {
    /// `$1.00`
    BeforeAmount,
    /// `1.00 UZS`
    AfterAmount,
}

impl Currency {
    /// Parses the ISO 4217 code sent by the backend.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "USD" => Self::Usd,
            "UZS" => Self::Uzs,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the ISO 4217 code.
    pub fn code(&self) -> &str {
        match self {
            Self::Usd => "USD",
            Self::Uzs => "UZS",
            Self::Other(code) => code,
        }
    }

    /// Returns the sign shown next to the amount.
    pub fn symbol(&self) -> &str {
        match self {
            Self::Usd => "$",
            _ => self.code(),
        }
    }

    /// Returns where [`symbol`](Self::symbol) is placed.
    pub const fn position(&self) -> SymbolPosition {
        match self {
            Self::Usd => SymbolPosition::BeforeAmount,
            _ => SymbolPosition::AfterAmount,
        }
    }
}

/// An amount in a currency.
#[derive(Debug, Clone, PartialEq)]
pub struct Money {
    amount: f64,
    currency: Currency,
}

impl Money {
    /// Creates a new amount.
    pub fn new(amount: f64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Returns the numeric amount.
    #[inline]
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Returns the currency.
    #[inline]
    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Formats the amount with two decimals and spaces between thousands.
    ///
    /// # Example
    ///
    /// ```
    /// use payze::money::{Currency, Money};
    ///
    /// assert_eq!(Money::new(1234.5, Currency::Usd).formatted(), "$1 234.50");
    /// assert_eq!(Money::new(150000.0, Currency::Uzs).formatted(), "150 000.00 UZS");
    /// ```
    pub fn formatted(&self) -> String {
        let amount = group_thousands(self.amount);
        match self.currency.position() {
            SymbolPosition::BeforeAmount => format!("{}{}", self.currency.symbol(), amount),
            SymbolPosition::AfterAmount => format!("{} {}", amount, self.currency.symbol()),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

fn group_thousands(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3 + 4);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}

/// Transaction details returned by the backend at session start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetails {
    /// Amount to pay.
    pub amount: f64,
    /// ISO 4217 currency code.
    pub currency: String,
}

impl From<TransactionDetails> for Money {
    fn from(details: TransactionDetails) -> Self {
        Money::new(details.amount, Currency::from_code(&details.currency))
    }
}
